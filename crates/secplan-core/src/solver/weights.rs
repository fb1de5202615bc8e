//! Objective weights, in priority order.

use crate::domain::RoleId;

/// Each violated avoidance component adds this much to the pénibilité load.
pub const EVITER_WEIGHT: i32 = 3;

/// Roles that require the same person morning and afternoon within a
/// department (deployment convention: reception and its equivalent).
pub const RECEPTION_ROLE_IDS: [RoleId; 2] = [2, 3];

/// Weighted objective configuration.
///
/// The defaults are the production tuning: filling a medical need always
/// dominates an admin placement, skill levels are spaced far enough apart
/// to override site continuity, and the balance penalties only arbitrate
/// between otherwise equivalent plans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectiveWeights {
    /// Per medical assignment.
    pub fill_bonus: i32,
    /// Multiplier on the eligibility row's skill_score.
    pub skill_mult: i32,
    /// Per (secretary, day, site) working both periods on the same site.
    pub site_same_bonus: i32,
    /// Per (secretary, day) pair of different AM/PM sites. Negative.
    pub site_cross_penalty: i32,
    /// Per unit of pénibilité deviation from the average. Negative.
    pub penibilite_dev_penalty: i32,
    /// Multiplier on the summed prefere_* scores.
    pub prefere_mult: i32,
    /// Per admin assignment.
    pub admin_fill_bonus: i32,
    /// Per missing admin half-day under a secretary's target. Negative.
    pub admin_target_penalty: i32,
    /// Per unit of medical-count deviation from the average. Negative.
    pub workload_dev_penalty: i32,
    /// Count admin placements in the workload balance as well.
    pub count_admin_in_balance: bool,
}

impl Default for ObjectiveWeights {
    fn default() -> Self {
        Self {
            fill_bonus: 200,
            skill_mult: 5,
            site_same_bonus: 80,
            site_cross_penalty: -60,
            penibilite_dev_penalty: -12,
            prefere_mult: 1,
            admin_fill_bonus: 5,
            admin_target_penalty: -20,
            workload_dev_penalty: -3,
            count_admin_in_balance: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn medical_strictly_dominates_admin() {
        // Swapping a medical placement for an admin one on the same
        // half-day must always lose.
        let w = ObjectiveWeights::default();
        assert!(w.fill_bonus - w.admin_fill_bonus > 0);
    }

    #[test]
    fn penalties_are_negative() {
        let w = ObjectiveWeights::default();
        assert!(w.site_cross_penalty < 0);
        assert!(w.penibilite_dev_penalty < 0);
        assert!(w.admin_target_penalty < 0);
        assert!(w.workload_dev_penalty < 0);
    }
}
