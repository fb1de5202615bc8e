//! Surgery linkage: after solving, each surgery secretary is pointed at
//! the doctor she assists. Never a constraint, pure table lookup.

use crate::domain::{Assignment, AssignmentId, BlockId, BlockType, DoctorActivity, SkillId};
use std::collections::HashMap;

/// Sets `id_linked_doctor` on every SURGERY assignment whose skill matches
/// a doctor activity on the same block. The first matching doctor in
/// insertion order wins; no match leaves the link null.
pub fn link_surgery_assignments(
    assignments: &mut [Assignment],
    doctor_activities: &[DoctorActivity],
) {
    if doctor_activities.is_empty() {
        return;
    }

    let mut by_block_skill: HashMap<(BlockId, SkillId), AssignmentId> = HashMap::new();
    for da in doctor_activities {
        by_block_skill
            .entry((da.id_block, da.id_skill))
            .or_insert(da.id_assignment);
    }

    for a in assignments {
        if a.block_type != BlockType::Surgery {
            continue;
        }
        let Some(skill) = a.id_skill else { continue };
        a.id_linked_doctor = by_block_skill.get(&(a.id_block, skill)).copied();
    }
}
