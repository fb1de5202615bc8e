pub mod availability;
pub mod domain;
pub mod needs;
pub mod solver;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

#[cfg(test)]
mod needs_tests;

// Re-export commonly used types
pub use domain::{
    AdminBlock, Assignment, AvailabilityRow, BlockType, DepartmentInfo, DoctorActivity,
    DomainError, EligibilityRow, ExistingAssignment, NeedKind, NeedRow, Period, PreferenceKind,
    PreferenceTarget, RoleInfo, Secretary, SiteInfo, StaffName, StaffPreference, StaffSkill,
    UnfilledNeed, Week, WeekData,
};

pub use domain::{AssignmentId, BlockId, DepartmentId, RoleId, SiteId, SkillId, StaffId};

pub use availability::AvailabilityMap;

pub use needs::{Need, NeedIndex, ADMIN_NEED_GAP};

pub use solver::{
    build_model, link_surgery_assignments, solve, AssignmentModel, ModelStats, ObjectiveWeights,
    SearchStats, SolveOutcome, SolveStatus, DEFAULT_TIME_LIMIT_SECS, EVITER_WEIGHT,
    RECEPTION_ROLE_IDS,
};
