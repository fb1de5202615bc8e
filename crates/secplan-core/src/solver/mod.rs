pub mod builder;
pub mod driver;
pub mod linkage;
pub mod weights;

pub use builder::{build_model, AssignmentModel, ModelStats};
pub use driver::{solve, SearchStats, SolveOutcome, SolveStatus, DEFAULT_TIME_LIMIT_SECS};
pub use linkage::link_surgery_assignments;
pub use weights::{ObjectiveWeights, EVITER_WEIGHT, RECEPTION_ROLE_IDS};

#[cfg(test)]
mod solver_tests;

#[cfg(test)]
mod property_tests;
