pub mod error;
pub mod models;
pub mod store;

pub use error::{Result, StorageError};
pub use models::DoctorViewRow;
pub use store::{connect, PgPlanningStore};
