pub mod errors;
pub mod models;
pub mod week;

pub use errors::*;
pub use models::*;
pub use week::*;
