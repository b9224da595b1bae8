pub mod error;
pub mod response;
pub mod search;

pub use error::{AppError, AppResult};
