pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "finance")]
pub mod finance;

#[cfg(feature = "dealer")]
pub mod dealer;

pub use error::HarborError;
pub use types::*;

/// Standard result type for all HarborList calculations
pub type HarborResult<T> = Result<T, HarborError>;
