pub mod error;
pub mod parsing;
pub mod time_value;
pub mod types;

pub mod property;

pub mod break_even;
pub mod metrics;
pub mod portfolio;
pub mod projection;
pub mod scenario;

pub mod evaluation;
pub mod format;
pub mod report;
pub mod settings;
pub mod validation;

pub use error::ImmoCalcError;
pub use types::*;

/// Standard result type for the fallible (text-interpreting) operations
pub type ImmoCalcResult<T> = Result<T, ImmoCalcError>;
