//! Portfolio module - valuation timeline, projections and comparison series.

pub mod comparison;
pub mod projection;
pub mod valuation;

pub use comparison::*;
pub use projection::*;
pub use valuation::*;
