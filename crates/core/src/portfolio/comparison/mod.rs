mod comparison_model;
mod comparison_service;

#[cfg(test)]
mod comparison_service_tests;

pub use comparison_model::{parse_rate, Comparison, ComparisonAction, ComparisonKind};
pub use comparison_service::{ComparisonService, ComparisonServiceTrait};
