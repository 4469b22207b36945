mod projection_calculator;

pub use projection_calculator::{project, savings_curve, validate_rate, ProjectionPoint};
