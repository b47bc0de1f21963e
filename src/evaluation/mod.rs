//! Route verification.
//!
//! [`RouteEvaluator`] checks a closed walk against the augmented graph it was
//! built from and reports each defect as a [`Violation`](crate::models::Violation).

mod evaluator;

pub use evaluator::RouteEvaluator;
