//! Stage evaluators: one marker-driven evaluator parametrised per stage.

pub mod evaluator;
pub mod reasons;

pub use evaluator::{decide, evaluate_stage};
pub use reasons::ReasonTable;
