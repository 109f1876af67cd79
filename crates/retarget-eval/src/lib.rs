//! In-memory evaluation of typed predicates
//!
//! [`Evaluator`] runs a [`Predicate`](retarget_ast::Predicate) against
//! [`Value`]s. Records are matched by field name, which makes the evaluator
//! a convenient oracle for checking that a converted predicate selects the
//! same items as the original.
//!
//! ```ignore
//! let evaluator = Evaluator::new();
//! let matched = evaluator.filter(&predicate, &items)?;
//! ```

pub mod context;
pub mod engine;
pub mod error;
pub mod operators;
pub mod registry;
pub mod strings;
pub mod value;

pub use context::EvaluationContext;
pub use engine::Evaluator;
pub use error::{EvalError, EvalResult};
pub use registry::{Invocation, MethodFn, MethodRegistry};
pub use value::*;
