//! The lapis kernel: a signature of symbols and rewrite rules, reduction to
//! weak-head and strong normal form modulo those rules and modulo
//! associativity-commutativity, and the higher-order AC matching engine that
//! drives rule application.

pub mod matcher;
pub mod reducer;
mod result;
pub mod rule;
mod signature;

pub use matcher::{solve_problem, MillerVar, PreAcProblem, PreMatchingProblem, Reducer};
pub use result::KernelError;
pub use rule::{Pattern, Rule};
pub use signature::{Algebra, Signature};
