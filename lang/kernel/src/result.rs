use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum KernelError {
    #[error("Symbol {name} is already declared")]
    #[diagnostic(code("K-001"))]
    AlreadyDeclared { name: String },
    #[error("Pattern variable {var} must be applied to distinct bound variables")]
    #[diagnostic(code("K-002"))]
    NonMillerPattern { var: String },
    #[error("Pattern variable {var} is applied to {actual} arguments here, but to {expected} elsewhere")]
    #[diagnostic(code("K-003"))]
    ArityMismatch { var: String, expected: usize, actual: usize },
    #[error("A member of a {symbol} pattern must be a pattern variable or a joker")]
    #[diagnostic(code("K-004"), help("Match the rigid part in a separate rule argument"))]
    AcPatternMember { symbol: String },
    #[error("Rule variable {var} does not occur in the left-hand side")]
    #[diagnostic(code("K-005"))]
    UnusedRuleVariable { var: String },
    #[error("Pattern refers to rule variable #{index}, but the rule only binds {bound}")]
    #[diagnostic(code("K-006"))]
    UnboundRuleVariable { index: usize, bound: usize },
}
