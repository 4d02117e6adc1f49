//! Higher-order AC pattern matching.
//!
//! Given the compiled matching problem of a rewrite rule and a subject term
//! that agrees with the rule's left-hand side on its rigid part, this module
//! computes a substitution for the rule variables, or decides that none
//! exists. It combines three tiers:
//!
//! * a deterministic Miller tier solving one equation `X ȳ ≡ t` at a time
//!   ([`miller`]),
//! * bookkeeping that propagates a speculative assignment through the
//!   remaining AC equations by multiset subtraction ([`ac`]),
//! * a backtracking search that orders equations by difficulty, picks the
//!   most constrained variable, and tries candidate values depth-first
//!   ([`solve`]).
//!
//! Matching is a predicate: the only outcomes are a substitution or `None`.
//! The internal failure values never escape [`solve_problem`].

use ast::*;

mod ac;
mod miller;
mod problem;
mod solve;

pub use problem::{AcProblem, MillerVar, PreAcProblem, PreMatchingProblem, Status};
pub use solve::solve_problem;

/// The reduction capabilities the engine needs from the signature. All
/// operations are total; a symbol without rules is simply inert.
pub trait Reducer {
    /// Weak-head normal form.
    fn whnf(&self, t: Term) -> Term;
    /// Strong normal form.
    fn snf(&self, t: Term) -> Term;
    /// βη-conversion modulo the rewrite rules, with AC-aware equality.
    fn are_convertible(&self, lhs: &Term, rhs: &Term) -> bool;
}

/// The multiset of AC components of `t` under `aci`, exposing occurrences of
/// the AC symbol that only appear after reduction: components not headed by
/// the symbol are strongly normalised before giving up on them. Components
/// convertible to the ACU neutral element are dropped.
pub fn force_flatten_ac_term<R: Reducer>(sg: &R, aci: &AcIdent, t: Term) -> Vec<Term> {
    fn go<R: Reducer>(sg: &R, aci: &AcIdent, t: Term, acc: &mut Vec<Term>) {
        let w = sg.whnf(t);
        if let Some((lhs, rhs)) = ac_pair(&aci.symbol, &w) {
            let (lhs, rhs) = (lhs.clone(), rhs.clone());
            go(sg, aci, lhs, acc);
            go(sg, aci, rhs, acc);
            return;
        }
        let s = sg.snf(w);
        match ac_pair(&aci.symbol, &s) {
            Some((lhs, rhs)) => {
                let (lhs, rhs) = (lhs.clone(), rhs.clone());
                go(sg, aci, lhs, acc);
                go(sg, aci, rhs, acc);
            }
            None => acc.push(s),
        }
    }

    let mut acc = Vec::new();
    go(sg, aci, t, &mut acc);
    if let Some(neutral) = aci.neutral() {
        acc.retain(|component| !sg.are_convertible(component, neutral));
    }
    acc
}
