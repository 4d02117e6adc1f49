//! Structural pre-matching of a subject term against a rule's left-hand
//! side. The walk checks the rigid part (symbols and lambdas, weak-head
//! normalising the subject at each position), collects one equation per
//! pattern-variable occurrence and one AC equation per multiset position,
//! and hands the resulting problem to the matching engine.

use std::convert::Infallible;

use log::trace;

use ast::*;
use printer::Print;

use crate::matcher::{
    force_flatten_ac_term, solve_problem, MillerVar, PreAcProblem, PreMatchingProblem,
};
use crate::reducer::whnf;
use crate::signature::Signature;

use super::{Pattern, Rule};

/// Match `head args` against `rule`, returning the instantiated right-hand
/// side when the rule applies. `args` are the first `rule.arity()` arguments
/// of the head symbol, in application order.
pub(crate) fn match_rule(sg: &Signature, rule: &Rule, args: &[Term]) -> Option<Term> {
    debug_assert_eq!(args.len(), rule.arity());
    let pb = build_problem(sg, rule, args)?;
    let subst = solve_problem(sg, Clone::clone, Clone::clone, &pb)?;
    trace!("lhs of {} matched", rule.print_trace());
    // Unwrap is safe here because we are unwrapping an infallible result
    Some(rule.rhs.subst(0, &RuleInstantiation { subst: &subst }).unwrap())
}

fn build_problem(
    sg: &Signature,
    rule: &Rule,
    args: &[Term],
) -> Option<PreMatchingProblem<Thunk, Vec<Thunk>>> {
    let mut builder = ProblemBuilder {
        eq_problems: vec![Vec::new(); rule.ctx.len()],
        ac_problems: Vec::new(),
    };
    for (pat, arg) in rule.args.iter().zip(args) {
        builder.walk(sg, pat, arg, 0)?;
    }
    Some(PreMatchingProblem {
        arities: rule.arities(),
        eq_problems: builder.eq_problems,
        ac_problems: builder.ac_problems,
    })
}

struct ProblemBuilder {
    eq_problems: Vec<Vec<(MillerVar, Thunk)>>,
    ac_problems: Vec<PreAcProblem<Vec<Thunk>>>,
}

impl ProblemBuilder {
    fn walk(&mut self, sg: &Signature, pat: &Pattern, subject: &Term, depth: usize) -> Option<()> {
        match pat {
            Pattern::Joker => Some(()),
            Pattern::MVar { var, args } => {
                let subject = subject.clone();
                self.eq_problems[*var]
                    .push((MillerVar::new(depth, args.clone()), Thunk::new(move || subject)));
                Some(())
            }
            Pattern::Lambda { body, .. } => match whnf(sg, subject.clone()) {
                Term::Lam(Lam { body: subject_body, .. }) => {
                    self.walk(sg, body, &subject_body, depth + 1)
                }
                _ => None,
            },
            Pattern::Symb { name, args } => match sg.ac_ident(name) {
                Some(ident) if args.len() == 2 => {
                    let mut jokers = 0;
                    let mut vars = Vec::new();
                    self.ac_members(name, pat, depth, &mut jokers, &mut vars)?;
                    let terms = force_flatten_ac_term(sg, &ident, subject.clone())
                        .into_iter()
                        .map(Thunk::from_term)
                        .collect();
                    self.ac_problems.push(PreAcProblem { depth, ident, jokers, vars, rhs: terms });
                    Some(())
                }
                _ => match whnf(sg, subject.clone()) {
                    Term::Const(c) if args.is_empty() && c == *name => Some(()),
                    Term::App(App { fun, args: subject_args })
                        if matches!(&*fun, Term::Const(c) if c == name)
                            && subject_args.len() == args.len() =>
                    {
                        for (pat, subject) in args.iter().zip(&subject_args) {
                            self.walk(sg, pat, subject, depth)?;
                        }
                        Some(())
                    }
                    _ => None,
                },
            },
        }
    }

    /// Collect the members of an AC pattern multiset: a counted joker, a
    /// variable occurrence, or a nested application of the same symbol.
    /// [`Rule::check`] rules out anything else at declaration time.
    fn ac_members(
        &mut self,
        symbol: &Constant,
        pat: &Pattern,
        depth: usize,
        jokers: &mut usize,
        vars: &mut Vec<(usize, MillerVar)>,
    ) -> Option<()> {
        match pat {
            Pattern::Joker => {
                *jokers += 1;
                Some(())
            }
            Pattern::MVar { var, args } => {
                vars.push((*var, MillerVar::new(depth, args.clone())));
                Some(())
            }
            Pattern::Symb { name, args } if name == symbol && args.len() == 2 => {
                self.ac_members(symbol, &args[0], depth, jokers, vars)?;
                self.ac_members(symbol, &args[1], depth, jokers, vars)
            }
            _ => {
                debug_assert!(false, "rigid member in an AC pattern");
                None
            }
        }
    }
}

/// The substitution replacing rule variable `i` (de Bruijn index `i` at the
/// rule root) by its solution, forcing only the solutions the right-hand
/// side actually mentions, and stripping the rule context from any index
/// above the variables.
#[derive(Debug, Clone)]
struct RuleInstantiation<'a> {
    subst: &'a [Thunk],
}

impl Substitution for RuleInstantiation<'_> {
    type Err = Infallible;

    fn get_subst(&self, var: &Variable, k: usize) -> Result<Option<Term>, Self::Err> {
        let n = var.idx.0;
        if n < k {
            return Ok(None);
        }
        if n - k < self.subst.len() {
            Ok(Some(shift_and_clone(self.subst[n - k].force(), k as isize)))
        } else {
            Ok(Some(Term::from(Variable {
                name: var.name.clone(),
                idx: Idx(n - self.subst.len()),
            })))
        }
    }
}
