//! Reduction to weak-head and strong normal form, modulo the rewrite rules
//! of a [`Signature`] and modulo AC.
//!
//! The weak-head machine decomposes a term into a head and an argument
//! stack and loops: beta redexes are contracted, an ACU symbol absorbs a
//! neutral argument, and a constant with rules fires the first rule whose
//! left-hand side matches (in declaration order). Reduction is total:
//! whether it terminates is the responsibility of the rules.

use log::trace;

use ast::*;
use printer::Print;

use crate::matcher::Reducer;
use crate::rule::match_rule;
use crate::signature::{Algebra, Signature};

mod conv;

pub use conv::are_convertible;

/// Weak-head normal form of `t`.
pub fn whnf(sg: &Signature, t: Term) -> Term {
    let (head, stack) = whnf_state(sg, t);
    rebuild(head, stack)
}

/// Strong normal form of `t`: weak-head normalise, then recurse into every
/// subterm.
pub fn snf(sg: &Signature, t: Term) -> Term {
    match whnf(sg, t) {
        t @ (Term::Kind | Term::Type | Term::Const(_) | Term::Var(_)) => t,
        Term::App(App { fun, args }) => Term::App(App {
            fun,
            args: args.into_iter().map(|arg| snf(sg, arg)).collect(),
        }),
        Term::Lam(Lam { param, ty, body }) => Term::Lam(Lam {
            param,
            ty: ty.map(|ty| Box::new(snf(sg, *ty))),
            body: Box::new(snf(sg, *body)),
        }),
        Term::Pi(Pi { param, dom, cod }) => Term::Pi(Pi {
            param,
            dom: Box::new(snf(sg, *dom)),
            cod: Box::new(snf(sg, *cod)),
        }),
    }
}

impl Reducer for Signature {
    fn whnf(&self, t: Term) -> Term {
        whnf(self, t)
    }

    fn snf(&self, t: Term) -> Term {
        snf(self, t)
    }

    fn are_convertible(&self, lhs: &Term, rhs: &Term) -> bool {
        are_convertible(self, lhs, rhs)
    }
}

/// The argument stack keeps the first pending argument at its end, so beta
/// pops and rules read a reversed suffix.
fn whnf_state(sg: &Signature, t: Term) -> (Term, Vec<Term>) {
    let mut head = t;
    let mut stack: Vec<Term> = Vec::new();
    loop {
        match head {
            Term::App(App { fun, args }) => {
                for arg in args.into_iter().rev() {
                    stack.push(arg);
                }
                head = *fun;
            }
            Term::Lam(Lam { body, .. }) if !stack.is_empty() => {
                let arg = stack.pop().expect("stack is non-empty");
                head = instantiate(&body, &[arg]);
            }
            Term::Const(c) => match reduce_const(sg, &c, &mut stack) {
                Some(next) => head = next,
                None => {
                    head = Term::Const(c);
                    break;
                }
            },
            _ => break,
        }
    }
    (head, stack)
}

fn rebuild(head: Term, mut stack: Vec<Term>) -> Term {
    stack.reverse();
    head.app(stack)
}

/// One reduction step at a constant head: the built-in ACU neutral
/// absorption `f e x ⟶ x`, `f x e ⟶ x`, or the first matching rule.
/// `None` when the constant is inert on this stack.
fn reduce_const(sg: &Signature, c: &Constant, stack: &mut Vec<Term>) -> Option<Term> {
    if let Algebra::Acu(neutral) = sg.algebra(c) {
        if stack.len() >= 2 {
            let first = stack.pop().expect("stack has two entries");
            let second = stack.pop().expect("stack has two entries");
            if are_convertible(sg, &first, neutral) {
                return Some(second);
            }
            if are_convertible(sg, &second, neutral) {
                return Some(first);
            }
            stack.push(second);
            stack.push(first);
        }
    }
    for rule in sg.rules(c) {
        let arity = rule.arity();
        if arity > stack.len() {
            continue;
        }
        let args: Vec<Term> = stack[stack.len() - arity..].iter().rev().cloned().collect();
        if let Some(reduct) = match_rule(sg, rule, &args) {
            trace!("{} ▷ {}", rule.print_trace(), reduct.print_trace());
            stack.truncate(stack.len() - arity);
            return Some(reduct);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::{Pattern, Rule};

    fn app(fun: &str, args: Vec<Term>) -> Term {
        Term::cst(fun).app(args)
    }

    fn rule(ctx: &[&str], head: &str, args: Vec<Pattern>, rhs: Term) -> Rule {
        Rule {
            name: None,
            ctx: ctx.iter().map(|x| VarBind::from_string(x)).collect(),
            head: Constant::from_string(head),
            args,
            rhs,
        }
    }

    #[test]
    fn whnf_beta() {
        let sg = Signature::new();
        let t = Term::lam("x", Term::var("x", 0)).app(vec![Term::cst("a")]);
        assert_eq!(whnf(&sg, t), Term::cst("a"));
    }

    #[test]
    fn whnf_under_applied_lambda_spine() {
        let sg = Signature::new();
        // (λx. λy. x) a b  ▷  a
        let t = Term::lam("x", Term::lam("y", Term::var("x", 1)))
            .app(vec![Term::cst("a"), Term::cst("b")]);
        assert_eq!(whnf(&sg, t), Term::cst("a"));
    }

    #[test]
    fn whnf_delta() {
        let mut sg = Signature::new();
        sg.add_rule(rule(&["X"], "id", vec![Pattern::var(0)], Term::var("X", 0))).unwrap();
        assert_eq!(whnf(&sg, app("id", vec![Term::cst("a")])), Term::cst("a"));
    }

    #[test]
    fn whnf_keeps_extra_arguments() {
        let mut sg = Signature::new();
        sg.add_rule(rule(&["X"], "id", vec![Pattern::var(0)], Term::var("X", 0))).unwrap();
        // id f a  ▷  f a
        let t = app("id", vec![Term::cst("f"), Term::cst("a")]);
        assert_eq!(whnf(&sg, t), app("f", vec![Term::cst("a")]));
    }

    #[test]
    fn whnf_acu_neutral_absorption() {
        let mut sg = Signature::new();
        sg.declare_acu(Constant::from_string("plus"), Term::cst("zero")).unwrap();
        let t = app("plus", vec![Term::cst("zero"), Term::cst("a")]);
        assert_eq!(whnf(&sg, t), Term::cst("a"));
        let t = app("plus", vec![Term::cst("a"), Term::cst("zero")]);
        assert_eq!(whnf(&sg, t), Term::cst("a"));
    }

    #[test]
    fn whnf_is_stuck_on_mismatch() {
        let mut sg = Signature::new();
        sg.add_rule(rule(
            &["X"],
            "f",
            vec![Pattern::symb("s", vec![Pattern::var(0)])],
            Term::var("X", 0),
        ))
        .unwrap();
        let t = app("f", vec![Term::cst("z")]);
        assert_eq!(whnf(&sg, t.clone()), t);
    }

    #[test]
    fn snf_normalises_arguments() {
        let sg = Signature::new();
        let redex = Term::lam("x", Term::var("x", 0)).app(vec![Term::cst("a")]);
        let t = app("f", vec![redex]);
        assert_eq!(snf(&sg, t), app("f", vec![Term::cst("a")]));
    }

    #[test]
    fn snf_normalises_under_binders() {
        let sg = Signature::new();
        let redex = Term::lam("y", Term::var("y", 0)).app(vec![Term::var("x", 0)]);
        let t = Term::lam("x", redex);
        assert_eq!(snf(&sg, t), Term::lam("x", Term::var("x", 0)));
    }

    #[test]
    fn rules_fire_in_declaration_order() {
        let mut sg = Signature::new();
        sg.add_rule(rule(&["X"], "pick", vec![Pattern::var(0)], Term::cst("first"))).unwrap();
        sg.add_rule(rule(&["X"], "pick", vec![Pattern::var(0)], Term::cst("second"))).unwrap();
        assert_eq!(whnf(&sg, app("pick", vec![Term::cst("a")])), Term::cst("first"));
    }

    #[test]
    fn joker_argument_matches_anything() {
        let mut sg = Signature::new();
        sg.add_rule(rule(
            &["X"],
            "fst",
            vec![Pattern::var(0), Pattern::Joker],
            Term::var("X", 0),
        ))
        .unwrap();
        let t = app("fst", vec![Term::cst("a"), app("g", vec![Term::cst("b")])]);
        assert_eq!(whnf(&sg, t), Term::cst("a"));
    }

    #[test]
    fn nonlinear_rule_checks_convertibility() {
        let mut sg = Signature::new();
        sg.add_rule(rule(
            &["X"],
            "eq",
            vec![Pattern::var(0), Pattern::var(0)],
            Term::cst("tt"),
        ))
        .unwrap();
        assert_eq!(whnf(&sg, app("eq", vec![Term::cst("a"), Term::cst("a")])), Term::cst("tt"));
        let stuck = app("eq", vec![Term::cst("a"), Term::cst("b")]);
        assert_eq!(whnf(&sg, stuck.clone()), stuck);
    }

    /// `peel (λx. F x) ⟶ F` extracts the function under the binder.
    #[test]
    fn miller_rule_extracts_a_function() {
        let mut sg = Signature::new();
        sg.add_rule(rule(
            &["F"],
            "peel",
            vec![Pattern::lambda("x", Pattern::MVar { var: 0, args: vec![0] })],
            Term::var("F", 0),
        ))
        .unwrap();
        let body = app("f", vec![Term::var("x", 0), Term::var("x", 0)]);
        let t = app("peel", vec![Term::lam("x", body.clone())]);
        assert_eq!(whnf(&sg, t), body.add_lambdas(1));
    }

    /// `drop (λx. F) ⟶ F` only applies when the body ignores its binder.
    #[test]
    fn miller_rule_rejects_captured_variables() {
        let mut sg = Signature::new();
        sg.add_rule(rule(
            &["F"],
            "drop",
            vec![Pattern::lambda("x", Pattern::var(0))],
            Term::var("F", 0),
        ))
        .unwrap();
        let good = app("drop", vec![Term::lam("x", Term::cst("a"))]);
        assert_eq!(whnf(&sg, good), Term::cst("a"));
        let stuck = app("drop", vec![Term::lam("x", Term::var("x", 0))]);
        assert_eq!(whnf(&sg, stuck.clone()), stuck);
    }

    /// `norm (X + X) ⟶ dbl X` needs the nonlinear AC split.
    #[test]
    fn ac_rule_with_nonlinear_variable() {
        let mut sg = Signature::new();
        sg.declare_ac(Constant::from_string("plus")).unwrap();
        sg.add_rule(rule(
            &["X"],
            "norm",
            vec![Pattern::symb("plus", vec![Pattern::var(0), Pattern::var(0)])],
            app("dbl", vec![Term::var("X", 0)]),
        ))
        .unwrap();
        let t = app("norm", vec![app("plus", vec![Term::cst("a"), Term::cst("a")])]);
        assert_eq!(whnf(&sg, t), app("dbl", vec![Term::cst("a")]));
    }

    /// `pick (X + _) ⟶ X` projects one member of an AC multiset.
    #[test]
    fn ac_rule_with_joker() {
        let mut sg = Signature::new();
        sg.declare_ac(Constant::from_string("plus")).unwrap();
        sg.add_rule(rule(
            &["X"],
            "pick",
            vec![Pattern::symb("plus", vec![Pattern::var(0), Pattern::Joker])],
            Term::var("X", 0),
        ))
        .unwrap();
        let sum = app(
            "plus",
            vec![app("plus", vec![Term::cst("a"), Term::cst("b")]), Term::cst("c")],
        );
        assert_eq!(whnf(&sg, app("pick", vec![sum])), Term::cst("a"));
    }

    /// `sel (X ⊕ Y) ⟶ pair X Y` also matches a subject that is not
    /// `⊕`-headed: the leftover variable takes the neutral element.
    #[test]
    fn acu_rule_on_a_bare_subject() {
        let mut sg = Signature::new();
        sg.declare_acu(Constant::from_string("oplus"), Term::cst("zero")).unwrap();
        sg.add_rule(rule(
            &["X", "Y"],
            "sel",
            vec![Pattern::symb("oplus", vec![Pattern::var(0), Pattern::var(1)])],
            app("pair", vec![Term::var("X", 0), Term::var("Y", 1)]),
        ))
        .unwrap();
        let t = app("sel", vec![Term::cst("a")]);
        assert_eq!(
            whnf(&sg, t),
            app("pair", vec![Term::cst("a"), Term::cst("zero")])
        );
    }

    /// An AC equation under a binder: `collect (λx. F x + _) ⟶ λx. F x`.
    #[test]
    fn ac_rule_under_a_binder() {
        let mut sg = Signature::new();
        sg.declare_ac(Constant::from_string("plus")).unwrap();
        sg.add_rule(rule(
            &["F"],
            "collect",
            vec![Pattern::lambda(
                "x",
                Pattern::symb(
                    "plus",
                    vec![Pattern::MVar { var: 0, args: vec![0] }, Pattern::Joker],
                ),
            )],
            Term::lam("x", Term::var("F", 1).app(vec![Term::var("x", 0)])),
        ))
        .unwrap();
        let subject = Term::lam(
            "x",
            app("plus", vec![app("f", vec![Term::var("x", 0)]), Term::cst("c")]),
        );
        let reduct = whnf(&sg, app("collect", vec![subject]));
        let expected = Term::lam("x", app("f", vec![Term::var("x", 0)]));
        assert!(are_convertible(&sg, &reduct, &expected));
    }
}
