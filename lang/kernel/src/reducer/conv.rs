//! βη-conversion modulo the rewrite rules, with AC-aware equality: terms
//! built with an AC symbol are compared as multisets of recursively
//! convertible components.

use ast::*;

use crate::matcher::force_flatten_ac_term;
use crate::signature::Signature;

use super::whnf;

pub fn are_convertible(sg: &Signature, lhs: &Term, rhs: &Term) -> bool {
    conv(sg, lhs.clone(), rhs.clone())
}

fn conv(sg: &Signature, lhs: Term, rhs: Term) -> bool {
    // Syntactic equality is alpha-respecting and needs no reduction.
    if lhs == rhs {
        return true;
    }
    let lhs = whnf(sg, lhs);
    let rhs = whnf(sg, rhs);
    if lhs == rhs {
        return true;
    }
    if let Some(aci) = ac_head(sg, &lhs).or_else(|| ac_head(sg, &rhs)) {
        let lhs = force_flatten_ac_term(sg, &aci, lhs);
        let rhs = force_flatten_ac_term(sg, &aci, rhs);
        return conv_multiset(sg, lhs, rhs);
    }
    match (lhs, rhs) {
        (Term::Kind, Term::Kind) | (Term::Type, Term::Type) => true,
        (Term::Const(c1), Term::Const(c2)) => c1 == c2,
        (Term::Var(v1), Term::Var(v2)) => v1.idx == v2.idx,
        (Term::App(a1), Term::App(a2)) => {
            a1.args.len() == a2.args.len()
                && conv(sg, *a1.fun, *a2.fun)
                && a1.args.into_iter().zip(a2.args).all(|(l, r)| conv(sg, l, r))
        }
        (Term::Lam(l1), Term::Lam(l2)) => conv(sg, *l1.body, *l2.body),
        (Term::Pi(p1), Term::Pi(p2)) => {
            conv(sg, *p1.dom, *p2.dom) && conv(sg, *p1.cod, *p2.cod)
        }
        // Eta: a lambda is convertible to a term that, once shifted below
        // the binder and applied to it, is convertible to the body.
        (Term::Lam(lam), other) | (other, Term::Lam(lam)) => {
            let expanded = shift_and_clone(&other, 1).app(vec![Term::var("x", 0)]);
            conv(sg, *lam.body, expanded)
        }
        (_, _) => false,
    }
}

/// The AC identifier of `t`'s head, when `t` is a binary application of a
/// symbol declared AC or ACU.
fn ac_head(sg: &Signature, t: &Term) -> Option<AcIdent> {
    let c = t.const_head()?;
    let aci = sg.ac_ident(c)?;
    ac_pair(&aci.symbol, t)?;
    Some(aci)
}

/// Multiset equality up to conversion: every left component erases exactly
/// one convertible right component.
fn conv_multiset(sg: &Signature, lhs: Vec<Term>, mut rhs: Vec<Term>) -> bool {
    if lhs.len() != rhs.len() {
        return false;
    }
    for l in lhs {
        match rhs.iter().position(|r| conv(sg, l.clone(), r.clone())) {
            Some(pos) => {
                rhs.remove(pos);
            }
            None => return false,
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(fun: &str, args: Vec<Term>) -> Term {
        Term::cst(fun).app(args)
    }

    fn plus(lhs: Term, rhs: Term) -> Term {
        app("plus", vec![lhs, rhs])
    }

    fn ac_signature() -> Signature {
        let mut sg = Signature::new();
        sg.declare_ac(Constant::from_string("plus")).unwrap();
        sg
    }

    #[test]
    fn beta_conversion() {
        let sg = Signature::new();
        let lhs = Term::lam("x", Term::var("x", 0)).app(vec![Term::cst("a")]);
        assert!(are_convertible(&sg, &lhs, &Term::cst("a")));
    }

    #[test]
    fn ac_permutation() {
        let sg = ac_signature();
        let lhs = plus(Term::cst("a"), plus(Term::cst("b"), Term::cst("c")));
        let rhs = plus(plus(Term::cst("c"), Term::cst("b")), Term::cst("a"));
        assert!(are_convertible(&sg, &lhs, &rhs));
    }

    #[test]
    fn ac_multiplicities_matter() {
        let sg = ac_signature();
        let lhs = plus(Term::cst("a"), Term::cst("a"));
        let rhs = plus(Term::cst("a"), Term::cst("b"));
        assert!(!are_convertible(&sg, &lhs, &rhs));
    }

    #[test]
    fn acu_neutral_is_erased() {
        let mut sg = Signature::new();
        sg.declare_acu(Constant::from_string("plus"), Term::cst("zero")).unwrap();
        let lhs = plus(Term::cst("a"), Term::cst("zero"));
        assert!(are_convertible(&sg, &lhs, &Term::cst("a")));
    }

    #[test]
    fn eta_conversion() {
        let sg = Signature::new();
        let lhs = Term::lam("x", app("f", vec![Term::var("x", 0)]));
        assert!(are_convertible(&sg, &lhs, &Term::cst("f")));
    }

    #[test]
    fn distinct_heads_are_not_convertible() {
        let sg = Signature::new();
        assert!(!are_convertible(&sg, &Term::cst("a"), &Term::cst("b")));
    }
}
