use derivative::Derivative;

use crate::ident::Constant;
use crate::term::{App, Term};

/// Whether an associative-commutative symbol has a neutral element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AcFlavour {
    Ac,
    Acu(Box<Term>),
}

/// An associative-commutative symbol together with its flavour.
///
/// Equality and hashing are on the symbol name only: a symbol is declared
/// with exactly one flavour, so the flavour carries no extra identity.
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct AcIdent {
    pub symbol: Constant,
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub flavour: AcFlavour,
}

impl AcIdent {
    pub fn ac(symbol: Constant) -> Self {
        AcIdent { symbol, flavour: AcFlavour::Ac }
    }

    pub fn acu(symbol: Constant, neutral: Term) -> Self {
        AcIdent { symbol, flavour: AcFlavour::Acu(Box::new(neutral)) }
    }

    pub fn neutral(&self) -> Option<&Term> {
        match &self.flavour {
            AcFlavour::Ac => None,
            AcFlavour::Acu(neutral) => Some(neutral),
        }
    }
}

/// View `t` as a binary application of the AC symbol `symbol`.
pub fn ac_pair<'a>(symbol: &Constant, t: &'a Term) -> Option<(&'a Term, &'a Term)> {
    match t {
        Term::App(App { fun, args }) if args.len() == 2 => match &**fun {
            Term::Const(c) if c == symbol => Some((&args[0], &args[1])),
            _ => None,
        },
        _ => None,
    }
}

/// The purely syntactic multiset view of nested applications of `symbol`:
/// `f (f a b) c` becomes `[a, b, c]`. A term not headed by `symbol` is its
/// own singleton. Duplicates are significant, order follows the syntax.
pub fn flatten(symbol: &Constant, t: &Term) -> Vec<Term> {
    let mut acc = Vec::new();
    flatten_into(symbol, t, &mut acc);
    acc
}

fn flatten_into(symbol: &Constant, t: &Term, acc: &mut Vec<Term>) {
    match ac_pair(symbol, t) {
        Some((lhs, rhs)) => {
            flatten_into(symbol, lhs, acc);
            flatten_into(symbol, rhs, acc);
        }
        None => acc.push(t.clone()),
    }
}

/// Rebuild a term from an AC multiset by a left fold. The empty multiset
/// denotes the neutral element and is a programming error for a plain AC
/// symbol.
pub fn unflatten(aci: &AcIdent, ts: Vec<Term>) -> Term {
    let mut iter = ts.into_iter();
    let Some(first) = iter.next() else {
        match aci.neutral() {
            Some(neutral) => return neutral.clone(),
            None => unreachable!("empty multiset for AC symbol {}", aci.symbol),
        }
    };
    iter.fold(first, |acc, t| Term::Const(aci.symbol.clone()).app(vec![acc, t]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plus(lhs: Term, rhs: Term) -> Term {
        Term::cst("plus").app(vec![lhs, rhs])
    }

    #[test]
    fn flatten_nested() {
        let sym = Constant::from_string("plus");
        let t = plus(plus(Term::cst("a"), Term::cst("b")), Term::cst("c"));
        assert_eq!(flatten(&sym, &t), vec![Term::cst("a"), Term::cst("b"), Term::cst("c")]);
    }

    #[test]
    fn flatten_foreign_head() {
        let sym = Constant::from_string("plus");
        let t = Term::cst("f").app(vec![Term::cst("a")]);
        assert_eq!(flatten(&sym, &t), vec![t]);
    }

    #[test]
    fn unflatten_folds_left() {
        let aci = AcIdent::ac(Constant::from_string("plus"));
        let t = unflatten(&aci, vec![Term::cst("a"), Term::cst("b"), Term::cst("c")]);
        assert_eq!(t, plus(plus(Term::cst("a"), Term::cst("b")), Term::cst("c")));
    }

    #[test]
    fn unflatten_empty_acu() {
        let aci = AcIdent::acu(Constant::from_string("plus"), Term::cst("zero"));
        assert_eq!(unflatten(&aci, vec![]), Term::cst("zero"));
    }

    #[test]
    fn ac_idents_compare_by_symbol() {
        let plain = AcIdent::ac(Constant::from_string("plus"));
        let with_neutral = AcIdent::acu(Constant::from_string("plus"), Term::cst("zero"));
        assert_eq!(plain, with_neutral);
    }
}
