use std::convert::Infallible;
use std::fmt::Debug;

use thiserror::Error;

use crate::*;

// Substitution
//
//

/// Trait for entities which can be used as a substitution.
///
/// A substitution is queried once for every variable occurrence of the term
/// it is applied to. The query receives the occurrence itself together with
/// the number `k` of binders crossed between the root of the substitution
/// and the occurrence. Indices below `k` are bound locally and are never
/// queried.
///
/// Returning `Ok(None)` leaves the occurrence unchanged; returning a
/// replacement term must yield a term valid at depth `k`. A substitution may
/// fail, which aborts the whole traversal.
pub trait Substitution: Clone + Debug {
    type Err;

    fn get_subst(&self, var: &Variable, k: usize) -> Result<Option<Term>, Self::Err>;
}

/// A trait for all entities to which we can apply a substitution.
pub trait Substitutable: Sized {
    type Target;

    fn subst<S: Substitution>(&self, k: usize, by: &S) -> Result<Self::Target, S::Err>;
}

impl<T: Substitutable> Substitutable for Option<T> {
    type Target = Option<T::Target>;
    fn subst<S: Substitution>(&self, k: usize, by: &S) -> Result<Self::Target, S::Err> {
        self.as_ref().map(|x| x.subst(k, by)).transpose()
    }
}

impl<T: Substitutable> Substitutable for Vec<T> {
    type Target = Vec<T::Target>;
    fn subst<S: Substitution>(&self, k: usize, by: &S) -> Result<Self::Target, S::Err> {
        self.iter().map(|x| x.subst(k, by)).collect::<Result<Vec<_>, _>>()
    }
}

impl<T: Substitutable> Substitutable for Box<T> {
    type Target = Box<T::Target>;
    fn subst<S: Substitution>(&self, k: usize, by: &S) -> Result<Self::Target, S::Err> {
        Ok(Box::new((**self).subst(k, by)?))
    }
}

// Unshift
//
//

/// A free variable would escape through a removed binder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("variable {name} would escape its scope")]
pub struct UnshiftError {
    pub name: String,
}

#[derive(Debug, Clone)]
struct Unshift {
    depth: usize,
}

impl Substitution for Unshift {
    type Err = UnshiftError;

    fn get_subst(&self, var: &Variable, k: usize) -> Result<Option<Term>, Self::Err> {
        let n = var.idx.0;
        if n < k {
            Ok(None)
        } else if n - k < self.depth {
            Err(UnshiftError { name: var.name.id.clone() })
        } else {
            Ok(Some(Term::from(Variable { name: var.name.clone(), idx: Idx(n - self.depth) })))
        }
    }
}

/// Remove `depth` binders from above `t`, failing if a variable bound by one
/// of them occurs free in `t`.
pub fn unshift(depth: usize, t: &Term) -> Result<Term, UnshiftError> {
    if depth == 0 { Ok(t.clone()) } else { t.subst(0, &Unshift { depth }) }
}

// Instantiate
//
//

/// Instantiation of the `args.len()` innermost binders above a term, i.e.
/// simultaneous beta reduction of `(λ^m. t) a₁ … aₘ`. The argument list is
/// given outermost-first, so index `0` refers to the *last* argument.
#[derive(Debug, Clone)]
pub struct Instantiate<'a> {
    pub args: &'a [Term],
}

impl Substitution for Instantiate<'_> {
    type Err = Infallible;

    fn get_subst(&self, var: &Variable, k: usize) -> Result<Option<Term>, Self::Err> {
        let n = var.idx.0;
        if n < k {
            Ok(None)
        } else if n - k < self.args.len() {
            let arg = &self.args[self.args.len() - 1 - (n - k)];
            Ok(Some(shift_and_clone(arg, k as isize)))
        } else {
            Ok(Some(Term::from(Variable {
                name: var.name.clone(),
                idx: Idx(n - self.args.len()),
            })))
        }
    }
}

/// Beta-reduce `(λ^m. body) args`, where `body` is the term under the `m`
/// binders and `args` is given outermost-first with `m = args.len()`.
pub fn instantiate(body: &Term, args: &[Term]) -> Term {
    if args.is_empty() {
        return body.clone();
    }
    // Unwrap is safe here because we are unwrapping an infallible result
    body.subst(0, &Instantiate { args }).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(name: &str, idx: usize) -> Term {
        Term::from(Variable { name: VarBound::from_string(name), idx: Idx(idx) })
    }

    #[test]
    fn unshift_closed() {
        let t = var("x", 3);
        assert_eq!(unshift(2, &t), Ok(var("x", 1)));
    }

    #[test]
    fn unshift_escaping() {
        let t = Term::lam("y", var("x", 1));
        assert!(unshift(1, &t).is_err());
    }

    #[test]
    fn unshift_bound_is_kept() {
        let t = Term::lam("y", var("y", 0));
        assert_eq!(unshift(1, &t), Ok(Term::lam("y", var("y", 0))));
    }

    #[test]
    fn instantiate_single() {
        // (λy. y x) a  =>  a x   with x free
        let body = Term::var("y", 0).app(vec![var("x", 1)]);
        let arg = Term::cst("a");
        assert_eq!(instantiate(&body, &[arg]), Term::cst("a").app(vec![var("x", 0)]));
    }

    #[test]
    fn instantiate_under_binder() {
        // (λy. λz. y) a  =>  λz. a
        let body = Term::lam("z", var("y", 1));
        let arg = Term::cst("a");
        assert_eq!(instantiate(&body, &[arg]), Term::lam("z", Term::cst("a")));
    }

    #[test]
    fn instantiate_pair_order() {
        // (λx. λy. x y) a b  =>  a b
        let body = Term::var("x", 1).app(vec![var("y", 0)]);
        let args = [Term::cst("a"), Term::cst("b")];
        assert_eq!(instantiate(&body, &args), Term::cst("a").app(vec![Term::cst("b")]));
    }
}
