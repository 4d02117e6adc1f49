use log::trace;

use ast::*;

use super::problem::MillerVar;
use super::Reducer;

/// Internal failure of the Miller tier: some free de Bruijn index of the
/// right-hand side is not captured by the unknown's arguments. Caught by the
/// search driver; never escapes the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NotUnifiable;

/// The de Bruijn transform of one Miller equation, expressed as a
/// substitution over the right-hand side:
///
/// - an index free above the pattern is unshifted by `depth` and reshifted
///   by `arity`,
/// - an index bound by one of the `depth` pattern binders is rerouted to the
///   solution binder given by `mapping`, or fails if it is not captured.
#[derive(Debug, Clone)]
struct MillerSolver<'a> {
    mvar: &'a MillerVar,
}

impl Substitution for MillerSolver<'_> {
    type Err = NotUnifiable;

    fn get_subst(&self, var: &Variable, k: usize) -> Result<Option<Term>, Self::Err> {
        let MillerVar { arity, depth, mapping, .. } = self.mvar;
        let n = var.idx.0;
        if n < k {
            return Ok(None);
        }
        if n - k >= *depth {
            let idx = Idx(n - depth + arity);
            return Ok(Some(Term::from(Variable { name: var.name.clone(), idx })));
        }
        match mapping[n - k] {
            Some(m) => {
                let idx = Idx(m + k);
                Ok(Some(Term::from(Variable { name: var.name.clone(), idx })))
            }
            None => Err(NotUnifiable),
        }
    }
}

/// Solve the equation `λ^depth. X vars ≡ λ^depth. t` for `X`, returning the
/// solution body `t'` such that `X = λ^arity. t'`.
pub(crate) fn solve(mvar: &MillerVar, t: &Term) -> Result<Term, NotUnifiable> {
    if mvar.arity == 0 {
        // Unapplied unknown: the solution is `t` moved out of the pattern
        // binders, which must not occur in it.
        unshift(mvar.depth, t).map_err(|_| NotUnifiable)
    } else {
        t.subst(0, &MillerSolver { mvar })
    }
}

/// [`solve`], retried once against the strong normal form: reduction may
/// erase an occurrence of an uncaptured variable.
pub(crate) fn force_solve<R: Reducer>(
    sg: &R,
    mvar: &MillerVar,
    te: &Thunk,
) -> Result<Term, NotUnifiable> {
    solve(mvar, te.force()).or_else(|NotUnifiable| {
        trace!("Miller solve failed, retrying against the strong normal form");
        solve(mvar, &sg.snf(te.force().clone()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(fun: &str, args: Vec<Term>) -> Term {
        Term::cst(fun).app(args)
    }

    /// `λx. X x ≡ λx. f x x` solves to `X = λx. f x x`.
    #[test]
    fn applied_unknown() {
        let mvar = MillerVar::new(1, vec![0]);
        let rhs = app("f", vec![Term::var("x", 0), Term::var("x", 0)]);
        let body = solve(&mvar, &rhs).unwrap();
        assert_eq!(body, rhs);
        // Soundness: beta-reducing `(λ. body) x` restores the right-hand side.
        assert_eq!(instantiate(&body, &[Term::var("x", 0)]), rhs);
    }

    /// An unapplied unknown under one binder is solved by unshifting.
    #[test]
    fn unapplied_unknown_unshifts() {
        let mvar = MillerVar::new(1, vec![]);
        let rhs = app("f", vec![Term::var("y", 1)]);
        assert_eq!(solve(&mvar, &rhs), Ok(app("f", vec![Term::var("y", 0)])));
    }

    /// A pattern-bound variable that the unknown does not capture cannot
    /// appear in the right-hand side.
    #[test]
    fn uncaptured_variable_fails() {
        let mvar = MillerVar::new(2, vec![0]);
        let rhs = app("f", vec![Term::var("y", 1)]);
        assert_eq!(solve(&mvar, &rhs), Err(NotUnifiable));
    }

    #[test]
    fn uncaptured_variable_fails_unapplied() {
        let mvar = MillerVar::new(1, vec![]);
        let rhs = Term::var("x", 0);
        assert_eq!(solve(&mvar, &rhs), Err(NotUnifiable));
    }

    /// Free variables above the pattern are rebased below the new binders.
    #[test]
    fn free_variables_are_rebased() {
        // λx y. X y x ≡ λx y. g z x y   with z free above the pattern
        let mvar = MillerVar::new(2, vec![0, 1]);
        let rhs = app("g", vec![Term::var("z", 2), Term::var("x", 1), Term::var("y", 0)]);
        let body = solve(&mvar, &rhs).unwrap();
        assert_eq!(
            body,
            app("g", vec![Term::var("z", 2), Term::var("x", 0), Term::var("y", 1)])
        );
        // Soundness: shifting the solution under the two pattern binders and
        // beta-reducing `(λλ. body') y x` restores the right-hand side.
        let mut shifted = body.clone();
        shifted.shift_in_range(&(2..), 2);
        assert_eq!(instantiate(&shifted, &[Term::var("y", 0), Term::var("x", 1)]), rhs);
    }
}
