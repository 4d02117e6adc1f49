use std::rc::Rc;

use ast::*;

// Miller variables
//
//

/// Descriptor of one occurrence of a higher-order pattern variable.
///
/// The unknown is applied to the bound variables listed in `vars` (de Bruijn
/// indices relative to the occurrence), under `depth` binders between the
/// occurrence and the rule root. `arity` is `vars.len()`.
///
/// `mapping` inverts `vars`: `mapping[n]` is the index the local variable
/// `n` takes inside the solution body, or `None` if the occurrence does not
/// capture `n`. Since the `j`-th applied variable is consumed by the
/// outermost of the `arity` solution binders, `mapping[vars[j]] = arity - 1 - j`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MillerVar {
    pub arity: usize,
    pub depth: usize,
    pub mapping: Vec<Option<usize>>,
    pub vars: Vec<usize>,
}

impl MillerVar {
    /// Build the descriptor for an occurrence under `depth` binders applied
    /// to the bound variables `vars`, which must be distinct and below
    /// `depth`.
    pub fn new(depth: usize, vars: Vec<usize>) -> Self {
        let arity = vars.len();
        let mut mapping = vec![None; depth];
        for (j, n) in vars.iter().enumerate() {
            debug_assert!(mapping[*n].is_none(), "duplicate Miller argument");
            mapping[*n] = Some(arity - 1 - j);
        }
        MillerVar { arity, depth, mapping, vars }
    }
}

// Problems
//
//

/// One AC equation of a pre-matching problem, with the right-hand multiset
/// still in the rule compiler's representation.
#[derive(Debug, Clone)]
pub struct PreAcProblem<AcRhs> {
    /// Number of binders above this equation's position.
    pub depth: usize,
    pub ident: AcIdent,
    /// Anonymous wildcards among the left-hand members.
    pub jokers: usize,
    /// The pattern variables among the left-hand members, with one entry per
    /// occurrence.
    pub vars: Vec<(usize, MillerVar)>,
    pub rhs: AcRhs,
}

/// The compiled matching problem of one rule, as handed to
/// [`solve_problem`](crate::matcher::solve_problem).
///
/// Variables are identified by their dense index `0..arities.len()`.
/// `eq_problems` has one slot per variable: an empty slot leaves the
/// variable to the AC phase, a non-empty slot lists the equations it must
/// satisfy simultaneously.
#[derive(Debug, Clone)]
pub struct PreMatchingProblem<EqRhs, AcRhs> {
    pub arities: Vec<usize>,
    pub eq_problems: Vec<Vec<(MillerVar, EqRhs)>>,
    pub ac_problems: Vec<PreAcProblem<AcRhs>>,
}

// Search state
//
//

/// What is known about a variable during the AC search.
#[derive(Debug, Clone)]
pub enum Status {
    Unsolved,
    /// The variable is fixed; the thunk holds the solution body (the
    /// lambda-wrapping happens when the substitution is materialised).
    Solved(Thunk),
    /// The variable is known to be an AC combination under the given symbol
    /// of at least the collected terms; more may still be appended while an
    /// AC equation involving it remains open.
    Partly(AcIdent, Vec<Term>),
}

/// One AC equation during the search: the instantiated form of
/// [`PreAcProblem`] with a concrete right-hand multiset.
#[derive(Debug, Clone)]
pub struct AcProblem {
    pub depth: usize,
    pub ident: AcIdent,
    pub jokers: usize,
    pub vars: Vec<(usize, MillerVar)>,
    pub terms: Vec<Thunk>,
}

impl AcProblem {
    pub(crate) fn mentions(&self, i: usize) -> bool {
        self.vars.iter().any(|(j, _)| *j == i)
    }
}

/// The mutable state of one search branch. Branching clones the whole
/// record: `status` is copy-on-write across branches and `ac_problems` is
/// rebuilt on every transition, so no branch ever observes another branch's
/// speculation.
#[derive(Debug, Clone)]
pub(crate) struct MatchingProblem {
    pub arities: Rc<Vec<usize>>,
    pub status: Vec<Status>,
    pub ac_problems: Vec<AcProblem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapping_inverts_the_argument_list() {
        let mvar = MillerVar::new(3, vec![2, 0]);
        assert_eq!(mvar.arity, 2);
        // local 2 is the first argument, bound by the outermost binder
        assert_eq!(mvar.mapping, vec![Some(0), None, Some(1)]);
    }
}
