use std::cmp::Reverse;
use std::rc::Rc;

use log::trace;

use ast::*;

use super::ac::{add_partly, close_partly, expected_term, set_partly, set_unsolved, update_ac_problems};
use super::miller::force_solve;
use super::problem::{AcProblem, MatchingProblem, MillerVar, PreMatchingProblem, Status};
use super::Reducer;

/// Score of a variable partly solved under a different AC symbol: it cannot
/// contribute to the current equation, so it is all but never picked. The
/// sentinel deliberately stays below `usize::MAX` so such a variable is
/// still preferred over nothing at all.
const LOCKED: usize = usize::MAX - 1;

/// Pick the most constrained variable of an AC equation: unsolved variables
/// first, then variables already partly solved under the equation's own
/// symbol with the smallest bag. Ties go to the first occurrence in the
/// list.
pub(crate) fn fetch_var(pb: &MatchingProblem, problem: &AcProblem) -> (usize, MillerVar) {
    let mut best: Option<(usize, &(usize, MillerVar))> = None;
    for entry in &problem.vars {
        let score = match &pb.status[entry.0] {
            Status::Unsolved => 0,
            Status::Partly(aci, bag) if *aci == problem.ident => 1 + bag.len(),
            Status::Partly(..) => LOCKED,
            Status::Solved(_) => unreachable!("solved variable in an AC problem"),
        };
        if best.as_ref().is_none_or(|(least, _)| score < *least) {
            best = Some((score, entry));
        }
    }
    let (_, (i, mvar)) = best.expect("fetch_var on an equation without variables");
    (*i, mvar.clone())
}

/// Order the AC equations easiest-to-refute first: fewest variables, then
/// largest right-hand multiset, and jokers last since they only make an
/// equation easier.
pub(crate) fn ac_rearrange(problems: &mut [AcProblem]) {
    problems.sort_by_key(|p| (p.vars.len(), Reverse(p.terms.len()), p.jokers > 0));
}

/// Bulk propagation of the variables already solved by the equational phase
/// into the freshly converted AC equations.
pub(crate) fn init_ac_problems<R: Reducer>(
    sg: &R,
    pb: MatchingProblem,
) -> Option<MatchingProblem> {
    let MatchingProblem { arities, status, mut ac_problems } = pb;
    for (i, status) in status.iter().enumerate() {
        if let Status::Solved(sol) = status {
            ac_problems = update_ac_problems(sg, &ac_problems, i, sol)?;
        }
    }
    Some(MatchingProblem { arities, status, ac_problems })
}

/// Wrap every solution body under its variable's binders, lazily.
fn materialize(pb: &MatchingProblem) -> Vec<Thunk> {
    pb.status
        .iter()
        .enumerate()
        .map(|(i, status)| {
            let Status::Solved(sol) = status else {
                unreachable!("variable #{i} left unsolved after matching")
            };
            let arity = pb.arities[i];
            let sol = sol.clone();
            Thunk::new(move || sol.force().clone().add_lambdas(arity))
        })
        .collect()
}

/// The depth-first search over the remaining AC equations.
///
/// The head equation's selected variable is tried against each right-hand
/// term in order; every attempt owns its own copy of the search state, so a
/// dead end simply falls through to the next candidate. When no single term
/// fits, the variable escalates: an unsolved variable becomes partly solved
/// (it must be an AC combination), a partly solved one is closed and
/// committed.
pub(crate) fn solve_ac_problem<R: Reducer>(sg: &R, pb: MatchingProblem) -> Option<Vec<Thunk>> {
    if pb.ac_problems.is_empty() {
        return Some(materialize(&pb));
    }
    let problem = pb.ac_problems[0].clone();
    if problem.vars.is_empty() {
        if problem.terms.is_empty() || problem.jokers > 0 {
            let mut rest = pb;
            rest.ac_problems.remove(0);
            return solve_ac_problem(sg, rest);
        }
        return None;
    }
    let (i, mvar) = fetch_var(&pb, &problem);
    match pb.status[i].clone() {
        Status::Partly(..) => {
            for te in &problem.terms {
                let Ok(sol) = force_solve(sg, &mvar, te) else { continue };
                trace!("trying #{i} += one term of {}", problem.ident.symbol);
                let Some(next) = add_partly(sg, &pb, i, sol) else { continue };
                if let Some(subst) = solve_ac_problem(sg, next) {
                    return Some(subst);
                }
            }
            // Every extension of the bag fails from here on: commit it.
            let next = close_partly(sg, &pb, i)?;
            solve_ac_problem(sg, next)
        }
        Status::Unsolved => {
            for te in &problem.terms {
                let Ok(sol) = force_solve(sg, &mvar, te) else { continue };
                trace!("trying #{i} := one term of {}", problem.ident.symbol);
                let Some(next) = set_unsolved(sg, &pb, i, Thunk::from_term(sol)) else {
                    continue;
                };
                if let Some(subst) = solve_ac_problem(sg, next) {
                    return Some(subst);
                }
            }
            // No single right-hand term works: the variable must itself be
            // an AC combination.
            solve_ac_problem(sg, set_partly(&pb, i, problem.ident.clone()))
        }
        Status::Solved(_) => unreachable!("solved variable in an AC problem"),
    }
}

/// Solve the equations of one variable's slot: the first equation fixes the
/// solution body, every further one must agree with it up to conversion.
fn solve_eq_slot<R: Reducer, EqRhs>(
    sg: &R,
    convert: &impl Fn(&EqRhs) -> Thunk,
    eqs: &[(MillerVar, EqRhs)],
) -> Option<Term> {
    let Some(((first, rhs), rest)) = eqs.split_first() else {
        debug_assert!(false, "variable without any equation in an equational problem");
        return None;
    };
    let solu = force_solve(sg, first, &convert(rhs)).ok()?;
    for (mvar, rhs) in rest {
        let expected = expected_term(mvar.depth, mvar, &solu);
        if !sg.are_convertible(&expected, convert(rhs).force()) {
            return None;
        }
    }
    Some(solu)
}

/// Compute a substitution for the rule variables of `pb`, or `None` when no
/// substitution matches.
///
/// The equational slots are solved first, deterministically. A purely
/// equational problem is finished at that point; otherwise the solved slots
/// seed the variable statuses, the AC equations are instantiated through
/// `convert_ac` and propagated, rearranged by difficulty, and handed to the
/// backtracking search.
///
/// On success, solution `i` is the lazily built term
/// `λ^{arities[i]}. body_i`, indexed like `pb.arities`.
pub fn solve_problem<R: Reducer, EqRhs, AcRhs>(
    sg: &R,
    convert: impl Fn(&EqRhs) -> Thunk,
    convert_ac: impl Fn(&AcRhs) -> Vec<Thunk>,
    pb: &PreMatchingProblem<EqRhs, AcRhs>,
) -> Option<Vec<Thunk>> {
    debug_assert_eq!(pb.arities.len(), pb.eq_problems.len());
    trace!(
        "matching problem: {} variables, {} ac equations",
        pb.arities.len(),
        pb.ac_problems.len()
    );

    if pb.ac_problems.is_empty() {
        let mut subst = Vec::with_capacity(pb.arities.len());
        for (i, eqs) in pb.eq_problems.iter().enumerate() {
            let solu = solve_eq_slot(sg, &convert, eqs)?;
            let arity = pb.arities[i];
            subst.push(Thunk::new(move || solu.add_lambdas(arity)));
        }
        return Some(subst);
    }

    let mut status = Vec::with_capacity(pb.eq_problems.len());
    for eqs in &pb.eq_problems {
        if eqs.is_empty() {
            status.push(Status::Unsolved);
        } else {
            status.push(Status::Solved(Thunk::from_term(solve_eq_slot(sg, &convert, eqs)?)));
        }
    }
    let ac_problems = pb
        .ac_problems
        .iter()
        .map(|p| AcProblem {
            depth: p.depth,
            ident: p.ident.clone(),
            jokers: p.jokers,
            vars: p.vars.clone(),
            terms: convert_ac(&p.rhs),
        })
        .collect();

    let pb = MatchingProblem { arities: Rc::new(pb.arities.clone()), status, ac_problems };
    let mut pb = init_ac_problems(sg, pb)?;
    ac_rearrange(&mut pb.ac_problems);
    solve_ac_problem(sg, pb)
}
