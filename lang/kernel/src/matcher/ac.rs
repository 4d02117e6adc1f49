use log::trace;

use ast::*;
use printer::Print;

use super::problem::{AcProblem, MatchingProblem, MillerVar, Status};
use super::{force_flatten_ac_term, Reducer};

/// The concrete term an occurrence of variable `i` contributes to an AC
/// equation at depth `depth`, once `i` takes the value `s` (one flattened
/// component of its solution body): the solution is rebuilt under its
/// binders, moved below the equation's binders, and applied to the
/// occurrence's arguments.
pub(crate) fn expected_term(depth: usize, mvar: &MillerVar, s: &Term) -> Term {
    shift_and_clone(&s.clone().add_lambdas(mvar.arity), depth as isize).app_db(&mvar.vars)
}

/// Remove the first element of `terms` convertible to `expected`, reporting
/// whether one was found. Multiset semantics: exactly one occurrence is
/// removed, the order of the others is preserved.
pub(crate) fn remove_convertible<R: Reducer>(
    sg: &R,
    terms: &mut Vec<Thunk>,
    expected: &Term,
) -> bool {
    match terms.iter().position(|t| sg.are_convertible(t.force(), expected)) {
        Some(pos) => {
            terms.remove(pos);
            true
        }
        None => false,
    }
}

/// Propagate the solution `sol` of variable `i` through every AC equation
/// mentioning it: subtract the terms its occurrences now account for, and
/// drop it from the variable lists. `None` if some equation cannot absorb
/// the solution.
pub(crate) fn update_ac_problems<R: Reducer>(
    sg: &R,
    problems: &[AcProblem],
    i: usize,
    sol: &Thunk,
) -> Option<Vec<AcProblem>> {
    let mut whnfed: Option<Term> = None;
    let mut out = Vec::with_capacity(problems.len());
    for problem in problems {
        if !problem.mentions(i) {
            out.push(problem.clone());
            continue;
        }
        let value = whnfed.get_or_insert_with(|| sg.whnf(sol.force().clone()));
        let components = flatten_solution(sg, &problem.ident, value);
        let mut terms = problem.terms.clone();
        for (j, mvar) in &problem.vars {
            if *j != i {
                continue;
            }
            for s in &components {
                let expected = expected_term(problem.depth, mvar, s);
                if !remove_convertible(sg, &mut terms, &expected) {
                    trace!("no term accounts for {}", expected.print_trace());
                    return None;
                }
            }
        }
        let vars: Vec<_> = problem.vars.iter().filter(|(j, _)| *j != i).cloned().collect();
        if vars.is_empty() && !(terms.is_empty() || problem.jokers > 0) {
            return None;
        }
        out.push(AcProblem {
            depth: problem.depth,
            ident: problem.ident.clone(),
            jokers: problem.jokers,
            vars,
            terms,
        });
    }
    Some(out)
}

/// The flattened components a solved value contributes under `aci`: the
/// multiset view when the value is headed by the AC symbol, the value alone
/// otherwise; ACU neutral components contribute nothing.
fn flatten_solution<R: Reducer>(sg: &R, aci: &AcIdent, sol: &Term) -> Vec<Term> {
    if ac_pair(&aci.symbol, sol).is_some() {
        return force_flatten_ac_term(sg, aci, sol.clone());
    }
    match aci.neutral() {
        Some(neutral) if sg.are_convertible(sol, neutral) => Vec::new(),
        _ => vec![sol.clone()],
    }
}

/// Commit variable `i` to the full solution `sol`.
pub(crate) fn set_unsolved<R: Reducer>(
    sg: &R,
    pb: &MatchingProblem,
    i: usize,
    sol: Thunk,
) -> Option<MatchingProblem> {
    let ac_problems = update_ac_problems(sg, &pb.ac_problems, i, &sol)?;
    let mut status = pb.status.clone();
    status[i] = Status::Solved(sol);
    Some(MatchingProblem { arities: pb.arities.clone(), status, ac_problems })
}

/// Open the partial state of variable `i` under the AC symbol `aci`.
pub(crate) fn set_partly(pb: &MatchingProblem, i: usize, aci: AcIdent) -> MatchingProblem {
    debug_assert!(matches!(pb.status[i], Status::Unsolved));
    let mut status = pb.status.clone();
    status[i] = Status::Partly(aci, Vec::new());
    MatchingProblem {
        arities: pb.arities.clone(),
        status,
        ac_problems: pb.ac_problems.clone(),
    }
}

/// Append one term to the partial AC bag of variable `i`, subtracting the
/// term each of its occurrences now accounts for. The variable stays in the
/// variable lists: more terms may still accumulate.
pub(crate) fn add_partly<R: Reducer>(
    sg: &R,
    pb: &MatchingProblem,
    i: usize,
    sol: Term,
) -> Option<MatchingProblem> {
    let Status::Partly(aci, bag) = &pb.status[i] else {
        unreachable!("add_partly on a variable that is not partly solved")
    };
    let mut ac_problems = Vec::with_capacity(pb.ac_problems.len());
    for problem in &pb.ac_problems {
        if problem.ident != *aci || !problem.mentions(i) {
            ac_problems.push(problem.clone());
            continue;
        }
        let mut terms = problem.terms.clone();
        for (j, mvar) in &problem.vars {
            if *j != i {
                continue;
            }
            let expected = expected_term(problem.depth, mvar, &sol);
            if !remove_convertible(sg, &mut terms, &expected) {
                return None;
            }
        }
        ac_problems.push(AcProblem { terms, ..problem.clone() });
    }
    let mut bag = bag.clone();
    bag.push(sol);
    let mut status = pb.status.clone();
    status[i] = Status::Partly(aci.clone(), bag);
    Some(MatchingProblem { arities: pb.arities.clone(), status, ac_problems })
}

/// Close the partial state of variable `i`: commit it to the AC combination
/// of its bag (the ACU neutral for an empty bag; an empty bag under plain AC
/// fails), remove its remaining occurrences, and propagate the committed
/// value. The incremental subtractions of [`add_partly`] already consumed
/// the matched terms, so removal re-checks only the emptiness conditions.
pub(crate) fn close_partly<R: Reducer>(
    sg: &R,
    pb: &MatchingProblem,
    i: usize,
) -> Option<MatchingProblem> {
    let Status::Partly(aci, bag) = &pb.status[i] else {
        unreachable!("close_partly on a variable that is not partly solved")
    };
    let sol = if bag.is_empty() {
        Thunk::from_term(aci.neutral()?.clone())
    } else {
        let aci = aci.clone();
        let bag = bag.clone();
        Thunk::new(move || unflatten(&aci, bag))
    };
    let mut ac_problems = Vec::with_capacity(pb.ac_problems.len());
    for problem in &pb.ac_problems {
        if problem.ident != *aci || !problem.mentions(i) {
            ac_problems.push(problem.clone());
            continue;
        }
        let vars: Vec<_> = problem.vars.iter().filter(|(j, _)| *j != i).cloned().collect();
        if vars.is_empty() && !(problem.terms.is_empty() || problem.jokers > 0) {
            return None;
        }
        ac_problems.push(AcProblem { vars, ..problem.clone() });
    }
    let stripped =
        MatchingProblem { arities: pb.arities.clone(), status: pb.status.clone(), ac_problems };
    set_unsolved(sg, &stripped, i, sol)
}
