use std::cell::LazyCell;
use std::fmt;
use std::rc::Rc;

use printer::{Alloc, Builder, Print, PrintCfg};

use crate::term::Term;

type ThunkFn = Box<dyn FnOnce() -> Term>;

/// A shared, memoised lazy term.
///
/// Cloning a `Thunk` shares the underlying cell, so a term is computed at
/// most once no matter how many owners force it. The matching engine relies
/// on this: a right-hand side is forced at most once per attempted branch,
/// and forcing is only performed when structural inspection is required.
#[derive(Clone)]
pub struct Thunk {
    cell: Rc<LazyCell<Term, ThunkFn>>,
}

impl Thunk {
    pub fn new<F: FnOnce() -> Term + 'static>(f: F) -> Self {
        Thunk { cell: Rc::new(LazyCell::new(Box::new(f))) }
    }

    pub fn from_term(t: Term) -> Self {
        Thunk::new(move || t)
    }

    pub fn force(&self) -> &Term {
        LazyCell::force(&self.cell)
    }
}

impl From<Term> for Thunk {
    fn from(t: Term) -> Self {
        Thunk::from_term(t)
    }
}

impl fmt::Debug for Thunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Thunk").finish_non_exhaustive()
    }
}

impl Print for Thunk {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        self.force().print(cfg, alloc)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn force_is_memoised() {
        let counter = Rc::new(Cell::new(0));
        let seen = counter.clone();
        let thunk = Thunk::new(move || {
            seen.set(seen.get() + 1);
            Term::cst("a")
        });
        let copy = thunk.clone();
        assert_eq!(thunk.force(), &Term::cst("a"));
        assert_eq!(copy.force(), &Term::cst("a"));
        assert_eq!(counter.get(), 1);
    }
}
