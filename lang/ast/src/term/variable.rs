use std::fmt;

use derivative::Derivative;
use printer::theme::ThemeExt;
use printer::tokens::AT;
use printer::{Alloc, Builder, Print, PrintCfg};

use crate::ident::VarBound;
use crate::traits::subst::{Substitutable, Substitution};
use crate::traits::{Shift, ShiftRange};

use super::Term;

/// A single-level de Bruijn index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Idx(pub usize);

impl fmt::Display for Idx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A bound variable occurrence.
///
/// The display name is carried for printing only; equality and hashing are
/// on the index alone.
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct Variable {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub name: VarBound,
    pub idx: Idx,
}

impl From<Variable> for Term {
    fn from(var: Variable) -> Self {
        Term::Var(var)
    }
}

impl Shift for Variable {
    fn shift_in_range<R: ShiftRange>(&mut self, range: &R, by: isize) {
        self.idx.shift_in_range(range, by);
    }
}

impl Substitutable for Variable {
    type Target = Term;

    fn subst<S: Substitution>(&self, k: usize, by: &S) -> Result<Self::Target, S::Err> {
        match by.get_subst(self, k)? {
            Some(t) => Ok(t),
            None => Ok(Term::Var(self.clone())),
        }
    }
}

impl Print for Variable {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        let Variable { name, idx } = self;
        if cfg.de_bruijn {
            alloc.var(&name.id).append(AT).append(idx.to_string())
        } else {
            alloc.var(&name.id)
        }
    }
}
