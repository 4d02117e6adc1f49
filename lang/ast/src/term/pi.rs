use derivative::Derivative;
use printer::tokens::{ARROW, COLON};
use printer::util::ParensExt;
use pretty::DocAllocator;
use printer::{Alloc, Builder, Precedence, Print, PrintCfg};

use crate::ident::VarBind;
use crate::traits::subst::{Substitutable, Substitution};
use crate::traits::{Shift, ShiftRange, ShiftRangeExt};

use super::Term;

/// Dependent product `(x : dom) -> cod`.
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct Pi {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub param: VarBind,
    pub dom: Box<Term>,
    pub cod: Box<Term>,
}

impl From<Pi> for Term {
    fn from(pi: Pi) -> Self {
        Term::Pi(pi)
    }
}

impl Shift for Pi {
    fn shift_in_range<R: ShiftRange>(&mut self, range: &R, by: isize) {
        self.dom.shift_in_range(range, by);
        self.cod.shift_in_range(&range.clone().shift(1), by);
    }
}

impl Substitutable for Pi {
    type Target = Term;

    fn subst<S: Substitution>(&self, k: usize, by: &S) -> Result<Self::Target, S::Err> {
        let Pi { param, dom, cod } = self;
        Ok(Term::Pi(Pi {
            param: param.clone(),
            dom: Box::new((**dom).subst(k, by)?),
            cod: Box::new((**cod).subst(k + 1, by)?),
        }))
    }
}

impl Print for Pi {
    fn print_prec<'a>(
        &'a self,
        cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        prec: Precedence,
    ) -> Builder<'a> {
        let Pi { param, dom, cod } = self;
        alloc
            .text(param.id.clone())
            .append(alloc.space())
            .append(COLON)
            .append(alloc.space())
            .append(dom.print(cfg, alloc))
            .enclose("(", ")")
            .append(alloc.space())
            .append(ARROW)
            .append(alloc.space())
            .append(cod.print(cfg, alloc))
            .parens_if(prec > Precedence::Exp)
    }
}
