use derivative::Derivative;
use printer::tokens::{BACKSLASH, COLON, DOT};
use printer::util::ParensExt;
use pretty::DocAllocator;
use printer::{Alloc, Builder, Precedence, Print, PrintCfg};

use crate::ident::VarBind;
use crate::traits::subst::{Substitutable, Substitution};
use crate::traits::{Shift, ShiftRange, ShiftRangeExt};

use super::Term;

/// Lambda abstraction.
///
/// The binder name and the optional domain annotation are irrelevant for
/// equality and hashing; conversion likewise only looks at the body.
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct Lam {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub param: VarBind,
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub ty: Option<Box<Term>>,
    pub body: Box<Term>,
}

impl From<Lam> for Term {
    fn from(lam: Lam) -> Self {
        Term::Lam(lam)
    }
}

impl Shift for Lam {
    fn shift_in_range<R: ShiftRange>(&mut self, range: &R, by: isize) {
        self.ty.shift_in_range(range, by);
        self.body.shift_in_range(&range.clone().shift(1), by);
    }
}

impl Substitutable for Lam {
    type Target = Term;

    fn subst<S: Substitution>(&self, k: usize, by: &S) -> Result<Self::Target, S::Err> {
        let Lam { param, ty, body } = self;
        Ok(Term::Lam(Lam {
            param: param.clone(),
            ty: ty.as_ref().map(|ty| (**ty).subst(k, by)).transpose()?.map(Box::new),
            body: Box::new((**body).subst(k + 1, by)?),
        }))
    }
}

impl Print for Lam {
    fn print_prec<'a>(
        &'a self,
        cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        prec: Precedence,
    ) -> Builder<'a> {
        let Lam { param, ty, body } = self;
        let annot = match ty {
            Some(ty) => alloc.text(COLON).append(alloc.space()).append(ty.print(cfg, alloc)),
            None => alloc.nil(),
        };
        alloc
            .text(BACKSLASH)
            .append(alloc.text(param.id.clone()))
            .append(annot)
            .append(DOT)
            .append(alloc.space())
            .append(body.print(cfg, alloc))
            .parens_if(prec > Precedence::Exp)
    }
}
