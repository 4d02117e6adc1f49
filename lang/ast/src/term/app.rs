use printer::util::ParensExt;
use pretty::DocAllocator;
use printer::{Alloc, Builder, Precedence, Print, PrintCfg};

use crate::traits::subst::{Substitutable, Substitution};
use crate::traits::{Shift, ShiftRange};

use super::Term;

/// Application in spine form: `fun args₁ … argsₙ` with `n ≥ 1` and `fun`
/// never itself an application.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct App {
    pub fun: Box<Term>,
    pub args: Vec<Term>,
}

impl From<App> for Term {
    fn from(app: App) -> Self {
        Term::App(app)
    }
}

impl Shift for App {
    fn shift_in_range<R: ShiftRange>(&mut self, range: &R, by: isize) {
        self.fun.shift_in_range(range, by);
        self.args.shift_in_range(range, by);
    }
}

impl Substitutable for App {
    type Target = Term;

    fn subst<S: Substitution>(&self, k: usize, by: &S) -> Result<Self::Target, S::Err> {
        let App { fun, args } = self;
        // Substituting the head may itself produce an application, so the
        // spine is re-flattened through `Term::app`.
        let fun = (**fun).subst(k, by)?;
        let args = args.subst(k, by)?;
        Ok(fun.app(args))
    }
}

impl Print for App {
    fn print_prec<'a>(
        &'a self,
        cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        prec: Precedence,
    ) -> Builder<'a> {
        let App { fun, args } = self;
        let head = fun.print_prec(cfg, alloc, Precedence::App);
        let args = args.iter().map(|arg| arg.print_prec(cfg, alloc, Precedence::Atom));
        head.append(alloc.space())
            .append(alloc.intersperse(args, alloc.space()))
            .group()
            .parens_if(prec == Precedence::Atom)
    }
}
