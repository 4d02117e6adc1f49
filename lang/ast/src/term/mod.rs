use printer::theme::ThemeExt;
use printer::tokens::{KIND, TYPE};
use printer::{Alloc, Builder, Precedence, Print, PrintCfg};

use crate::ident::*;
use crate::traits::subst::{Substitutable, Substitution};
use crate::traits::{Shift, ShiftRange};

mod app;
mod lam;
mod pi;
mod variable;

pub use app::*;
pub use lam::*;
pub use pi::*;
pub use variable::*;

// Term
//
//

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    /// The sort of `Type`.
    Kind,
    /// The sort of all object-level types.
    Type,
    /// A globally declared symbol.
    Const(Constant),
    /// A bound variable (de Bruijn index).
    Var(Variable),
    /// Spine application: `fun` is never itself an application and `args`
    /// is non-empty. Use [`Term::app`] to maintain the invariant.
    App(App),
    Lam(Lam),
    Pi(Pi),
}

impl Term {
    pub fn cst(id: &str) -> Term {
        Term::Const(Constant::from_string(id))
    }

    pub fn var(name: &str, idx: usize) -> Term {
        Term::Var(Variable { name: VarBound::from_string(name), idx: Idx(idx) })
    }

    pub fn lam(param: &str, body: Term) -> Term {
        Term::Lam(Lam { param: VarBind::from_string(param), ty: None, body: Box::new(body) })
    }

    pub fn pi(param: &str, dom: Term, cod: Term) -> Term {
        Term::Pi(Pi {
            param: VarBind::from_string(param),
            dom: Box::new(dom),
            cod: Box::new(cod),
        })
    }

    /// Apply `self` to `args`, flattening the spine if `self` is already an
    /// application. Applying to an empty argument list is the identity.
    pub fn app(self, mut args: Vec<Term>) -> Term {
        if args.is_empty() {
            return self;
        }
        match self {
            Term::App(App { fun, args: mut spine }) => {
                spine.append(&mut args);
                Term::App(App { fun, args: spine })
            }
            fun => Term::App(App { fun: Box::new(fun), args }),
        }
    }

    /// Apply `self` to a list of de Bruijn variables.
    pub fn app_db(self, indices: &[usize]) -> Term {
        let args = indices
            .iter()
            .map(|i| Term::Var(Variable { name: VarBound::from_string("_"), idx: Idx(*i) }))
            .collect();
        self.app(args)
    }

    /// Wrap `self` in `n` anonymous lambda binders.
    pub fn add_lambdas(self, n: usize) -> Term {
        let mut t = self;
        for _ in 0..n {
            t = Term::Lam(Lam {
                param: VarBind::from_string("_"),
                ty: None,
                body: Box::new(t),
            });
        }
        t
    }

    /// The head of the application spine.
    pub fn head(&self) -> &Term {
        match self {
            Term::App(App { fun, .. }) => fun,
            _ => self,
        }
    }

    pub fn const_head(&self) -> Option<&Constant> {
        match self.head() {
            Term::Const(c) => Some(c),
            _ => None,
        }
    }
}

impl Shift for Term {
    fn shift_in_range<R: ShiftRange>(&mut self, range: &R, by: isize) {
        match self {
            Term::Kind | Term::Type | Term::Const(_) => {}
            Term::Var(e) => e.shift_in_range(range, by),
            Term::App(e) => e.shift_in_range(range, by),
            Term::Lam(e) => e.shift_in_range(range, by),
            Term::Pi(e) => e.shift_in_range(range, by),
        }
    }
}

impl Substitutable for Term {
    type Target = Term;

    fn subst<S: Substitution>(&self, k: usize, by: &S) -> Result<Self::Target, S::Err> {
        match self {
            Term::Kind => Ok(Term::Kind),
            Term::Type => Ok(Term::Type),
            Term::Const(c) => Ok(Term::Const(c.clone())),
            Term::Var(e) => e.subst(k, by),
            Term::App(e) => e.subst(k, by),
            Term::Lam(e) => e.subst(k, by),
            Term::Pi(e) => e.subst(k, by),
        }
    }
}

impl Print for Term {
    fn print_prec<'a>(
        &'a self,
        cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        prec: Precedence,
    ) -> Builder<'a> {
        match self {
            Term::Kind => alloc.keyword(KIND),
            Term::Type => alloc.keyword(TYPE),
            Term::Const(c) => c.print(cfg, alloc),
            Term::Var(e) => e.print(cfg, alloc),
            Term::App(e) => e.print_prec(cfg, alloc, prec),
            Term::Lam(e) => e.print_prec(cfg, alloc, prec),
            Term::Pi(e) => e.print_prec(cfg, alloc, prec),
        }
    }
}
