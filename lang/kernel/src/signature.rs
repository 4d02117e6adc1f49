use fxhash::FxHashMap;
use log::trace;

use ast::*;
use printer::Print;

use crate::result::KernelError;
use crate::rule::Rule;

/// The equational theory a symbol is matched and compared under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Algebra {
    /// No equations; matching is purely structural.
    Free,
    /// Associative and commutative.
    Ac,
    /// Associative and commutative with a neutral element.
    Acu(Term),
}

#[derive(Debug, Clone, Default)]
struct Symbol {
    algebra: Option<Algebra>,
    rules: Vec<Rule>,
}

/// The global name table: one entry per declared symbol, carrying its
/// algebra and its rewrite rules in declaration order.
///
/// Lookups are total: a constant without an entry is a free constructor
/// without rules. This keeps reduction and conversion free of error paths.
#[derive(Debug, Clone, Default)]
pub struct Signature {
    symbols: FxHashMap<Constant, Symbol>,
}

impl Signature {
    pub fn new() -> Self {
        Signature::default()
    }

    /// Declare a symbol with the given algebra. Declaring the same symbol
    /// twice is an error; rules may be added without a prior declaration.
    pub fn declare(&mut self, name: Constant, algebra: Algebra) -> Result<(), KernelError> {
        let entry = self.symbols.entry(name.clone()).or_default();
        if entry.algebra.is_some() {
            return Err(KernelError::AlreadyDeclared { name: name.id });
        }
        entry.algebra = Some(algebra);
        Ok(())
    }

    pub fn declare_ac(&mut self, name: Constant) -> Result<(), KernelError> {
        self.declare(name, Algebra::Ac)
    }

    pub fn declare_acu(&mut self, name: Constant, neutral: Term) -> Result<(), KernelError> {
        self.declare(name, Algebra::Acu(neutral))
    }

    /// Validate `rule` and register it under its head symbol.
    pub fn add_rule(&mut self, rule: Rule) -> Result<(), KernelError> {
        rule.check(self)?;
        trace!("adding rule {}", rule.print_trace());
        self.symbols.entry(rule.head.clone()).or_default().rules.push(rule);
        Ok(())
    }

    pub fn algebra(&self, name: &Constant) -> &Algebra {
        self.symbols
            .get(name)
            .and_then(|symbol| symbol.algebra.as_ref())
            .unwrap_or(&Algebra::Free)
    }

    /// The AC identifier of `name`, if it is declared AC or ACU.
    pub fn ac_ident(&self, name: &Constant) -> Option<AcIdent> {
        match self.algebra(name) {
            Algebra::Free => None,
            Algebra::Ac => Some(AcIdent::ac(name.clone())),
            Algebra::Acu(neutral) => Some(AcIdent::acu(name.clone(), neutral.clone())),
        }
    }

    pub fn rules(&self, name: &Constant) -> &[Rule] {
        self.symbols.get(name).map(|symbol| symbol.rules.as_slice()).unwrap_or(&[])
    }
}
