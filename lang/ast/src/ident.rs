use std::fmt;

use printer::theme::ThemeExt;
use printer::{Alloc, Builder, Print, PrintCfg};

// Global identifiers
//
//

/// The name of a globally declared symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Constant {
    pub id: String,
}

impl Constant {
    pub fn from_string(id: &str) -> Self {
        Constant { id: id.to_owned() }
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl Print for Constant {
    fn print<'a>(&'a self, _cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        alloc.ctor(&self.id)
    }
}

// Local variables (binding site)
//
//

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VarBind {
    pub id: String,
}

impl VarBind {
    pub fn from_string(id: &str) -> Self {
        VarBind { id: id.to_owned() }
    }
}

impl fmt::Display for VarBind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

// Local variables (bound occurrence)
//
//

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VarBound {
    pub id: String,
}

impl VarBound {
    pub fn from_string(id: &str) -> Self {
        VarBound { id: id.to_owned() }
    }
}

impl fmt::Display for VarBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl From<VarBind> for VarBound {
    fn from(var: VarBind) -> Self {
        VarBound { id: var.id }
    }
}
