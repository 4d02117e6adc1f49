mod shift;
pub mod subst;

pub use shift::*;
pub use subst::*;
