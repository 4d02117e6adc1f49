//! Term representation of the lapis kernel.
//!
//! Terms use nameless (de Bruijn) representation for bound variables; the
//! display name of a binder or a bound occurrence is carried along but is
//! irrelevant for equality and hashing. Applications are kept in spine form:
//! the function of an application is never itself an application.

pub mod ac;
mod ident;
pub mod term;
mod thunk;
pub mod traits;

pub use ac::*;
pub use ident::*;
pub use term::*;
pub use thunk::*;
pub use traits::*;
