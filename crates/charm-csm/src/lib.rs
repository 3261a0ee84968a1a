//! Untyped-expression IR ("Csharpminor" level).
//!
//! Expressions carry no types; every operator names the type it works at
//! (`AddLong`, `DivFloat`), every memory access names its chunk, and
//! structured control flow uses blocks with numbered exits. The `lower`
//! module translates the typed CLIGHT AST down to this form.

mod dump;
mod expr;
mod lower;
mod ops;
mod program;
mod stmt;

pub use dump::*;
pub use expr::*;
pub use lower::*;
pub use ops::*;
pub use program::*;
pub use stmt::*;
