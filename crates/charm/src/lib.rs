//! C-to-ARM64 lowering pipeline.
//!
//! Chains the tree-to-tree lowerings CLIGHT → CSM → CMIN → CSEL and prints
//! ARM64 assembly programs in platform-aware GNU-as syntax. Register
//! allocation sits between the two halves and belongs to the host driver.

mod config;
mod error;
mod pipeline;

pub use config::Config;
pub use error::{Error, Result};
pub use pipeline::Pipeline;

pub use charm_asm as asm;
pub use charm_clight as clight;
pub use charm_cmin as cmin;
pub use charm_csel as csel;
pub use charm_csm as csm;
pub use charm_ctypes as ctypes;
