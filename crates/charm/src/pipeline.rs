//! The pass chain.

use charm_asm as asm;
use charm_clight as clight;
use charm_csel as csel;
use charm_ctypes::{CompositeDefs, Type};
use tracing::{debug, info_span};

use crate::config::Config;
use crate::error::{Error, Result};

/// Runs the lowering passes in order over one immutable program at a time.
#[derive(Clone, Copy, Debug, Default)]
pub struct Pipeline {
    config: Config,
}

impl Pipeline {
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Lower a CLIGHT program to CSEL, ready for register allocation.
    ///
    /// # Errors
    ///
    /// Returns an error when the program fails host-surface validation:
    /// duplicate function names or composite references with no definition.
    pub fn lower(&self, program: &clight::Program) -> Result<csel::Program> {
        validate(program)?;

        let csm = {
            let _span = info_span!("cshmgen", functions = program.functions.len()).entered();
            charm_csm::lower_program(program)
        };
        let cmin = {
            let _span = info_span!("cminorgen").entered();
            charm_cmin::lower_program(&csm)
        };
        let selected = {
            let _span = info_span!("selection").entered();
            charm_csel::lower_program(&cmin)
        };
        debug!(
            functions = selected.functions.len(),
            globals = selected.globals.len(),
            "lowering complete"
        );
        Ok(selected)
    }

    /// Print an assembly program for the configured platform.
    #[must_use]
    pub fn print_asm(&self, program: &asm::Program) -> String {
        let _span = info_span!("print", darwin = self.config.darwin).entered();
        asm::print_program(program, self.config.darwin)
    }
}

fn validate(program: &clight::Program) -> Result<()> {
    let mut seen = std::collections::HashSet::new();
    for f in &program.functions {
        if !seen.insert(f.name.as_str()) {
            return Err(Error::DuplicateFunction(f.name.clone()));
        }
    }
    for g in &program.globals {
        check_complete(&g.ty, &program.composites, &g.name)?;
    }
    for f in &program.functions {
        for (name, ty) in f.locals.iter().chain(&f.params) {
            check_complete(ty, &program.composites, name)?;
        }
    }
    Ok(())
}

/// Layout will be computed for this type; its composite references must be
/// defined. Pointees stay unchecked: pointers to incomplete types are fine.
fn check_complete(ty: &Type, defs: &CompositeDefs, referrer: &str) -> Result<()> {
    match ty {
        Type::Struct { name } | Type::Union { name } => {
            if defs.contains_key(name) {
                Ok(())
            } else {
                Err(Error::UnknownComposite {
                    name: name.clone(),
                    referrer: referrer.to_string(),
                })
            }
        }
        Type::Array { elem, .. } => check_complete(elem, defs, referrer),
        _ => Ok(()),
    }
}
