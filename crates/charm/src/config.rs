//! Pipeline configuration.

/// Output conventions. The target platform is the only environmental input
/// the pipeline consults.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Config {
    /// Emit Mach-O (Darwin) conventions instead of ELF.
    pub darwin: bool,
}

impl Config {
    /// ELF (Linux) output.
    #[must_use]
    pub const fn elf() -> Self {
        Self { darwin: false }
    }

    /// Mach-O (Darwin) output.
    #[must_use]
    pub const fn macho() -> Self {
        Self { darwin: true }
    }
}
