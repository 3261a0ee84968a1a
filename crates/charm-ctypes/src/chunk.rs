//! Memory access chunks.

use std::fmt;

use crate::types::{FloatSize, IntSize, Signedness, Type};

/// Width and extension behaviour of a memory access.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Chunk {
    I8S,
    I8U,
    I16S,
    I16U,
    I32,
    I64,
    F32,
    F64,
    Any32,
    Any64,
}

impl Chunk {
    /// Canonical chunk of a type.
    ///
    /// Sub-word integers respect their sign; `_Bool` is accessed as a full
    /// 32-bit word; pointers are 64-bit; anything without a meaningful
    /// scalar access defaults to `Any32`.
    #[must_use]
    pub const fn of(ty: &Type) -> Self {
        match ty {
            Type::Int { size, sign } => match (size, sign) {
                (IntSize::I8, Signedness::Signed) => Self::I8S,
                (IntSize::I8, Signedness::Unsigned) => Self::I8U,
                (IntSize::I16, Signedness::Signed) => Self::I16S,
                (IntSize::I16, Signedness::Unsigned) => Self::I16U,
                (IntSize::I32 | IntSize::IBool, _) => Self::I32,
            },
            Type::Long { .. } | Type::Pointer { .. } => Self::I64,
            Type::Float { size } => match size {
                FloatSize::F32 => Self::F32,
                FloatSize::F64 => Self::F64,
            },
            _ => Self::Any32,
        }
    }

    /// Number of bytes the access touches.
    #[must_use]
    pub const fn size(self) -> i64 {
        match self {
            Self::I8S | Self::I8U => 1,
            Self::I16S | Self::I16U => 2,
            Self::I32 | Self::F32 | Self::Any32 => 4,
            Self::I64 | Self::F64 | Self::Any64 => 8,
        }
    }

    /// Mnemonic used in IR dumps.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::I8S => "int8s",
            Self::I8U => "int8u",
            Self::I16S => "int16s",
            Self::I16U => "int16u",
            Self::I32 => "int32",
            Self::I64 => "int64",
            Self::F32 => "float32",
            Self::F64 => "float64",
            Self::Any32 => "any32",
            Self::Any64 => "any64",
        }
    }
}

impl fmt::Display for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_of_integers() {
        assert_eq!(Chunk::of(&Type::char_()), Chunk::I8S);
        assert_eq!(Chunk::of(&Type::uchar()), Chunk::I8U);
        assert_eq!(Chunk::of(&Type::short()), Chunk::I16S);
        assert_eq!(Chunk::of(&Type::ushort()), Chunk::I16U);
        assert_eq!(Chunk::of(&Type::int()), Chunk::I32);
        assert_eq!(Chunk::of(&Type::uint()), Chunk::I32);
        assert_eq!(Chunk::of(&Type::bool_()), Chunk::I32);
    }

    #[test]
    fn test_chunk_of_wide_types() {
        assert_eq!(Chunk::of(&Type::long()), Chunk::I64);
        assert_eq!(Chunk::of(&Type::pointer(Type::Void)), Chunk::I64);
        assert_eq!(Chunk::of(&Type::float()), Chunk::F32);
        assert_eq!(Chunk::of(&Type::double()), Chunk::F64);
    }

    #[test]
    fn test_chunk_default_is_any32() {
        assert_eq!(Chunk::of(&Type::Void), Chunk::Any32);
        assert_eq!(Chunk::of(&Type::array(Type::int(), 3)), Chunk::Any32);
    }

    #[test]
    fn test_chunk_sizes() {
        assert_eq!(Chunk::I8S.size(), 1);
        assert_eq!(Chunk::I16U.size(), 2);
        assert_eq!(Chunk::I32.size(), 4);
        assert_eq!(Chunk::F32.size(), 4);
        assert_eq!(Chunk::I64.size(), 8);
        assert_eq!(Chunk::F64.size(), 8);
    }
}
