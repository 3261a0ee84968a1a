//! Target-fixed size, alignment, and field-offset computation.

use crate::types::{Composite, CompositeDefs, CompositeKind, FloatSize, IntSize, Type};

/// Round `n` up to the next multiple of `align` (a power of two).
#[must_use]
pub const fn align_up(n: i64, align: i64) -> i64 {
    (n + align - 1) & !(align - 1)
}

/// Byte size of a type on the ARM64 target.
///
/// Incomplete arrays and unknown composites have size 0.
#[must_use]
pub fn sizeof(ty: &Type, defs: &CompositeDefs) -> i64 {
    match ty {
        Type::Void | Type::Function { .. } => 1,
        Type::Int { size, .. } => match size {
            IntSize::I8 => 1,
            IntSize::I16 => 2,
            IntSize::I32 | IntSize::IBool => 4,
        },
        Type::Long { .. } | Type::Pointer { .. } => 8,
        Type::Float { size } => match size {
            FloatSize::F32 => 4,
            FloatSize::F64 => 8,
        },
        Type::Array { elem, len } => {
            if *len < 0 {
                0
            } else {
                len * sizeof(elem, defs)
            }
        }
        Type::Struct { name } | Type::Union { name } => defs
            .get(name)
            .map_or(0, |def| sizeof_composite(def, defs)),
    }
}

/// Byte alignment of a type on the ARM64 target.
#[must_use]
pub fn alignof(ty: &Type, defs: &CompositeDefs) -> i64 {
    match ty {
        Type::Void | Type::Function { .. } => 1,
        Type::Int { size, .. } => match size {
            IntSize::I8 => 1,
            IntSize::I16 => 2,
            IntSize::I32 | IntSize::IBool => 4,
        },
        Type::Long { .. } | Type::Pointer { .. } => 8,
        Type::Float { size } => match size {
            FloatSize::F32 => 4,
            FloatSize::F64 => 8,
        },
        Type::Array { elem, .. } => alignof(elem, defs),
        Type::Struct { name } | Type::Union { name } => defs
            .get(name)
            .map_or(1, |def| alignof_composite(def, defs)),
    }
}

/// Byte offset of `field` inside the struct named `name`.
///
/// Union fields all sit at offset 0; a missing definition or field yields 0.
#[must_use]
pub fn offsetof(defs: &CompositeDefs, name: &str, field: &str) -> i64 {
    let Some(def) = defs.get(name) else {
        return 0;
    };
    if def.kind == CompositeKind::Union {
        return 0;
    }
    let mut offset = 0;
    for f in &def.fields {
        offset = align_up(offset, alignof(&f.ty, defs));
        if f.name == field {
            return offset;
        }
        offset += sizeof(&f.ty, defs);
    }
    0
}

fn alignof_composite(def: &Composite, defs: &CompositeDefs) -> i64 {
    def.fields
        .iter()
        .map(|f| alignof(&f.ty, defs))
        .max()
        .unwrap_or(1)
}

fn sizeof_composite(def: &Composite, defs: &CompositeDefs) -> i64 {
    let align = alignof_composite(def, defs);
    match def.kind {
        CompositeKind::Struct => {
            let mut offset = 0;
            for f in &def.fields {
                offset = align_up(offset, alignof(&f.ty, defs));
                offset += sizeof(&f.ty, defs);
            }
            align_up(offset, align)
        }
        CompositeKind::Union => {
            let max = def
                .fields
                .iter()
                .map(|f| sizeof(&f.ty, defs))
                .max()
                .unwrap_or(0);
            align_up(max, align)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Field;

    fn point_defs() -> CompositeDefs {
        let mut defs = CompositeDefs::default();
        defs.insert(
            "point".to_string(),
            Composite::struct_(vec![
                Field::new("x", Type::int()),
                Field::new("y", Type::int()),
            ]),
        );
        defs
    }

    #[test]
    fn test_align_up() {
        assert_eq!(align_up(0, 8), 0);
        assert_eq!(align_up(1, 8), 8);
        assert_eq!(align_up(8, 8), 8);
        assert_eq!(align_up(5, 4), 8);
        assert_eq!(align_up(3, 1), 3);
    }

    #[test]
    fn test_sizeof_scalars() {
        let defs = CompositeDefs::default();
        assert_eq!(sizeof(&Type::Void, &defs), 1);
        assert_eq!(sizeof(&Type::char_(), &defs), 1);
        assert_eq!(sizeof(&Type::short(), &defs), 2);
        assert_eq!(sizeof(&Type::int(), &defs), 4);
        assert_eq!(sizeof(&Type::bool_(), &defs), 4);
        assert_eq!(sizeof(&Type::long(), &defs), 8);
        assert_eq!(sizeof(&Type::float(), &defs), 4);
        assert_eq!(sizeof(&Type::double(), &defs), 8);
        assert_eq!(sizeof(&Type::pointer(Type::Void), &defs), 8);
    }

    #[test]
    fn test_sizeof_array() {
        let defs = CompositeDefs::default();
        assert_eq!(sizeof(&Type::array(Type::int(), 10), &defs), 40);
        assert_eq!(sizeof(&Type::array(Type::int(), -1), &defs), 0);
    }

    #[test]
    fn test_struct_layout_with_padding() {
        let mut defs = CompositeDefs::default();
        defs.insert(
            "s".to_string(),
            Composite::struct_(vec![
                Field::new("c", Type::char_()),
                Field::new("l", Type::long()),
                Field::new("s", Type::short()),
            ]),
        );
        let ty = Type::struct_("s");
        // c at 0, l at 8, s at 16, total rounded to 24
        assert_eq!(offsetof(&defs, "s", "c"), 0);
        assert_eq!(offsetof(&defs, "s", "l"), 8);
        assert_eq!(offsetof(&defs, "s", "s"), 16);
        assert_eq!(sizeof(&ty, &defs), 24);
        assert_eq!(alignof(&ty, &defs), 8);
    }

    #[test]
    fn test_struct_point_offsets() {
        let defs = point_defs();
        assert_eq!(offsetof(&defs, "point", "x"), 0);
        assert_eq!(offsetof(&defs, "point", "y"), 4);
        assert_eq!(sizeof(&Type::struct_("point"), &defs), 8);
    }

    #[test]
    fn test_union_layout() {
        let mut defs = CompositeDefs::default();
        defs.insert(
            "u".to_string(),
            Composite::union(vec![
                Field::new("c", Type::char_()),
                Field::new("d", Type::double()),
            ]),
        );
        let ty = Type::union_("u");
        assert_eq!(sizeof(&ty, &defs), 8);
        assert_eq!(offsetof(&defs, "u", "d"), 0);
    }

    #[test]
    fn test_sizeof_is_multiple_of_max_alignment() {
        let defs = point_defs();
        let size = sizeof(&Type::struct_("point"), &defs);
        let align = alignof(&Type::struct_("point"), &defs);
        assert_eq!(size % align, 0);
        assert!(size >= 8);
    }

    #[test]
    fn test_unknown_composite_defaults() {
        let defs = CompositeDefs::default();
        assert_eq!(sizeof(&Type::struct_("nope"), &defs), 0);
        assert_eq!(alignof(&Type::struct_("nope"), &defs), 1);
        assert_eq!(offsetof(&defs, "nope", "f"), 0);
    }
}
