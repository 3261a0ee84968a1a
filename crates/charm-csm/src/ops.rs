//! Type-suffixed operators.
//!
//! The suffix convention: no suffix = 32-bit int, `L` = 64-bit long,
//! `F` = double, `S` = single, `U` = unsigned.

/// Unary operators, including all scalar conversions.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum UnOp {
    NegInt,
    NegLong,
    NegFloat,
    NegSingle,
    NotInt,
    NotLong,
    NotBool,
    /// Truncate to 8 bits and sign-extend.
    Cast8S,
    /// Truncate to 8 bits and zero-extend.
    Cast8U,
    Cast16S,
    Cast16U,
    SingleOfFloat,
    FloatOfSingle,
    IntOfFloat,
    IntUOfFloat,
    FloatOfInt,
    FloatOfIntU,
    LongOfFloat,
    LongUOfFloat,
    FloatOfLong,
    FloatOfLongU,
    IntOfLong,
    LongOfInt,
    LongOfIntU,
}

impl UnOp {
    /// Mnemonic used in IR dumps.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::NegInt => "negint",
            Self::NegLong => "negl",
            Self::NegFloat => "negf",
            Self::NegSingle => "negs",
            Self::NotInt => "notint",
            Self::NotLong => "notl",
            Self::NotBool => "notbool",
            Self::Cast8S => "cast8s",
            Self::Cast8U => "cast8u",
            Self::Cast16S => "cast16s",
            Self::Cast16U => "cast16u",
            Self::SingleOfFloat => "singleoffloat",
            Self::FloatOfSingle => "floatofsingle",
            Self::IntOfFloat => "intoffloat",
            Self::IntUOfFloat => "intuoffloat",
            Self::FloatOfInt => "floatofint",
            Self::FloatOfIntU => "floatofintu",
            Self::LongOfFloat => "longoffloat",
            Self::LongUOfFloat => "longuoffloat",
            Self::FloatOfLong => "floatoflong",
            Self::FloatOfLongU => "floatoflongu",
            Self::IntOfLong => "intoflong",
            Self::LongOfInt => "longofint",
            Self::LongOfIntU => "longofintu",
        }
    }
}

/// Binary operators.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BinOp {
    Add,
    AddL,
    AddF,
    AddS,
    Sub,
    SubL,
    SubF,
    SubS,
    Mul,
    MulL,
    MulF,
    MulS,
    Div,
    DivU,
    DivL,
    DivLU,
    DivF,
    DivS,
    Mod,
    ModU,
    ModL,
    ModLU,
    And,
    AndL,
    Or,
    OrL,
    Xor,
    XorL,
    Shl,
    ShlL,
    Shr,
    ShrU,
    ShrL,
    ShrLU,
}

impl BinOp {
    /// Mnemonic used in IR dumps.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::AddL => "addl",
            Self::AddF => "addf",
            Self::AddS => "adds",
            Self::Sub => "sub",
            Self::SubL => "subl",
            Self::SubF => "subf",
            Self::SubS => "subs",
            Self::Mul => "mul",
            Self::MulL => "mull",
            Self::MulF => "mulf",
            Self::MulS => "muls",
            Self::Div => "div",
            Self::DivU => "divu",
            Self::DivL => "divl",
            Self::DivLU => "divlu",
            Self::DivF => "divf",
            Self::DivS => "divs",
            Self::Mod => "mod",
            Self::ModU => "modu",
            Self::ModL => "modl",
            Self::ModLU => "modlu",
            Self::And => "and",
            Self::AndL => "andl",
            Self::Or => "or",
            Self::OrL => "orl",
            Self::Xor => "xor",
            Self::XorL => "xorl",
            Self::Shl => "shl",
            Self::ShlL => "shll",
            Self::Shr => "shr",
            Self::ShrU => "shru",
            Self::ShrL => "shrl",
            Self::ShrLU => "shrlu",
        }
    }
}

/// Comparison relations.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Comparison {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Comparison {
    /// The comparison with swapped operands (`a < b` ⇔ `b > a`).
    #[must_use]
    pub const fn swapped(self) -> Self {
        match self {
            Self::Eq => Self::Eq,
            Self::Ne => Self::Ne,
            Self::Lt => Self::Gt,
            Self::Le => Self::Ge,
            Self::Gt => Self::Lt,
            Self::Ge => Self::Le,
        }
    }

    /// The negated comparison.
    #[must_use]
    pub const fn negated(self) -> Self {
        match self {
            Self::Eq => Self::Ne,
            Self::Ne => Self::Eq,
            Self::Lt => Self::Ge,
            Self::Le => Self::Gt,
            Self::Gt => Self::Le,
            Self::Ge => Self::Lt,
        }
    }
}

impl Comparison {
    /// Mnemonic used in IR dumps.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Lt => "lt",
            Self::Le => "le",
            Self::Gt => "gt",
            Self::Ge => "ge",
        }
    }
}

/// Operand interpretation of a comparison.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CmpKind {
    Int,
    IntU,
    Long,
    LongU,
    Float,
    Single,
}

impl CmpKind {
    /// Mnemonic used in IR dumps.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Int => "cmp",
            Self::IntU => "cmpu",
            Self::Long => "cmpl",
            Self::LongU => "cmplu",
            Self::Float => "cmpf",
            Self::Single => "cmps",
        }
    }
}
