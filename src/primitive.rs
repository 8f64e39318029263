use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
    Bool,
    Char,
}

impl PrimitiveKind {
    // Inclusive bounds for integer kinds; `None` for non-integer kinds.
    pub(crate) const fn integer_bounds(self) -> Option<(i128, i128)> {
        match self {
            PrimitiveKind::U8 => Some((u8::MIN as i128, u8::MAX as i128)),
            PrimitiveKind::U16 => Some((u16::MIN as i128, u16::MAX as i128)),
            PrimitiveKind::U32 => Some((u32::MIN as i128, u32::MAX as i128)),
            PrimitiveKind::U64 => Some((u64::MIN as i128, u64::MAX as i128)),
            PrimitiveKind::I8 => Some((i8::MIN as i128, i8::MAX as i128)),
            PrimitiveKind::I16 => Some((i16::MIN as i128, i16::MAX as i128)),
            PrimitiveKind::I32 => Some((i32::MIN as i128, i32::MAX as i128)),
            PrimitiveKind::I64 => Some((i64::MIN as i128, i64::MAX as i128)),
            PrimitiveKind::F32
            | PrimitiveKind::F64
            | PrimitiveKind::Bool
            | PrimitiveKind::Char => None,
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PrimitiveKind::U8 => "u8",
            PrimitiveKind::U16 => "u16",
            PrimitiveKind::U32 => "u32",
            PrimitiveKind::U64 => "u64",
            PrimitiveKind::I8 => "i8",
            PrimitiveKind::I16 => "i16",
            PrimitiveKind::I32 => "i32",
            PrimitiveKind::I64 => "i64",
            PrimitiveKind::F32 => "f32",
            PrimitiveKind::F64 => "f64",
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::Char => "char",
        };
        f.write_str(name)
    }
}
