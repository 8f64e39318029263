use crate::layout::RecordLayout;
use crate::primitive::PrimitiveKind;
use crate::union::{Discriminator, UnionMemberSpec};

#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    pub shape: FieldShape,
}

impl FieldSpec {
    pub fn new(name: &'static str, shape: FieldShape) -> Self {
        Self { name, shape }
    }
}

#[derive(Debug, Clone)]
pub enum FieldShape {
    Primitive(PrimitiveKind),
    // `byte_len: None` is a compile-time `MissingLength` error.
    Str {
        byte_len: Option<usize>,
        encoding: StrEncoding,
    },
    Bytes {
        byte_len: Option<usize>,
    },
    Padding {
        byte_len: Option<usize>,
    },
    Array {
        element: Box<FieldShape>,
        count: Option<usize>,
        filler: Option<FillerSpec>,
        retain_fillers: bool,
    },
    Nested(&'static RecordLayout),
    Union {
        members: Vec<UnionMemberSpec>,
        discriminator: Discriminator,
    },
    // The field's own name (carried on the enclosing `FieldSpec`) must end
    // in `_outlet`; the compiler derives the computed-value stem from it
    // and uses that stem as the dictionary key at pack time.
    Outlet {
        primitive: PrimitiveKind,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrEncoding {
    #[default]
    Utf8,
    Ascii,
}

#[derive(Debug, Clone)]
pub enum FillerSpec {
    Default,
    Value(crate::value::Value),
    Custom,
}
