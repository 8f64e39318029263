use crate::byte_order::ByteOrder;
use crate::field::StrEncoding;
use crate::layout::RecordLayout;
use crate::primitive::PrimitiveKind;
use crate::result::{Error, Result};
use crate::union::{Discriminator, UnionMemberSpec};
use crate::value::{Value, ValueMap};
use crate::{codecs, union};

#[derive(Clone)]
pub enum FieldDescriptor {
    Primitive(PrimitiveKind),
    Str {
        byte_len: usize,
        encoding: StrEncoding,
    },
    Bytes {
        byte_len: usize,
    },
    Padding {
        byte_len: usize,
    },
    Array {
        element: Box<FieldDescriptor>,
        count: usize,
        filler: FillerPolicy,
        retain_fillers: bool,
    },
    Nested {
        layout: &'static RecordLayout,
    },
    Union {
        members: Vec<UnionMemberSpec>,
        discriminator: Discriminator,
        width: usize,
    },
    // `stem` is the computed-value provider's name (the outlet's own field
    // name with its `_outlet` suffix stripped).
    Outlet {
        kind: PrimitiveKind,
        stem: String,
    },
}

#[derive(Clone)]
pub enum FillerPolicy {
    None,
    Default,
    Value(Value),
    Custom,
}

impl FieldDescriptor {
    pub fn width(&self) -> usize {
        match self {
            FieldDescriptor::Primitive(kind) => kind.width(),
            FieldDescriptor::Str { byte_len, .. } => *byte_len,
            FieldDescriptor::Bytes { byte_len } => *byte_len,
            FieldDescriptor::Padding { byte_len } => *byte_len,
            FieldDescriptor::Array { element, count, .. } => element.width() * count,
            FieldDescriptor::Nested { layout } => layout.width(),
            FieldDescriptor::Union { width, .. } => *width,
            FieldDescriptor::Outlet { kind, .. } => kind.width(),
        }
    }

    pub(crate) fn alignment(&self) -> usize {
        match self {
            FieldDescriptor::Primitive(kind) => kind.alignment(),
            FieldDescriptor::Str { .. } | FieldDescriptor::Bytes { .. } | FieldDescriptor::Padding { .. } => 1,
            FieldDescriptor::Array { element, .. } => element.alignment(),
            FieldDescriptor::Nested { layout } => layout.alignment(),
            FieldDescriptor::Union { members, .. } => {
                members.iter().map(|m| m.layout.alignment()).max().unwrap_or(1)
            }
            FieldDescriptor::Outlet { kind, .. } => kind.alignment(),
        }
    }
}

pub(crate) fn pack_values(layout: &RecordLayout, values: &ValueMap) -> Result<Vec<u8>> {
    let order = layout.byte_order();
    let mut out = Vec::with_capacity(layout.width());
    for field in layout.fields() {
        match field.descriptor() {
            FieldDescriptor::Padding { byte_len } => out.extend(std::iter::repeat(0u8).take(*byte_len)),
            FieldDescriptor::Outlet { kind, stem } => {
                let value = values.get(stem.as_str()).ok_or(Error::KindValueMismatch)?;
                codecs::write_primitive(*kind, order, value, &mut out)?;
            }
            desc => {
                let value = values.get(field.name()).ok_or(Error::KindValueMismatch)?;
                encode_value(desc, value, order, &mut out)?;
            }
        }
    }
    Ok(out)
}

// Excludes `Padding` and `Outlet` entries from the result.
pub(crate) fn unpack_values(layout: &RecordLayout, bytes: &[u8]) -> Result<ValueMap> {
    if bytes.len() != layout.width() {
        return Err(Error::LengthMismatch {
            expected: layout.width(),
            actual: bytes.len(),
        });
    }
    let mut cursor = bytes;
    let mut values = ValueMap::new();
    for field in layout.fields() {
        let desc = field.descriptor();
        match desc {
            FieldDescriptor::Padding { .. } | FieldDescriptor::Outlet { .. } => {
                let width = desc.width();
                cursor = &cursor[width..];
            }
            _ => {
                let value = decode_value(desc, layout.byte_order(), &mut cursor)?;
                values.insert(field.name().to_string(), value);
            }
        }
    }
    Ok(values)
}

fn encode_value(desc: &FieldDescriptor, value: &Value, order: ByteOrder, out: &mut Vec<u8>) -> Result<()> {
    match desc {
        FieldDescriptor::Primitive(kind) => codecs::write_primitive(*kind, order, value, out)?,
        FieldDescriptor::Str { byte_len, encoding } => {
            let Value::Str(s) = value else {
                return Err(Error::KindValueMismatch);
            };
            if *encoding == StrEncoding::Ascii && !s.is_ascii() {
                return Err(Error::NonAsciiString(s.clone()));
            }
            // Overflow truncates silently rather than erroring.
            let mut bytes = s.as_bytes().to_vec();
            bytes.truncate(*byte_len);
            codecs::write_fixed(&bytes, *byte_len, out)?;
        }
        FieldDescriptor::Bytes { byte_len } => {
            let Value::Bytes(b) = value else {
                return Err(Error::KindValueMismatch);
            };
            if b.len() > *byte_len {
                return Err(Error::BytesOverflow {
                    actual: b.len(),
                    max: *byte_len,
                });
            }
            codecs::write_fixed(b, *byte_len, out)?;
        }
        FieldDescriptor::Array { element, count, filler, .. } => {
            let Value::Array(items) = value else {
                return Err(Error::KindValueMismatch);
            };
            let mut items = items.clone();
            if items.len() > *count {
                return Err(Error::ArrayOverflow {
                    actual: items.len(),
                    max: *count,
                });
            }
            if items.len() < *count {
                let missing = *count - items.len();
                match filler {
                    FillerPolicy::None | FillerPolicy::Custom => {
                        return Err(Error::ArrayUnderflow {
                            actual: items.len(),
                            min: *count,
                        })
                    }
                    FillerPolicy::Default => {
                        let zero = default_value(element);
                        items.extend(std::iter::repeat(zero).take(missing));
                    }
                    FillerPolicy::Value(v) => items.extend(std::iter::repeat(v.clone()).take(missing)),
                }
            }
            for item in &items {
                encode_value(element, item, order, out)?;
            }
        }
        FieldDescriptor::Nested { layout } => {
            let Value::Nested(map) = value else {
                return Err(Error::KindValueMismatch);
            };
            out.extend_from_slice(&pack_values(layout, map)?);
        }
        FieldDescriptor::Union { members, width, .. } => {
            let Value::Union { member, values } = value else {
                return Err(Error::KindValueMismatch);
            };
            let spec = members.get(*member).ok_or(Error::KindValueMismatch)?;
            let mut bytes = pack_values(spec.layout, values)?;
            if bytes.len() < *width {
                bytes.resize(*width, 0);
            }
            out.extend_from_slice(&bytes);
        }
        FieldDescriptor::Padding { .. } | FieldDescriptor::Outlet { .. } => {
            unreachable!("Padding/Outlet cannot occur as an array element or nested value")
        }
    }
    Ok(())
}

fn decode_value(desc: &FieldDescriptor, order: ByteOrder, cursor: &mut &[u8]) -> Result<Value> {
    match desc {
        FieldDescriptor::Primitive(kind) => {
            let width = kind.width();
            let (raw, rest) = cursor.split_at(width);
            *cursor = rest;
            let mut reader = raw;
            codecs::read_primitive(*kind, order, &mut reader)
        }
        FieldDescriptor::Str { byte_len, encoding } => {
            let (raw, rest) = cursor.split_at(*byte_len);
            *cursor = rest;
            let trimmed = match raw.iter().position(|&b| b == 0) {
                Some(i) => &raw[..i],
                None => raw,
            };
            let s = String::from_utf8(trimmed.to_vec())?;
            if *encoding == StrEncoding::Ascii && !s.is_ascii() {
                return Err(Error::NonAsciiString(s));
            }
            Ok(Value::Str(s))
        }
        FieldDescriptor::Bytes { byte_len } => {
            let (raw, rest) = cursor.split_at(*byte_len);
            *cursor = rest;
            Ok(Value::Bytes(raw.to_vec()))
        }
        FieldDescriptor::Array {
            element,
            count,
            filler,
            retain_fillers,
        } => {
            let mut items = Vec::with_capacity(*count);
            for _ in 0..*count {
                items.push(decode_value(element, order, cursor)?);
            }
            if !retain_fillers {
                trim_trailing_fillers(&mut items, element, filler);
            }
            Ok(Value::Array(items))
        }
        FieldDescriptor::Nested { layout } => {
            let width = layout.width();
            let (raw, rest) = cursor.split_at(width);
            *cursor = rest;
            Ok(Value::Nested(unpack_values(layout, raw)?))
        }
        FieldDescriptor::Union {
            members,
            discriminator,
            width,
        } => {
            let (raw, rest) = cursor.split_at(*width);
            *cursor = rest;
            union::unpack_union(members, discriminator, raw)
        }
        FieldDescriptor::Padding { .. } | FieldDescriptor::Outlet { .. } => {
            unreachable!("Padding/Outlet cannot occur as an array element or nested value")
        }
    }
}

// Trims trailing elements equal to the configured filler value, leaving
// non-trailing fillers alone. `Custom` fillers have no fixed sentinel to
// compare against, so nothing is trimmed for them.
fn trim_trailing_fillers(items: &mut Vec<Value>, element: &FieldDescriptor, filler: &FillerPolicy) {
    let sentinel = match filler {
        FillerPolicy::None | FillerPolicy::Custom => return,
        FillerPolicy::Default => default_value(element),
        FillerPolicy::Value(v) => v.clone(),
    };
    while items.last() == Some(&sentinel) {
        items.pop();
    }
}

fn default_value(desc: &FieldDescriptor) -> Value {
    match desc {
        FieldDescriptor::Primitive(kind) => match kind {
            PrimitiveKind::Bool => Value::Bool(false),
            PrimitiveKind::Char => Value::Char('\0'),
            PrimitiveKind::F32 | PrimitiveKind::F64 => Value::Float(0.0),
            _ => Value::Int(0),
        },
        FieldDescriptor::Str { .. } => Value::Str(String::new()),
        FieldDescriptor::Bytes { byte_len } => Value::Bytes(vec![0; *byte_len]),
        FieldDescriptor::Array { element, count, .. } => {
            Value::Array(vec![default_value(element); *count])
        }
        FieldDescriptor::Nested { layout } => Value::Nested(
            layout
                .fields()
                .iter()
                .map(|f| (f.name().to_string(), default_value(f.descriptor())))
                .collect(),
        ),
        FieldDescriptor::Union { members, .. } => match members.first() {
            Some(first) => Value::Union {
                member: 0,
                values: first
                    .layout
                    .fields()
                    .iter()
                    .map(|f| (f.name().to_string(), default_value(f.descriptor())))
                    .collect(),
            },
            None => Value::Bytes(Vec::new()),
        },
        FieldDescriptor::Padding { .. } | FieldDescriptor::Outlet { .. } => {
            unreachable!("Padding/Outlet cannot occur as an array element")
        }
    }
}
