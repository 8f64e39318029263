use std::collections::HashSet;

use crate::byte_order::ByteOrder;
use crate::descriptor::{FieldDescriptor, FillerPolicy};
use crate::field::{FieldShape, FieldSpec, FillerSpec};
use crate::result::{Error, Result};
use crate::utils::align_to;

#[derive(Clone)]
pub struct CompiledField {
    name: &'static str,
    descriptor: FieldDescriptor,
    offset: usize,
}

impl CompiledField {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn descriptor(&self) -> &FieldDescriptor {
        &self.descriptor
    }

    pub fn offset(&self) -> usize {
        self.offset
    }
}

pub struct RecordLayout {
    fields: Vec<CompiledField>,
    width: usize,
    byte_order: ByteOrder,
    alignment: usize,
}

impl RecordLayout {
    // `declared` is already flattened base-then-derived — a collaborator
    // composes this by chaining its base types' field lists ahead of its
    // own. Names beginning with `_` are dropped as private.
    pub fn compile(declared: Vec<FieldSpec>, byte_order: ByteOrder) -> Result<RecordLayout> {
        let mut seen = HashSet::new();
        let mut fields = Vec::with_capacity(declared.len());
        let mut offset = 0usize;
        let mut struct_alignment = 1usize;

        for spec in declared {
            if spec.name.starts_with('_') {
                continue;
            }
            if !seen.insert(spec.name) {
                return Err(Error::DuplicateField(spec.name));
            }

            let descriptor = resolve_shape(spec.name, &spec.shape)?;
            let field_alignment = if byte_order.aligns() { descriptor.alignment() } else { 1 };
            struct_alignment = struct_alignment.max(field_alignment);

            if byte_order.aligns() {
                let aligned = align_to(offset, field_alignment);
                if aligned > offset {
                    let pad = aligned - offset;
                    fields.push(CompiledField {
                        name: "",
                        descriptor: FieldDescriptor::Padding { byte_len: pad },
                        offset,
                    });
                    offset = aligned;
                }
            }

            fields.push(CompiledField {
                name: spec.name,
                offset,
                descriptor,
            });
            offset += fields.last().unwrap().descriptor.width();
        }

        if byte_order.aligns() {
            let aligned = align_to(offset, struct_alignment);
            if aligned > offset {
                let pad = aligned - offset;
                fields.push(CompiledField {
                    name: "",
                    descriptor: FieldDescriptor::Padding { byte_len: pad },
                    offset,
                });
                offset = aligned;
            }
        }

        Ok(RecordLayout {
            fields,
            width: offset,
            byte_order,
            alignment: struct_alignment,
        })
    }

    pub fn fields(&self) -> &[CompiledField] {
        &self.fields
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    pub(crate) fn alignment(&self) -> usize {
        self.alignment
    }

    pub fn describe(&self) -> String {
        let mut out = format!("record: {} bytes, {:?}\n", self.width, self.byte_order);
        for field in &self.fields {
            let label = if field.name.is_empty() { "<padding>" } else { field.name };
            out.push_str(&format!(
                "  [{:>4}..{:<4}] {}\n",
                field.offset,
                field.offset + field.descriptor.width(),
                label
            ));
        }
        out
    }
}

fn resolve_shape(name: &'static str, shape: &FieldShape) -> Result<FieldDescriptor> {
    match shape {
        FieldShape::Primitive(kind) => Ok(FieldDescriptor::Primitive(*kind)),
        FieldShape::Str { byte_len, encoding } => {
            let byte_len = byte_len.ok_or(Error::MissingLength(name))?;
            Ok(FieldDescriptor::Str {
                byte_len,
                encoding: *encoding,
            })
        }
        FieldShape::Bytes { byte_len } => {
            let byte_len = byte_len.ok_or(Error::MissingLength(name))?;
            Ok(FieldDescriptor::Bytes { byte_len })
        }
        FieldShape::Padding { byte_len } => {
            let byte_len = byte_len.ok_or(Error::MissingLength(name))?;
            if byte_len == 0 {
                return Err(Error::ZeroLengthPadding(name));
            }
            Ok(FieldDescriptor::Padding { byte_len })
        }
        FieldShape::Array {
            element,
            count,
            filler,
            retain_fillers,
        } => {
            let count = count.ok_or(Error::MissingLength(name))?;
            let element_desc = resolve_shape(name, element)?;
            if matches!(
                element_desc,
                FieldDescriptor::Padding { .. } | FieldDescriptor::Outlet { .. }
            ) {
                return Err(Error::UnknownKind(name));
            }
            let filler = match filler {
                None => FillerPolicy::None,
                Some(FillerSpec::Default) => FillerPolicy::Default,
                Some(FillerSpec::Value(v)) => FillerPolicy::Value(v.clone()),
                Some(FillerSpec::Custom) => FillerPolicy::Custom,
            };
            Ok(FieldDescriptor::Array {
                element: Box::new(element_desc),
                count,
                filler,
                retain_fillers: *retain_fillers,
            })
        }
        FieldShape::Nested(layout) => Ok(FieldDescriptor::Nested { layout }),
        FieldShape::Union { members, discriminator } => {
            if members.is_empty() {
                return Err(Error::UnknownKind(name));
            }
            let width = members.iter().map(|m| m.layout.width()).max().unwrap_or(0);
            Ok(FieldDescriptor::Union {
                members: members.clone(),
                discriminator: discriminator.clone(),
                width,
            })
        }
        FieldShape::Outlet { primitive } => {
            let stem = name
                .strip_suffix("_outlet")
                .ok_or(Error::OutletMismatch { field: name, stem: name })?;
            Ok(FieldDescriptor::Outlet {
                kind: *primitive,
                stem: stem.to_string(),
            })
        }
    }
}
