use crate::descriptor;
use crate::layout::RecordLayout;
use crate::result::{Error, Result};
use crate::value::{Value, ValueMap};

pub struct UnionMemberSpec {
    pub name: &'static str,
    pub layout: &'static RecordLayout,
    validate: fn(ValueMap) -> Result<ValueMap>,
}

impl std::fmt::Debug for UnionMemberSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnionMemberSpec").field("name", &self.name).finish()
    }
}

impl Clone for UnionMemberSpec {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            layout: self.layout,
            validate: self.validate,
        }
    }
}

impl UnionMemberSpec {
    // Adapts `T::validate` to return the canonical dictionary on success
    // rather than the instance itself, since that dictionary is what the
    // enclosing record's value map stores under this union field's name.
    pub fn new<T>(name: &'static str) -> Self
    where
        T: crate::record::Record,
    {
        Self {
            name,
            layout: T::record_layout(),
            validate: |values| {
                let instance = T::validate(values).map_err(Error::Validation)?;
                Ok(instance.dump())
            },
        }
    }
}

#[derive(Debug, Clone)]
pub enum Discriminator {
    LeftToRight,
    ByField(&'static str),
}

// `region` holds exactly the union field's `width` bytes. Bytes beyond a
// given member's own width within that region are never inspected for
// that member.
pub(crate) fn unpack_union(
    members: &[UnionMemberSpec],
    discriminator: &Discriminator,
    region: &[u8],
) -> Result<Value> {
    match discriminator {
        Discriminator::LeftToRight => try_members(members, region, None),
        Discriminator::ByField(field) => try_members(members, region, Some(field)),
    }
}

fn try_members(members: &[UnionMemberSpec], region: &[u8], discriminator_field: Option<&str>) -> Result<Value> {
    let mut errors = Vec::with_capacity(members.len());
    for (index, member) in members.iter().enumerate() {
        let width = member.layout.width();
        if width > region.len() {
            errors.push(format!("{}: union region too short ({} < {})", member.name, region.len(), width));
            continue;
        }
        let slice = &region[..width];
        let raw = match descriptor::unpack_values(member.layout, slice) {
            Ok(raw) => raw,
            Err(e) => {
                errors.push(format!("{}: structural unpack failed: {e}", member.name));
                continue;
            }
        };
        if let Some(field) = discriminator_field {
            if !raw.contains_key(field) {
                errors.push(format!("{}: missing discriminator field `{field}`", member.name));
                continue;
            }
        }
        match (member.validate)(raw) {
            Ok(values) => return Ok(Value::Union { member: index, values }),
            Err(e) => errors.push(format!("{}: validation failed: {e}", member.name)),
        }
    }
    Err(Error::UnionNoMatch(errors))
}
