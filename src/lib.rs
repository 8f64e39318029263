mod byte_order;
mod codecs;
mod descriptor;
mod field;
mod layout;
mod primitive;
pub mod result;
mod record;
mod union;
mod value;

pub use byte_order::ByteOrder;
pub use field::{FieldShape, FieldSpec, FillerSpec, StrEncoding};
pub use layout::{CompiledField, RecordLayout};
pub use primitive::PrimitiveKind;
pub use record::{pack, total_width, unpack, FromValues, Record, RecordValues};
pub use result::{Error, Result, ValidationError};
pub use union::{Discriminator, UnionMemberSpec};
pub use value::{Value, ValueMap};
