use std::fmt;

use crate::descriptor;
use crate::layout::RecordLayout;
use crate::result::{Result, ValidationError};
use crate::value::ValueMap;

// A computed (`Outlet`) field is dumped under its unadorned name, not its
// `_outlet`-suffixed field name.
pub trait RecordValues {
    fn dump(&self) -> ValueMap;
}

pub trait FromValues: Sized {
    fn validate(values: ValueMap) -> std::result::Result<Self, ValidationError>;
}

pub trait Record: RecordValues + FromValues + fmt::Debug {
    fn record_layout() -> &'static RecordLayout;
}

pub fn pack<T: Record>(instance: &T) -> Result<Vec<u8>> {
    let layout = T::record_layout();
    let values = instance.dump();
    descriptor::pack_values(layout, &values)
}

pub fn unpack<T: Record>(bytes: &[u8]) -> Result<T> {
    let layout = T::record_layout();
    let values = descriptor::unpack_values(layout, bytes)?;
    T::validate(values).map_err(crate::result::Error::Validation)
}

pub fn total_width<T: Record>() -> usize {
    T::record_layout().width()
}
