use std::io::{self, Read, Write};

use declio::{Decode, Encode};

use crate::byte_order::ByteOrder;
use crate::primitive::PrimitiveKind;
use crate::result::{Error, Result};
use crate::value::Value;

impl PrimitiveKind {
    pub const fn width(self) -> usize {
        match self {
            PrimitiveKind::U8 | PrimitiveKind::I8 | PrimitiveKind::Bool | PrimitiveKind::Char => 1,
            PrimitiveKind::U16 | PrimitiveKind::I16 => 2,
            PrimitiveKind::U32 | PrimitiveKind::I32 | PrimitiveKind::F32 => 4,
            PrimitiveKind::U64 | PrimitiveKind::I64 | PrimitiveKind::F64 => 8,
        }
    }

    pub(crate) const fn alignment(self) -> usize {
        self.width()
    }
}

pub(crate) fn write_primitive<W: Write>(
    kind: PrimitiveKind,
    order: ByteOrder,
    value: &Value,
    out: &mut W,
) -> Result<()> {
    let endian = order.declio_endian();
    match kind {
        PrimitiveKind::Bool => {
            let v = matches!(value, Value::Bool(true));
            let byte: u8 = if v { 0x01 } else { 0x00 };
            byte.encode((), out)?;
        }
        PrimitiveKind::Char => {
            let Value::Char(c) = value else {
                return Err(Error::KindValueMismatch);
            };
            let mut buf = [0u8; 4];
            let encoded = c.encode_utf8(&mut buf);
            if encoded.len() != 1 {
                return Err(Error::CharEncoding(*c));
            }
            buf[0].encode((), out)?;
        }
        PrimitiveKind::F32 => {
            let v = value.as_float().ok_or(Error::KindValueMismatch)? as f32;
            v.to_bits().encode(endian, out)?;
        }
        PrimitiveKind::F64 => {
            let v = value.as_float().ok_or(Error::KindValueMismatch)?;
            v.to_bits().encode(endian, out)?;
        }
        _ => {
            let raw = value.as_int().ok_or(Error::KindValueMismatch)?;
            let (lo, hi) = kind.integer_bounds().expect("integer kind has bounds");
            if raw < lo || raw > hi {
                return Err(Error::IntegerRange { kind, value: raw });
            }
            write_integer(kind, raw, endian, out)?;
        }
    }
    Ok(())
}

fn write_integer<W: Write>(
    kind: PrimitiveKind,
    raw: i128,
    endian: declio::ctx::Endian,
    out: &mut W,
) -> Result<()> {
    match kind {
        PrimitiveKind::U8 => (raw as u8).encode(endian, out)?,
        PrimitiveKind::U16 => (raw as u16).encode(endian, out)?,
        PrimitiveKind::U32 => (raw as u32).encode(endian, out)?,
        PrimitiveKind::U64 => (raw as u64).encode(endian, out)?,
        PrimitiveKind::I8 => (raw as i8).encode(endian, out)?,
        PrimitiveKind::I16 => (raw as i16).encode(endian, out)?,
        PrimitiveKind::I32 => (raw as i32).encode(endian, out)?,
        PrimitiveKind::I64 => (raw as i64).encode(endian, out)?,
        PrimitiveKind::F32 | PrimitiveKind::F64 | PrimitiveKind::Bool | PrimitiveKind::Char => {
            unreachable!("non-integer kind routed through write_integer")
        }
    }
    Ok(())
}

pub(crate) fn read_primitive<R: Read>(
    kind: PrimitiveKind,
    order: ByteOrder,
    input: &mut R,
) -> Result<Value> {
    let endian = order.declio_endian();
    let value = match kind {
        PrimitiveKind::U8 => Value::Int(u8::decode(endian, input)? as i128),
        PrimitiveKind::U16 => Value::Int(u16::decode(endian, input)? as i128),
        PrimitiveKind::U32 => Value::Int(u32::decode(endian, input)? as i128),
        PrimitiveKind::U64 => Value::Int(u64::decode(endian, input)? as i128),
        PrimitiveKind::I8 => Value::Int(i8::decode(endian, input)? as i128),
        PrimitiveKind::I16 => Value::Int(i16::decode(endian, input)? as i128),
        PrimitiveKind::I32 => Value::Int(i32::decode(endian, input)? as i128),
        PrimitiveKind::I64 => Value::Int(i64::decode(endian, input)? as i128),
        PrimitiveKind::F32 => Value::Float(f32::from_bits(u32::decode(endian, input)?) as f64),
        PrimitiveKind::F64 => Value::Float(f64::from_bits(u64::decode(endian, input)?)),
        PrimitiveKind::Bool => Value::Bool(u8::decode((), input)? != 0),
        PrimitiveKind::Char => {
            let byte = u8::decode((), input)?;
            Value::Char(byte as char)
        }
    };
    Ok(value)
}

pub(crate) fn write_fixed<W: Write>(bytes: &[u8], len: usize, out: &mut W) -> io::Result<()> {
    out.write_all(bytes)?;
    if bytes.len() < len {
        let zeros = vec![0u8; len - bytes.len()];
        out.write_all(&zeros)?;
    }
    Ok(())
}

pub(crate) fn read_fixed<R: Read>(len: usize, input: &mut R) -> io::Result<Vec<u8>> {
    let mut buf = vec![0u8; len];
    input.read_exact(&mut buf)?;
    Ok(buf)
}
