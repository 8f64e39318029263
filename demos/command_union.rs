//! A standalone usage demo for a by-field-discriminated union of two
//! differently-sized command payloads — run with
//! `cargo run --example command_union`.

use std::sync::OnceLock;

use derive_getters::Getters;
use flatrec::{
    pack, unpack, ByteOrder, Discriminator, FieldShape, FieldSpec, FromValues, PrimitiveKind,
    Record, RecordLayout, RecordValues, UnionMemberSpec, ValidationError, Value, ValueMap,
};

const SET_SPEED_TAG: u8 = 4;
const SET_HEADING_TAG: u8 = 5;

/// `tag=4`, then a u64 and a trim byte. Ten bytes wide.
#[derive(Debug, Getters)]
struct SetSpeed {
    speed: u64,
    trim: i8,
}

impl RecordValues for SetSpeed {
    fn dump(&self) -> ValueMap {
        ValueMap::from([
            ("tag".to_string(), Value::from(SET_SPEED_TAG)),
            ("speed".to_string(), Value::from(self.speed)),
            ("trim".to_string(), Value::from(self.trim)),
        ])
    }
}

impl FromValues for SetSpeed {
    fn validate(values: ValueMap) -> Result<Self, ValidationError> {
        let tag = values["tag"].as_int().unwrap() as u8;
        if tag != SET_SPEED_TAG {
            return Err(format!("tag {tag} is not SetSpeed's literal {SET_SPEED_TAG}").into());
        }
        Ok(SetSpeed {
            speed: values["speed"].as_int().unwrap() as u64,
            trim: values["trim"].as_int().unwrap() as i8,
        })
    }
}

impl Record for SetSpeed {
    fn record_layout() -> &'static RecordLayout {
        static LAYOUT: OnceLock<RecordLayout> = OnceLock::new();
        LAYOUT.get_or_init(|| {
            RecordLayout::compile(
                vec![
                    FieldSpec::new("tag", FieldShape::Primitive(PrimitiveKind::U8)),
                    FieldSpec::new("speed", FieldShape::Primitive(PrimitiveKind::U64)),
                    FieldSpec::new("trim", FieldShape::Primitive(PrimitiveKind::I8)),
                ],
                ByteOrder::BigEndian,
            )
            .expect("SetSpeed layout compiles")
        })
    }
}

/// `tag=5`, then a trim byte, a u64, and a one-byte reason code. Eleven
/// bytes wide — one more than [`SetSpeed`], so the union region is padded
/// with a trailing zero whenever a `SetSpeed` is packed.
#[derive(Debug, Getters)]
struct SetHeading {
    trim: i8,
    heading: u64,
    reason: u8,
}

impl RecordValues for SetHeading {
    fn dump(&self) -> ValueMap {
        ValueMap::from([
            ("tag".to_string(), Value::from(SET_HEADING_TAG)),
            ("trim".to_string(), Value::from(self.trim)),
            ("heading".to_string(), Value::from(self.heading)),
            ("reason".to_string(), Value::from(self.reason)),
        ])
    }
}

impl FromValues for SetHeading {
    fn validate(values: ValueMap) -> Result<Self, ValidationError> {
        let tag = values["tag"].as_int().unwrap() as u8;
        if tag != SET_HEADING_TAG {
            return Err(format!("tag {tag} is not SetHeading's literal {SET_HEADING_TAG}").into());
        }
        Ok(SetHeading {
            trim: values["trim"].as_int().unwrap() as i8,
            heading: values["heading"].as_int().unwrap() as u64,
            reason: values["reason"].as_int().unwrap() as u8,
        })
    }
}

impl Record for SetHeading {
    fn record_layout() -> &'static RecordLayout {
        static LAYOUT: OnceLock<RecordLayout> = OnceLock::new();
        LAYOUT.get_or_init(|| {
            RecordLayout::compile(
                vec![
                    FieldSpec::new("tag", FieldShape::Primitive(PrimitiveKind::U8)),
                    FieldSpec::new("trim", FieldShape::Primitive(PrimitiveKind::I8)),
                    FieldSpec::new("heading", FieldShape::Primitive(PrimitiveKind::U64)),
                    FieldSpec::new("reason", FieldShape::Primitive(PrimitiveKind::U8)),
                ],
                ByteOrder::BigEndian,
            )
            .expect("SetHeading layout compiles")
        })
    }
}

/// The wire frame: a single field whose whole body is the union. No
/// fields of its own sit alongside it, so `Command`'s dump is just the
/// union entry under `payload`.
#[derive(Debug)]
enum Command {
    SetSpeed(SetSpeed),
    SetHeading(SetHeading),
}

impl RecordValues for Command {
    fn dump(&self) -> ValueMap {
        let (member, values) = match self {
            Command::SetSpeed(s) => (0, s.dump()),
            Command::SetHeading(h) => (1, h.dump()),
        };
        ValueMap::from([("payload".to_string(), Value::Union { member, values })])
    }
}

impl FromValues for Command {
    fn validate(mut values: ValueMap) -> Result<Self, ValidationError> {
        match values.remove("payload") {
            Some(Value::Union { member: 0, values }) => Ok(Command::SetSpeed(SetSpeed::validate(values)?)),
            Some(Value::Union { member: 1, values }) => Ok(Command::SetHeading(SetHeading::validate(values)?)),
            Some(Value::Union { member, .. }) => Err(format!("unknown union member index {member}").into()),
            _ => Err("missing payload field".into()),
        }
    }
}

impl Record for Command {
    fn record_layout() -> &'static RecordLayout {
        static LAYOUT: OnceLock<RecordLayout> = OnceLock::new();
        LAYOUT.get_or_init(|| {
            RecordLayout::compile(
                vec![FieldSpec::new(
                    "payload",
                    FieldShape::Union {
                        members: vec![
                            UnionMemberSpec::new::<SetSpeed>("SetSpeed"),
                            UnionMemberSpec::new::<SetHeading>("SetHeading"),
                        ],
                        discriminator: Discriminator::ByField("tag"),
                    },
                )],
                ByteOrder::BigEndian,
            )
            .expect("Command layout compiles")
        })
    }
}

fn main() {
    let layout = Command::record_layout();
    println!("{}", layout.describe());
    assert_eq!(layout.width(), 11, "union width is max(SetSpeed=10, SetHeading=11)");

    let speed = Command::SetSpeed(SetSpeed { speed: 42, trim: -3 });
    let bytes = pack(&speed).expect("pack SetSpeed");
    println!("SetSpeed packed: {bytes:02x?}");
    assert_eq!(bytes[0], SET_SPEED_TAG);
    assert_eq!(bytes.len(), 11);
    assert_eq!(*bytes.last().unwrap(), 0, "SetSpeed is right-padded to the union width");

    let back = unpack::<Command>(&bytes).expect("unpack back to SetSpeed");
    match back {
        Command::SetSpeed(s) => assert_eq!(s.speed(), &42),
        Command::SetHeading(_) => unreachable!("tag byte selects SetSpeed"),
    }

    let heading = Command::SetHeading(SetHeading {
        trim: 1,
        heading: 180,
        reason: 9,
    });
    let bytes = pack(&heading).expect("pack SetHeading");
    println!("SetHeading packed: {bytes:02x?}");
    let back = unpack::<Command>(&bytes).expect("unpack back to SetHeading");
    match back {
        Command::SetHeading(h) => assert_eq!(h.heading(), &180),
        Command::SetSpeed(_) => unreachable!("tag byte selects SetHeading"),
    }
}
