//! End-to-end pack/unpack tests against the concrete scenarios seeded in
//! the codec's own scenario catalog (record types A through F), plus the
//! universal invariants they're meant to exercise.

use std::sync::OnceLock;

use assert_matches::assert_matches;
use flatrec::{
    pack, total_width, unpack, ByteOrder, Discriminator, Error, FieldShape, FieldSpec, FillerSpec,
    FromValues, PrimitiveKind, Record, RecordLayout, RecordValues, StrEncoding, UnionMemberSpec,
    Value, ValidationError, ValueMap,
};

// --- scenario A / B: primitive + fixed string -----------------------------

#[derive(Debug, PartialEq)]
struct Greeting {
    b: i8,
    c: String,
}

impl RecordValues for Greeting {
    fn dump(&self) -> ValueMap {
        ValueMap::from([
            ("a".to_string(), Value::from(0x56u32)),
            ("b".to_string(), Value::from(self.b)),
            ("c".to_string(), Value::from(self.c.clone())),
        ])
    }
}

impl FromValues for Greeting {
    fn validate(values: ValueMap) -> Result<Self, ValidationError> {
        Ok(Greeting {
            b: values["b"].as_int().unwrap() as i8,
            c: match &values["c"] {
                Value::Str(s) => s.clone(),
                _ => return Err("c did not decode to a string".into()),
            },
        })
    }
}

impl Record for Greeting {
    fn record_layout() -> &'static RecordLayout {
        static LAYOUT: OnceLock<RecordLayout> = OnceLock::new();
        LAYOUT.get_or_init(|| {
            RecordLayout::compile(
                vec![
                    FieldSpec::new("a", FieldShape::Primitive(PrimitiveKind::U32)),
                    FieldSpec::new("b", FieldShape::Primitive(PrimitiveKind::I8)),
                    FieldSpec::new(
                        "c",
                        FieldShape::Str {
                            byte_len: Some(8),
                            encoding: StrEncoding::Utf8,
                        },
                    ),
                ],
                ByteOrder::BigEndian,
            )
            .expect("Greeting layout compiles")
        })
    }
}

#[test]
fn scenario_a_pack_matches_the_seeded_byte_string() {
    assert_eq!(total_width::<Greeting>(), 13);
    let bytes = pack(&Greeting {
        b: 5,
        c: "Hello".to_string(),
    })
    .unwrap();
    assert_eq!(
        bytes,
        vec![0x00, 0x00, 0x00, 0x56, 0x05, b'H', b'e', b'l', b'l', b'o', 0x00, 0x00, 0x00]
    );
}

#[test]
fn scenario_b_roundtrips() {
    let original = Greeting {
        b: 5,
        c: "Hello".to_string(),
    };
    let bytes = pack(&original).unwrap();
    let back: Greeting = unpack(&bytes).unwrap();
    assert_eq!(back, original);
}

#[test]
fn string_overflow_truncates_silently() {
    // This core truncates on overflow rather than
    // raising, so a 9-byte value into an 8-byte field just loses its tail.
    let bytes = pack(&Greeting {
        b: 0,
        c: "overflowing".to_string(),
    })
    .unwrap();
    let back: Greeting = unpack(&bytes).unwrap();
    assert_eq!(back.c, "overflow");
}

// --- scenario C: padding ---------------------------------------------------

#[derive(Debug, PartialEq)]
struct Padded {
    x: u8,
    y: u8,
}

impl RecordValues for Padded {
    fn dump(&self) -> ValueMap {
        ValueMap::from([("x".to_string(), Value::from(self.x)), ("y".to_string(), Value::from(self.y))])
    }
}

impl FromValues for Padded {
    fn validate(values: ValueMap) -> Result<Self, ValidationError> {
        Ok(Padded {
            x: values["x"].as_int().unwrap() as u8,
            y: values["y"].as_int().unwrap() as u8,
        })
    }
}

impl Record for Padded {
    fn record_layout() -> &'static RecordLayout {
        static LAYOUT: OnceLock<RecordLayout> = OnceLock::new();
        LAYOUT.get_or_init(|| {
            RecordLayout::compile(
                vec![
                    FieldSpec::new("x", FieldShape::Primitive(PrimitiveKind::U8)),
                    FieldSpec::new("pad", FieldShape::Padding { byte_len: Some(10) }),
                    FieldSpec::new("y", FieldShape::Primitive(PrimitiveKind::U8)),
                ],
                ByteOrder::BigEndian,
            )
            .expect("Padded layout compiles")
        })
    }
}

#[test]
fn scenario_c_padding_is_zero_filled() {
    assert_eq!(total_width::<Padded>(), 12);
    let bytes = pack(&Padded { x: 1, y: 2 }).unwrap();
    let mut expected = vec![0x01];
    expected.extend(std::iter::repeat(0u8).take(10));
    expected.push(0x02);
    assert_eq!(bytes, expected);
}

#[test]
fn padding_transparency_extra_dict_keys_pack_identically() {
    // Two dumps that differ only in a key the schedule never reads (here,
    // an extra entry that isn't any declared field's name) must pack to
    // the same bytes — the packer only ever consults declared names.
    #[derive(Debug)]
    struct WithExtra(Padded, bool);
    impl RecordValues for WithExtra {
        fn dump(&self) -> ValueMap {
            let mut values = self.0.dump();
            if self.1 {
                values.insert("unused_key".to_string(), Value::Int(999));
            }
            values
        }
    }
    impl FromValues for WithExtra {
        fn validate(values: ValueMap) -> Result<Self, ValidationError> {
            Ok(WithExtra(Padded::validate(values)?, false))
        }
    }
    impl Record for WithExtra {
        fn record_layout() -> &'static RecordLayout {
            Padded::record_layout()
        }
    }

    let plain = pack(&WithExtra(Padded { x: 1, y: 2 }, false)).unwrap();
    let with_extra = pack(&WithExtra(Padded { x: 1, y: 2 }, true)).unwrap();
    assert_eq!(plain, with_extra);
}

// --- scenario D: array filler trim ----------------------------------------

#[derive(Debug, PartialEq)]
struct Samples {
    arr: Vec<u8>,
}

impl RecordValues for Samples {
    fn dump(&self) -> ValueMap {
        ValueMap::from([(
            "arr".to_string(),
            Value::Array(self.arr.iter().map(|&b| Value::from(b)).collect()),
        )])
    }
}

impl FromValues for Samples {
    fn validate(values: ValueMap) -> Result<Self, ValidationError> {
        Ok(Samples {
            arr: values["arr"].as_array().unwrap().iter().map(|v| v.as_int().unwrap() as u8).collect(),
        })
    }
}

impl Record for Samples {
    fn record_layout() -> &'static RecordLayout {
        static LAYOUT: OnceLock<RecordLayout> = OnceLock::new();
        LAYOUT.get_or_init(|| {
            RecordLayout::compile(
                vec![FieldSpec::new(
                    "arr",
                    FieldShape::Array {
                        element: Box::new(FieldShape::Primitive(PrimitiveKind::U8)),
                        count: Some(5),
                        filler: Some(FillerSpec::Default),
                        retain_fillers: false,
                    },
                )],
                ByteOrder::BigEndian,
            )
            .expect("Samples layout compiles")
        })
    }
}

#[test]
fn scenario_d_short_array_is_filled_and_packed() {
    let bytes = pack(&Samples { arr: vec![1, 2, 3] }).unwrap();
    assert_eq!(bytes, vec![1, 2, 3, 0, 0]);
}

#[test]
fn scenario_d_trailing_fillers_trim_but_interior_zeros_survive() {
    let trailing: Samples = unpack(&[1, 2, 3, 0, 0]).unwrap();
    assert_eq!(trailing.arr, vec![1, 2, 3]);

    let interior: Samples = unpack(&[1, 0, 2, 0, 0]).unwrap();
    assert_eq!(interior.arr, vec![1, 0, 2]);
}

#[test]
fn array_overflow_and_underflow_are_rejected() {
    #[derive(Debug)]
    struct Over(Vec<u8>);
    impl RecordValues for Over {
        fn dump(&self) -> ValueMap {
            ValueMap::from([("arr".to_string(), Value::Array(self.0.iter().map(|&b| Value::from(b)).collect()))])
        }
    }
    impl FromValues for Over {
        fn validate(values: ValueMap) -> Result<Self, ValidationError> {
            Ok(Over(values["arr"].as_array().unwrap().iter().map(|v| v.as_int().unwrap() as u8).collect()))
        }
    }
    impl Record for Over {
        fn record_layout() -> &'static RecordLayout {
            Samples::record_layout()
        }
    }

    let err = pack(&Over(vec![1, 2, 3, 4, 5, 6])).unwrap_err();
    assert_matches!(err, Error::ArrayOverflow { actual: 6, max: 5 });
}

#[test]
fn array_without_filler_rejects_short_input() {
    #[derive(Debug)]
    struct NoFill {
        arr: Vec<u8>,
    }
    impl RecordValues for NoFill {
        fn dump(&self) -> ValueMap {
            ValueMap::from([("arr".to_string(), Value::Array(self.arr.iter().map(|&b| Value::from(b)).collect()))])
        }
    }
    impl FromValues for NoFill {
        fn validate(values: ValueMap) -> Result<Self, ValidationError> {
            Ok(NoFill {
                arr: values["arr"].as_array().unwrap().iter().map(|v| v.as_int().unwrap() as u8).collect(),
            })
        }
    }
    impl Record for NoFill {
        fn record_layout() -> &'static RecordLayout {
            static LAYOUT: OnceLock<RecordLayout> = OnceLock::new();
            LAYOUT.get_or_init(|| {
                RecordLayout::compile(
                    vec![FieldSpec::new(
                        "arr",
                        FieldShape::Array {
                            element: Box::new(FieldShape::Primitive(PrimitiveKind::U8)),
                            count: Some(3),
                            filler: None,
                            retain_fillers: false,
                        },
                    )],
                    ByteOrder::BigEndian,
                )
                .expect("NoFill layout compiles")
            })
        }
    }

    let err = pack(&NoFill { arr: vec![1] }).unwrap_err();
    assert_matches!(err, Error::ArrayUnderflow { actual: 1, min: 3 });
}

// --- scenario E: by-field union discrimination ----------------------------

#[derive(Debug, PartialEq)]
struct VariantA {
    big: u64,
    small: i8,
}
impl RecordValues for VariantA {
    fn dump(&self) -> ValueMap {
        ValueMap::from([
            ("tag".to_string(), Value::from(4u8)),
            ("big".to_string(), Value::from(self.big)),
            ("small".to_string(), Value::from(self.small)),
        ])
    }
}
impl FromValues for VariantA {
    fn validate(values: ValueMap) -> Result<Self, ValidationError> {
        if values["tag"].as_int() != Some(4) {
            return Err("not VariantA's tag".into());
        }
        Ok(VariantA {
            big: values["big"].as_int().unwrap() as u64,
            small: values["small"].as_int().unwrap() as i8,
        })
    }
}
impl Record for VariantA {
    fn record_layout() -> &'static RecordLayout {
        static LAYOUT: OnceLock<RecordLayout> = OnceLock::new();
        LAYOUT.get_or_init(|| {
            RecordLayout::compile(
                vec![
                    FieldSpec::new("tag", FieldShape::Primitive(PrimitiveKind::U8)),
                    FieldSpec::new("big", FieldShape::Primitive(PrimitiveKind::U64)),
                    FieldSpec::new("small", FieldShape::Primitive(PrimitiveKind::I8)),
                ],
                ByteOrder::BigEndian,
            )
            .expect("VariantA layout compiles")
        })
    }
}

#[derive(Debug, PartialEq)]
struct VariantB {
    small: i8,
    big: u64,
}
impl RecordValues for VariantB {
    fn dump(&self) -> ValueMap {
        ValueMap::from([
            ("tag".to_string(), Value::from(5u8)),
            ("small".to_string(), Value::from(self.small)),
            ("big".to_string(), Value::from(self.big)),
        ])
    }
}
impl FromValues for VariantB {
    fn validate(values: ValueMap) -> Result<Self, ValidationError> {
        if values["tag"].as_int() != Some(5) {
            return Err("not VariantB's tag".into());
        }
        Ok(VariantB {
            small: values["small"].as_int().unwrap() as i8,
            big: values["big"].as_int().unwrap() as u64,
        })
    }
}
impl Record for VariantB {
    fn record_layout() -> &'static RecordLayout {
        static LAYOUT: OnceLock<RecordLayout> = OnceLock::new();
        LAYOUT.get_or_init(|| {
            RecordLayout::compile(
                vec![
                    FieldSpec::new("tag", FieldShape::Primitive(PrimitiveKind::U8)),
                    FieldSpec::new("small", FieldShape::Primitive(PrimitiveKind::I8)),
                    FieldSpec::new("big", FieldShape::Primitive(PrimitiveKind::U64)),
                ],
                ByteOrder::BigEndian,
            )
            .expect("VariantB layout compiles")
        })
    }
}

#[derive(Debug, PartialEq)]
enum Variant {
    A(VariantA),
    B(VariantB),
}
impl RecordValues for Variant {
    fn dump(&self) -> ValueMap {
        let (member, values) = match self {
            Variant::A(a) => (0, a.dump()),
            Variant::B(b) => (1, b.dump()),
        };
        ValueMap::from([("payload".to_string(), Value::Union { member, values })])
    }
}
impl FromValues for Variant {
    fn validate(mut values: ValueMap) -> Result<Self, ValidationError> {
        match values.remove("payload") {
            Some(Value::Union { member: 0, values }) => Ok(Variant::A(VariantA::validate(values)?)),
            Some(Value::Union { member: 1, values }) => Ok(Variant::B(VariantB::validate(values)?)),
            _ => Err("missing or unknown union payload".into()),
        }
    }
}
impl Record for Variant {
    fn record_layout() -> &'static RecordLayout {
        static LAYOUT: OnceLock<RecordLayout> = OnceLock::new();
        LAYOUT.get_or_init(|| {
            RecordLayout::compile(
                vec![FieldSpec::new(
                    "payload",
                    FieldShape::Union {
                        members: vec![
                            UnionMemberSpec::new::<VariantA>("VariantA"),
                            UnionMemberSpec::new::<VariantB>("VariantB"),
                        ],
                        discriminator: Discriminator::ByField("tag"),
                    },
                )],
                ByteOrder::BigEndian,
            )
            .expect("Variant layout compiles")
        })
    }
}

#[test]
fn scenario_e_union_width_is_the_max_member_width() {
    assert_eq!(total_width::<Variant>(), total_width::<VariantA>().max(total_width::<VariantB>()));
    assert_eq!(total_width::<VariantA>(), total_width::<VariantB>());
}

#[test]
fn scenario_e_packing_b_starts_with_its_tag_and_round_trips() {
    let instance = Variant::B(VariantB { small: -3, big: 7 });
    let bytes = pack(&instance).unwrap();
    assert_eq!(bytes[0], 5);
    let back: Variant = unpack(&bytes).unwrap();
    assert_eq!(back, instance);
}

#[test]
fn union_with_no_matching_member_reports_every_members_failure() {
    // Neither member's tag byte is 4 or 5, so both trials fail and the
    // accumulated per-member errors come back together.
    let bytes = [99u8; 10];
    let err = unpack::<Variant>(&bytes).unwrap_err();
    match err {
        Error::UnionNoMatch(messages) => assert_eq!(messages.len(), 2),
        other => panic!("expected UnionNoMatch, got {other:?}"),
    }
}

// --- nested records ----------------------------------------------------

#[derive(Debug, PartialEq)]
struct Inner {
    x: u8,
    y: u8,
}

impl RecordValues for Inner {
    fn dump(&self) -> ValueMap {
        ValueMap::from([("x".to_string(), Value::from(self.x)), ("y".to_string(), Value::from(self.y))])
    }
}

impl FromValues for Inner {
    fn validate(values: ValueMap) -> Result<Self, ValidationError> {
        Ok(Inner {
            x: values["x"].as_int().unwrap() as u8,
            y: values["y"].as_int().unwrap() as u8,
        })
    }
}

impl Record for Inner {
    fn record_layout() -> &'static RecordLayout {
        static LAYOUT: OnceLock<RecordLayout> = OnceLock::new();
        LAYOUT.get_or_init(|| {
            RecordLayout::compile(
                vec![
                    FieldSpec::new("x", FieldShape::Primitive(PrimitiveKind::U8)),
                    FieldSpec::new("y", FieldShape::Primitive(PrimitiveKind::U8)),
                ],
                ByteOrder::BigEndian,
            )
            .expect("Inner layout compiles")
        })
    }
}

#[derive(Debug, PartialEq)]
struct Outer {
    tag: u8,
    inner: Inner,
}

impl RecordValues for Outer {
    fn dump(&self) -> ValueMap {
        ValueMap::from([
            ("tag".to_string(), Value::from(self.tag)),
            ("inner".to_string(), Value::Nested(self.inner.dump())),
        ])
    }
}

impl FromValues for Outer {
    fn validate(values: ValueMap) -> Result<Self, ValidationError> {
        let tag = values["tag"].as_int().unwrap() as u8;
        let inner = match &values["inner"] {
            Value::Nested(map) => Inner::validate(map.clone())?,
            _ => return Err("inner did not decode to a nested record".into()),
        };
        Ok(Outer { tag, inner })
    }
}

impl Record for Outer {
    fn record_layout() -> &'static RecordLayout {
        static LAYOUT: OnceLock<RecordLayout> = OnceLock::new();
        LAYOUT.get_or_init(|| {
            RecordLayout::compile(
                vec![
                    FieldSpec::new("tag", FieldShape::Primitive(PrimitiveKind::U8)),
                    FieldSpec::new("inner", FieldShape::Nested(Inner::record_layout())),
                ],
                ByteOrder::BigEndian,
            )
            .expect("Outer layout compiles")
        })
    }
}

#[test]
fn nested_record_round_trips() {
    assert_eq!(total_width::<Outer>(), 1 + total_width::<Inner>());
    let original = Outer {
        tag: 9,
        inner: Inner { x: 1, y: 2 },
    };
    let bytes = pack(&original).unwrap();
    assert_eq!(bytes, vec![9, 1, 2]);
    let back: Outer = unpack(&bytes).unwrap();
    assert_eq!(back, original);
}

// --- universal invariants --------------------------------------------------

#[test]
fn unpack_length_precondition_raises_length_mismatch() {
    let err = unpack::<Padded>(&[0u8; 5]).unwrap_err();
    assert_matches!(err, Error::LengthMismatch { expected: 12, actual: 5 });
}

#[test]
fn integer_range_is_enforced_before_the_bytes_are_written() {
    // A field declared `U8` but handed a dictionary value outside 0..=255 —
    // the scenario where the surrounding data model hasn't range-checked
    // its own dump — is caught by the primitive codec table itself.
    #[derive(Debug)]
    struct Loose(i128);
    impl RecordValues for Loose {
        fn dump(&self) -> ValueMap {
            ValueMap::from([("n".to_string(), Value::Int(self.0))])
        }
    }
    impl FromValues for Loose {
        fn validate(values: ValueMap) -> Result<Self, ValidationError> {
            Ok(Loose(values["n"].as_int().unwrap()))
        }
    }
    impl Record for Loose {
        fn record_layout() -> &'static RecordLayout {
            static LAYOUT: OnceLock<RecordLayout> = OnceLock::new();
            LAYOUT.get_or_init(|| {
                RecordLayout::compile(
                    vec![FieldSpec::new("n", FieldShape::Primitive(PrimitiveKind::U8))],
                    ByteOrder::BigEndian,
                )
                .expect("Loose layout compiles")
            })
        }
    }

    let err = pack(&Loose(278)).unwrap_err();
    assert_matches!(err, Error::IntegerRange { value: 278, .. });
}

#[test]
fn bool_decodes_any_nonzero_byte_as_true() {
    #[derive(Debug, PartialEq)]
    struct Flag(bool);
    impl RecordValues for Flag {
        fn dump(&self) -> ValueMap {
            ValueMap::from([("f".to_string(), Value::Bool(self.0))])
        }
    }
    impl FromValues for Flag {
        fn validate(values: ValueMap) -> Result<Self, ValidationError> {
            Ok(Flag(matches!(values["f"], Value::Bool(true))))
        }
    }
    impl Record for Flag {
        fn record_layout() -> &'static RecordLayout {
            static LAYOUT: OnceLock<RecordLayout> = OnceLock::new();
            LAYOUT.get_or_init(|| {
                RecordLayout::compile(
                    vec![FieldSpec::new("f", FieldShape::Primitive(PrimitiveKind::Bool))],
                    ByteOrder::BigEndian,
                )
                .expect("Flag layout compiles")
            })
        }
    }

    let back: Flag = unpack(&[0x7f]).unwrap();
    assert_eq!(back, Flag(true));
    let back: Flag = unpack(&[0x00]).unwrap();
    assert_eq!(back, Flag(false));
}

macro_rules! word_record {
    ($name:ident, $order:expr) => {
        #[derive(Debug)]
        struct $name(u32);
        impl RecordValues for $name {
            fn dump(&self) -> ValueMap {
                ValueMap::from([("w".to_string(), Value::from(self.0))])
            }
        }
        impl FromValues for $name {
            fn validate(values: ValueMap) -> Result<Self, ValidationError> {
                Ok($name(values["w"].as_int().unwrap() as u32))
            }
        }
        impl Record for $name {
            fn record_layout() -> &'static RecordLayout {
                static LAYOUT: OnceLock<RecordLayout> = OnceLock::new();
                LAYOUT.get_or_init(|| {
                    RecordLayout::compile(
                        vec![FieldSpec::new("w", FieldShape::Primitive(PrimitiveKind::U32))],
                        $order,
                    )
                    .expect(concat!(stringify!($name), " layout compiles"))
                })
            }
        }
    };
}

word_record!(WordBE, ByteOrder::BigEndian);
word_record!(WordLE, ByteOrder::LittleEndian);

#[test]
fn little_endian_and_big_endian_disagree_on_multi_byte_order() {
    let be = pack(&WordBE(0x01020304)).unwrap();
    let le = pack(&WordLE(0x01020304)).unwrap();
    assert_eq!(be, vec![0x01, 0x02, 0x03, 0x04]);
    assert_eq!(le, vec![0x04, 0x03, 0x02, 0x01]);
    assert_ne!(be, le);
}

#[test]
fn network_mode_is_big_endian() {
    assert_eq!(ByteOrder::NETWORK, ByteOrder::BigEndian);
}
