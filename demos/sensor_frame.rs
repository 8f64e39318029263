//! A standalone usage demo for a single record type with a string field, a
//! filler-backed array, and a computed `Outlet` field — run with
//! `cargo run --example sensor_frame`.

use std::sync::OnceLock;

use derive_getters::Getters;
use flatrec::{
    pack, unpack, ByteOrder, FieldShape, FieldSpec, FillerSpec, FromValues, PrimitiveKind, Record,
    RecordLayout, RecordValues, StrEncoding, Value, ValidationError, ValueMap,
};

/// One telemetry frame off a serial link: a sensor id, a millivolt reading,
/// an ASCII label, up to five raw samples, and a trailing checksum byte
/// that is never stored on the instance itself — only ever computed.
#[derive(Debug, Getters)]
struct SensorFrame {
    sensor_id: u8,
    millivolts: i16,
    label: String,
    samples: Vec<u8>,
}

impl SensorFrame {
    fn new(sensor_id: u8, millivolts: i16, label: &str, samples: Vec<u8>) -> Self {
        Self {
            sensor_id,
            millivolts,
            label: label.to_string(),
            samples,
        }
    }

    /// The outlet value: a checksum over the other fields, recomputed on
    /// every `dump()` rather than stored. Packing an instance with a stale
    /// cached checksum is not possible because there is nowhere to cache it.
    fn checksum(&self) -> u8 {
        let mut acc = self.sensor_id ^ (self.millivolts as u8) ^ (self.millivolts >> 8) as u8;
        for b in self.label.bytes() {
            acc ^= b;
        }
        for &b in &self.samples {
            acc ^= b;
        }
        acc
    }
}

impl RecordValues for SensorFrame {
    fn dump(&self) -> ValueMap {
        ValueMap::from([
            ("sensor_id".to_string(), Value::from(self.sensor_id)),
            ("millivolts".to_string(), Value::from(self.millivolts)),
            ("label".to_string(), Value::from(self.label.clone())),
            (
                "samples".to_string(),
                Value::Array(self.samples.iter().map(|&b| Value::from(b)).collect()),
            ),
            // Keyed under the unadorned name, not `checksum_outlet` — an
            // outlet entry is always dumped under the computed field's own
            // name.
            ("checksum".to_string(), Value::from(self.checksum())),
        ])
    }
}

impl FromValues for SensorFrame {
    fn validate(values: ValueMap) -> Result<Self, ValidationError> {
        let sensor_id = values["sensor_id"].as_int().unwrap() as u8;
        if sensor_id >= 64 {
            return Err(format!("sensor_id {sensor_id} is out of the 0..64 device range").into());
        }
        let millivolts = values["millivolts"].as_int().unwrap() as i16;
        let label = match &values["label"] {
            Value::Str(s) => s.clone(),
            _ => return Err("label field did not decode to a string".into()),
        };
        let samples = values["samples"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_int().unwrap() as u8)
            .collect();
        // `checksum` is never read here: the unpacker discards its bytes
        // entirely and this instance recomputes it from scratch on `dump()`.
        Ok(SensorFrame::new(sensor_id, millivolts, &label, samples))
    }
}

impl Record for SensorFrame {
    fn record_layout() -> &'static RecordLayout {
        static LAYOUT: OnceLock<RecordLayout> = OnceLock::new();
        LAYOUT.get_or_init(|| {
            RecordLayout::compile(
                vec![
                    FieldSpec::new("sensor_id", FieldShape::Primitive(PrimitiveKind::U8)),
                    FieldSpec::new("millivolts", FieldShape::Primitive(PrimitiveKind::I16)),
                    FieldSpec::new(
                        "label",
                        FieldShape::Str {
                            byte_len: Some(8),
                            encoding: StrEncoding::Ascii,
                        },
                    ),
                    FieldSpec::new(
                        "samples",
                        FieldShape::Array {
                            element: Box::new(FieldShape::Primitive(PrimitiveKind::U8)),
                            count: Some(5),
                            filler: Some(FillerSpec::Default),
                            retain_fillers: false,
                        },
                    ),
                    FieldSpec::new(
                        "checksum_outlet",
                        FieldShape::Outlet {
                            primitive: PrimitiveKind::U8,
                        },
                    ),
                ],
                ByteOrder::BigEndian,
            )
            .expect("SensorFrame layout compiles")
        })
    }
}

fn main() {
    let layout = SensorFrame::record_layout();
    println!("{}", layout.describe());

    let frame = SensorFrame::new(3, -120, "probe-1", vec![1, 2, 3]);
    let bytes = pack(&frame).expect("pack");
    println!("packed ({} bytes): {bytes:02x?}", bytes.len());

    let back: SensorFrame = unpack(&bytes).expect("unpack");
    println!("unpacked: {back:?}");
    assert_eq!(back.sensor_id(), frame.sensor_id());
    assert_eq!(back.samples(), frame.samples());

    // Packing the same field values without ever touching `checksum`
    // produces identical bytes, since the outlet recomputes it.
    let reencoded = pack(&back).expect("re-pack");
    assert_eq!(bytes, reencoded);

    // `pack` only range-checks against the primitive's own width (0..=255
    // for a `u8`); the domain constraint `sensor_id < 64` lives in this
    // collaborator's `validate`, so it only bites on the way back in.
    let out_of_range = pack(&SensorFrame::new(200, 0, "x", vec![])).expect("200 fits in a u8");
    match unpack::<SensorFrame>(&out_of_range) {
        Err(e) => println!("rejected out-of-range sensor_id as expected: {e}"),
        Ok(_) => unreachable!("sensor_id 200 should fail this collaborator's validate()"),
    }
}
