//! Conversion between raw JSON detection records and library detections.
//!
//! Records are kept as JSON objects so fields the filter does not know about
//! survive the round trip unchanged.

use roinms::{BBox, Detection, RoiDetection, RoiNmsError, RoiNmsResult};
use serde_json::{Map, Value};
use std::fmt;

/// Frame identifier as it appears in the input: a JSON number or string.
///
/// Non-integer numbers are keyed by their shortest decimal rendering, so
/// `1.5` and `1.50` share a frame while `3` and `3.0` do not.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum FrameKey {
    Index(i64),
    /// Integer above `i64::MAX`.
    Unsigned(u64),
    Decimal(String),
    Name(String),
}

impl fmt::Display for FrameKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameKey::Index(idx) => write!(f, "{idx}"),
            FrameKey::Unsigned(idx) => write!(f, "{idx}"),
            FrameKey::Decimal(text) => f.write_str(text),
            FrameKey::Name(name) => f.write_str(name),
        }
    }
}

/// Parsed input: library detections plus the original JSON objects.
pub struct Records {
    pub detections: Vec<Detection<FrameKey>>,
    raw: Vec<Map<String, Value>>,
}

impl Records {
    /// Parses a JSON array of detection objects.
    pub fn parse(input: Value) -> RoiNmsResult<Self> {
        let Value::Array(items) = input else {
            return Err(malformed(None, "input must be a JSON array of detections"));
        };

        let mut detections = Vec::with_capacity(items.len());
        let mut raw = Vec::with_capacity(items.len());
        for (idx, item) in items.into_iter().enumerate() {
            let Value::Object(obj) = item else {
                return Err(malformed(Some(idx), "record is not a JSON object"));
            };
            detections.push(parse_detection(&obj).map_err(|err| err.at_index(idx))?);
            raw.push(obj);
        }
        Ok(Self { detections, raw })
    }

    /// Builds output records for the kept detections.
    ///
    /// Each is the original object with a `tile_ids` array added.
    pub fn render(&self, kept: &[RoiDetection<FrameKey>]) -> Value {
        let out = kept
            .iter()
            .map(|det| {
                let mut obj = self.raw[det.source_index].clone();
                let ids = det.tile_ids.iter().map(Value::from).collect();
                obj.insert("tile_ids".to_string(), Value::Array(ids));
                Value::Object(obj)
            })
            .collect();
        Value::Array(out)
    }
}

fn parse_detection(obj: &Map<String, Value>) -> RoiNmsResult<Detection<FrameKey>> {
    let frame = match obj.get("frame") {
        None => return Err(malformed(None, "missing field `frame`")),
        Some(Value::String(name)) => FrameKey::Name(name.clone()),
        Some(Value::Number(num)) => match (num.as_i64(), num.as_u64()) {
            (Some(idx), _) => FrameKey::Index(idx),
            (None, Some(idx)) => FrameKey::Unsigned(idx),
            (None, None) => FrameKey::Decimal(num.to_string()),
        },
        Some(other) => {
            return Err(malformed(
                None,
                format!("frame must be a number or string, got {other}"),
            ))
        }
    };

    let coords = match obj.get("bbox") {
        None => return Err(malformed(None, "missing field `bbox`")),
        Some(Value::Array(values)) => values
            .iter()
            .map(|v| {
                v.as_f64()
                    .ok_or_else(|| malformed(None, format!("bbox value {v} is not a number")))
            })
            .collect::<RoiNmsResult<Vec<f64>>>()?,
        Some(other) => return Err(malformed(None, format!("bbox must be an array, got {other}"))),
    };
    let bbox = BBox::from_slice(&coords)?;

    let score = match obj.get("score") {
        None => return Err(malformed(None, "missing field `score`")),
        Some(value) => value
            .as_f64()
            .ok_or_else(|| malformed(None, format!("score {value} is not a number")))?,
    };

    Detection::try_new(frame, bbox, score)
}

fn malformed(index: Option<usize>, reason: impl Into<String>) -> RoiNmsError {
    RoiNmsError::MalformedDetection {
        index,
        reason: reason.into(),
    }
}
