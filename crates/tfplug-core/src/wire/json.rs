//! JSON codec for wire values
//!
//! JSON carries no type information, so decoding is driven by the expected
//! [`WireType`]. JSON has no notion of "not yet known": decoded values are
//! always known or null, and unknown values refuse to encode.

use super::{WireKind, WirePayload, WireState, WireType, WireValue};
use crate::{WireError, WireResult};
use serde_json::Value as Json;

impl WireValue {
    /// Decode a JSON document as a wire value of the given type
    pub fn from_json(ty: &WireType, json: &Json) -> WireResult<Self> {
        if json.is_null() {
            return Ok(WireValue::null(ty.clone()));
        }
        let payload = match (ty, json) {
            (WireType::String, Json::String(s)) => WirePayload::String(s.clone()),
            (WireType::Number, Json::Number(n)) => {
                let n = n.as_f64().ok_or_else(|| mismatch(WireKind::Number, json))?;
                WirePayload::Number(n)
            }
            (WireType::Bool, Json::Bool(b)) => WirePayload::Bool(*b),
            (WireType::List(elem), Json::Array(items)) => WirePayload::List(
                items
                    .iter()
                    .map(|item| WireValue::from_json(elem, item))
                    .collect::<WireResult<_>>()?,
            ),
            (WireType::Set(elem), Json::Array(items)) => WirePayload::Set(
                items
                    .iter()
                    .map(|item| WireValue::from_json(elem, item))
                    .collect::<WireResult<_>>()?,
            ),
            (WireType::Map(elem), Json::Object(entries)) => WirePayload::Map(
                entries
                    .iter()
                    .map(|(key, item)| Ok((key.clone(), WireValue::from_json(elem, item)?)))
                    .collect::<WireResult<_>>()?,
            ),
            _ => return Err(mismatch(ty.kind(), json)),
        };
        Ok(WireValue::new(ty.clone(), payload))
    }

    /// Decode a JSON string as a wire value of the given type
    pub fn from_json_str(ty: &WireType, input: &str) -> WireResult<Self> {
        let json: Json = serde_json::from_str(input)?;
        WireValue::from_json(ty, &json)
    }

    /// Encode this value as JSON
    pub fn to_json(&self) -> WireResult<Json> {
        match self.state() {
            WireState::Unknown => Err(WireError::UnknownNotEncodable),
            WireState::Null => Ok(Json::Null),
            WireState::Known(payload) => payload_to_json(payload),
        }
    }
}

fn payload_to_json(payload: &WirePayload) -> WireResult<Json> {
    Ok(match payload {
        WirePayload::String(s) => Json::String(s.clone()),
        WirePayload::Number(n) => serde_json::Number::from_f64(*n)
            .map(Json::Number)
            .ok_or(WireError::InvalidNumber { value: *n })?,
        WirePayload::Bool(b) => Json::Bool(*b),
        WirePayload::List(items) | WirePayload::Set(items) => Json::Array(
            items
                .iter()
                .map(WireValue::to_json)
                .collect::<WireResult<_>>()?,
        ),
        WirePayload::Map(entries) => Json::Object(
            entries
                .iter()
                .map(|(key, item)| Ok((key.clone(), item.to_json()?)))
                .collect::<WireResult<_>>()?,
        ),
    })
}

fn mismatch(expected: WireKind, json: &Json) -> WireError {
    WireError::NotDecodable {
        expected,
        value: json.to_string(),
    }
}
