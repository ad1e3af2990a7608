//! Scalar element types
//!
//! Only what collection elements need: conversion from and to the wire.

use crate::state::{determine, State};
use crate::TypeResult;
use tfplug_core::{WirePayload, WireResult, WireType, WireValue};

fn convert<T>(
    input: &WireValue,
    expected: &WireType,
    name: &str,
    decode: impl FnOnce(&WireValue) -> WireResult<T>,
) -> TypeResult<State<T>> {
    let determinacy = determine(input, expected, || name.to_string())?;
    match determinacy.empty_state() {
        Some(state) => Ok(state),
        None => Ok(State::Known(decode(input)?)),
    }
}

pub(crate) fn convert_string(input: &WireValue) -> TypeResult<State<String>> {
    convert(input, &WireType::String, "StringType", |v| {
        v.as_string().map(str::to_owned)
    })
}

pub(crate) fn convert_number(input: &WireValue) -> TypeResult<State<f64>> {
    convert(input, &WireType::Number, "NumberType", WireValue::as_number)
}

pub(crate) fn convert_bool(input: &WireValue) -> TypeResult<State<bool>> {
    convert(input, &WireType::Bool, "BoolType", WireValue::as_bool)
}

fn to_wire<T>(state: &State<T>, ty: WireType, payload: impl FnOnce(&T) -> WirePayload) -> WireValue {
    match state {
        State::Null => WireValue::null(ty),
        State::Unknown => WireValue::unknown(ty),
        State::Known(value) => WireValue::new(ty, payload(value)),
    }
}

pub(crate) fn string_to_wire(state: &State<String>) -> WireValue {
    to_wire(state, WireType::String, |s| WirePayload::String(s.clone()))
}

pub(crate) fn number_to_wire(state: &State<f64>) -> WireValue {
    to_wire(state, WireType::Number, |n| WirePayload::Number(*n))
}

pub(crate) fn bool_to_wire(state: &State<bool>) -> WireValue {
    to_wire(state, WireType::Bool, |b| WirePayload::Bool(*b))
}
