// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Non-failing type coercion.
//!
//! Every function here either produces a value of the target type or reports
//! that it could not; none of them panic on bad input.
//!
//! [`try_convert`] tries, in order:
//!
//! 1. assignability (the value already fits, returned unchanged),
//! 2. numeric to numeric checked casts,
//! 3. culture-aware string parsing,
//! 4. unwrapping a single-element sequence for a scalar target.
//!
//! The first rule whose shape matches decides the outcome; a matching rule
//! that fails does not fall through to later rules.

use tracing::debug;

use crate::culture::Culture;
use crate::types::{PrimitiveType, TargetType, TypeKind};
use crate::value::{Value, ValueKind};

/// Returns `true` if `target` can hold `Null`.
///
/// Strings, sequences and objects always can; primitives and enums only when
/// declared nullable.
#[must_use]
pub fn accepts_null(target: &TargetType) -> bool {
    match target.kind() {
        TypeKind::String | TypeKind::Sequence | TypeKind::Object(_) => true,
        TypeKind::Primitive(_) | TypeKind::Enum(_) => target.is_nullable(),
    }
}

/// Returns `true` if `value` can be stored in a `target` slot as is.
#[must_use]
pub fn is_assignable(target: &TargetType, value: &Value) -> bool {
    match (target.kind(), value.kind()) {
        (_, ValueKind::Null) => accepts_null(target),
        (TypeKind::Object(ty), ValueKind::Reference(object)) => ty.accepts(object),
        (TypeKind::Object(ty), _) => ty.is_any(),
        (TypeKind::Primitive(to), ValueKind::Primitive(from)) => *to == from,
        (TypeKind::String, ValueKind::Text(_)) | (TypeKind::Sequence, ValueKind::Sequence(_)) => {
            true
        }
        (TypeKind::Enum(ty), ValueKind::Enum(member)) => member.ty() == ty,
        _ => false,
    }
}

/// Converts `value` to `target`, returning `None` if no rule applies or the
/// applicable rule fails.
///
/// # Example
///
/// ```rust
/// use understory_coerce::{Culture, PrimitiveType, TargetType, Value, coerce};
///
/// let target = TargetType::primitive(PrimitiveType::F64);
///
/// assert_eq!(
///     coerce::try_convert(&target, &Value::from("1.234,5"), &Culture::DE_DE),
///     Some(Value::F64(1234.5)),
/// );
/// assert_eq!(
///     coerce::try_convert(&target, &Value::I32(2), &Culture::INVARIANT),
///     Some(Value::F64(2.0)),
/// );
/// assert_eq!(
///     coerce::try_convert(&target, &Value::from("abc"), &Culture::INVARIANT),
///     None,
/// );
/// ```
#[must_use]
pub fn try_convert(target: &TargetType, value: &Value, culture: &Culture) -> Option<Value> {
    if is_assignable(target, value) {
        return Some(value.clone());
    }

    match (target.kind(), value.kind()) {
        (TypeKind::Primitive(to), ValueKind::Primitive(from))
            if to.is_numeric() && from.is_numeric() =>
        {
            convert_numeric(value, *to)
        }
        (TypeKind::Primitive(to), ValueKind::Text(text)) => parse_primitive(text, *to, culture),
        (TypeKind::Enum(ty), ValueKind::Text(text)) => ty.by_name(text.trim()).map(Value::Enum),
        (_, ValueKind::Sequence([single])) if target.is_scalar() => {
            try_convert(target, single, culture)
        }
        _ => None,
    }
}

/// Casts `value` to `target` without parsing.
///
/// Succeeds when the value is assignable, or when it is a number that widens
/// to the target without loss (`i16` to `i32`, `u32` to `i64`, any integer to
/// a float, `f32` to `f64`, and so on). Narrowing is never attempted.
#[must_use]
pub fn try_cast(target: &TargetType, value: &Value) -> Option<Value> {
    if is_assignable(target, value) {
        return Some(value.clone());
    }

    match (target.kind(), value.kind()) {
        (TypeKind::Primitive(to), ValueKind::Primitive(from)) if widens_to(from, *to) => {
            convert_numeric(value, *to)
        }
        _ => None,
    }
}

/// Converts between enum members and integers.
///
/// - An enum member converts to a non-enum target only if its underlying
///   `i32` casts to it (see [`try_cast`]). Member names are not produced.
/// - A non-enum value converts to an enum target if it casts to `i32`. The
///   integer is not checked against the declared members.
///
/// Every other combination fails.
#[must_use]
pub fn try_convert_enum(value: &Value, target: &TargetType, _culture: &Culture) -> Option<Value> {
    match (value, target.as_enum()) {
        (Value::Enum(member), None) => try_cast(target, &Value::I32(member.raw())),
        (source, Some(ty)) if !matches!(source, Value::Enum(_)) => {
            let Value::I32(raw) = try_cast(&TargetType::primitive(PrimitiveType::I32), source)?
            else {
                return None;
            };
            if !ty.is_defined(raw) {
                debug!(
                    enum_type = ty.name(),
                    raw, "integer is not a declared enum member; passing it through"
                );
            }
            Some(Value::Enum(ty.value(raw)))
        }
        _ => None,
    }
}

/// Lossless numeric conversions.
fn widens_to(from: PrimitiveType, to: PrimitiveType) -> bool {
    use PrimitiveType::{F32, F64, I8, I16, I32, I64, U8, U16, U32, U64};

    matches!(
        (from, to),
        (I8, I16 | I32 | I64 | F32 | F64)
            | (U8, I16 | U16 | I32 | U32 | I64 | U64 | F32 | F64)
            | (I16, I32 | I64 | F32 | F64)
            | (U16, I32 | U32 | I64 | U64 | F32 | F64)
            | (I32, I64 | F32 | F64)
            | (U32, I64 | U64 | F32 | F64)
            | (I64 | U64, F32 | F64)
            | (F32, F64)
    )
}

enum Number {
    Int(i128),
    Float(f64),
}

fn number(value: &Value) -> Option<Number> {
    Some(match *value {
        Value::I8(v) => Number::Int(v.into()),
        Value::I16(v) => Number::Int(v.into()),
        Value::I32(v) => Number::Int(v.into()),
        Value::I64(v) => Number::Int(v.into()),
        Value::U8(v) => Number::Int(v.into()),
        Value::U16(v) => Number::Int(v.into()),
        Value::U32(v) => Number::Int(v.into()),
        Value::U64(v) => Number::Int(v.into()),
        Value::F32(v) => Number::Float(v.into()),
        Value::F64(v) => Number::Float(v),
        _ => return None,
    })
}

/// Checked numeric cast. Out-of-range values fail instead of wrapping.
fn convert_numeric(value: &Value, to: PrimitiveType) -> Option<Value> {
    match number(value)? {
        Number::Int(n) => int_to(n, to),
        Number::Float(f) => float_to(f, to),
    }
}

fn int_to(n: i128, to: PrimitiveType) -> Option<Value> {
    Some(match to {
        PrimitiveType::I8 => Value::I8(n.try_into().ok()?),
        PrimitiveType::I16 => Value::I16(n.try_into().ok()?),
        PrimitiveType::I32 => Value::I32(n.try_into().ok()?),
        PrimitiveType::I64 => Value::I64(n.try_into().ok()?),
        PrimitiveType::U8 => Value::U8(n.try_into().ok()?),
        PrimitiveType::U16 => Value::U16(n.try_into().ok()?),
        PrimitiveType::U32 => Value::U32(n.try_into().ok()?),
        PrimitiveType::U64 => Value::U64(n.try_into().ok()?),
        // Rounds to nearest.
        PrimitiveType::F32 => Value::F32(n as f32),
        PrimitiveType::F64 => Value::F64(n as f64),
        PrimitiveType::Bool | PrimitiveType::Char | PrimitiveType::Date => return None,
    })
}

fn float_to(f: f64, to: PrimitiveType) -> Option<Value> {
    match to {
        PrimitiveType::F64 => Some(Value::F64(f)),
        PrimitiveType::F32 => {
            if f.is_finite() && (f > f64::from(f32::MAX) || f < f64::from(f32::MIN)) {
                return None;
            }
            #[expect(clippy::cast_possible_truncation, reason = "range checked above")]
            let narrowed = f as f32;
            Some(Value::F32(narrowed))
        }
        _ if to.is_integer() && f.is_finite() => {
            // Truncates toward zero; saturation is caught by the range check in `int_to`.
            #[expect(clippy::cast_possible_truncation, reason = "range checked by `int_to`")]
            let truncated = f as i128;
            int_to(truncated, to)
        }
        _ => None,
    }
}

fn parse_primitive(text: &str, to: PrimitiveType, culture: &Culture) -> Option<Value> {
    let trimmed = text.trim();
    match to {
        PrimitiveType::Bool => parse_bool(trimmed).map(Value::Bool),
        PrimitiveType::Char => {
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(Value::Char(c)),
                _ => None,
            }
        }
        PrimitiveType::I8 => trimmed.parse().ok().map(Value::I8),
        PrimitiveType::I16 => trimmed.parse().ok().map(Value::I16),
        PrimitiveType::I32 => trimmed.parse().ok().map(Value::I32),
        PrimitiveType::I64 => trimmed.parse().ok().map(Value::I64),
        PrimitiveType::U8 => trimmed.parse().ok().map(Value::U8),
        PrimitiveType::U16 => trimmed.parse().ok().map(Value::U16),
        PrimitiveType::U32 => trimmed.parse().ok().map(Value::U32),
        PrimitiveType::U64 => trimmed.parse().ok().map(Value::U64),
        // Parsed at full width so that out-of-range text is refused like a narrowed f64.
        PrimitiveType::F32 => culture
            .normalize_real(trimmed)?
            .parse()
            .ok()
            .and_then(|f| float_to(f, PrimitiveType::F32)),
        PrimitiveType::F64 => culture
            .normalize_real(trimmed)?
            .parse()
            .ok()
            .map(Value::F64),
        PrimitiveType::Date => culture.parse_date(trimmed).map(Value::Date),
    }
}

fn parse_bool(text: &str) -> Option<bool> {
    if text.eq_ignore_ascii_case("true") {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::EnumType;
    use crate::types::ObjectType;
    use crate::value::ObjectRef;
    use alloc::vec;
    use chrono::NaiveDate;

    const INVARIANT: Culture = Culture::INVARIANT;

    fn prim(ty: PrimitiveType) -> TargetType {
        TargetType::primitive(ty)
    }

    fn orientation() -> EnumType {
        EnumType::builder("Orientation")
            .member("Horizontal", 0)
            .member("Vertical", 1)
            .build()
    }

    #[derive(Debug)]
    struct Brush;

    #[test]
    fn null_acceptance() {
        assert!(accepts_null(&TargetType::string()));
        assert!(accepts_null(&TargetType::sequence()));
        assert!(accepts_null(&TargetType::any()));
        assert!(!accepts_null(&prim(PrimitiveType::I32)));
        assert!(accepts_null(&prim(PrimitiveType::I32).nullable()));
        assert!(!accepts_null(&TargetType::enumeration(&orientation())));
    }

    #[test]
    fn assignable_values_are_returned_unchanged() {
        let brush = ObjectRef::new(Brush);
        let orientation = orientation();
        let cases = [
            (prim(PrimitiveType::I32), Value::I32(7)),
            (TargetType::string(), Value::from("text")),
            (TargetType::any(), Value::U8(1)),
            (TargetType::any(), Value::from(brush.clone())),
            (
                TargetType::object(ObjectType::of::<Brush>()),
                Value::from(brush.clone()),
            ),
            (TargetType::sequence(), Value::from(vec![Value::I32(1)])),
            (
                TargetType::enumeration(&orientation),
                Value::Enum(orientation.value(1)),
            ),
        ];
        for (target, value) in cases {
            assert_eq!(try_convert(&target, &value, &INVARIANT), Some(value));
        }
    }

    #[test]
    fn assigned_object_keeps_identity() {
        let brush = ObjectRef::new(Brush);
        let result = try_convert(&TargetType::any(), &Value::from(brush.clone()), &INVARIANT);
        assert!(result.and_then(|v| v.as_object().map(|o| o.ptr_eq(&brush))) == Some(true));
    }

    #[test]
    fn numeric_checked_casts() {
        assert_eq!(
            try_convert(&prim(PrimitiveType::U8), &Value::I64(200), &INVARIANT),
            Some(Value::U8(200))
        );
        assert_eq!(
            try_convert(&prim(PrimitiveType::U8), &Value::I64(300), &INVARIANT),
            None
        );
        assert_eq!(
            try_convert(&prim(PrimitiveType::U32), &Value::I32(-1), &INVARIANT),
            None
        );
        assert_eq!(
            try_convert(&prim(PrimitiveType::I32), &Value::F64(-3.9), &INVARIANT),
            Some(Value::I32(-3))
        );
        assert_eq!(
            try_convert(&prim(PrimitiveType::I32), &Value::F64(f64::NAN), &INVARIANT),
            None
        );
        assert_eq!(
            try_convert(&prim(PrimitiveType::I64), &Value::F64(1e30), &INVARIANT),
            None
        );
        assert_eq!(
            try_convert(&prim(PrimitiveType::F32), &Value::F64(1e300), &INVARIANT),
            None
        );
        assert_eq!(
            try_convert(&prim(PrimitiveType::F32), &Value::F64(0.5), &INVARIANT),
            Some(Value::F32(0.5))
        );
    }

    #[test]
    fn parsed_f32_is_range_checked() {
        let f32_type = prim(PrimitiveType::F32);
        assert_eq!(
            try_convert(&f32_type, &Value::from("1e39"), &INVARIANT),
            None
        );
        assert_eq!(
            try_convert(&f32_type, &Value::from("-1e39"), &INVARIANT),
            None
        );
        assert_eq!(
            try_convert(&f32_type, &Value::from("2.5"), &INVARIANT),
            Some(Value::F32(2.5))
        );
    }

    #[test]
    fn bool_is_not_numeric() {
        assert_eq!(
            try_convert(&prim(PrimitiveType::I32), &Value::Bool(true), &INVARIANT),
            None
        );
    }

    #[test]
    fn string_parsing() {
        assert_eq!(
            try_convert(&prim(PrimitiveType::I32), &Value::from(" -42 "), &INVARIANT),
            Some(Value::I32(-42))
        );
        assert_eq!(
            try_convert(&prim(PrimitiveType::I32), &Value::from("1,000"), &INVARIANT),
            None
        );
        assert_eq!(
            try_convert(&prim(PrimitiveType::Bool), &Value::from("TRUE"), &INVARIANT),
            Some(Value::Bool(true))
        );
        assert_eq!(
            try_convert(&prim(PrimitiveType::Char), &Value::from("x"), &INVARIANT),
            Some(Value::Char('x'))
        );
        assert_eq!(
            try_convert(&prim(PrimitiveType::Char), &Value::from("xy"), &INVARIANT),
            None
        );
        assert_eq!(
            try_convert(&prim(PrimitiveType::F64), &Value::from("2,5"), &Culture::FR_FR),
            Some(Value::F64(2.5))
        );
        assert_eq!(
            try_convert(&prim(PrimitiveType::U8), &Value::from("256"), &INVARIANT),
            None
        );
    }

    #[test]
    fn date_parsing_uses_culture() {
        let expected = NaiveDate::from_ymd_opt(2025, 12, 31).map(Value::Date);
        assert_eq!(
            try_convert(&prim(PrimitiveType::Date), &Value::from("31.12.2025"), &Culture::DE_DE),
            expected
        );
        assert_eq!(
            try_convert(&prim(PrimitiveType::Date), &Value::from("31.12.2025"), &INVARIANT),
            None
        );
    }

    #[test]
    fn enum_parsing_by_declared_name() {
        let ty = orientation();
        let target = TargetType::enumeration(&ty);
        assert_eq!(
            try_convert(&target, &Value::from("Vertical"), &INVARIANT),
            Some(Value::Enum(ty.value(1)))
        );
        assert_eq!(try_convert(&target, &Value::from("Diagonal"), &INVARIANT), None);
    }

    #[test]
    fn single_element_sequence_unwraps() {
        assert_eq!(
            try_convert(
                &prim(PrimitiveType::F64),
                &Value::from(vec![Value::from("1.5")]),
                &INVARIANT
            ),
            Some(Value::F64(1.5))
        );
        assert_eq!(
            try_convert(
                &prim(PrimitiveType::F64),
                &Value::from(vec![Value::I32(1), Value::I32(2)]),
                &INVARIANT
            ),
            None
        );
        assert_eq!(
            try_convert(&prim(PrimitiveType::F64), &Value::Sequence(vec![]), &INVARIANT),
            None
        );
    }

    #[test]
    fn null_conversion() {
        assert_eq!(
            try_convert(&TargetType::string(), &Value::Null, &INVARIANT),
            Some(Value::Null)
        );
        assert_eq!(
            try_convert(&prim(PrimitiveType::I32), &Value::Null, &INVARIANT),
            None
        );
    }

    #[test]
    fn cast_only_widens() {
        assert_eq!(
            try_cast(&prim(PrimitiveType::I64), &Value::I32(5)),
            Some(Value::I64(5))
        );
        assert_eq!(
            try_cast(&prim(PrimitiveType::F64), &Value::U32(5)),
            Some(Value::F64(5.0))
        );
        assert_eq!(try_cast(&prim(PrimitiveType::I16), &Value::I32(5)), None);
        assert_eq!(try_cast(&prim(PrimitiveType::U32), &Value::I8(5)), None);
        assert_eq!(try_cast(&prim(PrimitiveType::I32), &Value::from("5")), None);
    }

    #[test]
    fn enum_to_integer() {
        let member = Value::Enum(orientation().value(1));
        assert_eq!(
            try_convert_enum(&member, &prim(PrimitiveType::I32), &INVARIANT),
            Some(Value::I32(1))
        );
        assert_eq!(
            try_convert_enum(&member, &prim(PrimitiveType::I64), &INVARIANT),
            Some(Value::I64(1))
        );
        // Narrowing is not a cast.
        assert_eq!(
            try_convert_enum(&member, &prim(PrimitiveType::I16), &INVARIANT),
            None
        );
        // Names are not produced.
        assert_eq!(
            try_convert_enum(&member, &TargetType::string(), &INVARIANT),
            None
        );
    }

    #[test]
    fn integer_to_enum_passes_undeclared_values_through() {
        let ty = orientation();
        let target = TargetType::enumeration(&ty);
        assert_eq!(
            try_convert_enum(&Value::I32(1), &target, &INVARIANT),
            Some(Value::Enum(ty.value(1)))
        );
        assert_eq!(
            try_convert_enum(&Value::U16(9), &target, &INVARIANT),
            Some(Value::Enum(ty.value(9)))
        );
        assert_eq!(try_convert_enum(&Value::I64(1), &target, &INVARIANT), None);
        assert_eq!(try_convert_enum(&Value::from("1"), &target, &INVARIANT), None);
    }

    #[test]
    fn enum_to_enum_is_not_bridged() {
        let other = EnumType::builder("Dock").member("Left", 0).build();
        let member = Value::Enum(orientation().value(0));
        assert_eq!(
            try_convert_enum(&member, &TargetType::enumeration(&other), &INVARIANT),
            None
        );
    }
}
