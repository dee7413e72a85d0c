//! Conversion of CTD attribute strings into typed model values.

use crate::error::ParseError;
use crate::model::{Bounds, ParameterKind, Value};
use ahash::AHashSet;
use std::fmt::Display;
use std::str::FromStr;

/// Element type of a scalar or list parameter, as named by the `type` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScalarType {
    Int,
    Double,
    Str,
    Bool,
}

/// Splits a comma-separated attribute into trimmed, non-empty tokens.
pub(crate) fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

pub(crate) fn parse_tags(raw: Option<&str>) -> AHashSet<String> {
    raw.map(split_list).unwrap_or_default().into_iter().collect()
}

/// `true` when the restrictions are exactly the unordered pair `{"true","false"}`.
pub(crate) fn is_bool_restriction(restrictions: &str) -> bool {
    let tokens: Vec<&str> = restrictions.split(',').map(str::trim).collect();
    tokens.len() == 2
        && tokens.contains(&"true")
        && tokens.contains(&"false")
}

/// Parses a `lo:hi` restriction; an empty side is unbounded.
pub(crate) fn parse_bounds<T>(key: &str, restriction: Option<&str>) -> Result<Bounds<T>, ParseError>
where
    T: FromStr + PartialOrd + Copy + Display,
{
    let Some(raw) = restriction.map(str::trim).filter(|r| !r.is_empty()) else {
        return Ok(Bounds::default());
    };
    let invalid = || ParseError::InvalidBound {
        key: key.to_string(),
        restriction: raw.to_string(),
    };
    let (lower, upper) = raw.split_once(':').ok_or_else(|| invalid())?;
    let side = |s: &str| -> Result<Option<T>, ParseError> {
        let s = s.trim();
        if s.is_empty() {
            Ok(None)
        } else {
            s.parse::<T>().map(Some).map_err(|_| invalid())
        }
    };
    Ok(Bounds::new(side(lower)?, side(upper)?))
}

fn parse_number<T: FromStr>(key: &str, literal: &str) -> Result<T, ParseError> {
    literal
        .trim()
        .parse::<T>()
        .map_err(|_| ParseError::InvalidNumber {
            key: key.to_string(),
            literal: literal.to_string(),
        })
}

/// Parses one non-empty literal into a scalar value of type `ty`.
pub(crate) fn parse_scalar(key: &str, ty: ScalarType, literal: &str) -> Result<Value, ParseError> {
    match ty {
        ScalarType::Int => parse_number(key, literal).map(Value::Int),
        ScalarType::Double => parse_number(key, literal).map(Value::Double),
        ScalarType::Bool => match literal.trim() {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err(ParseError::InvalidBoolean {
                key: key.to_string(),
                literal: literal.to_string(),
            }),
        },
        ScalarType::Str => Ok(Value::Str(literal.to_string())),
    }
}

/// Converts buffered list entries in order, with the same literal rules as single items.
pub(crate) fn parse_list(key: &str, ty: ScalarType, literals: &[String]) -> Result<Value, ParseError> {
    match ty {
        ScalarType::Int => literals
            .iter()
            .map(|l| parse_number(key, l))
            .collect::<Result<Vec<i64>, _>>()
            .map(Value::IntList),
        ScalarType::Double => literals
            .iter()
            .map(|l| parse_number(key, l))
            .collect::<Result<Vec<f64>, _>>()
            .map(Value::DoubleList),
        ScalarType::Str | ScalarType::Bool => Ok(Value::StrList(literals.to_vec())),
    }
}

/// Maps a scalar `type` attribute and its restrictions onto a parameter kind.
///
/// Returns the element type used to convert the item's literal alongside the kind.
pub(crate) fn scalar_kind(
    key: &str,
    type_name: &str,
    restrictions: Option<&str>,
) -> Result<(ParameterKind, ScalarType), ParseError> {
    match type_name {
        "int" => Ok((ParameterKind::Int(parse_bounds(key, restrictions)?), ScalarType::Int)),
        "double" | "float" => Ok((
            ParameterKind::Double(parse_bounds(key, restrictions)?),
            ScalarType::Double,
        )),
        "string" => {
            let restrictions = restrictions.map(str::trim).unwrap_or_default();
            if is_bool_restriction(restrictions) {
                Ok((ParameterKind::Bool, ScalarType::Bool))
            } else {
                let allowed = split_list(restrictions);
                if allowed.is_empty() {
                    Ok((ParameterKind::String, ScalarType::Str))
                } else {
                    Ok((ParameterKind::StringChoice(allowed), ScalarType::Str))
                }
            }
        }
        other => Err(ParseError::UnknownType {
            key: key.to_string(),
            type_name: other.to_string(),
        }),
    }
}

/// Maps a list `type` attribute onto a list parameter kind.
pub(crate) fn list_kind(
    key: &str,
    type_name: &str,
    restrictions: Option<&str>,
) -> Result<(ParameterKind, ScalarType), ParseError> {
    match type_name {
        "int" => Ok((ParameterKind::IntList(parse_bounds(key, restrictions)?), ScalarType::Int)),
        "double" | "float" => Ok((
            ParameterKind::DoubleList(parse_bounds(key, restrictions)?),
            ScalarType::Double,
        )),
        "string" => Ok((ParameterKind::StringList, ScalarType::Str)),
        other => Err(ParseError::UnknownType {
            key: key.to_string(),
            type_name: other.to_string(),
        }),
    }
}

/// Extracts a port's file extensions, preferring `supported_formats` over `restrictions`.
///
/// Tokens are trimmed and stripped of a leading `*.` glob.
pub(crate) fn mime_types(supported_formats: Option<&str>, restrictions: Option<&str>) -> Vec<String> {
    let source = supported_formats
        .filter(|s| !s.trim().is_empty())
        .or(restrictions)
        .unwrap_or_default();
    split_list(source)
        .into_iter()
        .map(|token| token.strip_prefix("*.").map(str::to_string).unwrap_or(token))
        .filter(|token| !token.is_empty())
        .collect()
}

/// Parses an `xs:boolean` attribute flag (`true`/`false`/`1`/`0`).
pub(crate) fn parse_flag(element: &str, attribute: &str, literal: Option<&str>) -> Result<bool, ParseError> {
    match literal.map(str::trim) {
        None | Some("") | Some("0") => Ok(false),
        Some("1") => Ok(true),
        Some(value) if value.eq_ignore_ascii_case("true") => Ok(true),
        Some(value) if value.eq_ignore_ascii_case("false") => Ok(false),
        Some(value) => Err(ParseError::InvalidFlag {
            element: element.to_string(),
            attribute: attribute.to_string(),
            literal: value.to_string(),
        }),
    }
}
