//! Schema-driven line decoding.
//!
//! `decode` is a pure function of schema + line; no state is kept between
//! calls, so decode order never affects correctness. The pipeline still
//! preserves line order per file for deterministic error reporting.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::errors::{DecodeError, DecodeReason};
use crate::schema::{DEFAULT_DATE_FORMAT, FieldKind, FieldSpec, QUOTE, RecordSchema};
use crate::types::{DecodedRecord, FieldValue, RawLine};

/// Decode one raw line into a typed record, or report why it cannot be.
pub fn decode(schema: &RecordSchema, line: &RawLine) -> Result<DecodedRecord, DecodeError> {
    let tokens = split_fields(&line.text, schema.delimiter(), QUOTE);
    if tokens.len() != schema.field_count() {
        return Err(error_at(
            line,
            DecodeReason::FieldCountMismatch {
                expected: schema.field_count(),
                found: tokens.len(),
            },
        ));
    }

    let mut fields = Vec::with_capacity(tokens.len());
    for (spec, token) in schema.fields().iter().zip(&tokens) {
        let null_token = spec.null_token.as_deref().unwrap_or(schema.null_sentinel());
        let value = if token.as_str() == null_token {
            if !spec.nullable {
                return Err(error_at(
                    line,
                    DecodeReason::UnexpectedNull {
                        field: spec.name.clone(),
                    },
                ));
            }
            FieldValue::Null
        } else {
            coerce(spec, token).ok_or_else(|| {
                error_at(
                    line,
                    DecodeReason::TypeCoercion {
                        field: spec.name.clone(),
                        text: token.clone(),
                        expected: spec.kind.clone(),
                    },
                )
            })?
        };
        fields.push((spec.name.clone(), value));
    }
    Ok(DecodedRecord::new(fields))
}

fn error_at(line: &RawLine, reason: DecodeReason) -> DecodeError {
    DecodeError {
        file: line.source.path.clone(),
        line_number: line.number,
        raw: line.text.clone(),
        reason,
    }
}

/// Split one line into field tokens. A delimiter inside a quoted field is
/// literal; a doubled quote inside a quoted field is one quote. Tokens are
/// not trimmed. Always yields at least one token (the empty line yields one
/// empty token).
pub fn split_fields(line: &str, delimiter: char, quote: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            c if c == quote => {
                if in_quotes {
                    if chars.peek() == Some(&quote) {
                        current.push(quote);
                        chars.next();
                    } else {
                        in_quotes = false;
                    }
                } else {
                    in_quotes = true;
                }
            }
            c if c == delimiter && !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            c => current.push(c),
        }
    }
    fields.push(current);
    fields
}

/// Coerce one non-null token to the field's kind. None on any parse failure;
/// the caller turns that into a `TypeCoercion` with full context.
fn coerce(spec: &FieldSpec, token: &str) -> Option<FieldValue> {
    match &spec.kind {
        FieldKind::Str => Some(FieldValue::Str(token.to_string())),
        FieldKind::Int => token.parse::<i64>().ok().map(FieldValue::Int),
        FieldKind::Decimal => token.parse::<Decimal>().ok().map(FieldValue::Decimal),
        FieldKind::Bool => token.parse::<bool>().ok().map(FieldValue::Bool),
        FieldKind::Date => {
            let format = spec.date_format.as_deref().unwrap_or(DEFAULT_DATE_FORMAT);
            NaiveDate::parse_from_str(token, format)
                .ok()
                .map(FieldValue::Date)
        }
        FieldKind::Enum(allowed) => allowed
            .iter()
            .any(|v| v == token)
            .then(|| FieldValue::Str(token.to_string())),
    }
}
