//! Record schema: the ordered field list plus the lexical options used to
//! decode one line into one record.
//!
//! A schema is built once, validated at construction, and shared read-only
//! (behind an `Arc`) by every decode worker. New record shapes need only a
//! new schema value, never new decode code.

use anyhow::{Result, bail};
use std::collections::HashSet;
use std::fmt;

/// Default column delimiter.
pub const DEFAULT_DELIMITER: char = ';';
/// Default literal standing in for "no value".
pub const DEFAULT_NULL_SENTINEL: &str = "NULL";
/// Field quote character. A delimiter inside a quoted field is literal text;
/// a doubled quote inside a quoted field is one quote.
pub const QUOTE: char = '"';
/// Default parse format for `date` fields.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Semantic type of one field.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldKind {
    Str,
    Int,
    Decimal,
    Bool,
    Date,
    /// Token must be one of the declared values; stored as a string.
    Enum(Vec<String>),
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Str => write!(f, "string"),
            FieldKind::Int => write!(f, "int"),
            FieldKind::Decimal => write!(f, "decimal"),
            FieldKind::Bool => write!(f, "bool"),
            FieldKind::Date => write!(f, "date"),
            FieldKind::Enum(values) => write!(f, "enum({})", values.join("|")),
        }
    }
}

/// One column: name, kind, nullability, and optional per-field overrides.
#[derive(Clone, Debug)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
    /// Whether the null token decodes to a null value instead of failing
    /// the line.
    pub nullable: bool,
    /// Per-field null token; falls back to the schema sentinel when None.
    pub null_token: Option<String>,
    /// Parse format for `date` fields; [`DEFAULT_DATE_FORMAT`] when None.
    pub date_format: Option<String>,
}

impl FieldSpec {
    pub fn new(name: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            nullable: false,
            null_token: None,
            date_format: None,
        }
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn with_null_token(mut self, token: &str) -> Self {
        self.null_token = Some(token.to_string());
        self
    }

    pub fn with_date_format(mut self, format: &str) -> Self {
        self.date_format = Some(format.to_string());
        self
    }
}

/// Immutable description of a record type: ordered fields, delimiter, null
/// sentinel, header flag. Field order matches column order in the input.
#[derive(Clone, Debug)]
pub struct RecordSchema {
    fields: Vec<FieldSpec>,
    delimiter: char,
    null_sentinel: String,
    has_header: bool,
}

impl RecordSchema {
    /// Build a schema with default lexical options. Fails on an empty field
    /// list or duplicate field names.
    pub fn new(fields: Vec<FieldSpec>) -> Result<Self> {
        if fields.is_empty() {
            bail!("record schema needs at least one field");
        }
        let mut names = HashSet::new();
        for field in &fields {
            if !names.insert(field.name.as_str()) {
                bail!("duplicate field name `{}`", field.name);
            }
        }
        Ok(Self {
            fields,
            delimiter: DEFAULT_DELIMITER,
            null_sentinel: DEFAULT_NULL_SENTINEL.to_string(),
            has_header: false,
        })
    }

    /// Change the column delimiter. Fails when it collides with the quote
    /// character or a line break.
    pub fn with_delimiter(mut self, delimiter: char) -> Result<Self> {
        if delimiter == QUOTE {
            bail!("delimiter and quote character cannot be the same");
        }
        if delimiter == '\n' || delimiter == '\r' {
            bail!("delimiter cannot be a line break");
        }
        self.delimiter = delimiter;
        Ok(self)
    }

    pub fn with_null_sentinel(mut self, sentinel: &str) -> Self {
        self.null_sentinel = sentinel.to_string();
        self
    }

    /// When set, the first physical line of every file is consumed and
    /// discarded before records are decoded.
    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn field_at(&self, index: usize) -> &FieldSpec {
        &self.fields[index]
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    pub fn null_sentinel(&self) -> &str {
        &self.null_sentinel
    }

    pub fn has_header(&self) -> bool {
        self.has_header
    }
}
