//! Load `.linetap.toml`: the record schema plus optional watcher settings.
//! The CLI requires it (no schema, nothing to decode against); lib callers
//! may construct [`RecordSchema`] and [`IngestOpts`] directly instead.
//!
//! ```toml
//! [record]
//! delimiter = ";"
//! null_token = "NULL"
//! has_header = false
//!
//! [[record.field]]
//! name = "id"
//! kind = "int"
//!
//! [[record.field]]
//! name = "age"
//! kind = "int"
//! nullable = true
//!
//! [settings]
//! pattern = "*.csv"
//! scan_interval_ms = 1000
//! ```

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};

use crate::schema::{FieldKind, FieldSpec, RecordSchema};
use crate::types::IngestOpts;

#[derive(Debug, Deserialize)]
pub struct ConfigFile {
    record: RecordSection,
    #[serde(default)]
    settings: SettingsSection,
}

#[derive(Debug, Deserialize)]
struct RecordSection {
    delimiter: Option<String>,
    null_token: Option<String>,
    has_header: Option<bool>,
    #[serde(default, rename = "field")]
    fields: Vec<FieldSection>,
}

#[derive(Debug, Deserialize)]
struct FieldSection {
    name: String,
    kind: String,
    #[serde(default)]
    nullable: bool,
    null_token: Option<String>,
    /// Date parse format, `date` fields only.
    format: Option<String>,
    /// Allowed values, `enum` fields only.
    #[serde(default)]
    one_of: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct SettingsSection {
    pattern: Option<String>,
    scan_interval_ms: Option<u64>,
    prevent_duplicates: Option<bool>,
    signature: Option<String>,
    recursive: Option<bool>,
    workers: Option<usize>,
}

/// Load config from `path`.
pub fn load_config(path: &Path) -> Result<ConfigFile> {
    let s = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

/// Overwrite an opts field from the file when present.
macro_rules! apply_file_opt {
    ($section:expr, $opts:expr, $file_field:ident => $opts_field:ident) => {
        if let Some(v) = $section.$file_field {
            $opts.$opts_field = v;
        }
    };
}

impl ConfigFile {
    /// Build the record schema from the `[record]` section.
    pub fn schema(&self) -> Result<RecordSchema> {
        let mut fields = Vec::with_capacity(self.record.fields.len());
        for f in &self.record.fields {
            let kind =
                parse_kind(&f.kind, &f.one_of).with_context(|| format!("field `{}`", f.name))?;
            let mut spec = FieldSpec::new(&f.name, kind);
            if f.nullable {
                spec = spec.nullable();
            }
            if let Some(ref token) = f.null_token {
                spec = spec.with_null_token(token);
            }
            if let Some(ref format) = f.format {
                spec = spec.with_date_format(format);
            }
            fields.push(spec);
        }

        let mut schema = RecordSchema::new(fields)?;
        if let Some(ref d) = self.record.delimiter {
            let mut chars = d.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => schema = schema.with_delimiter(c)?,
                _ => bail!("delimiter must be a single character, got `{}`", d),
            }
        }
        if let Some(ref token) = self.record.null_token {
            schema = schema.with_null_sentinel(token);
        }
        if let Some(has_header) = self.record.has_header {
            schema = schema.with_header(has_header);
        }
        Ok(schema)
    }

    /// Apply `[settings]` onto opts (only fields present in the file).
    /// Call before applying CLI flags so flags win.
    pub fn apply_to_opts(&self, opts: &mut IngestOpts) -> Result<()> {
        let s = &self.settings;
        if let Some(ref pattern) = s.pattern {
            opts.pattern = Some(pattern.clone());
        }
        if let Some(ms) = s.scan_interval_ms {
            opts.scan_interval = Some(Duration::from_millis(ms));
        }
        if let Some(ref scheme) = s.signature {
            opts.signature = scheme
                .parse()
                .map_err(|e: String| anyhow::anyhow!(e))
                .context("settings.signature")?;
        }
        if let Some(workers) = s.workers {
            opts.num_workers = Some(workers);
        }
        apply_file_opt!(s, opts, prevent_duplicates => prevent_duplicates);
        apply_file_opt!(s, opts, recursive => recursive);
        Ok(())
    }
}

fn parse_kind(kind: &str, one_of: &[String]) -> Result<FieldKind> {
    match kind.to_lowercase().as_str() {
        "string" | "str" => Ok(FieldKind::Str),
        "int" | "integer" => Ok(FieldKind::Int),
        "decimal" => Ok(FieldKind::Decimal),
        "bool" | "boolean" => Ok(FieldKind::Bool),
        "date" => Ok(FieldKind::Date),
        "enum" => {
            if one_of.is_empty() {
                bail!("enum field needs a non-empty `one_of` list");
            }
            Ok(FieldKind::Enum(one_of.to_vec()))
        }
        other => bail!("unknown field kind `{}`", other),
    }
}
