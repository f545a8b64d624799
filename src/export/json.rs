//! JSON rendering of the processing record.

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::config::OutputConfig;
use crate::error::{Error, Result};

/// JSON layout options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonOptions {
    /// Spaces per indentation level (0 = compact, single line)
    pub indent: usize,
    /// Escape every non-ASCII character as `\uXXXX`
    pub ensure_ascii: bool,
}

impl Default for JsonOptions {
    fn default() -> Self {
        Self {
            indent: 2,
            ensure_ascii: false,
        }
    }
}

impl From<&OutputConfig> for JsonOptions {
    fn from(config: &OutputConfig) -> Self {
        Self {
            indent: config.json_indent,
            ensure_ascii: config.json_ensure_ascii,
        }
    }
}

/// Serialize a value to JSON text.
///
/// Output is a pure function of the value and the options: struct fields
/// keep declaration order and maps in the record are ordered.
pub fn to_json<T: Serialize>(value: &T, options: JsonOptions) -> Result<String> {
    let bytes = if options.indent == 0 {
        serde_json::to_vec(value)?
    } else {
        let indent = vec![b' '; options.indent];
        let mut buf = Vec::new();
        let mut serializer =
            Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(&indent));
        value.serialize(&mut serializer)?;
        buf
    };

    let json = String::from_utf8(bytes)
        .map_err(|e| Error::Render(format!("JSON output is not UTF-8: {}", e)))?;

    Ok(if options.ensure_ascii {
        escape_non_ascii(&json)
    } else {
        json
    })
}

/// Replace non-ASCII characters with `\uXXXX` escapes, using surrogate
/// pairs above the BMP. Serialized JSON only carries such characters inside
/// string literals, so a plain scan is enough.
fn escape_non_ascii(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    let mut units = [0u16; 2];
    for c in json.chars() {
        if c.is_ascii() {
            out.push(c);
        } else {
            for unit in c.encode_utf16(&mut units) {
                out.push_str(&format!("\\u{:04x}", unit));
            }
        }
    }
    out
}
