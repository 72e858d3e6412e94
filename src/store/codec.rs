//! Owner file encoding.
//!
//! An owner file is a flat YAML mapping:
//!
//! ```yaml
//! name: Steve
//! world_10_64_-5: 1700000000000
//! world_nether_0_70_3: -1
//! ```
//!
//! `name` is an informational display-name hint. Every other key is a
//! canonical position mapped to its creation time in epoch milliseconds.

use crate::locks::{LockRecord, UNKNOWN_CREATED_AT};
use crate::position::parse_key;
use crate::world::WorldDirectory;
use serde_yaml::{Mapping, Value};
use tracing::debug;
use uuid::Uuid;

/// Reserved key holding the owner's display name.
pub const NAME_KEY: &str = "name";

/// Contents of one owner file after decoding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnerLoad {
    /// Display name stored in the file, if any.
    pub name: Option<String>,

    /// Entries that decoded to a known position.
    pub records: Vec<LockRecord>,

    /// Entries dropped because the key was malformed or the world unknown.
    pub dropped: usize,
}

/// Render an owner's records as a YAML document.
pub fn encode_owner_file(
    name: Option<&str>,
    records: &[LockRecord],
) -> Result<String, serde_yaml::Error> {
    let mut doc = Mapping::new();
    if let Some(name) = name {
        doc.insert(Value::from(NAME_KEY), Value::from(name));
    }
    for record in records {
        doc.insert(Value::from(record.key()), Value::from(record.created_at));
    }
    serde_yaml::to_string(&doc)
}

/// Parse an owner file's text.
///
/// Entries whose key does not decode are skipped. Only a document that is
/// not a mapping at all is an error.
pub fn decode_owner_file(
    owner: Uuid,
    content: &str,
    worlds: &dyn WorldDirectory,
) -> Result<OwnerLoad, String> {
    let doc: Value = serde_yaml::from_str(content).map_err(|e| e.to_string())?;
    let mapping = match doc {
        Value::Mapping(mapping) => mapping,
        Value::Null => return Ok(OwnerLoad::default()),
        other => return Err(format!("expected a mapping, found {}", kind(&other))),
    };

    let mut load = OwnerLoad::default();
    for (key, value) in mapping {
        let Some(key) = key.as_str() else {
            load.dropped += 1;
            continue;
        };

        if key == NAME_KEY {
            load.name = value.as_str().map(str::to_string);
            continue;
        }

        let Some(position) = parse_key(key, worlds) else {
            debug!(%owner, key, "dropping unresolvable lock entry");
            load.dropped += 1;
            continue;
        };

        let created_at = value.as_i64().unwrap_or(UNKNOWN_CREATED_AT);
        load.records.push(LockRecord::new(owner, position, created_at));
    }

    Ok(load)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
