//! Record ids as the backend sends them
//!
//! Documents carry `_id`, a virtual `id`, or both. Use on a flattened field:
//!
//! ```ignore
//! #[serde(flatten, with = "record_id")]
//! pub id: String,
//! ```

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Default, Serialize, Deserialize)]
struct RecordKey {
    #[serde(default, rename = "_id", skip_serializing_if = "Option::is_none")]
    mongo_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
}

impl RecordKey {
    /// `_id` wins over `id`; blank values count as absent
    fn resolve(self) -> Option<String> {
        let present = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        present(self.mongo_id).or_else(|| present(self.id))
    }
}

pub fn serialize<S>(id: &str, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    RecordKey {
        mongo_id: Some(id.to_string()),
        id: None,
    }
    .serialize(serializer)
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    RecordKey::deserialize(deserializer)?
        .resolve()
        .ok_or_else(|| D::Error::missing_field("_id"))
}

/// Same, for records whose id may be missing
pub mod optional {
    use super::*;

    pub fn serialize<S>(id: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        RecordKey {
            mongo_id: id.clone(),
            id: None,
        }
        .serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(RecordKey::deserialize(deserializer)?.resolve())
    }
}
