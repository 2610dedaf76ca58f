use chrono::DateTime;
use chrono::FixedOffset;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;

/// Creation instant, kept with the UTC offset it was recorded in.
pub type Timestamp = DateTime<FixedOffset>;

/// A saved snippet, usually a shell command line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Command {
    pub id: String,
    pub content: String,
    /// Category id, or empty for uncategorized.
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "String::is_empty"
    )]
    pub category: String,
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "String::is_empty"
    )]
    pub alias: String,
    pub created_at: Timestamp,
}

impl Command {
    pub fn is_uncategorized(&self) -> bool {
        self.category.is_empty()
    }

    pub fn has_alias(&self) -> bool {
        !self.alias.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    /// Free-form display hint such as `#ff0000`.
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "String::is_empty"
    )]
    pub color: String,
    pub created_at: Timestamp,
}

/// Older files may carry `null` where we now expect a string.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
