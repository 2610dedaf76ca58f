use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("alias '{0}' already exists")]
    DuplicateAlias(String),

    #[error("{kind} '{key}' not found")]
    NotFound { kind: &'static str, key: String },

    #[error("category '{0}' cannot be reassigned to itself")]
    SelfReassign(String),

    #[error("failed to write {}: {source}", .path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Only produced while loading; the store degrades to an empty collection.
    #[error("failed to load {}: {source}", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("failed to serialize vault data: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl StoreError {
    pub(crate) fn command_not_found(id: &str) -> Self {
        Self::NotFound {
            kind: "command",
            key: id.to_string(),
        }
    }

    pub(crate) fn category_not_found(id: &str) -> Self {
        Self::NotFound {
            kind: "category",
            key: id.to_string(),
        }
    }

    pub(crate) fn alias_not_found(alias: &str) -> Self {
        Self::NotFound {
            kind: "alias",
            key: alias.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
