use crate::store::json::JsonFileBackend;
use crate::vault::CommandStore;
use std::path::Path;
use std::path::PathBuf;

pub const COMMANDS_FILE: &str = "commands.json";
pub const CATEGORIES_FILE: &str = "categories.json";
const APP_DIR: &str = "vaul";

/// Locations of the two backing files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePaths {
    pub commands: PathBuf,
    pub categories: PathBuf,
}

impl StorePaths {
    /// Both files side by side in `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            commands: dir.join(COMMANDS_FILE),
            categories: dir.join(CATEGORIES_FILE),
        }
    }

    /// Bare file names, resolved against the working directory.
    pub fn relative() -> Self {
        Self {
            commands: PathBuf::from(COMMANDS_FILE),
            categories: PathBuf::from(CATEGORIES_FILE),
        }
    }

    /// Use `dir` if it exists or can be created, otherwise fall back to
    /// [`StorePaths::relative`].
    pub fn ensure_dir(dir: &Path) -> Self {
        match std::fs::create_dir_all(dir) {
            Ok(()) => Self::in_dir(dir),
            Err(e) => {
                tracing::warn!(
                    "cannot create data directory {}: {e}; using the working directory",
                    dir.display()
                );
                Self::relative()
            }
        }
    }
}

/// Resolve backing file locations.
///
/// Order: explicit `data_dir`, then `VAUL_DATA_DIR`, then
/// `<config dir>/vaul`. Individual files can be overridden with
/// `VAUL_COMMANDS_FILE` and `VAUL_CATEGORIES_FILE`.
pub fn resolve_paths(data_dir: Option<PathBuf>) -> StorePaths {
    resolve_paths_with(data_dir, |k| std::env::var(k).ok(), dirs::config_dir())
}

/// [`resolve_paths`] with the environment and config dir injected.
pub fn resolve_paths_with(
    data_dir: Option<PathBuf>,
    env: impl Fn(&str) -> Option<String>,
    config_dir: Option<PathBuf>,
) -> StorePaths {
    let var = |k: &str| env(k).filter(|v| !v.is_empty()).map(PathBuf::from);
    let dir = data_dir
        .or_else(|| var("VAUL_DATA_DIR"))
        .or_else(|| config_dir.map(|c| c.join(APP_DIR)));
    let mut paths = match dir {
        Some(dir) => StorePaths::ensure_dir(&dir),
        None => {
            tracing::warn!("no user config directory; using the working directory");
            StorePaths::relative()
        }
    };
    if let Some(p) = var("VAUL_COMMANDS_FILE") {
        paths.commands = p;
    }
    if let Some(p) = var("VAUL_CATEGORIES_FILE") {
        paths.categories = p;
    }
    paths
}

/// Open the JSON-file store at the resolved location.
pub fn open_store(data_dir: Option<PathBuf>) -> CommandStore {
    open_store_at(resolve_paths(data_dir))
}

pub fn open_store_at(paths: StorePaths) -> CommandStore {
    tracing::debug!(
        "opening vault: commands={} categories={}",
        paths.commands.display(),
        paths.categories.display()
    );
    CommandStore::open(Box::new(JsonFileBackend::new(paths)))
}
