use super::*;
use crate::error::StoreError;
use crate::factory::StorePaths;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io::Write as _;
use std::path::Path;
use tempfile::NamedTempFile;

/// Two pretty-printed JSON arrays, one file per collection.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    paths: StorePaths,
}

impl JsonFileBackend {
    pub fn new(paths: StorePaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &StorePaths {
        &self.paths
    }
}

impl StoreBackend for JsonFileBackend {
    fn load_commands(&self) -> Result<Vec<Command>> {
        read_array(&self.paths.commands)
    }

    fn load_categories(&self) -> Result<Vec<Category>> {
        read_array(&self.paths.categories)
    }

    fn save_commands(&self, commands: &[Command]) -> Result<()> {
        write_array(&self.paths.commands, commands)
    }

    fn save_categories(&self, categories: &[Category]) -> Result<()> {
        write_array(&self.paths.categories, categories)
    }
}

fn read_array<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let data = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(StoreError::Load {
                path: path.to_path_buf(),
                source: Box::new(e),
            });
        }
    };
    if data.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(&data).map_err(|e| StoreError::Load {
        path: path.to_path_buf(),
        source: Box::new(e),
    })
}

/// Serialize fully, then swap the file in with a rename so readers never see
/// a half-written array.
fn write_array<T: Serialize>(path: &Path, items: &[T]) -> Result<()> {
    let data = serde_json::to_vec_pretty(items)?;
    let persist_err = |source: std::io::Error| StoreError::Persist {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = temp_file_for(path, dir).map_err(persist_err)?;
    tmp.write_all(&data).map_err(persist_err)?;
    tmp.as_file().sync_all().map_err(persist_err)?;
    tmp.persist(path).map_err(|e| persist_err(e.error))?;
    tracing::debug!("wrote {} entries to {}", items.len(), path.display());
    Ok(())
}

/// Temp file in `dir` carrying the mode of the file it will replace.
fn temp_file_for(path: &Path, dir: &Path) -> std::io::Result<NamedTempFile> {
    match std::fs::metadata(path) {
        Ok(meta) => {
            let tmp = NamedTempFile::new_in(dir)?;
            tmp.as_file().set_permissions(meta.permissions())?;
            Ok(tmp)
        }
        Err(_) => new_temp_file(dir),
    }
}

// New vault files are world-readable (0644, minus umask).
#[cfg(unix)]
fn new_temp_file(dir: &Path) -> std::io::Result<NamedTempFile> {
    use std::os::unix::fs::PermissionsExt;
    tempfile::Builder::new()
        .permissions(std::fs::Permissions::from_mode(0o644))
        .tempfile_in(dir)
}

#[cfg(not(unix))]
fn new_temp_file(dir: &Path) -> std::io::Result<NamedTempFile> {
    NamedTempFile::new_in(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use pretty_assertions::assert_eq;

    fn backend(dir: &Path) -> JsonFileBackend {
        JsonFileBackend::new(StorePaths::in_dir(dir))
    }

    #[test]
    fn missing_files_load_empty() {
        let dir = tempfile::tempdir().unwrap();
        let be = backend(dir.path());
        assert!(be.load_commands().unwrap().is_empty());
        assert!(be.load_categories().unwrap().is_empty());
    }

    #[test]
    fn corrupt_file_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let be = backend(dir.path());
        std::fs::write(&be.paths().commands, "[{not json").unwrap();
        let err = be.load_commands().unwrap_err();
        assert!(matches!(err, StoreError::Load { .. }));
    }

    #[test]
    fn writes_two_space_pretty_array() {
        let dir = tempfile::tempdir().unwrap();
        let be = backend(dir.path());
        let cat = Category {
            id: "20250101000000.000000000".to_string(),
            name: "Git".to_string(),
            color: String::new(),
            created_at: DateTime::parse_from_rfc3339("2025-01-01T00:00:00+00:00").unwrap(),
        };
        be.save_categories(std::slice::from_ref(&cat)).unwrap();
        let text = std::fs::read_to_string(&be.paths().categories).unwrap();
        assert!(text.starts_with("[\n  {\n    \"id\""));
        assert!(!text.contains("color"));
        assert_eq!(be.load_categories().unwrap(), vec![cat]);
    }

    #[test]
    fn save_into_missing_directory_is_a_persist_error() {
        let dir = tempfile::tempdir().unwrap();
        let be = backend(&dir.path().join("does-not-exist"));
        let err = be.save_commands(&[]).unwrap_err();
        assert!(matches!(err, StoreError::Persist { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn rewrite_keeps_existing_file_mode() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let be = backend(dir.path());
        let path = &be.paths().commands;
        std::fs::write(path, "[]").unwrap();
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o640)).unwrap();

        be.save_commands(&[]).unwrap();
        let mode = std::fs::metadata(path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o640);
    }

    #[cfg(unix)]
    #[test]
    fn new_file_is_not_owner_only() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let be = backend(dir.path());
        be.save_categories(&[]).unwrap();
        let mode = std::fs::metadata(&be.paths().categories)
            .unwrap()
            .permissions()
            .mode();
        // at most 0644; the process umask may strip more
        assert_eq!(mode & 0o777 & !0o644, 0);
        assert_eq!(mode & 0o600, 0o600);
    }
}
