// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use coconut_app::{SessionToken, TokenStore};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Keeps the session token in a single file, readable only by the owner.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<SessionToken>> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(SessionToken::new(raw)),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => {
                Err(error).with_context(|| format!("read session token {}", self.path.display()))
            }
        }
    }

    fn save(&mut self, token: &SessionToken) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("create session directory {}", parent.display()))?;
        }
        fs::write(&self.path, token.as_str())
            .with_context(|| format!("write session token {}", self.path.display()))?;
        restrict_permissions(&self.path)?;
        debug!(path = %self.path.display(), "session token saved");
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => {
                Err(error).with_context(|| format!("remove session token {}", self.path.display()))
            }
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
        .with_context(|| format!("restrict permissions on {}", path.display()))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::FileTokenStore;
    use anyhow::Result;
    use coconut_app::{SessionToken, TokenStore};
    use coconut_testkit::{jwt_with_exp, temp_token_path};

    #[test]
    fn missing_file_loads_as_no_token() -> Result<()> {
        let (_dir, path) = temp_token_path()?;
        let store = FileTokenStore::new(&path);
        assert_eq!(store.load()?, None);
        Ok(())
    }

    #[test]
    fn save_then_load_returns_same_token() -> Result<()> {
        let (dir, _) = temp_token_path()?;
        let path = dir.path().join("nested").join("session.token");
        let mut store = FileTokenStore::new(&path);
        let token = SessionToken::new(jwt_with_exp("kim", 1_900_000_000)).expect("token");

        store.save(&token)?;
        assert_eq!(store.load()?, Some(token));
        assert_eq!(store.path(), path.as_path());
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn saved_token_is_owner_only() -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let (_dir, path) = temp_token_path()?;
        let mut store = FileTokenStore::new(&path);
        store.save(&SessionToken::new("abc").expect("token"))?;
        let mode = std::fs::metadata(&path)?.permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        Ok(())
    }

    #[test]
    fn blank_file_loads_as_no_token() -> Result<()> {
        let (_dir, path) = temp_token_path()?;
        std::fs::write(&path, "  \n")?;
        assert_eq!(FileTokenStore::new(&path).load()?, None);
        Ok(())
    }

    #[test]
    fn clear_is_idempotent() -> Result<()> {
        let (_dir, path) = temp_token_path()?;
        let mut store = FileTokenStore::new(&path);
        store.save(&SessionToken::new("abc").expect("token"))?;
        store.clear()?;
        store.clear()?;
        assert!(!path.exists());
        assert_eq!(store.load()?, None);
        Ok(())
    }
}
