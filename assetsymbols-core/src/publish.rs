//! Artifact Publishing - all-or-nothing writes
//!
//! Content goes to a temporary file next to the destination and is renamed
//! into place, so readers see either the previous artifact or the complete
//! new one. Staging and committing are separate so a run with several
//! outputs can stage all of them before renaming any. Byte-identical
//! outputs are left untouched to keep timestamps stable for incremental
//! builds.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::emit::ArtifactFormat;
use crate::error::{GenerateError, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishMode {
    /// Write changed artifacts
    #[default]
    Write,
    /// Compare only; report stale artifacts without writing
    Check,
}

/// Outcome of publishing one artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishedArtifact {
    pub path: PathBuf,
    pub format: ArtifactFormat,
    pub hash: String,
    pub bytes: usize,
    /// Destination differed from the rendered content (and, in write mode,
    /// has been replaced).
    pub changed: bool,
}

/// Rendered content written to a temporary file beside its destination,
/// waiting to be renamed into place.
#[derive(Debug)]
pub struct StagedArtifact {
    path: PathBuf,
    temp: Option<NamedTempFile>,
    changed: bool,
}

impl StagedArtifact {
    /// Destination differs from the staged content.
    pub fn changed(&self) -> bool {
        self.changed
    }

    /// Rename the staged file into place. Returns `changed`.
    pub fn commit(self) -> Result<bool> {
        if let Some(temp) = self.temp {
            temp.persist(&self.path)
                .map_err(|e| GenerateError::emit_io(&self.path, e.error))?;
            tracing::info!(path = %self.path.display(), "artifact written");
        }
        Ok(self.changed)
    }
}

/// Compare `content` with `path` and, in write mode, stage it for commit.
///
/// Nothing observable changes until `commit`. Dropping the staged artifact
/// removes its temporary file.
pub fn stage(path: &Path, content: &str, mode: PublishMode) -> Result<StagedArtifact> {
    let unchanged = |changed| StagedArtifact {
        path: path.to_path_buf(),
        temp: None,
        changed,
    };

    match fs::read(path) {
        Ok(existing) if existing == content.as_bytes() => {
            tracing::info!(path = %path.display(), "artifact unchanged");
            return Ok(unchanged(false));
        }
        Ok(_) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(GenerateError::emit_io(path, e)),
    }

    if mode == PublishMode::Check {
        tracing::warn!(path = %path.display(), "artifact is stale");
        return Ok(unchanged(true));
    }

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| GenerateError::emit_io(path, e))?;

    let mut temp = NamedTempFile::new_in(dir).map_err(|e| GenerateError::emit_io(path, e))?;
    temp.write_all(content.as_bytes())
        .map_err(|e| GenerateError::emit_io(path, e))?;
    temp.as_file()
        .sync_all()
        .map_err(|e| GenerateError::emit_io(path, e))?;

    tracing::debug!(path = %path.display(), bytes = content.len(), "artifact staged");
    Ok(StagedArtifact {
        path: path.to_path_buf(),
        temp: Some(temp),
        changed: true,
    })
}

/// Stage and commit a single artifact. Returns whether the destination differed.
pub fn publish(path: &Path, content: &str, mode: PublishMode) -> Result<bool> {
    stage(path, content, mode)?.commit()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_writes_new_file_and_parents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Derived/Symbols.h");

        assert!(publish(&path, "one", PublishMode::Write).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "one");
    }

    #[test]
    fn test_identical_content_is_not_rewritten() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Symbols.h");

        assert!(publish(&path, "same", PublishMode::Write).unwrap());
        assert!(!publish(&path, "same", PublishMode::Write).unwrap());
    }

    #[test]
    fn test_check_mode_does_not_write() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Symbols.h");
        fs::write(&path, "old").unwrap();

        assert!(publish(&path, "new", PublishMode::Check).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "old");
        assert!(!publish(&path, "old", PublishMode::Check).unwrap());
    }

    #[test]
    fn test_leaves_no_temporary_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Symbols.h");
        publish(&path, "content", PublishMode::Write).unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_staged_artifact_invisible_until_commit() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Symbols.h");

        let staged = stage(&path, "content", PublishMode::Write).unwrap();
        assert!(staged.changed());
        assert!(!path.exists());

        assert!(staged.commit().unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "content");
    }

    #[test]
    fn test_dropped_stage_leaves_nothing_behind() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Symbols.h");

        drop(stage(&path, "content", PublishMode::Write).unwrap());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_unwritable_destination_is_emit_error() {
        let dir = TempDir::new().unwrap();
        // A regular file where a directory is needed
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();

        let err = publish(&blocker.join("Symbols.h"), "x", PublishMode::Write).unwrap_err();
        assert!(matches!(err, GenerateError::EmitIOError { .. }));
    }
}
