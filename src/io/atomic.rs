use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

/// Write `content` to `path` atomically using a temp file + rename.
/// A reader never observes a half-written file at `path`.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    stage(path, content)?.commit()
}

/// Write `content` to `path` with exclusive-create semantics: fails with
/// `AlreadyExists` if the path is occupied. The create is a single
/// syscall, so a concurrent double-create loses cleanly instead of
/// clobbering.
pub fn write_new(path: &Path, content: &[u8]) -> io::Result<()> {
    let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
    file.write_all(content)?;
    file.flush()?;
    Ok(())
}

/// A fully written temp file waiting to be renamed into place.
///
/// Batch mutations (rank renumbering) stage every file first and commit
/// the renames afterwards, shrinking the window in which a crash leaves
/// the group partially rewritten.
pub struct StagedWrite {
    tmp: NamedTempFile,
    dest: PathBuf,
}

/// Stage `content` for `path`: the temp file lives in the destination
/// directory so the final rename never crosses filesystems.
pub fn stage(path: &Path, content: &[u8]) -> io::Result<StagedWrite> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    Ok(StagedWrite {
        tmp,
        dest: path.to_path_buf(),
    })
}

impl StagedWrite {
    /// Rename the staged file into place.
    pub fn commit(self) -> io::Result<()> {
        self.tmp.persist(&self.dest).map_err(|e| e.error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_atomic_write_creates_and_replaces() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("file.md");

        atomic_write(&path, b"one").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "one");

        atomic_write(&path, b"two").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "two");
    }

    #[test]
    fn test_write_new_refuses_existing() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("file.md");

        write_new(&path, b"first").unwrap();
        let err = write_new(&path, b"second").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(fs::read_to_string(&path).unwrap(), "first");
    }

    #[test]
    fn test_staged_writes_commit_in_batch() {
        let tmp = TempDir::new().unwrap();
        let a = tmp.path().join("a.md");
        let b = tmp.path().join("b.md");

        let staged = vec![stage(&a, b"A").unwrap(), stage(&b, b"B").unwrap()];
        // Nothing visible at the final paths until commit
        assert!(!a.exists());
        assert!(!b.exists());

        for s in staged {
            s.commit().unwrap();
        }
        assert_eq!(fs::read_to_string(&a).unwrap(), "A");
        assert_eq!(fs::read_to_string(&b).unwrap(), "B");
    }
}
