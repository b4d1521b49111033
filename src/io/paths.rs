use std::path::Path;

use crate::error::BoardError;

/// Validate a user-supplied path component (column name or card id).
///
/// Allowlist: ASCII letters, digits, `-`, `_`. Rejects empty strings and
/// the `.`/`..` specials. Applied before any filesystem access.
pub fn validate_component(s: &str) -> Result<(), BoardError> {
    if s.is_empty() || s == "." || s == ".." {
        return Err(BoardError::InvalidName(s.to_string()));
    }
    if !s
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(BoardError::InvalidName(s.to_string()));
    }
    Ok(())
}

/// Confirm that `path` resolves to the board root or strictly under it.
///
/// Canonicalizes the parent directory (which must exist) and re-joins the
/// file name, so the check holds for paths about to be created. Guards
/// against symlink and absolute-path tricks that component validation
/// cannot see.
pub fn assert_within_root(path: &Path, root: &Path) -> Result<(), BoardError> {
    let canonical_root = root.canonicalize()?;

    let canonical = match path.canonicalize() {
        Ok(p) => p,
        // Not yet on disk: resolve the parent and re-attach the file name
        Err(_) => {
            let parent = path.parent().unwrap_or(Path::new("."));
            let name = path
                .file_name()
                .ok_or_else(|| BoardError::PathTraversal(path.to_path_buf()))?;
            parent.canonicalize()?.join(name)
        }
    };

    if canonical == canonical_root || canonical.starts_with(&canonical_root) {
        Ok(())
    } else {
        Err(BoardError::PathTraversal(path.to_path_buf()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_validate_component_accepts_safe_names() {
        for name in ["todo", "in-progress", "done_2", "A1", "x"] {
            assert!(validate_component(name).is_ok(), "{name} should be valid");
        }
    }

    #[test]
    fn test_validate_component_rejects_unsafe_names() {
        for name in ["", ".", "..", "a/b", "a\\b", "a b", "a:b", "a*b", "café"] {
            assert!(validate_component(name).is_err(), "{name:?} should be invalid");
        }
    }

    #[test]
    fn test_within_root_ok() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("todo")).unwrap();
        let target = tmp.path().join("todo/card.md");
        assert!(assert_within_root(&target, tmp.path()).is_ok());
    }

    #[test]
    fn test_escape_via_dotdot_rejected() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("board");
        fs::create_dir(&root).unwrap();
        let target = root.join("../outside.md");
        let err = assert_within_root(&target, &root).unwrap_err();
        assert_eq!(err.code(), "PathTraversal");
    }

    #[cfg(unix)]
    #[test]
    fn test_escape_via_symlink_rejected() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("board");
        let elsewhere = tmp.path().join("elsewhere");
        fs::create_dir(&root).unwrap();
        fs::create_dir(&elsewhere).unwrap();
        std::os::unix::fs::symlink(&elsewhere, root.join("sneaky")).unwrap();

        let target = root.join("sneaky/card.md");
        let err = assert_within_root(&target, &root).unwrap_err();
        assert_eq!(err.code(), "PathTraversal");
    }
}
