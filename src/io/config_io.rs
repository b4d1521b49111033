use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::BoardError;
use crate::io::atomic::write_new;
use crate::model::board::BoardConfig;

/// Board configuration file name, at the top of the board root.
pub const BOARD_FILE: &str = "board.yaml";

const DEFAULT_BOARD_YAML: &str = "\
name: kanban
columns:
  - todo
  - in-progress
  - review
  - done
";

/// Path to the configuration file under `root`.
pub fn board_file_path(root: &Path) -> PathBuf {
    root.join(BOARD_FILE)
}

/// Create the board root and a default `board.yaml` if either is missing.
/// An existing configuration is never touched.
pub fn ensure_board(root: &Path) -> Result<(), BoardError> {
    fs::create_dir_all(root)?;
    match write_new(&board_file_path(root), DEFAULT_BOARD_YAML.as_bytes()) {
        Ok(()) => Ok(()),
        // A concurrent init (or an existing board) got there first
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Read and parse `board.yaml`.
pub fn read_config(root: &Path) -> Result<BoardConfig, BoardError> {
    let text = fs::read_to_string(board_file_path(root))?;
    Ok(parse_config(&text))
}

/// Restricted scanner for the configuration format. This is not YAML:
/// only a top-level `name:` scalar and a `columns:` block list of
/// `- <name>` lines are understood. List collection stops at the first
/// non-indented, non-blank line (the next top-level key); blank lines
/// inside the block are skipped; indented lines that are not list items
/// are ignored.
pub fn parse_config(text: &str) -> BoardConfig {
    let mut name = String::new();
    let mut columns = Vec::new();

    let mut lines = text.lines().peekable();
    while let Some(line) = lines.next() {
        if let Some(value) = line.strip_prefix("name:") {
            name = value.trim().to_string();
            continue;
        }
        if line.trim_end() == "columns:" {
            while let Some(&next) = lines.peek() {
                if next.trim().is_empty() {
                    lines.next();
                    continue;
                }
                if !next.starts_with(char::is_whitespace) {
                    break;
                }
                let item = next.trim_start();
                if let Some(value) = item.strip_prefix("- ") {
                    let value = value.trim();
                    if !value.is_empty() {
                        columns.push(value.to_string());
                    }
                } else {
                    log::debug!("ignoring config line: {:?}", next);
                }
                lines.next();
            }
        }
    }

    if name.is_empty() {
        name = "kanban".to_string();
    }
    BoardConfig { name, columns }
}
