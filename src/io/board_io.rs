use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::BoardError;
use crate::io::atomic::{atomic_write, write_new};
use crate::io::config_io::{ensure_board, read_config};
use crate::io::paths::{assert_within_root, validate_component};
use crate::model::board::Board;
use crate::model::card::Card;
use crate::parse::{parse_card, serialize_card};

/// On-disk location of a card: `<root>/<column>/<id>.md`.
pub fn card_path(root: &Path, column: &str, id: &str) -> PathBuf {
    root.join(column).join(format!("{}.md", id))
}

/// Load the full board from disk: configuration plus every `*.md` card in
/// every column directory. Missing column directories are created
/// (idempotent); a directory that vanishes between creation and scan
/// yields zero cards rather than an error. Cards come back sorted by
/// `(column, id)` so two loads of the same tree compare equal.
pub fn load_board(root: &Path) -> Result<Board, BoardError> {
    ensure_board(root)?;
    let config = read_config(root)?;

    for column in &config.columns {
        validate_component(column)?;
    }

    let mut cards = Vec::new();
    for column in &config.columns {
        let dir = root.join(column);
        assert_within_root(&dir, root)?;
        fs::create_dir_all(&dir)?;

        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            Err(e) => return Err(e.into()),
        };
        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            if path.is_dir() {
                continue;
            }
            if path.extension().and_then(|e| e.to_str()) != Some("md") {
                continue;
            }
            let Some(id) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let text = fs::read_to_string(&path)?;
            cards.push(parse_card(&text, id, column));
        }
    }

    cards.sort_by(|a, b| (&a.column, &a.id).cmp(&(&b.column, &b.id)));

    Ok(Board {
        root: root.to_path_buf(),
        config,
        cards,
    })
}

/// Rewrite an existing card in place (temp file + rename).
pub fn save_card(root: &Path, card: &Card) -> Result<(), BoardError> {
    let path = card_path(root, &card.column, &card.id);
    assert_within_root(&path, root)?;
    atomic_write(&path, serialize_card(card).as_bytes())?;
    Ok(())
}

/// Write a card to a path that must not already exist. A destination
/// collision surfaces as `CardExists` — the loser of a concurrent
/// double-create gets a clean error instead of clobbering the winner.
pub fn save_card_new(root: &Path, card: &Card) -> Result<(), BoardError> {
    let path = card_path(root, &card.column, &card.id);
    assert_within_root(&path, root)?;
    match write_new(&path, serialize_card(card).as_bytes()) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            Err(BoardError::CardExists(card.id.clone()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Unlink a card file.
pub fn remove_card_file(root: &Path, column: &str, id: &str) -> Result<(), BoardError> {
    let path = card_path(root, column, id);
    assert_within_root(&path, root)?;
    fs::remove_file(&path)?;
    Ok(())
}
