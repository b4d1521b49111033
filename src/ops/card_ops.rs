use std::path::Path;

use crate::error::BoardError;
use crate::io::board_io::{load_board, remove_card_file, save_card, save_card_new};
use crate::io::paths::validate_component;
use crate::model::board::Board;
use crate::model::card::{Card, ChecklistItem, Priority, derive_id, now_timestamp};

/// Field updates for [`edit`]. `None` leaves a field untouched; a set field
/// replaces the old value wholesale.
#[derive(Debug, Clone, Default)]
pub struct CardUpdate {
    pub title: Option<String>,
    pub priority: Option<Priority>,
    pub labels: Option<Vec<String>>,
    pub description: Option<String>,
}

/// Create a card in `column`. The id is derived from the title here, once;
/// later title edits never change it. The file write is an exclusive
/// create, so a second add with the same title loses with `CardExists`
/// instead of overwriting the first.
pub fn add(root: &Path, column: &str, title: &str, priority: Priority) -> Result<Card, BoardError> {
    validate_component(column)?;
    let board = load_board(root)?;
    require_column(&board, column)?;

    let id = derive_id(title);
    if id.is_empty() {
        return Err(BoardError::InvalidTitle(title.to_string()));
    }

    let card = Card::new(id, title.to_string(), priority, column.to_string());
    save_card_new(root, &card)?;
    Ok(card)
}

/// Move a card to another column. Rank only orders within one
/// (column, priority) group, so it is cleared. The destination write is
/// exclusive: a leftover file there (say, from a crashed earlier move)
/// surfaces as `CardExists` instead of being clobbered.
pub fn move_card(root: &Path, id: &str, to_column: &str) -> Result<Card, BoardError> {
    validate_component(id)?;
    validate_component(to_column)?;
    let board = load_board(root)?;
    require_column(&board, to_column)?;
    let mut card = find_card(&board, id)?;

    if card.column == to_column {
        return Err(BoardError::AlreadyInColumn {
            id: card.id,
            column: card.column,
        });
    }

    let from_column = std::mem::replace(&mut card.column, to_column.to_string());
    card.rank = None;
    card.updated = Some(now_timestamp());

    // New file first, old file second. A crash in between leaves a visible
    // duplicate rather than a lost card.
    save_card_new(root, &card)?;
    remove_card_file(root, &from_column, &card.id)?;
    Ok(card)
}

pub fn delete(root: &Path, id: &str) -> Result<(), BoardError> {
    validate_component(id)?;
    let board = load_board(root)?;
    let card = find_card(&board, id)?;
    remove_card_file(root, &card.column, &card.id)
}

pub fn get(root: &Path, id: &str) -> Result<Card, BoardError> {
    validate_component(id)?;
    let board = load_board(root)?;
    find_card(&board, id)
}

/// Apply `update` to a card and rewrite it in place. A priority change
/// invalidates the card's rank, same as a column change would.
pub fn edit(root: &Path, id: &str, update: CardUpdate) -> Result<Card, BoardError> {
    validate_component(id)?;
    let board = load_board(root)?;
    let mut card = find_card(&board, id)?;

    if let Some(title) = update.title {
        card.title = title;
    }
    if let Some(priority) = update.priority {
        if priority != card.priority {
            card.rank = None;
        }
        card.priority = priority;
    }
    if let Some(labels) = update.labels {
        card.labels = labels;
    }
    if let Some(description) = update.description {
        card.description = description;
    }
    card.updated = Some(now_timestamp());

    save_card(root, &card)?;
    Ok(card)
}

pub fn checklist_add(root: &Path, id: &str, text: &str) -> Result<Card, BoardError> {
    mutate_checklist(root, id, |items| {
        items.push(ChecklistItem {
            text: text.to_string(),
            checked: false,
        });
        Ok(())
    })
}

pub fn checklist_toggle(root: &Path, id: &str, index: usize) -> Result<Card, BoardError> {
    mutate_checklist(root, id, |items| {
        let item = checklist_item(items, index)?;
        item.checked = !item.checked;
        Ok(())
    })
}

pub fn checklist_remove(root: &Path, id: &str, index: usize) -> Result<Card, BoardError> {
    mutate_checklist(root, id, |items| {
        checklist_item(items, index)?;
        items.remove(index - 1);
        Ok(())
    })
}

fn mutate_checklist<F>(root: &Path, id: &str, mutate: F) -> Result<Card, BoardError>
where
    F: FnOnce(&mut Vec<ChecklistItem>) -> Result<(), BoardError>,
{
    validate_component(id)?;
    let board = load_board(root)?;
    let mut card = find_card(&board, id)?;
    mutate(&mut card.checklist)?;
    card.updated = Some(now_timestamp());
    save_card(root, &card)?;
    Ok(card)
}

/// 1-based checklist lookup.
fn checklist_item(
    items: &mut [ChecklistItem],
    index: usize,
) -> Result<&mut ChecklistItem, BoardError> {
    if index == 0 || index > items.len() {
        return Err(BoardError::IndexOutOfRange {
            index,
            len: items.len(),
        });
    }
    Ok(&mut items[index - 1])
}

fn require_column(board: &Board, column: &str) -> Result<(), BoardError> {
    if board.config.columns.iter().any(|c| c == column) {
        Ok(())
    } else {
        Err(BoardError::ColumnNotFound(column.to_string()))
    }
}

/// Resolve an id to a card, scanning columns in configuration order.
fn find_card(board: &Board, id: &str) -> Result<Card, BoardError> {
    board
        .find_card(id)
        .cloned()
        .ok_or_else(|| BoardError::CardNotFound(id.to_string()))
}
