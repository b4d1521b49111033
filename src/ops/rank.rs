use std::path::Path;

use crate::error::BoardError;
use crate::io::atomic::stage;
use crate::io::board_io::{card_path, load_board};
use crate::io::paths::{assert_within_root, validate_component};
use crate::model::card::{Card, now_timestamp};
use crate::parse::serialize_card;

/// Place a card at `position` (1-based) within its (column, priority)
/// group and renumber the whole group to contiguous ranks.
///
/// The group is ordered ranked-first, then unranked by creation time; the
/// target is pulled out and reinserted at the requested slot (clamped to
/// the end). Only cards whose rank actually changed are rewritten, and the
/// batch is two-phase: every temp file is staged before any rename. That
/// shrinks the window in which a crash leaves the group partially
/// renumbered, but does not close it.
pub fn rank(root: &Path, id: &str, position: usize) -> Result<Card, BoardError> {
    if position < 1 {
        return Err(BoardError::InvalidPosition(position));
    }
    validate_component(id)?;
    let board = load_board(root)?;
    let card = board
        .find_card(id)
        .ok_or_else(|| BoardError::CardNotFound(id.to_string()))?
        .clone();

    let mut group: Vec<Card> = board
        .group(&card.column, card.priority)
        .into_iter()
        .cloned()
        .collect();
    group.retain(|c| c.id != card.id);

    let insert_at = (position - 1).min(group.len());
    group.insert(insert_at, card.clone());

    let stamp = now_timestamp();
    let mut changed = Vec::new();
    for (i, c) in group.iter_mut().enumerate() {
        let new_rank = Some(i + 1);
        if c.rank != new_rank {
            c.rank = new_rank;
            c.updated = Some(stamp.clone());
            changed.push(c.clone());
        }
    }

    let mut staged = Vec::with_capacity(changed.len());
    for c in &changed {
        let path = card_path(root, &c.column, &c.id);
        assert_within_root(&path, root)?;
        staged.push(stage(&path, serialize_card(c).as_bytes())?);
    }
    for s in staged {
        s.commit()?;
    }

    Ok(group.into_iter().find(|c| c.id == id).unwrap_or(card))
}
