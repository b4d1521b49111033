use std::path::PathBuf;

use super::card::{Card, Priority};

/// Parsed `board.yaml`: a display name and the ordered column list. Column
/// order is the left-to-right rendering order and the scan order for id
/// resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    pub name: String,
    pub columns: Vec<String>,
}

/// A fully loaded board. Never persisted as one object — reconstructed on
/// every load from the configuration plus a scan of the column directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// Board root directory
    pub root: PathBuf,
    pub config: BoardConfig,
    /// All cards, sorted by `(column, id)`
    pub cards: Vec<Card>,
}

/// Sort key within one `(column, priority)` group: ranked cards first in
/// rank order, unranked after all of them in creation order.
pub fn group_key(card: &Card) -> (usize, &str) {
    (card.rank.unwrap_or(usize::MAX), card.created.as_str())
}

impl Board {
    /// Look up a card by id, scanning columns in configuration order. Ids
    /// are only unique per column; the first match wins.
    pub fn find_card(&self, id: &str) -> Option<&Card> {
        self.config.columns.iter().find_map(|column| {
            self.cards
                .iter()
                .find(|c| c.column == *column && c.id == id)
        })
    }

    /// Cards of one column in display order: priority groups high to low,
    /// each group ordered by [`group_key`].
    pub fn column_cards(&self, column: &str) -> Vec<&Card> {
        let mut cards: Vec<&Card> = self.cards.iter().filter(|c| c.column == column).collect();
        cards.sort_by(|a, b| (a.priority, group_key(a)).cmp(&(b.priority, group_key(b))));
        cards
    }

    /// Members of one `(column, priority)` ranking group, in group order.
    pub fn group(&self, column: &str, priority: Priority) -> Vec<&Card> {
        let mut cards: Vec<&Card> = self
            .cards
            .iter()
            .filter(|c| c.column == column && c.priority == priority)
            .collect();
        cards.sort_by(|a, b| group_key(a).cmp(&group_key(b)));
        cards
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(id: &str, column: &str, priority: Priority, created: &str, rank: Option<usize>) -> Card {
        let mut c = Card::new(id.into(), id.into(), priority, column.into());
        c.created = created.into();
        c.rank = rank;
        c
    }

    fn board(cards: Vec<Card>) -> Board {
        Board {
            root: PathBuf::from(".kanmd"),
            config: BoardConfig {
                name: "kanban".into(),
                columns: vec!["todo".into(), "done".into()],
            },
            cards,
        }
    }

    #[test]
    fn test_find_card_scans_columns_in_config_order() {
        // Same id in both columns; cards vector deliberately lists the
        // later column first
        let b = board(vec![
            card("dup", "done", Priority::Medium, "2026-01-02T00:00:00Z", None),
            card("dup", "todo", Priority::Medium, "2026-01-01T00:00:00Z", None),
        ]);
        assert_eq!(b.find_card("dup").map(|c| c.column.as_str()), Some("todo"));
        assert_eq!(b.find_card("missing"), None);
    }

    #[test]
    fn test_group_key_puts_unranked_after_ranked() {
        let ranked = card("a", "todo", Priority::Medium, "2026-01-09T00:00:00Z", Some(3));
        let unranked = card("b", "todo", Priority::Medium, "2026-01-01T00:00:00Z", None);
        assert!(group_key(&ranked) < group_key(&unranked));
    }

    #[test]
    fn test_group_sorts_by_rank_then_created() {
        let b = board(vec![
            card("c", "todo", Priority::Medium, "2026-01-03T00:00:00Z", None),
            card("a", "todo", Priority::Medium, "2026-01-01T00:00:00Z", None),
            card("r", "todo", Priority::Medium, "2026-01-09T00:00:00Z", Some(1)),
        ]);
        let ids: Vec<&str> = b
            .group("todo", Priority::Medium)
            .iter()
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(ids, vec!["r", "a", "c"]);
    }

    #[test]
    fn test_column_cards_orders_by_priority_first() {
        let b = board(vec![
            card("low", "todo", Priority::Low, "2026-01-01T00:00:00Z", Some(1)),
            card("med", "todo", Priority::Medium, "2026-01-02T00:00:00Z", None),
            card("high", "todo", Priority::High, "2026-01-03T00:00:00Z", None),
            card("other", "done", Priority::High, "2026-01-01T00:00:00Z", None),
        ]);
        let ids: Vec<&str> = b.column_cards("todo").iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["high", "med", "low"]);
    }
}
