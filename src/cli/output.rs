use crossterm::style::{Color, Stylize};
use serde::Serialize;
use unicode_width::UnicodeWidthStr;

use crate::error::BoardError;
use crate::model::board::Board;
use crate::model::card::{Card, ChecklistItem, Priority};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct CardJson {
    pub id: String,
    pub column: String,
    pub title: String,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
    pub created: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<usize>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub checklist: Vec<ChecklistItem>,
}

#[derive(Serialize)]
pub struct ColumnJson {
    pub name: String,
    pub cards: Vec<CardJson>,
}

#[derive(Serialize)]
pub struct BoardJson {
    pub name: String,
    pub columns: Vec<ColumnJson>,
}

#[derive(Serialize)]
pub struct ErrorJson {
    pub error: ErrorDetailJson,
}

#[derive(Serialize)]
pub struct ErrorDetailJson {
    pub code: &'static str,
    pub message: String,
}

impl From<&BoardError> for ErrorJson {
    fn from(e: &BoardError) -> Self {
        ErrorJson {
            error: ErrorDetailJson {
                code: e.code(),
                message: e.to_string(),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn card_to_json(card: &Card) -> CardJson {
    CardJson {
        id: card.id.clone(),
        column: card.column.clone(),
        title: card.title.clone(),
        priority: card.priority,
        labels: card.labels.clone(),
        dependencies: card.dependencies.clone(),
        created: card.created.clone(),
        updated: card.updated.clone(),
        rank: card.rank,
        description: card.description.clone(),
        checklist: card.checklist.clone(),
    }
}

pub fn board_to_json(board: &Board) -> BoardJson {
    BoardJson {
        name: board.config.name.clone(),
        columns: board
            .config
            .columns
            .iter()
            .map(|column| ColumnJson {
                name: column.clone(),
                cards: board
                    .column_cards(column)
                    .into_iter()
                    .map(card_to_json)
                    .collect(),
            })
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::High => Color::Red,
        Priority::Medium => Color::Yellow,
        Priority::Low => Color::Green,
    }
}

/// One line per card: priority bullet, padded id, title, checklist
/// progress, labels.
pub fn format_card_line(card: &Card, id_width: usize) -> String {
    let bullet = "●".with(priority_color(card.priority));
    let pad = " ".repeat(id_width.saturating_sub(card.id.width()));
    let mut line = format!("  {} {}{}  {}", bullet, card.id, pad, card.title);
    if !card.checklist.is_empty() {
        let done = card.checklist.iter().filter(|i| i.checked).count();
        line.push_str(&format!(" [{}/{}]", done, card.checklist.len()));
    }
    for label in &card.labels {
        line.push_str(&format!(" {}", format!("#{}", label).with(Color::Cyan)));
    }
    line
}

/// Render the whole board, one column section at a time, columns in
/// configuration order.
pub fn render_board(board: &Board) -> Vec<String> {
    let mut lines = Vec::new();
    let mut first = true;
    for column in &board.config.columns {
        if !first {
            lines.push(String::new());
        }
        first = false;
        let cards = board.column_cards(column);
        lines.push(format!("== {} ({}) ==", column, cards.len()).bold().to_string());
        let id_width = cards.iter().map(|c| c.id.width()).max().unwrap_or(0);
        for card in cards {
            lines.push(format_card_line(card, id_width));
        }
    }
    lines
}

/// Detailed single-card view for `show`.
pub fn format_card_detail(card: &Card) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push(format!(
        "{} {}",
        "●".with(priority_color(card.priority)),
        card.title.clone().bold()
    ));
    lines.push(format!("id: {}", card.id));
    lines.push(format!("column: {}", card.column));
    lines.push(format!("priority: {}", card.priority));
    if !card.labels.is_empty() {
        lines.push(format!("labels: {}", card.labels.join(", ")));
    }
    if !card.dependencies.is_empty() {
        lines.push(format!("dependencies: {}", card.dependencies.join(", ")));
    }
    if !card.created.is_empty() {
        lines.push(format!("created: {}", card.created));
    }
    if let Some(ref updated) = card.updated {
        lines.push(format!("updated: {}", updated));
    }
    if let Some(rank) = card.rank {
        lines.push(format!("rank: {}", rank));
    }
    if !card.description.is_empty() {
        lines.push(String::new());
        for line in card.description.lines() {
            lines.push(line.to_string());
        }
    }
    if !card.checklist.is_empty() {
        lines.push(String::new());
        for (i, item) in card.checklist.iter().enumerate() {
            let marker = if item.checked { 'x' } else { ' ' };
            lines.push(format!("{}. [{}] {}", i + 1, marker, item.text));
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::board::BoardConfig;
    use std::path::PathBuf;

    fn sample_card() -> Card {
        let mut card = Card::new(
            "build-login-page".into(),
            "Build login page".into(),
            Priority::High,
            "todo".into(),
        );
        card.created = "2026-01-01T00:00:00Z".into();
        card.labels = vec!["auth".into()];
        card.checklist = vec![
            ChecklistItem { text: "draft UI".into(), checked: true },
            ChecklistItem { text: "wire backend".into(), checked: false },
        ];
        card
    }

    #[test]
    fn test_card_json_drops_absent_optionals() {
        let json = serde_json::to_string(&card_to_json(&sample_card())).unwrap();
        assert!(json.contains("\"priority\":\"high\""));
        assert!(!json.contains("\"rank\""));
        assert!(!json.contains("\"updated\""));
        assert!(!json.contains("\"dependencies\""));
        assert!(!json.contains("\"description\""));
    }

    #[test]
    fn test_error_json_carries_code() {
        let err = BoardError::CardNotFound("ghost".into());
        let json = serde_json::to_string(&ErrorJson::from(&err)).unwrap();
        assert!(json.contains("\"code\":\"CardNotFound\""));
        assert!(json.contains("ghost"));
    }

    #[test]
    fn test_card_line_shows_checklist_progress() {
        let line = format_card_line(&sample_card(), 0);
        assert!(line.contains("build-login-page"));
        assert!(line.contains("[1/2]"));
        assert!(line.contains("#auth"));
    }

    #[test]
    fn test_board_json_keeps_column_order() {
        let board = Board {
            root: PathBuf::from(".kanmd"),
            config: BoardConfig {
                name: "kanban".into(),
                columns: vec!["todo".into(), "done".into()],
            },
            cards: vec![sample_card()],
        };
        let json = board_to_json(&board);
        assert_eq!(json.columns.len(), 2);
        assert_eq!(json.columns[0].name, "todo");
        assert_eq!(json.columns[0].cards.len(), 1);
        assert!(json.columns[1].cards.is_empty());
    }

    #[test]
    fn test_detail_includes_rank_only_when_set() {
        let mut card = sample_card();
        let without: Vec<String> = format_card_detail(&card);
        assert!(!without.iter().any(|l| l.starts_with("rank:")));

        card.rank = Some(2);
        let with = format_card_detail(&card);
        assert!(with.iter().any(|l| l == "rank: 2"));
    }
}
