use std::sync::LazyLock;

use regex::Regex;

use crate::model::card::{Card, ChecklistItem, Priority};
use crate::parse::frontmatter::parse_frontmatter;

/// `- [x] text` / `- [ ] text`
static CHECKLIST_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^- \[( |x)\] (.+)$").unwrap());

/// Body walker state. `Other` covers unrecognized `## ` sections, whose
/// content is discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Header,
    Description,
    Checklist,
    Other,
}

/// Parse a card file. `id` comes from the filename (`.md` stripped by the
/// caller) and `column` from the directory — neither is read from the text.
pub fn parse_card(text: &str, id: &str, column: &str) -> Card {
    let (fm, body) = parse_frontmatter(text);

    let mut title: Option<String> = None;
    let mut description_lines: Vec<&str> = Vec::new();
    let mut checklist: Vec<ChecklistItem> = Vec::new();
    let mut section = Section::Header;

    for line in body.lines() {
        if line == "## Description" {
            section = Section::Description;
            continue;
        }
        if line == "## Checklist" {
            section = Section::Checklist;
            continue;
        }
        if line.starts_with("## ") {
            section = Section::Other;
            continue;
        }

        match section {
            Section::Description => description_lines.push(line),
            Section::Checklist => {
                if let Some(caps) = CHECKLIST_ITEM.captures(line) {
                    checklist.push(ChecklistItem {
                        text: caps[2].to_string(),
                        checked: &caps[1] == "x",
                    });
                }
            }
            Section::Header | Section::Other => {
                if title.is_none()
                    && let Some(rest) = line.strip_prefix("# ")
                {
                    title = Some(rest.trim().to_string());
                }
            }
        }
    }

    Card {
        id: id.to_string(),
        title: title.unwrap_or_else(|| "Untitled".to_string()),
        priority: fm
            .priority
            .as_deref()
            .and_then(Priority::parse)
            .unwrap_or_default(),
        labels: fm.labels,
        dependencies: fm.dependencies,
        created: fm.created.unwrap_or_default(),
        updated: fm.updated,
        description: description_lines.join("\n").trim().to_string(),
        checklist,
        column: column.to_string(),
        rank: fm.rank,
    }
}
