use crate::model::card::{Card, now_timestamp};

/// Serialize a card to its canonical file form.
///
/// Field order is fixed so that parse → serialize is byte-stable:
/// frontmatter (`priority`, `labels`, `dependencies`, `created`, then
/// `rank` and `updated` only when set), title heading, then the
/// `## Description` and `## Checklist` sections only when non-empty.
/// The `labels:` and `dependencies:` lines are always emitted, even empty,
/// so the fields round-trip. Output ends with exactly one newline.
pub fn serialize_card(card: &Card) -> String {
    let mut out = String::new();

    out.push_str("---\n");
    out.push_str(&format!("priority: {}\n", card.priority.as_str()));
    out.push_str(&list_line("labels", &card.labels));
    out.push_str(&list_line("dependencies", &card.dependencies));
    if card.created.is_empty() {
        out.push_str(&format!("created: {}\n", now_timestamp()));
    } else {
        out.push_str(&format!("created: {}\n", card.created));
    }
    if let Some(rank) = card.rank {
        out.push_str(&format!("rank: {}\n", rank));
    }
    if let Some(ref updated) = card.updated {
        out.push_str(&format!("updated: {}\n", updated));
    }
    out.push_str("---\n");

    out.push('\n');
    if card.title.is_empty() {
        out.push_str("# Untitled\n");
    } else {
        out.push_str(&format!("# {}\n", card.title));
    }

    if !card.description.is_empty() {
        out.push('\n');
        out.push_str("## Description\n");
        out.push_str(&card.description);
        out.push('\n');
    }

    if !card.checklist.is_empty() {
        out.push('\n');
        out.push_str("## Checklist\n");
        for item in &card.checklist {
            let marker = if item.checked { 'x' } else { ' ' };
            out.push_str(&format!("- [{}] {}\n", marker, item.text));
        }
    }

    out
}

/// `key: a, b` for a non-empty list, bare `key:` otherwise.
fn list_line(key: &str, items: &[String]) -> String {
    if items.is_empty() {
        format!("{}:\n", key)
    } else {
        format!("{}: {}\n", key, items.join(", "))
    }
}
