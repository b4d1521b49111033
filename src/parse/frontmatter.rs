/// Parsed frontmatter fields. Presence is typed: `None` means the key was
/// absent (or unparsable, for `rank`), never an empty-string sentinel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frontmatter {
    pub priority: Option<String>,
    pub labels: Vec<String>,
    pub dependencies: Vec<String>,
    pub created: Option<String>,
    pub updated: Option<String>,
    pub rank: Option<usize>,
}

/// Split card text into frontmatter and body.
///
/// The frontmatter grammar is deliberately tiny — this is not YAML:
///   - block delimited by `---` lines at the very top of the file
///   - one `key: value` per line, split on the first `:`, both sides trimmed
///   - `labels` and `dependencies` are comma-separated lists; empty elements
///     are dropped
///   - `rank` must parse as an integer; a malformed value leaves the field
///     unset rather than erroring
///   - lines without a `:` are ignored; no nesting, no quoting, no
///     multi-line values
///
/// If the opening delimiter is missing, or no closing delimiter follows it,
/// the whole text is body and the frontmatter is empty.
pub fn parse_frontmatter(text: &str) -> (Frontmatter, String) {
    let lines: Vec<&str> = text.lines().collect();

    if lines.first().map(|l| l.trim_end()) != Some("---") {
        return (Frontmatter::default(), text.trim().to_string());
    }

    let close = lines[1..].iter().position(|l| l.trim_end() == "---");
    let Some(close) = close else {
        return (Frontmatter::default(), text.trim().to_string());
    };
    let close = close + 1;

    let mut fm = Frontmatter::default();
    for line in &lines[1..close] {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        let value = value.trim();
        match key {
            "labels" => fm.labels = split_list(value),
            "dependencies" => fm.dependencies = split_list(value),
            "rank" => fm.rank = value.parse().ok(),
            "priority" => fm.priority = Some(value.to_string()),
            "created" => fm.created = Some(value.to_string()),
            "updated" => fm.updated = Some(value.to_string()),
            _ => {}
        }
    }

    let body = lines[close + 1..].join("\n").trim().to_string();
    (fm, body)
}

/// Comma-split a list value, trimming elements and dropping empty ones.
/// Also the rule for list-valued CLI flags, so `--labels` round-trips
/// through the same grammar the file format uses.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}
