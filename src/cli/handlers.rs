use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crossterm::{cursor, execute, terminal};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::error::BoardError;
use crate::io::board_io::load_board;
use crate::io::config_io::ensure_board;
use crate::io::signal;
use crate::io::watcher::WatchSession;
use crate::model::card::Card;
use crate::ops::card_ops::{self, CardUpdate};
use crate::ops::rank::rank;
use crate::parse::frontmatter::split_list;

/// Resolve the board root: `-C` flag, then `KANMD_DIR`, then `./.kanmd`.
pub fn board_root(flag: Option<&str>) -> PathBuf {
    if let Some(dir) = flag {
        return PathBuf::from(dir);
    }
    if let Ok(dir) = std::env::var("KANMD_DIR")
        && !dir.is_empty()
    {
        return PathBuf::from(dir);
    }
    PathBuf::from(".kanmd")
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), BoardError> {
    let json = cli.json;
    let root = board_root(cli.board_dir.as_deref());

    match cli.command {
        Commands::Init => cmd_init(&root, json),
        Commands::Board => cmd_board(&root, json),
        Commands::Add(args) => {
            let card = card_ops::add(&root, &args.column, &args.title, args.priority)?;
            report_card(&card, json, format!("added {} to {}", card.id, card.column))
        }
        Commands::Show(args) => {
            let card = card_ops::get(&root, &args.id)?;
            if json {
                print_json(&card_to_json(&card))
            } else {
                print_lines(&format_card_detail(&card))
            }
        }
        Commands::Mv(args) => {
            let card = card_ops::move_card(&root, &args.id, &args.column)?;
            report_card(&card, json, format!("moved {} to {}", card.id, card.column))
        }
        Commands::Rm(args) => {
            card_ops::delete(&root, &args.id)?;
            if json {
                print_json(&serde_json::json!({ "deleted": args.id }))
            } else {
                println!("deleted {}", args.id);
                Ok(())
            }
        }
        Commands::Edit(args) => {
            let update = CardUpdate {
                title: args.title,
                priority: args.priority,
                labels: args.labels.as_deref().map(split_list),
                description: args.description,
            };
            let card = card_ops::edit(&root, &args.id, update)?;
            report_card(&card, json, format!("updated {}", card.id))
        }
        Commands::Rank(args) => {
            let card = rank(&root, &args.id, args.position)?;
            let position = card.rank.unwrap_or(args.position);
            report_card(&card, json, format!("ranked {} at {}", card.id, position))
        }
        Commands::Check(cmd) => match cmd.action {
            CheckAction::Add(args) => {
                let card = card_ops::checklist_add(&root, &args.id, &args.text)?;
                report_card(
                    &card,
                    json,
                    format!("added item {} to {}", card.checklist.len(), card.id),
                )
            }
            CheckAction::Toggle(args) => {
                let card = card_ops::checklist_toggle(&root, &args.id, args.index)?;
                let marker = if card.checklist[args.index - 1].checked { "x" } else { " " };
                report_card(
                    &card,
                    json,
                    format!("item {} of {} is now [{}]", args.index, card.id, marker),
                )
            }
            CheckAction::Rm(args) => {
                let card = card_ops::checklist_remove(&root, &args.id, args.index)?;
                report_card(
                    &card,
                    json,
                    format!("removed item {} from {}", args.index, card.id),
                )
            }
        },
        Commands::Watch => cmd_watch(&root),
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

fn cmd_init(root: &Path, json: bool) -> Result<(), BoardError> {
    ensure_board(root)?;
    // Loading also creates the column directories
    let board = load_board(root)?;
    if json {
        print_json(&serde_json::json!({
            "root": root.display().to_string(),
            "columns": board.config.columns,
        }))
    } else {
        println!(
            "board ready at {} ({})",
            root.display(),
            board.config.columns.join(", ")
        );
        Ok(())
    }
}

fn cmd_board(root: &Path, json: bool) -> Result<(), BoardError> {
    let board = load_board(root)?;
    if json {
        print_json(&board_to_json(&board))
    } else {
        print_lines(&render_board(&board))
    }
}

fn cmd_watch(root: &Path) -> Result<(), BoardError> {
    signal::install();
    let session = WatchSession::new(root);
    session.run(&mut |board| {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            terminal::Clear(terminal::ClearType::All),
            cursor::MoveTo(0, 0)
        )?;
        for line in render_board(board) {
            writeln!(stdout, "{}", line)?;
        }
        writeln!(stdout, "\nwatching {} (ctrl-c to quit)", board.root.display())?;
        stdout.flush()?;
        Ok(())
    })?;
    println!("watch stopped");
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn report_card(card: &Card, json: bool, message: String) -> Result<(), BoardError> {
    if json {
        print_json(&card_to_json(card))
    } else {
        println!("{}", message);
        Ok(())
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), BoardError> {
    let text = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
    println!("{}", text);
    Ok(())
}

fn print_lines(lines: &[String]) -> Result<(), BoardError> {
    for line in lines {
        println!("{}", line);
    }
    Ok(())
}
