use clap::{Args, Parser, Subcommand};

use crate::model::card::Priority;

#[derive(Parser)]
#[command(name = "kanmd", about = concat!("kanmd v", env!("CARGO_PKG_VERSION"), " - a kanban board in a directory of markdown"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different board directory
    #[arg(short = 'C', long = "board-dir", global = true)]
    pub board_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the board directory and a default configuration
    Init,
    /// Show the full board
    Board,
    /// Add a card to a column
    Add(AddArgs),
    /// Show card details
    Show(IdArg),
    /// Move a card to another column
    Mv(MvArgs),
    /// Delete a card
    Rm(IdArg),
    /// Edit card fields
    Edit(EditArgs),
    /// Set a card's position within its priority group
    Rank(RankArgs),
    /// Checklist operations
    Check(CheckCmd),
    /// Watch the board and re-render on changes
    Watch,
}

#[derive(Args)]
pub struct AddArgs {
    /// Column to add the card to
    pub column: String,
    /// Card title (the card id is derived from it)
    pub title: String,
    /// Card priority
    #[arg(long, value_enum, default_value_t = Priority::Medium)]
    pub priority: Priority,
}

#[derive(Args)]
pub struct IdArg {
    /// Card ID
    pub id: String,
}

#[derive(Args)]
pub struct MvArgs {
    /// Card ID
    pub id: String,
    /// Destination column
    pub column: String,
}

#[derive(Args)]
pub struct EditArgs {
    /// Card ID
    pub id: String,
    /// New title (the id stays as it was)
    #[arg(long)]
    pub title: Option<String>,
    /// New priority (clears the card's rank if it changes)
    #[arg(long, value_enum)]
    pub priority: Option<Priority>,
    /// Comma-separated labels, replacing the existing set
    #[arg(long)]
    pub labels: Option<String>,
    /// New description
    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Args)]
pub struct RankArgs {
    /// Card ID
    pub id: String,
    /// Desired 1-based position within the card's priority group
    pub position: usize,
}

#[derive(Args)]
pub struct CheckCmd {
    #[command(subcommand)]
    pub action: CheckAction,
}

#[derive(Subcommand)]
pub enum CheckAction {
    /// Append a checklist item
    Add(CheckAddArgs),
    /// Toggle a checklist item
    Toggle(CheckIndexArgs),
    /// Remove a checklist item
    Rm(CheckIndexArgs),
}

#[derive(Args)]
pub struct CheckAddArgs {
    /// Card ID
    pub id: String,
    /// Item text
    pub text: String,
}

#[derive(Args)]
pub struct CheckIndexArgs {
    /// Card ID
    pub id: String,
    /// 1-based item index
    pub index: usize,
}
