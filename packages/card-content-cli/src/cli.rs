use std::path::PathBuf;

use card_content_core::SectionKind;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "card-content", version, about = "Card content catalog editor")]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(long, global = true, help = "Server base URL (overrides the config file)")]
    pub server: Option<String>,
    #[arg(long, global = true, help = "Path to editor.json")]
    pub config: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        help = "Show the pending changes without writing them"
    )]
    pub dry_run: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the whole document.
    Show,
    /// List the sections of one kind (or all kinds) with their card counts.
    Sections {
        #[arg(long, value_enum)]
        kind: Option<KindArg>,
    },
    /// Add a card to a profile type section.
    AddProfileCard {
        #[arg(long)]
        section: String,
        #[arg(long)]
        id: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        source: String,
        #[arg(long)]
        role: Option<String>,
        #[arg(long)]
        style: Option<String>,
        #[arg(long = "division")]
        divisions: Vec<String>,
    },
    /// Add a card to a home card or guideline section.
    AddItem {
        #[arg(long, value_enum, default_value_t = KindArg::HomeCards)]
        kind: KindArg,
        #[arg(long)]
        section: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        header: Option<String>,
    },
    /// Delete every card in a section matching an identity
    /// (profile card id, or item description).
    DeleteCard {
        #[arg(long, value_enum)]
        kind: KindArg,
        #[arg(long)]
        section: String,
        identity: String,
    },
    /// Delete the single item at a position in a home card or guideline section.
    DeleteItem {
        #[arg(long, value_enum, default_value_t = KindArg::HomeCards)]
        kind: KindArg,
        #[arg(long)]
        section: String,
        #[arg(long)]
        index: usize,
    },
    /// Pick the cards the chat home screen would show.
    Feed {
        #[arg(long)]
        profile_type: Option<String>,
        #[arg(long, default_value = "default")]
        role: String,
        #[arg(long = "user-role")]
        user_roles: Vec<String>,
        #[arg(long, default_value_t = 4)]
        count: usize,
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum KindArg {
    ProfileTypes,
    HomeCards,
    Guidelines,
}

impl From<KindArg> for SectionKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::ProfileTypes => SectionKind::ProfileTypes,
            KindArg::HomeCards => SectionKind::HomeCards,
            KindArg::Guidelines => SectionKind::Guidelines,
        }
    }
}
