use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "jotter", version, about = "Local-first terminal notes")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a project note store in the current directory
    Init {
        /// Reset the store to an empty collection if it already holds notes
        #[arg(long)]
        force: bool,
    },
    /// List notes, newest first
    List {
        /// Only show notes whose title contains this text
        #[arg(long, short)]
        query: Option<String>,
    },
    /// Add a new note
    Add {
        /// Title of the note
        title: String,
        /// Body of the note
        body: String,
    },
    /// Edit an existing note
    Edit {
        /// Note id to edit
        note_id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New body
        #[arg(long)]
        body: Option<String>,
    },
    /// Delete a note
    Delete {
        /// Note id to delete
        note_id: String,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
    /// Print where notes are stored
    Path,
    /// Launch the interactive TUI
    Tui,
}
