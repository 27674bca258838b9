//! Command-line front end for the notes store.
//!
//! # Responsibility
//! - List, show, add, edit and delete notes against the configured database.
//! - Resolve configuration from `NOTEPAD_*` variables, overridden by flags.

use clap::{Parser, Subcommand};
use log::info;
use notepad_core::db::open_db;
use notepad_core::{
    AppConfig, LogLevel, Note, NoteDraft, NoteService, NoteSummary, RichTextDocument,
    SqliteNoteRepository,
};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use uuid::Uuid;

type CliResult<T = ()> = Result<T, Box<dyn Error>>;

#[derive(Parser, Debug)]
#[command(name = "notepad")]
#[command(version, about = "Local rich-text notes with categories")]
#[command(propagate_version = true)]
struct Cli {
    /// SQLite database file (overrides NOTEPAD_DB_PATH)
    #[arg(long, global = true, value_name = "PATH")]
    db: Option<PathBuf>,

    /// Absolute directory for rolling log files (overrides NOTEPAD_LOG_DIR)
    #[arg(long, global = true, value_name = "DIR")]
    log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error (overrides NOTEPAD_LOG_LEVEL)
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List notes, newest first
    List {
        /// Only notes in this category
        #[arg(long, short = 'c')]
        category: Option<String>,
    },

    /// Print one note
    Show {
        /// Note id (UUID)
        id: String,
    },

    /// Create a note
    Add {
        #[arg(long, short = 't')]
        title: Option<String>,

        /// Plain text; each line becomes a paragraph
        #[arg(long, short = 'b')]
        body: Option<String>,

        #[arg(long, short = 'c')]
        category: Option<String>,
    },

    /// Change fields of an existing note
    Edit {
        /// Note id (UUID)
        id: String,

        #[arg(long, short = 't')]
        title: Option<String>,

        /// Plain text replacing the whole body
        #[arg(long, short = 'b')]
        body: Option<String>,

        /// New category; an empty value clears it
        #[arg(long, short = 'c')]
        category: Option<String>,
    },

    /// Delete a note
    Delete {
        /// Note id (UUID)
        id: String,
    },

    /// List distinct categories
    Categories,

    /// Print core linkage info
    Version,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> CliResult {
    if let Commands::Version = cli.command {
        println!("notepad_core ping={}", notepad_core::ping());
        println!("notepad_core version={}", notepad_core::core_version());
        return Ok(());
    }

    let config = resolve_config(&cli)?;
    config.init_logging()?;
    info!(
        "event=cli_start module=cli status=ok command={}",
        command_name(&cli.command)
    );

    let conn = open_db(&config.db_path)?;
    let service = NoteService::new(SqliteNoteRepository::try_new(&conn)?);

    match cli.command {
        Commands::List { category } => {
            let summaries = service.list_summaries(category.as_deref())?;
            if summaries.is_empty() {
                println!("No notes.");
            }
            for summary in &summaries {
                print_summary(summary);
            }
        }
        Commands::Show { id } => {
            let id = parse_id(&id)?;
            match service.get_note(id)? {
                Some(note) => print_note(&note),
                None => return Err(format!("note not found: {id}").into()),
            }
        }
        Commands::Add {
            title,
            body,
            category,
        } => {
            let note = service.save_note(NoteDraft {
                id: None,
                title,
                body: body.as_deref().map(plain_to_markup),
                category,
            })?;
            println!("{}", note.id);
        }
        Commands::Edit {
            id,
            title,
            body,
            category,
        } => {
            let id = parse_id(&id)?;
            let existing = service
                .get_note(id)?
                .ok_or_else(|| format!("note not found: {id}"))?;
            let note = service.save_note(NoteDraft {
                id: Some(id),
                title: title.or(existing.title),
                body: body.as_deref().map(plain_to_markup).or(existing.body),
                category: category.or(existing.category),
            })?;
            println!("{}", note.id);
        }
        Commands::Delete { id } => {
            let id = parse_id(&id)?;
            service.delete_note(id)?;
            println!("deleted {id}");
        }
        Commands::Categories => {
            for category in service.list_categories()? {
                println!("{category}");
            }
        }
        Commands::Version => {}
    }
    Ok(())
}

fn resolve_config(cli: &Cli) -> CliResult<AppConfig> {
    let mut config = AppConfig::from_env()?;
    if let Some(db) = cli.db.clone() {
        config.db_path = db;
    }
    if let Some(dir) = cli.log_dir.clone() {
        if !dir.is_absolute() {
            return Err(format!("--log-dir must be absolute, got `{}`", dir.display()).into());
        }
        config.log_dir = Some(dir);
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    Ok(config)
}

fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::List { .. } => "list",
        Commands::Show { .. } => "show",
        Commands::Add { .. } => "add",
        Commands::Edit { .. } => "edit",
        Commands::Delete { .. } => "delete",
        Commands::Categories => "categories",
        Commands::Version => "version",
    }
}

fn parse_id(raw: &str) -> CliResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| format!("invalid note id `{}`", raw.trim()).into())
}

fn plain_to_markup(text: &str) -> String {
    RichTextDocument::from_plain_text(text).to_html()
}

fn print_summary(summary: &NoteSummary) {
    println!(
        "{}  {}  [{}]  {}",
        summary.id,
        summary.title.as_deref().unwrap_or("(untitled)"),
        summary.category.as_deref().unwrap_or("-"),
        summary.last_change.as_deref().unwrap_or("")
    );
    if let Some(preview) = summary.preview.as_deref() {
        println!("    {preview}");
    }
}

fn print_note(note: &Note) {
    println!("id:          {}", note.id);
    println!("title:       {}", note.title.as_deref().unwrap_or(""));
    println!("category:    {}", note.category.as_deref().unwrap_or(""));
    let last_change = note
        .last_change
        .as_deref()
        .and_then(notepad_core::format_last_change)
        .unwrap_or_default();
    println!("last change: {last_change}");
    println!();
    println!("{}", note.body_text());
}
