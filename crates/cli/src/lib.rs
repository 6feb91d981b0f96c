use anyhow::{Context as AnyhowContext, Result};
use chrono::Local;
use clap::{Args, CommandFactory, Parser, Subcommand};
use notes_search::{search, ScoredEntry, Timestamp, DEFAULT_TITLE};
use notes_store::NotesStore;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

pub mod config;
pub mod editor;

use config::{ConfigEnv, ConfigOverrides, NotesConfig};

fn print_stdout(text: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "manager-notes")]
#[command(about = "Daily notes for senior managers", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Notes directory (overrides MANAGER_NOTES_PATH and the config file)
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Config file (overrides MANAGER_NOTES_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize notes directory
    Init(InitArgs),

    /// Create a new dated note
    New(NewArgs),

    /// List notes (optionally filter)
    List(ListArgs),

    /// Print a note to stdout
    Show(ShowArgs),
}

#[derive(Args)]
struct InitArgs {
    /// Path to notes directory
    path: Option<PathBuf>,
}

#[derive(Args)]
struct NewArgs {
    /// Title for the note
    #[arg(default_value = "")]
    title: String,

    /// Comma separated tags
    #[arg(short, long, default_value = "")]
    tags: String,

    /// Don't open editor
    #[arg(long)]
    no_open: bool,

    /// Editor command (overrides EDITOR and the config file)
    #[arg(long)]
    editor: Option<String>,
}

#[derive(Args)]
struct ListArgs {
    /// Query to filter notes
    #[arg(default_value = "")]
    query: String,

    /// Maximum number of results to print
    #[arg(short, long)]
    limit: Option<usize>,

    /// Output JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ShowArgs {
    /// Filename to show
    filename: String,
}

pub fn main_entry() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Error);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(ExitCode::FAILURE);
    };

    let mut overrides = ConfigOverrides {
        notes_dir: cli.dir,
        config_file: cli.config,
        ..ConfigOverrides::default()
    };
    match &command {
        Commands::Init(args) => {
            if let Some(path) = &args.path {
                overrides.notes_dir = Some(path.clone());
            }
        }
        Commands::New(args) => overrides.editor = args.editor.clone(),
        Commands::List(args) => overrides.list_limit = args.limit,
        Commands::Show(_) => {}
    }
    let config = NotesConfig::resolve(overrides, &ConfigEnv::from_process())?;

    let store = NotesStore::open(&config.notes_dir).with_context(|| {
        format!(
            "Cannot open notes directory {}",
            config.notes_dir.display()
        )
    })?;

    match command {
        Commands::Init(_) => run_init(&store)?,
        Commands::New(args) => run_new(args, &store, &config)?,
        Commands::List(args) => run_list(args, &store, &config)?,
        Commands::Show(args) => run_show(args, &store)?,
    }

    Ok(ExitCode::SUCCESS)
}

fn run_init(store: &NotesStore) -> Result<()> {
    print_stdout(&format!("Initialized notes at {}", store.root().display()))
}

fn run_new(args: NewArgs, store: &NotesStore, config: &NotesConfig) -> Result<()> {
    let tags = parse_tags(&args.tags);
    let title = if args.title.is_empty() {
        DEFAULT_TITLE
    } else {
        args.title.as_str()
    };

    let path = store
        .create_note(title, &tags, Local::now())
        .context("Failed to create note")?;

    if !args.no_open {
        let launcher = editor::resolve_launcher(config.editor.as_deref());
        log::debug!("Opening {} with {}", path.display(), launcher.name());
        // The note already exists; an editor failure should not fail the command.
        if let Err(err) = launcher.launch(&path) {
            log::warn!("Could not open editor: {err}");
        }
    }

    print_stdout(&format!("Created note: {}", path.display()))
}

fn run_list(args: ListArgs, store: &NotesStore, config: &NotesConfig) -> Result<()> {
    let entries = store.entries().context("Failed to list notes")?;
    let results = search(&args.query, entries, Timestamp::now());
    let shown = &results[..results.len().min(config.list_limit)];

    if args.json {
        return print_stdout(&serde_json::to_string_pretty(shown)?);
    }
    if shown.is_empty() {
        return print_stdout("No notes found");
    }
    print_stdout(&render_results(shown))
}

fn run_show(args: ShowArgs, store: &NotesStore) -> Result<()> {
    let content = store
        .read_note(&args.filename)
        .with_context(|| format!("Failed to read note {}", args.filename))?;
    print_stdout(&content)
}

fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

fn render_results(results: &[ScoredEntry]) -> String {
    results
        .iter()
        .enumerate()
        .map(|(idx, result)| {
            format!(
                "{:>2}. {}  (score={:.2})",
                idx + 1,
                result.entry.name,
                result.score
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
