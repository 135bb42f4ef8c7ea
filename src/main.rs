use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use pft_calc::history::{self, Session};
use pft_calc::output;
use pft_calc::prompt::prompt_until;
use pft_calc::scoring::{
    self, parse_count, parse_run_time, RawScoreInput, ReferenceTable, ScoreInput, ScoringError,
};
use pft_calc::settings::{self, Settings};
use pft_calc::store::{CacacheStore, KeyValueStore};

const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 1;
const EXIT_STORAGE: i32 = 2;
const EXIT_LOOKUP: i32 = 3;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score a test attempt (default if no subcommand); prompts for missing values
    Score(ScoreArgs),
    /// List saved sessions with a progress summary
    History {
        /// Print sessions and summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a saved session by its index number
    Delete {
        /// Index number of the session (1-based, as shown in history)
        index: usize,
    },
    /// Write all saved sessions to a JSON file
    Export {
        /// Destination file
        path: PathBuf,
    },
    /// Show or change the age and gender used for scoring
    Settings {
        #[arg(long, allow_hyphen_values = true)]
        age: Option<String>,
        /// male or female
        #[arg(long)]
        gender: Option<String>,
    },
    /// Manage the config file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Write a config file with the built-in reference table
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args, Debug, Default)]
struct ScoreArgs {
    /// Push-up reps
    #[arg(long, allow_hyphen_values = true)]
    push_ups: Option<String>,

    /// Sit-up reps
    #[arg(long, allow_hyphen_values = true)]
    sit_ups: Option<String>,

    /// Run time, e.g. "15:30" or "15m30s"
    #[arg(long, allow_hyphen_values = true, conflicts_with_all = ["run_minutes", "run_seconds"])]
    run: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    run_minutes: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    run_seconds: Option<String>,

    /// Age (defaults to saved settings)
    #[arg(long, allow_hyphen_values = true)]
    age: Option<String>,

    /// male or female (defaults to saved settings)
    #[arg(long)]
    gender: Option<String>,

    /// Whole input as JSON: {"pushUps", "sitUps", "runMinutes", "runSeconds", "age", "gender"}
    #[arg(long, conflicts_with_all = ["push_ups", "sit_ups", "run", "run_minutes", "run_seconds", "age", "gender"])]
    input: Option<String>,

    /// Save the result to history
    #[arg(long)]
    save: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Debug)]
#[command(name = "pft-calc")]
#[command(about = "Physical fitness test score calculator", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/pft-calc/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "pft_calc=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Exit code for a failed command: scoring errors by kind, anything else is storage
fn exit_code_for(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<ScoringError>() {
        Some(ScoringError::InvalidInput { .. }) => EXIT_INPUT,
        Some(ScoringError::Lookup { .. }) => EXIT_LOOKUP,
        Some(ScoringError::DegenerateRange { .. }) => EXIT_CONFIG,
        None => EXIT_STORAGE,
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let command = cli
        .command
        .unwrap_or_else(|| Commands::Score(ScoreArgs::default()));
    let config_path = cli.config.map(PathBuf::from);

    // Config init must work even when the existing config is broken
    if let Commands::Config {
        command: ConfigCommands::Init { force },
    } = command
    {
        let path = match config_path.map_or_else(pft_calc::config::get_config_path, Ok) {
            Ok(p) => p,
            Err(e) => {
                eprintln!("Config error: {}", e);
                std::process::exit(EXIT_CONFIG);
            }
        };
        if let Err(e) = pft_calc::config::write_default_config(&path, force) {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
        println!("Config written to {}", path.display());
        std::process::exit(EXIT_SUCCESS);
    }

    // Load config
    let config = match pft_calc::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate reference table at startup
    let table = config.reference_table();
    if let Err(errors) = scoring::validate_table(&table) {
        eprintln!("Reference table errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let mut store = CacacheStore::new(config.storage_path());
    tracing::debug!(path = %store.path().display(), "using store");

    let result = match command {
        Commands::Score(args) => run_score(&args, &table, &mut store),
        Commands::History { json } => run_history(&store, json),
        Commands::Delete { index } => run_delete(&mut store, index),
        Commands::Export { path } => run_export(&store, &path),
        Commands::Settings { age, gender } => run_settings(&mut store, age, gender),
        Commands::Config { .. } => Ok(()),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(exit_code_for(&e));
    }

    std::process::exit(EXIT_SUCCESS);
}

fn read_input(args: &ScoreArgs, store: &impl KeyValueStore) -> Result<ScoreInput> {
    if let Some(ref json) = args.input {
        let raw: RawScoreInput = serde_json::from_str(json).map_err(|e| {
            ScoringError::InvalidInput {
                field: "input",
                reason: e.to_string(),
            }
        })?;
        return Ok(raw.validate()?);
    }

    // Flags win over saved settings
    let saved = settings::load_settings(store)?;
    let profile = Settings {
        age: args.age.clone().unwrap_or(saved.age),
        gender: args.gender.clone().unwrap_or(saved.gender),
    };
    let (age, gender) = profile.resolve()?;

    let push_ups = match args.push_ups {
        Some(ref text) => parse_count("push-ups", text)?,
        None => prompt_until("Push-Ups (reps): ", |s| parse_count("push-ups", s))?,
    };
    let sit_ups = match args.sit_ups {
        Some(ref text) => parse_count("sit-ups", text)?,
        None => prompt_until("Sit-Ups (reps): ", |s| parse_count("sit-ups", s))?,
    };

    let run_seconds = if let Some(ref text) = args.run {
        parse_run_time(text)?
    } else if args.run_minutes.is_some() || args.run_seconds.is_some() {
        let minutes = parse_count("run minutes", args.run_minutes.as_deref().unwrap_or("0"))?;
        let seconds = parse_count("run seconds", args.run_seconds.as_deref().unwrap_or("0"))?;
        minutes
            .checked_mul(60)
            .and_then(|m| m.checked_add(seconds))
            .ok_or_else(|| ScoringError::InvalidInput {
                field: "run time",
                reason: "too large".to_string(),
            })?
    } else {
        prompt_until("3.2 km Run time (e.g. 15:30): ", parse_run_time)?
    };

    Ok(ScoreInput {
        push_ups,
        sit_ups,
        run_seconds,
        age,
        gender,
    })
}

fn run_score(args: &ScoreArgs, table: &ReferenceTable, store: &mut CacacheStore) -> Result<()> {
    let input = read_input(args, &*store)?;
    let result = scoring::calculate_score(&input, table)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", output::format_result(&input, &result, output::should_use_colors()));
    }

    if args.save {
        let count = history::append_session(store, Session::record(&input, &result))?;
        if args.json {
            eprintln!("Session saved ({} total).", count);
        } else {
            println!("Session saved ({} total).", count);
        }
    }

    Ok(())
}

fn run_history(store: &CacacheStore, json: bool) -> Result<()> {
    let sessions = history::load_sessions(store)?;
    let progress = history::progress(&sessions);
    let points = history::chart_points(&sessions);

    if json {
        let value = serde_json::json!({
            "sessions": sessions,
            "progress": progress,
            "points": points,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!(
        "{}",
        output::format_session_list(&sessions, output::should_use_colors())
    );
    if let Some(progress) = progress {
        println!();
        println!("{}", output::format_progress(&progress));
        println!("{}", output::format_trend(&points));
    }
    Ok(())
}

fn run_delete(store: &mut CacacheStore, index: usize) -> Result<()> {
    let removed = history::delete_session(store, index)?;
    println!(
        "Deleted session {} from {} (total {}%).",
        index,
        removed.date_label(),
        output::format_score(removed.total_score)
    );
    Ok(())
}

fn run_export(store: &CacacheStore, path: &std::path::Path) -> Result<()> {
    let sessions = history::load_sessions(store)?;
    history::export_sessions(path, &sessions)?;
    println!("Exported {} sessions to {}", sessions.len(), path.display());
    Ok(())
}

fn run_settings(
    store: &mut CacacheStore,
    age: Option<String>,
    gender: Option<String>,
) -> Result<()> {
    let current = settings::load_settings(&*store)?;

    if age.is_none() && gender.is_none() {
        println!("{}", output::format_settings(&current));
        return Ok(());
    }

    let updated = Settings {
        age: age.map(|a| a.trim().to_string()).unwrap_or(current.age),
        gender: gender.unwrap_or(current.gender),
    };

    // Check before saving; store the normalized gender
    let gender = match updated.resolve() {
        Ok((_, g)) => g,
        Err(ScoringError::InvalidInput { field: "age", .. }) if updated.age.is_empty() => {
            updated.gender.parse()?
        }
        Err(e) => return Err(e.into()),
    };
    let updated = Settings {
        gender: gender.as_str().to_string(),
        ..updated
    };

    settings::save_settings(store, &updated)?;
    println!("Settings saved.");
    println!("{}", output::format_settings(&updated));
    Ok(())
}
