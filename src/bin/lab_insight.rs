//! Lab Insight command line front end.
//!
//! Each invocation opens the persisted history, performs one action and
//! prints the outcome. Logging goes to stderr and is controlled by
//! `RUST_LOG` (default `warn`).

use clap::{Parser, Subcommand};
use lab_insight::client::{AnalysisClient, ClientConfig};
use lab_insight::config::{self, LabInsightConfig};
use lab_insight::history::{self, FileStore, HistoryStore};
use lab_insight::models::{find_parameter, LabResultResponse, LAB_PARAMETERS};
use lab_insight::session::{AnalysisSession, SubmitError};
use log::{debug, error};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "lab-insight", version, about = "Explain lab results and track them over time")]
struct Cli {
    /// JSON settings file with a "lab-insight" section
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the analysis history
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Send a lab result to the analysis service
    Explain {
        #[arg(long, default_value = "Glucose")]
        parameter: String,
        #[arg(long)]
        value: String,
        #[arg(long)]
        age: String,
        #[arg(long, default_value = "male")]
        gender: String,
    },
    /// Re-send the most recent analysis request
    Retry,
    /// List past analyses, newest first
    History,
    /// Show a past analysis by id or id prefix
    Show { id: String },
    /// Chart one parameter over time
    Trend { parameter: Option<String> },
    /// List the supported lab parameters
    Parameters,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(message) => {
            error!("{}", message);
            eprintln!("{}", message);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode, String> {
    let settings = match &cli.config {
        Some(path) => config::load_config_file(path)?,
        None => config::load_config(None)?,
    };

    if let Command::Parameters = cli.command {
        for param in LAB_PARAMETERS {
            println!("{:<12} {}", param.label, param.unit);
        }
        return Ok(ExitCode::SUCCESS);
    }

    let store = open_store(&settings, cli.data_dir.as_deref())?;
    let mut session = AnalysisSession::new(HistoryStore::load_with_limit(
        store,
        settings.history_limit,
    ));

    match cli.command {
        Command::Explain {
            parameter,
            value,
            age,
            gender,
        } => {
            if find_parameter(parameter.trim()).is_none() {
                return Err(format!(
                    "Unknown parameter '{}'. Run `lab-insight parameters` for the list.",
                    parameter
                ));
            }

            session.set_field("parameter", &parameter);
            session.set_field("value", &value);
            session.set_field("age", &age);
            session.set_field("gender", &gender);

            let client = build_client(&settings)?;
            let outcome = session.submit(&client).await;
            Ok(report(&session, outcome))
        }
        Command::Retry => {
            let latest_id = match session.history().latest() {
                Some(entry) => entry.id.clone(),
                None => return Err("Nothing to retry: the history is empty.".to_string()),
            };
            session.select_history(&latest_id);

            let client = build_client(&settings)?;
            let outcome = session.retry(&client).await;
            Ok(report(&session, outcome))
        }
        Command::History => {
            if session.history().is_empty() {
                println!("No analyses yet.");
            }
            for line in history::format_history_list(session.history().entries()) {
                println!("{}", line);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Show { id } => {
            let full_id = resolve_id(session.history(), &id)?;
            session.select_history(&full_id);
            if let Some(result) = session.result() {
                print!("{}", history::format_result(session.last_request(), result));
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Trend { parameter } => {
            let parameter = match parameter {
                Some(parameter) => parameter,
                None => match session.history().latest() {
                    Some(entry) => entry.request.parameter.clone(),
                    None => session.current_parameter().to_string(),
                },
            };
            print!(
                "{}",
                history::format_trend(&parameter, &session.history().trend(&parameter))
            );
            Ok(ExitCode::SUCCESS)
        }
        Command::Parameters => Ok(ExitCode::SUCCESS),
    }
}

fn open_store(
    settings: &LabInsightConfig,
    data_dir: Option<&std::path::Path>,
) -> Result<FileStore, String> {
    let dir = match data_dir.or(settings.data_dir.as_deref()) {
        Some(dir) => dir.to_path_buf(),
        None => history::default_data_dir().map_err(|e| e.to_string())?,
    };
    let store = FileStore::new(dir);
    debug!("Using data directory {}", store.dir().display());
    Ok(store)
}

fn build_client(settings: &LabInsightConfig) -> Result<AnalysisClient, String> {
    AnalysisClient::new(ClientConfig::from(settings)).map_err(|e| e.to_string())
}

/// Prints the session's result or error and picks the exit code.
fn report<S: history::KeyValueStore>(
    session: &AnalysisSession<S>,
    outcome: Result<LabResultResponse, SubmitError>,
) -> ExitCode {
    match outcome {
        Ok(result) => {
            print!("{}", history::format_result(session.last_request(), &result));
            ExitCode::SUCCESS
        }
        Err(failure) => {
            eprintln!("{}", failure);
            ExitCode::FAILURE
        }
    }
}

/// Resolves a full entry id from an id or unique id prefix.
fn resolve_id<S: history::KeyValueStore>(
    store: &HistoryStore<S>,
    id: &str,
) -> Result<String, String> {
    let matches: Vec<&str> = store
        .entries()
        .iter()
        .map(|e| e.id.as_str())
        .filter(|entry_id| entry_id.starts_with(id))
        .collect();

    match matches.as_slice() {
        [single] => Ok(single.to_string()),
        [] => Err(format!("No analysis with id '{}'", id)),
        _ => Err(format!("Id prefix '{}' is ambiguous", id)),
    }
}
