use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use quickmarc::config::Config;
use quickmarc::infrastructure::{LogNavigator, LogNotifier, RecordsEditorClient};
use quickmarc::models::{MarcForm, MarcType, Record};
use quickmarc::quick_marc::{RecordInfo, fixed_fields};
use quickmarc::services::{EditorService, PollOutcome, SubmitOutcome};

#[derive(Parser)]
#[command(name = "quickmarc", version, about = "Edit MARC records through the records-editor API")]
struct Cli {
    /// Kind of record: bib, authority or holdings
    #[arg(long, global = true, default_value = "bib")]
    marc_type: MarcType,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch a record and print its editor form as JSON
    Fetch { external_id: String },
    /// Validate and save an edited form
    Submit {
        /// Form JSON as printed by `fetch`
        form: PathBuf,
        #[arg(long, value_enum, default_value_t = Action::Edit)]
        action: Action,
        /// Record the form was loaded from; fetched again when omitted
        #[arg(long)]
        initial: Option<PathBuf>,
        #[arg(long)]
        related_record_version: Option<String>,
        /// Query string to keep on redirects
        #[arg(long)]
        search: Option<String>,
    },
    /// Print the fixed-field layouts
    Layouts,
}

#[derive(Clone, Copy, ValueEnum)]
enum Action {
    Edit,
    Duplicate,
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, String> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    serde_json::from_str(&raw).map_err(|e| format!("Failed to parse {}: {}", path.display(), e))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), String> {
    let out = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    println!("{}", out);
    Ok(())
}

fn editor_service(config: &Config) -> Result<EditorService, String> {
    let client = RecordsEditorClient::new(config).map_err(|e| e.to_string())?;
    Ok(EditorService::new(
        Arc::new(client),
        Arc::new(LogNotifier),
        Arc::new(LogNavigator),
        config.poll_settings(),
    ))
}

async fn run(cli: Cli, config: Config) -> Result<ExitCode, String> {
    match cli.command {
        Command::Layouts => {
            print_json(&fixed_fields::all_configs())?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Fetch { external_id } => {
            let service = editor_service(&config)?;
            let (record, form) = service
                .load(&external_id)
                .await
                .map_err(|e| format!("Failed to load {}: {}", external_id, e))?;
            tracing::info!("{}", RecordInfo::from_record(&record, cli.marc_type).summary());
            print_json(&form)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Submit {
            form,
            action,
            initial,
            related_record_version,
            search,
        } => {
            let service = editor_service(&config)?;
            let form: MarcForm = read_json(&form)?;
            let initial: Record = match initial {
                Some(path) => read_json(&path)?,
                None => {
                    let external_id = form
                        .meta
                        .external_id
                        .clone()
                        .ok_or("form has no externalId; pass --initial")?;
                    service
                        .load(&external_id)
                        .await
                        .map_err(|e| format!("Failed to load {}: {}", external_id, e))?
                        .0
                }
            };

            let outcome = match action {
                Action::Edit => {
                    service
                        .submit_edit(&form, &initial, cli.marc_type, related_record_version)
                        .await
                }
                Action::Duplicate => {
                    service
                        .submit_duplicate(&form, &initial, cli.marc_type, search.as_deref())
                        .await
                }
            };

            let code = match outcome {
                SubmitOutcome::Saved => ExitCode::SUCCESS,
                SubmitOutcome::Creating { qm_record_id, poll } => {
                    tracing::info!("Waiting for job {}", qm_record_id);
                    match poll.join().await {
                        PollOutcome::Created { external_id } => {
                            println!("{}", external_id);
                            ExitCode::SUCCESS
                        }
                        // Still processing server-side; not a failure
                        PollOutcome::Delayed => ExitCode::SUCCESS,
                        PollOutcome::Failed | PollOutcome::Cancelled => ExitCode::FAILURE,
                    }
                }
                SubmitOutcome::Invalid(_)
                | SubmitOutcome::Malformed(_)
                | SubmitOutcome::Rejected(_) => ExitCode::FAILURE,
            };
            Ok(code)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quickmarc=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    match run(cli, config).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_layouts_needs_no_arguments() {
        let cli = Cli::try_parse_from(["quickmarc", "layouts"]).unwrap();
        assert!(matches!(cli.command, Command::Layouts));
        assert_eq!(cli.marc_type, MarcType::Bibliographic);
    }

    #[test]
    fn test_submit_duplicate_arguments() {
        let cli = Cli::try_parse_from([
            "quickmarc",
            "submit",
            "form.json",
            "--action",
            "duplicate",
            "--marc-type",
            "authority",
            "--search",
            "?q=x",
        ])
        .unwrap();

        assert_eq!(cli.marc_type, MarcType::Authority);
        let Command::Submit {
            action,
            initial,
            search,
            ..
        } = cli.command
        else {
            panic!("expected submit");
        };
        assert!(matches!(action, Action::Duplicate));
        assert!(initial.is_none());
        assert_eq!(search.as_deref(), Some("?q=x"));
    }
}
