use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Arg, ArgAction, ArgMatches, Command};

use suilens::{NarrativeMode, parse_input, share_link};
use suilens_rpc::{Explainer, ExplainerConfig};

use crate::interactive::{self, SessionOptions};
use crate::logging;
use crate::render::{OutputFormat, render};

fn output_format(matches: &ArgMatches) -> OutputFormat {
    match matches.get_one::<String>("output").map(String::as_str) {
        Some("json") => OutputFormat::Json,
        _ => OutputFormat::Text,
    }
}

fn narrative_mode(matches: &ArgMatches, explainer: &Explainer) -> NarrativeMode {
    if !matches.get_flag("ai") {
        return NarrativeMode::Heuristic;
    }
    if !explainer.ai_available() {
        tracing::warn!("AI narrative requested but no GROQ_API_KEY is configured");
    }
    NarrativeMode::Ai
}

fn display_args() -> [Arg; 3] {
    [
        Arg::new("ai")
            .long("ai")
            .help("Ask the narrative service for a plain-English explanation")
            .action(ArgAction::SetTrue),
        Arg::new("all")
            .long("all")
            .help("Show every activity instead of the first few")
            .action(ArgAction::SetTrue),
        Arg::new("output")
            .short('o')
            .long("output")
            .value_name("FORMAT")
            .help("Output format")
            .value_parser(["text", "json"])
            .default_value("text"),
    ]
}

/// What one `explain` run shows the user.
#[derive(Debug, PartialEq, Eq)]
enum Reply {
    Rendered(String),
    /// Input or fetch failure, shown inline rather than raised.
    Failed(String),
}

impl Reply {
    fn print(self) -> ExitCode {
        match self {
            Reply::Rendered(document) => {
                println!("{document}");
                ExitCode::SUCCESS
            }
            Reply::Failed(message) => {
                eprintln!("{message}");
                ExitCode::FAILURE
            }
        }
    }
}

async fn explain_once(
    explainer: &Explainer,
    config: &ExplainerConfig,
    matches: &ArgMatches,
) -> anyhow::Result<Reply> {
    let input = matches
        .get_one::<String>("input")
        .context("a digest or URL is required")?;
    let digest = match parse_input(input) {
        Ok(digest) => digest,
        Err(err) => return Ok(Reply::Failed(err.to_string())),
    };

    let mode = narrative_mode(matches, explainer);
    let outcome = match explainer.explain(&digest, mode).await {
        Ok(outcome) => outcome,
        Err(err) => return Ok(Reply::Failed(err.user_message().to_string())),
    };

    let link = if matches.get_flag("share") {
        Some(share_link(&config.share_base()?, &digest))
    } else {
        None
    };

    let rendered = render(
        output_format(matches),
        &outcome.explanation,
        &outcome.narrative,
        matches.get_flag("all"),
        link.as_ref(),
    )?;
    Ok(Reply::Rendered(rendered))
}

/// app cli
pub struct Cli;
impl Cli {
    fn command() -> Command {
        Command::new("suilens")
            .version(env!("CARGO_PKG_VERSION"))
            .about("Explains Sui transactions in plain language")
            .subcommand_required(true)
            .arg(
                Arg::new("config")
                    .short('c')
                    .long("config")
                    .value_name("FILE")
                    .help("TOML configuration file (defaults to $SUILENS_CONFIG)")
                    .value_parser(clap::value_parser!(PathBuf))
                    .global(true),
            )
            .arg(
                Arg::new("json-logs")
                    .long("json-logs")
                    .help("Emit bunyan-formatted JSON logs on stderr")
                    .action(ArgAction::SetTrue)
                    .global(true),
            )
            .subcommand(
                Command::new("explain")
                    .about("Explain one transaction")
                    .arg(
                        Arg::new("input")
                            .value_name("DIGEST_OR_URL")
                            .help("Transaction digest, explorer URL or shared link")
                            .required(true),
                    )
                    .args(display_args())
                    .arg(
                        Arg::new("share")
                            .long("share")
                            .help("Print a shareable link for this transaction")
                            .action(ArgAction::SetTrue),
                    ),
            )
            .subcommand(
                Command::new("interactive")
                    .about("Read one digest or URL per line and explain each")
                    .args(display_args()),
            )
    }

    /// Parses the command line and runs the selected subcommand
    pub async fn execute() -> anyhow::Result<ExitCode> {
        let matches = Self::command().get_matches();
        logging::init(matches.get_flag("json-logs")).context("Failed to initialise logging")?;

        let config = ExplainerConfig::load(matches.get_one::<PathBuf>("config").map(PathBuf::as_path))
            .context("Failed to load configuration")?;
        let explainer = Explainer::from_config(&config).context("Failed to build clients")?;

        match matches.subcommand() {
            Some(("explain", sub)) => Ok(explain_once(&explainer, &config, sub).await?.print()),
            Some(("interactive", sub)) => {
                let options = SessionOptions {
                    mode: narrative_mode(sub, &explainer),
                    show_all: sub.get_flag("all"),
                    format: output_format(sub),
                };
                interactive::run(explainer, options).await?;
                Ok(ExitCode::SUCCESS)
            }
            _ => Ok(ExitCode::SUCCESS),
        }
    }
}
