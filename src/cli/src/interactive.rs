//! Line-driven mode: each line starts a new search that supersedes the previous one.

use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use suilens::{FetchSession, FetchTicket, NarrativeMode, parse_input};
use suilens_rpc::{ExplainOutcome, Explainer, FetchError};

use crate::render::{OutputFormat, render};

const LOADING_ROTATION: Duration = Duration::from_millis(1500);

const LOADING_MESSAGES: &[&str] = &[
    "Fetching transaction from the fullnode...",
    "Decoding commands...",
    "Reading emitted events...",
    "Tallying balance changes...",
];

#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    pub mode: NarrativeMode,
    pub show_all: bool,
    pub format: OutputFormat,
}

type FetchResult = (FetchTicket, Result<ExplainOutcome, FetchError>);

pub async fn run(explainer: Explainer, options: SessionOptions) -> anyhow::Result<()> {
    let (results_tx, mut results_rx) = mpsc::unbounded_channel::<FetchResult>();
    let mut session: FetchSession<ExplainOutcome> = FetchSession::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut loading = tokio::time::interval(LOADING_ROTATION);
    let mut loading_step = 0usize;
    let mut waiting = false;
    let mut stdin_open = true;

    eprintln!("Enter a transaction digest or explorer URL per line. Ctrl-D quits.");

    while stdin_open || waiting {
        tokio::select! {
            line = lines.next_line(), if stdin_open => {
                let Some(line) = line? else {
                    stdin_open = false;
                    continue;
                };
                if line.trim().is_empty() {
                    continue;
                }

                match parse_input(&line) {
                    Ok(digest) => {
                        let ticket = session.begin(digest);
                        let explainer = explainer.clone();
                        let results_tx = results_tx.clone();
                        tokio::spawn(async move {
                            let result = explainer.explain(ticket.digest(), options.mode).await;
                            // The receiver only goes away on shutdown.
                            let _ = results_tx.send((ticket, result));
                        });
                        waiting = true;
                        loading_step = 0;
                        loading.reset_immediately();
                    }
                    Err(err) => eprintln!("{err}"),
                }
            }
            Some((ticket, result)) = results_rx.recv() => {
                let current = session.is_current(&ticket);
                match result {
                    Ok(outcome) => {
                        if session.resolve(ticket, outcome) {
                            if let Some(displayed) = session.displayed() {
                                let rendered = render(
                                    options.format,
                                    &displayed.explanation,
                                    &displayed.narrative,
                                    options.show_all,
                                    None,
                                )?;
                                println!("{rendered}");
                            }
                        }
                    }
                    Err(err) if current => eprintln!("{}", err.user_message()),
                    Err(_) => {}
                }
                if current {
                    waiting = false;
                }
            }
            _ = loading.tick(), if waiting => {
                eprintln!("{}", LOADING_MESSAGES[loading_step % LOADING_MESSAGES.len()]);
                loading_step += 1;
            }
        }
    }

    Ok(())
}
