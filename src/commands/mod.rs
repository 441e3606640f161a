use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::app::{AppController, ChatSession, ReportSource};
use crate::domain::FeedbackKind;

/// Validate device configurations against a capability database.
#[derive(Debug, Parser)]
#[command(name = "devicecheck", version, about, long_about = None)]
pub struct Cli {
    /// Capability database file (overrides the configured path)
    #[arg(long, global = true, env = "DEVICECHECK_DATABASE")]
    pub database: Option<PathBuf>,

    /// Block all network access for this run
    #[arg(long, global = true)]
    pub offline: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Validate input documents and print the analysis report for each
    Check {
        /// Input JSON files; relative names are also looked up in the last used directory
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Send feedback about the last report
        #[arg(long)]
        feedback: Option<String>,

        /// Kind of feedback
        #[arg(long, value_enum, default_value_t = KindArg::Correction)]
        kind: KindArg,
    },

    /// Ask questions about the capability database (interactive without arguments)
    Chat {
        /// Questions to ask in order
        questions: Vec<String>,
    },

    /// Show saved feedback, oldest first
    History,

    /// Show configuration, data and log locations and remote access status
    Paths,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum KindArg {
    Correction,
    Improvement,
    Question,
    Other,
}

impl From<KindArg> for FeedbackKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Correction => FeedbackKind::Correction,
            KindArg::Improvement => FeedbackKind::Improvement,
            KindArg::Question => FeedbackKind::Question,
            KindArg::Other => FeedbackKind::Other,
        }
    }
}

/// Run a parsed command against the controller.
pub async fn execute(controller: &AppController, command: Command) -> Result<()> {
    match command {
        Command::Check {
            inputs,
            feedback,
            kind,
        } => check(controller, &inputs, feedback.as_deref(), kind.into()).await,
        Command::Chat { questions } => chat(controller, questions).await,
        Command::History => history(controller),
        Command::Paths => paths(controller),
    }
}

async fn check(
    controller: &AppController,
    inputs: &[PathBuf],
    feedback: Option<&str>,
    kind: FeedbackKind,
) -> Result<()> {
    let mut failures = 0;

    for input in inputs {
        match controller.check(input).await {
            Ok(outcome) => {
                let origin = match outcome.source {
                    ReportSource::Cache => "cached",
                    ReportSource::Remote => "remote",
                };
                println!("== {} [{}, {}] ==", input.display(), outcome.hardware, origin);
                println!("{}\n", outcome.report);
            }
            Err(e) => {
                failures += 1;
                eprintln!("{}: {}", input.display(), e);
                if e.is_remote() {
                    eprintln!("  (nothing was cached; run again to retry)");
                }
            }
        }
    }

    if let Some(text) = feedback {
        let record = controller
            .submit_feedback(kind, text)
            .await
            .context("feedback not delivered")?;
        println!(
            "Feedback ({}) sent.\nReply: {}",
            record.kind.label(),
            record.remote_reply.as_deref().unwrap_or_default()
        );
    }

    if failures > 0 {
        bail!("{} of {} inputs failed", failures, inputs.len());
    }
    Ok(())
}

async fn chat(controller: &AppController, questions: Vec<String>) -> Result<()> {
    let mut session = controller.open_chat();
    for entry in session.transcript() {
        println!("{}\n", entry);
    }
    if !session.has_database() {
        eprintln!("(no hardware data loaded; answers cannot draw on the database)\n");
    }

    if !questions.is_empty() {
        for question in &questions {
            ask(&mut session, question).await;
        }
        return Ok(());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        match line.trim() {
            "" => continue,
            "exit" | "quit" => break,
            question => ask(&mut session, question).await,
        }
    }
    Ok(())
}

async fn ask(session: &mut ChatSession, question: &str) {
    match session.ask(question).await {
        Ok(_) => {
            if let Some(entry) = session.transcript().last() {
                println!("{}\n", entry);
            }
        }
        Err(e) => eprintln!("{}\n", e),
    }
}

fn history(controller: &AppController) -> Result<()> {
    let records = controller.feedback_history()?;
    if records.is_empty() {
        println!("No feedback saved yet.");
    }
    for record in records {
        println!("[{}] {}: {}", record.timestamp, record.kind, record.feedback);
        match record.remote_reply {
            Some(reply) => println!("  reply: {}\n", reply),
            None => println!("  (no reply)\n"),
        }
    }
    Ok(())
}

fn paths(controller: &AppController) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&controller.paths())?);

    let remote = controller.remote_status();
    println!("network blocked: {}", remote.network_blocked);
    println!("allowed domains: {}", remote.allowed_domains.join(", "));
    println!(
        "api key (${}): {}",
        remote.api_key_env,
        if remote.api_key_set { "set" } else { "missing" }
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_check_parses_feedback() {
        let cli = Cli::try_parse_from([
            "devicecheck",
            "--offline",
            "check",
            "a.json",
            "b.json",
            "--feedback",
            "NFC is wrong",
            "--kind",
            "question",
        ])
        .unwrap();

        assert!(cli.offline);
        match cli.command {
            Command::Check {
                inputs,
                feedback,
                kind,
            } => {
                assert_eq!(inputs.len(), 2);
                assert_eq!(feedback.as_deref(), Some("NFC is wrong"));
                assert_eq!(FeedbackKind::from(kind), FeedbackKind::Question);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_check_requires_input() {
        assert!(Cli::try_parse_from(["devicecheck", "check"]).is_err());
    }

    #[test]
    fn test_history_takes_no_arguments() {
        let cli = Cli::try_parse_from(["devicecheck", "history"]).unwrap();
        assert!(matches!(cli.command, Command::History));
        assert!(Cli::try_parse_from(["devicecheck", "history", "extra"]).is_err());
    }

    #[test]
    fn test_chat_without_questions() {
        let cli = Cli::try_parse_from(["devicecheck", "chat"]).unwrap();
        assert!(matches!(cli.command, Command::Chat { questions } if questions.is_empty()));
    }
}
