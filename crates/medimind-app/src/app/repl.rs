use anyhow::Result;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;

use medimind_chat::Orchestrator;
use medimind_logging::safe_truncate;
use medimind_types::Role;

use super::{build_orchestrator, print_reply};
use crate::config::Config;
use crate::ocr::TesseractExtractor;

const WELCOME: &str = "Welcome to MediMind AI Chat. How can I help you today?";

/// A line typed at the prompt
#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    Ask(String),
    Diagnose(String),
    Prescription(String),
    PrescriptionImage(PathBuf),
    Image(PathBuf),
    Save(PathBuf),
    Clear,
    History,
    Help,
    Quit,
    Empty,
    /// A known command given without its argument
    MissingArgument(&'static str),
    Unknown(String),
}

impl ReplCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return ReplCommand::Empty;
        }
        if line == "exit" || line == "quit" {
            return ReplCommand::Quit;
        }
        if !line.starts_with('/') {
            return ReplCommand::Ask(line.to_string());
        }

        let (name, arg) = match line.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (line, ""),
        };

        let needs = |usage: &'static str, build: fn(&str) -> ReplCommand| {
            if arg.is_empty() {
                ReplCommand::MissingArgument(usage)
            } else {
                build(arg)
            }
        };

        match name {
            "/diagnose" => needs("/diagnose <symptoms>", |a| ReplCommand::Diagnose(a.to_string())),
            "/prescription" => needs("/prescription <text>", |a| {
                ReplCommand::Prescription(a.to_string())
            }),
            "/prescription-image" => needs("/prescription-image <path>", |a| {
                ReplCommand::PrescriptionImage(PathBuf::from(a))
            }),
            "/image" => needs("/image <path>", |a| ReplCommand::Image(PathBuf::from(a))),
            "/save" => needs("/save <path>", |a| ReplCommand::Save(PathBuf::from(a))),
            "/clear" => ReplCommand::Clear,
            "/history" => ReplCommand::History,
            "/help" => ReplCommand::Help,
            "/quit" | "/exit" => ReplCommand::Quit,
            other => ReplCommand::Unknown(other.to_string()),
        }
    }
}

fn print_help() {
    println!("{}", "Commands:".bright_cyan().bold());
    for (usage, what) in [
        ("/diagnose <symptoms>", "possible diagnosis and cure"),
        ("/prescription <text>", "medication, dosage and timing"),
        ("/prescription-image <path>", "OCR a prescription photo and parse it"),
        ("/image <path>", "analyze a medical image (max 4 MiB)"),
        ("/save <path>", "write the conversation to a text file"),
        ("/clear", "forget the conversation"),
        ("/history", "show the saved conversation"),
        ("/quit", "leave"),
    ] {
        println!("  {:<28} {}", usage.bright_white(), what.bright_black());
    }
    println!("{}", "Anything else is sent as a question.".bright_black());
}

async fn print_history(orchestrator: &Orchestrator) -> Result<()> {
    let history = orchestrator.history().await?;
    if history.is_empty() {
        println!("{}", "No conversation yet.".bright_black());
        return Ok(());
    }
    for message in history {
        let label = match message.role {
            Role::User => "You:".bright_green().bold(),
            _ => format!("{}:", orchestrator.assistant_name()).bright_blue().bold(),
        };
        println!("{} {}", label, safe_truncate(&message.content, 200));
    }
    Ok(())
}

/// Run one command. Returns false when the session should end.
async fn dispatch(orchestrator: &Orchestrator, command: ReplCommand) -> Result<bool> {
    let assistant = format!("{}:", orchestrator.assistant_name());
    match command {
        ReplCommand::Empty => {}
        ReplCommand::Quit => return Ok(false),
        ReplCommand::Help => print_help(),
        ReplCommand::Ask(query) => print_reply(&assistant, &orchestrator.answer(&query).await?),
        ReplCommand::Diagnose(symptoms) => {
            print_reply("Diagnosis & Cure:", &orchestrator.diagnose(&symptoms).await?)
        }
        ReplCommand::Prescription(text) => {
            print_reply("Parsed Prescription:", &orchestrator.parse_prescription(&text).await?)
        }
        ReplCommand::PrescriptionImage(path) => {
            let parsed = orchestrator
                .analyze_prescription_image(&path, &TesseractExtractor::new())
                .await?;
            print_reply("Parsed Prescription:", &parsed);
        }
        ReplCommand::Image(path) => {
            println!("{}", "Analyzing image...".bright_black());
            print_reply("Image Analysis:", &orchestrator.analyze_medical_image(&path).await?);
        }
        ReplCommand::Save(path) => {
            let count = orchestrator.export(&path).await?;
            println!("{} {} messages to {}", "Saved".green(), count, path.display());
        }
        ReplCommand::Clear => {
            orchestrator.clear().await?;
            println!("{}", "Conversation cleared.".green());
        }
        ReplCommand::History => print_history(orchestrator).await?,
        ReplCommand::MissingArgument(usage) => {
            eprintln!("{} {}", "Usage:".bright_yellow().bold(), usage);
        }
        ReplCommand::Unknown(name) => {
            eprintln!("{} unknown command {} (try /help)", "Error:".bright_red().bold(), name);
        }
    }
    Ok(true)
}

/// Run interactive REPL mode
pub async fn run_repl_mode(config: &Config) -> Result<()> {
    let orchestrator = build_orchestrator(config)?;

    println!("{}", WELCOME.bright_cyan().bold());
    println!(
        "{}",
        format!("Chat log: {}", orchestrator.store().path().display()).bright_black()
    );
    println!("{}", "Type /help for commands, /quit to exit\n".bright_black());

    let mut rl = DefaultEditor::new()?;

    loop {
        let readline = rl.readline(&format!("{} ", "You:".bright_green().bold()));

        match readline {
            Ok(line) => {
                let command = ReplCommand::parse(&line);
                if command != ReplCommand::Empty {
                    rl.add_history_entry(line.trim())?;
                }

                match dispatch(&orchestrator, command).await {
                    Ok(true) => {}
                    Ok(false) => {
                        println!("{}", "Goodbye!".bright_cyan());
                        break;
                    }
                    // Failures are shown inline and the session carries on
                    Err(e) => eprintln!("{} {}\n", "Error:".bright_red().bold(), e),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "^C".bright_black());
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "Goodbye!".bright_cyan());
                break;
            }
            Err(err) => {
                eprintln!("{} {}", "Error:".bright_red().bold(), err);
                break;
            }
        }
    }

    Ok(())
}
