pub mod repl;

use anyhow::{bail, Context, Result};
use colored::Colorize;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

use medimind_chat::Orchestrator;
use medimind_llm_api::GroqClient;

use crate::cli::Commands;
use crate::config::Config;
use crate::ocr::TesseractExtractor;

pub use repl::run_repl_mode;

/// Wire the HTTP client and chat log together
pub fn build_orchestrator(config: &Config) -> Result<Orchestrator> {
    let client =
        GroqClient::new(config.client_settings()?).context("Failed to create HTTP client")?;
    Ok(Orchestrator::new(&config.orchestrator_settings(), Arc::new(client)))
}

/// Run a single non-interactive command
pub async fn run_command(command: &Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Chat => run_repl_mode(config).await,
        other => run_one_shot(other, &build_orchestrator(config)?).await,
    }
}

async fn run_one_shot(command: &Commands, orchestrator: &Orchestrator) -> Result<()> {
    match command {
        Commands::Chat => {}
        Commands::Diagnose { symptoms } => {
            let symptoms = match symptoms {
                Some(s) => s.clone(),
                None => prompt_line("Enter patient symptoms: ")?,
            };
            let diagnosis = orchestrator.diagnose(&symptoms).await?;
            print_reply("Diagnosis & Cure:", &diagnosis);
        }
        Commands::Parse { text } => {
            let text = match text {
                Some(t) => t.clone(),
                None => prompt_line("Enter prescription text: ")?,
            };
            let parsed = orchestrator.parse_prescription(&text).await?;
            print_reply("Parsed Prescription:", &parsed);
        }
        Commands::Ask { query } => {
            let answer = orchestrator.answer(query).await?;
            print_reply(&format!("{}:", orchestrator.assistant_name()), &answer);
        }
        Commands::Image { path } => {
            let analysis = orchestrator.analyze_medical_image(path).await?;
            print_reply("Image Analysis:", &analysis);
        }
        Commands::PrescriptionImage { path } => {
            let parsed = orchestrator
                .analyze_prescription_image(path, &TesseractExtractor::new())
                .await?;
            print_reply("Parsed Prescription:", &parsed);
        }
        Commands::Export { path } => {
            let count = orchestrator.export(path).await?;
            println!("{} {} messages to {}", "Saved".green(), count, path.display());
        }
        Commands::Clear => {
            orchestrator.clear().await?;
            println!("{}", "Conversation cleared.".green());
        }
    }

    Ok(())
}

pub(crate) fn print_reply(label: &str, text: &str) {
    println!("\n{} {}\n", label.bright_blue().bold(), text);
}

fn prompt_line(prompt: &str) -> Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line).context("Failed to read from stdin")?;
    let line = line.trim().to_string();
    if line.is_empty() {
        bail!("no input given");
    }
    Ok(line)
}
