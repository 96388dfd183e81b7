use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// CLI arguments for medimind
#[derive(Parser, Debug)]
#[command(name = "medimind")]
#[command(about = "MediMind AI - a medical chat assistant with diagnosis, prescription and image analysis")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Groq API key (falls back to GroqAPIKey / GROQ_API_KEY)
    #[arg(long, value_name = "KEY")]
    pub api_key: Option<String>,

    /// Name the assistant introduces itself with (falls back to Assistantname)
    #[arg(long, value_name = "NAME")]
    pub assistant_name: Option<String>,

    /// Name the assistant addresses you by (falls back to Username)
    #[arg(long, value_name = "NAME")]
    pub user_name: Option<String>,

    /// Chat completions endpoint, e.g. http://localhost:8080
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// Model used for text conversations
    #[arg(long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Model used for medical image analysis
    #[arg(long, value_name = "MODEL")]
    pub vision_model: Option<String>,

    /// Directory holding ChatLog.json (default: ~/.medimind/Data)
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Attempts per question before giving up
    #[arg(long, value_name = "N")]
    pub max_attempts: Option<u32>,

    /// Write request bodies to ~/.medimind/logs
    #[arg(long)]
    pub log_requests: bool,

    /// Enable verbose debug output
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Generate shell completions
    #[arg(long, value_enum)]
    pub generate: Option<Shell>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Interactive chat session (default)
    Chat,
    /// Suggest a diagnosis and cure for the given symptoms
    Diagnose {
        /// Symptoms; prompted for when omitted
        symptoms: Option<String>,
    },
    /// Extract medication, dosage and timing from prescription text
    Parse {
        /// Prescription text; prompted for when omitted
        text: Option<String>,
    },
    /// Ask a single question with the saved conversation as context
    Ask {
        query: String,
    },
    /// Analyze a medical image (X-ray, MRI, skin photo, ...)
    Image {
        path: PathBuf,
    },
    /// Read a prescription photo with tesseract and parse it
    PrescriptionImage {
        path: PathBuf,
    },
    /// Save the conversation as a plain-text transcript
    Export {
        path: PathBuf,
    },
    /// Delete the saved conversation
    Clear,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_means_chat() {
        let cli = Cli::try_parse_from(["medimind"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from([
            "medimind",
            "--api-key",
            "gsk_abc",
            "--data-dir",
            "/tmp/mm",
            "--timeout",
            "30",
            "--max-attempts",
            "5",
            "-v",
            "chat",
        ])
        .unwrap();
        assert_eq!(cli.api_key.as_deref(), Some("gsk_abc"));
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/mm")));
        assert_eq!(cli.timeout, Some(30));
        assert_eq!(cli.max_attempts, Some(5));
        assert!(cli.verbose);
        assert_eq!(cli.command, Some(Commands::Chat));
    }

    #[test]
    fn test_subcommands() {
        let cli = Cli::try_parse_from(["medimind", "diagnose", "fever and cough"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Diagnose { symptoms: Some("fever and cough".into()) })
        );

        let cli = Cli::try_parse_from(["medimind", "parse"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Parse { text: None }));

        let cli = Cli::try_parse_from(["medimind", "prescription-image", "rx.jpg"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::PrescriptionImage { path: PathBuf::from("rx.jpg") })
        );

        assert!(Cli::try_parse_from(["medimind", "ask"]).is_err());
    }
}
