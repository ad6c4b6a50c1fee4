//! skillpath CLI — take the quiz, get a roadmap, track results.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "skillpath", version, about = "Quiz-driven learning roadmaps")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the question catalogue
    Questions {
        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Register a user in the local store
    Register {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        /// Store file (overrides config)
        #[arg(long)]
        store: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Score answers, build a roadmap and save the result
    Submit {
        /// E-mail of a registered user
        #[arg(long)]
        email: String,

        /// Comma-separated option indices, one per question (e.g. "2,1,2,...")
        #[arg(long, allow_hyphen_values = true)]
        answers: String,

        /// Per-request generation-service key
        #[arg(long)]
        gemini_key: Option<String>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Store file (overrides config)
        #[arg(long)]
        store: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Leave feedback on a result
    Feedback {
        #[arg(long)]
        email: String,

        /// Result being rated
        #[arg(long)]
        result_id: Option<u64>,

        /// Rating from 1 to 5
        #[arg(long)]
        rating: u8,

        #[arg(long)]
        comment: Option<String>,

        /// Store file (overrides config)
        #[arg(long)]
        store: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show a user's results and feedback
    Dashboard {
        #[arg(long)]
        email: String,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Store file (overrides config)
        #[arg(long)]
        store: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a starter config
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("skillpath=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Questions { format } => commands::questions::execute(format),
        Commands::Register {
            name,
            email,
            store,
            config,
        } => commands::register::execute(name, email, store, config),
        Commands::Submit {
            email,
            answers,
            gemini_key,
            format,
            store,
            config,
        } => commands::submit::execute(email, answers, gemini_key, format, store, config).await,
        Commands::Feedback {
            email,
            result_id,
            rating,
            comment,
            store,
            config,
        } => commands::feedback::execute(email, result_id, rating, comment, store, config),
        Commands::Dashboard {
            email,
            format,
            store,
            config,
        } => commands::dashboard::execute(email, format, store, config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
