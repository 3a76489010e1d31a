mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{
    ads::AdsSubcommand, checklist::ChecklistSubcommand, config::ConfigSubcommand,
    studio::StudioSubcommand,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "playlaunch",
    about = "Play Store launch companion: checklist ranks, AI studio tools and ad cadence",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .playlaunch/ or .git/)
    #[arg(long, global = true, env = "PLAYLAUNCH_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize playlaunch in the current project
    Init,

    /// Work through the launch checklist
    Checklist {
        #[command(subcommand)]
        subcommand: ChecklistSubcommand,
    },

    /// Show the rank for a completion percentage
    Rank {
        /// Completion percentage (0-100)
        percent: u32,
    },

    /// AI-backed idea analysis, store listing and privacy policy
    Studio {
        #[command(subcommand)]
        subcommand: StudioSubcommand,
    },

    /// Interstitial ad cadence tools
    Ads {
        #[command(subcommand)]
        subcommand: AdsSubcommand,
    },

    /// Show or validate the project configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },

    /// Start the HTTP API server
    Ui {
        /// Port to listen on (0 = OS-assigned)
        #[arg(long, default_value = "0")]
        port: u16,

        /// Don't open browser automatically
        #[arg(long)]
        no_open: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Ui { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root),
        Commands::Checklist { subcommand } => cmd::checklist::run(&root, subcommand, cli.json),
        Commands::Rank { percent } => cmd::rank::run(percent, cli.json),
        Commands::Studio { subcommand } => cmd::studio::run(&root, subcommand, cli.json),
        Commands::Ads { subcommand } => cmd::ads::run(&root, subcommand, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
        Commands::Ui { port, no_open } => cmd::ui::run(&root, port, no_open),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
