mod commands;

use clap::{Parser, Subcommand};
use colored::Colorize;

#[derive(Parser, Debug)]
#[command(name = "cirrus")]
#[command(about = "Cirrus - an interactive EC2 provisioning console", version)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Launch a new instance; omitted inputs are auto-created
    Launch {
        /// Existing key pair name (auto-created when omitted)
        #[arg(short, long)]
        key_name: Option<String>,
        /// Existing security group ID (auto-created when omitted)
        #[arg(short, long)]
        group_id: Option<String>,
        /// Name tag for the instance (auto-generated when omitted)
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Create a key pair and save the one-time PEM file
    CreateKey {
        /// Key pair name
        name: String,
    },
    /// Create a security group that allows SSH from anywhere
    CreateGroup {
        /// Security group name
        name: String,
    },
    /// List all instances in the region
    Ls {
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Start an instance
    Start {
        /// Instance ID
        id: String,
    },
    /// Stop an instance
    Stop {
        /// Instance ID
        id: String,
    },
    /// Terminate an instance
    Terminate {
        /// Instance ID
        id: String,
    },
    /// Pick an instance interactively, then start/stop/terminate it
    Manage,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let provider = cirrus_cloud_aws::AwsCompute::connect(cirrus_cloud_aws::REGION).await;

    let result = match args.command {
        Commands::Launch {
            key_name,
            group_id,
            name,
        } => commands::launch(&provider, key_name, group_id, name).await,
        Commands::CreateKey { name } => commands::create_key(&provider, &name).await,
        Commands::CreateGroup { name } => commands::create_group(&provider, &name).await,
        Commands::Ls { json } => commands::ls(&provider, json).await,
        Commands::Start { id } => commands::start(&provider, &id).await,
        Commands::Stop { id } => commands::stop(&provider, &id).await,
        Commands::Terminate { id } => commands::terminate(&provider, &id).await,
        Commands::Manage => commands::manage(&provider).await,
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "✗".red().bold(), e);
        std::process::exit(1);
    }
}
