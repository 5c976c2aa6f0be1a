//! CampusBuddy - university assistant CLI

use clap::{Parser, Subcommand};
use tracing::error;

mod commands;

use commands::{
    ask_command, chat_command, init_command, sessions_clear_command, sessions_list_command,
    status_command,
};

/// CampusBuddy - ask about schedules, modules, payments, and campus life
#[derive(Parser)]
#[command(name = "buddy")]
#[command(about = "University assistant with an LLM tool-calling core")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config, data directory, and sample campus data
    Init,
    /// Ask one question
    Ask {
        /// Message to send
        message: String,
        /// Student id (omit for guest mode)
        #[arg(short, long)]
        user: Option<String>,
        /// Chat mode: guest, course_tutor, or admin_support
        #[arg(short, long, default_value = "admin_support")]
        mode: String,
        /// Conversation tag
        #[arg(short, long, default_value = "default")]
        session: String,
    },
    /// Interactive chat
    Chat {
        /// Student id (omit for guest mode)
        #[arg(short, long)]
        user: Option<String>,
        /// Chat mode: guest, course_tutor, or admin_support
        #[arg(short, long, default_value = "admin_support")]
        mode: String,
        /// Conversation tag
        #[arg(short, long, default_value = "default")]
        session: String,
    },
    /// Show configuration and data status
    Status,
    /// Manage stored conversations
    Sessions {
        #[command(subcommand)]
        command: SessionCommands,
    },
}

#[derive(Subcommand)]
enum SessionCommands {
    /// List stored conversations
    List,
    /// Delete a stored conversation
    Clear { key: String },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt().with_env_filter("debug").init();
    } else {
        tracing_subscriber::fmt::init();
    }

    match cli.command {
        Commands::Init => {
            if let Err(e) = init_command().await {
                error!("Init failed: {}", e);
                std::process::exit(1);
            }
        }
        Commands::Ask {
            message,
            user,
            mode,
            session,
        } => {
            if let Err(e) = ask_command(message, user, mode, session).await {
                error!("Error: {}", e);
                std::process::exit(1);
            }
        }
        Commands::Chat {
            user,
            mode,
            session,
        } => {
            if let Err(e) = chat_command(user, mode, session).await {
                error!("Error: {}", e);
                std::process::exit(1);
            }
        }
        Commands::Status => {
            if let Err(e) = status_command().await {
                error!("Status failed: {}", e);
                std::process::exit(1);
            }
        }
        Commands::Sessions { command } => match command {
            SessionCommands::List => {
                if let Err(e) = sessions_list_command().await {
                    error!("Sessions list failed: {}", e);
                    std::process::exit(1);
                }
            }
            SessionCommands::Clear { key } => {
                if let Err(e) = sessions_clear_command(key).await {
                    error!("Sessions clear failed: {}", e);
                    std::process::exit(1);
                }
            }
        },
    }
}
