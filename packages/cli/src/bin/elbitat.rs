// ABOUTME: Entry point for the elbitat command-line tool
// ABOUTME: Parses commands, loads configuration and dispatches to the command modules

use clap::{Parser, Subcommand};
use colored::*;
use elbitat_core::Platform;
use std::process;

mod cli;

use cli::outreach::{handle_outreach_command, OutreachCommands};
use cli::requests::NewRequestArgs;
use elbitat_cli::{init_logging, AppContext, Config, StorageBackend};

#[derive(Parser)]
#[command(name = "elbitat")]
#[command(about = "Elbitat social media agent - campaign drafts, publishing and outreach")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List campaign requests in the workspace
    ListRequests,
    /// Create a campaign request
    NewRequest(NewRequestArgs),
    /// Generate a draft for every request
    GenerateDrafts,
    /// Generate drafts and schedule them for publication
    ScheduleDrafts {
        /// Publication time (YYYY-MM-DD, 'YYYY-MM-DD HH:MM' or RFC 3339); defaults to now
        #[arg(long)]
        publish_at: Option<String>,
    },
    /// List generated drafts
    ShowDrafts,
    /// Show one draft for review
    ShowDraft {
        /// Draft name or title
        name: String,
    },
    /// Approve a draft for posting
    ApproveDraft {
        /// Draft name or title
        name: String,
    },
    /// Regenerate a draft's copy with reviewer feedback
    RegenerateDraft {
        /// Draft name or title
        name: String,
        /// What to change
        #[arg(short, long)]
        feedback: String,
    },
    /// Delete a draft
    DeleteDraft {
        /// Draft name or title
        name: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Check API configuration status for automated posting
    CheckApi,
    /// Post a draft to its social media platforms
    AutoPost {
        /// Draft name (without .json extension)
        name: String,
        /// Only these platforms (instagram, facebook, tiktok)
        #[arg(long, num_args = 1.., value_delimiter = ',')]
        platforms: Vec<Platform>,
    },
    /// Plan a multi-post campaign with the marketing strategist
    Plan {
        /// Message to the strategist; repeat for a longer conversation
        #[arg(short, long = "message", required = true)]
        messages: Vec<String>,
        /// First post date (YYYY-MM-DD); defaults to today
        #[arg(long)]
        start: Option<String>,
        /// Print the planned requests without saving them
        #[arg(long)]
        dry_run: bool,
    },
    /// Copy every record into another storage backend
    MigrateStorage {
        /// Target backend: files or sqlite
        #[arg(long)]
        to: StorageBackend,
    },
    /// Email outreach
    #[command(subcommand)]
    Outreach(OutreachCommands),
}

#[tokio::main]
async fn main() {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();
    init_logging();

    let cli = Cli::parse();

    match handle_command(cli.command).await {
        Ok(_) => {}
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            process::exit(1);
        }
    }
}

async fn handle_command(command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    let ctx = AppContext::open(config).await?;

    match command {
        Commands::ListRequests => cli::requests::list_requests(&ctx).await,
        Commands::NewRequest(args) => cli::requests::new_request(&ctx, args).await,
        Commands::GenerateDrafts => cli::drafts::generate_drafts(&ctx).await,
        Commands::ScheduleDrafts { publish_at } => {
            cli::drafts::schedule_drafts(&ctx, publish_at).await
        }
        Commands::ShowDrafts => cli::drafts::show_drafts(&ctx).await,
        Commands::ShowDraft { name } => cli::drafts::show_draft(&ctx, &name).await,
        Commands::ApproveDraft { name } => cli::drafts::approve_draft(&ctx, &name).await,
        Commands::RegenerateDraft { name, feedback } => {
            cli::drafts::regenerate_draft(&ctx, &name, &feedback).await
        }
        Commands::DeleteDraft { name, yes } => cli::drafts::delete_draft(&ctx, &name, yes).await,
        Commands::CheckApi => cli::posting::check_api(&ctx).await,
        Commands::AutoPost { name, platforms } => {
            cli::posting::auto_post(&ctx, &name, platforms).await
        }
        Commands::Plan {
            messages,
            start,
            dry_run,
        } => cli::planning::plan(&ctx, messages, start, dry_run).await,
        Commands::MigrateStorage { to } => cli::storage::migrate_storage(&ctx, to).await,
        Commands::Outreach(command) => handle_outreach_command(&ctx, command).await,
    }
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
    fn test_auto_post_platforms_parse() {
        let cli = Cli::try_parse_from([
            "elbitat",
            "auto-post",
            "summer_special",
            "--platforms",
            "instagram,TikTok",
        ])
        .unwrap();
        match cli.command {
            Commands::AutoPost { name, platforms } => {
                assert_eq!(name, "summer_special");
                assert_eq!(platforms, vec![Platform::Instagram, Platform::TikTok]);
            }
            _ => panic!("expected auto-post"),
        }
    }

    #[test]
    fn test_migrate_storage_rejects_unknown_backend() {
        assert!(Cli::try_parse_from(["elbitat", "migrate-storage", "--to", "supabase"]).is_err());
    }
}
