// ABOUTME: Campaign request commands for the elbitat CLI
// ABOUTME: Lists stored requests and creates new ones, prompting for missing fields

use clap::Args;
use colored::*;
use elbitat_core::{truncate, CampaignRequest, Goal, Platform};
use inquire::{MultiSelect, Select, Text};

use elbitat_cli::AppContext;

use super::utils::{new_table, platform_list};

#[derive(Args)]
pub struct NewRequestArgs {
    /// Campaign title
    #[arg(short, long)]
    pub title: Option<String>,
    /// Creative brief
    #[arg(short, long)]
    pub brief: Option<String>,
    /// Target platforms (instagram, facebook, tiktok)
    #[arg(short, long, value_delimiter = ',')]
    pub platforms: Vec<Platform>,
    /// Campaign goal (awareness, bookings, leads, engagement)
    #[arg(short, long)]
    pub goal: Option<Goal>,
    /// Campaign month, e.g. 2025-07
    #[arg(short, long)]
    pub month: Option<String>,
    /// Target audience
    #[arg(short, long)]
    pub audience: Option<String>,
    /// Copy language
    #[arg(short, long, default_value = "en")]
    pub language: String,
}

pub async fn list_requests(ctx: &AppContext) -> Result<(), Box<dyn std::error::Error>> {
    let requests = ctx.draft_service().list_requests().await?;

    if requests.is_empty() {
        println!("{}", "No requests found".yellow());
        println!(
            "{}",
            "Use 'elbitat new-request' or add JSON files to the workspace 'requests' folder".dimmed()
        );
        return Ok(());
    }

    println!("{}", "Campaign Requests".blue().bold());
    println!();

    let mut table = new_table();
    table.set_header(vec!["Key", "Title", "Goal", "Platforms", "Month", "Brief"]);
    for request in &requests {
        table.add_row(vec![
            request.key(),
            truncate(&request.title, 30),
            request.goal.to_string(),
            platform_list(&request.platforms),
            request.month.clone().unwrap_or_else(|| "-".to_string()),
            truncate(&request.brief, 40),
        ]);
    }

    println!("{}", table);
    println!("Total: {} requests", requests.len().to_string().cyan());
    Ok(())
}

pub async fn new_request(
    ctx: &AppContext,
    args: NewRequestArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", "New Campaign Request".blue().bold());
    println!();

    let title = match args.title {
        Some(title) => title,
        None => Text::new("Title:").prompt()?,
    };
    let brief = match args.brief {
        Some(brief) => brief,
        None => Text::new("Brief:")
            .with_help_message("What should the campaign say or promote?")
            .prompt()?,
    };
    let platforms = if args.platforms.is_empty() {
        MultiSelect::new("Platforms:", Platform::ALL.to_vec())
            .with_default(&[0, 1])
            .prompt()?
    } else {
        args.platforms
    };
    let goal = match args.goal {
        Some(goal) => goal,
        None => Select::new(
            "Goal:",
            vec![Goal::Awareness, Goal::Bookings, Goal::Leads, Goal::Engagement],
        )
        .prompt()?,
    };

    let request = CampaignRequest {
        title,
        month: args.month,
        goal,
        platforms,
        audience: args.audience.filter(|a| !a.trim().is_empty()),
        language: args.language,
        brief,
    };

    let key = ctx.draft_service().create_request(&request).await?;

    println!(
        "{} Saved request '{}' as {}",
        "✓".green(),
        request.title.bold(),
        key.cyan()
    );
    println!("{}", "Run 'elbitat generate-drafts' to create drafts".dimmed());
    Ok(())
}
