// ABOUTME: Publishing commands for the elbitat CLI
// ABOUTME: Reports which APIs are configured and auto-posts drafts

use colored::*;
use elbitat_config::constants;
use elbitat_core::{Platform, PostStatus};
use elbitat_creative::CreativeError;

use elbitat_cli::AppContext;

use super::utils::platform_list;

fn status_line(label: &str, configured: bool) {
    let status = if configured {
        "✓ Configured".green()
    } else {
        "✗ Not configured".red()
    };
    println!("{:<28} {}", label, status);
}

pub async fn check_api(ctx: &AppContext) -> Result<(), Box<dyn std::error::Error>> {
    let status = ctx.auto_poster().check_api_configuration();

    println!("{}", "API Configuration Status".blue().bold());
    println!();
    status_line("Meta (Instagram/Facebook):", status.meta);
    status_line("TikTok:", status.tiktok);
    status_line("OpenAI:", status.openai);
    status_line("SendGrid:", status.sendgrid);
    status_line("Serper:", status.serper);

    if !status.meta {
        println!();
        println!("To configure Meta (Instagram/Facebook), set:");
        for var in [
            constants::META_ACCESS_TOKEN,
            constants::META_PAGE_ID,
            constants::META_INSTAGRAM_ACCOUNT_ID,
        ] {
            println!("  {}", var.dimmed());
        }
    }
    if !status.tiktok {
        println!();
        println!("To configure TikTok, set:");
        for var in [constants::TIKTOK_ACCESS_TOKEN, constants::TIKTOK_OPEN_ID] {
            println!("  {}", var.dimmed());
        }
    }
    if !status.openai {
        println!();
        println!(
            "Set {} to generate copy with AI instead of placeholders",
            constants::OPENAI_API_KEY.dimmed()
        );
    }
    Ok(())
}

pub async fn auto_post(
    ctx: &AppContext,
    name: &str,
    platforms: Vec<Platform>,
) -> Result<(), Box<dyn std::error::Error>> {
    let service = ctx.draft_service();
    let draft = match service.find_draft(name).await {
        Ok((_, draft)) => draft,
        Err(CreativeError::DraftNotFound(_)) => {
            eprintln!("{}", format!("Draft not found: {}", name).red());
            let drafts = service.list_drafts().await?;
            if !drafts.is_empty() {
                println!();
                println!("Available drafts:");
                for (key, _) in drafts {
                    println!("  {}", key.trim_end_matches(".draft"));
                }
            }
            return Err("Draft not found".into());
        }
        Err(e) => return Err(e.into()),
    };

    let targets = if platforms.is_empty() {
        draft.request.platforms.clone()
    } else {
        platforms
    };

    println!(
        "{}",
        format!("Auto-posting: {}", draft.request.title).blue().bold()
    );
    println!("Platforms: {}", platform_list(&targets));
    println!();

    let results = ctx
        .auto_poster()
        .auto_post_draft(&draft, Some(&targets))
        .await;

    for (platform, outcome) in &results {
        let label = platform.display_name().to_uppercase();
        match outcome.status {
            PostStatus::Success => println!(
                "{} {}: Posted successfully (ID: {})",
                "✓".green(),
                label,
                outcome.post_id.as_deref().unwrap_or("N/A")
            ),
            PostStatus::NotConfigured => println!(
                "{} {}: {}",
                "⚠".yellow(),
                label,
                outcome.reason.as_deref().unwrap_or("Not configured")
            ),
            PostStatus::Error => println!(
                "{} {}: Error - {}",
                "✗".red(),
                label,
                outcome.error.as_deref().unwrap_or("Unknown error")
            ),
            PostStatus::Skipped => println!(
                "- {}: {}",
                label,
                outcome.reason.as_deref().unwrap_or("Skipped")
            ),
        }
    }

    println!();
    println!(
        "{}",
        format!(
            "Results saved as {}.posted",
            draft.request.slug()
        )
        .dimmed()
    );
    Ok(())
}
