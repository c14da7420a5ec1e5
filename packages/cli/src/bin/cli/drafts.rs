// ABOUTME: Draft commands for the elbitat CLI
// ABOUTME: Generation, scheduling, review, approval, feedback regeneration and deletion

use chrono::Utc;
use colored::*;
use elbitat_core::{truncate, Draft, ScheduleStatus};
use inquire::Confirm;

use elbitat_cli::AppContext;

use super::utils::{format_date, new_table, parse_datetime, platform_list};

pub async fn generate_drafts(ctx: &AppContext) -> Result<(), Box<dyn std::error::Error>> {
    let service = ctx.draft_service();
    if !ctx.credentials.is_openai_configured() {
        println!(
            "{}",
            "OPENAI_API_KEY not set, drafts will use placeholder copy".yellow()
        );
    }

    let drafts = service.generate_drafts_for_all_requests().await?;
    if drafts.is_empty() {
        println!("{}", "No requests found".yellow());
        println!("{}", "Use 'elbitat new-request' to add one".dimmed());
        return Ok(());
    }

    for draft in &drafts {
        println!(
            "{} {} ({} images)",
            "✓".green(),
            draft.request.title.bold(),
            draft.selected_images.len()
        );
    }
    println!();
    println!("Generated {} draft(s)", drafts.len().to_string().cyan());
    Ok(())
}

pub async fn schedule_drafts(
    ctx: &AppContext,
    publish_at: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let publish_at = match publish_at {
        Some(value) => parse_datetime(&value)?,
        None => Utc::now(),
    };

    let service = ctx.draft_service();
    let drafts = service.generate_drafts_for_all_requests().await?;
    if drafts.is_empty() {
        println!("{}", "No requests found".yellow());
        return Ok(());
    }

    let scheduled = service.schedule_all(&drafts, Some(publish_at)).await?;
    println!(
        "Scheduled {} of {} draft(s) for {}",
        scheduled.to_string().cyan(),
        drafts.len(),
        format_date(&publish_at)
    );
    Ok(())
}

pub async fn show_drafts(ctx: &AppContext) -> Result<(), Box<dyn std::error::Error>> {
    let service = ctx.draft_service();
    let drafts = service.list_drafts().await?;

    if drafts.is_empty() {
        println!("{}", "No drafts found".yellow());
        println!("{}", "Use 'elbitat generate-drafts' to create drafts".dimmed());
        return Ok(());
    }

    let scheduled = service.list_scheduled().await?;

    println!("{}", "Drafts".blue().bold());
    println!();

    let mut table = new_table();
    table.set_header(vec!["Name", "Title", "Goal", "Platforms", "Images", "Status"]);
    for (key, draft) in &drafts {
        let slug = draft.request.slug();
        let status = scheduled
            .iter()
            .find(|(_, s)| s.draft.request.slug() == slug)
            .map(|(_, s)| match (s.status, s.approved) {
                (ScheduleStatus::Posted, _) => "Posted",
                (ScheduleStatus::Pending, true) => "Approved",
                (ScheduleStatus::Pending, false) => "Scheduled",
            })
            .unwrap_or("Draft");

        table.add_row(vec![
            key.trim_end_matches(".draft").to_string(),
            truncate(&draft.request.title, 30),
            draft.request.goal.to_string(),
            platform_list(&draft.request.platforms),
            draft.selected_images.len().to_string(),
            status.to_string(),
        ]);
    }

    println!("{}", table);
    println!("Total: {} drafts", drafts.len().to_string().cyan());
    Ok(())
}

fn print_draft(draft: &Draft) {
    let request = &draft.request;
    println!("{:<12} {}", "Goal:".bold(), request.goal);
    println!("{:<12} {}", "Platforms:".bold(), platform_list(&request.platforms));
    if let Some(month) = &request.month {
        println!("{:<12} {}", "Month:".bold(), month);
    }
    if let Some(audience) = &request.audience {
        println!("{:<12} {}", "Audience:".bold(), audience);
    }
    println!("{:<12} {}", "Language:".bold(), request.language);
    println!();
    println!("{}", "Brief".bold());
    println!("{}", request.brief);

    for platform in &request.platforms {
        let Some(fields) = draft.copy_by_platform.get(*platform) else {
            continue;
        };
        println!();
        println!("{}", platform.display_name().cyan().bold());
        for (name, value) in fields.values() {
            println!("{}: {}", name.bold(), value);
        }
    }

    println!();
    println!("{}", "Images".bold());
    if draft.selected_images.is_empty() {
        println!("{}", "No images selected".yellow());
    }
    for image in &draft.selected_images {
        println!("  {}", image);
    }
}

pub async fn show_draft(ctx: &AppContext, name: &str) -> Result<(), Box<dyn std::error::Error>> {
    let (key, draft) = ctx.draft_service().find_draft(name).await?;

    println!(
        "{}",
        format!("Draft - {}", draft.request.title).blue().bold()
    );
    println!("{}", key.dimmed());
    println!();
    print_draft(&draft);
    Ok(())
}

pub async fn approve_draft(ctx: &AppContext, name: &str) -> Result<(), Box<dyn std::error::Error>> {
    let scheduled = ctx.draft_service().approve_draft(name).await?;

    println!(
        "{} Approved '{}' and moved it to the schedule",
        "✓".green(),
        scheduled.draft.request.title.bold()
    );
    println!(
        "{}",
        format!(
            "Post it with 'elbitat auto-post {}'",
            scheduled.draft.request.slug()
        )
        .dimmed()
    );
    Ok(())
}

pub async fn regenerate_draft(
    ctx: &AppContext,
    name: &str,
    feedback: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    if !ctx.credentials.is_openai_configured() {
        println!(
            "{}",
            "OPENAI_API_KEY not set, regenerated copy will be placeholders".yellow()
        );
    }

    let draft = ctx.draft_service().regenerate_copy(name, feedback).await?;

    println!(
        "{} Regenerated copy for '{}'",
        "✓".green(),
        draft.request.title.bold()
    );
    println!();
    print_draft(&draft);
    Ok(())
}

pub async fn delete_draft(
    ctx: &AppContext,
    name: &str,
    yes: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let service = ctx.draft_service();
    let (_, draft) = service.find_draft(name).await?;

    let confirmed = yes
        || Confirm::new(&format!(
            "Delete draft '{}'? This cannot be undone.",
            draft.request.title
        ))
        .with_default(false)
        .prompt()?;

    if !confirmed {
        println!("{}", "Deletion cancelled".yellow());
        return Ok(());
    }

    if service.delete_draft(name, true).await? {
        println!("{} Deleted draft '{}'", "✓".green(), draft.request.title.bold());
    } else {
        println!("{}", format!("Draft '{}' was already gone", name).yellow());
    }
    Ok(())
}
