// ABOUTME: Marketing plan command for the elbitat CLI
// ABOUTME: Talks through the brief with the strategist and turns the plan into requests

use chrono::Local;
use colored::*;
use elbitat_ai::ChatMessage;
use elbitat_creative::convert_plan_to_requests;

use elbitat_cli::AppContext;

use super::utils::{parse_date, platform_list};

pub async fn plan(
    ctx: &AppContext,
    messages: Vec<String>,
    start: Option<String>,
    dry_run: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !ctx.credentials.is_openai_configured() {
        return Err("OPENAI_API_KEY is required for marketing plans".into());
    }
    let start = match start {
        Some(value) => parse_date(&value)?,
        None => Local::now().date_naive(),
    };

    let strategist = ctx.strategist();
    let mut history: Vec<ChatMessage> = Vec::new();
    for message in messages {
        println!("{} {}", "You:".bold(), message);
        let reply = strategist.chat(&message, &history).await;
        println!("{} {}", "Strategist:".cyan().bold(), reply);
        println!();
        history.push(ChatMessage::user(message));
        history.push(ChatMessage::assistant(reply));
    }

    println!("{}", "Generating marketing plan...".dimmed());
    let plan = strategist.generate_marketing_plan(&history).await?;

    println!("{}", format!("Plan - {}", plan.campaign_name).blue().bold());
    println!("Objective: {}", plan.overview.objective);
    println!("Audience:  {}", plan.overview.target_audience);
    println!("Message:   {}", plan.overview.key_message);
    println!(
        "Schedule:  {} post(s) per week, {}",
        plan.posting_schedule.frequency_per_week, plan.posting_schedule.best_times
    );
    if let Some(raw) = &plan.raw_plan {
        println!();
        println!("{}", "The strategist did not return a structured plan:".yellow());
        println!("{}", raw);
    }

    let requests = convert_plan_to_requests(&plan, start);
    if requests.is_empty() {
        println!("{}", "The plan contains no posts".yellow());
        return Ok(());
    }

    println!();
    let service = ctx.draft_service();
    for request in &requests {
        if dry_run {
            println!(
                "- {} [{}] {}",
                request.title,
                platform_list(&request.platforms),
                request.goal
            );
            continue;
        }
        let key = service.create_request(request).await?;
        println!("{} {} saved as {}", "✓".green(), request.title.bold(), key.cyan());
    }

    println!();
    if dry_run {
        println!("{}", "Dry run: no requests were saved".dimmed());
    } else {
        println!(
            "Total: {} requests. Run 'elbitat generate-drafts' next.",
            requests.len().to_string().cyan()
        );
    }
    Ok(())
}
