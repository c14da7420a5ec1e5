// ABOUTME: Email outreach commands for the elbitat CLI
// ABOUTME: Contact discovery, contact book, templates, test sends, campaigns and AI copy

use clap::Subcommand;
use colored::*;
use elbitat_core::truncate;
use elbitat_outreach::{
    create_html_template, default_templates, EmailBrief, EmailContact, EmailLength,
    EmailTemplate, DEFAULT_BATCH_SIZE,
};
use inquire::Confirm;

use elbitat_cli::AppContext;

use super::utils::{format_date, new_table};

#[derive(Subcommand)]
pub enum OutreachCommands {
    /// Search the web for companies and collect their contact emails
    Discover {
        /// What to search for, e.g. "yoga retreat agency"
        query: String,
        /// Restrict the search to a country
        #[arg(short, long)]
        country: Option<String>,
        /// Maximum number of companies to check
        #[arg(short, long, default_value = "10")]
        max: usize,
        /// Save the discovered contacts
        #[arg(long)]
        save: bool,
    },
    /// Save a contact by hand
    Save {
        /// Contact email address
        email: String,
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        website: Option<String>,
        #[arg(long)]
        country: Option<String>,
        #[arg(long)]
        industry: Option<String>,
        #[arg(long)]
        first_name: Option<String>,
    },
    /// List saved contacts
    Contacts,
    /// List the built-in email templates
    Templates {
        /// Print the body of one template
        #[arg(long)]
        show: Option<String>,
    },
    /// Send a template with sample data to one address
    TestEmail {
        /// Recipient address
        to: String,
        #[arg(short, long, default_value = "Introduction")]
        template: String,
    },
    /// Send a campaign to saved contacts
    Send {
        /// Campaign name
        #[arg(short, long)]
        name: String,
        #[arg(short, long, default_value = "Introduction")]
        template: String,
        /// Override the template subject
        #[arg(short, long)]
        subject: Option<String>,
        /// Only these addresses (default: every contact not yet contacted)
        #[arg(short, long, value_delimiter = ',')]
        emails: Vec<String>,
        #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
        batch_size: usize,
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Write an outreach email with AI
    Write {
        /// What the email should achieve
        #[arg(short, long)]
        goal: String,
        /// Who receives it
        #[arg(short, long)]
        audience: String,
        /// Points the email must cover
        #[arg(short, long = "key-point")]
        key_points: Vec<String>,
        #[arg(long, default_value = "professional")]
        tone: String,
        /// short, medium or long
        #[arg(short, long, default_value = "medium")]
        length: EmailLength,
    },
}

pub async fn handle_outreach_command(
    ctx: &AppContext,
    command: OutreachCommands,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        OutreachCommands::Discover {
            query,
            country,
            max,
            save,
        } => discover(ctx, &query, country.as_deref(), max, save).await,
        OutreachCommands::Save {
            email,
            company,
            website,
            country,
            industry,
            first_name,
        } => {
            let mut contact = EmailContact::new(email);
            contact.company_name = company;
            contact.website = website;
            contact.country = country;
            contact.industry = industry;
            contact.first_name = first_name;
            contact.source = Some("manual".to_string());
            save_contact(ctx, contact).await
        }
        OutreachCommands::Contacts => list_contacts(ctx).await,
        OutreachCommands::Templates { show } => show_templates(show.as_deref()),
        OutreachCommands::TestEmail { to, template } => test_email(ctx, &to, &template).await,
        OutreachCommands::Send {
            name,
            template,
            subject,
            emails,
            batch_size,
            yes,
        } => send_campaign(ctx, &name, &template, subject, emails, batch_size, yes).await,
        OutreachCommands::Write {
            goal,
            audience,
            key_points,
            tone,
            length,
        } => {
            let brief = EmailBrief {
                key_points,
                tone,
                length,
                ..EmailBrief::new(goal, audience)
            };
            write_email(ctx, &brief).await
        }
    }
}

fn find_template(name: &str) -> Result<EmailTemplate, Box<dyn std::error::Error>> {
    let templates = default_templates();
    templates
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name.trim()))
        .map(|(_, template)| template.clone())
        .ok_or_else(|| {
            format!(
                "Unknown template '{}'. Available: {}",
                name,
                templates.keys().copied().collect::<Vec<_>>().join(", ")
            )
            .into()
        })
}

async fn discover(
    ctx: &AppContext,
    query: &str,
    country: Option<&str>,
    max: usize,
    save: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    println!(
        "{}",
        format!("Searching for '{}' in {}", query, country.unwrap_or("all countries"))
            .blue()
            .bold()
    );
    if !ctx.credentials.is_serper_configured() {
        println!("{}", "SERPER_API_KEY not set, using fallback search".dimmed());
    }

    let contacts = ctx.email_finder().discover_contacts(query, country, max).await;
    if contacts.is_empty() {
        println!("{}", "No contacts found".yellow());
        return Ok(());
    }

    let mut table = new_table();
    table.set_header(vec!["Email", "Company", "Website"]);
    for contact in &contacts {
        table.add_row(vec![
            contact.email.clone(),
            truncate(contact.company_name.as_deref().unwrap_or("-"), 30),
            truncate(contact.website.as_deref().unwrap_or("-"), 40),
        ]);
    }
    println!("{}", table);
    println!("Total: {} contacts", contacts.len().to_string().cyan());

    if save {
        let stats = ctx.contact_book().save_contacts(&contacts).await;
        println!(
            "Saved {}, skipped {}, errors {}",
            stats.saved.to_string().green(),
            stats.skipped,
            stats.errors
        );
    } else {
        println!("{}", "Run again with --save to store these contacts".dimmed());
    }
    Ok(())
}

async fn save_contact(
    ctx: &AppContext,
    contact: EmailContact,
) -> Result<(), Box<dyn std::error::Error>> {
    if ctx.contact_book().save_contact(&contact).await? {
        println!("{} Saved contact {}", "✓".green(), contact.email.bold());
    } else {
        println!(
            "{}",
            format!("Contact {} already exists", contact.email).yellow()
        );
    }
    Ok(())
}

async fn list_contacts(ctx: &AppContext) -> Result<(), Box<dyn std::error::Error>> {
    let contacts = ctx.contact_book().list_contacts().await?;
    if contacts.is_empty() {
        println!("{}", "No contacts found".yellow());
        println!(
            "{}",
            "Use 'elbitat outreach discover --save' or 'elbitat outreach save'".dimmed()
        );
        return Ok(());
    }

    let mut table = new_table();
    table.set_header(vec!["Email", "Company", "Country", "Status", "Added"]);
    for contact in &contacts {
        let status = if contact.is_contacted() {
            "Contacted"
        } else {
            "New"
        };
        table.add_row(vec![
            contact.email.clone(),
            truncate(contact.company_name.as_deref().unwrap_or("-"), 30),
            contact.country.clone().unwrap_or_else(|| "-".to_string()),
            status.to_string(),
            format_date(&contact.created_at),
        ]);
    }
    println!("{}", table);
    println!("Total: {} contacts", contacts.len().to_string().cyan());
    Ok(())
}

fn show_templates(show: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(name) = show {
        let template = find_template(name)?;
        println!("{} {}", "Subject:".bold(), template.subject);
        println!();
        println!("{}", template.body);
        return Ok(());
    }

    let mut table = new_table();
    table.set_header(vec!["Template", "Subject"]);
    for (name, template) in default_templates() {
        table.add_row(vec![name.to_string(), template.subject]);
    }
    println!("{}", table);
    println!(
        "{}",
        "Placeholders: {{first_name}} {{company_name}} {{website}} {{country}} {{email}}".dimmed()
    );
    Ok(())
}

async fn test_email(
    ctx: &AppContext,
    to: &str,
    template_name: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let template = find_template(template_name)?;
    let html = create_html_template(&template.body, true);

    let result = ctx
        .mailer()
        .send_test_email(&html, &template.subject, to)
        .await;
    if result.success {
        println!(
            "{} Test email sent to {} (ID: {})",
            "✓".green(),
            to.bold(),
            result.message_id.as_deref().unwrap_or("N/A")
        );
        Ok(())
    } else {
        Err(result
            .error
            .unwrap_or_else(|| "Unknown error".to_string())
            .into())
    }
}

async fn send_campaign(
    ctx: &AppContext,
    name: &str,
    template_name: &str,
    subject: Option<String>,
    emails: Vec<String>,
    batch_size: usize,
    yes: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let runner = ctx.campaign_runner();
    if !runner.mailer().is_configured() {
        return Err("SENDGRID_API_KEY is required to send campaigns".into());
    }

    let template = find_template(template_name)?;
    let subject = subject.unwrap_or(template.subject);
    let html = create_html_template(&template.body, true);

    let book = ctx.contact_book();
    let recipients: Vec<String> = if emails.is_empty() {
        book.list_contacts()
            .await?
            .into_iter()
            .filter(|c| !c.is_contacted())
            .map(|c| c.email)
            .collect()
    } else {
        emails
    };
    if recipients.is_empty() {
        println!("{}", "No contacts to send to".yellow());
        return Ok(());
    }

    let confirmed = yes
        || Confirm::new(&format!(
            "Send '{}' to {} contact(s)?",
            subject,
            recipients.len()
        ))
        .with_default(false)
        .prompt()?;
    if !confirmed {
        println!("{}", "Campaign cancelled".yellow());
        return Ok(());
    }

    let campaign = book.create_campaign(name, &subject, &html).await?;
    println!(
        "{}",
        format!("Sending campaign '{}'", campaign.name).blue().bold()
    );

    let stats = runner
        .send_campaign(&campaign.id, &recipients, &subject, &html, batch_size)
        .await?;

    println!(
        "Sent: {}  Failed: {}  Skipped: {}",
        stats.sent.to_string().green(),
        stats.failed.to_string().red(),
        stats.skipped
    );
    Ok(())
}

async fn write_email(ctx: &AppContext, brief: &EmailBrief) -> Result<(), Box<dyn std::error::Error>> {
    if !ctx.credentials.is_openai_configured() {
        return Err("OPENAI_API_KEY is required to write emails".into());
    }

    println!("{}", "Writing email...".dimmed());
    let email = ctx.copywriter().generate_email_content(brief).await;

    println!("{} {}", "Subject:".bold(), email.subject);
    println!();
    println!("{}", email.body);
    Ok(())
}
