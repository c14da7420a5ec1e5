// ABOUTME: Contact discovery: web search for companies, then email scraping of their sites
// ABOUTME: Serper when configured, DuckDuckGo Lite otherwise, manual-entry record as last resort

use std::collections::BTreeSet;
use std::time::Duration;

use lazy_static::lazy_static;
use regex::Regex;
use reqwest::Client;
use scraper::{Html, Selector};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{OutreachError, OutreachResult};
use crate::types::{CompanyResult, EmailContact};

pub const SERPER_BASE_URL: &str = "https://google.serper.dev";
pub const DUCKDUCKGO_LITE_URL: &str = "https://lite.duckduckgo.com/lite/";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Pages checked after the site itself
const CONTACT_PATHS: &[&str] = &["/contact", "/about", "/team", "/kontakt", "/om-os"];

const IGNORED_DOMAINS: &[&str] = &[
    "example.com",
    "test.com",
    "domain.com",
    "email.com",
    "yoursite.com",
    "website.com",
    "placeholder.com",
];

pub const DEFAULT_MAX_PAGES: usize = 3;

lazy_static! {
    static ref EMAIL_PATTERN: Regex =
        Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").expect("valid email pattern");
    static ref VALID_EMAIL: Regex =
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email pattern");
}

pub fn validate_email(email: &str) -> bool {
    VALID_EMAIL.is_match(email)
}

fn is_ignored(email: &str) -> bool {
    let email = email.to_lowercase();
    IGNORED_DOMAINS.iter().any(|d| email.contains(d))
}

/// Emails in an HTML page's text and `mailto:` links, placeholder domains dropped
pub fn extract_emails_from_html(html: &str) -> BTreeSet<String> {
    let document = Html::parse_document(html);
    let mut emails = BTreeSet::new();

    let text = document.root_element().text().collect::<Vec<_>>().join(" ");
    for m in EMAIL_PATTERN.find_iter(&text) {
        emails.insert(m.as_str().to_string());
    }

    if let Ok(anchors) = Selector::parse("a[href]") {
        for anchor in document.select(&anchors) {
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };
            if let Some(target) = href.strip_prefix("mailto:") {
                let email = target.split('?').next().unwrap_or_default().trim();
                if validate_email(email) {
                    emails.insert(email.to_string());
                }
            }
        }
    }

    emails.retain(|e| !is_ignored(e));
    emails
}

/// Search terms extended with a country name and its TLD hint
fn country_query(query: &str, country: Option<&str>) -> String {
    let Some(country) = country.filter(|c| !c.trim().is_empty()) else {
        return query.to_string();
    };
    let hint = match country.trim().to_lowercase().as_str() {
        "denmark" => "Denmark .dk",
        "sweden" => "Sweden .se",
        "norway" => "Norway .no",
        "germany" => "Germany .de",
        "uk" => "United Kingdom .uk",
        "usa" => "USA .com",
        _ => country.trim(),
    };
    format!("{} {}", query, hint)
}

/// Company links from a DuckDuckGo Lite result page
pub fn parse_duckduckgo_results(html: &str, limit: usize) -> Vec<CompanyResult> {
    let document = Html::parse_document(html);
    let mut results = Vec::new();
    let Ok(anchors) = Selector::parse("a[href]") else {
        return results;
    };

    for anchor in document.select(&anchors) {
        if results.len() >= limit {
            break;
        }
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let text = anchor.text().collect::<String>().trim().to_string();

        let target = match href.split_once("uddg=") {
            Some((_, rest)) => {
                let encoded = rest.split('&').next().unwrap_or_default();
                url::form_urlencoded::parse(format!("u={}", encoded).as_bytes())
                    .next()
                    .map(|(_, v)| v.into_owned())
                    .unwrap_or_default()
            }
            None => href.to_string(),
        };

        if !target.starts_with("http") || target.contains("duckduckgo.com") {
            continue;
        }
        if text.chars().count() <= 5 {
            continue;
        }

        results.push(CompanyResult {
            company_name: text.chars().take(100).collect(),
            website: target,
            description: String::new(),
        });
    }
    results
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(|c| c.to_lowercase())).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Record pointing the user at a manual search when discovery is impossible
pub fn manual_entry(query: &str, country: Option<&str>) -> CompanyResult {
    let terms = format!("{} {}", query, country.unwrap_or_default());
    let website = Url::parse_with_params("https://www.google.com/search", &[("q", terms.trim())])
        .map(|u| u.to_string())
        .unwrap_or_else(|_| "https://www.google.com/search".to_string());

    CompanyResult {
        company_name: format!("{} (Manual Entry)", title_case(query)),
        website,
        description: "Could not auto-discover. Click to search manually.".to_string(),
    }
}

#[derive(Debug, Deserialize)]
struct SerperResponse {
    #[serde(default)]
    organic: Vec<SerperResult>,
}

#[derive(Debug, Deserialize)]
struct SerperResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    snippet: String,
}

pub struct EmailFinder {
    client: Client,
    serper_api_key: Option<String>,
    serper_base_url: String,
    duckduckgo_url: String,
}

impl EmailFinder {
    pub fn new(serper_api_key: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            serper_api_key,
            serper_base_url: SERPER_BASE_URL.to_string(),
            duckduckgo_url: DUCKDUCKGO_LITE_URL.to_string(),
        }
    }

    pub fn with_search_urls(mut self, serper: impl Into<String>, duckduckgo: impl Into<String>) -> Self {
        self.serper_base_url = serper.into().trim_end_matches('/').to_string();
        self.duckduckgo_url = duckduckgo.into();
        self
    }

    /// Companies matching the query. Never fails: falls back through every search source.
    pub async fn search_companies(
        &self,
        query: &str,
        country: Option<&str>,
        limit: usize,
    ) -> Vec<CompanyResult> {
        if let Some(key) = &self.serper_api_key {
            match self.search_serper(key, query, country, limit).await {
                Ok(results) => return results,
                Err(e) => warn!("Serper search failed, using fallback search: {}", e),
            }
        } else {
            debug!("Serper API key not configured, using fallback search");
        }

        match self.search_duckduckgo(query, country, limit).await {
            Ok(mut results) => {
                if results.len() < 3 {
                    results.extend(directory_sites(query, country, limit.saturating_sub(results.len())));
                }
                results
            }
            Err(e) => {
                warn!("Fallback search failed: {}", e);
                vec![manual_entry(query, country)]
            }
        }
    }

    async fn search_serper(
        &self,
        api_key: &str,
        query: &str,
        country: Option<&str>,
        limit: usize,
    ) -> OutreachResult<Vec<CompanyResult>> {
        let q = match country {
            Some(c) if !c.trim().is_empty() => format!("{} {}", query, c.trim()),
            _ => query.to_string(),
        };

        let response = self
            .client
            .post(format!("{}/search", self.serper_base_url))
            .header("X-API-KEY", api_key)
            .json(&json!({ "q": q, "num": limit }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(OutreachError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: SerperResponse = response.json().await?;
        Ok(body
            .organic
            .into_iter()
            .take(limit)
            .map(|r| CompanyResult {
                company_name: r.title,
                website: r.link,
                description: r.snippet,
            })
            .collect())
    }

    async fn search_duckduckgo(
        &self,
        query: &str,
        country: Option<&str>,
        limit: usize,
    ) -> OutreachResult<Vec<CompanyResult>> {
        let q = country_query(query, country);
        let url = Url::parse_with_params(&self.duckduckgo_url, &[("q", q.as_str())])?;
        let html = self.client.get(url).send().await?.text().await?;
        Ok(parse_duckduckgo_results(&html, limit))
    }

    /// Unique sorted emails from the site and its usual contact pages
    pub async fn extract_emails_from_website(
        &self,
        website: &str,
        max_pages: usize,
    ) -> OutreachResult<Vec<String>> {
        let website = if website.starts_with("http://") || website.starts_with("https://") {
            website.to_string()
        } else {
            format!("https://{}", website)
        };
        let site = Url::parse(&website)?;

        let mut pages = vec![site.clone()];
        for path in CONTACT_PATHS {
            pages.push(site.join(path)?);
        }

        let mut emails = BTreeSet::new();
        let mut checked = 0;
        for page in pages {
            if checked >= max_pages {
                break;
            }
            match self.client.get(page.clone()).send().await {
                Ok(response) if response.status().is_success() => {
                    checked += 1;
                    match response.text().await {
                        Ok(html) => emails.extend(extract_emails_from_html(&html)),
                        Err(e) => debug!("Could not read {}: {}", page, e),
                    }
                }
                Ok(response) => debug!("{} answered {}", page, response.status()),
                Err(e) => debug!("Error checking {}: {}", page, e),
            }
        }

        Ok(emails.into_iter().collect())
    }

    /// Search for companies and collect valid contact emails from their sites
    pub async fn discover_contacts(
        &self,
        query: &str,
        country: Option<&str>,
        max_companies: usize,
    ) -> Vec<EmailContact> {
        info!(
            "Searching for: {} in {}",
            query,
            country.unwrap_or("all countries")
        );
        let companies = self.search_companies(query, country, max_companies).await;
        info!("Found {} companies to check", companies.len());

        let mut contacts = Vec::new();
        for (i, company) in companies.iter().enumerate() {
            if company.website.is_empty() {
                continue;
            }
            debug!("[{}/{}] Checking {}", i + 1, companies.len(), company.company_name);

            let emails = match self
                .extract_emails_from_website(&company.website, DEFAULT_MAX_PAGES)
                .await
            {
                Ok(emails) => emails,
                Err(e) => {
                    warn!("Error extracting emails from {}: {}", company.website, e);
                    continue;
                }
            };

            for email in emails.into_iter().filter(|e| validate_email(e)) {
                let mut contact = EmailContact::new(email);
                contact.company_name = Some(company.company_name.clone());
                contact.website = Some(company.website.clone());
                contact.country = country.map(str::to_string);
                contact.source = Some(format!("web_search: {}", query));
                contacts.push(contact);
            }
        }

        info!("Discovery complete, found {} email contacts", contacts.len());
        contacts
    }
}

/// Business directories worth checking when the search came back thin
fn directory_sites(query: &str, country: Option<&str>, room: usize) -> Vec<CompanyResult> {
    let Some(country) = country.map(|c| c.to_lowercase()) else {
        return Vec::new();
    };
    if !(country.contains("denmark") || country.contains("dk")) {
        return Vec::new();
    }

    let sites = [
        format!("https://www.proff.dk/bransjes%C3%B8k/{}", query.replace(' ', "-")),
        "https://www.krak.dk/".to_string(),
    ];
    sites
        .into_iter()
        .take(room)
        .map(|website| CompanyResult {
            company_name: format!("{} Directory", title_case(query)),
            website,
            description: "Business directory".to_string(),
        })
        .collect()
}
