// ABOUTME: Outreach flows against mock search, website and SendGrid servers
// ABOUTME: Discovery fallbacks, email scraping, contact saving and campaign sends

use std::sync::Arc;

use elbitat_outreach::{
    CampaignRunner, ContactBook, ContactStatus, EmailContact, EmailFinder, SendGridMailer,
    SendStatus,
};
use elbitat_storage::{JsonFileStore, RecordStore};
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn book(dir: &TempDir) -> ContactBook {
    let store: Arc<dyn RecordStore> = Arc::new(JsonFileStore::new(dir.path()));
    ContactBook::new(store)
}

fn contact(email: &str, company: &str) -> EmailContact {
    let mut contact = EmailContact::new(email);
    contact.company_name = Some(company.to_string());
    contact.country = Some("Denmark".to_string());
    contact
}

#[tokio::test]
async fn test_serper_search_results() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .and(header("X-API-KEY", "serper-key"))
        .and(body_partial_json(json!({ "q": "yoga studios Denmark", "num": 2 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "organic": [
                { "title": "Zen Yoga", "link": "https://zenyoga.dk", "snippet": "Yoga in Aarhus" },
                { "title": "Calm Studio", "link": "https://calm.dk" },
                { "title": "Third", "link": "https://third.dk" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let finder = EmailFinder::new(Some("serper-key".to_string()))
        .with_search_urls(server.uri(), format!("{}/lite/", server.uri()));
    let results = finder
        .search_companies("yoga studios", Some("Denmark"), 2)
        .await;

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].company_name, "Zen Yoga");
    assert_eq!(results[0].description, "Yoga in Aarhus");
    assert_eq!(results[1].description, "");
}

#[tokio::test]
async fn test_serper_failure_falls_back_to_duckduckgo() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(403).set_body_string("quota"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/lite/"))
        .and(query_param("q", "spa hotels Sweden .se"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<a href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fnordicspa.se%2F">Nordic Spa Hotel</a>
               <a href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fforestspa.se%2F">Forest Spa Retreat</a>
               <a href="//duckduckgo.com/l/?uddg=https%3A%2F%2Flakeside.se%2F">Lakeside Wellness</a>"#,
        ))
        .mount(&server)
        .await;

    let finder = EmailFinder::new(Some("serper-key".to_string()))
        .with_search_urls(server.uri(), format!("{}/lite/", server.uri()));
    let results = finder.search_companies("spa hotels", Some("Sweden"), 10).await;

    let sites: Vec<&str> = results.iter().map(|r| r.website.as_str()).collect();
    assert_eq!(
        sites,
        vec!["https://nordicspa.se/", "https://forestspa.se/", "https://lakeside.se/"]
    );
}

#[tokio::test]
async fn test_unreachable_search_yields_manual_entry() {
    let finder = EmailFinder::new(None)
        .with_search_urls("http://127.0.0.1:9", "http://127.0.0.1:9/lite/");
    let results = finder.search_companies("wellness agencies", None, 5).await;

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].company_name, "Wellness Agencies (Manual Entry)");
}

#[tokio::test]
async fn test_email_extraction_stops_after_max_pages() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<p>Reach us at hello@zenyoga.dk or demo@example.com</p>",
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/contact"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<a href="mailto:anna@zenyoga.dk?subject=Hi">Anna</a> hello@zenyoga.dk"#,
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/team"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>lars@zenyoga.dk</p>"))
        .expect(0)
        .mount(&server)
        .await;

    let finder = EmailFinder::new(None);
    let emails = finder
        .extract_emails_from_website(&format!("{}/", server.uri()), 2)
        .await
        .unwrap();

    assert_eq!(emails, vec!["anna@zenyoga.dk", "hello@zenyoga.dk"]);
}

#[tokio::test]
async fn test_save_contacts_counts_duplicates_and_missing_emails() {
    let dir = TempDir::new().unwrap();
    let book = book(&dir);

    let stats = book
        .save_contacts(&[
            contact("anna@zenyoga.dk", "Zen Yoga"),
            contact("Anna@ZenYoga.dk", "Zen Yoga"),
            contact("", "No Email Ltd"),
            contact("not-an-email", "Broken"),
        ])
        .await;

    assert_eq!(stats.saved, 1);
    assert_eq!(stats.skipped, 2);
    assert_eq!(stats.errors, 1);
    assert_eq!(book.list_contacts().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_sendgrid_success_reads_message_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/mail/send"))
        .and(header("authorization", "Bearer sg-key"))
        .and(body_partial_json(json!({
            "from": { "email": "hello@elbitat.it" },
            "subject": "Hello Anna"
        })))
        .respond_with(ResponseTemplate::new(202).insert_header("X-Message-Id", "msg-1"))
        .expect(1)
        .mount(&server)
        .await;

    let mailer = SendGridMailer::new(Some("sg-key".to_string()), Some("hello@elbitat.it".to_string()))
        .with_base_url(server.uri());
    let result = mailer
        .send_email("anna@zenyoga.dk", "Hello Anna", "<p>Hi</p>")
        .await;

    assert!(result.success);
    assert_eq!(result.status_code, Some(202));
    assert_eq!(result.message_id.as_deref(), Some("msg-1"));
}

#[tokio::test]
async fn test_campaign_skips_contacted_and_records_sends() {
    let dir = TempDir::new().unwrap();
    let book = book(&dir);
    book.save_contacts(&[
        contact("anna@zenyoga.dk", "Zen Yoga"),
        contact("lars@calm.dk", "Calm Studio"),
        contact("mia@forest.dk", "Forest Spa"),
    ])
    .await;
    book.update_status("mia@forest.dk", ContactStatus::Contacted)
        .await
        .unwrap();
    let campaign = book
        .create_campaign("Autumn Intro", "Hi {{first_name}}", "<p>{{company_name}}</p>")
        .await
        .unwrap();

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/mail/send"))
        .and(body_partial_json(json!({ "subject": "Hi Anna" })))
        .respond_with(ResponseTemplate::new(202))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v3/mail/send"))
        .and(body_partial_json(json!({ "subject": "Hi Lars" })))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad recipient"))
        .mount(&server)
        .await;

    let mailer = SendGridMailer::new(Some("sg-key".to_string()), None).with_base_url(server.uri());
    let runner = CampaignRunner::new(book.clone(), mailer);
    let stats = runner
        .send_campaign(
            &campaign.id,
            &[
                "anna@zenyoga.dk".to_string(),
                "LARS@calm.dk".to_string(),
                "mia@forest.dk".to_string(),
            ],
            &campaign.subject,
            &campaign.template,
            50,
        )
        .await
        .unwrap();

    assert_eq!((stats.sent, stats.failed, stats.skipped), (1, 1, 1));

    let anna = book.get_contact("anna@zenyoga.dk").await.unwrap().unwrap();
    assert_eq!(anna.status, ContactStatus::Contacted);
    let lars = book.get_contact("lars@calm.dk").await.unwrap().unwrap();
    assert_eq!(lars.status, ContactStatus::New);

    let mut sends = book.list_sends("autumn_intro").await.unwrap();
    sends.sort_by(|a, b| a.contact_email.cmp(&b.contact_email));
    assert_eq!(sends.len(), 2);
    assert_eq!(sends[0].status, SendStatus::Sent);
    assert_eq!(sends[1].status, SendStatus::Failed);
}
