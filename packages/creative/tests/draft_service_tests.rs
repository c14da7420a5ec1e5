// ABOUTME: End-to-end draft lifecycle tests over a JSON file store
// ABOUTME: Request to draft to approval, with edits, regeneration and deletion

use std::fs;
use std::sync::Arc;

use async_trait::async_trait;
use elbitat_core::{CampaignRequest, InstagramCopy, Platform, PlatformCopy, ScheduleStatus};
use elbitat_creative::{
    CopyGenerator, CreativeError, DraftAssembler, DraftService, ImageSelector, Result,
};
use elbitat_storage::{Collection, JsonFileStore, RecordStore, RecordStoreExt};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

struct Harness {
    _dir: TempDir,
    service: DraftService,
}

fn media_library(root: &std::path::Path) -> std::path::PathBuf {
    let library = root.join("media");
    for (folder, n) in [("Sunset", 5), ("Elbitat", 5)] {
        fs::create_dir_all(library.join(folder)).unwrap();
        for i in 0..n {
            fs::write(library.join(folder).join(format!("photo{}.jpg", i)), b"jpeg").unwrap();
        }
    }
    library
}

async fn harness(assembler: DraftAssembler) -> Harness {
    let dir = TempDir::new().unwrap();
    let store = JsonFileStore::new(dir.path().join("records"));
    store.initialize().await.unwrap();
    let library = media_library(dir.path());
    let service = DraftService::new(Arc::new(store), assembler, ImageSelector::new(library));
    Harness { _dir: dir, service }
}

fn summer_special() -> CampaignRequest {
    CampaignRequest::new(
        "Summer Special",
        "Relaxing sunset views and spa",
        vec![Platform::Instagram, Platform::Facebook],
    )
}

/// Echoes the brief so tests can see what the generator was asked
struct EchoGenerator;

#[async_trait]
impl CopyGenerator for EchoGenerator {
    async fn generate_copy(&self, request: &CampaignRequest) -> Result<String> {
        Ok(serde_json::json!({
            "instagram": { "caption": request.brief, "hashtags": "#Elbitat #Elba" },
            "facebook": { "message": request.brief }
        })
        .to_string())
    }
}

#[tokio::test]
async fn test_placeholder_draft_for_stored_request() {
    let h = harness(DraftAssembler::placeholder_only()).await;
    h.service.create_request(&summer_special()).await.unwrap();

    let drafts = h.service.generate_drafts_for_all_requests().await.unwrap();

    assert_eq!(drafts.len(), 1);
    let draft = &drafts[0];
    assert_eq!(draft.key(), "summer_special.draft");
    assert_eq!(
        draft.copy_by_platform.platforms(),
        vec![Platform::Instagram, Platform::Facebook]
    );
    let caption = &draft.copy_by_platform.instagram.as_ref().unwrap().caption;
    assert!(caption.starts_with("[PLACEHOLDER IG] Summer Special"));
    assert_eq!(draft.selected_images.len(), 4);
    let sunset = draft
        .selected_images
        .iter()
        .filter(|p| p.contains("Sunset"))
        .count();
    assert_eq!(sunset, 3);

    let (key, stored) = h.service.find_draft("Summer Special").await.unwrap();
    assert_eq!(key, "summer_special.draft");
    assert_eq!(&stored, draft);
}

#[tokio::test]
async fn test_same_title_overwrites_draft() {
    let h = harness(DraftAssembler::placeholder_only()).await;
    let mut request = summer_special();
    h.service.generate_draft(&request).await.unwrap();
    request.brief = "Yoga mornings on the terrace".to_string();
    h.service.generate_draft(&request).await.unwrap();

    let drafts = h.service.list_drafts().await.unwrap();
    assert_eq!(drafts.len(), 1);
    assert_eq!(drafts[0].1.request.brief, "Yoga mornings on the terrace");
}

#[tokio::test]
async fn test_find_draft_accepts_name_variants() {
    let h = harness(DraftAssembler::placeholder_only()).await;
    h.service.generate_draft(&summer_special()).await.unwrap();

    for name in ["summer_special", "summer_special.draft", "summer_special.draft.json"] {
        let (key, _) = h.service.find_draft(name).await.unwrap();
        assert_eq!(key, "summer_special.draft");
    }
    assert!(matches!(
        h.service.find_draft("winter").await,
        Err(CreativeError::DraftNotFound(_))
    ));
}

#[tokio::test]
async fn test_approve_keeps_draft_and_creates_scheduled_record() {
    let h = harness(DraftAssembler::placeholder_only()).await;
    h.service.generate_draft(&summer_special()).await.unwrap();

    let scheduled = h.service.approve_draft("summer_special").await.unwrap();

    assert!(scheduled.approved);
    assert!(scheduled.approved_at.is_some());
    assert_eq!(scheduled.status, ScheduleStatus::Pending);
    assert!(h.service.find_draft("summer_special").await.is_ok());
    let listed = h.service.list_scheduled().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].0, "summer_special.scheduled");

    let posted = h.service.mark_scheduled_posted("summer_special").await.unwrap();
    assert_eq!(posted.status, ScheduleStatus::Posted);
}

#[tokio::test]
async fn test_regenerate_leaves_stored_request_unchanged() {
    let h = harness(DraftAssembler::new(Some(Arc::new(EchoGenerator)))).await;
    let request = summer_special();
    h.service.create_request(&request).await.unwrap();
    h.service.generate_draft(&request).await.unwrap();

    let draft = h
        .service
        .regenerate_copy("summer_special", "Mention the infinity pool")
        .await
        .unwrap();

    let caption = &draft.copy_by_platform.instagram.as_ref().unwrap().caption;
    assert!(caption.contains("ADDITIONAL INSTRUCTIONS: Mention the infinity pool"));
    assert_eq!(draft.request.brief, "Relaxing sunset views and spa");

    let stored: CampaignRequest = h
        .service
        .store()
        .get_record(Collection::Requests, "summer_special")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored, request);

    assert!(matches!(
        h.service.regenerate_copy("summer_special", "  ").await,
        Err(CreativeError::InvalidInput(_))
    ));
}

#[tokio::test]
async fn test_update_copy_requires_matching_platforms() {
    let h = harness(DraftAssembler::placeholder_only()).await;
    h.service.generate_draft(&summer_special()).await.unwrap();

    let copy = PlatformCopy {
        instagram: Some(InstagramCopy {
            caption: "Only Instagram".to_string(),
            hashtags: "#Elbitat".to_string(),
        }),
        ..PlatformCopy::default()
    };
    let result = h.service.update_copy("summer_special", copy).await;
    assert!(matches!(result, Err(CreativeError::InvalidInput(_))));
}

#[tokio::test]
async fn test_delete_requires_confirmation() {
    let h = harness(DraftAssembler::placeholder_only()).await;
    h.service.generate_draft(&summer_special()).await.unwrap();

    assert!(matches!(
        h.service.delete_draft("summer_special", false).await,
        Err(CreativeError::NotConfirmed(_))
    ));
    assert!(h.service.find_draft("summer_special").await.is_ok());

    assert!(h.service.delete_draft("summer_special", true).await.unwrap());
    assert!(!h.service.delete_draft("summer_special", true).await.unwrap());
}

#[tokio::test]
async fn test_invalid_request_is_rejected() {
    let h = harness(DraftAssembler::placeholder_only()).await;
    let request = CampaignRequest::new("No platforms", "Brief", vec![]);

    assert!(matches!(
        h.service.create_request(&request).await,
        Err(CreativeError::Validation(_))
    ));
    assert!(h.service.list_requests().await.unwrap().is_empty());
}
