// ABOUTME: Draft orchestrator and lifecycle service over the record store
// ABOUTME: Generates drafts for stored requests, schedules, approves, edits and deletes them

use std::sync::Arc;

use chrono::{DateTime, Utc};
use elbitat_core::{
    draft_key, scheduled_key, slugify, validate_request, CampaignRequest, Draft, PlatformCopy,
    ScheduleStatus, ScheduledPost,
};
use elbitat_storage::{Collection, RecordStore, RecordStoreExt};
use tracing::{debug, error, info, warn};

use crate::assembler::DraftAssembler;
use crate::error::{CreativeError, Result};
use crate::media::ImageSelector;

/// Strip `.json` and `.draft` suffixes so every accepted spelling maps to one base name
fn base_name(name: &str) -> &str {
    let name = name.trim();
    let name = name.strip_suffix(".json").unwrap_or(name);
    let name = name.strip_suffix(".draft").unwrap_or(name);
    name.strip_suffix(".scheduled").unwrap_or(name)
}

pub struct DraftService {
    store: Arc<dyn RecordStore>,
    assembler: DraftAssembler,
    selector: ImageSelector,
}

impl DraftService {
    pub fn new(store: Arc<dyn RecordStore>, assembler: DraftAssembler, selector: ImageSelector) -> Self {
        Self {
            store,
            assembler,
            selector,
        }
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    // Requests

    /// Validate and store a request; returns its key
    pub async fn create_request(&self, request: &CampaignRequest) -> Result<String> {
        validate_request(request)?;
        let key = request.key();
        self.store
            .put_record(Collection::Requests, &key, request)
            .await?;
        info!("Saved request '{}' as {}", request.title, key);
        Ok(key)
    }

    pub async fn list_requests(&self) -> Result<Vec<CampaignRequest>> {
        let requests = self
            .store
            .list_records::<CampaignRequest>(Collection::Requests)
            .await?;
        Ok(requests.into_iter().map(|(_, r)| r).collect())
    }

    // Drafts

    /// Build and store the draft for one request
    pub async fn generate_draft(&self, request: &CampaignRequest) -> Result<Draft> {
        let copy_by_platform = self.assembler.assemble_copy(request).await;
        let selected_images = self.selector.select_for_request(request);

        let draft = Draft {
            request: request.clone(),
            copy_by_platform,
            selected_images,
        };
        self.save_draft(&draft).await?;
        Ok(draft)
    }

    /// One draft per stored request, overwriting existing drafts.
    /// A request that fails is logged and skipped.
    pub async fn generate_drafts_for_all_requests(&self) -> Result<Vec<Draft>> {
        let requests = self.list_requests().await?;
        info!("Generating drafts for {} request(s)", requests.len());

        let mut drafts = Vec::with_capacity(requests.len());
        for request in requests {
            match self.generate_draft(&request).await {
                Ok(draft) => drafts.push(draft),
                Err(e) => error!("Failed to generate draft for '{}': {}", request.title, e),
            }
        }
        Ok(drafts)
    }

    pub async fn save_draft(&self, draft: &Draft) -> Result<String> {
        let key = draft.key();
        self.store
            .put_record(Collection::Drafts, &key, draft)
            .await?;
        debug!("Saved draft {}", key);
        Ok(key)
    }

    pub async fn list_drafts(&self) -> Result<Vec<(String, Draft)>> {
        Ok(self.store.list_records::<Draft>(Collection::Drafts).await?)
    }

    /// Look up a draft by `<name>`, `<name>.draft`, `<name>.draft.json` or its title
    pub async fn find_draft(&self, name: &str) -> Result<(String, Draft)> {
        let base = base_name(name);
        let mut candidates = vec![draft_key(base)];
        let slug = slugify(base);
        if slug != base {
            candidates.push(draft_key(&slug));
        }

        for key in candidates {
            if let Some(draft) = self
                .store
                .get_record::<Draft>(Collection::Drafts, &key)
                .await?
            {
                return Ok((key, draft));
            }
        }
        Err(CreativeError::DraftNotFound(name.to_string()))
    }

    /// Regenerate copy with reviewer feedback appended to the brief.
    /// The stored request and the draft's request stay unchanged.
    pub async fn regenerate_copy(&self, name: &str, feedback: &str) -> Result<Draft> {
        if feedback.trim().is_empty() {
            return Err(CreativeError::InvalidInput(
                "Feedback is required to regenerate copy".to_string(),
            ));
        }

        let (_, mut draft) = self.find_draft(name).await?;
        let guided = draft.request.with_additional_instructions(feedback.trim());
        draft.copy_by_platform = self.assembler.assemble_copy(&guided).await;
        self.save_draft(&draft).await?;
        info!("Regenerated copy for '{}'", draft.request.title);
        Ok(draft)
    }

    pub async fn replace_images(&self, name: &str, images: Vec<String>) -> Result<Draft> {
        if images.is_empty() {
            return Err(CreativeError::InvalidInput(
                "Select at least one image".to_string(),
            ));
        }

        let (_, mut draft) = self.find_draft(name).await?;
        draft.selected_images = images;
        self.save_draft(&draft).await?;
        Ok(draft)
    }

    /// Replace the whole copy map after a manual edit
    pub async fn update_copy(&self, name: &str, copy: PlatformCopy) -> Result<Draft> {
        let (_, mut draft) = self.find_draft(name).await?;

        let mut expected = draft.request.platforms.clone();
        expected.sort();
        if copy.platforms() != expected {
            return Err(CreativeError::InvalidInput(format!(
                "Copy must cover exactly the requested platforms: {}",
                expected
                    .iter()
                    .map(|p| p.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )));
        }

        draft.copy_by_platform = copy;
        self.save_draft(&draft).await?;
        Ok(draft)
    }

    /// Delete a draft; returns whether it existed
    pub async fn delete_draft(&self, name: &str, confirmed: bool) -> Result<bool> {
        if !confirmed {
            return Err(CreativeError::NotConfirmed(name.to_string()));
        }

        let key = match self.find_draft(name).await {
            Ok((key, _)) => key,
            Err(CreativeError::DraftNotFound(_)) => return Ok(false),
            Err(e) => return Err(e),
        };
        let removed = self.store.delete(Collection::Drafts, &key).await?;
        info!("Deleted draft {}", key);
        Ok(removed)
    }

    // Scheduling

    pub async fn schedule_draft(
        &self,
        draft: &Draft,
        publish_at: Option<DateTime<Utc>>,
    ) -> Result<ScheduledPost> {
        let scheduled = ScheduledPost::scheduled(draft.clone(), publish_at);
        self.store
            .put_record(Collection::Scheduled, &scheduled.key(), &scheduled)
            .await?;
        info!("Scheduled '{}'", draft.request.title);
        Ok(scheduled)
    }

    /// Schedule every draft; failures are logged and skipped. Returns the number scheduled.
    pub async fn schedule_all(
        &self,
        drafts: &[Draft],
        publish_at: Option<DateTime<Utc>>,
    ) -> Result<usize> {
        let mut scheduled = 0;
        for draft in drafts {
            match self.schedule_draft(draft, publish_at).await {
                Ok(_) => scheduled += 1,
                Err(e) => warn!("Failed to schedule '{}': {}", draft.request.title, e),
            }
        }
        Ok(scheduled)
    }

    /// Approve a draft into a scheduled record. The draft record is kept.
    pub async fn approve_draft(&self, name: &str) -> Result<ScheduledPost> {
        let (_, draft) = self.find_draft(name).await?;
        let scheduled = ScheduledPost::approved(draft, Utc::now());
        self.store
            .put_record(Collection::Scheduled, &scheduled.key(), &scheduled)
            .await?;
        info!("Approved '{}'", scheduled.draft.request.title);
        Ok(scheduled)
    }

    pub async fn list_scheduled(&self) -> Result<Vec<(String, ScheduledPost)>> {
        Ok(self
            .store
            .list_records::<ScheduledPost>(Collection::Scheduled)
            .await?)
    }

    pub async fn mark_scheduled_posted(&self, name: &str) -> Result<ScheduledPost> {
        let key = scheduled_key(base_name(name));
        let mut scheduled = self
            .store
            .get_record::<ScheduledPost>(Collection::Scheduled, &key)
            .await?
            .ok_or_else(|| CreativeError::ScheduledNotFound(name.to_string()))?;

        scheduled.status = ScheduleStatus::Posted;
        self.store
            .put_record(Collection::Scheduled, &key, &scheduled)
            .await?;
        Ok(scheduled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_name_accepts_every_spelling() {
        assert_eq!(base_name("summer_special"), "summer_special");
        assert_eq!(base_name("summer_special.draft"), "summer_special");
        assert_eq!(base_name("summer_special.draft.json"), "summer_special");
        assert_eq!(base_name(" summer_special.scheduled.json "), "summer_special");
    }
}
