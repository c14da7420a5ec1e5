// ABOUTME: Contact book over the record store
// ABOUTME: Saves discovered contacts, campaigns and per-contact send records

use std::sync::Arc;

use chrono::Utc;
use elbitat_core::slugify;
use elbitat_storage::{Collection, RecordStore, RecordStoreExt};
use tracing::{debug, error, info};

use crate::error::{OutreachError, OutreachResult};
use crate::finder::validate_email;
use crate::types::{
    contact_key, ContactStatus, EmailCampaign, EmailContact, EmailSend, SaveStats, SendStatus,
};

#[derive(Clone)]
pub struct ContactBook {
    store: Arc<dyn RecordStore>,
}

impl ContactBook {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Store a new contact. Returns false when the email is already known.
    pub async fn save_contact(&self, contact: &EmailContact) -> OutreachResult<bool> {
        if !validate_email(contact.email.trim()) {
            return Err(OutreachError::InvalidEmail(contact.email.clone()));
        }

        let key = contact.key();
        if self.store.exists(Collection::Contacts, &key).await? {
            debug!("Contact {} already saved", key);
            return Ok(false);
        }

        let mut contact = contact.clone();
        contact.email = contact.email.trim().to_string();
        self.store
            .put_record(Collection::Contacts, &key, &contact)
            .await?;
        Ok(true)
    }

    /// Save many contacts, counting saved, skipped and failed ones
    pub async fn save_contacts(&self, contacts: &[EmailContact]) -> SaveStats {
        let mut stats = SaveStats::default();
        for contact in contacts {
            if contact.email.trim().is_empty() {
                debug!(
                    "Skipping contact with no email: {}",
                    contact.company_name.as_deref().unwrap_or("unknown")
                );
                stats.skipped += 1;
                continue;
            }

            match self.save_contact(contact).await {
                Ok(true) => stats.saved += 1,
                Ok(false) => stats.skipped += 1,
                Err(e) => {
                    error!("Error saving {}: {}", contact.email, e);
                    stats.errors += 1;
                }
            }
        }
        info!(
            "Contact save complete: {} saved, {} skipped, {} errors",
            stats.saved, stats.skipped, stats.errors
        );
        stats
    }

    pub async fn list_contacts(&self) -> OutreachResult<Vec<EmailContact>> {
        let contacts = self
            .store
            .list_records::<EmailContact>(Collection::Contacts)
            .await?;
        Ok(contacts.into_iter().map(|(_, c)| c).collect())
    }

    pub async fn get_contact(&self, email: &str) -> OutreachResult<Option<EmailContact>> {
        Ok(self
            .store
            .get_record(Collection::Contacts, &contact_key(email))
            .await?)
    }

    pub async fn update_status(&self, email: &str, status: ContactStatus) -> OutreachResult<()> {
        let key = contact_key(email);
        if let Some(mut contact) = self
            .store
            .get_record::<EmailContact>(Collection::Contacts, &key)
            .await?
        {
            contact.status = status;
            self.store
                .put_record(Collection::Contacts, &key, &contact)
                .await?;
        }
        Ok(())
    }

    pub async fn create_campaign(
        &self,
        name: &str,
        subject: &str,
        template: &str,
    ) -> OutreachResult<EmailCampaign> {
        let campaign = EmailCampaign {
            id: slugify(name),
            name: name.to_string(),
            subject: subject.to_string(),
            template: template.to_string(),
            created_at: Utc::now(),
        };
        self.store
            .put_record(Collection::EmailCampaigns, &campaign.id, &campaign)
            .await?;
        Ok(campaign)
    }

    pub async fn get_campaign(&self, id: &str) -> OutreachResult<EmailCampaign> {
        self.store
            .get_record(Collection::EmailCampaigns, id)
            .await?
            .ok_or_else(|| OutreachError::CampaignNotFound(id.to_string()))
    }

    pub async fn record_send(
        &self,
        campaign_id: &str,
        contact_email: &str,
        status: SendStatus,
        message_id: Option<String>,
    ) -> OutreachResult<EmailSend> {
        let send = EmailSend {
            campaign_id: campaign_id.to_string(),
            contact_email: contact_email.to_string(),
            status,
            message_id,
            sent_at: Utc::now(),
        };
        self.store
            .put_record(Collection::EmailSends, &send.key(), &send)
            .await?;
        Ok(send)
    }

    pub async fn list_sends(&self, campaign_id: &str) -> OutreachResult<Vec<EmailSend>> {
        let sends = self
            .store
            .list_records::<EmailSend>(Collection::EmailSends)
            .await?;
        Ok(sends
            .into_iter()
            .map(|(_, s)| s)
            .filter(|s| s.campaign_id == campaign_id)
            .collect())
    }
}
