// ABOUTME: Application context shared by every elbitat command
// ABOUTME: Opens the record store once and builds services on top of it

use std::sync::Arc;

use elbitat_ai::AIService;
use elbitat_config::ServiceCredentials;
use elbitat_creative::{
    CopyGenerator, DraftAssembler, DraftService, ImageSelector, MarketingStrategist,
    OpenAICopyGenerator,
};
use elbitat_outreach::{CampaignRunner, ContactBook, EmailCopywriter, EmailFinder, SendGridMailer};
use elbitat_publishing::AutoPoster;
use elbitat_storage::{RecordStore, StorageFactory, StorageResult};
use tracing::debug;

use crate::config::Config;

pub struct AppContext {
    pub config: Config,
    pub credentials: ServiceCredentials,
    store: Arc<dyn RecordStore>,
}

impl AppContext {
    /// Open the configured store and read credentials
    pub async fn open(config: Config) -> StorageResult<Self> {
        let credentials = ServiceCredentials::from_env();
        Self::with_credentials(config, credentials).await
    }

    pub async fn with_credentials(
        config: Config,
        credentials: ServiceCredentials,
    ) -> StorageResult<Self> {
        let store = StorageFactory::create_store(config.storage_config()).await?;
        debug!(
            "Opened {} storage for workspace {:?}",
            config.storage_backend, config.workspace
        );
        Ok(Self {
            config,
            credentials,
            store,
        })
    }

    pub fn store(&self) -> Arc<dyn RecordStore> {
        Arc::clone(&self.store)
    }

    pub fn ai_service(&self) -> AIService {
        AIService::with_config(
            self.credentials.openai_api_key.clone(),
            self.config.openai_model.clone(),
            self.config.openai_base_url.clone(),
        )
    }

    /// Draft service; copy falls back to placeholders when OpenAI is not configured
    pub fn draft_service(&self) -> DraftService {
        let ai = self.ai_service();
        let assembler = if ai.is_configured() {
            let generator: Arc<dyn CopyGenerator> = Arc::new(OpenAICopyGenerator::new(ai));
            DraftAssembler::new(Some(generator))
        } else {
            DraftAssembler::placeholder_only()
        };
        DraftService::new(
            self.store(),
            assembler,
            ImageSelector::new(&self.config.media_library),
        )
    }

    pub fn auto_poster(&self) -> AutoPoster {
        AutoPoster::new(self.credentials.clone(), Some(self.store()))
    }

    pub fn strategist(&self) -> MarketingStrategist {
        MarketingStrategist::new(self.ai_service())
    }

    pub fn contact_book(&self) -> ContactBook {
        ContactBook::new(self.store())
    }

    pub fn email_finder(&self) -> EmailFinder {
        EmailFinder::new(self.credentials.serper_api_key.clone())
    }

    pub fn mailer(&self) -> SendGridMailer {
        SendGridMailer::new(
            self.credentials.sendgrid_api_key.clone(),
            self.credentials.sendgrid_from_email.clone(),
        )
    }

    pub fn campaign_runner(&self) -> CampaignRunner {
        CampaignRunner::new(self.contact_book(), self.mailer())
    }

    pub fn copywriter(&self) -> EmailCopywriter {
        EmailCopywriter::new(self.ai_service())
    }
}
