//! A wizard paired with the cache that keeps it across restarts.
//!
//! Cache trouble is never allowed to block the user: read and write failures
//! are logged and the wizard carries on from memory.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::cache::{FORM_DATA_KEY, FormCache};
use crate::coerce::RawInput;
use crate::models::Transition;
use crate::report::ReportSnapshot;
use crate::wizard::{FormState, StepOutcome, Wizard, WizardError};

pub struct WizardSession {
    wizard: Wizard,
    cache: Arc<dyn FormCache>,
}

impl WizardSession {
    /// Restores the stored form, or starts a fresh one.
    ///
    /// A payload that no longer parses is discarded.
    pub async fn mount(cache: Arc<dyn FormCache>) -> Self {
        let wizard = match cache.get(FORM_DATA_KEY).await {
            Ok(Some(payload)) => match serde_json::from_str::<FormState>(&payload) {
                Ok(state) => {
                    info!(step = %state.step, version = state.version, "restored saved estimation");
                    Wizard::from_state(state)
                }
                Err(e) => {
                    warn!("discarding unreadable saved estimation: {}", e);
                    if let Err(e) = cache.clear(FORM_DATA_KEY).await {
                        warn!("failed to clear saved estimation: {}", e);
                    }
                    Wizard::new()
                }
            },
            Ok(None) => {
                debug!("no saved estimation");
                Wizard::new()
            }
            Err(e) => {
                warn!("failed to read saved estimation: {}", e);
                Wizard::new()
            }
        };

        Self { wizard, cache }
    }

    pub fn wizard(&self) -> &Wizard {
        &self.wizard
    }

    /// Submits the current step and saves the result.
    pub async fn submit<I, K, V>(
        &mut self,
        inputs: I,
    ) -> Result<StepOutcome, WizardError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<RawInput>,
    {
        let outcome = self.wizard.submit(inputs)?;
        self.persist().await;
        Ok(outcome)
    }

    pub async fn back(&mut self) -> Transition {
        let transition = self.wizard.back();
        self.persist().await;
        transition
    }

    /// Starts over and forgets the saved form.
    pub async fn reset(&mut self) {
        self.wizard.reset();
        self.forget().await;
    }

    /// Hands the finished estimation to the report layer and forgets the
    /// saved form.
    ///
    /// # Errors
    /// [`WizardError::Incomplete`] unless the thank-you step was reached. The
    /// saved form is kept in that case.
    pub async fn finish(&mut self) -> Result<ReportSnapshot, WizardError> {
        let snapshot = self.wizard.report_snapshot()?;
        self.forget().await;
        Ok(snapshot)
    }

    async fn persist(&self) {
        let state = self.wizard.snapshot();
        let payload = match serde_json::to_string(&*state) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("failed to serialize estimation: {}", e);
                return;
            }
        };

        match self.cache.set(FORM_DATA_KEY, &payload).await {
            Ok(()) => debug!(version = state.version, "estimation saved"),
            Err(e) => warn!("failed to save estimation: {}", e),
        }
    }

    async fn forget(&self) {
        if let Err(e) = self.cache.clear(FORM_DATA_KEY).await {
            warn!("failed to clear saved estimation: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::cache::{CacheError, MemoryCache};
    use crate::models::{Step, keys};

    /// A cache where every call fails.
    struct BrokenCache;

    #[async_trait]
    impl FormCache for BrokenCache {
        async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
            Err(CacheError::Connection("offline".to_string()))
        }

        async fn set(&self, _key: &str, _payload: &str) -> Result<(), CacheError> {
            Err(CacheError::Storage("disk full".to_string()))
        }

        async fn clear(&self, _key: &str) -> Result<(), CacheError> {
            Err(CacheError::Storage("disk full".to_string()))
        }
    }

    async fn design_project(session: &mut WizardSession) {
        session.submit([(keys::CLIENT_TYPE, "individual")]).await.unwrap();
        session.submit([(keys::PROJECT_TYPE, "design")]).await.unwrap();
        session
            .submit([
                (keys::CONTACT_NAME, "Camille Martin"),
                (keys::CONTACT_EMAIL, "camille@example.fr"),
            ])
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn mount_with_empty_cache_starts_fresh() {
        let session = WizardSession::mount(Arc::new(MemoryCache::new())).await;

        assert_eq!(session.wizard().step(), Step::ClientType);
    }

    #[tokio::test]
    async fn submit_persists_and_mount_restores() {
        let cache = Arc::new(MemoryCache::new());
        let mut session = WizardSession::mount(cache.clone()).await;
        session.submit([(keys::CLIENT_TYPE, "individual")]).await.unwrap();
        session.submit([(keys::PROJECT_TYPE, "renovation")]).await.unwrap();

        let restored = WizardSession::mount(cache).await;

        assert_eq!(restored.wizard().step(), Step::EstimationType);
        assert_eq!(restored.wizard().version(), 2);
        assert_eq!(
            restored.wizard().answers().text(keys::PROJECT_TYPE),
            Some("renovation")
        );
    }

    #[tokio::test]
    async fn back_persists_the_new_step() {
        let cache = Arc::new(MemoryCache::new());
        let mut session = WizardSession::mount(cache.clone()).await;
        session.submit([(keys::CLIENT_TYPE, "individual")]).await.unwrap();

        session.back().await;

        let restored = WizardSession::mount(cache).await;
        assert_eq!(restored.wizard().step(), Step::ClientType);
    }

    #[tokio::test]
    async fn refused_submit_is_not_persisted() {
        let cache = Arc::new(MemoryCache::new());
        let mut session = WizardSession::mount(cache.clone()).await;

        let result = session.submit([(keys::CLIENT_TYPE, "")]).await;

        assert!(matches!(result, Err(WizardError::Validation(_))));
        assert_eq!(cache.get(FORM_DATA_KEY).await, Ok(None));
    }

    #[tokio::test]
    async fn corrupt_payload_is_discarded() {
        let cache = Arc::new(MemoryCache::new());
        cache.set(FORM_DATA_KEY, "{not json").await.unwrap();

        let session = WizardSession::mount(cache.clone()).await;

        assert_eq!(session.wizard().step(), Step::ClientType);
        assert_eq!(cache.get(FORM_DATA_KEY).await, Ok(None));
    }

    #[tokio::test]
    async fn out_of_range_step_is_clamped_on_restore() {
        let cache = Arc::new(MemoryCache::new());
        cache
            .set(FORM_DATA_KEY, r#"{"version":4,"step":99,"answers":{}}"#)
            .await
            .unwrap();

        let session = WizardSession::mount(cache).await;

        assert_eq!(session.wizard().step(), Step::ThankYou);
        assert_eq!(session.wizard().running_total(), dec!(0));
    }

    #[tokio::test]
    async fn reset_clears_the_cache() {
        let cache = Arc::new(MemoryCache::new());
        let mut session = WizardSession::mount(cache.clone()).await;
        session.submit([(keys::CLIENT_TYPE, "individual")]).await.unwrap();

        session.reset().await;

        assert_eq!(session.wizard().step(), Step::ClientType);
        assert_eq!(cache.get(FORM_DATA_KEY).await, Ok(None));
    }

    #[tokio::test]
    async fn finish_hands_off_and_clears() {
        let cache = Arc::new(MemoryCache::new());
        let mut session = WizardSession::mount(cache.clone()).await;
        design_project(&mut session).await;

        let snapshot = session.finish().await.unwrap();

        assert_eq!(
            snapshot.answers.text(keys::CONTACT_NAME),
            Some("Camille Martin")
        );
        assert_eq!(cache.get(FORM_DATA_KEY).await, Ok(None));
    }

    #[tokio::test]
    async fn finish_before_thank_you_keeps_the_cache() {
        let cache = Arc::new(MemoryCache::new());
        let mut session = WizardSession::mount(cache.clone()).await;
        session.submit([(keys::CLIENT_TYPE, "individual")]).await.unwrap();

        let result = session.finish().await;

        assert!(matches!(result, Err(WizardError::Incomplete { .. })));
        assert!(cache.get(FORM_DATA_KEY).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn broken_cache_never_blocks_navigation() {
        let mut session = WizardSession::mount(Arc::new(BrokenCache)).await;

        design_project(&mut session).await;
        session.back().await;
        session.reset().await;

        assert_eq!(session.wizard().step(), Step::ClientType);
    }
}
