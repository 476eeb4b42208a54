use std::sync::Arc;

use pagesum_core::text::{
    collapse_whitespace, contains_han, has_enough_content, strip_think_blocks,
    summary_user_content, translation_user_content, truncate_chars, MAX_PAGE_CHARS,
    SUMMARISER_SYSTEM, SUMMARY_MAX_TOKENS, TRANSLATION_MAX_TOKENS, TRANSLATOR_SYSTEM,
};
use pagesum_core::{JobRequest, JobStatusKind, StatusUpdate};
use pagesum_logging::{pagesum_debug, pagesum_error, pagesum_info, pagesum_warn};

use crate::adapter::{adapter_for, CompletionCall};
use crate::client::CompletionClient;
use crate::extract::PageExtractor;
use crate::notify::{Notification, Notifier};
use crate::store::{read_status, write_status, KeyValueStore, StoreError};
use crate::{JobError, JobOutcome};

pub const INTERRUPTED_MESSAGE: &str = "Previous summary was interrupted";

/// Runs one job from extraction to notification. The status record is the
/// only output other contexts see.
pub struct Orchestrator {
    store: Arc<dyn KeyValueStore>,
    extractor: Arc<dyn PageExtractor>,
    client: Arc<dyn CompletionClient>,
    notifier: Arc<dyn Notifier>,
}

impl Orchestrator {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        extractor: Arc<dyn PageExtractor>,
        client: Arc<dyn CompletionClient>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            store,
            extractor,
            client,
            notifier,
        }
    }

    /// Settles a record left in progress by a worker that no longer runs.
    /// Returns whether the record was rewritten.
    pub fn recover_interrupted(&self) -> Result<bool, StoreError> {
        let current = read_status(self.store.as_ref());
        if !current.status.is_in_progress() {
            return Ok(false);
        }
        pagesum_warn!("Found orphaned job at {}, marking it failed", current.status);
        write_status(self.store.as_ref(), StatusUpdate::failed(INTERRUPTED_MESSAGE))?;
        Ok(true)
    }

    pub async fn run(&self, job: &JobRequest) -> JobOutcome {
        pagesum_info!("Job started: {}", job);
        let outcome = match self.execute(job).await {
            Ok(outcome) => outcome,
            Err(err) => {
                pagesum_error!("Summarise error: {}", err);
                if let Err(store_err) = write_status(
                    self.store.as_ref(),
                    StatusUpdate::failed(err.to_string()),
                ) {
                    pagesum_error!("Could not record job failure: {}", store_err);
                }
                JobOutcome::Failed(err)
            }
        };

        let notification = match &outcome {
            JobOutcome::Completed { .. } => Notification::summary_ready(),
            JobOutcome::Failed(err) => Notification::summary_failed(&err.to_string()),
        };
        self.notifier.notify(notification);
        pagesum_info!("Job finished: {:?}", outcome);
        outcome
    }

    async fn execute(&self, job: &JobRequest) -> Result<JobOutcome, JobError> {
        self.write(StatusUpdate::job_started())?;

        let raw = self.extractor.extract_text(&job.tab_id).await.map_err(|err| {
            pagesum_warn!("Extraction failed for {}: {}", job.tab_id, err);
            JobError::Extraction
        })?;
        let collapsed = collapse_whitespace(&raw);
        if !has_enough_content(&collapsed) {
            pagesum_warn!(
                "Page {} has only {} chars of text",
                job.tab_id,
                collapsed.chars().count()
            );
            return Err(JobError::Extraction);
        }
        let page = truncate_chars(&collapsed, MAX_PAGE_CHARS);

        self.write(StatusUpdate::status(JobStatusKind::Summarising))?;
        let summary = self
            .complete(
                job,
                SUMMARISER_SYSTEM,
                summary_user_content(&job.prompt, page),
                SUMMARY_MAX_TOKENS,
            )
            .await?
            .ok_or(JobError::EmptyResponse)?;

        let needs_translation = job.translate && !contains_han(&summary);
        pagesum_debug!(
            "Summary ready ({} chars), translation needed: {}",
            summary.chars().count(),
            needs_translation
        );
        if !needs_translation {
            self.write(
                StatusUpdate::status(JobStatusKind::Done)
                    .with_summary(summary)
                    .with_translation(""),
            )?;
            return Ok(JobOutcome::Completed {
                translated: false,
                translation_error: None,
            });
        }

        self.write(
            StatusUpdate::status(JobStatusKind::Translating)
                .with_summary(summary.as_str())
                .with_translation(""),
        )?;

        let translated = self
            .complete(
                job,
                TRANSLATOR_SYSTEM,
                translation_user_content(&summary),
                TRANSLATION_MAX_TOKENS,
            )
            .await;
        let reason = match translated {
            Ok(Some(translation)) => {
                self.write(StatusUpdate::status(JobStatusKind::Done).with_translation(translation))?;
                return Ok(JobOutcome::Completed {
                    translated: true,
                    translation_error: None,
                });
            }
            Ok(None) => "No translation returned".to_string(),
            Err(err) => err.to_string(),
        };

        let message = format!("Translation failed: {reason}");
        pagesum_warn!("{}", message);
        self.write(
            StatusUpdate::status(JobStatusKind::Done)
                .with_translation("")
                .with_error(message.as_str()),
        )?;
        Ok(JobOutcome::Completed {
            translated: false,
            translation_error: Some(message),
        })
    }

    /// One provider call; `Ok(None)` when the answer carries no usable text.
    async fn complete(
        &self,
        job: &JobRequest,
        system_instruction: &str,
        user_content: String,
        max_tokens: u32,
    ) -> Result<Option<String>, JobError> {
        let adapter = adapter_for(job.provider);
        let request = adapter.build_request(&CompletionCall {
            base_url: job.base_url.clone(),
            model: job.model.clone(),
            api_key: job.api_key.clone(),
            system_instruction: system_instruction.to_string(),
            user_content,
            max_tokens,
        });
        let body = self.client.send(request).await?;
        Ok(adapter
            .extract_response_text(&body)
            .map(|text| strip_think_blocks(&text))
            .filter(|text| !text.is_empty()))
    }

    fn write(&self, update: StatusUpdate) -> Result<(), JobError> {
        write_status(self.store.as_ref(), update).map_err(|err| JobError::Store(err.to_string()))
    }
}
