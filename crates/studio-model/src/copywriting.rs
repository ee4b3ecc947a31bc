//! Marketing copy generation.
//!
//! The generator itself is an external service behind [`CopyGenerator`];
//! this module only defines the contract and how results land in a session.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use vantage_common::error::{VantageError, VantageResult};

use crate::session::EditorSession;

/// One generated title/subtitle pair.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GeneratedCopy {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
}

impl GeneratedCopy {
    pub fn new(title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: subtitle.into(),
        }
    }
}

/// Produces marketing copy from a free-text app description.
#[async_trait]
pub trait CopyGenerator: Send + Sync {
    /// Generate up to `count` entries, in screen order.
    async fn generate(&self, description: &str, count: usize) -> VantageResult<Vec<GeneratedCopy>>;
}

/// Parse a generator's JSON reply: an array of `{title, subtitle}` objects.
pub fn parse_generated_copy(body: &str) -> VantageResult<Vec<GeneratedCopy>> {
    serde_json::from_str(body)
        .map_err(|e| VantageError::external_service(format!("malformed copy response: {e}")))
}

/// Ask `generator` for copy and apply it to `session`.
///
/// An empty description is rejected before the generator is called. If the
/// generator fails the session is left untouched.
pub async fn regenerate_copy(
    session: &mut EditorSession,
    generator: &dyn CopyGenerator,
    description: &str,
) -> VantageResult<usize> {
    let description = description.trim();
    if description.is_empty() {
        return Err(VantageError::config("app description is empty"));
    }

    let count = session.screen_count();
    let copy = generator.generate(description, count).await.map_err(|e| {
        tracing::warn!(error = %e, "Copy generation failed");
        e
    })?;

    let touched = session.apply_generated_copy(&copy);
    tracing::info!(requested = count, received = copy.len(), touched, "Copy applied");
    Ok(touched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedGenerator {
        reply: VantageResult<Vec<GeneratedCopy>>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CopyGenerator for FixedGenerator {
        async fn generate(&self, _: &str, _: usize) -> VantageResult<Vec<GeneratedCopy>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.reply {
                Ok(copy) => Ok(copy.clone()),
                Err(_) => Err(VantageError::external_service("503")),
            }
        }
    }

    #[tokio::test]
    async fn test_empty_description_not_sent() {
        let generator = FixedGenerator {
            reply: Ok(vec![]),
            calls: AtomicUsize::new(0),
        };
        let mut session = EditorSession::new();
        let err = regenerate_copy(&mut session, &generator, "   ")
            .await
            .unwrap_err();
        assert!(matches!(err, VantageError::Config { .. }));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failure_leaves_session_unchanged() {
        let generator = FixedGenerator {
            reply: Err(VantageError::external_service("down")),
            calls: AtomicUsize::new(0),
        };
        let mut session = EditorSession::new();
        let before = session.snapshot();
        let err = regenerate_copy(&mut session, &generator, "A budgeting app")
            .await
            .unwrap_err();
        assert!(err.is_recoverable());
        assert_eq!(session.snapshot(), before);
    }

    #[tokio::test]
    async fn test_success_applies_copy() {
        let generator = FixedGenerator {
            reply: Ok(vec![
                GeneratedCopy::new("Track spending", "Every cent, at a glance"),
                GeneratedCopy::new("Goals", ""),
            ]),
            calls: AtomicUsize::new(0),
        };
        let mut session = EditorSession::new();
        let touched = regenerate_copy(&mut session, &generator, "A budgeting app")
            .await
            .unwrap();
        assert_eq!(touched, 2);
        assert_eq!(session.records()[0].title, "Track spending");
        assert_eq!(session.records()[1].title, "Goals");
    }

    #[test]
    fn test_parse_reply() {
        let copy =
            parse_generated_copy(r#"[{"title":"A","subtitle":"B"},{"title":"C"}]"#).unwrap();
        assert_eq!(copy[1], GeneratedCopy::new("C", ""));
        assert!(parse_generated_copy("not json").is_err());
    }
}
