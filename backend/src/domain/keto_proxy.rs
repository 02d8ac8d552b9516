//! Pass-through access to the third-party keto recipes API.

use std::sync::Arc;

use serde_json::{Value, json};
use tracing::warn;

use super::Error;
use super::ports::{KetoCategoryId, KetoRecipeSource, KetoSourceError};

fn map_source_error(err: KetoSourceError) -> Error {
    warn!(error = %err, "keto upstream call failed");
    match err {
        KetoSourceError::Status { status, body } => Error::upstream_unavailable("keto API error")
            .with_details(json!({ "status": status, "body": body })),
        KetoSourceError::Transport { message }
        | KetoSourceError::Timeout { message }
        | KetoSourceError::Decode { message } => {
            Error::upstream_unavailable("failed to contact keto API")
                .with_details(json!({ "error": message }))
        }
    }
}

/// Proxies keto reads and folds every failure into `upstream_unavailable`.
#[derive(Clone)]
pub struct KetoProxy {
    source: Arc<dyn KetoRecipeSource>,
}

impl KetoProxy {
    pub fn new(source: Arc<dyn KetoRecipeSource>) -> Self {
        Self { source }
    }

    pub async fn categories(&self) -> Result<Value, Error> {
        self.source.list_categories().await.map_err(map_source_error)
    }

    pub async fn recipes(&self, category: KetoCategoryId) -> Result<Value, Error> {
        self.source.list_recipes(category).await.map_err(map_source_error)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockKetoRecipeSource;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn payloads_pass_through() {
        let mut source = MockKetoRecipeSource::new();
        source
            .expect_list_recipes()
            .withf(|category| category.get() == 3)
            .returning(|_| Ok(json!([{"recipe": "Keto Bread"}])));
        let category = KetoCategoryId::new(3).expect("positive id");

        let payload = KetoProxy::new(Arc::new(source))
            .recipes(category)
            .await
            .expect("upstream answered");
        assert_eq!(payload, json!([{"recipe": "Keto Bread"}]));
    }

    #[rstest]
    #[case(KetoSourceError::status(500_u16, "boom"), "keto API error", json!({"status": 500, "body": "boom"}))]
    #[case(KetoSourceError::timeout("15s elapsed"), "failed to contact keto API", json!({"error": "15s elapsed"}))]
    #[case(KetoSourceError::transport("refused"), "failed to contact keto API", json!({"error": "refused"}))]
    #[tokio::test]
    async fn failures_become_upstream_unavailable(
        #[case] failure: KetoSourceError,
        #[case] message: &str,
        #[case] details: Value,
    ) {
        let mut source = MockKetoRecipeSource::new();
        source
            .expect_list_categories()
            .returning(move || Err(failure.clone()));

        let error = KetoProxy::new(Arc::new(source))
            .categories()
            .await
            .expect_err("upstream failure");
        assert_eq!(error.code(), ErrorCode::UpstreamUnavailable);
        assert_eq!(error.message(), message);
        assert_eq!(error.details(), Some(&details));
    }

    #[rstest]
    fn category_ids_start_at_one() {
        assert!(KetoCategoryId::new(0).is_none());
        assert_eq!(KetoCategoryId::new(1).map(KetoCategoryId::get), Some(1));
    }
}
