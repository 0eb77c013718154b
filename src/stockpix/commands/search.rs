use crate::aggregator::Aggregator;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, StockError};
use crate::model::PhotoSource;

/// Aggregated search, or a single-photo lookup when the query is a photo URL.
pub async fn run(
    aggregator: &Aggregator,
    query: &str,
    only: Option<PhotoSource>,
) -> Result<CmdResult> {
    let outcome = match only {
        Some(source) if crate::url_detect::detect(query).is_none() => {
            aggregator.search_text(query.trim(), Some(source)).await
        }
        _ => aggregator.search(query).await,
    };

    let search = match outcome {
        Ok(search) => search,
        Err(e) => return user_error(e),
    };

    let mut result = CmdResult::default();
    for failure in &search.failures {
        result.add_message(CmdMessage::warning(format!(
            "{} is unavailable: {}",
            failure.source, failure.message
        )));
    }
    if search.is_empty() && search.failures.is_empty() {
        result.add_message(CmdMessage::info(format!(
            "No photos found for \"{}\"",
            search.query
        )));
    }
    Ok(result.with_search(search))
}

/// Errors a user can fix become messages; the rest propagate.
pub(crate) fn user_error(error: StockError) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    match error {
        StockError::MissingApiKey(source) => result.add_message(CmdMessage::error(format!(
            "No API key configured for {}. Run `stockpix config {}-key <KEY>` or set {}",
            source,
            source.name(),
            source.key_env_var()
        ))),
        e @ (StockError::Configuration(_)
        | StockError::NotFound { .. }
        | StockError::Provider { .. }
        | StockError::Download { .. }
        | StockError::Write { .. }
        | StockError::Http { .. }
        | StockError::Api(_)) => result.add_message(CmdMessage::error(e.to_string())),
        other => return Err(other),
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::testing::StubProvider;
    use crate::commands::MessageLevel;
    use crate::providers::PhotoProvider;
    use std::sync::Arc;

    fn aggregator(stubs: Vec<StubProvider>) -> Aggregator {
        Aggregator::new(
            stubs
                .into_iter()
                .map(|s| Arc::new(s) as Arc<dyn PhotoProvider>)
                .collect(),
        )
    }

    #[tokio::test]
    async fn no_keys_gives_empty_result_and_error_message() {
        let agg = aggregator(vec![StubProvider::unconfigured(PhotoSource::Pexels)]);

        let result = run(&agg, "lake", None).await.unwrap();

        assert!(result.search.is_none());
        assert_eq!(result.messages.len(), 1);
        assert_eq!(result.messages[0].level, MessageLevel::Error);
        assert!(result.messages[0].content.contains("No API keys configured"));
    }

    #[tokio::test]
    async fn provider_failures_become_warnings() {
        let agg = aggregator(vec![
            StubProvider::ok(PhotoSource::Unsplash),
            StubProvider::failing(PhotoSource::Pixabay),
        ]);

        let result = run(&agg, "lake", None).await.unwrap();

        assert_eq!(result.search.unwrap().total_photos(), 2);
        assert_eq!(result.messages[0].level, MessageLevel::Warning);
        assert!(result.messages[0].content.starts_with("Pixabay is unavailable"));
    }

    #[tokio::test]
    async fn url_miss_is_reported_as_not_found() {
        let agg = aggregator(vec![StubProvider::ok(PhotoSource::Pixabay)]);

        let result = run(&agg, "https://pixabay.com/photos/sunset-404/", None)
            .await
            .unwrap();

        assert!(result.has_errors());
        assert!(result.messages[0].content.contains("was not found"));
    }

    #[tokio::test]
    async fn provider_filter_with_missing_key_names_the_provider() {
        let agg = aggregator(vec![StubProvider::ok(PhotoSource::Pexels)]);

        let result = run(&agg, "lake", Some(PhotoSource::Unsplash)).await.unwrap();

        assert!(result.messages[0].content.contains("UNSPLASH_ACCESS_KEY"));
    }
}
