use std::sync::Arc;

use tracing::{info, info_span, Instrument};

use ap_core::ports::{GenerationError, GenerativePort};
use ap_core::research::SearchResult;

/// One grounded research query. The result always carries the query as
/// typed, which is what history deduplication keys on.
pub struct ResearchTopic {
    generative: Arc<dyn GenerativePort>,
}

impl ResearchTopic {
    pub fn new(generative: Arc<dyn GenerativePort>) -> Self {
        Self { generative }
    }

    pub async fn execute(&self, query: &str) -> Result<SearchResult, GenerationError> {
        async {
            let mut result = self.generative.research(query).await?;
            result.query = query.to_string();
            info!(sources = result.sources.len(), "research finished");
            Ok(result)
        }
        .instrument(info_span!("usecase.research.execute", query))
        .await
    }
}
