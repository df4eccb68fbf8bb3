//! Identifier enumeration over an open scroll cursor.

use serde_json::{Value, json};
use sift_core::{Error, Result};

use crate::engine::{ScrollRequest, SearchRequest};
use crate::response::SearchResponse;
use crate::store::SearchStore;

/// Body used when enumerating every document of the index/type.
fn match_all_ids() -> Value {
    json!({ "query": { "match_all": {} }, "stored_fields": [] })
}

impl SearchStore {
    /// Collect the identifier of every document matching `body`.
    ///
    /// Opens a scroll in index order and keeps requesting batches until the
    /// engine's reported total has been collected or a continuation comes
    /// back empty. Every identifier the engine delivered is returned, in
    /// the order it yielded them, even when that exceeds the reported
    /// total.
    ///
    /// When `body` is `None`, every document of the index/type is
    /// enumerated without fetching stored fields.
    ///
    /// # Errors
    ///
    /// Fails with the first engine error, or with
    /// [`Error::MalformedResponse`] when more results are expected but the
    /// engine did not hand back a cursor.
    pub async fn find_all_ids(&self, body: Option<Value>) -> Result<Vec<String>> {
        let lifetime = self.config.scroll_lifetime.clone();

        let raw = self
            .engine
            .search(SearchRequest {
                index: self.config.index_name.clone(),
                doc_type: self.config.type_name.clone(),
                body: body.unwrap_or_else(match_all_ids),
                from: None,
                size: self.config.scroll_batch_size,
                scroll: Some(lifetime.clone()),
                sort: vec!["_doc".to_string()],
            })
            .await?;

        let mut response = SearchResponse::from_value(raw)?;
        let mut total = response.hits.total;
        let mut ids: Vec<String> = Vec::new();
        let mut continued = false;

        loop {
            let batch = std::mem::take(&mut response.hits.hits);
            let batch_len = batch.len();
            ids.extend(batch.into_iter().map(|hit| hit.id));

            log::trace!(
                "scroll batch of {batch_len} ids ({} of {:?}) in {}",
                ids.len(),
                total,
                self.config.index_name
            );

            if let Some(total) = total
                && ids.len() as u64 >= total
            {
                break;
            }
            // an empty opening batch only ends the scroll when no total says otherwise
            if batch_len == 0 && (continued || total.is_none()) {
                break;
            }

            let scroll_id = response.scroll_id.take().ok_or_else(|| {
                Error::malformed(format!(
                    "Scroll over {} ended without a cursor after {} ids",
                    self.config.index_name,
                    ids.len()
                ))
            })?;

            let raw = self
                .engine
                .scroll(ScrollRequest {
                    scroll_id,
                    scroll: lifetime.clone(),
                })
                .await?;
            response = SearchResponse::from_value(raw)?;
            continued = true;
            if response.hits.total.is_some() {
                total = response.hits.total;
            }
        }

        Ok(ids)
    }
}

// ============================================================================
// Tests
// ============================================================================
