//! In-memory search engine for tests.
//!
//! `MockEngine` keeps documents, indices and mappings in memory and records
//! every request it receives. Search and scroll answers can be scripted by
//! queueing raw responses; an unscripted search returns the stored
//! documents of the target index (the query body is not evaluated) and an
//! unscripted scroll returns an empty batch.

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde_json::{Value, json};
use sift_core::{Document, Error, Result};

use crate::engine::{
    DocumentRef, GetResponse, IndexRequest, ScrollRequest, SearchEngine, SearchRequest,
};

/// A request as received by [`MockEngine`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedRequest {
    Index(IndexRequest),
    Delete(DocumentRef),
    Get(DocumentRef),
    Exists(DocumentRef),
    Update {
        target: DocumentRef,
        body: Value,
    },
    Bulk {
        index: String,
        doc_type: String,
        lines: Vec<Value>,
    },
    Search(SearchRequest),
    Scroll(ScrollRequest),
    CreateIndex {
        index: String,
        body: Value,
    },
    DeleteIndex {
        index: String,
    },
    IndexExists {
        index: String,
    },
    PutMapping {
        index: String,
        doc_type: String,
        body: Value,
    },
}

#[derive(Debug, Default)]
struct MockState {
    documents: BTreeMap<(String, String), Document>,
    indices: BTreeMap<String, Value>,
    mappings: BTreeMap<(String, String), Value>,
    search_responses: VecDeque<Value>,
    scroll_responses: VecDeque<Value>,
    requests: Vec<RecordedRequest>,
    next_id: u64,
    unreachable: bool,
}

impl MockState {
    fn upsert(&mut self, index: &str, id: Option<String>, body: Document) -> Value {
        let id = id.unwrap_or_else(|| {
            self.next_id += 1;
            format!("mock-{}", self.next_id)
        });
        self.indices
            .entry(index.to_string())
            .or_insert_with(|| json!({}));

        let key = (index.to_string(), id.clone());
        let result = if self.documents.insert(key, body).is_some() {
            "updated"
        } else {
            "created"
        };
        json!({ "_index": index, "_id": id, "result": result })
    }

    fn remove(&mut self, index: &str, id: &str) -> Result<Value> {
        self.documents
            .remove(&(index.to_string(), id.to_string()))
            .map(|_| json!({ "_index": index, "_id": id, "result": "deleted" }))
            .ok_or_else(|| not_found(index, id))
    }

    fn merge(&mut self, index: &str, id: &str, fields: Document) -> Result<Value> {
        let stored = self
            .documents
            .get_mut(&(index.to_string(), id.to_string()))
            .ok_or_else(|| not_found(index, id))?;
        stored.extend(fields);
        Ok(json!({ "_index": index, "_id": id, "result": "updated" }))
    }

    fn apply_bulk(&mut self, index: &str, lines: &[Value]) -> Result<Vec<Value>> {
        let mut items = Vec::new();
        let mut lines = lines.iter();

        while let Some(action) = lines.next() {
            let (kind, meta) = action
                .as_object()
                .and_then(|a| a.iter().next())
                .ok_or_else(|| Error::engine_status(400, format!("Bad bulk action: {action}")))?;
            let id = meta.get("_id").and_then(Value::as_str).map(str::to_string);

            let outcome = match kind.as_str() {
                "index" => {
                    let source = next_object(&mut lines, kind)?;
                    Ok(self.upsert(index, id.clone(), source))
                }
                "update" => {
                    let body = next_object(&mut lines, kind)?;
                    let doc = match body.get("doc") {
                        Some(Value::Object(doc)) => doc.clone(),
                        _ => Document::new(),
                    };
                    self.merge(index, id.as_deref().unwrap_or_default(), doc)
                }
                "delete" => self.remove(index, id.as_deref().unwrap_or_default()),
                other => {
                    return Err(Error::engine_status(
                        400,
                        format!("Unknown bulk action: {other}"),
                    ));
                }
            };

            let item = match outcome {
                Ok(result) => result,
                Err(e) => json!({
                    "_index": index,
                    "_id": id,
                    "status": 404,
                    "error": e.to_string(),
                }),
            };
            items.push(json!({ kind.as_str(): item }));
        }

        Ok(items)
    }

    fn stored_hits(&self, request: &SearchRequest) -> Value {
        let matching: Vec<_> = self
            .documents
            .iter()
            .filter(|((index, _), _)| *index == request.index)
            .collect();
        let total = matching.len();

        let hits: Vec<Value> = matching
            .into_iter()
            .skip(request.from.unwrap_or(0))
            .take(request.size)
            .map(|((_, id), source)| json!({ "_id": id, "_score": 1.0, "_source": source }))
            .collect();

        json!({ "hits": { "total": total, "hits": hits } })
    }
}

fn not_found(index: &str, id: &str) -> Error {
    Error::engine_status(404, format!("[{index}][{id}]: document missing"))
}

fn next_object<'a>(lines: &mut impl Iterator<Item = &'a Value>, kind: &str) -> Result<Document> {
    match lines.next() {
        Some(Value::Object(source)) => Ok(source.clone()),
        _ => Err(Error::engine_status(
            400,
            format!("Bulk {kind} action without a source line"),
        )),
    }
}

/// Build a raw search/scroll response holding `ids` as hits.
pub fn batch_response(ids: &[String], total: Option<u64>, scroll_id: Option<&str>) -> Value {
    let hits: Vec<Value> = ids.iter().map(|id| json!({ "_id": id })).collect();
    let mut response = json!({ "hits": { "hits": hits } });
    if let Some(total) = total {
        response["hits"]["total"] = json!(total);
    }
    if let Some(scroll_id) = scroll_id {
        response["_scroll_id"] = json!(scroll_id);
    }
    response
}

/// In-memory, scriptable [`SearchEngine`].
#[derive(Debug, Default)]
pub struct MockEngine {
    state: Mutex<MockState>,
}

impl MockEngine {
    /// Create an empty engine.
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record `request` and fail if the engine is unreachable.
    fn receive(&self, request: RecordedRequest) -> Result<MutexGuard<'_, MockState>> {
        let mut state = self.state();
        state.requests.push(request);
        if state.unreachable {
            return Err(Error::connection("No living connections"));
        }
        Ok(state)
    }

    /// Queue a raw response for the next search.
    pub fn push_search_response(&self, response: Value) {
        self.state().search_responses.push_back(response);
    }

    /// Queue a raw response for the next scroll continuation.
    pub fn push_scroll_response(&self, response: Value) {
        self.state().scroll_responses.push_back(response);
    }

    /// Fail every subsequent request with a connection error.
    pub fn fail_with_connection_error(&self) {
        self.state().unreachable = true;
    }

    /// Every request received so far, oldest first.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state().requests.clone()
    }

    /// A stored document, without its identifier.
    pub fn document(&self, index: &str, id: &str) -> Option<Document> {
        self.state()
            .documents
            .get(&(index.to_string(), id.to_string()))
            .cloned()
    }

    /// Number of documents stored in `index`.
    pub fn document_count(&self, index: &str) -> usize {
        self.state()
            .documents
            .keys()
            .filter(|(i, _)| i == index)
            .count()
    }

    /// Last mapping applied to `index`/`doc_type`.
    pub fn mapping(&self, index: &str, doc_type: &str) -> Option<Value> {
        self.state()
            .mappings
            .get(&(index.to_string(), doc_type.to_string()))
            .cloned()
    }
}

#[async_trait]
impl SearchEngine for MockEngine {
    async fn index(&self, request: IndexRequest) -> Result<Value> {
        let mut state = self.receive(RecordedRequest::Index(request.clone()))?;
        Ok(state.upsert(&request.index, request.id, request.body))
    }

    async fn delete(&self, target: &DocumentRef) -> Result<Value> {
        let mut state = self.receive(RecordedRequest::Delete(target.clone()))?;
        state.remove(&target.index, &target.id)
    }

    async fn get(&self, target: &DocumentRef) -> Result<GetResponse> {
        let state = self.receive(RecordedRequest::Get(target.clone()))?;
        let response = match state
            .documents
            .get(&(target.index.clone(), target.id.clone()))
        {
            Some(source) => GetResponse {
                id: target.id.clone(),
                found: true,
                source: Some(source.clone()),
            },
            None => GetResponse::missing(&target.id),
        };
        Ok(response)
    }

    async fn exists(&self, target: &DocumentRef) -> Result<bool> {
        let state = self.receive(RecordedRequest::Exists(target.clone()))?;
        Ok(state
            .documents
            .contains_key(&(target.index.clone(), target.id.clone())))
    }

    async fn update(&self, target: &DocumentRef, body: Value) -> Result<Value> {
        let mut state = self.receive(RecordedRequest::Update {
            target: target.clone(),
            body: body.clone(),
        })?;
        let fields = match body.get("doc") {
            Some(Value::Object(doc)) => doc.clone(),
            _ => {
                return Err(Error::engine_status(400, "Update without a doc"));
            }
        };
        state.merge(&target.index, &target.id, fields)
    }

    async fn bulk(&self, index: &str, doc_type: &str, lines: Vec<Value>) -> Result<Value> {
        let mut state = self.receive(RecordedRequest::Bulk {
            index: index.to_string(),
            doc_type: doc_type.to_string(),
            lines: lines.clone(),
        })?;
        let items = state.apply_bulk(index, &lines)?;
        let errors = items.iter().any(|item| {
            item.as_object()
                .and_then(|i| i.values().next())
                .is_some_and(|result| result.get("error").is_some())
        });
        Ok(json!({ "errors": errors, "items": items }))
    }

    async fn search(&self, request: SearchRequest) -> Result<Value> {
        let mut state = self.receive(RecordedRequest::Search(request.clone()))?;
        match state.search_responses.pop_front() {
            Some(response) => Ok(response),
            None => Ok(state.stored_hits(&request)),
        }
    }

    async fn scroll(&self, request: ScrollRequest) -> Result<Value> {
        let mut state = self.receive(RecordedRequest::Scroll(request.clone()))?;
        Ok(state.scroll_responses.pop_front().unwrap_or_else(|| {
            batch_response(&[], None, Some(request.scroll_id.as_str()))
        }))
    }

    async fn create_index(&self, index: &str, body: Value) -> Result<Value> {
        let mut state = self.receive(RecordedRequest::CreateIndex {
            index: index.to_string(),
            body: body.clone(),
        })?;
        if state.indices.contains_key(index) {
            return Err(Error::engine_status(
                400,
                format!("index [{index}] already exists"),
            ));
        }
        state.indices.insert(index.to_string(), body);
        Ok(json!({ "acknowledged": true, "index": index }))
    }

    async fn delete_index(&self, index: &str) -> Result<Value> {
        let mut state = self.receive(RecordedRequest::DeleteIndex {
            index: index.to_string(),
        })?;
        if state.indices.remove(index).is_none() {
            return Err(Error::engine_status(404, format!("no such index [{index}]")));
        }
        state.documents.retain(|(i, _), _| i != index);
        state.mappings.retain(|(i, _), _| i != index);
        Ok(json!({ "acknowledged": true }))
    }

    async fn index_exists(&self, index: &str) -> Result<bool> {
        let state = self.receive(RecordedRequest::IndexExists {
            index: index.to_string(),
        })?;
        Ok(state.indices.contains_key(index))
    }

    async fn put_mapping(&self, index: &str, doc_type: &str, body: Value) -> Result<Value> {
        let mut state = self.receive(RecordedRequest::PutMapping {
            index: index.to_string(),
            doc_type: doc_type.to_string(),
            body: body.clone(),
        })?;
        state
            .mappings
            .insert((index.to_string(), doc_type.to_string()), body);
        Ok(json!({ "acknowledged": true }))
    }

    fn name(&self) -> &str {
        "mock"
    }
}

// ============================================================================
// Tests
// ============================================================================
