//! In-memory CInP server stand-in.
//!
//! Keeps objects per model, honours pagination and equality filters, and
//! records every request so tests can assert on what was sent.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::Value;

use crate::error::CinpError;
use crate::transport::{Created, ListPage, Object, Transport};
use crate::uri;

/// Handler for a remote action: receives the object id (if any) and the
/// call arguments.
pub type ActionHandler =
    Arc<dyn Fn(Option<&str>, &Object) -> Result<Value, CinpError> + Send + Sync>;

/// One recorded request.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    /// CInP verb.
    pub verb: &'static str,
    /// Request URI.
    pub uri: String,
    /// Body, if the verb carries one.
    pub body: Option<Object>,
}

#[derive(Default)]
struct ModelStore {
    /// Field whose value becomes the id; integer ids when unset.
    id_field: Option<String>,
    next_id: u64,
    /// Objects in insertion order.
    objects: Vec<(String, Object)>,
}

impl ModelStore {
    fn find(&self, id: &str) -> Option<&Object> {
        self.objects.iter().find(|(k, _)| k == id).map(|(_, v)| v)
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut Object> {
        self.objects.iter_mut().find(|(k, _)| k == id).map(|(_, v)| v)
    }
}

#[derive(Default)]
struct State {
    models: HashMap<String, ModelStore>,
    actions: HashMap<(String, String), ActionHandler>,
    requests: Vec<RecordedRequest>,
}

/// [`Transport`] backed by process memory.
#[derive(Clone, Default)]
pub struct MemoryTransport {
    state: Arc<Mutex<State>>,
}

impl MemoryTransport {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // A panicking test thread must not hide the state from the others.
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Declare a model whose ids come from the value of `id_field`.
    #[must_use]
    pub fn with_model(self, model_path: &str, id_field: &str) -> Self {
        self.lock()
            .models
            .entry(model_path.to_string())
            .or_default()
            .id_field = Some(id_field.to_string());
        self
    }

    /// Register a handler for `model_path(action)`.
    #[must_use]
    pub fn with_action<F>(self, model_path: &str, action: &str, handler: F) -> Self
    where
        F: Fn(Option<&str>, &Object) -> Result<Value, CinpError> + Send + Sync + 'static,
    {
        self.lock().actions.insert(
            (model_path.to_string(), action.to_string()),
            Arc::new(handler),
        );
        self
    }

    /// Store an object directly, bypassing create rules. Returns its URI.
    pub fn insert(&self, model_path: &str, id: &str, values: Object) -> String {
        let mut state = self.lock();
        let store = state.models.entry(model_path.to_string()).or_default();
        if let Some(existing) = store.find_mut(id) {
            *existing = values;
        } else {
            store.objects.push((id.to_string(), values));
        }
        uri::build(model_path, &[id], None)
    }

    /// Current server-side values of an object.
    #[must_use]
    pub fn object(&self, model_path: &str, id: &str) -> Option<Object> {
        self.lock()
            .models
            .get(model_path)
            .and_then(|store| store.find(id))
            .cloned()
    }

    /// Every request seen so far.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.lock().requests.clone()
    }

    /// Number of requests seen so far.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.lock().requests.len()
    }

    fn record(state: &mut State, verb: &'static str, uri: &str, body: Option<&Object>) {
        state.requests.push(RecordedRequest {
            verb,
            uri: uri.to_string(),
            body: body.cloned(),
        });
    }

    fn object_id(parsed: &uri::ParsedUri, uri: &str) -> Result<String, CinpError> {
        parsed
            .id()
            .map(ToString::to_string)
            .ok_or_else(|| CinpError::InvalidUri(uri.to_string()))
    }

    fn lookup(state: &State, uri: &str) -> Result<Object, CinpError> {
        let parsed = uri::parse(uri)?;
        let id = Self::object_id(&parsed, uri)?;
        state
            .models
            .get(&parsed.model_path())
            .and_then(|store| store.find(&id))
            .cloned()
            .ok_or_else(|| CinpError::NotFound(uri.to_string()))
    }
}

fn value_to_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn get(&self, uri: &str) -> Result<Object, CinpError> {
        let mut state = self.lock();
        Self::record(&mut state, "GET", uri, None);
        Self::lookup(&state, uri)
    }

    async fn get_multi(&self, uris: &[String]) -> Result<Object, CinpError> {
        let mut state = self.lock();
        let mut result = Object::new();
        for item in uris {
            Self::record(&mut state, "GET", item, None);
            let object = Self::lookup(&state, item)?;
            result.insert(item.clone(), Value::Object(object));
        }
        Ok(result)
    }

    async fn list(
        &self,
        uri: &str,
        filter: Option<&str>,
        values: &Object,
        position: usize,
        count: usize,
    ) -> Result<ListPage, CinpError> {
        let mut state = self.lock();
        Self::record(&mut state, "LIST", uri, filter.map(|_| values));

        let model_path = uri::parse(uri)?.model_path();
        let matching: Vec<String> = state
            .models
            .get(&model_path)
            .map(|store| {
                store
                    .objects
                    .iter()
                    .filter(|(_, object)| {
                        filter.is_none()
                            || values.iter().all(|(k, v)| object.get(k) == Some(v))
                    })
                    .map(|(id, _)| uri::build(&model_path, &[id.as_str()], None))
                    .collect()
            })
            .unwrap_or_default();

        let uris: Vec<String> = matching.iter().skip(position).take(count).cloned().collect();
        Ok(ListPage {
            position,
            count: uris.len(),
            total: matching.len(),
            uris,
        })
    }

    async fn create(&self, uri: &str, values: &Object) -> Result<Created, CinpError> {
        let mut state = self.lock();
        Self::record(&mut state, "CREATE", uri, Some(values));

        let model_path = uri::parse(uri)?.model_path();
        let store = state.models.entry(model_path.clone()).or_default();
        let id = match &store.id_field {
            Some(field) => values.get(field).and_then(value_to_id).ok_or_else(|| {
                CinpError::InvalidRequest {
                    message: format!("{field} is required"),
                    data: None,
                }
            })?,
            None => {
                store.next_id += 1;
                store.next_id.to_string()
            }
        };
        if store.find(&id).is_some() {
            return Err(CinpError::InvalidRequest {
                message: format!("{id} already exists"),
                data: None,
            });
        }
        store.objects.push((id.clone(), values.clone()));

        Ok(Created {
            uri: uri::build(&model_path, &[id.as_str()], None),
            values: values.clone(),
        })
    }

    async fn update(&self, uri: &str, values: &Object) -> Result<Object, CinpError> {
        let mut state = self.lock();
        Self::record(&mut state, "UPDATE", uri, Some(values));

        let parsed = uri::parse(uri)?;
        let id = Self::object_id(&parsed, uri)?;
        let object = state
            .models
            .get_mut(&parsed.model_path())
            .and_then(|store| store.find_mut(&id))
            .ok_or_else(|| CinpError::NotFound(uri.to_string()))?;
        for (k, v) in values {
            object.insert(k.clone(), v.clone());
        }
        Ok(object.clone())
    }

    async fn delete(&self, uri: &str) -> Result<(), CinpError> {
        let mut state = self.lock();
        Self::record(&mut state, "DELETE", uri, None);

        let parsed = uri::parse(uri)?;
        let id = Self::object_id(&parsed, uri)?;
        let store = state
            .models
            .get_mut(&parsed.model_path())
            .ok_or_else(|| CinpError::NotFound(uri.to_string()))?;
        let before = store.objects.len();
        store.objects.retain(|(k, _)| *k != id);
        if store.objects.len() == before {
            return Err(CinpError::NotFound(uri.to_string()));
        }
        Ok(())
    }

    async fn call(&self, uri: &str, args: &Object) -> Result<Value, CinpError> {
        let parsed = uri::parse(uri)?;
        let handler = {
            let mut state = self.lock();
            Self::record(&mut state, "CALL", uri, Some(args));

            let action = parsed
                .action
                .clone()
                .ok_or_else(|| CinpError::InvalidUri(uri.to_string()))?;
            if let Some(id) = parsed.id() {
                Self::lookup(&state, &uri::build(&parsed.model_path(), &[id], None))?;
            }
            state
                .actions
                .get(&(parsed.model_path(), action.clone()))
                .cloned()
                .ok_or_else(|| CinpError::InvalidRequest {
                    message: format!("method {action} not found"),
                    data: None,
                })?
        };

        handler(parsed.id(), args)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn object(value: Value) -> Object {
        match value {
            Value::Object(map) => map,
            _ => Object::new(),
        }
    }

    #[tokio::test]
    async fn test_named_ids_and_duplicates() {
        let transport = MemoryTransport::new().with_model("/api/v1/Site/Site", "name");
        let created = transport
            .create("/api/v1/Site/Site", &object(json!({"name": "main"})))
            .await
            .unwrap();
        assert_eq!(created.uri, "/api/v1/Site/Site:main:");

        let again = transport
            .create("/api/v1/Site/Site", &object(json!({"name": "main"})))
            .await;
        assert!(matches!(again, Err(CinpError::InvalidRequest { .. })));
    }

    #[tokio::test]
    async fn test_list_filters_and_pages() {
        let transport = MemoryTransport::new();
        for offset in 0..5 {
            let block = if offset % 2 == 0 { "a" } else { "b" };
            transport
                .create(
                    "/api/v1/Utilities/Address",
                    &object(json!({"offset": offset, "address_block": block})),
                )
                .await
                .unwrap();
        }

        let page = transport
            .list(
                "/api/v1/Utilities/Address",
                Some("address_block"),
                &object(json!({"address_block": "a"})),
                1,
                10,
            )
            .await
            .unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.count, 2);
        assert_eq!(page.uris[0], "/api/v1/Utilities/Address:3:");
    }

    #[tokio::test]
    async fn test_call_unknown_action() {
        let transport = MemoryTransport::new();
        let result = transport
            .call("/api/v1/Foreman/BaseJob(list)", &Object::new())
            .await;
        assert!(matches!(result, Err(CinpError::InvalidRequest { .. })));
        assert_eq!(transport.request_count(), 1);
    }
}
