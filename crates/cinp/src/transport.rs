//! The transport seam between the binding layer and a CInP server.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::CinpError;

/// A JSON object as exchanged with the server.
pub type Object = Map<String, Value>;

/// One page of a LIST response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPage {
    /// Object URIs on this page, in server order.
    pub uris: Vec<String>,
    /// Position of the first item on this page.
    pub position: usize,
    /// Number of items on this page.
    pub count: usize,
    /// Total number of items matching the request.
    pub total: usize,
}

impl ListPage {
    /// Position the following page starts at.
    #[must_use]
    pub fn next_position(&self) -> usize {
        self.position + self.count
    }

    /// True once this page reaches the end of the result set.
    #[must_use]
    pub fn is_last(&self) -> bool {
        self.count == 0 || self.next_position() >= self.total
    }
}

/// Result of a CREATE.
#[derive(Debug, Clone)]
pub struct Created {
    /// URI assigned by the server.
    pub uri: String,
    /// Object values as stored by the server.
    pub values: Object,
}

/// The CInP verbs as seen by a client.
///
/// Implemented by the HTTP [`Client`](crate::Client) and, for tests, by
/// [`MemoryTransport`](crate::memory::MemoryTransport).
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch one object.
    async fn get(&self, uri: &str) -> Result<Object, CinpError>;

    /// Fetch several objects of the same model in one round trip, keyed by URI.
    async fn get_multi(&self, uris: &[String]) -> Result<Object, CinpError>;

    /// List object URIs of a model, optionally through a named filter.
    async fn list(
        &self,
        uri: &str,
        filter: Option<&str>,
        values: &Object,
        position: usize,
        count: usize,
    ) -> Result<ListPage, CinpError>;

    /// Create an object.
    async fn create(&self, uri: &str, values: &Object) -> Result<Created, CinpError>;

    /// Update the given fields of an object.
    async fn update(&self, uri: &str, values: &Object) -> Result<Object, CinpError>;

    /// Delete an object.
    async fn delete(&self, uri: &str) -> Result<(), CinpError>;

    /// Invoke a remote action. `uri` already carries the `(action)` suffix.
    async fn call(&self, uri: &str, args: &Object) -> Result<Value, CinpError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_page_progress() {
        let page = ListPage {
            uris: vec!["/a/B:1:".into(), "/a/B:2:".into()],
            position: 0,
            count: 2,
            total: 5,
        };
        assert_eq!(page.next_position(), 2);
        assert!(!page.is_last());

        let last = ListPage {
            uris: vec!["/a/B:5:".into()],
            position: 4,
            count: 1,
            total: 5,
        };
        assert!(last.is_last());
        assert!(ListPage::default().is_last());
    }
}
