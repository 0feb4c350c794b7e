//! Lazy, paginated listing of resources.

use std::sync::Arc;

use cinp::{uri, CinpError, Object, Transport};
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::debug;

use crate::error::{Error, Result};
use crate::resource::{self, Resource};

/// Number of objects requested per LIST page.
pub const PAGE_SIZE: usize = 50;

/// Sequence of resources produced by a background task.
///
/// The producer pages through the server while the consumer reads, so the
/// first objects are available before the whole result set has been
/// fetched. A transport error is delivered in place of the next object and
/// ends the sequence. Dropping the listing stops the producer.
pub struct Listing<R> {
    rx: mpsc::Receiver<Result<R>>,
}

impl<R: Resource> Listing<R> {
    /// Start listing `R` objects, optionally through a named filter.
    ///
    /// Must be called from within a tokio runtime.
    pub(crate) fn spawn(
        transport: Arc<dyn Transport>,
        filter: Option<String>,
        values: Object,
    ) -> Self {
        let (tx, rx) = mpsc::channel(PAGE_SIZE);

        tokio::spawn(async move {
            let result = produce::<R>(transport.as_ref(), filter.as_deref(), &values, &tx).await;
            if let Err(err) = result {
                // The consumer may already be gone; nothing left to report to.
                let _ = tx.send(Err(err)).await;
            }
        });

        Self { rx }
    }

    /// Next object, or `None` once the server has no more.
    pub async fn next(&mut self) -> Option<Result<R>> {
        self.rx.recv().await
    }

    /// Drain the listing into a vector, stopping at the first error.
    ///
    /// # Errors
    /// Returns the first error the producer reported.
    pub async fn collect(mut self) -> Result<Vec<R>> {
        let mut items = Vec::new();
        while let Some(item) = self.next().await {
            items.push(item?);
        }
        Ok(items)
    }
}

async fn produce<R: Resource>(
    transport: &dyn Transport,
    filter: Option<&str>,
    values: &Object,
    tx: &mpsc::Sender<Result<R>>,
) -> Result<()> {
    let model_path = R::KIND.model_path();
    let mut position = 0;

    loop {
        let page = transport
            .list(&model_path, filter, values, position, PAGE_SIZE)
            .await?;
        debug!(
            model = %model_path,
            position = page.position,
            count = page.count,
            total = page.total,
            "Fetched list page"
        );

        let mut objects = transport.get_multi(&page.uris).await?;
        for object_uri in &page.uris {
            let values = match objects.remove(object_uri) {
                Some(Value::Object(values)) => values,
                Some(other) => {
                    return Err(Error::Transport(CinpError::Protocol(format!(
                        "{object_uri} is not an object: {other}"
                    ))))
                }
                None => return Err(Error::NotFound(format!("{object_uri} not found"))),
            };
            let id = uri::extract_id(object_uri)
                .ok_or_else(|| CinpError::InvalidUri(object_uri.clone()))?;
            let object = resource::from_values::<R>(values, id)?;

            if tx.send(Ok(object)).await.is_err() {
                debug!(model = %model_path, "List consumer dropped");
                return Ok(());
            }
        }

        if page.is_last() {
            return Ok(());
        }
        position = page.next_position();
    }
}
