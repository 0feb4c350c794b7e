//! Entry point to the binding layer.

use std::marker::PhantomData;
use std::sync::Arc;

use cinp::{uri, CinpError, Object, Transport};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::listing::Listing;
use crate::resource::{self, Resource};

/// Handle to a Contractor server.
///
/// Cheap to clone; all clones share the same transport and session.
#[derive(Clone)]
pub struct Contractor {
    transport: Arc<dyn Transport>,
}

impl Contractor {
    /// Wrap a transport, typically a logged in [`cinp::Client`].
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Typed accessor for one resource kind.
    pub fn resource<R: Resource>(&self) -> Resources<R> {
        Resources::new(Arc::clone(&self.transport))
    }
}

/// Typed accessor implementing the binding contract for resource kind `R`.
pub struct Resources<R> {
    transport: Arc<dyn Transport>,
    _kind: PhantomData<fn() -> R>,
}

impl<R> Clone for Resources<R> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            _kind: PhantomData,
        }
    }
}

impl<R: Resource> Resources<R> {
    pub(crate) fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            _kind: PhantomData,
        }
    }

    /// Accessor for another kind sharing this transport.
    pub(crate) fn sibling<S: Resource>(&self) -> Resources<S> {
        Resources::new(Arc::clone(&self.transport))
    }

    /// Empty, unsaved object.
    pub fn new_object(&self) -> R {
        R::default()
    }

    /// Object bound to an existing id without fetching it.
    pub fn new_with_id(&self, id: impl Into<String>) -> R {
        let mut object = R::default();
        object.set_id(id.into());
        object
    }

    /// Fetch an object by id.
    ///
    /// # Errors
    /// [`Error::NotFound`] if the id does not resolve, [`Error::Transport`]
    /// on connectivity or session failures.
    pub async fn get(&self, id: &str) -> Result<R> {
        let object_uri = R::KIND.object_uri(id);
        debug!(uri = %object_uri, "Fetching object");
        let values = self.transport.get(&object_uri).await?;
        resource::from_values(values, id.to_string())
    }

    /// Fetch an object and return only its URI, for use as a reference.
    ///
    /// # Errors
    /// Same as [`Resources::get`].
    pub async fn resolve(&self, id: &str) -> Result<String> {
        let object_uri = R::KIND.object_uri(id);
        self.transport.get(&object_uri).await?;
        Ok(object_uri)
    }

    /// Create `object` on the server from its create-eligible fields.
    ///
    /// On success the object is bound to the new id and refreshed from the
    /// values the server stored.
    ///
    /// # Errors
    /// [`Error::Argument`] if the object already has an id or the kind can
    /// not be created by clients, [`Error::Validation`] if the server
    /// rejects the values.
    pub async fn create(&self, object: &mut R) -> Result<()> {
        if let Some(id) = object.id() {
            return Err(Error::argument(format!(
                "{} {id} has already been created",
                R::KIND.model
            )));
        }
        if !R::KIND.is_creatable() {
            return Err(Error::argument(format!(
                "{} objects can not be created directly",
                R::KIND.model
            )));
        }

        let values = resource::create_values(object)?;
        let created = self
            .transport
            .create(&R::KIND.model_path(), &values)
            .await?;
        let id = uri::extract_id(&created.uri).ok_or_else(|| {
            CinpError::Protocol(format!("server returned unusable id {}", created.uri))
        })?;

        info!(model = R::KIND.model, id = %id, "Created");
        *object = resource::from_values(created.values, id)?;
        Ok(())
    }

    /// Persist exactly the `fields` named, leaving every other field on the
    /// server untouched.
    ///
    /// # Errors
    /// [`Error::Argument`] if the object has no id, `fields` is empty or
    /// names a field that is not update-eligible; otherwise as for create.
    pub async fn update(&self, object: &mut R, fields: &[&str]) -> Result<()> {
        let id = Self::require_id(object)?;
        let values = resource::update_values(object, fields)?;
        let updated = self
            .transport
            .update(&R::KIND.object_uri(&id), &values)
            .await?;

        info!(model = R::KIND.model, id = %id, fields = ?fields, "Updated");
        *object = resource::from_values(updated, id)?;
        Ok(())
    }

    /// Delete the object from the server.
    ///
    /// # Errors
    /// [`Error::Argument`] if the object has no id, [`Error::NotFound`] if
    /// the server has no such object.
    pub async fn delete(&self, object: &R) -> Result<()> {
        let id = Self::require_id(object)?;
        self.transport.delete(&R::KIND.object_uri(&id)).await?;
        info!(model = R::KIND.model, id = %id, "Deleted");
        Ok(())
    }

    /// List objects, optionally through a named server filter.
    ///
    /// Ordering is whatever the server returns. Every call starts a fresh
    /// listing from the first page.
    pub fn list(&self, filter: Option<&str>, values: Object) -> Listing<R> {
        Listing::spawn(
            Arc::clone(&self.transport),
            filter.map(ToString::to_string),
            values,
        )
    }

    /// List every object of the kind.
    ///
    /// # Errors
    /// Returns the first error encountered while paging.
    pub async fn list_all(&self) -> Result<Vec<R>> {
        self.list(None, Object::new()).collect().await
    }

    /// Invoke a remote action on the object.
    ///
    /// # Errors
    /// [`Error::Argument`] if the object has no id, [`Error::Action`] if the
    /// server rejects the call.
    pub async fn call<T: DeserializeOwned>(
        &self,
        object: &R,
        action: &str,
        args: Object,
    ) -> Result<T> {
        let id = Self::require_id(object)?;
        let action_uri = R::KIND.action_uri(&id, action);
        debug!(uri = %action_uri, "Calling action");

        let value = self
            .transport
            .call(&action_uri, &args)
            .await
            .map_err(|e| Error::from_call(action, e))?;
        Ok(serde_json::from_value(value)?)
    }

    fn require_id(object: &R) -> Result<String> {
        object.id().map(ToString::to_string).ok_or_else(|| {
            Error::argument(format!("{} has not been created yet", R::KIND.model))
        })
    }
}
