//! Resource kind descriptors and field selection.
//!
//! Every server model is described once by a [`Kind`]: where it lives and
//! which fields may be sent on create and on update. The two field sets are
//! independent; write-once fields appear only in the create set.

use cinp::{uri, CinpError, Object};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{Error, Result};

/// Static description of a server model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Kind {
    /// Namespace including the trailing slash, e.g. `/api/v1/Site/`.
    pub namespace: &'static str,
    /// Model name, e.g. `Site`.
    pub model: &'static str,
    /// Fields sent on create.
    pub create_fields: &'static [&'static str],
    /// Fields that may be selected on update.
    pub update_fields: &'static [&'static str],
}

impl Kind {
    /// Namespace and model joined, e.g. `/api/v1/Site/Site`.
    #[must_use]
    pub fn model_path(&self) -> String {
        format!("{}{}", self.namespace, self.model)
    }

    /// URI of the object with the given id.
    #[must_use]
    pub fn object_uri(&self, id: &str) -> String {
        uri::build(&self.model_path(), &[id], None)
    }

    /// URI of a remote action on the object with the given id.
    #[must_use]
    pub fn action_uri(&self, id: &str, action: &str) -> String {
        uri::build(&self.model_path(), &[id], Some(action))
    }

    /// Whether clients may create objects of this kind.
    #[must_use]
    pub fn is_creatable(&self) -> bool {
        !self.create_fields.is_empty()
    }

    /// Whether `field` may be selected on update.
    #[must_use]
    pub fn is_updatable(&self, field: &str) -> bool {
        self.update_fields.iter().any(|f| *f == field)
    }
}

/// A typed server resource.
///
/// Implementations keep the server-assigned id next to their fields; an
/// object without an id has not been saved yet.
pub trait Resource: Serialize + DeserializeOwned + Default + Send + 'static {
    /// Descriptor of the server model.
    const KIND: Kind;

    /// Server-assigned id, if the object is bound to one.
    fn id(&self) -> Option<&str>;

    /// Bind the object to a server id.
    fn set_id(&mut self, id: String);

    /// Full URI of the object, if it has an id.
    fn uri(&self) -> Option<String> {
        self.id().map(|id| Self::KIND.object_uri(id))
    }
}

/// Implements [`Resource`] for a struct with an `id: Option<String>` field.
macro_rules! resource {
    (
        $ty:ty, $namespace:literal, $model:literal,
        create: [$($create:literal),* $(,)?],
        update: [$($update:literal),* $(,)?] $(,)?
    ) => {
        impl $crate::resource::Resource for $ty {
            const KIND: $crate::resource::Kind = $crate::resource::Kind {
                namespace: $namespace,
                model: $model,
                create_fields: &[$($create),*],
                update_fields: &[$($update),*],
            };

            fn id(&self) -> Option<&str> {
                self.id.as_deref()
            }

            fn set_id(&mut self, id: String) {
                self.id = Some(id);
            }
        }
    };
}

pub(crate) use resource;

/// Serialize an object into its field map.
fn field_map<R: Resource>(object: &R) -> Result<Object> {
    match serde_json::to_value(object)? {
        Value::Object(map) => Ok(map),
        other => Err(Error::Transport(CinpError::Protocol(format!(
            "{} did not serialize to an object: {other}",
            R::KIND.model
        )))),
    }
}

/// Values sent on create: create-eligible fields that hold a value.
pub(crate) fn create_values<R: Resource>(object: &R) -> Result<Object> {
    let mut fields = field_map(object)?;
    Ok(R::KIND
        .create_fields
        .iter()
        .filter_map(|name| {
            fields
                .remove(*name)
                .filter(|value| !value.is_null())
                .map(|value| ((*name).to_string(), value))
        })
        .collect())
}

/// Values sent on update: exactly the selected fields, nulls included.
///
/// Every selected field must be update-eligible for the kind; a selection
/// naming anything else is rejected rather than silently narrowed.
pub(crate) fn update_values<R: Resource>(object: &R, selected: &[&str]) -> Result<Object> {
    if selected.is_empty() {
        return Err(Error::argument(format!(
            "no fields selected to update on {}",
            R::KIND.model
        )));
    }
    if let Some(bad) = selected.iter().find(|name| !R::KIND.is_updatable(name)) {
        return Err(Error::argument(format!(
            "field '{bad}' can not be updated on {}",
            R::KIND.model
        )));
    }

    let mut fields = field_map(object)?;
    Ok(selected
        .iter()
        .map(|name| {
            let value = fields.remove(*name).unwrap_or(Value::Null);
            ((*name).to_string(), value)
        })
        .collect())
}

/// Build a typed object from server values and bind it to `id`.
pub(crate) fn from_values<R: Resource>(values: Object, id: String) -> Result<R> {
    let mut object: R = serde_json::from_value(Value::Object(values))?;
    object.set_id(id);
    Ok(object)
}
