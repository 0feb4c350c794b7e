//! CInP URI handling.
//!
//! A CInP URI addresses a model inside a namespace, optionally narrowed to
//! one or more object ids and optionally naming a remote action:
//!
//! ```text
//! /api/v1/Site/Site                     model
//! /api/v1/Site/Site:main:               one object
//! /api/v1/Site/Site:main:west:          several objects
//! /api/v1/Site/Site:main:(getConfig)    action on an object
//! ```

use crate::error::CinpError;

/// A URI split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUri {
    /// Namespace including the trailing slash, e.g. `/api/v1/Site/`.
    pub namespace: String,
    /// Model name, e.g. `Site`.
    pub model: String,
    /// Object ids, empty for model level URIs.
    pub ids: Vec<String>,
    /// Action name without parentheses.
    pub action: Option<String>,
}

impl ParsedUri {
    /// Namespace and model joined, e.g. `/api/v1/Site/Site`.
    #[must_use]
    pub fn model_path(&self) -> String {
        format!("{}{}", self.namespace, self.model)
    }

    /// The first id, if any.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.ids.first().map(String::as_str)
    }
}

/// Split a URI into namespace, model, ids and action.
///
/// # Errors
/// Returns [`CinpError::InvalidUri`] if the URI is not absolute or has no
/// model component.
pub fn parse(uri: &str) -> Result<ParsedUri, CinpError> {
    let invalid = || CinpError::InvalidUri(uri.to_string());

    let (rest, action) = match uri.strip_suffix(')') {
        Some(head) => {
            let open = head.rfind('(').ok_or_else(invalid)?;
            (&head[..open], Some(head[open + 1..].to_string()))
        }
        None => (uri, None),
    };

    let (path, id_part) = match rest.find(':') {
        Some(idx) => (&rest[..idx], Some(&rest[idx + 1..])),
        None => (rest, None),
    };

    if !path.starts_with('/') {
        return Err(invalid());
    }
    let slash = path.rfind('/').ok_or_else(invalid)?;
    let model = &path[slash + 1..];
    if model.is_empty() {
        return Err(invalid());
    }

    let ids = match id_part {
        Some(part) => {
            let part = part.strip_suffix(':').ok_or_else(invalid)?;
            part.split(':')
                .filter(|id| !id.is_empty())
                .map(ToString::to_string)
                .collect()
        }
        None => Vec::new(),
    };

    Ok(ParsedUri {
        namespace: path[..=slash].to_string(),
        model: model.to_string(),
        ids,
        action,
    })
}

/// Build a URI from a model path, ids and an optional action.
#[must_use]
pub fn build(model_path: &str, ids: &[&str], action: Option<&str>) -> String {
    let mut uri = model_path.to_string();
    if !ids.is_empty() {
        uri.push(':');
        for id in ids {
            uri.push_str(id);
            uri.push(':');
        }
    }
    if let Some(action) = action {
        uri.push('(');
        uri.push_str(action);
        uri.push(')');
    }
    uri
}

/// Extract the first object id from a URI.
#[must_use]
pub fn extract_id(uri: &str) -> Option<String> {
    parse(uri).ok().and_then(|parsed| parsed.ids.into_iter().next())
}

/// Id of an object URI for display, falling back to the input unchanged.
#[must_use]
pub fn short_id(uri: &str) -> String {
    extract_id(uri).unwrap_or_else(|| uri.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_model() {
        let parsed = parse("/api/v1/Site/Site").unwrap();
        assert_eq!(parsed.namespace, "/api/v1/Site/");
        assert_eq!(parsed.model, "Site");
        assert!(parsed.ids.is_empty());
        assert_eq!(parsed.action, None);
    }

    #[test]
    fn test_parse_object_and_action() {
        let parsed = parse("/api/v1/Building/Foundation:rack1-n4:(getConfig)").unwrap();
        assert_eq!(parsed.model_path(), "/api/v1/Building/Foundation");
        assert_eq!(parsed.id(), Some("rack1-n4"));
        assert_eq!(parsed.action.as_deref(), Some("getConfig"));
    }

    #[test]
    fn test_parse_multi_object() {
        let parsed = parse("/api/v1/Utilities/Address:4:9:12:").unwrap();
        assert_eq!(parsed.ids, vec!["4", "9", "12"]);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse("Site:main:").is_err());
        assert!(parse("/api/v1/Site/").is_err());
        assert!(parse("/api/v1/Site/Site:main").is_err());
    }

    #[test]
    fn test_build_round_trip() {
        let uri = build("/api/v1/Survey/Cartographer", &["c0ffee"], Some("assign"));
        assert_eq!(uri, "/api/v1/Survey/Cartographer:c0ffee:(assign)");
        assert_eq!(build("/api/v1/Site/Site", &[], None), "/api/v1/Site/Site");
    }

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("/api/v1/Site/Site:main:"), "main");
        assert_eq!(short_id("not-a-uri"), "not-a-uri");
    }
}
