//! CInP transport client.
//!
//! CInP addresses server objects by namespace, model and id, and exposes
//! `GET`, `LIST`, `CREATE`, `UPDATE`, `DELETE` and `CALL` as HTTP verbs.
//! This crate provides the [`Transport`] trait the Contractor binding layer
//! is written against, an HTTP [`Client`] implementing it, and URI helpers.
//!
//! # Example
//!
//! ```rust,ignore
//! use cinp::{Client, ClientOptions, Transport};
//!
//! let mut client = Client::new("https://contractor:443", &ClientOptions::default())?;
//! client.login("root", "root").await?;
//! let site = client.get("/api/v1/Site/Site:main:").await?;
//! client.logout().await?;
//! ```

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod client;
mod error;
#[cfg(any(test, feature = "test-util"))]
pub mod memory;
mod transport;
pub mod uri;

pub use client::{Client, ClientOptions};
pub use error::CinpError;
pub use transport::{Created, ListPage, Object, Transport};
