//! Typed bindings for the Contractor orchestration API.
//!
//! Every server model is a plain serde struct implementing [`Resource`];
//! one generic accessor, [`Resources`], provides get, create, update,
//! delete, list and remote calls for all of them.
//!
//! ```rust,ignore
//! use contractor::{models::Site, Contractor};
//!
//! let contractor = Contractor::new(Arc::new(client));
//! let sites = contractor.resource::<Site>();
//!
//! let mut site = sites.get("main").await?;
//! site.description = Some("Main datacenter".into());
//! sites.update(&mut site, &["description"]).await?;
//! ```

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod actions;
pub mod addressing;
mod client;
mod error;
mod listing;
pub mod models;
mod resource;

pub use actions::{Buildable, Configurable, JobKind};
pub use addressing::{Allocation, AllocationKind, Usage};
pub use client::{Contractor, Resources};
pub use error::{Error, Result};
pub use listing::{Listing, PAGE_SIZE};
pub use resource::{Kind, Resource};

pub use cinp::Object;
