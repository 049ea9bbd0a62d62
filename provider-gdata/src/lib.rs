//! # GData Provider
//!
//! Builds Atom entries with Google Data extensions and sends them to
//! legacy GData feeds.
//!
//! ## Overview
//!
//! - [`ElementBuilder`] - fluent, by-value construction of an [`Element`] tree
//! - [`Element`] - owned XML tree, serialized and parsed with `quick-xml`
//! - [`GDataClient`] - inserts, updates and deletes entries over `HttpClient`

pub mod builder;
pub mod client;
pub mod element;
pub mod error;
pub mod namespaces;

pub use builder::ElementBuilder;
pub use client::GDataClient;
pub use element::{Attribute, Element, Node};
pub use error::{GDataError, Result};
pub use namespaces::{APP_NAMESPACE, ATOM_NAMESPACE, GDATA_NAMESPACE, KIND_SCHEME};
