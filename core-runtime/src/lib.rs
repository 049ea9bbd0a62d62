//! # Core Runtime Module
//!
//! Provides the ambient runtime infrastructure shared by the Google bindings:
//! - Logging and tracing infrastructure
//! - Client configuration management
//!
//! ## Overview
//!
//! This crate contains the runtime utilities that the provider crates and the
//! `social-google` facade depend on. It establishes the logging conventions
//! and the fail-fast configuration rules used throughout the workspace.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::{Error, Result};
