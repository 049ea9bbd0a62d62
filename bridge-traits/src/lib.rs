//! # Host Bridge Traits
//!
//! Collaborator contracts that the Google bindings depend on but do not
//! implement themselves.
//!
//! ## Overview
//!
//! The Drive and GData bindings are thin: they describe requests and
//! interpret responses, and leave everything else to the host. This crate
//! defines the seams where the host plugs in.
//!
//! ## Traits
//!
//! - [`HttpClient`](http::HttpClient) - Async HTTP transport (OAuth, TLS, pooling, retry)
//! - [`LoggerSink`](logging::LoggerSink) - Forward structured logs to host logging
//!
//! ## Implementations
//!
//! | Host    | Implementation Crate | Status |
//! |---------|----------------------|--------|
//! | Desktop | `bridge-desktop`     | ✅ Available |
//! | Tests   | `mockall` mocks      | ✅ Available |
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type. A
//! transport returns `Err` only when no HTTP response was obtained; remote
//! error statuses come back as ordinary responses for the caller to map.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` so a single transport can be
//! shared by every binding through an `Arc`.
//!
//! ## Examples
//!
//! ### Implementing HttpClient
//!
//! ```ignore
//! use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
//! use bridge_traits::error::Result;
//! use async_trait::async_trait;
//!
//! pub struct MyHttpClient {
//!     client: reqwest::Client,
//! }
//!
//! #[async_trait]
//! impl HttpClient for MyHttpClient {
//!     async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
//!         // Implementation
//!         todo!()
//!     }
//! }
//! ```

pub mod error;
pub mod http;
pub mod logging;

pub use error::BridgeError;

// Re-export commonly used types
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, RetryPolicy};
pub use logging::{LogEntry, LogLevel, LoggerSink};
