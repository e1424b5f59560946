//! Invoicible API interaction module
//!
//! This is the transport side of the crate: request signing, the HTTP
//! connection and the client that issues GET/POST/PUT/DELETE calls.
//!
//! # Module Structure
//!
//! - [`auth`] - OAuth credentials and request signing
//! - [`client`] - Main client for making API requests
//! - [`http`] - HTTP utilities for REST API calls
//!
//! # Example
//!
//! ```ignore
//! use invoicible::api::{Client, OAuthCredentials};
//!
//! async fn example() -> invoicible::Result<()> {
//!     let credentials = OAuthCredentials::new("ck", "cs", "tk", "ts");
//!     let client = Client::new(credentials, "mycompany.centrumfaktur.pl")?;
//!     let customers = client.get_resources("/api/1.0/customers/", &[]).await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod http;

pub use auth::{HmacSha1Signer, OAuthCredentials, PlaintextSigner, RequestSigner};
pub use client::{Client, DEFAULT_DOMAIN};
