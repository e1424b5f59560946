//! Client library for the Invoicible invoicing API
//!
//! Customers, invoices, estimates and comments are mapped onto typed local
//! entities. Every read and write round-trips to the service; nothing is
//! persisted or cached beyond lazily resolved relations.
//!
//! # Example
//!
//! ```ignore
//! use invoicible::{Client, Invoice, InvoiceManager, Item, OAuthCredentials, Resource};
//!
//! async fn example() -> invoicible::Result<()> {
//!     let credentials = OAuthCredentials::new("ck", "cs", "tk", "ts");
//!     let client = Client::new(credentials, "mycompany.centrumfaktur.pl")?;
//!
//!     let mut invoice = Invoice::new(client.clone());
//!     invoice.set_summary("Consulting");
//!     invoice.add_item(Item {
//!         amount: Some("10.00".into()),
//!         unit_price: Some("5.00".into()),
//!         ..Default::default()
//!     });
//!     invoice.save().await?;
//!
//!     for invoice in InvoiceManager::new(client)?.all().await? {
//!         println!("{invoice}");
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod entities;
pub mod error;
pub mod resource;

pub use api::{Client, HmacSha1Signer, OAuthCredentials, PlaintextSigner, RequestSigner};
pub use config::Config;
pub use entities::*;
pub use error::{CoercionError, Error, Result, ValidationError};
pub use resource::{
    FieldType, FieldValue, Item, Manager, Page, ParseOptions, Record, Related, RelatedCollection,
    Resource, Schema,
};
