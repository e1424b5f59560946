//! Resource mapping layer
//!
//! Maps typed local entities onto the service's JSON REST resources.
//!
//! # Architecture
//!
//! - [`fields`] - Per-entity coercion rules and typed field values
//! - [`record`] - Locator and field storage shared by every entity
//! - [`manager`] - Listing and creation under a collection uri
//! - [`relation`] - Lazily resolved single and collection relations
//!
//! An entity type is a struct wrapping a [`Record`] (plus any relation
//! fields) that implements [`Resource`]. The trait provides the lifecycle
//! operations; the entity adds typed accessors.
//!
//! # Example
//!
//! ```ignore
//! use invoicible::{Client, Customer, Manager, Resource};
//!
//! async fn rename_all(client: &Client) -> invoicible::Result<()> {
//!     for mut customer in Manager::<Customer>::new(client.clone())?.all().await? {
//!         customer.set_name("Renamed");
//!         customer.save().await?;
//!     }
//!     Ok(())
//! }
//! ```

pub mod fields;
pub mod manager;
pub mod record;
pub mod relation;

pub use fields::{FieldRule, FieldType, FieldValue, Item, DATETIME_FORMAT, DATE_FORMAT};
pub use manager::{Manager, Page};
pub use record::{ParseOptions, Record, RESOURCE_URI};
pub use relation::{Related, RelatedCollection};

use crate::api::client::Client;
use crate::error::Result;
use serde_json::Value;

/// Static description of an entity type
#[derive(Debug)]
pub struct Schema {
    /// Type name used in errors and logs
    pub name: &'static str,
    /// Listing/creation endpoint, if the type has a fixed one
    pub collection_uri: Option<&'static str>,
    /// Coercion rules, in serialization order
    pub fields: &'static [FieldRule],
}

/// A typed local representation of one remote resource
#[allow(async_fn_in_trait)]
pub trait Resource: Sized {
    const SCHEMA: &'static Schema;

    fn from_record(record: Record) -> Self;

    fn record(&self) -> &Record;

    fn record_mut(&mut self) -> &mut Record;

    fn into_record(self) -> Record;

    /// A new, never-persisted entity with no fields set
    fn new(client: Client) -> Self {
        Self::from_record(Record::new(Self::SCHEMA, client))
    }

    /// Build from an already-fetched payload without touching the network
    fn from_json(client: Client, json: &Value) -> Result<Self> {
        Record::from_json(Self::SCHEMA, client, json).map(Self::from_record)
    }

    /// Fetch the resource at `uri`
    async fn fetch(client: Client, uri: &str) -> Result<Self> {
        Record::fetch(Self::SCHEMA, client, uri)
            .await
            .map(Self::from_record)
    }

    fn resource_uri(&self) -> Option<&str> {
        self.record().resource_uri()
    }

    fn get(&self, name: &str) -> Option<&FieldValue> {
        self.record().get(name)
    }

    fn set(&mut self, name: &str, value: impl Into<FieldValue>) -> Result<()> {
        self.record_mut().set(name, value)
    }

    fn parse(&mut self, json: &Value) -> Result<()> {
        self.record_mut().parse(json)
    }

    fn to_json(&self) -> Value {
        self.record().to_json()
    }

    /// Create or update remotely, then absorb the server's response
    async fn save(&mut self) -> Result<()> {
        self.record_mut().save().await
    }

    /// Delete remotely; the entity is consumed
    async fn delete(self) -> Result<bool> {
        self.into_record().delete().await
    }
}
