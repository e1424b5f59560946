//! Collection manager
//!
//! Lists and creates entities under a collection uri. Holds nothing but
//! the uri and the client; fetched entities are never cached.

use super::Resource;
use crate::api::client::Client;
use crate::error::{json_kind, Error, Result, ValidationError};
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;

/// One page of a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub offset: u32,
    pub limit: u32,
}

impl Page {
    pub const DEFAULT_LIMIT: u32 = 20;

    pub const fn new(offset: u32, limit: u32) -> Self {
        Self { offset, limit }
    }

    /// The page following this one; the offset saturates at `u32::MAX`
    pub const fn next(self) -> Self {
        Self {
            offset: self.offset.saturating_add(self.limit),
            limit: self.limit,
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(0, Self::DEFAULT_LIMIT)
    }
}

/// Entity collection manager for resources of type `T`
pub struct Manager<T> {
    client: Client,
    collection_uri: String,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Resource> Manager<T> {
    /// Manager for the type's own collection uri
    pub fn new(client: Client) -> Result<Self> {
        let uri = T::SCHEMA.collection_uri.ok_or(Error::NoCollection {
            entity: T::SCHEMA.name,
        })?;
        Ok(Self::scoped(client, uri))
    }

    /// Manager for an explicit collection uri, e.g. a sub-collection
    pub fn scoped(client: Client, collection_uri: impl Into<String>) -> Self {
        Self {
            client,
            collection_uri: collection_uri.into(),
            _entity: PhantomData,
        }
    }

    pub fn collection_uri(&self) -> &str {
        &self.collection_uri
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Fetch the whole listing
    pub async fn all(&self) -> Result<Vec<T>> {
        let listing = self.client.get_resources(&self.collection_uri, &[]).await?;
        self.build(listing)
    }

    /// Fetch one page of the listing
    pub async fn list(&self, page: Page) -> Result<Vec<T>> {
        let query = [
            ("offset", page.offset.to_string()),
            ("limit", page.limit.to_string()),
        ];
        let listing = self.client.get_resources(&self.collection_uri, &query).await?;
        self.build(listing)
    }

    /// Create a resource from raw field values, bypassing the coercion
    /// rules, and wrap the server's response
    pub async fn create(&self, fields: Value) -> Result<T> {
        let response = self
            .client
            .create_resource(&self.collection_uri, &fields)
            .await?;
        T::from_json(self.client.clone(), &response)
    }

    /// One entity per listing element, in listing order
    fn build(&self, listing: Value) -> Result<Vec<T>> {
        let elements = match listing {
            Value::Array(elements) => elements,
            Value::Object(mut envelope) => match envelope.remove("objects") {
                Some(Value::Array(elements)) => elements,
                _ => {
                    return Err(ValidationError::UnexpectedListing {
                        path: self.collection_uri.clone(),
                        found: "object",
                    }
                    .into())
                }
            },
            other => {
                return Err(ValidationError::UnexpectedListing {
                    path: self.collection_uri.clone(),
                    found: json_kind(&other),
                }
                .into())
            }
        };

        tracing::debug!(
            entity = T::SCHEMA.name,
            count = elements.len(),
            "building listing"
        );

        elements
            .iter()
            .map(|element| T::from_json(self.client.clone(), element))
            .collect()
    }
}

impl<T> Clone for Manager<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            collection_uri: self.collection_uri.clone(),
            _entity: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Manager<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Manager")
            .field("collection_uri", &self.collection_uri)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_page() {
        assert_eq!(Page::default(), Page::new(0, 20));
    }

    #[test]
    fn test_next_page() {
        assert_eq!(Page::new(0, 20).next(), Page::new(20, 20));
        assert_eq!(Page::new(40, 10).next().next(), Page::new(60, 10));
    }

    #[test]
    fn test_next_page_saturates() {
        assert_eq!(Page::new(u32::MAX - 5, 20).next(), Page::new(u32::MAX, 20));
        assert_eq!(Page::new(u32::MAX, 20).next(), Page::new(u32::MAX, 20));
    }
}
