//! Lazy relation fields
//!
//! Both flavors are backed by a uri field on the owning entity and cache
//! what they resolve. The cache is per owner instance and never expires.

use super::fields::FieldValue;
use super::manager::Manager;
use super::record::Record;
use super::Resource;
use crate::error::{Error, Result};

/// Reference to a single related entity, fetched on first access
#[derive(Debug, Clone)]
pub struct Related<T> {
    source_field: &'static str,
    cached: Option<T>,
}

impl<T: Resource> Related<T> {
    pub const fn new(source_field: &'static str) -> Self {
        Self {
            source_field,
            cached: None,
        }
    }

    pub fn source_field(&self) -> &'static str {
        self.source_field
    }

    /// The resolved entity, if it has been fetched or assigned. May lag
    /// behind the owner's uri field until the next `get`.
    pub fn cached(&self) -> Option<&T> {
        self.cached.as_ref()
    }

    /// Resolve through `owner`'s uri field. Fetches on first access and
    /// again only when the uri field no longer names the cached entity.
    pub async fn get(&mut self, owner: &Record) -> Result<&T> {
        let uri = owner.text(self.source_field);
        let target = match self.cached.take() {
            Some(target) if uri.is_some() && target.resource_uri() == uri => target,
            _ => {
                let uri = uri.ok_or(Error::MissingRelationUri {
                    entity: owner.schema().name,
                    field: self.source_field,
                })?;
                tracing::debug!(field = self.source_field, uri, "resolving relation");
                T::fetch(owner.client().clone(), uri).await?
            }
        };

        Ok(self.cached.insert(target))
    }

    /// Point `owner` at an already persisted entity
    pub fn set(&mut self, owner: &mut Record, target: T) -> Result<()> {
        let uri = target
            .resource_uri()
            .ok_or(Error::UnsavedRelation {
                target: T::SCHEMA.name,
            })?
            .to_string();

        owner.put(self.source_field, FieldValue::Text(uri));
        self.cached = Some(target);
        Ok(())
    }
}

/// Read-only reference to a related collection, resolved into a manager
#[derive(Debug, Clone)]
pub struct RelatedCollection<T> {
    source_field: &'static str,
    cached: Option<Manager<T>>,
}

impl<T: Resource> RelatedCollection<T> {
    pub const fn new(source_field: &'static str) -> Self {
        Self {
            source_field,
            cached: None,
        }
    }

    pub fn source_field(&self) -> &'static str {
        self.source_field
    }

    /// Manager scoped to `owner`'s sub-collection uri
    pub fn get(&mut self, owner: &Record) -> Result<&Manager<T>> {
        let uri = owner.text(self.source_field);
        let manager = match self.cached.take() {
            Some(manager) if uri == Some(manager.collection_uri()) => manager,
            _ => {
                let uri = uri.ok_or(Error::MissingRelationUri {
                    entity: owner.schema().name,
                    field: self.source_field,
                })?;
                Manager::scoped(owner.client().clone(), uri)
            }
        };

        Ok(self.cached.insert(manager))
    }

    /// Always fails: use the manager's `all`, `list` and `create` instead
    pub fn set(&mut self, _manager: Manager<T>) -> Result<()> {
        Err(Error::ReadOnlyRelation {
            field: self.source_field,
        })
    }
}
