//! Record: the state shared by every entity type
//!
//! A record owns the entity's resource locator, its typed field values and
//! the client used to talk to the service. Entity types wrap a record and
//! add their relation fields and typed accessors on top.

use super::fields::{rule_for, FieldType, FieldValue, Item};
use super::Schema;
use crate::api::client::Client;
use crate::error::{json_kind, CoercionError, Error, Result, ValidationError};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Name of the identity field carried by persisted resources
pub const RESOURCE_URI: &str = "resource_uri";

/// Options controlling how incoming payloads are parsed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Log every declared field missing from a payload at debug level
    pub report_missing_fields: bool,
}

/// Locator, field values and client of a single remote resource
#[derive(Clone)]
pub struct Record {
    schema: &'static Schema,
    client: Client,
    values: BTreeMap<&'static str, FieldValue>,
}

impl Record {
    /// An empty, never-persisted record
    pub fn new(schema: &'static Schema, client: Client) -> Self {
        Self {
            schema,
            client,
            values: BTreeMap::new(),
        }
    }

    /// Parse an already-fetched payload, no network call
    pub fn from_json(schema: &'static Schema, client: Client, json: &Value) -> Result<Self> {
        let mut record = Self::new(schema, client);
        record.parse(json)?;
        Ok(record)
    }

    /// Fetch the resource at `uri` and parse it
    pub async fn fetch(schema: &'static Schema, client: Client, uri: &str) -> Result<Self> {
        let json = client.get_resources(uri, &[]).await?;
        let mut record = Self::new(schema, client);
        record
            .values
            .insert(RESOURCE_URI, FieldValue::Text(uri.to_string()));
        record.parse(&json)?;
        Ok(record)
    }

    pub fn schema(&self) -> &'static Schema {
        self.schema
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Resource locator, absent until the entity has been persisted
    pub fn resource_uri(&self) -> Option<&str> {
        self.text(RESOURCE_URI)
    }

    pub fn is_persisted(&self) -> bool {
        self.resource_uri().is_some()
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    /// Text value of a field, if set
    pub fn text(&self, name: &str) -> Option<&str> {
        self.values.get(name).and_then(FieldValue::as_text)
    }

    /// Assign a declared field, checking the value against its rule
    pub fn set(&mut self, name: &str, value: impl Into<FieldValue>) -> Result<()> {
        let value = value.into();
        let (field, ty) = self.rule(name).ok_or_else(|| ValidationError::UnknownField {
            entity: self.schema.name,
            field: name.to_string(),
        })?;

        if value.field_type() != ty {
            return Err(ValidationError::InvalidField {
                entity: self.schema.name,
                field: name.to_string(),
                source: CoercionError::UnexpectedType {
                    expected: ty,
                    found: value.field_type().name(),
                },
            }
            .into());
        }

        self.values.insert(field, value);
        Ok(())
    }

    /// Clear a field so it is skipped on serialization
    pub fn unset(&mut self, name: &str) -> Option<FieldValue> {
        self.values.remove(name)
    }

    /// Insert without rule checks; callers pass a declared name and matching type
    pub(crate) fn put(&mut self, name: &'static str, value: FieldValue) {
        self.values.insert(name, value);
    }

    /// Append a line item to an item-list field
    pub(crate) fn push_item(&mut self, name: &'static str, item: Item) {
        match self
            .values
            .entry(name)
            .or_insert_with(|| FieldValue::Items(Vec::new()))
        {
            FieldValue::Items(items) => items.push(item),
            other => *other = FieldValue::Items(vec![item]),
        }
    }

    /// Identity is resolvable even when an entity type does not declare it
    fn rule(&self, name: &str) -> Option<(&'static str, FieldType)> {
        rule_for(self.schema.fields, name)
            .or_else(|| (name == RESOURCE_URI).then_some((RESOURCE_URI, FieldType::Text)))
    }

    /// Parse using the options carried by the client
    pub fn parse(&mut self, json: &Value) -> Result<()> {
        let options = self.client.parse_options();
        self.parse_with(json, options)
    }

    /// Coerce every declared field present in `json` and assign them.
    ///
    /// All-or-nothing: a single bad field aborts the parse and leaves the
    /// record untouched. Absent and `null` fields are skipped, undeclared
    /// keys are ignored.
    pub fn parse_with(&mut self, json: &Value, options: ParseOptions) -> Result<()> {
        let Value::Object(data) = json else {
            return Err(ValidationError::NotAnObject {
                entity: self.schema.name,
                found: json_kind(json),
            }
            .into());
        };

        let mut parsed = Vec::with_capacity(self.schema.fields.len() + 1);
        for &(name, ty) in self.schema.fields {
            let raw = match data.get(name) {
                None | Some(Value::Null) => {
                    if options.report_missing_fields {
                        tracing::debug!(entity = self.schema.name, field = name, "missing key");
                    }
                    continue;
                }
                Some(raw) => raw,
            };

            let value = ty.coerce(raw).map_err(|source| ValidationError::InvalidField {
                entity: self.schema.name,
                field: name.to_string(),
                source,
            })?;
            parsed.push((name, value));
        }

        if rule_for(self.schema.fields, RESOURCE_URI).is_none() {
            if let Some(Value::String(uri)) = data.get(RESOURCE_URI) {
                parsed.push((RESOURCE_URI, FieldValue::Text(uri.clone())));
            }
        }

        self.values.extend(parsed);
        Ok(())
    }

    /// Declared fields that are currently set, in rule order
    pub fn to_json(&self) -> Value {
        let mut data = Map::new();
        for (name, _) in self.schema.fields {
            if let Some(value) = self.values.get(name) {
                data.insert((*name).to_string(), value.to_json());
            }
        }
        Value::Object(data)
    }

    /// Update in place when persisted, otherwise create under the
    /// collection uri; the response is parsed back into the record.
    pub async fn save(&mut self) -> Result<()> {
        let body = self.to_json();

        let response = match self.resource_uri() {
            Some(uri) => {
                tracing::debug!(entity = self.schema.name, uri, "updating resource");
                self.client.update_resource(uri, &body).await?
            }
            None => {
                let collection = self.schema.collection_uri.ok_or(Error::NoCollection {
                    entity: self.schema.name,
                })?;
                tracing::debug!(entity = self.schema.name, collection, "creating resource");
                self.client.create_resource(collection, &body).await?
            }
        };

        self.parse(&response)
    }

    /// Delete the remote resource. The record is consumed, it is stale
    /// once the request has been issued.
    pub async fn delete(self) -> Result<bool> {
        let uri = self.resource_uri().ok_or(Error::MissingLocator {
            entity: self.schema.name,
        })?;
        tracing::debug!(entity = self.schema.name, uri, "deleting resource");
        self.client.delete_resource(uri).await
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(self.schema.name)
            .field("resource_uri", &self.resource_uri())
            .field("values", &self.values)
            .finish()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}
