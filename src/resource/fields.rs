//! Field coercion rules
//!
//! Each entity type declares a fixed, ordered table of `(name, FieldType)`
//! pairs. The same table drives parsing of incoming JSON and serialization
//! of outgoing JSON.

use crate::error::{json_kind, CoercionError};
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::{json, Value};
use std::fmt;

/// Wire format for datetime fields
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Wire format for date fields
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Semantic type of a declared field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// Primitive passthrough, kept as text
    Text,
    Date,
    DateTime,
    /// Nested list of line items
    Items,
}

impl FieldType {
    pub const fn name(self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Date => "date",
            FieldType::DateTime => "datetime",
            FieldType::Items => "item list",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One entry of an entity's rule table
pub type FieldRule = (&'static str, FieldType);

/// Typed value held by an entity for a declared field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Items(Vec<Item>),
}

impl FieldValue {
    /// The declared type this value satisfies
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldValue::Text(_) => FieldType::Text,
            FieldValue::Date(_) => FieldType::Date,
            FieldValue::DateTime(_) => FieldType::DateTime,
            FieldValue::Items(_) => FieldType::Items,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            FieldValue::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    pub fn as_items(&self) -> Option<&[Item]> {
        match self {
            FieldValue::Items(items) => Some(items),
            _ => None,
        }
    }

    /// Serialize to the JSON scalar (or list) the service expects
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Text(s) => Value::String(s.clone()),
            FieldValue::Date(d) => Value::String(d.format(DATE_FORMAT).to_string()),
            FieldValue::DateTime(dt) => Value::String(dt.format(DATETIME_FORMAT).to_string()),
            FieldValue::Items(items) => Value::Array(items.iter().map(Item::to_json).collect()),
        }
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(value: NaiveDate) -> Self {
        FieldValue::Date(value)
    }
}

impl From<NaiveDateTime> for FieldValue {
    fn from(value: NaiveDateTime) -> Self {
        FieldValue::DateTime(value)
    }
}

impl From<Vec<Item>> for FieldValue {
    fn from(value: Vec<Item>) -> Self {
        FieldValue::Items(value)
    }
}

impl FieldType {
    /// Coerce a raw JSON value into this type.
    ///
    /// Callers treat JSON `null` as a missing field before reaching here.
    pub fn coerce(self, raw: &Value) -> Result<FieldValue, CoercionError> {
        match self {
            FieldType::Text => coerce_text(raw).map(FieldValue::Text),
            FieldType::Date => {
                let s = expect_str(self, raw)?;
                NaiveDate::parse_from_str(s, DATE_FORMAT)
                    .map(FieldValue::Date)
                    .map_err(|source| CoercionError::Format {
                        value: s.to_string(),
                        format: DATE_FORMAT,
                        source,
                    })
            }
            FieldType::DateTime => {
                let s = expect_str(self, raw)?;
                NaiveDateTime::parse_from_str(s, DATETIME_FORMAT)
                    .map(FieldValue::DateTime)
                    .map_err(|source| CoercionError::Format {
                        value: s.to_string(),
                        format: DATETIME_FORMAT,
                        source,
                    })
            }
            FieldType::Items => {
                let Value::Array(elements) = raw else {
                    return Err(CoercionError::UnexpectedType {
                        expected: self,
                        found: json_kind(raw),
                    });
                };

                elements
                    .iter()
                    .enumerate()
                    .map(|(index, element)| {
                        Item::from_json(element).map_err(|e| CoercionError::Item {
                            index,
                            source: Box::new(e),
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()
                    .map(FieldValue::Items)
            }
        }
    }
}

fn expect_str(expected: FieldType, raw: &Value) -> Result<&str, CoercionError> {
    raw.as_str().ok_or(CoercionError::UnexpectedType {
        expected,
        found: json_kind(raw),
    })
}

/// Scalars are stringified; containers are rejected
fn coerce_text(raw: &Value) -> Result<String, CoercionError> {
    match raw {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(CoercionError::UnexpectedType {
            expected: FieldType::Text,
            found: json_kind(other),
        }),
    }
}

/// Invoice/estimate line item.
///
/// Owned by its containing entity's item list; never addressed or saved
/// on its own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Item {
    pub amount: Option<String>,
    pub description: Option<String>,
    pub product_id: Option<String>,
    pub tax_rate: Option<String>,
    pub unit: Option<String>,
    pub unit_price: Option<String>,
}

impl Item {
    pub const FIELDS: [&'static str; 6] = [
        "amount",
        "description",
        "product_id",
        "tax_rate",
        "unit",
        "unit_price",
    ];

    /// Build an item from one element of an `items` array.
    ///
    /// Undeclared keys are ignored, `null` leaves the field unset.
    pub fn from_json(raw: &Value) -> Result<Self, CoercionError> {
        let Value::Object(map) = raw else {
            return Err(CoercionError::UnexpectedType {
                expected: FieldType::Items,
                found: json_kind(raw),
            });
        };

        let text = |key: &str| -> Result<Option<String>, CoercionError> {
            match map.get(key) {
                None | Some(Value::Null) => Ok(None),
                Some(value) => coerce_text(value).map(Some),
            }
        };

        Ok(Self {
            amount: text("amount")?,
            description: text("description")?,
            product_id: text("product_id")?,
            tax_rate: text("tax_rate")?,
            unit: text("unit")?,
            unit_price: text("unit_price")?,
        })
    }

    /// Flat JSON record; unset fields go out as `null`
    pub fn to_json(&self) -> Value {
        json!({
            "amount": self.amount,
            "description": self.description,
            "product_id": self.product_id,
            "tax_rate": self.tax_rate,
            "unit": self.unit,
            "unit_price": self.unit_price,
        })
    }
}

/// Look up a field's declared type in a rule table
pub fn rule_for(rules: &[FieldRule], name: &str) -> Option<(&'static str, FieldType)> {
    rules.iter().copied().find(|(field, _)| *field == name)
}
