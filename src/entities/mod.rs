//! Invoicible entity types
//!
//! Each type fixes its coercion rules (the wire contract with the service)
//! and exposes typed accessors over its [`Record`](crate::resource::Record).

/// Implement [`Resource`](crate::resource::Resource) and `Display` for an
/// entity struct holding a `record` field.
macro_rules! resource {
    ($ty:ident, $schema:expr, |$record:ident| $ctor:expr) => {
        impl $crate::resource::Resource for $ty {
            const SCHEMA: &'static $crate::resource::Schema = $schema;

            fn from_record($record: $crate::resource::Record) -> Self {
                $ctor
            }

            fn record(&self) -> &$crate::resource::Record {
                &self.record
            }

            fn record_mut(&mut self) -> &mut $crate::resource::Record {
                &mut self.record
            }

            fn into_record(self) -> $crate::resource::Record {
                self.record
            }
        }

        impl ::std::fmt::Display for $ty {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::fmt::Display::fmt(&self.record, f)
            }
        }
    };
}

/// Getter/setter pairs for text fields
macro_rules! text_fields {
    ($($field:ident => $setter:ident),* $(,)?) => {
        $(
            pub fn $field(&self) -> Option<&str> {
                self.record.text(stringify!($field))
            }

            pub fn $setter(&mut self, value: impl Into<String>) {
                self.record.put(
                    stringify!($field),
                    $crate::resource::FieldValue::Text(value.into()),
                );
            }
        )*
    };
}

/// Getter/setter pairs for date fields
macro_rules! date_fields {
    ($($field:ident => $setter:ident),* $(,)?) => {
        $(
            pub fn $field(&self) -> Option<::chrono::NaiveDate> {
                self.record
                    .get(stringify!($field))
                    .and_then($crate::resource::FieldValue::as_date)
            }

            pub fn $setter(&mut self, value: ::chrono::NaiveDate) {
                self.record.put(
                    stringify!($field),
                    $crate::resource::FieldValue::Date(value),
                );
            }
        )*
    };
}

/// Read access, append and replace for the `items` list
macro_rules! item_list {
    () => {
        pub fn items(&self) -> &[$crate::resource::Item] {
            self.record
                .get("items")
                .and_then($crate::resource::FieldValue::as_items)
                .unwrap_or_default()
        }

        pub fn add_item(&mut self, item: $crate::resource::Item) {
            self.record.push_item("items", item);
        }

        pub fn set_items(&mut self, items: Vec<$crate::resource::Item>) {
            self.record
                .put("items", $crate::resource::FieldValue::Items(items));
        }
    };
}

mod comment;
mod customer;
mod estimate;
mod invoice;

pub use comment::{Comment, CommentManager};
pub use customer::{Customer, CustomerManager, CUSTOMERS_URI};
pub use estimate::{Estimate, EstimateManager, ESTIMATES_URI};
pub use invoice::{Invoice, InvoiceManager, INVOICES_URI};
