//! Customers

use crate::resource::{FieldType, Manager, Record, Schema};

/// Collection uri for customers
pub const CUSTOMERS_URI: &str = "/api/1.0/customers/";

/// A customer invoices and estimates are raised for
#[derive(Debug, Clone)]
pub struct Customer {
    record: Record,
}

resource!(
    Customer,
    &Schema {
        name: "Customer",
        collection_uri: Some(CUSTOMERS_URI),
        fields: &[
            ("address", FieldType::Text),
            ("contact", FieldType::Text),
            ("email", FieldType::Text),
            ("name", FieldType::Text),
            ("resource_uri", FieldType::Text),
            ("tax_id", FieldType::Text),
        ],
    },
    |record| Customer { record }
);

impl Customer {
    text_fields!(
        address => set_address,
        contact => set_contact,
        email => set_email,
        name => set_name,
        tax_id => set_tax_id,
    );
}

pub type CustomerManager = Manager<Customer>;
