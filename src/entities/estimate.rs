//! Estimates

use super::comment::Comment;
use super::customer::Customer;
use crate::error::Result;
use crate::resource::{FieldType, Manager, Record, Related, RelatedCollection, Schema};

/// Collection uri for estimates
pub const ESTIMATES_URI: &str = "/api/1.0/estimates/";

#[derive(Debug, Clone)]
pub struct Estimate {
    record: Record,
    customer: Related<Customer>,
    comments: RelatedCollection<Comment>,
}

resource!(
    Estimate,
    &Schema {
        name: "Estimate",
        collection_uri: Some(ESTIMATES_URI),
        fields: &[
            ("currency_symbol", FieldType::Text),
            ("customer_uri", FieldType::Text),
            ("comments_uri", FieldType::Text),
            ("items", FieldType::Items),
            ("summary", FieldType::Text),
            ("status", FieldType::Text),
        ],
    },
    |record| Estimate {
        record,
        customer: Related::new("customer_uri"),
        comments: RelatedCollection::new("comments_uri"),
    }
);

impl Estimate {
    text_fields!(
        currency_symbol => set_currency_symbol,
        summary => set_summary,
        status => set_status,
    );

    item_list!();

    pub fn customer_uri(&self) -> Option<&str> {
        self.record.text("customer_uri")
    }

    pub fn comments_uri(&self) -> Option<&str> {
        self.record.text("comments_uri")
    }

    pub async fn customer(&mut self) -> Result<&Customer> {
        self.customer.get(&self.record).await
    }

    pub fn set_customer(&mut self, customer: Customer) -> Result<()> {
        self.customer.set(&mut self.record, customer)
    }

    pub fn comments(&mut self) -> Result<&Manager<Comment>> {
        self.comments.get(&self.record)
    }
}

pub type EstimateManager = Manager<Estimate>;
