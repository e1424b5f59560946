//! Invoices

use super::comment::Comment;
use super::customer::Customer;
use crate::error::Result;
use crate::resource::{FieldType, Manager, Record, Related, RelatedCollection, Schema};

/// Collection uri for invoices
pub const INVOICES_URI: &str = "/api/1.0/invoices/";

/// An invoice with its line items, customer and comment thread
#[derive(Debug, Clone)]
pub struct Invoice {
    record: Record,
    customer: Related<Customer>,
    comments: RelatedCollection<Comment>,
}

resource!(
    Invoice,
    &Schema {
        name: "Invoice",
        collection_uri: Some(INVOICES_URI),
        fields: &[
            ("advance_amount", FieldType::Text),
            ("comments_uri", FieldType::Text),
            ("currency_symbol", FieldType::Text),
            ("customer_address", FieldType::Text),
            ("customer_name", FieldType::Text),
            ("customer_tax_id", FieldType::Text),
            ("customer_uri", FieldType::Text),
            ("date", FieldType::Date),
            ("date_raised", FieldType::Date),
            ("invoice_id", FieldType::Text),
            ("invoice_type", FieldType::Text),
            ("items", FieldType::Items),
            ("language", FieldType::Text),
            ("paid_so_far", FieldType::Text),
            ("payment_due", FieldType::Text),
            ("resource_uri", FieldType::Text),
            ("status", FieldType::Text),
            ("summary", FieldType::Text),
        ],
    },
    |record| Invoice {
        record,
        customer: Related::new("customer_uri"),
        comments: RelatedCollection::new("comments_uri"),
    }
);

impl Invoice {
    text_fields!(
        advance_amount => set_advance_amount,
        currency_symbol => set_currency_symbol,
        customer_address => set_customer_address,
        customer_name => set_customer_name,
        customer_tax_id => set_customer_tax_id,
        invoice_id => set_invoice_id,
        invoice_type => set_invoice_type,
        language => set_language,
        paid_so_far => set_paid_so_far,
        payment_due => set_payment_due,
        status => set_status,
        summary => set_summary,
    );

    date_fields!(date => set_date, date_raised => set_date_raised);

    item_list!();

    pub fn customer_uri(&self) -> Option<&str> {
        self.record.text("customer_uri")
    }

    pub fn comments_uri(&self) -> Option<&str> {
        self.record.text("comments_uri")
    }

    /// The invoiced customer, fetched from `customer_uri` on first access
    /// and refetched if `customer_uri` has changed since
    pub async fn customer(&mut self) -> Result<&Customer> {
        self.customer.get(&self.record).await
    }

    /// Assign a saved customer, updating `customer_uri`
    pub fn set_customer(&mut self, customer: Customer) -> Result<()> {
        self.customer.set(&mut self.record, customer)
    }

    /// Comments on this invoice
    pub fn comments(&mut self) -> Result<&Manager<Comment>> {
        self.comments.get(&self.record)
    }
}

pub type InvoiceManager = Manager<Invoice>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::test_support::offline_client;
    use crate::error::{Error, ValidationError};
    use crate::resource::{Item, Resource};
    use chrono::NaiveDate;
    use serde_json::json;

    fn saved_customer() -> Customer {
        Customer::from_json(
            offline_client(),
            &json!({"name": "Acme", "resource_uri": "/api/1.0/customers/7/"}),
        )
        .unwrap()
    }

    #[test]
    fn test_parse_invoice() {
        let invoice = Invoice::from_json(
            offline_client(),
            &json!({
                "invoice_id": "FV 1/2010",
                "date": "2010-03-01",
                "date_raised": "2010-03-02",
                "customer_uri": "/api/1.0/customers/7/",
                "comments_uri": "/api/1.0/invoices/3/comments/",
                "items": [{"amount": "10.00", "unit_price": "5.00", "unit": "h"}],
                "resource_uri": "/api/1.0/invoices/3/"
            }),
        )
        .unwrap();

        assert_eq!(invoice.invoice_id(), Some("FV 1/2010"));
        assert_eq!(invoice.date(), NaiveDate::from_ymd_opt(2010, 3, 1));
        assert_eq!(invoice.date_raised(), NaiveDate::from_ymd_opt(2010, 3, 2));
        assert_eq!(invoice.items().len(), 1);
        assert_eq!(invoice.items()[0].unit_price.as_deref(), Some("5.00"));
        assert_eq!(invoice.customer_uri(), Some("/api/1.0/customers/7/"));
    }

    #[test]
    fn test_malformed_date_is_rejected() {
        let err = Invoice::from_json(offline_client(), &json!({"date": "01.03.2010"})).unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::InvalidField { entity: "Invoice", ref field, .. })
                if field == "date"
        ));
    }

    #[test]
    fn test_null_date_keeps_existing_value() {
        let mut invoice =
            Invoice::from_json(offline_client(), &json!({"date": "2010-03-01"})).unwrap();

        invoice
            .parse(&json!({"date": null, "summary": "Updated"}))
            .unwrap();

        assert_eq!(invoice.date(), NaiveDate::from_ymd_opt(2010, 3, 1));
        assert_eq!(invoice.summary(), Some("Updated"));
        assert_eq!(invoice.to_json()["date"], "2010-03-01");
    }

    #[test]
    fn test_serialize_new_invoice() {
        let mut invoice = Invoice::new(offline_client());
        invoice.set_summary("Consulting");
        invoice.set_date(NaiveDate::from_ymd_opt(2010, 3, 1).unwrap());
        invoice.add_item(Item {
            amount: Some("10.00".into()),
            unit_price: Some("5.00".into()),
            ..Default::default()
        });

        let data = invoice.to_json();
        assert_eq!(data["date"], "2010-03-01");
        assert_eq!(data["summary"], "Consulting");
        assert_eq!(data["items"][0]["amount"], "10.00");
        assert!(data.get("resource_uri").is_none());
        assert!(data.get("customer").is_none());
    }

    #[test]
    fn test_assigning_unsaved_customer_fails() {
        let mut invoice = Invoice::new(offline_client());
        let mut customer = Customer::new(offline_client());
        customer.set_name("Not saved yet");

        let err = invoice.set_customer(customer).unwrap_err();
        assert!(matches!(err, Error::UnsavedRelation { target: "Customer" }));
        assert!(invoice.customer_uri().is_none());
    }

    #[tokio::test]
    async fn test_assigning_saved_customer_syncs_uri_and_cache() {
        let mut invoice = Invoice::new(offline_client());
        invoice.set_customer(saved_customer()).unwrap();

        assert_eq!(invoice.customer_uri(), Some("/api/1.0/customers/7/"));
        assert_eq!(invoice.to_json()["customer_uri"], "/api/1.0/customers/7/");

        // served from the cache, the offline client is never contacted
        let customer = invoice.customer().await.unwrap();
        assert_eq!(customer.name(), Some("Acme"));
    }

    #[tokio::test]
    async fn test_customer_without_uri_fails() {
        let mut invoice = Invoice::new(offline_client());
        let err = invoice.customer().await.unwrap_err();
        assert!(matches!(
            err,
            Error::MissingRelationUri {
                entity: "Invoice",
                field: "customer_uri"
            }
        ));
    }

    #[test]
    fn test_comments_follow_changed_uri() {
        let mut invoice = Invoice::from_json(
            offline_client(),
            &json!({"comments_uri": "/api/1.0/invoices/3/comments/"}),
        )
        .unwrap();
        invoice.comments().unwrap();

        invoice
            .parse(&json!({"comments_uri": "/api/1.0/invoices/4/comments/"}))
            .unwrap();
        assert_eq!(
            invoice.comments().unwrap().collection_uri(),
            "/api/1.0/invoices/4/comments/"
        );
    }

    #[test]
    fn test_comments_are_scoped_and_read_only() {
        let mut invoice = Invoice::from_json(
            offline_client(),
            &json!({"comments_uri": "/api/1.0/invoices/3/comments/"}),
        )
        .unwrap();

        let manager = invoice.comments().unwrap().clone();
        assert_eq!(manager.collection_uri(), "/api/1.0/invoices/3/comments/");

        let err = invoice.comments.set(manager).unwrap_err();
        assert!(matches!(
            err,
            Error::ReadOnlyRelation {
                field: "comments_uri"
            }
        ));
    }
}
