//! Property-based tests using proptest
//!
//! These tests cover field coercion, entity parsing and log sanitizing
//! with randomized inputs.

use chrono::{NaiveDate, NaiveDateTime};
use invoicible::api::http::{sanitize_for_log, MAX_LOG_BODY_LENGTH};
use invoicible::resource::{DATETIME_FORMAT, DATE_FORMAT};
use invoicible::{
    Client, Customer, FieldType, FieldValue, Invoice, Item, OAuthCredentials, PlaintextSigner,
    Resource,
};
use proptest::prelude::*;
use serde_json::{json, Value};
use std::sync::Arc;

fn offline_client() -> Client {
    let signer = PlaintextSigner::new(OAuthCredentials::new("ck", "cs", "tk", "ts"));
    Client::with_base_url(Arc::new(signer), "http://127.0.0.1:9/").unwrap()
}

fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (1900i32..2100, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

fn arb_datetime() -> impl Strategy<Value = NaiveDateTime> {
    (arb_date(), 0u32..24, 0u32..60, 0u32..60)
        .prop_map(|(date, h, m, s)| date.and_hms_opt(h, m, s).unwrap())
}

fn arb_text() -> impl Strategy<Value = Option<String>> {
    prop::option::of("[a-zA-Z0-9 .,/-]{0,24}")
}

fn arb_item() -> impl Strategy<Value = Item> {
    (
        arb_text(),
        arb_text(),
        arb_text(),
        arb_text(),
        arb_text(),
        arb_text(),
    )
        .prop_map(
            |(amount, description, product_id, tax_rate, unit, unit_price)| Item {
                amount,
                description,
                product_id,
                tax_rate,
                unit,
                unit_price,
            },
        )
}

proptest! {
    /// Dates in wire format always coerce back to the same date
    #[test]
    fn date_wire_format_is_accepted(date in arb_date()) {
        let raw = json!(date.format(DATE_FORMAT).to_string());
        let value = FieldType::Date.coerce(&raw).unwrap();
        prop_assert_eq!(value.as_date(), Some(date));
        prop_assert_eq!(value.to_json(), raw);
    }

    #[test]
    fn datetime_wire_format_is_accepted(datetime in arb_datetime()) {
        let raw = json!(datetime.format(DATETIME_FORMAT).to_string());
        let value = FieldType::DateTime.coerce(&raw).unwrap();
        prop_assert_eq!(value.as_datetime(), Some(datetime));
    }

    /// Free text never passes as a date
    #[test]
    fn non_date_strings_are_rejected(s in "[a-z ]{0,20}") {
        prop_assert!(FieldType::Date.coerce(&json!(s)).is_err());
        prop_assert!(FieldType::DateTime.coerce(&json!(s)).is_err());
    }

    /// A date alone is not a datetime
    #[test]
    fn bare_date_is_not_a_datetime(date in arb_date()) {
        let raw = json!(date.format(DATE_FORMAT).to_string());
        prop_assert!(FieldType::DateTime.coerce(&raw).is_err());
    }

    /// Numbers from the service are kept as their text form
    #[test]
    fn numbers_coerce_to_text(n in any::<i64>()) {
        let value = FieldType::Text.coerce(&json!(n)).unwrap();
        prop_assert_eq!(value, FieldValue::Text(n.to_string()));
    }

    #[test]
    fn items_survive_serialization(items in prop::collection::vec(arb_item(), 0..8)) {
        let raw = Value::Array(items.iter().map(Item::to_json).collect());
        let value = FieldType::Items.coerce(&raw).unwrap();
        prop_assert_eq!(value.as_items(), Some(items.as_slice()));
    }

    /// A bad date anywhere in the payload leaves the entity untouched
    #[test]
    fn parse_is_all_or_nothing(
        summary in "[a-zA-Z ]{1,20}",
        bad_date in "[a-z]{1,10}",
    ) {
        let mut invoice = Invoice::from_json(
            offline_client(),
            &json!({"summary": "before", "date": "2010-03-01"}),
        )
        .unwrap();
        let before = invoice.to_json();

        let result = invoice
            .record_mut()
            .parse(&json!({"summary": summary, "date": bad_date}));

        prop_assert!(result.is_err());
        prop_assert_eq!(invoice.to_json(), before);
    }

    /// Serializing a parsed customer reproduces its declared fields
    #[test]
    fn customer_round_trip(
        name in "[a-zA-Z ]{1,20}",
        email in "[a-z]{1,8}@[a-z]{1,8}\\.test",
        tax_id in "PL[0-9]{10}",
    ) {
        let raw = json!({
            "name": name,
            "email": email,
            "tax_id": tax_id,
            "resource_uri": "/api/1.0/customers/7/"
        });
        let customer = Customer::from_json(offline_client(), &raw).unwrap();
        prop_assert_eq!(customer.to_json(), raw);
    }

    /// Keys outside the rule table are never serialized
    #[test]
    fn undeclared_keys_are_dropped(key in "x_[a-z]{1,10}", name in "[a-zA-Z ]{1,20}") {
        let customer = Customer::from_json(
            offline_client(),
            &json!({"name": name.clone(), (key.clone()): "ignored"}),
        )
        .unwrap();

        let data = customer.to_json();
        prop_assert!(data.get(&key).is_none());
        prop_assert_eq!(data["name"].as_str(), Some(name.as_str()));
    }

    /// Sanitizing never panics and keeps log lines bounded
    #[test]
    fn sanitize_is_bounded(body in any::<String>()) {
        let sanitized = sanitize_for_log(&body);
        prop_assert!(!sanitized.contains('\n'));
        prop_assert!(sanitized.chars().count() <= MAX_LOG_BODY_LENGTH + 64);
    }
}
