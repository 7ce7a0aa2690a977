use serde_json::{Value, json};

use crate::types::RawEvent;
use config::shared::CatalogConfig;

/// Payload of a customer creation event.
pub fn customer_created(id: &str, name: &str, email: Option<&str>) -> Value {
    let mut payload = json!({"id": id, "name": name});
    if let Some(email) = email {
        payload["contact"] = json!({"email": email});
    }

    payload
}

/// Payload of a customer update event carrying only the given fields.
pub fn customer_updated(id: &str, name: Option<&str>, email: Option<&str>) -> Value {
    let mut payload = json!({"id": id});
    if let Some(name) = name {
        payload["name"] = json!(name);
    }
    if let Some(email) = email {
        payload["email"] = json!(email);
    }

    payload
}

/// Payload of an account opening event.
pub fn account_opened(account_id: &str, customer_id: &str, balance: Option<f64>) -> Value {
    let mut payload = json!({"account_id": account_id, "customer_id": customer_id});
    if let Some(balance) = balance {
        payload["balance"] = json!(balance);
    }

    payload
}

/// Payload of an account update event.
pub fn account_updated(account_id: &str, balance: Option<f64>, status: Option<&str>) -> Value {
    json!({"account_id": account_id, "balance": balance, "status": status})
}

/// Wraps a payload in a raw event of the default customer create topic.
pub fn customer_created_event(id: &str, name: &str) -> RawEvent {
    RawEvent::new(
        CatalogConfig::DEFAULT_CUSTOMER_INSERT_TOPIC,
        customer_created(id, name, None),
    )
}

/// Wraps a payload in a raw event of the default customer update topic.
pub fn customer_renamed_event(id: &str, name: &str) -> RawEvent {
    RawEvent::new(
        CatalogConfig::DEFAULT_CUSTOMER_UPDATE_TOPIC,
        customer_updated(id, Some(name), None),
    )
}
