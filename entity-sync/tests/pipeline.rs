#![cfg(feature = "test-utils")]

use config::shared::{CatalogConfig, EntityConfig};
use entity_sync::error::ErrorKind;
use entity_sync::test_utils::event::{
    account_opened, account_updated, customer_created, customer_created_event,
    customer_renamed_event, customer_updated,
};
use entity_sync::test_utils::pipeline::{create_memory_pipeline, create_memory_pipeline_with};
use entity_sync::test_utils::table::assert_row;
use entity_sync::types::{Cell, EventKind, RawEvent};
use serde_json::json;
use telemetry::tracing::init_test_tracing;

#[tokio::test(flavor = "multi_thread")]
async fn customer_is_created_then_renamed() {
    init_test_tracing();

    let (pipeline, destination) = create_memory_pipeline();

    pipeline
        .process_batch(
            "createcustomer3",
            &[customer_created("C1", " Alice ", Some("Alice@Example.com"))],
        )
        .await
        .unwrap();
    assert_row(
        &destination,
        "TM_CUSTOMERS3",
        "C1",
        &[
            ("name", Cell::from("Alice")),
            ("email", Cell::from("alice@example.com")),
            ("status", Cell::from("ACTIVE")),
        ],
    )
    .await;

    pipeline
        .process_batch("updatecustomer3", &[customer_updated("C1", Some("Alicia"), None)])
        .await
        .unwrap();
    assert_row(
        &destination,
        "TM_CUSTOMERS3",
        "C1",
        &[
            ("id", Cell::from("C1")),
            ("name", Cell::from("Alicia")),
            ("email", Cell::from("alice@example.com")),
            ("status", Cell::from("ACTIVE")),
        ],
    )
    .await;
}

#[tokio::test(flavor = "multi_thread")]
async fn account_lifecycle() {
    init_test_tracing();

    let (pipeline, destination) = create_memory_pipeline();

    let written = pipeline
        .process_events(vec![
            RawEvent::new("createaccount3", account_opened("A1", "C1", Some(10.456))),
            RawEvent::new("createaccount3", account_opened("A2", "C1", None)),
            RawEvent::new("updateaccount3", account_updated("A1", None, Some("frozen"))),
        ])
        .await
        .unwrap();

    assert_eq!(written, 3);
    assert_row(
        &destination,
        "ACCOUNT3",
        "A1",
        &[
            ("customer_id", Cell::from("C1")),
            ("account_type", Cell::from("CURRENT")),
            ("currency", Cell::from("EUR")),
            ("balance", Cell::F64(10.46)),
            ("status", Cell::from("FROZEN")),
        ],
    )
    .await;
    assert_row(
        &destination,
        "ACCOUNT3",
        "A2",
        &[("balance", Cell::F64(0.0)), ("status", Cell::from("OPEN"))],
    )
    .await;
}

#[tokio::test(flavor = "multi_thread")]
async fn consecutive_events_of_a_topic_form_one_batch() {
    init_test_tracing();

    let (pipeline, destination) = create_memory_pipeline();

    pipeline
        .process_events(vec![
            customer_created_event("C1", "Alice"),
            customer_created_event("C2", "Bob"),
            customer_renamed_event("C1", "Alicia"),
            customer_created_event("C3", "Carol"),
        ])
        .await
        .unwrap();

    assert_eq!(
        destination.writes().await,
        vec![
            ("TM_CUSTOMERS3".to_string(), EventKind::Create, 2),
            ("TM_CUSTOMERS3".to_string(), EventKind::Update, 1),
            ("TM_CUSTOMERS3".to_string(), EventKind::Create, 1),
        ]
    );
    assert_eq!(destination.table_row_counts().await["TM_CUSTOMERS3"], 3);
}

#[tokio::test(flavor = "multi_thread")]
async fn unknown_topic_stops_processing() {
    init_test_tracing();

    let (pipeline, destination) = create_memory_pipeline();

    let err = pipeline
        .process_events(vec![
            customer_created_event("C1", "Alice"),
            RawEvent::new("deletecustomer3", json!({"id": "C1"})),
            customer_renamed_event("C1", "Alicia"),
        ])
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::UnknownTopic);
    assert_row(
        &destination,
        "TM_CUSTOMERS3",
        "C1",
        &[("name", Cell::from("Alice"))],
    )
    .await;
}

#[tokio::test(flavor = "multi_thread")]
async fn invalid_payload_writes_nothing_for_its_batch() {
    init_test_tracing();

    let (pipeline, destination) = create_memory_pipeline();

    let err = pipeline
        .process_batch(
            "createcustomer3",
            &[customer_created("C1", "Alice", None), json!({"id": "C2"})],
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidData);
    assert!(destination.writes().await.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn unknown_account_status_is_rejected() {
    init_test_tracing();

    let (pipeline, destination) = create_memory_pipeline();

    let err = pipeline
        .process_batch("updateaccount3", &[account_updated("A1", None, Some("dormant"))])
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidData);
    assert!(destination.table("ACCOUNT3").await.unwrap().is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn pipeline_uses_configured_names() {
    init_test_tracing();

    let config = CatalogConfig {
        customer: EntityConfig::new("CUSTOMERS_TEST", "c.create", "c.update"),
        account: EntityConfig::new("ACCOUNTS_TEST", "a.create", "a.update"),
    };
    let (pipeline, destination) = create_memory_pipeline_with(&config);

    assert_eq!(pipeline.topics(), vec!["c.create", "c.update", "a.create", "a.update"]);

    pipeline
        .process_batch("c.create", &[customer_created("C1", "Alice", None)])
        .await
        .unwrap();
    assert!(destination.row("CUSTOMERS_TEST", "C1").await.is_some());
    assert!(destination.table("TM_CUSTOMERS3").await.unwrap().is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn shutdown_reaches_destination() {
    init_test_tracing();

    let (pipeline, _destination) = create_memory_pipeline();

    pipeline.shutdown().await.unwrap();
}
