//! Routing of source events to the entity they belong to.
//!
//! A [`SyncPipeline`] owns the specs of every entity kept in sync and a destination. Events are
//! routed by topic to their entity and event kind, decoded with the stream definition of that
//! topic, transformed by the entity's aggregations and upserted into its sink table.

use std::collections::HashMap;

use serde_json::Value;
use tracing::{debug, info};

use crate::bail;
use crate::conversions::json::decode_payloads;
use crate::destination::Destination;
use crate::entity::EntitySyncSpec;
use crate::error::{ErrorKind, SyncResult};
use crate::types::{EventKind, RawEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Route {
    spec: usize,
    kind: EventKind,
}

#[derive(Debug)]
pub struct SyncPipeline<D> {
    specs: Vec<EntitySyncSpec>,
    routes: HashMap<String, Route>,
    destination: D,
}

impl<D> SyncPipeline<D>
where
    D: Destination + Send + Sync,
{
    /// Creates a pipeline for `specs`.
    ///
    /// Fails with [`ErrorKind::ConfigError`] when two specs read the same topic or write the same
    /// table.
    pub fn new(specs: Vec<EntitySyncSpec>, destination: D) -> SyncResult<Self> {
        let mut routes = HashMap::new();
        let mut tables = HashMap::new();

        for (index, spec) in specs.iter().enumerate() {
            if let Some(previous) = tables.insert(spec.table_name(), index) {
                bail!(
                    ErrorKind::ConfigError,
                    "Two entities write the same table",
                    format!(
                        "table `{}` is used by entity {previous} and entity {index}",
                        spec.table_name()
                    )
                );
            }

            for (topic, kind) in spec
                .topic_names()
                .into_iter()
                .zip([EventKind::Create, EventKind::Update])
            {
                let route = Route { spec: index, kind };
                if let Some(previous) = routes.insert(topic.to_string(), route) {
                    bail!(
                        ErrorKind::ConfigError,
                        "Two entities read the same topic",
                        format!(
                            "topic `{topic}` is read by tables `{}` and `{}`",
                            specs[previous.spec].table_name(),
                            spec.table_name()
                        )
                    );
                }
            }
        }

        info!(
            entities = specs.len(),
            destination = D::name(),
            "created sync pipeline"
        );

        Ok(Self {
            specs,
            routes,
            destination,
        })
    }

    pub fn specs(&self) -> &[EntitySyncSpec] {
        &self.specs
    }

    pub fn destination(&self) -> &D {
        &self.destination
    }

    /// Returns every topic the pipeline reads, entity by entity, insert topic first.
    pub fn topics(&self) -> Vec<&str> {
        self.specs.iter().flat_map(EntitySyncSpec::topic_names).collect()
    }

    /// Returns the comma separated list of every topic, as handed to a source subscription.
    pub fn subscription(&self) -> String {
        self.topics().join(",")
    }

    /// Returns the spec and event kind `topic` is routed to.
    pub fn route(&self, topic: &str) -> Option<(&EntitySyncSpec, EventKind)> {
        self.routes
            .get(topic)
            .map(|route| (&self.specs[route.spec], route.kind))
    }

    /// Decodes, aggregates and writes a batch of payloads published on `topic`.
    ///
    /// Returns the number of rows written. Fails with [`ErrorKind::UnknownTopic`] when no entity
    /// reads `topic`. Nothing is written when any payload of the batch fails.
    pub async fn process_batch(&self, topic: &str, payloads: &[Value]) -> SyncResult<usize> {
        let Some((spec, kind)) = self.route(topic) else {
            bail!(
                ErrorKind::UnknownTopic,
                "Event topic is not subscribed",
                format!(
                    "topic `{topic}` is not one of [{}]",
                    self.subscription()
                )
            );
        };

        if payloads.is_empty() {
            return Ok(0);
        }

        let dataset = decode_payloads(spec.stream(kind), payloads)?;
        debug!(topic, %kind, rows = dataset.len(), "decoded event batch");

        let dataset = spec.apply_aggregations(kind, dataset)?;
        let rows = dataset.len();

        self.destination.write_rows(spec.sink(), kind, dataset).await?;

        info!(
            topic,
            table = spec.table_name(),
            %kind,
            rows,
            "processed event batch"
        );

        Ok(rows)
    }

    /// Processes events in order.
    ///
    /// Consecutive events of the same topic are processed as one batch. Processing stops at the
    /// first failing batch, leaving earlier batches written. Returns the number of rows written.
    pub async fn process_events(&self, events: Vec<RawEvent>) -> SyncResult<usize> {
        let mut written = 0;

        for (topic, payloads) in group_by_topic(events) {
            written += self.process_batch(&topic, &payloads).await?;
        }

        Ok(written)
    }

    /// Propagates the shutdown signal to the destination.
    pub async fn shutdown(&self) -> SyncResult<()> {
        info!("shutting down sync pipeline");

        self.destination.shutdown().await
    }
}

/// Splits events into runs of consecutive events sharing a topic.
fn group_by_topic(events: Vec<RawEvent>) -> Vec<(String, Vec<Value>)> {
    let mut runs: Vec<(String, Vec<Value>)> = Vec::new();

    for event in events {
        match runs.last_mut() {
            Some((topic, payloads)) if *topic == event.topic => payloads.push(event.payload),
            _ => runs.push((event.topic, vec![event.payload])),
        }
    }

    runs
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::destination::memory::MemoryDestination;
    use crate::entity::catalog;
    use config::shared::CatalogConfig;

    fn pipeline() -> SyncPipeline<MemoryDestination> {
        let specs = catalog::build_all(&CatalogConfig::default()).unwrap();
        SyncPipeline::new(specs, MemoryDestination::new()).unwrap()
    }

    #[test]
    fn group_by_topic_keeps_runs_in_order() {
        let runs = group_by_topic(vec![
            RawEvent::new("a", json!(1)),
            RawEvent::new("a", json!(2)),
            RawEvent::new("b", json!(3)),
            RawEvent::new("a", json!(4)),
        ]);

        assert_eq!(
            runs,
            vec![
                ("a".to_string(), vec![json!(1), json!(2)]),
                ("b".to_string(), vec![json!(3)]),
                ("a".to_string(), vec![json!(4)]),
            ]
        );
    }

    #[test]
    fn subscription_lists_every_topic() {
        assert_eq!(
            pipeline().subscription(),
            "createcustomer3,updatecustomer3,createaccount3,updateaccount3"
        );
    }

    #[test]
    fn shared_table_is_rejected() {
        let config = CatalogConfig::default();
        let first = catalog::customer(&config.customer).unwrap();
        let mut renamed = config.customer.clone();
        renamed.insert_topic = "createcustomer4".to_string();
        renamed.update_topic = "updatecustomer4".to_string();
        let second = catalog::customer(&renamed).unwrap();

        let err = SyncPipeline::new(vec![first, second], MemoryDestination::new()).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ConfigError);
        assert_eq!(err.description(), "Two entities write the same table");
    }

    #[tokio::test]
    async fn unknown_topic_is_rejected() {
        let err = pipeline()
            .process_batch("deletecustomer3", &[json!({"id": "C1"})])
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::UnknownTopic);
    }

    #[tokio::test]
    async fn empty_batch_writes_nothing() {
        let pipeline = pipeline();

        assert_eq!(pipeline.process_batch("createcustomer3", &[]).await.unwrap(), 0);
        assert!(pipeline.destination().writes().await.is_empty());
    }
}
