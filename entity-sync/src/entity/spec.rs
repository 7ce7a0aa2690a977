use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::aggregation::{SchemaAggregation, TopicAggregation};
use crate::bail;
use crate::error::{ErrorKind, SyncResult};
use crate::stream::{ColumnProjection, StreamDefinition};
use crate::types::{Cell, Dataset, EventKind, EventSchema};

/// Sink table an entity is persisted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkTable {
    /// Name of the table.
    pub name: String,
    /// Column uniquely identifying a row. Set on creation and never changed afterwards.
    pub row_key_column: String,
    /// Columns written when an entity is created, in table order.
    pub insert_columns: Vec<String>,
    /// Columns merged when an entity is updated.
    pub update_columns: Vec<String>,
}

impl SinkTable {
    pub fn new(
        name: impl Into<String>,
        row_key_column: impl Into<String>,
        insert_columns: &[&str],
        update_columns: &[&str],
    ) -> Self {
        Self {
            name: name.into(),
            row_key_column: row_key_column.into(),
            insert_columns: insert_columns.iter().map(|c| c.to_string()).collect(),
            update_columns: update_columns.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// Everything needed to keep one entity type in sync between its two event streams and its sink
/// table.
///
/// A spec binds the create and update streams of an entity to the sink table and to the two
/// aggregation strategies transforming decoded events into sink rows. It is validated once, when
/// built, and is immutable afterwards so that it can be shared freely between tasks.
#[derive(Clone)]
pub struct EntitySyncSpec {
    sink: SinkTable,
    insert_stream: StreamDefinition,
    update_stream: StreamDefinition,
    schema_aggregation: Arc<dyn SchemaAggregation>,
    topic_aggregation: Arc<dyn TopicAggregation>,
}

impl EntitySyncSpec {
    /// Builds and validates a spec.
    ///
    /// Fails with [`ErrorKind::ConfigError`] when the table name or row key is empty, the row
    /// key is missing from a column list, a column list has duplicates, both streams read the
    /// same topic or a stream definition is invalid.
    pub fn new(
        sink: SinkTable,
        insert_stream: StreamDefinition,
        update_stream: StreamDefinition,
        schema_aggregation: Arc<dyn SchemaAggregation>,
        topic_aggregation: Arc<dyn TopicAggregation>,
    ) -> SyncResult<Self> {
        validate_sink(&sink)?;

        insert_stream.validate()?;
        update_stream.validate()?;

        if insert_stream.topic_name() == update_stream.topic_name() {
            bail!(
                ErrorKind::ConfigError,
                "Insert and update streams read the same topic",
                format!(
                    "table `{}` uses topic `{}` for both streams",
                    sink.name,
                    insert_stream.topic_name()
                )
            );
        }

        Ok(Self {
            sink,
            insert_stream,
            update_stream,
            schema_aggregation,
            topic_aggregation,
        })
    }

    pub fn sink(&self) -> &SinkTable {
        &self.sink
    }

    pub fn table_name(&self) -> &str {
        &self.sink.name
    }

    pub fn row_key_column(&self) -> &str {
        &self.sink.row_key_column
    }

    pub fn insert_column_names(&self) -> &[String] {
        &self.sink.insert_columns
    }

    pub fn update_column_names(&self) -> &[String] {
        &self.sink.update_columns
    }

    pub fn insert_stream(&self) -> &StreamDefinition {
        &self.insert_stream
    }

    pub fn update_stream(&self) -> &StreamDefinition {
        &self.update_stream
    }

    pub fn schema_aggregation(&self) -> &Arc<dyn SchemaAggregation> {
        &self.schema_aggregation
    }

    pub fn topic_aggregation(&self) -> &Arc<dyn TopicAggregation> {
        &self.topic_aggregation
    }

    /// Returns the subscription string of the entity: the insert topic and the update topic,
    /// comma separated, in that order.
    pub fn topics(&self) -> String {
        self.topic_names().join(",")
    }

    /// Returns the insert topic and the update topic, in that order.
    pub fn topic_names(&self) -> [&str; 2] {
        [
            self.insert_stream.topic_name(),
            self.update_stream.topic_name(),
        ]
    }

    /// Returns the kind of the events published on `topic`, if this entity reads it.
    pub fn event_kind_for_topic(&self, topic: &str) -> Option<EventKind> {
        if topic == self.insert_stream.topic_name() {
            Some(EventKind::Create)
        } else if topic == self.update_stream.topic_name() {
            Some(EventKind::Update)
        } else {
            None
        }
    }

    /// Returns the stream definition for events of `kind`.
    pub fn stream(&self, kind: EventKind) -> &StreamDefinition {
        match kind {
            EventKind::Create => &self.insert_stream,
            EventKind::Update => &self.update_stream,
        }
    }

    /// Returns the decode contract of the insert stream followed by the one of the update
    /// stream.
    pub fn stream_schema_definitions(&self) -> [(&EventSchema, &[ColumnProjection]); 2] {
        [
            (self.insert_stream.schema(), self.insert_stream.columns()),
            (self.update_stream.schema(), self.update_stream.columns()),
        ]
    }

    pub fn apply_aggregation_schema_create(&self, dataset: Dataset) -> SyncResult<Dataset> {
        self.schema_aggregation.apply_aggregation_create(dataset)
    }

    pub fn apply_aggregation_schema_update(&self, dataset: Dataset) -> SyncResult<Dataset> {
        self.schema_aggregation.apply_aggregation_update(dataset)
    }

    pub fn apply_aggregation_topic_create(&self, dataset: Dataset) -> SyncResult<Dataset> {
        self.topic_aggregation.apply_aggregation_create(dataset)
    }

    pub fn apply_aggregation_topic_update(&self, dataset: Dataset) -> SyncResult<Dataset> {
        self.topic_aggregation.apply_aggregation_update(dataset)
    }

    /// Runs the topic stage and then the schema stage for events of `kind`.
    ///
    /// The row key must be present in the input and the aggregations must leave it untouched,
    /// otherwise [`ErrorKind::InvalidState`] is returned.
    pub fn apply_aggregations(&self, kind: EventKind, dataset: Dataset) -> SyncResult<Dataset> {
        let row_key = self.row_key_column();
        let keys_before = row_keys(&dataset, row_key)?;

        debug!(
            table = %self.sink.name,
            %kind,
            rows = dataset.len(),
            topic_aggregation = self.topic_aggregation.name(),
            schema_aggregation = self.schema_aggregation.name(),
            "applying aggregations"
        );

        let dataset = match kind {
            EventKind::Create => {
                let dataset = self.apply_aggregation_topic_create(dataset)?;
                self.apply_aggregation_schema_create(dataset)?
            }
            EventKind::Update => {
                let dataset = self.apply_aggregation_topic_update(dataset)?;
                self.apply_aggregation_schema_update(dataset)?
            }
        };

        let keys_after = row_keys(&dataset, row_key)?;
        if keys_before != keys_after {
            bail!(
                ErrorKind::InvalidState,
                "Aggregation changed the row key",
                format!(
                    "`{row_key}` of table `{}` must not be modified by aggregations",
                    self.sink.name
                )
            );
        }

        Ok(dataset)
    }
}

impl PartialEq for EntitySyncSpec {
    fn eq(&self, other: &Self) -> bool {
        self.sink == other.sink
            && self.insert_stream == other.insert_stream
            && self.update_stream == other.update_stream
            && self.schema_aggregation.name() == other.schema_aggregation.name()
            && self.topic_aggregation.name() == other.topic_aggregation.name()
    }
}

impl fmt::Debug for EntitySyncSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntitySyncSpec")
            .field("sink", &self.sink)
            .field("insert_stream", &self.insert_stream.topic_name())
            .field("update_stream", &self.update_stream.topic_name())
            .field("schema_aggregation", &self.schema_aggregation.name())
            .field("topic_aggregation", &self.topic_aggregation.name())
            .finish()
    }
}

fn validate_sink(sink: &SinkTable) -> SyncResult<()> {
    if sink.name.trim().is_empty() {
        bail!(
            ErrorKind::ConfigError,
            "Sink table name is empty",
            "an entity must name the table it is written to"
        );
    }

    if sink.row_key_column.trim().is_empty() {
        bail!(
            ErrorKind::ConfigError,
            "Row key column is empty",
            format!("table `{}` has no row key column", sink.name)
        );
    }

    for (list, columns) in [
        ("insert", &sink.insert_columns),
        ("update", &sink.update_columns),
    ] {
        if !columns.contains(&sink.row_key_column) {
            bail!(
                ErrorKind::ConfigError,
                "Row key column is missing from a column list",
                format!(
                    "`{}` is not one of the {list} columns of table `{}`",
                    sink.row_key_column, sink.name
                )
            );
        }

        let mut seen = HashSet::with_capacity(columns.len());
        if let Some(duplicate) = columns.iter().find(|column| !seen.insert(column.as_str())) {
            bail!(
                ErrorKind::ConfigError,
                "Column list has duplicate column names",
                format!(
                    "`{duplicate}` appears more than once in the {list} columns of table `{}`",
                    sink.name
                )
            );
        }
    }

    Ok(())
}

fn row_keys(dataset: &Dataset, row_key: &str) -> SyncResult<Vec<Cell>> {
    dataset.require_columns(&[row_key])?;

    Ok(dataset.column_values(row_key)?.into_iter().cloned().collect())
}
