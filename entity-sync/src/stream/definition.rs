use std::collections::HashSet;

use crate::bail;
use crate::error::{ErrorKind, SyncResult};
use crate::types::EventSchema;

/// Maps a payload field, addressed by a dotted path, to a dataset column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnProjection {
    path: String,
    alias: String,
}

impl ColumnProjection {
    /// Projects the field at `path` into a column named `alias`.
    pub fn new(path: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            alias: alias.into(),
        }
    }

    /// Projects a top-level field into a column of the same name.
    pub fn field(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            path: name.clone(),
            alias: name,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }
}

/// Description of one event stream: its topic, payload schema and column projection.
///
/// Construction does not validate; [`StreamDefinition::validate`] is called by the owner of the
/// definition before it is used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamDefinition {
    topic_name: String,
    columns: Vec<ColumnProjection>,
    schema: EventSchema,
}

impl StreamDefinition {
    pub fn new(
        topic_name: impl Into<String>,
        columns: Vec<ColumnProjection>,
        schema: EventSchema,
    ) -> Self {
        Self {
            topic_name: topic_name.into(),
            columns,
            schema,
        }
    }

    pub fn topic_name(&self) -> &str {
        &self.topic_name
    }

    pub fn columns(&self) -> &[ColumnProjection] {
        &self.columns
    }

    pub fn schema(&self) -> &EventSchema {
        &self.schema
    }

    /// Returns the names of the columns a decoded dataset of this stream has, in order.
    pub fn output_columns(&self) -> Vec<&str> {
        self.columns.iter().map(ColumnProjection::alias).collect()
    }

    /// Checks that the projection is satisfiable against the schema.
    ///
    /// Every path must resolve to a non-struct field and aliases must be unique. Violations are
    /// reported as [`ErrorKind::ConfigError`].
    pub fn validate(&self) -> SyncResult<()> {
        if self.topic_name.trim().is_empty() {
            bail!(
                ErrorKind::ConfigError,
                "Stream topic name is empty",
                "a stream definition must name the topic it is read from"
            );
        }

        if self.columns.is_empty() {
            bail!(
                ErrorKind::ConfigError,
                "Stream projects no columns",
                format!("stream `{}` has an empty column projection", self.topic_name)
            );
        }

        let mut aliases = HashSet::with_capacity(self.columns.len());
        for column in &self.columns {
            let Some(resolved) = self.schema.resolve(column.path()) else {
                bail!(
                    ErrorKind::ConfigError,
                    "Stream projection references an unknown field",
                    format!(
                        "stream `{}` projects `{}` which is not in its schema",
                        self.topic_name,
                        column.path()
                    )
                );
            };

            if resolved.field.typ.is_struct() {
                bail!(
                    ErrorKind::ConfigError,
                    "Stream projection references a struct field",
                    format!(
                        "stream `{}` projects `{}` which is a struct, project its fields instead",
                        self.topic_name,
                        column.path()
                    )
                );
            }

            if !aliases.insert(column.alias()) {
                bail!(
                    ErrorKind::ConfigError,
                    "Stream projection has duplicate column names",
                    format!(
                        "stream `{}` produces column `{}` more than once",
                        self.topic_name,
                        column.alias()
                    )
                );
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FieldSchema, FieldType};

    fn schema() -> EventSchema {
        EventSchema::new(vec![
            FieldSchema::new("id", FieldType::String, false),
            FieldSchema::new(
                "details",
                FieldType::Struct(EventSchema::new(vec![FieldSchema::new(
                    "type",
                    FieldType::String,
                    true,
                )])),
                true,
            ),
        ])
    }

    #[test]
    fn valid_projection_with_nested_field() {
        let stream = StreamDefinition::new(
            "createaccount3",
            vec![
                ColumnProjection::field("id"),
                ColumnProjection::new("details.type", "account_type"),
            ],
            schema(),
        );

        assert!(stream.validate().is_ok());
        assert_eq!(stream.output_columns(), vec!["id", "account_type"]);
    }

    #[test]
    fn unknown_field_is_a_config_error() {
        let stream =
            StreamDefinition::new("t", vec![ColumnProjection::field("email")], schema());

        let err = stream.validate().unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ConfigError);
        assert_eq!(err.description(), "Stream projection references an unknown field");
    }

    #[test]
    fn struct_field_cannot_be_projected() {
        let stream =
            StreamDefinition::new("t", vec![ColumnProjection::field("details")], schema());

        assert_eq!(stream.validate().unwrap_err().kind(), ErrorKind::ConfigError);
    }

    #[test]
    fn duplicate_aliases_are_rejected() {
        let stream = StreamDefinition::new(
            "t",
            vec![
                ColumnProjection::field("id"),
                ColumnProjection::new("details.type", "id"),
            ],
            schema(),
        );

        assert_eq!(
            stream.validate().unwrap_err().description(),
            "Stream projection has duplicate column names"
        );
    }

    #[test]
    fn construction_does_not_validate() {
        let stream = StreamDefinition::new("", Vec::new(), EventSchema::default());

        assert_eq!(stream.topic_name(), "");
        assert!(stream.validate().is_err());
    }
}
