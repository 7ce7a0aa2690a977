use std::fmt;

/// Separator between the segments of a field path, e.g. `details.currency`.
pub const PATH_SEPARATOR: char = '.';

/// Type of a payload field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    String,
    Integer,
    Double,
    Boolean,
    /// An RFC 3339 timestamp, normalized to UTC.
    Timestamp,
    /// A nested object with its own fields.
    Struct(EventSchema),
}

impl FieldType {
    pub fn is_struct(&self) -> bool {
        matches!(self, FieldType::Struct(_))
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::String => f.write_str("string"),
            FieldType::Integer => f.write_str("integer"),
            FieldType::Double => f.write_str("double"),
            FieldType::Boolean => f.write_str("boolean"),
            FieldType::Timestamp => f.write_str("timestamp"),
            FieldType::Struct(_) => f.write_str("struct"),
        }
    }
}

/// A named, typed field of an [`EventSchema`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSchema {
    pub name: String,
    pub typ: FieldType,
    pub nullable: bool,
}

impl FieldSchema {
    pub fn new(name: impl Into<String>, typ: FieldType, nullable: bool) -> Self {
        Self {
            name: name.into(),
            typ,
            nullable,
        }
    }
}

/// A field reached through a path, with the nullability accumulated along it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedField<'a> {
    pub field: &'a FieldSchema,
    /// `true` when the leaf or any of its parents may be null or absent.
    pub nullable: bool,
}

/// Structural description of a decoded event payload.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EventSchema {
    fields: Vec<FieldSchema>,
}

impl EventSchema {
    pub fn new(fields: Vec<FieldSchema>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    /// Returns the top-level field named `name`.
    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Resolves a dotted path through nested struct fields.
    ///
    /// Returns [`None`] when a segment is missing or a non-final segment is not a struct.
    pub fn resolve(&self, path: &str) -> Option<ResolvedField<'_>> {
        let mut schema = self;
        let mut nullable = false;
        let mut segments = path.split(PATH_SEPARATOR).peekable();

        while let Some(segment) = segments.next() {
            let field = schema.field(segment)?;
            nullable |= field.nullable;

            if segments.peek().is_none() {
                return Some(ResolvedField { field, nullable });
            }

            match &field.typ {
                FieldType::Struct(nested) => schema = nested,
                _ => return None,
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> EventSchema {
        EventSchema::new(vec![
            FieldSchema::new("id", FieldType::String, false),
            FieldSchema::new(
                "details",
                FieldType::Struct(EventSchema::new(vec![FieldSchema::new(
                    "currency",
                    FieldType::String,
                    false,
                )])),
                true,
            ),
        ])
    }

    #[test]
    fn resolves_top_level_field() {
        let schema = schema();
        let resolved = schema.resolve("id").unwrap();

        assert_eq!(resolved.field.typ, FieldType::String);
        assert!(!resolved.nullable);
    }

    #[test]
    fn nested_field_inherits_parent_nullability() {
        let schema = schema();
        let resolved = schema.resolve("details.currency").unwrap();

        assert_eq!(resolved.field.name, "currency");
        assert!(resolved.nullable);
    }

    #[test]
    fn unresolvable_paths() {
        let schema = schema();

        assert!(schema.resolve("missing").is_none());
        assert!(schema.resolve("id.nested").is_none());
        assert!(schema.resolve("details.unknown").is_none());
        assert!(schema.resolve("").is_none());
    }
}
