//! Schema representation for plan nodes.
//!
//! Schemas describe the output columns of each node in a plan tree. A binary
//! node's schema is the concatenation of its children's schemas.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::DataType;

/// A column identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Column {
    /// Optional table/relation qualifier.
    pub qualifier: Option<String>,
    /// Column name.
    pub name: String,
}

impl Column {
    /// Creates a new unqualified column.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            qualifier: None,
            name: name.into(),
        }
    }

    /// Creates a new qualified column.
    pub fn qualified(qualifier: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            qualifier: Some(qualifier.into()),
            name: name.into(),
        }
    }

    /// Returns the fully qualified name.
    pub fn qualified_name(&self) -> String {
        match &self.qualifier {
            Some(q) => format!("{}.{}", q, self.name),
            None => self.name.clone(),
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.qualified_name())
    }
}

/// A field in a schema (column + type + nullability).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Field {
    /// Column identifier.
    pub column: Column,
    /// Declared data type.
    pub data_type: DataType,
    /// Whether NULL is allowed.
    pub nullable: bool,
}

impl Field {
    /// Creates a new field.
    pub fn new(column: Column, data_type: DataType, nullable: bool) -> Self {
        Self {
            column,
            data_type,
            nullable,
        }
    }

    /// Creates a new non-nullable field.
    pub fn not_null(name: impl Into<String>, data_type: DataType) -> Self {
        Self::new(Column::new(name), data_type, false)
    }

    /// Creates a new nullable field.
    pub fn nullable(name: impl Into<String>, data_type: DataType) -> Self {
        Self::new(Column::new(name), data_type, true)
    }

    /// Sets the relation qualifier.
    pub fn with_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.column.qualifier = Some(qualifier.into());
        self
    }

    /// Returns the column name.
    pub fn name(&self) -> &str {
        &self.column.name
    }

    /// Returns the qualified column name.
    pub fn qualified_name(&self) -> String {
        self.column.qualified_name()
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}{}",
            self.column,
            self.data_type,
            if self.nullable { "" } else { " NOT NULL" }
        )
    }
}

/// Schema describes the columns output by a plan node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Field>", into = "Vec<Field>")]
pub struct Schema {
    /// Fields in the schema.
    fields: Vec<Field>,
    /// First position of each qualified and unqualified name.
    index: HashMap<String, usize>,
}

impl Schema {
    /// Creates an empty schema.
    pub fn empty() -> Self {
        Self {
            fields: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Creates a schema from a list of fields.
    pub fn new(fields: Vec<Field>) -> Self {
        let mut schema = Self {
            fields: Vec::with_capacity(fields.len()),
            index: HashMap::new(),
        };
        for field in fields {
            schema.add_field(field);
        }
        schema
    }

    /// Adds a field to the schema.
    pub fn add_field(&mut self, field: Field) {
        let position = self.fields.len();
        self.index.entry(field.qualified_name()).or_insert(position);
        self.index
            .entry(field.column.name.clone())
            .or_insert(position);
        self.fields.push(field);
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the schema has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the fields.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Returns the field at the given index.
    pub fn field(&self, index: usize) -> Option<&Field> {
        self.fields.get(index)
    }

    /// Finds a field by name.
    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        self.index.get(name).and_then(|&i| self.fields.get(i))
    }

    /// Finds the index of the first field with this (qualified) name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Concatenates two schemas, left fields first (for joins).
    pub fn concat(&self, other: &Schema) -> Self {
        let mut fields = self.fields.clone();
        fields.extend(other.fields.iter().cloned());
        Schema::new(fields)
    }

    /// Returns the data types of all fields.
    pub fn data_types(&self) -> Vec<DataType> {
        self.fields.iter().map(|f| f.data_type).collect()
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Vec<Field>> for Schema {
    fn from(fields: Vec<Field>) -> Self {
        Schema::new(fields)
    }
}

impl From<Schema> for Vec<Field> {
    fn from(schema: Schema) -> Self {
        schema.fields
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", field)?;
        }
        write!(f, "]")
    }
}
