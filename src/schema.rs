//! Schema graph: tables, columns and relations as produced upstream.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::index::SchemaIndex;

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("Invalid schema JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to read schema: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    pub tables: Vec<Table>,
    #[serde(default)]
    pub relations: Vec<Relation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub columns: Vec<Column>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub typ: String,
    #[serde(default)]
    pub is_primary_key: bool,
    #[serde(default)]
    pub is_foreign_key: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references: Option<ColumnRef>,
    #[serde(default = "nullable_by_default")]
    pub is_nullable: bool,
    #[serde(default)]
    pub is_unique: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Weak link to a column of another (or the same) table, by id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnRef {
    pub table_id: String,
    pub column_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relation {
    pub id: String,
    pub from_table_id: String,
    pub to_table_id: String,
    pub from_column_id: String,
    pub to_column_id: String,
    pub relationship: Relationship,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Relationship {
    OneToOne,
    OneToMany,
    ManyToOne,
    ManyToMany,
}

fn nullable_by_default() -> bool {
    true
}

/// Treat `""` the same as a missing string.
pub(crate) fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.is_empty())
}

/// The generator's response envelope; other fields such as `message` are ignored.
#[derive(Deserialize)]
struct Envelope {
    schema: Schema,
}

impl Schema {
    /// Parse a schema from JSON, accepting `{ "schema": ... }` envelopes.
    ///
    /// Errors name the failing field and its position.
    pub fn from_json(input: &str) -> Result<Self, SchemaError> {
        let value: serde_json::Value = serde_json::from_str(input)?;
        if value.get("schema").is_some() {
            let envelope: Envelope = serde_json::from_str(input)?;
            Ok(envelope.schema)
        } else {
            Ok(serde_json::from_str(input)?)
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn to_json_pretty(&self) -> Result<String, SchemaError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Report structural problems. The compiler tolerates all of them.
    pub fn warnings(&self) -> Vec<SchemaWarning> {
        let index = SchemaIndex::new(self);
        let mut warnings = Vec::new();
        let mut table_ids = HashSet::new();

        for table in &self.tables {
            if !table_ids.insert(table.id.as_str()) {
                warnings.push(SchemaWarning::DuplicateTableId {
                    id: table.id.clone(),
                });
            }

            let mut column_ids = HashSet::new();
            for column in &table.columns {
                if !column_ids.insert(column.id.as_str()) {
                    warnings.push(SchemaWarning::DuplicateColumnId {
                        table: table.name.clone(),
                        id: column.id.clone(),
                    });
                }

                match &column.references {
                    None if column.is_foreign_key => {
                        warnings.push(SchemaWarning::MissingReference {
                            table: table.name.clone(),
                            column: column.name.clone(),
                        });
                    }
                    Some(target) if index.resolve(target).is_none() => {
                        warnings.push(SchemaWarning::DanglingReference {
                            table: table.name.clone(),
                            column: column.name.clone(),
                            target: target.clone(),
                        });
                    }
                    _ => {}
                }
            }
        }

        for relation in &self.relations {
            let from = index.column(&relation.from_table_id, &relation.from_column_id);
            let to = index.column(&relation.to_table_id, &relation.to_column_id);
            if from.is_none() || to.is_none() {
                warnings.push(SchemaWarning::DanglingRelation {
                    id: relation.id.clone(),
                });
            }
        }

        warnings
    }
}

impl Table {
    pub fn primary_key_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.is_primary_key)
    }

    /// The primary-key column, when exactly one column is flagged.
    pub fn single_primary_key(&self) -> Option<&Column> {
        let mut pks = self.primary_key_columns();
        match (pks.next(), pks.next()) {
            (Some(pk), None) => Some(pk),
            _ => None,
        }
    }

    /// True if `column` is this table's sole primary key.
    pub fn is_sole_primary_key(&self, column: &Column) -> bool {
        column.is_primary_key && self.single_primary_key().is_some()
    }
}

impl Column {
    /// Only an explicit `isNullable: false` makes a column NOT NULL.
    pub fn is_not_null(&self) -> bool {
        !self.is_nullable
    }

    /// Values of a pipe-delimited description such as `"draft | active | archived"`.
    ///
    /// Each candidate is trimmed and loses one matching pair of surrounding
    /// quotes; empty candidates are dropped. Returns `None` when the
    /// description has no `|` or nothing survives.
    pub fn enum_values(&self) -> Option<Vec<String>> {
        let description = non_empty(self.description.as_ref())?;
        if !description.contains('|') {
            return None;
        }

        let values: Vec<String> = description
            .split('|')
            .map(str::trim)
            .map(strip_quote_pair)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect();

        if values.is_empty() { None } else { Some(values) }
    }
}

fn strip_quote_pair(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'\'' || first == b'"') {
            return &value[1..value.len() - 1];
        }
    }
    value
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaWarning {
    #[error("duplicate table id {id}")]
    DuplicateTableId { id: String },
    #[error("duplicate column id {id} in table {table}")]
    DuplicateColumnId { table: String, id: String },
    #[error("{table}.{column} is flagged as a foreign key but has no references")]
    MissingReference { table: String, column: String },
    #[error("{table}.{column} references unknown column {}.{}", .target.table_id, .target.column_id)]
    DanglingReference {
        table: String,
        column: String,
        target: ColumnRef,
    },
    #[error("relation {id} has an endpoint that does not exist")]
    DanglingRelation { id: String },
}
