//! Table-level constraints implied by column flags, references and
//! pipe-delimited descriptions.

use std::fmt;

use crate::index::SchemaIndex;
use crate::schema::{Schema, Table};

/// A clause appended after the column declarations of `CREATE TABLE`.
#[derive(Debug, Clone, PartialEq)]
pub enum TableConstraint {
    /// Composite key; only produced for two or more key columns.
    PrimaryKey(Vec<String>),
    ForeignKey {
        name: String,
        column: String,
        ref_table: String,
        ref_column: String,
    },
    Check {
        name: String,
        column: String,
        values: Vec<String>,
        escape: bool,
    },
}

impl fmt::Display for TableConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PrimaryKey(columns) => write!(f, "PRIMARY KEY ({})", columns.join(", ")),
            Self::ForeignKey {
                name,
                column,
                ref_table,
                ref_column,
            } => write!(
                f,
                "CONSTRAINT {name} FOREIGN KEY ({column}) REFERENCES public.{ref_table}({ref_column}) ON DELETE CASCADE"
            ),
            Self::Check {
                name,
                column,
                values,
                escape,
            } => {
                let list = values
                    .iter()
                    .map(|v| {
                        if *escape {
                            format!("'{}'", v.replace('\'', "''"))
                        } else {
                            format!("'{v}'")
                        }
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "CONSTRAINT {name} CHECK ({column} IN ({list}))")
            }
        }
    }
}

/// Derives constraints for one table against a pre-built index.
pub struct ConstraintDeriver<'s> {
    index: &'s SchemaIndex<'s>,
    escape_check_values: bool,
}

impl<'s> ConstraintDeriver<'s> {
    pub fn new(index: &'s SchemaIndex<'s>) -> Self {
        Self {
            index,
            escape_check_values: false,
        }
    }

    /// Double single quotes inside check-constraint values.
    pub fn escape_check_values(mut self, escape: bool) -> Self {
        self.escape_check_values = escape;
        self
    }

    /// Composite key, then foreign keys, then checks; each group in column order.
    pub fn derive(&self, table: &Table) -> Vec<TableConstraint> {
        let mut constraints = Vec::new();

        let pk_columns: Vec<String> = table
            .primary_key_columns()
            .map(|c| c.name.clone())
            .collect();
        if pk_columns.len() > 1 {
            constraints.push(TableConstraint::PrimaryKey(pk_columns));
        }

        for column in &table.columns {
            if !column.is_foreign_key {
                continue;
            }
            let Some(target) = &column.references else {
                continue;
            };
            match self.index.resolve(target) {
                Some((ref_table, ref_column)) => {
                    constraints.push(TableConstraint::ForeignKey {
                        name: format!("fk_{}_{}", table.name, column.name),
                        column: column.name.clone(),
                        ref_table: ref_table.name.clone(),
                        ref_column: ref_column.name.clone(),
                    });
                }
                None => {
                    tracing::debug!(
                        table = %table.name,
                        column = %column.name,
                        target_table = %target.table_id,
                        target_column = %target.column_id,
                        "skipping dangling foreign key"
                    );
                }
            }
        }

        for column in &table.columns {
            if let Some(values) = column.enum_values() {
                constraints.push(TableConstraint::Check {
                    name: format!("check_{}_{}", table.name, column.name),
                    column: column.name.clone(),
                    values,
                    escape: self.escape_check_values,
                });
            }
        }

        constraints
    }
}

/// Derive constraints for `table`, building a one-off index over `schema`.
pub fn derive_constraints(table: &Table, schema: &Schema) -> Vec<TableConstraint> {
    let index = SchemaIndex::new(schema);
    ConstraintDeriver::new(&index).derive(table)
}
