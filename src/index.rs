//! Id-indexed lookups over a [`Schema`], built once per compile pass.

use std::collections::HashMap;

use crate::schema::{Column, ColumnRef, Schema, Table};

/// Resolves weak id references. Misses return `None`; with duplicate ids the
/// first declaration wins.
pub struct SchemaIndex<'a> {
    tables: HashMap<&'a str, &'a Table>,
    columns: HashMap<&'a str, HashMap<&'a str, &'a Column>>,
}

impl<'a> SchemaIndex<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        let mut tables = HashMap::new();
        let mut columns = HashMap::new();

        for table in &schema.tables {
            if tables.contains_key(table.id.as_str()) {
                continue;
            }
            tables.insert(table.id.as_str(), table);

            let mut scoped = HashMap::new();
            for column in &table.columns {
                scoped.entry(column.id.as_str()).or_insert(column);
            }
            columns.insert(table.id.as_str(), scoped);
        }

        Self { tables, columns }
    }

    pub fn table(&self, table_id: &str) -> Option<&'a Table> {
        self.tables.get(table_id).copied()
    }

    /// Column lookup scoped to one table.
    pub fn column(&self, table_id: &str, column_id: &str) -> Option<&'a Column> {
        self.columns.get(table_id)?.get(column_id).copied()
    }

    /// Resolve a reference to its (table, column) pair.
    pub fn resolve(&self, target: &ColumnRef) -> Option<(&'a Table, &'a Column)> {
        let table = self.table(&target.table_id)?;
        let column = self.column(&target.table_id, &target.column_id)?;
        Some((table, column))
    }
}
