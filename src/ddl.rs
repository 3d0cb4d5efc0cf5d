//! PostgreSQL DDL emitter.
//!
//! Output is four blocks in fixed order: banner, tables, indexes, comments.
//! Every statement is idempotent (`IF NOT EXISTS`) so the script can be
//! re-applied to the same database.

use crate::constraints::ConstraintDeriver;
use crate::index::SchemaIndex;
use crate::schema::{Column, Schema, Table, non_empty};

pub const BANNER: [&str; 2] = [
    "-- Generated Database Schema for Supabase/Postgres",
    "-- Copy and run this SQL in your Supabase SQL Editor",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmitOptions {
    /// Emit the two-line banner and a blank line before the first table.
    pub header: bool,
    /// Double single quotes in check-constraint values.
    pub escape_check_values: bool,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            header: true,
            escape_check_values: false,
        }
    }
}

impl EmitOptions {
    pub fn header(mut self, header: bool) -> Self {
        self.header = header;
        self
    }

    pub fn escape_check_values(mut self, escape: bool) -> Self {
        self.escape_check_values = escape;
        self
    }
}

#[derive(Debug, Default)]
pub struct DdlEmitter {
    options: EmitOptions,
}

impl DdlEmitter {
    pub fn new(options: EmitOptions) -> Self {
        Self { options }
    }

    pub fn emit(&self, schema: &Schema) -> String {
        let index = SchemaIndex::new(schema);
        let deriver =
            ConstraintDeriver::new(&index).escape_check_values(self.options.escape_check_values);
        let mut lines: Vec<String> = Vec::new();

        if self.options.header {
            lines.extend(BANNER.iter().map(|s| s.to_string()));
            lines.push(String::new());
        }

        for table in &schema.tables {
            lines.push(format!("-- Table: {}", table.name));
            if let Some(description) = non_empty(table.description.as_ref()) {
                lines.push(format!("-- {description}"));
            }

            let definitions: Vec<String> = table
                .columns
                .iter()
                .map(|c| column_definition(c, table))
                .chain(deriver.derive(table).iter().map(ToString::to_string))
                .collect();

            lines.push(format!("CREATE TABLE IF NOT EXISTS public.{} (", table.name));
            lines.push(format!("  {}", definitions.join(",\n  ")));
            lines.push(");".to_string());
            lines.push(String::new());
        }

        let indexes = index_statements(schema);
        if !indexes.is_empty() {
            lines.push("-- Indexes".to_string());
            lines.extend(indexes.iter().cloned());
            lines.push(String::new());
        }

        let comments = comment_statements(schema);
        if !comments.is_empty() {
            lines.push("-- Table and Column Comments".to_string());
            lines.extend(comments.iter().cloned());
            lines.push(String::new());
        }

        tracing::debug!(
            tables = schema.tables.len(),
            indexes = indexes.len(),
            comments = comments.len(),
            "emitted ddl"
        );

        lines.join("\n")
    }
}

/// Emit DDL with default options.
pub fn generate_sql(schema: &Schema) -> String {
    DdlEmitter::default().emit(schema)
}

/// `name type [PRIMARY KEY] [DEFAULT expr] [NOT NULL] [UNIQUE]`
fn column_definition(column: &Column, table: &Table) -> String {
    let mut parts = vec![column.name.clone(), column.typ.clone()];
    let sole_pk = table.is_sole_primary_key(column);

    if sole_pk {
        parts.push("PRIMARY KEY".to_string());
    }
    if let Some(default) = &column.default_value {
        parts.push(format!("DEFAULT {default}"));
    }
    if column.is_not_null() {
        parts.push("NOT NULL".to_string());
    }
    if column.is_unique && !sole_pk {
        parts.push("UNIQUE".to_string());
    }

    parts.join(" ")
}

fn index_statement(table: &Table, column: &Column) -> String {
    format!(
        "CREATE INDEX IF NOT EXISTS idx_{table}_{column} ON public.{table}({column});",
        table = table.name,
        column = column.name
    )
}

/// Foreign-key columns first, then unique columns, per table.
fn index_statements(schema: &Schema) -> Vec<String> {
    let mut statements = Vec::new();

    for table in &schema.tables {
        for column in &table.columns {
            if column.is_foreign_key && !table.is_sole_primary_key(column) {
                statements.push(index_statement(table, column));
            }
        }
        for column in &table.columns {
            if column.is_unique && !column.is_foreign_key && !table.is_sole_primary_key(column) {
                statements.push(index_statement(table, column));
            }
        }
    }

    statements
}

pub(crate) fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn comment_statements(schema: &Schema) -> Vec<String> {
    let mut statements = Vec::new();

    for table in &schema.tables {
        if let Some(description) = non_empty(table.description.as_ref()) {
            statements.push(format!(
                "COMMENT ON TABLE public.{} IS {};",
                table.name,
                quote_literal(description)
            ));
        }
        for column in &table.columns {
            if let Some(description) = non_empty(column.description.as_ref()) {
                statements.push(format!(
                    "COMMENT ON COLUMN public.{}.{} IS {};",
                    table.name,
                    column.name,
                    quote_literal(description)
                ));
            }
        }
    }

    statements
}
