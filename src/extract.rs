//! Best-effort recovery of table names from SQL text.

use regex::Regex;
use std::sync::LazyLock;

// Group 2 catches a keyword or schema prefix standing where the name should be:
// `IF` of an `IF NOT EXISTS` with no usable name after it, or `public.` before a
// quoted name. Such matches are discarded.
static CREATE_TABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)create\s+table\s+(?:if\s+not\s+exists\s+)?(?:public\.)?([a-z_][a-z0-9_]*)(\s+not\s+exists\b|\.)?",
    )
    .expect("valid CREATE TABLE pattern")
});

fn table_name(statement: &str) -> Option<&str> {
    let caps = CREATE_TABLE.captures(statement)?;
    if caps.get(2).is_some() {
        return None;
    }
    caps.get(1).map(|m| m.as_str())
}

/// Non-empty, trimmed statements of `sql` split on `;`.
///
/// Comment-only statements are kept: a `CREATE TABLE` that follows a `--`
/// line is part of the same statement.
fn statements(sql: &str) -> impl Iterator<Item = &str> {
    sql.split(';').map(str::trim).filter(|s| !s.is_empty())
}

fn mentions_create_table(statement: &str) -> bool {
    statement.to_lowercase().contains("create table")
}

/// Table names declared by `CREATE TABLE` statements, in statement order.
///
/// Statements whose name cannot be recognised are skipped. Duplicates are kept.
pub fn extract_table_names(sql: &str) -> Vec<String> {
    statements(sql)
        .filter(|s| mentions_create_table(s))
        .filter_map(|statement| match table_name(statement) {
            Some(name) => Some(name.to_string()),
            None => {
                tracing::trace!(statement, "no table name after CREATE TABLE");
                None
            }
        })
        .collect()
}

/// Number of statements mentioning `create table`, recognised or not.
pub fn count_create_tables(sql: &str) -> usize {
    statements(sql).filter(|s| mentions_create_table(s)).count()
}
