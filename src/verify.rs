//! Cross-check SQL text against the tables a schema declares.

use std::collections::HashSet;

use crate::extract::extract_table_names;
use crate::schema::Schema;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verification {
    /// Schema table names, in declaration order.
    pub expected: Vec<String>,
    /// Names recovered from the SQL, in statement order.
    pub found: Vec<String>,
    /// Expected but never created.
    pub missing: Vec<String>,
    /// Created but not part of the schema, first occurrence only.
    pub unexpected: Vec<String>,
}

impl Verification {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

pub fn verify(schema: &Schema, sql: &str) -> Verification {
    let expected: Vec<String> = schema.tables.iter().map(|t| t.name.clone()).collect();
    let found = extract_table_names(sql);

    let found_set: HashSet<&str> = found.iter().map(String::as_str).collect();
    let expected_set: HashSet<&str> = expected.iter().map(String::as_str).collect();

    let missing = expected
        .iter()
        .filter(|name| !found_set.contains(name.as_str()))
        .cloned()
        .collect();

    let mut seen = HashSet::new();
    let unexpected = found
        .iter()
        .filter(|name| !expected_set.contains(name.as_str()))
        .filter(|name| seen.insert(name.as_str()))
        .cloned()
        .collect();

    Verification {
        expected,
        found,
        missing,
        unexpected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ddl::generate_sql;
    use crate::fixtures;

    #[test]
    fn test_generated_sql_is_complete() {
        let schema = fixtures::projects();
        let report = verify(&schema, &generate_sql(&schema));

        assert!(report.is_complete());
        assert_eq!(report.found, report.expected);
        assert!(report.unexpected.is_empty());
    }

    #[test]
    fn test_missing_and_unexpected() {
        let schema = fixtures::projects();
        let sql = "
            CREATE TABLE users (id uuid);
            CREATE TABLE audit_log (id uuid);
            CREATE TABLE audit_log (id uuid);
            CREATE TABLE tasks (id uuid);
        ";
        let report = verify(&schema, sql);

        assert!(!report.is_complete());
        assert_eq!(report.missing, vec!["projects"]);
        assert_eq!(report.unexpected, vec!["audit_log"]);
        assert_eq!(report.found.len(), 4);
    }
}
