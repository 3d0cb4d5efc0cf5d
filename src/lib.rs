pub mod constraints;
pub mod ddl;
pub mod diagram;
pub mod extract;
pub mod index;
pub mod schema;
pub mod verify;

#[cfg(test)]
mod fixtures;

use wasm_bindgen::prelude::*;

pub use constraints::{ConstraintDeriver, TableConstraint, derive_constraints};
pub use ddl::{DdlEmitter, EmitOptions, generate_sql};
pub use diagram::DiagramFormat;
pub use extract::{count_create_tables, extract_table_names};
pub use schema::{Column, ColumnRef, Relation, Relationship, Schema, SchemaError, SchemaWarning, Table};
pub use verify::{Verification, verify};

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

/// Compile schema JSON to PostgreSQL DDL
#[wasm_bindgen(js_name = "schemaToSql")]
pub fn schema_to_sql(json: &str, header: Option<bool>) -> Result<String, String> {
    let schema = Schema::from_json(json).map_err(|e| e.to_string())?;
    let options = EmitOptions::default().header(header.unwrap_or(true));
    Ok(DdlEmitter::new(options).emit(&schema))
}

/// Table names declared by CREATE TABLE statements in `sql`
#[wasm_bindgen(js_name = "extractTableNames")]
pub fn sql_table_names(sql: &str) -> Vec<String> {
    extract_table_names(sql)
}

/// Render schema JSON as a diagram (`mermaid` or `erd`)
#[wasm_bindgen(js_name = "schemaToDiagram")]
pub fn schema_to_diagram(json: &str, format: Option<String>) -> Result<String, String> {
    let schema = Schema::from_json(json).map_err(|e| e.to_string())?;
    let format = match format.as_deref() {
        Some(f) => DiagramFormat::from_str(f).ok_or_else(|| format!("Unknown diagram format: {}", f))?,
        None => DiagramFormat::default(),
    };
    Ok(format.render(&schema))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_to_sql() {
        let sql = schema_to_sql(fixtures::PROJECTS_JSON, Some(false)).unwrap();
        assert!(sql.starts_with("-- Table: users\n"));
        assert_eq!(sql_table_names(&sql), vec!["users", "projects", "tasks"]);
    }

    #[test]
    fn test_schema_to_sql_bad_json() {
        let err = schema_to_sql("{\"tables\": 3}", None).unwrap_err();
        assert!(err.starts_with("Invalid schema JSON"));
    }

    #[test]
    fn test_schema_to_diagram() {
        let mermaid = schema_to_diagram(fixtures::PROJECTS_JSON, None).unwrap();
        assert!(mermaid.starts_with("erDiagram"));

        let erd = schema_to_diagram(fixtures::PROJECTS_JSON, Some("erd".into())).unwrap();
        assert!(erd.contains("entity tasks {"));

        let err = schema_to_diagram(fixtures::PROJECTS_JSON, Some("dot".into())).unwrap_err();
        assert_eq!(err, "Unknown diagram format: dot");
    }
}
