use crate::index::SchemaIndex;
use crate::schema::{Column, Relationship, Schema, non_empty};

use super::type_token;

/// Project a schema to a Mermaid `erDiagram`.
///
/// Relations whose tables cannot be resolved are left out.
pub fn to_mermaid(schema: &Schema) -> String {
    let index = SchemaIndex::new(schema);
    let mut lines = vec!["erDiagram".to_string()];

    for table in &schema.tables {
        lines.push(format!("    {} {{", table.name));
        for column in &table.columns {
            lines.push(column_line(column));
        }
        lines.push("    }".to_string());
    }

    for rel in &schema.relations {
        let (Some(from), Some(to)) = (index.table(&rel.from_table_id), index.table(&rel.to_table_id))
        else {
            tracing::debug!(relation = %rel.id, "skipping relation with dangling table");
            continue;
        };
        let label = non_empty(rel.description.as_ref()).unwrap_or("has");
        lines.push(format!(
            "    {} {} {} : \"{}\"",
            from.name,
            symbol(rel.relationship),
            to.name,
            label_text(label)
        ));
    }

    lines.join("\n")
}

/// Mermaid labels cannot hold a raw `"` or a line break.
fn label_text(label: &str) -> String {
    label.replace('"', "#quot;").replace(['\r', '\n'], " ")
}

fn column_line(column: &Column) -> String {
    let mut flags = Vec::new();
    if column.is_primary_key {
        flags.push("PK");
    }
    if column.is_foreign_key {
        flags.push("FK");
    }
    if column.is_unique {
        flags.push("UNIQUE");
    }

    let mut line = format!("        {} {}", type_token(&column.typ), column.name);
    if !flags.is_empty() {
        line.push_str(&format!(" \"{}\"", flags.join(",")));
    }
    line
}

fn symbol(relationship: Relationship) -> &'static str {
    match relationship {
        Relationship::OneToOne => "||--||",
        Relationship::OneToMany => "||--o{",
        Relationship::ManyToOne => "}o--||",
        Relationship::ManyToMany => "}o--o{",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn test_mermaid_tables() {
        let out = to_mermaid(&fixtures::projects());
        assert!(out.starts_with("erDiagram\n    users {\n"));
        assert!(out.contains("        uuid id \"PK\"\n"));
        assert!(out.contains("        text email \"UNIQUE\"\n"));
        assert!(out.contains("        timestamp_with_time_zone created_at\n"));
        assert!(out.contains("        uuid owner_id \"FK\"\n"));
    }

    #[test]
    fn test_mermaid_relations() {
        let out = to_mermaid(&fixtures::projects());
        assert!(out.ends_with("    tasks }o--|| users : \"has\""));
        assert!(out.contains("    projects }o--|| users : \"has\"\n"));

        let junction = to_mermaid(&fixtures::junction());
        assert!(junction.contains("        bigint post_id \"PK,FK\"\n"));
        assert!(junction.ends_with("    posts }o--o{ tags : \"tagged with\""));
    }

    #[test]
    fn test_mermaid_skips_dangling_relation() {
        let mut schema = fixtures::projects();
        schema.relations[0].from_table_id = "tbl-gone".to_string();
        let out = to_mermaid(&schema);
        assert!(!out.contains("projects }o--|| users"));
        assert_eq!(out.matches("}o--||").count(), 2);
    }

    #[test]
    fn test_mermaid_label_quotes() {
        let mut schema = fixtures::junction();
        schema.relations[0].description = Some("tagged \"hot\"\nor not".to_string());
        let out = to_mermaid(&schema);
        assert!(out.ends_with("    posts }o--o{ tags : \"tagged #quot;hot#quot; or not\""));
    }

    #[test]
    fn test_mermaid_empty_schema() {
        assert_eq!(to_mermaid(&Schema::default()), "erDiagram");
    }
}
