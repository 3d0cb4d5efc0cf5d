//! Projection to the ERD DSL (`entity`, `rel`, `@hint.arrangement`).

use std::collections::{HashMap, HashSet};

use crate::index::SchemaIndex;
use crate::schema::{Column, Relationship, Schema, Table, non_empty};

use super::type_token;

/// Serialize a Schema to ERD notation string.
pub fn to_erd(schema: &Schema) -> String {
    let index = SchemaIndex::new(schema);
    let mut output = String::new();

    for (i, table) in schema.tables.iter().enumerate() {
        if i > 0 {
            output.push('\n');
        }
        serialize_entity(&mut output, table, &index);
    }

    let rels: Vec<String> = schema
        .relations
        .iter()
        .filter_map(|rel| {
            let from = index.table(&rel.from_table_id)?;
            let to = index.table(&rel.to_table_id)?;
            let (left, right) = cardinality(rel.relationship);
            let mut line = format!("    {} {} -- {} {}", from.name, left, right, to.name);
            if let Some(label) = non_empty(rel.description.as_ref()) {
                line.push_str(&format!(" : {}", quoted(label)));
            }
            Some(line)
        })
        .collect();

    if !rels.is_empty() {
        output.push_str("\nrel {\n");
        for line in &rels {
            output.push_str(line);
            output.push('\n');
        }
        output.push_str("}\n");
    }

    let arrangement = generate_arrangement(schema, &index);
    if !arrangement.is_empty() {
        output.push_str("\n@hint.arrangement = {\n");
        for row in &arrangement {
            output.push_str("    ");
            output.push_str(&row.join(" "));
            output.push('\n');
        }
        output.push_str("}\n");
    }

    output
}

/// Level tables by foreign-key dependency.
/// Referenced tables go to upper rows; tables caught in a cycle share the last row.
fn generate_arrangement(schema: &Schema, index: &SchemaIndex) -> Vec<Vec<String>> {
    let mut names: Vec<&str> = Vec::new();
    let mut seen = HashSet::new();
    for table in &schema.tables {
        if seen.insert(table.name.as_str()) {
            names.push(table.name.as_str());
        }
    }
    if names.is_empty() {
        return vec![];
    }

    // child -> parents (FK targets), self references ignored
    let mut parents: HashMap<&str, HashSet<&str>> = HashMap::new();
    for table in &schema.tables {
        let deps = parents.entry(table.name.as_str()).or_default();
        for column in &table.columns {
            if !column.is_foreign_key {
                continue;
            }
            if let Some((target, _)) = column.references.as_ref().and_then(|r| index.resolve(r)) {
                if target.name != table.name {
                    deps.insert(target.name.as_str());
                }
            }
        }
    }

    let mut levels: HashMap<&str, usize> = HashMap::new();
    let mut changed = true;
    while changed {
        changed = false;
        for name in &names {
            if levels.contains_key(name) {
                continue;
            }
            let deps = &parents[name];
            let parent_levels: Vec<usize> = deps.iter().filter_map(|p| levels.get(p).copied()).collect();
            if parent_levels.len() == deps.len() {
                let level = parent_levels.iter().max().map_or(0, |l| l + 1);
                levels.insert(*name, level);
                changed = true;
            }
        }
    }

    let next_level = levels.values().copied().max().map_or(0, |l| l + 1);
    let mut rows: Vec<Vec<String>> = vec![vec![]; next_level + 1];
    for name in &names {
        let level = levels.get(name).copied().unwrap_or(next_level);
        rows[level].push(name.to_string());
    }

    rows.into_iter().filter(|r| !r.is_empty()).collect()
}

fn serialize_entity(output: &mut String, table: &Table, index: &SchemaIndex) {
    if let Some(description) = non_empty(table.description.as_ref()) {
        output.push_str(&format!("# {}\n", description));
    }
    output.push_str(&format!("entity {} {{\n", table.name));

    let composite: Vec<&str> = if table.single_primary_key().is_none() {
        table.primary_key_columns().map(|c| c.name.as_str()).collect()
    } else {
        vec![]
    };

    for column in &table.columns {
        serialize_column(output, column, table, index);
    }

    if composite.len() > 1 {
        output.push_str(&format!("    primary_key({})\n", composite.join(", ")));
    }

    output.push_str("}\n");
}

fn serialize_column(output: &mut String, column: &Column, table: &Table, index: &SchemaIndex) {
    output.push_str(&format!("    {} {}", column.name, type_token(&column.typ)));

    let sole_pk = table.is_sole_primary_key(column);
    if sole_pk {
        output.push_str(" pk");
    }
    if column.is_unique && !sole_pk {
        output.push_str(" unique");
    }
    if column.is_not_null() {
        output.push_str(" not null");
    }

    if column.is_foreign_key {
        if let Some((target, target_col)) = column.references.as_ref().and_then(|r| index.resolve(r)) {
            output.push_str(&format!(" fk -> {}.{}", target.name, target_col.name));
        }
    }

    if let Some(val) = &column.default_value {
        // Function calls such as now() stay bare
        let is_function_call = val.contains('(') && val.ends_with(')');
        let needs_quote = !is_function_call
            && (val.contains([' ', '"', '\\']) || val.starts_with('\''));
        if needs_quote {
            output.push_str(&format!(" default {}", quoted(val)));
        } else {
            output.push_str(&format!(" default {}", val));
        }
    }

    output.push('\n');
}

/// Double-quoted DSL string with `\`, `"` and line breaks escaped.
fn quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}

fn cardinality(relationship: Relationship) -> (&'static str, &'static str) {
    match relationship {
        Relationship::OneToOne => ("1", "1"),
        Relationship::OneToMany => ("1", "*"),
        Relationship::ManyToOne => ("*", "1"),
        Relationship::ManyToMany => ("*", "*"),
    }
}
