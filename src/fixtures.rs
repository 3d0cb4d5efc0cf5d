//! Shared test schemas.

use crate::schema::Schema;

/// Users, projects and tasks with status enumerations and three references.
pub const PROJECTS_JSON: &str = r#"{
  "tables": [
    {
      "id": "tbl-users",
      "name": "users",
      "label": "Users",
      "description": "Registered people who can create projects and tasks.",
      "columns": [
        { "id": "col-users-id", "name": "id", "type": "uuid", "isPrimaryKey": true, "isNullable": false, "defaultValue": "gen_random_uuid()" },
        { "id": "col-users-email", "name": "email", "type": "text", "isUnique": true, "isNullable": false },
        { "id": "col-users-name", "name": "full_name", "type": "text", "isNullable": false },
        { "id": "col-users-created", "name": "created_at", "type": "timestamp with time zone", "defaultValue": "now()" }
      ]
    },
    {
      "id": "tbl-projects",
      "name": "projects",
      "description": "Projects owned by users.",
      "columns": [
        { "id": "col-projects-id", "name": "id", "type": "uuid", "isPrimaryKey": true, "defaultValue": "gen_random_uuid()" },
        { "id": "col-projects-owner", "name": "owner_id", "type": "uuid", "isNullable": false, "isForeignKey": true,
          "references": { "tableId": "tbl-users", "columnId": "col-users-id" } },
        { "id": "col-projects-name", "name": "name", "type": "text", "isNullable": false },
        { "id": "col-projects-status", "name": "status", "type": "text", "description": "draft | active | archived" },
        { "id": "col-projects-created", "name": "created_at", "type": "timestamp with time zone", "defaultValue": "now()" }
      ]
    },
    {
      "id": "tbl-tasks",
      "name": "tasks",
      "description": "Tasks assigned within projects.",
      "columns": [
        { "id": "col-tasks-id", "name": "id", "type": "uuid", "isPrimaryKey": true, "defaultValue": "gen_random_uuid()" },
        { "id": "col-tasks-project", "name": "project_id", "type": "uuid", "isNullable": false, "isForeignKey": true,
          "references": { "tableId": "tbl-projects", "columnId": "col-projects-id" } },
        { "id": "col-tasks-owner", "name": "assignee_id", "type": "uuid", "isForeignKey": true,
          "references": { "tableId": "tbl-users", "columnId": "col-users-id" } },
        { "id": "col-tasks-title", "name": "title", "type": "text", "isNullable": false },
        { "id": "col-tasks-status", "name": "status", "type": "text", "description": "todo | in_progress | done" },
        { "id": "col-tasks-due", "name": "due_date", "type": "date" }
      ]
    }
  ],
  "relations": [
    { "id": "rel-projects-owner", "fromTableId": "tbl-projects", "toTableId": "tbl-users",
      "fromColumnId": "col-projects-owner", "toColumnId": "col-users-id", "relationship": "many-to-one" },
    { "id": "rel-tasks-project", "fromTableId": "tbl-tasks", "toTableId": "tbl-projects",
      "fromColumnId": "col-tasks-project", "toColumnId": "col-projects-id", "relationship": "many-to-one" },
    { "id": "rel-tasks-assignee", "fromTableId": "tbl-tasks", "toTableId": "tbl-users",
      "fromColumnId": "col-tasks-owner", "toColumnId": "col-users-id", "relationship": "many-to-one" }
  ]
}"#;

/// Junction table with a composite key built from two foreign keys.
pub const JUNCTION_JSON: &str = r#"{
  "tables": [
    {
      "id": "t-posts",
      "name": "posts",
      "columns": [
        { "id": "c-id", "name": "id", "type": "bigint", "isPrimaryKey": true }
      ]
    },
    {
      "id": "t-tags",
      "name": "tags",
      "columns": [
        { "id": "c-id", "name": "id", "type": "bigint", "isPrimaryKey": true },
        { "id": "c-slug", "name": "slug", "type": "text", "isUnique": true, "isNullable": false }
      ]
    },
    {
      "id": "t-post-tags",
      "name": "post_tags",
      "description": "Links posts to tags.",
      "columns": [
        { "id": "c-post", "name": "post_id", "type": "bigint", "isPrimaryKey": true, "isForeignKey": true,
          "references": { "tableId": "t-posts", "columnId": "c-id" } },
        { "id": "c-tag", "name": "tag_id", "type": "bigint", "isPrimaryKey": true, "isForeignKey": true,
          "references": { "tableId": "t-tags", "columnId": "c-id" } }
      ]
    }
  ],
  "relations": [
    { "id": "r1", "fromTableId": "t-posts", "toTableId": "t-tags",
      "fromColumnId": "c-id", "toColumnId": "c-id", "relationship": "many-to-many", "description": "tagged with" }
  ]
}"#;

pub fn projects() -> Schema {
    Schema::from_json(PROJECTS_JSON).unwrap()
}

pub fn junction() -> Schema {
    Schema::from_json(JUNCTION_JSON).unwrap()
}
