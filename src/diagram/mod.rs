//! Diagram projections of a schema.

mod erd;
mod mermaid;

pub use erd::to_erd;
pub use mermaid::to_mermaid;

use crate::schema::Schema;

/// Supported diagram notations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiagramFormat {
    /// Mermaid `erDiagram`
    #[default]
    Mermaid,
    /// ERD DSL (`entity` / `rel` blocks)
    Erd,
}

impl DiagramFormat {
    /// Parse format from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "mermaid" => Some(Self::Mermaid),
            "erd" => Some(Self::Erd),
            _ => None,
        }
    }

    pub fn render(self, schema: &Schema) -> String {
        match self {
            Self::Mermaid => to_mermaid(schema),
            Self::Erd => to_erd(schema),
        }
    }
}

/// Column type as a single token: whitespace runs become `_`.
fn type_token(typ: &str) -> String {
    typ.split_whitespace().collect::<Vec<_>>().join("_")
}
