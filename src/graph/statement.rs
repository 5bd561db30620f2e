//! Cypher statement rendering.
//!
//! Attribute values follow a closed two-case rule: list values are written as
//! literal lists, every other value is stringified and single-quoted. Field
//! order is the entry's declaration order.

use std::fmt::{self, Display, Formatter};

use crate::ontology::{value_objects::escape, AttributeValue, Attributes};

/// Label every class node carries and every `MATCH` looks up.
pub const MATCH_LABEL: &str = "TBox";

/// Removes every node and relationship from the store.
pub const WIPE_ALL: &str = "MATCH (n) DETACH DELETE n";

/// Keeps class identifiers unique across the store.
pub const IDENTIFIER_CONSTRAINT: &str =
    "CREATE CONSTRAINT tbox_identifier IF NOT EXISTS FOR (n:TBox) REQUIRE n.identifier IS UNIQUE";

/// A single graph mutation together with a short description of its intent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Statement {
    text: String,
    description: String,
}

impl Statement {
    #[must_use]
    pub fn new(text: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            description: description.into(),
        }
    }

    #[must_use]
    pub fn wipe(description: impl Into<String>) -> Self {
        Self::new(WIPE_ALL, description)
    }

    #[must_use]
    pub fn identifier_constraint() -> Self {
        Self::new(IDENTIFIER_CONSTRAINT, "Declaring unique class identifiers")
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Renders one attribute value.
#[must_use]
pub fn render_value(value: &AttributeValue) -> String {
    match value {
        AttributeValue::List(_) => value.to_string(),
        other => quote(&other.stringify()),
    }
}

/// Single-quotes text for use as a Cypher string literal.
#[must_use]
pub fn quote(text: &str) -> String {
    format!("'{}'", escape(text))
}

/// Writes a label, relationship type or property key, backtick-quoting it
/// when it is not a plain identifier.
#[must_use]
pub fn symbol(name: &str) -> String {
    let mut chars = name.chars();
    let plain = chars
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
        && chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_');
    if plain {
        name.to_string()
    } else {
        format!("`{}`", name.replace('`', "``"))
    }
}

/// Renders the pass-through part of a property map: `, name: value` for
/// every field not listed in `reserved`.
#[must_use]
pub fn attribute_clause(attributes: &Attributes, reserved: &[&str]) -> String {
    attributes
        .iter()
        .filter(|(name, _)| !reserved.contains(name))
        .map(|(name, value)| format!(", {}: {}", symbol(name), render_value(value)))
        .collect()
}

/// Property map of a node or relationship under construction.
///
/// Always starts with `title`; fixed fields follow in insertion order and
/// pass-through attributes come last.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertyMap {
    rendered: String,
}

impl PropertyMap {
    #[must_use]
    pub fn titled(title: &str) -> Self {
        Self {
            rendered: format!("title: {}", quote(title)),
        }
    }

    /// Appends a fixed text field.
    #[must_use]
    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.rendered
            .push_str(&format!(", {}: {}", symbol(name), quote(value)));
        self
    }

    /// Appends every non-reserved attribute.
    #[must_use]
    pub fn pass_through(mut self, attributes: &Attributes, reserved: &[&str]) -> Self {
        self.rendered
            .push_str(&attribute_clause(attributes, reserved));
        self
    }
}

impl Display for PropertyMap {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{{ {} }}", self.rendered)
    }
}

/// `CREATE(:Label[:Label2] { ... })`
#[must_use]
pub fn create_node(labels: &[&str], properties: &PropertyMap) -> String {
    let labels: String = labels
        .iter()
        .map(|label| format!(":{}", symbol(label)))
        .collect();
    format!("CREATE({labels} {properties})")
}

/// Matches two class nodes by title and connects them.
///
/// The source is bound to `a` and the target to `b`; the relationship only
/// carries a property map when one is given.
#[must_use]
pub fn create_edge(
    source: &str,
    target: &str,
    kind: &str,
    properties: Option<&PropertyMap>,
) -> String {
    let relationship = match properties {
        Some(properties) => format!("{} {properties}", symbol(kind)),
        None => symbol(kind),
    };
    format!(
        "MATCH (a:{MATCH_LABEL} {{title:{}}}), (b:{MATCH_LABEL} {{title:{}}}) \n CREATE (a)-[:{relationship}]->(b)",
        quote(source),
        quote(target),
    )
}
