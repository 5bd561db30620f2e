//! Synthesizers translate one kind of entry into graph statements.
//!
//! Each synthesizer walks fragments in input order and entries in declaration
//! order. Problems with an entry are recorded in [`Diagnostics`] and only that
//! entry is skipped.

pub mod namespaces;
pub mod nodes;
pub mod properties;
pub mod relations;
pub mod subclass;

pub use namespaces::NamespaceSynthesizer;
pub use nodes::NodeSynthesizer;
pub use properties::{PropertyNodeSynthesizer, PropertyRelation, PropertyRelationSynthesizer};
pub use relations::ObjectPropertySynthesizer;
pub use subclass::SubclassSynthesizer;

use crate::{
    diagnostics::{Diagnostics, Issue},
    graph::Statement,
    ontology::{AttributeValue, Entry, EntrySchema, ModelFragment, ValidatedEntry},
};

/// One phase of a population run.
pub trait Synthesizer: Send + Sync {
    /// Short name of the phase, used in logs.
    fn phase(&self) -> &'static str;

    /// Produces the statements of this phase.
    fn synthesize(&self, fragments: &[ModelFragment], diagnostics: &mut Diagnostics)
        -> Vec<Statement>;
}

/// Synthesizers in the order a run executes them.
///
/// Nodes come first so every later `MATCH` finds its endpoints; property
/// nodes are created before the property relations that point at them.
#[must_use]
pub fn pipeline() -> Vec<Box<dyn Synthesizer>> {
    vec![
        Box::new(NodeSynthesizer),
        Box::new(SubclassSynthesizer),
        Box::new(ObjectPropertySynthesizer),
        Box::new(NamespaceSynthesizer),
        Box::new(PropertyNodeSynthesizer),
        Box::new(PropertyRelationSynthesizer::new(PropertyRelation::Required)),
        Box::new(PropertyRelationSynthesizer::new(PropertyRelation::Optional)),
    ]
}

/// Validates an entry, recording a warning when it does not fit its schema.
fn validate<'e>(
    fragment: &ModelFragment,
    entry: &'e Entry,
    schema: &EntrySchema,
    diagnostics: &mut Diagnostics,
) -> Option<ValidatedEntry<'e>> {
    match schema.validate(entry) {
        Ok(valid) => Some(valid),
        Err(defect) => {
            diagnostics.warn(Issue::InvalidEntry {
                fragment: fragment.name().to_string(),
                kind: schema.kind,
                entry: entry.name().to_string(),
                defect,
                dump: entry.dump(),
            });
            None
        }
    }
}

/// Resolves a reference field (`subclass_of`, `required_property`,
/// `optional_property`) to the titles it names.
///
/// Returns `None` when the field is missing or `absent` accepts its value. A
/// string yields one target and a list one target per element; any other
/// value, and any non-string list element, is recorded as a warning and
/// contributes no target.
fn references<'e>(
    fragment: &ModelFragment,
    entry: &'e Entry,
    field: &str,
    absent: fn(&AttributeValue) -> bool,
    diagnostics: &mut Diagnostics,
) -> Option<Vec<&'e str>> {
    let value = entry.get(field).filter(|value| !absent(value))?;
    let unsupported = |found: String| Issue::UnsupportedReference {
        fragment: fragment.name().to_string(),
        entry: entry.name().to_string(),
        field: field.to_string(),
        found,
    };

    let targets = match value {
        AttributeValue::Text(target) => vec![target.as_str()],
        AttributeValue::List(items) => items
            .iter()
            .filter_map(|item| match item {
                AttributeValue::Text(target) => Some(target.as_str()),
                other => {
                    diagnostics.warn(unsupported(format!(
                        "list containing a non-string ({})",
                        other.type_name()
                    )));
                    None
                }
            })
            .collect(),
        other => {
            diagnostics.warn(unsupported(other.type_name().to_string()));
            vec![]
        }
    };
    Some(targets)
}
