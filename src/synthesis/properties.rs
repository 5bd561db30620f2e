use std::fmt::{self, Display, Formatter};

use super::{references, validate, Synthesizer};
use crate::{
    diagnostics::{Diagnostics, Notice},
    graph::{
        statement::{create_edge, create_node, PropertyMap},
        Statement,
    },
    ontology::{AttributeValue, EntrySchema, ModelFragment, Section},
};

/// Creates one doubly-labelled node per property entry.
pub struct PropertyNodeSynthesizer;

impl Synthesizer for PropertyNodeSynthesizer {
    fn phase(&self) -> &'static str {
        "property node creation"
    }

    fn synthesize(
        &self,
        fragments: &[ModelFragment],
        diagnostics: &mut Diagnostics,
    ) -> Vec<Statement> {
        let schema = &EntrySchema::PROPERTY;
        let mut statements = Vec::new();
        for fragment in fragments {
            let Some(properties) = fragment.properties() else {
                diagnostics.info(Notice::MissingSection {
                    fragment: fragment.name().to_string(),
                    section: Section::Properties,
                });
                continue;
            };
            for entry in properties {
                let Some(property) = validate(fragment, entry, schema, diagnostics) else {
                    continue;
                };
                let map = PropertyMap::titled(property.title())
                    .pass_through(property.attributes(), schema.reserved);
                statements.push(Statement::new(
                    create_node(&[property.field("label"), property.field("label2")], &map),
                    format!("Creating property node: {}", property.title()),
                ));
            }
        }
        statements
    }
}

/// Which class field a [`PropertyRelationSynthesizer`] follows.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PropertyRelation {
    Required,
    Optional,
}

impl PropertyRelation {
    /// Field on the class entry, which is also the emitted edge type.
    #[must_use]
    pub fn field(self) -> &'static str {
        match self {
            Self::Required => "required_property",
            Self::Optional => "optional_property",
        }
    }
}

impl Display for PropertyRelation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.field())
    }
}

/// Connects classes to the property nodes named in `required_property` or
/// `optional_property`.
///
/// A class without the field, or with an empty string in it, is skipped
/// silently. `null` is a warning like any other value that is neither a
/// string nor a list.
pub struct PropertyRelationSynthesizer {
    relation: PropertyRelation,
}

impl PropertyRelationSynthesizer {
    #[must_use]
    pub fn new(relation: PropertyRelation) -> Self {
        Self { relation }
    }
}

impl Synthesizer for PropertyRelationSynthesizer {
    fn phase(&self) -> &'static str {
        match self.relation {
            PropertyRelation::Required => "required_property relation creation",
            PropertyRelation::Optional => "optional_property relation creation",
        }
    }

    fn synthesize(
        &self,
        fragments: &[ModelFragment],
        diagnostics: &mut Diagnostics,
    ) -> Vec<Statement> {
        let kind = self.relation.field();
        let mut statements = Vec::new();
        for fragment in fragments {
            for entry in fragment.classes() {
                let Some(targets) = references(fragment, entry, kind, is_empty_text, diagnostics)
                else {
                    continue;
                };
                statements.extend(targets.into_iter().map(|target| {
                    Statement::new(
                        create_edge(entry.name(), target, kind, None),
                        format!("Creating property relation from {} to {target}", entry.name()),
                    )
                }));
            }
        }
        statements
    }
}

fn is_empty_text(value: &AttributeValue) -> bool {
    matches!(value, AttributeValue::Text(text) if text.is_empty())
}
