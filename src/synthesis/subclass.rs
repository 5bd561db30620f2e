use super::{references, Synthesizer};
use crate::{
    diagnostics::{Diagnostics, Notice},
    graph::{statement::create_edge, Statement},
    ontology::{AttributeValue, ModelFragment},
};

/// Connects every class to the parents named in its `subclass_of`.
///
/// Edges point from the child to the parent. A falsy `subclass_of` (`null`,
/// `false`, zero or empty) counts as no parent.
pub struct SubclassSynthesizer;

impl Synthesizer for SubclassSynthesizer {
    fn phase(&self) -> &'static str {
        "subclass relation creation"
    }

    fn synthesize(
        &self,
        fragments: &[ModelFragment],
        diagnostics: &mut Diagnostics,
    ) -> Vec<Statement> {
        let mut statements = Vec::new();
        for fragment in fragments {
            for entry in fragment.classes() {
                let Some(parents) = references(
                    fragment,
                    entry,
                    "subclass_of",
                    AttributeValue::is_falsy,
                    diagnostics,
                ) else {
                    diagnostics.info(Notice::NoSubclass {
                        fragment: fragment.name().to_string(),
                        entry: entry.name().to_string(),
                    });
                    continue;
                };
                statements.extend(parents.into_iter().map(|parent| {
                    Statement::new(
                        create_edge(entry.name(), parent, "subclass_of", None),
                        format!("Creating subclass relation from {} to {parent}", entry.name()),
                    )
                }));
            }
        }
        statements
    }
}
