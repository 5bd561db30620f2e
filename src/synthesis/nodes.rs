use super::{validate, Synthesizer};
use crate::{
    diagnostics::Diagnostics,
    graph::{
        statement::{create_node, PropertyMap},
        Statement,
    },
    ontology::{EntrySchema, ModelFragment},
};

/// Creates one node per class entry.
pub struct NodeSynthesizer;

impl Synthesizer for NodeSynthesizer {
    fn phase(&self) -> &'static str {
        "node creation"
    }

    fn synthesize(
        &self,
        fragments: &[ModelFragment],
        diagnostics: &mut Diagnostics,
    ) -> Vec<Statement> {
        let schema = &EntrySchema::CLASS;
        let mut statements = Vec::new();
        for fragment in fragments {
            for entry in fragment.classes() {
                let Some(class) = validate(fragment, entry, schema, diagnostics) else {
                    continue;
                };
                let properties = PropertyMap::titled(class.title())
                    .text("identifier", class.field("identifier"))
                    .pass_through(class.attributes(), schema.reserved);
                statements.push(Statement::new(
                    create_node(&[class.field("label")], &properties),
                    format!("Creating node: {}", class.title()),
                ));
            }
        }
        statements
    }
}
