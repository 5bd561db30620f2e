use super::{validate, Synthesizer};
use crate::{
    diagnostics::{Diagnostics, Notice},
    graph::{
        statement::{create_edge, PropertyMap},
        Statement,
    },
    ontology::{EntrySchema, ModelFragment, Section},
};

/// Creates the typed edges declared under `relations`.
pub struct ObjectPropertySynthesizer;

impl Synthesizer for ObjectPropertySynthesizer {
    fn phase(&self) -> &'static str {
        "object-property relation creation"
    }

    fn synthesize(
        &self,
        fragments: &[ModelFragment],
        diagnostics: &mut Diagnostics,
    ) -> Vec<Statement> {
        let schema = &EntrySchema::RELATION;
        let mut statements = Vec::new();
        for fragment in fragments {
            let Some(relations) = fragment.relations() else {
                diagnostics.info(Notice::MissingSection {
                    fragment: fragment.name().to_string(),
                    section: Section::Relations,
                });
                continue;
            };
            for entry in relations {
                let Some(relation) = validate(fragment, entry, schema, diagnostics) else {
                    continue;
                };
                let (from, to) = (relation.field("from_entity"), relation.field("to_entity"));
                let properties = PropertyMap::titled(relation.title())
                    .text("namespace", relation.field("namespace"))
                    .text("identifier", relation.field("identifier"))
                    .pass_through(relation.attributes(), schema.reserved);
                statements.push(Statement::new(
                    create_edge(from, to, relation.field("label"), Some(&properties)),
                    format!(
                        "Creating object-property-relation '{}' from {from} to {to}",
                        relation.title()
                    ),
                ));
            }
        }
        statements
    }
}

#[cfg(test)]
mod tests {
    use super::ObjectPropertySynthesizer;
    use crate::{
        diagnostics::{Diagnostics, Issue, Notice},
        ontology::{Attributes, Entry, ModelFragment, Section},
        synthesis::Synthesizer,
    };

    fn relation() -> Attributes {
        Attributes::new()
            .with("label", "uses")
            .with("from_entity", "Activity")
            .with("to_entity", "Tool")
            .with("namespace", "sim")
            .with("identifier", "sim:uses")
            .with("pl", "nutzt")
    }

    #[test]
    fn typed_edge_carries_fixed_and_pass_through_fields() {
        let fragment = ModelFragment::new("root", vec![])
            .with_relations(vec![Entry::new("uses", relation())]);
        let mut diagnostics = Diagnostics::new();

        let statements = ObjectPropertySynthesizer.synthesize(&[fragment], &mut diagnostics);

        assert_eq!(statements.len(), 1);
        assert_eq!(
            statements[0].description(),
            "Creating object-property-relation 'uses' from Activity to Tool"
        );
        assert_eq!(
            statements[0].text(),
            "MATCH (a:TBox {title:'Activity'}), (b:TBox {title:'Tool'}) \n CREATE (a)-[:uses { \
             title: 'uses', namespace: 'sim', identifier: 'sim:uses', pl: 'nutzt' }]->(b)"
        );
        assert!(diagnostics.events().is_empty());
    }

    #[test]
    fn relation_missing_namespace_is_skipped() {
        let mut attributes = Attributes::new();
        for (name, value) in relation().iter() {
            if name != "namespace" {
                attributes.insert(name, value.clone());
            }
        }
        let fragment = ModelFragment::new("root", vec![])
            .with_relations(vec![Entry::new("uses", attributes)]);
        let mut diagnostics = Diagnostics::new();

        let statements = ObjectPropertySynthesizer.synthesize(&[fragment], &mut diagnostics);

        assert!(statements.is_empty());
        let warnings: Vec<_> = diagnostics.warnings().collect();
        assert_eq!(warnings.len(), 1);
        let Issue::InvalidEntry { defect, .. } = warnings[0] else {
            panic!("unexpected issue {:?}", warnings[0]);
        };
        assert_eq!(defect.missing, vec!["namespace"]);
        assert!(warnings[0].to_string().contains("`namespace`"));
    }

    #[test]
    fn fragments_without_relations_get_a_notice() {
        let fragment = ModelFragment::new("leaf", vec![]);
        let mut diagnostics = Diagnostics::new();

        let statements = ObjectPropertySynthesizer.synthesize(&[fragment], &mut diagnostics);

        assert!(statements.is_empty());
        assert!(!diagnostics.has_warnings());
        assert_eq!(
            diagnostics.notices().collect::<Vec<_>>(),
            vec![&Notice::MissingSection {
                fragment: "leaf".into(),
                section: Section::Relations,
            }]
        );
    }
}
