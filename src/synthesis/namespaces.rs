use super::{validate, Synthesizer};
use crate::{
    diagnostics::{Diagnostics, Notice},
    graph::{
        statement::{create_node, PropertyMap},
        Statement,
    },
    ontology::{EntrySchema, ModelFragment, Section},
};

/// Label of every namespace node.
pub const NAMESPACE_LABEL: &str = "namespace";

/// Creates one node per namespace entry.
pub struct NamespaceSynthesizer;

impl Synthesizer for NamespaceSynthesizer {
    fn phase(&self) -> &'static str {
        "namespace creation"
    }

    fn synthesize(
        &self,
        fragments: &[ModelFragment],
        diagnostics: &mut Diagnostics,
    ) -> Vec<Statement> {
        let schema = &EntrySchema::NAMESPACE;
        let mut statements = Vec::new();
        for fragment in fragments {
            let Some(namespaces) = fragment.namespaces() else {
                diagnostics.info(Notice::MissingSection {
                    fragment: fragment.name().to_string(),
                    section: Section::Namespaces,
                });
                continue;
            };
            for entry in namespaces {
                let Some(namespace) = validate(fragment, entry, schema, diagnostics) else {
                    continue;
                };
                let map = PropertyMap::titled(namespace.title())
                    .pass_through(namespace.attributes(), schema.reserved);
                statements.push(Statement::new(
                    create_node(&[NAMESPACE_LABEL], &map),
                    format!("Creating namespace node: {}", namespace.title()),
                ));
            }
        }
        statements
    }
}

#[cfg(test)]
mod tests {
    use super::NamespaceSynthesizer;
    use crate::{
        diagnostics::{Diagnostics, Issue, Notice},
        ontology::{Attributes, Entry, EntryKind, ModelFragment, Section},
        synthesis::Synthesizer,
    };

    #[test]
    fn namespace_nodes_pass_every_attribute_through() {
        let fragment = ModelFragment::new("root", vec![]).with_namespaces(vec![
            Entry::new(
                "sim",
                Attributes::new()
                    .with("uri", "http://example.org/sim#")
                    .with("title", "ignored"),
            ),
            Entry::new("empty", Attributes::new()),
        ]);
        let mut diagnostics = Diagnostics::new();

        let statements = NamespaceSynthesizer.synthesize(&[fragment], &mut diagnostics);

        let texts: Vec<_> = statements.iter().map(|s| s.text()).collect();
        assert_eq!(
            texts,
            vec![
                "CREATE(:namespace { title: 'sim', uri: 'http://example.org/sim#' })",
                "CREATE(:namespace { title: 'empty' })",
            ]
        );
        assert_eq!(statements[0].description(), "Creating namespace node: sim");
        assert!(diagnostics.events().is_empty());
    }

    #[test]
    fn bare_namespace_is_a_warning() {
        let fragment =
            ModelFragment::new("root", vec![]).with_namespaces(vec![Entry::bare("orphan")]);
        let mut diagnostics = Diagnostics::new();

        let statements = NamespaceSynthesizer.synthesize(&[fragment], &mut diagnostics);

        assert!(statements.is_empty());
        let warnings: Vec<_> = diagnostics.warnings().collect();
        assert!(matches!(
            warnings.as_slice(),
            [Issue::InvalidEntry { kind: EntryKind::Namespace, entry, defect, dump, .. }]
                if entry == "orphan" && defect.no_attributes && dump == "null"
        ));
    }

    #[test]
    fn fragments_without_namespaces_get_a_notice() {
        let mut diagnostics = Diagnostics::new();
        NamespaceSynthesizer.synthesize(&[ModelFragment::new("leaf", vec![])], &mut diagnostics);

        assert_eq!(
            diagnostics.notices().collect::<Vec<_>>(),
            vec![&Notice::MissingSection {
                fragment: "leaf".into(),
                section: Section::Namespaces,
            }]
        );
    }
}
