//! Declarative per-kind entry schemas.
//!
//! Every synthesizer validates its entries through [`EntrySchema::validate`],
//! which checks all required fields at once and reports every defect of an
//! entry together instead of stopping at the first one.

use std::fmt::{self, Display, Formatter};

use super::{
    entities::Entry,
    value_objects::{AttributeValue, Attributes},
};

/// Kind of entry a schema describes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EntryKind {
    Class,
    Relation,
    Property,
    Namespace,
}

impl Display for EntryKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Class => "class",
            Self::Relation => "relation",
            Self::Property => "property",
            Self::Namespace => "namespace",
        })
    }
}

/// Required and reserved field names of one entry kind.
///
/// Required fields must be present with a scalar value. Reserved fields are
/// consumed structurally and never copied onto the emitted node or edge;
/// everything else passes through.
#[derive(Debug, PartialEq, Eq)]
pub struct EntrySchema {
    pub kind: EntryKind,
    pub required: &'static [&'static str],
    pub reserved: &'static [&'static str],
}

impl EntrySchema {
    pub const CLASS: Self = Self {
        kind: EntryKind::Class,
        required: &["label", "identifier"],
        reserved: &[
            "label",
            "identifier",
            "subclass_of",
            "required_property",
            "optional_property",
            "title",
        ],
    };

    pub const RELATION: Self = Self {
        kind: EntryKind::Relation,
        required: &["from_entity", "to_entity", "namespace", "label", "identifier"],
        reserved: &[
            "label",
            "from_entity",
            "to_entity",
            "namespace",
            "identifier",
            "title",
        ],
    };

    pub const PROPERTY: Self = Self {
        kind: EntryKind::Property,
        required: &["label", "label2"],
        reserved: &["label", "label2", "title"],
    };

    pub const NAMESPACE: Self = Self {
        kind: EntryKind::Namespace,
        required: &[],
        reserved: &["title"],
    };

    #[must_use]
    pub fn is_reserved(&self, field: &str) -> bool {
        self.reserved.contains(&field)
    }

    /// Checks an entry against the schema.
    ///
    /// # Errors
    ///
    /// Returns every defect found on the entry: missing required fields,
    /// required fields holding a list or map, and a missing attribute map.
    pub fn validate<'e>(&self, entry: &'e Entry) -> Result<ValidatedEntry<'e>, EntryDefect> {
        let Some(attributes) = entry.attributes() else {
            return Err(EntryDefect {
                missing: self.required.to_vec(),
                not_scalar: vec![],
                no_attributes: true,
            });
        };

        let mut defect = EntryDefect::default();
        let mut required = Vec::with_capacity(self.required.len());
        for &field in self.required {
            match attributes.get(field) {
                None | Some(AttributeValue::Null) => defect.missing.push(field),
                Some(value) if !value.is_scalar() => defect.not_scalar.push(field),
                Some(value) => required.push((field, value.stringify())),
            }
        }

        if defect.is_empty() {
            Ok(ValidatedEntry {
                entry,
                attributes,
                required,
            })
        } else {
            Err(defect)
        }
    }
}

/// Everything wrong with one entry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EntryDefect {
    pub missing: Vec<&'static str>,
    pub not_scalar: Vec<&'static str>,
    pub no_attributes: bool,
}

impl EntryDefect {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.not_scalar.is_empty() && !self.no_attributes
    }
}

impl Display for EntryDefect {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if self.no_attributes {
            parts.push("has no attribute map".to_string());
        }
        if !self.missing.is_empty() {
            parts.push(format!("is missing {}", field_list(&self.missing)));
        }
        if !self.not_scalar.is_empty() {
            parts.push(format!(
                "needs a single value for {}",
                field_list(&self.not_scalar)
            ));
        }
        f.write_str(&parts.join(" and "))
    }
}

fn field_list(fields: &[&str]) -> String {
    fields
        .iter()
        .map(|field| format!("`{field}`"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// An entry that passed its schema, with required values resolved to text.
#[derive(Debug)]
pub struct ValidatedEntry<'e> {
    entry: &'e Entry,
    attributes: &'e Attributes,
    required: Vec<(&'static str, String)>,
}

impl<'e> ValidatedEntry<'e> {
    /// Returns the entry title.
    #[must_use]
    pub fn title(&self) -> &'e str {
        self.entry.name()
    }

    /// Returns the textual value of a required field.
    ///
    /// Fields outside the schema's required list resolve to an empty string.
    #[must_use]
    pub fn field(&self, name: &str) -> &str {
        self.required
            .iter()
            .find(|(field, _)| *field == name)
            .map_or("", |(_, value)| value.as_str())
    }

    #[must_use]
    pub fn attributes(&self) -> &'e Attributes {
        self.attributes
    }
}

#[cfg(test)]
mod tests {
    use super::{EntryDefect, EntrySchema};
    use crate::ontology::{
        entities::Entry,
        value_objects::{AttributeValue, Attributes},
    };

    #[test]
    fn class_schema_resolves_required_fields() {
        let entry = Entry::new(
            "A",
            Attributes::new()
                .with("label", "TBox")
                .with("identifier", "id:a")
                .with("version", 3_i64),
        );
        let valid = EntrySchema::CLASS.validate(&entry).expect("valid class");
        assert_eq!(valid.title(), "A");
        assert_eq!(valid.field("label"), "TBox");
        assert_eq!(valid.field("identifier"), "id:a");
        assert_eq!(valid.field("version"), "");
    }

    #[test]
    fn all_missing_fields_are_reported_together() {
        let entry = Entry::new(
            "broken",
            Attributes::new()
                .with("label", "rel")
                .with("from_entity", vec!["A", "B"])
                .with("to_entity", AttributeValue::Null),
        );
        let defect = EntrySchema::RELATION.validate(&entry).expect_err("invalid");
        assert_eq!(
            defect,
            EntryDefect {
                missing: vec!["to_entity", "namespace", "identifier"],
                not_scalar: vec!["from_entity"],
                no_attributes: false,
            }
        );
        assert_eq!(
            defect.to_string(),
            "is missing `to_entity`, `namespace`, `identifier` and needs a single value for `from_entity`"
        );
    }

    #[test]
    fn numeric_identifiers_are_stringified() {
        let entry = Entry::new(
            "A",
            Attributes::new()
                .with("label", "TBox")
                .with("identifier", 42_i64),
        );
        let valid = EntrySchema::CLASS.validate(&entry).expect("valid class");
        assert_eq!(valid.field("identifier"), "42");
    }

    #[test]
    fn namespace_without_attribute_map_is_a_defect() {
        let defect = EntrySchema::NAMESPACE
            .validate(&Entry::bare("ns"))
            .expect_err("no attributes");
        assert!(defect.no_attributes);
        assert!(defect.missing.is_empty());
        assert_eq!(defect.to_string(), "has no attribute map");

        let empty = Entry::new("ns", Attributes::new());
        let valid = EntrySchema::NAMESPACE
            .validate(&empty)
            .expect("empty map is fine");
        assert!(valid.attributes().is_empty());
    }

    #[test]
    fn reserved_fields() {
        assert!(EntrySchema::CLASS.is_reserved("subclass_of"));
        assert!(EntrySchema::CLASS.is_reserved("title"));
        assert!(!EntrySchema::CLASS.is_reserved("description"));
        assert!(EntrySchema::PROPERTY.is_reserved("label2"));
        assert!(!EntrySchema::NAMESPACE.is_reserved("uri"));
    }
}
