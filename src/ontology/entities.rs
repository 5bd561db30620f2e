use std::fmt::{self, Display, Formatter};

use super::value_objects::{AttributeValue, Attributes};

/// Top-level lists a model fragment can declare.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Section {
    Classes,
    Relations,
    Properties,
    Namespaces,
}

impl Section {
    /// Key of the section inside a fragment document.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Classes => "classes",
            Self::Relations => "relations",
            Self::Properties => "properties",
            Self::Namespaces => "namespaces",
        }
    }
}

impl Display for Section {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One named item of a fragment section.
///
/// The name is the entry's title and the natural key every later `MATCH`
/// uses. An entry declared without a body (`- name: ~`) has no attribute map.
#[derive(Clone, Debug, PartialEq)]
pub struct Entry {
    name: String,
    attributes: Option<Attributes>,
}

impl Entry {
    #[must_use]
    pub fn new(name: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            name: name.into(),
            attributes: Some(attributes),
        }
    }

    /// Creates an entry that was declared without an attribute map.
    #[must_use]
    pub fn bare(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: None,
        }
    }

    /// Returns the entry title.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn attributes(&self) -> Option<&Attributes> {
        self.attributes.as_ref()
    }

    /// Looks up a single field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&AttributeValue> {
        self.attributes.as_ref().and_then(|attributes| attributes.get(field))
    }

    /// Renders the attribute map for diagnostics.
    #[must_use]
    pub fn dump(&self) -> String {
        self.attributes
            .as_ref()
            .map_or_else(|| "null".to_string(), ToString::to_string)
    }
}

/// A single imported unit of domain-model configuration.
///
/// Fragments are read-only once loaded. Optional sections stay `None` when
/// the source does not declare them so synthesizers can tell "declared but
/// empty" from "not declared".
#[derive(Clone, Debug, PartialEq)]
pub struct ModelFragment {
    name: String,
    classes: Vec<Entry>,
    relations: Option<Vec<Entry>>,
    properties: Option<Vec<Entry>>,
    namespaces: Option<Vec<Entry>>,
}

impl ModelFragment {
    /// Creates a fragment holding only classes.
    #[must_use]
    pub fn new(name: impl Into<String>, classes: Vec<Entry>) -> Self {
        Self {
            name: name.into(),
            classes,
            relations: None,
            properties: None,
            namespaces: None,
        }
    }

    #[must_use]
    pub fn with_relations(mut self, relations: Vec<Entry>) -> Self {
        self.relations = Some(relations);
        self
    }

    #[must_use]
    pub fn with_properties(mut self, properties: Vec<Entry>) -> Self {
        self.properties = Some(properties);
        self
    }

    #[must_use]
    pub fn with_namespaces(mut self, namespaces: Vec<Entry>) -> Self {
        self.namespaces = Some(namespaces);
        self
    }

    /// Returns the fragment name, derived from its source.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn classes(&self) -> &[Entry] {
        &self.classes
    }

    #[must_use]
    pub fn relations(&self) -> Option<&[Entry]> {
        self.relations.as_deref()
    }

    #[must_use]
    pub fn properties(&self) -> Option<&[Entry]> {
        self.properties.as_deref()
    }

    #[must_use]
    pub fn namespaces(&self) -> Option<&[Entry]> {
        self.namespaces.as_deref()
    }

    /// Returns the entries of a section, `None` when it was not declared.
    #[must_use]
    pub fn section(&self, section: Section) -> Option<&[Entry]> {
        match section {
            Section::Classes => Some(self.classes()),
            Section::Relations => self.relations(),
            Section::Properties => self.properties(),
            Section::Namespaces => self.namespaces(),
        }
    }
}
