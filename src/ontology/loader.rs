use std::{
    fs,
    path::{Path, PathBuf},
};

use serde_yaml::{Mapping, Value};
use tracing::debug;

use super::{
    entities::{Entry, ModelFragment, Section},
    value_objects::{AttributeValue, Attributes},
};

/// Structural problems that make a set of fragments unusable.
///
/// Unlike per-entry issues these abort the run before anything reaches the
/// graph store.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("no model fragments given")]
    NoSources,

    #[error("model fragment `{path}` can not be read: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("model fragment `{fragment}` can not be parsed: {source}")]
    Parse {
        fragment: String,
        source: serde_yaml::Error,
    },

    #[error("model fragment `{fragment}` is not a mapping")]
    NotAMapping { fragment: String },

    #[error("no list called `classes` found in model fragment `{fragment}`")]
    MissingClasses { fragment: String },

    #[error("`{section}` in model fragment `{fragment}` is not a list")]
    NotAList { fragment: String, section: Section },

    #[error(
        "model fragment `{fragment}` is stated first and represents the uppermost level, it needs a \
         list called `namespaces`"
    )]
    RootMissingNamespaces { fragment: String },

    #[error("item {index} of `{section}` in model fragment `{fragment}` is not a single-key mapping")]
    MalformedEntry {
        fragment: String,
        section: Section,
        index: usize,
    },

    #[error(
        "entry `{entry}` of `{section}` in model fragment `{fragment}` must map to attributes, found \
         a {found}"
    )]
    MalformedBody {
        fragment: String,
        section: Section,
        entry: String,
        found: &'static str,
    },

    #[error("entry `{entry}` in model fragment `{fragment}` uses a {found} as a field name")]
    UnsupportedKey {
        fragment: String,
        entry: String,
        found: &'static str,
    },
}

/// Loads model fragments from files and enforces their top-level shape.
#[derive(Debug, Default, Clone, Copy)]
pub struct FragmentLoader;

impl FragmentLoader {
    /// Loads every source in order and checks the root fragment.
    ///
    /// The first source is the root of the domain model and must declare
    /// `namespaces`; later fragments may omit it.
    ///
    /// # Errors
    ///
    /// Fails on the first source that can not be read or parsed, on any
    /// shape violation, and when `sources` is empty.
    pub fn load_all<P: AsRef<Path>>(sources: &[P]) -> Result<Vec<ModelFragment>, LoadError> {
        if sources.is_empty() {
            return Err(LoadError::NoSources);
        }
        let fragments = sources
            .iter()
            .map(|source| Self::load(source.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        check_root(&fragments)?;
        Ok(fragments)
    }

    /// Loads a single fragment file.
    ///
    /// YAML and JSON are both accepted; JSON goes through the YAML parser so
    /// field order is preserved either way. The fragment is named after the
    /// file stem.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] when the file can not be read or its content
    /// is not a well-formed fragment.
    pub fn load(path: &Path) -> Result<ModelFragment, LoadError> {
        let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_stem()
            .map_or_else(|| path.display().to_string(), |stem| stem.to_string_lossy().into_owned());
        let fragment = ModelFragment::from_yaml_str(name, &content)?;
        debug!(
            fragment = fragment.name(),
            path = %path.display(),
            classes = fragment.classes().len(),
            "model fragment loaded"
        );
        Ok(fragment)
    }
}

/// The first fragment of a run must carry `namespaces`.
///
/// # Errors
///
/// Returns [`LoadError::RootMissingNamespaces`] naming the root fragment.
pub fn check_root(fragments: &[ModelFragment]) -> Result<(), LoadError> {
    match fragments.first() {
        Some(root) if root.namespaces().is_none() => Err(LoadError::RootMissingNamespaces {
            fragment: root.name().to_string(),
        }),
        _ => Ok(()),
    }
}

impl ModelFragment {
    /// Parses a fragment document from YAML (or JSON) text.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] when the text does not parse or the document
    /// violates the fragment shape.
    pub fn from_yaml_str(name: impl Into<String>, content: &str) -> Result<Self, LoadError> {
        let name = name.into();
        let document: Value = serde_yaml::from_str(content).map_err(|source| LoadError::Parse {
            fragment: name.clone(),
            source,
        })?;
        let Value::Mapping(document) = untag(document) else {
            return Err(LoadError::NotAMapping { fragment: name });
        };
        FragmentReader {
            fragment: &name,
            document: &document,
        }
        .read()
    }
}

struct FragmentReader<'a> {
    fragment: &'a str,
    document: &'a Mapping,
}

impl FragmentReader<'_> {
    fn read(&self) -> Result<ModelFragment, LoadError> {
        let Some(classes) = self.section(Section::Classes)? else {
            return Err(LoadError::MissingClasses {
                fragment: self.fragment.to_string(),
            });
        };
        let mut fragment = ModelFragment::new(self.fragment, classes);
        if let Some(relations) = self.section(Section::Relations)? {
            fragment = fragment.with_relations(relations);
        }
        if let Some(properties) = self.section(Section::Properties)? {
            fragment = fragment.with_properties(properties);
        }
        if let Some(namespaces) = self.section(Section::Namespaces)? {
            fragment = fragment.with_namespaces(namespaces);
        }
        Ok(fragment)
    }

    fn section(&self, section: Section) -> Result<Option<Vec<Entry>>, LoadError> {
        let Some(value) = self.document.get(section.key()) else {
            return Ok(None);
        };
        let Value::Sequence(items) = untag(value.clone()) else {
            return Err(LoadError::NotAList {
                fragment: self.fragment.to_string(),
                section,
            });
        };
        items
            .into_iter()
            .enumerate()
            .map(|(index, item)| self.entry(section, index, item))
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }

    fn entry(&self, section: Section, index: usize, item: Value) -> Result<Entry, LoadError> {
        let malformed = || LoadError::MalformedEntry {
            fragment: self.fragment.to_string(),
            section,
            index,
        };
        let Value::Mapping(item) = untag(item) else {
            return Err(malformed());
        };
        if item.len() != 1 {
            return Err(malformed());
        }
        let Some((Value::String(name), body)) = item.into_iter().next() else {
            return Err(malformed());
        };

        match untag(body) {
            Value::Null => Ok(Entry::bare(name)),
            Value::Mapping(fields) => {
                let attributes = self.attributes(&name, fields)?;
                Ok(Entry::new(name, attributes))
            }
            other => Err(LoadError::MalformedBody {
                fragment: self.fragment.to_string(),
                section,
                entry: name,
                found: yaml_type_name(&other),
            }),
        }
    }

    fn attributes(&self, entry: &str, fields: Mapping) -> Result<Attributes, LoadError> {
        let mut attributes = Attributes::new();
        for (key, value) in fields {
            let name = match untag(key) {
                Value::String(text) => text,
                Value::Number(number) => number.to_string(),
                Value::Bool(flag) => flag.to_string(),
                other => {
                    return Err(LoadError::UnsupportedKey {
                        fragment: self.fragment.to_string(),
                        entry: entry.to_string(),
                        found: yaml_type_name(&other),
                    })
                }
            };
            let value = self.value(entry, value)?;
            attributes.insert(name, value);
        }
        Ok(attributes)
    }

    fn value(&self, entry: &str, value: Value) -> Result<AttributeValue, LoadError> {
        Ok(match untag(value) {
            Value::Null => AttributeValue::Null,
            Value::Bool(flag) => AttributeValue::Boolean(flag),
            Value::Number(number) => AttributeValue::Number(number),
            Value::String(text) => AttributeValue::Text(text),
            Value::Sequence(items) => AttributeValue::List(
                items
                    .into_iter()
                    .map(|item| self.value(entry, item))
                    .collect::<Result<_, _>>()?,
            ),
            Value::Mapping(fields) => AttributeValue::Map(self.attributes(entry, fields)?),
            Value::Tagged(tagged) => self.value(entry, tagged.value)?,
        })
    }
}

fn untag(value: Value) -> Value {
    match value {
        Value::Tagged(tagged) => untag(tagged.value),
        other => other,
    }
}

fn yaml_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "list",
        Value::Mapping(_) => "map",
        Value::Tagged(_) => "tagged value",
    }
}
