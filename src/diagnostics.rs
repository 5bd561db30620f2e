//! Run-level accumulator for recoverable issues and informational notices.
//!
//! A [`Diagnostics`] value is created per run and threaded through every
//! synthesizer and the query sink. Recording a warning flips the run's
//! failure flag, which the run controller inspects once at the end.

use std::fmt::{self, Display, Formatter};

use tracing::{info, warn};

use crate::ontology::{EntryDefect, EntryKind, Section};

/// A recoverable problem. The affected entry or statement is skipped and the
/// run continues.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Issue {
    #[error(
        "{kind} entry `{entry}` in fragment `{fragment}` {defect}; nothing is created for it. \
         Entry: {dump}"
    )]
    InvalidEntry {
        fragment: String,
        kind: EntryKind,
        entry: String,
        defect: EntryDefect,
        dump: String,
    },

    #[error(
        "`{field}` of `{entry}` in fragment `{fragment}` is a {found}, expected a string or a list \
         of strings; no {field} relation is created for it"
    )]
    UnsupportedReference {
        fragment: String,
        entry: String,
        field: String,
        found: String,
    },

    #[error("graph store rejected the statement ({description}): {message}")]
    StatementRejected {
        description: String,
        message: String,
    },

    #[error("could not write the statement ({description}) to the transcript: {message}")]
    TranscriptWrite {
        description: String,
        message: String,
    },
}

/// Informational events that never fail a run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    /// An optional section is not declared by a fragment.
    MissingSection { fragment: String, section: Section },
    /// A class carries no `subclass_of` and therefore gets no subclass edge.
    NoSubclass { fragment: String, entry: String },
}

impl Display for Notice {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSection { fragment, section } => write!(
                f,
                "no list called `{section}` in fragment `{fragment}`; nothing is created from it. \
                 This is fine if intended"
            ),
            Self::NoSubclass { fragment, entry } => write!(
                f,
                "class `{entry}` in fragment `{fragment}` has no `subclass_of`; no subclass \
                 relation is created. This is fine if `{entry}` belongs to the root classes"
            ),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Diagnostic {
    Info(Notice),
    Warning(Issue),
}

#[derive(Debug, Default)]
pub struct Diagnostics {
    events: Vec<Diagnostic>,
}

impl Diagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&mut self, notice: Notice) {
        info!("{notice}");
        self.events.push(Diagnostic::Info(notice));
    }

    pub fn warn(&mut self, issue: Issue) {
        warn!("{issue}");
        self.events.push(Diagnostic::Warning(issue));
    }

    /// The run's failure flag: `true` once any warning was recorded.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        self.warnings().next().is_some()
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Issue> {
        self.events.iter().filter_map(|event| match event {
            Diagnostic::Warning(issue) => Some(issue),
            Diagnostic::Info(_) => None,
        })
    }

    pub fn notices(&self) -> impl Iterator<Item = &Notice> {
        self.events.iter().filter_map(|event| match event {
            Diagnostic::Info(notice) => Some(notice),
            Diagnostic::Warning(_) => None,
        })
    }

    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    /// All events in the order they were recorded.
    #[must_use]
    pub fn events(&self) -> &[Diagnostic] {
        &self.events
    }
}
