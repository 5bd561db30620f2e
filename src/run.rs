//! Population run orchestration.
//!
//! A run prepares the sink, executes every synthesizer of
//! [`crate::synthesis::pipeline`] in order, submits each statement as soon as
//! its phase produced it, and finally applies the compensation policy: a
//! connected run that recorded any warning wipes the store again.

use std::{
    fmt::{self, Display, Formatter},
    path::Path,
};

use tracing::{debug, info};

use crate::{
    diagnostics::{Diagnostics, Issue},
    errors::Error,
    graph::QuerySink,
    ontology::{FragmentLoader, ModelFragment},
    synthesis::{self, Synthesizer},
    Result,
};

/// How a run ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// No warnings were recorded.
    Success,
    /// Warnings were recorded against a connected store, which was wiped.
    AbortedWithCleanup,
    /// Warnings were recorded during a dry run.
    CompletedWithIssues,
}

impl RunOutcome {
    /// Multi-line summary shown to the user at the end of a run.
    #[must_use]
    pub fn summary(self) -> &'static str {
        match self {
            Self::Success => "finished successfully",
            Self::AbortedWithCleanup => {
                "finished with errors: the graph store was cleared because some entries are \
                 missing required information or some statements were rejected.\nSee the \
                 warnings above, fix them and rerun to load the store."
            }
            Self::CompletedWithIssues => {
                "finished without a critical error, but some issues with the model were \
                 found.\nSee the warnings above and fix them before loading a store."
            }
        }
    }

    #[must_use]
    pub fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

impl Display for RunOutcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Success => "success",
            Self::AbortedWithCleanup => "aborted with cleanup",
            Self::CompletedWithIssues => "completed with issues",
        })
    }
}

/// Result of a finished run.
#[derive(Debug)]
pub struct RunReport {
    pub outcome: RunOutcome,
    /// Statements submitted to the sink, excluding preparation and cleanup.
    pub statements: usize,
    /// The compensating wipe was attempted and the store refused it.
    pub cleanup_failed: bool,
    pub diagnostics: Diagnostics,
}

impl RunReport {
    /// Summary shown to the user, accounting for a failed cleanup.
    #[must_use]
    pub fn summary(&self) -> &'static str {
        if self.cleanup_failed {
            "finished with errors and the graph store could not be cleared, it may hold a \
             partial model.\nSee the warnings above, fix them and rerun to load the store."
        } else {
            self.outcome.summary()
        }
    }
}

/// Drives one population run against a [`QuerySink`].
pub struct RunController {
    sink: QuerySink,
    pipeline: Vec<Box<dyn Synthesizer>>,
}

impl RunController {
    #[must_use]
    pub fn new(sink: QuerySink) -> Self {
        Self {
            sink,
            pipeline: synthesis::pipeline(),
        }
    }

    /// Loads `sources` and runs them.
    ///
    /// # Errors
    ///
    /// Fails before anything is submitted when a fragment can not be loaded,
    /// and otherwise behaves like [`RunController::run`].
    pub async fn populate<P: AsRef<Path>>(&mut self, sources: &[P]) -> Result<RunReport> {
        let fragments = FragmentLoader::load_all(sources)?;
        info!(fragments = fragments.len(), "model fragments loaded");
        self.run(&fragments).await
    }

    /// Runs every synthesizer over already loaded fragments.
    ///
    /// # Errors
    ///
    /// Only store preparation can fail the run: refused credentials map to
    /// [`Error::StoreAuthentication`], everything else to [`Error::Store`].
    /// Problems with entries or single statements end up in the report.
    pub async fn run(&mut self, fragments: &[ModelFragment]) -> Result<RunReport> {
        self.sink.prepare().await.map_err(Error::from_store)?;

        let mut diagnostics = Diagnostics::new();
        for synthesizer in &self.pipeline {
            let statements = synthesizer.synthesize(fragments, &mut diagnostics);
            for statement in &statements {
                self.sink.submit(statement, &mut diagnostics).await;
            }
            debug!(statements = statements.len(), "{} finished", synthesizer.phase());
        }

        if let Err(err) = self.sink.flush() {
            diagnostics.warn(Issue::TranscriptWrite {
                description: "Flushing the transcript".to_string(),
                message: err.to_string(),
            });
        }

        let mut cleanup_failed = false;
        let outcome = if !diagnostics.has_warnings() {
            RunOutcome::Success
        } else if self.sink.is_connected() {
            cleanup_failed = !self.sink.compensate().await;
            RunOutcome::AbortedWithCleanup
        } else {
            RunOutcome::CompletedWithIssues
        };

        info!(
            outcome = %outcome,
            statements = self.sink.submitted(),
            warnings = diagnostics.warning_count(),
            cleanup_failed,
            "run finished"
        );
        Ok(RunReport {
            outcome,
            statements: self.sink.submitted(),
            cleanup_failed,
            diagnostics,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use super::{RunController, RunOutcome};
    use crate::{
        errors::Error,
        graph::{statement::WIPE_ALL, GraphStore, QuerySink, StoreError},
        ontology::{Attributes, Entry, ModelFragment},
    };

    #[derive(Default)]
    struct RecordingStore {
        executed: Mutex<Vec<String>>,
        refuse_credentials: bool,
        refuse_cleanup: bool,
    }

    #[async_trait]
    impl GraphStore for RecordingStore {
        async fn execute(&self, statement: &str) -> Result<(), StoreError> {
            if self.refuse_credentials {
                return Err(StoreError::Authentication("bad password".into()));
            }
            let mut executed = self.executed.lock().expect("lock poisoned");
            if self.refuse_cleanup && statement == WIPE_ALL && executed.iter().any(|s| s == WIPE_ALL)
            {
                return Err(StoreError::Rejected("store went away".into()));
            }
            executed.push(statement.to_string());
            Ok(())
        }
    }

    fn root(classes: Vec<Entry>) -> ModelFragment {
        ModelFragment::new("root", classes).with_namespaces(vec![])
    }

    fn class(name: &str) -> Entry {
        Entry::new(
            name,
            Attributes::new()
                .with("label", "TBox")
                .with("identifier", format!("id:{name}")),
        )
    }

    #[tokio::test]
    async fn clean_run_succeeds() {
        let store = Arc::new(RecordingStore::default());
        let mut controller = RunController::new(QuerySink::connected(Arc::clone(&store)));

        let report = controller
            .run(&[root(vec![class("A")])])
            .await
            .expect("run");

        assert_eq!(report.outcome, RunOutcome::Success);
        assert_eq!(report.statements, 1);
        let executed = store.executed.lock().expect("lock").clone();
        assert_eq!(executed.len(), 3);
        assert_eq!(executed[0], WIPE_ALL);
    }

    #[tokio::test]
    async fn warnings_on_a_connected_store_wipe_it() {
        let store = Arc::new(RecordingStore::default());
        let mut controller = RunController::new(QuerySink::connected(Arc::clone(&store)));

        let report = controller
            .run(&[root(vec![class("A"), Entry::new("B", Attributes::new())])])
            .await
            .expect("run");

        assert_eq!(report.outcome, RunOutcome::AbortedWithCleanup);
        assert_eq!(report.diagnostics.warning_count(), 1);
        assert!(!report.cleanup_failed);
        assert_eq!(report.summary(), RunOutcome::AbortedWithCleanup.summary());
        let executed = store.executed.lock().expect("lock").clone();
        assert_eq!(executed.last().map(String::as_str), Some(WIPE_ALL));
    }

    #[tokio::test]
    async fn failed_cleanup_is_reported() {
        let store = Arc::new(RecordingStore {
            refuse_cleanup: true,
            ..RecordingStore::default()
        });
        let mut controller = RunController::new(QuerySink::connected(Arc::clone(&store)));

        let report = controller
            .run(&[root(vec![Entry::new("B", Attributes::new())])])
            .await
            .expect("run");

        assert_eq!(report.outcome, RunOutcome::AbortedWithCleanup);
        assert!(report.cleanup_failed);
        assert!(report.summary().contains("could not be cleared"));
        assert!(!report.summary().contains("was cleared"));
        let executed = store.executed.lock().expect("lock").clone();
        assert_eq!(executed.iter().filter(|s| *s == WIPE_ALL).count(), 1);
    }

    #[tokio::test]
    async fn refused_credentials_are_fatal() {
        let store = RecordingStore {
            refuse_credentials: true,
            ..RecordingStore::default()
        };
        let mut controller = RunController::new(QuerySink::connected(store));

        let err = controller
            .run(&[root(vec![class("A")])])
            .await
            .expect_err("authentication must fail");

        assert!(matches!(err, Error::StoreAuthentication(message) if message == "bad password"));
    }

    #[tokio::test]
    async fn dry_run_with_warnings_completes_with_issues() {
        let mut controller = RunController::new(QuerySink::transcript(std::io::sink()));

        let report = controller
            .run(&[root(vec![Entry::bare("A")])])
            .await
            .expect("run");

        assert_eq!(report.outcome, RunOutcome::CompletedWithIssues);
        assert_eq!(report.statements, 0);
        assert!(!report.outcome.is_success());
    }
}
