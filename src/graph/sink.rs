use std::io::Write;

use tracing::{debug, error, info, trace};

use super::{
    repositories::{GraphStore, StoreError},
    statement::Statement,
};
use crate::diagnostics::{Diagnostics, Issue};

enum Destination {
    Connected(Box<dyn GraphStore>),
    Transcript(Box<dyn Write + Send>),
}

/// Destination of every emitted statement.
///
/// A connected sink executes statements against a [`GraphStore`]; a
/// disconnected one writes them to a Cypher transcript instead, which is the
/// dry-run mode used when no store is configured.
pub struct QuerySink {
    destination: Destination,
    submitted: usize,
}

impl QuerySink {
    #[must_use]
    pub fn connected(store: impl GraphStore + 'static) -> Self {
        Self {
            destination: Destination::Connected(Box::new(store)),
            submitted: 0,
        }
    }

    /// Dry run printing statements to stdout.
    #[must_use]
    pub fn dry_run() -> Self {
        Self::transcript(std::io::stdout())
    }

    /// Dry run writing statements to any writer.
    #[must_use]
    pub fn transcript(writer: impl Write + Send + 'static) -> Self {
        Self {
            destination: Destination::Transcript(Box::new(writer)),
            submitted: 0,
        }
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        matches!(self.destination, Destination::Connected(_))
    }

    /// Number of statements submitted since the last [`QuerySink::prepare`].
    #[must_use]
    pub fn submitted(&self) -> usize {
        self.submitted
    }

    /// Clears the store and declares the identifier constraint.
    ///
    /// Does nothing for a disconnected sink.
    ///
    /// # Errors
    ///
    /// Returns the store's error unchanged; a failing preparation is fatal
    /// for the run.
    pub async fn prepare(&mut self) -> Result<(), StoreError> {
        self.submitted = 0;
        let Destination::Connected(store) = &self.destination else {
            info!("no graph store attached, writing statements to the transcript");
            return Ok(());
        };
        store.execute(super::statement::WIPE_ALL).await?;
        info!("graph store cleared");
        let constraint = Statement::identifier_constraint();
        store.execute(constraint.text()).await?;
        debug!("{}", constraint.description());
        Ok(())
    }

    /// Submits one statement and waits for it to complete.
    ///
    /// A rejected statement, or a transcript that can not be written, is
    /// recorded as a warning and does not stop the run.
    pub async fn submit(&mut self, statement: &Statement, diagnostics: &mut Diagnostics) {
        self.submitted += 1;
        debug!("{}", statement.description());
        trace!(statement = statement.text(), "submitting statement");

        match &mut self.destination {
            Destination::Connected(store) => {
                if let Err(err) = store.execute(statement.text()).await {
                    diagnostics.warn(Issue::StatementRejected {
                        description: statement.description().to_string(),
                        message: err.to_string(),
                    });
                }
            }
            Destination::Transcript(writer) => {
                if let Err(err) = writeln!(writer, "{};\n", statement.text()) {
                    diagnostics.warn(Issue::TranscriptWrite {
                        description: statement.description().to_string(),
                        message: err.to_string(),
                    });
                }
            }
        }
    }

    /// Wipes the store after a run that recorded warnings.
    ///
    /// Returns `true` when the wipe was executed. A disconnected sink is left
    /// untouched.
    pub async fn compensate(&mut self) -> bool {
        let Destination::Connected(store) = &self.destination else {
            return false;
        };
        let wipe = Statement::wipe("Clearing the graph store after warnings");
        debug!("{}", wipe.description());
        match store.execute(wipe.text()).await {
            Ok(()) => true,
            Err(err) => {
                error!(err.msg = %err, err.detail = ?err, "compensating_wipe_failed");
                false
            }
        }
    }

    /// Flushes a transcript writer; no-op when connected.
    pub fn flush(&mut self) -> std::io::Result<()> {
        match &mut self.destination {
            Destination::Transcript(writer) => writer.flush(),
            Destination::Connected(_) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        io::{self, Write},
        sync::{Arc, Mutex},
    };

    use async_trait::async_trait;

    use super::QuerySink;
    use crate::{
        diagnostics::{Diagnostics, Issue},
        graph::{
            repositories::{GraphStore, StoreError},
            statement::{Statement, IDENTIFIER_CONSTRAINT, WIPE_ALL},
        },
    };

    #[derive(Default)]
    struct RecordingStore {
        executed: Mutex<Vec<String>>,
        reject: Option<&'static str>,
    }

    impl RecordingStore {
        fn executed(&self) -> Vec<String> {
            self.executed.lock().expect("lock poisoned").clone()
        }
    }

    #[async_trait]
    impl GraphStore for RecordingStore {
        async fn execute(&self, statement: &str) -> Result<(), StoreError> {
            if self.reject.is_some_and(|needle| statement.contains(needle)) {
                return Err(StoreError::Rejected("syntax error".into()));
            }
            self.executed
                .lock()
                .expect("lock poisoned")
                .push(statement.to_string());
            Ok(())
        }
    }

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().expect("lock poisoned").write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn connected_sink_prepares_and_executes() {
        let store = Arc::new(RecordingStore::default());
        let mut sink = QuerySink::connected(Arc::clone(&store));
        let mut diagnostics = Diagnostics::new();

        sink.prepare().await.expect("prepare");
        sink.submit(&Statement::new("CREATE (n)", "Creating node: n"), &mut diagnostics)
            .await;

        assert!(sink.is_connected());
        assert_eq!(sink.submitted(), 1);
        assert_eq!(
            store.executed(),
            vec![
                WIPE_ALL.to_string(),
                IDENTIFIER_CONSTRAINT.to_string(),
                "CREATE (n)".to_string()
            ]
        );
        assert!(!diagnostics.has_warnings());
    }

    #[tokio::test]
    async fn rejected_statements_become_warnings() {
        let store = Arc::new(RecordingStore {
            reject: Some("broken"),
            ..RecordingStore::default()
        });
        let mut sink = QuerySink::connected(Arc::clone(&store));
        let mut diagnostics = Diagnostics::new();

        sink.submit(&Statement::new("broken", "Creating node: x"), &mut diagnostics)
            .await;
        sink.submit(&Statement::new("CREATE (n)", "Creating node: n"), &mut diagnostics)
            .await;

        assert_eq!(store.executed(), vec!["CREATE (n)".to_string()]);
        let warnings: Vec<_> = diagnostics.warnings().collect();
        assert_eq!(
            warnings,
            vec![&Issue::StatementRejected {
                description: "Creating node: x".into(),
                message: "statement rejected: syntax error".into(),
            }]
        );

        assert!(sink.compensate().await);
        assert_eq!(store.executed().last().map(String::as_str), Some(WIPE_ALL));
    }

    #[tokio::test]
    async fn transcript_sink_prints_statements() {
        let buffer = SharedBuffer::default();
        let mut sink = QuerySink::transcript(buffer.clone());
        let mut diagnostics = Diagnostics::new();

        sink.prepare().await.expect("prepare is a no-op");
        sink.submit(&Statement::new("CREATE (n)", "Creating node: n"), &mut diagnostics)
            .await;
        sink.flush().expect("flush");

        assert!(!sink.is_connected());
        assert!(!sink.compensate().await);
        let written = String::from_utf8(buffer.0.lock().expect("lock").clone()).expect("utf8");
        assert_eq!(written, "CREATE (n);\n\n");
    }
}
