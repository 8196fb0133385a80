//! Shared run context.
//!
//! Groups the state every stage of a run needs (settings, reporter and
//! cancellation) to reduce argument fatigue.

use crate::reporter::{NullReporter, Reporter};
use crate::settings::RepoSettings;
use std::fmt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Groups common state used during a repository rewrite.
#[derive(Clone)]
pub struct Context {
    /// Read-only run configuration.
    pub settings: Arc<RepoSettings>,
    /// Sink for per-archive outcomes.
    pub reporter: Arc<dyn Reporter>,
    /// Checked between archives; once cancelled no further archive is started.
    pub cancel: CancellationToken,
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("settings", &self.settings)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}

impl Context {
    /// Build a context reporting to `reporter`.
    pub fn new(settings: RepoSettings, reporter: Arc<dyn Reporter>) -> Self {
        Self {
            settings: Arc::new(settings),
            reporter,
            cancel: CancellationToken::new(),
        }
    }

    /// A context that reports nothing, for tests and embedding.
    pub fn silent(settings: RepoSettings) -> Self {
        Self::new(settings, Arc::new(NullReporter))
    }

    /// Use `cancel` instead of the context's own token.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }
}
