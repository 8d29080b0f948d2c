//! Deferred navigation after a successful payment

use crate::backend::Navigator;
use crate::state::Route;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Pause between the success banner and leaving the page
pub const REDIRECT_DELAY: Duration = Duration::from_secs(2);

/// A navigation scheduled on the runtime. Dropping the handle cancels it.
#[derive(Debug)]
pub struct PendingRedirect {
    route: Route,
    task: JoinHandle<()>,
}

impl PendingRedirect {
    /// Navigate to `route` once `delay` has elapsed
    pub fn schedule(navigator: Arc<dyn Navigator>, route: Route, delay: Duration) -> Self {
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tracing::debug!(path = route.path(), "redirecting");
            navigator.navigate(route);
        });
        Self { route, task }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for PendingRedirect {
    fn drop(&mut self) {
        if !self.task.is_finished() {
            tracing::debug!(path = self.route.path(), "pending redirect cancelled");
            self.task.abort();
        }
    }
}
