//! Activity service: assembles one [`ActivityReport`] per request.

use std::sync::Arc;

use tracing::{info, instrument};

use crate::error::Result;
use crate::model::{ActivityReport, TimeRange};
use crate::repository::ActivityRepository;

/// Composition root for report assembly.
///
/// Stateless between calls; every report re-fetches from the repository.
#[derive(Clone)]
pub struct ActivityService {
    repository: Arc<dyn ActivityRepository>,
}

impl ActivityService {
    pub fn new(repository: Arc<dyn ActivityRepository>) -> Self {
        Self { repository }
    }

    /// Build the activity report for `window`.
    ///
    /// 1. Resolve the current user
    /// 2. Fetch issues touched in the window, attributed to that user
    /// 3. Assemble the report
    ///
    /// A failure in either lookup aborts the whole report.
    #[instrument(skip(self), fields(start = %window.start, end = %window.end))]
    pub async fn get_activity_report(&self, window: TimeRange) -> Result<ActivityReport> {
        let user = self.repository.get_user().await?;

        let issues = self.repository.get_issues(&window, &user.account_id).await?;

        info!(
            user = %user.display_name,
            issue_count = issues.len(),
            "Activity report assembled"
        );

        Ok(ActivityReport {
            time_range: window,
            user,
            issues,
        })
    }
}
