//! HTTP API handlers for the activity report.
//!
//! - **GET /report**: assembles a report for the requested window and renders
//!   it in the requested (or configured) format.
//! - **GET /health**: liveness probe.
//!
//! Credentials never appear in logs; only the window, format and counts do.

use axum::{
    Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tracing::{info, instrument, warn};

use crate::error::ActivityError;
use crate::format::ReportFormat;
use crate::model::TimeRange;
use crate::service::ActivityService;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: ActivityService,
    /// Format used when the request names none, or an unknown one.
    pub format: ReportFormat,
    pub lookback_hours: u32,
}

/// Query parameters for the report endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    /// Window start (RFC 3339). Defaults to `to` minus the lookback.
    pub from: Option<DateTime<Utc>>,
    /// Window end (RFC 3339). Defaults to now.
    pub to: Option<DateTime<Utc>>,
    /// One of `xml`, `json`, `markdown`, `html`.
    pub format: Option<String>,
}

impl ReportQuery {
    /// Resolve the requested window against `now`.
    ///
    /// Returns `None` when `from` is after `to`.
    pub fn window(&self, lookback_hours: u32, now: DateTime<Utc>) -> Option<TimeRange> {
        let end = self.to.unwrap_or(now);
        let start = self
            .from
            .unwrap_or_else(|| end - Duration::hours(i64::from(lookback_hours)));

        (start <= end).then(|| TimeRange::new(start, end))
    }

    /// Requested format, or `fallback` when absent or unrecognized.
    pub fn format_or(&self, fallback: ReportFormat) -> ReportFormat {
        self.format
            .as_deref()
            .and_then(ReportFormat::parse)
            .unwrap_or(fallback)
    }
}

/// Build the router with every endpoint mounted.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/report", get(get_report))
        .route("/health", get(health_check))
        .with_state(state)
}

/// Map a pipeline error to a response status.
///
/// Tracker failures are upstream problems (502); everything else is ours.
fn error_status(err: &ActivityError) -> StatusCode {
    match err {
        ActivityError::Tracker { .. } => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// GET /report - Render the activity report.
///
/// # Query Parameters
///
/// - `from` (optional): window start, RFC 3339
/// - `to` (optional): window end, RFC 3339 (default: now)
/// - `format` (optional): `xml`, `json`, `markdown` or `html`
///
/// # Response
///
/// The formatted report with the formatter's `Content-Type`. An empty
/// report renders the format's empty placeholder (`{}` for JSON).
#[instrument(skip(state))]
pub async fn get_report(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, StatusCode> {
    let format = query.format_or(state.format);
    let window = query
        .window(state.lookback_hours, Utc::now())
        .ok_or_else(|| {
            warn!(from = ?query.from, to = ?query.to, "Window start is after its end");
            StatusCode::BAD_REQUEST
        })?;

    let report = state
        .service
        .get_activity_report(window)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to build activity report");
            error_status(&e)
        })?;

    let formatted = format.format(&report).map_err(|e| {
        warn!(format = %format, error = %e, "Failed to format activity report");
        error_status(&e)
    })?;

    info!(
        format = %format,
        issue_count = report.issues.len(),
        "Activity report served"
    );

    Ok((
        [(header::CONTENT_TYPE, formatted.content_type)],
        formatted.content,
    )
        .into_response())
}

/// GET /health - Simple health check endpoint.
pub async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 1, 2, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_window_defaults_to_lookback_before_now() {
        let window = ReportQuery::default().window(24, at(12)).unwrap();

        assert_eq!(window.end, at(12));
        assert_eq!(window.start, Utc.with_ymd_and_hms(2023, 1, 1, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_window_lookback_is_relative_to_to() {
        let query = ReportQuery {
            to: Some(at(10)),
            ..Default::default()
        };

        let window = query.window(2, at(23)).unwrap();

        assert_eq!(window.start, at(8));
        assert_eq!(window.end, at(10));
    }

    #[test]
    fn test_explicit_window() {
        let query = ReportQuery {
            from: Some(at(1)),
            to: Some(at(3)),
            format: None,
        };

        assert_eq!(query.window(24, at(23)), Some(TimeRange::new(at(1), at(3))));
    }

    #[test]
    fn test_inverted_window_rejected() {
        let query = ReportQuery {
            from: Some(at(5)),
            to: Some(at(3)),
            format: None,
        };

        assert_eq!(query.window(24, at(23)), None);
    }

    #[test]
    fn test_format_fallback() {
        let named = |name: &str| ReportQuery {
            format: Some(name.to_string()),
            ..Default::default()
        };

        assert_eq!(named("html").format_or(ReportFormat::Json), ReportFormat::Html);
        assert_eq!(named("pdf").format_or(ReportFormat::Markdown), ReportFormat::Markdown);
        assert_eq!(ReportQuery::default().format_or(ReportFormat::Xml), ReportFormat::Xml);
    }

    #[test]
    fn test_error_status() {
        assert_eq!(
            error_status(&ActivityError::tracker("ctx", "boom")),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            error_status(&ActivityError::Serialization("bad".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
