//! CSV export endpoints.
//!
//! Each handler validates the date range before touching the store, collects
//! the rows for its kind and streams them back as a CSV attachment. Once the
//! body has started streaming the status code is committed: an encoding
//! failure after that point only aborts the transfer.

use api_types::export::{ExportKind, ExportQuery};
use axum::{
    body::Body,
    extract::{Query, State, rejection::QueryRejection},
    http::{HeaderValue, StatusCode, header},
    response::Response,
};
use engine::{CsvEncoder, CsvRecord, DateRange};

use crate::{ServerError, server::ServerState};

/// Date range of a request along with the raw query values it came from.
struct Requested<'a> {
    range: DateRange,
    start: &'a str,
    end: &'a str,
}

fn requested(query: &ExportQuery) -> Result<Requested<'_>, ServerError> {
    let start = query.start_date.as_deref().map(str::trim);
    let end = query.end_date.as_deref().map(str::trim);
    let range =
        DateRange::parse(start, end).map_err(|err| ServerError::Validation(err.to_string()))?;

    Ok(Requested {
        range,
        start: start.unwrap_or_default(),
        end: end.unwrap_or_default(),
    })
}

/// Unwrap the query string, reporting unparseable ones as bad requests.
fn export_query(
    query: Result<Query<ExportQuery>, QueryRejection>,
) -> Result<ExportQuery, ServerError> {
    query
        .map(|Query(query)| query)
        .map_err(|rejection| ServerError::Validation(rejection.body_text()))
}

fn attachment(kind: ExportKind, start: &str, end: &str) -> String {
    format!(
        "attachment; filename=\"{}_{start}_to_{end}.csv\"",
        kind.file_prefix()
    )
}

fn csv_response<R>(
    kind: ExportKind,
    disposition: String,
    rows: Vec<R>,
) -> Result<Response, ServerError>
where
    R: CsvRecord + Send + 'static,
{
    let disposition =
        HeaderValue::from_str(&disposition).map_err(|err| ServerError::export(kind, err))?;
    let rows_len = rows.len();
    let body = Body::from_stream(futures::stream::iter(CsvEncoder::new(rows)));

    tracing::info!("streaming {} export with {rows_len} rows", kind.file_prefix());

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/csv")
        .header(header::CONTENT_DISPOSITION, disposition)
        .body(body)
        .map_err(|err| ServerError::export(kind, err))
}

/// Sales and purchases of items, merged chronologically.
///
/// The filename embeds the normalized `YYYY-MM-DD` days of the range.
pub async fn transactions(
    State(state): State<ServerState>,
    query: Result<Query<ExportQuery>, QueryRejection>,
) -> Result<Response, ServerError> {
    let kind = ExportKind::Transactions;
    let query = export_query(query)?;
    let Requested { range, .. } = requested(&query)?;

    let rows = state
        .engine
        .transactions_between(&range)
        .await
        .map_err(|err| ServerError::from_engine(kind, err))?;

    let disposition = attachment(
        kind,
        &range.start_day().to_string(),
        &range.end_day().to_string(),
    );
    csv_response(kind, disposition, rows)
}

/// Expenses dated inside the range. The filename keeps the query values as
/// sent, trimmed.
pub async fn expenses(
    State(state): State<ServerState>,
    query: Result<Query<ExportQuery>, QueryRejection>,
) -> Result<Response, ServerError> {
    let kind = ExportKind::Expenses;
    let query = export_query(query)?;
    let Requested { range, start, end } = requested(&query)?;

    let rows = state
        .engine
        .expenses_between(&range)
        .await
        .map_err(|err| ServerError::from_engine(kind, err))?;

    csv_response(kind, attachment(kind, start, end), rows)
}

/// Other entries dated inside the range. The filename keeps the query values
/// as sent, trimmed.
pub async fn other(
    State(state): State<ServerState>,
    query: Result<Query<ExportQuery>, QueryRejection>,
) -> Result<Response, ServerError> {
    let kind = ExportKind::Other;
    let query = export_query(query)?;
    let Requested { range, start, end } = requested(&query)?;

    let rows = state
        .engine
        .other_between(&range)
        .await
        .map_err(|err| ServerError::from_engine(kind, err))?;

    csv_response(kind, attachment(kind, start, end), rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attachment_header_format() {
        assert_eq!(
            attachment(ExportKind::Expenses, "2024-01-01", "2024-01-31"),
            "attachment; filename=\"expenses_2024-01-01_to_2024-01-31.csv\""
        );
    }

    #[test]
    fn requested_keeps_raw_values() {
        let query = ExportQuery {
            start_date: Some("2024-01-01T10:00:00Z".to_string()),
            end_date: Some("2024-01-31".to_string()),
        };
        let requested = requested(&query).ok().unwrap();
        assert_eq!(requested.start, "2024-01-01T10:00:00Z");
        assert_eq!(requested.range.start_day().to_string(), "2024-01-01");
    }

    #[test]
    fn requested_trims_values_used_in_filenames() {
        let query = ExportQuery {
            start_date: Some("\n2024-01-01 ".to_string()),
            end_date: Some("2024-01-31".to_string()),
        };
        let requested = requested(&query).ok().unwrap();
        assert_eq!(requested.start, "2024-01-01");
        let disposition = attachment(ExportKind::Other, requested.start, requested.end);
        assert!(HeaderValue::from_str(&disposition).is_ok());
    }

    #[test]
    fn requested_without_end_is_a_validation_error() {
        let query = ExportQuery {
            start_date: Some("2024-01-01".to_string()),
            end_date: None,
        };
        assert!(matches!(requested(&query), Err(ServerError::Validation(_))));
    }
}
