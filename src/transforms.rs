//! Column transforms applied after fetch, before a row reaches the host.

use crate::plugin::row::Cell;
use chrono::{NaiveDate, NaiveTime};
use serde_json::Value;

/// Format of GitLab date-only fields such as `due_date`.
const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Date-only string (`2024-03-01`) to a timestamp at midnight UTC.
///
/// Null or empty input gives a null cell.
pub fn iso_date_to_timestamp(value: &Value) -> Result<Cell, String> {
    let raw = match value {
        Value::Null => return Ok(Cell::Null),
        Value::String(s) if s.is_empty() => return Ok(Cell::Null),
        Value::String(s) => s,
        other => return Err(format!("expected a date string, got {other}")),
    };
    NaiveDate::parse_from_str(raw, ISO_DATE_FORMAT)
        .map(|date| Cell::Timestamp(date.and_time(NaiveTime::MIN).and_utc()))
        .map_err(|e| format!("invalid date '{raw}': {e}"))
}

/// Assignee objects to their usernames, in upstream order.
///
/// Null input stays null. An empty list is also null, matching how an
/// unassigned issue has no assignee usernames at all.
pub fn assignee_usernames(value: &Value) -> Result<Cell, String> {
    let assignees = match value {
        Value::Null => return Ok(Cell::Null),
        Value::Array(items) => items,
        other => return Err(format!("expected an assignee list, got {other}")),
    };
    if assignees.is_empty() {
        return Ok(Cell::Null);
    }
    let usernames = assignees
        .iter()
        .map(|assignee| {
            assignee
                .get("username")
                .and_then(Value::as_str)
                .map(|name| Value::String(name.to_string()))
                .ok_or_else(|| format!("assignee without username: {assignee}"))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Cell::Json(Value::Array(usernames)))
}

/// Label for a GitLab access level code. Unknown codes read as "No Permissions".
pub fn access_level_label(level: i64) -> &'static str {
    match level {
        0 => "No Permissions",
        5 => "Minimal Access",
        10 => "Guest",
        20 => "Reporter",
        30 => "Developer",
        40 => "Maintainer",
        50 => "Owner",
        _ => "No Permissions",
    }
}

pub fn access_level(value: &Value) -> Result<Cell, String> {
    match value {
        Value::Null => Ok(Cell::Null),
        other => other
            .as_i64()
            .map(|level| Cell::String(access_level_label(level).to_string()))
            .ok_or_else(|| format!("expected an access level code, got {other}")),
    }
}
