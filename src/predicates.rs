//! Translation of `=` quals into upstream issue filters.
//!
//! Only quals with a native GitLab filter appear in [`ISSUE_FILTER_QUALS`].
//! `author` (username) is a key column on `gitlab_issue` but has no entry
//! here; it is enforced by the host after the rows come back.

use crate::gitlab::options::IssueFilters;
use crate::plugin::quals::{KeyColumnQuals, QualValue};
use tracing::debug;

type Applier = fn(&mut IssueFilters, &QualValue);

fn assignee(filters: &mut IssueFilters, qual: &QualValue) {
    filters.assignee_username = qual.string_value().map(str::to_string);
}

fn assignee_id(filters: &mut IssueFilters, qual: &QualValue) {
    filters.assignee_id = qual.int64_value();
}

fn author_id(filters: &mut IssueFilters, qual: &QualValue) {
    filters.author_id = qual.int64_value();
}

fn confidential(filters: &mut IssueFilters, qual: &QualValue) {
    filters.confidential = qual.bool_value();
}

fn search_string(filters: &mut IssueFilters, qual: &QualValue) {
    filters.search = qual.string_value().map(str::to_string);
}

/// Column name and the filter it sets, in evaluation order.
pub const ISSUE_FILTER_QUALS: &[(&str, Applier)] = &[
    ("assignee", assignee),
    ("assignee_id", assignee_id),
    ("author_id", author_id),
    ("confidential", confidential),
    ("search_string", search_string),
];

/// Sets a filter on `filters` for every supplied qual GitLab can filter on.
pub fn apply_issue_quals(filters: &mut IssueFilters, quals: &KeyColumnQuals) {
    for (column, apply) in ISSUE_FILTER_QUALS {
        if let Some(qual) = quals.get(*column) {
            debug!(qual = column, value = ?qual, "translating qual to issue filter");
            apply(filters, qual);
        }
    }
}
