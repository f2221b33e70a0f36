//! Urgency classification
//!
//! Pure functions from raw column values to an urgency verdict. Four
//! predicates, AND-combined: priority tier, due date, open status and
//! watched assignee. No I/O; the reference date is injected so every task
//! in a cycle is judged against the same calendar day.

use chrono::{FixedOffset, NaiveDate, Utc};
use once_cell::sync::Lazy;
use serde::Deserialize;

use crate::config::{columns, ColumnMap};
use crate::models::{PriorityLevel, RawTask, UrgentTask};
use crate::utils::normalization::normalize_token;

/// Priority tokens marking the critical tier (大文字小文字両方対応)
pub const CRITICAL_TOKENS: &[&str] = &["緊急", "critical", "最優先"];

/// Priority tokens marking the high tier
pub const HIGH_TOKENS: &[&str] = &["高", "high", "重要"];

/// Status values that mark a task resolved
pub const COMPLETED_TOKENS: &[&str] = &["完了", "done", "completed", "済"];

// Deadlines are evaluated on the JST calendar day in every deployment;
// per-user locale is deliberately not consulted.
static JST: Lazy<FixedOffset> =
    Lazy::new(|| FixedOffset::east_opt(9 * 3600).expect("JST offset is in range"));

/// Today's calendar date in the reference zone
pub fn reference_today() -> NaiveDate {
    Utc::now().with_timezone(&*JST).date_naive()
}

/// How deadline dates qualify a task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueDatePolicy {
    /// Only tasks due exactly today qualify (single-board mode)
    SameDayOnly,
    /// Tasks due today or already past due qualify; past-due ones are
    /// flagged overdue (watch-everything mode)
    IncludeOverdue,
}

/// Everything classify() needs besides the task itself
#[derive(Debug, Clone)]
pub struct ClassifierContext {
    pub watched_user_id: String,
    pub columns: ColumnMap,
    pub policy: DueDatePolicy,
    pub today: NaiveDate,
}

impl ClassifierContext {
    pub fn new(watched_user_id: impl Into<String>, policy: DueDatePolicy) -> Self {
        Self {
            watched_user_id: watched_user_id.into(),
            columns: ColumnMap::default(),
            policy,
            today: reference_today(),
        }
    }
}

/// Classifies one raw task. Returns None unless all four predicates hold.
pub fn classify(task: &RawTask, ctx: &ClassifierContext) -> Option<UrgentTask> {
    let priority = priority_tier(column_text(&ctx.columns.priority, task))?;

    let overdue = match due_state(column_text(&ctx.columns.date, task), ctx) {
        DueState::DueToday => false,
        DueState::Overdue => true,
        DueState::NotDue => return None,
    };

    if is_completed(column_text(&ctx.columns.status, task)) {
        return None;
    }

    if !is_assigned_to(task, ctx) {
        return None;
    }

    Some(UrgentTask {
        id: task.id.clone(),
        name: task.name.clone(),
        board_name: task.board_name.clone(),
        priority,
        overdue,
    })
}

fn column_text<'a>(candidates: &[String], task: &'a RawTask) -> &'a str {
    columns::resolve(candidates, &task.column_values)
        .and_then(|column| column.text.as_deref())
        .unwrap_or("")
}

/// Maps a priority column value to its tier. None for anything below high.
fn priority_tier(value: &str) -> Option<PriorityLevel> {
    let normalized = normalize_token(value);
    if normalized.is_empty() {
        return None;
    }
    if CRITICAL_TOKENS.iter().any(|t| normalize_token(t) == normalized) {
        return Some(PriorityLevel::Critical);
    }
    if HIGH_TOKENS.iter().any(|t| normalize_token(t) == normalized) {
        return Some(PriorityLevel::High);
    }
    None
}

enum DueState {
    DueToday,
    Overdue,
    NotDue,
}

/// Parses the due column as a calendar date and compares against the
/// reference day. Unparsable or absent dates never qualify.
fn due_state(value: &str, ctx: &ClassifierContext) -> DueState {
    let Ok(date) = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d") else {
        return DueState::NotDue;
    };

    if date == ctx.today {
        DueState::DueToday
    } else if date < ctx.today && ctx.policy == DueDatePolicy::IncludeOverdue {
        DueState::Overdue
    } else {
        DueState::NotDue
    }
}

fn is_completed(value: &str) -> bool {
    let normalized = normalize_token(value);
    COMPLETED_TOKENS.iter().any(|t| normalize_token(t) == normalized)
}

/// Structured people column payload: {"personsAndTeams": [{"id": 123}]}
#[derive(Deserialize)]
struct AssigneeValue {
    #[serde(rename = "personsAndTeams", default)]
    persons_and_teams: Vec<PersonEntry>,
}

#[derive(Deserialize)]
struct PersonEntry {
    id: serde_json::Value,
}

/// Malformed or absent assignee data rejects; a task is never treated as
/// assigned to everyone.
fn is_assigned_to(task: &RawTask, ctx: &ClassifierContext) -> bool {
    let Some(raw) = columns::resolve(&ctx.columns.person, &task.column_values)
        .and_then(|column| column.value.as_deref())
    else {
        return false;
    };

    let Ok(parsed) = serde_json::from_str::<AssigneeValue>(raw) else {
        return false;
    };

    parsed
        .persons_and_teams
        .iter()
        .any(|person| person_id_string(&person.id) == ctx.watched_user_id)
}

/// Person ids arrive as numbers or strings depending on the board age
fn person_id_string(id: &serde_json::Value) -> String {
    match id {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
