//! Validity interval reconciliation
//!
//! Pairs `validFrom` and `validThrough` statements into a timeline and
//! classifies each interval against the evaluation time.
//!
//! Pairing is greedy-earliest: each validFrom, in chronological order, takes
//! the earliest unconsumed validThrough that does not precede it. This is not
//! a span-optimal assignment; overlapping ranges resolve by validFrom order.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::statement::Statement;

/// Classification of one validity interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalStatus {
    /// Started and not yet ended
    Active,
    /// Ended before the evaluation time
    Expired,
    /// Starts after the evaluation time
    Future,
    /// Started, with no end asserted
    OpenEnded,
    /// Ends before it starts
    Invalid,
}

impl std::fmt::Display for IntervalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Expired => write!(f, "expired"),
            Self::Future => write!(f, "future"),
            Self::OpenEnded => write!(f, "open_ended"),
            Self::Invalid => write!(f, "invalid"),
        }
    }
}

/// A reconciled validity interval
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidityInterval {
    pub from_statement_id: Option<String>,
    /// Raw validFrom value, `None` when absent or empty
    pub from_value: Option<String>,
    pub through_statement_id: Option<String>,
    pub through_value: Option<String>,
    pub status: IntervalStatus,
}

/// Parse a validity value into Unix milliseconds.
///
/// Accepts RFC 3339 / RFC 2822 date-times, naive date-times (read as UTC),
/// plain dates, `YYYY-MM` and `YYYY`. Anything else is unknown.
pub fn parse_timestamp_ms(value: &str) -> Option<i64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.timestamp_millis());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Some(dt.timestamp_millis());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(naive.and_utc().timestamp_millis());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return midnight_ms(date);
    }

    // Reduced precision: YYYY-MM, YYYY
    let mut parts = value.splitn(2, '-');
    let year = parts.next().filter(|y| is_digits(y, 4))?.parse::<i32>().ok()?;
    let month = match parts.next() {
        Some(m) if is_digits(m, 2) => m.parse::<u32>().ok()?,
        Some(_) => return None,
        None => 1,
    };
    NaiveDate::from_ymd_opt(year, month, 1).and_then(midnight_ms)
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.bytes().all(|b| b.is_ascii_digit())
}

fn midnight_ms(date: NaiveDate) -> Option<i64> {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp_millis())
}

/// Current wall-clock time in Unix milliseconds
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Statement paired with its parsed timestamp
struct Timed<'a> {
    statement: &'a Statement,
    ts: Option<i64>,
}

/// Sort ascending by timestamp; unknown timestamps last; ties by statement id.
fn sorted_by_time(statements: &[Statement]) -> Vec<Timed<'_>> {
    let mut timed: Vec<Timed<'_>> = statements
        .iter()
        .map(|statement| Timed {
            statement,
            ts: parse_timestamp_ms(&statement.object_raw),
        })
        .collect();
    timed.sort_by(|a, b| {
        let at = a.ts.unwrap_or(i64::MAX);
        let bt = b.ts.unwrap_or(i64::MAX);
        at.cmp(&bt).then_with(|| a.statement.id.cmp(&b.statement.id))
    });
    timed
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// Classify a (from, through) pair against `now_ms`.
fn classify(from_ts: Option<i64>, through_ts: Option<i64>, now_ms: i64) -> IntervalStatus {
    match (from_ts, through_ts) {
        (Some(from), Some(through)) if through < from => IntervalStatus::Invalid,
        (Some(from), _) if from > now_ms => IntervalStatus::Future,
        (_, None) => IntervalStatus::OpenEnded,
        (_, Some(through)) if through < now_ms => IntervalStatus::Expired,
        _ => IntervalStatus::Active,
    }
}

/// Reconcile validFrom/validThrough statements into validity intervals.
///
/// Emits one interval per validFrom (in chronological order), then one per
/// unconsumed validThrough. Only validThrough statements with a parseable
/// timestamp can be paired; an unparseable one always ends up on its own.
pub fn reconcile(
    valid_from: &[Statement],
    valid_through: &[Statement],
    now_ms: i64,
) -> Vec<ValidityInterval> {
    let froms = sorted_by_time(valid_from);
    let throughs = sorted_by_time(valid_through);
    let mut consumed = vec![false; throughs.len()];
    let mut intervals = Vec::with_capacity(froms.len() + throughs.len());

    for from in &froms {
        let candidate = throughs.iter().enumerate().position(|(i, through)| {
            if consumed[i] {
                return false;
            }
            match (from.ts, through.ts) {
                (_, None) => false,
                (None, Some(_)) => true,
                (Some(f), Some(t)) => t >= f,
            }
        });

        let through = candidate.map(|i| {
            consumed[i] = true;
            &throughs[i]
        });
        let status = classify(from.ts, through.and_then(|t| t.ts), now_ms);

        intervals.push(ValidityInterval {
            from_statement_id: Some(from.statement.id.clone()),
            from_value: non_empty(&from.statement.object_raw),
            through_statement_id: through.map(|t| t.statement.id.clone()),
            through_value: through.and_then(|t| non_empty(&t.statement.object_raw)),
            status,
        });
    }

    for (i, through) in throughs.iter().enumerate() {
        if consumed[i] {
            continue;
        }
        let status = match through.ts {
            Some(ts) if ts < now_ms => IntervalStatus::Expired,
            _ => IntervalStatus::Active,
        };
        intervals.push(ValidityInterval {
            from_statement_id: None,
            from_value: None,
            through_statement_id: Some(through.statement.id.clone()),
            through_value: non_empty(&through.statement.object_raw),
            status,
        });
    }

    intervals
}

/// Whether any interval is usable (not `invalid`)
pub fn has_any_valid_interval(intervals: &[ValidityInterval]) -> bool {
    intervals
        .iter()
        .any(|interval| interval.status != IntervalStatus::Invalid)
}
