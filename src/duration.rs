//! Calendar duration of a project, from its start and end dates.
//!
//! Components are remainders: a span of 14 months is 1 year and 2 months,
//! never "14 months". Month arithmetic clamps to the end of shorter months,
//! so 31 January plus one month is the last day of February.

use chrono::{Datelike, Months, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::db::Db;

pub const UNAVAILABLE_TEXT: &str = "No disponible";
const ZERO_TEXT: &str = "0 días";

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProjectDuration {
    pub years: u32,
    pub months: u32,
    pub days: u32,
    pub total_days: i64,
}

impl ProjectDuration {
    pub fn text(&self) -> String {
        format_duration_text(self.years, self.months, self.days)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationOutcome {
    Computed(ProjectDuration),
    /// One of the dates could not be parsed.
    Fallback,
}

impl DurationOutcome {
    pub fn text(&self) -> String {
        match self {
            DurationOutcome::Computed(d) => d.text(),
            DurationOutcome::Fallback => UNAVAILABLE_TEXT.to_string(),
        }
    }

    pub fn or_zero(self) -> ProjectDuration {
        match self {
            DurationOutcome::Computed(d) => d,
            DurationOutcome::Fallback => ProjectDuration::default(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, DurationOutcome::Fallback)
    }
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(raw, f).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|f| NaiveDateTime::parse_from_str(raw, f).ok())
                .map(|dt| dt.date())
        })
}

/// Duration between two textual dates, in either order.
pub fn compute_duration(start: &str, end: &str) -> DurationOutcome {
    match (parse_date(start), parse_date(end)) {
        (Some(a), Some(b)) => DurationOutcome::Computed(calendar_diff(a, b)),
        _ => {
            log::warn!("cannot compute duration between {start:?} and {end:?}");
            DurationOutcome::Fallback
        }
    }
}

pub fn calendar_diff(a: NaiveDate, b: NaiveDate) -> ProjectDuration {
    let (from, to) = if a <= b { (a, b) } else { (b, a) };

    let mut months = i64::from(to.year() - from.year()) * 12 + i64::from(to.month())
        - i64::from(from.month());
    let mut anchor = add_months(from, months);
    if anchor > to {
        months -= 1;
        anchor = add_months(from, months);
    }

    ProjectDuration {
        years: (months / 12) as u32,
        months: (months % 12) as u32,
        days: (to - anchor).num_days() as u32,
        total_days: (to - from).num_days(),
    }
}

fn add_months(date: NaiveDate, months: i64) -> NaiveDate {
    date.checked_add_months(Months::new(months as u32))
        .unwrap_or(NaiveDate::MAX)
}

pub fn format_duration_text(years: u32, months: u32, days: u32) -> String {
    let parts: Vec<String> = [
        (years, "año", "años"),
        (months, "mes", "meses"),
        (days, "día", "días"),
    ]
    .into_iter()
    .filter(|(n, _, _)| *n > 0)
    .map(|(n, one, many)| format!("{} {}", n, if n == 1 { one } else { many }))
    .collect();

    if parts.is_empty() {
        ZERO_TEXT.to_string()
    } else {
        parts.join(", ")
    }
}

/// Stores the duration on the project row. Failures are logged, never raised.
pub async fn save_duration(db: &Db, project_id: i64, duration: &ProjectDuration) -> bool {
    let res = sqlx::query(
        "UPDATE proyectos SET duracion_anios = ?, duracion_meses = ?, duracion_dias = ? WHERE id_pro = ?",
    )
    .bind(i64::from(duration.years))
    .bind(i64::from(duration.months))
    .bind(i64::from(duration.days))
    .bind(project_id)
    .execute(&db.0)
    .await;

    match res {
        Ok(r) if r.rows_affected() > 0 => true,
        Ok(_) => {
            log::warn!("save_duration: project {project_id} not found");
            false
        }
        Err(e) => {
            log::error!("save_duration: project {project_id}: {e:?}");
            false
        }
    }
}
