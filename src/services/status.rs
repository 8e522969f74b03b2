//! Deadline status and KPI traffic light

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// Whole days from `today` to the calendar day of `date` (negative when past)
pub fn days_until(date: DateTime<Utc>, today: NaiveDate) -> i64 {
    (date.date_naive() - today).num_days()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DeadlineStatus {
    Zukunft,
    Kritisch,
    Erledigt,
    Verpasst,
}

impl DeadlineStatus {
    pub fn label(&self) -> &'static str {
        match self {
            DeadlineStatus::Zukunft => "Zukunft",
            DeadlineStatus::Kritisch => "Kritisch",
            DeadlineStatus::Erledigt => "Erledigt",
            DeadlineStatus::Verpasst => "Verpasst",
        }
    }
}

/// Window in which an open deadline counts as critical
pub const CRITICAL_DAYS: i64 = 30;

/// Status of a deadline plus the days left (0 once completed)
pub fn deadline_status(
    due_date: DateTime<Utc>,
    is_completed: bool,
    today: NaiveDate,
) -> (DeadlineStatus, i64) {
    if is_completed {
        return (DeadlineStatus::Erledigt, 0);
    }

    let days = days_until(due_date, today);
    let status = if days < 0 {
        DeadlineStatus::Verpasst
    } else if days <= CRITICAL_DAYS {
        DeadlineStatus::Kritisch
    } else {
        DeadlineStatus::Zukunft
    };
    (status, days)
}

/// Percent of the target reached, capped at 100
pub fn kpi_progress(current: f64, target: f64) -> i64 {
    if target == 0.0 {
        return if current > 0.0 { 100 } else { 0 };
    }
    ((current / target * 100.0).round() as i64).min(100)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrafficLight {
    Success,
    Warning,
    Danger,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KpiStatus {
    pub status: TrafficLight,
    pub label: String,
}

impl KpiStatus {
    fn new(status: TrafficLight, label: impl Into<String>) -> Self {
        Self {
            status,
            label: label.into(),
        }
    }
}

/// Traffic light from progress and, when set, the days left until the KPI
/// is due.
pub fn kpi_status(progress: i64, days_left: Option<i64>) -> KpiStatus {
    use TrafficLight::*;

    if progress >= 100 {
        return KpiStatus::new(Success, "Ziel erreicht");
    }

    let Some(days) = days_left else {
        return match progress {
            p if p >= 75 => KpiStatus::new(Success, "Auf Kurs"),
            p if p >= 50 => KpiStatus::new(Warning, "Im Verzug"),
            _ => KpiStatus::new(Danger, "Kritisch"),
        };
    };

    if days < 0 {
        return KpiStatus::new(Critical, format!("{} Tage überfällig", days.abs()));
    }

    let remaining = format!("Noch {} Tage", days);
    match days {
        0..=7 if progress >= 90 => KpiStatus::new(Success, remaining),
        0..=7 => KpiStatus::new(Critical, format!("Nur noch {} Tage!", days)),
        8..=14 if progress >= 75 => KpiStatus::new(Warning, remaining),
        8..=14 => KpiStatus::new(Danger, remaining),
        15..=30 => KpiStatus::new(Warning, remaining),
        _ => KpiStatus::new(Success, remaining),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 15, 0, 0).unwrap()
    }

    #[test]
    fn deadline_status_thresholds() {
        assert_eq!(deadline_status(at(2024, 12, 31), false, today()), (DeadlineStatus::Verpasst, -1));
        assert_eq!(deadline_status(at(2025, 1, 1), false, today()), (DeadlineStatus::Kritisch, 0));
        assert_eq!(deadline_status(at(2025, 1, 31), false, today()), (DeadlineStatus::Kritisch, 30));
        assert_eq!(deadline_status(at(2025, 2, 1), false, today()), (DeadlineStatus::Zukunft, 31));
        assert_eq!(deadline_status(at(2024, 6, 1), true, today()), (DeadlineStatus::Erledigt, 0));
    }

    #[test]
    fn progress_is_capped_and_handles_zero_target() {
        assert_eq!(kpi_progress(50.0, 200.0), 25);
        assert_eq!(kpi_progress(300.0, 200.0), 100);
        assert_eq!(kpi_progress(1.0, 0.0), 100);
        assert_eq!(kpi_progress(0.0, 0.0), 0);
        assert_eq!(kpi_progress(2.0, 3.0), 67);
    }

    #[test]
    fn traffic_light_without_due_date() {
        assert_eq!(kpi_status(100, None).label, "Ziel erreicht");
        assert_eq!(kpi_status(80, None).status, TrafficLight::Success);
        assert_eq!(kpi_status(60, None).label, "Im Verzug");
        assert_eq!(kpi_status(10, None).status, TrafficLight::Danger);
    }

    #[test]
    fn traffic_light_with_due_date() {
        assert_eq!(kpi_status(40, Some(-3)), KpiStatus::new(TrafficLight::Critical, "3 Tage überfällig"));
        assert_eq!(kpi_status(95, Some(5)).status, TrafficLight::Success);
        assert_eq!(kpi_status(50, Some(5)).label, "Nur noch 5 Tage!");
        assert_eq!(kpi_status(80, Some(10)).status, TrafficLight::Warning);
        assert_eq!(kpi_status(20, Some(10)).status, TrafficLight::Danger);
        assert_eq!(kpi_status(20, Some(20)).status, TrafficLight::Warning);
        assert_eq!(kpi_status(0, Some(60)), KpiStatus::new(TrafficLight::Success, "Noch 60 Tage"));
    }
}
