//! Domain DTOs for the Momentum API.
//!
//! # Design
//! These types mirror the backend schema (camelCase on the wire) but are
//! defined independently from the mock-server crate. Integration tests catch
//! schema drift between the two. Resource records are read-only copies of
//! server state; request types carry no id.

use chrono::{Datelike, Duration, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// An account as returned by register and login. `token` is only present on
/// login responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub token: Option<String>,
}

// ---------------------------------------------------------------------------
// Finance
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Income,
    Expense,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRequest {
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub amount: f64,
    pub category: String,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub amount: f64,
    pub category: String,
    pub date: String,
    pub user_id: String,
}

// ---------------------------------------------------------------------------
// Todo
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoRequest {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: String,
    pub title: String,
    pub description: String,
    pub is_done: bool,
    pub user_id: String,
    #[serde(default)]
    pub category_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

// ---------------------------------------------------------------------------
// Alarm
// ---------------------------------------------------------------------------

/// Sunday-first initials used by [`Alarm::days_label`].
const DAY_INITIALS: [&str; 7] = ["S", "M", "T", "W", "T", "F", "S"];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlarmRequest {
    /// `HH:MM`, 24-hour.
    pub time: String,
    pub label: String,
    /// Seven flags, Sunday first. All false means a one-shot alarm.
    pub days: Vec<bool>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl AlarmRequest {
    pub fn new(hour: u32, minute: u32, label: impl Into<String>, days: Vec<bool>) -> Self {
        Self {
            time: format!("{hour:02}:{minute:02}"),
            label: label.into(),
            days,
            is_active: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleAlarmRequest {
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alarm {
    pub id: String,
    pub time: String,
    pub label: String,
    pub days: Vec<bool>,
    pub is_active: bool,
    pub user_id: String,
}

impl Alarm {
    /// Human-readable repeat pattern: `"Once"`, `"Every day"`, or the
    /// initials of the selected days (`"M W F"`).
    pub fn days_label(&self) -> String {
        let active: Vec<&str> = self
            .days
            .iter()
            .zip(DAY_INITIALS)
            .filter_map(|(on, name)| on.then_some(name))
            .collect();
        match active.len() {
            0 => "Once".to_string(),
            7 => "Every day".to_string(),
            _ => active.join(" "),
        }
    }

    /// Next instant at or after `now` when this alarm should ring.
    ///
    /// Returns `None` if `time` is not `HH:MM` or `days` does not hold exactly
    /// seven flags. A time equal to `now` counts as not yet passed.
    pub fn next_trigger(&self, now: NaiveDateTime) -> Option<NaiveDateTime> {
        if self.days.len() != 7 {
            return None;
        }
        let time = NaiveTime::parse_from_str(&self.time, "%H:%M").ok()?;
        let target = now.date().and_time(time);

        if !self.days.iter().any(|d| *d) {
            return Some(if target < now {
                target + Duration::days(1)
            } else {
                target
            });
        }

        let today = now.weekday().num_days_from_sunday() as usize;
        for offset in 0..=7 {
            let index = (today + offset) % 7;
            if !self.days[index] || (offset == 0 && target < now) {
                continue;
            }
            return Some(target + Duration::days(offset as i64));
        }
        None
    }
}

// ---------------------------------------------------------------------------
// Weather (raw, no envelope)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weather {
    pub main: WeatherMain,
    pub weather: Vec<WeatherDescription>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherMain {
    pub temp: f64,
    pub humidity: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherDescription {
    pub main: String,
    pub description: String,
    pub icon: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn alarm(time: &str, days: [bool; 7]) -> Alarm {
        Alarm {
            id: "a1".into(),
            time: time.into(),
            label: "wake".into(),
            days: days.to_vec(),
            is_active: true,
            user_id: "u1".into(),
        }
    }

    // 2026-10-18 is a Sunday.
    fn at(day: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, day)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn alarm_uses_camel_case_on_the_wire() {
        let json = serde_json::to_value(alarm("07:30", [false; 7])).unwrap();
        assert_eq!(json["isActive"], true);
        assert_eq!(json["userId"], "u1");
    }

    #[test]
    fn alarm_request_formats_time_and_defaults_active() {
        let req = AlarmRequest::new(7, 5, "run", vec![false; 7]);
        assert_eq!(req.time, "07:05");
        assert!(req.is_active);

        let parsed: AlarmRequest =
            serde_json::from_str(r#"{"time":"06:00","label":"x","days":[]}"#).unwrap();
        assert!(parsed.is_active);
    }

    #[test]
    fn transaction_type_is_screaming_case() {
        let req = TransactionRequest {
            kind: TransactionType::Expense,
            amount: 12.5,
            category: "food".into(),
            date: "2026-10-18".into(),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["type"], "EXPENSE");
    }

    #[test]
    fn days_label_variants() {
        assert_eq!(alarm("07:00", [false; 7]).days_label(), "Once");
        assert_eq!(alarm("07:00", [true; 7]).days_label(), "Every day");
        assert_eq!(
            alarm("07:00", [false, true, false, true, false, true, false]).days_label(),
            "M W F"
        );
    }

    #[test]
    fn one_shot_rolls_to_tomorrow_when_passed() {
        let a = alarm("07:00", [false; 7]);
        assert_eq!(a.next_trigger(at(18, 6, 0)), Some(at(18, 7, 0)));
        assert_eq!(a.next_trigger(at(18, 8, 0)), Some(at(19, 7, 0)));
    }

    #[test]
    fn repeating_alarm_picks_next_selected_day() {
        // Wednesday only.
        let a = alarm("07:00", [false, false, false, true, false, false, false]);
        assert_eq!(a.next_trigger(at(18, 6, 0)), Some(at(21, 7, 0)));
    }

    #[test]
    fn repeating_alarm_skips_today_once_passed() {
        // Sunday only; already past 07:00 on Sunday -> next Sunday.
        let a = alarm("07:00", [true, false, false, false, false, false, false]);
        assert_eq!(a.next_trigger(at(18, 6, 59)), Some(at(18, 7, 0)));
        assert_eq!(a.next_trigger(at(18, 7, 1)), Some(at(25, 7, 0)));
    }

    #[test]
    fn malformed_time_has_no_trigger() {
        assert_eq!(alarm("7am", [false; 7]).next_trigger(at(18, 6, 0)), None);
    }

    #[test]
    fn wrong_day_count_has_no_trigger() {
        let mut a = alarm("07:00", [false; 7]);
        a.days.push(true);
        assert_eq!(a.next_trigger(at(18, 8, 0)), None);

        a.days.clear();
        assert_eq!(a.next_trigger(at(18, 8, 0)), None);
    }
}
