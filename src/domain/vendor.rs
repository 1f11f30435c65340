use chrono::{Datelike, Duration, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

/// One weekly opening window. A window whose close time is not after its
/// open time runs past midnight into the next day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatingHours {
    pub weekday: Weekday,
    pub opens_at: NaiveTime,
    pub closes_at: NaiveTime,
}

impl OperatingHours {
    pub fn new(weekday: Weekday, opens_at: NaiveTime, closes_at: NaiveTime) -> Self {
        Self {
            weekday,
            opens_at,
            closes_at,
        }
    }

    fn spans_midnight(&self) -> bool {
        self.closes_at <= self.opens_at
    }

    /// Whether the local wall-clock time falls inside this window.
    pub fn contains(&self, local: NaiveDateTime) -> bool {
        let time = local.time();
        let day = local.weekday();

        if !self.spans_midnight() {
            return day == self.weekday && time >= self.opens_at && time < self.closes_at;
        }

        let tail_day = (local - Duration::days(1)).weekday();
        (day == self.weekday && time >= self.opens_at)
            || (tail_day == self.weekday && time < self.closes_at)
    }
}

/// A merchant account that lists menu items and fulfills orders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vendor {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub is_open: bool,
    pub hours: Vec<OperatingHours>,
}

impl Vendor {
    /// A vendor takes orders when its manual switch is on and, if it has
    /// published hours, the local time is inside one of them.
    pub fn accepts_orders_at(&self, local: NaiveDateTime) -> bool {
        self.is_open && (self.hours.is_empty() || self.hours.iter().any(|h| h.contains(local)))
    }
}

#[derive(Debug, Clone)]
pub struct VendorCreate {
    pub owner_id: String,
    pub name: String,
    pub hours: Vec<OperatingHours>,
}

#[derive(Debug, Clone, Default)]
pub struct VendorPatch {
    pub name: Option<String>,
}
