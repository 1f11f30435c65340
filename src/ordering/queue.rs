use std::collections::HashMap;

use chrono::NaiveDate;

/// Hands out pickup numbers: 1, 2, 3, ... per vendor per local day.
#[derive(Debug, Default)]
pub struct QueueBook {
    last_issued: HashMap<(String, NaiveDate), u32>,
}

impl QueueBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_number(&mut self, vendor_id: &str, day: NaiveDate) -> u32 {
        let counter = self
            .last_issued
            .entry((vendor_id.to_string(), day))
            .or_insert(0);
        *counter += 1;
        *counter
    }

    /// Highest number issued so far, `0` if none.
    pub fn last_number(&self, vendor_id: &str, day: NaiveDate) -> u32 {
        self.last_issued
            .get(&(vendor_id.to_string(), day))
            .copied()
            .unwrap_or(0)
    }
}
