//! Time source for snapshot names.

use chrono::{Local, NaiveDateTime};

/// `2024-Mar-05:_14:03:09`
pub const SNAPSHOT_DATE_FORMAT: &str = "%Y-%b-%d:_%H:%M:%S";

pub trait Clock {
    /// Current local wall-clock time.
    fn now(&self) -> NaiveDateTime;

    fn snapshot_stamp(&self) -> String {
        self.now().format(SNAPSHOT_DATE_FORMAT).to_string()
    }
}

/// Reads the system's local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    struct Fixed(NaiveDateTime);

    impl Clock for Fixed {
        fn now(&self) -> NaiveDateTime {
            self.0
        }
    }

    #[test]
    fn stamp_uses_abbreviated_month() {
        let at = NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(14, 3, 9)
            .unwrap();
        assert_eq!(Fixed(at).snapshot_stamp(), "2024-Mar-05:_14:03:09");
    }
}
