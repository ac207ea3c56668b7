use chrono::{DateTime, Utc};
use tracker_core::Countdown;

use crate::vm::time_fmt::pad2;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CountdownVm {
    pub days: String,
    pub hours: String,
    pub minutes: String,
    pub seconds: String,
    pub elapsed: bool,
}

#[must_use]
pub fn map_countdown(target: DateTime<Utc>, now: DateTime<Utc>) -> CountdownVm {
    let c = Countdown::until(target, now);
    CountdownVm {
        days: pad2(c.days),
        hours: pad2(c.hours),
        minutes: pad2(c.minutes),
        seconds: pad2(c.seconds),
        elapsed: c.elapsed,
    }
}
