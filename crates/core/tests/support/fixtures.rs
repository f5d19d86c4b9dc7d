//! Event documents and clocks used across core tests

use chrono::{DateTime, Local, TimeZone};
use peek_core::Clock;
use serde_json::{json, Value};

/// Clock pinned to noon on a fixed local date.
pub struct FixedClock(DateTime<Local>);

impl FixedClock {
    pub fn on(year: i32, month: u32, day: u32) -> Self {
        let now = Local
            .with_ymd_and_hms(year, month, day, 12, 0, 0)
            .single()
            .expect("unambiguous local time");
        Self(now)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}

/// A consistent event document dated `date`, with nobody attending.
pub fn event_doc(id: &str, title: &str, date: &str) -> Value {
    json!({
        "eventId": id,
        "title": title,
        "category": "Music",
        "description": format!("{title} description"),
        "date": date,
        "time": "07:00 PM - 09:00 PM",
        "location": "Town Hall",
        "zone": "Central",
        "attendeeCount": 0,
        "creatorId": "creator",
        "rsvpList": {}
    })
}

/// Same as [`event_doc`] but owned by `creator` with the given attendees.
pub fn owned_event_doc(id: &str, creator: &str, attendees: &[&str]) -> Value {
    let mut doc = event_doc(id, id, "01/01/2031");
    doc["creatorId"] = json!(creator);
    for user in attendees {
        doc["rsvpList"][*user] = json!(true);
    }
    doc["attendeeCount"] = json!(attendees.len());
    doc
}
