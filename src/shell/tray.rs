use chrono::{NaiveTime, Timelike};

/// Taskbar clock text, e.g. "9:05 PM"
pub fn clock_label(time: NaiveTime) -> String {
    let (pm, hour) = time.hour12();
    format!("{}:{:02} {}", hour, time.minute(), if pm { "PM" } else { "AM" })
}

pub fn volume_label(muted: bool) -> &'static str {
    if muted {
        "Unmute"
    } else {
        "Mute"
    }
}
