use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

/// Current local time, or UTC when the local offset cannot be determined.
pub fn now_local() -> OffsetDateTime {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    OffsetDateTime::now_utc().to_offset(offset)
}

/// `YYYY-MM-DD | HH:MM:SS` for the view header.
pub fn label(now: OffsetDateTime) -> String {
    let format = format_description!("[year]-[month]-[day] | [hour]:[minute]:[second]");
    now.format(format)
        .unwrap_or_else(|_| now.date().to_string())
}
