use chrono::{DateTime, Utc};

/// List-pane date: clock time within a day, "Yesterday" within two, else the date.
pub fn relative_date(datetime: &DateTime<Utc>, now: &DateTime<Utc>) -> String {
    let hours = (*now - *datetime).num_hours();

    if hours < 24 {
        datetime.format("%H:%M").to_string()
    } else if hours < 48 {
        "Yesterday".to_string()
    } else {
        datetime.format("%Y-%m-%d").to_string()
    }
}

pub fn full_date(datetime: &DateTime<Utc>) -> String {
    datetime.format("%Y-%m-%d %H:%M").to_string()
}

/// Two-letter avatar text taken from the local part of the recipient.
pub fn initials(to: &str) -> String {
    let to = if to.is_empty() { "Unknown" } else { to };
    let local = to.split('@').next().unwrap_or_default();
    local.chars().take(2).collect::<String>().to_uppercase()
}
