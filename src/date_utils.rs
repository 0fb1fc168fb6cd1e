use chrono::Month;

/// Short month label ("Jan", "Feb", ...) for a zero-based month index.
pub fn month_label(index: usize) -> &'static str {
    u8::try_from(index + 1)
        .ok()
        .and_then(|n| Month::try_from(n).ok())
        .map(|m| &m.name()[..3])
        .unwrap_or("?")
}

/// Labels for the first `count` months of the year.
pub fn month_labels(count: usize) -> Vec<&'static str> {
    (0..count.min(12)).map(month_label).collect()
}
