use chrono::Datelike;

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Short month name used on chart axes. Out-of-range months yield `"?"`.
pub fn month_label(month: u8) -> &'static str {
    match month {
        1..=12 => MONTH_LABELS[month as usize - 1],
        _ => "?",
    }
}

/// The current local (year, month).
pub fn current_year_month() -> (i32, u8) {
    let today = chrono::Local::now().date_naive();
    (today.year(), today.month() as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_label() {
        assert_eq!(month_label(1), "Jan");
        assert_eq!(month_label(6), "Jun");
        assert_eq!(month_label(12), "Dec");
        assert_eq!(month_label(0), "?");
        assert_eq!(month_label(13), "?");
    }

    #[test]
    fn test_current_year_month_in_range() {
        let (year, month) = current_year_month();
        assert!(year >= 2024);
        assert!((1..=12).contains(&month));
    }
}
