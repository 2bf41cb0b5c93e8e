use regex::Regex;
use std::sync::LazyLock;

static ISO_DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^PT(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?$").expect("valid duration regex")
});

/// Render an ISO-8601 `PT[nH][nM][nS]` code as `H:MM:SS`, or `M:SS` when
/// there is no hour part. Anything that does not fit the shape gives `""`.
pub fn format_duration(code: Option<&str>) -> String {
    let Some(code) = code else {
        return String::new();
    };
    let Some(captures) = ISO_DURATION.captures(code) else {
        return String::new();
    };

    let mut parts = [0u64; 3];
    for (slot, group) in parts.iter_mut().zip(1..=3) {
        if let Some(m) = captures.get(group) {
            match m.as_str().parse::<u64>() {
                Ok(value) => *slot = value,
                Err(_) => return String::new(),
            }
        }
    }
    let [hours, minutes, seconds] = parts;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Some("PT1H2M30S")), "1:02:30");
        assert_eq!(format_duration(Some("PT5M9S")), "5:09");
        assert_eq!(format_duration(Some("PT45S")), "0:45");
        assert_eq!(format_duration(Some("PT12M")), "12:00");
        assert_eq!(format_duration(Some("PT2H")), "2:00:00");
        assert_eq!(format_duration(Some("PT10H0M5S")), "10:00:05");
    }

    #[test]
    fn test_empty_code_is_zero() {
        assert_eq!(format_duration(Some("PT")), "0:00");
    }

    #[test]
    fn test_zero_hours_uses_short_form() {
        assert_eq!(format_duration(Some("PT0H3M3S")), "3:03");
    }

    #[test]
    fn test_malformed() {
        assert_eq!(format_duration(None), "");
        assert_eq!(format_duration(Some("")), "");
        assert_eq!(format_duration(Some("P1DT2H")), "");
        assert_eq!(format_duration(Some("PT1.5S")), "");
        assert_eq!(format_duration(Some("PT-3S")), "");
        assert_eq!(format_duration(Some("3:33")), "");
        assert_eq!(format_duration(Some("PT99999999999999999999999S")), "");
    }
}
