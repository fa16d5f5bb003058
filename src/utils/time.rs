/// Formats `seconds` as `H:MM:SS` or `M:SS`.
///
/// `guide` is the longest time shown next to this one (usually the
/// duration); it decides how many fields to print so that the two displays
/// line up. Negative, NaN and infinite inputs print as zero.
pub fn format_time(seconds: f64, guide: f64) -> String {
    let seconds = if seconds.is_finite() && seconds > 0.0 { seconds.floor() as u64 } else { 0 };
    let guide = if guide.is_finite() && guide > 0.0 { guide.floor() as u64 } else { 0 };

    let s = seconds % 60;
    let m = (seconds / 60) % 60;
    let h = seconds / 3600;
    let guide_m = (guide / 60) % 60;
    let guide_h = guide / 3600;

    let hours = if h > 0 || guide_h > 0 { format!("{}:", h) } else { String::new() };
    let minutes = if (h > 0 || guide_h > 0) || guide_m >= 10 {
        format!("{:02}:", m)
    } else {
        format!("{}:", m)
    };

    format!("{}{}{:02}", hours, minutes, s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_times_use_minutes_and_seconds() {
        assert_eq!(format_time(0.0, 0.0), "0:00");
        assert_eq!(format_time(65.4, 300.0), "1:05");
    }

    #[test]
    fn hours_appear_when_either_value_needs_them() {
        assert_eq!(format_time(3725.0, 0.0), "1:02:05");
        assert_eq!(format_time(65.0, 7200.0), "0:01:05");
    }

    #[test]
    fn long_guides_pad_minutes() {
        assert_eq!(format_time(65.0, 900.0), "01:05");
    }

    #[test]
    fn invalid_input_prints_zero() {
        assert_eq!(format_time(f64::NAN, 0.0), "0:00");
        assert_eq!(format_time(-3.0, 0.0), "0:00");
        assert_eq!(format_time(f64::INFINITY, 0.0), "0:00");
    }
}
