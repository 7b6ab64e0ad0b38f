//! Display formatting for scale readings

pub fn format_weight(weight_g: f64) -> String {
    format!("{:.1}", weight_g)
}

pub fn format_flow_rate(flow_rate_g_per_s: f64) -> String {
    format!("{:.1}", flow_rate_g_per_s)
}

/// `MM:SS`. Minutes keep growing past 59, there is no hour field.
pub fn format_timer(timer_ms: u32) -> String {
    let total_seconds = timer_ms / 1000;
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timer() {
        assert_eq!(format_timer(0), "00:00");
        assert_eq!(format_timer(999), "00:00");
        assert_eq!(format_timer(59000), "00:59");
        assert_eq!(format_timer(60000), "01:00");
        assert_eq!(format_timer(3661000), "61:01");
        assert_eq!(format_timer(6_000_000), "100:00");
    }

    #[test]
    fn test_format_weight_and_flow() {
        assert_eq!(format_weight(1234.5), "1234.5");
        assert_eq!(format_weight(-12.34), "-12.3");
        assert_eq!(format_weight(0.0), "0.0");
        assert_eq!(format_flow_rate(5.6), "5.6");
        assert_eq!(format_flow_rate(3.87), "3.9");
        assert_eq!(format_flow_rate(0.45), "0.5");
        assert_eq!(format_weight(167772.15), "167772.1");
    }
}
