//! Dashboard statistics helpers.

/// Change in a counter since the caller last acknowledged it.
///
/// The caller persists (or simply remembers) the value it last showed the
/// user and passes it back as the watermark; a first visit with no watermark
/// reports no change. No server-side "last viewed" state exists; the
/// function is pure.
pub fn acknowledged_delta(current: i64, last_acknowledged: Option<i64>) -> i64 {
    current - last_acknowledged.unwrap_or(current)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_watermark_means_no_delta() {
        assert_eq!(acknowledged_delta(12, None), 0);
    }

    #[test]
    fn deltas_can_be_negative() {
        assert_eq!(acknowledged_delta(10, Some(4)), 6);
        assert_eq!(acknowledged_delta(4, Some(10)), -6);
        assert_eq!(acknowledged_delta(5, Some(5)), 0);
    }
}
