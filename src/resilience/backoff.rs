//! Exponential backoff with jitter.

use rand::Rng;
use std::time::Duration;

/// Delay before retry number `attempt` (1-based; 0 means no delay).
pub fn calculate_backoff(attempt: u32, base_ms: u64, max_ms: u64) -> Duration {
    if attempt == 0 {
        return Duration::from_millis(0);
    }

    let exponential_base = 2u64.saturating_pow(attempt - 1);
    let delay_ms = base_ms.saturating_mul(exponential_base);
    let capped_delay = delay_ms.min(max_ms);

    // Up to 10% jitter on top of the capped delay.
    let jitter_range = capped_delay / 10;
    let jitter = if jitter_range > 0 {
        rand::thread_rng().gen_range(0..jitter_range)
    } else {
        0
    };

    Duration::from_millis(capped_delay + jitter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_grows_and_caps() {
        assert_eq!(calculate_backoff(0, 200, 2000), Duration::ZERO);

        let first = calculate_backoff(1, 200, 2000).as_millis();
        assert!((200..220).contains(&first));

        let second = calculate_backoff(2, 200, 2000).as_millis();
        assert!((400..440).contains(&second));

        let capped = calculate_backoff(20, 200, 2000).as_millis();
        assert!((2000..2200).contains(&capped));
    }

    #[test]
    fn test_tiny_delays_have_no_jitter() {
        assert_eq!(calculate_backoff(1, 5, 2000), Duration::from_millis(5));
    }
}
