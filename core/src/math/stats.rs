pub struct StatsHelper;

impl StatsHelper {
    /// Integer mean of dBm readings, truncated toward zero.
    pub fn mean_dbm<I>(samples: I) -> Option<i8>
    where
        I: IntoIterator<Item = i8>,
    {
        let (sum, count) = samples
            .into_iter()
            .fold((0i32, 0i32), |(sum, count), v| (sum + v as i32, count + 1));
        if count == 0 {
            return None;
        }
        Some((sum / count) as i8)
    }

    /// Number of readings within `tolerance` dB of `reference` (inclusive).
    pub fn count_within<I>(samples: I, reference: i8, tolerance: i8) -> usize
    where
        I: IntoIterator<Item = i8>,
    {
        samples
            .into_iter()
            .filter(|&v| (v as i16 - reference as i16).abs() <= tolerance as i16)
            .count()
    }

    /// Distinct values in first-seen order, keeping at most `limit` of them.
    pub fn distinct_frequencies<I>(frequencies: I, limit: usize) -> Vec<u32>
    where
        I: IntoIterator<Item = u32>,
    {
        let mut unique = Vec::with_capacity(limit);
        for freq in frequencies {
            if unique.len() >= limit {
                break;
            }
            if !unique.contains(&freq) {
                unique.push(freq);
            }
        }
        unique
    }

    /// Mean spacing in ms between consecutive timestamps given newest first.
    pub fn mean_interval_ms(newest_first: &[u32]) -> u32 {
        if newest_first.len() < 2 {
            return 0;
        }
        let newest = newest_first[0];
        let oldest = newest_first[newest_first.len() - 1];
        newest.saturating_sub(oldest) / (newest_first.len() as u32 - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_nothing_is_none() {
        assert_eq!(StatsHelper::mean_dbm(std::iter::empty()), None);
    }

    #[test]
    fn mean_truncates_toward_zero() {
        // -695 / 8 = -86.875
        let window = [-65, -90, -90, -90, -90, -90, -90, -90];
        assert_eq!(StatsHelper::mean_dbm(window), Some(-86));
    }

    #[test]
    fn count_within_is_inclusive() {
        assert_eq!(StatsHelper::count_within([-120, -125, -126, -110], -120, 5), 2);
    }

    #[test]
    fn distinct_frequencies_stops_at_limit() {
        let freqs = [1, 2, 2, 3, 4, 5];
        assert_eq!(StatsHelper::distinct_frequencies(freqs, 3), vec![1, 2, 3]);
    }

    #[test]
    fn mean_interval_uses_span() {
        assert_eq!(StatsHelper::mean_interval_ms(&[400, 300, 200, 100]), 100);
        assert_eq!(StatsHelper::mean_interval_ms(&[5]), 0);
    }
}
