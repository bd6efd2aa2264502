// Time series domain model
use super::error::DashboardError;
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint<K, V> {
    pub key: K,
    pub value: V,
}

impl<K, V> SeriesPoint<K, V> {
    pub fn new(key: K, value: V) -> Self {
        Self { key, value }
    }
}

/// Ordered, non-empty sequence of points. Keys are expected to be
/// non-decreasing but this is not checked.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries<K, V> {
    points: Vec<SeriesPoint<K, V>>,
}

impl<K, V> TimeSeries<K, V> {
    pub fn new(points: Vec<SeriesPoint<K, V>>) -> Result<Self, DashboardError> {
        if points.is_empty() {
            return Err(DashboardError::EmptySeries);
        }
        Ok(Self { points })
    }

    pub fn from_pairs(pairs: impl IntoIterator<Item = (K, V)>) -> Result<Self, DashboardError> {
        Self::new(
            pairs
                .into_iter()
                .map(|(key, value)| SeriesPoint::new(key, value))
                .collect(),
        )
    }

    pub fn points(&self) -> &[SeriesPoint<K, V>] {
        &self.points
    }

    pub fn first_key(&self) -> &K {
        // Non-empty by construction
        &self.points[0].key
    }

    pub fn last_key(&self) -> &K {
        &self.points[self.points.len() - 1].key
    }
}

/// Series keyed by calendar date, the only kind the date pickers filter.
pub type DailySeries<V> = TimeSeries<NaiveDate, V>;

/// Keep the points with `start <= key <= end`, in their original order.
/// An inverted range yields nothing.
pub fn filter_by_range<K, V>(points: &[SeriesPoint<K, V>], start: &K, end: &K) -> Vec<SeriesPoint<K, V>>
where
    K: PartialOrd + Clone,
    V: Clone,
{
    if start > end {
        return Vec::new();
    }
    points
        .iter()
        .filter(|p| *start <= p.key && p.key <= *end)
        .cloned()
        .collect()
}

/// Like [`filter_by_range`], but a missing bound leaves that side open.
pub fn filter_by_optional_range<K, V>(
    points: &[SeriesPoint<K, V>],
    start: Option<&K>,
    end: Option<&K>,
) -> Vec<SeriesPoint<K, V>>
where
    K: PartialOrd + Clone,
    V: Clone,
{
    if let (Some(start), Some(end)) = (start, end) {
        return filter_by_range(points, start, end);
    }
    points
        .iter()
        .filter(|p| start.is_none_or(|s| *s <= p.key) && end.is_none_or(|e| p.key <= *e))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 9, day).unwrap()
    }

    fn six_days() -> DailySeries<i32> {
        TimeSeries::from_pairs((1..=6).map(|d| (date(d), d as i32 * 10))).unwrap()
    }

    #[test]
    fn test_empty_series_is_rejected() {
        let result = TimeSeries::<NaiveDate, f64>::new(Vec::new());
        assert_eq!(result, Err(DashboardError::EmptySeries));
    }

    #[test]
    fn test_filter_inclusive_range_keeps_order() {
        let series = six_days();
        let filtered = filter_by_range(series.points(), &date(2), &date(4));

        let keys: Vec<NaiveDate> = filtered.iter().map(|p| p.key).collect();
        assert_eq!(keys, vec![date(2), date(3), date(4)]);
        let values: Vec<i32> = filtered.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![20, 30, 40]);
        // Source untouched
        assert_eq!(series.points().len(), 6);
    }

    #[test]
    fn test_filter_inverted_range_is_empty() {
        let series = six_days();
        for start in 1..=6 {
            for end in 1..start {
                assert!(filter_by_range(series.points(), &date(start), &date(end)).is_empty());
            }
        }
    }

    #[test]
    fn test_filter_outside_data_is_empty() {
        let series = six_days();
        assert!(filter_by_range(series.points(), &date(10), &date(20)).is_empty());
    }

    #[test]
    fn test_filter_is_idempotent() {
        let series = six_days();
        for start in 0..=7 {
            for end in 0..=7 {
                let (s, e) = (date(start.max(1)), date(end.max(1)));
                let once = filter_by_range(series.points(), &s, &e);
                let twice = filter_by_range(&once, &s, &e);
                assert_eq!(once, twice);
            }
        }
    }

    #[test]
    fn test_filter_keeps_repeated_keys() {
        let series =
            TimeSeries::from_pairs(vec![(date(1), 1), (date(2), 2), (date(2), 3), (date(3), 4)])
                .unwrap();
        let filtered = filter_by_range(series.points(), &date(2), &date(2));
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[0].value, 2);
        assert_eq!(filtered[1].value, 3);
    }

    #[test]
    fn test_optional_bounds_are_open() {
        let series = six_days();
        assert_eq!(filter_by_optional_range(series.points(), None, None).len(), 6);
        assert_eq!(
            filter_by_optional_range(series.points(), Some(&date(5)), None).len(),
            2
        );
        assert_eq!(
            filter_by_optional_range(series.points(), None, Some(&date(2))).len(),
            2
        );
        assert!(filter_by_optional_range(series.points(), Some(&date(5)), Some(&date(2))).is_empty());
    }

    #[test]
    fn test_first_and_last_key() {
        let series = six_days();
        assert_eq!(*series.first_key(), date(1));
        assert_eq!(*series.last_key(), date(6));
    }
}
