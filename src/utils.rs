//! Shared utility functions and traits

/// Extension trait for tracking a running minimum in `Option<T>`.
///
/// # Example
///
/// ```
/// use reaction_testkit::utils::MinExt;
///
/// let mut best: Option<u64> = None;
///
/// best.update_min(250);
/// assert_eq!(best, Some(250));
///
/// best.update_min(190);
/// assert_eq!(best, Some(190));
///
/// best.update_min(300);  // 300 > 190, so best stays 190
/// assert_eq!(best, Some(190));
/// ```
pub trait MinExt<T: Ord + Copy> {
    /// Stores `value` if it is smaller than the current minimum or if no
    /// minimum exists yet.
    fn update_min(&mut self, value: T);
}

impl<T: Ord + Copy> MinExt<T> for Option<T> {
    fn update_min(&mut self, value: T) {
        *self = Some(self.map(|m| m.min(value)).unwrap_or(value));
    }
}

/// Arithmetic mean of `samples` rounded to the nearest whole millisecond.
///
/// Returns `None` for an empty slice.
pub fn rounded_mean_ms(samples: &[f64]) -> Option<u64> {
    if samples.is_empty() {
        return None;
    }
    let mean = samples.iter().sum::<f64>() / samples.len() as f64;
    Some(mean.max(0.0).round() as u64)
}
