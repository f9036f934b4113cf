//! Coarse progress reporting for long element passes.

/// Throttled reporter wrapping an optional caller-supplied callback
/// `(current, total, message)`.
///
/// Reports land at most once per `min(total / 100, 100)` elements, so a
/// large pass reports roughly every 1% and a huge pass at least every 100
/// elements. The final element always reports. This is an observability
/// hook, not a concurrency primitive — there is no cancellation.
pub struct Progress<'a> {
    callback: Option<&'a mut dyn FnMut(usize, usize, &str)>,
}

impl<'a> Progress<'a> {
    #[must_use]
    pub fn new(callback: &'a mut dyn FnMut(usize, usize, &str)) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    /// A reporter that drops every report.
    #[must_use]
    pub fn none() -> Self {
        Self { callback: None }
    }

    /// Report position `current` (1-based) of `total`.
    pub fn report(&mut self, current: usize, total: usize, message: &str) {
        let Some(callback) = self.callback.as_mut() else {
            return;
        };

        let step = (total / 100).clamp(1, 100);
        if current % step == 0 || current == total {
            callback(current, total, message);
        }
    }
}

impl Default for Progress<'_> {
    fn default() -> Self {
        Self::none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn small_batches_report_every_element() {
        let mut seen = Vec::new();
        let mut callback = |current: usize, _total: usize, _message: &str| seen.push(current);

        let mut progress = Progress::new(&mut callback);
        for i in 1..=5 {
            progress.report(i, 5, "extract");
        }

        assert_eq!(seen, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn large_batches_are_throttled() {
        let mut count = 0usize;
        let mut callback = |_: usize, _: usize, _: &str| count += 1;

        let mut progress = Progress::new(&mut callback);
        for i in 1..=1000 {
            progress.report(i, 1000, "extract");
        }

        // step = 10 for 1000 elements
        assert_eq!(count, 100);
    }

    #[test]
    fn huge_batches_cap_the_interval_at_100() {
        let mut count = 0usize;
        let mut callback = |_: usize, _: usize, _: &str| count += 1;

        let mut progress = Progress::new(&mut callback);
        for i in 1..=50_000 {
            progress.report(i, 50_000, "extract");
        }

        assert_eq!(count, 500);
    }

    #[test]
    fn none_is_silent() {
        let mut progress = Progress::none();
        progress.report(1, 1, "noop");
    }
}
