use crate::config::TailPolicy;

/// Lazy, single-pass partition of a sample stream into fixed-length windows.
///
/// The underlying stream is consumed as windows are pulled, so the sequence
/// cannot be restarted once iteration begins.
pub struct Windows<I> {
    source: I,
    window_len: usize,
    tail_policy: TailPolicy,
    finished: bool,
}

/// Splits `samples` into non-overlapping windows of exactly `window_len`
/// samples. The trailing partial window is dropped or zero-padded per
/// `tail_policy`.
pub fn windows<I>(samples: I, window_len: usize, tail_policy: TailPolicy) -> Windows<I::IntoIter>
where
    I: IntoIterator<Item = f32>,
{
    // Zero-length windows are a caller bug, not a runtime condition
    debug_assert!(window_len > 0, "window_len must be non-zero");
    Windows {
        source: samples.into_iter(),
        window_len,
        tail_policy,
        finished: false,
    }
}

impl<I: Iterator<Item = f32>> Iterator for Windows<I> {
    type Item = Vec<f32>;

    fn next(&mut self) -> Option<Vec<f32>> {
        if self.finished {
            return None;
        }

        let mut window = Vec::with_capacity(self.window_len);
        while window.len() < self.window_len {
            match self.source.next() {
                Some(sample) => window.push(sample),
                None => break,
            }
        }

        if window.len() == self.window_len {
            return Some(window);
        }

        self.finished = true;
        if window.is_empty() {
            return None;
        }

        match self.tail_policy {
            TailPolicy::Drop => None,
            TailPolicy::ZeroPad => {
                window.resize(self.window_len, 0.0);
                Some(window)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(n: usize) -> Vec<f32> {
        (0..n).map(|i| i as f32).collect()
    }

    #[test]
    fn exact_multiple_yields_full_windows() {
        let out: Vec<Vec<f32>> = windows(ramp(12), 4, TailPolicy::Drop).collect();
        assert_eq!(out.len(), 3);
        assert!(out.iter().all(|w| w.len() == 4));
        assert_eq!(out[1], vec![4.0, 5.0, 6.0, 7.0]);
    }

    #[test]
    fn drop_policy_discards_partial_tail() {
        let out: Vec<Vec<f32>> = windows(ramp(10), 4, TailPolicy::Drop).collect();
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn zero_pad_policy_extends_partial_tail() {
        let out: Vec<Vec<f32>> = windows(ramp(10), 4, TailPolicy::ZeroPad).collect();
        assert_eq!(out.len(), 3);
        assert_eq!(out[2], vec![8.0, 9.0, 0.0, 0.0]);
    }

    #[test]
    fn empty_stream_yields_no_windows() {
        let out: Vec<Vec<f32>> = windows(Vec::new(), 4, TailPolicy::ZeroPad).collect();
        assert!(out.is_empty());
    }

    #[test]
    fn stream_shorter_than_one_window() {
        let dropped: Vec<Vec<f32>> = windows(ramp(3), 4, TailPolicy::Drop).collect();
        assert!(dropped.is_empty());

        let padded: Vec<Vec<f32>> = windows(ramp(3), 4, TailPolicy::ZeroPad).collect();
        assert_eq!(padded, vec![vec![0.0, 1.0, 2.0, 0.0]]);
    }

    #[test]
    fn iteration_is_fused_after_tail() {
        let mut it = windows(ramp(5), 4, TailPolicy::ZeroPad);
        assert!(it.next().is_some());
        assert!(it.next().is_some());
        assert!(it.next().is_none());
        assert!(it.next().is_none());
    }
}
