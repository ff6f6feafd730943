use crate::error::Error;
use std::ops::Range;

/// Split `0..m` into at most `workers` contiguous ranges.
///
/// Range `i` is `[i*base, (i+1)*base)` with `base = m / workers`; the last one
/// also takes the `m % workers` leftover. Empty ranges are dropped, so `m < workers`
/// yields the single range `0..m`.
pub fn partition(m: usize, workers: usize) -> Result<Vec<Range<usize>>, Error> {
    if workers == 0 {
        return Err(Error::invalid("worker count must be at least 1"));
    }
    let base = m / workers;
    let rem = m % workers;
    Ok((0..workers)
        .map(|i| {
            let start = i * base;
            let end = if i + 1 == workers {
                start + base + rem
            } else {
                start + base
            };
            start..end
        })
        .filter(|r| !r.is_empty())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn even_split() {
        assert_eq!(partition(32, 4).unwrap(), vec![0..8, 8..16, 16..24, 24..32]);
    }

    #[test]
    fn last_range_takes_remainder() {
        assert_eq!(partition(10, 3).unwrap(), vec![0..3, 3..6, 6..10]);
        let r = partition(35, 16).unwrap();
        assert_eq!(r.len(), 16);
        assert_eq!(r[14], 28..30);
        assert_eq!(r[15], 30..35);
    }

    #[test]
    fn small_batch_gets_one_worker() {
        assert_eq!(partition(5, 16).unwrap(), vec![0..5]);
        assert_eq!(partition(1, 16).unwrap(), vec![0..1]);
    }

    #[test]
    fn zero_workers_rejected() {
        assert!(matches!(
            partition(4, 0),
            Err(Error::InvalidParameter { .. })
        ));
    }
}
