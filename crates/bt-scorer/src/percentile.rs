/// Linear-interpolation percentile (the R-7 method: same convention as
/// numpy's default, Excel's PERCENTILE.INC). `q` in `[0, 1]`. `sorted` must
/// already be sorted ascending and non-empty.
pub fn percentile(sorted: &[f64], q: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    if sorted.len() == 1 {
        return sorted[0];
    }
    let q = q.clamp(0.0, 1.0);
    let rank = q * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        let frac = rank - lo as f64;
        sorted[lo] + (sorted[hi] - sorted[lo]) * frac
    }
}

pub fn median(sorted: &[f64]) -> f64 {
    percentile(sorted, 0.5)
}

pub fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut v = values.to_vec();
    v.sort_by(|a, b| a.partial_cmp(b).expect("non-NaN input"));
    v
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn median_odd_and_even() {
        assert_eq!(median(&sorted_copy(&[1.0, 2.0, 3.0])), 2.0);
        assert_eq!(median(&sorted_copy(&[1.0, 2.0, 3.0, 4.0])), 2.5);
    }

    #[test]
    fn percentile_matches_endpoints() {
        let v = sorted_copy(&[10.0, 20.0, 30.0, 40.0]);
        assert_eq!(percentile(&v, 0.0), 10.0);
        assert_eq!(percentile(&v, 1.0), 40.0);
    }
}
