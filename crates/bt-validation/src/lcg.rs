/// One step of the seeded linear-congruential generator (spec §4.4):
/// `state <- (state * 9301 + 49297) mod 233280`.
fn lcg_next(state: u64) -> u64 {
    (state.wrapping_mul(9301).wrapping_add(49297)) % 233280
}

fn lcg_draw(state: u64) -> f64 {
    state as f64 / 233280.0
}

/// Fisher-Yates shuffle driven by the LCG's draw sequence. Deterministic:
/// the same `seed` always produces the same permutation for a given length.
pub fn fisher_yates_shuffle<T>(items: &mut [T], seed: u64) {
    let mut state = seed % 233280;
    for i in (1..items.len()).rev() {
        state = lcg_next(state);
        let draw = lcg_draw(state);
        let j = ((draw * (i + 1) as f64).floor() as usize).min(i);
        items.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_permutation() {
        let mut a: Vec<i32> = (0..20).collect();
        let mut b: Vec<i32> = (0..20).collect();
        fisher_yates_shuffle(&mut a, 7);
        fisher_yates_shuffle(&mut b, 7);
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_usually_differ() {
        let mut a: Vec<i32> = (0..20).collect();
        let mut b: Vec<i32> = (0..20).collect();
        fisher_yates_shuffle(&mut a, 1);
        fisher_yates_shuffle(&mut b, 2);
        assert_ne!(a, b);
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut a: Vec<i32> = (0..50).collect();
        fisher_yates_shuffle(&mut a, 12345);
        let mut sorted = a.clone();
        sorted.sort();
        assert_eq!(sorted, (0..50).collect::<Vec<_>>());
    }
}
