pub const DISCOUNT_FACTOR: f64 = 0.9;

/// For every prefix of `values`, scales it by `DISCOUNT_FACTOR` and evaluates it as a
/// polynomial (first element is the highest degree coefficient) at `1 - DISCOUNT_FACTOR`.
pub fn discounted_rewards(values: &[f64]) -> Vec<f64> {
    let x = 1.0 - DISCOUNT_FACTOR;

    (1..=values.len())
        .map(|len| {
            values[..len]
                .iter()
                .fold(0.0, |acc, &v| acc * x + v * DISCOUNT_FACTOR)
        })
        .collect()
}

pub fn discounted_sum(values: &[f64]) -> f64 {
    discounted_rewards(values).iter().sum()
}
