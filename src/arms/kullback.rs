/// Everything in [0, 1] is truncated to [EPS, 1 - EPS] before taking logs.
pub const EPS: f64 = 1e-15;

/// Kullback-Leibler divergence between two Bernoulli distributions of means `x` and `y`.
pub fn kl_bern(x: f64, y: f64) -> f64 {
    let x = x.clamp(EPS, 1.0 - EPS);
    let y = y.clamp(EPS, 1.0 - EPS);

    x * (x / y).ln() + (1.0 - x) * ((1.0 - x) / (1.0 - y)).ln()
}
