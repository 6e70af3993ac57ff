//! Math primitives shared by the model formulas.
//!
//! All functions are pure. `factorial` has no overflow guard and returns
//! `inf` past `170!`; callers that may go that far use the log-domain
//! [`LogSum`] accumulator instead.

/// Tolerance under which a ratio is treated as exactly one.
pub const UNIT_RATIO_EPSILON: f64 = 1e-9;

/// Largest `n` whose factorial is finite in `f64`.
pub const MAX_FINITE_FACTORIAL: i64 = 170;

/// Compute `n!`.
///
/// Returns NaN for negative `n`.
#[must_use]
pub fn factorial(n: i64) -> f64 {
    if n < 0 {
        return f64::NAN;
    }
    let mut res = 1.0;
    for i in 2..=n {
        res *= i as f64;
    }
    res
}

/// Sum of the geometric series `1 + r + r² + … + r^(terms-1)`.
///
/// Returns 0 for `terms <= 0` and `terms` itself when `r` is within
/// [`UNIT_RATIO_EPSILON`] of one, where the closed form is 0/0.
#[must_use]
pub fn geometric_sum(r: f64, terms: i64) -> f64 {
    if terms <= 0 {
        return 0.0;
    }
    if (r - 1.0).abs() < UNIT_RATIO_EPSILON {
        return terms as f64;
    }
    (1.0 - r.powf(terms as f64)) / (1.0 - r)
}

/// Binomial coefficient `C(n, k)` via the multiplicative formula.
///
/// Returns 0 when `k < 0` or `k > n`.
#[must_use]
pub fn combination(n: i64, k: i64) -> f64 {
    if k < 0 || k > n {
        return 0.0;
    }
    if k == 0 || k == n {
        return 1.0;
    }
    let k = k.min(n - k);
    let mut num = 1.0;
    let mut den = 1.0;
    for i in 1..=k {
        num *= (n - (k - i)) as f64;
        den *= i as f64;
    }
    num / den
}

/// Streaming `ln(Σ exp(xᵢ))` accumulator.
///
/// Keeps the running maximum so no intermediate term overflows, which lets
/// finite state spaces be normalized without materializing their weights.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogSum {
    max: f64,
    scaled: f64,
}

impl Default for LogSum {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSum {
    /// Create an empty accumulator (`ln 0 = -inf`).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max: f64::NEG_INFINITY,
            scaled: 0.0,
        }
    }

    /// Add the term `exp(ln_term)`.
    pub fn push(&mut self, ln_term: f64) {
        if ln_term == f64::NEG_INFINITY {
            return;
        }
        if ln_term <= self.max {
            self.scaled += (ln_term - self.max).exp();
        } else {
            self.scaled = self.scaled * (self.max - ln_term).exp() + 1.0;
            self.max = ln_term;
        }
    }

    /// Natural log of the accumulated sum.
    #[must_use]
    pub fn ln(&self) -> f64 {
        if self.scaled == 0.0 {
            return f64::NEG_INFINITY;
        }
        self.max + self.scaled.ln()
    }
}
