//! Currency rounding helpers

/// Round a currency amount to cents.
///
/// Ties go to the even cent. Only applied to final outputs; schedule rows
/// carry full precision.
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round_ties_even() / 100.0
}

/// Convert an annual percentage (e.g. `7.25`) to a monthly decimal rate
pub fn monthly_rate(annual_interest_rate: f64) -> f64 {
    annual_interest_rate / 100.0 / 12.0
}
