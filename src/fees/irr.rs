//! Borrower-side internal rate of return
//!
//! The borrower receives the net proceeds at closing and repays them with
//! monthly payments. The present value of the payments falls as the rate
//! rises, so at most one monthly rate equates it with the proceeds.

const MIN_MONTHLY_RATE: f64 = -0.99;
const MAX_MONTHLY_RATE: f64 = 1.0;
const INITIAL_GUESS: f64 = 0.005;
const RATE_TOLERANCE: f64 = 1e-12;
const MAX_ITERATIONS: usize = 200;

/// Cashflows of a loan seen from the borrower
#[derive(Debug, Clone, Copy)]
pub struct LoanCashflows<'a> {
    /// Cash received at closing, net of fees
    pub net_proceeds: f64,
    /// Payment made at the end of each month, first month first
    pub payments: &'a [f64],
}

impl<'a> LoanCashflows<'a> {
    pub fn new(net_proceeds: f64, payments: &'a [f64]) -> Self {
        Self {
            net_proceeds,
            payments,
        }
    }

    /// Monthly rate at which the payments' present value equals the proceeds.
    ///
    /// `None` when the proceeds are not positive, any payment is negative or
    /// non-finite, nothing is repaid, or the rate falls outside
    /// [-99%, 100%] per month.
    pub fn monthly_irr(&self) -> Option<f64> {
        if !self.net_proceeds.is_finite() || self.net_proceeds <= 0.0 {
            return None;
        }
        if self.payments.iter().any(|p| !p.is_finite() || *p < 0.0) {
            return None;
        }
        if !self.payments.iter().any(|p| *p > 0.0) {
            return None;
        }

        let mut low = MIN_MONTHLY_RATE;
        let mut high = MAX_MONTHLY_RATE;
        if self.shortfall(low) < 0.0 || self.shortfall(high) > 0.0 {
            return None;
        }

        // Newton on the shortfall, kept inside a shrinking bracket
        let mut rate = INITIAL_GUESS;
        for _ in 0..MAX_ITERATIONS {
            let (present_value, slope) = self.present_value_and_slope(rate);
            let shortfall = present_value - self.net_proceeds;
            if shortfall == 0.0 {
                return Some(rate);
            }

            if shortfall > 0.0 {
                low = rate;
            } else {
                high = rate;
            }

            let newton = rate - shortfall / slope;
            let next = if newton.is_finite() && newton > low && newton < high {
                newton
            } else {
                0.5 * (low + high)
            };

            if (next - rate).abs() < RATE_TOLERANCE {
                return Some(next);
            }
            rate = next;
        }

        None
    }

    /// Nominal annual rate (monthly IRR x 12) as a decimal
    pub fn nominal_annual_irr(&self) -> Option<f64> {
        self.monthly_irr().map(|monthly| monthly * 12.0)
    }

    /// Present value of the payments less the proceeds
    fn shortfall(&self, rate: f64) -> f64 {
        self.present_value_and_slope(rate).0 - self.net_proceeds
    }

    /// Present value of the payments and its derivative in the monthly rate
    fn present_value_and_slope(&self, rate: f64) -> (f64, f64) {
        let step = 1.0 / (1.0 + rate);
        let mut discount = 1.0;
        let mut present_value = 0.0;
        let mut slope = 0.0;

        for (month, &payment) in (1u64..).zip(self.payments) {
            discount *= step;
            if payment == 0.0 {
                continue;
            }
            present_value += payment * discount;
            slope -= month as f64 * payment * discount * step;
        }

        (present_value, slope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_single_payment() {
        // 1000 received, 1010 repaid one month later
        let irr = LoanCashflows::new(1_000.0, &[1_010.0]).monthly_irr().unwrap();
        assert_abs_diff_eq!(irr, 0.01, epsilon = 1e-10);
    }

    #[test]
    fn test_level_annuity() {
        // 10000 borrowed, 12 payments of 888.49 is 1% per month
        let payments = vec![888.487886783417; 12];
        let cashflows = LoanCashflows::new(10_000.0, &payments);

        assert_abs_diff_eq!(cashflows.monthly_irr().unwrap(), 0.01, epsilon = 1e-9);
        assert_abs_diff_eq!(cashflows.nominal_annual_irr().unwrap(), 0.12, epsilon = 1e-8);
    }

    #[test]
    fn test_interest_only_with_balloon() {
        // 0.5% interest for 11 months, principal plus interest in month 12
        let mut payments = vec![500.0; 11];
        payments.push(100_500.0);

        let irr = LoanCashflows::new(100_000.0, &payments).monthly_irr().unwrap();
        assert_abs_diff_eq!(irr, 0.005, epsilon = 1e-10);
    }

    #[test]
    fn test_zero_and_negative_rates() {
        let flat = LoanCashflows::new(1_200.0, &[100.0; 12]).monthly_irr().unwrap();
        assert_abs_diff_eq!(flat, 0.0, epsilon = 1e-10);

        let loss = LoanCashflows::new(1_000.0, &[990.0]).monthly_irr().unwrap();
        assert_abs_diff_eq!(loss, -0.01, epsilon = 1e-10);
    }

    #[test]
    fn test_unsolvable_cashflows() {
        assert_eq!(LoanCashflows::new(1_000.0, &[]).monthly_irr(), None);
        assert_eq!(LoanCashflows::new(1_000.0, &[0.0, 0.0]).monthly_irr(), None);
        assert_eq!(LoanCashflows::new(0.0, &[100.0]).monthly_irr(), None);
        assert_eq!(LoanCashflows::new(1_000.0, &[600.0, -50.0, 600.0]).monthly_irr(), None);
        // 99,900% in one month is beyond the solver's range
        assert_eq!(LoanCashflows::new(1.0, &[1_000.0]).monthly_irr(), None);
    }
}
