//! Running balance tracking while a schedule is generated

/// State of a loan at a point in the amortization run
#[derive(Debug, Clone)]
pub struct AmortizationState {
    /// Current payment number (1-indexed once advanced)
    pub payment_number: u32,

    /// Outstanding principal. Not clamped, so drift stays visible to the
    /// recurrence; rows report `reported_balance()`.
    pub balance: f64,

    pub cumulative_principal: f64,
    pub cumulative_interest: f64,
}

impl AmortizationState {
    /// Initialize state at origination
    pub fn new(loan_amount: f64) -> Self {
        Self {
            payment_number: 0,
            balance: loan_amount,
            cumulative_principal: 0.0,
            cumulative_interest: 0.0,
        }
    }

    /// Advance to next month
    pub fn advance_month(&mut self) {
        self.payment_number += 1;
    }

    /// Apply one payment's principal and interest split
    pub fn apply_payment(&mut self, principal: f64, interest: f64) {
        self.balance -= principal;
        self.cumulative_principal += principal;
        self.cumulative_interest += interest;
    }

    /// Interest accrued on the outstanding balance for one period
    pub fn period_interest(&self, monthly_rate: f64) -> f64 {
        self.balance * monthly_rate
    }

    /// Balance as shown on a schedule row
    pub fn reported_balance(&self) -> f64 {
        self.balance.max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_payment_accumulates() {
        let mut state = AmortizationState::new(1000.0);
        state.advance_month();
        state.apply_payment(100.0, 10.0);
        state.advance_month();
        state.apply_payment(101.0, 9.0);

        assert_eq!(state.payment_number, 2);
        assert_eq!(state.balance, 799.0);
        assert_eq!(state.cumulative_principal, 201.0);
        assert_eq!(state.cumulative_interest, 19.0);
    }

    #[test]
    fn test_reported_balance_floors_at_zero() {
        let mut state = AmortizationState::new(100.0);
        state.apply_payment(100.000001, 0.0);
        assert!(state.balance < 0.0);
        assert_eq!(state.reported_balance(), 0.0);
    }
}
