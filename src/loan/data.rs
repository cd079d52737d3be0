//! Loan records as held in a portfolio

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::amortization::{generate_amortization_schedule, AmortizationSchedule, LoanStructure};
use crate::error::LoanResult;
use crate::fees::{calculate_prepayment_penalty, PenaltyType, PrepaymentPenaltyRequest};

/// Prepayment penalty terms written into a loan
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PenaltyTerms {
    pub penalty_type: PenaltyType,
    /// Dollars for `fixed`, percent otherwise
    pub penalty_amount: f64,
    pub penalty_period_months: u32,
}

impl PenaltyTerms {
    /// Penalty owed on `remaining_balance` after `months_elapsed` months
    pub fn penalty_for(&self, remaining_balance: f64, months_elapsed: u32) -> f64 {
        calculate_prepayment_penalty(&PrepaymentPenaltyRequest {
            remaining_balance,
            penalty_type: self.penalty_type,
            penalty_amount: self.penalty_amount,
            months_elapsed,
            penalty_period_months: self.penalty_period_months,
        })
    }
}

/// A single loan from the portfolio
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanTerms {
    pub loan_id: u32,

    pub borrower: String,

    /// Original principal
    pub loan_amount: f64,

    /// Annual percentage (e.g. `9.5` for 9.5%)
    pub annual_interest_rate: f64,

    pub term_months: u32,

    pub origination_date: NaiveDate,

    pub structure: LoanStructure,

    /// Amortization period for balloon loans
    pub balloon_months: Option<u32>,

    pub penalty: Option<PenaltyTerms>,
}

impl LoanTerms {
    /// Generate the payment schedule for this loan
    pub fn schedule(&self) -> LoanResult<AmortizationSchedule> {
        generate_amortization_schedule(
            self.loan_amount,
            self.annual_interest_rate,
            self.term_months,
            self.origination_date,
            self.structure,
            self.balloon_months,
        )
    }

    /// Prepayment penalty owed on `remaining_balance`, zero without penalty terms
    pub fn prepayment_penalty(&self, remaining_balance: f64, months_elapsed: u32) -> f64 {
        self.penalty
            .map(|p| p.penalty_for(remaining_balance, months_elapsed))
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draw_loan() -> LoanTerms {
        LoanTerms {
            loan_id: 7,
            borrower: "Harbor Point Builders".into(),
            loan_amount: 1_200_000.0,
            annual_interest_rate: 11.0,
            term_months: 18,
            origination_date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            structure: LoanStructure::InterestOnly,
            balloon_months: None,
            penalty: Some(PenaltyTerms {
                penalty_type: PenaltyType::Percentage,
                penalty_amount: 1.0,
                penalty_period_months: 6,
            }),
        }
    }

    #[test]
    fn test_schedule_from_terms() {
        let schedule = draw_loan().schedule().unwrap();
        assert_eq!(schedule.len(), 18);
        assert_eq!(schedule.schedule[0].principal_amount, 0.0);
        assert_eq!(
            schedule.schedule[0].payment_date,
            NaiveDate::from_ymd_opt(2024, 4, 15).unwrap()
        );
    }

    #[test]
    fn test_penalty_window() {
        let loan = draw_loan();
        assert!((loan.prepayment_penalty(1_200_000.0, 2) - 12_000.0).abs() < 1e-9);
        assert_eq!(loan.prepayment_penalty(1_200_000.0, 6), 0.0);

        let no_penalty = LoanTerms { penalty: None, ..loan };
        assert_eq!(no_penalty.prepayment_penalty(1_200_000.0, 0), 0.0);
    }
}
