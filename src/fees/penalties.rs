//! Late fees and prepayment penalties

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::LoanError;
use crate::money::round_cents;

/// Default length of the prepayment penalty window
pub const DEFAULT_PENALTY_PERIOD_MONTHS: u32 = 12;

fn default_penalty_period_months() -> u32 {
    DEFAULT_PENALTY_PERIOD_MONTHS
}

/// How a late fee is assessed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LateFeeType {
    /// Flat dollar amount
    Fixed,
    /// Percentage of the missed payment
    Percentage,
}

impl FromStr for LateFeeType {
    type Err = LoanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fixed" => Ok(LateFeeType::Fixed),
            "percentage" => Ok(LateFeeType::Percentage),
            other => Err(LoanError::invalid(
                "late_fee_type",
                format!("Unknown late fee type: {}", other),
            )),
        }
    }
}

/// Input for a late fee
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LateFeeRequest {
    pub payment_amount: f64,
    pub late_fee_type: LateFeeType,
    /// Dollars for `fixed`, percent for `percentage`
    pub late_fee_amount: f64,
    #[serde(default)]
    pub max_late_fee: Option<f64>,
}

/// Calculate the late fee on a missed payment, capped at `max_late_fee`
pub fn calculate_late_fee(request: &LateFeeRequest) -> f64 {
    let fee = match request.late_fee_type {
        LateFeeType::Fixed => request.late_fee_amount,
        LateFeeType::Percentage => request.payment_amount * request.late_fee_amount / 100.0,
    };

    let fee = match request.max_late_fee {
        Some(cap) if fee > cap => cap,
        _ => fee,
    };

    round_cents(fee)
}

/// How a prepayment penalty is assessed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PenaltyType {
    None,
    /// Flat dollar amount
    Fixed,
    /// Percentage of the remaining balance
    Percentage,
    /// Percentage of the remaining balance, declining linearly to zero
    /// over the penalty window
    SlidingScale,
}

impl FromStr for PenaltyType {
    type Err = LoanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(PenaltyType::None),
            "fixed" => Ok(PenaltyType::Fixed),
            "percentage" => Ok(PenaltyType::Percentage),
            "sliding-scale" => Ok(PenaltyType::SlidingScale),
            other => Err(LoanError::invalid(
                "penalty_type",
                format!("Unknown penalty type: {}", other),
            )),
        }
    }
}

/// Input for a prepayment penalty
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrepaymentPenaltyRequest {
    pub remaining_balance: f64,
    pub penalty_type: PenaltyType,
    /// Dollars for `fixed`, percent otherwise
    pub penalty_amount: f64,
    #[serde(default)]
    pub months_elapsed: u32,
    #[serde(default = "default_penalty_period_months")]
    pub penalty_period_months: u32,
}

/// Calculate the prepayment penalty. Zero once the penalty window has passed.
pub fn calculate_prepayment_penalty(request: &PrepaymentPenaltyRequest) -> f64 {
    if request.months_elapsed >= request.penalty_period_months {
        return 0.0;
    }

    match request.penalty_type {
        PenaltyType::None => 0.0,
        PenaltyType::Fixed => request.penalty_amount,
        PenaltyType::Percentage => request.remaining_balance * request.penalty_amount / 100.0,
        PenaltyType::SlidingScale => {
            let remaining_months = request.penalty_period_months - request.months_elapsed;
            request.remaining_balance * request.penalty_amount / 100.0
                * (remaining_months as f64 / request.penalty_period_months as f64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn late(payment: f64, kind: LateFeeType, amount: f64, cap: Option<f64>) -> f64 {
        calculate_late_fee(&LateFeeRequest {
            payment_amount: payment,
            late_fee_type: kind,
            late_fee_amount: amount,
            max_late_fee: cap,
        })
    }

    fn penalty(kind: PenaltyType, amount: f64, elapsed: u32, period: u32) -> f64 {
        calculate_prepayment_penalty(&PrepaymentPenaltyRequest {
            remaining_balance: 200_000.0,
            penalty_type: kind,
            penalty_amount: amount,
            months_elapsed: elapsed,
            penalty_period_months: period,
        })
    }

    #[test]
    fn test_percentage_late_fee_clamped() {
        assert_eq!(late(1000.0, LateFeeType::Percentage, 10.0, Some(50.0)), 50.0);
        assert_eq!(late(1000.0, LateFeeType::Percentage, 10.0, None), 100.0);
    }

    #[test]
    fn test_fixed_late_fee() {
        assert_eq!(late(1000.0, LateFeeType::Fixed, 75.0, None), 75.0);
        assert_eq!(late(1000.0, LateFeeType::Fixed, 75.0, Some(60.0)), 60.0);
        assert_eq!(late(1000.0, LateFeeType::Fixed, 75.0, Some(100.0)), 75.0);
    }

    #[test]
    fn test_late_fee_never_exceeds_cap() {
        for amount in [0.5, 5.0, 25.0, 100.0, 1_000.0] {
            for kind in [LateFeeType::Fixed, LateFeeType::Percentage] {
                assert!(late(8_606.64, kind, amount, Some(40.0)) <= 40.0);
            }
        }
    }

    #[test]
    fn test_late_fee_rounded() {
        assert_eq!(late(1234.567, LateFeeType::Percentage, 5.0, None), 61.73);
    }

    #[test]
    fn test_penalty_zero_after_window() {
        for kind in [
            PenaltyType::None,
            PenaltyType::Fixed,
            PenaltyType::Percentage,
            PenaltyType::SlidingScale,
        ] {
            assert_eq!(penalty(kind, 5.0, 12, 12), 0.0);
            assert_eq!(penalty(kind, 5.0, 30, 24), 0.0);
        }
    }

    #[test]
    fn test_penalty_within_window() {
        assert_eq!(penalty(PenaltyType::None, 5.0, 0, 12), 0.0);
        assert_eq!(penalty(PenaltyType::Fixed, 5_000.0, 3, 12), 5_000.0);
        assert_abs_diff_eq!(penalty(PenaltyType::Percentage, 2.0, 3, 12), 4_000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_sliding_scale_decays() {
        // 3% of 200k = 6000, scaled by remaining share of a 12 month window
        assert_abs_diff_eq!(penalty(PenaltyType::SlidingScale, 3.0, 0, 12), 6_000.0, epsilon = 1e-9);
        assert_abs_diff_eq!(penalty(PenaltyType::SlidingScale, 3.0, 6, 12), 3_000.0, epsilon = 1e-9);
        assert_abs_diff_eq!(penalty(PenaltyType::SlidingScale, 3.0, 9, 12), 1_500.0, epsilon = 1e-9);
        assert_abs_diff_eq!(penalty(PenaltyType::SlidingScale, 3.0, 11, 12), 500.0, epsilon = 1e-9);
    }

    #[test]
    fn test_penalty_request_defaults() {
        let request: PrepaymentPenaltyRequest = serde_json::from_str(
            r#"{"remaining_balance": 100000.0, "penalty_type": "sliding-scale", "penalty_amount": 2.0}"#,
        )
        .unwrap();
        assert_eq!(request.months_elapsed, 0);
        assert_eq!(request.penalty_period_months, 12);
        assert_abs_diff_eq!(calculate_prepayment_penalty(&request), 2_000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_penalty_type_parsing() {
        assert_eq!("".parse::<PenaltyType>().unwrap(), PenaltyType::None);
        assert_eq!("Sliding-Scale".parse::<PenaltyType>().unwrap(), PenaltyType::SlidingScale);
        assert!("yield-maintenance".parse::<PenaltyType>().is_err());
        assert_eq!("Percentage".parse::<LateFeeType>().unwrap(), LateFeeType::Percentage);
        assert!("daily".parse::<LateFeeType>().is_err());
    }
}
