//! Fee calculator: closing fees, late fees, prepayment penalties and APR

mod calculator;
mod penalties;
mod apr;
mod irr;

pub use calculator::{calculate_loan_fees, calculate_net_proceeds, CalculatedFees, FeeStructure, NamedFee};
pub use penalties::{
    calculate_late_fee, calculate_prepayment_penalty, LateFeeRequest, LateFeeType, PenaltyType,
    PrepaymentPenaltyRequest, DEFAULT_PENALTY_PERIOD_MONTHS,
};
pub use apr::{calculate_apr, calculate_irr_apr, AprRequest};
pub use irr::LoanCashflows;
