//! Lending Engine - amortization and fee calculations for construction loans
//!
//! This library provides:
//! - Payment schedules for fully amortizing, interest-only and balloon loans
//! - Payoff quotes with per-diem interest accrual
//! - Closing fees, late fees, prepayment penalties, net proceeds and APR
//! - Portfolio batch runs over loans loaded from CSV

pub mod error;
pub mod money;
pub mod amortization;
pub mod fees;
pub mod loan;
pub mod portfolio;
pub mod config;

// Re-export commonly used types
pub use error::{LoanError, LoanResult};
pub use amortization::{
    generate_amortization_schedule, calculate_payoff_amount, AmortizationSchedule, LoanStructure,
    PaymentScheduleEntry, PayoffQuote, PayoffRequest,
};
pub use fees::{calculate_loan_fees, CalculatedFees, FeeStructure};
pub use loan::LoanTerms;
pub use portfolio::PortfolioRunner;
