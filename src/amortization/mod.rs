//! Amortization engine: payment schedules, payoff quotes and exports

mod state;
mod engine;
mod schedule;
mod payoff;
pub mod export;

pub use state::AmortizationState;
pub use engine::{
    add_months, generate_amortization_schedule, level_payment, AmortizationEngine, LoanStructure,
    ScheduleConfig,
};
pub use schedule::{AmortizationSchedule, PaymentScheduleEntry, ScheduleSummary};
pub use payoff::{
    calculate_interest_only_payment, calculate_payoff_amount, calculate_per_diem_interest,
    PayoffQuote, PayoffRequest, DAYS_PER_YEAR,
};
pub use export::{schedule_to_csv_string, write_schedule_csv, SCHEDULE_CSV_HEADERS};
