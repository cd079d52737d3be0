//! Run payoff quotes and scheduled cashflows for the whole loan portfolio
//!
//! Reads the portfolio CSV, quotes every loan as of AS_OF_DATE and writes
//! per-loan payoffs plus monthly aggregated scheduled cashflows.
//! Config via environment variables (see `lending_engine::config`).

use anyhow::{Context, Result};
use log::info;
use std::time::Instant;

use lending_engine::config::RunConfig;
use lending_engine::loan::load_loans;
use lending_engine::portfolio::{aggregate_by_month, LoanPayoff, MonthlyCashflow, PortfolioRunner};

fn main() -> Result<()> {
    env_logger::init();

    let start = Instant::now();
    let config = RunConfig::from_env().context("Invalid run configuration")?;

    println!("Loading loans from {}...", config.portfolio_path.display());
    let loans = load_loans(&config.portfolio_path)
        .with_context(|| format!("Failed to load {}", config.portfolio_path.display()))?;
    println!("Loaded {} loans in {:?}", loans.len(), start.elapsed());

    let runner = PortfolioRunner::new(config.as_of_date);

    let run_start = Instant::now();
    let payoffs = runner.run_payoffs(&loans);
    let schedules = runner.run_schedules(&loans);
    info!("Portfolio computed in {:?}", run_start.elapsed());

    write_payoffs(&config, &payoffs.completed)?;
    let monthly = aggregate_by_month(&schedules.completed);
    write_cashflows(&config, &monthly)?;

    let total_payoff: f64 = payoffs.completed.iter().map(|p| p.quote.total_payoff).sum();
    let total_accrued: f64 = payoffs.completed.iter().map(|p| p.quote.accrued_interest).sum();
    let total_penalties: f64 = payoffs.completed.iter().map(|p| p.quote.prepayment_penalty).sum();

    println!("\nPortfolio Summary (as of {}):", config.as_of_date);
    println!("  Loans quoted:       {}", payoffs.completed.len());
    println!("  Loans failed:       {}", payoffs.failures.len());
    println!("  Total payoff:       ${:.2}", total_payoff);
    println!("  Accrued interest:   ${:.2}", total_accrued);
    println!("  Prepayment penalty: ${:.2}", total_penalties);
    if let (Some(first), Some(last)) = (monthly.first(), monthly.last()) {
        println!(
            "  Cashflow months:    {} ({}-{:02} to {}-{:02})",
            monthly.len(),
            first.year,
            first.month,
            last.year,
            last.month
        );
    }

    for failure in &payoffs.failures {
        println!("  ! Loan {}: {}", failure.loan_id, failure.reason);
    }

    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}

fn write_payoffs(config: &RunConfig, payoffs: &[LoanPayoff]) -> Result<()> {
    let path = &config.payoff_output_path;
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    wtr.write_record([
        "LoanID",
        "Borrower",
        "PaymentsMade",
        "LastPaymentDate",
        "DaysSinceLastPayment",
        "RemainingBalance",
        "PerDiemInterest",
        "AccruedInterest",
        "PrepaymentPenalty",
        "TotalPayoff",
    ])?;

    for p in payoffs {
        wtr.write_record([
            p.loan_id.to_string(),
            p.borrower.clone(),
            p.payments_made.to_string(),
            p.last_payment_date.to_string(),
            p.quote.days_since_last_payment.to_string(),
            format!("{:.2}", p.quote.remaining_balance),
            format!("{:.6}", p.quote.per_diem_interest),
            format!("{:.2}", p.quote.accrued_interest),
            format!("{:.2}", p.quote.prepayment_penalty),
            format!("{:.2}", p.quote.total_payoff),
        ])?;
    }
    wtr.flush()?;

    println!("Payoffs written to {}", path.display());
    Ok(())
}

fn write_cashflows(config: &RunConfig, monthly: &[MonthlyCashflow]) -> Result<()> {
    let path = &config.cashflow_output_path;
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    wtr.write_record([
        "Month",
        "Loans",
        "Payments",
        "Principal",
        "Interest",
        "RemainingBalance",
    ])?;

    for m in monthly {
        wtr.write_record([
            format!("{}-{:02}", m.year, m.month),
            m.loan_count.to_string(),
            format!("{:.2}", m.total_payments),
            format!("{:.2}", m.total_principal),
            format!("{:.2}", m.total_interest),
            format!("{:.2}", m.total_remaining_balance),
        ])?;
    }
    wtr.flush()?;

    println!("Monthly cashflows written to {}", path.display());
    Ok(())
}
