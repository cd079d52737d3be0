//! Lending Engine CLI
//!
//! Command-line interface for schedules, payoff quotes and fee calculations

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use lending_engine::amortization::{write_schedule_csv, AmortizationSchedule};
use lending_engine::fees::{
    calculate_apr, calculate_irr_apr, calculate_late_fee, calculate_net_proceeds,
    calculate_prepayment_penalty, AprRequest, LateFeeRequest, LateFeeType, NamedFee, PenaltyType,
    PrepaymentPenaltyRequest, DEFAULT_PENALTY_PERIOD_MONTHS,
};
use lending_engine::{
    calculate_loan_fees, calculate_payoff_amount, generate_amortization_schedule, FeeStructure,
    LoanStructure, PayoffRequest,
};

#[derive(Parser)]
#[command(
    name = "lending_engine",
    version,
    about = "Amortization schedules, payoff quotes and loan fees"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an amortization schedule
    Schedule(ScheduleArgs),
    /// Quote the payoff amount for a loan
    Payoff(PayoffArgs),
    /// Calculate closing fees and net proceeds
    Fees(FeesArgs),
    /// Calculate the late fee on a missed payment
    LateFee(LateFeeArgs),
    /// Calculate a prepayment penalty
    Prepayment(PrepaymentArgs),
    /// Calculate the simplified and cashflow-based APR
    Apr(AprArgs),
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Args)]
struct LoanArgs {
    /// Loan amount in dollars
    #[arg(long)]
    amount: f64,
    /// Annual interest rate in percent (e.g. 7.25)
    #[arg(long)]
    rate: f64,
    /// Term in months
    #[arg(long)]
    term: u32,
    /// interest-only, fully-amortizing or balloon
    #[arg(long, default_value = "fully-amortizing")]
    structure: LoanStructure,
    /// Amortization period for balloon loans
    #[arg(long)]
    balloon_months: Option<u32>,
    /// Origination date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    origination: Option<NaiveDate>,
}

impl LoanArgs {
    fn schedule(&self) -> Result<AmortizationSchedule> {
        let origination = self.origination.unwrap_or_else(|| Local::now().date_naive());
        let schedule = generate_amortization_schedule(
            self.amount,
            self.rate,
            self.term,
            origination,
            self.structure,
            self.balloon_months,
        )?;
        Ok(schedule)
    }
}

#[derive(Args)]
struct ScheduleArgs {
    #[command(flatten)]
    loan: LoanArgs,
    #[arg(long, value_enum, default_value = "table")]
    format: OutputFormat,
    /// Write output to a file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct PayoffArgs {
    /// Outstanding principal
    #[arg(long)]
    balance: f64,
    /// Annual interest rate in percent
    #[arg(long)]
    rate: f64,
    /// Date of the last payment received (YYYY-MM-DD)
    #[arg(long)]
    last_payment: NaiveDate,
    /// Payoff date (YYYY-MM-DD)
    #[arg(long)]
    payoff_date: NaiveDate,
    #[arg(long, default_value_t = 0.0)]
    penalty: f64,
}

#[derive(Args)]
struct FeesArgs {
    /// Loan amount in dollars
    #[arg(long)]
    amount: f64,
    /// Origination points (percent of the loan); wins over --origination-fee
    #[arg(long)]
    points: Option<f64>,
    #[arg(long)]
    origination_fee: Option<f64>,
    #[arg(long)]
    processing_fee: Option<f64>,
    #[arg(long)]
    inspection_fee: Option<f64>,
    #[arg(long)]
    underwriting_fee: Option<f64>,
    #[arg(long)]
    document_preparation_fee: Option<f64>,
    #[arg(long)]
    wire_transfer_fee: Option<f64>,
    /// Additional fee as NAME=AMOUNT, repeatable
    #[arg(long = "other", value_parser = parse_named_fee)]
    other_fees: Vec<NamedFee>,
}

#[derive(Args)]
struct LateFeeArgs {
    /// Amount of the missed payment
    #[arg(long)]
    payment: f64,
    /// fixed or percentage
    #[arg(long = "type")]
    late_fee_type: LateFeeType,
    /// Dollars for fixed, percent for percentage
    #[arg(long)]
    amount: f64,
    #[arg(long)]
    max: Option<f64>,
}

#[derive(Args)]
struct PrepaymentArgs {
    /// Outstanding principal
    #[arg(long)]
    balance: f64,
    /// none, fixed, percentage or sliding-scale
    #[arg(long = "type")]
    penalty_type: PenaltyType,
    /// Dollars for fixed, percent otherwise
    #[arg(long)]
    amount: f64,
    #[arg(long, default_value_t = 0)]
    months_elapsed: u32,
    #[arg(long, default_value_t = DEFAULT_PENALTY_PERIOD_MONTHS)]
    period: u32,
}

#[derive(Args)]
struct AprArgs {
    #[command(flatten)]
    loan: LoanArgs,
    /// Total closing fees in dollars
    #[arg(long, default_value_t = 0.0)]
    fees: f64,
}

#[derive(Serialize)]
struct FeesOutput {
    fees: lending_engine::CalculatedFees,
    net_proceeds: f64,
}

#[derive(Serialize)]
struct AprOutput {
    simplified_apr: f64,
    cashflow_apr: Option<f64>,
    total_interest: f64,
    total_fees: f64,
}

fn parse_named_fee(raw: &str) -> Result<NamedFee, String> {
    let (name, amount) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=AMOUNT, got '{}'", raw))?;
    let amount: f64 = amount
        .trim()
        .parse()
        .map_err(|e| format!("bad amount in '{}': {}", raw, e))?;
    Ok(NamedFee {
        name: name.trim().to_string(),
        amount,
    })
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("error: {:#}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Schedule(args) => run_schedule(args),
        Commands::Payoff(args) => {
            let quote = calculate_payoff_amount(&PayoffRequest {
                remaining_balance: args.balance,
                annual_interest_rate: args.rate,
                last_payment_date: args.last_payment,
                payoff_date: args.payoff_date,
                prepayment_penalty: args.penalty,
            });
            print_json(&quote)
        }
        Commands::Fees(args) => {
            let structure = FeeStructure {
                origination_points: args.points,
                origination_fee: args.origination_fee,
                processing_fee: args.processing_fee,
                inspection_fee: args.inspection_fee,
                underwriting_fee: args.underwriting_fee,
                document_preparation_fee: args.document_preparation_fee,
                wire_transfer_fee: args.wire_transfer_fee,
                other_fees: args.other_fees,
            };
            let fees = calculate_loan_fees(args.amount, &structure);
            let net_proceeds = calculate_net_proceeds(args.amount, &fees);
            print_json(&FeesOutput { fees, net_proceeds })
        }
        Commands::LateFee(args) => {
            let fee = calculate_late_fee(&LateFeeRequest {
                payment_amount: args.payment,
                late_fee_type: args.late_fee_type,
                late_fee_amount: args.amount,
                max_late_fee: args.max,
            });
            println!("{:.2}", fee);
            Ok(())
        }
        Commands::Prepayment(args) => {
            let penalty = calculate_prepayment_penalty(&PrepaymentPenaltyRequest {
                remaining_balance: args.balance,
                penalty_type: args.penalty_type,
                penalty_amount: args.amount,
                months_elapsed: args.months_elapsed,
                penalty_period_months: args.period,
            });
            println!("{:.2}", penalty);
            Ok(())
        }
        Commands::Apr(args) => {
            let schedule = args.loan.schedule()?;
            let simplified_apr = calculate_apr(&AprRequest {
                loan_amount: args.loan.amount,
                total_fees: args.fees,
                total_interest: schedule.total_interest,
                term_months: args.loan.term,
            })?;
            let cashflow_apr =
                calculate_irr_apr(args.loan.amount, args.fees, &schedule.payment_amounts());
            print_json(&AprOutput {
                simplified_apr,
                cashflow_apr,
                total_interest: schedule.total_interest,
                total_fees: args.fees,
            })
        }
    }
}

fn run_schedule(args: ScheduleArgs) -> Result<()> {
    let schedule = args.loan.schedule()?;

    let mut writer: Box<dyn io::Write> = match &args.output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("Unable to create {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };

    match args.format {
        OutputFormat::Csv => write_schedule_csv(&schedule, &mut writer)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, &schedule)?;
            writeln!(writer)?;
        }
        OutputFormat::Table => write_table(&schedule, &mut writer)?,
    }

    if let Some(path) = &args.output {
        eprintln!("Schedule written to: {}", path.display());
    }
    Ok(())
}

fn write_table(schedule: &AmortizationSchedule, out: &mut dyn io::Write) -> io::Result<()> {
    writeln!(
        out,
        "{:>5} {:>12} {:>14} {:>14} {:>12} {:>16}",
        "Pmt", "Date", "Payment", "Principal", "Interest", "Balance"
    )?;
    writeln!(out, "{}", "-".repeat(78))?;

    for row in &schedule.schedule {
        writeln!(
            out,
            "{:>5} {:>12} {:>14.2} {:>14.2} {:>12.2} {:>16.2}",
            row.payment_number,
            row.payment_date,
            row.payment_amount,
            row.principal_amount,
            row.interest_amount,
            row.remaining_balance,
        )?;
    }

    let summary = schedule.summary();
    writeln!(out, "\nSummary:")?;
    writeln!(out, "  Payments:        {}", summary.payment_count)?;
    writeln!(out, "  Regular payment: ${:.2}", summary.regular_payment)?;
    writeln!(out, "  Final payment:   ${:.2}", summary.final_payment)?;
    writeln!(out, "  Total payments:  ${:.2}", summary.total_payments)?;
    writeln!(out, "  Total interest:  ${:.2}", summary.total_interest)?;
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
