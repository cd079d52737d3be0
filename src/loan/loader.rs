//! Load loans from a portfolio CSV export

use chrono::NaiveDate;
use csv::Reader;
use std::path::Path;

use super::{LoanTerms, PenaltyTerms};
use crate::amortization::LoanStructure;
use crate::error::{LoanError, LoanResult};
use crate::fees::{PenaltyType, DEFAULT_PENALTY_PERIOD_MONTHS};

/// Default location of the portfolio export
pub const DEFAULT_PORTFOLIO_PATH: &str = "data/portfolio.csv";

/// Raw CSV row matching the portfolio export columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "LoanID")]
    loan_id: u32,
    #[serde(rename = "Borrower")]
    borrower: String,
    #[serde(rename = "LoanAmount")]
    loan_amount: f64,
    #[serde(rename = "InterestRate")]
    interest_rate: f64,
    #[serde(rename = "TermMonths")]
    term_months: u32,
    #[serde(rename = "OriginationDate")]
    origination_date: String,
    #[serde(rename = "Structure")]
    structure: String,
    #[serde(rename = "BalloonMonths")]
    balloon_months: Option<u32>,
    #[serde(rename = "PenaltyType", default)]
    penalty_type: Option<String>,
    #[serde(rename = "PenaltyAmount", default)]
    penalty_amount: Option<f64>,
    #[serde(rename = "PenaltyPeriodMonths", default)]
    penalty_period_months: Option<u32>,
}

impl CsvRow {
    fn into_loan(self) -> LoanResult<LoanTerms> {
        let origination_date = NaiveDate::parse_from_str(self.origination_date.trim(), "%Y-%m-%d")
            .map_err(|e| {
                LoanError::invalid(
                    "origination_date",
                    format!("Loan {}: bad date '{}': {}", self.loan_id, self.origination_date, e),
                )
            })?;

        let structure: LoanStructure = self.structure.parse()?;

        let penalty_type: PenaltyType = self.penalty_type.as_deref().unwrap_or("").parse()?;
        let penalty = match penalty_type {
            PenaltyType::None => None,
            penalty_type => {
                let penalty_amount = self.penalty_amount.ok_or_else(|| {
                    LoanError::invalid(
                        "penalty_amount",
                        format!("Loan {}: {:?} penalty requires an amount", self.loan_id, penalty_type),
                    )
                })?;
                Some(PenaltyTerms {
                    penalty_type,
                    penalty_amount,
                    penalty_period_months: self
                        .penalty_period_months
                        .unwrap_or(DEFAULT_PENALTY_PERIOD_MONTHS),
                })
            }
        };

        Ok(LoanTerms {
            loan_id: self.loan_id,
            borrower: self.borrower,
            loan_amount: self.loan_amount,
            annual_interest_rate: self.interest_rate,
            term_months: self.term_months,
            origination_date,
            structure,
            balloon_months: self.balloon_months,
            penalty,
        })
    }
}

/// Load all loans from a CSV file
pub fn load_loans<P: AsRef<Path>>(path: P) -> LoanResult<Vec<LoanTerms>> {
    let mut reader = Reader::from_path(path)?;
    read_loans(&mut reader)
}

/// Load loans from any reader (e.g., string buffer, network stream)
pub fn load_loans_from_reader<R: std::io::Read>(reader: R) -> LoanResult<Vec<LoanTerms>> {
    let mut csv_reader = Reader::from_reader(reader);
    read_loans(&mut csv_reader)
}

fn read_loans<R: std::io::Read>(reader: &mut Reader<R>) -> LoanResult<Vec<LoanTerms>> {
    let mut loans = Vec::new();

    for result in reader.deserialize() {
        let row: CsvRow = result?;
        loans.push(row.into_loan()?);
    }

    Ok(loans)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "LoanID,Borrower,LoanAmount,InterestRate,TermMonths,OriginationDate,Structure,BalloonMonths,PenaltyType,PenaltyAmount,PenaltyPeriodMonths\n";

    #[test]
    fn test_load_from_reader() {
        let data = format!(
            "{}{}{}",
            HEADER,
            "1,Cedar Ridge Homes,850000,10.5,12,2024-02-01,interest-only,,percentage,1,6\n",
            "2,Lakeview Partners,400000,7.25,60,2023-11-30,balloon,360,,,\n",
        );

        let loans = load_loans_from_reader(data.as_bytes()).unwrap();
        assert_eq!(loans.len(), 2);

        let first = &loans[0];
        assert_eq!(first.loan_id, 1);
        assert_eq!(first.structure, LoanStructure::InterestOnly);
        assert_eq!(first.balloon_months, None);
        assert_eq!(
            first.penalty,
            Some(PenaltyTerms {
                penalty_type: PenaltyType::Percentage,
                penalty_amount: 1.0,
                penalty_period_months: 6,
            })
        );

        let second = &loans[1];
        assert_eq!(second.structure, LoanStructure::Balloon);
        assert_eq!(second.balloon_months, Some(360));
        assert_eq!(second.origination_date, NaiveDate::from_ymd_opt(2023, 11, 30).unwrap());
        assert!(second.penalty.is_none());
    }

    #[test]
    fn test_penalty_period_defaults() {
        let data = format!("{}{}", HEADER, "3,Summit Lofts,250000,9,24,2024-05-10,fully-amortizing,,fixed,2500,\n");
        let loans = load_loans_from_reader(data.as_bytes()).unwrap();
        let penalty = loans[0].penalty.unwrap();
        assert_eq!(penalty.penalty_type, PenaltyType::Fixed);
        assert_eq!(penalty.penalty_period_months, DEFAULT_PENALTY_PERIOD_MONTHS);
    }

    #[test]
    fn test_unknown_structure_rejected() {
        let data = format!("{}{}", HEADER, "4,Bad Row LLC,100000,8,12,2024-01-01,negative-am,,,,\n");
        let err = load_loans_from_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, LoanError::InvalidInput { ref field, .. } if field == "structure"));
    }

    #[test]
    fn test_penalty_without_amount_rejected() {
        let data = format!("{}{}", HEADER, "5,No Amount Inc,100000,8,12,2024-01-01,balloon,120,sliding-scale,,\n");
        let err = load_loans_from_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, LoanError::InvalidInput { ref field, .. } if field == "penalty_amount"));
    }

    #[test]
    fn test_load_sample_portfolio() {
        let loans = load_loans(DEFAULT_PORTFOLIO_PATH).expect("Failed to load sample portfolio");
        assert!(!loans.is_empty());
        assert!(loans.iter().all(|l| l.schedule().is_ok()));
    }
}
