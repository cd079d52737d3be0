//! Closing fee calculation and net proceeds

use serde::{Deserialize, Serialize};

use crate::money::round_cents;

/// An ancillary fee charged at closing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedFee {
    pub name: String,
    pub amount: f64,
}

/// Fee schedule for a loan. Missing fees contribute nothing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FeeStructure {
    /// Points as a percentage of the loan amount; wins over `origination_fee`
    pub origination_points: Option<f64>,
    /// Fixed origination fee in dollars
    pub origination_fee: Option<f64>,
    pub processing_fee: Option<f64>,
    pub inspection_fee: Option<f64>,
    pub underwriting_fee: Option<f64>,
    pub document_preparation_fee: Option<f64>,
    pub wire_transfer_fee: Option<f64>,
    pub other_fees: Vec<NamedFee>,
}

/// Resolved fee amounts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalculatedFees {
    pub origination_fee: f64,
    pub processing_fee: f64,
    pub inspection_fee: f64,
    pub underwriting_fee: f64,
    pub document_preparation_fee: f64,
    pub wire_transfer_fee: f64,
    /// Sum of the named ancillary fees
    pub other_fees: f64,
    pub total_fees: f64,
}

/// Calculate closing fees for a loan
pub fn calculate_loan_fees(loan_amount: f64, fee_structure: &FeeStructure) -> CalculatedFees {
    let origination_fee = match (fee_structure.origination_points, fee_structure.origination_fee) {
        (Some(points), _) => loan_amount * points / 100.0,
        (None, Some(fixed)) => fixed,
        (None, None) => 0.0,
    };
    let origination_fee = round_cents(origination_fee);

    let processing_fee = fee_structure.processing_fee.unwrap_or(0.0);
    let inspection_fee = fee_structure.inspection_fee.unwrap_or(0.0);
    let underwriting_fee = fee_structure.underwriting_fee.unwrap_or(0.0);
    let document_preparation_fee = fee_structure.document_preparation_fee.unwrap_or(0.0);
    let wire_transfer_fee = fee_structure.wire_transfer_fee.unwrap_or(0.0);
    let other_fees: f64 = fee_structure.other_fees.iter().map(|f| f.amount).sum();

    let total_fees = round_cents(
        origination_fee
            + processing_fee
            + inspection_fee
            + underwriting_fee
            + document_preparation_fee
            + wire_transfer_fee
            + other_fees,
    );

    CalculatedFees {
        origination_fee,
        processing_fee,
        inspection_fee,
        underwriting_fee,
        document_preparation_fee,
        wire_transfer_fee,
        other_fees,
        total_fees,
    }
}

/// Amount the borrower receives once fees are deducted at closing
pub fn calculate_net_proceeds(loan_amount: f64, fees: &CalculatedFees) -> f64 {
    round_cents(loan_amount - fees.total_fees)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_structure_is_all_zero() {
        let fees = calculate_loan_fees(750_000.0, &FeeStructure::default());
        assert_eq!(fees, CalculatedFees::default());
        assert_eq!(fees.total_fees, 0.0);
    }

    #[test]
    fn test_origination_points() {
        let fees = calculate_loan_fees(
            200_000.0,
            &FeeStructure {
                origination_points: Some(2.0),
                ..Default::default()
            },
        );
        assert_eq!(fees.origination_fee, 4000.0);
        assert_eq!(fees.total_fees, 4000.0);
    }

    #[test]
    fn test_points_take_precedence_over_fixed() {
        let fees = calculate_loan_fees(
            300_000.0,
            &FeeStructure {
                origination_points: Some(1.5),
                origination_fee: Some(999.0),
                ..Default::default()
            },
        );
        assert_eq!(fees.origination_fee, 4500.0);

        let fixed_only = calculate_loan_fees(
            300_000.0,
            &FeeStructure {
                origination_fee: Some(999.0),
                ..Default::default()
            },
        );
        assert_eq!(fixed_only.origination_fee, 999.0);
    }

    #[test]
    fn test_origination_rounded_to_cents() {
        let fees = calculate_loan_fees(
            123_456.78,
            &FeeStructure {
                origination_points: Some(1.0),
                ..Default::default()
            },
        );
        assert_eq!(fees.origination_fee, 1234.57);
    }

    #[test]
    fn test_full_fee_structure() {
        let structure = FeeStructure {
            origination_points: Some(1.0),
            origination_fee: None,
            processing_fee: Some(495.0),
            inspection_fee: Some(350.0),
            underwriting_fee: Some(1_200.0),
            document_preparation_fee: Some(250.0),
            wire_transfer_fee: Some(35.0),
            other_fees: vec![
                NamedFee { name: "Title search".into(), amount: 425.0 },
                NamedFee { name: "Flood certification".into(), amount: 15.5 },
            ],
        };

        let fees = calculate_loan_fees(500_000.0, &structure);
        assert_eq!(fees.origination_fee, 5000.0);
        assert_eq!(fees.other_fees, 440.5);
        assert_eq!(fees.total_fees, 7770.5);
        assert_eq!(calculate_net_proceeds(500_000.0, &fees), 492_229.5);
    }

    #[test]
    fn test_structure_from_partial_json() {
        let structure: FeeStructure =
            serde_json::from_str(r#"{"origination_points": 2.0, "wire_transfer_fee": 30.0}"#).unwrap();
        assert!(structure.other_fees.is_empty());
        assert_eq!(structure.processing_fee, None);

        let fees = calculate_loan_fees(100_000.0, &structure);
        assert_eq!(fees.total_fees, 2030.0);
    }
}
