//! Cell-level operations on a depot entry's ledger.
//!
//! Every mutation validates completely before touching the ledger, so a
//! rejected call leaves the entry exactly as it was.

use std::collections::BTreeMap;
use std::str::FromStr;

use rust_decimal::Decimal;

use super::depot_errors::DepotError;
use super::depot_model::{DepotEntry, EntryId, EntryTable, EntryTableRow, EntryTableYear, InvestmentVariant};
use super::ledger_model::{LedgerField, MonthlyObservation, YearTable};
use super::savings_plan::{insert_section, planned_transactions, SavingsPlanSection};
use crate::constants::{DISPLAY_DECIMAL_PRECISION, MAX_LEDGER_YEAR, MIN_LEDGER_YEAR};
use crate::utils::time_utils::YearMonth;

/// Parses raw cell input for `field`.
///
/// - Accepts `.` and `,` as decimal separator
/// - Ignores surrounding whitespace and a trailing `€`
/// - Empty input clears the cell (zero)
/// - Price and amount must not be negative
pub fn parse_cell_value(field: LedgerField, raw: &str) -> Result<Decimal, DepotError> {
    let cleaned = raw.trim().trim_end_matches('€').trim().replace(',', ".");
    if cleaned.is_empty() {
        return Ok(Decimal::ZERO);
    }

    let value = Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .map_err(|_| {
            DepotError::invalid_value(field.as_str(), format!("'{}' is not a number", raw))
        })?;

    if field.is_non_negative() && value.is_sign_negative() && !value.is_zero() {
        return Err(DepotError::invalid_value(
            field.as_str(),
            format!("{} must not be negative", value),
        ));
    }
    Ok(value)
}

/// Rejects years a ledger table cannot hold.
pub fn validate_ledger_year(field: &str, year: i32) -> Result<(), DepotError> {
    if !(MIN_LEDGER_YEAR..=MAX_LEDGER_YEAR).contains(&year) {
        return Err(DepotError::invalid_value(
            field,
            format!(
                "{} is outside {}..={}",
                year, MIN_LEDGER_YEAR, MAX_LEDGER_YEAR
            ),
        ));
    }
    Ok(())
}

impl DepotEntry {
    /// A fresh entry whose ledger holds one empty year.
    pub fn new(name: String, variant: InvestmentVariant, sequence: i64, year: i32) -> Self {
        let mut years = BTreeMap::new();
        years.insert(year, YearTable::empty(year));
        Self {
            id: EntryId::derive(&name, sequence),
            name,
            variant,
            created_year: year,
            sequence,
            savings_plan: Vec::new(),
            years,
        }
    }

    pub fn first_year(&self) -> Option<i32> {
        self.years.keys().next().copied()
    }

    pub fn last_year(&self) -> Option<i32> {
        self.years.keys().next_back().copied()
    }

    /// First and last month covered by the ledger.
    pub fn span(&self) -> Option<(YearMonth, YearMonth)> {
        Some((
            YearMonth::january(self.first_year()?),
            YearMonth::december(self.last_year()?),
        ))
    }

    pub fn observation(&self, year: i32, month: u32) -> Option<&MonthlyObservation> {
        self.years.get(&year).and_then(|y| y.month(month))
    }

    pub fn get_cell(&self, field: LedgerField, year: i32, month: u32) -> Result<Decimal, DepotError> {
        self.observation(year, month)
            .map(|o| o.get(field))
            .ok_or_else(|| DepotError::CellNotFound {
                entry_id: self.id.to_string(),
                field: field.to_string(),
                year,
                month,
            })
    }

    /// Writes one parsed value. The cell must lie inside the recorded years.
    pub fn set_cell(
        &mut self,
        field: LedgerField,
        year: i32,
        month: u32,
        value: Decimal,
    ) -> Result<&MonthlyObservation, DepotError> {
        self.ensure_in_range(year, month)?;
        if field.is_non_negative() && value.is_sign_negative() && !value.is_zero() {
            return Err(DepotError::invalid_value(
                field.as_str(),
                format!("{} must not be negative", value),
            ));
        }

        let entry_id = self.id.to_string();
        let observation = self
            .years
            .get_mut(&year)
            .and_then(|y| y.month_mut(month))
            .ok_or(DepotError::OutOfRange {
                entry_id,
                year,
                month,
            })?;
        observation.set(field, value);
        Ok(observation)
    }

    /// Range check first: an out-of-range cell fails the same way for any input.
    pub fn ensure_in_range(&self, year: i32, month: u32) -> Result<(), DepotError> {
        if self.observation(year, month).is_none() {
            return Err(DepotError::OutOfRange {
                entry_id: self.id.to_string(),
                year,
                month,
            });
        }
        Ok(())
    }

    /// Prepends an empty year before the earliest one and returns it.
    pub fn add_previous_year(&mut self) -> Result<&YearTable, DepotError> {
        let year = match self.first_year() {
            Some(first) => first.checked_sub(1).ok_or_else(|| {
                DepotError::invalid_value("year", format!("no year precedes {}", first))
            })?,
            None => self.created_year,
        };
        validate_ledger_year("year", year)?;
        Ok(self.years.entry(year).or_insert_with(|| YearTable::empty(year)))
    }

    pub fn add_savings_plan_section(
        &mut self,
        section: SavingsPlanSection,
    ) -> Result<SavingsPlanSection, DepotError> {
        insert_section(&mut self.savings_plan, section)
    }

    pub fn planned_transactions(&self, month: YearMonth) -> Decimal {
        planned_transactions(&self.savings_plan, month)
    }

    /// Additional plus planned transactions of `month`.
    pub fn net_transactions(&self, month: YearMonth) -> Decimal {
        let additional = self
            .observation(month.year(), month.month())
            .map(|o| o.additional_transactions)
            .unwrap_or(Decimal::ZERO);
        additional + self.planned_transactions(month)
    }

    pub fn to_table(&self) -> EntryTable {
        let years = self
            .years
            .values()
            .map(|table| EntryTableYear {
                year: table.year,
                rows: table
                    .months
                    .iter()
                    .map(|o| {
                        let planned = YearMonth::new(table.year, o.month)
                            .map(|m| self.planned_transactions(m))
                            .unwrap_or(Decimal::ZERO);
                        EntryTableRow {
                            month: o.month,
                            price_per_unit: o.price_per_unit,
                            amount: o.amount,
                            shares_value: o.shares_value().round_dp(DISPLAY_DECIMAL_PRECISION),
                            additional_transactions: o.additional_transactions,
                            planned_transactions: planned,
                            combined_transactions: o.additional_transactions + planned,
                        }
                    })
                    .collect(),
            })
            .collect();

        EntryTable {
            entry_id: self.id.clone(),
            name: self.name.clone(),
            variant: self.variant,
            years,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::depot::savings_plan::SavingsPlanInterval;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn entry_2023() -> DepotEntry {
        DepotEntry::new("MSCI World".to_string(), InvestmentVariant::Etf, 0, 2023)
    }

    #[test]
    fn test_parse_cell_value_accepts_comma_and_euro() {
        assert_eq!(parse_cell_value(LedgerField::PricePerUnit, "12,5").unwrap(), dec!(12.5));
        assert_eq!(parse_cell_value(LedgerField::PricePerUnit, " 7.25 € ").unwrap(), dec!(7.25));
        assert_eq!(parse_cell_value(LedgerField::Amount, "").unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_parse_cell_value_rejects_garbage_and_negative() {
        assert!(matches!(
            parse_cell_value(LedgerField::Amount, "12a"),
            Err(DepotError::InvalidValue { .. })
        ));
        assert!(matches!(
            parse_cell_value(LedgerField::PricePerUnit, "-1"),
            Err(DepotError::InvalidValue { .. })
        ));
        assert_eq!(
            parse_cell_value(LedgerField::AdditionalTransactions, "-250,50").unwrap(),
            dec!(-250.50)
        );
    }

    #[test]
    fn test_new_entry_has_one_empty_year() {
        let entry = entry_2023();
        assert_eq!(entry.first_year(), Some(2023));
        assert_eq!(entry.last_year(), Some(2023));
        assert_eq!(entry.get_cell(LedgerField::Amount, 2023, 1).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_set_cell_outside_span_is_out_of_range() {
        let mut entry = entry_2023();
        let before = entry.clone();
        for (year, month) in [(2022, 6), (2024, 1), (2023, 0), (2023, 13)] {
            let err = entry
                .set_cell(LedgerField::PricePerUnit, year, month, dec!(1))
                .unwrap_err();
            assert!(matches!(err, DepotError::OutOfRange { .. }), "{year}-{month}");
            // Negative input does not change the outcome
            let err = entry
                .set_cell(LedgerField::PricePerUnit, year, month, dec!(-1))
                .unwrap_err();
            assert!(matches!(err, DepotError::OutOfRange { .. }));
        }
        assert_eq!(entry, before);
    }

    #[test]
    fn test_rejected_value_leaves_cell_untouched() {
        let mut entry = entry_2023();
        entry.set_cell(LedgerField::Amount, 2023, 6, dec!(5)).unwrap();
        assert!(entry.set_cell(LedgerField::Amount, 2023, 6, dec!(-3)).is_err());
        assert_eq!(entry.get_cell(LedgerField::Amount, 2023, 6).unwrap(), dec!(5));
    }

    #[test]
    fn test_get_cell_outside_span_is_cell_not_found() {
        let entry = entry_2023();
        assert!(matches!(
            entry.get_cell(LedgerField::Amount, 2021, 3),
            Err(DepotError::CellNotFound { .. })
        ));
    }

    #[test]
    fn test_add_previous_year_prepends_without_overlap() {
        let mut entry = entry_2023();
        for expected in [2022, 2021, 2020] {
            let year = entry.add_previous_year().unwrap().year;
            assert_eq!(year, expected);
        }
        let years: Vec<i32> = entry.years.keys().copied().collect();
        assert_eq!(years, vec![2020, 2021, 2022, 2023]);
        for year in 2020..=2022 {
            for month in 1..=12 {
                assert_eq!(
                    entry.get_cell(LedgerField::PricePerUnit, year, month).unwrap(),
                    Decimal::ZERO
                );
            }
        }
    }

    #[test]
    fn test_add_previous_year_stops_at_the_earliest_year() {
        let mut entry = DepotEntry::new("Old".to_string(), InvestmentVariant::Bond, 0, 1);
        let before = entry.clone();
        assert!(matches!(
            entry.add_previous_year(),
            Err(DepotError::InvalidValue { .. })
        ));
        assert_eq!(entry, before);

        let mut entry = DepotEntry::new("Min".to_string(), InvestmentVariant::Bond, 0, i32::MIN);
        assert!(matches!(
            entry.add_previous_year(),
            Err(DepotError::InvalidValue { .. })
        ));
        assert_eq!(entry.years.len(), 1);
    }

    #[test]
    fn test_validate_ledger_year_bounds() {
        assert!(validate_ledger_year("startYear", 1).is_ok());
        assert!(validate_ledger_year("startYear", 9999).is_ok());
        for year in [0, -5, 10_000, i32::MIN, i32::MAX] {
            assert!(matches!(
                validate_ledger_year("startYear", year),
                Err(DepotError::InvalidValue { .. })
            ));
        }
    }

    #[test]
    fn test_table_combines_planned_and_additional() {
        let mut entry = entry_2023();
        entry.set_cell(LedgerField::PricePerUnit, 2023, 2, dec!(10.556)).unwrap();
        entry.set_cell(LedgerField::Amount, 2023, 2, dec!(3)).unwrap();
        entry
            .set_cell(LedgerField::AdditionalTransactions, 2023, 2, dec!(-20))
            .unwrap();
        entry
            .add_savings_plan_section(SavingsPlanSection {
                start: YearMonth::new(2023, 1).unwrap(),
                end: YearMonth::new(2023, 12).unwrap(),
                amount: dec!(100),
                interval: SavingsPlanInterval::Monthly,
            })
            .unwrap();

        let table = entry.to_table();
        assert_eq!(table.years.len(), 1);
        let row = &table.years[0].rows[1];
        assert_eq!(row.month, 2);
        assert_eq!(row.shares_value, dec!(31.67));
        assert_eq!(row.planned_transactions, dec!(100));
        assert_eq!(row.combined_transactions, dec!(80));
    }

    #[test]
    fn test_entry_id_depends_on_name_and_sequence() {
        let a = EntryId::derive("A", 0);
        assert_eq!(a, EntryId::derive("A", 0));
        assert_ne!(a, EntryId::derive("A", 1));
        assert_ne!(a, EntryId::derive("B", 0));
        assert_eq!(a.as_str().len(), 16);
    }

    fn field_strategy() -> impl Strategy<Value = LedgerField> {
        prop_oneof![
            Just(LedgerField::PricePerUnit),
            Just(LedgerField::Amount),
            Just(LedgerField::AdditionalTransactions),
        ]
    }

    proptest! {
        #[test]
        fn prop_set_then_get_round_trips(
            field in field_strategy(),
            month in 1u32..=12,
            mantissa in 0i64..1_000_000_000,
            scale in 0u32..6,
            negative in any::<bool>(),
        ) {
            let mut entry = entry_2023();
            let mut value = Decimal::new(mantissa, scale);
            if negative && !field.is_non_negative() {
                value = -value;
            }
            entry.set_cell(field, 2023, month, value).unwrap();
            prop_assert_eq!(entry.get_cell(field, 2023, month).unwrap(), value);
        }

        #[test]
        fn prop_parsed_input_round_trips(
            field in field_strategy(),
            mantissa in 0i64..1_000_000_000,
            scale in 0u32..6,
        ) {
            let value = Decimal::new(mantissa, scale);
            let raw = value.to_string().replace('.', ",");
            prop_assert_eq!(parse_cell_value(field, &raw).unwrap(), value);
        }
    }
}
