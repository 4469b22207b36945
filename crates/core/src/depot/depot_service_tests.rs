#[cfg(test)]
mod tests {
    use crate::depot::{
        CellUpdate, DepotEntry, DepotError, DepotRepositoryTrait, DepotService, DepotServiceTrait,
        InvestmentVariant, LedgerField, MonthlyObservation, NewDepotEntry, SavingsPlanInterval,
        SavingsPlanSection, YearTable,
    };
    use crate::errors::{DatabaseError, Error, Result};
    use crate::utils::time_utils::YearMonth;
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    // --- Mock DepotRepository ---
    #[derive(Default)]
    struct MockDepotRepository {
        stored: Mutex<Vec<DepotEntry>>,
        next_sequence: Mutex<i64>,
        writes: Mutex<Vec<String>>,
        fail_writes: AtomicBool,
    }

    impl MockDepotRepository {
        fn with_entries(entries: Vec<DepotEntry>) -> Self {
            Self {
                stored: Mutex::new(entries),
                ..Default::default()
            }
        }

        fn record(&self, call: &str) -> Result<()> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(DatabaseError::QueryFailed("disk full".to_string()).into());
            }
            self.writes.lock().unwrap().push(call.to_string());
            Ok(())
        }

        fn writes(&self) -> Vec<String> {
            self.writes.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl DepotRepositoryTrait for MockDepotRepository {
        fn load_entries(&self) -> Result<Vec<DepotEntry>> {
            Ok(self.stored.lock().unwrap().clone())
        }

        fn load_next_sequence(&self) -> Result<i64> {
            Ok(*self.next_sequence.lock().unwrap())
        }

        async fn insert_entry(&self, entry: DepotEntry) -> Result<()> {
            self.record(&format!("insert_entry {}", entry.name))?;
            *self.next_sequence.lock().unwrap() = entry.sequence + 1;
            Ok(())
        }

        async fn delete_entry(&self, entry_id: String) -> Result<usize> {
            self.record(&format!("delete_entry {}", entry_id))?;
            Ok(1)
        }

        async fn upsert_observation(
            &self,
            entry_id: String,
            year: i32,
            observation: MonthlyObservation,
        ) -> Result<()> {
            self.record(&format!(
                "upsert_observation {} {}-{}",
                entry_id, year, observation.month
            ))
        }

        async fn insert_year(&self, entry_id: String, year_table: YearTable) -> Result<()> {
            self.record(&format!("insert_year {} {}", entry_id, year_table.year))
        }

        async fn insert_savings_plan_section(
            &self,
            entry_id: String,
            section: SavingsPlanSection,
        ) -> Result<()> {
            self.record(&format!("insert_savings_plan_section {} {}", entry_id, section.start))
        }
    }

    fn service() -> (Arc<MockDepotRepository>, DepotService) {
        let repository = Arc::new(MockDepotRepository::default());
        let service = DepotService::new(repository.clone()).unwrap();
        (repository, service)
    }

    fn new_entry(name: &str, year: i32) -> NewDepotEntry {
        NewDepotEntry {
            name: name.to_string(),
            variant: InvestmentVariant::Etf,
            start_year: Some(year),
        }
    }

    fn cell(field: LedgerField, year: i32, month: u32, value: &str) -> CellUpdate {
        CellUpdate {
            field,
            year,
            month,
            value: value.to_string(),
        }
    }

    fn depot_error(err: Error) -> DepotError {
        match err {
            Error::Depot(e) => e,
            other => panic!("expected a depot error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_add_entry_seeds_one_empty_year() {
        let (repository, service) = service();

        let entry = service.add_entry(new_entry("World ETF", 2023)).await.unwrap();

        assert_eq!(entry.years.keys().copied().collect::<Vec<_>>(), vec![2023]);
        assert!(entry.years[&2023].months.iter().all(|m| !m.is_recorded()));
        assert_eq!(repository.writes(), vec!["insert_entry World ETF".to_string()]);
    }

    #[tokio::test]
    async fn test_list_entries_keeps_insertion_order() {
        let (_, service) = service();
        let b = service.add_entry(new_entry("B", 2023)).await.unwrap();
        let a = service.add_entry(new_entry("A", 2023)).await.unwrap();

        let ids: Vec<_> = service
            .list_entries()
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec![b.id, a.id]);
    }

    #[tokio::test]
    async fn test_duplicate_and_empty_names_are_rejected() {
        let (_, service) = service();
        service.add_entry(new_entry("A", 2023)).await.unwrap();

        let err = service.add_entry(new_entry("  A ", 2023)).await.unwrap_err();
        assert!(matches!(depot_error(err), DepotError::DuplicateName(_)));

        let err = service.add_entry(new_entry("   ", 2023)).await.unwrap_err();
        assert!(matches!(depot_error(err), DepotError::InvalidValue { .. }));

        assert_eq!(service.list_entries().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_ids_stay_unique_after_delete() {
        let (_, service) = service();
        let first = service.add_entry(new_entry("A", 2023)).await.unwrap();
        service.delete_entry(first.id.as_str()).await.unwrap();

        let second = service.add_entry(new_entry("A", 2023)).await.unwrap();
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_ledger_scenario() {
        let (_, service) = service();
        let entry = service.add_entry(new_entry("A", 2023)).await.unwrap();
        let id = entry.id.as_str();

        service
            .set_cell(id, cell(LedgerField::PricePerUnit, 2023, 6, "10"))
            .await
            .unwrap();
        service
            .set_cell(id, cell(LedgerField::Amount, 2023, 6, "5"))
            .await
            .unwrap();

        let table = service.get_entry_table(id).unwrap();
        let june = &table.years[0].rows[5];
        assert_eq!(june.shares_value, dec!(50));

        let added = service.add_previous_year(id).await.unwrap();
        assert_eq!(added.year, 2022);

        let years: Vec<i32> = service
            .get_entry_table(id)
            .unwrap()
            .years
            .iter()
            .map(|y| y.year)
            .collect();
        assert_eq!(years, vec![2022, 2023]);
        assert_eq!(
            service.get_cell(id, LedgerField::Amount, 2022, 6).unwrap(),
            Decimal::ZERO
        );

        service.delete_entry(id).await.unwrap();
        let err = service.get_entry_table(id).unwrap_err();
        assert!(matches!(depot_error(err), DepotError::EntryNotFound(_)));

        let err = service.delete_entry(id).await.unwrap_err();
        assert!(matches!(depot_error(err), DepotError::EntryNotFound(_)));
    }

    #[tokio::test]
    async fn test_set_cell_range_check_precedes_parsing() {
        let (repository, service) = service();
        let entry = service.add_entry(new_entry("A", 2023)).await.unwrap();
        let id = entry.id.as_str();

        let err = service
            .set_cell(id, cell(LedgerField::Amount, 2021, 3, "not a number"))
            .await
            .unwrap_err();
        assert!(matches!(depot_error(err), DepotError::OutOfRange { .. }));

        let err = service
            .set_cell(id, cell(LedgerField::Amount, 2023, 3, "-4"))
            .await
            .unwrap_err();
        assert!(matches!(depot_error(err), DepotError::InvalidValue { .. }));

        let err = service
            .set_cell(id, cell(LedgerField::Amount, 2023, 3, "abc"))
            .await
            .unwrap_err();
        assert!(matches!(depot_error(err), DepotError::InvalidValue { .. }));

        // Only the insert reached storage
        assert_eq!(repository.writes().len(), 1);
        assert_eq!(
            service.get_cell(id, LedgerField::Amount, 2023, 3).unwrap(),
            Decimal::ZERO
        );
    }

    #[tokio::test]
    async fn test_negative_additional_transactions_are_accepted() {
        let (_, service) = service();
        let entry = service.add_entry(new_entry("A", 2023)).await.unwrap();

        let value = service
            .set_cell(
                entry.id.as_str(),
                cell(LedgerField::AdditionalTransactions, 2023, 2, "-250,50"),
            )
            .await
            .unwrap();
        assert_eq!(value, dec!(-250.50));
    }

    #[tokio::test]
    async fn test_failed_write_leaves_memory_unchanged() {
        let (repository, service) = service();
        let entry = service.add_entry(new_entry("A", 2023)).await.unwrap();
        let id = entry.id.as_str();
        repository.fail_writes.store(true, Ordering::SeqCst);

        let err = service
            .set_cell(id, cell(LedgerField::PricePerUnit, 2023, 1, "12"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Database(_)));
        assert_eq!(
            service.get_cell(id, LedgerField::PricePerUnit, 2023, 1).unwrap(),
            Decimal::ZERO
        );

        assert!(service.add_previous_year(id).await.is_err());
        assert_eq!(service.get_entry(id).unwrap().years.len(), 1);

        assert!(service.delete_entry(id).await.is_err());
        assert_eq!(service.list_entries().unwrap().len(), 1);

        assert!(service.add_entry(new_entry("B", 2023)).await.is_err());
        assert_eq!(service.list_entries().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_savings_plan_section_is_reflected_in_table() {
        let (_, service) = service();
        let entry = service.add_entry(new_entry("A", 2023)).await.unwrap();
        let id = entry.id.as_str();

        service
            .add_savings_plan_section(
                id,
                SavingsPlanSection {
                    start: YearMonth::new(2023, 1).unwrap(),
                    end: YearMonth::new(2023, 12).unwrap(),
                    amount: dec!(100),
                    interval: SavingsPlanInterval::Monthly,
                },
            )
            .await
            .unwrap();
        service
            .set_cell(id, cell(LedgerField::AdditionalTransactions, 2023, 4, "-20"))
            .await
            .unwrap();

        let table = service.get_entry_table(id).unwrap();
        let april = &table.years[0].rows[3];
        assert_eq!(april.planned_transactions, dec!(100));
        assert_eq!(april.combined_transactions, dec!(80));

        let err = service
            .add_savings_plan_section(
                id,
                SavingsPlanSection {
                    start: YearMonth::new(2023, 12).unwrap(),
                    end: YearMonth::new(2024, 6).unwrap(),
                    amount: dec!(50),
                    interval: SavingsPlanInterval::Monthly,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(
            depot_error(err),
            DepotError::OverlappingSavingsPlan { .. }
        ));
        assert_eq!(service.get_entry(id).unwrap().savings_plan.len(), 1);
    }

    #[tokio::test]
    async fn test_loaded_entries_continue_the_sequence() {
        let stored = vec![
            DepotEntry::new("B".to_string(), InvestmentVariant::Stock, 4, 2022),
            DepotEntry::new("A".to_string(), InvestmentVariant::Fund, 1, 2021),
        ];
        let repository = Arc::new(MockDepotRepository::with_entries(stored));
        let service = DepotService::new(repository).unwrap();

        let names: Vec<String> = service
            .list_entries()
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["A".to_string(), "B".to_string()]);

        let added = service.add_entry(new_entry("C", 2023)).await.unwrap();
        assert_eq!(added.sequence, 5);
    }

    #[tokio::test]
    async fn test_sequence_of_deleted_entries_is_not_reused() {
        let repository = Arc::new(MockDepotRepository::default());
        let service = DepotService::new(repository.clone()).unwrap();
        let first = service.add_entry(new_entry("A", 2023)).await.unwrap();
        service.delete_entry(first.id.as_str()).await.unwrap();

        let restarted = DepotService::new(repository).unwrap();
        let recreated = restarted.add_entry(new_entry("A", 2023)).await.unwrap();
        assert_eq!(recreated.sequence, first.sequence + 1);
        assert_ne!(recreated.id, first.id);
    }

    #[tokio::test]
    async fn test_start_year_outside_the_ledger_range_is_rejected() {
        let (repository, service) = service();

        for year in [i32::MIN, -5, 0, 10_000] {
            let err = service.add_entry(new_entry("A", year)).await.unwrap_err();
            assert!(
                matches!(depot_error(err), DepotError::InvalidValue { .. }),
                "{year}"
            );
        }
        assert!(service.list_entries().unwrap().is_empty());
        assert!(repository.writes().is_empty());

        let entry = service.add_entry(new_entry("A", 1)).await.unwrap();
        let err = service
            .add_previous_year(entry.id.as_str())
            .await
            .unwrap_err();
        assert!(matches!(depot_error(err), DepotError::InvalidValue { .. }));
        assert_eq!(service.get_entry(entry.id.as_str()).unwrap().years.len(), 1);
        assert_eq!(repository.writes(), vec!["insert_entry A".to_string()]);
    }

    #[tokio::test]
    async fn test_concurrent_cell_writes_are_all_applied() {
        let (_, service) = service();
        let service = Arc::new(service);
        let entry = service.add_entry(new_entry("A", 2023)).await.unwrap();

        let mut handles = Vec::new();
        for month in 1..=12u32 {
            let service = service.clone();
            let id = entry.id.to_string();
            handles.push(tokio::spawn(async move {
                service
                    .set_cell(&id, cell(LedgerField::Amount, 2023, month, &month.to_string()))
                    .await
            }));
        }
        for handle in futures::future::join_all(handles).await {
            handle.unwrap().unwrap();
        }

        for month in 1..=12u32 {
            assert_eq!(
                service
                    .get_cell(entry.id.as_str(), LedgerField::Amount, 2023, month)
                    .unwrap(),
                Decimal::from(month)
            );
        }
    }
}
