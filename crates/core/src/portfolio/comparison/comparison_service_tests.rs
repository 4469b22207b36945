#[cfg(test)]
mod tests {
    use crate::depot::DepotError;
    use crate::errors::{Error, Result};
    use crate::portfolio::comparison::{
        ComparisonAction, ComparisonKind, ComparisonService, ComparisonServiceTrait,
    };
    use crate::portfolio::valuation::{
        AlltimeChart, ChartDataset, DepotOverview, DepotTimeline, DepotValuationPoint,
        ValuationServiceTrait,
    };
    use crate::utils::time_utils::YearMonth;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    // --- Mock ValuationService with a fixed timeline ---
    struct FixedValuation {
        timeline: DepotTimeline,
    }

    impl ValuationServiceTrait for FixedValuation {
        fn get_timeline(&self) -> Result<DepotTimeline> {
            Ok(self.timeline.clone())
        }

        fn get_overview(&self) -> Result<DepotOverview> {
            Ok(DepotOverview::from(&self.timeline))
        }

        fn get_alltime_labels(&self) -> Result<Vec<String>> {
            Ok(self.timeline.labels())
        }

        fn get_alltime_datasets(&self) -> Result<Vec<ChartDataset>> {
            Ok(self.timeline.datasets())
        }

        fn get_alltime_chart(&self) -> Result<AlltimeChart> {
            Ok(self.timeline.chart())
        }

        fn get_prognosis(&self, _growth_rate: Decimal) -> Result<Vec<Option<Decimal>>> {
            unimplemented!()
        }
    }

    /// Three months: values 0, 100, 100 and flows 0, 100, 10.
    fn timeline() -> DepotTimeline {
        let values = [dec!(0), dec!(100), dec!(100)];
        let flows = [dec!(0), dec!(100), dec!(10)];
        DepotTimeline {
            points: (1..=3u32)
                .map(|m| DepotValuationPoint {
                    month: YearMonth::new(2023, m).unwrap(),
                    depot_value: values[m as usize - 1],
                    net_transactions: flows[m as usize - 1],
                })
                .collect(),
            entries: Vec::new(),
        }
    }

    fn service() -> ComparisonService {
        ComparisonService::new(
            Arc::new(FixedValuation {
                timeline: timeline(),
            }),
            dec!(0.05),
        )
    }

    fn depot_error(err: Error) -> DepotError {
        match err {
            Error::Depot(e) => e,
            other => panic!("expected a depot error, got {:?}", other),
        }
    }

    #[test]
    fn test_add_assigns_stable_unique_ids() {
        let service = service();
        let a = service
            .add_comparison(ComparisonKind::Projection { rate: dec!(0.07) })
            .unwrap();
        let b = service
            .add_comparison(ComparisonKind::TransactionOverlay)
            .unwrap();
        service.remove_comparison(&a.id).unwrap();
        let c = service.add_comparison(ComparisonKind::DepotValue).unwrap();

        assert_ne!(a.id, b.id);
        assert_ne!(a.id, c.id);
        let ids: Vec<String> = service
            .list_comparisons()
            .unwrap()
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec![b.id, c.id]);
    }

    #[test]
    fn test_remove_unknown_comparison_is_not_found() {
        let service = service();
        let err = service.remove_comparison("comparison-42").unwrap_err();
        assert!(matches!(depot_error(err), DepotError::ComparisonNotFound(_)));
    }

    #[test]
    fn test_update_param() {
        let service = service();
        let projection = service
            .add_comparison(ComparisonKind::Projection { rate: dec!(0.05) })
            .unwrap();
        let overlay = service
            .add_comparison(ComparisonKind::TransactionOverlay)
            .unwrap();

        let updated = service.update_comparison(&projection.id, "7%").unwrap();
        assert_eq!(updated.kind, ComparisonKind::Projection { rate: dec!(0.07) });
        assert_eq!(updated.label, "Prognosis 7%");
        assert_eq!(updated.id, projection.id);

        let err = service.update_comparison(&projection.id, "abc").unwrap_err();
        assert!(matches!(depot_error(err), DepotError::InvalidValue { .. }));

        let err = service.update_comparison(&overlay.id, "0.1").unwrap_err();
        assert!(matches!(depot_error(err), DepotError::InvalidValue { .. }));

        let err = service.update_comparison("missing", "0.1").unwrap_err();
        assert!(matches!(depot_error(err), DepotError::ComparisonNotFound(_)));

        // Rejected updates leave the set as it was
        assert_eq!(
            service.list_comparisons().unwrap()[0].kind,
            ComparisonKind::Projection { rate: dec!(0.07) }
        );
    }

    #[test]
    fn test_add_rejects_rate_at_or_below_minus_one() {
        let service = service();
        let err = service
            .add_comparison(ComparisonKind::SavingsCurve { rate: dec!(-1) })
            .unwrap_err();
        assert!(matches!(depot_error(err), DepotError::InvalidValue { .. }));
        assert!(service.list_comparisons().unwrap().is_empty());
    }

    #[test]
    fn test_actions() {
        let service = service();

        let set = service.apply_action(ComparisonAction::Add).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set[0].kind, ComparisonKind::Projection { rate: dec!(0.05) });

        service
            .add_comparison(ComparisonKind::TransactionOverlay)
            .unwrap();
        let set = service.apply_action(ComparisonAction::Remove).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set[0].kind, ComparisonKind::Projection { rate: dec!(0.05) });

        service.apply_action(ComparisonAction::Remove).unwrap();
        let err = service.apply_action(ComparisonAction::Remove).unwrap_err();
        assert!(matches!(depot_error(err), DepotError::ComparisonNotFound(_)));
    }

    #[test]
    fn test_chart_appends_materialized_comparisons() {
        let service = service();
        service
            .add_comparison(ComparisonKind::Projection { rate: dec!(0.1) })
            .unwrap();
        service
            .add_comparison(ComparisonKind::TransactionOverlay)
            .unwrap();
        service
            .add_comparison(ComparisonKind::SavingsCurve { rate: dec!(0.1) })
            .unwrap();

        let chart = service.get_chart().unwrap();
        assert_eq!(chart.labels, vec!["2023-01", "2023-02", "2023-03"]);

        let labels: Vec<&str> = chart.datasets.iter().map(|d| d.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Depot value",
                "Transactions",
                "Prognosis 10%",
                "Transactions total",
                "Savings curve 10%"
            ]
        );

        assert_eq!(chart.datasets[2].data, vec![None, Some(dec!(100)), Some(dec!(110))]);
        assert_eq!(
            chart.datasets[3].data,
            vec![Some(dec!(0)), Some(dec!(100)), Some(dec!(110))]
        );
        assert_eq!(chart.datasets[4].data, vec![None, Some(dec!(100)), Some(dec!(120))]);
    }

    #[test]
    fn test_changing_comparisons_does_not_touch_base_datasets() {
        let service = service();
        let before = service.get_chart().unwrap();

        let added = service
            .add_comparison(ComparisonKind::Projection { rate: dec!(0.07) })
            .unwrap();
        service.update_comparison(&added.id, "0.09").unwrap();
        let after = service.get_chart().unwrap();

        assert_eq!(before.datasets[..2], after.datasets[..2]);
        assert_eq!(after.datasets.len(), 3);
    }
}
