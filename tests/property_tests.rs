//! Property-based tests for the aggregation and trend functions

use crime_dashboard::data::{Dataset, KeyColumns, Record};
use crime_dashboard::stats::{Composition, CrimeAnalytics, TrendError, TrendPredictor};
use proptest::prelude::*;

const REGIONS: [&str; 3] = ["ASSAM", "GOA", "KERALA"];
const DISTRICTS: [&str; 3] = ["EAST", "WEST", "TOTAL"];
const CATEGORIES: [&str; 5] = ["MURDER", "RAPE", "THEFT", "ARSON", "TOTAL IPC CRIMES"];

/// Random small crime tables over a fixed set of regions and districts
fn dataset_strategy() -> impl Strategy<Value = Dataset> {
    prop::collection::vec(
        (
            0..REGIONS.len(),
            0..DISTRICTS.len(),
            2010i64..2015,
            prop::collection::vec(0u64..1000, CATEGORIES.len()),
        ),
        0..40,
    )
    .prop_map(|rows| {
        let records = rows
            .into_iter()
            .map(|(r, d, year, counts)| {
                Record::new(Some(REGIONS[r]), Some(DISTRICTS[d]), Some(year), counts)
            })
            .collect();
        Dataset::new(
            KeyColumns::all(),
            CATEGORIES.iter().map(|c| c.to_string()).collect(),
            records,
        )
    })
}

fn region_strategy() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("ASSAM"),
        Just("GOA"),
        Just("KERALA"),
        Just("NOWHERE"),
    ]
}

proptest! {
    #[test]
    fn safety_ratio_is_a_percentage(dataset in dataset_strategy(), region in region_strategy()) {
        let ratio = CrimeAnalytics::safety_ratio(&dataset, region);
        prop_assert!((0.0..=100.0).contains(&ratio));
        if CrimeAnalytics::grand_total(&dataset) == 0 {
            prop_assert_eq!(ratio, 100.0);
        }
    }

    #[test]
    fn filter_rows_is_idempotent_and_order_independent(
        dataset in dataset_strategy(),
        region in region_strategy(),
        district in prop::option::of(prop_oneof![Just("EAST"), Just("WEST")]),
        year in prop::option::of(2010i64..2015),
    ) {
        let once = CrimeAnalytics::filter_rows(&dataset, region, district, year);
        let twice = CrimeAnalytics::filter_rows(&once, region, district, year);
        prop_assert_eq!(&once, &twice);

        let year_first = CrimeAnalytics::filter_rows(
            &CrimeAnalytics::filter_rows(&dataset, region, None, year),
            region,
            district,
            None,
        );
        prop_assert_eq!(&once, &year_first);
    }

    #[test]
    fn composition_is_ranked_and_other_holds_remainder(
        dataset in dataset_strategy(),
        region in region_strategy(),
        top_n in 1usize..5,
    ) {
        let composition = CrimeAnalytics::top_crime_composition(&dataset, region, top_n);
        let category_total: u64 = CrimeAnalytics::category_sums(
            &CrimeAnalytics::filter_rows(&dataset, region, None, None),
            &["MURDER", "RAPE", "THEFT", "ARSON"],
        )
        .iter()
        .map(|(_, v)| v)
        .sum();

        match composition {
            Composition::NoMajorCrimes => prop_assert_eq!(category_total, 0),
            Composition::Ranked { top, other } => {
                prop_assert!(top.len() <= top_n);
                prop_assert!(top.iter().all(|(_, v)| *v > 0));
                prop_assert!(top.windows(2).all(|w| w[0].1 >= w[1].1));
                let top_sum: u64 = top.iter().map(|(_, v)| v).sum();
                prop_assert_eq!(other.unwrap_or(0), category_total - top_sum);
            }
        }
    }

    #[test]
    fn prediction_needs_two_years(
        totals in prop::collection::vec(0u64..10_000, 1..5),
        year in 2000i64..2020,
    ) {
        let records = totals
            .iter()
            .map(|t| Record::new(Some("GOA"), None, Some(year), vec![*t]))
            .collect();
        let dataset = Dataset::new(KeyColumns::all(), vec!["TOTAL IPC CRIMES".into()], records);

        prop_assert_eq!(
            TrendPredictor::predict_future(&dataset, "GOA", 5),
            Err(TrendError::InsufficientHistory { years: 1 })
        );
    }

    #[test]
    fn predictions_are_consecutive_years(
        totals in prop::collection::vec(0u64..10_000, 2..8),
        horizon in 1usize..8,
    ) {
        let records = totals
            .iter()
            .enumerate()
            .map(|(i, t)| Record::new(Some("GOA"), None, Some(2000 + i as i64), vec![*t]))
            .collect();
        let dataset = Dataset::new(KeyColumns::all(), vec!["TOTAL IPC CRIMES".into()], records);

        let predictions = TrendPredictor::predict_future(&dataset, "GOA", horizon).unwrap();
        let last = 2000 + totals.len() as i64 - 1;
        let years: Vec<i64> = predictions.iter().map(|p| p.year).collect();
        let expected: Vec<i64> = (1..=horizon as i64).map(|s| last + s).collect();
        prop_assert_eq!(years, expected);
    }
}
