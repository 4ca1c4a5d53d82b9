//! End-to-end tests: CSV file on disk -> loader -> aggregation and prediction.

use crime_dashboard::auth::{CredentialStore, RegistrationError};
use crime_dashboard::config::DashboardConfig;
use crime_dashboard::data::{DataLoader, LoadOptions};
use crime_dashboard::stats::{
    CrimeAnalytics, Prediction, TrendError, TrendPredictor, OTHER_LABEL,
};
use std::io::Write;
use tempfile::NamedTempFile;

const CSV: &str = "\
 State/UT ,District, year ,Murder,Theft,Arson,Total IPC Crimes
x,alpha,2010,10,50,5,100
X , Beta ,2011,4,n/a,0,200
X,alpha,2012,1,1,1,300
goa,north goa,2012,0,0,0,0
Goa,TOTAL,2012,0,0,0,0
Atlantis,Nowhere,2012,7,7,7,400
";

fn write_temp(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn loads_and_normalizes_csv_file() {
    let file = write_temp(CSV);
    let dataset = DataLoader::default().try_load(file.path()).unwrap();

    assert_eq!(dataset.len(), 6);
    assert_eq!(
        dataset.categories(),
        &["MURDER", "THEFT", "ARSON", "TOTAL IPC CRIMES"]
    );
    assert_eq!(
        CrimeAnalytics::distinct_regions(&dataset),
        vec!["ATLANTIS", "GOA", "X"]
    );
    assert_eq!(
        CrimeAnalytics::distinct_years(&dataset),
        vec![2010, 2011, 2012]
    );

    let beta = CrimeAnalytics::filter_rows(&dataset, "X", Some("BETA"), None);
    assert_eq!(beta.len(), 1);
    // "n/a" is zero-filled
    assert_eq!(beta.records()[0].count(1), 0);
}

#[test]
fn restrict_regions_drops_unknown_and_total_rows() {
    let file = write_temp(CSV);
    let options = LoadOptions {
        restrict_regions: true,
        allowed_regions: vec!["X".to_string(), "Goa".to_string()],
        ..LoadOptions::default()
    };
    let dataset = DataLoader::new(options).try_load(file.path()).unwrap();

    assert_eq!(CrimeAnalytics::distinct_regions(&dataset), vec!["GOA", "X"]);
    assert_eq!(dataset.len(), 4);
}

#[test]
fn missing_file_yields_empty_dataset() {
    let dataset = DataLoader::default().load("does/not/exist.csv");
    assert!(dataset.is_empty());
    assert!(CrimeAnalytics::distinct_regions(&dataset).is_empty());
    assert_eq!(CrimeAnalytics::safety_ratio(&dataset, "X"), 100.0);
}

#[test]
fn linear_history_predicts_next_years() {
    let file = write_temp(CSV);
    let dataset = DataLoader::default().try_load(file.path()).unwrap();

    let predictions = TrendPredictor::predict_future(&dataset, "x", 2).unwrap();
    assert_eq!(
        predictions,
        vec![
            Prediction {
                year: 2013,
                predicted: 400,
            },
            Prediction {
                year: 2014,
                predicted: 500,
            },
        ]
    );

    assert_eq!(
        TrendPredictor::predict_future(&dataset, "GOA", 5),
        Err(TrendError::InsufficientHistory { years: 1 })
    );
}

#[test]
fn composition_and_ratio_from_file() {
    let file = write_temp(CSV);
    let dataset = DataLoader::default().try_load(file.path()).unwrap();

    let x_only = CrimeAnalytics::filter_rows(&dataset, "X", Some("ALPHA"), Some(2010));
    let composition = CrimeAnalytics::top_crime_composition(&x_only, "X", 2);
    assert_eq!(
        composition.entries(),
        vec![
            ("THEFT".to_string(), 50),
            ("MURDER".to_string(), 10),
            (OTHER_LABEL.to_string(), 5),
        ]
    );

    // X: 600 of 1000
    let ratio = CrimeAnalytics::safety_ratio(&dataset, "X");
    assert!((ratio - 40.0).abs() < 1e-9);
    assert!(CrimeAnalytics::top_crime_composition(&dataset, "GOA", 5).is_no_data());
}

#[test]
fn seeded_credentials_follow_registration_rules() {
    let store = CredentialStore::with_demo_accounts();
    assert!(store.authenticate("judge", "hackathon2024"));
    assert_eq!(store.register("", "pw"), Err(RegistrationError::EmptyField));
    assert_eq!(
        store.register("judge", "x"),
        Err(RegistrationError::DuplicateUsername("judge".to_string()))
    );
}

#[test]
fn config_file_drives_loader_options() {
    let file = write_temp(
        r#"
        restrict_regions = true
        total_column = "Total IPC Crimes"
        top_n = 3
        "#,
    );
    let config = DashboardConfig::from_file(file.path()).unwrap();
    let options = config.load_options();

    assert!(options.restrict_regions);
    assert_eq!(config.top_n, 3);
    assert!(options.allowed_regions.iter().any(|r| r == "KERALA"));
}
