//! Tests for severities and the level filter.

use relaylog::{LevelFilter, Severity, should_emit};

#[test]
fn weights_are_ordered() {
    let weights: Vec<u8> = Severity::all().iter().map(|s| s.weight()).collect();
    assert_eq!(weights, vec![0, 1, 2, 3, 4]);
    assert!(Severity::Log < Severity::Info);
    assert!(Severity::Warn < Severity::Error);
}

#[test]
fn parse_levels() {
    assert_eq!("log".parse::<Severity>(), Ok(Severity::Log));
    assert_eq!("INFO".parse::<Severity>(), Ok(Severity::Info));
    assert_eq!(" success ".parse::<Severity>(), Ok(Severity::Success));
    assert_eq!("warning".parse::<Severity>(), Ok(Severity::Warn));
    assert_eq!("err".parse::<Severity>(), Ok(Severity::Error));
    assert!("verbose".parse::<Severity>().is_err());
}

#[test]
fn labels_and_names() {
    assert_eq!(Severity::Success.as_str(), "success");
    assert_eq!(Severity::Success.label(), "SUCCESS");
    assert_eq!(Severity::Warn.to_string(), "warn");
}

#[test]
fn from_weight_clamps() {
    assert_eq!(Severity::from_weight(0), Severity::Log);
    assert_eq!(Severity::from_weight(3), Severity::Warn);
    assert_eq!(Severity::from_weight(200), Severity::Error);
}

#[test]
fn log_crate_levels_map() {
    assert_eq!(Severity::from(log::Level::Error), Severity::Error);
    assert_eq!(Severity::from(log::Level::Warn), Severity::Warn);
    assert_eq!(Severity::from(log::Level::Info), Severity::Info);
    assert_eq!(Severity::from(log::Level::Debug), Severity::Log);
    assert_eq!(Severity::from(log::Level::Trace), Severity::Log);
}

#[test]
fn should_emit_compares_weights() {
    assert!(should_emit(4, 3));
    assert!(should_emit(3, 3));
    assert!(!should_emit(2, 3));
    assert!(should_emit(0, 0));
}

#[test]
fn filter_allows_at_or_above_base() {
    let filter = LevelFilter::new(Severity::Warn);
    assert_eq!(filter.base(), Severity::Warn);
    assert!(!filter.allows(Severity::Log));
    assert!(!filter.allows(Severity::Success));
    assert!(filter.allows(Severity::Warn));
    assert!(filter.allows(Severity::Error));

    let everything = LevelFilter::new(Severity::Log);
    assert!(Severity::all().iter().all(|s| everything.allows(*s)));
}
