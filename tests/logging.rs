//! Logger initialisation is safe to repeat.

use log::LevelFilter;
use rstest::rstest;
use serial_test::serial;
use warden::logging::default_level;

#[rstest]
#[case(true, LevelFilter::Debug)]
#[case(false, LevelFilter::Info)]
fn verbosity_selects_default_level(#[case] verbose: bool, #[case] expected: LevelFilter) {
    assert_eq!(default_level(verbose), expected);
}

#[test]
#[serial]
fn repeated_initialisation_keeps_first_logger() {
    warden::init_logging(false);
    warden::init_logging(true);
    log::info!("logger still usable after a second init");
}
