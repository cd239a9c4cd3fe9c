//! Validates argument parsing and preference mapping

use clap::Parser;
use stampede::io::cli::Cli;
use stampede::io::configuration::{
    DEFAULT_COLOR_MODEL_COUNT, DEFAULT_HEIGHT, DEFAULT_STAMP_COUNT_DEMULTIPLIER,
    DEFAULT_STAMP_GROUP_COUNT, DEFAULT_STAMPS_PER_GROUP, DEFAULT_WIDTH,
};
use std::path::PathBuf;

#[test]
fn test_minimal_invocation_uses_defaults() {
    let cli = Cli::try_parse_from(["stampede", "stamps"]).expect("stamps dir is enough");
    assert_eq!(cli.stamps_dir, PathBuf::from("stamps"));
    assert_eq!(cli.output, PathBuf::from("."));
    assert_eq!(cli.width, DEFAULT_WIDTH);
    assert_eq!(cli.height, DEFAULT_HEIGHT);
    assert_eq!(cli.count, 1);
    assert_eq!(cli.seed, None);
    assert!(!cli.spine);
    assert!(!cli.retain_colors);
    assert!(!cli.retain_stamps);
    assert!(!cli.retain_spine);
    assert!(cli.should_show_progress());
}

#[test]
fn test_missing_stamps_dir_is_rejected() {
    assert!(Cli::try_parse_from(["stampede"]).is_err());
}

#[test]
fn test_zero_density_is_rejected() {
    assert!(Cli::try_parse_from(["stampede", "stamps", "--density", "0"]).is_err());
    assert!(Cli::try_parse_from(["stampede", "stamps", "--density", "1"]).is_ok());
}

#[test]
fn test_preferences_mirror_the_arguments() {
    let cli = Cli::try_parse_from([
        "stampede",
        "stamps",
        "--width",
        "320",
        "--height",
        "240",
        "--colors",
        "7",
        "--groups",
        "2",
        "--per-group",
        "3",
        "--density",
        "500",
        "--spine",
    ])
    .expect("full flag set parses");

    let preferences = cli.preferences();
    assert_eq!(preferences.width, 320);
    assert_eq!(preferences.height, 240);
    assert_eq!(preferences.color_model_count, 7);
    assert_eq!(preferences.stamp_group_count, 2);
    assert_eq!(preferences.stamps_per_group, 3);
    assert_eq!(preferences.stamp_count_demultiplier, 500);
    assert!(preferences.spine_mode);
}

#[test]
fn test_default_preferences_match_the_documented_constants() {
    let cli = Cli::try_parse_from(["stampede", "stamps"]).expect("stamps dir is enough");
    let preferences = cli.preferences();
    assert_eq!(preferences.color_model_count, DEFAULT_COLOR_MODEL_COUNT);
    assert_eq!(preferences.stamp_group_count, DEFAULT_STAMP_GROUP_COUNT);
    assert_eq!(preferences.stamps_per_group, DEFAULT_STAMPS_PER_GROUP);
    assert_eq!(
        preferences.stamp_count_demultiplier,
        DEFAULT_STAMP_COUNT_DEMULTIPLIER
    );
}

#[test]
fn test_short_flags_parse() {
    let cli = Cli::try_parse_from([
        "stampede", "stamps", "-w", "100", "-H", "80", "-n", "4", "-s", "42", "-o", "out", "-q",
    ])
    .expect("short flags parse");
    assert_eq!(cli.width, 100);
    assert_eq!(cli.height, 80);
    assert_eq!(cli.count, 4);
    assert_eq!(cli.seed, Some(42));
    assert_eq!(cli.output, PathBuf::from("out"));
    assert!(!cli.should_show_progress());
}

#[test]
fn test_retain_flags_parse_independently() {
    let cli = Cli::try_parse_from(["stampede", "stamps", "--retain-colors", "--retain-spine"])
        .expect("retain flags parse");
    assert!(cli.retain_colors);
    assert!(!cli.retain_stamps);
    assert!(cli.retain_spine);
}
