//! Name classification tests.

use porting_sync::naming::{canonical_name, is_duplicate};
use rstest::rstest;

#[rstest]
#[case::plain("Arm", false)]
#[case::suffixed("Arm.001", true)]
#[case::high_suffix("Arm.999", true)]
#[case::two_digits("Arm.01", false)]
#[case::four_digits("Arm.0001", false)]
#[case::mid_string("Arm.001_L", false)]
#[case::underscore("Arm_001", false)]
#[case::only_suffix(".123", true)]
#[case::empty("", false)]
fn test_is_duplicate(#[case] name: &str, #[case] expected: bool) {
    assert_eq!(is_duplicate(name), expected, "{name}");
}

#[rstest]
#[case::plain("Arm", "Arm")]
#[case::suffixed("Arm.001", "Arm")]
#[case::stacked("Arm.001.002", "Arm")]
#[case::inner_pattern("Body.002.Detail.014", "Body.002.Detail")]
#[case::untouched_inner("Body.002.Detail", "Body.002.Detail")]
#[case::dotted("hd2.helmet.003", "hd2.helmet")]
fn test_canonical_name(#[case] name: &str, #[case] expected: &str) {
    assert_eq!(canonical_name(name), expected);
}

#[rstest]
#[case("Arm")]
#[case("Arm.001")]
#[case("Arm.001.002.003")]
#[case("Leg.12")]
#[case("x.000")]
fn test_canonical_name_is_stable(#[case] name: &str) {
    let canonical = canonical_name(name);
    assert!(!is_duplicate(&canonical));
    assert_eq!(canonical_name(&canonical), canonical);
}
