use regex::Regex;
use std::sync::OnceLock;

/// The suffix the host appends when an object is duplicated (`Arm` becomes
/// `Arm.001`). Anchored to the end of the name.
const DUPLICATE_SUFFIX: &str = r"\.\d{3}$";

/// One or more stacked duplicate suffixes at the end of a name.
const DUPLICATE_TAIL: &str = r"(\.\d{3})+$";

fn duplicate_suffix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(DUPLICATE_SUFFIX).expect("duplicate suffix pattern is valid"))
}

fn duplicate_tail() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(DUPLICATE_TAIL).expect("duplicate tail pattern is valid"))
}

/// Returns true when `name` ends with `.` followed by exactly three digits.
pub fn is_duplicate(name: &str) -> bool {
    duplicate_suffix().is_match(name)
}

/// Name of the original a duplicate was made from.
///
/// The whole trailing run of suffixes is removed, so `Arm.001.002` maps to
/// `Arm`. The host itself only strips one suffix (`Arm.001`); stripping the
/// run instead keeps the result a non-duplicate and makes the function
/// idempotent. A `.NNN` anywhere else in the name is left alone, and names
/// without a suffix come back unchanged.
///
/// ```
/// use porting_sync::naming::canonical_name;
///
/// assert_eq!(canonical_name("Arm.001"), "Arm");
/// assert_eq!(canonical_name("Arm.001.002"), "Arm");
/// assert_eq!(canonical_name("Body.002.Detail"), "Body.002.Detail");
/// ```
pub fn canonical_name(name: &str) -> String {
    duplicate_tail().replace(name, "").into_owned()
}
