//! Java version strings as written into workspace descriptors

/// Numeric part of a version setting: "Java 11", "v11" and "11" all give "11".
///
/// Everything before the first digit is dropped. A value without digits is
/// returned trimmed and otherwise unchanged.
pub fn version_number(raw: &str) -> &str {
    let raw = raw.trim();
    match raw.find(|c: char| c.is_ascii_digit()) {
        Some(start) => &raw[start..],
        None => raw,
    }
}

/// Execution environment name used by `.classpath`, e.g. "JavaSE-11"
pub fn execution_environment(raw: &str) -> String {
    format!("JavaSE-{}", version_number(raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_prefixes_are_dropped() {
        assert_eq!(version_number("Java 11"), "11");
        assert_eq!(version_number("v11"), "11");
        assert_eq!(version_number("17"), "17");
        assert_eq!(version_number(" Java 1.8 "), "1.8");
        assert_eq!(version_number("latest"), "latest");
    }

    #[test]
    fn test_execution_environment() {
        assert_eq!(execution_environment("Java 11"), "JavaSE-11");
        assert_eq!(execution_environment("21"), "JavaSE-21");
    }

    proptest! {
        #[test]
        fn prop_prefix_never_survives(prefix in "[A-Za-z ]{0,8}", number in 1u32..40) {
            let raw = format!("{}{}", prefix, number);
            prop_assert_eq!(version_number(&raw), number.to_string());
        }
    }
}
