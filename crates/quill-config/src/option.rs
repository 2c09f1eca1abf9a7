//! Option declarations
//!
//! Each language declares its configurable keys as a fieldless enum and
//! implements [`SettingOption`] for it. The set is fixed at compile time.

use quill_foundation::{QuillError, QuillResult};
use std::fmt;
use std::hash::Hash;

/// Kind of value an option holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Free-form string
    Text,
    /// File or directory path
    Path,
    /// Boolean switch
    Flag,
}

impl ValueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Text => "text",
            ValueKind::Path => "path",
            ValueKind::Flag => "flag",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A declared configuration key of one language plugin
pub trait SettingOption: Copy + Eq + Hash + fmt::Debug + Send + Sync + 'static {
    /// Display name of the language owning these options
    const LANGUAGE: &'static str;

    /// Every option, in declaration order
    fn all() -> &'static [Self];

    /// External name used by settings files and the CLI
    fn name(&self) -> &'static str;

    /// Whether a build needs this option to have a value
    fn is_required(&self) -> bool;

    fn kind(&self) -> ValueKind;

    /// Look up an option by external name, ignoring ASCII case
    fn from_name(name: &str) -> QuillResult<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|option| option.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| QuillError::unknown_option(Self::LANGUAGE, name))
    }
}

#[cfg(test)]
pub(crate) mod test_options {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum DemoOption {
        Source,
        Output,
        Execute,
        Version,
        Library,
    }

    impl SettingOption for DemoOption {
        const LANGUAGE: &'static str = "Demo";

        fn all() -> &'static [Self] {
            &[
                DemoOption::Source,
                DemoOption::Output,
                DemoOption::Execute,
                DemoOption::Version,
                DemoOption::Library,
            ]
        }

        fn name(&self) -> &'static str {
            match self {
                DemoOption::Source => "sourceDirectory",
                DemoOption::Output => "outputDirectory",
                DemoOption::Execute => "execute",
                DemoOption::Version => "version",
                DemoOption::Library => "libraryLocation",
            }
        }

        fn is_required(&self) -> bool {
            !matches!(self, DemoOption::Version | DemoOption::Library)
        }

        fn kind(&self) -> ValueKind {
            match self {
                DemoOption::Source | DemoOption::Output | DemoOption::Library => ValueKind::Path,
                DemoOption::Execute => ValueKind::Flag,
                DemoOption::Version => ValueKind::Text,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_options::DemoOption;
    use super::*;

    #[test]
    fn test_from_name_is_case_insensitive() {
        assert_eq!(
            DemoOption::from_name("OUTPUTDIRECTORY").unwrap(),
            DemoOption::Output
        );
        assert_eq!(DemoOption::from_name("execute").unwrap(), DemoOption::Execute);
    }

    #[test]
    fn test_from_name_unknown_fails_fast() {
        let err = DemoOption::from_name("nope").unwrap_err();
        assert!(matches!(
            err,
            QuillError::UnknownOptionName { ref language, ref name } if language == "Demo" && name == "nope"
        ));
    }
}
