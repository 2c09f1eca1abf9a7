//! Name-based access to a settings store
//!
//! The CLI and the settings file address options by their external names.
//! [`DynSettings`] erases the option type so callers can work with any
//! language's store through `&dyn DynSettings`.

use crate::option::{SettingOption, ValueKind};
use crate::store::SettingsStore;
use crate::value::SettingValue;
use quill_foundation::{QuillError, QuillResult};

/// Description of one option and its current value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionInfo {
    pub name: &'static str,
    pub required: bool,
    pub kind: ValueKind,
    pub value: Option<SettingValue>,
}

/// Option-type-erased view of a [`SettingsStore`]
pub trait DynSettings: Send + Sync {
    /// Display name of the owning language
    fn language(&self) -> &'static str;

    /// Every declared option with its current value
    fn options(&self) -> Vec<OptionInfo>;

    /// External names of every declared option, in declaration order
    fn option_names(&self) -> Vec<&'static str> {
        self.options().into_iter().map(|info| info.name).collect()
    }

    /// Parse `raw` according to the option's kind and store it
    fn set_by_name(&self, name: &str, raw: &str) -> QuillResult<()>;

    fn get_by_name(&self, name: &str) -> QuillResult<Option<SettingValue>>;

    fn validate_required(&self) -> QuillResult<()>;
}

impl<O: SettingOption> DynSettings for SettingsStore<O> {
    fn language(&self) -> &'static str {
        O::LANGUAGE
    }

    fn options(&self) -> Vec<OptionInfo> {
        O::all()
            .iter()
            .map(|option| OptionInfo {
                name: option.name(),
                required: option.is_required(),
                kind: option.kind(),
                value: self.value(*option),
            })
            .collect()
    }

    fn set_by_name(&self, name: &str, raw: &str) -> QuillResult<()> {
        let option = O::from_name(name)?;
        let value = SettingValue::parse(option.kind(), raw).ok_or_else(|| {
            QuillError::type_mismatch(option.name(), option.kind().as_str(), format!("'{}'", raw))
        })?;
        self.set(option, value)
    }

    fn get_by_name(&self, name: &str) -> QuillResult<Option<SettingValue>> {
        let option = O::from_name(name)?;
        Ok(self.value(option))
    }

    fn validate_required(&self) -> QuillResult<()> {
        SettingsStore::validate_required(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::option::test_options::DemoOption;
    use std::path::PathBuf;

    #[test]
    fn test_set_by_name_parses_kind() {
        let store = SettingsStore::<DemoOption>::new();
        let settings: &dyn DynSettings = &store;

        settings.set_by_name("EXECUTE", "false").unwrap();
        settings.set_by_name("outputdirectory", "build/out").unwrap();

        assert!(!store.get::<bool>(DemoOption::Execute).unwrap());
        assert_eq!(
            store.get::<PathBuf>(DemoOption::Output).unwrap(),
            PathBuf::from("build/out")
        );
    }

    #[test]
    fn test_set_by_name_rejects_bad_flag() {
        let store = SettingsStore::<DemoOption>::new();
        let err = store.set_by_name("execute", "sometimes").unwrap_err();
        assert!(err.to_string().contains("execute"));
    }

    #[test]
    fn test_unknown_name_fails() {
        let store = SettingsStore::<DemoOption>::new();
        assert!(matches!(
            store.get_by_name("colour"),
            Err(QuillError::UnknownOptionName { .. })
        ));
    }

    #[test]
    fn test_options_lists_declarations() {
        let store = SettingsStore::<DemoOption>::new();
        store.set(DemoOption::Version, "v2").unwrap();
        let options = store.options();
        assert_eq!(options.len(), DemoOption::all().len());
        let version = options.iter().find(|o| o.name == "version").unwrap();
        assert!(!version.required);
        assert_eq!(version.value, Some(SettingValue::from("v2")));
        assert_eq!(store.option_names()[0], "sourceDirectory");
    }
}
