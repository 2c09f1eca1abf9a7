//! Configuration for Quill
//!
//! Two layers live here:
//! - [`SettingsStore`]: the live, per-language option values that templates
//!   and builds read, with synchronous change notification.
//! - [`AppConfig`]: process-wide configuration (logging, install paths,
//!   launch templates) loaded once at startup.

pub mod app;
pub mod dynamic;
pub mod file;
pub mod logging;
pub mod option;
pub mod store;
pub mod value;

pub use app::{AppConfig, LanguageConfig, LogFormat, LoggingConfig, ProjectConfig};
pub use dynamic::{DynSettings, OptionInfo};
pub use file::SettingsFile;
pub use option::{SettingOption, ValueKind};
pub use store::{SettingsStore, SubscriptionId};
pub use value::{FromSettingValue, SettingValue};
