//! Java language plugin
//!
//! Builds with `javac` and `jar`, runs with `java`, and prepares Eclipse
//! JDT language server workspaces whose descriptors follow the Java
//! settings.

pub mod language;
pub mod options;
pub mod setup;
pub mod toolchain;
pub mod version;

pub use language::{default_launch_command, JavaLanguage, CONFIG_KEY};
pub use options::JavaOption;
pub use setup::{relativize, JavaWorkspaceSetup, BUNDLED_TEMPLATE_DIR};
pub use toolchain::JavacToolchain;
pub use version::{execution_environment, version_number};
