//! Eclipse project descriptors for the Java language server
//!
//! jdtls reads the project layout from three files in its workspace:
//! `.settings/org.eclipse.jdt.core.prefs` (compiler version),
//! `.classpath` (source and output folders) and `.project` (project name).
//! On first use the bundled project template is copied in and rendered;
//! afterwards each descriptor is re-rendered from the template whenever a
//! setting it depends on changes. An already initialized workspace is not
//! rewritten by setup itself.

use crate::options::JavaOption;
use crate::version::{execution_environment, version_number};
use quill_config::{FromSettingValue, SettingsStore, SubscriptionId};
use quill_foundation::{QuillError, QuillResult};
use quill_lsp::{copy_template_dir, is_initialized, ServerWrapper, SetupReport, WorkspaceSetup};
use quill_template::{TemplateBinder, VariableSetter};
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::info;

pub const PREFS_DESCRIPTOR: &str = ".settings/org.eclipse.jdt.core.prefs";
pub const CLASSPATH_DESCRIPTOR: &str = ".classpath";
pub const PROJECT_DESCRIPTOR: &str = ".project";

/// Project template shipped with this crate
pub const BUNDLED_TEMPLATE_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/resources/project-template");

/// Prepares a jdtls workspace and keeps its descriptors in sync with settings
pub struct JavaWorkspaceSetup {
    settings: Arc<SettingsStore<JavaOption>>,
    binder: TemplateBinder,
    template_dir: PathBuf,
    project_name: String,
    project_root: PathBuf,
    subscriptions: Mutex<Vec<SubscriptionId>>,
}

impl JavaWorkspaceSetup {
    pub fn new(
        settings: Arc<SettingsStore<JavaOption>>,
        binder: TemplateBinder,
        template_dir: impl Into<PathBuf>,
        project_name: impl Into<String>,
        project_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            settings,
            binder,
            template_dir: template_dir.into(),
            project_name: project_name.into(),
            project_root: project_root.into(),
            subscriptions: Mutex::new(Vec::new()),
        }
    }

    pub fn template_dir(&self) -> &Path {
        &self.template_dir
    }

    // A repeated setup replaces the previous pass's listeners instead of
    // stacking duplicates.
    fn reset_subscriptions(&self) {
        let previous = std::mem::take(
            &mut *self
                .subscriptions
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );
        for id in previous {
            self.settings.unsubscribe(id);
        }
    }

    fn track(&self, id: SubscriptionId) {
        self.subscriptions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(id);
    }

    fn template(&self, descriptor: &str) -> QuillResult<PathBuf> {
        let template = self.template_dir.join(descriptor);
        std::fs::metadata(&template).map_err(|e| QuillError::io_at(&template, e))?;
        Ok(template)
    }

    // Keep one variable of a descriptor in step with `option`. Without
    // `render_now` the current value is only recorded, and the file is
    // rewritten on the next change.
    fn follow<T, F>(
        &self,
        option: JavaOption,
        setter: VariableSetter,
        transform: F,
        render_now: bool,
    ) where
        T: FromSettingValue,
        F: Fn(T) -> String + Send + Sync + 'static,
    {
        if !render_now {
            if let Some(current) = self.settings.get_optional::<T>(option) {
                setter.record(transform(current));
            }
        }
        self.track(self.settings.on_change_as::<T, _>(
            option,
            move |value| setter.set(transform(value)),
            render_now,
        ));
    }

    fn bind_prefs(&self, workspace: &Path, render_now: bool) -> QuillResult<()> {
        let template = self.template(PREFS_DESCRIPTOR)?;
        let setter = self
            .binder
            .bind(template, workspace.join(PREFS_DESCRIPTOR), "replace.versionnumber");
        self.follow(
            JavaOption::JavaVersion,
            setter,
            |version: String| version_number(&version).to_string(),
            render_now,
        );
        Ok(())
    }

    fn bind_classpath(&self, workspace: &Path, render_now: bool) -> QuillResult<()> {
        let template = self.template(CLASSPATH_DESCRIPTOR)?;
        let output = workspace.join(CLASSPATH_DESCRIPTOR);

        let version = self.binder.bind(&template, &output, "replace.version");
        self.follow(
            JavaOption::JavaVersion,
            version,
            |raw: String| execution_environment(&raw),
            render_now,
        );

        for (option, variable) in [
            (JavaOption::InputDirectory, "replace.src"),
            (JavaOption::ClassOutput, "replace.bin"),
        ] {
            let setter = self.binder.bind(&template, &output, variable);
            let root = self.project_root.clone();
            self.follow(
                option,
                setter,
                move |path: PathBuf| relativize(&path, &root),
                render_now,
            );
        }
        Ok(())
    }

    fn bind_project(&self, workspace: &Path, render_now: bool) -> QuillResult<()> {
        let template = self.template(PROJECT_DESCRIPTOR)?;
        let setter = self
            .binder
            .bind(template, workspace.join(PROJECT_DESCRIPTOR), "replace.name");
        if !render_now {
            setter.record(self.project_name.as_str());
            return Ok(());
        }
        info!(name = %self.project_name, "Writing project name");
        setter.try_set(self.project_name.as_str())
    }
}

impl WorkspaceSetup for JavaWorkspaceSetup {
    fn setup(&self, wrapper: &ServerWrapper, workspace: &Path) -> SetupReport {
        info!(server = wrapper.name(), workspace = %workspace.display(), "Setting up the Java project");
        let mut report = SetupReport::default();

        // Existing descriptors may carry user edits; they are left alone
        // until a setting they depend on changes.
        let initialized = is_initialized(workspace, CLASSPATH_DESCRIPTOR);
        if initialized {
            info!("Project already contains template files, not copying them again");
        } else {
            match copy_template_dir(&self.template_dir, workspace) {
                Ok(files) => {
                    info!(files, "Copied project template");
                    report.copied_template = true;
                }
                Err(e) => report.record("project template", Err(e)),
            }
        }

        let render_now = !initialized;
        self.reset_subscriptions();
        report.record("version descriptor", self.bind_prefs(workspace, render_now));
        report.record("classpath descriptor", self.bind_classpath(workspace, render_now));
        report.record("project descriptor", self.bind_project(workspace, render_now));
        report
    }
}

/// `path` relative to `root`, with `/` separators.
///
/// Relative paths are taken as already relative to the root.
pub fn relativize(path: &Path, root: &Path) -> String {
    let relative = if path.is_absolute() {
        pathdiff::diff_paths(path, root).unwrap_or_else(|| path.to_path_buf())
    } else {
        path.to_path_buf()
    };

    relative
        .components()
        .filter(|component| !matches!(component, Component::CurDir))
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
