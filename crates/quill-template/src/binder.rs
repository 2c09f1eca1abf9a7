//! Registry of (template, output) bindings

use crate::substitute::substitute;
use quill_foundation::{QuillError, QuillResult};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, error};

/// Identity of one binding
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingKey {
    pub template: PathBuf,
    pub output: PathBuf,
}

#[derive(Debug)]
struct TemplateBinding {
    key: BindingKey,
    variables: BTreeMap<String, String>,
}

type SharedBinding = Arc<Mutex<TemplateBinding>>;

/// Creates and tracks template bindings.
///
/// Cloning is cheap and shares the registry.
#[derive(Debug, Clone, Default)]
pub struct TemplateBinder {
    bindings: Arc<Mutex<HashMap<BindingKey, SharedBinding>>>,
}

impl TemplateBinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `variable` of the (template, output) pair and return its setter.
    ///
    /// The binding is created on first use; later binds for the same pair
    /// share its variable map.
    pub fn bind(
        &self,
        template: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
        variable: impl Into<String>,
    ) -> VariableSetter {
        let key = BindingKey {
            template: template.into(),
            output: output.into(),
        };
        let variable = variable.into();

        let binding = lock(&self.bindings)
            .entry(key.clone())
            .or_insert_with(|| {
                debug!(
                    template = %key.template.display(),
                    output = %key.output.display(),
                    "Created template binding"
                );
                Arc::new(Mutex::new(TemplateBinding {
                    key: key.clone(),
                    variables: BTreeMap::new(),
                }))
            })
            .clone();

        VariableSetter { binding, variable }
    }

    /// Current variable values of a binding, if it exists
    pub fn variables(&self, template: &Path, output: &Path) -> Option<BTreeMap<String, String>> {
        let key = BindingKey {
            template: template.to_path_buf(),
            output: output.to_path_buf(),
        };
        let binding = lock(&self.bindings).get(&key).cloned()?;
        let variables = lock(&binding).variables.clone();
        Some(variables)
    }

    /// All bindings, sorted
    pub fn bindings(&self) -> Vec<BindingKey> {
        let mut keys: Vec<_> = lock(&self.bindings).keys().cloned().collect();
        keys.sort();
        keys
    }
}

/// Setter for one variable of one binding
#[derive(Debug, Clone)]
pub struct VariableSetter {
    binding: SharedBinding,
    variable: String,
}

impl VariableSetter {
    pub fn variable(&self) -> &str {
        &self.variable
    }

    /// Record the value and re-render the output, logging any I/O failure.
    pub fn set(&self, value: impl Into<String>) {
        if let Err(e) = self.try_set(value) {
            error!(
                variable = %self.variable,
                error_category = e.category(),
                error = %e,
                "Template render failed"
            );
        }
    }

    /// Record the value without touching the output. The next render of the
    /// pair includes it.
    pub fn record(&self, value: impl Into<String>) {
        lock(&self.binding)
            .variables
            .insert(self.variable.clone(), value.into());
    }

    /// Record the value and re-render the output.
    ///
    /// The variable map is updated even when the render fails, so the next
    /// successful render still includes this value. On failure the previous
    /// output is left as it was.
    pub fn try_set(&self, value: impl Into<String>) -> QuillResult<()> {
        // Held for the whole read-template/write-output sequence so renders of
        // the same pair never interleave.
        let mut binding = lock(&self.binding);
        binding.variables.insert(self.variable.clone(), value.into());

        let key = &binding.key;
        let template = std::fs::read_to_string(&key.template).map_err(|source| {
            QuillError::TemplateIo {
                template: key.template.clone(),
                output: key.output.clone(),
                source,
            }
        })?;

        let rendered = substitute(&template, &binding.variables);

        write_output(&key.output, &rendered).map_err(|source| QuillError::TemplateIo {
            template: key.template.clone(),
            output: key.output.clone(),
            source,
        })?;

        debug!(
            output = %key.output.display(),
            variable = %self.variable,
            bound = binding.variables.len(),
            "Rendered template"
        );
        Ok(())
    }

    /// Adapt into a plain string callback
    pub fn into_fn(self) -> impl Fn(&str) + Send + Sync + 'static {
        move |value| self.set(value)
    }
}

fn write_output(output: &Path, rendered: &str) -> std::io::Result<()> {
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(output, rendered)
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_binds_share_pair_state() {
        let dir = TempDir::new().unwrap();
        let template = dir.path().join("t");
        let output = dir.path().join("o");
        std::fs::write(&template, "%a% %b%").unwrap();

        let binder = TemplateBinder::new();
        binder.bind(&template, &output, "a").set("1");
        binder.bind(&template, &output, "b").set("2");

        assert_eq!(binder.bindings().len(), 1);
        let variables = binder.variables(&template, &output).unwrap();
        assert_eq!(variables.len(), 2);
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "1 2");
    }

    #[test]
    fn test_distinct_outputs_are_distinct_bindings() {
        let dir = TempDir::new().unwrap();
        let template = dir.path().join("t");
        std::fs::write(&template, "%a%").unwrap();

        let binder = TemplateBinder::new();
        binder.bind(&template, dir.path().join("o1"), "a").set("x");
        binder.bind(&template, dir.path().join("o2"), "a").set("y");

        assert_eq!(binder.bindings().len(), 2);
        assert_eq!(std::fs::read_to_string(dir.path().join("o1")).unwrap(), "x");
        assert_eq!(std::fs::read_to_string(dir.path().join("o2")).unwrap(), "y");
    }

    #[test]
    fn test_record_does_not_render() {
        let dir = TempDir::new().unwrap();
        let template = dir.path().join("t.txt");
        let output = dir.path().join("out.txt");
        std::fs::write(&template, "%a% %b%").unwrap();
        std::fs::write(&output, "user edits").unwrap();

        let binder = TemplateBinder::new();
        binder.bind(&template, &output, "a").record("1");
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "user edits");

        binder.bind(&template, &output, "b").set("2");
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "1 2");
    }

    #[test]
    fn test_unknown_binding_has_no_variables() {
        let binder = TemplateBinder::new();
        assert!(binder
            .variables(Path::new("nope"), Path::new("nothing"))
            .is_none());
    }
}
