//! Template binding
//!
//! A [`TemplateBinder`] keeps generated files in sync with a set of named
//! values. Each (template, output) pair aggregates every variable ever bound
//! to it; setting any one of them re-renders the whole output from the
//! pristine template, so the result never depends on the order in which
//! variables changed.

mod binder;
mod substitute;

pub use binder::{BindingKey, TemplateBinder, VariableSetter};
pub use substitute::{placeholder, substitute};
