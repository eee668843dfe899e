//! Error taxonomy for template extraction and mounting.
//!
//! Every error in this crate is a programmer error: a template referencing
//! a member the component never declared, or a binding form that does not
//! match the declared member kind. There are no transient failures and no
//! retries; a failed extraction aborts the mount of the offending
//! component.

use thiserror::Error;

/// Errors raised while extracting template bindings or mounting a
/// component tree.
#[derive(Debug, Error)]
pub enum MountError {
    /// A template interpolation or handler attribute referenced a member
    /// the component never declared.
    #[error("`{name}` is not a declared member of `{component}`")]
    UnknownMember {
        /// Short type name of the component whose template failed.
        component: &'static str,
        /// The member name as written in the template.
        name: String,
    },

    /// A template used the invocation form `{{name()}}` on a member that
    /// is a plain value rather than a signal.
    #[error("`{name}` on `{component}` is a plain value but the template invokes it as a signal")]
    NotSignalBacked {
        /// Short type name of the component whose template failed.
        component: &'static str,
        /// The member name as written in the template.
        name: String,
    },
}
