//! Template binding protocol.
//!
//! A component's template carries two binding syntaxes: interpolation
//! placeholders (`{{name}}`, `{{name()}}`) and interaction-handler
//! attributes (`(click)="name()"`). This module validates them against
//! the component's declared members and rewrites the template into
//! markup whose binding sites are addressable by application-unique
//! identifiers.
//!
//! The component tree builder consumes the rewritten markup and the
//! binding tables; see `tree`.

mod bindings;
mod extract;

pub use bindings::{BindingIds, EventHandler, MemberTable, PropertySource, SourceKind};
pub use extract::{
    element_id, extract_events, extract_properties, EventBinding, PropertyBinding, ID_PREFIX,
};
