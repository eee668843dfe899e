//! Template binding extraction.
//!
//! Extraction scans a component's template for the two binding syntaxes,
//! validates every referenced name against the component's member table,
//! and rewrites the template into a DOM-attachable form where each
//! binding site is addressable by a unique identifier.
//!
//! Supported syntax:
//!
//! - `{{name}}` interpolates a plain value property.
//! - `{{name()}}` interpolates a signal-backed property.
//! - `(click)="name()"` invokes a zero-argument handler on click.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::MountError;

use super::bindings::{BindingIds, MemberTable};

/// Prefix for rewritten binding element ids.
pub const ID_PREFIX: &str = "ng-";

static PROPERTY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{([a-zA-Z_][a-zA-Z0-9_-]*)(\(\))?\}\}").expect("property pattern")
});

static EVENT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\(click\)="([a-zA-Z_][a-zA-Z0-9_-]*)\(\)""#).expect("event pattern")
});

/// A property interpolation site found in a template.
#[derive(Debug, Clone)]
pub struct PropertyBinding {
    /// Application-unique binding identifier.
    pub id: u64,

    /// The member name the site refers to.
    pub name: String,

    /// Whether the template used the invocation form `{{name()}}`.
    pub invoked: bool,

    /// The member's text at extraction time.
    pub value: String,
}

/// An event handler site found in a template.
#[derive(Debug, Clone)]
pub struct EventBinding {
    /// Application-unique binding identifier.
    pub id: u64,

    /// The handler member name.
    pub method: String,
}

/// The element id carried by a rewritten binding site.
pub fn element_id(id: u64) -> String {
    format!("{ID_PREFIX}{id}")
}

/// Scan `template` for property interpolations, validate them against
/// `members`, and rewrite each site into an addressable span.
///
/// Sites are processed in template order. Replacement substitutes the
/// first remaining occurrence of the matched text, one site at a time, so
/// syntactically identical interpolations still get distinct identifiers.
pub fn extract_properties(
    component: &'static str,
    members: &MemberTable,
    template: &str,
    ids: &BindingIds,
) -> Result<(Vec<PropertyBinding>, String), MountError> {
    let mut bindings = Vec::new();
    let mut html = template.to_owned();

    for captures in PROPERTY_PATTERN.captures_iter(template) {
        let site = &captures[0];
        let name = &captures[1];
        let invoked = captures.get(2).is_some();

        let source = members
            .property(name)
            .ok_or_else(|| MountError::UnknownMember {
                component,
                name: name.to_owned(),
            })?;
        if invoked && !source.is_signal_backed() {
            return Err(MountError::NotSignalBacked {
                component,
                name: name.to_owned(),
            });
        }

        let id = ids.next();
        let value = source.read();
        tracing::trace!(component, name, id, invoked, "extracted property binding");

        let span = format!("<span id=\"{}\">{}</span>", element_id(id), value);
        html = html.replacen(site, &span, 1);

        bindings.push(PropertyBinding {
            id,
            name: name.to_owned(),
            invoked,
            value,
        });
    }

    Ok((bindings, html))
}

/// Scan `template` for `(click)` handler attributes, validate the handler
/// names, and rewrite each attribute into an addressable element id.
pub fn extract_events(
    component: &'static str,
    members: &MemberTable,
    template: &str,
    ids: &BindingIds,
) -> Result<(Vec<EventBinding>, String), MountError> {
    let mut bindings = Vec::new();
    let mut html = template.to_owned();

    for captures in EVENT_PATTERN.captures_iter(template) {
        let site = &captures[0];
        let method = &captures[1];

        if members.event_handler(method).is_none() {
            return Err(MountError::UnknownMember {
                component,
                name: method.to_owned(),
            });
        }

        let id = ids.next();
        tracing::trace!(component, method, id, "extracted event binding");

        let attr = format!("id=\"{}\"", element_id(id));
        html = html.replacen(site, &attr, 1);

        bindings.push(EventBinding {
            id,
            method: method.to_owned(),
        });
    }

    Ok((bindings, html))
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
