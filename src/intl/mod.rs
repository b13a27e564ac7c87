// CLASSIFICATION: COMMUNITY
// Filename: mod.rs v0.1
// Author: Lukas Bower
// Date Modified: 2026-10-16

//! Localization lookup shared by the launcher and loaded modules.

pub mod lookup;
pub mod message_ids;

pub use lookup::{l18n, l18n_fmt, IntlError, Layout, Lookup, LookupWithFallback};
pub use message_ids::MessageId;

/// Message id plus positional substitution values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocalizedMessage {
    pub id: MessageId,
    pub args: Vec<String>,
}

impl LocalizedMessage {
    pub fn new(id: MessageId) -> Self {
        Self { id, args: Vec::new() }
    }

    pub fn with_args<I, S>(id: MessageId, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id,
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Resolve through `lookup`.
    pub fn render(&self, lookup: &dyn Lookup) -> String {
        let args: Vec<&str> = self.args.iter().map(String::as_str).collect();
        l18n_fmt(lookup, self.id, &args)
    }
}
