// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::db::SqlStore;
use crate::locale::Locale;

/// Shared state of all HTTP route handlers.
#[derive(Clone, Debug)]
pub struct HttpServiceContext {
    /// SQL database.
    pub store: SqlStore,

    /// Locale assigned to sheet records created without an explicit one.
    pub default_locale: Locale,
}

impl HttpServiceContext {
    /// Returns a new instance of `HttpServiceContext`.
    pub fn new(store: SqlStore, default_locale: Locale) -> Self {
        Self {
            store,
            default_locale,
        }
    }
}
