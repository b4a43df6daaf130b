// SPDX-License-Identifier: AGPL-3.0-or-later

use std::ops::Deref;
use std::sync::Arc;

use crate::config::Configuration;
use crate::db::traits::SheetStore;
use crate::db::SqlStore;

/// Inner data shared across the whole application.
#[derive(Debug)]
pub struct Data<S: SheetStore> {
    /// Service configuration.
    pub config: Configuration,

    /// Sheet record storage with database connection pool.
    pub store: S,
}

impl<S: SheetStore> Data<S> {
    /// Returns new instance of `Data`.
    pub fn new(store: S, config: Configuration) -> Self {
        Self { config, store }
    }
}

/// Data shared across the whole application.
#[derive(Debug)]
pub struct Context<S: SheetStore = SqlStore>(pub Arc<Data<S>>);

impl<S: SheetStore> Context<S> {
    /// Returns a new instance of `Context`.
    pub fn new(store: S, config: Configuration) -> Self {
        Self(Arc::new(Data::new(store, config)))
    }
}

impl<S: SheetStore> Clone for Context<S> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<S: SheetStore> Deref for Context<S> {
    type Target = Data<S>;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}
