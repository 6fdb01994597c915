//! Shared application state.

use crate::store::SharedStore;

pub(crate) struct ApiState {
    pub(crate) store: SharedStore,
}

impl ApiState {
    pub(crate) fn new(store: SharedStore) -> Self {
        Self { store }
    }
}
