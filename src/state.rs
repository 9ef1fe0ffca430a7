// Shared handles injected into every handler

use std::sync::Arc;

use crate::advisory::AdvisoryGateway;
use crate::expenses::ExpenseGateway;
use crate::llm::ChatProvider;
use crate::store::DocumentStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub expenses: ExpenseGateway,
    pub advisory: AdvisoryGateway,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, provider: Arc<dyn ChatProvider>) -> Self {
        Self {
            expenses: ExpenseGateway::new(store.clone()),
            advisory: AdvisoryGateway::new(store.clone(), provider),
            store,
        }
    }
}
