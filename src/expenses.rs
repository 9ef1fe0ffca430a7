//! Expense Gateway: create, list and delete records in the expenses collection

use serde_json::Value;
use std::sync::Arc;
use tracing::info;

use crate::error::GatewayError;
use crate::models::{AddExpenseRequest, NewExpense};
use crate::store::{Document, DocumentStore, EXPENSES_COLLECTION};

/// Message returned for any malformed expense body
pub const INVALID_DATA: &str = "Invalid data";

/// Thin pass-through over the expenses collection
#[derive(Clone)]
pub struct ExpenseGateway {
    store: Arc<dyn DocumentStore>,
}

impl ExpenseGateway {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Validate and store one expense; no duplicate detection
    pub async fn add(&self, request: AddExpenseRequest) -> Result<Document, GatewayError> {
        let expense = validate(request)?;
        let doc = self
            .store
            .create(EXPENSES_COLLECTION, expense.into_fields())
            .await?;

        info!(id = %doc.id, "expense added");
        Ok(doc)
    }

    /// Every expense, or only those belonging to `user_id`
    pub async fn list(&self, user_id: Option<&str>) -> Result<Vec<Document>, GatewayError> {
        let docs = match user_id.filter(|id| !id.is_empty()) {
            Some(id) => {
                self.store
                    .find_by(EXPENSES_COLLECTION, "userId", &Value::String(id.to_string()))
                    .await?
            }
            None => self.store.list(EXPENSES_COLLECTION).await?,
        };
        Ok(docs)
    }

    /// Delete by id; absent ids are not an error
    pub async fn delete(&self, id: &str) -> Result<(), GatewayError> {
        self.store.delete(EXPENSES_COLLECTION, id).await?;
        info!(id, "expense deleted");
        Ok(())
    }
}

/// Presence check only: `amount` and `category` must be sent, with any value
fn validate(request: AddExpenseRequest) -> Result<NewExpense, GatewayError> {
    let (amount, category) = match (request.amount, request.category) {
        (Some(amount), Some(category)) => (amount, category),
        _ => return Err(GatewayError::Validation(INVALID_DATA.to_string())),
    };

    Ok(NewExpense {
        amount,
        category,
        note: request.note.unwrap_or_else(|| Value::String(String::new())),
        timestamp: request.timestamp.unwrap_or(Value::Null),
        user_id: request.user_id,
    })
}
