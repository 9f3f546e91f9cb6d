use serde::Serialize;
use utoipa::ToSchema;

use crate::store::Record;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatedOrder {
    pub order_id: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub order_id: String,
    /// Only the fields whose value actually changed, keyed by column name.
    #[schema(value_type = Object)]
    pub updated_fields: Record,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub order_id: String,
    pub deleted_at: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RestoreResult {
    pub order_id: String,
    pub restored_at: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceResult {
    pub invoice_number: String,
    pub order_id: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LogsData {
    #[schema(value_type = Vec<Object>)]
    pub updates: Vec<Record>,
    #[schema(value_type = Vec<Object>)]
    pub deletes: Vec<Record>,
}
