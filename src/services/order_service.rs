use chrono::Utc;
use rand::Rng;
use serde_json::json;

use crate::{
    audit,
    dto::orders::{CreatedOrder, DeleteResult, InvoiceResult, LogsData, RestoreResult, UpdateResult},
    error::{AppError, AppResult},
    response::ApiResponse,
    schema::{
        COL_CREATED_BY, COL_DELETE_PAYLOAD, COL_DELETE_TIMESTAMP, COL_ORDER_ID, COL_ORDER_STATUS,
        COL_ORDER_TIMESTAMP, COL_RESTORED, DELETE_LOGS_TABLE, INVOICES_TABLE, ORDERS_TABLE,
        UPDATE_LOGS_TABLE,
    },
    state::AppState,
    store::{Record, cell_text},
};

const DEFAULT_STATUS: &str = "طلب جديد";
const PAYMENT_PENDING: &str = "في انتظار الدفع";
const RESTORED_YES: &str = "نعم";

/// `ORD-<millisecond epoch>-<random 0..999>`. Uniqueness rests on the
/// collision odds of the scheme; there is no duplicate check on insert.
pub fn generate_order_id() -> String {
    let suffix: u32 = rand::thread_rng().gen_range(0..1000);
    format!("ORD-{}-{}", Utc::now().timestamp_millis(), suffix)
}

pub async fn create_order(
    state: &AppState,
    mut record: Record,
    user: &str,
) -> AppResult<ApiResponse<CreatedOrder>> {
    if record.get(COL_ORDER_ID).map(cell_text).unwrap_or_default().is_empty() {
        record.insert(COL_ORDER_ID.into(), json!(generate_order_id()));
    }
    if record
        .get(COL_ORDER_TIMESTAMP)
        .map(cell_text)
        .unwrap_or_default()
        .is_empty()
    {
        record.insert(COL_ORDER_TIMESTAMP.into(), json!(audit::record_timestamp()));
    }
    record.insert(COL_CREATED_BY.into(), json!(user));
    if record
        .get(COL_ORDER_STATUS)
        .map(cell_text)
        .unwrap_or_default()
        .is_empty()
    {
        record.insert(COL_ORDER_STATUS.into(), json!(DEFAULT_STATUS));
    }

    let order_id = record.get(COL_ORDER_ID).map(cell_text).unwrap_or_default();
    state.store.append_row(ORDERS_TABLE, &record)?;
    tracing::info!(order_id, "order created");

    Ok(ApiResponse::success(
        "Order created successfully",
        CreatedOrder { order_id },
    ))
}

pub async fn get_order(state: &AppState, order_id: &str) -> AppResult<ApiResponse<Record>> {
    let (_, order) = locate_order(state, order_id, |_| "Order not found".to_string())?;
    Ok(ApiResponse::success("Order retrieved successfully", order))
}

pub async fn get_orders(state: &AppState) -> AppResult<ApiResponse<Vec<Record>>> {
    // Same degrade as the log tables: a broken read answers with an empty
    // list instead of failing the request.
    let orders = state.store.read_all(ORDERS_TABLE).unwrap_or_else(|err| {
        tracing::warn!(error = %err, table = ORDERS_TABLE, "orders read failed");
        Vec::new()
    });
    Ok(ApiResponse::success("Orders retrieved successfully", orders))
}

pub async fn get_logs(state: &AppState) -> AppResult<ApiResponse<LogsData>> {
    // A broken log table degrades to an empty list rather than failing the
    // whole request.
    let read = |table: &str| {
        state.store.read_all(table).unwrap_or_else(|err| {
            tracing::warn!(error = %err, table, "log table read failed");
            Vec::new()
        })
    };
    let logs = LogsData {
        updates: read(UPDATE_LOGS_TABLE),
        deletes: read(DELETE_LOGS_TABLE),
    };
    Ok(ApiResponse::success("Logs retrieved successfully", logs))
}

pub async fn update_order(
    state: &AppState,
    order_id: &str,
    new_fields: Record,
    editor: &str,
) -> AppResult<ApiResponse<UpdateResult>> {
    let (row_idx, before) = locate_order(state, order_id, missing_with_id)?;
    let headers = state.store.headers(ORDERS_TABLE)?;

    // Apply only the supplied fields whose value actually differs; everything
    // else keeps its stored value.
    let mut after = before.clone();
    let mut updated = Record::new();
    for header in &headers {
        if let Some(value) = new_fields.get(header) {
            let current = before.get(header).map(cell_text).unwrap_or_default();
            if cell_text(value) != current {
                after.insert(header.clone(), value.clone());
                updated.insert(header.clone(), value.clone());
            }
        }
    }

    state.store.update_row(ORDERS_TABLE, row_idx, &after)?;
    audit::log_update(&state.store, &before, &updated, editor, order_id);
    tracing::info!(order_id, changed = updated.len(), "order updated");

    Ok(ApiResponse::success(
        "Order updated successfully",
        UpdateResult {
            order_id: order_id.to_string(),
            updated_fields: updated,
        },
    ))
}

pub async fn delete_order(
    state: &AppState,
    order_id: &str,
    editor: &str,
) -> AppResult<ApiResponse<DeleteResult>> {
    let (row_idx, snapshot) = locate_order(state, order_id, missing_with_id)?;

    // Log first, delete second: a crash in between leaves an orphan log entry
    // but never an unrecoverable delete.
    audit::log_delete(&state.store, &snapshot, editor);
    state.store.delete_row(ORDERS_TABLE, row_idx)?;
    tracing::info!(order_id, "order deleted");

    Ok(ApiResponse::success(
        "Order deleted successfully",
        DeleteResult {
            order_id: order_id.to_string(),
            deleted_at: audit::record_timestamp(),
        },
    ))
}

pub async fn restore_order(
    state: &AppState,
    timestamp: &str,
    _editor: &str,
) -> AppResult<ApiResponse<RestoreResult>> {
    if timestamp.is_empty() {
        return Err(AppError::Validation("Timestamp is required".into()));
    }

    state.store.open_table(DELETE_LOGS_TABLE)?;
    let idx_time = state.store.column_index(DELETE_LOGS_TABLE, COL_DELETE_TIMESTAMP)?;
    let idx_payload = state.store.column_index(DELETE_LOGS_TABLE, COL_DELETE_PAYLOAD)?;
    let (Some(idx_time), Some(_)) = (idx_time, idx_payload) else {
        return Err(AppError::Schema("Required log headers missing".into()));
    };

    if state.store.row_count(DELETE_LOGS_TABLE)? == 0 {
        return Err(AppError::NotFound("No delete logs found".into()));
    }

    // The delete timestamp is the only lookup key; with duplicate timestamps
    // the first match wins.
    let log_idx = state
        .store
        .find_row(DELETE_LOGS_TABLE, idx_time, timestamp)?
        .ok_or_else(|| {
            AppError::NotFound(format!("Delete log not found for timestamp: {timestamp}"))
        })?;
    let entry = state.store.row_record(DELETE_LOGS_TABLE, log_idx)?;

    let idx_restored = state.store.column_index(DELETE_LOGS_TABLE, COL_RESTORED)?;
    if idx_restored.is_some()
        && entry.get(COL_RESTORED).map(cell_text).unwrap_or_default() == RESTORED_YES
    {
        return Err(AppError::AlreadyRestored);
    }

    let payload = entry.get(COL_DELETE_PAYLOAD).map(cell_text).unwrap_or_default();
    let snapshot: Record = serde_json::from_str(&payload)
        .map_err(|_| AppError::Parse("Failed to parse order data from log".into()))?;

    // Re-append the snapshot as a brand-new row, keeping whatever id it
    // carried; then flip the restored flag.
    state.store.append_row(ORDERS_TABLE, &snapshot)?;
    if let Some(idx_restored) = idx_restored {
        state
            .store
            .set_cell(DELETE_LOGS_TABLE, log_idx, idx_restored, json!(RESTORED_YES))?;
    }

    let order_id = snapshot.get(COL_ORDER_ID).map(cell_text).unwrap_or_default();
    tracing::info!(order_id, timestamp, "order restored");

    Ok(ApiResponse::success(
        "Order restored successfully",
        RestoreResult {
            order_id,
            restored_at: audit::record_timestamp(),
        },
    ))
}

pub async fn create_invoice(
    state: &AppState,
    order_id: &str,
    user: &str,
) -> AppResult<ApiResponse<InvoiceResult>> {
    // Any lookup miss, including an empty table, answers with the invoice
    // flavor of the not-found text.
    let (_, order) = locate_order(state, order_id, missing_with_id).map_err(|err| match err {
        AppError::NotFound(_) => AppError::NotFound(format!("Order not found: {order_id}")),
        other => other,
    })?;
    let invoice_number = build_invoice_number(order_id);

    let field = |key: &str| order.get(key).cloned().unwrap_or_else(|| json!(""));
    let mut invoice = Record::new();
    invoice.insert("رقم الفاتورة".into(), json!(invoice_number));
    invoice.insert("تاريخ الفاتورة".into(), json!(audit::record_timestamp()));
    invoice.insert("معرف الطلب".into(), json!(order_id));
    invoice.insert("اسم العميل".into(), field("الاسم الكامل"));
    invoice.insert("رقم الهاتف".into(), field("رقم الهاتف"));
    invoice.insert("المنتجات".into(), field("المنتج"));
    invoice.insert("سعر المنتجات".into(), field("سعر المنتجات"));
    invoice.insert("تكلفة الشحن".into(), field("تكلفة الشحن"));
    invoice.insert("المبلغ الإجمالي".into(), field("التكلفة الإجمالية"));
    invoice.insert("العنوان".into(), field("العنوان"));
    invoice.insert("المنطقة".into(), field("المنطقة"));
    invoice.insert("حالة الدفع".into(), json!(PAYMENT_PENDING));
    invoice.insert("تم الإنشاء بواسطة".into(), json!(user));

    state.store.append_row(INVOICES_TABLE, &invoice)?;
    tracing::info!(order_id, invoice_number, "invoice created");

    Ok(ApiResponse::success(
        "Invoice created successfully",
        InvoiceResult {
            invoice_number,
            order_id: order_id.to_string(),
        },
    ))
}

/// `INV-<order id minus its "ORD-" prefix>`.
fn build_invoice_number(order_id: &str) -> String {
    format!("INV-{}", order_id.strip_prefix("ORD-").unwrap_or(order_id))
}

fn missing_with_id(order_id: &str) -> String {
    format!("Order not found with ID: {order_id}")
}

/// Shared lookup: validates the id, resolves the id column, scans the table.
/// `missing` supplies the not-found text, which differs per operation.
fn locate_order(
    state: &AppState,
    order_id: &str,
    missing: fn(&str) -> String,
) -> AppResult<(usize, Record)> {
    if order_id.is_empty() {
        return Err(AppError::Validation("Order ID is required".into()));
    }

    state.store.open_table(ORDERS_TABLE)?;
    let idx_id = state
        .store
        .column_index(ORDERS_TABLE, COL_ORDER_ID)?
        .ok_or_else(|| AppError::Schema("Order ID column not found".into()))?;

    if state.store.row_count(ORDERS_TABLE)? == 0 {
        return Err(AppError::NotFound("No orders found".into()));
    }

    let row_idx = state
        .store
        .find_row(ORDERS_TABLE, idx_id, order_id)?
        .ok_or_else(|| AppError::NotFound(missing(order_id)))?;
    let record = state.store.row_record(ORDERS_TABLE, row_idx)?;
    Ok((row_idx, record))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_id_matches_expected_shape() {
        let id = generate_order_id();
        let mut parts = id.splitn(3, '-');
        assert_eq!(parts.next(), Some("ORD"));
        let millis = parts.next().unwrap();
        let suffix = parts.next().unwrap();
        assert!(millis.chars().all(|c| c.is_ascii_digit()));
        assert!(suffix.chars().all(|c| c.is_ascii_digit()));
        assert!(suffix.parse::<u32>().unwrap() < 1000);
    }

    #[test]
    fn invoice_number_drops_the_order_prefix() {
        assert_eq!(
            build_invoice_number("ORD-1700000000000-42"),
            "INV-1700000000000-42"
        );
        assert_eq!(build_invoice_number("CUSTOM-7"), "INV-CUSTOM-7");
    }
}
