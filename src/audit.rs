use chrono::Local;
use serde_json::{Value, json};

use crate::{
    error::AppResult,
    schema::{
        COL_DELETE_PAYLOAD, COL_DELETE_TIMESTAMP, COL_ORDER_ID, COL_RESTORED, DELETE_LOGS_TABLE,
        UPDATE_LOGS_TABLE,
    },
    store::{Record, RowStore, cell_text},
};

/// Timestamp format used inside records (order creation, log rows). The
/// envelope timestamp is RFC 3339 and lives in [`crate::response`].
pub fn record_timestamp() -> String {
    Local::now().format("%d/%m/%Y, %H:%M:%S").to_string()
}

/// Append an update-log row. Best-effort: a failure here is warned about and
/// swallowed so it can never fail the update that triggered it.
pub fn log_update(store: &RowStore, before: &Record, changed: &Record, editor: &str, order_id: &str) {
    if let Err(err) = try_log_update(store, before, changed, editor, order_id) {
        tracing::warn!(error = %err, order_id, "update audit log failed");
    }
}

/// Append a delete-log row with the full snapshot and a "not restored" flag.
/// Same best-effort policy as [`log_update`].
pub fn log_delete(store: &RowStore, snapshot: &Record, editor: &str) {
    if let Err(err) = try_log_delete(store, snapshot, editor) {
        let order_id = snapshot
            .get(COL_ORDER_ID)
            .and_then(Value::as_str)
            .unwrap_or_default();
        tracing::warn!(error = %err, order_id, "delete audit log failed");
    }
}

fn try_log_update(
    store: &RowStore,
    before: &Record,
    changed: &Record,
    editor: &str,
    order_id: &str,
) -> AppResult<()> {
    let order_id = if order_id.is_empty() {
        before.get(COL_ORDER_ID).map(cell_text).unwrap_or_default()
    } else {
        order_id.to_string()
    };

    let mut entry = Record::new();
    entry.insert("توقيت التعديل".into(), json!(record_timestamp()));
    entry.insert("تم التعديل بواسطة".into(), json!(editor));
    entry.insert(COL_ORDER_ID.into(), json!(order_id));
    entry.insert(
        "بيانات الطلب (قبل)".into(),
        json!(serde_json::to_string(before).unwrap_or_default()),
    );
    entry.insert(
        "بيانات الطلب (بعد)".into(),
        json!(serde_json::to_string(changed).unwrap_or_default()),
    );

    store.append_row(UPDATE_LOGS_TABLE, &entry)
}

fn try_log_delete(store: &RowStore, snapshot: &Record, editor: &str) -> AppResult<()> {
    let order_id = snapshot.get(COL_ORDER_ID).map(cell_text).unwrap_or_default();

    let mut entry = Record::new();
    entry.insert(COL_DELETE_TIMESTAMP.into(), json!(record_timestamp()));
    entry.insert("تم الحذف بواسطة".into(), json!(editor));
    entry.insert(COL_ORDER_ID.into(), json!(order_id));
    entry.insert(
        COL_DELETE_PAYLOAD.into(),
        json!(serde_json::to_string(snapshot).unwrap_or_default()),
    );
    entry.insert(COL_RESTORED.into(), json!("لا"));

    store.append_row(DELETE_LOGS_TABLE, &entry)
}
