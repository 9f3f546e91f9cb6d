use serde_json::json;

use sheet_orders_api::{
    assets::AssetCache,
    schema::{COL_DELETE_TIMESTAMP, COL_ORDER_ID, DELETE_LOGS_TABLE, ORDERS_TABLE},
    services::order_service,
    state::AppState,
    store::{Record, RowStore, Workbook, cell_text},
};

fn test_state() -> AppState {
    AppState {
        store: RowStore::new(Workbook::in_memory()),
        assets: AssetCache::new("test-v1", "assets", ".asset-cache-test"),
    }
}

fn sample_order() -> Record {
    let mut record = Record::new();
    record.insert("الاسم الكامل".into(), json!("عميل تجريبي"));
    record.insert("رقم الهاتف".into(), json!("01234567890"));
    record.insert("المنتج".into(), json!("هدية"));
    record.insert("سعر المنتجات".into(), json!(100));
    record.insert("تكلفة الشحن".into(), json!(20));
    record.insert("التكلفة الإجمالية".into(), json!(120));
    record.insert("المنطقة".into(), json!("القاهرة"));
    record.insert("العنوان".into(), json!("شارع التجربة"));
    record
}

// Integration flow: create -> get -> update -> delete -> restore -> invoice.
#[tokio::test]
async fn create_then_get_returns_identical_fields() -> anyhow::Result<()> {
    let state = test_state();

    let created = order_service::create_order(&state, sample_order(), "المشرف").await?;
    let order_id = created.data.unwrap().order_id;
    assert!(order_id.starts_with("ORD-"));

    let fetched = order_service::get_order(&state, &order_id).await?;
    assert_eq!(fetched.status, "success");
    let order = fetched.data.unwrap();
    assert_eq!(order["الاسم الكامل"], json!("عميل تجريبي"));
    assert_eq!(order["سعر المنتجات"], json!(100));
    assert_eq!(order["حالة الطلب"], json!("طلب جديد"));
    assert_eq!(order["تم الإنشاء بواسطة"], json!("المشرف"));

    let listed = order_service::get_orders(&state).await?;
    assert_eq!(listed.data.unwrap().len(), 1);

    Ok(())
}

#[tokio::test]
async fn update_reports_only_the_fields_that_changed() -> anyhow::Result<()> {
    let state = test_state();
    let created = order_service::create_order(&state, sample_order(), "المشرف").await?;
    let order_id = created.data.unwrap().order_id;

    // Supplying a field with its current value must not count as a change.
    let mut same = Record::new();
    same.insert("الاسم الكامل".into(), json!("عميل تجريبي"));
    let unchanged = order_service::update_order(&state, &order_id, same, "محرر").await?;
    assert!(unchanged.data.unwrap().updated_fields.is_empty());

    let mut changes = Record::new();
    changes.insert("الاسم الكامل".into(), json!("عميل آخر"));
    changes.insert("سعر المنتجات".into(), json!(100)); // unchanged
    changes.insert("حالة الطلب".into(), json!("تم الشحن"));
    let updated = order_service::update_order(&state, &order_id, changes, "محرر").await?;

    let result = updated.data.unwrap();
    assert_eq!(result.updated_fields.len(), 2);
    assert_eq!(result.updated_fields["الاسم الكامل"], json!("عميل آخر"));
    assert_eq!(result.updated_fields["حالة الطلب"], json!("تم الشحن"));

    // Every successful update is audit-logged, the no-change one included.
    let logs = order_service::get_logs(&state).await?.data.unwrap();
    assert_eq!(logs.updates.len(), 2);
    assert_eq!(logs.updates[1]["معرف الطلب"], json!(order_id));

    // The no-change entry carries an empty changed-fields snapshot.
    let first_changed: Record =
        serde_json::from_str(&cell_text(&logs.updates[0]["بيانات الطلب (بعد)"]))?;
    assert!(first_changed.is_empty());
    let second_changed: Record =
        serde_json::from_str(&cell_text(&logs.updates[1]["بيانات الطلب (بعد)"]))?;
    assert_eq!(second_changed.len(), 2);

    Ok(())
}

#[tokio::test]
async fn delete_logs_a_snapshot_and_removes_the_row() -> anyhow::Result<()> {
    let state = test_state();
    let created = order_service::create_order(&state, sample_order(), "المشرف").await?;
    let order_id = created.data.unwrap().order_id;
    let before = order_service::get_order(&state, &order_id).await?.data.unwrap();

    let deleted = order_service::delete_order(&state, &order_id, "محرر").await?;
    assert_eq!(deleted.data.unwrap().order_id, order_id);

    let err = order_service::get_order(&state, &order_id).await.unwrap_err();
    assert!(err.to_string().contains("No orders found") || err.to_string().contains("not found"));

    // The delete-log snapshot carries the full pre-delete field set.
    let logs = order_service::get_logs(&state).await?.data.unwrap();
    assert_eq!(logs.deletes.len(), 1);
    let snapshot: Record =
        serde_json::from_str(&cell_text(&logs.deletes[0]["بيانات الطلب المحذوف"]))?;
    assert_eq!(snapshot, before);
    assert_eq!(logs.deletes[0]["تم الاسترجاع"], json!("لا"));

    Ok(())
}

#[tokio::test]
async fn double_restore_fails_without_duplicating_the_order() -> anyhow::Result<()> {
    let state = test_state();
    let created = order_service::create_order(&state, sample_order(), "المشرف").await?;
    let order_id = created.data.unwrap().order_id;
    order_service::delete_order(&state, &order_id, "محرر").await?;

    let timestamp = delete_log_timestamp(&state);

    let restored = order_service::restore_order(&state, &timestamp, "محرر").await?;
    assert_eq!(restored.data.unwrap().order_id, order_id);
    assert_eq!(order_service::get_orders(&state).await?.data.unwrap().len(), 1);

    let err = order_service::restore_order(&state, &timestamp, "محرر")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Order already restored");
    assert_eq!(order_service::get_orders(&state).await?.data.unwrap().len(), 1);

    Ok(())
}

#[tokio::test]
async fn update_delete_restore_round_trip_keeps_field_values() -> anyhow::Result<()> {
    let state = test_state();
    let created = order_service::create_order(&state, sample_order(), "المشرف").await?;
    let order_id = created.data.unwrap().order_id;

    let mut changes = Record::new();
    changes.insert("العنوان".into(), json!("عنوان جديد"));
    changes.insert("حالة الطلب".into(), json!("قيد التجهيز"));
    order_service::update_order(&state, &order_id, changes, "محرر").await?;

    let before_delete = order_service::get_order(&state, &order_id).await?.data.unwrap();
    order_service::delete_order(&state, &order_id, "محرر").await?;
    let timestamp = delete_log_timestamp(&state);
    order_service::restore_order(&state, &timestamp, "محرر").await?;

    let restored = order_service::get_order(&state, &order_id).await?.data.unwrap();
    assert_eq!(restored["العنوان"], json!("عنوان جديد"));
    assert_eq!(restored["حالة الطلب"], json!("قيد التجهيز"));
    assert_eq!(restored, before_delete);

    Ok(())
}

#[tokio::test]
async fn invoice_number_derives_from_the_order_id() -> anyhow::Result<()> {
    let state = test_state();

    let mut record = sample_order();
    record.insert(COL_ORDER_ID.into(), json!("ORD-1700000000000-42"));
    order_service::create_order(&state, record, "المشرف").await?;

    let invoice =
        order_service::create_invoice(&state, "ORD-1700000000000-42", "المشرف").await?;
    let result = invoice.data.unwrap();
    assert_eq!(result.invoice_number, "INV-1700000000000-42");
    assert_eq!(result.order_id, "ORD-1700000000000-42");

    Ok(())
}

#[tokio::test]
async fn missing_ids_and_unknown_orders_are_rejected() -> anyhow::Result<()> {
    let state = test_state();

    let err = order_service::get_order(&state, "").await.unwrap_err();
    assert_eq!(err.to_string(), "Order ID is required");

    order_service::create_order(&state, sample_order(), "المشرف").await?;

    // Each operation keeps its own not-found wording.
    let err = order_service::get_order(&state, "ORD-0-0").await.unwrap_err();
    assert_eq!(err.to_string(), "Order not found");

    let err = order_service::update_order(&state, "ORD-0-0", Record::new(), "محرر")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Order not found with ID: ORD-0-0");

    let err = order_service::delete_order(&state, "ORD-0-0", "محرر")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Order not found with ID: ORD-0-0");

    let err = order_service::create_invoice(&state, "ORD-0-0", "محرر")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Order not found: ORD-0-0");

    let err = order_service::restore_order(&state, "", "محرر").await.unwrap_err();
    assert_eq!(err.to_string(), "Timestamp is required");

    Ok(())
}

// Orders sheet is only created lazily, so a fresh state lists nothing.
#[tokio::test]
async fn empty_tables_read_as_empty_lists() -> anyhow::Result<()> {
    let state = test_state();
    assert!(order_service::get_orders(&state).await?.data.unwrap().is_empty());

    let logs = order_service::get_logs(&state).await?.data.unwrap();
    assert!(logs.updates.is_empty());
    assert!(logs.deletes.is_empty());

    // Lazy creation seeded the header rows in the background.
    assert_eq!(state.store.headers(ORDERS_TABLE).unwrap().len(), 14);

    Ok(())
}

fn delete_log_timestamp(state: &AppState) -> String {
    let deletes = state.store.read_all(DELETE_LOGS_TABLE).unwrap();
    cell_text(&deletes[deletes.len() - 1][COL_DELETE_TIMESTAMP])
}
