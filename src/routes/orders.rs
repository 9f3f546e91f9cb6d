use axum::{
    Json, Router,
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use serde_json::{Value, json};
use std::collections::HashMap;

use crate::{
    error::{AppError, AppResult},
    response::ApiResponse,
    services::order_service,
    state::AppState,
    store::{Record, number_value},
};

const DEFAULT_USER: &str = "غير محدد";
const SYSTEM_USER: &str = "النظام";

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(gateway_get).post(gateway_post))
}

/// GET gateway: dispatches on the `action` query parameter.
#[utoipa::path(
    get,
    path = "/api/gateway",
    params(
        ("action" = String, Query, description = "getOrders | getLogs | getOrder"),
        ("orderId" = Option<String>, Query, description = "Required for getOrder"),
    ),
    responses((status = 200, description = "Envelope with the requested data", body = Object)),
    tag = "Gateway"
)]
pub async fn gateway_get(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let action = params.get("action").map(String::as_str).unwrap_or_default();
    match action {
        "getOrders" => respond(order_service::get_orders(&state).await),
        "getLogs" => respond(order_service::get_logs(&state).await),
        "getOrder" => {
            let order_id = params.get("orderId").map(String::as_str).unwrap_or_default();
            respond(order_service::get_order(&state, order_id).await)
        }
        other => AppError::Validation(format!("Unknown action: {other}")).into_response(),
    }
}

/// POST gateway: JSON or urlencoded-form body. With an `action` field the
/// payload is dispatched to the matching operation; without one it is treated
/// as a legacy bare form submission that creates an order.
#[utoipa::path(
    post,
    path = "/api/gateway",
    request_body = Object,
    responses((status = 200, description = "Envelope with the operation result", body = Object)),
    tag = "Gateway"
)]
pub async fn gateway_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let payload = match parse_body(&headers, &body) {
        Ok(payload) => payload,
        Err(err) => return err.into_response(),
    };
    tracing::debug!(payload = %payload, "gateway request");

    match payload.get("action").and_then(Value::as_str) {
        Some(action) => dispatch_action(&state, action, &payload).await,
        None => legacy_form_submission(&state, &payload).await,
    }
}

async fn dispatch_action(state: &AppState, action: &str, payload: &Value) -> Response {
    let user = text_field(payload, "user");
    let user = if user.is_empty() { DEFAULT_USER } else { user.as_str() };
    let record = record_payload(payload);

    match action {
        "createOrder" => respond(order_service::create_order(state, record, user).await),
        "updateOrder" => {
            let order_id = text_field(payload, "orderId");
            respond(order_service::update_order(state, &order_id, record, user).await)
        }
        "deleteOrder" => {
            let order_id = text_field(payload, "orderId");
            respond(order_service::delete_order(state, &order_id, user).await)
        }
        "restoreOrder" => {
            let mut timestamp = text_field(payload, "timestamp");
            if timestamp.is_empty() {
                timestamp = text_field(payload, "logId");
            }
            respond(order_service::restore_order(state, &timestamp, user).await)
        }
        "createInvoice" => {
            let order_id = text_field(payload, "orderId");
            respond(order_service::create_invoice(state, &order_id, user).await)
        }
        other => AppError::Validation(format!("Unknown action: {other}")).into_response(),
    }
}

/// Bare form submission from the public order page: fixed English field names
/// mapped onto the order columns, created on behalf of the system.
async fn legacy_form_submission(state: &AppState, payload: &Value) -> Response {
    let text = |key: &str| text_field(payload, key);
    let number = |key: &str| number_value(text(key).parse::<f64>().unwrap_or(0.0));

    let mut record = Record::new();
    record.insert("الاسم الكامل".into(), json!(text("name")));
    record.insert("رقم الهاتف".into(), json!(text("phone")));
    record.insert("المنتج".into(), json!(text("products")));
    record.insert("سعر المنتجات".into(), number("productPrice"));
    record.insert("تكلفة الشحن".into(), number("shippingCost"));
    record.insert("التكلفة الإجمالية".into(), number("totalCost"));
    record.insert("المنطقة".into(), json!(text("governorate")));
    record.insert("طريقة التوصيل".into(), json!(text("deliveryType")));
    record.insert("العنوان".into(), json!(text("address")));
    record.insert("رابط الموقع".into(), json!(text("siteLink")));

    respond(order_service::create_order(state, record, SYSTEM_USER).await)
}

fn parse_body(headers: &HeaderMap, body: &Bytes) -> AppResult<Value> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if content_type.starts_with("application/json") {
        serde_json::from_slice(body)
            .map_err(|err| AppError::Validation(format!("Invalid JSON body: {err}")))
    } else {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body)
            .map_err(|err| AppError::Validation(format!("Invalid form body: {err}")))?;
        let mut map = serde_json::Map::new();
        for (key, value) in pairs {
            map.insert(key, Value::String(value));
        }
        Ok(Value::Object(map))
    }
}

/// Operation payload: the `data` object when present, else the request body
/// itself. Extra routing fields are ignored downstream.
fn record_payload(payload: &Value) -> Record {
    payload
        .get("data")
        .and_then(Value::as_object)
        .cloned()
        .or_else(|| payload.as_object().cloned())
        .unwrap_or_default()
}

fn text_field(payload: &Value, key: &str) -> String {
    payload
        .get(key)
        .map(crate::store::cell_text)
        .unwrap_or_default()
}

fn respond<T: Serialize>(result: AppResult<ApiResponse<T>>) -> Response {
    match result {
        Ok(envelope) => Json(envelope).into_response(),
        Err(err) => err.into_response(),
    }
}
