use utoipa::{OpenApi, openapi::OpenApi as OpenApiSpec};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::orders::{
        CreatedOrder, DeleteResult, InvoiceResult, LogsData, RestoreResult, UpdateResult,
    },
    response::ApiResponse,
    routes::{assets, health, orders},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        orders::gateway_get,
        orders::gateway_post,
        assets::serve_asset,
    ),
    components(
        schemas(
            health::HealthData,
            CreatedOrder,
            UpdateResult,
            DeleteResult,
            RestoreResult,
            InvoiceResult,
            LogsData,
            ApiResponse<CreatedOrder>,
            ApiResponse<UpdateResult>,
            ApiResponse<DeleteResult>,
            ApiResponse<RestoreResult>,
            ApiResponse<InvoiceResult>,
            ApiResponse<LogsData>,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Gateway", description = "Action-dispatched order operations"),
        (name = "Assets", description = "Cache-first dashboard assets"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
