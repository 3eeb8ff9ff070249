use utoipa::OpenApi;

/// Aggregated OpenAPI schema for the loyalty API, mounted by
/// `axum_helpers::server::create_router` under `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    components(schemas(
        domain_users::Credentials,
        domain_orders::OrderStatus,
        domain_orders::handlers::OrderResponse,
        domain_orders::handlers::BalanceResponse,
        domain_orders::handlers::WithdrawRequest,
        domain_orders::handlers::WithdrawalResponse,
    )),
    tags(
        (name = "users", description = "Registration and login"),
        (name = "orders", description = "Order submission, balance, withdrawals"),
    )
)]
pub struct ApiDoc;
