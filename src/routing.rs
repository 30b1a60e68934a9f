//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Json, Router,
    http::{HeaderName, HeaderValue, Method, header::CONTENT_TYPE},
    middleware,
    routing::get,
    routing::post,
};
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;

use crate::{
    AppState,
    auth::auth_guard,
    budget::{
        create_budget_endpoint, delete_budget_endpoint, get_budget_endpoint,
        list_budgets_endpoint, update_budget_endpoint,
    },
    category::{
        create_category_endpoint, delete_category_endpoint, get_category_endpoint,
        list_categories_endpoint, update_category_endpoint,
    },
    csrf::{CSRF_HEADER, csrf_guard, get_csrf_token},
    endpoints,
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, get_transaction_endpoint,
        list_transactions_endpoint, update_transaction_endpoint,
    },
    user::{check_signed_in_endpoint, sign_in_endpoint, sign_out_endpoint, sign_up_endpoint},
};

/// Return a router with all the app's routes.
///
/// Every state changing route checks the anti-forgery token. The category,
/// budget and transaction routes check the auth cookie first.
pub fn build_router(state: AppState) -> Router {
    let user_routes = Router::new()
        .route(endpoints::SIGN_UP, post(sign_up_endpoint))
        .route(endpoints::SIGN_IN, post(sign_in_endpoint))
        .route(endpoints::SIGN_OUT, post(sign_out_endpoint))
        .route_layer(middleware::from_fn_with_state(state.clone(), csrf_guard))
        .route(endpoints::CHECK_SIGNED_IN, get(check_signed_in_endpoint));

    let protected_routes = Router::new()
        .merge(category_routes())
        .merge(budget_routes())
        .merge(transaction_routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), csrf_guard))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    Router::new()
        .route(endpoints::CSRF, get(get_csrf_token))
        .route(endpoints::HEALTH, get(get_health))
        .merge(user_routes)
        .merge(protected_routes)
        .with_state(state)
}

fn category_routes() -> Router<AppState> {
    Router::new()
        .route(
            endpoints::CATEGORIES,
            get(list_categories_endpoint).post(create_category_endpoint),
        )
        .route(
            endpoints::CATEGORY,
            get(get_category_endpoint)
                .patch(update_category_endpoint)
                .delete(delete_category_endpoint),
        )
}

fn budget_routes() -> Router<AppState> {
    Router::new()
        .route(
            endpoints::BUDGETS,
            get(list_budgets_endpoint).post(create_budget_endpoint),
        )
        .route(
            endpoints::BUDGET,
            get(get_budget_endpoint)
                .patch(update_budget_endpoint)
                .delete(delete_budget_endpoint),
        )
}

fn transaction_routes() -> Router<AppState> {
    Router::new()
        .route(
            endpoints::TRANSACTIONS,
            get(list_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            get(get_transaction_endpoint)
                .patch(update_transaction_endpoint)
                .delete(delete_transaction_endpoint),
        )
}

/// Allow the web client at `client_origin` to call the API with its cookies.
pub fn cors_layer(client_origin: HeaderValue) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(client_origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([CONTENT_TYPE, HeaderName::from_static(CSRF_HEADER)])
}

async fn get_health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}
