//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/categories/{category_id}', use [format_endpoint].

/// The route for creating a user.
pub const SIGN_UP: &str = "/users/signUp";
/// The route for signing in a user.
pub const SIGN_IN: &str = "/users/signIn";
/// The route for signing out the current user.
pub const SIGN_OUT: &str = "/users/signOut";
/// The route for checking whether the client is signed in.
pub const CHECK_SIGNED_IN: &str = "/users/checkSignedIn";
/// The route for listing and creating categories.
pub const CATEGORIES: &str = "/categories";
/// The route to access a single category.
pub const CATEGORY: &str = "/categories/{category_id}";
/// The route for listing and creating budgets.
pub const BUDGETS: &str = "/budgets";
/// The route to access a single budget.
pub const BUDGET: &str = "/budgets/{budget_id}";
/// The route for listing and creating transactions.
pub const TRANSACTIONS: &str = "/transactions";
/// The route to access a single transaction.
pub const TRANSACTION: &str = "/transactions/{transaction_id}";
/// The route for getting an anti-forgery token.
pub const CSRF: &str = "/csrf";
/// The route for checking that the server is up.
pub const HEALTH: &str = "/health";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/budgets/{budget_id}', '{budget_id}' is the parameter.
///
/// This function assumes that an endpoint path contains at most one parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map_or(endpoint_path.len(), |offset| param_start + offset + 1);

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
