//! The sign-out endpoint.

use axum::{Json, extract::State};
use axum_extra::extract::PrivateCookieJar;

use crate::{
    auth::invalidate_auth_cookie,
    user::{MessageResponse, UserState},
};

/// Invalidate the auth cookie.
///
/// Signing out without being signed in is not an error.
pub async fn sign_out_endpoint(
    State(state): State<UserState>,
    jar: PrivateCookieJar,
) -> (PrivateCookieJar, Json<MessageResponse>) {
    let jar = invalidate_auth_cookie(jar, &state.cookie_settings);

    (jar, Json(MessageResponse::new("Signed out successfully.")))
}

#[cfg(test)]
mod sign_out_endpoint_tests {
    use axum::{Router, extract::FromRef, routing::post};
    use axum_test::TestServer;
    use time::{Duration, OffsetDateTime};

    use crate::{
        auth::COOKIE_TOKEN,
        test_utils::get_test_app_state,
        user::{UserState, sign_out_endpoint},
    };

    #[tokio::test]
    async fn sign_out_clears_the_auth_cookie() {
        let state = UserState::from_ref(&get_test_app_state());
        let app = Router::new()
            .route("/users/signOut", post(sign_out_endpoint))
            .with_state(state);
        let server = TestServer::new(app);

        let response = server.post("/users/signOut").await;

        response.assert_status_ok();
        let cookie = response.cookie(COOKIE_TOKEN);
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
        assert_eq!(
            cookie.expires_datetime(),
            Some(OffsetDateTime::UNIX_EPOCH)
        );
    }
}
