//! Cookie based authentication.
//!
//! Signing in stores an encrypted [Token] in a private cookie and [auth_guard]
//! turns that cookie back into the [UserID](crate::UserID) of the caller.

mod cookie;
mod middleware;
mod token;

#[cfg(test)]
pub(crate) use cookie::COOKIE_TOKEN;
pub use cookie::CookieSettings;
pub(crate) use cookie::{get_token_from_cookies, invalidate_auth_cookie, set_auth_cookie};
pub use middleware::auth_guard;
pub(crate) use token::Token;
