//! Authenticated access to the Emploi Store partner APIs
//!
//! [`TokenCache`] obtains and caches one OAuth2 token per scope;
//! [`ApiGateway`] attaches the right token to each call and decodes the JSON
//! answer, unwrapping the `{success, result}` envelope where the endpoint
//! uses one.

pub mod auth;
pub mod client;

pub use auth::{AccessTokenProvider, TokenCache};
pub use client::{ApiGateway, Params};
