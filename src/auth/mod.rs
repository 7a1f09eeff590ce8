use crate::state::AppState;
use axum::Router;

pub mod claims;
pub mod dto;
pub mod extract;
pub mod handlers;
pub mod jwt;
pub mod password;
pub mod policy;
pub mod repo;
pub mod services;
pub mod validate;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
