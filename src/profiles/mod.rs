mod avatars;
mod fetch;
mod update;

use axum::{Router, routing::get};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users/profile", get(fetch::profile).post(update::update_profile))
        .route("/users/avatars", get(avatars::avatars))
}
