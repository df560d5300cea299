use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Extension, Form, Json,
};
use validator::Validate;

use crate::{
    dto::auth_dto::{CambioPasswordPayload, LoginForm},
    error::Result,
    middleware::auth::Claims,
    AppState,
};

/// Inicio de sesión. Recibe `username` (el email) y `password` como
/// formulario y devuelve un token Bearer.
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<impl IntoResponse> {
    form.validate()?;
    let token = state.auth_service.login(&form.username, &form.password).await?;
    Ok(Json(token))
}

#[axum::debug_handler]
pub async fn me(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let respuesta = state.auth_service.me(&claims).await?;
    Ok(Json(respuesta))
}

#[axum::debug_handler]
pub async fn cambiar_password(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CambioPasswordPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    state
        .auth_service
        .cambiar_password(&claims, &payload.password_actual, &payload.password_nueva)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
