use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};

use crate::{
    dto::postulacion_dto::PostulacionResponse,
    dto::vacante_dto::VacanteResponse,
    error::Result,
    lifecycle::ActorRol,
    middleware::auth::Claims,
    models::vacante::EstadoVacante,
    AppState,
};

#[axum::debug_handler]
pub async fn vacantes_disponibles(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let vacantes = state
        .vacante_service
        .listar_por_estado(EstadoVacante::Abierta)
        .await?;
    let respuesta: Vec<VacanteResponse> = vacantes.into_iter().map(Into::into).collect();
    Ok(Json(respuesta))
}

#[axum::debug_handler]
pub async fn postular(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(vacante_id): Path<i64>,
) -> Result<impl IntoResponse> {
    let fila = state
        .postulacion_service
        .crear(claims.uid, vacante_id)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(PostulacionResponse::desde_fila(fila, ActorRol::Estudiante)),
    ))
}

#[axum::debug_handler]
pub async fn mis_postulaciones(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let filas = state
        .postulacion_service
        .listar_por_estudiante(claims.uid)
        .await?;
    let respuesta: Vec<PostulacionResponse> = filas
        .into_iter()
        .map(|fila| PostulacionResponse::desde_fila(fila, ActorRol::Estudiante))
        .collect();
    Ok(Json(respuesta))
}
