use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use validator::Validate;

use crate::{
    dto::postulacion_dto::{
        CancelacionPayload, CompletarPayload, PostulacionResponse, RechazoPayload,
    },
    dto::vacante_dto::{VacanteCreatePayload, VacanteResponse},
    error::Result,
    lifecycle::{Accion, Actor, ActorRol},
    middleware::auth::Claims,
    AppState,
};

// --- Vacantes propias ---

/// La empresa del token es la dueña; la vacante nace En Revisión.
#[axum::debug_handler]
pub async fn crear_vacante(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<VacanteCreatePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let vacante = state.vacante_service.crear(claims.uid, payload).await?;
    Ok((StatusCode::CREATED, Json(VacanteResponse::from(vacante))))
}

#[axum::debug_handler]
pub async fn mis_vacantes(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let vacantes = state.vacante_service.listar_por_empresa(claims.uid).await?;
    let respuesta: Vec<VacanteResponse> = vacantes.into_iter().map(Into::into).collect();
    Ok(Json(respuesta))
}

#[axum::debug_handler]
pub async fn cerrar_vacante(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let vacante = state.vacante_service.cerrar(id, claims.uid).await?;
    Ok(Json(VacanteResponse::from(vacante)))
}

// --- Postulaciones sobre vacantes propias ---

#[axum::debug_handler]
pub async fn listar_postulaciones(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let filas = state
        .postulacion_service
        .listar_por_empresa(claims.uid)
        .await?;
    let respuesta: Vec<PostulacionResponse> = filas
        .into_iter()
        .map(|fila| PostulacionResponse::desde_fila(fila, ActorRol::Empresa))
        .collect();
    Ok(Json(respuesta))
}

/// Visto bueno de la empresa: Recibida -> En Revisión Universidad. La
/// aprobación definitiva (con fechas) sigue siendo de la universidad.
#[axum::debug_handler]
pub async fn aprobar_postulacion(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    state
        .postulacion_service
        .verificar_pertenencia(id, claims.uid)
        .await?;
    let fila = state
        .postulacion_service
        .transicionar(id, Accion::AprobarEmpresa, Actor::Empresa(claims.uid), None, None)
        .await?;
    Ok(Json(PostulacionResponse::desde_fila(fila, ActorRol::Empresa)))
}

#[axum::debug_handler]
pub async fn rechazar_postulacion(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
    Json(payload): Json<RechazoPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    state
        .postulacion_service
        .verificar_pertenencia(id, claims.uid)
        .await?;
    let fila = state
        .postulacion_service
        .transicionar(
            id,
            Accion::RechazarEmpresa,
            Actor::Empresa(claims.uid),
            Some(payload.comentarios),
            None,
        )
        .await?;
    Ok(Json(PostulacionResponse::desde_fila(fila, ActorRol::Empresa)))
}

#[axum::debug_handler]
pub async fn cancelar_postulacion(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
    Json(payload): Json<CancelacionPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    state
        .postulacion_service
        .verificar_pertenencia(id, claims.uid)
        .await?;
    let fila = state
        .postulacion_service
        .transicionar(
            id,
            Accion::Cancelar,
            Actor::Empresa(claims.uid),
            Some(payload.comentarios),
            None,
        )
        .await?;
    Ok(Json(PostulacionResponse::desde_fila(fila, ActorRol::Empresa)))
}

#[axum::debug_handler]
pub async fn completar_postulacion(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
    payload: Option<Json<CompletarPayload>>,
) -> Result<impl IntoResponse> {
    state
        .postulacion_service
        .verificar_pertenencia(id, claims.uid)
        .await?;
    let comentarios = payload.and_then(|Json(p)| p.comentarios);
    let fila = state
        .postulacion_service
        .transicionar(
            id,
            Accion::Completar,
            Actor::Empresa(claims.uid),
            comentarios,
            None,
        )
        .await?;
    Ok(Json(PostulacionResponse::desde_fila(fila, ActorRol::Empresa)))
}

/// Seguimiento de prácticas formalizadas sobre vacantes de esta empresa.
#[axum::debug_handler]
pub async fn practicas_seguimiento(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let filas = state
        .postulacion_service
        .listar_practicas(Some(claims.uid))
        .await?;
    let respuesta: Vec<PostulacionResponse> = filas
        .into_iter()
        .map(|fila| PostulacionResponse::desde_fila(fila, ActorRol::Empresa))
        .collect();
    Ok(Json(respuesta))
}
