use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use validator::Validate;

use crate::{
    dto::gestion_dto::{
        EmpresaCreatePayload, EmpresaResponse, EstudianteCreatePayload, ProgramaCreatePayload,
        UsuarioCreatePayload, UsuarioResponse,
    },
    dto::postulacion_dto::{
        AprobacionUniversidadPayload, CancelacionPayload, PostulacionResponse, RechazoPayload,
    },
    dto::vacante_dto::VacanteResponse,
    error::{Error, Result},
    lifecycle::{Accion, Actor, ActorRol, EstadoPostulacion},
    middleware::auth::Claims,
    models::usuario::RolUniversidad,
    models::vacante::EstadoVacante,
    AppState,
};

// --- Usuarios de universidad ---

/// Alta de personal de la universidad. El primer usuario del sistema se crea
/// sin token y debe ser Administrador; a partir de ahí solo un Administrador
/// o Coordinador autenticado puede crear más.
#[axum::debug_handler]
pub async fn crear_usuario(
    State(state): State<AppState>,
    claims: Option<Extension<Claims>>,
    Json(payload): Json<UsuarioCreatePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    let existentes = state.auth_service.contar_usuarios().await?;
    if existentes > 0 {
        let autorizado = claims
            .as_ref()
            .map(|Extension(c)| matches!(c.role.as_str(), "administrador" | "coordinador"))
            .unwrap_or(false);
        if !autorizado {
            return Err(Error::Forbidden(
                "Se requiere autenticación de administrador para crear nuevos usuarios."
                    .to_string(),
            ));
        }
    } else if payload.rol != RolUniversidad::Administrador {
        return Err(Error::BadRequest(
            "El primer usuario del sistema debe tener el rol de 'Administrador'.".to_string(),
        ));
    }

    let usuario = state.auth_service.crear_usuario(payload).await?;
    Ok((StatusCode::CREATED, Json(UsuarioResponse::from(usuario))))
}

// --- Programas académicos ---

#[axum::debug_handler]
pub async fn crear_programa(
    State(state): State<AppState>,
    Json(payload): Json<ProgramaCreatePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let programa = state.programa_service.crear(payload).await?;
    Ok((StatusCode::CREATED, Json(programa)))
}

#[axum::debug_handler]
pub async fn listar_programas(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let programas = state.programa_service.listar().await?;
    Ok(Json(programas))
}

#[axum::debug_handler]
pub async fn activar_programa(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let programa = state.programa_service.establecer_activo(id, true).await?;
    Ok(Json(programa))
}

#[axum::debug_handler]
pub async fn inactivar_programa(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let programa = state.programa_service.establecer_activo(id, false).await?;
    Ok(Json(programa))
}

// --- Empresas ---

#[axum::debug_handler]
pub async fn crear_empresa(
    State(state): State<AppState>,
    Json(payload): Json<EmpresaCreatePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let empresa = state.empresa_service.crear(payload).await?;
    Ok((StatusCode::CREATED, Json(EmpresaResponse::from(empresa))))
}

#[axum::debug_handler]
pub async fn listar_empresas(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let empresas = state.empresa_service.listar().await?;
    let respuesta: Vec<EmpresaResponse> = empresas.into_iter().map(Into::into).collect();
    Ok(Json(respuesta))
}

#[axum::debug_handler]
pub async fn activar_empresa(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let empresa = state.empresa_service.establecer_activo(id, true).await?;
    Ok(Json(EmpresaResponse::from(empresa)))
}

#[axum::debug_handler]
pub async fn inactivar_empresa(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let empresa = state.empresa_service.establecer_activo(id, false).await?;
    Ok(Json(EmpresaResponse::from(empresa)))
}

// --- Estudiantes ---

#[axum::debug_handler]
pub async fn crear_estudiante(
    State(state): State<AppState>,
    Json(payload): Json<EstudianteCreatePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    let programa = state
        .programa_service
        .obtener(payload.id_programa)
        .await?
        .ok_or_else(|| {
            Error::NotFound(format!(
                "El programa con id {} no existe. No se puede crear el estudiante.",
                payload.id_programa
            ))
        })?;

    let estudiante = state.estudiante_service.crear(payload, programa).await?;
    Ok((StatusCode::CREATED, Json(estudiante)))
}

#[axum::debug_handler]
pub async fn listar_estudiantes(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let estudiantes = state.estudiante_service.listar().await?;
    Ok(Json(estudiantes))
}

#[axum::debug_handler]
pub async fn activar_estudiante(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let estudiante = state.estudiante_service.establecer_activo(id, true).await?;
    Ok(Json(estudiante))
}

#[axum::debug_handler]
pub async fn inactivar_estudiante(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let estudiante = state.estudiante_service.establecer_activo(id, false).await?;
    Ok(Json(estudiante))
}

// --- Vacantes ---

#[axum::debug_handler]
pub async fn vacantes_pendientes(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let vacantes = state
        .vacante_service
        .listar_por_estado(EstadoVacante::EnRevision)
        .await?;
    let respuesta: Vec<VacanteResponse> = vacantes.into_iter().map(Into::into).collect();
    Ok(Json(respuesta))
}

#[axum::debug_handler]
pub async fn aprobar_vacante(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let vacante = state.vacante_service.aprobar(id).await?;
    Ok(Json(VacanteResponse::from(vacante)))
}

#[axum::debug_handler]
pub async fn rechazar_vacante(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let vacante = state.vacante_service.rechazar(id).await?;
    Ok(Json(VacanteResponse::from(vacante)))
}

// --- Postulaciones ---

#[axum::debug_handler]
pub async fn postulaciones_pendientes(
    State(state): State<AppState>,
) -> Result<impl IntoResponse> {
    let filas = state
        .postulacion_service
        .listar_por_estado(EstadoPostulacion::EnRevisionUniversidad)
        .await?;
    let respuesta: Vec<PostulacionResponse> = filas
        .into_iter()
        .map(|fila| PostulacionResponse::desde_fila(fila, ActorRol::Universidad))
        .collect();
    Ok(Json(respuesta))
}

/// Aprobación final: fija las fechas de la práctica y marca la vacante como
/// Cubierta. La universidad tiene la última palabra sobre el calendario.
#[axum::debug_handler]
pub async fn aprobar_postulacion(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
    Json(payload): Json<AprobacionUniversidadPayload>,
) -> Result<impl IntoResponse> {
    let fila = state
        .postulacion_service
        .transicionar(
            id,
            Accion::AprobarUniversidad,
            Actor::Universidad(claims.uid),
            payload.comentarios,
            Some((payload.fecha_inicio_practica, payload.fecha_fin_practica)),
        )
        .await?;
    Ok(Json(PostulacionResponse::desde_fila(
        fila,
        ActorRol::Universidad,
    )))
}

#[axum::debug_handler]
pub async fn rechazar_postulacion(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
    Json(payload): Json<RechazoPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let fila = state
        .postulacion_service
        .transicionar(
            id,
            Accion::RechazarUniversidad,
            Actor::Universidad(claims.uid),
            Some(payload.comentarios),
            None,
        )
        .await?;
    Ok(Json(PostulacionResponse::desde_fila(
        fila,
        ActorRol::Universidad,
    )))
}

#[axum::debug_handler]
pub async fn cancelar_postulacion(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
    Json(payload): Json<CancelacionPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let fila = state
        .postulacion_service
        .transicionar(
            id,
            Accion::Cancelar,
            Actor::Universidad(claims.uid),
            Some(payload.comentarios),
            None,
        )
        .await?;
    Ok(Json(PostulacionResponse::desde_fila(
        fila,
        ActorRol::Universidad,
    )))
}

/// Prácticas formalizadas de todo el sistema, para el panel de la
/// universidad.
#[axum::debug_handler]
pub async fn practicas_historial(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let filas = state.postulacion_service.listar_practicas(None).await?;
    let respuesta: Vec<PostulacionResponse> = filas
        .into_iter()
        .map(|fila| PostulacionResponse::desde_fila(fila, ActorRol::Universidad))
        .collect();
    Ok(Json(respuesta))
}
