use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use std::path::Path as StdPath;
use tokio::fs;
use validator::Validate;

use crate::{
    dto::postulacion_dto::{
        ComentarioPayload, FechasPayload, HistorialResponse, PostulacionResponse,
    },
    error::{Error, Result},
    lifecycle::ActorRol,
    middleware::auth::Claims,
    models::documento::TipoDocumento,
    AppState,
};

#[axum::debug_handler]
pub async fn historial(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let entradas = state.postulacion_service.historial(id).await?;
    let respuesta: Vec<HistorialResponse> = entradas.into_iter().map(Into::into).collect();
    Ok(Json(respuesta))
}

/// Comentario de seguimiento; cualquier rol autenticado. La identidad del
/// actor sale del token.
#[axum::debug_handler]
pub async fn agregar_comentario(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
    Json(payload): Json<ComentarioPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let actor = claims.actor()?;
    let entrada = state
        .postulacion_service
        .comentar(id, actor, payload.comentarios)
        .await?;
    Ok((StatusCode::CREATED, Json(HistorialResponse::from(entrada))))
}

/// Corrección de fechas de una práctica Aprobada; solo universidad (la
/// ruta va detrás de esa guardia).
#[axum::debug_handler]
pub async fn actualizar_fechas(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<FechasPayload>,
) -> Result<impl IntoResponse> {
    let fila = state
        .postulacion_service
        .actualizar_fechas(id, payload.fecha_inicio_practica, payload.fecha_fin_practica)
        .await?;
    Ok(Json(PostulacionResponse::desde_fila(
        fila,
        ActorRol::Universidad,
    )))
}

async fn guardar_archivo(nombre: &str, datos: &bytes::Bytes) -> Result<String> {
    let ext = StdPath::new(nombre)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_else(|| "bin".to_string());

    let permitidas = ["pdf", "doc", "docx", "txt", "jpg", "jpeg", "png"];
    if !permitidas.contains(&ext.as_str()) {
        return Err(Error::BadRequest(format!(
            "El tipo de archivo .{} no está permitido.",
            ext
        )));
    }

    if ext == "pdf" && !datos.starts_with(b"%PDF") {
        return Err(Error::BadRequest("El contenido no es un PDF válido.".into()));
    }
    if (ext == "jpg" || ext == "jpeg") && !datos.starts_with(&[0xFF, 0xD8]) {
        return Err(Error::BadRequest("El contenido no es un JPEG válido.".into()));
    }
    if ext == "png" && !datos.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
        return Err(Error::BadRequest("El contenido no es un PNG válido.".into()));
    }

    let dir = format!("{}/documentos", crate::config::get_config().uploads_dir);
    fs::create_dir_all(&dir).await?;

    let archivo_id = uuid::Uuid::new_v4();
    let ruta = format!("{}/{}.{}", dir, archivo_id, ext);
    fs::write(&ruta, datos).await.map_err(|e| {
        tracing::error!("No se pudo escribir el documento: {}", e);
        Error::Internal(format!("No se pudo guardar el archivo: {}", e))
    })?;

    Ok(ruta)
}

/// Carga multipart de un documento adjunto: campo `archivo` con el fichero y
/// campo opcional `tipo_documento` con la etiqueta.
#[axum::debug_handler]
pub async fn subir_documento(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    let mut nombre_archivo = None;
    let mut tipo = TipoDocumento::Otro;
    let mut ruta = None;

    while let Some(field) = multipart.next_field().await? {
        let campo = field.name().unwrap_or_default().to_string();
        match campo.as_str() {
            "tipo_documento" => {
                let texto = field.text().await.unwrap_or_default();
                tipo = TipoDocumento::parse_lenient(&texto);
            }
            "archivo" => {
                let nombre = field.file_name().unwrap_or("documento.bin").to_string();
                let datos = field.bytes().await?;
                if datos.is_empty() {
                    return Err(Error::BadRequest("El archivo está vacío.".to_string()));
                }
                ruta = Some(guardar_archivo(&nombre, &datos).await?);
                nombre_archivo = Some(nombre);
            }
            _ => {}
        }
    }

    let (Some(nombre_archivo), Some(ruta)) = (nombre_archivo, ruta) else {
        return Err(Error::BadRequest(
            "Falta el campo 'archivo' con el documento.".to_string(),
        ));
    };

    let documento = state
        .documento_service
        .registrar(id, &nombre_archivo, tipo, &ruta)
        .await?;
    Ok((StatusCode::CREATED, Json(documento)))
}

#[axum::debug_handler]
pub async fn listar_documentos(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let documentos = state.documento_service.listar(id).await?;
    Ok(Json(documentos))
}
