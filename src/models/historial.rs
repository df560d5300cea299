use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Entrada del seguimiento de una postulación. Solo se inserta, nunca se
/// actualiza ni se borra; exactamente una de las tres columnas de actor
/// queda poblada.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct HistorialEstadoPostulacion {
    pub id_historial: i64,
    pub id_postulacion: i64,
    pub estado: String,
    pub fecha_cambio: Option<DateTime<Utc>>,
    pub comentarios: Option<String>,
    pub id_actor_universidad: Option<i64>,
    pub id_actor_empresa: Option<i64>,
    pub id_actor_estudiante: Option<i64>,
}
