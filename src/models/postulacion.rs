use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::{Error, Result};
use crate::lifecycle::EstadoPostulacion;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Postulacion {
    pub id_postulacion: i64,
    pub id_estudiante: i64,
    pub id_vacante: i64,
    pub fecha_postulacion: Option<DateTime<Utc>>,
    pub estado_actual: String,
    pub fecha_inicio_practica: Option<DateTime<Utc>>,
    pub fecha_fin_practica: Option<DateTime<Utc>>,
}

impl Postulacion {
    /// La columna es TEXT; una fila con un estado fuera del conjunto cerrado
    /// es corrupción de datos, no una entrada inválida del cliente.
    pub fn estado(&self) -> Result<EstadoPostulacion> {
        self.estado_actual
            .parse()
            .map_err(|e: String| Error::Internal(e))
    }
}

/// Fila aplanada de una postulación con sus relaciones (estudiante, programa,
/// vacante, empresa) para las respuestas anidadas que consume el frontend.
#[derive(Debug, Clone, FromRow)]
pub struct PostulacionConRelaciones {
    pub id_postulacion: i64,
    pub fecha_postulacion: Option<DateTime<Utc>>,
    pub estado_actual: String,
    pub fecha_inicio_practica: Option<DateTime<Utc>>,
    pub fecha_fin_practica: Option<DateTime<Utc>>,
    pub id_estudiante: i64,
    pub estudiante_nombre: String,
    pub estudiante_apellido: String,
    pub email_institucional: String,
    pub id_programa: i64,
    pub nombre_programa: String,
    pub facultad: String,
    pub id_vacante: i64,
    pub titulo_vacante: String,
    pub descripcion_funciones: String,
    pub vacante_estado: String,
    pub id_empresa: i64,
    pub razon_social: String,
    pub nit: String,
    pub email_contacto: String,
}
