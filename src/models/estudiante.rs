use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Fila aplanada con el programa del estudiante, para respuestas anidadas.
#[derive(Debug, Clone, FromRow)]
pub struct EstudianteConPrograma {
    pub id_estudiante: i64,
    pub nombre: String,
    pub apellido: String,
    pub email_institucional: String,
    pub esta_activo: bool,
    pub id_programa: i64,
    pub nombre_programa: String,
    pub facultad: String,
    pub programa_activo: bool,
}

#[derive(Debug, Clone, FromRow)]
pub struct Estudiante {
    pub id_estudiante: i64,
    pub id_programa: i64,
    pub nombre: String,
    pub apellido: String,
    pub email_institucional: String,
    pub hashed_password: String,
    pub esta_activo: bool,
    pub fecha_creacion: Option<DateTime<Utc>>,
}
