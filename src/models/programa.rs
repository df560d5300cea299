use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProgramaAcademico {
    pub id_programa: i64,
    pub nombre_programa: String,
    pub facultad: String,
    pub esta_activo: bool,
}
