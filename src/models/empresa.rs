use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct Empresa {
    pub id_empresa: i64,
    pub razon_social: String,
    pub nit: String,
    pub email_contacto: String,
    pub descripcion: Option<String>,
    pub hashed_password: String,
    pub esta_activo: bool,
    pub fecha_creacion: Option<DateTime<Utc>>,
}
