use sqlx::PgPool;

use crate::dto::gestion_dto::ProgramaCreatePayload;
use crate::error::{Error, Result};
use crate::models::programa::ProgramaAcademico;

#[derive(Clone)]
pub struct ProgramaService {
    pool: PgPool,
}

impl ProgramaService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn crear(&self, payload: ProgramaCreatePayload) -> Result<ProgramaAcademico> {
        let existente = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM programas_academicos WHERE nombre_programa = $1",
        )
        .bind(&payload.nombre_programa)
        .fetch_one(&self.pool)
        .await?;
        if existente > 0 {
            return Err(Error::BadRequest(
                "El programa académico ya está registrado.".to_string(),
            ));
        }

        let programa = sqlx::query_as::<_, ProgramaAcademico>(
            "INSERT INTO programas_academicos (nombre_programa, facultad)
             VALUES ($1, $2)
             RETURNING id_programa, nombre_programa, facultad, esta_activo",
        )
        .bind(&payload.nombre_programa)
        .bind(&payload.facultad)
        .fetch_one(&self.pool)
        .await?;
        Ok(programa)
    }

    pub async fn obtener(&self, id: i64) -> Result<Option<ProgramaAcademico>> {
        let programa = sqlx::query_as::<_, ProgramaAcademico>(
            "SELECT id_programa, nombre_programa, facultad, esta_activo
             FROM programas_academicos WHERE id_programa = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(programa)
    }

    pub async fn listar(&self) -> Result<Vec<ProgramaAcademico>> {
        let programas = sqlx::query_as::<_, ProgramaAcademico>(
            "SELECT id_programa, nombre_programa, facultad, esta_activo
             FROM programas_academicos ORDER BY nombre_programa",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(programas)
    }

    pub async fn establecer_activo(&self, id: i64, activo: bool) -> Result<ProgramaAcademico> {
        let programa = sqlx::query_as::<_, ProgramaAcademico>(
            "UPDATE programas_academicos SET esta_activo = $1 WHERE id_programa = $2
             RETURNING id_programa, nombre_programa, facultad, esta_activo",
        )
        .bind(activo)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Programa no encontrado.".to_string()))?;
        Ok(programa)
    }
}
