use sqlx::PgPool;

use crate::dto::gestion_dto::EmpresaCreatePayload;
use crate::error::{Error, Result};
use crate::models::empresa::Empresa;
use crate::utils::password::hash_password;

#[derive(Clone)]
pub struct EmpresaService {
    pool: PgPool,
}

impl EmpresaService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn crear(&self, payload: EmpresaCreatePayload) -> Result<Empresa> {
        let existente =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM empresas WHERE nit = $1")
                .bind(&payload.nit)
                .fetch_one(&self.pool)
                .await?;
        if existente > 0 {
            return Err(Error::BadRequest(
                "El NIT de la empresa ya está registrado.".to_string(),
            ));
        }

        let hashed = hash_password(&payload.password)?;
        let empresa = sqlx::query_as::<_, Empresa>(
            "INSERT INTO empresas (razon_social, nit, email_contacto, descripcion, hashed_password)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id_empresa, razon_social, nit, email_contacto, descripcion,
                       hashed_password, esta_activo, fecha_creacion",
        )
        .bind(&payload.razon_social)
        .bind(&payload.nit)
        .bind(&payload.email_contacto)
        .bind(&payload.descripcion)
        .bind(&hashed)
        .fetch_one(&self.pool)
        .await?;
        Ok(empresa)
    }

    pub async fn listar(&self) -> Result<Vec<Empresa>> {
        let empresas = sqlx::query_as::<_, Empresa>(
            "SELECT id_empresa, razon_social, nit, email_contacto, descripcion,
                    hashed_password, esta_activo, fecha_creacion
             FROM empresas ORDER BY razon_social",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(empresas)
    }

    pub async fn establecer_activo(&self, id: i64, activo: bool) -> Result<Empresa> {
        let empresa = sqlx::query_as::<_, Empresa>(
            "UPDATE empresas SET esta_activo = $1 WHERE id_empresa = $2
             RETURNING id_empresa, razon_social, nit, email_contacto, descripcion,
                       hashed_password, esta_activo, fecha_creacion",
        )
        .bind(activo)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Empresa no encontrada.".to_string()))?;
        Ok(empresa)
    }
}
