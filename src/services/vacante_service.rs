use sqlx::PgPool;

use crate::dto::vacante_dto::VacanteCreatePayload;
use crate::error::{Error, Result};
use crate::models::vacante::{EstadoVacante, VacanteConEmpresa};

const SELECT_CON_EMPRESA: &str = "SELECT v.id_vacante, v.titulo_vacante, v.descripcion_funciones, v.fecha_publicacion, v.estado,
        em.id_empresa, em.razon_social, em.nit, em.email_contacto
 FROM vacantes v
 JOIN empresas em ON em.id_empresa = v.id_empresa";

#[derive(Clone)]
pub struct VacanteService {
    pool: PgPool,
}

impl VacanteService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Toda vacante nace En Revisión hasta que la universidad la apruebe.
    pub async fn crear(
        &self,
        empresa_id: i64,
        payload: VacanteCreatePayload,
    ) -> Result<VacanteConEmpresa> {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO vacantes (id_empresa, titulo_vacante, descripcion_funciones, estado)
             VALUES ($1, $2, $3, $4)
             RETURNING id_vacante",
        )
        .bind(empresa_id)
        .bind(&payload.titulo_vacante)
        .bind(&payload.descripcion_funciones)
        .bind(EstadoVacante::EnRevision.as_str())
        .fetch_one(&self.pool)
        .await?;

        self.obtener_con_empresa(id).await
    }

    pub async fn obtener_con_empresa(&self, id: i64) -> Result<VacanteConEmpresa> {
        let fila = sqlx::query_as::<_, VacanteConEmpresa>(&format!(
            "{} WHERE v.id_vacante = $1",
            SELECT_CON_EMPRESA
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("La vacante no existe.".to_string()))?;
        Ok(fila)
    }

    pub async fn listar_por_estado(&self, estado: EstadoVacante) -> Result<Vec<VacanteConEmpresa>> {
        let filas = sqlx::query_as::<_, VacanteConEmpresa>(&format!(
            "{} WHERE v.estado = $1 ORDER BY v.fecha_publicacion DESC",
            SELECT_CON_EMPRESA
        ))
        .bind(estado.as_str())
        .fetch_all(&self.pool)
        .await?;
        Ok(filas)
    }

    pub async fn listar_por_empresa(&self, empresa_id: i64) -> Result<Vec<VacanteConEmpresa>> {
        let filas = sqlx::query_as::<_, VacanteConEmpresa>(&format!(
            "{} WHERE v.id_empresa = $1 ORDER BY v.fecha_publicacion DESC",
            SELECT_CON_EMPRESA
        ))
        .bind(empresa_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(filas)
    }

    /// En Revisión -> Abierta. La guardia en el UPDATE serializa aprobaciones
    /// concurrentes sobre la misma vacante.
    pub async fn aprobar(&self, id: i64) -> Result<VacanteConEmpresa> {
        self.transicionar(id, &[EstadoVacante::EnRevision], EstadoVacante::Abierta)
            .await
    }

    /// En Revisión -> Cerrada (rechazo de la universidad).
    pub async fn rechazar(&self, id: i64) -> Result<VacanteConEmpresa> {
        self.transicionar(id, &[EstadoVacante::EnRevision], EstadoVacante::Cerrada)
            .await
    }

    /// La empresa puede cerrar una vacante propia mientras esté En Revisión o
    /// Abierta; una vacante Cubierta ya tiene una práctica en curso.
    pub async fn cerrar(&self, id: i64, empresa_id: i64) -> Result<VacanteConEmpresa> {
        let propia = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM vacantes WHERE id_vacante = $1 AND id_empresa = $2",
        )
        .bind(id)
        .bind(empresa_id)
        .fetch_one(&self.pool)
        .await?;
        if propia == 0 {
            return Err(Error::NotFound("La vacante no existe.".to_string()));
        }

        self.transicionar(
            id,
            &[EstadoVacante::EnRevision, EstadoVacante::Abierta],
            EstadoVacante::Cerrada,
        )
        .await
    }

    async fn transicionar(
        &self,
        id: i64,
        desde: &[EstadoVacante],
        hasta: EstadoVacante,
    ) -> Result<VacanteConEmpresa> {
        let estados: Vec<&str> = desde.iter().map(|e| e.as_str()).collect();
        let actualizado = sqlx::query(
            "UPDATE vacantes SET estado = $1 WHERE id_vacante = $2 AND estado = ANY($3)",
        )
        .bind(hasta.as_str())
        .bind(id)
        .bind(&estados)
        .execute(&self.pool)
        .await?;

        if actualizado.rows_affected() == 0 {
            let existe =
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM vacantes WHERE id_vacante = $1")
                    .bind(id)
                    .fetch_one(&self.pool)
                    .await?;
            if existe == 0 {
                return Err(Error::NotFound("La vacante no existe.".to_string()));
            }
            return Err(Error::InvalidTransition(
                "La vacante no está en un estado que permita esta operación.".to_string(),
            ));
        }

        self.obtener_con_empresa(id).await
    }
}
