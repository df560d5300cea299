use sqlx::PgPool;

use crate::error::{Error, Result};
use crate::models::documento::{DocumentoAdjunto, TipoDocumento};

#[derive(Clone)]
pub struct DocumentoService {
    pool: PgPool,
}

impl DocumentoService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn registrar(
        &self,
        postulacion_id: i64,
        nombre_archivo: &str,
        tipo: TipoDocumento,
        ruta: &str,
    ) -> Result<DocumentoAdjunto> {
        let existe = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM postulaciones WHERE id_postulacion = $1",
        )
        .bind(postulacion_id)
        .fetch_one(&self.pool)
        .await?;
        if existe == 0 {
            return Err(Error::NotFound("Postulación no encontrada.".to_string()));
        }

        let documento = sqlx::query_as::<_, DocumentoAdjunto>(
            "INSERT INTO documentos_adjuntos
                 (id_postulacion, nombre_archivo, tipo_documento, ruta_almacenamiento)
             VALUES ($1, $2, $3, $4)
             RETURNING id_documento, id_postulacion, nombre_archivo, tipo_documento,
                       ruta_almacenamiento, fecha_carga",
        )
        .bind(postulacion_id)
        .bind(nombre_archivo)
        .bind(tipo.as_str())
        .bind(ruta)
        .fetch_one(&self.pool)
        .await?;
        Ok(documento)
    }

    pub async fn listar(&self, postulacion_id: i64) -> Result<Vec<DocumentoAdjunto>> {
        let documentos = sqlx::query_as::<_, DocumentoAdjunto>(
            "SELECT id_documento, id_postulacion, nombre_archivo, tipo_documento,
                    ruta_almacenamiento, fecha_carga
             FROM documentos_adjuntos
             WHERE id_postulacion = $1
             ORDER BY fecha_carga ASC",
        )
        .bind(postulacion_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(documentos)
    }
}
