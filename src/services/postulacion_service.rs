use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::info;

use crate::error::{Error, Result};
use crate::lifecycle::{self, Accion, Actor, EstadoPostulacion};
use crate::models::historial::HistorialEstadoPostulacion;
use crate::models::postulacion::{Postulacion, PostulacionConRelaciones};
use crate::models::vacante::EstadoVacante;

const SELECT_DETALLE: &str = "SELECT p.id_postulacion, p.fecha_postulacion, p.estado_actual, p.fecha_inicio_practica, p.fecha_fin_practica,
        p.id_estudiante, e.nombre AS estudiante_nombre, e.apellido AS estudiante_apellido, e.email_institucional,
        pa.id_programa, pa.nombre_programa, pa.facultad,
        p.id_vacante, v.titulo_vacante, v.descripcion_funciones, v.estado AS vacante_estado,
        v.id_empresa, em.razon_social, em.nit, em.email_contacto
 FROM postulaciones p
 JOIN estudiantes e ON e.id_estudiante = p.id_estudiante
 JOIN programas_academicos pa ON pa.id_programa = e.id_programa
 JOIN vacantes v ON v.id_vacante = p.id_vacante
 JOIN empresas em ON em.id_empresa = v.id_empresa";

const SELECT_HISTORIAL: &str = "SELECT id_historial, id_postulacion, estado, fecha_cambio, comentarios,
        id_actor_universidad, id_actor_empresa, id_actor_estudiante
 FROM historial_estados_postulacion";

/// Estados que el panel de prácticas considera una práctica formalizada.
const ESTADOS_PRACTICA: [EstadoPostulacion; 3] = [
    EstadoPostulacion::Aprobada,
    EstadoPostulacion::Completada,
    EstadoPostulacion::Cancelada,
];

fn validar_fechas(inicio: DateTime<Utc>, fin: DateTime<Utc>) -> Result<()> {
    if inicio > fin {
        return Err(Error::BadRequest(
            "La fecha de inicio de la práctica no puede ser posterior a la fecha de fin."
                .to_string(),
        ));
    }
    Ok(())
}

#[derive(Clone)]
pub struct PostulacionService {
    pool: PgPool,
}

impl PostulacionService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// El estudiante se postula a una vacante Abierta; una postulación por
    /// estudiante y vacante.
    pub async fn crear(&self, estudiante_id: i64, vacante_id: i64) -> Result<PostulacionConRelaciones> {
        let estado_vacante = sqlx::query_scalar::<_, String>(
            "SELECT estado FROM vacantes WHERE id_vacante = $1",
        )
        .bind(vacante_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("La vacante no existe.".to_string()))?;

        if estado_vacante != EstadoVacante::Abierta.as_str() {
            return Err(Error::BadRequest(
                "La vacante no está abierta a postulaciones.".to_string(),
            ));
        }

        let duplicada = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM postulaciones WHERE id_estudiante = $1 AND id_vacante = $2",
        )
        .bind(estudiante_id)
        .bind(vacante_id)
        .fetch_one(&self.pool)
        .await?;
        if duplicada > 0 {
            return Err(Error::BadRequest(
                "Ya te has postulado a esta vacante.".to_string(),
            ));
        }

        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO postulaciones (id_estudiante, id_vacante, estado_actual)
             VALUES ($1, $2, $3)
             RETURNING id_postulacion",
        )
        .bind(estudiante_id)
        .bind(vacante_id)
        .bind(EstadoPostulacion::Recibida.as_str())
        .fetch_one(&self.pool)
        .await?;

        self.detalle(id).await
    }

    pub async fn detalle(&self, id: i64) -> Result<PostulacionConRelaciones> {
        let fila = sqlx::query_as::<_, PostulacionConRelaciones>(&format!(
            "{} WHERE p.id_postulacion = $1",
            SELECT_DETALLE
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Postulación no encontrada.".to_string()))?;
        Ok(fila)
    }

    pub async fn listar_por_estudiante(&self, estudiante_id: i64) -> Result<Vec<PostulacionConRelaciones>> {
        let filas = sqlx::query_as::<_, PostulacionConRelaciones>(&format!(
            "{} WHERE p.id_estudiante = $1 ORDER BY p.fecha_postulacion DESC",
            SELECT_DETALLE
        ))
        .bind(estudiante_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(filas)
    }

    pub async fn listar_por_empresa(&self, empresa_id: i64) -> Result<Vec<PostulacionConRelaciones>> {
        let filas = sqlx::query_as::<_, PostulacionConRelaciones>(&format!(
            "{} WHERE v.id_empresa = $1 ORDER BY p.fecha_postulacion DESC",
            SELECT_DETALLE
        ))
        .bind(empresa_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(filas)
    }

    pub async fn listar_por_estado(&self, estado: EstadoPostulacion) -> Result<Vec<PostulacionConRelaciones>> {
        let filas = sqlx::query_as::<_, PostulacionConRelaciones>(&format!(
            "{} WHERE p.estado_actual = $1 ORDER BY p.fecha_postulacion DESC",
            SELECT_DETALLE
        ))
        .bind(estado.as_str())
        .fetch_all(&self.pool)
        .await?;
        Ok(filas)
    }

    /// Prácticas formalizadas (aprobadas, completadas o canceladas), con un
    /// filtro opcional por empresa para el panel de seguimiento.
    pub async fn listar_practicas(&self, empresa_id: Option<i64>) -> Result<Vec<PostulacionConRelaciones>> {
        let estados: Vec<&str> = ESTADOS_PRACTICA.iter().map(|e| e.as_str()).collect();
        let filas = match empresa_id {
            Some(empresa_id) => {
                sqlx::query_as::<_, PostulacionConRelaciones>(&format!(
                    "{} WHERE p.estado_actual = ANY($1) AND v.id_empresa = $2
                     ORDER BY p.fecha_inicio_practica DESC NULLS LAST",
                    SELECT_DETALLE
                ))
                .bind(&estados)
                .bind(empresa_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, PostulacionConRelaciones>(&format!(
                    "{} WHERE p.estado_actual = ANY($1)
                     ORDER BY p.fecha_inicio_practica DESC NULLS LAST",
                    SELECT_DETALLE
                ))
                .bind(&estados)
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(filas)
    }

    /// Las rutas de empresa solo operan sobre postulaciones a vacantes
    /// propias; para cualquier otra la postulación "no existe".
    pub async fn verificar_pertenencia(&self, id: i64, empresa_id: i64) -> Result<()> {
        let propia = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*)
             FROM postulaciones p
             JOIN vacantes v ON v.id_vacante = p.id_vacante
             WHERE p.id_postulacion = $1 AND v.id_empresa = $2",
        )
        .bind(id)
        .bind(empresa_id)
        .fetch_one(&self.pool)
        .await?;
        if propia == 0 {
            return Err(Error::NotFound("Postulación no encontrada.".to_string()));
        }
        Ok(())
    }

    /// Ejecuta una transición del ciclo de vida dentro de una transacción:
    /// bloquea la fila, consulta el cuadro de transiciones, persiste el nuevo
    /// estado (y las fechas en la aprobación final), marca la vacante como
    /// Cubierta cuando corresponde y deja exactamente una entrada de
    /// historial. Si la terna es ilegal no se escribe nada.
    pub async fn transicionar(
        &self,
        id: i64,
        accion: Accion,
        actor: Actor,
        comentarios: Option<String>,
        fechas: Option<(DateTime<Utc>, DateTime<Utc>)>,
    ) -> Result<PostulacionConRelaciones> {
        if let Some((inicio, fin)) = fechas {
            validar_fechas(inicio, fin)?;
        }

        let mut tx = self.pool.begin().await?;

        let postulacion = sqlx::query_as::<_, Postulacion>(
            "SELECT id_postulacion, id_estudiante, id_vacante, fecha_postulacion,
                    estado_actual, fecha_inicio_practica, fecha_fin_practica
             FROM postulaciones WHERE id_postulacion = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| Error::NotFound("Postulación no encontrada.".to_string()))?;

        let desde = postulacion.estado()?;
        let hasta = lifecycle::transicionar(desde, accion, actor.rol())
            .map_err(|e| Error::InvalidTransition(e.to_string()))?;

        let actualizado = match fechas {
            Some((inicio, fin)) => {
                sqlx::query(
                    "UPDATE postulaciones
                     SET estado_actual = $1, fecha_inicio_practica = $2, fecha_fin_practica = $3
                     WHERE id_postulacion = $4 AND estado_actual = $5",
                )
                .bind(hasta.as_str())
                .bind(inicio)
                .bind(fin)
                .bind(id)
                .bind(desde.as_str())
                .execute(&mut *tx)
                .await?
            }
            None => {
                sqlx::query(
                    "UPDATE postulaciones SET estado_actual = $1
                     WHERE id_postulacion = $2 AND estado_actual = $3",
                )
                .bind(hasta.as_str())
                .bind(id)
                .bind(desde.as_str())
                .execute(&mut *tx)
                .await?
            }
        };
        if actualizado.rows_affected() == 0 {
            return Err(Error::InvalidTransition(
                "La postulación fue modificada por otra operación; vuelve a intentarlo."
                    .to_string(),
            ));
        }

        if accion == Accion::AprobarUniversidad {
            sqlx::query("UPDATE vacantes SET estado = $1 WHERE id_vacante = $2")
                .bind(EstadoVacante::Cubierta.as_str())
                .bind(postulacion.id_vacante)
                .execute(&mut *tx)
                .await?;
        }

        let (actor_universidad, actor_empresa, actor_estudiante) = actor.columnas_historial();
        sqlx::query(
            "INSERT INTO historial_estados_postulacion
                 (id_postulacion, estado, comentarios,
                  id_actor_universidad, id_actor_empresa, id_actor_estudiante)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(id)
        .bind(hasta.as_str())
        .bind(&comentarios)
        .bind(actor_universidad)
        .bind(actor_empresa)
        .bind(actor_estudiante)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(
            postulacion = id,
            desde = desde.as_str(),
            hasta = hasta.as_str(),
            "transición aplicada"
        );

        self.detalle(id).await
    }

    /// Corrige las fechas de una práctica ya aprobada. No es una transición
    /// (el estado queda en Aprobada) y no deja entrada de historial.
    pub async fn actualizar_fechas(
        &self,
        id: i64,
        inicio: DateTime<Utc>,
        fin: DateTime<Utc>,
    ) -> Result<PostulacionConRelaciones> {
        validar_fechas(inicio, fin)?;

        let actualizado = sqlx::query(
            "UPDATE postulaciones
             SET fecha_inicio_practica = $1, fecha_fin_practica = $2
             WHERE id_postulacion = $3 AND estado_actual = $4",
        )
        .bind(inicio)
        .bind(fin)
        .bind(id)
        .bind(EstadoPostulacion::Aprobada.as_str())
        .execute(&self.pool)
        .await?;

        if actualizado.rows_affected() == 0 {
            let existe = sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM postulaciones WHERE id_postulacion = $1",
            )
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
            if existe == 0 {
                return Err(Error::NotFound("Postulación no encontrada.".to_string()));
            }
            return Err(Error::InvalidTransition(
                "Las fechas solo pueden modificarse mientras la postulación está Aprobada."
                    .to_string(),
            ));
        }

        self.detalle(id).await
    }

    /// Comentario de seguimiento: entrada de historial con el estado actual
    /// como foto, sin cambio de estado. Abierto a los tres roles. Un solo
    /// INSERT ... SELECT lee la foto y la escribe, así una transición que
    /// confirme en paralelo nunca deja un estado obsoleto en el historial.
    pub async fn comentar(
        &self,
        id: i64,
        actor: Actor,
        comentario: String,
    ) -> Result<HistorialEstadoPostulacion> {
        let (actor_universidad, actor_empresa, actor_estudiante) = actor.columnas_historial();
        let entrada = sqlx::query_as::<_, HistorialEstadoPostulacion>(
            "INSERT INTO historial_estados_postulacion
                 (id_postulacion, estado, comentarios,
                  id_actor_universidad, id_actor_empresa, id_actor_estudiante)
             SELECT p.id_postulacion, p.estado_actual, $2, $3, $4, $5
             FROM postulaciones p WHERE p.id_postulacion = $1
             RETURNING id_historial, id_postulacion, estado, fecha_cambio, comentarios,
                       id_actor_universidad, id_actor_empresa, id_actor_estudiante",
        )
        .bind(id)
        .bind(&comentario)
        .bind(actor_universidad)
        .bind(actor_empresa)
        .bind(actor_estudiante)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Postulación no encontrada.".to_string()))?;
        Ok(entrada)
    }

    pub async fn historial(&self, id: i64) -> Result<Vec<HistorialEstadoPostulacion>> {
        let existe = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM postulaciones WHERE id_postulacion = $1",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        if existe == 0 {
            return Err(Error::NotFound("Postulación no encontrada.".to_string()));
        }

        let entradas = sqlx::query_as::<_, HistorialEstadoPostulacion>(&format!(
            "{} WHERE id_postulacion = $1 ORDER BY fecha_cambio ASC, id_historial ASC",
            SELECT_HISTORIAL
        ))
        .bind(id)
        .fetch_all(&self.pool)
        .await?;
        Ok(entradas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fechas_invertidas_se_rechazan_antes_de_tocar_nada() {
        let inicio = "2024-07-01T00:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let fin = "2024-06-01T00:00:00Z".parse::<DateTime<Utc>>().unwrap();
        assert!(validar_fechas(inicio, fin).is_err());
        assert!(validar_fechas(fin, inicio).is_ok());
        assert!(validar_fechas(inicio, inicio).is_ok());
    }
}
