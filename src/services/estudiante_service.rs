use sqlx::PgPool;

use crate::dto::gestion_dto::{EstudianteCreatePayload, EstudianteResponse};
use crate::error::{Error, Result};
use crate::models::estudiante::{Estudiante, EstudianteConPrograma};
use crate::models::programa::ProgramaAcademico;
use crate::utils::password::hash_password;

const SELECT_CON_PROGRAMA: &str = "SELECT e.id_estudiante, e.nombre, e.apellido, e.email_institucional, e.esta_activo,
        pa.id_programa, pa.nombre_programa, pa.facultad, pa.esta_activo AS programa_activo
 FROM estudiantes e
 JOIN programas_academicos pa ON pa.id_programa = e.id_programa";

fn a_respuesta(fila: EstudianteConPrograma) -> EstudianteResponse {
    EstudianteResponse {
        id_estudiante: fila.id_estudiante,
        nombre: fila.nombre,
        apellido: fila.apellido,
        email_institucional: fila.email_institucional,
        esta_activo: fila.esta_activo,
        programa: ProgramaAcademico {
            id_programa: fila.id_programa,
            nombre_programa: fila.nombre_programa,
            facultad: fila.facultad,
            esta_activo: fila.programa_activo,
        },
    }
}

#[derive(Clone)]
pub struct EstudianteService {
    pool: PgPool,
}

impl EstudianteService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn crear(
        &self,
        payload: EstudianteCreatePayload,
        programa: ProgramaAcademico,
    ) -> Result<EstudianteResponse> {
        let existente = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM estudiantes WHERE email_institucional = $1",
        )
        .bind(&payload.email_institucional)
        .fetch_one(&self.pool)
        .await?;
        if existente > 0 {
            return Err(Error::BadRequest(
                "El correo institucional del estudiante ya está registrado.".to_string(),
            ));
        }

        let hashed = hash_password(&payload.password)?;
        let estudiante = sqlx::query_as::<_, Estudiante>(
            "INSERT INTO estudiantes (id_programa, nombre, apellido, email_institucional, hashed_password)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id_estudiante, id_programa, nombre, apellido, email_institucional,
                       hashed_password, esta_activo, fecha_creacion",
        )
        .bind(programa.id_programa)
        .bind(&payload.nombre)
        .bind(&payload.apellido)
        .bind(&payload.email_institucional)
        .bind(&hashed)
        .fetch_one(&self.pool)
        .await?;

        Ok(EstudianteResponse::from((estudiante, programa)))
    }

    pub async fn listar(&self) -> Result<Vec<EstudianteResponse>> {
        let filas = sqlx::query_as::<_, EstudianteConPrograma>(&format!(
            "{} ORDER BY e.apellido, e.nombre",
            SELECT_CON_PROGRAMA
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(filas.into_iter().map(a_respuesta).collect())
    }

    pub async fn establecer_activo(&self, id: i64, activo: bool) -> Result<EstudianteResponse> {
        let actualizado =
            sqlx::query("UPDATE estudiantes SET esta_activo = $1 WHERE id_estudiante = $2")
                .bind(activo)
                .bind(id)
                .execute(&self.pool)
                .await?;
        if actualizado.rows_affected() == 0 {
            return Err(Error::NotFound("Estudiante no encontrado.".to_string()));
        }

        let fila = sqlx::query_as::<_, EstudianteConPrograma>(&format!(
            "{} WHERE e.id_estudiante = $1",
            SELECT_CON_PROGRAMA
        ))
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(a_respuesta(fila))
    }
}
