use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::dto::vacante_dto::EmpresaResumen;
use crate::lifecycle::{acciones_permitidas, Accion, ActorRol, EstadoPostulacion};
use crate::models::historial::HistorialEstadoPostulacion;
use crate::models::postulacion::PostulacionConRelaciones;

/// Un comentario obligatorio no puede ser vacío ni solo espacios.
fn comentario_no_vacio(texto: &str) -> Result<(), ValidationError> {
    if texto.trim().is_empty() {
        return Err(ValidationError::new("comentario_vacio"));
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RechazoPayload {
    #[validate(custom(function = "comentario_no_vacio"))]
    pub comentarios: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CancelacionPayload {
    #[validate(custom(function = "comentario_no_vacio"))]
    pub comentarios: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ComentarioPayload {
    #[validate(custom(function = "comentario_no_vacio"))]
    pub comentarios: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct CompletarPayload {
    pub comentarios: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AprobacionUniversidadPayload {
    pub fecha_inicio_practica: DateTime<Utc>,
    pub fecha_fin_practica: DateTime<Utc>,
    pub comentarios: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FechasPayload {
    pub fecha_inicio_practica: DateTime<Utc>,
    pub fecha_fin_practica: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstudianteResumen {
    pub id_estudiante: i64,
    pub nombre: String,
    pub apellido: String,
    pub email_institucional: String,
    pub programa: ProgramaResumen,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramaResumen {
    pub id_programa: i64,
    pub nombre_programa: String,
    pub facultad: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VacanteResumen {
    pub id_vacante: i64,
    pub titulo_vacante: String,
    pub descripcion_funciones: String,
    pub estado: String,
    pub empresa: EmpresaResumen,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostulacionResponse {
    pub id_postulacion: i64,
    pub fecha_postulacion: Option<DateTime<Utc>>,
    pub estado_actual: String,
    pub fecha_inicio_practica: Option<DateTime<Utc>>,
    pub fecha_fin_practica: Option<DateTime<Utc>>,
    pub estudiante: EstudianteResumen,
    pub vacante: VacanteResumen,
    /// Acciones que el rol del solicitante puede ejecutar sobre el estado
    /// actual; lo calcula el mismo cuadro que valida las transiciones.
    pub acciones_permitidas: Vec<Accion>,
}

impl PostulacionResponse {
    pub fn desde_fila(fila: PostulacionConRelaciones, rol: ActorRol) -> Self {
        // Un estado fuera del conjunto cerrado es corrupción de datos; la
        // fila se devuelve igual pero sin acciones, y queda rastro en el log.
        let acciones = match fila.estado_actual.parse::<EstadoPostulacion>() {
            Ok(estado) => acciones_permitidas(estado, rol),
            Err(err) => {
                tracing::warn!(postulacion = fila.id_postulacion, error = %err,
                    "estado_actual fuera del conjunto cerrado");
                Vec::new()
            }
        };

        Self {
            id_postulacion: fila.id_postulacion,
            fecha_postulacion: fila.fecha_postulacion,
            estado_actual: fila.estado_actual,
            fecha_inicio_practica: fila.fecha_inicio_practica,
            fecha_fin_practica: fila.fecha_fin_practica,
            estudiante: EstudianteResumen {
                id_estudiante: fila.id_estudiante,
                nombre: fila.estudiante_nombre,
                apellido: fila.estudiante_apellido,
                email_institucional: fila.email_institucional,
                programa: ProgramaResumen {
                    id_programa: fila.id_programa,
                    nombre_programa: fila.nombre_programa,
                    facultad: fila.facultad,
                },
            },
            vacante: VacanteResumen {
                id_vacante: fila.id_vacante,
                titulo_vacante: fila.titulo_vacante,
                descripcion_funciones: fila.descripcion_funciones,
                estado: fila.vacante_estado,
                empresa: EmpresaResumen {
                    id_empresa: fila.id_empresa,
                    razon_social: fila.razon_social,
                    nit: fila.nit,
                    email_contacto: fila.email_contacto,
                },
            },
            acciones_permitidas: acciones,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistorialResponse {
    pub id_historial: i64,
    pub id_postulacion: i64,
    pub estado: String,
    pub fecha_cambio: Option<DateTime<Utc>>,
    pub comentarios: Option<String>,
    pub id_actor_universidad: Option<i64>,
    pub id_actor_empresa: Option<i64>,
    pub id_actor_estudiante: Option<i64>,
}

impl From<HistorialEstadoPostulacion> for HistorialResponse {
    fn from(value: HistorialEstadoPostulacion) -> Self {
        Self {
            id_historial: value.id_historial,
            id_postulacion: value.id_postulacion,
            estado: value.estado,
            fecha_cambio: value.fecha_cambio,
            comentarios: value.comentarios,
            id_actor_universidad: value.id_actor_universidad,
            id_actor_empresa: value.id_actor_empresa,
            id_actor_estudiante: value.id_actor_estudiante,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fila_con_estado(estado: &str) -> PostulacionConRelaciones {
        PostulacionConRelaciones {
            id_postulacion: 1,
            fecha_postulacion: None,
            estado_actual: estado.to_string(),
            fecha_inicio_practica: None,
            fecha_fin_practica: None,
            id_estudiante: 1,
            estudiante_nombre: "Ana".to_string(),
            estudiante_apellido: "Ruiz".to_string(),
            email_institucional: "ana@uni.edu".to_string(),
            id_programa: 1,
            nombre_programa: "Ingeniería de Sistemas".to_string(),
            facultad: "Ingeniería".to_string(),
            id_vacante: 1,
            titulo_vacante: "Practicante".to_string(),
            descripcion_funciones: "Apoyo".to_string(),
            vacante_estado: "Abierta".to_string(),
            id_empresa: 1,
            razon_social: "Acme".to_string(),
            nit: "900123456".to_string(),
            email_contacto: "rh@acme.com".to_string(),
        }
    }

    #[test]
    fn estado_conocido_expone_las_acciones_del_rol() {
        let respuesta =
            PostulacionResponse::desde_fila(fila_con_estado("Recibida"), ActorRol::Empresa);
        assert!(respuesta.acciones_permitidas.contains(&Accion::AprobarEmpresa));
        assert!(respuesta.acciones_permitidas.contains(&Accion::RechazarEmpresa));
    }

    #[test]
    fn estado_corrupto_no_ofrece_acciones() {
        let respuesta =
            PostulacionResponse::desde_fila(fila_con_estado("Pendiente"), ActorRol::Universidad);
        assert_eq!(respuesta.estado_actual, "Pendiente");
        assert!(respuesta.acciones_permitidas.is_empty());
    }

    #[test]
    fn comentario_en_blanco_no_valida() {
        let payload = RechazoPayload {
            comentarios: "   ".to_string(),
        };
        assert!(payload.validate().is_err());

        let payload = RechazoPayload {
            comentarios: "No cumple requisitos".to_string(),
        };
        assert!(payload.validate().is_ok());
    }
}
