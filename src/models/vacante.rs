use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Estados de una vacante. Máquina pequeña e independiente de la de
/// postulaciones: creada En Revisión, el admin la abre o la cierra, la
/// empresa puede cerrarla, y la aprobación final de una postulación la marca
/// Cubierta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EstadoVacante {
    #[serde(rename = "En Revisión")]
    EnRevision,
    #[serde(rename = "Abierta")]
    Abierta,
    #[serde(rename = "Cubierta")]
    Cubierta,
    #[serde(rename = "Cerrada")]
    Cerrada,
}

impl EstadoVacante {
    pub fn as_str(&self) -> &'static str {
        match self {
            EstadoVacante::EnRevision => "En Revisión",
            EstadoVacante::Abierta => "Abierta",
            EstadoVacante::Cubierta => "Cubierta",
            EstadoVacante::Cerrada => "Cerrada",
        }
    }
}

impl std::str::FromStr for EstadoVacante {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "En Revisión" => Ok(EstadoVacante::EnRevision),
            "Abierta" => Ok(EstadoVacante::Abierta),
            "Cubierta" => Ok(EstadoVacante::Cubierta),
            "Cerrada" => Ok(EstadoVacante::Cerrada),
            other => Err(format!("Estado de vacante desconocido: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vacante {
    pub id_vacante: i64,
    pub id_empresa: i64,
    pub titulo_vacante: String,
    pub descripcion_funciones: String,
    pub fecha_publicacion: Option<DateTime<Utc>>,
    pub estado: String,
}

/// Fila aplanada de una vacante con su empresa, para las respuestas anidadas.
#[derive(Debug, Clone, FromRow)]
pub struct VacanteConEmpresa {
    pub id_vacante: i64,
    pub titulo_vacante: String,
    pub descripcion_funciones: String,
    pub fecha_publicacion: Option<DateTime<Utc>>,
    pub estado: String,
    pub id_empresa: i64,
    pub razon_social: String,
    pub nit: String,
    pub email_contacto: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estados_ida_y_vuelta() {
        for estado in [
            EstadoVacante::EnRevision,
            EstadoVacante::Abierta,
            EstadoVacante::Cubierta,
            EstadoVacante::Cerrada,
        ] {
            assert_eq!(estado.as_str().parse::<EstadoVacante>().unwrap(), estado);
        }
    }
}
