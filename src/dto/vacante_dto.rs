use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::vacante::VacanteConEmpresa;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct VacanteCreatePayload {
    #[validate(length(min = 1))]
    pub titulo_vacante: String,
    #[validate(length(min = 1))]
    pub descripcion_funciones: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmpresaResumen {
    pub id_empresa: i64,
    pub razon_social: String,
    pub nit: String,
    pub email_contacto: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VacanteResponse {
    pub id_vacante: i64,
    pub id_empresa: i64,
    pub titulo_vacante: String,
    pub descripcion_funciones: String,
    pub fecha_publicacion: Option<DateTime<Utc>>,
    pub estado: String,
    pub empresa: EmpresaResumen,
}

impl From<VacanteConEmpresa> for VacanteResponse {
    fn from(value: VacanteConEmpresa) -> Self {
        Self {
            id_vacante: value.id_vacante,
            id_empresa: value.id_empresa,
            titulo_vacante: value.titulo_vacante,
            descripcion_funciones: value.descripcion_funciones,
            fecha_publicacion: value.fecha_publicacion,
            estado: value.estado,
            empresa: EmpresaResumen {
                id_empresa: value.id_empresa,
                razon_social: value.razon_social,
                nit: value.nit,
                email_contacto: value.email_contacto,
            },
        }
    }
}
