use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::empresa::Empresa;
use crate::models::estudiante::Estudiante;
use crate::models::programa::ProgramaAcademico;
use crate::models::usuario::{RolUniversidad, UsuarioUniversidad};

// --- Usuarios de universidad ---

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UsuarioCreatePayload {
    #[validate(length(min = 1))]
    pub nombre: String,
    #[validate(email)]
    pub email: String,
    pub rol: RolUniversidad,
    #[validate(length(min = 8))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsuarioResponse {
    pub id_usuario: i64,
    pub nombre: String,
    pub email: String,
    pub rol: String,
}

impl From<UsuarioUniversidad> for UsuarioResponse {
    fn from(value: UsuarioUniversidad) -> Self {
        Self {
            id_usuario: value.id_usuario,
            nombre: value.nombre,
            email: value.email,
            rol: value.rol,
        }
    }
}

// --- Programas académicos ---

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProgramaCreatePayload {
    #[validate(length(min = 1))]
    pub nombre_programa: String,
    #[validate(length(min = 1))]
    pub facultad: String,
}

// --- Empresas ---

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EmpresaCreatePayload {
    #[validate(length(min = 1))]
    pub razon_social: String,
    #[validate(length(min = 1, max = 20))]
    pub nit: String,
    #[validate(email)]
    pub email_contacto: String,
    pub descripcion: Option<String>,
    #[validate(length(min = 8))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmpresaResponse {
    pub id_empresa: i64,
    pub razon_social: String,
    pub nit: String,
    pub email_contacto: String,
    pub descripcion: Option<String>,
    pub esta_activo: bool,
}

impl From<Empresa> for EmpresaResponse {
    fn from(value: Empresa) -> Self {
        Self {
            id_empresa: value.id_empresa,
            razon_social: value.razon_social,
            nit: value.nit,
            email_contacto: value.email_contacto,
            descripcion: value.descripcion,
            esta_activo: value.esta_activo,
        }
    }
}

// --- Estudiantes ---

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EstudianteCreatePayload {
    #[validate(length(min = 1))]
    pub nombre: String,
    #[validate(length(min = 1))]
    pub apellido: String,
    #[validate(email)]
    pub email_institucional: String,
    pub id_programa: i64,
    #[validate(length(min = 8))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstudianteResponse {
    pub id_estudiante: i64,
    pub nombre: String,
    pub apellido: String,
    pub email_institucional: String,
    pub esta_activo: bool,
    pub programa: ProgramaAcademico,
}

impl From<(Estudiante, ProgramaAcademico)> for EstudianteResponse {
    fn from((estudiante, programa): (Estudiante, ProgramaAcademico)) -> Self {
        Self {
            id_estudiante: estudiante.id_estudiante,
            nombre: estudiante.nombre,
            apellido: estudiante.apellido,
            email_institucional: estudiante.email_institucional,
            esta_activo: estudiante.esta_activo,
            programa,
        }
    }
}
