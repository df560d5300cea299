use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::dto::gestion_dto::{EmpresaResponse, EstudianteResponse, UsuarioResponse};

/// El login llega como formulario (username = email), igual que el flujo
/// OAuth2 clásico que el frontend ya habla.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub token_type: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CambioPasswordPayload {
    #[validate(length(min = 1))]
    pub password_actual: String,
    #[validate(length(min = 8))]
    pub password_nueva: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum UserData {
    Universidad(UsuarioResponse),
    Empresa(EmpresaResponse),
    Estudiante(EstudianteResponse),
}

#[derive(Debug, Clone, Serialize)]
pub struct UserMeResponse {
    pub user_type: String,
    pub user_data: UserData,
}
