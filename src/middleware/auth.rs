use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::lifecycle::Actor;

/// Claims del token. `role` identifica la tabla de origen del usuario:
/// administrador/coordinador/asistente (universidad), empresa o estudiante.
/// `uid` es la clave primaria en esa tabla.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub role: String,
    pub uid: i64,
}

impl Claims {
    pub fn actor(&self) -> Result<Actor, Error> {
        match self.role.as_str() {
            "administrador" | "coordinador" | "asistente" => Ok(Actor::Universidad(self.uid)),
            "empresa" => Ok(Actor::Empresa(self.uid)),
            "estudiante" => Ok(Actor::Estudiante(self.uid)),
            other => Err(Error::Forbidden(format!("Rol desconocido: {}", other))),
        }
    }
}

fn decode_claims(req: &Request) -> Result<Claims, Response> {
    let unauthorized =
        |msg: &str| Error::Unauthorized(msg.to_string()).into_response();

    let Some(auth_header) = req.headers().get(axum::http::header::AUTHORIZATION) else {
        return Err(unauthorized("No se pudieron validar las credenciales."));
    };
    let Ok(auth_str) = auth_header.to_str() else {
        return Err(unauthorized("Cabecera de autorización inválida."));
    };
    let Some(token) = auth_str.strip_prefix("Bearer ") else {
        return Err(unauthorized("Se esperaba un token Bearer."));
    };

    let config = crate::config::get_config();
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| unauthorized("Token inválido o expirado."))
}

/// Exige un token válido de cualquier rol.
pub async fn require_bearer_auth(mut req: Request, next: Next) -> Response {
    match decode_claims(&req) {
        Ok(claims) => {
            req.extensions_mut().insert(claims);
            next.run(req).await
        }
        Err(resp) => resp,
    }
}

async fn require_roles(mut req: Request, next: Next, allowed: &[&str]) -> Response {
    match decode_claims(&req) {
        Ok(claims) => {
            if !allowed.iter().any(|r| r.eq_ignore_ascii_case(&claims.role)) {
                return Error::Forbidden(
                    "Acceso denegado: el rol no tiene permisos para esta operación.".to_string(),
                )
                .into_response();
            }
            req.extensions_mut().insert(claims);
            next.run(req).await
        }
        Err(resp) => resp,
    }
}

/// Administrador o Coordinador; Asistente queda fuera de la gestión.
pub async fn require_universidad(req: Request, next: Next) -> Response {
    require_roles(req, next, &["administrador", "coordinador"]).await
}

pub async fn require_empresa(req: Request, next: Next) -> Response {
    require_roles(req, next, &["empresa"]).await
}

pub async fn require_estudiante(req: Request, next: Next) -> Response {
    require_roles(req, next, &["estudiante"]).await
}

/// Adjunta los claims si el token viene y es válido; deja pasar si no.
/// Lo usa el alta de usuarios, que debe funcionar sin token mientras el
/// sistema no tenga ningún usuario.
pub async fn optional_bearer_auth(mut req: Request, next: Next) -> Response {
    if let Ok(claims) = decode_claims(&req) {
        req.extensions_mut().insert(claims);
    }
    next.run(req).await
}
