use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use sqlx::PgPool;

use crate::dto::auth_dto::{Token, UserData, UserMeResponse};
use crate::dto::gestion_dto::{
    EmpresaResponse, EstudianteResponse, UsuarioCreatePayload, UsuarioResponse,
};
use crate::error::{Error, Result};
use crate::middleware::auth::Claims;
use crate::models::empresa::Empresa;
use crate::models::estudiante::Estudiante;
use crate::models::programa::ProgramaAcademico;
use crate::models::usuario::UsuarioUniversidad;
use crate::utils::password::{hash_password, verify_password};

#[derive(Clone)]
pub struct AuthService {
    pool: PgPool,
}

impl AuthService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn buscar_usuario_por_email(&self, email: &str) -> Result<Option<UsuarioUniversidad>> {
        let usuario = sqlx::query_as::<_, UsuarioUniversidad>(
            "SELECT id_usuario, nombre, email, rol, hashed_password
             FROM usuarios_universidad WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(usuario)
    }

    async fn buscar_estudiante_por_email(&self, email: &str) -> Result<Option<Estudiante>> {
        let estudiante = sqlx::query_as::<_, Estudiante>(
            "SELECT id_estudiante, id_programa, nombre, apellido, email_institucional,
                    hashed_password, esta_activo, fecha_creacion
             FROM estudiantes WHERE email_institucional = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(estudiante)
    }

    async fn buscar_empresa_por_email(&self, email: &str) -> Result<Option<Empresa>> {
        let empresa = sqlx::query_as::<_, Empresa>(
            "SELECT id_empresa, razon_social, nit, email_contacto, descripcion,
                    hashed_password, esta_activo, fecha_creacion
             FROM empresas WHERE email_contacto = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(empresa)
    }

    /// Autentica en orden contra las tres tablas de usuarios, como en el
    /// sistema original: universidad, luego estudiante, luego empresa.
    pub async fn login(&self, username: &str, password: &str) -> Result<Token> {
        if let Some(usuario) = self.buscar_usuario_por_email(username).await? {
            if verify_password(password, &usuario.hashed_password) {
                let role = usuario.rol.to_lowercase();
                return self.emitir_token(&usuario.email, &role, usuario.id_usuario);
            }
        }

        if let Some(estudiante) = self.buscar_estudiante_por_email(username).await? {
            if verify_password(password, &estudiante.hashed_password) {
                if !estudiante.esta_activo {
                    return Err(Error::Unauthorized("El usuario está inactivo.".to_string()));
                }
                return self.emitir_token(
                    &estudiante.email_institucional,
                    "estudiante",
                    estudiante.id_estudiante,
                );
            }
        }

        if let Some(empresa) = self.buscar_empresa_por_email(username).await? {
            if verify_password(password, &empresa.hashed_password) {
                if !empresa.esta_activo {
                    return Err(Error::Unauthorized("El usuario está inactivo.".to_string()));
                }
                return self.emitir_token(&empresa.email_contacto, "empresa", empresa.id_empresa);
            }
        }

        Err(Error::Unauthorized(
            "Email o contraseña incorrectos".to_string(),
        ))
    }

    fn emitir_token(&self, email: &str, role: &str, uid: i64) -> Result<Token> {
        let config = crate::config::get_config();
        let exp = (Utc::now() + Duration::minutes(config.token_ttl_minutes)).timestamp() as usize;
        let claims = Claims {
            sub: email.to_string(),
            exp,
            role: role.to_string(),
            uid,
        };
        let access_token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
        )
        .map_err(|e| Error::Internal(format!("No se pudo firmar el token: {}", e)))?;

        Ok(Token {
            access_token,
            token_type: "bearer".to_string(),
        })
    }

    pub async fn contar_usuarios(&self) -> Result<i64> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM usuarios_universidad")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    pub async fn crear_usuario(&self, payload: UsuarioCreatePayload) -> Result<UsuarioUniversidad> {
        if self.buscar_usuario_por_email(&payload.email).await?.is_some() {
            return Err(Error::BadRequest(
                "El correo electrónico ya está registrado.".to_string(),
            ));
        }

        let hashed = hash_password(&payload.password)?;
        let usuario = sqlx::query_as::<_, UsuarioUniversidad>(
            "INSERT INTO usuarios_universidad (nombre, email, rol, hashed_password)
             VALUES ($1, $2, $3, $4)
             RETURNING id_usuario, nombre, email, rol, hashed_password",
        )
        .bind(&payload.nombre)
        .bind(&payload.email)
        .bind(payload.rol.as_str())
        .bind(&hashed)
        .fetch_one(&self.pool)
        .await?;
        Ok(usuario)
    }

    pub async fn me(&self, claims: &Claims) -> Result<UserMeResponse> {
        match claims.role.as_str() {
            "administrador" | "coordinador" | "asistente" => {
                let usuario = self
                    .buscar_usuario_por_email(&claims.sub)
                    .await?
                    .ok_or_else(|| Error::Unauthorized("El usuario ya no existe.".to_string()))?;
                Ok(UserMeResponse {
                    user_type: "universidad".to_string(),
                    user_data: UserData::Universidad(UsuarioResponse::from(usuario)),
                })
            }
            "estudiante" => {
                let estudiante = self
                    .buscar_estudiante_por_email(&claims.sub)
                    .await?
                    .ok_or_else(|| Error::Unauthorized("El usuario ya no existe.".to_string()))?;
                let programa = sqlx::query_as::<_, ProgramaAcademico>(
                    "SELECT id_programa, nombre_programa, facultad, esta_activo
                     FROM programas_academicos WHERE id_programa = $1",
                )
                .bind(estudiante.id_programa)
                .fetch_one(&self.pool)
                .await?;
                Ok(UserMeResponse {
                    user_type: "estudiante".to_string(),
                    user_data: UserData::Estudiante(EstudianteResponse::from((
                        estudiante, programa,
                    ))),
                })
            }
            "empresa" => {
                let empresa = self
                    .buscar_empresa_por_email(&claims.sub)
                    .await?
                    .ok_or_else(|| Error::Unauthorized("El usuario ya no existe.".to_string()))?;
                Ok(UserMeResponse {
                    user_type: "empresa".to_string(),
                    user_data: UserData::Empresa(EmpresaResponse::from(empresa)),
                })
            }
            other => Err(Error::Forbidden(format!("Rol desconocido: {}", other))),
        }
    }

    pub async fn cambiar_password(
        &self,
        claims: &Claims,
        actual: &str,
        nueva: &str,
    ) -> Result<()> {
        let (tabla, columna_email, columna_hash) = match claims.role.as_str() {
            "administrador" | "coordinador" | "asistente" => {
                ("usuarios_universidad", "email", "hashed_password")
            }
            "estudiante" => ("estudiantes", "email_institucional", "hashed_password"),
            "empresa" => ("empresas", "email_contacto", "hashed_password"),
            other => return Err(Error::Forbidden(format!("Rol desconocido: {}", other))),
        };

        let hash_actual = sqlx::query_scalar::<_, String>(&format!(
            "SELECT {} FROM {} WHERE {} = $1",
            columna_hash, tabla, columna_email
        ))
        .bind(&claims.sub)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::Unauthorized("El usuario ya no existe.".to_string()))?;

        if !verify_password(actual, &hash_actual) {
            return Err(Error::Unauthorized(
                "La contraseña actual no es correcta.".to_string(),
            ));
        }

        let hash_nueva = hash_password(nueva)?;
        sqlx::query(&format!(
            "UPDATE {} SET {} = $1 WHERE {} = $2",
            tabla, columna_hash, columna_email
        ))
        .bind(&hash_nueva)
        .bind(&claims.sub)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
