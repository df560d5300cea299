use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Roles del personal de la universidad. Solo Administrador y Coordinador
/// pasan la guardia de administración; Asistente existe en los datos pero no
/// tiene permisos de gestión.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RolUniversidad {
    Administrador,
    Coordinador,
    Asistente,
}

impl RolUniversidad {
    pub fn as_str(&self) -> &'static str {
        match self {
            RolUniversidad::Administrador => "Administrador",
            RolUniversidad::Coordinador => "Coordinador",
            RolUniversidad::Asistente => "Asistente",
        }
    }

    pub fn puede_gestionar(&self) -> bool {
        matches!(
            self,
            RolUniversidad::Administrador | RolUniversidad::Coordinador
        )
    }
}

impl std::str::FromStr for RolUniversidad {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Administrador" => Ok(RolUniversidad::Administrador),
            "Coordinador" => Ok(RolUniversidad::Coordinador),
            "Asistente" => Ok(RolUniversidad::Asistente),
            other => Err(format!("Rol de universidad desconocido: {}", other)),
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct UsuarioUniversidad {
    pub id_usuario: i64,
    pub nombre: String,
    pub email: String,
    pub rol: String,
    pub hashed_password: String,
}
