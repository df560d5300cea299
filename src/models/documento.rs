use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TipoDocumento {
    #[serde(rename = "Hoja de Vida")]
    HojaDeVida,
    #[serde(rename = "Certificado Académico")]
    CertificadoAcademico,
    #[serde(rename = "Informe de Práctica")]
    InformeDePractica,
    #[serde(rename = "Otro")]
    Otro,
}

impl TipoDocumento {
    pub fn as_str(&self) -> &'static str {
        match self {
            TipoDocumento::HojaDeVida => "Hoja de Vida",
            TipoDocumento::CertificadoAcademico => "Certificado Académico",
            TipoDocumento::InformeDePractica => "Informe de Práctica",
            TipoDocumento::Otro => "Otro",
        }
    }

    /// Tipos desconocidos caen en Otro en lugar de rechazar la carga.
    pub fn parse_lenient(s: &str) -> Self {
        match s {
            "Hoja de Vida" => TipoDocumento::HojaDeVida,
            "Certificado Académico" => TipoDocumento::CertificadoAcademico,
            "Informe de Práctica" => TipoDocumento::InformeDePractica,
            _ => TipoDocumento::Otro,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DocumentoAdjunto {
    pub id_documento: i64,
    pub id_postulacion: i64,
    pub nombre_archivo: String,
    pub tipo_documento: String,
    pub ruta_almacenamiento: String,
    pub fecha_carga: Option<DateTime<Utc>>,
}
