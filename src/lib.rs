pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod lifecycle;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use crate::services::{
    auth_service::AuthService, documento_service::DocumentoService,
    empresa_service::EmpresaService, estudiante_service::EstudianteService,
    postulacion_service::PostulacionService, programa_service::ProgramaService,
    vacante_service::VacanteService,
};
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub auth_service: AuthService,
    pub programa_service: ProgramaService,
    pub empresa_service: EmpresaService,
    pub estudiante_service: EstudianteService,
    pub vacante_service: VacanteService,
    pub postulacion_service: PostulacionService,
    pub documento_service: DocumentoService,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        let auth_service = AuthService::new(pool.clone());
        let programa_service = ProgramaService::new(pool.clone());
        let empresa_service = EmpresaService::new(pool.clone());
        let estudiante_service = EstudianteService::new(pool.clone());
        let vacante_service = VacanteService::new(pool.clone());
        let postulacion_service = PostulacionService::new(pool.clone());
        let documento_service = DocumentoService::new(pool.clone());

        Self {
            pool,
            auth_service,
            programa_service,
            empresa_service,
            estudiante_service,
            vacante_service,
            postulacion_service,
            documento_service,
        }
    }
}
