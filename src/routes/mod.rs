pub mod admin;
pub mod auth;
pub mod empresas;
pub mod estudiantes;
pub mod health;
pub mod postulaciones;
