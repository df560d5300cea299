pub mod auth_dto;
pub mod gestion_dto;
pub mod postulacion_dto;
pub mod vacante_dto;
