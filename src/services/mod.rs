pub mod auth_service;
pub mod documento_service;
pub mod empresa_service;
pub mod estudiante_service;
pub mod postulacion_service;
pub mod programa_service;
pub mod vacante_service;
