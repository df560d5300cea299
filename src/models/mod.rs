pub mod documento;
pub mod empresa;
pub mod estudiante;
pub mod historial;
pub mod postulacion;
pub mod programa;
pub mod usuario;
pub mod vacante;
