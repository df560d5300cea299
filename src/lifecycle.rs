//! Ciclo de vida de una postulación.
//!
//! Máquina de estados pura: ninguna función de este módulo toca la base de
//! datos. Los servicios consultan aquí qué transición es legal y persisten el
//! resultado; las rutas consultan `acciones_permitidas` para el mismo cuadro
//! de reglas, de modo que la autorización por rol vive en un solo lugar.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Estados posibles de una postulación. Conjunto cerrado: el valor persistido
/// en `postulaciones.estado_actual` siempre proviene de `as_str`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EstadoPostulacion {
    #[serde(rename = "Recibida")]
    Recibida,
    #[serde(rename = "En Revisión Universidad")]
    EnRevisionUniversidad,
    #[serde(rename = "Aprobada")]
    Aprobada,
    #[serde(rename = "Rechazada por Empresa")]
    RechazadaPorEmpresa,
    #[serde(rename = "Rechazada por Universidad")]
    RechazadaPorUniversidad,
    #[serde(rename = "Completada")]
    Completada,
    #[serde(rename = "Cancelada")]
    Cancelada,
}

impl EstadoPostulacion {
    pub fn as_str(&self) -> &'static str {
        match self {
            EstadoPostulacion::Recibida => "Recibida",
            EstadoPostulacion::EnRevisionUniversidad => "En Revisión Universidad",
            EstadoPostulacion::Aprobada => "Aprobada",
            EstadoPostulacion::RechazadaPorEmpresa => "Rechazada por Empresa",
            EstadoPostulacion::RechazadaPorUniversidad => "Rechazada por Universidad",
            EstadoPostulacion::Completada => "Completada",
            EstadoPostulacion::Cancelada => "Cancelada",
        }
    }

    pub fn es_terminal(&self) -> bool {
        matches!(
            self,
            EstadoPostulacion::RechazadaPorEmpresa
                | EstadoPostulacion::RechazadaPorUniversidad
                | EstadoPostulacion::Completada
                | EstadoPostulacion::Cancelada
        )
    }

    pub const TODOS: [EstadoPostulacion; 7] = [
        EstadoPostulacion::Recibida,
        EstadoPostulacion::EnRevisionUniversidad,
        EstadoPostulacion::Aprobada,
        EstadoPostulacion::RechazadaPorEmpresa,
        EstadoPostulacion::RechazadaPorUniversidad,
        EstadoPostulacion::Completada,
        EstadoPostulacion::Cancelada,
    ];
}

impl FromStr for EstadoPostulacion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EstadoPostulacion::TODOS
            .into_iter()
            .find(|e| e.as_str() == s)
            .ok_or_else(|| format!("Estado de postulación desconocido: {}", s))
    }
}

impl fmt::Display for EstadoPostulacion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rol del actor que ejecuta una transición.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActorRol {
    Universidad,
    Empresa,
    Estudiante,
}

impl ActorRol {
    pub const TODOS: [ActorRol; 3] = [
        ActorRol::Universidad,
        ActorRol::Empresa,
        ActorRol::Estudiante,
    ];
}

/// Identidad concreta del actor. Exactamente una de las tres columnas de
/// actor del historial queda poblada por entrada.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    Universidad(i64),
    Empresa(i64),
    Estudiante(i64),
}

impl Actor {
    pub fn rol(&self) -> ActorRol {
        match self {
            Actor::Universidad(_) => ActorRol::Universidad,
            Actor::Empresa(_) => ActorRol::Empresa,
            Actor::Estudiante(_) => ActorRol::Estudiante,
        }
    }

    /// (id_actor_universidad, id_actor_empresa, id_actor_estudiante)
    pub fn columnas_historial(&self) -> (Option<i64>, Option<i64>, Option<i64>) {
        match *self {
            Actor::Universidad(id) => (Some(id), None, None),
            Actor::Empresa(id) => (None, Some(id), None),
            Actor::Estudiante(id) => (None, None, Some(id)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Accion {
    AprobarEmpresa,
    RechazarEmpresa,
    AprobarUniversidad,
    RechazarUniversidad,
    ActualizarFechas,
    Cancelar,
    Completar,
    Comentar,
}

impl Accion {
    pub const TODAS: [Accion; 8] = [
        Accion::AprobarEmpresa,
        Accion::RechazarEmpresa,
        Accion::AprobarUniversidad,
        Accion::RechazarUniversidad,
        Accion::ActualizarFechas,
        Accion::Cancelar,
        Accion::Completar,
        Accion::Comentar,
    ];

    /// Acciones que exigen un comentario con la razón.
    pub fn requiere_comentario(&self) -> bool {
        matches!(
            self,
            Accion::RechazarEmpresa
                | Accion::RechazarUniversidad
                | Accion::Cancelar
                | Accion::Comentar
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransicionInvalida {
    pub desde: EstadoPostulacion,
    pub accion: Accion,
    pub rol: ActorRol,
}

impl fmt::Display for TransicionInvalida {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Transición no permitida: {:?} por {:?} desde el estado '{}'.",
            self.accion, self.rol, self.desde
        )
    }
}

impl std::error::Error for TransicionInvalida {}

/// Cuadro de transiciones. Devuelve el estado resultante si la terna
/// (estado, acción, rol) es legal; no permite saltar estados intermedios ni
/// retroceder fuera de la vía explícita de cancelación.
pub fn transicionar(
    desde: EstadoPostulacion,
    accion: Accion,
    rol: ActorRol,
) -> Result<EstadoPostulacion, TransicionInvalida> {
    use Accion as A;
    use ActorRol as R;
    use EstadoPostulacion as E;

    let hasta = match (desde, accion, rol) {
        (E::Recibida, A::AprobarEmpresa, R::Empresa) => E::EnRevisionUniversidad,
        (E::Recibida, A::RechazarEmpresa, R::Empresa) => E::RechazadaPorEmpresa,
        (E::EnRevisionUniversidad, A::AprobarUniversidad, R::Universidad) => E::Aprobada,
        (E::Recibida | E::EnRevisionUniversidad, A::RechazarUniversidad, R::Universidad) => {
            E::RechazadaPorUniversidad
        }
        (E::Aprobada, A::ActualizarFechas, R::Universidad) => E::Aprobada,
        (E::Aprobada, A::Cancelar, R::Universidad | R::Empresa) => E::Cancelada,
        (E::Aprobada, A::Completar, R::Empresa) => E::Completada,
        // Comentar nunca cambia el estado y está abierto a los tres roles.
        (estado, A::Comentar, _) => estado,
        _ => return Err(TransicionInvalida { desde, accion, rol }),
    };
    Ok(hasta)
}

/// Acciones legales para un rol dado el estado actual. Derivado del mismo
/// cuadro que `transicionar`, así el servidor y cualquier cliente que lo
/// consulte no pueden discrepar.
pub fn acciones_permitidas(estado: EstadoPostulacion, rol: ActorRol) -> Vec<Accion> {
    Accion::TODAS
        .into_iter()
        .filter(|accion| transicionar(estado, *accion, rol).is_ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use Accion as A;
    use ActorRol as R;
    use EstadoPostulacion as E;

    #[test]
    fn flujo_feliz_hasta_completada() {
        let e = transicionar(E::Recibida, A::AprobarEmpresa, R::Empresa).unwrap();
        assert_eq!(e, E::EnRevisionUniversidad);
        let e = transicionar(e, A::AprobarUniversidad, R::Universidad).unwrap();
        assert_eq!(e, E::Aprobada);
        let e = transicionar(e, A::Completar, R::Empresa).unwrap();
        assert_eq!(e, E::Completada);
        assert!(e.es_terminal());
    }

    #[test]
    fn rechazo_de_empresa_es_terminal() {
        let e = transicionar(E::Recibida, A::RechazarEmpresa, R::Empresa).unwrap();
        assert_eq!(e, E::RechazadaPorEmpresa);
        assert!(e.es_terminal());
        for accion in A::TODAS {
            if accion == A::Comentar {
                continue;
            }
            for rol in R::TODOS {
                assert!(transicionar(e, accion, rol).is_err());
            }
        }
    }

    #[test]
    fn universidad_puede_rechazar_antes_de_aprobar() {
        assert!(transicionar(E::Recibida, A::RechazarUniversidad, R::Universidad).is_ok());
        assert!(transicionar(E::EnRevisionUniversidad, A::RechazarUniversidad, R::Universidad).is_ok());
        assert!(transicionar(E::Aprobada, A::RechazarUniversidad, R::Universidad).is_err());
    }

    #[test]
    fn aprobacion_final_solo_desde_revision_universidad() {
        assert!(transicionar(E::Recibida, A::AprobarUniversidad, R::Universidad).is_err());
        assert!(transicionar(E::Aprobada, A::AprobarUniversidad, R::Universidad).is_err());
        assert!(transicionar(E::EnRevisionUniversidad, A::AprobarUniversidad, R::Empresa).is_err());
    }

    #[test]
    fn cancelar_solo_desde_aprobada_y_nunca_estudiante() {
        for estado in E::TODOS {
            for rol in R::TODOS {
                let res = transicionar(estado, A::Cancelar, rol);
                let legal = estado == E::Aprobada && rol != R::Estudiante;
                assert_eq!(res.is_ok(), legal, "estado={:?} rol={:?}", estado, rol);
            }
        }
    }

    #[test]
    fn completar_tras_completada_falla() {
        let e = transicionar(E::Aprobada, A::Completar, R::Empresa).unwrap();
        assert!(transicionar(e, A::Cancelar, R::Empresa).is_err());
        assert!(transicionar(e, A::Cancelar, R::Universidad).is_err());
    }

    #[test]
    fn actualizar_fechas_solo_en_aprobada() {
        assert_eq!(
            transicionar(E::Aprobada, A::ActualizarFechas, R::Universidad).unwrap(),
            E::Aprobada
        );
        for estado in E::TODOS {
            if estado == E::Aprobada {
                continue;
            }
            assert!(transicionar(estado, A::ActualizarFechas, R::Universidad).is_err());
        }
        assert!(transicionar(E::Aprobada, A::ActualizarFechas, R::Empresa).is_err());
    }

    #[test]
    fn comentar_no_cambia_el_estado() {
        for estado in E::TODOS {
            for rol in R::TODOS {
                assert_eq!(transicionar(estado, A::Comentar, rol).unwrap(), estado);
            }
        }
    }

    #[test]
    fn toda_transicion_produce_un_estado_del_conjunto() {
        for estado in E::TODOS {
            for accion in A::TODAS {
                for rol in R::TODOS {
                    if let Ok(hasta) = transicionar(estado, accion, rol) {
                        assert!(E::TODOS.contains(&hasta));
                    }
                }
            }
        }
    }

    #[test]
    fn acciones_permitidas_coinciden_con_el_cuadro() {
        let acciones = acciones_permitidas(E::Recibida, R::Empresa);
        assert!(acciones.contains(&A::AprobarEmpresa));
        assert!(acciones.contains(&A::RechazarEmpresa));
        assert!(acciones.contains(&A::Comentar));
        assert!(!acciones.contains(&A::Cancelar));

        let acciones = acciones_permitidas(E::Aprobada, R::Estudiante);
        assert_eq!(acciones, vec![A::Comentar]);
    }

    #[test]
    fn estados_persisten_ida_y_vuelta() {
        for estado in E::TODOS {
            assert_eq!(estado.as_str().parse::<E>().unwrap(), estado);
        }
        assert!("Pendiente".parse::<E>().is_err());
    }
}
