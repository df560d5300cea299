use chrono::{DateTime, Utc};
use sqlx::PgPool;

use practicas_backend::error::Error;
use practicas_backend::lifecycle::{Accion, Actor};
use practicas_backend::models::historial::HistorialEstadoPostulacion;
use practicas_backend::services::postulacion_service::PostulacionService;
use practicas_backend::services::vacante_service::VacanteService;

struct Semilla {
    admin_id: i64,
    empresa_id: i64,
    estudiante_id: i64,
    vacante_id: i64,
    postulacion_id: i64,
}

async fn sembrar(pool: &PgPool) -> Semilla {
    let programa_id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO programas_academicos (nombre_programa, facultad)
         VALUES ('Ingeniería de Sistemas', 'Ingeniería') RETURNING id_programa",
    )
    .fetch_one(pool)
    .await
    .expect("programa");

    let admin_id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO usuarios_universidad (nombre, email, rol, hashed_password)
         VALUES ('Admin', 'admin@uni.edu', 'Administrador', 'x') RETURNING id_usuario",
    )
    .fetch_one(pool)
    .await
    .expect("usuario");

    let empresa_id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO empresas (razon_social, nit, email_contacto, hashed_password)
         VALUES ('Acme S.A.S.', '900123456', 'rh@acme.com', 'x') RETURNING id_empresa",
    )
    .fetch_one(pool)
    .await
    .expect("empresa");

    let estudiante_id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO estudiantes (id_programa, nombre, apellido, email_institucional, hashed_password)
         VALUES ($1, 'Ana', 'Ruiz', 'ana@uni.edu', 'x') RETURNING id_estudiante",
    )
    .bind(programa_id)
    .fetch_one(pool)
    .await
    .expect("estudiante");

    let vacante_id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO vacantes (id_empresa, titulo_vacante, descripcion_funciones, estado)
         VALUES ($1, 'Practicante de desarrollo', 'Apoyo al equipo', 'Abierta')
         RETURNING id_vacante",
    )
    .bind(empresa_id)
    .fetch_one(pool)
    .await
    .expect("vacante");

    let servicio = PostulacionService::new(pool.clone());
    let postulacion = servicio
        .crear(estudiante_id, vacante_id)
        .await
        .expect("postulación");

    Semilla {
        admin_id,
        empresa_id,
        estudiante_id,
        vacante_id,
        postulacion_id: postulacion.id_postulacion,
    }
}

async fn historial_de(pool: &PgPool, id: i64) -> Vec<HistorialEstadoPostulacion> {
    sqlx::query_as::<_, HistorialEstadoPostulacion>(
        "SELECT id_historial, id_postulacion, estado, fecha_cambio, comentarios,
                id_actor_universidad, id_actor_empresa, id_actor_estudiante
         FROM historial_estados_postulacion
         WHERE id_postulacion = $1 ORDER BY id_historial",
    )
    .bind(id)
    .fetch_all(pool)
    .await
    .expect("historial")
}

async fn estado_de(pool: &PgPool, id: i64) -> String {
    sqlx::query_scalar::<_, String>(
        "SELECT estado_actual FROM postulaciones WHERE id_postulacion = $1",
    )
    .bind(id)
    .fetch_one(pool)
    .await
    .expect("estado")
}

fn fecha(s: &str) -> DateTime<Utc> {
    s.parse().expect("fecha")
}

#[sqlx::test]
async fn una_transicion_deja_exactamente_una_entrada_con_su_actor(pool: PgPool) {
    let semilla = sembrar(&pool).await;
    let servicio = PostulacionService::new(pool.clone());

    let fila = servicio
        .transicionar(
            semilla.postulacion_id,
            Accion::AprobarEmpresa,
            Actor::Empresa(semilla.empresa_id),
            None,
            None,
        )
        .await
        .expect("aprobación de empresa");
    assert_eq!(fila.estado_actual, "En Revisión Universidad");

    let historial = historial_de(&pool, semilla.postulacion_id).await;
    assert_eq!(historial.len(), 1);
    let entrada = &historial[0];
    assert_eq!(entrada.estado, "En Revisión Universidad");
    assert_eq!(entrada.id_actor_empresa, Some(semilla.empresa_id));
    assert_eq!(entrada.id_actor_universidad, None);
    assert_eq!(entrada.id_actor_estudiante, None);
}

#[sqlx::test]
async fn transicion_ilegal_no_escribe_nada(pool: PgPool) {
    let semilla = sembrar(&pool).await;
    let servicio = PostulacionService::new(pool.clone());

    // Aprobación final sin el visto bueno previo de la empresa.
    let err = servicio
        .transicionar(
            semilla.postulacion_id,
            Accion::AprobarUniversidad,
            Actor::Universidad(semilla.admin_id),
            None,
            Some((fecha("2024-03-01T00:00:00Z"), fecha("2024-06-01T00:00:00Z"))),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidTransition(_)));

    assert_eq!(estado_de(&pool, semilla.postulacion_id).await, "Recibida");
    assert!(historial_de(&pool, semilla.postulacion_id).await.is_empty());
}

#[sqlx::test]
async fn aprobacion_final_fija_fechas_y_cubre_la_vacante(pool: PgPool) {
    let semilla = sembrar(&pool).await;
    let servicio = PostulacionService::new(pool.clone());

    servicio
        .transicionar(
            semilla.postulacion_id,
            Accion::AprobarEmpresa,
            Actor::Empresa(semilla.empresa_id),
            None,
            None,
        )
        .await
        .expect("aprobación de empresa");

    let fila = servicio
        .transicionar(
            semilla.postulacion_id,
            Accion::AprobarUniversidad,
            Actor::Universidad(semilla.admin_id),
            Some("Plan de trabajo aprobado".to_string()),
            Some((fecha("2024-03-01T00:00:00Z"), fecha("2024-06-01T00:00:00Z"))),
        )
        .await
        .expect("aprobación final");
    assert_eq!(fila.estado_actual, "Aprobada");
    assert_eq!(fila.fecha_inicio_practica, Some(fecha("2024-03-01T00:00:00Z")));
    assert_eq!(fila.fecha_fin_practica, Some(fecha("2024-06-01T00:00:00Z")));

    let vacante = VacanteService::new(pool.clone())
        .obtener_con_empresa(semilla.vacante_id)
        .await
        .expect("vacante");
    assert_eq!(vacante.estado, "Cubierta");

    let historial = historial_de(&pool, semilla.postulacion_id).await;
    assert_eq!(historial.len(), 2);
    assert_eq!(historial[1].estado, "Aprobada");
    assert_eq!(historial[1].id_actor_universidad, Some(semilla.admin_id));
}

#[sqlx::test]
async fn fechas_invertidas_no_mutan_nada(pool: PgPool) {
    let semilla = sembrar(&pool).await;
    let servicio = PostulacionService::new(pool.clone());

    servicio
        .transicionar(
            semilla.postulacion_id,
            Accion::AprobarEmpresa,
            Actor::Empresa(semilla.empresa_id),
            None,
            None,
        )
        .await
        .expect("aprobación de empresa");

    let err = servicio
        .transicionar(
            semilla.postulacion_id,
            Accion::AprobarUniversidad,
            Actor::Universidad(semilla.admin_id),
            None,
            Some((fecha("2024-06-01T00:00:00Z"), fecha("2024-03-01T00:00:00Z"))),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::BadRequest(_)));

    assert_eq!(
        estado_de(&pool, semilla.postulacion_id).await,
        "En Revisión Universidad"
    );
    assert_eq!(historial_de(&pool, semilla.postulacion_id).await.len(), 1);
}

#[sqlx::test]
async fn comentar_fotografia_el_estado_vigente(pool: PgPool) {
    let semilla = sembrar(&pool).await;
    let servicio = PostulacionService::new(pool.clone());

    servicio
        .transicionar(
            semilla.postulacion_id,
            Accion::AprobarEmpresa,
            Actor::Empresa(semilla.empresa_id),
            None,
            None,
        )
        .await
        .expect("aprobación de empresa");

    let entrada = servicio
        .comentar(
            semilla.postulacion_id,
            Actor::Estudiante(semilla.estudiante_id),
            "¿Cuándo sabré la decisión final?".to_string(),
        )
        .await
        .expect("comentario");
    assert_eq!(entrada.estado, "En Revisión Universidad");
    assert_eq!(entrada.id_actor_estudiante, Some(semilla.estudiante_id));
    assert_eq!(entrada.comentarios.as_deref(), Some("¿Cuándo sabré la decisión final?"));

    let err = servicio
        .comentar(999_999, Actor::Estudiante(semilla.estudiante_id), "hola".to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[sqlx::test]
async fn acciones_terminales_en_competencia_solo_una_gana(pool: PgPool) {
    let semilla = sembrar(&pool).await;
    let servicio = PostulacionService::new(pool.clone());

    servicio
        .transicionar(
            semilla.postulacion_id,
            Accion::AprobarEmpresa,
            Actor::Empresa(semilla.empresa_id),
            None,
            None,
        )
        .await
        .expect("aprobación de empresa");
    servicio
        .transicionar(
            semilla.postulacion_id,
            Accion::AprobarUniversidad,
            Actor::Universidad(semilla.admin_id),
            None,
            Some((fecha("2024-03-01T00:00:00Z"), fecha("2024-06-01T00:00:00Z"))),
        )
        .await
        .expect("aprobación final");
    let antes = historial_de(&pool, semilla.postulacion_id).await.len();

    // Completar y cancelar disparadas a la vez sobre la misma postulación
    // Aprobada: el bloqueo de fila serializa y la segunda lee un estado
    // terminal.
    let completar = servicio.transicionar(
        semilla.postulacion_id,
        Accion::Completar,
        Actor::Empresa(semilla.empresa_id),
        None,
        None,
    );
    let cancelar = servicio.transicionar(
        semilla.postulacion_id,
        Accion::Cancelar,
        Actor::Universidad(semilla.admin_id),
        Some("Cancelación administrativa".to_string()),
        None,
    );
    let (res_completar, res_cancelar) = tokio::join!(completar, cancelar);
    assert!(res_completar.is_ok() != res_cancelar.is_ok());

    let estado = estado_de(&pool, semilla.postulacion_id).await;
    assert!(estado == "Completada" || estado == "Cancelada");
    assert_eq!(historial_de(&pool, semilla.postulacion_id).await.len(), antes + 1);

    // La postulación ya es terminal: ninguna otra acción de cierre entra.
    let err = servicio
        .transicionar(
            semilla.postulacion_id,
            Accion::Cancelar,
            Actor::Empresa(semilla.empresa_id),
            Some("tarde".to_string()),
            None,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidTransition(_)));
}
