use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn,
    routing::{get, patch, post},
    Router,
};
use practicas_backend::{
    config::{get_config, init_config},
    database::pool::create_pool,
    middleware::{auth, rate_limit},
    routes, AppState,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    init_config()?;
    let config = get_config();

    let pool = create_pool().await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let app_state = AppState::new(pool);

    let base_routes = Router::new().route("/health", get(routes::health::health));

    // El login es la única ruta con limitador: protege contra fuerza bruta
    // sin penalizar al resto del tráfico autenticado.
    let auth_public = Router::new()
        .route("/api/auth/login", post(routes::auth::login))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit::RateLimiter::new(config.auth_rps),
            rate_limit::rps_middleware,
        ));

    let auth_privada = Router::new()
        .route("/api/auth/me", get(routes::auth::me))
        .route(
            "/api/auth/change-password",
            post(routes::auth::cambiar_password),
        )
        .layer(from_fn(auth::require_bearer_auth));

    // El alta de usuarios acepta petición anónima solo mientras la tabla
    // está vacía; el guardia fino vive en el handler.
    let bootstrap = Router::new()
        .route("/api/admin/usuarios", post(routes::admin::crear_usuario))
        .layer(from_fn(auth::optional_bearer_auth));

    let admin_api = Router::new()
        .route(
            "/api/admin/programas",
            get(routes::admin::listar_programas).post(routes::admin::crear_programa),
        )
        .route(
            "/api/admin/programas/:id/activar",
            patch(routes::admin::activar_programa),
        )
        .route(
            "/api/admin/programas/:id/inactivar",
            patch(routes::admin::inactivar_programa),
        )
        .route(
            "/api/admin/empresas",
            get(routes::admin::listar_empresas).post(routes::admin::crear_empresa),
        )
        .route(
            "/api/admin/empresas/:id/activar",
            patch(routes::admin::activar_empresa),
        )
        .route(
            "/api/admin/empresas/:id/inactivar",
            patch(routes::admin::inactivar_empresa),
        )
        .route(
            "/api/admin/estudiantes",
            get(routes::admin::listar_estudiantes).post(routes::admin::crear_estudiante),
        )
        .route(
            "/api/admin/estudiantes/:id/activar",
            patch(routes::admin::activar_estudiante),
        )
        .route(
            "/api/admin/estudiantes/:id/inactivar",
            patch(routes::admin::inactivar_estudiante),
        )
        .route(
            "/api/admin/vacantes/pendientes",
            get(routes::admin::vacantes_pendientes),
        )
        .route(
            "/api/admin/vacantes/:id/aprobar",
            patch(routes::admin::aprobar_vacante),
        )
        .route(
            "/api/admin/vacantes/:id/rechazar",
            patch(routes::admin::rechazar_vacante),
        )
        .route(
            "/api/admin/postulaciones/pendientes",
            get(routes::admin::postulaciones_pendientes),
        )
        .route(
            "/api/admin/postulaciones/:id/aprobar",
            patch(routes::admin::aprobar_postulacion),
        )
        .route(
            "/api/admin/postulaciones/:id/rechazar",
            patch(routes::admin::rechazar_postulacion),
        )
        .route(
            "/api/admin/postulaciones/:id/cancelar",
            patch(routes::admin::cancelar_postulacion),
        )
        .route(
            "/api/admin/practicas/historial",
            get(routes::admin::practicas_historial),
        )
        .route(
            "/api/postulaciones/:id/fechas",
            patch(routes::postulaciones::actualizar_fechas),
        )
        .layer(from_fn(auth::require_universidad));

    let empresas_api = Router::new()
        .route("/api/empresas/vacantes", post(routes::empresas::crear_vacante))
        .route("/api/empresas/vacantes/me", get(routes::empresas::mis_vacantes))
        .route(
            "/api/empresas/vacantes/:id/cerrar",
            patch(routes::empresas::cerrar_vacante),
        )
        .route(
            "/api/empresas/postulaciones",
            get(routes::empresas::listar_postulaciones),
        )
        .route(
            "/api/empresas/postulaciones/:id/aprobar",
            patch(routes::empresas::aprobar_postulacion),
        )
        .route(
            "/api/empresas/postulaciones/:id/rechazar",
            patch(routes::empresas::rechazar_postulacion),
        )
        .route(
            "/api/empresas/postulaciones/:id/cancelar",
            patch(routes::empresas::cancelar_postulacion),
        )
        .route(
            "/api/empresas/postulaciones/:id/completar",
            patch(routes::empresas::completar_postulacion),
        )
        .route(
            "/api/empresas/practicas/seguimiento",
            get(routes::empresas::practicas_seguimiento),
        )
        .layer(from_fn(auth::require_empresa));

    let estudiantes_api = Router::new()
        .route(
            "/api/estudiantes/vacantes",
            get(routes::estudiantes::vacantes_disponibles),
        )
        .route(
            "/api/estudiantes/vacantes/:id/postular",
            post(routes::estudiantes::postular),
        )
        .route(
            "/api/estudiantes/postulaciones/me",
            get(routes::estudiantes::mis_postulaciones),
        )
        .layer(from_fn(auth::require_estudiante));

    let postulaciones_api = Router::new()
        .route(
            "/api/postulaciones/:id/historial",
            get(routes::postulaciones::historial),
        )
        .route(
            "/api/postulaciones/:id/comentarios",
            post(routes::postulaciones::agregar_comentario),
        )
        .route(
            "/api/postulaciones/:id/documentos",
            get(routes::postulaciones::listar_documentos)
                .post(routes::postulaciones::subir_documento),
        )
        .layer(from_fn(auth::require_bearer_auth));

    info!("Serving uploads from: {}", config.uploads_dir);

    let app = base_routes
        .merge(auth_public)
        .merge(auth_privada)
        .merge(bootstrap)
        .merge(admin_api)
        .merge(empresas_api)
        .merge(estudiantes_api)
        .merge(postulaciones_api)
        .nest_service(
            "/uploads",
            tower_http::services::ServeDir::new(config.uploads_dir.clone()),
        )
        .with_state(app_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(20 * 1024 * 1024));

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
