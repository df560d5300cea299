use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

#[derive(Debug)]
struct Ventana {
    inicio: Instant,
    cuenta: u32,
}

/// Limitador de ventana fija de un segundo. Solo protege el login contra
/// fuerza bruta; el resto de rutas va detrás de autenticación.
#[derive(Clone, Debug)]
pub struct RateLimiter {
    rps: u32,
    ventana: Arc<Mutex<Ventana>>,
}

impl RateLimiter {
    pub fn new(rps: u32) -> Self {
        Self {
            rps: rps.max(1),
            ventana: Arc::new(Mutex::new(Ventana {
                inicio: Instant::now(),
                cuenta: 0,
            })),
        }
    }

    fn permitir(&self) -> bool {
        let mut guard = self.ventana.lock().expect("rate limiter mutex poisoned");
        let ahora = Instant::now();
        if ahora.duration_since(guard.inicio) >= Duration::from_secs(1) {
            guard.inicio = ahora;
            guard.cuenta = 0;
        }
        if guard.cuenta < self.rps {
            guard.cuenta += 1;
            true
        } else {
            false
        }
    }
}

pub async fn rps_middleware(
    State(state): State<RateLimiter>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if !state.permitir() {
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({ "detail": "Demasiadas solicitudes, inténtalo de nuevo." })),
        )
            .into_response();
    }
    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn la_ventana_corta_en_el_limite() {
        let limiter = RateLimiter::new(3);
        assert!(limiter.permitir());
        assert!(limiter.permitir());
        assert!(limiter.permitir());
        assert!(!limiter.permitir());
    }
}
