use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    #[serde(default)]
    pub identificacion: String,
    #[serde(default)]
    pub lic_apellido: String,
    #[serde(default)]
    pub lic_nombre: String,
    #[serde(default)]
    pub ruc: String,
    pub codigo: String,
    #[serde(default)]
    pub verficado: String,
    #[serde(default)]
    pub razon_social: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<usize>,
    #[serde(rename = "pageSize")]
    pub page_size: Option<usize>,
}

pub const DEFAULT_PAGE_SIZE: usize = 15;

pub type Db = Arc<RwLock<Vec<Persona>>>;

/// An empty registry.
pub fn app() -> Router {
    app_with(Vec::new())
}

pub fn app_with(personas: Vec<Persona>) -> Router {
    let db: Db = Arc::new(RwLock::new(personas));
    Router::new()
        .route(
            "/personas",
            get(list_personas).post(create_persona).put(update_persona),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener, personas: Vec<Persona>) -> Result<(), std::io::Error> {
    info!(addr = ?listener.local_addr().ok(), count = personas.len(), "serving registry");
    axum::serve(listener, app_with(personas)).await
}

/// `count` deterministic demo records. Every third has no RUC and every
/// other one is unverified.
pub fn seed(count: usize) -> Vec<Persona> {
    const SURNAMES: [&str; 5] = ["Mora", "Vera", "Cedeño", "Paredes", "Zambrano"];
    const NAMES: [&str; 5] = ["Ana", "Luis", "Rosa", "Jorge", "Elena"];
    (1..=count)
        .map(|n| Persona {
            identificacion: format!("09{n:08}"),
            lic_apellido: SURNAMES[n % SURNAMES.len()].to_string(),
            lic_nombre: NAMES[n % NAMES.len()].to_string(),
            ruc: if n % 3 == 0 {
                "NO TIENE".to_string()
            } else {
                format!("09{n:08}001")
            },
            codigo: format!("P{n:04}"),
            verficado: if n % 2 == 0 { "NO" } else { "SI" }.to_string(),
            razon_social: format!("Comercial {n}"),
            extra: Map::new(),
        })
        .collect()
}

async fn list_personas(State(db): State<Db>, Query(query): Query<PageQuery>) -> Json<Vec<Persona>> {
    let page = query.page.unwrap_or(1).max(1);
    let size = query.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
    let personas = db.read().await;
    let slice: Vec<Persona> = personas
        .iter()
        .skip((page - 1).saturating_mul(size))
        .take(size)
        .cloned()
        .collect();
    debug!(page, size, returned = slice.len(), "list");
    Json(slice)
}

async fn create_persona(
    State(db): State<Db>,
    Json(input): Json<Persona>,
) -> Result<(StatusCode, Json<Persona>), StatusCode> {
    let mut personas = db.write().await;
    if personas.iter().any(|p| p.codigo == input.codigo) {
        return Err(StatusCode::CONFLICT);
    }
    personas.push(input.clone());
    info!(codigo = %input.codigo, "created");
    Ok((StatusCode::CREATED, Json(input)))
}

async fn update_persona(
    State(db): State<Db>,
    Json(input): Json<Persona>,
) -> Result<Json<Persona>, StatusCode> {
    let mut personas = db.write().await;
    let slot = personas
        .iter_mut()
        .find(|p| p.codigo == input.codigo)
        .ok_or(StatusCode::NOT_FOUND)?;
    *slot = input.clone();
    info!(codigo = %input.codigo, "updated");
    Ok(Json(input))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persona_serializes_with_registry_names() {
        let persona = Persona {
            codigo: "P0001".to_string(),
            verficado: "SI".to_string(),
            ..Persona::default()
        };
        let json = serde_json::to_value(&persona).unwrap();
        assert_eq!(json["codigo"], "P0001");
        assert_eq!(json["verficado"], "SI");
        assert_eq!(json["razon_social"], "");
    }

    #[test]
    fn persona_requires_codigo() {
        let result: Result<Persona, _> = serde_json::from_str(r#"{"ruc":"1"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn persona_keeps_unknown_fields() {
        let persona: Persona =
            serde_json::from_str(r#"{"codigo":"P1","telefono":"555"}"#).unwrap();
        assert_eq!(persona.extra["telefono"], "555");
    }

    #[test]
    fn seed_is_deterministic_and_unique() {
        let a = seed(40);
        assert_eq!(a, seed(40));
        let mut codes: Vec<_> = a.iter().map(|p| p.codigo.clone()).collect();
        codes.dedup();
        assert_eq!(codes.len(), 40);
    }

    #[test]
    fn seed_mixes_markers() {
        let personas = seed(6);
        assert_eq!(personas.iter().filter(|p| p.ruc.contains("NO")).count(), 2);
        assert_eq!(personas.iter().filter(|p| p.verficado.contains("NO")).count(), 3);
    }
}
