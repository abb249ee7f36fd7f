use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, app_with, seed, Persona};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn get_request(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

// --- list ---

#[tokio::test]
async fn list_empty_registry() {
    let resp = app()
        .oneshot(get_request("/personas?page=1&pageSize=15"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let personas: Vec<Persona> = body_json(resp).await;
    assert!(personas.is_empty());
}

#[tokio::test]
async fn list_pages_through_seed() {
    let registry = seed(20);

    let resp = app_with(registry.clone())
        .oneshot(get_request("/personas?page=1&pageSize=15"))
        .await
        .unwrap();
    let first: Vec<Persona> = body_json(resp).await;
    assert_eq!(first, registry[..15]);

    let resp = app_with(registry.clone())
        .oneshot(get_request("/personas?page=2&pageSize=15"))
        .await
        .unwrap();
    let second: Vec<Persona> = body_json(resp).await;
    assert_eq!(second, registry[15..]);

    let resp = app_with(registry)
        .oneshot(get_request("/personas?page=3&pageSize=15"))
        .await
        .unwrap();
    let third: Vec<Persona> = body_json(resp).await;
    assert!(third.is_empty());
}

#[tokio::test]
async fn list_defaults_to_first_page_of_fifteen() {
    let resp = app_with(seed(30))
        .oneshot(get_request("/personas"))
        .await
        .unwrap();
    let personas: Vec<Persona> = body_json(resp).await;
    assert_eq!(personas.len(), 15);
    assert_eq!(personas[0].codigo, "P0001");
}

#[tokio::test]
async fn list_bad_page_returns_400() {
    let resp = app()
        .oneshot(get_request("/personas?page=abc"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- create ---

#[tokio::test]
async fn create_returns_201() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/personas",
            r#"{"codigo":"N1","lic_nombre":"Ana"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let persona: Persona = body_json(resp).await;
    assert_eq!(persona.codigo, "N1");
    assert_eq!(persona.lic_nombre, "Ana");
    assert_eq!(persona.ruc, "");
}

#[tokio::test]
async fn create_duplicate_codigo_returns_409() {
    let resp = app_with(seed(1))
        .oneshot(json_request("POST", "/personas", r#"{"codigo":"P0001"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn create_without_codigo_returns_422() {
    let resp = app()
        .oneshot(json_request("POST", "/personas", r#"{"ruc":"1"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// --- update ---

#[tokio::test]
async fn update_unknown_codigo_returns_404() {
    let resp = app_with(seed(3))
        .oneshot(json_request("PUT", "/personas", r#"{"codigo":"ZZZ"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(body_bytes(resp).await.is_empty());
}

// --- full lifecycle ---

#[tokio::test]
async fn create_update_list_lifecycle() {
    use tower::Service;

    let mut app = app_with(seed(2)).into_service();

    // create
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            "/personas",
            r#"{"codigo":"N9","ruc":"NO","verficado":"NO"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    // update the seeded record
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "PUT",
            "/personas",
            r#"{"codigo":"P0001","razon_social":"Nueva","notas":"x"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Persona = body_json(resp).await;
    assert_eq!(updated.razon_social, "Nueva");

    // list shows both changes in order
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request("/personas?page=1&pageSize=15"))
        .await
        .unwrap();
    let personas: Vec<Persona> = body_json(resp).await;
    let codes: Vec<&str> = personas.iter().map(|p| p.codigo.as_str()).collect();
    assert_eq!(codes, vec!["P0001", "P0002", "N9"]);
    assert_eq!(personas[0].razon_social, "Nueva");
    assert_eq!(personas[0].lic_nombre, "");
    assert_eq!(personas[0].extra["notas"], "x");
}
