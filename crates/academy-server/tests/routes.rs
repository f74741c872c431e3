//! Request-level tests for the page server router.

use std::{fs, path::Path};

use academy_core::{PathsConfig, SiteData, TemplateEngine};
use academy_server::{AppState, create_router};
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use tempfile::TempDir;
use tower::ServiceExt;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

struct Site {
    dir: TempDir,
}

impl Site {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let r = dir.path();
        write(r, "views/partials/_nav.tera", "<nav>{{ active }}</nav>");
        write(
            r,
            "views/index.tera",
            "{% include \"partials/_nav.tera\" %}<h1>{{ site.title }}</h1>",
        );
        write(r, "views/English.tera", "{% include \"partials/_nav.tera\" %}<h1>English</h1>");
        write(r, "views/contact.tera", "{% include \"partials/_nav.tera\" %}<form></form>");
        write(r, "public/robots.txt", "User-agent: *");
        Self { dir }
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn router(&self) -> Router {
        let engine =
            TemplateEngine::load(&self.root().join("views"), &PathsConfig::default()).unwrap();
        let state = AppState::new(engine, SiteData::new("Rainbow"));
        create_router(state, &self.root().join("public"))
    }
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

async fn get(app: Router, uri: &str) -> (StatusCode, String) {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

fn post(content_type: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::post("/contact");
    if let Some(ct) = content_type {
        builder = builder.header(header::CONTENT_TYPE, ct);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

#[tokio::test]
async fn test_pages_render_with_active_nav() {
    let site = Site::new();

    let (status, body) = get(site.router(), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "<nav>home</nav><h1>Rainbow</h1>");

    let (status, body) = get(site.router(), "/english").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "<nav>english</nav><h1>English</h1>");

    let (status, body) = get(site.router(), "/contact").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.starts_with("<nav>contact</nav>"));
}

#[tokio::test]
async fn test_route_paths_are_case_sensitive() {
    let site = Site::new();
    let (status, body) = get(site.router(), "/English").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "Not Found: /English");
}

#[tokio::test]
async fn test_healthz_without_templates() {
    let dir = TempDir::new().unwrap();
    let state = AppState::new(
        TemplateEngine::empty(dir.path().join("views"), "tera"),
        SiteData::default(),
    );
    let app = create_router(state, &dir.path().join("public"));

    let (status, body) = get(app.clone(), "/healthz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");

    let (status, body) = get(app, "/").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.starts_with("Error 500: "));
}

#[tokio::test]
async fn test_not_found_text_fallback() {
    let site = Site::new();
    let (status, body) = get(site.router(), "/does-not-exist?x=1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "Not Found: /does-not-exist?x=1");
}

#[tokio::test]
async fn test_not_found_template() {
    let site = Site::new();
    write(site.root(), "views/404.tera", "<h1>Missing {{ url }}</h1>");

    let (status, body) = get(site.router(), "/does-not-exist").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.starts_with("<h1>Missing "));
    assert!(body.contains("does-not-exist"));
}

#[tokio::test]
async fn test_unknown_method_and_path_is_not_found() {
    let site = Site::new();
    let request = Request::post("/nowhere").body(Body::empty()).unwrap();
    let (status, _) = send(site.router(), request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_missing_view_uses_error_template() {
    let site = Site::new();
    fs::remove_file(site.root().join("views/English.tera")).unwrap();
    write(site.root(), "views/error.tera", "<h1>Oops {{ status }}</h1>");

    let (status, body) = get(site.router(), "/english").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "<h1>Oops 500</h1>");
}

#[tokio::test]
async fn test_missing_view_text_fallback() {
    let site = Site::new();
    fs::remove_file(site.root().join("views/English.tera")).unwrap();

    let (status, body) = get(site.router(), "/english").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.starts_with("Error 500: "));
    assert!(body.contains("English.tera"));
}

#[tokio::test]
async fn test_contact_json_submission() {
    let site = Site::new();
    let request = post(
        Some("application/json"),
        r#"{"name":"Ana","message":"Hello","course":"English"}"#,
    );

    let (status, body) = send(site.router(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Thank you <strong>Ana</strong>"));
    assert!(body.contains("<a href=\"/\">Back to Home</a>"));
}

#[tokio::test]
async fn test_contact_form_submission_is_escaped() {
    let site = Site::new();
    let request = post(
        Some("application/x-www-form-urlencoded"),
        "name=%3Cscript%3Ealert(1)%3C%2Fscript%3E&message=hi",
    );

    let (status, body) = send(site.router(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<strong>&lt;script&gt;alert(1)&lt;/script&gt;</strong>"));
    assert!(!body.contains("<script>"));
}

#[tokio::test]
async fn test_contact_without_body_defaults_to_guest() {
    let site = Site::new();
    let (status, body) = send(site.router(), post(None, "")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Thank you <strong>Guest</strong>"));
}

#[tokio::test]
async fn test_contact_invalid_json_is_bad_request() {
    let site = Site::new();
    let (status, body) = send(site.router(), post(Some("application/json"), "{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.starts_with("Error 400: "));
}

#[tokio::test]
async fn test_public_files_are_served() {
    let site = Site::new();
    let (status, body) = get(site.router(), "/robots.txt").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "User-agent: *");
}

#[tokio::test]
async fn test_known_path_with_other_method_is_not_found() {
    let site = Site::new();

    for (method, uri) in [("DELETE", "/contact"), ("POST", "/english"), ("PUT", "/")] {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(site.router(), request).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{method} {uri}");
        assert_eq!(body, format!("Not Found: {uri}"));
    }
}

#[tokio::test]
async fn test_other_method_uses_not_found_template() {
    let site = Site::new();
    write(site.root(), "views/404.tera", "<h1>Missing</h1>");

    let request = Request::delete("/contact").body(Body::empty()).unwrap();
    let (status, body) = send(site.router(), request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "<h1>Missing</h1>");
}

#[tokio::test]
async fn test_pages_answer_with_trailing_slash() {
    let site = Site::new();

    let (status, body) = get(site.router(), "/english/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "<nav>english</nav><h1>English</h1>");

    let (status, body) = get(site.router(), "/contact/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.starts_with("<nav>contact</nav>"));

    let request = Request::post("/contact/")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"name":"Ana"}"#))
        .unwrap();
    let (status, body) = send(site.router(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Thank you <strong>Ana</strong>"));
}

#[tokio::test]
async fn test_contact_empty_json_body_defaults_to_guest() {
    let site = Site::new();
    let (status, body) = send(site.router(), post(Some("application/json"), "")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Thank you <strong>Guest</strong>"));
}

#[tokio::test]
async fn test_contact_empty_form_body_defaults_to_guest() {
    let site = Site::new();
    let request = post(Some("application/x-www-form-urlencoded"), "");
    let (status, body) = send(site.router(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Thank you <strong>Guest</strong>"));
}
