// rayan-client/tests/rest_client.rs
// RestClient and controllers against an in-process fake backend

use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, Path, RawQuery, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{delete, get, patch};
use axum::{Json, Router};
use rayan_client::report::{LimitQuery, TopProducts, Trends, TrendsQuery};
use rayan_client::resources::{Banners, Categories, Coupons, Products, Rewards};
use rayan_client::{
    AppSettings, Attachment, AuthSession, AuthToken, ClientConfig, ClientError, ListState,
    ModalState, NoticeBoard, NoticeLevel, ReportView, ResourceApi, RestClient, ScreenController,
};
use serde_json::{Value, json};
use shared::models::BannerKind;

#[derive(Debug, Clone)]
struct Part {
    name: String,
    file_name: Option<String>,
    text: String,
}

#[derive(Default)]
struct Backend {
    banners: Mutex<Vec<Value>>,
    parts: Mutex<Vec<Part>>,
    headers: Mutex<Vec<HeaderMap>>,
    queries: Mutex<Vec<String>>,
    app_open: Mutex<bool>,
}

type Shared = Arc<Backend>;

impl Backend {
    fn seen(&self, headers: &HeaderMap) {
        self.headers.lock().unwrap().push(headers.clone());
    }

    fn last_header(&self, name: &str) -> Option<String> {
        self.headers
            .lock()
            .unwrap()
            .last()
            .and_then(|h| h.get(name))
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }

    fn part(&self, name: &str) -> Option<Part> {
        self.parts.lock().unwrap().iter().find(|p| p.name == name).cloned()
    }
}

async fn collect_parts(mut multipart: Multipart) -> Vec<Part> {
    let mut parts = Vec::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let bytes = field.bytes().await.unwrap();
        parts.push(Part {
            name,
            file_name,
            text: String::from_utf8_lossy(&bytes).into_owned(),
        });
    }
    parts
}

async fn list_banners(State(backend): State<Shared>, headers: HeaderMap) -> Json<Value> {
    backend.seen(&headers);
    let banners = backend.banners.lock().unwrap().clone();
    Json(json!({"success": true, "data": banners}))
}

async fn create_banner(
    State(backend): State<Shared>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Json<Value> {
    backend.seen(&headers);
    let parts = collect_parts(multipart).await;
    let text = |name: &str| {
        parts
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.text.clone())
            .unwrap_or_default()
    };
    let image = parts
        .iter()
        .find(|p| p.name == "imagePath")
        .and_then(|p| p.file_name.clone())
        .unwrap_or_default();

    let mut banners = backend.banners.lock().unwrap();
    let banner = json!({
        "id": banners.len() as i64 + 1,
        "title": text("title"),
        "link": text("link"),
        "productId": text("productId"),
        "type": text("type"),
        "imagePath": format!("https://cdn.rayan.test/{image}")
    });
    banners.push(banner.clone());
    *backend.parts.lock().unwrap() = parts;
    Json(json!({"success": true, "message": "Banner created", "data": banner}))
}

async fn delete_banner(State(backend): State<Shared>, Path(id): Path<i64>) -> impl IntoResponse {
    let mut banners = backend.banners.lock().unwrap();
    let before = banners.len();
    banners.retain(|b| b["id"] != id);
    if banners.len() == before {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"success": false, "message": "Banner not found"})),
        );
    }
    (StatusCode::OK, Json(json!({"success": true, "message": "Banner deleted"})))
}

async fn list_coupons(State(backend): State<Shared>, RawQuery(query): RawQuery) -> Json<Value> {
    backend.queries.lock().unwrap().push(query.unwrap_or_default());
    Json(json!({
        "success": true,
        "data": {
            "items": [],
            "metadata": {"currentPage": 1, "totalPages": 0, "totalItems": 0}
        }
    }))
}

async fn list_categories(State(backend): State<Shared>, headers: HeaderMap) -> Json<Value> {
    backend.seen(&headers);
    Json(json!({"success": true, "data": [{"id": 2, "name": "Shoes"}]}))
}

async fn get_category(Path(id): Path<i64>) -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {"id": id, "name": {"en": "Shoes", "ar": "أحذية"}, "icon": "https://cdn/shoes.png"}
    }))
}

async fn update_category(
    State(backend): State<Shared>,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Json<Value> {
    let parts = collect_parts(multipart).await;
    *backend.parts.lock().unwrap() = parts;
    let en = backend.part("name[en]").map(|p| p.text).unwrap_or_default();
    let ar = backend.part("name[ar]").map(|p| p.text).unwrap_or_default();
    Json(json!({"success": true, "data": {"id": id, "name": {"en": en, "ar": ar}}}))
}

async fn list_products() -> Json<Value> {
    Json(json!({"data": []}))
}

async fn get_product(Path(id): Path<i64>) -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "id": id,
            "name": {"en": "Rice", "ar": "أرز"},
            "price": "20.00",
            "images": [
                {"id": 9, "attach": "/uploads/rice.png"},
                {"id": 10, "attach": "https://cdn.rayan.test/rice-2.png"}
            ],
            "isHidden": false
        }
    }))
}

async fn privacy_page() -> impl IntoResponse {
    (
        [(axum::http::header::CONTENT_TYPE, "text/html; charset=utf-8")],
        "<h1>Privacy Policy</h1>",
    )
}

async fn top_products() -> Json<Value> {
    Json(json!([
        {"id": 3, "name": "Rice", "Image": "/uploads/rice.png", "totalSold": 12, "revenue": "240"}
    ]))
}

async fn list_rewards() -> Json<Value> {
    Json(json!({"success": false, "message": "Rewards are disabled"}))
}

async fn trends() -> Json<Value> {
    Json(json!([
        {"date": "2026-01-01", "revenue": "120.50", "orders": 3},
        {"date": "2026-01-02", "revenue": 80, "orders": "2"}
    ]))
}

async fn app_check(State(backend): State<Shared>) -> Json<Value> {
    let open = *backend.app_open.lock().unwrap();
    Json(json!({"androidVersion": "1.4.0", "iosVersion": "1.4.1", "isOpen": open}))
}

async fn app_toggle(State(backend): State<Shared>) -> Json<Value> {
    let mut open = backend.app_open.lock().unwrap();
    *open = !*open;
    Json(json!({"isOpen": *open}))
}

fn router(backend: Shared) -> Router {
    Router::new()
        .route("/api/v1/banners", get(list_banners).post(create_banner))
        .route("/api/v1/banners/{id}", delete(delete_banner))
        .route("/api/v1/coupons", get(list_coupons))
        .route("/api/v1/category", get(list_categories))
        .route("/api/v1/category/{id}", get(get_category).patch(update_category))
        .route("/api/v1/product", get(list_products))
        .route("/api/v1/product/{id}", get(get_product))
        .route("/api/v1/rewards", get(list_rewards))
        .route("/api/v1/orders/trends", get(trends))
        .route("/api/v1/orders/top-products", get(top_products))
        .route("/api/v1/app-version/privacy-policy-link", get(privacy_page))
        .route("/api/v1/app-version/check", get(app_check))
        .route("/api/v1/app-version/toggle-app-status", patch(app_toggle))
        .with_state(backend)
}

/// Request logs show up with `RUST_LOG=rayan_client=debug cargo test`
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

async fn spawn_backend() -> (String, Shared) {
    init_tracing();
    let backend = Shared::default();
    *backend.app_open.lock().unwrap() = true;
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(backend.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), backend)
}

fn client_for(base_url: &str) -> RestClient {
    let session = AuthSession::with_token(AuthToken::new("test-token").unwrap());
    ClientConfig::new(base_url).build_client(session).unwrap()
}

#[tokio::test]
async fn test_banner_add_end_to_end() {
    let (url, backend) = spawn_backend().await;
    let board = NoticeBoard::new();
    let mut screen = ScreenController::<Banners, _, _>::new(client_for(&url), board.clone());

    screen.refresh().await;
    assert!(screen.items().is_empty());

    screen.open_add();
    screen
        .update_draft(|draft| {
            draft.title = "Sale".into();
            draft.link = "https://example.com".into();
            draft.product_id = Some(5);
            draft.kind = BannerKind::Discount;
        })
        .unwrap();
    screen
        .attach(Attachment::new("sale.png", vec![0x89, b'P', b'N', b'G']))
        .unwrap();
    screen.submit().await.unwrap();

    assert_eq!(screen.modal(), ModalState::Closed);
    assert_eq!(board.active().len(), 1);
    assert_eq!(board.active()[0].message, "Banner added");

    let banner = &screen.items()[0];
    assert_eq!(banner.title.as_deref(), Some("Sale"));
    assert_eq!(banner.product_id, Some(5));
    assert_eq!(banner.kind, BannerKind::Discount);
    assert_eq!(banner.image_path, "https://cdn.rayan.test/sale.png");

    let image = backend.part("imagePath").unwrap();
    assert_eq!(image.file_name.as_deref(), Some("sale.png"));
    assert_eq!(backend.part("type").unwrap().text, "discount");
    assert_eq!(
        backend.last_header("authorization").as_deref(),
        Some("Bearer test-token")
    );
}

#[tokio::test]
async fn test_locale_header_sent_when_configured() {
    let (url, backend) = spawn_backend().await;
    let client = ClientConfig::new(&url)
        .with_locale("ar")
        .build_client(AuthSession::new())
        .unwrap();

    let page = <RestClient as ResourceApi<Categories>>::list(&client, &Default::default())
        .await
        .unwrap();

    assert_eq!(page.items[0].name.en, "Shoes");
    assert_eq!(backend.last_header("accept-language").as_deref(), Some("ar"));
    assert_eq!(backend.last_header("authorization"), None);
}

#[tokio::test]
async fn test_empty_coupon_page() {
    let (url, backend) = spawn_backend().await;
    let board = NoticeBoard::new();
    let mut screen = ScreenController::<Coupons, _, _>::new(client_for(&url), board.clone());

    screen.refresh().await;

    assert_eq!(screen.state(), ListState::Loaded);
    assert!(screen.items().is_empty());
    assert_eq!(screen.pagination().total_items(), Some(0));
    assert!(!screen.pagination().has_next());
    assert!(board.is_empty());

    let query = backend.queries.lock().unwrap()[0].clone();
    assert!(query.contains("page=1"));
    assert!(query.contains("limit=10"));
    assert!(query.contains("sortOrder=DESC"));
    assert!(query.contains("status=active"));
}

#[tokio::test]
async fn test_category_edit_keeps_arabic_and_omits_icon() {
    let (url, backend) = spawn_backend().await;
    let board = NoticeBoard::new();
    let mut screen = ScreenController::<Categories, _, _>::new(client_for(&url), board.clone());
    screen.refresh().await;

    screen.open_edit(2).await.unwrap();
    assert_eq!(screen.draft().unwrap().values().name.ar, "أحذية");
    screen
        .update_draft(|draft| draft.name.en = "Sneakers".into())
        .unwrap();
    screen.submit().await.unwrap();

    assert_eq!(backend.part("name[en]").unwrap().text, "Sneakers");
    assert_eq!(backend.part("name[ar]").unwrap().text, "أحذية");
    assert!(backend.part("icon").is_none());
    assert_eq!(board.active()[0].message, "Category updated");
}

#[tokio::test]
async fn test_delete_missing_banner_reports_server_message() {
    let (url, backend) = spawn_backend().await;
    backend.banners.lock().unwrap().push(json!({
        "id": 1,
        "title": "Sale",
        "type": "new",
        "imagePath": "https://cdn/b.png"
    }));
    let board = NoticeBoard::new();
    let mut screen = ScreenController::<Banners, _, _>::new(client_for(&url), board.clone());
    screen.refresh().await;

    let err = screen.delete(999).await.unwrap_err();

    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    assert_eq!(screen.items().len(), 1);
    assert_eq!(board.len(), 1);
    assert_eq!(board.active()[0].message, "Banner not found");
}

#[tokio::test]
async fn test_body_without_success_flag_is_rejected() {
    let (url, _backend) = spawn_backend().await;
    let client = client_for(&url);

    let err = <RestClient as ResourceApi<Products>>::list(&client, &Default::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_success_false_becomes_api_error() {
    let (url, _backend) = spawn_backend().await;
    let board = NoticeBoard::new();
    let mut screen = ScreenController::<Rewards, _, _>::new(client_for(&url), board.clone());

    screen.refresh().await;

    assert!(screen.items().is_empty());
    assert_eq!(board.count(NoticeLevel::Error), 1);
    assert_eq!(board.active()[0].message, "Rewards are disabled");
}

#[tokio::test]
async fn test_unknown_route_maps_to_http_error() {
    let (url, _backend) = spawn_backend().await;
    let client = client_for(&url);

    let err = client.get_raw::<Value>("nowhere", &[]).await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    assert!(!err.user_message().is_empty());
}

#[tokio::test]
async fn test_unreachable_host_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let client = client_for(&format!("http://{addr}"));

    let err = <RestClient as ResourceApi<Banners>>::list(&client, &Default::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Transport(_)));
    assert_eq!(err.user_message(), "Network error, please try again");
}

#[tokio::test]
async fn test_trends_report_reads_raw_body() {
    let (url, _backend) = spawn_backend().await;
    let board = NoticeBoard::new();
    let mut view = ReportView::<Trends, _, _>::new(client_for(&url), board.clone(), TrendsQuery::default());

    view.refresh().await.unwrap();

    let points = view.data().unwrap();
    assert_eq!(points.len(), 2);
    assert_eq!(points[0].revenue, 120.5);
    assert_eq!(points[1].orders, 2);
    assert!(board.is_empty());
}

#[tokio::test]
async fn test_invalid_report_query_skips_network() {
    let board = NoticeBoard::new();
    let client = client_for("http://127.0.0.1:9");
    let query = TrendsQuery {
        limit: 0,
        ..Default::default()
    };
    let mut view = ReportView::<Trends, _, _>::new(client, board.clone(), query);

    assert!(view.refresh().await.unwrap_err().is_validation());
    assert_eq!(view.state(), ListState::Idle);
    assert_eq!(board.len(), 1);
}

#[tokio::test]
async fn test_app_settings_check_and_toggle() {
    let (url, _backend) = spawn_backend().await;
    let board = NoticeBoard::new();
    let mut settings = AppSettings::new(client_for(&url), board.clone());

    let version = settings.check().await.unwrap();
    assert!(version.is_open);
    assert_eq!(version.android_version.as_deref(), Some("1.4.0"));

    let status = settings.toggle_status().await.unwrap();
    assert!(!status.is_open);
    assert!(!settings.version().unwrap().is_open);
    assert_eq!(board.active()[0].message, "App is now closed");
}

#[tokio::test]
async fn test_product_detail_image_objects_resolved_against_host() {
    let (url, _backend) = spawn_backend().await;
    let board = NoticeBoard::new();
    let mut screen = ScreenController::<Products, _, _>::new(client_for(&url), board.clone());

    screen.open_view(3).await.unwrap();

    let product = screen.selected().unwrap();
    assert_eq!(product.images.len(), 2);
    assert_eq!(product.images[0].id, Some(9));
    assert_eq!(product.thumbnail(), Some(format!("{url}/uploads/rice.png").as_str()));
    assert_eq!(product.images[1].attach, "https://cdn.rayan.test/rice-2.png");
    assert!(board.is_empty());
}

#[tokio::test]
async fn test_top_products_images_resolved() {
    let (url, _backend) = spawn_backend().await;
    let board = NoticeBoard::new();
    let mut view = ReportView::<TopProducts, _, _>::new(client_for(&url), board.clone(), LimitQuery::default());

    view.refresh().await.unwrap();

    let rows = view.data().unwrap();
    assert_eq!(rows[0].total_sold, 12);
    assert_eq!(rows[0].image.as_deref(), Some(format!("{url}/uploads/rice.png").as_str()));
}

#[tokio::test]
async fn test_policy_pages_read_as_text() {
    let (url, _backend) = spawn_backend().await;
    let board = NoticeBoard::new();
    let settings = AppSettings::new(client_for(&url), board.clone());

    let html = settings.privacy_policy().await.unwrap();
    assert_eq!(html, "<h1>Privacy Policy</h1>");

    let err = settings.deletion_policy().await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    assert_eq!(board.count(NoticeLevel::Error), 1);
}
