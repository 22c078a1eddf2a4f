use actix_session::{storage::CookieSessionStore, Session, SessionMiddleware};
use actix_web::{
    cookie::Key,
    http::{header, StatusCode},
    test,
    test::TestRequest,
    web,
    web::ServiceConfig,
    App,
    HttpResponse,
};
use chrono::{TimeZone, Utc};
use sag_common::Money;
use storefront_admin_engine::db_types::{
    FinancialStatus,
    FulfillmentStatus,
    LineItem,
    Order,
    Product,
    ProductImage,
    ShippingAddress,
    User,
};

use crate::{
    auth::{SessionUser, SESSION_USER_KEY},
    templates::TemplateEngine,
};

pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: String,
}

pub fn test_templates() -> TemplateEngine {
    TemplateEngine::new(concat!(env!("CARGO_MANIFEST_DIR"), "/templates")).expect("Could not load templates")
}

// Test-only login endpoint standing in for the external authentication flow that issues session cookies in
// production.
async fn test_login(session: Session, path: web::Path<i64>) -> HttpResponse {
    session.insert(SESSION_USER_KEY, SessionUser { id: path.into_inner() }).expect("Could not write the session");
    HttpResponse::Ok().finish()
}

/// Runs one request against a freshly wired test app. With `session_user` set, a login round-trip happens first
/// and the issued session cookie rides along on the request, so the handler sees a real cookie session.
pub async fn call(
    req: TestRequest,
    session_user: Option<i64>,
    configure: impl FnOnce(&mut ServiceConfig),
) -> TestResponse {
    let _ = env_logger::try_init().ok();
    let key = Key::from(&[7u8; 64]);
    let app = App::new()
        .wrap(SessionMiddleware::builder(CookieSessionStore::default(), key).cookie_secure(false).build())
        .route("/test/login/{id}", web::get().to(test_login))
        .configure(configure);
    let service = test::init_service(app).await;
    let mut req = req;
    if let Some(id) = session_user {
        let login = TestRequest::get().uri(&format!("/test/login/{id}")).to_request();
        let res = test::call_service(&service, login).await;
        let cookie = res.response().cookies().next().expect("No session cookie was issued").into_owned();
        req = req.cookie(cookie);
    }
    let res = test::call_service(&service, req.to_request()).await;
    let status = res.status();
    let location = res.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()).map(String::from);
    let body = test::read_body(res).await;
    TestResponse { status, location, body: String::from_utf8_lossy(&body).into_owned() }
}

//--------------------------------------       Fixtures      ----------------------------------------------------------

pub fn admin_user(id: i64) -> User {
    User { id, phone: "+15550100".to_string(), locale: "en".to_string(), is_admin: true }
}

pub fn customer_user(id: i64) -> User {
    User { id, phone: "+15550123".to_string(), locale: "en".to_string(), is_admin: false }
}

pub fn order_fixture(id: i64, user_id: i64) -> Order {
    let product_id = format!("p-{id}");
    Order {
        id,
        order_number: 10000 + id,
        created_at: Utc.with_ymd_and_hms(2024, 3, 15, 18, 30, 0).unwrap(),
        updated_at: Utc.with_ymd_and_hms(2024, 3, 15, 18, 30, 0).unwrap(),
        financial_status: FinancialStatus::Unpaid,
        fulfillment_status: FulfillmentStatus::Unfulfilled,
        total_shipping_price: Money::from(500),
        total_tax: Money::from(90),
        total_line_items_price: Money::from(900),
        total_discounts: Money::from(0),
        subtotal_price: Money::from(900),
        total_price: Money::from(1490),
        total_weight: 2000,
        discount_code: None,
        line_items: vec![LineItem {
            id: format!("li-{id}"),
            title: "Oat milk".to_string(),
            brand: "Grainworks".to_string(),
            price: Money::from(450),
            grams: 1000,
            quantity: 2,
            display_amount: "1".to_string(),
            unit: "l".to_string(),
            product_id: product_id.into(),
        }],
        shipping_address: ShippingAddress { address1: "10 Main Rd".to_string() },
        user_id,
    }
}

pub fn product_fixture(id: &str) -> Product {
    Product {
        id: id.into(),
        images: vec![ProductImage {
            src: format!("https://cdn.example/{id}/0.jpg"),
            src_webp: format!("https://cdn.example/{id}/0.webp"),
            width: 800,
            height: 600,
            alt: "Oat milk".to_string(),
        }],
    }
}
