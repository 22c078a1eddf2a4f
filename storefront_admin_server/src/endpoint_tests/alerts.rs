use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use serde_json::json;
use storefront_admin_engine::OrderAdminApi;

use super::{
    helpers::{call, customer_user, order_fixture, product_fixture, test_templates},
    mocks::MockAdminStore,
};
use crate::{
    auth::API_KEY_HEADER,
    broadcast::OrderBroadcaster,
    config::ApiKeyPolicy,
    routes::{CompleteOrderRoute, NewOrderAlertRoute},
};

fn configure_with(
    store: MockAdminStore,
    broadcaster: OrderBroadcaster,
    policy: ApiKeyPolicy,
) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg: &mut ServiceConfig| {
        cfg.service(NewOrderAlertRoute::<MockAdminStore>::new())
            .service(CompleteOrderRoute::<MockAdminStore>::new())
            .app_data(web::Data::new(OrderAdminApi::new(store)))
            .app_data(web::Data::new(test_templates()))
            .app_data(web::Data::new(broadcaster))
            .app_data(web::Data::new(policy));
    }
}

/// A store holding order 42, purchased by user 7.
fn store_with_order_42() -> MockAdminStore {
    let mut store = MockAdminStore::new();
    store.expect_fetch_order_by_id().returning(|id| match id {
        42 => Ok(Some(order_fixture(42, 7))),
        _ => Ok(None),
    });
    store.expect_fetch_user_by_id().returning(|id| match id {
        7 => Ok(Some(customer_user(7))),
        _ => Ok(None),
    });
    store
        .expect_fetch_products_by_ids()
        .returning(|ids| Ok(ids.iter().map(|id| product_fixture(id.as_str())).collect()));
    store
}

fn alert_request(id: i64) -> TestRequest {
    TestRequest::post().uri("/admin/api/alert/new_order").set_json(json!({ "id": id }))
}

#[actix_web::test]
async fn new_order_alert_broadcasts_to_every_connected_dashboard() {
    let broadcaster = OrderBroadcaster::default();
    let mut rx1 = broadcaster.subscribe();
    let mut rx2 = broadcaster.subscribe();
    let mut rx3 = broadcaster.subscribe();

    let configure = configure_with(store_with_order_42(), broadcaster.clone(), ApiKeyPolicy::open());
    let res = call(alert_request(42), None, configure).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, "{}");

    let card = rx1.recv().await.expect("dashboard 1 should receive the card");
    assert!(card.contains("#10042"));
    assert_eq!(rx2.recv().await.unwrap(), card);
    assert_eq!(rx3.recv().await.unwrap(), card);
    // At most once per dashboard.
    for rx in [&mut rx1, &mut rx2, &mut rx3] {
        assert!(rx.try_recv().is_err());
    }
    // A dashboard connecting after the broadcast sees nothing from it.
    let mut late = broadcaster.subscribe();
    assert!(late.try_recv().is_err());
}

#[actix_web::test]
async fn alert_for_an_unknown_order_is_not_found_and_broadcasts_nothing() {
    let broadcaster = OrderBroadcaster::default();
    let mut rx = broadcaster.subscribe();
    let configure = configure_with(store_with_order_42(), broadcaster.clone(), ApiKeyPolicy::open());
    let res = call(alert_request(99), None, configure).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.body, "The data was not found. Order 99 not found");
    assert!(rx.try_recv().is_err(), "no fragment may be broadcast for a missing order");
}

#[actix_web::test]
async fn alert_without_an_order_id_is_a_validation_error() {
    let configure = configure_with(MockAdminStore::new(), OrderBroadcaster::default(), ApiKeyPolicy::open());
    let req = TestRequest::post().uri("/admin/api/alert/new_order").set_json(json!({}));
    let res = call(req, None, configure).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body, "Could not read request body: id is required");
}

#[actix_web::test]
async fn alert_for_an_order_with_a_vanished_purchaser_is_an_unexpected_error() {
    // The single-order flow deliberately has no missing-user guard.
    let broadcaster = OrderBroadcaster::default();
    let mut store = MockAdminStore::new();
    store.expect_fetch_order_by_id().returning(|_| Ok(Some(order_fixture(42, 99))));
    store.expect_fetch_user_by_id().returning(|_| Ok(None));
    let configure = configure_with(store, broadcaster.clone(), ApiKeyPolicy::open());
    let res = call(alert_request(42), None, configure).await;
    assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[actix_web::test]
async fn configured_api_key_gates_the_internal_endpoints() {
    let policy = ApiKeyPolicy::with_secret("s3cret");
    let configure = configure_with(store_with_order_42(), OrderBroadcaster::default(), policy.clone());
    let res = call(alert_request(42), None, configure).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.body, "Authentication Error. Missing or invalid API key.");

    let configure = configure_with(store_with_order_42(), OrderBroadcaster::default(), policy);
    let req = alert_request(42).insert_header((API_KEY_HEADER, "s3cret"));
    let res = call(req, None, configure).await;
    assert_eq!(res.status, StatusCode::OK);
}

#[actix_web::test]
async fn event_stream_requires_an_admin_session() {
    let broadcaster = OrderBroadcaster::default();
    let store = MockAdminStore::new();
    let configure = move |cfg: &mut ServiceConfig| {
        cfg.service(crate::routes::OrderEventsRoute::<MockAdminStore>::new())
            .app_data(web::Data::new(OrderAdminApi::new(store)))
            .app_data(web::Data::new(broadcaster));
    };
    let res = call(TestRequest::get().uri("/admin/api/events"), None, configure).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.body, "Authentication Error. No active admin session.");
}

#[actix_web::test]
async fn completing_an_order_redirects_to_the_list() {
    let mut store = MockAdminStore::new();
    store.expect_mark_order_complete().withf(|id| *id == 7).returning(|id| {
        let mut order = order_fixture(id, 7);
        order.financial_status = storefront_admin_engine::db_types::FinancialStatus::Paid;
        order.fulfillment_status = storefront_admin_engine::db_types::FulfillmentStatus::Fulfilled;
        Ok(Some(order))
    });
    let configure = configure_with(store, OrderBroadcaster::default(), ApiKeyPolicy::open());
    let req = TestRequest::post().uri("/admin/api/complete_order").set_form([("orderId", "7")]);
    let res = call(req, None, configure).await;
    assert_eq!(res.status, StatusCode::FOUND);
    assert_eq!(res.location.as_deref(), Some("/admin/orders"));
}

#[actix_web::test]
async fn completing_a_missing_order_still_redirects() {
    let mut store = MockAdminStore::new();
    store.expect_mark_order_complete().returning(|_| Ok(None));
    let configure = configure_with(store, OrderBroadcaster::default(), ApiKeyPolicy::open());
    let req = TestRequest::post().uri("/admin/api/complete_order").set_form([("orderId", "9999")]);
    let res = call(req, None, configure).await;
    assert_eq!(res.status, StatusCode::FOUND);
    assert_eq!(res.location.as_deref(), Some("/admin/orders"));
}

#[actix_web::test]
async fn completion_without_an_order_id_is_a_validation_error() {
    let configure = configure_with(MockAdminStore::new(), OrderBroadcaster::default(), ApiKeyPolicy::open());
    let req = TestRequest::post().uri("/admin/api/complete_order").set_form([("other", "x")]);
    let res = call(req, None, configure).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body, "Could not read request body: orderId is required");
}
