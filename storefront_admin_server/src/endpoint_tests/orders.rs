use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use storefront_admin_engine::{order_objects::StatusBucket, OrderAdminApi, ORDER_PAGE_SIZE};

use super::{
    helpers::{admin_user, call, customer_user, order_fixture, product_fixture, test_templates},
    mocks::MockAdminStore,
};
use crate::routes::AdminOrdersRoute;

fn configure_with(store: MockAdminStore) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg: &mut ServiceConfig| {
        cfg.service(AdminOrdersRoute::<MockAdminStore>::new())
            .app_data(web::Data::new(OrderAdminApi::new(store)))
            .app_data(web::Data::new(test_templates()));
    }
}

/// A store for the happy paths: user 1 is the admin, user 7 a customer, and every product lookup resolves.
fn store_with_orders(orders: Vec<storefront_admin_engine::db_types::Order>, count: i64) -> MockAdminStore {
    let mut store = MockAdminStore::new();
    store.expect_fetch_user_by_id().returning(|id| match id {
        1 => Ok(Some(admin_user(1))),
        7 => Ok(Some(customer_user(7))),
        _ => Ok(None),
    });
    store
        .expect_fetch_orders_in_bucket()
        .withf(|_, limit| *limit == ORDER_PAGE_SIZE)
        .returning(move |_, _| Ok(orders.clone()));
    store.expect_count_orders_in_bucket().returning(move |_| Ok(count));
    store
        .expect_fetch_products_by_ids()
        .returning(|ids| Ok(ids.iter().map(|id| product_fixture(id.as_str())).collect()));
    store
}

#[actix_web::test]
async fn orders_page_requires_a_session() {
    let store = MockAdminStore::new();
    let res = call(TestRequest::get().uri("/admin/orders"), None, configure_with(store)).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.body, "Authentication Error. No active admin session.");
}

#[actix_web::test]
async fn orders_page_rejects_users_without_the_admin_flag() {
    let mut store = MockAdminStore::new();
    store.expect_fetch_user_by_id().returning(|id| Ok(Some(customer_user(id))));
    let res = call(TestRequest::get().uri("/admin/orders"), Some(5), configure_with(store)).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(res.body, "Insufficient Permissions. user does not have permissions");
}

#[actix_web::test]
async fn orders_page_rejects_sessions_whose_user_is_gone() {
    let mut store = MockAdminStore::new();
    store.expect_fetch_user_by_id().returning(|_| Ok(None));
    let res = call(TestRequest::get().uri("/admin/orders"), Some(5), configure_with(store)).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.body, "The data was not found. User 5 not found");
}

#[actix_web::test]
async fn admin_gets_the_rendered_pending_page() {
    let store = store_with_orders(vec![order_fixture(2, 7), order_fixture(1, 7)], 2);
    let res = call(TestRequest::get().uri("/admin/orders"), Some(1), configure_with(store)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body.contains("#10002"));
    assert!(res.body.contains("#10001"));
    assert!(res.body.contains(r#"class="ttlOrders">2<"#));
    assert!(res.body.contains(r#"data-status="""#));
}

#[actix_web::test]
async fn completed_filter_selects_the_completed_bucket() {
    let mut store = MockAdminStore::new();
    store.expect_fetch_user_by_id().returning(|id| Ok(Some(admin_user(id))));
    store
        .expect_fetch_orders_in_bucket()
        .withf(|bucket, limit| *bucket == StatusBucket::Completed && *limit == ORDER_PAGE_SIZE)
        .returning(|_, _| Ok(vec![]));
    store.expect_count_orders_in_bucket().returning(|_| Ok(0));
    let res = call(TestRequest::get().uri("/admin/orders?status=completed"), Some(1), configure_with(store)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body.contains(r#"data-status="completed""#));
}

#[actix_web::test]
async fn list_renders_at_most_one_page_and_the_full_count() {
    // The store yields a full page of 35 orders while the bucket holds 40; the page shows all 35 and the count
    // reflects the bucket.
    let orders = (1..=35).rev().map(|n| order_fixture(n, 7)).collect::<Vec<_>>();
    let store = store_with_orders(orders, 40);
    let res = call(TestRequest::get().uri("/admin/orders"), Some(1), configure_with(store)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body.matches(r#"class="order-card""#).count(), 35);
    assert!(res.body.contains(r#"class="ttlOrders">40<"#));
}

#[actix_web::test]
async fn orders_with_a_missing_purchaser_are_dropped_from_the_page() {
    let mut store = MockAdminStore::new();
    store.expect_fetch_user_by_id().returning(|id| match id {
        1 => Ok(Some(admin_user(1))),
        7 => Ok(Some(customer_user(7))),
        _ => Ok(None),
    });
    store
        .expect_fetch_orders_in_bucket()
        .returning(|_, _| Ok(vec![order_fixture(2, 99), order_fixture(1, 7)]));
    store.expect_count_orders_in_bucket().returning(|_| Ok(2));
    store
        .expect_fetch_products_by_ids()
        .returning(|ids| Ok(ids.iter().map(|id| product_fixture(id.as_str())).collect()));
    let res = call(TestRequest::get().uri("/admin/orders"), Some(1), configure_with(store)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(!res.body.contains("#10002"), "order with a vanished purchaser should be skipped");
    assert!(res.body.contains("#10001"));
}
