//! Request handler definitions
//!
//! Define each route and it handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! Since each worker thread processes its requests sequentially, any long, non-cpu-bound operation (database
//! reads, template renders, the event stream) is expressed as a future so that worker threads keep serving other
//! requests while the I/O is in flight.
use actix_session::Session;
use actix_web::{get, http::header, web, HttpRequest, HttpResponse, Responder};
use log::*;
use serde_json::json;
use storefront_admin_engine::{
    order_objects::{MissingUserPolicy, StatusBucket},
    traits::AdminBackend,
    OrderAdminApi,
};

use crate::{
    auth::{check_api_key, require_admin},
    broadcast::OrderBroadcaster,
    config::ApiKeyPolicy,
    data_objects::{CompleteOrderParams, NewOrderAlert, OrderListQuery},
    errors::ServerError,
    templates::TemplateEngine,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro. Each
// invocation produces a zero-sized `HttpServiceFactory` that pins the handler's backend type at registration time.
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

// ----------------------------------------------   Robots  ----------------------------------------------------
/// The dashboard is not for crawlers.
#[get("/robots.txt")]
pub async fn robots() -> impl Responder {
    HttpResponse::Ok().content_type("text/plain").body("User-agent: *\nDisallow: /\n")
}

//----------------------------------------------   Orders page  ------------------------------------------------
route!(admin_orders => Get "/admin/orders" impl AdminBackend);
/// Route handler for the admin orders page.
///
/// Requires a cookie session identifying a user with the admin flag. The `status` query value selects the bucket:
/// `completed` shows paid-and-fulfilled orders, anything else shows the pending view. Up to one page of orders is
/// rendered, newest first, together with the bucket's total count.
///
/// An order whose purchaser record has disappeared is silently dropped from the page; every other failure takes
/// the whole request down.
pub async fn admin_orders<B: AdminBackend>(
    session: Session,
    query: web::Query<OrderListQuery>,
    api: web::Data<OrderAdminApi<B>>,
    templates: web::Data<TemplateEngine>,
) -> Result<HttpResponse, ServerError> {
    let admin = require_admin(&session, api.as_ref()).await?;
    let bucket = StatusBucket::from_query(query.status.as_deref());
    debug!("💻️ GET orders ({bucket}) for admin {}", admin.id);
    let list = api.order_list(bucket, MissingUserPolicy::Skip).await?;
    let page = templates.render_orders_page(&list)?;
    Ok(HttpResponse::Ok().content_type("text/html; charset=utf-8").body(page))
}

//----------------------------------------------   New order alert  --------------------------------------------
route!(new_order_alert => Post "/admin/api/alert/new_order" impl AdminBackend);
/// Route handler for the new-order alert endpoint.
///
/// The order-placement flow calls this after persisting a new order. The order is fetched, assembled and rendered
/// as a standalone card fragment, which is then broadcast to every connected dashboard. Responds with an empty
/// JSON object; broadcast delivery is best-effort and never fails the request.
///
/// Unlike the list flow there is no missing-user guard here: a dangling purchaser reference is an unexpected
/// error. When `SAG_ADMIN_API_SECRET` is configured the call must carry the matching `sag-api-key` header.
pub async fn new_order_alert<B: AdminBackend>(
    req: HttpRequest,
    body: web::Json<NewOrderAlert>,
    api: web::Data<OrderAdminApi<B>>,
    templates: web::Data<TemplateEngine>,
    broadcaster: web::Data<OrderBroadcaster>,
    policy: web::Data<ApiKeyPolicy>,
) -> Result<HttpResponse, ServerError> {
    check_api_key(&req, &policy)?;
    let id = body.into_inner().id.ok_or_else(|| ServerError::InvalidRequestBody("id is required".to_string()))?;
    debug!("💻️ New order alert for order {id}");
    let view = api.order_view(id).await?;
    let card = templates.render_order_card(&view)?;
    broadcaster.broadcast(card);
    Ok(HttpResponse::Ok().json(json!({})))
}

//----------------------------------------------   Complete order  ---------------------------------------------
route!(complete_order => Post "/admin/api/complete_order" impl AdminBackend);
/// Route handler for the complete-order endpoint.
///
/// Stamps the order paid and fulfilled regardless of its prior state, then redirects back to the orders page.
/// Completing an order that does not exist is a logged no-op; the redirect happens either way. The operation is
/// idempotent: a second call only moves the updated-at timestamp.
pub async fn complete_order<B: AdminBackend>(
    req: HttpRequest,
    body: web::Form<CompleteOrderParams>,
    api: web::Data<OrderAdminApi<B>>,
    policy: web::Data<ApiKeyPolicy>,
) -> Result<HttpResponse, ServerError> {
    check_api_key(&req, &policy)?;
    let order_id = body
        .into_inner()
        .order_id
        .ok_or_else(|| ServerError::InvalidRequestBody("orderId is required".to_string()))?;
    info!("💻️ Completion requested for order {order_id}");
    api.complete_order(order_id).await?;
    Ok(HttpResponse::Found().insert_header((header::LOCATION, "/admin/orders")).finish())
}

//----------------------------------------------   Event stream  -----------------------------------------------
route!(order_events => Get "/admin/api/events" impl AdminBackend);
/// Route handler for the dashboard's live event stream.
///
/// Dashboards subscribe here with `EventSource` and receive every order card broadcast while they are connected,
/// framed as `orders` server-sent events. The stream carries nothing historical: whatever was broadcast before
/// the subscription simply never reaches this client.
///
/// The subscription is gated on the same session/admin check as the orders page, since the subscribers are the
/// same admin browsers.
pub async fn order_events<B: AdminBackend>(
    session: Session,
    api: web::Data<OrderAdminApi<B>>,
    broadcaster: web::Data<OrderBroadcaster>,
) -> Result<HttpResponse, ServerError> {
    let admin = require_admin(&session, api.as_ref()).await?;
    debug!("💻️ Admin {} subscribed to the order event stream", admin.id);
    Ok(HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header((header::CACHE_CONTROL, "no-cache"))
        .streaming(broadcaster.event_stream()))
}
