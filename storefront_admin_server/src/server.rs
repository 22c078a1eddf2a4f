use std::time::Duration;

use actix_files::Files;
use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use storefront_admin_engine::{OrderAdminApi, SqliteDatabase};

use crate::{
    broadcast::OrderBroadcaster,
    config::{ApiKeyPolicy, ServerConfig},
    errors::ServerError,
    routes::{health, robots, AdminOrdersRoute, CompleteOrderRoute, NewOrderAlertRoute, OrderEventsRoute},
    templates::TemplateEngine,
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let srv = create_server_instance(config, db)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(config: ServerConfig, db: SqliteDatabase) -> Result<Server, ServerError> {
    // The shared, read-mostly collaborators are all built here, before the first request, and handed to every
    // worker: the template engine (loads from disk once), the broadcaster (one channel shared by all workers, or
    // fan-out would be per-worker) and the database pool.
    let templates = TemplateEngine::new(&config.template_dir)?;
    let broadcaster = OrderBroadcaster::default();
    let (host, port) = (config.host.clone(), config.port);
    let srv = HttpServer::new(move || {
        let api = OrderAdminApi::new(db.clone());
        let session = SessionMiddleware::builder(CookieSessionStore::default(), config.session.key.clone())
            .cookie_name(config.session.cookie_name.clone())
            .cookie_secure(config.session.cookie_secure)
            .build();
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("sag::access_log"))
            .wrap(session)
            .app_data(web::Data::new(api))
            .app_data(web::Data::new(templates.clone()))
            .app_data(web::Data::new(broadcaster.clone()))
            .app_data(web::Data::new(ApiKeyPolicy::from_config(&config)))
            .service(health)
            .service(robots)
            .service(AdminOrdersRoute::<SqliteDatabase>::new())
            .service(NewOrderAlertRoute::<SqliteDatabase>::new())
            .service(CompleteOrderRoute::<SqliteDatabase>::new())
            .service(OrderEventsRoute::<SqliteDatabase>::new())
            .service(Files::new("/admin", config.static_dir.clone()))
            .default_service(web::route().to(not_found))
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((host.as_str(), port))?
    .run();
    Ok(srv)
}

async fn not_found() -> Result<actix_web::HttpResponse, ServerError> {
    Err(ServerError::PageNotFound)
}
