use std::net::TcpListener;
use std::time::Duration;

use actix_web::dev::Server;
use actix_web::{App, HttpServer, web};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing_actix_web::TracingLogger;

use crate::analytics::AnalyticsStore;
use crate::configuration::{DatabaseSettings, RateLimitSettings, Settings};
use crate::email_client::EmailClient;
use crate::rate_limit::{RateLimiter, SubscribeRateLimiter, UnsubscribeRateLimiter};
use crate::routes::{
    analytics_json_error_handler, analytics_summary, health_check, record_analytics, subscribe,
    subscription_json_error_handler, unsubscribe,
};

pub struct Application {
    port: u16,
    server: Server,
}

pub struct ApplicationBaseURL(pub String);

impl Application {
    pub async fn build(config: Settings) -> Result<Self, anyhow::Error> {
        let email_client = config.email_client.client();
        let connection_pool = get_connection_pool(&config.database);

        let address = format!("{}:{}", config.app.host, config.app.port);
        let listener = TcpListener::bind(address)?;
        let port = listener.local_addr()?.port();
        let server = run(
            listener,
            connection_pool,
            email_client,
            config.app.base_url,
            config.rate_limit,
        )?;

        Ok(Self { port, server })
    }

    pub fn get_port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn run(
    listener: TcpListener,
    db_pool: PgPool,
    email_client: EmailClient,
    base_url: String,
    rate_limit: RateLimitSettings,
) -> Result<Server, anyhow::Error> {
    let db_pool = web::Data::new(db_pool);
    let email_client = web::Data::new(email_client);
    let base_url = web::Data::new(ApplicationBaseURL(base_url));
    let analytics_store = web::Data::new(AnalyticsStore::default());
    let subscribe_limiter = web::Data::new(SubscribeRateLimiter(RateLimiter::new(
        rate_limit.subscribe_limit,
        rate_limit.window(),
    )));
    let unsubscribe_limiter = web::Data::new(UnsubscribeRateLimiter(RateLimiter::new(
        rate_limit.unsubscribe_limit,
        rate_limit.window(),
    )));

    let server = HttpServer::new(move || {
        // Bodies rejected before a handler runs still answer with the JSON
        // error shape of their endpoint.
        let subscription_json_config =
            web::JsonConfig::default().error_handler(subscription_json_error_handler);
        let analytics_json_config =
            web::JsonConfig::default().error_handler(analytics_json_error_handler);

        App::new()
            .wrap(TracingLogger::default())
            .route("/health_check", web::get().to(health_check))
            .service(
                web::resource("/subscribe")
                    .app_data(subscription_json_config.clone())
                    .route(web::post().to(subscribe)),
            )
            .service(
                web::resource("/unsubscribe")
                    .app_data(subscription_json_config)
                    .route(web::post().to(unsubscribe)),
            )
            .service(
                web::resource("/analytics")
                    .app_data(analytics_json_config)
                    .route(web::post().to(record_analytics))
                    .route(web::get().to(analytics_summary)),
            )
            .app_data(db_pool.clone())
            .app_data(email_client.clone())
            .app_data(base_url.clone())
            .app_data(analytics_store.clone())
            .app_data(subscribe_limiter.clone())
            .app_data(unsubscribe_limiter.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}

pub fn get_connection_pool(db_config: &DatabaseSettings) -> PgPool {
    PgPoolOptions::new()
        .acquire_timeout(Duration::from_secs(2))
        .connect_lazy_with(db_config.with_db())
}
