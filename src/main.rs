use actix::Actor;
use actix_cors::Cors;
use actix_web::{self, App, HttpServer, middleware::Logger, web};
use std::sync::LazyLock;
use std::time::Duration;

use crate::modules::websocket::server::RelayServer;

mod api;
mod constants;
mod modules;
mod test;

pub static ENV: LazyLock<constants::Env> = LazyLock::new(|| {
    dotenvy::dotenv().ok();
    env_logger::init();
    log::info!("Environment variables loaded from .env file");
    constants::Env::default()
});

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let relay = RelayServer::new(Duration::from_secs(ENV.heartbeat_interval)).start();

    println!("Starting relay server at http://{}:{}", ENV.ip.as_str(), ENV.port);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(
                Cors::default()
                    .allowed_origin(ENV.frontend_url.as_str())
                    .allowed_methods(vec!["GET"]),
            )
            .app_data(web::Data::new(relay.clone()))
            .configure(modules::websocket::route::configure)
    })
    .bind((ENV.ip.as_str(), ENV.port))?
    .workers(2)
    .run()
    .await
}
