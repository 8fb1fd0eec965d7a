use actix_cors::Cors;
use actix_web::{http::header, middleware::Logger, web, App, HttpServer};

use quizhub_server::{
    app_state::AppState, config::Config, handlers, middleware::RequestIdMiddleware,
};

fn build_cors(config: &Config) -> Cors {
    match config.cors_allowed_origin.as_deref() {
        Some(origin) => Cors::default()
            .allowed_origin(origin)
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE])
            .expose_headers(vec![header::HeaderName::from_static("x-request-id")])
            .max_age(3600),
        None => Cors::permissive(),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            log::error!("Invalid configuration: {}", err);
            std::process::exit(1);
        }
    };

    if config.production {
        if let Err(err) = config.validate_for_production() {
            log::error!("Refusing to start: {}", err);
            std::process::exit(1);
        }
    }

    let (host, port) = config.bind_address();

    let state = match AppState::new(config).await {
        Ok(state) => state,
        Err(err) => {
            log::error!("Failed to initialise application state: {}", err);
            std::process::exit(1);
        }
    };

    if state.config.reconcile_on_startup {
        match state.integrity_service.reconcile().await {
            Ok(report) => log::info!(
                "Reconciliation removed {} orphaned questions and {} dangling references",
                report.orphaned_questions,
                report.dangling_references
            ),
            Err(err) => log::warn!("Reconciliation failed: {}", err),
        }
    }

    log::info!("Starting HTTP server on {}:{}", host, port);

    let data = web::Data::new(state);
    HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .wrap(build_cors(&data.config))
            .wrap(RequestIdMiddleware)
            .wrap(Logger::default())
            .configure(handlers::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
