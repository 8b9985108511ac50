use actix_cors::Cors;
use actix_web::{middleware::Logger, App, HttpServer};
use tasktrack::{build_state, config::Config, logging, routes, StartupError};

#[actix_web::main]
async fn main() -> Result<(), StartupError> {
    dotenv::dotenv().ok();
    logging::init(logging::log_file_from_env().as_deref())?;

    let config = Config::from_env()?;
    let state = build_state(&config).await?;

    log::info!("Starting server at {}", config.server_url());
    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(routes::config(state.clone()))
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await?;

    Ok(())
}
