use color_eyre::eyre::Context;
use math_quiz_server::{
    config::Config, game::GameService, server::Server, session::SessionStore, telemetry,
};

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    // A missing .env file is fine
    let _ = dotenvy::dotenv();
    telemetry::init_tracing();

    let config = Config::load().wrap_err("Failed to load configuration")?;
    tracing::info!("Loaded configuration: {:?}", config);

    let store = SessionStore::new().with_stop_timeout(config.game.stop_timeout());
    let game = GameService::new(store, config.game.clone());
    let sweeper = game.spawn_sweeper();

    let server = Server::new(game, &config).await?;
    let result = server.run().await;

    sweeper.shutdown().await;
    result
}
