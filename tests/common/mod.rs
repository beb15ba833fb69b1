use math_quiz_server::{
    config::Config, game::GameService, server::Server, session::SessionStore, telemetry,
};

// Helper function to spawn a test server on a random port
pub async fn spawn_server() -> String {
    telemetry::init_tracing();

    let config = {
        let mut config = Config::load().unwrap();
        config.server.host = "127.0.0.1".to_string();
        // Use a random OS port
        config.server.port = 0;
        config
    };

    let game = GameService::new(SessionStore::new(), config.game.clone());
    let server = Server::new(game, &config).await.unwrap();

    let port = server.port();
    tokio::spawn(server.run());

    format!("http://{}:{}", config.server.host, port)
}
