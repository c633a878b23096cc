use portfolio_contact::configuration::get_configuration;
use portfolio_contact::startup::Application;
use portfolio_contact::telemetry;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let subscriber = telemetry::get_subscriber(
        "portfolio-contact".to_string(),
        "info".to_string(),
        std::io::stdout,
    );
    telemetry::init_subscriber(subscriber);

    let configuration = get_configuration().expect("Failed to read configuration.");

    let application = Application::build(&configuration).await?;
    tracing::info!("Listening on port {}", application.port());
    application.run_until_stopped().await
}
