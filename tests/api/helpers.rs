use once_cell::sync;
use secrecy::Secret;
use wiremock::MockServer;

use portfolio_contact::configuration::get_configuration;
use portfolio_contact::startup::Application;
use portfolio_contact::telemetry;

// This should only run one time, not once for each test
// So we wrap it within `once_cell`
static TRACING: sync::Lazy<()> = sync::Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();

    // We have the option of printing the logs when testing too
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber =
            telemetry::get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        telemetry::init_subscriber(subscriber);
    } else {
        // By default we will just ignore them
        let subscriber =
            telemetry::get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        telemetry::init_subscriber(subscriber);
    }
});

pub struct TestApp {
    pub address: String,
    // Stands in for the email-sending API.
    pub email_server: MockServer,
    pub owner_address: String,
}

impl TestApp {
    pub async fn post_contact(&self, body: serde_json::Value) -> reqwest::Response {
        // With reqwest, we approach it as a user would, performing requests
        // from outside.
        reqwest::Client::new()
            .post(&format!("{}/contact", &self.address))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request.")
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with_api_key(Some(Secret::new("test-api-key".to_string()))).await
}

// The handler must refuse to do anything at all when the credential is
// missing, so some tests need an app spawned without one.
pub async fn spawn_app_without_api_key() -> TestApp {
    spawn_app_with_api_key(None).await
}

async fn spawn_app_with_api_key(api_key: Option<Secret<String>>) -> TestApp {
    // Runs only if it's the first time
    sync::Lazy::force(&TRACING);

    let email_server = MockServer::start().await;

    let configuration = {
        let mut configuration = get_configuration().expect("Failed to read configuration.");
        configuration.application.port = 0; // 0 means a random port.

        // Point the delivery at the mock server instead of the real API.
        configuration.email.base_url = email_server.uri();
        configuration.email.api_key = api_key;

        configuration
    };

    let application = Application::build(&configuration)
        .await
        .expect("Failed to build application.");
    let address = format!("http://127.0.0.1:{}", application.port());
    let _ = tokio::spawn(application.run_until_stopped()); // We are not doing anything to the handle

    // Return the address so that our tests know where to request,
    // and the mock server handle so that they can set expectations on it.
    TestApp {
        address,
        email_server,
        owner_address: configuration.email.owner_address,
    }
}
