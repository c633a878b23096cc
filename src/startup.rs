use std::net::TcpListener;

use actix_web::dev::Server;
use actix_web::http::Method;
use actix_web::{web, App, HttpServer};
use tracing_actix_web::TracingLogger;

use crate::configuration::{EmailSettings, Settings};
use crate::email_client::EmailClient;
use crate::routes::{contact_preflight, health_check, send_contact_email};

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    pub async fn build(configuration: &Settings) -> Result<Self, std::io::Error> {
        let email_client = EmailClient::from_settings(&configuration.email);

        let address = format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        );
        let listener = TcpListener::bind(address)?;
        // Port 0 asks the OS for any free port, so read the real one back.
        let port = listener.local_addr()?.port();
        let server = run(listener, email_client, configuration.email.clone())?;

        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn run(
    listener: TcpListener,
    email_client: EmailClient,
    email_settings: EmailSettings,
) -> Result<Server, std::io::Error> {
    // First create the shareable state, and then move it inside the closure,
    // otherwise you would create it multiple times, every time the closure
    // runs.
    // web::Data is an ARC, so we can clone it inside the closure.
    let email_client = web::Data::new(email_client);
    let email_settings = web::Data::new(email_settings);

    // HttpServer receives a closure returning an App.
    // It will call this closure in multiple threads (to create a multi-threaded
    // web server), so anything inside must be shareable between threads.
    let server = HttpServer::new(move || {
        App::new()
            // Middleware
            .wrap(TracingLogger::default())
            .route("/health_check", web::get().to(health_check))
            .route("/contact", web::post().to(send_contact_email))
            // The browser issues a cross-origin pre-flight before the POST
            // itself; it has to be answered here, not by the handler.
            .route("/contact", web::method(Method::OPTIONS).to(contact_preflight))
            .app_data(email_client.clone()) // Here we pass a clone
            .app_data(email_settings.clone())
    })
    .listen(listener)?
    .run(); // It does not run yet because we have not awaited it

    Ok(server)
}
