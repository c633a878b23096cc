use secrecy::Secret;

#[derive(serde::Deserialize, Debug)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub email: EmailSettings,
}

#[derive(serde::Deserialize, Debug)]
pub struct ApplicationSettings {
    pub port: u16,
    pub host: String,
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct EmailSettings {
    pub base_url: String,
    // The owner inbox and the two "from" identities are configuration, not
    // literals baked into the delivery code.
    pub owner_address: String,
    pub notification_from: String,
    pub acknowledgement_from: String,
    pub timeout_milliseconds: u64,
    // Secret does not let us expose this by mistake (e.g. Debug display)
    // and will also make sure it gets zeroed out in memory due to Zeroize trait.
    // Absence is a runtime configuration error, not a startup crash: the
    // handler must still answer requests with a proper error payload.
    #[serde(default)]
    pub api_key: Option<Secret<String>>,
}

impl EmailSettings {
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_milliseconds)
    }
}

pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. \
                Use either `local` or `production`.",
                other
            )),
        }
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    // Merge variables in .env file to OS environment variables.
    // This makes the variables accessible for `config` below.
    dotenv::dotenv().ok();

    let base_path = std::env::current_dir().expect("Failed to determine the current directory");
    let configuration_directory = base_path.join("configuration");

    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into()) // By default, we use Local environment.
        .try_into()
        .expect("Failed to parse APP_ENVIRONMENT.");
    // Depending on the environment (local or production), we load the corresponding configuration
    // file.
    let environment_filename = format!("{}.yaml", environment.as_str());

    let base = config::File::from(configuration_directory.join("base.yaml"));
    let environment = config::File::from(configuration_directory.join(environment_filename));

    let settings = config::Config::builder()
        .add_source(base)
        .add_source(environment)
        // This determines the format of environment variables we must set.
        // APP_EMAIL__BASE_URL will map to Settings.email.base_url
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    // Serde will return it to us strongly typed.
    let mut settings = settings.try_deserialize::<Settings>()?;

    // The deployment platform only sets RESEND_API_KEY, so read the credential
    // straight from the environment instead of requiring the APP_ prefix.
    if let Ok(api_key) = std::env::var("RESEND_API_KEY") {
        settings.email.api_key = Some(Secret::new(api_key));
    }

    Ok(settings)
}
