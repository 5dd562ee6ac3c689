use serde_aux::field_attributes::deserialize_number_from_string;
use std::convert::{TryFrom, TryInto};

#[derive(serde::Deserialize, Debug, Clone)]
pub struct Settings {
    pub name: String,
    pub application: ApplicationSettings,
    #[serde(default)]
    pub adapter: AdapterSettings,
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct ApplicationSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
}

/// Receive adapter defaults used when a render request leaves them out.
#[derive(serde::Deserialize, Debug, Clone, PartialEq)]
pub struct AdapterSettings {
    pub image: String,
}

impl Default for AdapterSettings {
    fn default() -> AdapterSettings {
        Self {
            image: String::from("apiserver-receive-adapter:latest"),
        }
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().map_err(|why| {
        config::ConfigError::Message(format!("failed to determine the current directory: {}", why))
    })?;
    let configuration_directory = base_path.join("etc");

    // Detect the running environment.
    // Default to `local` if unspecified.
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(config::ConfigError::Message)?;

    let environment_filename = format!("{}.yaml", environment.as_str());
    let settings = config::Config::builder()
        .add_source(config::File::from(
            configuration_directory.join("base.yaml"),
        ))
        .add_source(
            config::File::from(configuration_directory.join(environment_filename))
                .required(false),
        )
        // Add in settings from environment variables (with a prefix of APP and '__' as separator)
        // E.g. `APP_ADAPTER__IMAGE=adapter:v2` would set `Settings.adapter.image`
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;
    match settings.try_deserialize::<Settings>() {
        Err(why) => {
            tracing::error!("failed to load config: {}", why);
            Err(why)
        }
        Ok(config) => Ok(config),
    }
}

/// The possible runtime environment for our application.
#[derive(Debug, PartialEq)]
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
                "{} is not a supported environment. Use either `local` or `production`.",
                other
            )),
        }
    }
}
