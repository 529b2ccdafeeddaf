//! Application state wiring all services together.
//!
//! AppState holds everything a request handler needs: the selected provider
//! behind dynamic dispatch, the preloaded templates, the optional weather
//! client, and the suspect cast. All of it is immutable after startup; the
//! handlers themselves are stateless per request.

use std::sync::Arc;

use whodunit_core::llm::BoxLlmProvider;
use whodunit_infra::config::{load_templates, AppConfig, GameTemplates};
use whodunit_infra::llm::build_provider;
use whodunit_infra::weather::WeatherClient;
use whodunit_types::character::Cast;

/// Shared application state, cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<BoxLlmProvider>,
    pub templates: Arc<GameTemplates>,
    pub weather: Option<Arc<WeatherClient>>,
    pub cast: Arc<Cast>,
    /// Whether chat turns are invoked in structured (JSON) mode.
    pub structured_chat: bool,
}

impl AppState {
    /// Initialize the application state: resolve the API key, build the
    /// provider, load both templates. Any failure here aborts startup.
    pub async fn init(config: &AppConfig) -> anyhow::Result<Self> {
        let api_key = config.api_key()?;
        let provider = build_provider(config, api_key);
        let templates = load_templates(config).await?;

        let weather = config
            .weather
            .enabled
            .then(|| Arc::new(WeatherClient::new(config.weather.latitude, config.weather.longitude)));

        Ok(Self {
            provider: Arc::new(provider),
            templates: Arc::new(templates),
            weather,
            cast: Arc::new(Cast::standard()),
            structured_chat: config.structured_chat,
        })
    }
}
