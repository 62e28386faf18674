// Startup configuration read from the environment.
// Credentials are owned by the deployment (env / .env), read once at boot,
// and treated as immutable inputs for the lifetime of the process.

/// Models we accept from OPENAI_MODEL; anything else falls back to the default.
pub const ALLOWED_MODELS: &[&str] = &["gpt-4", "gpt-4o", "gpt-4o-mini", "gpt-4-turbo", "gpt-3.5-turbo"];

pub const DEFAULT_MODEL: &str = "gpt-4";

#[derive(Debug, Clone)]
pub struct Settings {
    /// YouTube Data API key (required for reads).
    pub youtube_api_key: String,
    /// OAuth access token with youtube.force-ssl scope (required for writes).
    pub youtube_access_token: String,
    pub openai_api_key: String,
    /// Resolved chat model, always one of ALLOWED_MODELS.
    pub openai_model: String,
    /// Shared secret callers must present as a bearer token ("can edit content").
    pub editor_token: String,
}

impl Settings {
    pub fn from_env() -> Self {
        let youtube_api_key = env_or_empty("YOUTUBE_API_KEY");
        let youtube_access_token = env_or_empty("YOUTUBE_ACCESS_TOKEN");
        let openai_api_key = env_or_empty("OPENAI_API_KEY");
        let openai_model = resolve_model(&env_or_empty("OPENAI_MODEL"));
        let editor_token = env_or_empty("EDITOR_TOKEN");

        if youtube_api_key.is_empty() {
            tracing::warn!("YOUTUBE_API_KEY not found. YouTube fetch will be unavailable.");
        }
        if youtube_access_token.is_empty() {
            tracing::warn!("YOUTUBE_ACCESS_TOKEN not found. YouTube metadata updates will be unavailable.");
        }
        if openai_api_key.is_empty() {
            tracing::warn!("OPENAI_API_KEY not found. Text generation will be unavailable.");
        }
        if editor_token.is_empty() {
            tracing::warn!("EDITOR_TOKEN not found. All API requests will be rejected.");
        }
        tracing::info!("Using OpenAI model: {}", openai_model);

        Self {
            youtube_api_key,
            youtube_access_token,
            openai_api_key,
            openai_model,
            editor_token,
        }
    }
}

/// Resolve a configured model name against the allow-list.
pub fn resolve_model(configured: &str) -> String {
    let configured = configured.trim();
    if ALLOWED_MODELS.contains(&configured) {
        configured.to_string()
    } else {
        if !configured.is_empty() {
            tracing::warn!("OPENAI_MODEL '{}' is not recognized, using {}", configured, DEFAULT_MODEL);
        }
        DEFAULT_MODEL.to_string()
    }
}

fn env_or_empty(key: &str) -> String {
    std::env::var(key).unwrap_or_default()
}
