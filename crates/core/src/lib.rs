pub mod domain;
pub mod llm;
pub mod pipeline;
pub mod storage;

pub mod config {
    #[derive(Debug, Clone, Default)]
    pub struct Settings {
        pub database_url: Option<String>,
        pub database_path: Option<String>,
        pub use_ollama: bool,
        pub ollama_url: Option<String>,
        pub ollama_model: Option<String>,
        pub grok_api_key: Option<String>,
        pub grok_url: Option<String>,
        pub openrouter_api_key: Option<String>,
        pub openrouter_url: Option<String>,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                database_url: std::env::var("DATABASE_URL").ok(),
                database_path: std::env::var("DATABASE_PATH").ok(),
                use_ollama: std::env::var("USE_OLLAMA")
                    .map(|v| v == "true")
                    .unwrap_or(false),
                ollama_url: std::env::var("OLLAMA_URL").ok(),
                ollama_model: std::env::var("OLLAMA_MODEL").ok(),
                grok_api_key: std::env::var("GROK_API_KEY").ok(),
                grok_url: std::env::var("GROK_URL").ok(),
                openrouter_api_key: std::env::var("OPENROUTER_API_KEY").ok(),
                openrouter_url: std::env::var("OPENROUTER_URL").ok(),
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
            })
        }

        pub fn has_grok_key(&self) -> bool {
            self.grok_api_key.as_deref().is_some_and(|k| !k.is_empty())
        }

        pub fn has_openrouter_key(&self) -> bool {
            self.openrouter_api_key
                .as_deref()
                .is_some_and(|k| !k.is_empty())
        }

        /// The local model is primary when explicitly requested or when no
        /// remote credential is configured at all.
        pub fn ollama_is_primary(&self) -> bool {
            self.use_ollama || (!self.has_grok_key() && !self.has_openrouter_key())
        }
    }

}
