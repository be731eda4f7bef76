use std::sync::Arc;

use crate::analytics::AnalyticsStore;
use crate::config::Config;
use crate::errors::AppError;
use crate::llm_client::{LlmCredentials, TextGenerator};
use crate::postings::PostingScraper;
use crate::render::ResumeRenderer;
use crate::tracker::ApplicationStore;
use crate::versions::VersionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// LLM backend. Production: `GeminiClient`.
    pub llm: Arc<dyn TextGenerator>,
    /// Résumé PDF backend. Production: `RenderCvRenderer`.
    pub renderer: Arc<dyn ResumeRenderer>,
    pub applications: Arc<dyn ApplicationStore>,
    pub versions: Arc<VersionStore>,
    pub analytics: AnalyticsStore,
    pub scraper: PostingScraper,
    pub config: Config,
}

impl AppState {
    /// Credentials for one LLM request: the request's key wins over the configured one.
    pub fn credentials(
        &self,
        api_key: Option<&str>,
        model: Option<&str>,
    ) -> Result<LlmCredentials, AppError> {
        Ok(LlmCredentials::resolve(
            api_key,
            self.config.gemini_api_key.as_deref(),
            model,
            &self.config.default_model,
        )?)
    }
}

#[cfg(test)]
pub mod testing {
    //! Fully wired state over temp directories, in-memory SQLite and stubs.

    use std::path::PathBuf;

    use super::*;
    use crate::db::create_memory_pool;
    use crate::llm_client::testing::ScriptedGenerator;
    use crate::llm_client::DEFAULT_MODEL;
    use crate::render::testing::StubRenderer;
    use crate::tracker::JsonFileStore;

    pub fn test_config(data_dir: PathBuf) -> Config {
        Config {
            gemini_api_key: Some("configured-key".to_string()),
            gemini_api_base: "http://127.0.0.1:9".to_string(),
            default_model: DEFAULT_MODEL.to_string(),
            rendercv_bin: "rendercv".to_string(),
            applications_db: data_dir.join("applications_db.json"),
            data_dir,
            port: 0,
            rust_log: "debug".to_string(),
        }
    }

    /// Returns the state and the temp dir backing it; keep the dir alive for the test.
    pub async fn test_state(
        llm: ScriptedGenerator,
        renderer: StubRenderer,
    ) -> (AppState, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path().to_path_buf());
        let analytics = AnalyticsStore::open(create_memory_pool().await.unwrap())
            .await
            .unwrap();

        let state = AppState {
            llm: Arc::new(llm),
            renderer: Arc::new(renderer),
            applications: Arc::new(JsonFileStore::new(config.applications_db.clone())),
            versions: Arc::new(VersionStore::new(config.versions_dir())),
            analytics,
            scraper: PostingScraper::new().unwrap(),
            config,
        };
        (state, dir)
    }
}
