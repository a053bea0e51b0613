use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PredictionError, PredictionResult};

const DEFAULT_API_URL: &str = "http://localhost:11434/v1";
const DEFAULT_API_KEY: &str = "ollama";
const DEFAULT_MODEL: &str = "phi3";

/// An OpenAI-compatible chat endpoint (OpenAI, Ollama, vLLM, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmResolver {
    pub api_url: String,
    pub api_key: String,
    pub model_name: String,
}

impl LlmResolver {
    pub fn new(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        model_name: impl Into<String>,
    ) -> Self {
        Self {
            api_url: api_url.into(),
            api_key: api_key.into(),
            model_name: model_name.into(),
        }
    }

    /// Resolver for a model served by a local Ollama.
    pub fn ollama(model_name: impl Into<String>) -> Self {
        Self::new(DEFAULT_API_URL, DEFAULT_API_KEY, model_name)
    }

    /// Load resolver definitions from comma separated environment variables.
    ///
    /// `ECA_LLM_API_URLS`, `ECA_LLM_MODELS` and `ECA_LLM_API_KEYS` take
    /// precedence over the `OPENAI_*` equivalents; with neither set, a local
    /// Ollama `phi3` is assumed. The three lists must be the same length.
    pub fn load_from_env() -> PredictionResult<Vec<Self>> {
        let urls = read_env_list("ECA_LLM_API_URLS")
            .or_else(|| read_env_list("OPENAI_API_URL"))
            .unwrap_or_else(|| vec![DEFAULT_API_URL.to_string()]);
        let models = read_env_list("ECA_LLM_MODELS")
            .or_else(|| read_env_list("OPENAI_MODEL_NAME"))
            .unwrap_or_else(|| vec![DEFAULT_MODEL.to_string()]);
        let keys = read_env_list("ECA_LLM_API_KEYS")
            .or_else(|| read_env_list("OPENAI_API_KEY"))
            .unwrap_or_else(|| vec![DEFAULT_API_KEY.to_string()]);

        zip_lists(urls, models, keys)
    }

    /// Load resolvers from a TOML file with a `[[resolvers]]` array.
    pub fn load_from_toml<P: AsRef<Path>>(path: P) -> PredictionResult<Vec<Self>> {
        #[derive(Deserialize)]
        struct ResolverFile {
            resolvers: Vec<LlmResolver>,
        }

        let raw = fs::read_to_string(path.as_ref()).map_err(|e| {
            PredictionError::Config(format!(
                "unable to read resolver file {}: {e}",
                path.as_ref().display()
            ))
        })?;
        let config: ResolverFile = toml::from_str(&raw)
            .map_err(|e| PredictionError::Config(format!("invalid resolver toml: {e}")))?;
        Ok(config.resolvers)
    }
}

fn read_env_list(key: &str) -> Option<Vec<String>> {
    env::var(key).ok().map(|raw| split_list(&raw))
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|entry| entry.trim().to_string())
        .filter(|entry| !entry.is_empty())
        .collect()
}

fn zip_lists(
    urls: Vec<String>,
    models: Vec<String>,
    keys: Vec<String>,
) -> PredictionResult<Vec<LlmResolver>> {
    if urls.len() != models.len() || models.len() != keys.len() {
        return Err(PredictionError::Config(
            "resolver env vars must provide the same number of entries".into(),
        ));
    }

    Ok(urls
        .into_iter()
        .zip(models)
        .zip(keys)
        .map(|((api_url, model_name), api_key)| LlmResolver {
            api_url,
            api_key,
            model_name,
        })
        .collect())
}
