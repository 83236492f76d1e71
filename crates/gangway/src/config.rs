use irisllm::VeoApi;
use std::env;

/// Default socket the bridge listens on.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8787";

const DEFAULT_QWEN_BASE_URL: &str = "https://qianwen.biz.aliyun.com";
const DEFAULT_GEMINI_BASE_URL: &str = "https://gemini.google.com/api";
const DEFAULT_VEO_BASE_URL: &str = "https://veo.google.com/api";
const DEFAULT_VEO2_BASE_URL: &str = "https://veo.google.com/api/v2";

fn env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

/// Upstream base URLs. Credentials never live here; callers supply them
/// per-request through headers.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    pub qwen_base_url: String,
    pub gemini_base_url: String,
    pub veo_base_url: String,
    pub veo2_base_url: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        BridgeConfig {
            qwen_base_url: DEFAULT_QWEN_BASE_URL.to_string(),
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            veo_base_url: DEFAULT_VEO_BASE_URL.to_string(),
            veo2_base_url: DEFAULT_VEO2_BASE_URL.to_string(),
        }
    }
}

impl BridgeConfig {
    /// Read the upstream URLs from the environment, falling back to the
    /// production defaults.
    pub fn from_env() -> Self {
        BridgeConfig {
            qwen_base_url: env_or("QWEN_BASE_URL", DEFAULT_QWEN_BASE_URL),
            gemini_base_url: env_or("GEMINI_BASE_URL", DEFAULT_GEMINI_BASE_URL),
            veo_base_url: env_or("VEO_BASE_URL", DEFAULT_VEO_BASE_URL),
            veo2_base_url: env_or("VEO2_BASE_URL", DEFAULT_VEO2_BASE_URL),
        }
    }

    /// Base URL serving the given Veo operation.
    pub fn veo_base(&self, api: &VeoApi) -> &str {
        if api.uses_v2_base() {
            &self.veo2_base_url
        } else {
            &self.veo_base_url
        }
    }
}

/// Per-process shared state: the configuration plus one reused HTTP client.
pub struct BridgeState {
    pub config: BridgeConfig,
    pub http: reqwest::Client,
}

impl BridgeState {
    pub fn new(config: BridgeConfig) -> Self {
        BridgeState {
            config,
            http: reqwest::Client::new(),
        }
    }
}
