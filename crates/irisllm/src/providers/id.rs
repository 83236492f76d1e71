use std::fmt::Display;

/// Provider identifier enum - one variant per upstream family the bridge fronts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    Qwen,
    Gemini,
    Veo,
}

impl ProviderId {
    /// Request-path prefix that routes to this provider.
    pub fn path_prefix(&self) -> &'static str {
        match self {
            ProviderId::Qwen => "/qwen/",
            ProviderId::Gemini => "/gemini/",
            ProviderId::Veo => "/veo/",
        }
    }

    /// Resolve a request path to the provider that owns it, if any.
    pub fn from_path(path: &str) -> Option<Self> {
        [ProviderId::Qwen, ProviderId::Gemini, ProviderId::Veo]
            .into_iter()
            .find(|provider| path.starts_with(provider.path_prefix()))
    }

    /// Header that carries the caller credential for this provider.
    /// Qwen rides on the standard bearer header; Gemini and Veo share a
    /// dedicated key header.
    pub fn credential_header(&self) -> &'static str {
        match self {
            ProviderId::Qwen => "authorization",
            ProviderId::Gemini | ProviderId::Veo => "x-gemini-api-key",
        }
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderId::Qwen => write!(f, "Qwen"),
            ProviderId::Gemini => write!(f, "Gemini"),
            ProviderId::Veo => write!(f, "Veo"),
        }
    }
}
