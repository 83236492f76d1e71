use irisllm::apis::openai::{ModelEntry, ModelsResponse};
use irisllm::apis::ApiDefinition;
use irisllm::{GeminiApi, QwenApi, VeoApi, CHAT_COMPLETIONS_PATH, MODELS_PATH};
use serde::Serialize;

/// Shared `created` stamp for the fixed model listing.
const MODELS_CREATED: u64 = 1686935002;

/// Capability listing served at the root and attached to 404 replies.
#[derive(Debug, Clone, Serialize)]
pub struct Catalog {
    pub status: &'static str,
    pub message: &'static str,
    pub endpoints: CatalogEndpoints,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogEndpoints {
    pub qwen: Vec<&'static str>,
    pub gemini: Vec<&'static str>,
    pub veo: Vec<&'static str>,
    pub compat: Vec<&'static str>,
}

/// The advertised listing is frozen: it predates the image generation route
/// and the versioned Veo generate aliases, and existing callers key on it.
pub fn catalog() -> Catalog {
    Catalog {
        status: "ok",
        message: "API Bridge for Qwen, Gemini and Veo running",
        endpoints: CatalogEndpoints {
            qwen: vec![
                QwenApi::ChatCompletions.endpoint(),
                QwenApi::DocumentAnalysis.endpoint(),
                QwenApi::ImageAnalysis.endpoint(),
            ],
            gemini: GeminiApi::all_variants()
                .iter()
                .map(|api| api.endpoint())
                .collect(),
            veo: vec![
                VeoApi::Analyze.endpoint(),
                VeoApi::Annotate.endpoint(),
                VeoApi::Detect.endpoint(),
                VeoApi::Generate.endpoint(),
            ],
            compat: vec![MODELS_PATH, CHAT_COMPLETIONS_PATH],
        },
    }
}

/// Fixed model listing for the OpenAI-compatible surface. The entries are
/// advisory; chat requests route to Qwen regardless of the model asked for.
pub fn models_listing() -> ModelsResponse {
    ModelsResponse {
        object: "list".to_string(),
        data: vec![
            ModelEntry::new("qwen-max", MODELS_CREATED, "aliyun"),
            ModelEntry::new("qwen-plus", MODELS_CREATED, "aliyun"),
            ModelEntry::new("qwen-turbo", MODELS_CREATED, "aliyun"),
            ModelEntry::new("gemini-pro", MODELS_CREATED, "google"),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_listing_is_frozen() {
        let catalog = catalog();
        assert_eq!(catalog.status, "ok");
        assert_eq!(catalog.message, "API Bridge for Qwen, Gemini and Veo running");

        assert_eq!(
            catalog.endpoints.qwen,
            vec![
                "/qwen/chat/completions",
                "/qwen/analyze/document",
                "/qwen/analyze/image"
            ]
        );
        assert_eq!(catalog.endpoints.gemini.len(), 4);
        assert_eq!(
            catalog.endpoints.veo,
            vec!["/veo/analyze", "/veo/annotate", "/veo/detect", "/veo/generate"]
        );
        assert_eq!(
            catalog.endpoints.compat,
            vec!["/v1/models", "/v1/chat/completions"]
        );
    }

    #[test]
    fn test_models_listing_shape() {
        let listing = models_listing();
        assert_eq!(listing.object, "list");

        let ids: Vec<&str> = listing.data.iter().map(|model| model.id.as_str()).collect();
        assert_eq!(ids, vec!["qwen-max", "qwen-plus", "qwen-turbo", "gemini-pro"]);

        for model in &listing.data {
            assert_eq!(model.object, "model");
            assert_eq!(model.created, 1686935002);
        }
        assert_eq!(listing.data[0].owned_by, "aliyun");
        assert_eq!(listing.data[3].owned_by, "google");
    }
}
