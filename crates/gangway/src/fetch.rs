use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::Client;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    #[error("image fetch returned status {0}")]
    Status(reqwest::StatusCode),
}

/// An image resolved to inline form: base64 payload plus its media type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub data: String,
    pub content_type: String,
}

/// Download a caller-supplied image URL and base64-encode the bytes. The
/// media type comes from the reply's `content-type` header, defaulting to
/// JPEG when the upstream does not say. Data URIs never reach this function;
/// handlers strip their payload without a network call.
pub async fn fetch_image(client: &Client, url: &str) -> Result<EncodedImage, FetchError> {
    let response = client.get(url).send().await?;
    if !response.status().is_success() {
        return Err(FetchError::Status(response.status()));
    }
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("image/jpeg")
        .to_string();
    let bytes = response.bytes().await?;
    Ok(EncodedImage {
        data: STANDARD.encode(&bytes),
        content_type,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    #[tokio::test]
    async fn test_fetch_image_encodes_bytes() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/cat.png")
            .with_status(200)
            .with_header("content-type", "image/png")
            .with_body("ABC")
            .create_async()
            .await;

        let client = Client::new();
        let image = fetch_image(&client, &format!("{}/cat.png", server.url()))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(image.data, "QUJD");
        assert_eq!(image.content_type, "image/png");
    }

    #[tokio::test]
    async fn test_fetch_image_defaults_to_jpeg() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/mystery")
            .with_status(200)
            .with_body("x")
            .create_async()
            .await;

        let client = Client::new();
        let image = fetch_image(&client, &format!("{}/mystery", server.url()))
            .await
            .unwrap();
        assert_eq!(image.content_type, "image/jpeg");
    }

    #[tokio::test]
    async fn test_fetch_image_rejects_error_status() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/gone")
            .with_status(404)
            .create_async()
            .await;

        let client = Client::new();
        let err = fetch_image(&client, &format!("{}/gone", server.url()))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Status(status) if status.as_u16() == 404));
    }
}
