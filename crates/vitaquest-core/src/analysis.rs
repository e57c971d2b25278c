//! Remote analysis/chat service client.
//!
//! The service is opaque to the state core: a request carries a prompt
//! and optionally an image (by URL or raw bytes), a successful response
//! carries free text, a match/confidence result, or a macro breakdown.
//! Non-2xx responses surface as [`AnalysisError::Server`] carrying the
//! server's message text; the calling surface is responsible for display.

use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::nutrition::NutrientTotals;

/// Image attached to an analysis request.
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// Reference the service can fetch itself.
    Url(String),
    /// Raw bytes, base64-encoded on the wire.
    Bytes(Vec<u8>),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalysisRequest<'a> {
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_base64: Option<String>,
}

impl<'a> AnalysisRequest<'a> {
    fn new(prompt: &'a str, image: Option<&'a ImageSource>) -> Self {
        let (image_url, image_base64) = match image {
            Some(ImageSource::Url(url)) => (Some(url.as_str()), None),
            Some(ImageSource::Bytes(bytes)) => (
                None,
                Some(base64::engine::general_purpose::STANDARD.encode(bytes)),
            ),
            None => (None, None),
        };
        Self {
            prompt,
            image_url,
            image_base64,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TextResponse {
    text: String,
}

/// Structured match result (supplement recognition).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub name: String,
    /// Confidence in `[0, 1]`.
    pub confidence: f64,
}

/// Client for the analysis service.
pub struct AnalysisClient {
    base_url: String,
    api_key: Option<String>,
    client: Client,
}

impl AnalysisClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: None,
            client: Client::new(),
        }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            client: Client::new(),
        }
    }

    async fn post<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        request: &AnalysisRequest<'_>,
    ) -> Result<T, AnalysisError> {
        let mut builder = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }
        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AnalysisError::Server {
                status: status.as_u16(),
                message,
            });
        }
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| AnalysisError::InvalidResponse(e.to_string()))
    }

    /// Free-text analysis (tip chat).
    pub async fn analyze_text(&self, prompt: &str) -> Result<String, AnalysisError> {
        let request = AnalysisRequest::new(prompt, None);
        let response: TextResponse = self.post("/analyze/text", &request).await?;
        Ok(response.text)
    }

    /// Recognize a supplement from an image.
    pub async fn match_supplement(
        &self,
        prompt: &str,
        image: &ImageSource,
    ) -> Result<MatchResult, AnalysisError> {
        let request = AnalysisRequest::new(prompt, Some(image));
        self.post("/analyze/match", &request).await
    }

    /// Macro breakdown of a meal photo.
    pub async fn analyze_meal(
        &self,
        prompt: &str,
        image: &ImageSource,
    ) -> Result<NutrientTotals, AnalysisError> {
        let request = AnalysisRequest::new(prompt, Some(image));
        self.post("/analyze/meal", &request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn analyze_text_returns_body_text() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/analyze/text")
            .with_status(200)
            .with_body(r#"{"text":"Magnesium supports sleep quality."}"#)
            .create_async()
            .await;

        let client = AnalysisClient::new(&server.url());
        let text = client.analyze_text("tell me about magnesium").await.unwrap();
        assert_eq!(text, "Magnesium supports sleep quality.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn match_supplement_parses_confidence() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/analyze/match")
            .with_status(200)
            .with_body(r#"{"name":"Omega-3","confidence":0.92}"#)
            .create_async()
            .await;

        let client = AnalysisClient::new(&server.url());
        let result = client
            .match_supplement("what is this", &ImageSource::Url("https://x/img.jpg".into()))
            .await
            .unwrap();
        assert_eq!(result.name, "Omega-3");
        assert!((result.confidence - 0.92).abs() < 1e-9);
    }

    #[tokio::test]
    async fn analyze_meal_returns_macros() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/analyze/meal")
            .with_status(200)
            .with_body(
                r#"{"protein":25.0,"calories":450.0,"carbohydrates":30.0,"fat":18.0,"fiber":6.0}"#,
            )
            .create_async()
            .await;

        let client = AnalysisClient::new(&server.url());
        let macros = client
            .analyze_meal("estimate macros", &ImageSource::Bytes(vec![1, 2, 3]))
            .await
            .unwrap();
        assert_eq!(macros.protein, 25.0);
        assert_eq!(macros.calories, 450.0);
    }

    #[tokio::test]
    async fn non_success_carries_server_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/analyze/text")
            .with_status(422)
            .with_body("prompt too long")
            .create_async()
            .await;

        let client = AnalysisClient::new(&server.url());
        let err = client.analyze_text("...").await.unwrap_err();
        match err {
            AnalysisError::Server { status, message } => {
                assert_eq!(status, 422);
                assert_eq!(message, "prompt too long");
            }
            other => panic!("expected server error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn garbage_body_is_invalid_response() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/analyze/text")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let client = AnalysisClient::new(&server.url());
        let err = client.analyze_text("hi").await.unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidResponse(_)));
    }

    #[test]
    fn image_bytes_are_base64_encoded() {
        let source = ImageSource::Bytes(vec![1, 2, 3]);
        let request = AnalysisRequest::new("p", Some(&source));
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["imageBase64"], "AQID");
        assert!(json.get("imageUrl").is_none());
    }
}
