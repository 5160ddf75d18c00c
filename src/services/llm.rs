use crate::models::Endpoints;
use anyhow::{Context, Result};
use futures_util::future::LocalBoxFuture;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::Client;

/// Characters JavaScript's `encodeURIComponent` leaves untouched.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub fn encode_component(input: &str) -> String {
    utf8_percent_encode(input, URI_COMPONENT).to_string()
}

#[derive(Clone, PartialEq, Debug)]
pub struct TextRequest {
    pub model_id: String,
    pub prompt: String,
    pub params: Vec<(&'static str, String)>,
}

#[derive(Clone, PartialEq, Debug)]
pub struct ImageRequest {
    pub prompt: String,
    pub width: u32,
    pub height: u32,
}

/// Remote collaborator that turns prompts into completions or image locations.
/// Futures are not `Send`: in the browser everything runs on one thread.
pub trait InferenceBackend {
    /// Resolves to the raw completion body.
    fn generate_text<'a>(&'a self, request: &'a TextRequest) -> LocalBoxFuture<'a, Result<String>>;

    /// Resolves to the final URL the generated image is served from.
    fn generate_image<'a>(&'a self, request: &'a ImageRequest) -> LocalBoxFuture<'a, Result<String>>;
}

#[derive(Clone, Debug)]
pub struct PollinationsClient {
    client: Client,
    endpoints: Endpoints,
}

impl PollinationsClient {
    pub fn new(endpoints: Endpoints) -> Self {
        Self {
            client: Client::new(),
            endpoints,
        }
    }

    fn get_clean_url(base: &str) -> String {
        base.trim_end_matches('/').to_string()
    }

    pub fn text_url(&self, request: &TextRequest) -> String {
        format!(
            "{}/{}/{}",
            Self::get_clean_url(&self.endpoints.text_base_url),
            encode_component(&request.model_id),
            encode_component(&request.prompt)
        )
    }

    pub fn image_url(&self, request: &ImageRequest) -> String {
        format!(
            "{}/prompt/{}",
            Self::get_clean_url(&self.endpoints.image_base_url),
            encode_component(&request.prompt)
        )
    }

    pub async fn fetch_text(&self, request: &TextRequest) -> Result<String> {
        let url = self.text_url(request);
        let resp = self
            .client
            .get(url)
            .query(&request.params)
            .send()
            .await
            .context("text endpoint unreachable")?
            .error_for_status()
            .context("text endpoint returned an error status")?;

        resp.text().await.context("failed to read completion body")
    }

    pub async fn fetch_image(&self, request: &ImageRequest) -> Result<String> {
        let url = self.image_url(request);
        let resp = self
            .client
            .get(url)
            .query(&[("width", request.width), ("height", request.height)])
            .send()
            .await
            .context("image endpoint unreachable")?
            .error_for_status()
            .context("image endpoint returned an error status")?;

        // Redirects are followed, so this is where the image actually lives.
        Ok(resp.url().to_string())
    }
}

impl InferenceBackend for PollinationsClient {
    fn generate_text<'a>(&'a self, request: &'a TextRequest) -> LocalBoxFuture<'a, Result<String>> {
        Box::pin(self.fetch_text(request))
    }

    fn generate_image<'a>(&'a self, request: &'a ImageRequest) -> LocalBoxFuture<'a, Result<String>> {
        Box::pin(self.fetch_image(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoding_matches_encode_uri_component() {
        assert_eq!(encode_component("a red cat"), "a%20red%20cat");
        assert_eq!(encode_component("what's (1+1)?"), "what's%20(1%2B1)%3F");
        assert_eq!(encode_component("a/b&c=d#e"), "a%2Fb%26c%3Dd%23e");
        assert_eq!(encode_component("~*!._-"), "~*!._-");
        assert_eq!(encode_component("é"), "%C3%A9");
    }

    #[test]
    fn text_url_encodes_model_and_prompt() {
        let client = PollinationsClient::new(Endpoints {
            text_base_url: "https://text.example/".to_string(),
            ..Endpoints::default()
        });
        let request = TextRequest {
            model_id: "openai".to_string(),
            prompt: "Hello\n\nUser: hi?".to_string(),
            params: Vec::new(),
        };
        assert_eq!(
            client.text_url(&request),
            "https://text.example/openai/Hello%0A%0AUser%3A%20hi%3F"
        );
    }

    #[test]
    fn image_url_puts_prompt_under_prompt_path() {
        let client = PollinationsClient::new(Endpoints::default());
        let request = ImageRequest {
            prompt: "a red cat".to_string(),
            width: 512,
            height: 512,
        };
        assert_eq!(
            client.image_url(&request),
            "https://image.pollinations.ai/prompt/a%20red%20cat"
        );
    }
}
