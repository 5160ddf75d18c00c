use doli_chat::models::{Endpoints, GenerationConfig, ImageSize, PromptTemplate};
use doli_chat::services::dispatcher::{DispatchRequest, RequestDispatcher};
use doli_chat::services::llm::{ImageRequest, InferenceBackend, PollinationsClient, TextRequest};
use httpmock::prelude::*;

fn client_for(server: &MockServer) -> PollinationsClient {
    PollinationsClient::new(Endpoints {
        text_base_url: server.base_url(),
        image_base_url: server.base_url(),
    })
}

fn request(input: &str) -> DispatchRequest {
    DispatchRequest {
        conversation_id: "conv_1".to_string(),
        input: input.to_string(),
        model_id: "openai".to_string(),
        template: None,
        upload: None,
        config: GenerationConfig::default(),
        image_size: ImageSize::Medium,
    }
}

#[tokio::test]
async fn text_request_returns_body_and_sends_generation_params() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path_contains("/openai/")
            .query_param("temperature", "0.7")
            .query_param("max_tokens", "2048")
            .query_param("top_p", "0.9");
        then.status(200)
            .header("content-type", "text/plain")
            .body("Hi! How can I help?");
    });

    let client = client_for(&server);
    let answer = client
        .generate_text(&TextRequest {
            model_id: "openai".to_string(),
            prompt: "Hello there".to_string(),
            params: GenerationConfig::default().query_pairs(),
        })
        .await
        .unwrap();

    mock.assert();
    assert_eq!(answer, "Hi! How can I help?");
}

#[tokio::test]
async fn error_status_is_an_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path_contains("/openai/");
        then.status(500).body("boom");
    });

    let client = client_for(&server);
    let result = client
        .generate_text(&TextRequest {
            model_id: "openai".to_string(),
            prompt: "Hello".to_string(),
            params: Vec::new(),
        })
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn image_request_resolves_to_final_url_after_redirect() {
    let server = MockServer::start();
    let final_url = server.url("/cdn/cat.jpg");
    let generate = server.mock(|when, then| {
        when.method(GET)
            .path_contains("/prompt/")
            .query_param("width", "512")
            .query_param("height", "512");
        then.status(302).header("location", final_url.as_str());
    });
    let cdn = server.mock(|when, then| {
        when.method(GET).path("/cdn/cat.jpg");
        then.status(200).header("content-type", "image/jpeg").body("jpeg");
    });

    let client = client_for(&server);
    let url = client
        .generate_image(&ImageRequest {
            prompt: "a red cat".to_string(),
            width: 512,
            height: 512,
        })
        .await
        .unwrap();

    generate.assert();
    cdn.assert();
    assert_eq!(url, final_url);
}

#[tokio::test]
async fn dispatcher_turns_image_command_into_markdown() {
    let server = MockServer::start();
    let (width, height) = ImageSize::Medium.dimensions();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path_contains("/prompt/")
            .query_param("width", width.to_string())
            .query_param("height", height.to_string());
        then.status(200).header("content-type", "image/jpeg").body("jpeg");
    });

    let dispatcher = RequestDispatcher::new(client_for(&server));
    let reply = dispatcher.dispatch(&request("Generate Image: a red cat")).await;

    mock.assert();
    assert!(reply.succeeded);
    assert!(!reply.message.is_from_user);
    assert!(reply.message.text.starts_with("![Generated Image]("));
    assert!(reply.message.text.contains("/prompt/"));
}

#[tokio::test]
async fn dispatcher_sends_template_prompt_and_reports_success() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path_contains("/openai/");
        then.status(200).body("Here is your review.");
    });

    let template = PromptTemplate::defaults().remove(0);
    let dispatcher = RequestDispatcher::new(client_for(&server));
    let mut req = request("");
    req.template = Some(template);
    let reply = dispatcher.dispatch(&req).await;

    mock.assert();
    assert!(reply.succeeded);
    assert_eq!(reply.message.text, "Here is your review.");
    assert_eq!(reply.message.model_id.as_deref(), Some("openai"));
}

#[tokio::test]
async fn dispatcher_reports_failure_as_error_message() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path_contains("/openai/");
        then.status(503);
    });

    let dispatcher = RequestDispatcher::new(client_for(&server));
    let reply = dispatcher.dispatch(&request("Hello")).await;

    assert!(!reply.succeeded);
    assert_eq!(
        reply.message.text,
        "**Error:** Unable to process your request with model \"openai\". Please try again or switch models."
    );
}
