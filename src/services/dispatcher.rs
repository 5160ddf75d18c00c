use log::{error, info};

use crate::models::{GenerationConfig, ImageSize, Message, PromptTemplate, UploadedFile};
use crate::services::llm::{ImageRequest, InferenceBackend, TextRequest};

pub const IMAGE_PREFIX: &str = "generate image:";

/// Everything one send needs, captured from the app state at submit time.
#[derive(Clone, PartialEq, Debug)]
pub struct DispatchRequest {
    pub conversation_id: String,
    pub input: String,
    pub model_id: String,
    pub template: Option<PromptTemplate>,
    pub upload: Option<UploadedFile>,
    pub config: GenerationConfig,
    pub image_size: ImageSize,
}

#[derive(Clone, PartialEq, Debug)]
pub enum Outbound {
    Text(TextRequest),
    Image(ImageRequest),
}

/// The assistant message produced for one send, success or not.
#[derive(Clone, PartialEq, Debug)]
pub struct Reply {
    pub message: Message,
    pub succeeded: bool,
}

/// Returns the trimmed image prompt when the input asks for an image.
pub fn image_prompt(input: &str) -> Option<&str> {
    let head = input.get(..IMAGE_PREFIX.len())?;
    if head.eq_ignore_ascii_case(IMAGE_PREFIX) {
        Some(input[IMAGE_PREFIX.len()..].trim())
    } else {
        None
    }
}

/// Joins template prompt, upload note and user input. A bare input is sent verbatim.
pub fn compose_prompt(
    input: &str,
    template: Option<&PromptTemplate>,
    upload: Option<&UploadedFile>,
) -> String {
    if template.is_none() && upload.is_none() {
        return input.to_string();
    }

    let mut sections = Vec::with_capacity(3);
    if let Some(template) = template {
        sections.push(template.system_prompt.clone());
    }
    if let Some(file) = upload {
        sections.push(format!(
            "The user has uploaded a file \"{}\" ({}) with the following content: {}",
            file.name, file.mime_type, file.content
        ));
    }
    sections.push(format!("User: {}", input));
    sections.join("\n\n")
}

pub fn error_text(model_id: &str) -> String {
    format!(
        "**Error:** Unable to process your request with model \"{}\". Please try again or switch models.",
        model_id
    )
}

pub fn image_markdown(url: &str) -> String {
    format!("![Generated Image]({})", url)
}

pub fn build_outbound(request: &DispatchRequest) -> Outbound {
    match image_prompt(&request.input) {
        Some(prompt) => {
            let (width, height) = request.image_size.dimensions();
            Outbound::Image(ImageRequest {
                prompt: prompt.to_string(),
                width,
                height,
            })
        }
        None => Outbound::Text(TextRequest {
            model_id: request.model_id.clone(),
            prompt: compose_prompt(
                &request.input,
                request.template.as_ref(),
                request.upload.as_ref(),
            ),
            params: request.config.query_pairs(),
        }),
    }
}

pub struct RequestDispatcher<B> {
    backend: B,
}

impl<B: InferenceBackend> RequestDispatcher<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Performs the call and maps the outcome to exactly one assistant message.
    /// Failures become an error message; nothing is propagated.
    pub async fn dispatch(&self, request: &DispatchRequest) -> Reply {
        let result = match build_outbound(request) {
            Outbound::Image(image) => {
                info!("requesting {}x{} image", image.width, image.height);
                self.backend
                    .generate_image(&image)
                    .await
                    .map(|url| image_markdown(&url))
            }
            Outbound::Text(text) => {
                info!("requesting completion from {}", text.model_id);
                self.backend.generate_text(&text).await
            }
        };

        match result {
            Ok(body) => Reply {
                message: Message::assistant(body, &request.model_id),
                succeeded: true,
            },
            Err(e) => {
                error!("request with model {} failed: {:#}", request.model_id, e);
                Reply {
                    message: Message::assistant(error_text(&request.model_id), &request.model_id),
                    succeeded: false,
                }
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use anyhow::{anyhow, Result};
    use futures_util::future::LocalBoxFuture;
    use std::cell::RefCell;

    /// Records every call and answers from a script.
    #[derive(Default)]
    pub struct ScriptedBackend {
        pub fail: bool,
        pub text_calls: RefCell<Vec<TextRequest>>,
        pub image_calls: RefCell<Vec<ImageRequest>>,
    }

    impl ScriptedBackend {
        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }
    }

    impl InferenceBackend for ScriptedBackend {
        fn generate_text<'a>(&'a self, request: &'a TextRequest) -> LocalBoxFuture<'a, Result<String>> {
            self.text_calls.borrow_mut().push(request.clone());
            let fail = self.fail;
            Box::pin(async move {
                if fail {
                    Err(anyhow!("503 Service Unavailable"))
                } else {
                    Ok(format!("echo: {}", request.prompt))
                }
            })
        }

        fn generate_image<'a>(&'a self, request: &'a ImageRequest) -> LocalBoxFuture<'a, Result<String>> {
            self.image_calls.borrow_mut().push(request.clone());
            let fail = self.fail;
            Box::pin(async move {
                if fail {
                    Err(anyhow!("connection reset"))
                } else {
                    Ok("https://img.example/cat.jpg".to_string())
                }
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::ScriptedBackend;
    use super::*;
    use crate::models::TemplateIcon;

    fn request(input: &str) -> DispatchRequest {
        DispatchRequest {
            conversation_id: "default".to_string(),
            input: input.to_string(),
            model_id: "mistral".to_string(),
            template: None,
            upload: None,
            config: GenerationConfig::default(),
            image_size: ImageSize::Medium,
        }
    }

    fn template() -> PromptTemplate {
        PromptTemplate {
            id: "t".to_string(),
            title: "Pirate".to_string(),
            description: String::new(),
            system_prompt: "Talk like a pirate.".to_string(),
            icon: TemplateIcon::User,
        }
    }

    fn upload() -> UploadedFile {
        UploadedFile {
            name: "notes.txt".to_string(),
            mime_type: "text/plain".to_string(),
            size_bytes: 5,
            content: "hello".to_string(),
        }
    }

    #[test]
    fn image_prefix_is_case_insensitive_and_trimmed() {
        assert_eq!(image_prompt("generate image: a red cat"), Some("a red cat"));
        assert_eq!(image_prompt("Generate Image:   sunset  "), Some("sunset"));
        assert_eq!(image_prompt("generate image:"), Some(""));
        assert_eq!(image_prompt("please generate image: x"), None);
        assert_eq!(image_prompt("gen"), None);
        assert_eq!(image_prompt("généré"), None);
    }

    #[test]
    fn bare_input_is_sent_verbatim() {
        assert_eq!(compose_prompt("hi", None, None), "hi");
    }

    #[test]
    fn prompt_sections_keep_template_file_input_order() {
        let prompt = compose_prompt("summarise", Some(&template()), Some(&upload()));
        assert_eq!(
            prompt,
            "Talk like a pirate.\n\n\
             The user has uploaded a file \"notes.txt\" (text/plain) with the following content: hello\n\n\
             User: summarise"
        );
    }

    #[tokio::test]
    async fn text_request_carries_full_prompt_and_config() {
        let dispatcher = RequestDispatcher::new(ScriptedBackend::default());
        let mut req = request("Tell me a joke");
        req.template = Some(template());
        req.config.temperature = 0.2;

        let reply = dispatcher.dispatch(&req).await;

        let calls = dispatcher.backend().text_calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].model_id, "mistral");
        assert_eq!(calls[0].prompt, "Talk like a pirate.\n\nUser: Tell me a joke");
        assert!(calls[0].params.contains(&("temperature", "0.2".to_string())));
        assert!(calls[0].params.contains(&("max_tokens", "2048".to_string())));
        assert!(reply.succeeded);
        assert_eq!(reply.message.text, format!("echo: {}", calls[0].prompt));
        assert!(!reply.message.is_from_user);
    }

    #[tokio::test]
    async fn image_request_renders_markdown_image() {
        let dispatcher = RequestDispatcher::new(ScriptedBackend::default());
        let mut req = request("generate image: a red cat");
        req.image_size = ImageSize::Large;

        let reply = dispatcher.dispatch(&req).await;

        let calls = dispatcher.backend().image_calls.borrow();
        assert_eq!(
            calls.as_slice(),
            [ImageRequest {
                prompt: "a red cat".to_string(),
                width: 768,
                height: 768,
            }]
        );
        assert!(dispatcher.backend().text_calls.borrow().is_empty());
        assert_eq!(reply.message.text, "![Generated Image](https://img.example/cat.jpg)");
    }

    #[tokio::test]
    async fn failures_become_error_messages() {
        let dispatcher = RequestDispatcher::new(ScriptedBackend::failing());

        for input in ["hello", "generate image: dog"] {
            let reply = dispatcher.dispatch(&request(input)).await;
            assert!(!reply.succeeded);
            assert_eq!(reply.message.text, error_text("mistral"));
            assert_eq!(reply.message.model_id.as_deref(), Some("mistral"));
        }
    }
}
