use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tiktoken_rs::cl100k_base;

pub const DEFAULT_TITLE: &str = "New Chat";
const TITLE_MAX_CHARS: usize = 30;

/// Time-derived id with a short random suffix so two ids minted in the same
/// millisecond still differ.
pub fn generate_id(prefix: &str) -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("{}_{}_{}", prefix, Utc::now().timestamp_millis(), &suffix[..8])
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct Message {
    pub text: String,
    #[serde(rename = "isUser")]
    pub is_from_user: bool,
    #[serde(rename = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "model", default, skip_serializing_if = "Option::is_none")]
    pub model_id: Option<String>,
}

impl Message {
    pub fn user(text: impl Into<String>, model_id: &str) -> Self {
        Self {
            text: text.into(),
            is_from_user: true,
            created_at: Utc::now(),
            model_id: Some(model_id.to_string()),
        }
    }

    pub fn assistant(text: impl Into<String>, model_id: &str) -> Self {
        Self {
            text: text.into(),
            is_from_user: false,
            created_at: Utc::now(),
            model_id: Some(model_id.to_string()),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct Conversation {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(rename = "model")]
    pub model_id: String,
}

impl Conversation {
    pub fn new(model_id: &str) -> Self {
        Self::with_id(generate_id("conv"), model_id)
    }

    pub fn with_id(id: impl Into<String>, model_id: &str) -> Self {
        Self {
            id: id.into(),
            title: DEFAULT_TITLE.to_string(),
            messages: Vec::new(),
            model_id: model_id.to_string(),
        }
    }

    pub fn has_default_title(&self) -> bool {
        self.title == DEFAULT_TITLE
    }

    /// Drops all messages and restores the default title, keeping id and model.
    pub fn reset(&mut self) {
        self.title = DEFAULT_TITLE.to_string();
        self.messages.clear();
    }
}

/// First 30 characters of the message, trimmed, with `...` when it was cut.
pub fn derive_title(text: &str) -> String {
    let head: String = text.chars().take(TITLE_MAX_CHARS).collect();
    let mut title = head.trim().to_string();
    if text.chars().count() > TITLE_MAX_CHARS {
        title.push_str("...");
    }
    title
}

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum TemplateIcon {
    #[serde(rename = "DocumentTextIcon")]
    Document,
    #[serde(rename = "CommandLineIcon")]
    Code,
    #[serde(rename = "UserIcon")]
    User,
    #[serde(rename = "AdjustmentsHorizontalIcon")]
    Settings,
    #[serde(rename = "BoltIcon")]
    Lightning,
}

impl TemplateIcon {
    pub const ALL: [TemplateIcon; 5] = [
        TemplateIcon::Document,
        TemplateIcon::Code,
        TemplateIcon::User,
        TemplateIcon::Settings,
        TemplateIcon::Lightning,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TemplateIcon::Document => "Document",
            TemplateIcon::Code => "Code",
            TemplateIcon::User => "User",
            TemplateIcon::Settings => "Settings",
            TemplateIcon::Lightning => "Lightning",
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            TemplateIcon::Document => "📄",
            TemplateIcon::Code => "⌨",
            TemplateIcon::User => "👤",
            TemplateIcon::Settings => "⚙",
            TemplateIcon::Lightning => "⚡",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|icon| icon.label() == label)
    }
}

impl Default for TemplateIcon {
    fn default() -> Self {
        TemplateIcon::Document
    }
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct PromptTemplate {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "prompt")]
    pub system_prompt: String,
    #[serde(default)]
    pub icon: TemplateIcon,
}

impl PromptTemplate {
    /// Blank template shown in the editor for "New Template".
    pub fn draft() -> Self {
        Self {
            id: generate_id("template"),
            title: "New Template".to_string(),
            description: "Template description".to_string(),
            system_prompt: "Enter your system prompt here.".to_string(),
            icon: TemplateIcon::Document,
        }
    }

    pub fn defaults() -> Vec<PromptTemplate> {
        let entry = |id: &str, title: &str, description: &str, prompt: &str, icon| PromptTemplate {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            system_prompt: prompt.to_string(),
            icon,
        };
        vec![
            entry(
                "temp_1",
                "Professional Writer",
                "Make responses sound like a professional writer",
                "You are a professional writer with excellent grammar and vocabulary. Respond in a sophisticated, clear manner with well-structured paragraphs.",
                TemplateIcon::Document,
            ),
            entry(
                "temp_2",
                "Code Expert",
                "Focus on providing well-commented code examples",
                "You are a senior software engineer. Provide detailed code examples with clear comments. Explain your approach and any design patterns used.",
                TemplateIcon::Code,
            ),
            entry(
                "temp_3",
                "Friendly Assistant",
                "More conversational and approachable tone",
                "You are a friendly and helpful assistant. Use conversational language, simple explanations, and occasionally add some light humor to make interactions more engaging.",
                TemplateIcon::User,
            ),
            entry(
                "temp_4",
                "Expert Instructor",
                "Educational responses with clear explanations",
                "You are an expert instructor with years of teaching experience. Break down complex topics into understandable parts. Use examples and analogies to illustrate points.",
                TemplateIcon::Settings,
            ),
        ]
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Debug)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerationConfig {
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
}

impl GenerationConfig {
    pub const MIN_TOKENS: u32 = 256;
    pub const MAX_TOKENS: u32 = 4096;

    /// Pulls every field back into the range the settings panel allows.
    pub fn clamped(mut self) -> Self {
        self.temperature = clamp_or(self.temperature, 0.0, 1.0, 0.7);
        self.top_p = clamp_or(self.top_p, 0.0, 1.0, 0.9);
        self.frequency_penalty = clamp_or(self.frequency_penalty, -2.0, 2.0, 0.0);
        self.presence_penalty = clamp_or(self.presence_penalty, -2.0, 2.0, 0.0);
        self.max_tokens = self.max_tokens.clamp(Self::MIN_TOKENS, Self::MAX_TOKENS);
        self
    }

    /// Query pairs appended to text-generation requests.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("temperature", self.temperature.to_string()),
            ("max_tokens", self.max_tokens.to_string()),
            ("top_p", self.top_p.to_string()),
            ("frequency_penalty", self.frequency_penalty.to_string()),
            ("presence_penalty", self.presence_penalty.to_string()),
        ]
    }
}

fn clamp_or(value: f32, min: f32, max: f32, fallback: f32) -> f32 {
    if value.is_nan() {
        fallback
    } else {
        value.clamp(min, max)
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 2048,
            top_p: 0.9,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct UploadedFile {
    pub name: String,
    pub mime_type: String,
    pub size_bytes: u64,
    pub content: String,
}

impl UploadedFile {
    /// Text and JSON files are inlined as text; everything else is read as a data URL.
    pub fn is_textual(mime_type: &str) -> bool {
        mime_type.starts_with("text/") || mime_type == "application/json"
    }

    pub fn estimated_tokens(&self) -> usize {
        match cl100k_base() {
            Ok(tokenizer) => tokenizer.encode_ordinary(&self.content).len(),
            Err(_) => self.content.split_whitespace().count(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Default for Theme {
    fn default() -> Self {
        Theme::Light
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum ImageSize {
    #[serde(rename = "256x256")]
    Small,
    #[serde(rename = "512x512")]
    Medium,
    #[serde(rename = "768x768")]
    Large,
    #[serde(rename = "1024x1024")]
    ExtraLarge,
}

impl ImageSize {
    pub const ALL: [ImageSize; 4] = [
        ImageSize::Small,
        ImageSize::Medium,
        ImageSize::Large,
        ImageSize::ExtraLarge,
    ];

    pub fn dimensions(self) -> (u32, u32) {
        match self {
            ImageSize::Small => (256, 256),
            ImageSize::Medium => (512, 512),
            ImageSize::Large => (768, 768),
            ImageSize::ExtraLarge => (1024, 1024),
        }
    }

    pub fn label(self) -> String {
        let (w, h) = self.dimensions();
        let name = match self {
            ImageSize::Small => "Small",
            ImageSize::Medium => "Medium",
            ImageSize::Large => "Large",
            ImageSize::ExtraLarge => "Extra Large",
        };
        format!("{} ({}x{})", name, w, h)
    }
}

impl Default for ImageSize {
    fn default() -> Self {
        ImageSize::Medium
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Small,
    Medium,
    Large,
}

impl FontSize {
    pub const ALL: [FontSize; 3] = [FontSize::Small, FontSize::Medium, FontSize::Large];

    pub fn css_class(self) -> &'static str {
        match self {
            FontSize::Small => "font-small",
            FontSize::Medium => "font-medium",
            FontSize::Large => "font-large",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FontSize::Small => "small",
            FontSize::Medium => "medium",
            FontSize::Large => "large",
        }
    }
}

impl Default for FontSize {
    fn default() -> Self {
        FontSize::Medium
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct UiPreferences {
    pub theme: Theme,
    pub image_size: ImageSize,
    pub auto_scroll: bool,
    pub font_size: FontSize,
}

impl Default for UiPreferences {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            image_size: ImageSize::Medium,
            auto_scroll: true,
            font_size: FontSize::Medium,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
#[serde(rename_all = "camelCase", default)]
pub struct Endpoints {
    pub text_base_url: String,
    pub image_base_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            text_base_url: "https://text.pollinations.ai".to_string(),
            image_base_url: "https://image.pollinations.ai".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_message_becomes_title_verbatim() {
        assert_eq!(derive_title("Hello there"), "Hello there");
    }

    #[test]
    fn long_message_is_truncated_with_ellipsis() {
        let text = "Explain quantum computing to a 10-year-old";
        assert_eq!(derive_title(text), "Explain quantum computing to a...");
        assert_eq!(derive_title(&"x".repeat(30)), "x".repeat(30));
    }

    #[test]
    fn truncated_title_drops_space_before_ellipsis() {
        // The 30th character is a space.
        let text = "Write a short story about the robot";
        assert_eq!(derive_title(text), "Write a short story about the...");
        assert_eq!(derive_title("  padded  "), "padded");
    }

    #[test]
    fn title_truncation_counts_characters_not_bytes() {
        let text = "é".repeat(31);
        let title = derive_title(&text);
        assert_eq!(title, format!("{}...", "é".repeat(30)));
    }

    #[test]
    fn generated_ids_are_distinct() {
        let a = generate_id("conv");
        let b = generate_id("conv");
        assert!(a.starts_with("conv_"));
        assert_ne!(a, b);
    }

    #[test]
    fn config_clamps_out_of_range_values() {
        let config = GenerationConfig {
            temperature: 1.8,
            max_tokens: 10,
            top_p: f32::NAN,
            frequency_penalty: 5.0,
            presence_penalty: -5.0,
        }
        .clamped();

        assert_eq!(config.temperature, 1.0);
        assert_eq!(config.max_tokens, GenerationConfig::MIN_TOKENS);
        assert_eq!(config.top_p, 0.9);
        assert_eq!(config.frequency_penalty, 2.0);
        assert_eq!(config.presence_penalty, -2.0);
    }

    #[test]
    fn config_query_pairs_use_plain_number_formatting() {
        let pairs = GenerationConfig::default().query_pairs();
        assert_eq!(
            pairs,
            vec![
                ("temperature", "0.7".to_string()),
                ("max_tokens", "2048".to_string()),
                ("top_p", "0.9".to_string()),
                ("frequency_penalty", "0".to_string()),
                ("presence_penalty", "0".to_string()),
            ]
        );
    }

    #[test]
    fn stored_records_use_camel_case_field_names() {
        let template = PromptTemplate::defaults().remove(1);
        let json = serde_json::to_value(&template).unwrap();
        assert_eq!(json["prompt"], template.system_prompt.as_str());
        assert_eq!(json["icon"], "CommandLineIcon");

        let config = serde_json::to_value(GenerationConfig::default()).unwrap();
        assert_eq!(config["maxTokens"], 2048);
    }

    #[test]
    fn partial_config_fills_missing_fields_with_defaults() {
        let config: GenerationConfig = serde_json::from_str(r#"{"temperature":0.2}"#).unwrap();
        assert_eq!(config.temperature, 0.2);
        assert_eq!(config.max_tokens, 2048);
    }

    #[test]
    fn textual_uploads_are_detected_by_mime_type() {
        assert!(UploadedFile::is_textual("text/plain"));
        assert!(UploadedFile::is_textual("application/json"));
        assert!(!UploadedFile::is_textual("image/png"));
    }

    #[test]
    fn upload_token_estimate_uses_cl100k() {
        let mut file = UploadedFile {
            name: "notes.txt".to_string(),
            mime_type: "text/plain".to_string(),
            size_bytes: 11,
            content: "hello world".to_string(),
        };
        assert_eq!(file.estimated_tokens(), 2);

        file.content.clear();
        assert_eq!(file.estimated_tokens(), 0);
    }
}
