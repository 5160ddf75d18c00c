//! Static catalogue of the models the text endpoint serves.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ModelKind {
    Chat,
    Safety,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ModelDescriptor {
    pub id: &'static str,
    pub kind: ModelKind,
    pub is_censored: bool,
    pub display_name: &'static str,
    pub is_base_model: bool,
    pub supports_vision: bool,
    pub supports_reasoning: bool,
    pub provider: Option<&'static str>,
}

/// Highlight shown next to a model in the picker. First match wins.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ModelBadge {
    Reasoning,
    Vision,
    FineTuned,
    Uncensored,
    Standard,
}

impl ModelBadge {
    pub fn label(self) -> &'static str {
        match self {
            ModelBadge::Reasoning => "Reasoning",
            ModelBadge::Vision => "Vision",
            ModelBadge::FineTuned => "Fine-tuned",
            ModelBadge::Uncensored => "Uncensored",
            ModelBadge::Standard => "Standard",
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            ModelBadge::Reasoning => "badge badge-reasoning",
            ModelBadge::Vision => "badge badge-vision",
            ModelBadge::FineTuned => "badge badge-finetuned",
            ModelBadge::Uncensored => "badge badge-uncensored",
            ModelBadge::Standard => "badge badge-standard",
        }
    }
}

impl ModelDescriptor {
    pub fn badge(&self) -> ModelBadge {
        if self.supports_reasoning {
            ModelBadge::Reasoning
        } else if self.supports_vision {
            ModelBadge::Vision
        } else if !self.is_base_model {
            ModelBadge::FineTuned
        } else if !self.is_censored {
            ModelBadge::Uncensored
        } else {
            ModelBadge::Standard
        }
    }
}

const fn chat(
    id: &'static str,
    display_name: &'static str,
    is_censored: bool,
    is_base_model: bool,
) -> ModelDescriptor {
    ModelDescriptor {
        id,
        kind: ModelKind::Chat,
        is_censored,
        display_name,
        is_base_model,
        supports_vision: false,
        supports_reasoning: false,
        provider: None,
    }
}

const fn vision(mut m: ModelDescriptor) -> ModelDescriptor {
    m.supports_vision = true;
    m
}

const fn reasoning(mut m: ModelDescriptor) -> ModelDescriptor {
    m.supports_reasoning = true;
    m
}

const fn provider(mut m: ModelDescriptor, name: &'static str) -> ModelDescriptor {
    m.provider = Some(name);
    m
}

pub static MODELS: [ModelDescriptor; 21] = [
    vision(chat("openai", "OpenAI GPT-4o-mini", true, true)),
    vision(chat("openai-large", "OpenAI GPT-4o", true, true)),
    reasoning(chat("openai-reasoning", "OpenAI o1-mini", true, true)),
    chat("qwen-coder", "Qwen 2.5 Coder 32B", true, true),
    chat("llama", "Llama 3.3 70B", false, true),
    chat("mistral", "Mistral Nemo", false, true),
    chat("unity", "Unity with Mistral Large by Unity AI Lab", false, false),
    chat("midijourney", "Midijourney musical transformer", true, false),
    chat("rtist", "Rtist image generator by @bqrio", true, false),
    chat("searchgpt", "SearchGPT with realtime news and web search", true, false),
    chat("evil", "Evil Mode - Experimental", false, false),
    chat("deepseek", "DeepSeek-V3", true, true),
    chat("claude-hybridspace", "Claude Hybridspace", true, true),
    provider(
        reasoning(chat("deepseek-r1", "DeepSeek-R1 Distill Qwen 32B", true, true)),
        "cloudflare",
    ),
    provider(
        reasoning(chat("deepseek-reasoner", "DeepSeek R1 - Full", true, true)),
        "deepseek",
    ),
    chat("llamalight", "Llama 3.1 8B Instruct", false, true),
    ModelDescriptor {
        id: "llamaguard",
        kind: ModelKind::Safety,
        is_censored: false,
        display_name: "Llamaguard 7B AWQ",
        is_base_model: false,
        supports_vision: false,
        supports_reasoning: false,
        provider: Some("cloudflare"),
    },
    provider(chat("gemini", "Gemini 2.0 Flash", true, true), "google"),
    provider(
        chat("gemini-thinking", "Gemini 2.0 Flash Thinking", true, true),
        "google",
    ),
    provider(
        chat("hormoz", "Hormoz 8b by Muhammadreza Haghiri", false, false),
        "modal.com",
    ),
    provider(
        chat("hypnosis-tracy", "Hypnosis Tracy - Your Self-Help AI", false, false),
        "modal.com",
    ),
];

pub fn default_model() -> &'static ModelDescriptor {
    &MODELS[0]
}

pub fn find_model(id: &str) -> Option<&'static ModelDescriptor> {
    MODELS.iter().find(|m| m.id == id)
}

/// Unknown ids (e.g. a model retired since the conversation was stored) resolve to the default.
pub fn resolve_model(id: &str) -> &'static ModelDescriptor {
    find_model(id).unwrap_or_else(default_model)
}

pub fn base_models() -> impl Iterator<Item = &'static ModelDescriptor> {
    MODELS.iter().filter(|m| m.is_base_model)
}

pub fn fine_tuned_models() -> impl Iterator<Item = &'static ModelDescriptor> {
    MODELS.iter().filter(|m| !m.is_base_model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ids_are_unique() {
        let ids: HashSet<_> = MODELS.iter().map(|m| m.id).collect();
        assert_eq!(ids.len(), MODELS.len());
    }

    #[test]
    fn picker_groups_cover_every_model() {
        assert_eq!(base_models().count() + fine_tuned_models().count(), MODELS.len());
    }

    #[test]
    fn unknown_model_resolves_to_default() {
        assert_eq!(resolve_model("retired-model").id, "openai");
        assert_eq!(resolve_model("mistral").display_name, "Mistral Nemo");
    }

    #[test]
    fn badges_follow_precedence() {
        assert_eq!(resolve_model("openai-reasoning").badge(), ModelBadge::Reasoning);
        assert_eq!(resolve_model("openai").badge(), ModelBadge::Vision);
        assert_eq!(resolve_model("unity").badge(), ModelBadge::FineTuned);
        assert_eq!(resolve_model("llama").badge(), ModelBadge::Uncensored);
        assert_eq!(resolve_model("deepseek").badge(), ModelBadge::Standard);
    }

    #[test]
    fn safety_model_is_tagged() {
        let guard = resolve_model("llamaguard");
        assert_eq!(guard.kind, ModelKind::Safety);
        assert_eq!(guard.provider, Some("cloudflare"));
    }
}
