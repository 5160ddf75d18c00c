use log::{error, info};
use std::rc::Rc;
use yew::Reducible;

use crate::models::{
    Conversation, Endpoints, FontSize, GenerationConfig, ImageSize, Message, PromptTemplate, Theme,
    UiPreferences, UploadedFile,
};
use crate::registry;
use crate::services::conversations::ConversationStore;
use crate::services::dispatcher::{DispatchRequest, Reply};
use crate::services::storage::{
    KeyValueStore, KEY_AUTO_SCROLL, KEY_ENDPOINTS, KEY_FONT_SIZE, KEY_GENERATION_CONFIG,
    KEY_IMAGE_SIZE, KEY_SELECTED_MODEL, KEY_THEME,
};
use crate::services::templates::TemplateStore;

/// Keys cleared by a settings reset; their absence loads the defaults.
const SETTINGS_KEYS: [&str; 6] = [
    KEY_GENERATION_CONFIG,
    KEY_ENDPOINTS,
    KEY_THEME,
    KEY_IMAGE_SIZE,
    KEY_AUTO_SCROLL,
    KEY_FONT_SIZE,
];

pub enum ChatAction {
    NewConversation,
    SelectConversation(String),
    DeleteConversation(String),
    ClearConversation(String),
    ClearAllConversations,
    ChangeModel(String),
    ApplyTemplate(PromptTemplate),
    DiscardTemplate,
    SaveTemplate(PromptTemplate),
    DeleteTemplate(String),
    AttachFile(UploadedFile),
    DetachFile,
    UpdateGenerationConfig(GenerationConfig),
    UpdatePreferences(UiPreferences),
    UpdateEndpoints(Endpoints),
    ResetSettings,
    SubmitStarted { conversation_id: String, message: Message },
    SubmitFinished { conversation_id: String, reply: Reply },
}

/// Application state owned by the root component. Each field that outlives
/// the session is written to storage as soon as it changes.
#[derive(Clone, PartialEq, Debug)]
pub struct ChatState<S> {
    pub conversations: ConversationStore<S>,
    pub templates: TemplateStore<S>,
    pub uploaded_file: Option<UploadedFile>,
    pub generation: GenerationConfig,
    pub preferences: UiPreferences,
    pub endpoints: Endpoints,
    pub busy: bool,
    storage: S,
}

impl<S: KeyValueStore + Clone> ChatState<S> {
    pub fn load(storage: S) -> Self {
        let selected_model: Option<String> = storage.load_or_warn(KEY_SELECTED_MODEL);
        let default_model = selected_model
            .as_deref()
            .and_then(registry::find_model)
            .unwrap_or_else(registry::default_model);

        let generation = storage
            .load_or_warn::<GenerationConfig>(KEY_GENERATION_CONFIG)
            .unwrap_or_default()
            .clamped();

        let defaults = UiPreferences::default();
        let preferences = UiPreferences {
            theme: storage.load_or_warn::<Theme>(KEY_THEME).unwrap_or(defaults.theme),
            image_size: storage
                .load_or_warn::<ImageSize>(KEY_IMAGE_SIZE)
                .unwrap_or(defaults.image_size),
            auto_scroll: storage
                .load_or_warn::<bool>(KEY_AUTO_SCROLL)
                .unwrap_or(defaults.auto_scroll),
            font_size: storage
                .load_or_warn::<FontSize>(KEY_FONT_SIZE)
                .unwrap_or(defaults.font_size),
        };

        Self {
            conversations: ConversationStore::load(storage.clone(), default_model.id),
            templates: TemplateStore::load(storage.clone()),
            uploaded_file: None,
            generation,
            preferences,
            endpoints: storage.load_or_warn(KEY_ENDPOINTS).unwrap_or_default(),
            busy: false,
            storage,
        }
    }

    pub fn active_conversation(&self) -> &Conversation {
        self.conversations.active()
    }

    pub fn pending_template(&self) -> Option<&PromptTemplate> {
        self.templates.pending()
    }

    /// Snapshot for one send. `None` while a request is in flight, or when
    /// there is neither input nor a pending template.
    pub fn prepare_send(&self, input: &str) -> Option<DispatchRequest> {
        if self.busy || (input.trim().is_empty() && self.templates.pending().is_none()) {
            return None;
        }
        let conversation = self.conversations.active();
        Some(DispatchRequest {
            conversation_id: conversation.id.clone(),
            input: input.to_string(),
            model_id: registry::resolve_model(&conversation.model_id).id.to_string(),
            template: self.templates.pending().cloned(),
            upload: self.uploaded_file.clone(),
            config: self.generation,
            image_size: self.preferences.image_size,
        })
    }

    pub fn apply(&mut self, action: ChatAction) {
        match action {
            ChatAction::NewConversation => {
                self.conversations.create_conversation();
            }
            ChatAction::SelectConversation(id) => self.conversations.select_conversation(&id),
            ChatAction::DeleteConversation(id) => self.conversations.delete_conversation(&id),
            ChatAction::ClearConversation(id) => self.conversations.clear_conversation(&id),
            ChatAction::ClearAllConversations => self.conversations.clear_all(),
            ChatAction::ChangeModel(model_id) => {
                if registry::find_model(&model_id).is_some() {
                    let active = self.conversations.active_id().to_string();
                    self.conversations.set_model(&active, &model_id);
                    self.storage.save_or_log(KEY_SELECTED_MODEL, &model_id);
                }
            }
            ChatAction::ApplyTemplate(template) => self.templates.apply_template(template),
            ChatAction::DiscardTemplate => {
                self.templates.take_pending();
            }
            ChatAction::SaveTemplate(template) => self.templates.upsert(template),
            ChatAction::DeleteTemplate(id) => self.templates.delete(&id),
            ChatAction::AttachFile(file) => self.uploaded_file = Some(file),
            ChatAction::DetachFile => self.uploaded_file = None,
            ChatAction::UpdateGenerationConfig(config) => {
                self.generation = config.clamped();
                self.storage.save_or_log(KEY_GENERATION_CONFIG, &self.generation);
            }
            ChatAction::UpdatePreferences(preferences) => self.set_preferences(preferences),
            ChatAction::UpdateEndpoints(endpoints) => {
                self.storage.save_or_log(KEY_ENDPOINTS, &endpoints);
                self.endpoints = endpoints;
            }
            ChatAction::ResetSettings => {
                info!("restoring default settings");
                self.generation = GenerationConfig::default();
                self.endpoints = Endpoints::default();
                self.preferences = UiPreferences::default();
                for key in SETTINGS_KEYS {
                    if let Err(e) = self.storage.remove_item(key) {
                        error!("failed to clear `{}`: {}", key, e);
                    }
                }
            }
            ChatAction::SubmitStarted {
                conversation_id,
                message,
            } => {
                // The request snapshot already holds these; anything applied
                // while it runs belongs to the next send.
                self.templates.take_pending();
                self.uploaded_file = None;
                self.busy = true;
                self.conversations.append_message(&conversation_id, message);
            }
            ChatAction::SubmitFinished {
                conversation_id,
                reply,
            } => {
                self.conversations
                    .append_message(&conversation_id, reply.message);
                if reply.succeeded {
                    self.conversations.name_from_exchange(&conversation_id);
                }
                self.busy = false;
            }
        }
    }

    fn set_preferences(&mut self, preferences: UiPreferences) {
        let UiPreferences {
            theme,
            image_size,
            auto_scroll,
            font_size,
        } = preferences;
        self.storage.save_or_log(KEY_THEME, &theme);
        self.storage.save_or_log(KEY_IMAGE_SIZE, &image_size);
        self.storage.save_or_log(KEY_AUTO_SCROLL, &auto_scroll);
        self.storage.save_or_log(KEY_FONT_SIZE, &font_size);
        self.preferences = preferences;
    }
}

/// Holds a send slot from submit until the reply lands. The reducer's busy
/// flag only reaches callbacks after a re-render, so two quick submits would
/// both see it unset.
#[derive(Default, Debug)]
pub struct SendLatch {
    in_flight: bool,
}

impl SendLatch {
    pub fn try_acquire(&mut self) -> bool {
        if self.in_flight {
            return false;
        }
        self.in_flight = true;
        true
    }

    pub fn release(&mut self) {
        self.in_flight = false;
    }
}

impl<S: KeyValueStore + Clone> Reducible for ChatState<S> {
    type Action = ChatAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        next.apply(action);
        Rc::new(next)
    }
}
