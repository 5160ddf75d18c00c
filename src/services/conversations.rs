use log::debug;

use crate::models::{derive_title, Conversation, Message};
use crate::services::storage::{KeyValueStore, KEY_ACTIVE_CONVERSATION, KEY_CONVERSATIONS};

const FALLBACK_CONVERSATION_ID: &str = "default";

/// Conversation list plus the active selection. Every mutation writes the full
/// list and the active id back to storage before returning.
#[derive(Clone, PartialEq, Debug)]
pub struct ConversationStore<S> {
    conversations: Vec<Conversation>,
    active_id: String,
    storage: S,
}

impl<S: KeyValueStore> ConversationStore<S> {
    pub fn load(storage: S, default_model: &str) -> Self {
        let mut conversations: Vec<Conversation> = storage
            .load_or_warn(KEY_CONVERSATIONS)
            .unwrap_or_default();
        if conversations.is_empty() {
            conversations.push(Conversation::with_id(FALLBACK_CONVERSATION_ID, default_model));
        }

        let stored_active: Option<String> = storage.load_or_warn(KEY_ACTIVE_CONVERSATION);
        let active_id = stored_active
            .filter(|id| conversations.iter().any(|c| &c.id == id))
            .unwrap_or_else(|| conversations[0].id.clone());

        Self {
            conversations,
            active_id,
            storage,
        }
    }

    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn active_id(&self) -> &str {
        &self.active_id
    }

    pub fn active(&self) -> &Conversation {
        // `conversations` is never empty and `active_id` always names a member.
        self.get(&self.active_id)
            .unwrap_or(&self.conversations[0])
    }

    pub fn get(&self, id: &str) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.id == id)
    }

    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    pub fn create_conversation(&mut self) -> &Conversation {
        let model = self.active().model_id.clone();
        let conversation = Conversation::new(&model);
        debug!("created conversation {}", conversation.id);

        self.active_id = conversation.id.clone();
        self.conversations.insert(0, conversation);
        self.persist();
        &self.conversations[0]
    }

    pub fn select_conversation(&mut self, id: &str) {
        if self.get(id).is_none() {
            return;
        }
        self.active_id = id.to_string();
        self.persist();
    }

    pub fn delete_conversation(&mut self, id: &str) {
        let Some(index) = self.conversations.iter().position(|c| c.id == id) else {
            return;
        };

        if self.conversations.len() == 1 {
            self.conversations[0].reset();
            self.active_id = self.conversations[0].id.clone();
        } else {
            self.conversations.remove(index);
            if self.active_id == id {
                self.active_id = self.conversations[0].id.clone();
            }
        }
        debug!("deleted conversation {}", id);
        self.persist();
    }

    pub fn append_message(&mut self, conversation_id: &str, message: Message) {
        if let Some(conversation) = self
            .conversations
            .iter_mut()
            .find(|c| c.id == conversation_id)
        {
            conversation.messages.push(message);
            self.persist();
        }
    }

    /// Names a conversation still carrying the default title after a
    /// successful exchange, from its latest user message.
    pub fn name_from_exchange(&mut self, conversation_id: &str) {
        let Some(conversation) = self
            .conversations
            .iter_mut()
            .find(|c| c.id == conversation_id && c.has_default_title())
        else {
            return;
        };
        let Some(prompt) = conversation.messages.iter().rev().find(|m| m.is_from_user) else {
            return;
        };

        let title = derive_title(&prompt.text);
        if !title.is_empty() {
            conversation.title = title;
            self.persist();
        }
    }

    pub fn clear_conversation(&mut self, id: &str) {
        if let Some(conversation) = self.conversations.iter_mut().find(|c| c.id == id) {
            conversation.reset();
            self.persist();
        }
    }

    pub fn clear_all(&mut self) {
        let model = self.active().model_id.clone();
        let fresh = Conversation::new(&model);
        self.active_id = fresh.id.clone();
        self.conversations = vec![fresh];
        self.persist();
    }

    pub fn set_model(&mut self, id: &str, model_id: &str) {
        if let Some(conversation) = self.conversations.iter_mut().find(|c| c.id == id) {
            conversation.model_id = model_id.to_string();
            self.persist();
        }
    }

    fn persist(&self) {
        self.storage.save_or_log(KEY_CONVERSATIONS, &self.conversations);
        self.storage.save_or_log(KEY_ACTIVE_CONVERSATION, &self.active_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DEFAULT_TITLE;
    use crate::services::storage::MemoryStorage;

    fn store() -> (ConversationStore<MemoryStorage>, MemoryStorage) {
        let storage = MemoryStorage::new();
        (ConversationStore::load(storage.clone(), "openai"), storage)
    }

    #[test]
    fn fresh_storage_yields_one_default_conversation() {
        let (store, _) = store();
        assert_eq!(store.len(), 1);
        assert_eq!(store.active_id(), "default");
        assert_eq!(store.active().title, DEFAULT_TITLE);
        assert_eq!(store.active().model_id, "openai");
    }

    #[test]
    fn create_inserts_at_front_and_inherits_model() {
        let (mut store, _) = store();
        store.set_model("default", "mistral");

        let id = store.create_conversation().id.clone();

        assert_eq!(store.conversations()[0].id, id);
        assert_eq!(store.active_id(), id);
        assert_eq!(store.active().model_id, "mistral");
        assert!(store.active().messages.is_empty());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn select_unknown_id_is_a_no_op() {
        let (mut store, _) = store();
        let created = store.create_conversation().id.clone();

        store.select_conversation("missing");
        assert_eq!(store.active_id(), created);

        store.select_conversation("default");
        assert_eq!(store.active_id(), "default");
    }

    #[test]
    fn deleting_only_conversation_leaves_a_reset_one() {
        let (mut store, _) = store();
        store.append_message("default", Message::user("hi", "openai"));

        store.delete_conversation("default");

        assert_eq!(store.len(), 1);
        assert_eq!(store.active_id(), "default");
        assert!(store.active().messages.is_empty());
        assert_eq!(store.active().title, DEFAULT_TITLE);
    }

    #[test]
    fn deleting_active_conversation_promotes_another() {
        let (mut store, _) = store();
        let created = store.create_conversation().id.clone();

        store.delete_conversation(&created);

        assert_eq!(store.len(), 1);
        assert_eq!(store.active_id(), "default");
    }

    #[test]
    fn deleting_inactive_conversation_keeps_selection() {
        let (mut store, _) = store();
        let created = store.create_conversation().id.clone();

        store.delete_conversation("default");

        assert_eq!(store.active_id(), created);
        assert!(store.get("default").is_none());
    }

    #[test]
    fn deleting_unknown_id_changes_nothing() {
        let (mut store, _) = store();
        store.append_message("default", Message::user("keep me", "openai"));
        store.delete_conversation("missing");
        assert_eq!(store.active().messages.len(), 1);
    }

    #[test]
    fn successful_exchange_names_conversation_once() {
        let (mut store, storage) = store();
        store.append_message(
            "default",
            Message::user("Create a 5-day itinerary for a trip to Tokyo", "openai"),
        );
        assert_eq!(store.active().title, DEFAULT_TITLE);

        store.append_message("default", Message::assistant("Day 1...", "openai"));
        store.name_from_exchange("default");
        assert_eq!(store.active().title, "Create a 5-day itinerary for a...");

        store.append_message("default", Message::user("Make it cheaper", "openai"));
        store.name_from_exchange("default");
        assert_eq!(store.active().title, "Create a 5-day itinerary for a...");

        let reloaded = ConversationStore::load(storage, "openai");
        assert_eq!(reloaded.active().title, "Create a 5-day itinerary for a...");
    }

    #[test]
    fn blank_prompt_does_not_name_conversation() {
        let (mut store, _) = store();
        store.name_from_exchange("default");
        assert_eq!(store.active().title, DEFAULT_TITLE);

        store.append_message("default", Message::user("   ", "openai"));
        store.append_message("default", Message::assistant("Welcome", "openai"));
        store.name_from_exchange("default");
        assert_eq!(store.active().title, DEFAULT_TITLE);
    }

    #[test]
    fn reloading_reproduces_active_id_and_message_order() {
        let (mut store, storage) = store();
        let created = store.create_conversation().id.clone();
        store.append_message(&created, Message::user("one", "openai"));
        store.append_message(&created, Message::assistant("two", "openai"));
        store.append_message(&created, Message::user("three", "openai"));

        let reloaded = ConversationStore::load(storage, "openai");

        assert_eq!(reloaded.active_id(), created);
        assert_eq!(reloaded.conversations(), store.conversations());
        let texts: Vec<_> = reloaded.active().messages.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, ["one", "two", "three"]);
    }

    #[test]
    fn stale_active_id_falls_back_to_first_conversation() {
        let storage = MemoryStorage::new();
        storage.save(KEY_ACTIVE_CONVERSATION, "gone").unwrap();
        let store = ConversationStore::load(storage, "openai");
        assert_eq!(store.active_id(), "default");
    }

    #[test]
    fn clear_conversation_resets_title_and_messages() {
        let (mut store, _) = store();
        store.append_message("default", Message::user("something long enough", "openai"));
        store.clear_conversation("default");
        assert!(store.active().messages.is_empty());
        assert_eq!(store.active().title, DEFAULT_TITLE);
    }

    #[test]
    fn clear_all_leaves_single_fresh_conversation() {
        let (mut store, _) = store();
        store.create_conversation();
        store.create_conversation();

        store.clear_all();

        assert_eq!(store.len(), 1);
        assert_eq!(store.active_id(), store.conversations()[0].id);
    }
}
