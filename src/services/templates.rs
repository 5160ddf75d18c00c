use crate::models::PromptTemplate;
use crate::services::storage::{KeyValueStore, KEY_TEMPLATES};

#[derive(Clone, PartialEq, Debug)]
pub struct TemplateStore<S> {
    templates: Vec<PromptTemplate>,
    pending: Option<PromptTemplate>,
    storage: S,
}

impl<S: KeyValueStore> TemplateStore<S> {
    /// Loads stored templates, seeding the defaults when nothing was saved yet.
    pub fn load(storage: S) -> Self {
        let templates = storage
            .load_or_warn(KEY_TEMPLATES)
            .unwrap_or_else(PromptTemplate::defaults);
        Self {
            templates,
            pending: None,
            storage,
        }
    }

    pub fn templates(&self) -> &[PromptTemplate] {
        &self.templates
    }

    pub fn get(&self, id: &str) -> Option<&PromptTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    pub fn add(&mut self, template: PromptTemplate) {
        self.templates.push(template);
        self.persist();
    }

    /// Replaces the template with the same id, or appends it when the id is new.
    pub fn upsert(&mut self, template: PromptTemplate) {
        match self.templates.iter_mut().find(|t| t.id == template.id) {
            Some(existing) => {
                *existing = template;
                self.persist();
            }
            None => self.add(template),
        }
    }

    pub fn delete(&mut self, id: &str) {
        let before = self.templates.len();
        self.templates.retain(|t| t.id != id);
        if self.templates.len() != before {
            self.persist();
        }
    }

    pub fn apply_template(&mut self, template: PromptTemplate) {
        self.pending = Some(template);
    }

    pub fn pending(&self) -> Option<&PromptTemplate> {
        self.pending.as_ref()
    }

    pub fn take_pending(&mut self) -> Option<PromptTemplate> {
        self.pending.take()
    }

    fn persist(&self) {
        self.storage.save_or_log(KEY_TEMPLATES, &self.templates);
    }
}
