pub mod conversations;
pub mod dispatcher;
pub mod llm;
pub mod storage;
pub mod templates;
