use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{FileReader, HtmlElement, HtmlInputElement, HtmlTextAreaElement};
use yew::prelude::*;

use crate::models::{Conversation, PromptTemplate, UiPreferences, UploadedFile};
use crate::registry;
use crate::utils::{format_time, render_markdown};

const WELCOME_TEXT: &str = "# Welcome to Doli Assistant\n\n\
I'm your advanced AI companion. How can I assist you today?\n\n\
- Ask any question or start a conversation\n\
- Pick a prompt template from the sidebar\n\
- Attach a file to discuss its contents\n\
- Type `generate image: ` followed by a description to create an image";

static SAMPLE_PROMPTS: [&str; 7] = [
    "Explain quantum computing to a 10-year-old",
    "Create a 5-day itinerary for a trip to Tokyo",
    "Help me draft a professional email requesting a deadline extension",
    "Write a short story about a robot discovering emotions",
    "Compare and contrast different programming paradigms",
    "Generate image: serene mountain landscape at sunset",
    "Explain the basics of machine learning algorithms",
];

#[derive(Properties, PartialEq)]
pub struct ChatAreaProps {
    pub conversation: Conversation,
    pub model_name: &'static str,
    pub is_loading: bool,
    pub preferences: UiPreferences,
    pub pending_template: Option<PromptTemplate>,
    pub uploaded_file: Option<UploadedFile>,
    pub on_send: Callback<String>,
    pub on_attach: Callback<UploadedFile>,
    pub on_detach: Callback<()>,
    pub on_discard_template: Callback<()>,
}

#[function_component(ChatArea)]
pub fn chat_area(props: &ChatAreaProps) -> Html {
    let input_text = use_state(String::new);
    let scroll_ref = use_node_ref();

    // Auto-scroll effect
    {
        let div_ref = scroll_ref.clone();
        let enabled = props.preferences.auto_scroll;
        let len = props.conversation.messages.len();
        let loading = props.is_loading;

        use_effect_with((len, loading), move |_| {
            if enabled {
                if let Some(div) = div_ref.cast::<HtmlElement>() {
                    div.set_scroll_top(div.scroll_height());
                }
            }
        });
    }

    // Template-only sends are allowed, so an empty box is fine with a template pending.
    let can_send = !props.is_loading
        && (!input_text.trim().is_empty() || props.pending_template.is_some());

    let on_submit = {
        let text = input_text.clone();
        let on_send = props.on_send.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if can_send {
                on_send.emit((*text).clone());
                text.set(String::new());
            }
        })
    };

    let on_keydown = {
        let text = input_text.clone();
        let on_send = props.on_send.clone();
        Callback::from(move |e: KeyboardEvent| {
            if e.key() == "Enter" && !e.shift_key() {
                e.prevent_default();
                if can_send {
                    on_send.emit((*text).clone());
                    text.set(String::new());
                }
            }
        })
    };

    let on_input = {
        let text = input_text.clone();
        Callback::from(move |e: InputEvent| {
            let area: HtmlTextAreaElement = e.target_unchecked_into();
            text.set(area.value());
        })
    };

    let on_file_change = {
        let on_attach = props.on_attach.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            if let Some(file) = input.files().and_then(|files| files.get(0)) {
                read_upload(file, on_attach.clone());
            }
            input.set_value("");
        })
    };

    let css = r#"
        .messages-container { flex-grow: 1; overflow-y: auto; padding: 20px; display: flex; flex-direction: column; gap: 15px; scroll-behavior: smooth; }
        .message-row { display: flex; width: 100%; }
        .message-row.user { justify-content: flex-end; }
        .message-row.assistant { justify-content: flex-start; }
        .bubble-group { display: flex; gap: 10px; max-width: 85%; align-items: flex-end; }
        .message-row.user .bubble-group { flex-direction: row-reverse; }
        .avatar { width: 32px; height: 32px; border-radius: 50%; display: flex; align-items: center; justify-content: center; flex-shrink: 0; color: white; font-size: 0.8rem; font-weight: 600; }
        .avatar.user { background: #555; }
        .avatar.assistant { background: var(--accent-color); }
        .msg-bubble { padding: 10px 15px; border-radius: 12px; min-width: 0; overflow-wrap: anywhere; max-width: 100%; }
        .message-row.user .msg-bubble { background: var(--bg-user); border-bottom-right-radius: 2px; }
        .message-row.assistant .msg-bubble { background: var(--bg-assistant); border-bottom-left-radius: 2px; }
        .msg-meta { font-size: 0.7rem; color: var(--text-secondary); margin-top: 4px; }
        .welcome { max-width: 700px; margin: 40px auto; }
        .sample-prompts { display: grid; grid-template-columns: repeat(auto-fill, minmax(200px, 1fr)); gap: 8px; margin-top: 16px; }
        .sample-prompt { text-align: left; }
        .input-wrapper { border-top: 1px solid var(--border-color); padding: 16px 20px; display: flex; justify-content: center; }
        .input-container { width: 100%; max-width: 900px; position: relative; display: flex; flex-direction: column; gap: 8px; }
        .chips { display: flex; gap: 8px; flex-wrap: wrap; }
        .chip { display: inline-flex; align-items: center; gap: 6px; padding: 4px 10px; border-radius: 9999px; border: 1px solid var(--border-color); font-size: 0.8rem; }
        .chip button { border: none; background: none; cursor: pointer; color: var(--text-secondary); }
        .composer { position: relative; display: flex; gap: 8px; align-items: flex-end; }
        .chat-input { flex-grow: 1; padding: 12px; padding-right: 70px; border: 1px solid var(--border-color); border-radius: 8px; resize: none; font-family: inherit; outline: none; background: var(--bg-app); color: var(--text-primary); height: 50px; }
        .chat-input:focus { border-color: var(--accent-color); }
        .attach-btn { cursor: pointer; padding: 12px; border: 1px solid var(--border-color); border-radius: 8px; color: var(--text-secondary); }
        .send-btn { position: absolute; right: 8px; bottom: 8px; background: var(--accent-color); color: white; border: none; border-radius: 4px; padding: 6px 10px; cursor: pointer; }
        .send-btn:disabled { background: #ccc; cursor: default; }
    "#;

    let font_class = props.preferences.font_size.css_class();
    let messages = &props.conversation.messages;

    let body = if messages.is_empty() {
        html! {
            <div class="welcome">
                { render_markdown(WELCOME_TEXT, font_class) }
                <div class="sample-prompts">
                    { for SAMPLE_PROMPTS.iter().map(|prompt| {
                        let prompt: &'static str = *prompt;
                        let on_send = props.on_send.clone();
                        html! {
                            <button
                                class="btn sample-prompt"
                                disabled={props.is_loading}
                                onclick={Callback::from(move |_| on_send.emit(prompt.to_string()))}
                            >
                                { prompt }
                            </button>
                        }
                    }) }
                </div>
            </div>
        }
    } else {
        html! {
            <>{ for messages.iter().map(|msg| {
                let (row_cls, avatar) = if msg.is_from_user { ("user", "You") } else { ("assistant", "AI") };
                let author = match (&msg.model_id, msg.is_from_user) {
                    (Some(id), false) => format!("{} · ", registry::resolve_model(id).display_name),
                    _ => String::new(),
                };
                html! {
                    <div class={classes!("message-row", row_cls)}>
                        <div class="bubble-group">
                            <div class={classes!("avatar", row_cls)}>{ avatar }</div>
                            <div>
                                <div class="msg-bubble">{ render_markdown(&msg.text, font_class) }</div>
                                <div class="msg-meta">{ format!("{}{}", author, format_time(&msg.created_at)) }</div>
                            </div>
                        </div>
                    </div>
                }
            }) }</>
        }
    };

    html! {
        <>
            <style>{ css }</style>

            <div class="messages-container" ref={scroll_ref}>
                { body }

                if props.is_loading {
                    <div class="message-row assistant">
                        <div class="bubble-group">
                            <div class="avatar assistant">{ "AI" }</div>
                            <div class="msg-bubble" style="color: var(--text-secondary); font-style: italic;">
                                { "Thinking..." }
                            </div>
                        </div>
                    </div>
                }
            </div>

            <div class="input-wrapper">
                <form class="input-container" onsubmit={on_submit}>
                    <div class="chips">
                        if let Some(template) = &props.pending_template {
                            <span class="chip">
                                { format!("{} {}", template.icon.glyph(), template.title) }
                                <button type="button" title="Discard template" onclick={props.on_discard_template.reform(|_| ())}>{ "×" }</button>
                            </span>
                        }
                        if let Some(file) = &props.uploaded_file {
                            <span class="chip">
                                { format!("{} (~{} tokens)", file.name, file.estimated_tokens()) }
                                <button type="button" title="Remove file" onclick={props.on_detach.reform(|_| ())}>{ "×" }</button>
                            </span>
                        }
                    </div>
                    <div class="composer">
                        <label class="attach-btn" for="chat-upload-input" title="Attach file">{ "📎" }</label>
                        <input
                            id="chat-upload-input"
                            type="file"
                            style="display: none;"
                            disabled={props.is_loading}
                            onchange={on_file_change}
                        />
                        <textarea
                            class="chat-input"
                            rows="1"
                            placeholder={format!("Message {} or type 'generate image: [prompt]'", props.model_name)}
                            value={(*input_text).clone()}
                            oninput={on_input}
                            onkeydown={on_keydown}
                            disabled={props.is_loading}
                        />
                        <button type="submit" class="send-btn" disabled={!can_send}>
                            { "Send" }
                        </button>
                    </div>
                </form>
            </div>
        </>
    }
}

/// Reads the picked file and emits it once loaded: text files as text, anything else as a data URL.
fn read_upload(file: web_sys::File, on_attach: Callback<UploadedFile>) {
    let reader = match FileReader::new() {
        Ok(reader) => reader,
        Err(err) => {
            log::error!("Failed to create FileReader: {:?}", err);
            return;
        }
    };

    let name = file.name();
    let mime_type = file.type_();
    let size_bytes = file.size() as u64;
    let textual = UploadedFile::is_textual(&mime_type);

    let onload = Closure::<dyn Fn(JsValue)>::new(move |event: JsValue| {
        let content = event_target_as_file_reader(&event)
            .and_then(|reader| reader.result().ok())
            .and_then(|result| result.as_string());
        match content {
            Some(content) => {
                log::info!("Attached {} ({} bytes)", name, size_bytes);
                on_attach.emit(UploadedFile {
                    name: name.clone(),
                    mime_type: mime_type.clone(),
                    size_bytes,
                    content,
                });
            }
            None => log::error!("Could not read contents of {}", name),
        }
    });
    reader.set_onload(Some(onload.as_ref().unchecked_ref()));
    onload.forget();

    let started = if textual {
        reader.read_as_text(&file)
    } else {
        reader.read_as_data_url(&file)
    };
    if let Err(err) = started {
        log::error!("Error reading file: {:?}", err);
    }
}

fn event_target_as_file_reader(event: &JsValue) -> Option<FileReader> {
    let target = event.dyn_ref::<web_sys::Event>()?.target()?;
    target.dyn_ref::<FileReader>().cloned()
}
