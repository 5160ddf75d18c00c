use yew::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::components::{
    chat_area::ChatArea,
    model_picker::ModelPicker,
    settings::SettingsPanel,
    sidebar::{Sidebar, SidebarTab},
    templates::TemplateLibrary,
};
use crate::models::{Message, Theme};
use crate::registry;
use crate::services::{
    dispatcher::RequestDispatcher, llm::PollinationsClient, storage::LocalStorage,
};
use crate::state::{ChatAction, ChatState, SendLatch};

const GLOBAL_STYLES: &str = r#"
    :root, .app-container.theme-light {
        --bg-app: #ffffff;
        --bg-sidebar: #f9f9f9;
        --bg-user: #ede9fe;
        --bg-assistant: #f5f5f5;
        --border-color: #e5e5e5;
        --text-primary: #333;
        --text-secondary: #666;
        --accent-color: #7c3aed;
        --accent-hover: #6d28d9;
        --danger-color: #ef4444;
    }
    .app-container.theme-dark {
        --bg-app: #111827;
        --bg-sidebar: #1f2937;
        --bg-user: #4c1d95;
        --bg-assistant: #1f2937;
        --border-color: #374151;
        --text-primary: #f3f4f6;
        --text-secondary: #9ca3af;
    }

    * { box-sizing: border-box; }
    body { margin: 0; font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, Helvetica, Arial, sans-serif; }

    .app-container { display: flex; height: 100vh; overflow: hidden; color: var(--text-primary); background: var(--bg-app); }
    .main-content { flex-grow: 1; display: flex; flex-direction: column; position: relative; background: var(--bg-app); min-width: 0; }
    .header { padding: 10px 20px; border-bottom: 1px solid var(--border-color); display: flex; justify-content: space-between; align-items: center; height: 60px; gap: 10px; }
    .header h2 { font-size: 1rem; margin: 0; font-weight: 600; overflow: hidden; white-space: nowrap; text-overflow: ellipsis; max-width: 500px; }

    .btn { cursor: pointer; border: 1px solid var(--border-color); background: var(--bg-app); padding: 8px 12px; border-radius: 6px; font-size: 0.9rem; transition: all 0.2s; color: var(--text-primary); }
    .btn:hover { opacity: 0.85; }
    .btn-primary { background: var(--accent-color); color: white; border-color: transparent; }
    .btn-primary:hover { background: var(--accent-hover); }
    .btn-danger { color: var(--danger-color); }
    .btn-icon { background: none; border: none; cursor: pointer; color: var(--text-secondary); padding: 4px; }

    .form-input, .form-select, .form-textarea { width: 100%; padding: 8px; border: 1px solid var(--border-color); border-radius: 6px; font-family: inherit; margin-bottom: 10px; background: var(--bg-app); color: var(--text-primary); }
    .form-input:focus, .form-textarea:focus { outline: 2px solid var(--accent-color); border-color: transparent; }
    .form-label { display: block; font-size: 0.85rem; font-weight: 600; margin-bottom: 5px; color: var(--text-secondary); }

    .badge { font-size: 0.7rem; padding: 2px 6px; border-radius: 9999px; }
    .badge-reasoning { background: #f3e8ff; color: #6b21a8; }
    .badge-vision { background: #ccfbf1; color: #115e59; }
    .badge-finetuned { background: #ffedd5; color: #9a3412; }
    .badge-uncensored { background: #fee2e2; color: #991b1b; }
    .badge-standard { background: #dbeafe; color: #1e40af; }

    .markdown-body { line-height: 1.6; }
    .markdown-body.font-small { font-size: 0.85rem; }
    .markdown-body.font-medium { font-size: 1rem; }
    .markdown-body.font-large { font-size: 1.15rem; }
    .markdown-body pre { background: #2d2d2d; color: #fff; padding: 15px; border-radius: 6px; overflow-x: auto; }
    .markdown-body code { background: rgba(127,127,127,0.15); padding: 2px 4px; border-radius: 4px; font-family: monospace; font-size: 0.9em; }
    .markdown-body pre code { background: transparent; color: inherit; }
    .markdown-body p { margin-top: 0; margin-bottom: 1em; }
    .markdown-body img { max-width: 100%; border-radius: 8px; }
"#;

#[function_component(App)]
pub fn app() -> Html {
    let state = use_reducer(|| ChatState::load(LocalStorage));
    let sidebar_open = use_state(|| true);
    let active_tab = use_state(|| SidebarTab::Chats);
    let send_latch = use_mut_ref(SendLatch::default);

    let dispatch = {
        let state = state.clone();
        Callback::from(move |action: ChatAction| state.dispatch(action))
    };

    // --- MAIN CHAT LOGIC ---
    let run_chat = {
        let state = state.clone();
        let send_latch = send_latch.clone();
        Callback::from(move |input: String| {
            let request = match state.prepare_send(&input) {
                Some(request) => request,
                None => return,
            };
            if !send_latch.borrow_mut().try_acquire() {
                return;
            }

            // The user message is recorded before the call so it shows even if the call fails.
            state.dispatch(ChatAction::SubmitStarted {
                conversation_id: request.conversation_id.clone(),
                message: Message::user(request.input.clone(), &request.model_id),
            });

            let handle = state.clone();
            let latch = send_latch.clone();
            let client = PollinationsClient::new(state.endpoints.clone());
            spawn_local(async move {
                let dispatcher = RequestDispatcher::new(client);
                let reply = dispatcher.dispatch(&request).await;
                handle.dispatch(ChatAction::SubmitFinished {
                    conversation_id: request.conversation_id,
                    reply,
                });
                latch.borrow_mut().release();
            });
        })
    };
    // -------------------------

    let on_new_chat = dispatch.reform(|_: ()| ChatAction::NewConversation);
    let on_select_chat = dispatch.reform(ChatAction::SelectConversation);
    let on_delete_chat = dispatch.reform(ChatAction::DeleteConversation);
    let on_clear_chat = {
        let dispatch = dispatch.clone();
        let active_id = state.active_conversation().id.clone();
        Callback::from(move |_: MouseEvent| {
            let confirmed = web_sys::window()
                .and_then(|w| w.confirm_with_message("Are you sure you want to clear this conversation?").ok())
                .unwrap_or(false);
            if confirmed {
                dispatch.emit(ChatAction::ClearConversation(active_id.clone()));
            }
        })
    };
    let on_clear_all_chats = {
        let dispatch = dispatch.clone();
        Callback::from(move |_: ()| {
            let confirmed = web_sys::window()
                .and_then(|w| w.confirm_with_message("Irreversibly delete ALL chat history?").ok())
                .unwrap_or(false);
            if confirmed {
                dispatch.emit(ChatAction::ClearAllConversations);
            }
        })
    };
    let on_reset_settings = {
        let dispatch = dispatch.clone();
        Callback::from(move |_: ()| {
            let confirmed = web_sys::window()
                .and_then(|w| w.confirm_with_message("Reset all settings to default?").ok())
                .unwrap_or(false);
            if confirmed {
                dispatch.emit(ChatAction::ResetSettings);
            }
        })
    };

    let on_apply_template = {
        let dispatch = dispatch.clone();
        let active_tab = active_tab.clone();
        Callback::from(move |template| {
            dispatch.emit(ChatAction::ApplyTemplate(template));
            active_tab.set(SidebarTab::Chats);
        })
    };

    let on_tab = {
        let active_tab = active_tab.clone();
        Callback::from(move |tab: SidebarTab| active_tab.set(tab))
    };
    let toggle_sidebar = sidebar_open.clone();

    let conversation = state.active_conversation().clone();
    let current_model = registry::resolve_model(&conversation.model_id);
    let theme_class = match state.preferences.theme {
        Theme::Light => "theme-light",
        Theme::Dark => "theme-dark",
    };

    let tab_body = match *active_tab {
        SidebarTab::Chats => html! {},
        SidebarTab::Templates => html! {
            <TemplateLibrary
                templates={state.templates.templates().to_vec()}
                on_apply={on_apply_template}
                on_save={dispatch.reform(ChatAction::SaveTemplate)}
                on_delete={dispatch.reform(ChatAction::DeleteTemplate)}
            />
        },
        SidebarTab::Settings => html! {
            <SettingsPanel
                generation={state.generation}
                preferences={state.preferences}
                endpoints={state.endpoints.clone()}
                on_generation={dispatch.reform(ChatAction::UpdateGenerationConfig)}
                on_preferences={dispatch.reform(ChatAction::UpdatePreferences)}
                on_endpoints={dispatch.reform(ChatAction::UpdateEndpoints)}
                on_reset={on_reset_settings}
                on_clear_chats={on_clear_all_chats}
            />
        },
    };

    html! {
        <>
            <style>{ GLOBAL_STYLES }</style>
            <div class={classes!("app-container", theme_class)}>
                <Sidebar
                    open={*sidebar_open}
                    tab={*active_tab}
                    chats={state.conversations.conversations().to_vec()}
                    active_chat_id={state.conversations.active_id().to_string()}
                    on_tab={on_tab}
                    on_select={on_select_chat}
                    on_new={on_new_chat}
                    on_delete={on_delete_chat}
                >
                    { tab_body }
                </Sidebar>

                <div class="main-content">
                    <div class="header">
                        <div style="display: flex; gap: 10px; align-items: center; min-width: 0;">
                            <button class="btn-icon" onclick={Callback::from(move |_| toggle_sidebar.set(!*toggle_sidebar))} title="Toggle Menu">
                                <svg width="24" height="24" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round"><line x1="3" y1="12" x2="21" y2="12"></line><line x1="3" y1="6" x2="21" y2="6"></line><line x1="3" y1="18" x2="21" y2="18"></line></svg>
                            </button>
                            <h2>{ &conversation.title }</h2>
                        </div>
                        <div style="display: flex; gap: 8px; align-items: center;">
                            <ModelPicker
                                selected={current_model.id}
                                on_select={dispatch.reform(ChatAction::ChangeModel)}
                            />
                            <button class="btn" onclick={on_clear_chat} title="Clear conversation">{ "Clear" }</button>
                        </div>
                    </div>

                    <ChatArea
                        conversation={conversation}
                        model_name={current_model.display_name}
                        is_loading={state.busy}
                        preferences={state.preferences}
                        pending_template={state.pending_template().cloned()}
                        uploaded_file={state.uploaded_file.clone()}
                        on_send={run_chat}
                        on_attach={dispatch.reform(ChatAction::AttachFile)}
                        on_detach={dispatch.reform(|_: ()| ChatAction::DetachFile)}
                        on_discard_template={dispatch.reform(|_: ()| ChatAction::DiscardTemplate)}
                    />
                </div>
            </div>
        </>
    }
}
