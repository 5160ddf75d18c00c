use chrono::Utc;
use yew::prelude::*;

use crate::models::Conversation;
use crate::utils::format_day;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SidebarTab {
    Chats,
    Templates,
    Settings,
}

impl SidebarTab {
    const ALL: [SidebarTab; 3] = [SidebarTab::Chats, SidebarTab::Templates, SidebarTab::Settings];

    fn label(self) -> &'static str {
        match self {
            SidebarTab::Chats => "Chats",
            SidebarTab::Templates => "Templates",
            SidebarTab::Settings => "Settings",
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct SidebarProps {
    pub open: bool,
    pub tab: SidebarTab,
    pub chats: Vec<Conversation>,
    pub active_chat_id: String,
    pub on_tab: Callback<SidebarTab>,
    pub on_select: Callback<String>,
    pub on_delete: Callback<String>,
    pub on_new: Callback<()>,
    /// Body of the Templates and Settings tabs.
    #[prop_or_default]
    pub children: Html,
}

#[function_component(Sidebar)]
pub fn sidebar(props: &SidebarProps) -> Html {
    let width = if props.open { "300px" } else { "0px" };

    let css = r#"
        .sidebar { background: var(--bg-sidebar); border-right: 1px solid var(--border-color); display: flex; flex-direction: column; transition: width 0.3s cubic-bezier(0.25, 0.8, 0.25, 1); overflow: hidden; flex-shrink: 0; }
        .sidebar-content { width: 300px; height: 100%; display: flex; flex-direction: column; padding: 10px; }
        .sidebar-tabs { display: flex; border-bottom: 1px solid var(--border-color); margin-bottom: 10px; }
        .sidebar-tab { flex: 1; padding: 8px; background: none; border: none; border-bottom: 2px solid transparent; cursor: pointer; color: var(--text-secondary); font-size: 0.9rem; }
        .sidebar-tab.active { border-bottom-color: var(--accent-color); color: var(--accent-color); }
        .tab-body { flex-grow: 1; overflow-y: auto; }
        .chat-list { margin-top: 10px; }
        .chat-item { padding: 10px; border-radius: 6px; cursor: pointer; display: flex; justify-content: space-between; align-items: center; margin-bottom: 2px; font-size: 0.9rem; }
        .chat-item:hover { background: rgba(127,127,127,0.12); }
        .chat-item.active { background: rgba(124,58,237,0.15); font-weight: 500; }
        .chat-item .chat-meta { font-size: 0.75rem; color: var(--text-secondary); }
        .chat-item .del-btn { opacity: 0; border: none; background: none; color: #999; cursor: pointer; padding: 2px 6px; border-radius: 4px; }
        .chat-item:hover .del-btn { opacity: 1; }
        .chat-item .del-btn:hover { color: #d32f2f; }
        .new-chat-btn { width: 100%; padding: 10px; border: 1px solid var(--border-color); background: var(--bg-app); color: var(--text-primary); border-radius: 6px; cursor: pointer; text-align: left; display: flex; gap: 10px; }
    "#;

    let tabs = SidebarTab::ALL.iter().map(|tab| {
        let tab = *tab;
        let on_tab = props.on_tab.clone();
        html! {
            <button
                class={classes!("sidebar-tab", (tab == props.tab).then(|| "active"))}
                onclick={Callback::from(move |_| on_tab.emit(tab))}
            >
                { tab.label() }
            </button>
        }
    });

    let now = Utc::now();
    let chat_list = html! {
        <>
            <button class="new-chat-btn" onclick={props.on_new.reform(|_| ())}>
                <span>{ "+" }</span>
                <span>{ "New Chat" }</span>
            </button>
            <div class="chat-list">
                { for props.chats.iter().map(|chat| {
                    let id = chat.id.clone();
                    let is_active = id == props.active_chat_id;
                    let on_sel = props.on_select.clone();
                    let on_del = props.on_delete.clone();
                    let id_c = id.clone();
                    let meta = match chat.messages.last() {
                        Some(last) => format!("{} · {} messages", format_day(&last.created_at, &now), chat.messages.len()),
                        None => "Empty".to_string(),
                    };

                    html! {
                        <div class={classes!("chat-item", is_active.then(|| "active"))} onclick={Callback::from(move |_| on_sel.emit(id.clone()))}>
                            <div style="min-width: 0;">
                                <div style="overflow: hidden; text-overflow: ellipsis; white-space: nowrap;">{ &chat.title }</div>
                                <div class="chat-meta">{ meta }</div>
                            </div>
                            <button class="del-btn" title="Delete" onclick={Callback::from(move |e: MouseEvent| {
                                e.stop_propagation();
                                on_del.emit(id_c.clone());
                            })}>{ "×" }</button>
                        </div>
                    }
                })}
            </div>
        </>
    };

    html! {
        <>
            <style>{ css }</style>
            <div class="sidebar" style={format!("width: {};", width)}>
                <div class="sidebar-content">
                    <div class="sidebar-tabs">{ for tabs }</div>
                    <div class="tab-body">
                        if props.tab == SidebarTab::Chats {
                            { chat_list }
                        } else {
                            { props.children.clone() }
                        }
                    </div>
                    <div style="font-size: 0.75rem; color: var(--text-secondary); padding-top: 8px;">
                        { concat!("Doli Assistant v", env!("CARGO_PKG_VERSION")) }
                    </div>
                </div>
            </div>
        </>
    }
}
