use web_sys::{HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use yew::prelude::*;

use crate::models::{PromptTemplate, TemplateIcon};

#[derive(Properties, PartialEq)]
pub struct TemplateLibraryProps {
    pub templates: Vec<PromptTemplate>,
    pub on_apply: Callback<PromptTemplate>,
    pub on_save: Callback<PromptTemplate>,
    pub on_delete: Callback<String>,
}

#[function_component(TemplateLibrary)]
pub fn template_library(props: &TemplateLibraryProps) -> Html {
    // Template being edited, if the editor is open.
    let editing = use_state(|| None::<PromptTemplate>);

    let css = r#"
        .template-card { border: 1px solid var(--border-color); border-radius: 8px; padding: 10px; margin-bottom: 8px; }
        .template-card h4 { margin: 0 0 4px 0; font-size: 0.9rem; display: flex; gap: 6px; align-items: center; }
        .template-card p { margin: 0 0 8px 0; font-size: 0.8rem; color: var(--text-secondary); }
        .template-actions { display: flex; gap: 6px; }
        .template-actions .btn { padding: 4px 8px; font-size: 0.8rem; }
        .modal-backdrop { position: fixed; inset: 0; background: rgba(0,0,0,0.4); z-index: 200; display: flex; align-items: center; justify-content: center; }
        .modal { background: var(--bg-app); color: var(--text-primary); border-radius: 10px; padding: 20px; width: 440px; max-width: 95vw; }
        .modal h3 { margin-top: 0; }
    "#;

    let on_new = {
        let editing = editing.clone();
        Callback::from(move |_| editing.set(Some(PromptTemplate::draft())))
    };

    let cards = props.templates.iter().map(|template| {
        let on_apply = {
            let cb = props.on_apply.clone();
            let t = template.clone();
            Callback::from(move |_| cb.emit(t.clone()))
        };
        let on_edit = {
            let editing = editing.clone();
            let t = template.clone();
            Callback::from(move |_| editing.set(Some(t.clone())))
        };
        let on_delete = {
            let cb = props.on_delete.clone();
            let id = template.id.clone();
            Callback::from(move |_| cb.emit(id.clone()))
        };

        html! {
            <div class="template-card" key={template.id.clone()}>
                <h4><span>{ template.icon.glyph() }</span>{ &template.title }</h4>
                <p>{ &template.description }</p>
                <div class="template-actions">
                    <button class="btn btn-primary" onclick={on_apply}>{ "Use" }</button>
                    <button class="btn" onclick={on_edit}>{ "Edit" }</button>
                    <button class="btn btn-danger" onclick={on_delete}>{ "Delete" }</button>
                </div>
            </div>
        }
    });

    let editor = match &*editing {
        Some(draft) => {
            let is_new = !props.templates.iter().any(|t| t.id == draft.id);
            html! {
                <TemplateEditor
                    template={draft.clone()}
                    heading={if is_new { "New Template" } else { "Edit Template" }}
                    on_save={{
                        let on_save = props.on_save.clone();
                        let editing = editing.clone();
                        Callback::from(move |t: PromptTemplate| {
                            on_save.emit(t);
                            editing.set(None);
                        })
                    }}
                    on_cancel={{
                        let editing = editing.clone();
                        Callback::from(move |_: ()| editing.set(None))
                    }}
                />
            }
        }
        None => html! {},
    };

    html! {
        <>
            <style>{ css }</style>
            <button class="btn" style="width: 100%; margin-bottom: 10px;" onclick={on_new}>{ "+ New Template" }</button>
            { for cards }
            { editor }
        </>
    }
}

#[derive(Properties, PartialEq)]
struct TemplateEditorProps {
    template: PromptTemplate,
    heading: &'static str,
    on_save: Callback<PromptTemplate>,
    on_cancel: Callback<()>,
}

#[function_component(TemplateEditor)]
fn template_editor(props: &TemplateEditorProps) -> Html {
    let draft = use_state(|| props.template.clone());

    let on_title = {
        let draft = draft.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let mut next = (*draft).clone();
            next.title = input.value();
            draft.set(next);
        })
    };
    let on_description = {
        let draft = draft.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let mut next = (*draft).clone();
            next.description = input.value();
            draft.set(next);
        })
    };
    let on_prompt = {
        let draft = draft.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlTextAreaElement = e.target_unchecked_into();
            let mut next = (*draft).clone();
            next.system_prompt = input.value();
            draft.set(next);
        })
    };
    let on_icon = {
        let draft = draft.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            if let Some(icon) = TemplateIcon::from_label(&select.value()) {
                let mut next = (*draft).clone();
                next.icon = icon;
                draft.set(next);
            }
        })
    };
    let on_save = {
        let draft = draft.clone();
        let cb = props.on_save.clone();
        Callback::from(move |_| cb.emit((*draft).clone()))
    };

    html! {
        <div class="modal-backdrop">
            <div class="modal">
                <h3>{ props.heading }</h3>
                <label class="form-label">{ "Title" }</label>
                <input class="form-input" type="text" value={draft.title.clone()} oninput={on_title} />
                <label class="form-label">{ "Description" }</label>
                <input class="form-input" type="text" value={draft.description.clone()} oninput={on_description} />
                <label class="form-label">{ "System Prompt" }</label>
                <textarea class="form-textarea" rows="6" value={draft.system_prompt.clone()} oninput={on_prompt} />
                <label class="form-label">{ "Icon" }</label>
                <select class="form-select" onchange={on_icon}>
                    { for TemplateIcon::ALL.iter().map(|icon| html! {
                        <option value={icon.label()} selected={*icon == draft.icon}>
                            { format!("{} {}", icon.glyph(), icon.label()) }
                        </option>
                    }) }
                </select>
                <div style="display: flex; justify-content: flex-end; gap: 8px;">
                    <button class="btn" onclick={props.on_cancel.reform(|_| ())}>{ "Cancel" }</button>
                    <button class="btn btn-primary" onclick={on_save}>{ "Save" }</button>
                </div>
            </div>
        </div>
    }
}
