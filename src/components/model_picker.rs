use yew::prelude::*;

use crate::registry::{self, ModelDescriptor};

#[derive(Properties, PartialEq)]
pub struct ModelPickerProps {
    pub selected: &'static str,
    pub on_select: Callback<String>,
}

#[function_component(ModelPicker)]
pub fn model_picker(props: &ModelPickerProps) -> Html {
    let open = use_state(|| false);
    let current = registry::resolve_model(props.selected);

    let css = r#"
        .model-picker { position: relative; }
        .model-menu { position: absolute; right: 0; top: 44px; width: 320px; max-height: 420px; overflow-y: auto; background: var(--bg-app); border: 1px solid var(--border-color); border-radius: 8px; box-shadow: 0 10px 15px -3px rgba(0,0,0,0.15); z-index: 50; padding: 6px 0; }
        .model-group { padding: 6px 12px; font-size: 0.7rem; text-transform: uppercase; letter-spacing: 0.05em; color: var(--text-secondary); }
        .model-option { padding: 8px 12px; cursor: pointer; display: flex; justify-content: space-between; align-items: center; gap: 8px; font-size: 0.85rem; }
        .model-option:hover { background: rgba(127,127,127,0.12); }
        .model-option.selected { background: rgba(124,58,237,0.12); }
        .model-option .model-id { font-size: 0.7rem; color: var(--text-secondary); }
    "#;

    let option = |model: &'static ModelDescriptor| {
        let on_select = props.on_select.clone();
        let open = open.clone();
        let badge = model.badge();
        let selected = model.id == current.id;
        html! {
            <div
                class={classes!("model-option", selected.then(|| "selected"))}
                onclick={Callback::from(move |_| {
                    on_select.emit(model.id.to_string());
                    open.set(false);
                })}
            >
                <div>
                    <div>{ model.display_name }</div>
                    <div class="model-id">
                        { model.id }
                        if let Some(provider) = model.provider {
                            { format!(" · {}", provider) }
                        }
                    </div>
                </div>
                <span class={badge.css_class()}>{ badge.label() }</span>
            </div>
        }
    };

    let toggle = {
        let open = open.clone();
        Callback::from(move |_| open.set(!*open))
    };

    html! {
        <>
            <style>{ css }</style>
            <div class="model-picker">
                <button class="btn" onclick={toggle}>
                    { current.display_name }{ " ▾" }
                </button>
                if *open {
                    <div class="model-menu">
                        <div class="model-group">{ "Base Models" }</div>
                        { for registry::base_models().map(&option) }
                        <div class="model-group">{ "Fine-tuned Models" }</div>
                        { for registry::fine_tuned_models().map(&option) }
                    </div>
                }
            </div>
        </>
    }
}
