use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::models::{Endpoints, FontSize, GenerationConfig, ImageSize, Theme, UiPreferences};

#[derive(Properties, PartialEq, Clone)]
pub struct SettingsProps {
    pub generation: GenerationConfig,
    pub preferences: UiPreferences,
    pub endpoints: Endpoints,
    pub on_generation: Callback<GenerationConfig>,
    pub on_preferences: Callback<UiPreferences>,
    pub on_endpoints: Callback<Endpoints>,
    pub on_reset: Callback<()>,
    pub on_clear_chats: Callback<()>,
}

/// Range input wired to one numeric field of the generation config.
fn slider(
    label: &str,
    value: f64,
    (min, max, step): (f64, f64, f64),
    config: GenerationConfig,
    on_change: &Callback<GenerationConfig>,
    apply: fn(&mut GenerationConfig, f64),
) -> Html {
    let on_change = on_change.clone();
    let oninput = Callback::from(move |e: InputEvent| {
        let input: HtmlInputElement = e.target_unchecked_into();
        if let Ok(parsed) = input.value().parse::<f64>() {
            let mut next = config;
            apply(&mut next, parsed);
            on_change.emit(next);
        }
    });

    html! {
        <div>
            <label class="form-label">{ format!("{}: {}", label, value) }</label>
            <input
                class="form-input"
                type="range"
                min={min.to_string()}
                max={max.to_string()}
                step={step.to_string()}
                value={value.to_string()}
                {oninput}
            />
        </div>
    }
}

#[function_component(SettingsPanel)]
pub fn settings_panel(props: &SettingsProps) -> Html {
    let prefs = props.preferences;
    let config = props.generation;

    let on_theme = |theme: Theme| {
        let cb = props.on_preferences.clone();
        Callback::from(move |_| cb.emit(UiPreferences { theme, ..prefs }))
    };

    let on_image_size = {
        let cb = props.on_preferences.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            if let Some(size) = ImageSize::ALL.iter().find(|s| s.label() == select.value()) {
                cb.emit(UiPreferences { image_size: *size, ..prefs });
            }
        })
    };

    let on_font_size = |font_size: FontSize| {
        let cb = props.on_preferences.clone();
        Callback::from(move |_| cb.emit(UiPreferences { font_size, ..prefs }))
    };

    let on_auto_scroll = {
        let cb = props.on_preferences.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            cb.emit(UiPreferences { auto_scroll: input.checked(), ..prefs });
        })
    };

    let on_text_url = {
        let cb = props.on_endpoints.clone();
        let endpoints = props.endpoints.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            cb.emit(Endpoints { text_base_url: input.value(), ..endpoints.clone() });
        })
    };

    let on_image_url = {
        let cb = props.on_endpoints.clone();
        let endpoints = props.endpoints.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            cb.emit(Endpoints { image_base_url: input.value(), ..endpoints.clone() });
        })
    };

    let css = r#"
        .settings-section { margin-bottom: 18px; }
        .settings-section h4 { margin: 0 0 8px 0; font-size: 0.9rem; }
        .choice-row { display: flex; gap: 6px; }
        .choice-row .btn { flex: 1; padding: 6px; text-transform: capitalize; }
        .choice-row .btn.chosen { border-color: var(--accent-color); color: var(--accent-color); }
        .actions { margin-top: 10px; display: flex; flex-direction: column; gap: 8px; }
    "#;

    html! {
        <>
            <style>{ css }</style>

            <div class="settings-section">
                <h4>{ "Appearance" }</h4>
                <div class="choice-row" style="margin-bottom: 10px;">
                    <button class={classes!("btn", (prefs.theme == Theme::Light).then(|| "chosen"))} onclick={on_theme(Theme::Light)}>{ "Light" }</button>
                    <button class={classes!("btn", (prefs.theme == Theme::Dark).then(|| "chosen"))} onclick={on_theme(Theme::Dark)}>{ "Dark" }</button>
                </div>
                <label class="form-label">{ "Text Size" }</label>
                <div class="choice-row" style="margin-bottom: 10px;">
                    { for FontSize::ALL.iter().map(|size| html! {
                        <button class={classes!("btn", (prefs.font_size == *size).then(|| "chosen"))} onclick={on_font_size(*size)}>
                            { size.label() }
                        </button>
                    }) }
                </div>
                <label style="display: flex; gap: 8px; align-items: center; cursor: pointer; font-size: 0.9rem;">
                    <input type="checkbox" checked={prefs.auto_scroll} onchange={on_auto_scroll}/>
                    { "Auto-scroll to new messages" }
                </label>
            </div>

            <div class="settings-section">
                <h4>{ "Image Generation Size" }</h4>
                <select class="form-select" onchange={on_image_size}>
                    { for ImageSize::ALL.iter().map(|size| html! {
                        <option value={size.label()} selected={*size == prefs.image_size}>{ size.label() }</option>
                    }) }
                </select>
            </div>

            <div class="settings-section">
                <h4>{ "AI Parameters" }</h4>
                { slider("Temperature", config.temperature as f64, (0.0, 1.0, 0.1), config, &props.on_generation, |c, v| c.temperature = v as f32) }
                { slider("Max Tokens", config.max_tokens as f64, (GenerationConfig::MIN_TOKENS as f64, GenerationConfig::MAX_TOKENS as f64, 256.0), config, &props.on_generation, |c, v| c.max_tokens = v as u32) }
                { slider("Top P", config.top_p as f64, (0.0, 1.0, 0.05), config, &props.on_generation, |c, v| c.top_p = v as f32) }
                { slider("Frequency Penalty", config.frequency_penalty as f64, (-2.0, 2.0, 0.1), config, &props.on_generation, |c, v| c.frequency_penalty = v as f32) }
                { slider("Presence Penalty", config.presence_penalty as f64, (-2.0, 2.0, 0.1), config, &props.on_generation, |c, v| c.presence_penalty = v as f32) }
            </div>

            <div class="settings-section">
                <h4>{ "Endpoints" }</h4>
                <label class="form-label">{ "Text API URL" }</label>
                <input class="form-input" type="text" value={props.endpoints.text_base_url.clone()} onchange={on_text_url} />
                <label class="form-label">{ "Image API URL" }</label>
                <input class="form-input" type="text" value={props.endpoints.image_base_url.clone()} onchange={on_image_url} />
            </div>

            <div class="actions">
                <hr style="width: 100%; border: 0; border-top: 1px solid var(--border-color);" />
                <button class="btn btn-danger" onclick={props.on_clear_chats.reform(|_| ())}>{ "Delete All Chats" }</button>
                <button class="btn" onclick={props.on_reset.reform(|_| ())}>{ "Reset Settings" }</button>
            </div>
        </>
    }
}
