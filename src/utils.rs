use chrono::{DateTime, Duration, Local, Utc};
use log::{Level, LevelFilter, Log, Metadata, Record};
use pulldown_cmark::{html, Event as MdEvent, Options, Parser};
use wasm_bindgen::JsValue;
use yew::{AttrValue, Html};

pub fn set_panic_hook() {
    // Panics otherwise surface as an opaque "unreachable executed" in the console.
    console_error_panic_hook::set_once();
}

/// `log` backend writing to the browser console at the matching severity.
struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line: JsValue =
            format!("[{}] {}: {}", record.level(), record.target(), record.args()).into();
        match record.level() {
            Level::Error => web_sys::console::error_1(&line),
            Level::Warn => web_sys::console::warn_1(&line),
            Level::Info => web_sys::console::info_1(&line),
            Level::Debug | Level::Trace => web_sys::console::debug_1(&line),
        }
    }

    fn flush(&self) {}
}

pub fn init_logging() {
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    // A second call (hot reload) finds a logger already set; keep that one.
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

pub fn markdown_to_html(text: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);

    let parser = Parser::new_ext(text, options).map(|event| match event {
        MdEvent::SoftBreak => MdEvent::HardBreak,
        _ => event,
    });

    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);
    html_output
}

pub fn render_markdown(text: &str, font_class: &str) -> Html {
    let styled_html = format!(
        r#"<div class="markdown-body {}">{}</div>"#,
        font_class,
        markdown_to_html(text)
    );
    Html::from_html_unchecked(AttrValue::from(styled_html))
}

/// Clock time shown under each message, e.g. `14:05`.
pub fn format_time(timestamp: &DateTime<Utc>) -> String {
    timestamp.with_timezone(&Local).format("%H:%M").to_string()
}

/// "Today", "Yesterday", or a short date such as "Mar 4".
pub fn format_day(timestamp: &DateTime<Utc>, now: &DateTime<Utc>) -> String {
    let day = timestamp.with_timezone(&Local).date_naive();
    let today = now.with_timezone(&Local).date_naive();
    if day == today {
        "Today".to_string()
    } else if day == today - Duration::days(1) {
        "Yesterday".to_string()
    } else {
        day.format("%b %-d").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_image_markdown_becomes_img_tag() {
        let html = markdown_to_html("![Generated Image](https://img.example/cat.jpg)");
        assert!(html.contains(r#"<img src="https://img.example/cat.jpg" alt="Generated Image" />"#));
    }

    #[test]
    fn tables_and_strikethrough_are_enabled() {
        let html = markdown_to_html("| a |\n|---|\n| b |\n\n~~old~~");
        assert!(html.contains("<table>"));
        assert!(html.contains("<del>old</del>"));
    }

    #[test]
    fn soft_breaks_render_as_line_breaks() {
        assert!(markdown_to_html("line one\nline two").contains("<br />"));
    }

    #[test]
    fn day_labels_are_relative_to_now() {
        let now = Utc::now();
        assert_eq!(format_day(&now, &now), "Today");
        assert_eq!(format_day(&(now - Duration::days(1)), &now), "Yesterday");
        let older = now - Duration::days(40);
        let label = format_day(&older, &now);
        assert!(label != "Today" && label != "Yesterday");
    }
}
