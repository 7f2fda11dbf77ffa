//! Minimal HTML page renderer.
//!
//! Plain, unstyled markup. All record text is escaped.

use std::io::Write;
use std::path::Path;

use crate::message::Message;
use crate::naming::detail_page_names;
use crate::record::format_medium_date;
use crate::render::{write_page, PageKind, PageModel, PageRender, RenderError};
use crate::series::Series;

#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlPageRender;

impl PageRender for HtmlPageRender {
    fn extension(&self) -> &'static str {
        "html"
    }

    fn render(&self, model: &PageModel<'_>, destination: &Path) -> Result<(), RenderError> {
        let html = match model {
            PageModel::SeriesIndex { title, series_list } => {
                render_index(*title, series_list, self.extension())
            }
            PageModel::Series { series, messages } => render_series(series, messages),
        };
        write_page(destination, |out| out.write_all(html.as_bytes()))
    }
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn page(kind: PageKind, title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n<title>{}</title>\n</head>\n<body class=\"{}\">\n{}</body>\n</html>\n",
        escape_html(title),
        kind.template_name(),
        body
    )
}

fn date_range(series: &Series) -> String {
    let start = series.start_date().map(format_medium_date).unwrap_or_default();
    let end = series.end_date().map(format_medium_date).unwrap_or_default();
    format!("{} - {}", start, end)
}

fn render_index(title: Option<&str>, series_list: &[Series], extension: &str) -> String {
    let title = title.unwrap_or("Series");
    let mut body = format!("<h1>{}</h1>\n<ul class=\"series-list\">\n", escape_html(title));

    let pages = detail_page_names(series_list, extension);
    for (series, page_name) in series_list.iter().zip(pages) {
        let name = escape_html(series.title().unwrap_or("(untitled)"));
        // Only public series have a page to link to.
        let entry = match page_name {
            Some(file) => format!("<a href=\"{}\">{}</a>", escape_html(&file), name),
            None => name,
        };
        let count = series
            .message_count()
            .map(|c| format!(", {} messages", c))
            .unwrap_or_default();
        body.push_str(&format!(
            "<li>{} <span class=\"dates\">({}{})</span></li>\n",
            entry,
            date_range(series),
            count
        ));
    }

    body.push_str("</ul>\n");
    page(PageKind::SeriesIndex, title, &body)
}

fn render_series(series: &Series, messages: &[&Message]) -> String {
    let title = series.title().unwrap_or("(untitled)");
    let mut body = format!("<h1>{}</h1>\n", escape_html(title));
    body.push_str(&format!("<p class=\"dates\">{}</p>\n", date_range(series)));

    if let Some(link) = series.cover_image_link() {
        body.push_str(&format!(
            "<img class=\"cover\" src=\"{}\" alt=\"{}\">\n",
            escape_html(link.as_str()),
            escape_html(title)
        ));
    }
    if !series.speakers().is_empty() {
        body.push_str(&format!(
            "<p class=\"speakers\">{}</p>\n",
            escape_html(&series.speakers().join(", "))
        ));
    }
    if let Some(description) = series.description() {
        body.push_str(&format!("<p class=\"description\">{}</p>\n", escape_html(description)));
    }
    for guide in series.study_guide_links().unwrap_or_default() {
        body.push_str(&format!(
            "<p class=\"study-guide\"><a href=\"{}\">Study guide</a></p>\n",
            escape_html(guide.as_str())
        ));
    }

    body.push_str("<ol class=\"messages\">\n");
    for message in messages {
        body.push_str(&render_message(series, message));
    }
    body.push_str("</ol>\n");
    page(PageKind::Series, title, &body)
}

fn render_message(series: &Series, message: &Message) -> String {
    let track = series
        .title()
        .and_then(|t| message.track_number_in(t))
        .map(|t| format!(" value=\"{}\"", t))
        .unwrap_or_default();
    let mut item = format!("<li{}>{}", track, escape_html(message.title().unwrap_or("(untitled)")));

    if let Some(date) = message.date() {
        item.push_str(&format!(" <span class=\"date\">{}</span>", format_medium_date(date)));
    }
    if !message.speakers().is_empty() {
        item.push_str(&format!(
            " <span class=\"speakers\">{}</span>",
            escape_html(&message.speakers().join(", "))
        ));
    }
    if let Some(audio) = message.audio_link() {
        item.push_str(&format!(" <a href=\"{}\">audio</a>", escape_html(audio.as_str())));
    }
    if let Some(video) = message.video_link() {
        item.push_str(&format!(" <a href=\"{}\">video</a>", escape_html(video.as_str())));
    }
    item.push_str("</li>\n");
    item
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::AccessLevel;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<b>\"Q&A\"</b>"), "&lt;b&gt;&quot;Q&amp;A&quot;&lt;/b&gt;");
    }

    #[test]
    fn test_index_links_only_public_series() {
        let mut public = Series::new();
        public.set_id("open".to_string());
        public.set_title("Open".to_string());
        public.set_visibility(Some(AccessLevel::Public));
        let mut private = Series::new();
        private.set_id("closed".to_string());
        private.set_title("Closed".to_string());
        private.set_visibility(Some(AccessLevel::Private));

        let html = render_index(Some("Series"), &[public, private], "html");
        assert!(html.contains("<a href=\"series-open.html\">Open</a>"));
        assert!(html.contains("Closed"));
        assert!(!html.contains("series-closed.html"));
        assert!(html.contains("<body class=\"series-index\">"));
    }

    #[test]
    fn test_index_links_follow_unique_page_names() {
        let mut first = Series::new();
        first.set_id("Hope!".to_string());
        first.set_title("Hope Part One".to_string());
        first.set_visibility(Some(AccessLevel::Public));
        let mut second = first.clone();
        second.set_id("hope".to_string());
        second.set_title("Hope Part Two".to_string());

        let html = render_index(None, &[first, second], "html");
        assert!(html.contains("<a href=\"series-hope.html\">Hope Part One</a>"));
        assert!(html.contains("<a href=\"series-hope-2.html\">Hope Part Two</a>"));
    }

    #[test]
    fn test_series_page_uses_track_numbers() {
        let mut series = Series::new();
        series.set_title("Abide".to_string());
        let mut message = Message::new();
        message.set_title("Remain".to_string());
        message.set_series(vec!["Abide".into()]);
        message.set_track_numbers(vec![4]);

        let html = render_series(&series, &[&message]);
        assert!(html.contains("<li value=\"4\">Remain"));
    }
}
