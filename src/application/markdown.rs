#[cfg(test)]
#[path = "markdown_test.rs"]
mod tests;

use pulldown_cmark::html;
use pulldown_cmark::CowStr;
use pulldown_cmark::Event;
use pulldown_cmark::Options;
use pulldown_cmark::Parser;
use pulldown_cmark::Tag;

const UNSAFE_SCHEMES: [&str; 3] = ["javascript:", "vbscript:", "data:"];

fn is_unsafe_url(url: &str) -> bool {
    let url = url.trim().to_lowercase();
    return UNSAFE_SCHEMES
        .iter()
        .any(|scheme| return url.starts_with(scheme));
}

fn sanitize_url(url: CowStr) -> CowStr {
    if is_unsafe_url(&url) {
        return CowStr::Borrowed("#");
    }

    return url;
}

/// Renders message markdown to HTML. Raw HTML in the message is emitted as
/// escaped text and script-like link targets are dropped, so the output is
/// safe to place in the page as is.
pub fn to_html(content: &str) -> String {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
    let events = Parser::new_ext(content, options).map(|event| {
        return match event {
            Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
            Event::Start(Tag::Link {
                link_type,
                dest_url,
                title,
                id,
            }) => Event::Start(Tag::Link {
                link_type,
                dest_url: sanitize_url(dest_url),
                title,
                id,
            }),
            Event::Start(Tag::Image {
                link_type,
                dest_url,
                title,
                id,
            }) => Event::Start(Tag::Image {
                link_type,
                dest_url: sanitize_url(dest_url),
                title,
                id,
            }),
            _ => event,
        };
    });

    let mut res = String::with_capacity(content.len() * 3 / 2);
    html::push_html(&mut res, events);

    return res;
}
