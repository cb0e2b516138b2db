//! Open Graph and HTML head metadata extraction.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::trace;
use url::Url;

use recollect_core::ScrapedMetadata;

static META_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("meta").expect("meta selector is valid"));
static TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("title").expect("title selector is valid"));
static LINK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("link[rel][href]").expect("link selector is valid"));

/// Extract preview metadata from an HTML document.
///
/// `submitted_url` supplies the hostname used when the document has no usable
/// title. `page_url` is the URL the document was served from after redirects
/// and is the base for relative image and favicon URLs.
pub fn extract_metadata(html: &str, submitted_url: &Url, page_url: &Url) -> ScrapedMetadata {
    let document = Html::parse_document(html);
    let mut meta = ScrapedMetadata::default();

    // Document order; the first non-empty occurrence of each key wins.
    for element in document.select(&META_SELECTOR) {
        let Some(content) = non_empty(element.value().attr("content")) else {
            continue;
        };

        for key in meta_keys(&element) {
            let slot = match key.as_str() {
                "og:title" => &mut meta.title,
                "og:description" | "description" => &mut meta.description,
                "og:image" => &mut meta.og_image,
                _ => continue,
            };
            if slot.is_none() {
                trace!(subsystem = "scrape", component = "extract", key = %key, "Meta matched");
                *slot = Some(content.clone());
            }
        }

        if meta.is_complete() {
            break;
        }
    }

    if meta.title.is_none() {
        meta.title = document
            .select(&TITLE_SELECTOR)
            .next()
            .and_then(|el| non_empty(Some(el.text().collect::<String>().as_str())))
            .or_else(|| submitted_url.host_str().map(str::to_string));
    }

    meta.og_image = meta.og_image.and_then(|img| absolutize(page_url, &img));
    meta.fav_icon = find_favicon(&document).and_then(|href| absolutize(page_url, &href));

    meta
}

/// `property` and `name`, lower-cased. A tag may carry both.
fn meta_keys<'a>(element: &ElementRef<'a>) -> impl Iterator<Item = String> + 'a {
    let value = element.value();
    [value.attr("property"), value.attr("name")]
        .into_iter()
        .flatten()
        .map(|k| k.trim().to_ascii_lowercase())
}

fn find_favicon(document: &Html) -> Option<String> {
    document.select(&LINK_SELECTOR).find_map(|el| {
        let rel = el.value().attr("rel")?.trim().to_ascii_lowercase();
        if rel == "icon" || rel == "shortcut icon" {
            non_empty(el.value().attr("href"))
        } else {
            None
        }
    })
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Resolve a possibly relative or protocol-relative reference.
fn absolutize(base: &Url, reference: &str) -> Option<String> {
    base.join(reference).ok().map(|u| u.to_string())
}
