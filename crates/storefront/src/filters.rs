//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Width requested from the Shopify CDN for listing images.
const THUMBNAIL_WIDTH: &str = "600";

/// Ask the Shopify CDN for a resized image.
///
/// Sets the `width` query parameter, replacing any existing one. Values
/// that don't parse as URLs are returned unchanged.
///
/// Usage in templates: `{{ image.url|thumbnail }}`
#[askama::filter_fn]
pub fn thumbnail(url: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let raw = url.to_string();
    let Ok(mut parsed) = url::Url::parse(&raw) else {
        return Ok(raw);
    };

    let kept: Vec<(String, String)> = parsed
        .query_pairs()
        .filter(|(name, _)| name != "width")
        .map(|(name, value)| (name.into_owned(), value.into_owned()))
        .collect();
    parsed
        .query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair("width", THUMBNAIL_WIDTH);

    Ok(parsed.into())
}

/// Item count with its noun, e.g. "1 item" or "3 items".
///
/// Usage in templates: `{{ cart.item_count|items }}`
#[askama::filter_fn]
pub fn items(count: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let count = count.to_string();
    let noun = if count == "1" { "item" } else { "items" };
    Ok(format!("{count} {noun}"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use askama::Template;

    use crate::filters;

    #[derive(Template)]
    #[template(source = "{{ url|thumbnail }}", ext = "txt")]
    struct Thumbnail<'a> {
        url: &'a str,
    }

    #[derive(Template)]
    #[template(source = "{{ count|items }}", ext = "txt")]
    struct Items {
        count: u32,
    }

    #[test]
    fn test_thumbnail_sets_width() {
        let rendered = Thumbnail {
            url: "https://cdn.shopify.com/s/files/hoodie.jpg?v=12&width=2000",
        }
        .render()
        .unwrap();
        assert_eq!(
            rendered,
            "https://cdn.shopify.com/s/files/hoodie.jpg?v=12&width=600"
        );
    }

    #[test]
    fn test_thumbnail_leaves_relative_paths() {
        let rendered = Thumbnail { url: "/static/placeholder.png" }.render().unwrap();
        assert_eq!(rendered, "/static/placeholder.png");
    }

    #[test]
    fn test_items() {
        assert_eq!(Items { count: 1 }.render().unwrap(), "1 item");
        assert_eq!(Items { count: 0 }.render().unwrap(), "0 items");
    }
}
