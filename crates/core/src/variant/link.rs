//! Canonical product URLs for a selection.

use super::{ProductOption, SelectedOption, Selection};

/// Builds the product URL a selection navigates to.
///
/// URLs look like `/{locale}/products/{handle}?Size=L&Color=Black`. Option
/// parameters are written in the product's option order so the same
/// selection always yields the same URL. Query parameters unrelated to
/// options are preserved after them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantLink {
    path: String,
    preserved: Vec<(String, String)>,
}

impl VariantLink {
    /// Link for a product, with no locale and no extra parameters.
    #[must_use]
    pub fn new(handle: &str) -> Self {
        Self::localized(handle, None)
    }

    /// Link for a product under an optional locale segment such as `en-us`.
    #[must_use]
    pub fn localized(handle: &str, locale: Option<&str>) -> Self {
        let path = locale.map_or_else(
            || format!("/products/{handle}"),
            |locale| format!("/{locale}/products/{handle}"),
        );
        Self {
            path,
            preserved: Vec::new(),
        }
    }

    /// Link for a product as seen from the current request.
    ///
    /// Keeps the locale prefix of `current_path` (e.g., `/en-us/`) and every
    /// parameter of `current_query` that isn't one of `options`.
    #[must_use]
    pub fn from_request(
        handle: &str,
        current_path: &str,
        current_query: Option<&str>,
        options: &[ProductOption],
    ) -> Self {
        let path = Self::localized(handle, locale_prefix(current_path)).path;

        let preserved = current_query
            .map(|q| q.strip_prefix('?').unwrap_or(q))
            .map(|q| {
                url::form_urlencoded::parse(q.as_bytes())
                    .filter(|(name, _)| !options.iter().any(|o| o.name == *name))
                    .map(|(name, value)| (name.into_owned(), value.into_owned()))
                    .collect()
            })
            .unwrap_or_default();

        Self { path, preserved }
    }

    /// Path without query string.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// URL for a selection, with option parameters in `options` order.
    ///
    /// Names in `selection` that aren't declared options are left out.
    #[must_use]
    pub fn url_for(&self, options: &[ProductOption], selection: &Selection) -> String {
        let pairs = options
            .iter()
            .filter_map(|o| selection.get(&o.name).map(|value| (o.name.as_str(), value)));
        self.build(pairs)
    }

    /// URL for a concrete set of selected options (a variant or cart line).
    #[must_use]
    pub fn url_for_options(&self, selected: &[SelectedOption]) -> String {
        self.build(selected.iter().map(|o| (o.name.as_str(), o.value.as_str())))
    }

    fn build<'a>(&self, pairs: impl Iterator<Item = (&'a str, &'a str)>) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        let mut written = Vec::new();
        for (name, value) in pairs {
            serializer.append_pair(name, value);
            written.push(name);
        }
        for (name, value) in &self.preserved {
            if !written.contains(&name.as_str()) {
                serializer.append_pair(name, value);
            }
        }

        let query = serializer.finish();
        if query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{query}", self.path)
        }
    }
}

/// Whether a path segment is a locale such as `en-us`.
#[must_use]
pub fn is_locale(segment: &str) -> bool {
    let mut parts = segment.split('-');
    let (Some(language), Some(country), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    let is_code = |s: &str| s.len() == 2 && s.chars().all(|c| c.is_ascii_alphabetic());
    is_code(language) && is_code(country)
}

/// Locale segment such as `en-us` at the start of a path.
#[must_use]
pub fn locale_prefix(path: &str) -> Option<&str> {
    let first = path.trim_start_matches('/').split('/').next()?;
    is_locale(first).then_some(first)
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::hoodie;
    use super::*;

    #[test]
    fn test_url_uses_option_order_not_selection_order() {
        let graph = hoodie();
        let link = VariantLink::new("core-hoodie");
        let selection = Selection::new().with("Color", "Black").with("Size", "M");
        assert_eq!(
            link.url_for(graph.options(), &selection),
            "/products/core-hoodie?Size=M&Color=Black"
        );
    }

    #[test]
    fn test_empty_selection_is_bare_path() {
        let graph = hoodie();
        let link = VariantLink::new("core-hoodie");
        assert_eq!(
            link.url_for(graph.options(), &Selection::new()),
            "/products/core-hoodie"
        );
    }

    #[test]
    fn test_from_request_keeps_locale_and_unrelated_params() {
        let graph = hoodie();
        let link = VariantLink::from_request(
            "core-hoodie",
            "/en-us/products/core-hoodie",
            Some("?Size=S&utm_source=ig"),
            graph.options(),
        );
        let selection = Selection::new().with("Size", "L").with("Color", "White");
        assert_eq!(
            link.url_for(graph.options(), &selection),
            "/en-us/products/core-hoodie?Size=L&Color=White&utm_source=ig"
        );
    }

    #[test]
    fn test_locale_prefix_detection() {
        assert_eq!(locale_prefix("/en-us/products/x"), Some("en-us"));
        assert_eq!(locale_prefix("/FR-ca/products/x"), Some("FR-ca"));
        assert_eq!(locale_prefix("/products/x"), None);
        assert_eq!(locale_prefix("/eng-us/products/x"), None);
        assert_eq!(locale_prefix("/"), None);
    }

    #[test]
    fn test_localized_link() {
        let link = VariantLink::localized("tee", Some("en-ca"));
        assert_eq!(link.path(), "/en-ca/products/tee");
        assert_eq!(
            link.url_for_options(&[SelectedOption::new("Size", "M")]),
            "/en-ca/products/tee?Size=M"
        );
        assert_eq!(VariantLink::localized("tee", None), VariantLink::new("tee"));
    }

    #[test]
    fn test_is_locale() {
        assert!(is_locale("en-us"));
        assert!(!is_locale("en"));
        assert!(!is_locale("products"));
        assert!(!is_locale("en-us-x"));
        assert!(!is_locale("e1-us"));
    }

    #[test]
    fn test_values_are_form_encoded() {
        let link = VariantLink::new("tee");
        let url = link.url_for_options(&[SelectedOption::new("Color", "Heather Grey")]);
        assert_eq!(url, "/products/tee?Color=Heather+Grey");
    }
}
