//! Selection → variant resolution and option picker state.

use serde::Serialize;

use super::{ProductOption, ProductVariant, Selection, VariantGraph, VariantLink, display_order};

/// How selection values are compared against variant options.
///
/// Defaults match how the product page queries the Storefront API
/// (`ignoreUnknownOptions: true, caseInsensitiveMatch: true`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOptions {
    /// Skip selection names the product doesn't declare instead of failing.
    pub ignore_unknown_options: bool,
    /// Compare values without regard to case.
    pub case_insensitive_match: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            ignore_unknown_options: true,
            case_insensitive_match: true,
        }
    }
}

impl MatchOptions {
    fn values_match(self, a: &str, b: &str) -> bool {
        if self.case_insensitive_match {
            a == b || a.to_lowercase() == b.to_lowercase()
        } else {
            a == b
        }
    }
}

/// Find the variant exactly matching a complete selection.
///
/// Returns `None` when any declared option is missing from the selection or
/// no variant carries the selected combination. Deterministic: the same
/// inputs always resolve to the same variant.
#[must_use]
pub fn resolve_selection<'g>(
    graph: &'g VariantGraph,
    selection: &Selection,
    match_options: MatchOptions,
) -> Option<&'g ProductVariant> {
    if !match_options.ignore_unknown_options
        && selection.iter().any(|s| graph.option(&s.name).is_none())
    {
        return None;
    }

    let wanted: Vec<(&str, &str)> = graph
        .options()
        .iter()
        .map(|o| selection.get(&o.name).map(|value| (o.name.as_str(), value)))
        .collect::<Option<_>>()?;

    graph.variants().iter().find(|variant| {
        wanted.iter().all(|(name, value)| {
            variant
                .option_value(name)
                .is_some_and(|held| match_options.values_match(held, value))
        })
    })
}

/// First variant the API returned, used when the URL selects nothing.
#[must_use]
pub fn default_variant(graph: &VariantGraph) -> Option<&ProductVariant> {
    graph.variants().first()
}

/// The selection the page should treat as current.
///
/// Declared options from the URL when there are any; otherwise the default
/// variant's options.
#[must_use]
pub fn effective_selection(graph: &VariantGraph, selection: &Selection) -> Selection {
    let declared = selection.restricted_to(graph);
    if !declared.is_empty() {
        return declared;
    }
    default_variant(graph)
        .map(|v| Selection::from_options(&v.selected_options))
        .unwrap_or_default()
}

/// Render state of one candidate value in an option picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionValueState {
    /// The candidate value as spelled by the server.
    pub value: String,
    /// An in-stock variant exists for this value with the other selections.
    pub is_available: bool,
    /// The value is currently selected.
    pub is_active: bool,
    /// URL that selects this value, other selections unchanged.
    pub target_url: String,
}

/// State of one candidate value for `option_name`.
///
/// The other currently-selected options are held fixed: the value is
/// available iff some in-stock variant matches it together with them.
#[must_use]
pub fn option_value_state(
    graph: &VariantGraph,
    selection: &Selection,
    option_name: &str,
    candidate: &str,
    link: &VariantLink,
) -> OptionValueState {
    let match_options = MatchOptions::default();

    let fixed: Vec<(&str, &str)> = graph
        .options()
        .iter()
        .filter(|o| o.name != option_name)
        .filter_map(|o| selection.get(&o.name).map(|value| (o.name.as_str(), value)))
        .collect();

    let is_available = graph.variants().iter().any(|variant| {
        variant.available_for_sale
            && variant
                .option_value(option_name)
                .is_some_and(|held| match_options.values_match(held, candidate))
            && fixed.iter().all(|(name, value)| {
                variant
                    .option_value(name)
                    .is_some_and(|held| match_options.values_match(held, value))
            })
    });

    let is_active = selection
        .get(option_name)
        .is_some_and(|current| match_options.values_match(current, candidate));

    let next = selection.clone().with(option_name, candidate);

    OptionValueState {
        value: candidate.to_string(),
        is_available,
        is_active,
        target_url: link.url_for(graph.options(), &next),
    }
}

/// Whether a picker can be interacted with yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PickerState {
    /// Variants are loaded; availability is accurate.
    Ready,
    /// Variants haven't loaded (or failed to); render disabled.
    Placeholder,
}

/// One option's picker: its values in display order with their state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionPicker {
    pub name: String,
    pub state: PickerState,
    pub values: Vec<OptionValueState>,
}

impl OptionPicker {
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.state == PickerState::Placeholder
    }
}

/// Pickers for every option with more than one value.
#[must_use]
pub fn option_pickers(
    graph: &VariantGraph,
    selection: &Selection,
    link: &VariantLink,
) -> Vec<OptionPicker> {
    let state = if graph.has_variants() {
        PickerState::Ready
    } else {
        PickerState::Placeholder
    };

    graph
        .options()
        .iter()
        .filter(|option| option.values.len() > 1)
        .map(|option| OptionPicker {
            name: option.name.clone(),
            state,
            values: display_order(&option.values)
                .into_iter()
                .map(|value| option_value_state(graph, selection, &option.name, value, link))
                .collect(),
        })
        .collect()
}

/// What the product page does with the variant the URL resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Landing<'a> {
    /// Render with this variant selected.
    Selected(&'a ProductVariant),
    /// The selection resolved to nothing; redirect to this URL.
    Redirect(String),
    /// The product has no variants at all.
    Unavailable,
}

/// Decide how to land on a product page.
///
/// `first` is the first variant the API returned and `resolved` the variant
/// matched to the URL selection, if any. Products without options always
/// land on their only variant. Otherwise an unresolved selection redirects
/// to the first variant's canonical URL.
#[must_use]
pub fn landing<'a>(
    first: Option<&'a ProductVariant>,
    resolved: Option<&'a ProductVariant>,
    link: &VariantLink,
) -> Landing<'a> {
    let Some(first) = first else {
        return Landing::Unavailable;
    };
    if first.is_default_title() {
        return Landing::Selected(first);
    }
    match resolved {
        Some(variant) => Landing::Selected(variant),
        None => Landing::Redirect(link.url_for_options(&first.selected_options)),
    }
}

/// Option definitions with values in display order, for callers rendering
/// their own pickers.
#[must_use]
pub fn ordered_options(options: &[ProductOption]) -> Vec<ProductOption> {
    options
        .iter()
        .map(|o| ProductOption::new(o.name.clone(), display_order(&o.values)))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::fixtures::{hoodie, variant};
    use super::super::{ProductOption, SelectedOption};
    use super::*;

    fn link() -> VariantLink {
        VariantLink::new("core-hoodie")
    }

    #[test]
    fn test_resolves_full_selection() {
        let graph = hoodie();
        let selection = Selection::new().with("Size", "M").with("Color", "White");
        let found = resolve_selection(&graph, &selection, MatchOptions::default()).unwrap();
        assert_eq!(found.id.as_str(), "gid://shopify/ProductVariant/White-M");
    }

    #[test]
    fn test_incomplete_selection_is_none() {
        let graph = hoodie();
        let selection = Selection::new().with("Color", "White");
        assert!(resolve_selection(&graph, &selection, MatchOptions::default()).is_none());
    }

    #[test]
    fn test_case_insensitive_values() {
        let graph = hoodie();
        let selection = Selection::new().with("Size", "m").with("Color", "WHITE");
        assert!(resolve_selection(&graph, &selection, MatchOptions::default()).is_some());

        let strict = MatchOptions {
            case_insensitive_match: false,
            ..MatchOptions::default()
        };
        assert!(resolve_selection(&graph, &selection, strict).is_none());
    }

    #[test]
    fn test_unknown_options_ignored_only_when_configured() {
        let graph = hoodie();
        let selection = Selection::from_query("Size=S&Color=Black&utm_source=ig");
        assert!(resolve_selection(&graph, &selection, MatchOptions::default()).is_some());

        let strict = MatchOptions {
            ignore_unknown_options: false,
            ..MatchOptions::default()
        };
        assert!(resolve_selection(&graph, &selection, strict).is_none());
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let graph = hoodie();
        let selection = Selection::new().with("Size", "L").with("Color", "Black");
        let first = resolve_selection(&graph, &selection, MatchOptions::default());
        for _ in 0..10 {
            assert_eq!(
                resolve_selection(&graph, &selection, MatchOptions::default()),
                first
            );
        }
    }

    #[test]
    fn test_out_of_stock_combination_is_unavailable() {
        let graph = hoodie();
        let selection = Selection::new().with("Color", "White");
        let state = option_value_state(&graph, &selection, "Size", "L", &link());
        assert!(!state.is_available);
        assert!(!state.is_active);
        assert_eq!(state.target_url, "/products/core-hoodie?Size=L&Color=White");

        let state = option_value_state(&graph, &selection, "Size", "M", &link());
        assert!(state.is_available);
    }

    #[test]
    fn test_active_value_follows_selection() {
        let graph = hoodie();
        let selection = Selection::new().with("Size", "S").with("Color", "Black");
        let state = option_value_state(&graph, &selection, "Size", "S", &link());
        assert!(state.is_active);
        assert!(state.is_available);
    }

    #[test]
    fn test_unselected_other_options_are_not_fixed() {
        let graph = hoodie();
        // With no color chosen, L is available because Black/L is in stock.
        let state = option_value_state(&graph, &Selection::new(), "Size", "L", &link());
        assert!(state.is_available);
    }

    #[test]
    fn test_target_url_round_trips() {
        let graph = hoodie();
        let selection = Selection::new().with("Size", "M").with("Color", "Black");
        let chosen = resolve_selection(&graph, &selection, MatchOptions::default()).unwrap();
        assert!(chosen.available_for_sale);

        let state = option_value_state(&graph, &selection, "Size", "M", &link());
        let query = state.target_url.split_once('?').map(|(_, q)| q).unwrap();
        let reparsed = Selection::from_query(query);
        assert_eq!(reparsed, selection);
        assert_eq!(
            resolve_selection(&graph, &reparsed, MatchOptions::default()),
            Some(chosen)
        );
    }

    #[test]
    fn test_pickers_skip_single_value_options_and_order_sizes() {
        let options = vec![
            ProductOption::new("Size", ["XL", "S", "L", "M"]),
            ProductOption::new("Color", ["Black"]),
        ];
        let mut variants = Vec::new();
        for size in ["XL", "S", "L", "M"] {
            variants.push(variant(&format!("gid://v/{size}"), size, "Black", true));
        }
        let graph = VariantGraph::new(options, variants).unwrap();

        let pickers = option_pickers(&graph, &Selection::new(), &link());
        assert_eq!(pickers.len(), 1);
        let values: Vec<&str> = pickers[0].values.iter().map(|v| v.value.as_str()).collect();
        assert_eq!(values, vec!["S", "M", "L", "XL"]);
        assert_eq!(pickers[0].state, PickerState::Ready);
    }

    #[test]
    fn test_pickers_are_placeholders_without_variants() {
        let graph = VariantGraph::options_only(hoodie().options().to_vec());
        let pickers = option_pickers(&graph, &Selection::new(), &link());
        assert_eq!(pickers.len(), 2);
        for picker in &pickers {
            assert!(picker.is_disabled());
            assert!(picker.values.iter().all(|v| !v.is_available));
        }
    }

    #[test]
    fn test_effective_selection_defaults_to_first_variant() {
        let graph = hoodie();
        let effective = effective_selection(&graph, &Selection::from_query("utm_source=ig"));
        assert_eq!(effective.get("Size"), Some("S"));
        assert_eq!(effective.get("Color"), Some("Black"));
        assert_eq!(effective.get("utm_source"), None);
    }

    #[test]
    fn test_landing_redirects_unresolved_selection() {
        let graph = hoodie();
        let first = default_variant(&graph);
        let selection = Selection::new().with("Size", "XXL").with("Color", "Black");
        let resolved = resolve_selection(&graph, &selection, MatchOptions::default());

        assert_eq!(
            landing(first, resolved, &link()),
            Landing::Redirect("/products/core-hoodie?Size=S&Color=Black".to_string())
        );
    }

    #[test]
    fn test_landing_default_title_product() {
        let mut only = variant("gid://v/1", "S", "Black", true);
        only.selected_options = vec![SelectedOption::new("Title", "Default Title")];
        assert_eq!(landing(Some(&only), None, &link()), Landing::Selected(&only));
        assert_eq!(landing(None, None, &link()), Landing::Unavailable);
    }

    #[test]
    fn test_ordered_options() {
        let options = vec![ProductOption::new("Size", ["L", "XL", "M", "S"])];
        let ordered = ordered_options(&options);
        assert_eq!(ordered[0].values, vec!["S", "M", "L", "XL"]);
    }
}
