//! Integration tests for product page variant selection.
//!
//! Covers the path from a product URL to the variant rendered and the
//! option pickers shown beside it.

use internal_war_core::variant::{
    Landing, MatchOptions, PickerState, Selection, VariantGraph, VariantLink, effective_selection,
    landing, option_pickers, ordered_options, resolve_selection,
};
use internal_war_integration_tests::{hoodie_graph, hoodie_options, hoodie_variant};

fn link(query: Option<&str>) -> VariantLink {
    VariantLink::from_request("core-hoodie", "/en-us/products/core-hoodie", query, &hoodie_options())
}

/// Where the product page ends up for a query string.
#[derive(Debug, PartialEq, Eq)]
enum Outcome {
    Render(String),
    Redirect(String),
    NotFound,
}

fn land(graph: &VariantGraph, query: &str) -> Outcome {
    let selection = Selection::from_query(query);
    let resolved = resolve_selection(graph, &selection, MatchOptions::default());
    match landing(graph.variants().first(), resolved, &link(Some(query))) {
        Landing::Selected(variant) => Outcome::Render(variant.id.to_string()),
        Landing::Redirect(url) => Outcome::Redirect(url),
        Landing::Unavailable => Outcome::NotFound,
    }
}

#[test]
fn test_full_selection_lands_on_variant() {
    let graph = hoodie_graph();
    assert_eq!(
        land(&graph, "Color=Bone&Size=M"),
        Outcome::Render("gid://shopify/ProductVariant/6".into())
    );
}

#[test]
fn test_selection_matches_case_insensitively() {
    let graph = hoodie_graph();
    assert_eq!(
        land(&graph, "Color=black&Size=xl"),
        Outcome::Render("gid://shopify/ProductVariant/4".into())
    );
}

#[test]
fn test_impossible_selection_redirects_to_first_variant() {
    let graph = hoodie_graph();
    assert_eq!(
        land(&graph, "Color=Bone&Size=XL&ref=ig"),
        Outcome::Redirect("/en-us/products/core-hoodie?Color=Black&Size=S&ref=ig".into())
    );
}

#[test]
fn test_bare_url_redirects_to_canonical() {
    let graph = hoodie_graph();
    assert_eq!(
        land(&graph, ""),
        Outcome::Redirect("/en-us/products/core-hoodie?Color=Black&Size=S".into())
    );
}

#[test]
fn test_no_variants_is_unavailable() {
    let graph = VariantGraph::options_only(hoodie_options());
    assert_eq!(land(&graph, "Color=Black&Size=S"), Outcome::NotFound);
}

#[test]
fn test_pickers_for_bone() {
    let graph = hoodie_graph();
    let selection = effective_selection(&graph, &Selection::from_query("Color=Bone&Size=S"));
    let pickers = option_pickers(&graph, &selection, &link(None));

    let size = pickers.iter().find(|p| p.name == "Size").unwrap_or_else(|| panic!("no size picker"));
    assert_eq!(size.state, PickerState::Ready);

    let values: Vec<_> = size.values.iter().map(|v| v.value.as_str()).collect();
    assert_eq!(values, ["S", "M", "L", "XL"]);

    let available: Vec<_> = size
        .values
        .iter()
        .filter(|v| v.is_available)
        .map(|v| v.value.as_str())
        .collect();
    assert_eq!(available, ["S", "M"]);

    let active: Vec<_> = size.values.iter().filter(|v| v.is_active).collect();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].value, "S");

    let m = size.values.iter().find(|v| v.value == "M").unwrap_or_else(|| panic!("no M"));
    assert_eq!(m.target_url, "/en-us/products/core-hoodie?Color=Bone&Size=M");
}

#[test]
fn test_sold_out_variant_is_unavailable_in_picker() {
    let graph = hoodie_graph();
    let selection = Selection::from_query("Color=Black&Size=M");
    let pickers = option_pickers(&graph, &selection, &link(None));
    let size = pickers.iter().find(|p| p.name == "Size").unwrap_or_else(|| panic!("no size picker"));

    let l = size.values.iter().find(|v| v.value == "L").unwrap_or_else(|| panic!("no L"));
    assert!(!l.is_available);
}

#[test]
fn test_pickers_render_disabled_without_variants() {
    let graph = VariantGraph::options_only(hoodie_options());
    let pickers = option_pickers(&graph, &Selection::new(), &link(None));

    assert_eq!(pickers.len(), 2);
    assert!(pickers.iter().all(|p| p.is_disabled()));
    assert!(pickers.iter().flat_map(|p| &p.values).all(|v| !v.is_available));
}

#[test]
fn test_ordered_options_sorts_size_ladder_only() {
    let ordered = ordered_options(&hoodie_options());
    assert_eq!(ordered[0].values, ["Black", "Bone"]);
    assert_eq!(ordered[1].values, ["S", "M", "L", "XL"]);
}

#[test]
fn test_resolution_is_deterministic() {
    let graph = hoodie_graph();
    let selection = Selection::from_query("Size=M&Color=Black");
    let first = resolve_selection(&graph, &selection, MatchOptions::default()).map(|v| &v.id);
    for _ in 0..10 {
        assert_eq!(
            resolve_selection(&graph, &selection, MatchOptions::default()).map(|v| &v.id),
            first
        );
    }
    assert_eq!(first, Some(&hoodie_variant(2, "Black", "M", true).id));
}
