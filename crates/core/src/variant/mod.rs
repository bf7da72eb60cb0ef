//! Product options, variants and selection resolution.
//!
//! A product declares named option axes (e.g., "Size", "Color") and a set of
//! variants, each pinned to exactly one value per axis. Together they form a
//! [`VariantGraph`], which is validated once when built from API data so the
//! resolver can trust its shape.
//!
//! The selection lives in the product page URL (one query parameter per
//! option name). [`resolve`] maps a selection to a variant and computes the
//! per-value picker state, including the URL each value navigates to.

mod link;
mod ordering;
mod resolve;
mod selection;

pub use link::{VariantLink, is_locale, locale_prefix};
pub use ordering::display_order;
pub use resolve::{
    Landing, MatchOptions, OptionPicker, OptionValueState, PickerState, default_variant,
    effective_selection, landing, option_pickers, option_value_state, ordered_options,
    resolve_selection,
};
pub use selection::Selection;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{MerchandiseId, Money};

/// Option name and value used by single-variant products.
pub const DEFAULT_OPTION_NAME: &str = "Title";
/// Value Shopify assigns to the only variant of an option-less product.
pub const DEFAULT_OPTION_VALUE: &str = "Default Title";

/// Selected option on a product variant or cart line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectedOption {
    /// Option name (e.g., "Size", "Color").
    pub name: String,
    /// Selected value (e.g., "L", "Black").
    pub value: String,
}

impl SelectedOption {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A named axis of variation with its values in server order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductOption {
    /// Option name (e.g., "Size").
    pub name: String,
    /// Available values (e.g., `["S", "M", "L"]`).
    pub values: Vec<String>,
}

impl ProductOption {
    #[must_use]
    pub fn new<V: Into<String>>(name: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

/// One concrete SKU.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductVariant {
    /// Variant GID, used as the cart merchandise ID.
    pub id: MerchandiseId,
    /// Variant title (combination of option values).
    pub title: String,
    /// Whether this variant can currently be bought.
    pub available_for_sale: bool,
    /// Current price.
    pub price: Money,
    /// Compare-at price (original price if on sale).
    pub compare_at_price: Option<Money>,
    /// One value per product option.
    pub selected_options: Vec<SelectedOption>,
    /// Variant image URL.
    pub image_url: Option<String>,
}

impl ProductVariant {
    /// Value this variant holds for `option_name`.
    #[must_use]
    pub fn option_value(&self, option_name: &str) -> Option<&str> {
        self.selected_options
            .iter()
            .find(|o| o.name == option_name)
            .map(|o| o.value.as_str())
    }

    /// Whether this is the placeholder variant of a product without options.
    #[must_use]
    pub fn is_default_title(&self) -> bool {
        self.selected_options
            .iter()
            .any(|o| o.name == DEFAULT_OPTION_NAME && o.value == DEFAULT_OPTION_VALUE)
    }
}

/// Ways a product's option/variant payload can violate the graph shape.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VariantGraphError {
    #[error("option '{0}' is declared more than once")]
    DuplicateOption(String),

    #[error("variant {variant} uses undeclared option '{option}'")]
    UnknownOption {
        variant: MerchandiseId,
        option: String,
    },

    #[error("variant {variant} has value '{value}' not declared for option '{option}'")]
    UnknownValue {
        variant: MerchandiseId,
        option: String,
        value: String,
    },

    #[error("variant {variant} has no value for option '{option}'")]
    IncompleteVariant {
        variant: MerchandiseId,
        option: String,
    },

    #[error("variant {variant} repeats an option combination")]
    DuplicateCombination { variant: MerchandiseId },
}

/// Options and variants of one product, validated together.
///
/// Invariant: every variant holds exactly one declared value for each
/// declared option, and no two variants share a combination. The variant
/// list may be empty when variants haven't loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariantGraph {
    options: Vec<ProductOption>,
    variants: Vec<ProductVariant>,
}

impl VariantGraph {
    /// Validate and build a graph.
    ///
    /// # Errors
    ///
    /// Returns the first [`VariantGraphError`] found, checking options first
    /// and then variants in server order.
    pub fn new(
        options: Vec<ProductOption>,
        variants: Vec<ProductVariant>,
    ) -> Result<Self, VariantGraphError> {
        let mut names = HashSet::new();
        for option in &options {
            if !names.insert(option.name.as_str()) {
                return Err(VariantGraphError::DuplicateOption(option.name.clone()));
            }
        }

        let mut combinations = HashSet::new();
        for variant in &variants {
            validate_variant(&options, variant)?;

            let combination: Vec<&str> = options
                .iter()
                .filter_map(|o| variant.option_value(&o.name))
                .collect();
            if !combinations.insert(combination) {
                return Err(VariantGraphError::DuplicateCombination {
                    variant: variant.id.clone(),
                });
            }
        }

        Ok(Self { options, variants })
    }

    /// A graph whose variants failed to load.
    ///
    /// Option pickers built from it render as placeholders.
    #[must_use]
    pub const fn options_only(options: Vec<ProductOption>) -> Self {
        Self {
            options,
            variants: Vec::new(),
        }
    }

    #[must_use]
    pub fn options(&self) -> &[ProductOption] {
        &self.options
    }

    #[must_use]
    pub fn variants(&self) -> &[ProductVariant] {
        &self.variants
    }

    #[must_use]
    pub fn option(&self, name: &str) -> Option<&ProductOption> {
        self.options.iter().find(|o| o.name == name)
    }

    #[must_use]
    pub fn has_variants(&self) -> bool {
        !self.variants.is_empty()
    }

    /// Look up a variant by ID.
    #[must_use]
    pub fn variant(&self, id: &MerchandiseId) -> Option<&ProductVariant> {
        self.variants.iter().find(|v| &v.id == id)
    }
}

fn validate_variant(
    options: &[ProductOption],
    variant: &ProductVariant,
) -> Result<(), VariantGraphError> {
    for selected in &variant.selected_options {
        let Some(option) = options.iter().find(|o| o.name == selected.name) else {
            return Err(VariantGraphError::UnknownOption {
                variant: variant.id.clone(),
                option: selected.name.clone(),
            });
        };
        if !option.values.contains(&selected.value) {
            return Err(VariantGraphError::UnknownValue {
                variant: variant.id.clone(),
                option: selected.name.clone(),
                value: selected.value.clone(),
            });
        }
    }

    for option in options {
        let count = variant
            .selected_options
            .iter()
            .filter(|s| s.name == option.name)
            .count();
        if count != 1 {
            return Err(VariantGraphError::IncompleteVariant {
                variant: variant.id.clone(),
                option: option.name.clone(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Shared product fixtures for resolver tests.

    use super::*;
    use crate::types::{CurrencyCode, Money};

    pub fn variant(id: &str, size: &str, color: &str, available: bool) -> ProductVariant {
        ProductVariant {
            id: MerchandiseId::new(id),
            title: format!("{color} / {size}"),
            available_for_sale: available,
            price: Money::new(rust_decimal::Decimal::new(6500, 2), CurrencyCode::USD),
            compare_at_price: None,
            selected_options: vec![
                SelectedOption::new("Size", size),
                SelectedOption::new("Color", color),
            ],
            image_url: None,
        }
    }

    /// Size {S,M,L} x Color {Black,White}, White/L out of stock.
    pub fn hoodie() -> VariantGraph {
        let options = vec![
            ProductOption::new("Size", ["S", "M", "L"]),
            ProductOption::new("Color", ["Black", "White"]),
        ];
        let mut variants = Vec::new();
        for color in ["Black", "White"] {
            for size in ["S", "M", "L"] {
                let available = !(color == "White" && size == "L");
                variants.push(variant(
                    &format!("gid://shopify/ProductVariant/{color}-{size}"),
                    size,
                    color,
                    available,
                ));
            }
        }
        VariantGraph::new(options, variants).unwrap_or_default()
    }
}
