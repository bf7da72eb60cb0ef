//! Product type conversion functions.

use internal_war_core::variant::{ProductOption, ProductVariant, SelectedOption};
use internal_war_core::{MerchandiseId, Money, ProductId};

use crate::shopify::ShopifyError;
use crate::shopify::types::{Image, PageInfo, Product, ProductConnection, ProductSummary};

use super::super::queries::{
    Connection, ImageNode, MoneyNode, PageInfoNode, ProductCardNode, ProductNode,
    SelectedOptionNode, VariantNode,
};

// =============================================================================
// Shared Conversions
// =============================================================================

pub fn convert_money(money: &MoneyNode) -> Result<Money, ShopifyError> {
    Ok(Money::parse(&money.amount, &money.currency_code)?)
}

pub fn convert_image(image: ImageNode) -> Image {
    Image {
        url: image.url,
        alt_text: image.alt_text,
    }
}

pub fn convert_selected_options(options: Vec<SelectedOptionNode>) -> Vec<SelectedOption> {
    options
        .into_iter()
        .map(|o| SelectedOption::new(o.name, o.value))
        .collect()
}

pub fn convert_page_info(page_info: PageInfoNode) -> PageInfo {
    PageInfo {
        has_next_page: page_info.has_next_page,
        has_previous_page: page_info.has_previous_page,
        start_cursor: page_info.start_cursor,
        end_cursor: page_info.end_cursor,
    }
}

// =============================================================================
// Product Conversions
// =============================================================================

pub fn convert_variant(variant: VariantNode) -> Result<ProductVariant, ShopifyError> {
    Ok(ProductVariant {
        id: MerchandiseId::new(variant.id),
        title: variant.title,
        available_for_sale: variant.available_for_sale,
        price: convert_money(&variant.price)?,
        compare_at_price: variant
            .compare_at_price
            .as_ref()
            .map(convert_money)
            .transpose()?,
        selected_options: convert_selected_options(variant.selected_options),
        image_url: variant.image.map(|i| i.url),
    })
}

pub fn convert_variants(variants: Vec<VariantNode>) -> Result<Vec<ProductVariant>, ShopifyError> {
    variants.into_iter().map(convert_variant).collect()
}

pub fn convert_product(product: ProductNode) -> Result<Product, ShopifyError> {
    Ok(Product {
        id: ProductId::new(product.id),
        handle: product.handle,
        title: product.title,
        vendor: product.vendor,
        description_html: product.description_html,
        featured_image: product.featured_image.map(convert_image),
        images: product.images.nodes.into_iter().map(convert_image).collect(),
        options: product
            .options
            .into_iter()
            .map(|o| ProductOption::new(o.name, o.option_values.into_iter().map(|v| v.name)))
            .collect(),
        selected_variant: product.selected_variant.map(convert_variant).transpose()?,
        first_variant: product
            .variants
            .nodes
            .into_iter()
            .next()
            .map(convert_variant)
            .transpose()?,
    })
}

pub fn convert_product_summary(product: ProductCardNode) -> Result<ProductSummary, ShopifyError> {
    Ok(ProductSummary {
        id: ProductId::new(product.id),
        handle: product.handle,
        title: product.title,
        available_for_sale: product.available_for_sale,
        featured_image: product.featured_image.map(convert_image),
        price: convert_money(&product.price_range.min_variant_price)?,
        compare_at_price: product
            .compare_at_price_range
            .as_ref()
            .map(|r| convert_money(&r.min_variant_price))
            .transpose()?,
        default_options: product
            .variants
            .nodes
            .into_iter()
            .next()
            .map(|v| convert_selected_options(v.selected_options))
            .unwrap_or_default(),
    })
}

pub fn convert_product_connection(
    connection: Connection<ProductCardNode>,
) -> Result<ProductConnection, ShopifyError> {
    Ok(ProductConnection {
        products: connection
            .nodes
            .into_iter()
            .map(convert_product_summary)
            .collect::<Result<_, _>>()?,
        page_info: convert_page_info(connection.page_info),
    })
}
