//! GraphQL documents for the Shopify Storefront API and their response
//! shapes.
//!
//! Documents are assembled at compile time from shared fragments. Response
//! types mirror exactly the fields selected and are converted into domain
//! types in `conversions`.

use serde::Deserialize;

// =============================================================================
// Fragments
// =============================================================================

macro_rules! money_fields {
    () => {
        "fragment MoneyFields on MoneyV2 { amount currencyCode }\n"
    };
}

macro_rules! image_fields {
    () => {
        "fragment ImageFields on Image { url altText }\n"
    };
}

macro_rules! page_info_fields {
    () => {
        "fragment PageInfoFields on PageInfo { hasNextPage hasPreviousPage startCursor endCursor }\n"
    };
}

macro_rules! variant_fields {
    () => {
        r"fragment VariantFields on ProductVariant {
  id
  title
  availableForSale
  price { ...MoneyFields }
  compareAtPrice { ...MoneyFields }
  selectedOptions { name value }
  image { ...ImageFields }
}
"
    };
}

macro_rules! product_card_fields {
    () => {
        r"fragment ProductCardFields on Product {
  id
  handle
  title
  availableForSale
  featuredImage { ...ImageFields }
  priceRange { minVariantPrice { ...MoneyFields } }
  compareAtPriceRange { minVariantPrice { ...MoneyFields } }
  variants(first: 1) { nodes { selectedOptions { name value } } }
}
"
    };
}

macro_rules! cart_fields {
    () => {
        r"fragment CartFields on Cart {
  id
  checkoutUrl
  totalQuantity
  cost { subtotalAmount { ...MoneyFields } }
  discountCodes { code applicable }
  lines(first: 100) {
    nodes {
      id
      quantity
      cost { totalAmount { ...MoneyFields } }
      merchandise {
        ... on ProductVariant {
          id
          title
          availableForSale
          price { ...MoneyFields }
          selectedOptions { name value }
          image { ...ImageFields }
          product { handle title }
        }
      }
    }
  }
}
"
    };
}

macro_rules! cart_mutation {
    ($signature:literal, $field:literal) => {
        concat!(
            "mutation ",
            $signature,
            " {\n  payload: ",
            $field,
            " {\n    cart { ...CartFields }\n    userErrors { field message code }\n  }\n}\n",
            cart_fields!(),
            money_fields!(),
            image_fields!()
        )
    };
}

// =============================================================================
// Product Queries
// =============================================================================

/// Critical product data. Shopify resolves the selected variant with the
/// same rules as the local resolver (unknown options ignored, values
/// compared case-insensitively).
pub const PRODUCT_BY_HANDLE: &str = concat!(
    r"query ProductByHandle($handle: String!, $selectedOptions: [SelectedOptionInput!]!) {
  product(handle: $handle) {
    id
    handle
    title
    vendor
    descriptionHtml
    featuredImage { ...ImageFields }
    images(first: 10) { nodes { ...ImageFields } }
    options { name optionValues { name } }
    selectedVariant: variantBySelectedOptions(
      selectedOptions: $selectedOptions
      ignoreUnknownOptions: true
      caseInsensitiveMatch: true
    ) { ...VariantFields }
    variants(first: 1) { nodes { ...VariantFields } }
  }
}
",
    variant_fields!(),
    money_fields!(),
    image_fields!()
);

/// Every variant of a product, for availability.
pub const PRODUCT_VARIANTS: &str = concat!(
    r"query ProductVariants($handle: String!) {
  product(handle: $handle) {
    variants(first: 250) { nodes { ...VariantFields } }
  }
}
",
    variant_fields!(),
    money_fields!(),
    image_fields!()
);

pub const PRODUCTS: &str = concat!(
    r"query Products($first: Int, $last: Int, $after: String, $before: String, $query: String) {
  products(first: $first, last: $last, after: $after, before: $before, query: $query) {
    nodes { ...ProductCardFields }
    pageInfo { ...PageInfoFields }
  }
}
",
    product_card_fields!(),
    page_info_fields!(),
    money_fields!(),
    image_fields!()
);

// =============================================================================
// Collection Queries
// =============================================================================

pub const COLLECTION_BY_HANDLE: &str = concat!(
    r"query CollectionByHandle($handle: String!, $first: Int, $last: Int, $after: String, $before: String) {
  collection(handle: $handle) {
    id
    handle
    title
    description
    image { ...ImageFields }
    products(first: $first, last: $last, after: $after, before: $before) {
      nodes { ...ProductCardFields }
      pageInfo { ...PageInfoFields }
    }
  }
}
",
    product_card_fields!(),
    page_info_fields!(),
    money_fields!(),
    image_fields!()
);

pub const COLLECTIONS: &str = concat!(
    r"query Collections($first: Int, $last: Int, $after: String, $before: String) {
  collections(first: $first, last: $last, after: $after, before: $before) {
    nodes { id handle title description image { ...ImageFields } }
    pageInfo { ...PageInfoFields }
  }
}
",
    page_info_fields!(),
    image_fields!()
);

// =============================================================================
// Cart Queries and Mutations
// =============================================================================

pub const CART: &str = concat!(
    "query Cart($cartId: ID!) {\n  cart(id: $cartId) { ...CartFields }\n}\n",
    cart_fields!(),
    money_fields!(),
    image_fields!()
);

pub const CART_CREATE: &str = cart_mutation!(
    "CartCreate($lines: [CartLineInput!])",
    "cartCreate(input: { lines: $lines })"
);

pub const CART_LINES_ADD: &str = cart_mutation!(
    "CartLinesAdd($cartId: ID!, $lines: [CartLineInput!]!)",
    "cartLinesAdd(cartId: $cartId, lines: $lines)"
);

pub const CART_LINES_UPDATE: &str = cart_mutation!(
    "CartLinesUpdate($cartId: ID!, $lines: [CartLineUpdateInput!]!)",
    "cartLinesUpdate(cartId: $cartId, lines: $lines)"
);

pub const CART_LINES_REMOVE: &str = cart_mutation!(
    "CartLinesRemove($cartId: ID!, $lineIds: [ID!]!)",
    "cartLinesRemove(cartId: $cartId, lineIds: $lineIds)"
);

pub const CART_DISCOUNT_CODES_UPDATE: &str = cart_mutation!(
    "CartDiscountCodesUpdate($cartId: ID!, $discountCodes: [String!])",
    "cartDiscountCodesUpdate(cartId: $cartId, discountCodes: $discountCodes)"
);

// =============================================================================
// Response Types
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoneyNode {
    pub amount: String,
    pub currency_code: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageNode {
    pub url: String,
    pub alt_text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SelectedOptionNode {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfoNode {
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Nodes<T> {
    pub nodes: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<T> {
    pub nodes: Vec<T>,
    pub page_info: PageInfoNode,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantNode {
    pub id: String,
    pub title: String,
    pub available_for_sale: bool,
    pub price: MoneyNode,
    pub compare_at_price: Option<MoneyNode>,
    pub selected_options: Vec<SelectedOptionNode>,
    pub image: Option<ImageNode>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionNode {
    pub name: String,
    pub option_values: Vec<OptionValueNode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OptionValueNode {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductNode {
    pub id: String,
    pub handle: String,
    pub title: String,
    pub vendor: String,
    pub description_html: String,
    pub featured_image: Option<ImageNode>,
    pub images: Nodes<ImageNode>,
    pub options: Vec<OptionNode>,
    pub selected_variant: Option<VariantNode>,
    pub variants: Nodes<VariantNode>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRangeNode {
    pub min_variant_price: MoneyNode,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantOptionsNode {
    pub selected_options: Vec<SelectedOptionNode>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCardNode {
    pub id: String,
    pub handle: String,
    pub title: String,
    pub available_for_sale: bool,
    pub featured_image: Option<ImageNode>,
    pub price_range: PriceRangeNode,
    pub compare_at_price_range: Option<PriceRangeNode>,
    pub variants: Nodes<VariantOptionsNode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectionCardNode {
    pub id: String,
    pub handle: String,
    pub title: String,
    pub description: String,
    pub image: Option<ImageNode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectionNode {
    pub id: String,
    pub handle: String,
    pub title: String,
    pub description: String,
    pub image: Option<ImageNode>,
    pub products: Connection<ProductCardNode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MerchandiseProductNode {
    pub handle: String,
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchandiseNode {
    pub id: String,
    pub title: String,
    pub available_for_sale: bool,
    pub price: MoneyNode,
    pub selected_options: Vec<SelectedOptionNode>,
    pub image: Option<ImageNode>,
    pub product: MerchandiseProductNode,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineCostNode {
    pub total_amount: MoneyNode,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CartLineNode {
    pub id: String,
    pub quantity: i64,
    pub cost: CartLineCostNode,
    pub merchandise: MerchandiseNode,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartCostNode {
    pub subtotal_amount: MoneyNode,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiscountCodeNode {
    pub code: String,
    pub applicable: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartNode {
    pub id: String,
    pub checkout_url: String,
    pub total_quantity: i64,
    pub cost: CartCostNode,
    pub discount_codes: Vec<DiscountCodeNode>,
    pub lines: Nodes<CartLineNode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserErrorNode {
    #[serde(default)]
    pub field: Option<Vec<String>>,
    pub message: String,
    #[serde(default)]
    pub code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartPayload {
    pub cart: Option<CartNode>,
    #[serde(default)]
    pub user_errors: Vec<UserErrorNode>,
}

// Response roots

#[derive(Debug, Deserialize)]
pub struct ProductData {
    pub product: Option<ProductNode>,
}

#[derive(Debug, Deserialize)]
pub struct ProductVariantsNode {
    pub variants: Nodes<VariantNode>,
}

#[derive(Debug, Deserialize)]
pub struct ProductVariantsData {
    pub product: Option<ProductVariantsNode>,
}

#[derive(Debug, Deserialize)]
pub struct ProductsData {
    pub products: Connection<ProductCardNode>,
}

#[derive(Debug, Deserialize)]
pub struct CollectionData {
    pub collection: Option<CollectionNode>,
}

#[derive(Debug, Deserialize)]
pub struct CollectionsData {
    pub collections: Connection<CollectionCardNode>,
}

#[derive(Debug, Deserialize)]
pub struct CartData {
    pub cart: Option<CartNode>,
}

/// Every cart mutation aliases its root field to `payload`.
#[derive(Debug, Deserialize)]
pub struct CartMutationData {
    pub payload: Option<CartPayload>,
}
