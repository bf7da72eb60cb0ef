//! Shopify Storefront API client implementation.
//!
//! Posts GraphQL documents from [`queries`] with `reqwest` 0.13.
//! Caches products and collections using `moka` (5-minute TTL).

mod cache;
mod conversions;
pub mod queries;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use internal_war_core::CartId;
use internal_war_core::cart::CartSnapshot;
use internal_war_core::variant::{ProductVariant, Selection};

use crate::config::ShopifyStorefrontConfig;
use crate::shopify::types::{
    CartLineInput, CartLineUpdateInput, Collection, CollectionConnection, PageRequest, Product,
    ProductConnection,
};
use crate::shopify::{GraphQLError, ShopifyError};

use cache::{CacheKey, CacheValue};
use conversions::{
    convert_cart, convert_collection, convert_collection_connection, convert_product,
    convert_product_connection, convert_variants, format_user_errors,
};
use queries::{
    CART, CART_CREATE, CART_DISCOUNT_CODES_UPDATE, CART_LINES_ADD, CART_LINES_REMOVE,
    CART_LINES_UPDATE, COLLECTION_BY_HANDLE, COLLECTIONS, CartData, CartMutationData,
    CollectionData, CollectionsData, PRODUCT_BY_HANDLE, PRODUCT_VARIANTS, PRODUCTS, ProductData,
    ProductVariantsData, ProductsData,
};

/// Response envelope shared by every query.
#[derive(Debug, Deserialize)]
struct GraphQLResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQLError>,
}

fn truncated(body: &str, len: usize) -> String {
    body.chars().take(len).collect()
}

/// Decode a 2xx response body into its `data` root.
fn decode_response<T: DeserializeOwned>(body: &str) -> Result<T, ShopifyError> {
    let response: GraphQLResponse<T> = match serde_json::from_str(body) {
        Ok(r) => r,
        Err(e) => {
            tracing::error!(
                error = %e,
                body = %truncated(body, 500),
                "Failed to parse Shopify GraphQL response"
            );
            return Err(ShopifyError::Parse(e));
        }
    };

    if !response.errors.is_empty() {
        tracing::debug!(errors = ?response.errors, "GraphQL errors in response");
        return Err(ShopifyError::GraphQL(response.errors));
    }

    response.data.ok_or_else(|| {
        tracing::error!(
            body = %truncated(body, 500),
            "Shopify GraphQL response has no data and no errors"
        );
        ShopifyError::GraphQL(vec![GraphQLError::message("No data in response")])
    })
}

// =============================================================================
// StorefrontClient
// =============================================================================

/// Client for the Shopify Storefront API.
///
/// Products and collections are cached for 5 minutes.
#[derive(Clone)]
pub struct StorefrontClient {
    inner: Arc<StorefrontClientInner>,
}

struct StorefrontClientInner {
    client: reqwest::Client,
    endpoint: String,
    access_token: String,
    cache: Cache<CacheKey, CacheValue>,
}

impl StorefrontClient {
    /// Create a new Storefront API client.
    #[must_use]
    pub fn new(config: &ShopifyStorefrontConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self {
            inner: Arc::new(StorefrontClientInner {
                client: reqwest::Client::new(),
                endpoint: config.endpoint(),
                access_token: config.storefront_private_token.expose_secret().to_string(),
                cache,
            }),
        }
    }

    /// Execute a GraphQL document.
    async fn execute<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T, ShopifyError> {
        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            // Private access tokens use a different header than public tokens
            .header("Shopify-Storefront-Private-Token", &self.inner.access_token)
            .json(&serde_json::json!({ "query": query, "variables": variables }))
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ShopifyError::RateLimited(retry_after));
        }

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %truncated(&body, 500),
                "Shopify API returned non-success status"
            );
            return Err(ShopifyError::GraphQL(vec![GraphQLError::message(format!(
                "HTTP {status}: {}",
                truncated(&body, 200)
            ))]));
        }

        decode_response(&body)
    }

    /// Run a cart mutation and unwrap its `payload`.
    async fn mutate_cart(
        &self,
        query: &str,
        variables: serde_json::Value,
        operation: &str,
    ) -> Result<CartSnapshot, ShopifyError> {
        let data: CartMutationData = self.execute(query, variables).await?;

        if let Some(payload) = data.payload {
            if !payload.user_errors.is_empty() {
                return Err(ShopifyError::UserError(format_user_errors(
                    &payload.user_errors,
                )));
            }

            if let Some(cart) = payload.cart {
                return convert_cart(cart);
            }
        }

        Err(ShopifyError::GraphQL(vec![GraphQLError::message(format!(
            "{operation} returned no cart"
        ))]))
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Critical product data with the variant Shopify resolves for `selection`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no product has this handle, or an error if the
    /// API request fails.
    #[instrument(skip(self, selection), fields(handle = %handle))]
    pub async fn get_product(
        &self,
        handle: &str,
        selection: &Selection,
    ) -> Result<Product, ShopifyError> {
        let cache_key = CacheKey::Product {
            handle: handle.to_string(),
            selection: selection.clone(),
        };

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let data: ProductData = self
            .execute(
                PRODUCT_BY_HANDLE,
                serde_json::json!({ "handle": handle, "selectedOptions": selection }),
            )
            .await?;

        let product = data
            .product
            .ok_or_else(|| ShopifyError::NotFound(format!("Product not found: {handle}")))?;
        let product = convert_product(product)?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Every variant of a product (up to 250), in server order.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no product has this handle, or an error if the
    /// API request fails.
    #[instrument(skip(self), fields(handle = %handle))]
    pub async fn get_product_variants(
        &self,
        handle: &str,
    ) -> Result<Vec<ProductVariant>, ShopifyError> {
        let cache_key = CacheKey::Variants(handle.to_string());

        if let Some(CacheValue::Variants(variants)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for variants");
            return Ok(variants);
        }

        let data: ProductVariantsData = self
            .execute(PRODUCT_VARIANTS, serde_json::json!({ "handle": handle }))
            .await?;

        let product = data
            .product
            .ok_or_else(|| ShopifyError::NotFound(format!("Product not found: {handle}")))?;
        let variants = convert_variants(product.variants.nodes)?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Variants(variants.clone()))
            .await;

        Ok(variants)
    }

    /// A page of products, optionally filtered by a search query.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_products(
        &self,
        page: PageRequest,
        query: Option<String>,
    ) -> Result<ProductConnection, ShopifyError> {
        let cache_key = CacheKey::Products(page.clone());

        // Only unfiltered listings are cached
        if query.is_none()
            && let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await
        {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let mut variables = page.variables();
        if let Some(query) = &query {
            variables.insert("query".into(), query.clone().into());
        }

        let data: ProductsData = self
            .execute(PRODUCTS, serde_json::Value::Object(variables))
            .await?;
        let connection = convert_product_connection(data.products)?;

        if query.is_none() {
            self.inner
                .cache
                .insert(cache_key, CacheValue::Products(connection.clone()))
                .await;
        }

        Ok(connection)
    }

    // =========================================================================
    // Collection Methods
    // =========================================================================

    /// A collection with one page of its products.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no collection has this handle, or an error if
    /// the API request fails.
    #[instrument(skip(self), fields(handle = %handle))]
    pub async fn get_collection(
        &self,
        handle: &str,
        page: PageRequest,
    ) -> Result<Collection, ShopifyError> {
        let cache_key = CacheKey::Collection {
            handle: handle.to_string(),
            page: page.clone(),
        };

        if let Some(CacheValue::Collection(collection)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for collection");
            return Ok(*collection);
        }

        let mut variables = page.variables();
        variables.insert("handle".into(), handle.into());

        let data: CollectionData = self
            .execute(COLLECTION_BY_HANDLE, serde_json::Value::Object(variables))
            .await?;

        let collection = data
            .collection
            .ok_or_else(|| ShopifyError::NotFound(format!("Collection not found: {handle}")))?;
        let collection = convert_collection(collection)?;

        self.inner
            .cache
            .insert(
                cache_key,
                CacheValue::Collection(Box::new(collection.clone())),
            )
            .await;

        Ok(collection)
    }

    /// A page of collections.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_collections(
        &self,
        page: PageRequest,
    ) -> Result<CollectionConnection, ShopifyError> {
        let cache_key = CacheKey::Collections(page.clone());

        if let Some(CacheValue::Collections(collections)) = self.inner.cache.get(&cache_key).await
        {
            debug!("Cache hit for collections");
            return Ok(collections);
        }

        let data: CollectionsData = self
            .execute(COLLECTIONS, serde_json::Value::Object(page.variables()))
            .await?;
        let connection = convert_collection_connection(data.collections);

        self.inner
            .cache
            .insert(cache_key, CacheValue::Collections(connection.clone()))
            .await;

        Ok(connection)
    }

    // =========================================================================
    // Cart Methods (not cached - mutable state)
    // =========================================================================

    /// Fetch an existing cart.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the cart expired or never existed, or an error
    /// if the API request fails.
    #[instrument(skip(self), fields(cart_id = %cart_id))]
    pub async fn get_cart(&self, cart_id: &CartId) -> Result<CartSnapshot, ShopifyError> {
        let data: CartData = self
            .execute(CART, serde_json::json!({ "cartId": cart_id }))
            .await?;

        data.cart
            .map(convert_cart)
            .transpose()?
            .ok_or_else(|| ShopifyError::NotFound(format!("Cart not found: {cart_id}")))
    }

    /// Create a cart, optionally with initial lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart creation fails or user errors are returned.
    #[instrument(skip(self, lines))]
    pub async fn create_cart(
        &self,
        lines: Vec<CartLineInput>,
    ) -> Result<CartSnapshot, ShopifyError> {
        self.mutate_cart(
            CART_CREATE,
            serde_json::json!({ "lines": lines }),
            "cartCreate",
        )
        .await
    }

    /// Add lines to a cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart update fails or user errors are returned.
    #[instrument(skip(self, lines), fields(cart_id = %cart_id))]
    pub async fn add_lines(
        &self,
        cart_id: &CartId,
        lines: Vec<CartLineInput>,
    ) -> Result<CartSnapshot, ShopifyError> {
        self.mutate_cart(
            CART_LINES_ADD,
            serde_json::json!({ "cartId": cart_id, "lines": lines }),
            "cartLinesAdd",
        )
        .await
    }

    /// Set line quantities.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart update fails or user errors are returned.
    #[instrument(skip(self, lines), fields(cart_id = %cart_id))]
    pub async fn update_lines(
        &self,
        cart_id: &CartId,
        lines: Vec<CartLineUpdateInput>,
    ) -> Result<CartSnapshot, ShopifyError> {
        self.mutate_cart(
            CART_LINES_UPDATE,
            serde_json::json!({ "cartId": cart_id, "lines": lines }),
            "cartLinesUpdate",
        )
        .await
    }

    /// Remove lines from a cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart update fails or user errors are returned.
    #[instrument(skip(self, line_ids), fields(cart_id = %cart_id))]
    pub async fn remove_lines(
        &self,
        cart_id: &CartId,
        line_ids: Vec<internal_war_core::CartLineId>,
    ) -> Result<CartSnapshot, ShopifyError> {
        self.mutate_cart(
            CART_LINES_REMOVE,
            serde_json::json!({ "cartId": cart_id, "lineIds": line_ids }),
            "cartLinesRemove",
        )
        .await
    }

    /// Replace the discount codes on a cart. An empty list clears them.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart update fails or user errors are returned.
    #[instrument(skip(self, discount_codes), fields(cart_id = %cart_id))]
    pub async fn update_discount_codes(
        &self,
        cart_id: &CartId,
        discount_codes: Vec<String>,
    ) -> Result<CartSnapshot, ShopifyError> {
        self.mutate_cart(
            CART_DISCOUNT_CODES_UPDATE,
            serde_json::json!({ "cartId": cart_id, "discountCodes": discount_codes }),
            "cartDiscountCodesUpdate",
        )
        .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_response_data() {
        let data: CartData = decode_response(r#"{"data":{"cart":null}}"#).unwrap();
        assert!(data.cart.is_none());
    }

    #[test]
    fn test_decode_response_errors_win() {
        let result: Result<CartData, _> = decode_response(
            r#"{"data":null,"errors":[{"message":"Throttled","path":["cart"]}]}"#,
        );
        match result {
            Err(ShopifyError::GraphQL(errors)) => assert_eq!(errors[0].message, "Throttled"),
            other => panic!("expected GraphQL error, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_response_without_data() {
        let result: Result<CartData, _> = decode_response("{}");
        assert!(
            matches!(result, Err(ShopifyError::GraphQL(ref e)) if e[0].message == "No data in response")
        );
    }

    #[test]
    fn test_decode_response_bad_json() {
        let result: Result<CartData, _> = decode_response("<html>");
        assert!(matches!(result, Err(ShopifyError::Parse(_))));
    }

    #[test]
    fn test_selection_serializes_as_selected_options() {
        let selection = Selection::new().with("Size", "M");
        assert_eq!(
            serde_json::json!({ "selectedOptions": selection }),
            serde_json::json!({ "selectedOptions": [{"name": "Size", "value": "M"}] })
        );
    }
}
