//! Collection type conversion functions.

use crate::shopify::ShopifyError;
use crate::shopify::types::{Collection, CollectionConnection, CollectionSummary};

use super::super::queries::{CollectionCardNode, CollectionNode, Connection};
use super::products::{convert_image, convert_page_info, convert_product_connection};

pub fn convert_collection(collection: CollectionNode) -> Result<Collection, ShopifyError> {
    Ok(Collection {
        id: collection.id,
        handle: collection.handle,
        title: collection.title,
        description: collection.description,
        image: collection.image.map(convert_image),
        products: convert_product_connection(collection.products)?,
    })
}

pub fn convert_collection_connection(
    connection: Connection<CollectionCardNode>,
) -> CollectionConnection {
    CollectionConnection {
        collections: connection
            .nodes
            .into_iter()
            .map(|c| CollectionSummary {
                id: c.id,
                handle: c.handle,
                title: c.title,
                description: c.description,
                image: c.image.map(convert_image),
            })
            .collect(),
        page_info: convert_page_info(connection.page_info),
    }
}
