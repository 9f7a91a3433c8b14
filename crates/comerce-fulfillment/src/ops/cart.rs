//! Cart entries.

use comerce_domain::cart::CartEntry;
use comerce_domain::{CartEntryId, CommerceResult, CustomerId, Money, ProductId};
use serde::{Deserialize, Serialize};

use crate::loader::{read_product, read_stock, require_customer};
use crate::service::FulfillmentService;

/// A cart entry joined with its product, as listed to the customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: ProductId,
    pub item: String,
    pub retail_price: Money,
    pub image_address: Option<String>,
    pub quantity: u32,
}

/// One entry per (customer, product) pair.
fn entry_id(customer_id: &CustomerId, product_id: &ProductId) -> CartEntryId {
    CartEntryId::new(format!("{}:{}", customer_id, product_id))
}

impl FulfillmentService {
    /// Put one unit of `product_id` in the customer's cart.
    pub async fn add_to_cart(
        &self,
        customer_id: &CustomerId,
        product_id: &ProductId,
    ) -> CommerceResult<CartEntry> {
        require_customer(self.store(), customer_id).await?;
        read_product(self.store(), product_id).await?;
        let id = entry_id(customer_id, product_id);

        let entry = self
            .transact(|| self.put_in_cart(&id, customer_id, product_id))
            .await?;

        tracing::debug!(customer_id = %customer_id, product_id = %product_id, quantity = entry.quantity, "cart updated");
        Ok(entry)
    }

    async fn put_in_cart(
        &self,
        id: &CartEntryId,
        customer_id: &CustomerId,
        product_id: &ProductId,
    ) -> CommerceResult<CartEntry> {
        let mut session = self.store().start_session();
        let entry = match session.find_by_id::<CartEntry>(id.as_str()).await? {
            Some(mut entry) => {
                entry.increment();
                session.save(&entry)?;
                entry
            }
            None => {
                let mut entry = CartEntry::new(customer_id.clone(), product_id.clone());
                entry.id = id.clone();
                session.insert(&entry)?;
                entry
            }
        };
        session.commit().await?;
        Ok(entry)
    }

    /// Total units across the customer's cart.
    pub async fn cart_item_count(&self, customer_id: &CustomerId) -> CommerceResult<u64> {
        let entries = self
            .store()
            .find::<CartEntry, _>(|e| &e.customer_id == customer_id)
            .await?;
        Ok(entries.iter().map(|e| u64::from(e.quantity)).sum())
    }

    /// The customer's cart, most recently added first. Entries whose product
    /// has nothing on hand are left out.
    pub async fn cart_entries(&self, customer_id: &CustomerId) -> CommerceResult<Vec<CartItem>> {
        require_customer(self.store(), customer_id).await?;
        let mut entries = self
            .store()
            .find::<CartEntry, _>(|e| &e.customer_id == customer_id)
            .await?;
        entries.sort_by(|a, b| b.date_added.cmp(&a.date_added));

        let mut items = Vec::with_capacity(entries.len());
        for entry in entries {
            let stock = read_stock(self.store(), &entry.product_id).await?;
            if !stock.is_available() {
                tracing::debug!(product_id = %entry.product_id, "out of stock, hidden from cart");
                continue;
            }
            items.push(CartItem {
                product_id: entry.product_id,
                item: stock.product.item,
                retail_price: stock.product.retail_price,
                image_address: stock.product.image_address,
                quantity: entry.quantity,
            });
        }
        Ok(items)
    }
}
