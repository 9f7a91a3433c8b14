//! Replenishment.

use comerce_domain::catalog::InventoryLot;
use comerce_domain::{BusinessId, CommerceError, CommerceResult, LotId, ProductId};

use crate::loader::load_product;
use crate::service::FulfillmentService;

impl FulfillmentService {
    /// Receive a new lot of `quantity` units for a product of `business_id`.
    /// The lot is appended last, so older lots are consumed first.
    pub async fn receive_lot(
        &self,
        business_id: &BusinessId,
        product_id: &ProductId,
        quantity: u32,
    ) -> CommerceResult<InventoryLot> {
        if quantity == 0 {
            return Err(CommerceError::Validation("lot quantity must be at least 1".to_string()));
        }
        let lot = self
            .transact(|| self.store_lot(business_id, product_id, quantity))
            .await?;
        tracing::info!(product_id = %product_id, lot_id = %lot.id, quantity, "lot received");
        Ok(lot)
    }

    async fn store_lot(
        &self,
        business_id: &BusinessId,
        product_id: &ProductId,
        quantity: u32,
    ) -> CommerceResult<InventoryLot> {
        let mut session = self.store().start_session();
        let mut product = load_product(&mut session, product_id).await?;
        if &product.business_id != business_id {
            return Err(CommerceError::Unauthorized(format!(
                "{} is not sold by {}",
                product.item, business_id
            )));
        }

        let lot = InventoryLot::new(LotId::generate(), product_id.clone(), quantity);
        product.add_lot(lot.id.clone());
        session.insert(&lot)?;
        session.save(&product)?;
        session.commit().await?;
        Ok(lot)
    }
}
