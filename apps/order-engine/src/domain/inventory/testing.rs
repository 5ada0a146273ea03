//! In-memory ledger for unit tests.

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;

use super::{InventoryError, InventoryLedger, ReserveOutcome};
use crate::domain::shared::{Money, ProductId, Quantity, StockLevel};

#[derive(Debug, Default)]
pub(crate) struct FakeLedger {
    products: HashMap<String, (Money, i64)>,
    calls: Vec<String>,
}

impl FakeLedger {
    pub(crate) fn with_product(mut self, id: &str, price: Decimal, stock: i64) -> Self {
        self.products
            .insert(id.to_string(), (Money::new(price), stock));
        self
    }

    pub(crate) fn stock(&self, id: &str) -> i64 {
        self.products.get(id).map_or(-1, |(_, s)| *s)
    }

    pub(crate) fn set_price(&mut self, id: &str, price: Decimal) {
        if let Some(entry) = self.products.get_mut(id) {
            entry.0 = Money::new(price);
        }
    }

    pub(crate) fn calls(&self) -> Vec<&str> {
        self.calls.iter().map(String::as_str).collect()
    }
}

#[async_trait]
impl InventoryLedger for FakeLedger {
    async fn try_reserve(
        &mut self,
        product_id: &ProductId,
        quantity: Quantity,
    ) -> Result<ReserveOutcome, InventoryError> {
        self.calls.push(format!("reserve:{product_id}"));
        let Some((_, stock)) = self.products.get_mut(product_id.as_str()) else {
            return Ok(ReserveOutcome::UnknownProduct);
        };
        if *stock < quantity.as_i64() {
            return Ok(ReserveOutcome::Insufficient {
                available: StockLevel::new(*stock).unwrap(),
            });
        }
        *stock -= quantity.as_i64();
        Ok(ReserveOutcome::Reserved)
    }

    async fn current_price(
        &mut self,
        product_id: &ProductId,
    ) -> Result<Option<Money>, InventoryError> {
        self.calls.push(format!("price:{product_id}"));
        Ok(self.products.get(product_id.as_str()).map(|(p, _)| *p))
    }

    async fn restock(
        &mut self,
        product_id: &ProductId,
        quantity: Quantity,
    ) -> Result<(), InventoryError> {
        self.calls.push(format!("restock:{product_id}"));
        if let Some((_, stock)) = self.products.get_mut(product_id.as_str()) {
            *stock += quantity.as_i64();
        }
        Ok(())
    }
}
