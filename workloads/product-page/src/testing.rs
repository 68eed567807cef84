//! Test doubles shared by the workload's unit tests.

use std::cell::{Cell, RefCell};

use async_trait::async_trait;
use turbo_commerce::catalog::{
    Expandable, ProductRetriever, ProductViewModel, ProviderPrice, ProviderProduct,
    RetrievalError, RetrieveOptions,
};
use turbo_commerce::{PriceId, ProductId};

/// Retriever returning a canned result and counting calls.
pub struct FakeRetriever {
    result: Result<ProviderProduct, RetrievalError>,
    pub calls: Cell<usize>,
    pub last_options: RefCell<Option<RetrieveOptions>>,
}

impl FakeRetriever {
    pub fn returning(result: Result<ProviderProduct, RetrievalError>) -> Self {
        Self {
            result,
            calls: Cell::new(0),
            last_options: RefCell::new(None),
        }
    }
}

#[async_trait(?Send)]
impl ProductRetriever for FakeRetriever {
    async fn retrieve_product(
        &self,
        _id: &ProductId,
        options: &RetrieveOptions,
    ) -> Result<ProviderProduct, RetrievalError> {
        self.calls.set(self.calls.get() + 1);
        *self.last_options.borrow_mut() = Some(options.clone());
        self.result.clone()
    }
}

/// Expanded default price with the given amount.
pub fn expanded_price(unit_amount: Option<i64>) -> Option<Expandable<ProviderPrice>> {
    Some(Expandable::Object(Box::new(ProviderPrice {
        id: PriceId::new("price_1"),
        unit_amount,
        currency: Some("brl".to_string()),
    })))
}

/// The provider's record for the Camiseta product.
pub fn provider_camiseta(default_price: Option<Expandable<ProviderPrice>>) -> ProviderProduct {
    ProviderProduct {
        id: ProductId::new("p1"),
        name: "Camiseta".to_string(),
        description: Some("algodão".to_string()),
        images: vec![
            "https://x/img.png".to_string(),
            "https://x/other.png".to_string(),
        ],
        default_price,
    }
}

/// The Camiseta view model.
pub fn camiseta() -> ProductViewModel {
    ProductViewModel {
        id: ProductId::new("p1"),
        name: "Camiseta".to_string(),
        description: "algodão".to_string(),
        image_url: Some("https://x/img.png".to_string()),
        price: 9990,
        price_id: PriceId::new("price_1"),
    }
}
