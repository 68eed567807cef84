//! Product page controller.
//!
//! Owns the page's behavior: turning a route id into props, choosing
//! between the skeleton and the product view, and the add-to-bag guard.
//! Everything outside (the provider, the bag, toasts) comes in through
//! narrow traits.

use edge_sdk::edge_cache::{StaticPaths, StaticProps};
use thiserror::Error;
use turbo_commerce::cart::CartStore;
use turbo_commerce::catalog::{ProductRetriever, ProductViewModel, RetrievalError, RetrieveOptions};
use turbo_commerce::notify::Notifier;
use turbo_commerce::ProductId;

use crate::config::StorefrontConfig;
use crate::sections::{render_product, render_skeleton};

/// Toast shown when the product is already in the bag.
pub const ALREADY_IN_BAG_MESSAGE: &str = "Produto já na sacola";

/// Toast shown when the product was added.
pub const ADDED_TO_BAG_MESSAGE: &str = "Produto adicionado na sacola!";

/// Failure resolving a product's props.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolveError {
    /// The provider call failed; passed through untouched.
    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    /// The product has no usable default price (absent, not expanded, or
    /// without a fixed amount).
    #[error("Product {0} has no default price")]
    MissingDefaultPrice(ProductId),
}

/// What the page is showing.
#[derive(Debug, Clone, Copy)]
pub enum PageState<'a> {
    /// The path is being generated for the first time.
    Pending,
    /// The product is known.
    Resolved(&'a ProductViewModel),
}

/// Rendered page content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    /// Document title.
    pub title: String,
    /// Main content HTML.
    pub html: String,
}

/// Result of an add-to-bag action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddToCartOutcome {
    Added,
    AlreadyInBag,
}

impl AddToCartOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::AlreadyInBag => "already_in_bag",
        }
    }
}

/// Controller for `/product/{id}`.
pub struct ProductPageController<R: ProductRetriever> {
    retriever: R,
    config: StorefrontConfig,
}

impl<R: ProductRetriever> ProductPageController<R> {
    /// Create a controller over a retriever.
    pub fn new(retriever: R, config: StorefrontConfig) -> Self {
        Self { retriever, config }
    }

    /// Resolve the props for a product page.
    ///
    /// A missing (or empty) id is not found without contacting the
    /// provider. Provider failures are returned as-is.
    pub async fn resolve_product(
        &self,
        id: Option<&str>,
    ) -> Result<StaticProps<ProductViewModel>, ResolveError> {
        let Some(id) = id.filter(|id| !id.is_empty()) else {
            return Ok(StaticProps::NotFound);
        };

        let product = self
            .retriever
            .retrieve_product(&ProductId::new(id), &RetrieveOptions::with_default_price())
            .await?;

        let price = product
            .default_price()
            .and_then(|price| price.unit_amount.map(|amount| (amount, price.id.clone())));
        let Some((unit_amount, price_id)) = price else {
            return Err(ResolveError::MissingDefaultPrice(product.id));
        };

        Ok(StaticProps::Props {
            props: ProductViewModel {
                image_url: product.images.first().cloned(),
                description: product.description.unwrap_or_default(),
                id: product.id,
                name: product.name,
                price: unit_amount,
                price_id,
            },
            revalidate: self.config.revalidate,
        })
    }

    /// Paths generated ahead of time: none. Every product page is
    /// generated on its first request, behind the skeleton.
    pub fn list_known_paths(&self) -> StaticPaths {
        StaticPaths::lazy()
    }

    /// Render the page for a state.
    pub fn render(&self, state: &PageState<'_>) -> PageView {
        match state {
            PageState::Pending => PageView {
                title: self.config.store_name.clone(),
                html: render_skeleton(),
            },
            PageState::Resolved(product) => PageView {
                title: format!("{} | {}", product.name, self.config.store_name),
                html: render_product(product, &self.format_price(product)),
            },
        }
    }

    /// Display price: minor units over 100, formatted for the locale.
    pub fn format_price(&self, product: &ProductViewModel) -> String {
        product
            .price_in(self.config.currency)
            .format(self.config.locale)
    }

    /// Storefront configuration.
    pub fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    /// Access the retriever.
    pub fn retriever(&self) -> &R {
        &self.retriever
    }
}

/// Put a product in the bag unless it is already there.
///
/// The toast is always emitted before the bag is touched; a product
/// already in the bag is never added twice.
pub fn handle_add_to_cart<C, N>(
    product: &ProductViewModel,
    cart: &mut C,
    notifier: &mut N,
) -> AddToCartOutcome
where
    C: CartStore + ?Sized,
    N: Notifier + ?Sized,
{
    if cart.check_if_exists(&product.id) {
        notifier.info(ALREADY_IN_BAG_MESSAGE);
        return AddToCartOutcome::AlreadyInBag;
    }

    notifier.success(ADDED_TO_BAG_MESSAGE);
    cart.add(product.clone());
    AddToCartOutcome::Added
}
