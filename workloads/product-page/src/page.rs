//! Serving `/product/{id}` from generated props.
//!
//! A request is answered in two steps. `prepare` consults the props store
//! and decides the status line and headers before anything is written;
//! `deliver` streams the document. A stale page is served as-is and
//! regenerated by `revalidate` once the response body has been closed.

use std::fmt::Display;
use std::time::Instant;

use edge_sdk::edge_cache::{
    header_names, unix_now, CacheHeadersBuilder, CacheKey, CacheStatus, FallbackMode, Lookup,
    PropsStore, RouteCachePolicy, StaticGeneration, StaticPaths, VaryRule,
};
use edge_sdk::edge_core::{RequestId, WorkloadError};
use edge_sdk::edge_observability::StructuredLogger;
use edge_sdk::edge_streaming::{HeadContent, Shell, StreamingSink};
use futures::Sink;
use turbo_commerce::catalog::{ProductRetriever, ProductViewModel, RetrievalError};

use crate::controller::{handle_add_to_cart, PageState, ProductPageController, ResolveError};
use crate::sections::{
    render_header, render_not_found, render_skeleton_dismissal, render_title_update,
    render_toasts, render_unavailable, PAGE_STYLES,
};
use crate::shopper::{ShopperSession, ShopperView, SESSION_COOKIE};

/// Route name used in props keys.
pub const PAGE_ROUTE: &str = "product";

const HTML: &str = "text/html; charset=utf-8";
const TEXT: &str = "text/plain; charset=utf-8";

/// Status line and headers of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHead {
    pub status: u16,
    pub headers: Vec<(String, String)>,
}

impl ResponseHead {
    fn new(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
        }
    }

    fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    fn extend(mut self, headers: Vec<(String, String)>) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Add a header to an already built head.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.push((name.into(), value.into()));
    }

    /// Header value by case-insensitive name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// What the body of a page response will contain.
#[derive(Debug, Clone, PartialEq)]
pub enum BodyPlan {
    /// Props are at hand. `revalidate` asks for a regeneration after the
    /// response is sent.
    Ready {
        product: ProductViewModel,
        revalidate: bool,
    },
    /// First request for this path: stream the skeleton, then generate.
    Fallback { id: String },
    NotFound,
    Unavailable,
}

/// A page response whose head can be sent before its body.
#[derive(Debug, Clone, PartialEq)]
pub struct PageResponse {
    pub head: ResponseHead,
    pub body: BodyPlan,
}

/// A non-streamed response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleResponse {
    pub head: ResponseHead,
    pub body: String,
}

/// Regeneration owed after a stale page was served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revalidation {
    pub id: String,
}

/// Per-request inputs to `prepare`.
#[derive(Debug, Clone, Copy)]
pub struct PageRequest<'a> {
    /// Route id, already percent-decoded.
    pub id: Option<&'a str>,
    pub request_id: &'a RequestId,
    pub shopper: &'a ShopperView,
    /// Emit cache key and tag headers.
    pub debug_cache: bool,
}

/// The product page over a retriever and a props store.
pub struct ProductPage<R: ProductRetriever, S: PropsStore> {
    controller: ProductPageController<R>,
    generation: StaticGeneration<S>,
    paths: StaticPaths,
}

impl<R: ProductRetriever, S: PropsStore> ProductPage<R, S> {
    pub fn new(controller: ProductPageController<R>, store: S) -> Self {
        let paths = controller.list_known_paths();
        Self {
            controller,
            generation: StaticGeneration::new(store),
            paths,
        }
    }

    /// Override the paths known ahead of time.
    pub fn with_paths(mut self, paths: StaticPaths) -> Self {
        self.paths = paths;
        self
    }

    pub fn controller(&self) -> &ProductPageController<R> {
        &self.controller
    }

    pub fn generation(&self) -> &StaticGeneration<S> {
        &self.generation
    }

    /// Decide the response head and what the body will hold.
    ///
    /// Only a blocking fallback talks to the provider here; everything
    /// else is answered from the store.
    pub async fn prepare(
        &self,
        request: &PageRequest<'_>,
        logger: &StructuredLogger,
    ) -> PageResponse {
        let Some(id) = request.id.filter(|id| !id.is_empty()) else {
            logger.info("No product id in path");
            return self.not_found(request, None);
        };

        let key = CacheKey::page(PAGE_ROUTE, id);
        let now = unix_now();
        let lookup = self.load(&key, now, logger);
        logger
            .debug_builder("Generated props lookup")
            .field("product_id", id)
            .field("cache_status", lookup.status().to_string())
            .emit();

        let (status, entry) = match lookup {
            Lookup::Fresh(entry) => (CacheStatus::Hit, entry),
            Lookup::Stale(entry) => (CacheStatus::Stale, entry),
            Lookup::Missing => return self.prepare_missing(request, id, &key, logger).await,
        };

        let policy = self.page_policy(id, request.shopper);
        let head = self.page_head(request, 200, &policy, status, Some(&key), Some(entry.age(now)));
        PageResponse {
            head,
            body: BodyPlan::Ready {
                product: entry.props,
                revalidate: status == CacheStatus::Stale,
            },
        }
    }

    async fn prepare_missing(
        &self,
        request: &PageRequest<'_>,
        id: &str,
        key: &CacheKey,
        logger: &StructuredLogger,
    ) -> PageResponse {
        let mode = if self.paths.is_known(id) {
            FallbackMode::Blocking
        } else {
            self.paths.fallback
        };

        match mode {
            FallbackMode::Pending => {
                let head = self.page_head(
                    request,
                    200,
                    &RouteCachePolicy::none(),
                    CacheStatus::Miss,
                    Some(key),
                    None,
                );
                PageResponse {
                    head,
                    body: BodyPlan::Fallback { id: id.to_string() },
                }
            }
            FallbackMode::Blocking => match self.resolve_and_record(id, logger).await {
                Ok(Some(product)) => {
                    let policy = self.page_policy(id, request.shopper);
                    let head =
                        self.page_head(request, 200, &policy, CacheStatus::Miss, Some(key), Some(0));
                    PageResponse {
                        head,
                        body: BodyPlan::Ready {
                            product,
                            revalidate: false,
                        },
                    }
                }
                Ok(None) => self.not_found(request, Some(key)),
                Err(error) if is_not_found(&error) => self.not_found(request, Some(key)),
                Err(_) => {
                    let head = self.page_head(
                        request,
                        502,
                        &RouteCachePolicy::none(),
                        CacheStatus::Miss,
                        Some(key),
                        None,
                    );
                    PageResponse {
                        head,
                        body: BodyPlan::Unavailable,
                    }
                }
            },
            FallbackMode::NotFound => self.not_found(request, Some(key)),
        }
    }

    /// Stream the document for a prepared body.
    ///
    /// Returns the regeneration to run once the sink has been closed.
    pub async fn deliver<Sk, E>(
        &self,
        body: BodyPlan,
        shopper: &ShopperView,
        sink: &mut StreamingSink<Sk, E>,
        logger: &StructuredLogger,
    ) -> Result<Option<Revalidation>, WorkloadError>
    where
        Sk: Sink<Vec<u8>, Error = E> + Unpin,
        E: Display,
    {
        match body {
            BodyPlan::Ready {
                product,
                revalidate,
            } => {
                let view = self.controller.render(&PageState::Resolved(&product));
                let shell = self.shell(&view.title, shopper);
                sink.send_shell(&shell.render_opening()).await?;
                sink.send_section("product", &view.html).await?;
                sink.finish(&shell.render_closing()).await?;

                Ok(revalidate.then(|| Revalidation {
                    id: product.id.into_inner(),
                }))
            }
            BodyPlan::Fallback { id } => {
                let pending = self.controller.render(&PageState::Pending);
                let shell = self.shell(&pending.title, shopper);
                sink.send_shell(&shell.render_opening()).await?;
                sink.send_section("skeleton", &pending.html).await?;

                let (name, html) = match self.resolve_and_record(&id, logger).await {
                    Ok(Some(product)) => {
                        let view = self.controller.render(&PageState::Resolved(&product));
                        ("product", format!("{}{}", render_title_update(&view.title), view.html))
                    }
                    Ok(None) => ("not-found", render_not_found()),
                    Err(error) if is_not_found(&error) => ("not-found", render_not_found()),
                    Err(_) => ("error", render_unavailable()),
                };
                let html = format!("{}{}", render_skeleton_dismissal(), html);
                sink.send_section(name, &html).await?;
                sink.finish(&shell.render_closing()).await?;
                Ok(None)
            }
            BodyPlan::NotFound => {
                self.deliver_status("not-found", &render_not_found(), shopper, sink)
                    .await?;
                Ok(None)
            }
            BodyPlan::Unavailable => {
                self.deliver_status("error", &render_unavailable(), shopper, sink)
                    .await?;
                Ok(None)
            }
        }
    }

    async fn deliver_status<Sk, E>(
        &self,
        name: &str,
        html: &str,
        shopper: &ShopperView,
        sink: &mut StreamingSink<Sk, E>,
    ) -> Result<(), WorkloadError>
    where
        Sk: Sink<Vec<u8>, Error = E> + Unpin,
        E: Display,
    {
        let shell = self.shell(&self.controller.config().store_name, shopper);
        sink.send_shell(&shell.render_opening()).await?;
        sink.send_section(name, html).await?;
        sink.finish(&shell.render_closing()).await
    }

    /// Regenerate a stale page. A failure keeps the stale props.
    pub async fn revalidate(&self, revalidation: Revalidation, logger: &StructuredLogger) {
        match self.resolve_and_record(&revalidation.id, logger).await {
            Ok(_) => logger
                .info_builder("Page revalidated")
                .field("product_id", revalidation.id)
                .emit(),
            Err(_) => logger
                .warn_builder("Revalidation failed, keeping stale page")
                .field("product_id", revalidation.id)
                .emit(),
        }
    }

    /// Add the product to the shopper's bag and redirect back to its page.
    ///
    /// The toast is flashed into the session and shown on the next view.
    pub async fn add_to_bag(
        &self,
        id: Option<&str>,
        request_id: &RequestId,
        shopper: &mut ShopperSession,
        logger: &StructuredLogger,
    ) -> SimpleResponse {
        let Some(id) = id.filter(|id| !id.is_empty()) else {
            return simple_response(404, "Product not found", request_id);
        };

        let key = CacheKey::page(PAGE_ROUTE, id);
        let product = match self.load(&key, unix_now(), logger).into_generated() {
            Some(entry) => entry.props,
            None => match self.resolve_and_record(id, logger).await {
                Ok(Some(product)) => product,
                Ok(None) => return simple_response(404, "Product not found", request_id),
                Err(error) if is_not_found(&error) => {
                    return simple_response(404, "Product not found", request_id)
                }
                Err(_) => return simple_response(502, "Product could not be loaded", request_id),
            },
        };

        let outcome = handle_add_to_cart(&product, &mut shopper.bag, &mut shopper.flash);
        let config = self.controller.config();
        let entry = logger
            .info_builder("Add to bag")
            .field("product_id", id)
            .field("outcome", outcome.as_str())
            .field_u64("bag_count", u64::from(shopper.bag.count()));
        match shopper.bag.total(config.currency) {
            Ok(total) => entry.field("bag_total", total.format(config.locale)).emit(),
            Err(e) => entry.field("bag_total_error", e.to_string()).emit(),
        }

        SimpleResponse {
            head: ResponseHead::new(303)
                .header("location", product_path(&product))
                .header(
                    "cache-control",
                    RouteCachePolicy::private_no_store().cache_control_header(),
                )
                .header(header_names::X_REQUEST_ID, request_id.to_string()),
            body: String::new(),
        }
    }

    /// Resolve props from the provider and record the outcome.
    async fn resolve_and_record(
        &self,
        id: &str,
        logger: &StructuredLogger,
    ) -> Result<Option<ProductViewModel>, ResolveError> {
        let started = Instant::now();
        let outcome = match self.controller.resolve_product(Some(id)).await {
            Ok(outcome) => outcome,
            Err(e) => {
                logger
                    .error_builder("Product resolution failed")
                    .field("product_id", id)
                    .field("error", e.to_string())
                    .duration_ms("elapsed_ms", started.elapsed())
                    .emit();
                return Err(e);
            }
        };

        let key = CacheKey::page(PAGE_ROUTE, id);
        if let Err(e) = self.generation.record(&key, &outcome, unix_now()) {
            logger
                .warn_builder("Failed to store generated props")
                .field("key", key.as_str())
                .field("error", e.to_string())
                .emit();
        }

        logger
            .info_builder("Product resolved")
            .field("product_id", id)
            .field_bool("found", !outcome.is_not_found())
            .duration_ms("elapsed_ms", started.elapsed())
            .emit();

        Ok(outcome.into_props())
    }

    /// Look up generated props; an unreadable store counts as a miss.
    fn load(&self, key: &CacheKey, now: u64, logger: &StructuredLogger) -> Lookup<ProductViewModel> {
        self.generation.lookup(key, now).unwrap_or_else(|e| {
            logger
                .warn_builder("Props lookup failed, regenerating")
                .field("key", key.as_str())
                .field("error", e.to_string())
                .emit();
            Lookup::Missing
        })
    }

    /// Anonymous pages are shared, but never with a shopper who has a session.
    fn page_policy(&self, id: &str, shopper: &ShopperView) -> RouteCachePolicy {
        if shopper.is_personalized() {
            return RouteCachePolicy::private_no_store();
        }
        RouteCachePolicy::revalidate(self.controller.config().revalidate)
            .vary_on(VaryRule::cookie(SESSION_COOKIE))
            .with_tag(PAGE_ROUTE)
            .with_tag(format!("{}:{}", PAGE_ROUTE, id))
    }

    fn page_head(
        &self,
        request: &PageRequest<'_>,
        status: u16,
        policy: &RouteCachePolicy,
        cache_status: CacheStatus,
        key: Option<&CacheKey>,
        age: Option<u64>,
    ) -> ResponseHead {
        let mut cache = CacheHeadersBuilder::new()
            .from_policy(policy)
            .status(cache_status)
            .include_debug(request.debug_cache);
        if let Some(key) = key {
            cache = cache.key(key);
        }
        if let Some(age) = age {
            cache = cache.age(age);
        }

        ResponseHead::new(status)
            .header("content-type", HTML)
            .header(header_names::X_REQUEST_ID, request.request_id.to_string())
            .extend(cache.build())
    }

    fn not_found(&self, request: &PageRequest<'_>, key: Option<&CacheKey>) -> PageResponse {
        PageResponse {
            head: self.page_head(
                request,
                404,
                &RouteCachePolicy::none(),
                CacheStatus::Bypass,
                key,
                None,
            ),
            body: BodyPlan::NotFound,
        }
    }

    fn shell(&self, title: &str, shopper: &ShopperView) -> Shell {
        let config = self.controller.config();
        Shell::new(
            HeadContent::new(title)
                .with_meta("viewport", "width=device-width, initial-scale=1")
                .with_style(PAGE_STYLES),
        )
        .with_lang(config.locale.tag())
        .with_body_start(format!(
            "<body>\n{}{}<main class=\"page\">\n",
            render_header(&config.store_name, shopper.bag_count),
            render_toasts(&shopper.toasts)
        ))
        .with_body_end("\n</main>\n</body>\n</html>")
    }
}

/// Plain-text response for requests that never reach the page.
pub fn simple_response(status: u16, message: &str, request_id: &RequestId) -> SimpleResponse {
    SimpleResponse {
        head: ResponseHead::new(status)
            .header("content-type", TEXT)
            .header("cache-control", RouteCachePolicy::none().cache_control_header())
            .header(header_names::X_REQUEST_ID, request_id.to_string()),
        body: format!("{}\n", message),
    }
}

fn product_path(product: &ProductViewModel) -> String {
    format!(
        "/{}/{}",
        PAGE_ROUTE,
        edge_sdk::edge_data::encode_component(product.id.as_str())
    )
}

fn is_not_found(error: &ResolveError) -> bool {
    matches!(error, ResolveError::Retrieval(RetrievalError::NotFound(_)))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use edge_sdk::edge_cache::{InMemoryPropsStore, StaticProps};
    use edge_sdk::edge_core::TimingContext;
    use edge_sdk::edge_observability::LogLevel;
    use futures::channel::mpsc;
    use futures::StreamExt;
    use turbo_commerce::cart::CartStore;
    use turbo_commerce::notify::{Notifier, ToastKind};

    use super::*;
    use crate::config::StorefrontConfig;
    use crate::controller::{ADDED_TO_BAG_MESSAGE, ALREADY_IN_BAG_MESSAGE};
    use crate::testing::{camiseta, expanded_price, provider_camiseta, FakeRetriever};

    type Page = ProductPage<FakeRetriever, InMemoryPropsStore>;

    fn page(result: Result<turbo_commerce::catalog::ProviderProduct, RetrievalError>) -> Page {
        let controller = ProductPageController::new(
            FakeRetriever::returning(result),
            StorefrontConfig::new("sk_test"),
        );
        ProductPage::new(controller, InMemoryPropsStore::new())
    }

    fn camiseta_page() -> Page {
        page(Ok(provider_camiseta(expanded_price(Some(9990)))))
    }

    fn logger() -> StructuredLogger {
        StructuredLogger::new(RequestId::from_string("req-test")).with_min_level(LogLevel::Error)
    }

    fn request<'a>(
        id: Option<&'a str>,
        request_id: &'a RequestId,
        shopper: &'a ShopperView,
    ) -> PageRequest<'a> {
        PageRequest {
            id,
            request_id,
            shopper,
            debug_cache: false,
        }
    }

    fn calls(page: &Page) -> usize {
        page.controller().retriever().calls.get()
    }

    /// Deliver a body into a channel; returns the document and section names.
    async fn deliver(
        page: &Page,
        body: BodyPlan,
        shopper: &ShopperView,
    ) -> (String, Vec<String>, Option<Revalidation>) {
        let (tx, rx) = mpsc::unbounded::<Vec<u8>>();
        let mut sink = StreamingSink::new(tx, TimingContext::new());
        let revalidation = page
            .deliver(body, shopper, &mut sink, &logger())
            .await
            .unwrap();
        let sections = sink.sections_sent().to_vec();
        drop(sink);

        let chunks: Vec<Vec<u8>> = rx.collect().await;
        let html = String::from_utf8(chunks.concat()).unwrap();
        (html, sections, revalidation)
    }

    fn record_stale(page: &Page, product: &ProductViewModel) {
        let outcome = StaticProps::Props {
            props: product.clone(),
            revalidate: Duration::from_secs(3600),
        };
        page.generation()
            .record(&CacheKey::page(PAGE_ROUTE, "p1"), &outcome, unix_now() - 4000)
            .unwrap();
    }

    #[tokio::test]
    async fn test_first_request_streams_skeleton_then_product() {
        let page = camiseta_page();
        let rid = RequestId::from_string("req-1");
        let shopper = ShopperView::default();

        let response = page.prepare(&request(Some("p1"), &rid, &shopper), &logger()).await;
        assert_eq!(response.head.status, 200);
        assert_eq!(response.head.get("cache-control"), Some("no-store"));
        assert_eq!(response.head.get("x-cache-status"), Some("MISS"));
        assert_eq!(response.head.get("x-request-id"), Some("req-1"));
        assert_eq!(response.body, BodyPlan::Fallback { id: "p1".to_string() });
        assert_eq!(calls(&page), 0);

        let (html, sections, revalidation) = deliver(&page, response.body, &shopper).await;
        assert_eq!(sections, vec!["skeleton", "product"]);
        assert!(revalidation.is_none());
        assert!(html.starts_with("<!DOCTYPE html>\n<html lang=\"pt-BR\">"));
        assert!(html.contains("<title>Ignite Shop</title>"));
        assert!(html.contains(r#"document.title = "Camiseta | Ignite Shop";"#));

        let skeleton = html.find("product-skeleton").unwrap();
        let dismissal = html.find("#product-skeleton { display: none; }").unwrap();
        let price = html.find("R$ 99,90").unwrap();
        assert!(skeleton < dismissal && dismissal < price);
        assert!(html.ends_with("</html>"));
        assert_eq!(calls(&page), 1);
    }

    #[tokio::test]
    async fn test_generated_page_is_served_fresh() {
        let page = camiseta_page();
        let rid = RequestId::generate();
        let shopper = ShopperView::default();

        let first = page.prepare(&request(Some("p1"), &rid, &shopper), &logger()).await;
        deliver(&page, first.body, &shopper).await;

        let second = page.prepare(&request(Some("p1"), &rid, &shopper), &logger()).await;
        assert_eq!(second.head.status, 200);
        assert_eq!(second.head.get("x-cache-status"), Some("HIT"));
        assert_eq!(
            second.head.get("cache-control"),
            Some("public, s-maxage=3600, stale-while-revalidate")
        );
        assert_eq!(second.head.get("vary"), Some("Cookie"));
        assert!(second.head.get("age").is_some());
        assert_eq!(
            second.body,
            BodyPlan::Ready {
                product: camiseta(),
                revalidate: false
            }
        );

        let (html, sections, _) = deliver(&page, second.body, &shopper).await;
        assert_eq!(sections, vec!["product"]);
        assert!(html.contains("<title>Camiseta | Ignite Shop</title>"));
        assert!(!html.contains("product-skeleton"));
        assert_eq!(calls(&page), 1);
    }

    #[tokio::test]
    async fn test_stale_page_served_then_regenerated() {
        let page = camiseta_page();
        let mut old = camiseta();
        old.name = "Camiseta antiga".to_string();
        record_stale(&page, &old);

        let rid = RequestId::generate();
        let shopper = ShopperView::default();
        let response = page.prepare(&request(Some("p1"), &rid, &shopper), &logger()).await;
        assert_eq!(response.head.get("x-cache-status"), Some("STALE"));
        assert_eq!(calls(&page), 0);

        let (html, _, revalidation) = deliver(&page, response.body, &shopper).await;
        assert!(html.contains("Camiseta antiga"));
        let revalidation = revalidation.unwrap();
        assert_eq!(revalidation.id, "p1");

        page.revalidate(revalidation, &logger()).await;
        assert_eq!(calls(&page), 1);

        let key = CacheKey::page(PAGE_ROUTE, "p1");
        match page.generation().lookup::<ProductViewModel>(&key, unix_now()).unwrap() {
            Lookup::Fresh(entry) => assert_eq!(entry.props, camiseta()),
            other => panic!("expected fresh props, got {:?}", other.status()),
        }
    }

    #[tokio::test]
    async fn test_failed_revalidation_keeps_stale_props() {
        let page = page(Err(RetrievalError::Network("timeout".to_string())));
        record_stale(&page, &camiseta());

        page.revalidate(Revalidation { id: "p1".to_string() }, &logger())
            .await;

        let key = CacheKey::page(PAGE_ROUTE, "p1");
        match page.generation().lookup::<ProductViewModel>(&key, unix_now()).unwrap() {
            Lookup::Stale(entry) => assert_eq!(entry.props, camiseta()),
            other => panic!("expected stale props, got {:?}", other.status()),
        }
    }

    #[tokio::test]
    async fn test_ids_differing_in_separator_do_not_share_props() {
        let page = camiseta_page().with_paths(StaticPaths {
            paths: Vec::new(),
            fallback: FallbackMode::Pending,
        });
        let mut other = camiseta();
        other.id = turbo_commerce::ProductId::new("a_b");
        other.name = "Produto A_B".to_string();
        let outcome = StaticProps::Props {
            props: other,
            revalidate: Duration::from_secs(3600),
        };
        page.generation()
            .record(&CacheKey::page(PAGE_ROUTE, "a_b"), &outcome, unix_now())
            .unwrap();

        let rid = RequestId::generate();
        let shopper = ShopperView::default();
        let response = page.prepare(&request(Some("a:b"), &rid, &shopper), &logger()).await;
        assert_eq!(response.head.get("x-cache-status"), Some("MISS"));
        assert_eq!(response.body, BodyPlan::Fallback { id: "a:b".to_string() });

        let mut session = ShopperSession::default();
        page.add_to_bag(Some("a:b"), &rid, &mut session, &logger()).await;
        assert!(!session.bag.check_if_exists(&turbo_commerce::ProductId::new("a_b")));
    }

    #[tokio::test]
    async fn test_missing_id_is_not_found() {
        let page = camiseta_page();
        let rid = RequestId::generate();
        let shopper = ShopperView::default();

        for id in [None, Some("")] {
            let response = page.prepare(&request(id, &rid, &shopper), &logger()).await;
            assert_eq!(response.head.status, 404);
            assert_eq!(response.body, BodyPlan::NotFound);
        }
        assert_eq!(calls(&page), 0);
    }

    #[tokio::test]
    async fn test_fallback_failures_render_status_sections() {
        let shopper = ShopperView::default();

        let missing = page(Err(RetrievalError::NotFound("p1".to_string())));
        let (html, sections, _) =
            deliver(&missing, BodyPlan::Fallback { id: "p1".to_string() }, &shopper).await;
        assert_eq!(sections, vec!["skeleton", "not-found"]);
        assert!(html.contains("Produto não encontrado."));

        let broken = page(Err(RetrievalError::Unauthorized));
        let (html, sections, _) =
            deliver(&broken, BodyPlan::Fallback { id: "p1".to_string() }, &shopper).await;
        assert_eq!(sections, vec!["skeleton", "error"]);
        assert!(html.contains("#product-skeleton { display: none; }"));
        assert!(html.contains(r#"data-section="error""#));
    }

    #[tokio::test]
    async fn test_blocking_fallback_maps_failures_to_status() {
        let blocking = StaticPaths {
            paths: Vec::new(),
            fallback: FallbackMode::Blocking,
        };
        let rid = RequestId::generate();
        let shopper = ShopperView::default();
        let req = request(Some("p1"), &rid, &shopper);

        let ok = camiseta_page().with_paths(blocking.clone());
        let response = ok.prepare(&req, &logger()).await;
        assert_eq!(response.head.status, 200);
        assert!(matches!(response.body, BodyPlan::Ready { .. }));

        let missing =
            page(Err(RetrievalError::NotFound("p1".to_string()))).with_paths(blocking.clone());
        assert_eq!(missing.prepare(&req, &logger()).await.head.status, 404);

        let down = page(Err(RetrievalError::Network("reset".to_string()))).with_paths(blocking);
        let response = down.prepare(&req, &logger()).await;
        assert_eq!(response.head.status, 502);
        assert_eq!(response.body, BodyPlan::Unavailable);
    }

    #[tokio::test]
    async fn test_unknown_paths_without_fallback_are_not_found() {
        let page = camiseta_page().with_paths(StaticPaths {
            paths: Vec::new(),
            fallback: FallbackMode::NotFound,
        });
        let rid = RequestId::generate();
        let shopper = ShopperView::default();

        let response = page.prepare(&request(Some("p1"), &rid, &shopper), &logger()).await;
        assert_eq!(response.head.status, 404);
        assert_eq!(calls(&page), 0);
    }

    #[tokio::test]
    async fn test_personalized_pages_are_private() {
        let page = camiseta_page();
        record_stale(&page, &camiseta());
        let rid = RequestId::generate();
        let shopper = ShopperView {
            bag_count: 2,
            toasts: Vec::new(),
        };

        let response = page.prepare(&request(Some("p1"), &rid, &shopper), &logger()).await;
        assert_eq!(response.head.get("cache-control"), Some("private, no-store"));

        let (html, _, _) = deliver(&page, response.body, &shopper).await;
        assert!(html.contains(r#"<span class="bag-count">2</span>"#));
    }

    #[tokio::test]
    async fn test_debug_headers_on_request() {
        let page = camiseta_page();
        record_stale(&page, &camiseta());
        let rid = RequestId::generate();
        let shopper = ShopperView::default();
        let mut req = request(Some("p1"), &rid, &shopper);
        req.debug_cache = true;

        let response = page.prepare(&req, &logger()).await;
        assert_eq!(response.head.get("x-cache-key"), Some("isr:product:p1"));
        assert_eq!(response.head.get("x-cache-tags"), Some("product, product:p1"));
    }

    #[tokio::test]
    async fn test_add_to_bag_twice_keeps_one_item() {
        let page = camiseta_page();
        let rid = RequestId::generate();
        let mut shopper = ShopperSession::default();

        let first = page.add_to_bag(Some("p1"), &rid, &mut shopper, &logger()).await;
        assert_eq!(first.head.status, 303);
        assert_eq!(first.head.get("location"), Some("/product/p1"));
        assert_eq!(first.head.get("cache-control"), Some("private, no-store"));

        let second = page.add_to_bag(Some("p1"), &rid, &mut shopper, &logger()).await;
        assert_eq!(second.head.status, 303);

        // The second add reads the props recorded by the first.
        assert_eq!(calls(&page), 1);
        assert_eq!(shopper.bag.len(), 1);

        let view = shopper.take_view();
        assert_eq!(view.bag_count, 1);
        let shown: Vec<(ToastKind, &str)> = view
            .toasts
            .iter()
            .map(|t| (t.kind, t.message.as_str()))
            .collect();
        assert_eq!(
            shown,
            vec![
                (ToastKind::Success, ADDED_TO_BAG_MESSAGE),
                (ToastKind::Info, ALREADY_IN_BAG_MESSAGE),
            ]
        );
    }

    #[tokio::test]
    async fn test_add_to_bag_failures() {
        let rid = RequestId::generate();
        let mut shopper = ShopperSession::default();

        let missing = page(Err(RetrievalError::NotFound("p1".to_string())));
        let response = missing.add_to_bag(Some("p1"), &rid, &mut shopper, &logger()).await;
        assert_eq!(response.head.status, 404);

        let down = page(Err(RetrievalError::Unauthorized));
        let response = down.add_to_bag(Some("p1"), &rid, &mut shopper, &logger()).await;
        assert_eq!(response.head.status, 502);

        let response = down.add_to_bag(None, &rid, &mut shopper, &logger()).await;
        assert_eq!(response.head.status, 404);
        assert!(shopper.bag.is_empty());
        assert!(shopper.flash.is_empty());
    }

    #[tokio::test]
    async fn test_flashed_toasts_render_in_shell() {
        let page = camiseta_page();
        let mut session = ShopperSession::default();
        session.flash.success(ADDED_TO_BAG_MESSAGE);
        let shopper = session.take_view();

        let (html, _, _) = deliver(
            &page,
            BodyPlan::Ready {
                product: camiseta(),
                revalidate: false,
            },
            &shopper,
        )
        .await;
        assert!(html.contains("toast--success"));
        assert!(html.contains(ADDED_TO_BAG_MESSAGE));
    }

    #[test]
    fn test_simple_response() {
        let response = simple_response(405, "Method not allowed", &RequestId::from_string("r"));
        assert_eq!(response.head.status, 405);
        assert_eq!(response.head.get("content-type"), Some(TEXT));
        assert_eq!(response.body, "Method not allowed\n");
    }
}
