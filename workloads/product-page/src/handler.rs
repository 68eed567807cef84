//! Spin HTTP entry point.

use anyhow::{anyhow, Context};
use futures::SinkExt;
use spin_sdk::http::{Fields, IncomingRequest, OutgoingResponse, ResponseOutparam};
use spin_sdk::http_component;

use edge_sdk::edge_cache::should_include_debug_headers;
use edge_sdk::edge_core::{Method, RequestContext, RequestId, RouteMatch};
use edge_sdk::edge_data::{FetchClient, SpinTransport};
use edge_sdk::edge_observability::StructuredLogger;
use edge_sdk::edge_streaming::StreamingSink;
use turbo_cache::{Cache, Session, SessionId};

use crate::{
    manifest, product_id, session_cookie, simple_response, PageRequest, ProductPage,
    ProductPageController, ShopperSession, SimpleResponse, StorefrontConfig, StripeRetriever,
    ADD_TO_BAG_HANDLER, SESSION_COOKIE, WORKLOAD_NAME,
};

type Page = ProductPage<StripeRetriever<SpinTransport>, Cache>;

/// Configuration and stores opened once per request.
struct Storefront {
    config: StorefrontConfig,
    props: Cache,
    sessions: Session<ShopperSession>,
}

impl Storefront {
    fn open() -> anyhow::Result<Self> {
        let config = StorefrontConfig::from_lookup(|name| spin_sdk::variables::get(name).ok())
            .context("loading storefront configuration")?;
        let props = Cache::open_default().context("opening the props store")?;
        let sessions = Cache::open_default().context("opening the session store")?;
        Ok(Self {
            config,
            props,
            sessions: Session::with_cache(sessions),
        })
    }
}

/// Main HTTP handler for the product page.
#[http_component]
async fn handle(req: IncomingRequest, response_out: ResponseOutparam) {
    let Some(ctx) = request_context(&req) else {
        let logger = StructuredLogger::new(RequestId::generate()).with_workload(WORKLOAD_NAME);
        let response = simple_response(405, "Method not allowed", logger.request_id());
        respond(response_out, response, &logger).await;
        return;
    };

    let logger = StructuredLogger::new(ctx.request_id.clone())
        .with_workload(WORKLOAD_NAME)
        .with_route(&ctx.path);

    let storefront = match Storefront::open() {
        Ok(storefront) => storefront,
        Err(e) => {
            logger
                .error_builder("Workload setup failed")
                .field("error", format!("{:#}", e))
                .emit();
            let response = simple_response(500, "Storefront unavailable", &ctx.request_id);
            respond(response_out, response, &logger).await;
            return;
        }
    };
    let logger = logger.with_format(storefront.config.log_format);

    logger
        .info_builder("Request started")
        .field("method", ctx.method.as_str())
        .emit();

    let manifest = manifest();
    let (handler, params) = match manifest.route(ctx.method, &ctx.path) {
        RouteMatch::Matched { handler, params } => (handler, params),
        RouteMatch::MethodNotAllowed => {
            let response = simple_response(405, "Method not allowed", &ctx.request_id);
            respond(response_out, response, &logger).await;
            return;
        }
        RouteMatch::NotFound => {
            let response = simple_response(404, "Not found", &ctx.request_id);
            respond(response_out, response, &logger).await;
            return;
        }
    };
    let ctx = ctx.with_params(params);

    let Storefront {
        config,
        props,
        sessions,
    } = storefront;
    let client = FetchClient::new(SpinTransport, ctx.request_id.clone());
    let retriever = StripeRetriever::new(
        client,
        config.stripe_api_base.clone(),
        config.stripe_secret_key.clone(),
    );
    let page = ProductPage::new(ProductPageController::new(retriever, config), props);

    if handler == ADD_TO_BAG_HANDLER {
        add_to_bag(&page, &sessions, &ctx, response_out, &logger).await;
    } else {
        render_page(&page, &sessions, &ctx, response_out, &logger).await;
    }

    logger
        .info_builder("Request complete")
        .duration_ms("elapsed_ms", ctx.timing.elapsed())
        .emit();
}

async fn render_page(
    page: &Page,
    sessions: &Session<ShopperSession>,
    ctx: &RequestContext,
    response_out: ResponseOutparam,
    logger: &StructuredLogger,
) {
    // A shopper without a cookie has nothing stored; no session is created.
    let session_id = ctx.cookie(SESSION_COOKIE).and_then(SessionId::parse);
    let view = match &session_id {
        Some(id) => {
            let mut shopper = load_shopper(sessions, id, logger);
            let view = shopper.take_view();
            if !view.toasts.is_empty() {
                if let Err(e) = sessions.set(id, &shopper) {
                    logger
                        .warn_builder("Failed to clear flashed toasts")
                        .field("error", e.to_string())
                        .emit();
                }
            }
            view
        }
        None => Default::default(),
    };

    let id = product_id(ctx);
    let request = PageRequest {
        id: id.as_deref(),
        request_id: &ctx.request_id,
        shopper: &view,
        debug_cache: should_include_debug_headers(ctx.header("x-debug-cache")),
    };
    let prepared = page.prepare(&request, logger).await;

    let response = match outgoing_response(&prepared.head) {
        Ok(response) => response,
        Err(e) => {
            logger
                .error_builder("Failed to build response")
                .field("error", format!("{:#}", e))
                .emit();
            return;
        }
    };
    let body = response.take_body();
    response_out.set(response);

    let mut sink = StreamingSink::new(body, ctx.timing.clone());
    let revalidation = match page.deliver(prepared.body, &view, &mut sink, logger).await {
        Ok(revalidation) => revalidation,
        Err(e) => {
            logger
                .error_builder("Streaming failed")
                .field("error", e.to_string())
                .emit();
            None
        }
    };
    let timing = sink.timing();
    let mut sent = logger
        .info_builder("Page sent")
        .field_u64("status", u64::from(prepared.head.status))
        .field("sections", sink.sections_sent().join(","));
    if let Some(elapsed) = timing.time_to_shell() {
        sent = sent.duration_ms("time_to_shell_ms", elapsed);
    }
    let last_section = sink.sections_sent().last();
    if let Some(elapsed) = last_section.and_then(|name| timing.section_sent_at(name)) {
        sent = sent.duration_ms("time_to_content_ms", elapsed);
    }
    sent.emit();

    // Close the body before regenerating.
    drop(sink);
    if let Some(revalidation) = revalidation {
        page.revalidate(revalidation, logger).await;
    }
}

async fn add_to_bag(
    page: &Page,
    sessions: &Session<ShopperSession>,
    ctx: &RequestContext,
    response_out: ResponseOutparam,
    logger: &StructuredLogger,
) {
    let existing = ctx.cookie(SESSION_COOKIE).and_then(SessionId::parse);
    let is_new = existing.is_none();
    let session_id = existing.unwrap_or_else(SessionId::generate);
    let mut shopper = load_shopper(sessions, &session_id, logger);

    let id = product_id(ctx);
    let mut response = page
        .add_to_bag(id.as_deref(), &ctx.request_id, &mut shopper, logger)
        .await;

    if response.head.status == 303 {
        match sessions.set(&session_id, &shopper) {
            Ok(()) if is_new => response.head.push("set-cookie", session_cookie(&session_id)),
            Ok(()) => {}
            Err(e) => {
                logger
                    .error_builder("Failed to save bag")
                    .field("error", e.to_string())
                    .emit();
                response = simple_response(500, "Bag could not be saved", &ctx.request_id);
            }
        }
    }

    respond(response_out, response, logger).await;
}

fn load_shopper(
    sessions: &Session<ShopperSession>,
    id: &SessionId,
    logger: &StructuredLogger,
) -> ShopperSession {
    sessions.get_or_default(id).unwrap_or_else(|e| {
        logger
            .warn_builder("Failed to load session, starting empty")
            .field("error", e.to_string())
            .emit();
        ShopperSession::default()
    })
}

/// Build a request context from the Spin request. `None` for methods the
/// workload does not know.
fn request_context(req: &IncomingRequest) -> Option<RequestContext> {
    use spin_sdk::http::Method as SpinMethod;

    let method = match req.method() {
        SpinMethod::Get => Method::Get,
        SpinMethod::Head => Method::Head,
        SpinMethod::Post => Method::Post,
        SpinMethod::Put => Method::Put,
        SpinMethod::Delete => Method::Delete,
        SpinMethod::Patch => Method::Patch,
        SpinMethod::Options => Method::Options,
        _ => return None,
    };

    let path = req.path_with_query().unwrap_or_default();
    let ctx = req
        .headers()
        .entries()
        .into_iter()
        .fold(RequestContext::new(method, path), |ctx, (name, value)| {
            ctx.with_header(&name, String::from_utf8_lossy(&value).into_owned())
        });
    Some(ctx)
}

fn outgoing_response(head: &crate::ResponseHead) -> anyhow::Result<OutgoingResponse> {
    let list: Vec<(String, Vec<u8>)> = head
        .headers
        .iter()
        .map(|(name, value)| (name.to_ascii_lowercase(), value.clone().into_bytes()))
        .collect();
    let headers =
        Fields::from_list(&list).map_err(|e| anyhow!("invalid response headers: {:?}", e))?;
    let response = OutgoingResponse::new(headers);
    response
        .set_status_code(head.status)
        .map_err(|()| anyhow!("invalid status code {}", head.status))?;
    Ok(response)
}

async fn respond(response_out: ResponseOutparam, response: SimpleResponse, logger: &StructuredLogger) {
    let outgoing = match outgoing_response(&response.head) {
        Ok(outgoing) => outgoing,
        Err(e) => {
            logger
                .error_builder("Failed to build response")
                .field("error", format!("{:#}", e))
                .emit();
            return;
        }
    };
    let mut body = outgoing.take_body();
    response_out.set(outgoing);

    if let Err(e) = body.send(response.body.into_bytes()).await {
        logger
            .warn_builder("Failed to write response body")
            .field("error", e.to_string())
            .emit();
    }
}
