//! Section renderers for the product page.

mod header;
mod product;
mod skeleton;
mod status;
mod toast;

pub use header::*;
pub use product::*;
pub use skeleton::*;
pub use status::*;
pub use toast::*;

/// Alt text for the product photo.
pub const IMAGE_ALT: &str = "Foto do produto";

/// Label of the add-to-bag control.
pub const ADD_TO_BAG_LABEL: &str = "Colocar na sacola";

/// Fixed marketing paragraph shown under every product.
pub const MARKETING_COPY: &str = "Criada no Brasil e feita pro mundo, todos nossos produtos são feitos sob demanda para você usando tecnologia de ponta na estamparia. Qualidade garantida pela Reserva INK.";

/// Rendered size of the product photo.
pub const IMAGE_WIDTH: u32 = 520;
pub const IMAGE_HEIGHT: u32 = 480;

/// CSS styles for the product page.
pub const PAGE_STYLES: &str = r#"
* { box-sizing: border-box; }
body { font-family: Roboto, -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; background: #121214; color: #c4c4cc; }
.site-header { display: flex; justify-content: space-between; align-items: center; max-width: 1180px; margin: 0 auto; padding: 2rem 0; }
.site-header a { color: #e1e1e6; text-decoration: none; font-weight: bold; }
.bag-link { position: relative; background: #202024; padding: 0.75rem; border-radius: 6px; }
.bag-count { position: absolute; top: -8px; right: -8px; background: #00875f; color: #fff; border: 3px solid #121214; border-radius: 50%; min-width: 24px; text-align: center; font-size: 0.875rem; }
.page { max-width: 1180px; margin: 0 auto; }

/* Product */
.product { display: grid; grid-template-columns: 1fr 1fr; gap: 4.5rem; align-items: stretch; }
.product-image { width: 100%; max-width: 576px; height: 656px; background: linear-gradient(180deg, #1ea483 0%, #7465d4 100%); border-radius: 8px; padding: 0.25rem; display: flex; align-items: center; justify-content: center; }
.product-image img { object-fit: cover; }
.product-image-placeholder { color: #e1e1e6; }
.product-details { display: flex; flex-direction: column; }
.product-details h1 { font-size: 2rem; color: #c4c4cc; }
.product-price { margin-top: 1rem; display: block; font-size: 2rem; color: #00b37e; }
.product-details p { margin-top: 2.5rem; font-size: 1.125rem; line-height: 1.6; }
.add-to-bag { margin-top: auto; }
.add-to-bag button { width: 100%; background: #00875f; border: 0; color: #fff; border-radius: 8px; padding: 1.25rem; cursor: pointer; font-weight: bold; font-size: 1.125rem; }
.add-to-bag button:hover { background: #00b37e; }

/* Skeleton */
.skeleton { display: grid; grid-template-columns: 1fr 1fr; gap: 4.5rem; }
.skeleton-block { background: #202024; border-radius: 8px; animation: pulse 1.5s ease-in-out infinite; }
.skeleton-image { height: 656px; }
.skeleton-line { height: 2rem; margin-bottom: 1.5rem; }
.skeleton-line--short { width: 40%; }
@keyframes pulse { 50% { opacity: 0.5; } }

/* Toasts */
.toasts { position: fixed; top: 1rem; right: 1rem; display: flex; flex-direction: column; gap: 0.5rem; }
.toast { padding: 1rem 1.5rem; border-radius: 6px; background: #202024; color: #e1e1e6; border-left: 4px solid #3498db; }
.toast--success { border-left-color: #07bc0c; }

/* Status */
.page-status { text-align: center; padding: 4rem 0; }
"#;
