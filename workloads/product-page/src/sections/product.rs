//! Product detail section renderer.

use edge_sdk::edge_data::encode_component;
use edge_sdk::edge_streaming::escape_html;
use turbo_commerce::catalog::ProductViewModel;

use super::{ADD_TO_BAG_LABEL, IMAGE_ALT, IMAGE_HEIGHT, IMAGE_WIDTH, MARKETING_COPY};

/// Render the product section.
///
/// `price` is the already formatted display price.
pub fn render_product(product: &ProductViewModel, price: &str) -> String {
    let image_html = match &product.image_url {
        Some(url) => format!(
            r#"<img src="{}" width="{}" height="{}" alt="{}">"#,
            escape_html(url),
            IMAGE_WIDTH,
            IMAGE_HEIGHT,
            IMAGE_ALT
        ),
        None => format!(
            r#"<div class="product-image-placeholder" role="img" aria-label="{}"></div>"#,
            IMAGE_ALT
        ),
    };

    format!(
        r#"<section class="product" data-section="product">
    <div class="product-image">
        {image_html}
    </div>
    <div class="product-details">
        <h1>{name}</h1>
        <span class="product-price">{price}</span>
        <p>{description}</p>
        <p>{marketing}</p>
        <form class="add-to-bag" method="post" action="/product/{action_id}/bag">
            <button type="submit">{label}</button>
        </form>
    </div>
</section>"#,
        image_html = image_html,
        name = escape_html(&product.name),
        price = escape_html(price),
        description = escape_html(&product.description),
        marketing = MARKETING_COPY,
        action_id = encode_component(product.id.as_str()),
        label = ADD_TO_BAG_LABEL,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use turbo_commerce::{PriceId, ProductId};

    fn camiseta(image_url: Option<&str>) -> ProductViewModel {
        ProductViewModel {
            id: ProductId::new("p1"),
            name: "Camiseta".to_string(),
            description: "algodão".to_string(),
            image_url: image_url.map(str::to_string),
            price: 9990,
            price_id: PriceId::new("price_1"),
        }
    }

    #[test]
    fn test_renders_product_fields() {
        let html = render_product(&camiseta(Some("https://x/img.png")), "R$ 99,90");
        assert!(html.contains("<h1>Camiseta</h1>"));
        assert!(html.contains(r#"<span class="product-price">R$ 99,90</span>"#));
        assert!(html.contains("<p>algodão</p>"));
        assert!(html.contains(MARKETING_COPY));
        assert!(html.contains(
            r#"<img src="https://x/img.png" width="520" height="480" alt="Foto do produto">"#
        ));
        assert!(html.contains(r#"action="/product/p1/bag""#));
        assert!(html.contains("Colocar na sacola"));
    }

    #[test]
    fn test_missing_image_renders_placeholder() {
        let html = render_product(&camiseta(None), "R$ 99,90");
        assert!(html.contains("product-image-placeholder"));
        assert!(!html.contains("<img"));
    }

    #[test]
    fn test_form_action_encodes_id() {
        let mut product = camiseta(None);
        product.id = ProductId::new("a/b?c#d");
        let html = render_product(&product, "R$ 99,90");
        assert!(html.contains(r#"action="/product/a%2Fb%3Fc%23d/bag""#));
    }

    #[test]
    fn test_escapes_provider_text() {
        let mut product = camiseta(None);
        product.name = "<b>Camiseta</b>".to_string();
        let html = render_product(&product, "R$ 99,90");
        assert!(html.contains("&lt;b&gt;Camiseta&lt;/b&gt;"));
    }
}
