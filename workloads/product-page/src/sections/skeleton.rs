//! Loading skeleton shown while a page is generated for the first time.

/// Element id of the skeleton, used to hide it once the product arrives.
pub const SKELETON_ID: &str = "product-skeleton";

/// Render the skeleton section.
pub fn render_skeleton() -> String {
    format!(
        r#"<section class="skeleton" id="{id}" data-section="skeleton" aria-busy="true">
    <div class="skeleton-block skeleton-image"></div>
    <div>
        <div class="skeleton-block skeleton-line"></div>
        <div class="skeleton-block skeleton-line skeleton-line--short"></div>
        <div class="skeleton-block skeleton-line"></div>
    </div>
</section>"#,
        id = SKELETON_ID
    )
}

/// Hide the already-streamed skeleton.
pub fn render_skeleton_dismissal() -> String {
    format!("<style>#{} {{ display: none; }}</style>", SKELETON_ID)
}

/// Retitle a document whose head was sent before the product was known.
pub fn render_title_update(title: &str) -> String {
    let literal = serde_json::Value::String(title.to_string())
        .to_string()
        .replace('<', "\\u003c");
    format!("<script>document.title = {};</script>", literal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dismissal_targets_skeleton() {
        assert!(render_skeleton().contains(r#"id="product-skeleton""#));
        assert_eq!(
            render_skeleton_dismissal(),
            "<style>#product-skeleton { display: none; }</style>"
        );
    }

    #[test]
    fn test_title_update_is_script_safe() {
        assert_eq!(
            render_title_update("Camiseta | Ignite Shop"),
            r#"<script>document.title = "Camiseta | Ignite Shop";</script>"#
        );
        assert_eq!(
            render_title_update("</script>\"x\""),
            r#"<script>document.title = "\u003c/script>\"x\"";</script>"#
        );
    }
}
