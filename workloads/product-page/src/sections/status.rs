//! Not-found and failure sections.

/// Render the section for a product that does not exist.
pub fn render_not_found() -> String {
    r#"<section class="page-status" data-section="not-found">
    <h1>404</h1>
    <p>Produto não encontrado.</p>
</section>"#
        .to_string()
}

/// Render the section for a product that could not be loaded.
pub fn render_unavailable() -> String {
    r#"<section class="page-status" data-section="error">
    <h1>Ops!</h1>
    <p>Não foi possível carregar este produto. Tente novamente em instantes.</p>
</section>"#
        .to_string()
}
