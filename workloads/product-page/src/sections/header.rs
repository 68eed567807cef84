//! Site header with the bag badge.

use edge_sdk::edge_streaming::escape_html;

/// Render the site header. The badge is omitted for an empty bag.
pub fn render_header(store_name: &str, bag_count: u32) -> String {
    let badge = if bag_count > 0 {
        format!(r#"<span class="bag-count">{}</span>"#, bag_count)
    } else {
        String::new()
    };

    format!(
        r#"<header class="site-header">
    <a href="/">{store}</a>
    <span class="bag-link" aria-label="Sacola">&#128092;{badge}</span>
</header>
"#,
        store = escape_html(store_name),
        badge = badge
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_badge_only_when_bag_has_items() {
        assert!(!render_header("Ignite Shop", 0).contains("bag-count"));
        assert!(render_header("Ignite Shop", 2).contains(r#"<span class="bag-count">2</span>"#));
    }
}
