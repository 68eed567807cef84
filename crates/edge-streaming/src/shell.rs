//! Shell template abstraction.

/// Escape text for HTML element content and attribute values.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Head content for the shell.
#[derive(Debug, Clone, Default)]
pub struct HeadContent {
    /// Page title.
    pub title: Option<String>,
    /// Meta tags.
    pub meta: Vec<(String, String)>,
    /// Link and style tags, already rendered.
    pub links: Vec<String>,
}

impl HeadContent {
    /// Create new head content with a title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    /// Add a meta tag.
    pub fn with_meta(mut self, name: &str, content: &str) -> Self {
        self.meta.push((name.to_string(), content.to_string()));
        self
    }

    /// Add a stylesheet link.
    pub fn with_stylesheet(mut self, href: &str) -> Self {
        self.links.push(format!(
            r#"<link rel="stylesheet" href="{}">"#,
            escape_html(href)
        ));
        self
    }

    /// Add inline CSS styles.
    pub fn with_style(mut self, css: &str) -> Self {
        self.links.push(format!("<style>{}</style>", css));
        self
    }

    /// Render head content to HTML. Title and meta values are escaped.
    pub fn render(&self) -> String {
        let mut html = String::from("<meta charset=\"utf-8\">\n");

        if let Some(title) = &self.title {
            html.push_str(&format!("<title>{}</title>\n", escape_html(title)));
        }

        for (name, content) in &self.meta {
            html.push_str(&format!(
                r#"<meta name="{}" content="{}">"#,
                escape_html(name),
                escape_html(content)
            ));
            html.push('\n');
        }

        for link in &self.links {
            html.push_str(link);
            html.push('\n');
        }

        html
    }
}

/// Document shell: everything before and after the streamed body.
#[derive(Debug, Clone)]
pub struct Shell {
    /// Document language.
    pub lang: String,
    /// Head content.
    pub head: HeadContent,
    /// HTML before sections (opening body, header, wrapper).
    pub body_start: String,
    /// HTML after sections (closing tags).
    pub body_end: String,
}

impl Shell {
    /// Create a new shell with basic structure.
    pub fn new(head: HeadContent) -> Self {
        Self {
            lang: "en".to_string(),
            head,
            body_start: "<body>\n<main>\n".to_string(),
            body_end: "</main>\n</body>\n</html>".to_string(),
        }
    }

    /// Set the `lang` attribute of the document.
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }

    /// Set custom body start HTML.
    pub fn with_body_start(mut self, html: impl Into<String>) -> Self {
        self.body_start = html.into();
        self
    }

    /// Set custom body end HTML.
    pub fn with_body_end(mut self, html: impl Into<String>) -> Self {
        self.body_end = html.into();
        self
    }

    /// Render the opening part of the shell (before sections).
    pub fn render_opening(&self) -> String {
        let mut html = String::from("<!DOCTYPE html>\n");
        html.push_str(&format!("<html lang=\"{}\">\n<head>\n", escape_html(&self.lang)));
        html.push_str(&self.head.render());
        html.push_str("</head>\n");
        html.push_str(&self.body_start);
        html
    }

    /// Render the closing part of the shell (after sections).
    pub fn render_closing(&self) -> String {
        self.body_end.clone()
    }

    /// Render a whole document around `body`.
    pub fn render_document(&self, body: &str) -> String {
        let mut html = self.render_opening();
        html.push_str(body);
        html.push_str(&self.render_closing());
        html
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#x27;Jerry&#x27;&lt;/a&gt;"
        );
        assert_eq!(escape_html("Camiseta"), "Camiseta");
    }

    #[test]
    fn test_opening_carries_lang_and_title() {
        let shell = Shell::new(HeadContent::new("Camiseta | Ignite Shop")).with_lang("pt-BR");
        let opening = shell.render_opening();
        assert!(opening.starts_with("<!DOCTYPE html>\n<html lang=\"pt-BR\">"));
        assert!(opening.contains("<title>Camiseta | Ignite Shop</title>"));
        assert!(opening.ends_with("<body>\n<main>\n"));
    }

    #[test]
    fn test_title_is_escaped() {
        let head = HeadContent::new("<script>alert(1)</script>");
        assert!(head.render().contains("&lt;script&gt;"));
    }

    #[test]
    fn test_render_document() {
        let shell = Shell::new(HeadContent::new("t"))
            .with_body_start("<body>")
            .with_body_end("</body></html>");
        let doc = shell.render_document("<p>hi</p>");
        assert!(doc.ends_with("<body><p>hi</p></body></html>"));
    }
}
