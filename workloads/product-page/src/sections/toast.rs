//! Toast notification region.

use edge_sdk::edge_streaming::escape_html;
use turbo_commerce::notify::Toast;

/// Render flashed toasts. Empty input renders nothing.
pub fn render_toasts(toasts: &[Toast]) -> String {
    if toasts.is_empty() {
        return String::new();
    }

    let items: String = toasts
        .iter()
        .map(|toast| {
            format!(
                r#"<div class="toast toast--{}" role="status">{}</div>"#,
                toast.kind.as_str(),
                escape_html(&toast.message)
            )
        })
        .collect();

    format!(r#"<div class="toasts" aria-live="polite">{}</div>"#, items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use turbo_commerce::notify::ToastKind;

    #[test]
    fn test_renders_each_toast_with_kind() {
        let html = render_toasts(&[
            Toast {
                kind: ToastKind::Success,
                message: "Produto adicionado na sacola!".to_string(),
            },
            Toast {
                kind: ToastKind::Info,
                message: "Produto já na sacola".to_string(),
            },
        ]);
        assert!(html.contains(r#"toast--success" role="status">Produto adicionado na sacola!"#));
        assert!(html.contains(r#"toast--info" role="status">Produto já na sacola"#));
    }

    #[test]
    fn test_empty() {
        assert_eq!(render_toasts(&[]), "");
    }
}
