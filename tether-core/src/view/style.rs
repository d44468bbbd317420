//! Opaque style values.
//!
//! Tether does not compile stylesheets. A style is a class name (absent for
//! global styles) plus the CSS text that defines it; pages list the styles
//! they use and the document head carries their text.

use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Style {
    inner: Arc<StyleInner>,
}

#[derive(Debug, PartialEq, Eq)]
struct StyleInner {
    class_name: Option<String>,
    text: String,
}

impl Style {
    /// A style addressed by `class_name`. `css` is emitted verbatim.
    pub fn scoped(class_name: impl Into<String>, css: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(StyleInner {
                class_name: Some(class_name.into()),
                text: css.into(),
            }),
        }
    }

    /// A style with no class name. It can only be used as page or app CSS,
    /// never as an attribute.
    pub fn global(css: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(StyleInner {
                class_name: None,
                text: css.into(),
            }),
        }
    }

    pub fn class_name(&self) -> Option<&str> {
        self.inner.class_name.as_deref()
    }

    pub fn text(&self) -> &str {
        &self.inner.text
    }

    pub fn is_global(&self) -> bool {
        self.inner.class_name.is_none()
    }
}

/// Concatenate the CSS text of several styles in order.
pub(crate) fn concat_text<'a>(styles: impl IntoIterator<Item = &'a Style>) -> String {
    styles.into_iter().map(Style::text).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scoped_and_global() {
        let button = Style::scoped("btn", ".btn{cursor:pointer;}");
        let base = Style::global("*{margin:0;}");

        assert_eq!(button.class_name(), Some("btn"));
        assert!(!button.is_global());
        assert!(base.is_global());
        assert_eq!(concat_text([&base, &button]), "*{margin:0;}.btn{cursor:pointer;}");
    }
}
