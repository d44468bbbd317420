//! Element constructors, one per tag.
//!
//! ```rust,ignore
//! use tether_core::view::tags::{button, div, h1};
//!
//! div()
//!     .child(h1().child("Hello"))
//!     .child(button().child("Click").on("onclick", move || count.update(|n| n + 1)))
//! ```

use super::Element;

macro_rules! tags {
    ($($name:ident),* $(,)?) => {
        $(
            #[doc = concat!("`<", stringify!($name), ">`")]
            pub fn $name() -> Element {
                Element::new(stringify!($name))
            }
        )*
    };
}

tags!(
    a, article, aside, b, blockquote, br, button, code, details, dialog, div, em, footer, form,
    h1, h2, h3, h4, h5, h6, header, hr, i, img, input, label, li, nav, ol, option, p, pre,
    section, select, small, span, strong, summary, table, tbody, td, textarea, th, thead, tr, ul,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_set_the_tag() {
        assert_eq!(div().tag(), "div");
        assert_eq!(h3().tag(), "h3");
        assert_eq!(input().tag(), "input");
    }
}
