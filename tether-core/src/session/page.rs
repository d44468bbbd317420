//! Pages: a route, its styles, and the function that builds its view.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use super::{document, PendingSession, SessionId};
use crate::error::Result;
use crate::reactive::SessionContext;
use crate::render::Renderer;
use crate::view::{concat_text, Style, View};

/// What a page function gets to see of the HTTP request.
#[derive(Debug, Clone, Default)]
pub struct PageRequest {
    pub path: String,
    /// Route parameters, e.g. `name` for `/greet/:name`.
    pub params: HashMap<String, String>,
    pub query: HashMap<String, String>,
}

impl PageRequest {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }
}

/// Signature of page construction functions.
pub type PageFn = dyn Fn(&SessionContext, &PageRequest) -> Result<View> + Send + Sync;

#[derive(Clone)]
pub struct Page {
    route: String,
    styles: Vec<Style>,
    build: Arc<PageFn>,
}

impl Page {
    pub fn new<F>(route: impl Into<String>, build: F) -> Self
    where
        F: Fn(&SessionContext, &PageRequest) -> Result<View> + Send + Sync + 'static,
    {
        Self {
            route: route.into(),
            styles: Vec::new(),
            build: Arc::new(build),
        }
    }

    /// Declare the styles whose CSS this page's document carries.
    pub fn with_styles(mut self, styles: impl IntoIterator<Item = Style>) -> Self {
        self.styles.extend(styles);
        self
    }

    pub fn route(&self) -> &str {
        &self.route
    }

    pub fn styles(&self) -> &[Style] {
        &self.styles
    }

    /// Build and render the page for one request.
    ///
    /// Returns the pending session to register and the HTML document to send.
    /// `global_css` precedes the page's own CSS in the document head.
    pub fn open(&self, request: &PageRequest, global_css: &str) -> Result<(PendingSession, String)> {
        let context = SessionContext::new();

        let rendered = (self.build)(&context, request).and_then(|view| {
            let mut renderer = Renderer::new(view);
            let markup = renderer.render()?;
            Ok((renderer, markup))
        });
        let (renderer, markup) = match rendered {
            Ok(rendered) => rendered,
            Err(err) => {
                context.close();
                return Err(err);
            }
        };

        let id = SessionId::generate();
        let css = format!("{global_css}{}", concat_text(&self.styles));
        let html = document(&id, &css, &markup);
        debug!(session = %id, route = %self.route, bytes = html.len(), "page rendered");

        let session = PendingSession::new(id, self.route.clone(), context, renderer, markup)
            .with_path(request.path.clone());
        Ok((session, html))
    }
}

impl fmt::Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("route", &self.route)
            .field("styles", &self.styles)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::view::tags::h1;

    #[test]
    fn open_renders_document_with_styles() {
        let style = Style::scoped("title", ".title{color:red}");
        let class = style.clone();
        let page = Page::new("/greet/:name", move |_, request| {
            let name = request.param("name").unwrap_or("stranger");
            Ok(h1().class(&class).child(format!("Hello, {name}!")).into())
        })
        .with_styles([style]);

        let request = PageRequest::new("/greet/Ferris").with_param("name", "Ferris");
        let (session, html) = page.open(&request, "*{margin:0}").unwrap();

        assert_eq!(session.markup(), "<h1 class=\"title\">Hello, Ferris!</h1>");
        assert_eq!(session.route(), "/greet/:name");
        assert_eq!(session.path(), "/greet/Ferris");
        assert!(html.contains("<style>*{margin:0}.title{color:red}</style>"));
        assert!(html.contains(&format!("?id={}", session.id())));
        assert!(html.contains("<body><h1 class=\"title\">Hello, Ferris!</h1></body>"));
    }

    #[test]
    fn failed_construction_closes_the_context() {
        let leaked = Arc::new(parking_lot::Mutex::new(None));
        let leaked_clone = leaked.clone();
        let page = Page::new("/", move |cx, _| {
            *leaked_clone.lock() = Some(cx.clone());
            Err(Error::Page("no data".into()))
        });

        assert!(matches!(
            page.open(&PageRequest::new("/"), ""),
            Err(Error::Page(_))
        ));
        let context = leaked.lock().clone().unwrap();
        assert!(!context.is_active());
    }

    #[test]
    fn global_style_in_markup_fails_the_page() {
        let page = Page::new("/", |_, _| Ok(h1().class(&Style::global("h1{}")).into()));
        assert!(matches!(
            page.open(&PageRequest::new("/"), ""),
            Err(Error::GlobalStyleAttribute { .. })
        ));
    }
}
