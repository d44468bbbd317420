//! HTTP and WebSocket Adapter
//!
//! [`App`] collects pages and global styles and turns them into an axum
//! [`Router`]. Each page route serves two kinds of request:
//!
//! - a plain GET runs the page function, registers the pending session, and
//!   answers with the HTML document;
//! - a WebSocket upgrade carrying `?id=<session>` claims that pending session
//!   and runs it live on the connection's task.
//!
//! A handshake for an unknown, expired, or foreign session is refused before
//! the upgrade, so nothing is created for it.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use futures_util::{future, SinkExt, StreamExt};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::config::ServerConfig;
use crate::error::Result;
use crate::reactive::SessionContext;
use crate::session::{Page, PageRequest, PendingSession, SessionRegistry};
use crate::view::{concat_text, Style, View};

/// Query parameter carrying the session id on the handshake.
pub const SESSION_QUERY_PARAM: &str = "id";

/// A set of pages served together.
#[derive(Default)]
pub struct App {
    pages: Vec<Page>,
    global_styles: Vec<Style>,
}

struct Shared {
    sessions: SessionRegistry,
    global_css: String,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add CSS included in every page's document.
    pub fn global_style(mut self, style: Style) -> Self {
        self.global_styles.push(style);
        self
    }

    /// Serve `build` at `route` (axum path syntax, e.g. `/greet/:name`).
    pub fn page<F>(self, route: impl Into<String>, build: F) -> Self
    where
        F: Fn(&SessionContext, &PageRequest) -> Result<View> + Send + Sync + 'static,
    {
        self.mount(Page::new(route, build))
    }

    /// Like [`App::page`], declaring the styles the page uses.
    pub fn page_with_styles<F>(
        self,
        route: impl Into<String>,
        styles: impl IntoIterator<Item = Style>,
        build: F,
    ) -> Self
    where
        F: Fn(&SessionContext, &PageRequest) -> Result<View> + Send + Sync + 'static,
    {
        self.mount(Page::new(route, build).with_styles(styles))
    }

    pub fn mount(mut self, page: Page) -> Self {
        self.pages.push(page);
        self
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Build the router. All pages share one session registry.
    pub fn router(self, config: &ServerConfig) -> Router {
        let shared = self.shared(config);
        self.into_router(shared)
    }

    /// Bind `config.addr` and serve until the process stops.
    ///
    /// Expired pending sessions are also swept on a timer, so abandoned pages
    /// are released even when no new page is requested.
    pub async fn serve(self, config: ServerConfig) -> std::io::Result<()> {
        let shared = self.shared(&config);
        let sweeper = spawn_sweeper(Arc::clone(&shared), sweep_period(config.pending_ttl()));
        let router = self.into_router(shared);

        let listener = tokio::net::TcpListener::bind(config.addr).await?;
        info!(addr = %listener.local_addr()?, "listening");
        let served = axum::serve(listener, router).await;
        sweeper.abort();
        served
    }

    fn shared(&self, config: &ServerConfig) -> Arc<Shared> {
        Arc::new(Shared {
            sessions: SessionRegistry::new(config.pending_ttl()),
            global_css: concat_text(&self.global_styles),
        })
    }

    fn into_router(self, shared: Arc<Shared>) -> Router {
        self.pages
            .into_iter()
            .fold(Router::new(), |router, page| {
                let page = Arc::new(page);
                let route = page.route().to_owned();
                router.route(
                    &route,
                    get(
                        move |State(shared): State<Arc<Shared>>,
                              upgrade: Option<WebSocketUpgrade>,
                              params: Option<Path<HashMap<String, String>>>,
                              Query(query): Query<HashMap<String, String>>,
                              uri: Uri| {
                            let page = Arc::clone(&page);
                            async move {
                                let request = PageRequest {
                                    path: uri.path().to_owned(),
                                    params: params.map(|Path(params)| params).unwrap_or_default(),
                                    query,
                                };
                                match upgrade {
                                    Some(upgrade) => handshake(&shared, &page, upgrade, &request),
                                    None => serve_document(&shared, &page, &request),
                                }
                            }
                        },
                    ),
                )
            })
            .with_state(shared)
    }
}

/// Sweep no more often than once a second.
fn sweep_period(ttl: Duration) -> Duration {
    ttl.max(Duration::from_secs(1))
}

fn spawn_sweeper(shared: Arc<Shared>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticks = tokio::time::interval(every);
        loop {
            ticks.tick().await;
            shared.sessions.sweep();
            debug!(pending = shared.sessions.len(), "swept pending sessions");
        }
    })
}

fn serve_document(shared: &Shared, page: &Page, request: &PageRequest) -> Response {
    match page.open(request, &shared.global_css) {
        Ok((session, html)) => {
            shared.sessions.insert(session);
            Html(html).into_response()
        }
        Err(err) => {
            error!(route = page.route(), %err, "page construction failed");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
        }
    }
}

fn handshake(
    shared: &Shared,
    page: &Page,
    upgrade: WebSocketUpgrade,
    request: &PageRequest,
) -> Response {
    let Some(id) = request.query.get(SESSION_QUERY_PARAM) else {
        warn!(route = page.route(), "handshake without session id");
        return StatusCode::BAD_REQUEST.into_response();
    };

    match shared.sessions.take(id, &request.path) {
        Ok(session) => upgrade.on_upgrade(move |socket| run_socket(session, socket)),
        Err(err) => {
            warn!(route = page.route(), %err, "handshake rejected");
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

async fn run_socket(session: PendingSession, socket: WebSocket) {
    let (sink, stream) = socket.split();

    // Text frames in; a close frame ends the stream. Other frames are ignored.
    let inbound = stream
        .take_while(|frame| future::ready(!matches!(frame, Ok(Message::Close(_)))))
        .filter_map(|frame| {
            future::ready(match frame {
                Ok(Message::Text(text)) => Some(Ok(text)),
                Ok(_) => None,
                Err(err) => Some(Err(err)),
            })
        });
    let outbound = sink.with(|text: String| future::ready(Ok::<_, axum::Error>(Message::Text(text))));

    // Failures are logged by the session itself.
    let _ = session
        .attach()
        .run(Box::pin(inbound), Box::pin(outbound))
        .await;
}
