//! Pending and live sessions.
//!
//! # Scheduling
//!
//! A live session runs on one task. Inbound trigger frames are dispatched on
//! that task, and the callback they invoke runs there too. When a callback
//! changes a signal, the re-render subscriber runs synchronously inside the
//! callback: it renders the full tree, compares the markup with the last
//! rendered markup, and queues an update frame if they differ. Queuing is the
//! only deferred step; the session's loop drains the queue before reading the
//! next inbound frame.
//!
//! Renders of one session never overlap. A re-render requested while a render
//! is already running (from another thread, or from a producer writing a
//! signal during the walk) marks the session dirty and returns; whoever holds
//! the render lock renders again until no request is left over, so the last
//! render always reflects the latest values.

use std::fmt::Display;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::{Sink, SinkExt, Stream, StreamExt};
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use super::protocol::{ClientMessage, ServerMessage};
use super::SessionId;
use crate::error::{Error, ProtocolError, Result};
use crate::reactive::SessionContext;
use crate::render::Renderer;

/// A rendered page waiting for its browser to connect.
pub struct PendingSession {
    id: SessionId,
    route: String,
    path: String,
    context: SessionContext,
    renderer: Renderer,
    markup: String,
    created: Instant,
}

impl std::fmt::Debug for PendingSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingSession")
            .field("id", &self.id)
            .field("route", &self.route)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl PendingSession {
    pub fn new(
        id: SessionId,
        route: impl Into<String>,
        context: SessionContext,
        renderer: Renderer,
        markup: String,
    ) -> Self {
        let route = route.into();
        Self {
            id,
            path: route.clone(),
            route,
            context,
            renderer,
            markup,
            created: Instant::now(),
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Set the concrete request path the page was served at.
    ///
    /// Defaults to the route pattern.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn route(&self) -> &str {
        &self.route
    }

    /// Path the handshake must arrive on.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    /// Markup of the initial render.
    pub fn markup(&self) -> &str {
        &self.markup
    }

    pub fn age(&self) -> Duration {
        self.created.elapsed()
    }

    /// Abandon the session without ever going live.
    pub fn discard(&self) {
        self.context.close();
    }

    /// Go live: install the re-render subscriber on the session context.
    ///
    /// The initial render is the baseline; nothing is pushed until the
    /// markup changes.
    pub fn attach(self) -> LiveSession {
        let (outbox, queued) = mpsc::unbounded_channel();
        let state = Arc::new(Mutex::new(LiveState {
            renderer: self.renderer,
            last_rendered: self.markup,
        }));

        let subscriber_state = Arc::clone(&state);
        let dirty = AtomicBool::new(false);
        let id = self.id.clone();
        self.context.on_rerender(move || {
            dirty.store(true, Ordering::Release);

            loop {
                let Some(mut state) = subscriber_state.try_lock() else {
                    debug!(session = %id, "render in progress; re-render deferred to it");
                    return;
                };

                let mut passes = 0;
                while dirty.swap(false, Ordering::AcqRel) {
                    passes += 1;
                    if passes > MAX_RENDER_PASSES {
                        warn!(session = %id, passes, "view keeps changing while rendering; giving up");
                        return;
                    }
                    state.rerender(&id, &outbox);
                }
                drop(state);

                // A request that lost the race for the lock after the last
                // pass is picked up here.
                if !dirty.load(Ordering::Acquire) {
                    return;
                }
            }
        });

        info!(session = %self.id, route = %self.route, "session live");
        LiveSession {
            id: self.id,
            context: self.context,
            state,
            queued,
        }
    }
}

/// Consecutive renders one re-render request may run before giving up.
const MAX_RENDER_PASSES: usize = 64;

struct LiveState {
    renderer: Renderer,
    last_rendered: String,
}

impl LiveState {
    /// Render once and queue the markup if it changed.
    fn rerender(&mut self, id: &SessionId, outbox: &mpsc::UnboundedSender<Outbound>) {
        let pushed = match self.renderer.render() {
            Ok(markup) => {
                let changed = markup != self.last_rendered;
                if changed {
                    let _ = outbox.send(Outbound::Update(markup.clone()));
                }
                self.last_rendered = markup;
                changed
            }
            Err(err) => {
                error!(session = %id, %err, "re-render failed");
                let _ = outbox.send(Outbound::Failed(err));
                false
            }
        };
        debug!(session = %id, pushed, "re-rendered");
    }
}

enum Outbound {
    Update(String),
    Failed(Error),
}

/// A session with an attached connection.
pub struct LiveSession {
    id: SessionId,
    context: SessionContext,
    state: Arc<Mutex<LiveState>>,
    queued: mpsc::UnboundedReceiver<Outbound>,
}

impl LiveSession {
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Markup of the most recent render.
    pub fn last_rendered(&self) -> String {
        self.state.lock().last_rendered.clone()
    }

    /// Handle one inbound frame.
    ///
    /// The handler is looked up in the registry of the most recent render.
    pub fn dispatch(&self, frame: &str) -> Result<()> {
        let ClientMessage::Trigger { handler, args } = ClientMessage::parse(frame)?;

        // The lock must be released before the callback runs: the callback
        // may request a re-render, which takes it again.
        let callback = {
            let state = self.state.lock();
            state.renderer.actions().get(&handler).cloned()
        };
        let callback = callback.ok_or_else(|| ProtocolError::UnknownHandler(handler.clone()))?;

        debug!(session = %self.id, %handler, "dispatching trigger");
        callback.invoke(args.unwrap_or_default())
    }

    /// Drive the connection until either side closes it or an error ends the
    /// session.
    ///
    /// `inbound` yields text frames and ends when the peer closes. Update
    /// frames are written to `outbound`, which is closed on the way out.
    pub async fn run<I, O, E>(mut self, mut inbound: I, mut outbound: O) -> Result<()>
    where
        I: Stream<Item = std::result::Result<String, E>> + Unpin,
        O: Sink<String> + Unpin,
        O::Error: Display,
        E: Display,
    {
        let outcome = loop {
            tokio::select! {
                biased;

                Some(queued) = self.queued.recv() => match queued {
                    Outbound::Update(markup) => {
                        let frame = ServerMessage::Update(markup).encode();
                        if let Err(err) = outbound.send(frame).await {
                            break Err(Error::Transport(err.to_string()));
                        }
                    }
                    Outbound::Failed(err) => break Err(err),
                },

                frame = inbound.next() => match frame {
                    None => break Ok(()),
                    Some(Err(err)) => break Err(Error::Transport(err.to_string())),
                    Some(Ok(text)) => {
                        if let Err(err) = self.dispatch(&text) {
                            break Err(err);
                        }
                    }
                },
            }
        };

        self.context.close();
        let _ = outbound.close().await;

        match &outcome {
            Ok(()) => info!(session = %self.id, "session closed by peer"),
            Err(err) => warn!(session = %self.id, %err, "session closed"),
        }
        outcome
    }
}

impl Drop for LiveSession {
    fn drop(&mut self) {
        self.context.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Barrier;

    use crate::view::tags::button;
    use crate::view::View;

    fn counter() -> (PendingSession, crate::reactive::Signal<i32>, String) {
        let cx = SessionContext::new();
        let count = cx.signal(0).unwrap();
        let increment = count.clone();
        let element = button()
            .on("onclick", move || increment.update(|n| n + 1))
            .child(&count);
        let handler = format!("{}@onclick", element.id());

        let mut renderer = Renderer::new(View::from(element));
        let markup = renderer.render().unwrap();
        let session = PendingSession::new(SessionId::generate(), "/", cx, renderer, markup);
        (session, count, handler)
    }

    #[test]
    fn dispatch_invokes_callback_and_queues_update() {
        let (pending, count, handler) = counter();
        let mut live = pending.attach();

        live.dispatch(&format!("trigger${handler}")).unwrap();

        assert_eq!(count.get(), 1);
        assert!(live.last_rendered().contains(">1</button>"));
        assert!(matches!(live.queued.try_recv(), Ok(Outbound::Update(m)) if m.contains(">1<")));
    }

    #[test]
    fn unchanged_markup_is_not_queued() {
        let (pending, count, _) = counter();
        let mut live = pending.attach();

        // Equal value: no re-render at all
        count.set(0);
        // Explicit request with nothing changed: rendered, not queued
        live.context.request_rerender();

        assert!(live.queued.try_recv().is_err());
    }

    #[test]
    fn rerender_requested_during_a_render_is_not_lost() {
        let cx = SessionContext::new();
        let value = cx.signal(0).unwrap();

        // The first render after arming stops after reading `value` until
        // the main thread has written it again.
        let armed = Arc::new(AtomicBool::new(false));
        let entered = Arc::new(Barrier::new(2));
        let release = Arc::new(Barrier::new(2));
        let gate = {
            let (armed, entered, release) = (armed.clone(), entered.clone(), release.clone());
            View::deferred(move || {
                if armed.swap(false, Ordering::SeqCst) {
                    entered.wait();
                    release.wait();
                }
                View::Empty
            })
        };

        let mut renderer = Renderer::new((View::from(&value), gate));
        let markup = renderer.render().unwrap();
        let pending = PendingSession::new(SessionId::generate(), "/", cx, renderer, markup);
        let mut live = pending.attach();

        armed.store(true, Ordering::SeqCst);
        let writer = {
            let value = value.clone();
            std::thread::spawn(move || value.set(1))
        };
        entered.wait();
        value.set(2);
        release.wait();
        writer.join().unwrap();

        assert_eq!(value.get(), 2);
        assert_eq!(live.last_rendered(), "2");
        let mut pushed = Vec::new();
        while let Ok(Outbound::Update(markup)) = live.queued.try_recv() {
            pushed.push(markup);
        }
        assert_eq!(pushed, ["1", "2"]);
    }

    #[test]
    fn signal_written_by_a_producer_is_rendered() {
        let cx = SessionContext::new();
        let source = cx.signal(0).unwrap();
        let shadow = cx.signal(0).unwrap();
        let producer = {
            let (source, shadow) = (source.clone(), shadow.clone());
            View::deferred(move || {
                shadow.set(source.get());
                View::Empty
            })
        };

        let mut renderer = Renderer::new((View::from(&shadow), producer));
        let markup = renderer.render().unwrap();
        let pending = PendingSession::new(SessionId::generate(), "/", cx, renderer, markup);
        let live = pending.attach();

        source.set(7);
        assert_eq!(live.last_rendered(), "7");
    }

    #[test]
    fn unknown_handler_is_a_protocol_error() {
        let (pending, _, _) = counter();
        let live = pending.attach();

        let err = live.dispatch("trigger$999999@onclick").unwrap_err();
        assert!(matches!(err, Error::Protocol(ProtocolError::UnknownHandler(_))));
    }

    #[test]
    fn dropping_the_session_closes_its_context() {
        let (pending, _, _) = counter();
        let context = pending.context().clone();
        let live = pending.attach();
        assert!(context.has_subscriber());

        drop(live);
        assert!(!context.is_active());
        assert!(!context.has_subscriber());
    }
}
