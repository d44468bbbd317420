//! The initial HTML document and its bootstrap script.

use super::protocol::{SEPARATOR, UPDATE};
use super::SessionId;

/// Script that opens the live connection for `id` and applies update frames
/// by replacing the whole body.
pub fn bootstrap_script(id: &SessionId) -> String {
    format!(
        concat!(
            "window.ws = new WebSocket(window.location.protocol.replace(\"http\", \"ws\") + \"//\"",
            " + window.location.host + window.location.pathname + \"?id={id}\");",
            "ws.addEventListener(\"message\", msg => {{",
            "const index = msg.data.indexOf(\"{sep}\");",
            "const action = msg.data.substring(0, index);",
            "const message = msg.data.substring(index + 1);",
            "if (action === \"{update}\") {{",
            "document.body.innerHTML = message;",
            "}}",
            "}});"
        ),
        id = id,
        sep = SEPARATOR,
        update = UPDATE,
    )
}

/// The full page: bootstrap script, CSS, and the first render in the body.
pub fn document(id: &SessionId, css: &str, markup: &str) -> String {
    format!(
        "<html lang=\"en\"><head><script>{}</script><style>{css}</style></head><body>{markup}</body></html>",
        bootstrap_script(id)
    )
}
