//! Wire Protocol
//!
//! Two text frame kinds share one WebSocket:
//!
//! ```text
//! client → server   trigger$<handler id>
//!                   trigger$<handler id>$<JSON array of arguments>
//! server → client   update$<full body markup>
//! ```
//!
//! Frames are split on `$` into at most three fields, so the argument
//! segment may itself contain `$`. Handler ids never do.

use serde_json::Value;

use crate::error::ProtocolError;

/// Action name of client trigger frames.
pub const TRIGGER: &str = "trigger";

/// Action name of server content frames.
pub const UPDATE: &str = "update";

/// Field separator.
pub const SEPARATOR: char = '$';

/// A frame sent by the browser.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientMessage {
    Trigger {
        handler: String,
        /// `None` when the frame had no argument segment.
        args: Option<Vec<Value>>,
    },
}

impl ClientMessage {
    /// Parse a text frame.
    pub fn parse(frame: &str) -> Result<Self, ProtocolError> {
        let mut fields = frame.splitn(3, SEPARATOR);
        let action = fields.next().unwrap_or_default();
        let Some(handler) = fields.next() else {
            return Err(ProtocolError::Malformed(frame.to_owned()));
        };

        if action != TRIGGER {
            return Err(ProtocolError::UnknownAction(action.to_owned()));
        }
        if handler.is_empty() {
            return Err(ProtocolError::Malformed(frame.to_owned()));
        }

        let args = match fields.next() {
            None => None,
            Some(segment) => Some(
                serde_json::from_str::<Vec<Value>>(segment)
                    .map_err(|_| ProtocolError::Malformed(frame.to_owned()))?,
            ),
        };

        Ok(ClientMessage::Trigger {
            handler: handler.to_owned(),
            args,
        })
    }
}

/// A frame sent to the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    /// Replace the document body.
    Update(String),
}

impl ServerMessage {
    pub fn encode(&self) -> String {
        match self {
            ServerMessage::Update(markup) => {
                let mut frame = String::with_capacity(UPDATE.len() + 1 + markup.len());
                frame.push_str(UPDATE);
                frame.push(SEPARATOR);
                frame.push_str(markup);
                frame
            }
        }
    }
}
