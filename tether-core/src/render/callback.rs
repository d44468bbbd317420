//! Callbacks attached to element attributes.
//!
//! Browser triggers carry their arguments as a JSON array. A [`Handler`] is
//! any closure of up to four arguments whose parameter types implement
//! `DeserializeOwned`; the array is checked for length and each element is
//! deserialized positionally. Handlers may return `()` or
//! `Result<(), E: Display>`.

use std::any::Any;
use std::fmt::Display;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, Result};

/// Conversion of a handler's return value into a dispatch outcome.
pub trait IntoOutcome {
    fn into_outcome(self) -> Result<()>;
}

impl IntoOutcome for () {
    fn into_outcome(self) -> Result<()> {
        Ok(())
    }
}

impl<E: Display> IntoOutcome for std::result::Result<(), E> {
    fn into_outcome(self) -> Result<()> {
        self.map_err(|err| Error::Callback(err.to_string()))
    }
}

/// A closure callable with positional JSON arguments.
///
/// `Args` is a tuple of the parameter types and only serves to tell the
/// arities apart.
pub trait Handler<Args>: Send + Sync + 'static {
    fn call(&self, args: Vec<Value>) -> Result<()>;
}

macro_rules! impl_handler {
    ($($ty:ident),*) => {
        #[allow(non_snake_case, unused_mut, unused_variables)]
        impl<Func, Out, $($ty,)*> Handler<($($ty,)*)> for Func
        where
            Func: Fn($($ty),*) -> Out + Send + Sync + 'static,
            Out: IntoOutcome,
            $($ty: DeserializeOwned,)*
        {
            fn call(&self, args: Vec<Value>) -> Result<()> {
                let expected = <[&str]>::len(&[$(stringify!($ty)),*]);
                if args.len() != expected {
                    return Err(Error::Arity { expected, got: args.len() });
                }

                let mut args = args.into_iter();
                $(
                    let $ty: $ty = serde_json::from_value(args.next().unwrap_or(Value::Null))?;
                )*
                (self)($($ty),*).into_outcome()
            }
        }
    };
}

impl_handler!();
impl_handler!(A);
impl_handler!(A, B);
impl_handler!(A, B, C);
impl_handler!(A, B, C, D);

/// A type-erased handler.
#[derive(Clone)]
pub struct Callback {
    handler: Arc<dyn Fn(Vec<Value>) -> Result<()> + Send + Sync>,
}

impl Callback {
    pub fn new<Args, H>(handler: H) -> Self
    where
        H: Handler<Args>,
        Args: 'static,
    {
        Self {
            handler: Arc::new(move |args| Handler::call(&handler, args)),
        }
    }

    /// Run the handler. A panic inside it is caught and reported as
    /// [`Error::Callback`].
    pub fn invoke(&self, args: Vec<Value>) -> Result<()> {
        panic::catch_unwind(AssertUnwindSafe(|| (self.handler)(args)))
            .unwrap_or_else(|payload| Err(Error::Callback(panic_message(payload))))
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("panicked: {message}")
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("panicked: {message}")
    } else {
        "panicked".to_string()
    }
}
