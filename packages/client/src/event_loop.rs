//! The per-VU event loop.
//!
//! Worker threads never touch script state. They finish their call, then
//! hand the outcome to a [`Callback`], which queues it on the loop's channel.
//! The loop runs on the VU thread and dispatches queued completions one at a
//! time, in the order they were enqueued.
//!
//! ```ignore
//! let event_loop = EventLoop::new();
//! event_loop.start(|| {
//!     let (promise, resolver) = event_loop.register_pending::<u32>();
//!     std::thread::spawn(move || resolver.resolve(42));
//!     promise.on_settle(|result| println!("{:?}", result));
//!     Ok::<_, String>(())
//! })?;
//! ```

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

use kinesis_core::Error;
use tokio::sync::mpsc;

use crate::error::{LoopError, Result};
use crate::promise::{Promise, Resolver};

type Payload = Box<dyn Any + Send>;

/// Loop-local completion. Never leaves the VU thread, so it may capture
/// promises and other `!Send` state.
type Completion = Box<dyn FnOnce(Payload) -> Result<()>>;

enum Message {
    Complete { id: u64, payload: Payload },
    Abandoned { id: u64 },
}

/// Queues completions and runs them on the VU thread.
pub struct EventLoop {
    sender: mpsc::UnboundedSender<Message>,
    receiver: RefCell<mpsc::UnboundedReceiver<Message>>,
    pending: RefCell<HashMap<u64, Completion>>,
    next_id: Cell<u64>,
}

impl EventLoop {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            sender,
            receiver: RefCell::new(receiver),
            pending: RefCell::new(HashMap::new()),
            next_id: Cell::new(0),
        }
    }

    /// Register a pending call.
    ///
    /// `on_complete` runs on the loop thread once the returned callback is
    /// enqueued. Until then the call keeps the loop alive.
    pub fn register_callback<P, F>(&self, on_complete: F) -> Callback<P>
    where
        P: Send + 'static,
        F: FnOnce(P) + 'static,
    {
        let id = self.next_id.get();
        self.next_id.set(id + 1);

        let completion: Completion = Box::new(move |payload: Payload| {
            let payload = payload
                .downcast::<P>()
                .map_err(|_| LoopError::PayloadMismatch { id })?;
            on_complete(*payload);
            Ok(())
        });
        self.pending.borrow_mut().insert(id, completion);

        tracing::debug!(id, "registered pending call");

        Callback {
            id,
            sender: Some(self.sender.clone()),
            _payload: PhantomData,
        }
    }

    /// Register a pending call that settles a promise.
    pub fn register_pending<T>(&self) -> (Promise<T>, Resolver<T>)
    where
        T: Clone + Send + 'static,
    {
        let promise = Promise::new();
        let settling = promise.clone();
        let callback = self.register_callback(move |result: std::result::Result<T, Error>| {
            settling.settle(result);
        });
        (promise, Resolver::new(callback))
    }

    /// Number of registered calls that have not completed.
    pub fn pending_count(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Run `first`, then dispatch completions until nothing is pending.
    ///
    /// Completions may register further calls; the loop keeps going until
    /// the last one has run. A failing first step or completion does not cut
    /// the loop short: every registered call is still dispatched, and the
    /// first error is returned once none are outstanding.
    pub fn start<F, E>(&self, first: F) -> Result<()>
    where
        F: FnOnce() -> std::result::Result<(), E>,
        E: fmt::Display,
    {
        let outcome = first().map_err(|e| LoopError::Script(e.to_string()));
        let drained = self.wait_on_registered();
        outcome.and(drained)
    }

    /// Block until every registered call has been dispatched.
    ///
    /// Returns the first dispatch error, if any, after the last call ran.
    pub fn wait_on_registered(&self) -> Result<()> {
        let mut outcome = Ok(());
        while self.pending_count() > 0 {
            // The loop holds a sender, so the channel never closes here
            let Some(message) = self.receiver.borrow_mut().blocking_recv() else {
                break;
            };
            if let Err(error) = self.dispatch(message) {
                if outcome.is_ok() {
                    outcome = Err(error);
                }
            }
        }
        outcome
    }

    /// Dispatch the completions already queued without waiting for more.
    /// Returns how many ran.
    pub fn run_ready(&self) -> Result<usize> {
        let mut ran = 0;
        loop {
            let message = match self.receiver.borrow_mut().try_recv() {
                Ok(message) => message,
                Err(_) => break,
            };
            self.dispatch(message)?;
            ran += 1;
        }
        Ok(ran)
    }

    fn dispatch(&self, message: Message) -> Result<()> {
        match message {
            Message::Complete { id, payload } => {
                let completion = self.pending.borrow_mut().remove(&id);
                match completion {
                    Some(completion) => {
                        tracing::debug!(id, "dispatching completion");
                        completion(payload)
                    }
                    None => {
                        tracing::warn!(id, "completion for unknown callback");
                        Err(LoopError::UnknownCall { id })
                    }
                }
            }
            Message::Abandoned { id } => {
                self.pending.borrow_mut().remove(&id);
                tracing::warn!(id, "callback dropped without completing");
                Err(LoopError::CallbackAbandoned { id })
            }
        }
    }
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventLoop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventLoop")
            .field("pending", &self.pending_count())
            .finish()
    }
}

/// A one-shot handle for completing a registered call from any thread.
pub struct Callback<P> {
    id: u64,
    sender: Option<mpsc::UnboundedSender<Message>>,
    _payload: PhantomData<fn(P)>,
}

impl<P: Send + 'static> Callback<P> {
    /// Queue `payload` for the loop thread.
    pub fn enqueue(mut self, payload: P) {
        if let Some(sender) = self.sender.take() {
            let message = Message::Complete {
                id: self.id,
                payload: Box::new(payload),
            };
            if sender.send(message).is_err() {
                tracing::debug!(id = self.id, "event loop gone, completion discarded");
            }
        }
    }
}

impl<P> Callback<P> {
    pub fn id(&self) -> u64 {
        self.id
    }

    fn abandon(&mut self) {
        if let Some(sender) = self.sender.take() {
            let _ = sender.send(Message::Abandoned { id: self.id });
        }
    }
}

impl<P> Drop for Callback<P> {
    fn drop(&mut self) {
        self.abandon();
    }
}

impl<P> fmt::Debug for Callback<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callback").field("id", &self.id).finish()
    }
}
