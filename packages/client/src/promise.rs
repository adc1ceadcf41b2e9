//! Promises settled by the event loop.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use kinesis_core::Error;

use crate::event_loop::Callback;

/// Where a promise is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromiseState {
    Pending,
    Fulfilled,
    Rejected,
}

type Reaction<T> = Box<dyn FnOnce(&Result<T, Error>)>;

struct Inner<T> {
    result: Option<Result<T, Error>>,
    reactions: Vec<Reaction<T>>,
}

/// The eventual outcome of an asynchronous call.
///
/// A promise lives on the VU thread: it is neither `Send` nor `Sync`, so only
/// the event loop that created it can settle it. Clones share state.
pub struct Promise<T> {
    inner: Rc<RefCell<Inner<T>>>,
}

impl<T> Clone for Promise<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for Promise<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Promise")
            .field("state", &self.state())
            .finish()
    }
}

impl<T> Promise<T> {
    pub(crate) fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                result: None,
                reactions: Vec::new(),
            })),
        }
    }

    pub fn state(&self) -> PromiseState {
        match &self.inner.borrow().result {
            None => PromiseState::Pending,
            Some(Ok(_)) => PromiseState::Fulfilled,
            Some(Err(_)) => PromiseState::Rejected,
        }
    }

    pub fn is_settled(&self) -> bool {
        self.inner.borrow().result.is_some()
    }
}

impl<T: Clone> Promise<T> {
    /// The settled outcome, or `None` while pending.
    pub fn result(&self) -> Option<Result<T, Error>> {
        self.inner.borrow().result.clone()
    }

    /// Run `reaction` once the promise settles.
    ///
    /// On an already settled promise the reaction runs immediately.
    pub fn on_settle<F>(&self, reaction: F)
    where
        F: FnOnce(&Result<T, Error>) + 'static,
    {
        let settled = self.inner.borrow().result.clone();
        match settled {
            Some(result) => reaction(&result),
            None => self.inner.borrow_mut().reactions.push(Box::new(reaction)),
        }
    }

    /// Record the outcome and run pending reactions. Returns `false` if the
    /// promise was already settled, in which case nothing changes.
    pub(crate) fn settle(&self, result: Result<T, Error>) -> bool {
        let reactions = {
            let mut inner = self.inner.borrow_mut();
            if inner.result.is_some() {
                return false;
            }
            inner.result = Some(result.clone());
            std::mem::take(&mut inner.reactions)
        };

        // Reactions may register more work on the promise, so no borrow is held
        for reaction in reactions {
            reaction(&result);
        }
        true
    }
}

/// The settling half of a promise.
///
/// `Send`, so it can move to a worker thread. Resolving or rejecting
/// consumes it; dropping it unused is reported by the event loop.
pub struct Resolver<T> {
    callback: Callback<Result<T, Error>>,
}

impl<T> Resolver<T> {
    pub(crate) fn new(callback: Callback<Result<T, Error>>) -> Self {
        Self { callback }
    }

    pub fn id(&self) -> u64 {
        self.callback.id()
    }
}

impl<T: Send + 'static> Resolver<T> {
    pub fn resolve(self, value: T) {
        self.callback.enqueue(Ok(value));
    }

    pub fn reject(self, error: impl Into<Error>) {
        self.callback.enqueue(Err(error.into()));
    }

    /// Resolve or reject from a `Result`.
    pub fn settle(self, result: Result<T, Error>) {
        self.callback.enqueue(result);
    }
}

impl<T> fmt::Debug for Resolver<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("id", &self.callback.id())
            .finish()
    }
}
