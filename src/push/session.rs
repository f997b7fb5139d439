use crate::types::push::VapidPublicKey;

use std::cell::{Cell, RefCell};

/// State that lives as long as one page load: the worker registration, the
/// server key and whether the user refused notifications. A reload starts
/// from an empty session.
#[derive(Debug)]
pub struct Session<R> {
    registration: RefCell<Option<R>>,
    public_key: RefCell<Option<VapidPublicKey>>,
    permission_denied: Cell<bool>,
}

impl<R> Default for Session<R> {
    fn default() -> Self {
        Self {
            registration: RefCell::new(None),
            public_key: RefCell::new(None),
            permission_denied: Cell::new(false),
        }
    }
}

impl<R> Session<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn public_key(&self) -> Option<VapidPublicKey> {
        self.public_key.borrow().clone()
    }

    pub(crate) fn store_public_key(&self, key: VapidPublicKey) {
        *self.public_key.borrow_mut() = Some(key);
    }

    pub fn permission_denied(&self) -> bool {
        self.permission_denied.get()
    }

    pub(crate) fn record_denial(&self) {
        self.permission_denied.set(true);
    }

    pub fn has_registration(&self) -> bool {
        self.registration.borrow().is_some()
    }

    pub(crate) fn store_registration(&self, registration: R) {
        *self.registration.borrow_mut() = Some(registration);
    }

    pub fn reset(&self) {
        self.registration.borrow_mut().take();
        self.public_key.borrow_mut().take();
        self.permission_denied.set(false);
    }
}

impl<R: Clone> Session<R> {
    pub fn registration(&self) -> Option<R> {
        self.registration.borrow().clone()
    }
}
