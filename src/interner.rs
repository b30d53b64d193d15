use std::cell::RefCell;
use std::fmt::{self, Display};

use lasso::{Rodeo, Spur};

thread_local!(static INTERNER: RefCell<Rodeo<Spur>> = RefCell::new(Rodeo::default()));

/// A cheap, copyable handle to a string stored in the thread-local interner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct InternedString(Spur);

impl InternedString {
    pub fn intern<T: AsRef<str>>(s: T) -> Self {
        Self(INTERNER.with(|i| i.borrow_mut().get_or_intern(s)))
    }

    #[allow(dead_code)]
    pub fn resolve(self) -> String {
        INTERNER.with(|i| i.borrow().resolve(&self.0).to_owned())
    }

    pub fn resolve_ref<'a>(self) -> &'a str {
        // The interner is append-only and thread-local, so resolved strings
        // live until thread exit.
        unsafe { INTERNER.with(|i| i.as_ptr().as_ref().unwrap().resolve(&self.0)) }
    }
}

impl Display for InternedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        INTERNER.with(|i| write!(f, "{}", i.borrow().resolve(&self.0)))
    }
}
