//! Like dispatch: the single-shot [`executor`] and the bounded [`fanout`]
//! built on top of it.

pub mod executor;
pub mod fanout;

pub use executor::{Executor, HttpExecutor};
pub use fanout::Dispatcher;
