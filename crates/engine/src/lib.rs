//! The adapter layer between the client and the document store.
//!
//! Every user action maps onto one typed [`Engine`] operation, and every
//! operation is a handful of collection-scoped equality queries and
//! document writes against the [`docstore`] collaborator. Nothing is
//! cached here; callers refetch after each mutation.

pub use error::EngineError;
pub use ops::Engine;

mod docs;
mod error;
mod ops;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
