//! Order-preserving tuple encoding for ordered key-value stores.
//!
//! This crate provides the two pure building blocks every keyspace layer sits on:
//!
//! - **Tuple encoding**: typed values packed into byte strings whose
//!   lexicographic order matches the order of the values themselves
//! - **Subspaces**: a binary prefix plus tuple-encoded suffixes, scoping every
//!   key beneath it
//!
//! Neither module performs I/O; both are usable without an async runtime.
//!
//! # Example
//!
//! ```
//! use keyspace_tuple::{Subspace, Tuple};
//!
//! let users = Subspace::new(Tuple::new().push("users"));
//! let key = users.pack(&Tuple::new().push("alice").push(42i64));
//!
//! assert!(users.contains(&key));
//! assert_eq!(users.unpack(&key).unwrap(), Tuple::new().push("alice").push(42i64));
//! ```

mod subspace;
mod tuple;

pub use subspace::Subspace;
pub use subspace::SubspaceError;
pub use tuple::Element;
pub use tuple::Tuple;
pub use tuple::TupleError;
pub use tuple::strinc;

#[cfg(test)]
mod proptest;
