//! Samyama Quad Store
//!
//! An in-memory RDF quad store: every graph keeps its quads in three
//! nested permutation indices (SPO, POS, OSP) over interned terms, so
//! pattern queries with any combination of bound positions are answered by
//! direct lookups.
//!
//! # Features
//!
//! - Add, remove and match quads, with lazy iteration and counting
//! - Distinct subjects, predicates, objects and graphs under a pattern
//! - `some`/`every` checks that stop at the first decisive quad
//! - Blank node label generation that never clashes with stored labels
//! - Results built by a pluggable [`DataFactory`]
//! - RDF collection extraction with shape validation
//! - Asynchronous bulk import and removal from `futures` streams
//! - Conversions to and from `oxrdf` terms and quads
//!
//! ## Example Usage
//!
//! ```rust
//! use samyama_quadstore::{QuadStore, Quad, QuadPattern, Term};
//!
//! let mut store = QuadStore::new();
//! store.add_quad(&Quad::new("s1", "p1", "o1", "g1")).unwrap();
//! store.add_quad(&Quad::triple("s1", "p1", "o2")).unwrap();
//!
//! // Query by subject across all graphs
//! let pattern = QuadPattern::any().with_subject("s1");
//! assert_eq!(store.count_quads(&pattern), 2);
//!
//! // Distinct graphs
//! let graphs = store.get_graphs(&QuadPattern::any());
//! assert!(graphs.contains(&Term::DefaultGraph));
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod rdf;

// Re-export main types for convenience
pub use rdf::{
    BlankNode, Literal, NamedNode, Quad, QuadPattern, QuadPosition, Term, TermError, Variable,
    DataFactory, DefaultFactory,
    QuadStore, StoreError, StoreResult,
    ExtractListsOptions, ListError, ListViolation,
    StreamSummary,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
