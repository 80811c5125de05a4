//! RDF quad store support
//!
//! This module implements an in-memory RDF dataset with support for:
//! - RDF terms (named nodes, blank nodes, literals, variables, default graph)
//! - Named graphs (quads) with pattern queries over any bound positions
//! - Pluggable term/quad factories for returned results
//! - RDF collection (`rdf:first`/`rdf:rest`) extraction
//! - Asynchronous bulk import and removal from quad streams
//!
//! # Example
//!
//! ```rust
//! use samyama_quadstore::rdf::{QuadStore, Quad, QuadPattern, NamedNode, Literal};
//!
//! let mut store = QuadStore::new();
//!
//! let quad = Quad::triple(
//!     NamedNode::new("http://example.org/alice"),
//!     NamedNode::new("http://xmlns.com/foaf/0.1/name"),
//!     Literal::new_simple_literal("Alice"),
//! );
//! store.add_quad(&quad).unwrap();
//!
//! // Query quads
//! let pattern = QuadPattern::any().with_subject(NamedNode::new("http://example.org/alice"));
//! let results = store.get_quads(&pattern);
//! assert_eq!(results.len(), 1);
//! ```

mod codec;
mod factory;
mod index;
mod lists;
mod namespace;
mod store;
mod stream;
mod types;

pub use types::{
    BlankNode, Literal, NamedNode, Quad, QuadPattern, QuadPosition, Term, TermError, TermResult,
    Variable,
};

pub use codec::{term_from_id, term_to_id};

pub use factory::{DataFactory, DefaultFactory};

pub use store::{QuadStore, StoreError, StoreResult};

pub use lists::{
    extract_lists, Collections, ExtractListsOptions, ListError, ListSource, ListViolation,
};

pub use stream::StreamSummary;

pub use namespace::{rdf, xsd};
