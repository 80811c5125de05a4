//! RDF quad store implementation
//!
//! This module provides the in-memory quad store facade: it interns terms
//! through the codec, keeps the permutation indices in sync and rebuilds
//! results through the store's [`DataFactory`].

use super::codec::{self, EntityId, TermCodec};
use super::factory::{DataFactory, DefaultFactory};
use super::index::{EncodedPattern, EncodedQuad, QuadIndex};
use super::lists::{self, ExtractListsOptions, ListError, ListSource};
use super::types::{BlankNode, Quad, QuadPattern, QuadPosition, Term};
use indexmap::IndexMap;
use std::borrow::Borrow;
use thiserror::Error;
use tracing::{debug, trace};

/// Quad store errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// Variables only ever appear in patterns
    #[error("Variable {term} cannot be stored as {position}")]
    VariableNotStorable {
        term: String,
        position: QuadPosition,
    },

    /// The default graph marker outside the graph position
    #[error("The default graph cannot be stored as {0}")]
    MisplacedDefaultGraph(QuadPosition),

    /// A literal whose language tag or datatype IRI contains a quote
    #[error("Literal {0} has a quote in its language tag or datatype")]
    UnencodableLiteral(String),

    /// Malformed RDF collection
    #[error(transparent)]
    List(#[from] ListError),

    /// Bulk import source failure
    #[error(transparent)]
    Stream(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

fn check_storable(quad: &Quad) -> StoreResult<()> {
    for position in [
        QuadPosition::Subject,
        QuadPosition::Predicate,
        QuadPosition::Object,
        QuadPosition::Graph,
    ] {
        match quad.get(position) {
            Term::Variable(v) => {
                return Err(StoreError::VariableNotStorable {
                    term: v.to_string(),
                    position,
                })
            }
            Term::DefaultGraph if position != QuadPosition::Graph => {
                return Err(StoreError::MisplacedDefaultGraph(position))
            }
            term if !codec::is_encodable(term) => {
                return Err(StoreError::UnencodableLiteral(term.to_string()))
            }
            _ => {}
        }
    }
    Ok(())
}

/// In-memory RDF quad store
///
/// Quads live in one partition per graph, each indexed three times
/// (SPO, POS, OSP) so that any combination of bound positions is answered
/// by direct lookups followed by a scan over at most one dimension.
///
/// Results are built by the store's factory; [`DefaultFactory`] returns
/// [`Term`] and [`Quad`].
///
/// Pattern arguments accept plain string labels wherever a [`Term`] is
/// expected (see [`Term::from_id`]).
#[derive(Debug, Clone)]
pub struct QuadStore<F = DefaultFactory> {
    /// Graph partitions and their permutation indices
    index: QuadIndex,

    /// Term <-> entity dictionary and blank node generator
    codec: TermCodec,

    /// Builds returned terms and quads
    factory: F,
}

impl QuadStore {
    /// Create a new empty store producing native terms
    pub fn new() -> Self {
        Self::with_factory(DefaultFactory)
    }

    /// Create a store holding the given quads
    pub fn from_quads<I>(quads: I) -> StoreResult<Self>
    where
        I: IntoIterator,
        I::Item: Borrow<Quad>,
    {
        let mut store = Self::new();
        store.add_quads(quads)?;
        Ok(store)
    }
}

impl Default for QuadStore {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: DataFactory> QuadStore<F> {
    /// Create a new empty store returning results built by `factory`
    pub fn with_factory(factory: F) -> Self {
        Self {
            index: QuadIndex::new(),
            codec: TermCodec::new(),
            factory,
        }
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// Number of quads in the store
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Add a quad
    ///
    /// Returns `Ok(false)` when the quad was already present.
    pub fn add_quad(&mut self, quad: &Quad) -> StoreResult<bool> {
        check_storable(quad)?;

        let encoded = EncodedQuad {
            subject: self.codec.encode(&quad.subject),
            predicate: self.codec.encode(&quad.predicate),
            object: self.codec.encode(&quad.object),
            graph: self.codec.encode(&quad.graph),
        };
        let added = self.index.insert(encoded);
        if added {
            trace!("Added quad {}", quad);
        }
        Ok(added)
    }

    /// Add quads one by one
    ///
    /// Stops at the first quad that cannot be stored; the quads before it
    /// stay added.
    pub fn add_quads<I>(&mut self, quads: I) -> StoreResult<()>
    where
        I: IntoIterator,
        I::Item: Borrow<Quad>,
    {
        let before = self.len();
        for quad in quads {
            self.add_quad(quad.borrow())?;
        }
        debug!("Added {} quads, store size {}", self.len() - before, self.len());
        Ok(())
    }

    /// Remove a quad
    ///
    /// Returns false when the quad was not present.
    pub fn remove_quad(&mut self, quad: &Quad) -> bool {
        let Some(encoded) = self.find_quad(quad) else {
            return false;
        };
        let removed = self.index.remove(encoded);
        if removed {
            trace!("Removed quad {}", quad);
        }
        removed
    }

    /// Remove quads one by one, skipping absent ones
    pub fn remove_quads<I>(&mut self, quads: I)
    where
        I: IntoIterator,
        I::Item: Borrow<Quad>,
    {
        let before = self.len();
        for quad in quads {
            self.remove_quad(quad.borrow());
        }
        debug!("Removed {} quads, store size {}", before - self.len(), self.len());
    }

    /// Check if a quad exists in the store
    pub fn contains(&self, quad: &Quad) -> bool {
        self.find_quad(quad)
            .is_some_and(|encoded| self.index.contains(encoded))
    }

    /// Remove every quad matching a pattern, returning the removed quads
    pub fn remove_matches(&mut self, pattern: &QuadPattern) -> Vec<F::Quad> {
        let Some(encoded) = self.encode_pattern(pattern) else {
            return Vec::new();
        };
        let matched: Vec<EncodedQuad> = self.index.matches(encoded).collect();
        for quad in &matched {
            self.index.remove(*quad);
        }
        debug!("Removed {} matching quads", matched.len());

        matched
            .into_iter()
            .map(|quad| self.decode_quad(quad))
            .collect()
    }

    /// Remove every quad of a graph, returning the removed quads
    pub fn delete_graph(&mut self, graph: impl Into<Term>) -> Vec<F::Quad> {
        self.remove_matches(&QuadPattern::any().with_graph(graph))
    }

    /// Remove all quads
    ///
    /// Blank node labels minted so far stay reserved.
    pub fn clear(&mut self) {
        debug!(
            "Clearing {} quads in {} graphs ({} known terms)",
            self.index.len(),
            self.index.graph_count(),
            self.codec.len()
        );
        self.index.clear();
    }

    /// Lazily iterate the quads matching a pattern
    pub fn quads<'a>(&'a self, pattern: &QuadPattern) -> impl Iterator<Item = F::Quad> + 'a {
        self.encode_pattern(pattern)
            .into_iter()
            .flat_map(move |encoded| self.index.matches(encoded))
            .map(move |quad| self.decode_quad(quad))
    }

    /// Query quads matching a pattern
    pub fn get_quads(&self, pattern: &QuadPattern) -> Vec<F::Quad> {
        self.quads(pattern).collect()
    }

    /// Count quads matching a pattern
    pub fn count_quads(&self, pattern: &QuadPattern) -> usize {
        self.encode_pattern(pattern)
            .map_or(0, |encoded| self.index.count(encoded))
    }

    /// Call `callback` with each quad matching a pattern
    pub fn for_each(&self, pattern: &QuadPattern, callback: impl FnMut(F::Quad)) {
        self.quads(pattern).for_each(callback);
    }

    /// Whether some quad matching the pattern satisfies `predicate`
    ///
    /// Stops at the first quad that does.
    pub fn some(&self, pattern: &QuadPattern, mut predicate: impl FnMut(&F::Quad) -> bool) -> bool {
        self.quads(pattern).any(|quad| predicate(&quad))
    }

    /// Whether every quad matching the pattern satisfies `predicate`
    ///
    /// Stops at the first quad that does not. An empty match set yields
    /// false, not vacuous truth.
    pub fn every(&self, pattern: &QuadPattern, mut predicate: impl FnMut(&F::Quad) -> bool) -> bool {
        let mut matched = false;
        let all = self.quads(pattern).all(|quad| {
            matched = true;
            predicate(&quad)
        });
        matched && all
    }

    /// Distinct subjects of the quads matching `pattern`
    ///
    /// The pattern's own subject is ignored, as are the positions of the
    /// other distinct-value operations.
    pub fn get_subjects(&self, pattern: &QuadPattern) -> Vec<F::Term> {
        self.distinct(QuadPosition::Subject, pattern)
    }

    pub fn get_predicates(&self, pattern: &QuadPattern) -> Vec<F::Term> {
        self.distinct(QuadPosition::Predicate, pattern)
    }

    pub fn get_objects(&self, pattern: &QuadPattern) -> Vec<F::Term> {
        self.distinct(QuadPosition::Object, pattern)
    }

    /// Distinct graphs holding quads that match `pattern`
    pub fn get_graphs(&self, pattern: &QuadPattern) -> Vec<F::Term> {
        self.distinct(QuadPosition::Graph, pattern)
    }

    pub fn for_subjects(&self, pattern: &QuadPattern, callback: impl FnMut(F::Term)) {
        self.get_subjects(pattern).into_iter().for_each(callback);
    }

    pub fn for_predicates(&self, pattern: &QuadPattern, callback: impl FnMut(F::Term)) {
        self.get_predicates(pattern).into_iter().for_each(callback);
    }

    pub fn for_objects(&self, pattern: &QuadPattern, callback: impl FnMut(F::Term)) {
        self.get_objects(pattern).into_iter().for_each(callback);
    }

    pub fn for_graphs(&self, pattern: &QuadPattern, callback: impl FnMut(F::Term)) {
        self.get_graphs(pattern).into_iter().for_each(callback);
    }

    /// Create a blank node whose label is unused in this store
    ///
    /// Unnamed nodes are labelled `b0, b1, ...`; a suggested name is used
    /// as is the first time and suffixed `1, 2, ...` afterwards.
    pub fn create_blank_node(&mut self, suggested: Option<&str>) -> BlankNode {
        self.codec.create_blank_node(suggested)
    }

    /// Extract the RDF collections held in the store
    ///
    /// Returns the members of every well-formed list, keyed by the list's
    /// head node. See [`lists::extract_lists`] for the validation rules.
    pub fn extract_lists(
        &mut self,
        options: ExtractListsOptions,
    ) -> StoreResult<IndexMap<Term, Vec<F::Term>>> {
        let collections = lists::extract_lists(self, options)?;
        Ok(collections
            .into_iter()
            .map(|(head, members)| {
                let members = members.iter().map(|m| self.factory.term(m)).collect();
                (head, members)
            })
            .collect())
    }

    // Private helper methods

    fn distinct(&self, position: QuadPosition, pattern: &QuadPattern) -> Vec<F::Term> {
        let pattern = pattern.clone().without(position);
        let Some(encoded) = self.encode_pattern(&pattern) else {
            return Vec::new();
        };
        self.index
            .distinct(position, encoded)
            .into_iter()
            .map(|entity| self.decode_term(entity))
            .collect()
    }

    /// Resolve bound pattern terms; None when one was never stored
    fn encode_pattern(&self, pattern: &QuadPattern) -> Option<EncodedPattern> {
        Some(EncodedPattern {
            subject: self.find_bound(pattern.subject.as_ref())?,
            predicate: self.find_bound(pattern.predicate.as_ref())?,
            object: self.find_bound(pattern.object.as_ref())?,
            graph: self.find_bound(pattern.graph.as_ref())?,
        })
    }

    fn find_bound(&self, term: Option<&Term>) -> Option<Option<EntityId>> {
        match term {
            None => Some(None),
            Some(term) => self.codec.find(term).map(Some),
        }
    }

    fn find_quad(&self, quad: &Quad) -> Option<EncodedQuad> {
        Some(EncodedQuad {
            subject: self.codec.find(&quad.subject)?,
            predicate: self.codec.find(&quad.predicate)?,
            object: self.codec.find(&quad.object)?,
            graph: self.codec.find(&quad.graph)?,
        })
    }

    fn decode_term(&self, entity: EntityId) -> F::Term {
        self.factory.term(&self.codec.decode(entity))
    }

    fn decode_quad(&self, quad: EncodedQuad) -> F::Quad {
        self.factory.quad(
            self.decode_term(quad.subject),
            self.decode_term(quad.predicate),
            self.decode_term(quad.object),
            self.decode_term(quad.graph),
        )
    }

    fn native_quad(&self, quad: EncodedQuad) -> Quad {
        Quad {
            subject: self.codec.decode(quad.subject),
            predicate: self.codec.decode(quad.predicate),
            object: self.codec.decode(quad.object),
            graph: self.codec.decode(quad.graph),
        }
    }
}

impl<F: DataFactory> ListSource for QuadStore<F> {
    fn read_quads(&self, pattern: &QuadPattern) -> Vec<Quad> {
        match self.encode_pattern(pattern) {
            Some(encoded) => self
                .index
                .matches(encoded)
                .map(|quad| self.native_quad(quad))
                .collect(),
            None => Vec::new(),
        }
    }

    fn delete_quads(&mut self, quads: &[Quad]) {
        self.remove_quads(quads);
    }
}
