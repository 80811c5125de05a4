//! RDF collection extraction
//!
//! Finds every `rdf:first`/`rdf:rest` chain ending in `rdf:nil`, validates
//! its shape and returns the members in order, keyed by the list's head
//! node. The walk starts at each tail and follows the single incoming
//! `rdf:rest` arc backwards until it reaches the node that is referenced
//! from outside the list.
//!
//! A list node must:
//! - have exactly one `rdf:first` and at most one `rdf:rest` arc
//! - keep all of its outgoing arcs in the list's graph
//! - be the object of at most one `rdf:rest` arc
//! - carry no other arcs, except the head, which may be referenced once
//!   either as a subject or as an object, never both

use super::namespace::rdf;
use super::types::{NamedNode, Quad, QuadPattern, Term};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Shape rule broken by a list node
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListViolation {
    #[error("has no list head")]
    NoListHead,

    #[error("has multiple rdf:first arcs")]
    MultipleFirst,

    #[error("has multiple rdf:rest arcs")]
    MultipleRest,

    #[error("not confined to single graph")]
    NotConfinedToSingleGraph,

    #[error("has non-list arcs out")]
    NonListArcsOut,

    #[error("can't be subject and object")]
    SubjectAndObject,

    #[error("has incoming rdf:rest arcs")]
    IncomingRest,

    #[error("can't have coreferences")]
    Coreferences,
}

/// Malformed list, reported at the offending node
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{} {}", .node.value(), .violation)]
pub struct ListError {
    pub node: Term,
    pub violation: ListViolation,
}

/// Options for [`extract_lists`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExtractListsOptions {
    /// Delete the structural `rdf:first`/`rdf:rest` quads of extracted lists
    pub remove: bool,

    /// Skip malformed lists instead of failing
    pub ignore_errors: bool,
}

impl ExtractListsOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_remove(mut self, remove: bool) -> Self {
        self.remove = remove;
        self
    }

    pub fn with_ignore_errors(mut self, ignore_errors: bool) -> Self {
        self.ignore_errors = ignore_errors;
        self
    }
}

/// List members keyed by head node
pub type Collections = IndexMap<Term, Vec<Term>>;

/// Read and delete access the extractor needs
pub trait ListSource {
    /// All quads matching a pattern
    fn read_quads(&self, pattern: &QuadPattern) -> Vec<Quad>;

    /// Delete the given quads, skipping absent ones
    fn delete_quads(&mut self, quads: &[Quad]);
}

/// A list walked from its tail
#[derive(Debug, Default)]
struct Walk {
    /// None when nothing outside the list refers to it
    head: Option<Term>,
    members: Vec<Term>,
    arcs: Vec<Quad>,
}

/// Extract the well-formed lists of `source`
///
/// Without `ignore_errors` the first malformed list aborts the extraction
/// and nothing is removed. With it, malformed lists are logged, left in
/// place and missing from the result. Lists that nothing refers to are not
/// returned, but their structure is still removed under `remove`.
pub fn extract_lists<S: ListSource + ?Sized>(
    source: &mut S,
    options: ExtractListsOptions,
) -> Result<Collections, ListError> {
    let tails = source.read_quads(
        &QuadPattern::any()
            .with_predicate(NamedNode::new(rdf::REST))
            .with_object(NamedNode::new(rdf::NIL)),
    );

    let mut lists = Collections::new();
    let mut structure = Vec::new();
    for tail in &tails {
        match walk_list(&*source, tail) {
            Ok(walk) => {
                if let Some(head) = walk.head {
                    lists.insert(head, walk.members);
                }
                structure.extend(walk.arcs);
            }
            Err(error) if options.ignore_errors => {
                warn!("Skipping malformed list: {}", error);
            }
            Err(error) => return Err(error),
        }
    }

    if options.remove && !structure.is_empty() {
        debug!("Removing {} list quads", structure.len());
        source.delete_quads(&structure);
    }

    debug!("Extracted {} lists from {} tails", lists.len(), tails.len());
    Ok(lists)
}

fn walk_list<S: ListSource + ?Sized>(source: &S, tail: &Quad) -> Result<Walk, ListError> {
    let graph = &tail.graph;
    let mut walk = Walk::default();
    let mut current = Some(tail.subject.clone());

    while let Some(node) = current.take() {
        let fail = |violation| ListError {
            node: node.clone(),
            violation,
        };
        let outgoing = source.read_quads(&QuadPattern::any().with_subject(node.clone()));
        let incoming = source.read_quads(&QuadPattern::any().with_object(node.clone()));

        let mut first: Option<Quad> = None;
        let mut rest: Option<Quad> = None;
        let mut parent: Option<Quad> = None;
        let mut referenced = false;

        for quad in outgoing {
            if &quad.graph != graph {
                return Err(fail(ListViolation::NotConfinedToSingleGraph));
            }
            if quad.predicate.is_iri(rdf::FIRST) {
                if first.replace(quad).is_some() {
                    return Err(fail(ListViolation::MultipleFirst));
                }
            } else if quad.predicate.is_iri(rdf::REST) {
                if rest.replace(quad).is_some() {
                    return Err(fail(ListViolation::MultipleRest));
                }
            } else if !incoming.is_empty() {
                return Err(fail(ListViolation::SubjectAndObject));
            } else if referenced {
                return Err(fail(ListViolation::NonListArcsOut));
            } else {
                referenced = true;
            }
        }

        for quad in incoming {
            if referenced {
                return Err(fail(ListViolation::Coreferences));
            }
            if quad.predicate.is_iri(rdf::REST) {
                if parent.replace(quad).is_some() {
                    return Err(fail(ListViolation::IncomingRest));
                }
            } else {
                referenced = true;
            }
        }

        if referenced && parent.is_some() {
            return Err(fail(ListViolation::Coreferences));
        }
        let Some(first) = first else {
            return Err(fail(ListViolation::NoListHead));
        };

        walk.members.push(first.object.clone());
        walk.arcs.push(first);
        walk.arcs.extend(rest);

        if referenced {
            walk.head = Some(node);
        } else {
            current = parent.map(|quad| quad.subject);
        }
    }

    walk.members.reverse();
    Ok(walk)
}
