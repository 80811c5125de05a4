//! Term codec
//!
//! Converts terms to and from canonical string ids, and interns those ids
//! as dense entity numbers so the permutation indices only ever hash
//! integers.
//!
//! Canonical ids:
//! - named node: the IRI, or `<IRI>` when the IRI is empty or starts with
//!   one of `_ " ? <`
//! - blank node: `_:label`
//! - literal: `"value"`, then `@lang`, or `^^datatype` unless `xsd:string`
//! - variable: `?name`
//! - default graph: the empty string

use super::namespace::xsd;
use super::types::{BlankNode, Literal, NamedNode, Term, Variable};
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Dense number assigned to a canonical id
pub(crate) type EntityId = usize;

/// Canonical id of a term
pub fn term_to_id(term: &Term) -> String {
    match term {
        Term::NamedNode(n) => {
            let iri = n.as_str();
            if is_ambiguous_iri(iri) {
                format!("<{}>", iri)
            } else {
                iri.to_owned()
            }
        }
        Term::BlankNode(b) => format!("_:{}", b.as_str()),
        Term::Literal(l) => {
            let mut id = format!("\"{}\"", l.value());
            if let Some(language) = l.language() {
                id.push('@');
                id.push_str(language);
            } else if l.datatype().as_str() != xsd::STRING {
                id.push_str("^^");
                id.push_str(l.datatype().as_str());
            }
            id
        }
        Term::Variable(v) => format!("?{}", v.as_str()),
        Term::DefaultGraph => String::new(),
    }
}

/// Term for a canonical id
///
/// Every string decodes to some term, so this doubles as the reader for
/// plain string labels supplied by callers.
pub fn term_from_id(id: &str) -> Term {
    let Some(&first) = id.as_bytes().first() else {
        return Term::DefaultGraph;
    };

    match first {
        b'_' if id.starts_with("_:") => Term::BlankNode(BlankNode::new(&id[2..])),
        b'?' => Term::Variable(Variable::new(&id[1..])),
        b'"' => Term::Literal(literal_from_id(id)),
        b'<' if id.len() >= 2 && id.ends_with('>') => {
            Term::NamedNode(NamedNode::new(&id[1..id.len() - 1]))
        }
        _ => Term::NamedNode(NamedNode::new(id)),
    }
}

/// Whether the canonical id of `term` decodes back to it
///
/// A literal's value runs up to the last quote of its id, which only holds
/// when neither the language tag nor the datatype IRI contains a quote.
pub(crate) fn is_encodable(term: &Term) -> bool {
    match term {
        Term::Literal(l) => {
            !l.language().is_some_and(|language| language.contains('"'))
                && !l.datatype().as_str().contains('"')
        }
        _ => true,
    }
}

fn is_ambiguous_iri(iri: &str) -> bool {
    matches!(
        iri.as_bytes().first(),
        None | Some(b'_' | b'"' | b'?' | b'<')
    )
}

// The value ends at the last quote, see `is_encodable`
fn literal_from_id(id: &str) -> Literal {
    let end = match id.rfind('"') {
        Some(end) if end > 0 => end,
        _ => return Literal::new_simple_literal(&id[1..]),
    };
    let value = &id[1..end];
    let suffix = &id[end + 1..];

    if let Some(language) = suffix.strip_prefix('@') {
        Literal::new_language_tagged_literal(value, language)
    } else if let Some(datatype) = suffix.strip_prefix("^^") {
        Literal::new_typed_literal(value, NamedNode::new(datatype))
    } else {
        Literal::new_simple_literal(value)
    }
}

/// Per-store entity dictionary and blank node generator
#[derive(Debug, Clone, Default)]
pub(crate) struct TermCodec {
    /// Canonical id -> entity
    ids: FxHashMap<Arc<str>, EntityId>,

    /// Entity -> canonical id
    entities: Vec<Arc<str>>,

    /// Next candidate for unnamed blank nodes (`b0`, `b1`, ...)
    blank_node_index: u64,
}

impl TermCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct ids seen so far
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Entity for a canonical id, allocating one on first sight
    pub fn intern(&mut self, id: &str) -> EntityId {
        if let Some(&entity) = self.ids.get(id) {
            return entity;
        }
        let entity = self.entities.len();
        let id: Arc<str> = Arc::from(id);
        self.entities.push(Arc::clone(&id));
        self.ids.insert(id, entity);
        entity
    }

    /// Entity for a canonical id, if it was ever interned
    pub fn lookup(&self, id: &str) -> Option<EntityId> {
        self.ids.get(id).copied()
    }

    /// Canonical id of an entity
    pub fn resolve(&self, entity: EntityId) -> &str {
        &self.entities[entity]
    }

    pub fn encode(&mut self, term: &Term) -> EntityId {
        self.intern(&term_to_id(term))
    }

    /// Entity of an already-known term
    ///
    /// Variables and unencodable literals never resolve: they are not
    /// storable.
    pub fn find(&self, term: &Term) -> Option<EntityId> {
        if term.is_variable() || !is_encodable(term) {
            return None;
        }
        self.lookup(&term_to_id(term))
    }

    pub fn decode(&self, entity: EntityId) -> Term {
        term_from_id(self.resolve(entity))
    }

    /// Mint a blank node label that no id in this store uses yet
    ///
    /// Without a suggestion labels run `b0, b1, ...`; with one they run
    /// `name, name1, name2, ...`. The label is reserved immediately.
    pub fn create_blank_node(&mut self, suggested: Option<&str>) -> BlankNode {
        let id = match suggested.filter(|name| !name.is_empty()) {
            Some(name) => {
                let base = format!("_:{}", name);
                let mut candidate = base.clone();
                let mut index = 1u64;
                while self.ids.contains_key(candidate.as_str()) {
                    candidate = format!("{}{}", base, index);
                    index += 1;
                }
                candidate
            }
            None => loop {
                let candidate = format!("_:b{}", self.blank_node_index);
                self.blank_node_index += 1;
                if !self.ids.contains_key(candidate.as_str()) {
                    break candidate;
                }
            },
        };

        self.intern(&id);
        BlankNode::new(&id[2..])
    }
}
