//! Term and quad factories
//!
//! A store hands every term and quad it returns to a factory, so callers can
//! receive their own representation instead of [`Term`] and [`Quad`]. The
//! factory only ever sees primitive string values.

use super::types::{BlankNode, Literal, NamedNode, Quad, Term, Variable};

/// Constructors a store needs to build its results
pub trait DataFactory {
    /// Representation of a single term
    type Term: Clone;

    /// Representation of a quad
    type Quad;

    fn named_node(&self, iri: &str) -> Self::Term;

    /// `label` is given without the `_:` prefix
    fn blank_node(&self, label: &str) -> Self::Term;

    /// `language` is empty for literals without a language tag
    fn literal(&self, value: &str, language: &str, datatype: &str) -> Self::Term;

    fn variable(&self, name: &str) -> Self::Term;

    fn default_graph(&self) -> Self::Term;

    fn quad(
        &self,
        subject: Self::Term,
        predicate: Self::Term,
        object: Self::Term,
        graph: Self::Term,
    ) -> Self::Quad;

    /// Rebuild a term through the constructors above
    fn term(&self, term: &Term) -> Self::Term {
        match term {
            Term::NamedNode(n) => self.named_node(n.as_str()),
            Term::BlankNode(b) => self.blank_node(b.as_str()),
            Term::Literal(l) => {
                self.literal(l.value(), l.language().unwrap_or(""), l.datatype().as_str())
            }
            Term::Variable(v) => self.variable(v.as_str()),
            Term::DefaultGraph => self.default_graph(),
        }
    }
}

/// Factory producing this crate's own [`Term`] and [`Quad`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultFactory;

impl DataFactory for DefaultFactory {
    type Term = Term;
    type Quad = Quad;

    fn named_node(&self, iri: &str) -> Term {
        NamedNode::new(iri).into()
    }

    fn blank_node(&self, label: &str) -> Term {
        BlankNode::new(label).into()
    }

    fn literal(&self, value: &str, language: &str, datatype: &str) -> Term {
        if language.is_empty() {
            Literal::new_typed_literal(value, NamedNode::new(datatype)).into()
        } else {
            Literal::new_language_tagged_literal(value, language).into()
        }
    }

    fn variable(&self, name: &str) -> Term {
        Variable::new(name).into()
    }

    fn default_graph(&self) -> Term {
        Term::DefaultGraph
    }

    fn quad(&self, subject: Term, predicate: Term, object: Term, graph: Term) -> Quad {
        Quad {
            subject,
            predicate,
            object,
            graph,
        }
    }

    fn term(&self, term: &Term) -> Term {
        term.clone()
    }
}
