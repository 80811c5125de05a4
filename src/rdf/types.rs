//! RDF term and quad definitions
//!
//! The store keeps its own term algebra so that relative IRIs and query
//! variables can flow through it unvalidated. Conversions to and from the
//! oxrdf primitives are provided at the bottom of this module.

use super::codec;
use super::namespace::{rdf, xsd};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Term errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TermError {
    /// Invalid IRI
    #[error("Invalid IRI: {0}")]
    InvalidIri(String),

    /// RDF-star quoted triple
    #[error("Quoted triples are not supported")]
    QuotedTriple,

    /// Term has no counterpart at this position in plain RDF
    #[error("{term} cannot be used as {position}")]
    NotRepresentable {
        term: String,
        position: QuadPosition,
    },
}

pub type TermResult<T> = Result<T, TermError>;

/// Named node (IRI)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NamedNode {
    value: String,
}

impl NamedNode {
    /// Create a named node without validating the IRI
    ///
    /// Relative IRIs such as `s1` are accepted.
    pub fn new(iri: impl Into<String>) -> Self {
        Self { value: iri.into() }
    }

    /// Create a named node from an absolute IRI, validating its syntax
    pub fn new_checked(iri: &str) -> TermResult<Self> {
        oxrdf::NamedNode::new(iri)
            .map(Self::from)
            .map_err(|e| TermError::InvalidIri(e.to_string()))
    }

    /// Get the IRI string
    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn into_string(self) -> String {
        self.value
    }
}

impl fmt::Display for NamedNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.value)
    }
}

/// Blank node (anonymous node)
///
/// Labels are only unique when minted by a store; callers may build
/// colliding blank nodes on purpose.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlankNode {
    value: String,
}

impl BlankNode {
    /// Create a blank node with the given label (without the `_:` prefix)
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            value: label.into(),
        }
    }

    /// Get the blank node label
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for BlankNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "_:{}", self.value)
    }
}

/// RDF literal value
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Literal {
    value: String,
    /// Empty when the literal carries no language tag
    language: String,
    datatype: NamedNode,
}

impl Literal {
    /// Create a simple literal (`xsd:string`)
    pub fn new_simple_literal(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            language: String::new(),
            datatype: NamedNode::new(xsd::STRING),
        }
    }

    /// Create a literal with language tag (`rdf:langString`)
    ///
    /// Language tags are case-insensitive and stored lowercased. An empty
    /// tag yields a simple literal.
    pub fn new_language_tagged_literal(
        value: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        let language = language.into().to_ascii_lowercase();
        if language.is_empty() {
            return Self::new_simple_literal(value);
        }
        Self {
            value: value.into(),
            language,
            datatype: NamedNode::new(rdf::LANG_STRING),
        }
    }

    /// Create a typed literal
    pub fn new_typed_literal(value: impl Into<String>, datatype: NamedNode) -> Self {
        Self {
            value: value.into(),
            language: String::new(),
            datatype,
        }
    }

    /// Get the lexical value
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Get the language tag if present
    pub fn language(&self) -> Option<&str> {
        if self.language.is_empty() {
            None
        } else {
            Some(&self.language)
        }
    }

    /// Get the datatype
    pub fn datatype(&self) -> &NamedNode {
        &self.datatype
    }

    /// Whether this is a plain `xsd:string` literal
    pub fn is_simple(&self) -> bool {
        self.language.is_empty() && self.datatype.as_str() == xsd::STRING
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(lang) = self.language() {
            write!(f, "\"{}\"@{}", self.value, lang)
        } else if self.is_simple() {
            write!(f, "\"{}\"", self.value)
        } else {
            write!(f, "\"{}\"^^{}", self.value, self.datatype)
        }
    }
}

/// Query variable
///
/// Part of the term algebra but never stored: patterns binding a variable
/// match nothing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Variable {
    #[serde(rename = "value")]
    name: String,
}

impl Variable {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "?{}", self.name)
    }
}

/// RDF term (any value that can occupy a quad position)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "termType")]
pub enum Term {
    /// Named node (IRI)
    NamedNode(NamedNode),
    /// Blank node
    BlankNode(BlankNode),
    /// Literal value
    Literal(Literal),
    /// Query variable
    Variable(Variable),
    /// The default graph marker
    DefaultGraph,
}

impl Term {
    /// Parse a canonical id (or plain string label) into a term
    ///
    /// `_:` starts a blank node, `"` a literal, `?` a variable, the empty
    /// string is the default graph and anything else is an IRI.
    pub fn from_id(id: &str) -> Self {
        codec::term_from_id(id)
    }

    /// Canonical id of this term
    pub fn to_id(&self) -> String {
        codec::term_to_id(self)
    }

    /// Lexical value: IRI, blank node label, literal value or variable name
    pub fn value(&self) -> &str {
        match self {
            Term::NamedNode(n) => n.as_str(),
            Term::BlankNode(b) => b.as_str(),
            Term::Literal(l) => l.value(),
            Term::Variable(v) => v.as_str(),
            Term::DefaultGraph => "",
        }
    }

    pub fn is_named_node(&self) -> bool {
        matches!(self, Term::NamedNode(_))
    }

    pub fn is_blank_node(&self) -> bool {
        matches!(self, Term::BlankNode(_))
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Term::Literal(_))
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, Term::Variable(_))
    }

    pub fn is_default_graph(&self) -> bool {
        matches!(self, Term::DefaultGraph)
    }

    /// Whether this term is the named node with the given IRI
    pub fn is_iri(&self, iri: &str) -> bool {
        matches!(self, Term::NamedNode(n) if n.as_str() == iri)
    }
}

impl Default for Term {
    fn default() -> Self {
        Term::DefaultGraph
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::NamedNode(n) => write!(f, "{}", n),
            Term::BlankNode(b) => write!(f, "{}", b),
            Term::Literal(l) => write!(f, "{}", l),
            Term::Variable(v) => write!(f, "{}", v),
            Term::DefaultGraph => write!(f, "DEFAULT"),
        }
    }
}

impl From<NamedNode> for Term {
    fn from(node: NamedNode) -> Self {
        Term::NamedNode(node)
    }
}

impl From<BlankNode> for Term {
    fn from(node: BlankNode) -> Self {
        Term::BlankNode(node)
    }
}

impl From<Literal> for Term {
    fn from(lit: Literal) -> Self {
        Term::Literal(lit)
    }
}

impl From<Variable> for Term {
    fn from(var: Variable) -> Self {
        Term::Variable(var)
    }
}

impl From<&Term> for Term {
    fn from(term: &Term) -> Self {
        term.clone()
    }
}

impl From<&str> for Term {
    fn from(id: &str) -> Self {
        Term::from_id(id)
    }
}

impl From<String> for Term {
    fn from(id: String) -> Self {
        Term::from_id(&id)
    }
}

/// A position within a quad
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuadPosition {
    Subject,
    Predicate,
    Object,
    Graph,
}

impl fmt::Display for QuadPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QuadPosition::Subject => "subject",
            QuadPosition::Predicate => "predicate",
            QuadPosition::Object => "object",
            QuadPosition::Graph => "graph",
        };
        f.write_str(name)
    }
}

/// RDF quad (triple + graph)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Quad {
    /// Subject
    pub subject: Term,
    /// Predicate
    pub predicate: Term,
    /// Object
    pub object: Term,
    /// Graph (`Term::DefaultGraph` when omitted)
    #[serde(default)]
    pub graph: Term,
}

impl Quad {
    /// Create a new quad
    ///
    /// Any position accepts a plain string label, interpreted as a canonical
    /// id (see [`Term::from_id`]).
    pub fn new(
        subject: impl Into<Term>,
        predicate: impl Into<Term>,
        object: impl Into<Term>,
        graph: impl Into<Term>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
            graph: graph.into(),
        }
    }

    /// Create a quad in the default graph
    pub fn triple(
        subject: impl Into<Term>,
        predicate: impl Into<Term>,
        object: impl Into<Term>,
    ) -> Self {
        Self::new(subject, predicate, object, Term::DefaultGraph)
    }

    /// Term at the given position
    pub fn get(&self, position: QuadPosition) -> &Term {
        match position {
            QuadPosition::Subject => &self.subject,
            QuadPosition::Predicate => &self.predicate,
            QuadPosition::Object => &self.object,
            QuadPosition::Graph => &self.graph,
        }
    }
}

impl fmt::Display for Quad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.graph.is_default_graph() {
            write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
        } else {
            write!(
                f,
                "{} {} {} {} .",
                self.subject, self.predicate, self.object, self.graph
            )
        }
    }
}

/// Quad pattern for queries
///
/// `None` leaves a position unbound. Binding `Term::DefaultGraph` as the
/// graph restricts matches to the default graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuadPattern {
    /// Subject (None = any)
    pub subject: Option<Term>,
    /// Predicate (None = any)
    pub predicate: Option<Term>,
    /// Object (None = any)
    pub object: Option<Term>,
    /// Graph (None = any graph)
    pub graph: Option<Term>,
}

impl QuadPattern {
    /// Create a new quad pattern
    pub fn new(
        subject: Option<Term>,
        predicate: Option<Term>,
        object: Option<Term>,
        graph: Option<Term>,
    ) -> Self {
        Self {
            subject,
            predicate,
            object,
            graph,
        }
    }

    /// Pattern matching every quad in every graph
    pub fn any() -> Self {
        Self::default()
    }

    pub fn with_subject(mut self, subject: impl Into<Term>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_predicate(mut self, predicate: impl Into<Term>) -> Self {
        self.predicate = Some(predicate.into());
        self
    }

    pub fn with_object(mut self, object: impl Into<Term>) -> Self {
        self.object = Some(object.into());
        self
    }

    pub fn with_graph(mut self, graph: impl Into<Term>) -> Self {
        self.graph = Some(graph.into());
        self
    }

    /// The same pattern with `position` left unbound
    pub fn without(mut self, position: QuadPosition) -> Self {
        match position {
            QuadPosition::Subject => self.subject = None,
            QuadPosition::Predicate => self.predicate = None,
            QuadPosition::Object => self.object = None,
            QuadPosition::Graph => self.graph = None,
        }
        self
    }

    /// Bound term at the given position
    pub fn get(&self, position: QuadPosition) -> Option<&Term> {
        match position {
            QuadPosition::Subject => self.subject.as_ref(),
            QuadPosition::Predicate => self.predicate.as_ref(),
            QuadPosition::Object => self.object.as_ref(),
            QuadPosition::Graph => self.graph.as_ref(),
        }
    }

    /// Check if a quad matches this pattern
    ///
    /// A bound variable never matches.
    pub fn matches(&self, quad: &Quad) -> bool {
        [
            QuadPosition::Subject,
            QuadPosition::Predicate,
            QuadPosition::Object,
            QuadPosition::Graph,
        ]
        .into_iter()
        .all(|position| match self.get(position) {
            None => true,
            Some(Term::Variable(_)) => false,
            Some(term) => term == quad.get(position),
        })
    }
}

impl From<&Quad> for QuadPattern {
    fn from(quad: &Quad) -> Self {
        Self::new(
            Some(quad.subject.clone()),
            Some(quad.predicate.clone()),
            Some(quad.object.clone()),
            Some(quad.graph.clone()),
        )
    }
}

// oxrdf interop

impl From<oxrdf::NamedNode> for NamedNode {
    fn from(node: oxrdf::NamedNode) -> Self {
        Self::new(node.into_string())
    }
}

impl From<NamedNode> for oxrdf::NamedNode {
    fn from(node: NamedNode) -> Self {
        oxrdf::NamedNode::new_unchecked(node.value)
    }
}

impl From<oxrdf::BlankNode> for BlankNode {
    fn from(node: oxrdf::BlankNode) -> Self {
        Self::new(node.as_str())
    }
}

impl From<oxrdf::Literal> for Literal {
    fn from(lit: oxrdf::Literal) -> Self {
        match lit.language() {
            Some(language) => Self::new_language_tagged_literal(lit.value(), language),
            None => Self::new_typed_literal(lit.value(), NamedNode::new(lit.datatype().as_str())),
        }
    }
}

impl From<Literal> for oxrdf::Literal {
    fn from(lit: Literal) -> Self {
        if lit.language.is_empty() {
            oxrdf::Literal::new_typed_literal(lit.value, oxrdf::NamedNode::from(lit.datatype))
        } else {
            oxrdf::Literal::new_language_tagged_literal_unchecked(lit.value, lit.language)
        }
    }
}

impl TryFrom<oxrdf::Term> for Term {
    type Error = TermError;

    fn try_from(term: oxrdf::Term) -> TermResult<Self> {
        match term {
            oxrdf::Term::NamedNode(n) => Ok(Term::NamedNode(n.into())),
            oxrdf::Term::BlankNode(b) => Ok(Term::BlankNode(b.into())),
            oxrdf::Term::Literal(l) => Ok(Term::Literal(l.into())),
            #[allow(unreachable_patterns)]
            _ => Err(TermError::QuotedTriple),
        }
    }
}

impl TryFrom<oxrdf::Subject> for Term {
    type Error = TermError;

    fn try_from(subject: oxrdf::Subject) -> TermResult<Self> {
        match subject {
            oxrdf::Subject::NamedNode(n) => Ok(Term::NamedNode(n.into())),
            oxrdf::Subject::BlankNode(b) => Ok(Term::BlankNode(b.into())),
            #[allow(unreachable_patterns)]
            _ => Err(TermError::QuotedTriple),
        }
    }
}

impl From<oxrdf::GraphName> for Term {
    fn from(graph: oxrdf::GraphName) -> Self {
        match graph {
            oxrdf::GraphName::NamedNode(n) => Term::NamedNode(n.into()),
            oxrdf::GraphName::BlankNode(b) => Term::BlankNode(b.into()),
            oxrdf::GraphName::DefaultGraph => Term::DefaultGraph,
        }
    }
}

impl TryFrom<oxrdf::Quad> for Quad {
    type Error = TermError;

    fn try_from(quad: oxrdf::Quad) -> TermResult<Self> {
        Ok(Self {
            subject: quad.subject.try_into()?,
            predicate: Term::NamedNode(quad.predicate.into()),
            object: quad.object.try_into()?,
            graph: quad.graph_name.into(),
        })
    }
}

impl TryFrom<&Quad> for oxrdf::Quad {
    type Error = TermError;

    fn try_from(quad: &Quad) -> TermResult<Self> {
        let misplaced = |term: &Term, position| TermError::NotRepresentable {
            term: term.to_string(),
            position,
        };

        let subject: oxrdf::Subject = match &quad.subject {
            Term::NamedNode(n) => oxrdf::NamedNode::from(n.clone()).into(),
            Term::BlankNode(b) => oxrdf::BlankNode::new_unchecked(b.as_str()).into(),
            other => return Err(misplaced(other, QuadPosition::Subject)),
        };
        let predicate = match &quad.predicate {
            Term::NamedNode(n) => oxrdf::NamedNode::from(n.clone()),
            other => return Err(misplaced(other, QuadPosition::Predicate)),
        };
        let object: oxrdf::Term = match &quad.object {
            Term::NamedNode(n) => oxrdf::NamedNode::from(n.clone()).into(),
            Term::BlankNode(b) => oxrdf::BlankNode::new_unchecked(b.as_str()).into(),
            Term::Literal(l) => oxrdf::Literal::from(l.clone()).into(),
            other => return Err(misplaced(other, QuadPosition::Object)),
        };
        let graph = match &quad.graph {
            Term::NamedNode(n) => oxrdf::NamedNode::from(n.clone()).into(),
            Term::BlankNode(b) => oxrdf::BlankNode::new_unchecked(b.as_str()).into(),
            Term::DefaultGraph => oxrdf::GraphName::DefaultGraph,
            other => return Err(misplaced(other, QuadPosition::Graph)),
        };

        Ok(oxrdf::Quad::new(subject, predicate, object, graph))
    }
}
