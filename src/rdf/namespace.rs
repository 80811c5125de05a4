//! RDF vocabulary constants
//!
//! Only the terms the store itself needs: the datatypes implied by literal
//! construction and the collection vocabulary walked by list extraction.

/// The RDF vocabulary (`rdf:`)
pub mod rdf {
    /// Namespace IRI
    pub const NAMESPACE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

    /// `rdf:type`
    pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

    /// `rdf:first`: the member carried by a collection node
    pub const FIRST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#first";

    /// `rdf:rest`: the link to the next collection node
    pub const REST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#rest";

    /// `rdf:nil`: the empty collection, terminates every list
    pub const NIL: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil";

    /// `rdf:langString`: datatype of language-tagged literals
    pub const LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";
}

/// XML Schema datatypes (`xsd:`)
pub mod xsd {
    /// Namespace IRI
    pub const NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema#";

    /// `xsd:string`: datatype of simple literals
    pub const STRING: &str = "http://www.w3.org/2001/XMLSchema#string";

    /// `xsd:integer`
    pub const INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
}
