use samyama_quadstore::rdf::{rdf, xsd};
use samyama_quadstore::{
    BlankNode, ExtractListsOptions, ListViolation, Literal, NamedNode, Quad, QuadPattern,
    QuadStore, StoreError, Term,
};

/// Chains `items` into a collection of fresh blank nodes, returning the nodes
fn add_list(store: &mut QuadStore, items: Vec<Term>) -> Vec<BlankNode> {
    let mut nodes = vec![store.create_blank_node(None)];
    let last = items.len() - 1;
    for (i, item) in items.into_iter().enumerate() {
        store
            .add_quad(&Quad::triple(nodes[i].clone(), NamedNode::new(rdf::FIRST), item))
            .unwrap();
        let next: Term = if i == last {
            NamedNode::new(rdf::NIL).into()
        } else {
            nodes.push(store.create_blank_node(None));
            nodes[i + 1].clone().into()
        };
        store
            .add_quad(&Quad::triple(nodes[i].clone(), NamedNode::new(rdf::REST), next))
            .unwrap();
    }
    nodes
}

fn fresh_items(store: &mut QuadStore, count: usize) -> Vec<Term> {
    (0..count).map(|_| store.create_blank_node(None).into()).collect()
}

fn element_items() -> Vec<Term> {
    vec![
        NamedNode::new("element1").into(),
        Literal::new_simple_literal("element2").into(),
    ]
}

fn extract_error(store: &mut QuadStore) -> String {
    match store.extract_lists(ExtractListsOptions::default()) {
        Err(StoreError::List(err)) => err.to_string(),
        other => panic!("expected a list error, got {:?}", other),
    }
}

fn structure(nodes: &[BlankNode]) -> Vec<Quad> {
    vec![
        Quad::triple(nodes[0].clone(), rdf::FIRST, "element1"),
        Quad::triple(nodes[0].clone(), rdf::REST, nodes[1].clone()),
        Quad::triple(nodes[1].clone(), rdf::FIRST, "\"element2\""),
        Quad::triple(nodes[1].clone(), rdf::REST, rdf::NIL),
    ]
}

fn assert_store_holds(store: &QuadStore, expected: &[Quad]) {
    let quads = store.get_quads(&QuadPattern::any());
    assert_eq!(quads.len(), expected.len(), "got {:?}", quads);
    for quad in expected {
        assert!(quads.contains(quad), "missing {}", quad);
    }
}

#[test]
fn test_collection_as_subject() {
    let mut store = QuadStore::new();
    let nodes = add_list(&mut store, element_items());
    let extra = Quad::triple(nodes[0].clone(), "p1", "o1");
    store.add_quad(&extra).unwrap();

    let lists = store.extract_lists(ExtractListsOptions::default()).unwrap();
    let mut all = structure(&nodes);
    all.push(extra.clone());
    assert_store_holds(&store, &all);
    assert_eq!(lists.len(), 1);
    assert_eq!(lists[&Term::from("_:b0")], element_items());

    let lists = store
        .extract_lists(ExtractListsOptions::new().with_remove(true))
        .unwrap();
    assert_store_holds(&store, &[extra]);
    assert_eq!(lists[&Term::from("_:b0")], element_items());
}

#[test]
fn test_collection_as_object() {
    let mut store = QuadStore::new();
    let nodes = add_list(&mut store, element_items());
    let extra = Quad::triple("s1", "p1", nodes[0].clone());
    store.add_quad(&extra).unwrap();

    let lists = store.extract_lists(ExtractListsOptions::default()).unwrap();
    assert_eq!(store.len(), 5);
    assert_eq!(lists[&Term::from("_:b0")], element_items());

    let lists = store
        .extract_lists(ExtractListsOptions::new().with_remove(true))
        .unwrap();
    assert_store_holds(&store, &[extra]);
    assert_eq!(lists[&Term::from("_:b0")], element_items());
}

#[test]
fn test_members_serialize_as_term_json() {
    let mut store = QuadStore::new();
    let nodes = add_list(&mut store, element_items());
    store.add_quad(&Quad::triple("s1", "p1", nodes[0].clone())).unwrap();

    let lists = store.extract_lists(ExtractListsOptions::default()).unwrap();
    let json = serde_json::to_value(&lists[&Term::from("_:b0")]).unwrap();
    assert_eq!(
        json,
        serde_json::json!([
            { "termType": "NamedNode", "value": "element1" },
            {
                "termType": "Literal",
                "value": "element2",
                "language": "",
                "datatype": { "value": xsd::STRING }
            }
        ])
    );
}

#[test]
fn test_unattached_collection() {
    let mut store = QuadStore::new();
    let nodes = add_list(&mut store, element_items());
    let other = Quad::triple("s1", "p1", "o1");
    store.add_quad(&other).unwrap();

    let lists = store.extract_lists(ExtractListsOptions::default()).unwrap();
    assert!(lists.is_empty());
    let mut all = structure(&nodes);
    all.push(other.clone());
    assert_store_holds(&store, &all);

    let lists = store
        .extract_lists(ExtractListsOptions::new().with_remove(true))
        .unwrap();
    assert!(lists.is_empty());
    assert_store_holds(&store, &[other]);
}

#[test]
fn test_collection_without_first() {
    let mut store = QuadStore::new();
    let node = store.create_blank_node(None);
    store
        .add_quad(&Quad::triple(node, NamedNode::new(rdf::REST), NamedNode::new(rdf::NIL)))
        .unwrap();

    assert_eq!(extract_error(&mut store), "b0 has no list head");
}

#[test]
fn test_multiple_first_on_head() {
    let mut store = QuadStore::new();
    let items = fresh_items(&mut store, 2);
    let nodes = add_list(&mut store, items);
    let extra = store.create_blank_node(None);
    store
        .add_quad(&Quad::triple(nodes[0].clone(), rdf::FIRST, extra))
        .unwrap();

    assert_eq!(extract_error(&mut store), "b2 has multiple rdf:first arcs");
}

#[test]
fn test_multiple_first_on_tail() {
    let mut store = QuadStore::new();
    let items = fresh_items(&mut store, 2);
    let nodes = add_list(&mut store, items);
    let extra = store.create_blank_node(None);
    store
        .add_quad(&Quad::triple(nodes[1].clone(), rdf::FIRST, extra))
        .unwrap();

    assert_eq!(extract_error(&mut store), "b3 has multiple rdf:first arcs");
}

#[test]
fn test_multiple_rest_on_head() {
    let mut store = QuadStore::new();
    let items = fresh_items(&mut store, 2);
    let nodes = add_list(&mut store, items);
    let extra = store.create_blank_node(None);
    store
        .add_quad(&Quad::triple(nodes[0].clone(), rdf::REST, extra))
        .unwrap();

    assert_eq!(extract_error(&mut store), "b2 has multiple rdf:rest arcs");
}

#[test]
fn test_multiple_rest_on_tail() {
    let mut store = QuadStore::new();
    let items = fresh_items(&mut store, 2);
    let nodes = add_list(&mut store, items);
    let extra = store.create_blank_node(None);
    store
        .add_quad(&Quad::triple(nodes[1].clone(), rdf::REST, extra))
        .unwrap();

    assert_eq!(extract_error(&mut store), "b3 has multiple rdf:rest arcs");
}

#[test]
fn test_non_list_arcs_out_of_middle_node() {
    let mut store = QuadStore::new();
    let items = fresh_items(&mut store, 3);
    let nodes = add_list(&mut store, items);
    let extra = store.create_blank_node(None);
    store
        .add_quad(&Quad::triple(nodes[1].clone(), "http://a.example/foo", extra))
        .unwrap();

    assert_eq!(extract_error(&mut store), "b4 can't be subject and object");
}

#[test]
fn test_multiple_incoming_rest() {
    let mut store = QuadStore::new();
    let items = fresh_items(&mut store, 3);
    let nodes = add_list(&mut store, items);
    let extra = store.create_blank_node(None);
    store
        .add_quad(&Quad::triple(extra, rdf::REST, nodes[1].clone()))
        .unwrap();

    assert_eq!(extract_error(&mut store), "b4 has incoming rdf:rest arcs");
}

#[test]
fn test_coreferences_out_of_head() {
    let mut store = QuadStore::new();
    let items = fresh_items(&mut store, 3);
    let nodes = add_list(&mut store, items);
    store.add_quad(&Quad::triple(nodes[0].clone(), "p1", "o1")).unwrap();
    store.add_quad(&Quad::triple(nodes[0].clone(), "p1", "o2")).unwrap();

    assert_eq!(extract_error(&mut store), "b3 has non-list arcs out");
}

#[test]
fn test_coreferences_into_head() {
    let mut store = QuadStore::new();
    let items = fresh_items(&mut store, 3);
    let nodes = add_list(&mut store, items);
    store.add_quad(&Quad::triple("s1", "p1", nodes[0].clone())).unwrap();
    store.add_quad(&Quad::triple("s2", rdf::REST, nodes[0].clone())).unwrap();
    store.add_quad(&Quad::triple("s2", "p1", nodes[0].clone())).unwrap();

    assert_eq!(extract_error(&mut store), "b3 can't have coreferences");
}

#[test]
fn test_collection_spread_across_graphs() {
    let mut store = QuadStore::new();
    let b0 = store.create_blank_node(None);
    let b1 = store.create_blank_node(None);
    let quads = vec![
        Quad::triple(b0.clone(), rdf::FIRST, "element1"),
        Quad::new(b0.clone(), rdf::REST, b1.clone(), "g1"),
        Quad::triple(b1.clone(), rdf::FIRST, "\"element2\""),
        Quad::triple(b1.clone(), rdf::REST, rdf::NIL),
        Quad::triple("s1", "p1", b0.clone()),
    ];
    store.add_quads(&quads).unwrap();

    assert_eq!(extract_error(&mut store), "b0 not confined to single graph");
    assert_store_holds(&store, &quads);

    let lists = store
        .extract_lists(ExtractListsOptions::new().with_ignore_errors(true).with_remove(true))
        .unwrap();
    assert!(lists.is_empty());
    assert_store_holds(&store, &quads);
}

#[test]
fn test_error_carries_violation_and_node() {
    let mut store = QuadStore::new();
    let node = store.create_blank_node(None);
    store.add_quad(&Quad::triple(node.clone(), rdf::REST, rdf::NIL)).unwrap();

    match store.extract_lists(ExtractListsOptions::default()) {
        Err(StoreError::List(err)) => {
            assert_eq!(err.violation, ListViolation::NoListHead);
            assert_eq!(err.node, Term::from(node));
        }
        other => panic!("expected a list error, got {:?}", other),
    }
}

#[test]
fn test_lists_in_named_graph_and_custom_heads() {
    let mut store = QuadStore::new();
    let quads = [
        Quad::new("_:l0", rdf::FIRST, "\"1\"", "g1"),
        Quad::new("_:l0", rdf::REST, "_:l1", "g1"),
        Quad::new("_:l1", rdf::FIRST, "\"2\"", "g1"),
        Quad::new("_:l1", rdf::REST, rdf::NIL, "g1"),
        Quad::new("s1", "values", "_:l0", "g1"),
    ];
    store.add_quads(&quads).unwrap();

    let lists = store
        .extract_lists(ExtractListsOptions::new().with_remove(true))
        .unwrap();
    assert_eq!(
        lists[&Term::from("_:l0")],
        vec![Term::from("\"1\""), Term::from("\"2\"")]
    );
    assert_store_holds(&store, &[Quad::new("s1", "values", "_:l0", "g1")]);
}
