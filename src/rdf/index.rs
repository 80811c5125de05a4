//! Permutation indices over encoded quads
//!
//! Every graph partition keeps the same set of (subject, predicate, object)
//! entries three times, nested in the orders SPO, POS and OSP:
//!
//! ```text
//! spo: subject   -> predicate -> {object}
//! pos: predicate -> object    -> {subject}
//! osp: object    -> subject   -> {predicate}
//! ```
//!
//! Any combination of bound positions resolves its leading bound keys by
//! direct lookup in one of the three, so a scan never covers more than one
//! dimension of a partition.

use super::codec::EntityId;
use super::types::QuadPosition;
use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashMap, FxHashSet};

type Leaf = FxHashSet<EntityId>;
type Level = FxHashMap<EntityId, FxHashMap<EntityId, Leaf>>;

/// A quad whose terms have been interned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct EncodedQuad {
    pub subject: EntityId,
    pub predicate: EntityId,
    pub object: EntityId,
    pub graph: EntityId,
}

impl EncodedQuad {
    pub fn get(&self, position: QuadPosition) -> EntityId {
        match position {
            QuadPosition::Subject => self.subject,
            QuadPosition::Predicate => self.predicate,
            QuadPosition::Object => self.object,
            QuadPosition::Graph => self.graph,
        }
    }
}

/// A pattern whose bound terms have been interned (None = any)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct EncodedPattern {
    pub subject: Option<EntityId>,
    pub predicate: Option<EntityId>,
    pub object: Option<EntityId>,
    pub graph: Option<EntityId>,
}

impl EncodedPattern {
    /// Copy of this pattern with one position left unbound
    pub fn without(mut self, position: QuadPosition) -> Self {
        match position {
            QuadPosition::Subject => self.subject = None,
            QuadPosition::Predicate => self.predicate = None,
            QuadPosition::Object => self.object = None,
            QuadPosition::Graph => self.graph = None,
        }
        self
    }
}

/// Key order of one nested index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Permutation {
    Spo,
    Pos,
    Osp,
}

impl Permutation {
    /// Pick the index whose leading keys cover the most bound positions
    fn for_pattern(
        subject: Option<EntityId>,
        predicate: Option<EntityId>,
        object: Option<EntityId>,
    ) -> Self {
        match (subject, predicate, object) {
            (Some(_), None, Some(_)) => Permutation::Osp,
            (Some(_), _, _) => Permutation::Spo,
            (None, Some(_), _) => Permutation::Pos,
            (None, None, Some(_)) => Permutation::Osp,
            (None, None, None) => Permutation::Spo,
        }
    }

    /// Reorder (subject, predicate, object) into this index's key order
    fn keys<T>(self, subject: T, predicate: T, object: T) -> [T; 3] {
        match self {
            Permutation::Spo => [subject, predicate, object],
            Permutation::Pos => [predicate, object, subject],
            Permutation::Osp => [object, subject, predicate],
        }
    }

    /// Inverse of [`Permutation::keys`]
    fn spo<T>(self, [a, b, c]: [T; 3]) -> [T; 3] {
        match self {
            Permutation::Spo => [a, b, c],
            Permutation::Pos => [c, a, b],
            Permutation::Osp => [b, c, a],
        }
    }

    /// Index whose first key is the given position
    fn rooted_at(position: QuadPosition) -> Option<Self> {
        match position {
            QuadPosition::Subject => Some(Permutation::Spo),
            QuadPosition::Predicate => Some(Permutation::Pos),
            QuadPosition::Object => Some(Permutation::Osp),
            QuadPosition::Graph => None,
        }
    }
}

/// Entries of a map: one by lookup when the key is bound, else all of them
fn entries<'a, V>(
    map: &'a FxHashMap<EntityId, V>,
    key: Option<EntityId>,
) -> Box<dyn Iterator<Item = (EntityId, &'a V)> + 'a> {
    match key {
        Some(key) => Box::new(map.get_key_value(&key).map(|(k, v)| (*k, v)).into_iter()),
        None => Box::new(map.iter().map(|(k, v)| (*k, v))),
    }
}

fn members<'a>(leaf: &'a Leaf, key: Option<EntityId>) -> Box<dyn Iterator<Item = EntityId> + 'a> {
    match key {
        Some(key) => Box::new(leaf.get(&key).copied().into_iter()),
        None => Box::new(leaf.iter().copied()),
    }
}

fn walk(level: &Level, keys: [Option<EntityId>; 3]) -> impl Iterator<Item = [EntityId; 3]> + '_ {
    let [first, second, third] = keys;
    entries(level, first).flat_map(move |(a, seconds)| {
        entries(seconds, second).flat_map(move |(b, leaf)| members(leaf, third).map(move |c| [a, b, c]))
    })
}

fn tally(level: &Level, keys: [Option<EntityId>; 3]) -> usize {
    let [first, second, third] = keys;
    entries(level, first)
        .map(|(_, seconds)| {
            entries(seconds, second)
                .map(|(_, leaf)| match third {
                    Some(key) => usize::from(leaf.contains(&key)),
                    None => leaf.len(),
                })
                .sum::<usize>()
        })
        .sum()
}

fn add(level: &mut Level, [a, b, c]: [EntityId; 3]) -> bool {
    level.entry(a).or_default().entry(b).or_default().insert(c)
}

/// Remove an entry, pruning levels left empty
fn prune(level: &mut Level, [a, b, c]: [EntityId; 3]) -> bool {
    let Some(seconds) = level.get_mut(&a) else {
        return false;
    };
    let Some(leaf) = seconds.get_mut(&b) else {
        return false;
    };
    if !leaf.remove(&c) {
        return false;
    }
    if leaf.is_empty() {
        seconds.remove(&b);
        if seconds.is_empty() {
            level.remove(&a);
        }
    }
    true
}

/// The three permutations of one graph
#[derive(Debug, Clone, Default)]
pub(crate) struct GraphIndex {
    /// SPO index: Subject -> Predicate -> Set of Objects
    spo: Level,

    /// POS index: Predicate -> Object -> Set of Subjects
    pos: Level,

    /// OSP index: Object -> Subject -> Set of Predicates
    osp: Level,
}

impl GraphIndex {
    fn level(&self, permutation: Permutation) -> &Level {
        match permutation {
            Permutation::Spo => &self.spo,
            Permutation::Pos => &self.pos,
            Permutation::Osp => &self.osp,
        }
    }

    fn insert(&mut self, s: EntityId, p: EntityId, o: EntityId) -> bool {
        // SPO decides presence; the other two follow it
        if !add(&mut self.spo, [s, p, o]) {
            return false;
        }
        add(&mut self.pos, [p, o, s]);
        add(&mut self.osp, [o, s, p]);
        true
    }

    fn remove(&mut self, s: EntityId, p: EntityId, o: EntityId) -> bool {
        if !prune(&mut self.spo, [s, p, o]) {
            return false;
        }
        prune(&mut self.pos, [p, o, s]);
        prune(&mut self.osp, [o, s, p]);
        true
    }

    fn contains(&self, s: EntityId, p: EntityId, o: EntityId) -> bool {
        self.spo
            .get(&s)
            .and_then(|preds| preds.get(&p))
            .is_some_and(|objs| objs.contains(&o))
    }

    fn is_empty(&self) -> bool {
        self.spo.is_empty()
    }

    /// (subject, predicate, object) entries matching the bound keys
    fn matches(
        &self,
        s: Option<EntityId>,
        p: Option<EntityId>,
        o: Option<EntityId>,
    ) -> impl Iterator<Item = [EntityId; 3]> + '_ {
        let permutation = Permutation::for_pattern(s, p, o);
        walk(self.level(permutation), permutation.keys(s, p, o)).map(move |keys| permutation.spo(keys))
    }

    fn count(&self, s: Option<EntityId>, p: Option<EntityId>, o: Option<EntityId>) -> usize {
        let permutation = Permutation::for_pattern(s, p, o);
        tally(self.level(permutation), permutation.keys(s, p, o))
    }
}

/// All graph partitions of a store
///
/// Partitions are dropped as soon as their last entry is removed; the
/// emptied slot is refilled by the last partition, so graph order is not
/// stable across removals. `len` is maintained on every mutation.
#[derive(Debug, Clone, Default)]
pub(crate) struct QuadIndex {
    graphs: IndexMap<EntityId, GraphIndex, FxBuildHasher>,
    len: usize,
}

impl QuadIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored quads
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn graph_count(&self) -> usize {
        self.graphs.len()
    }

    pub fn clear(&mut self) {
        self.graphs.clear();
        self.len = 0;
    }

    /// Insert a quad; false if it was already present
    pub fn insert(&mut self, quad: EncodedQuad) -> bool {
        let graph = self.graphs.entry(quad.graph).or_default();
        if !graph.insert(quad.subject, quad.predicate, quad.object) {
            return false;
        }
        self.len += 1;
        true
    }

    /// Remove a quad; false if it was absent
    pub fn remove(&mut self, quad: EncodedQuad) -> bool {
        let Some(graph) = self.graphs.get_mut(&quad.graph) else {
            return false;
        };
        if !graph.remove(quad.subject, quad.predicate, quad.object) {
            return false;
        }
        if graph.is_empty() {
            self.graphs.swap_remove(&quad.graph);
        }
        self.len -= 1;
        true
    }

    pub fn contains(&self, quad: EncodedQuad) -> bool {
        self.graphs
            .get(&quad.graph)
            .is_some_and(|graph| graph.contains(quad.subject, quad.predicate, quad.object))
    }

    fn partitions(
        &self,
        graph: Option<EntityId>,
    ) -> Box<dyn Iterator<Item = (EntityId, &GraphIndex)> + '_> {
        match graph {
            Some(graph) => Box::new(
                self.graphs
                    .get_key_value(&graph)
                    .map(|(g, index)| (*g, index))
                    .into_iter(),
            ),
            None => Box::new(self.graphs.iter().map(|(g, index)| (*g, index))),
        }
    }

    /// Lazily enumerate the quads matching a pattern
    pub fn matches(&self, pattern: EncodedPattern) -> impl Iterator<Item = EncodedQuad> + '_ {
        let EncodedPattern {
            subject,
            predicate,
            object,
            graph,
        } = pattern;

        self.partitions(graph).flat_map(move |(graph, index)| {
            index
                .matches(subject, predicate, object)
                .map(move |[subject, predicate, object]| EncodedQuad {
                    subject,
                    predicate,
                    object,
                    graph,
                })
        })
    }

    /// Count the quads matching a pattern without enumerating them
    pub fn count(&self, pattern: EncodedPattern) -> usize {
        if pattern == EncodedPattern::default() {
            return self.len;
        }
        self.partitions(pattern.graph)
            .map(|(_, index)| index.count(pattern.subject, pattern.predicate, pattern.object))
            .sum()
    }

    /// Distinct entities found at `position` among the matches of `pattern`
    ///
    /// The pattern's own binding at `position` is ignored. Results keep the
    /// order in which they were first met.
    pub fn distinct(&self, position: QuadPosition, pattern: EncodedPattern) -> Vec<EntityId> {
        let pattern = pattern.without(position);
        let mut seen = FxHashSet::default();

        if position == QuadPosition::Graph {
            return self
                .partitions(pattern.graph)
                .filter(|(_, index)| {
                    index
                        .matches(pattern.subject, pattern.predicate, pattern.object)
                        .next()
                        .is_some()
                })
                .map(|(graph, _)| graph)
                .collect();
        }

        let unconstrained =
            pattern.subject.is_none() && pattern.predicate.is_none() && pattern.object.is_none();
        if let (true, Some(permutation)) = (unconstrained, Permutation::rooted_at(position)) {
            // Leading keys of the rooted index are exactly the distinct values
            return self
                .partitions(pattern.graph)
                .flat_map(|(_, index)| index.level(permutation).keys().copied())
                .filter(|entity| seen.insert(*entity))
                .collect();
        }

        self.matches(pattern)
            .map(|quad| quad.get(position))
            .filter(|entity| seen.insert(*entity))
            .collect()
    }

    /// Check that all three permutations describe the same entries
    #[cfg(test)]
    pub fn assert_consistent(&self) {
        let mut total = 0;
        for (graph, index) in &self.graphs {
            assert!(!index.is_empty(), "empty partition {} kept", graph);

            let mut spo = Vec::new();
            let mut pos = Vec::new();
            let mut osp = Vec::new();
            for permutation in [Permutation::Spo, Permutation::Pos, Permutation::Osp] {
                let entries = walk(index.level(permutation), [None, None, None])
                    .map(|keys| permutation.spo(keys));
                let target = match permutation {
                    Permutation::Spo => &mut spo,
                    Permutation::Pos => &mut pos,
                    Permutation::Osp => &mut osp,
                };
                target.extend(entries);
            }
            for level in [&index.spo, &index.pos, &index.osp] {
                for seconds in level.values() {
                    assert!(!seconds.is_empty(), "empty second level kept");
                    assert!(seconds.values().all(|leaf| !leaf.is_empty()), "empty leaf kept");
                }
            }
            spo.sort_unstable();
            pos.sort_unstable();
            osp.sort_unstable();
            assert_eq!(spo, pos, "SPO and POS disagree in graph {}", graph);
            assert_eq!(spo, osp, "SPO and OSP disagree in graph {}", graph);
            total += spo.len();
        }
        assert_eq!(total, self.len, "size counter out of sync");
    }
}
