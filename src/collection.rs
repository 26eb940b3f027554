use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use crate::parser::ConfigError;

/// Behaviour for multiple (0 to many) items T to be gathered together.
// Needs to be imported in order to implement a custom `Gatherable`.
pub trait Gatherable<T> {
    /// Add a value to this `Gatherable`.
    fn gather(&mut self, item: T);
}

impl<T> Gatherable<T> for Vec<T> {
    fn gather(&mut self, item: T) {
        self.push(item);
    }
}

impl<T: Eq + Hash> Gatherable<T> for HashSet<T> {
    fn gather(&mut self, item: T) {
        self.insert(item);
    }
}

/// A node of a [`DepthMap`]: an intermediate level of mapping, or a terminal value.
#[derive(Debug, Clone)]
pub enum Nested<K, V> {
    /// An intermediate level, mapping keys to deeper nodes.
    Branch(HashMap<K, Nested<K, V>>),
    /// A terminal value, default-constructed on first read.
    Leaf(V),
}

impl<K, V> Nested<K, V> {
    /// The terminal value, if this node is a leaf.
    pub fn as_leaf(&self) -> Option<&V> {
        match self {
            Nested::Leaf(value) => Some(value),
            Nested::Branch(_) => None,
        }
    }

    /// The children, if this node is a branch.
    pub fn as_branch(&self) -> Option<&HashMap<K, Nested<K, V>>> {
        match self {
            Nested::Branch(children) => Some(children),
            Nested::Leaf(_) => None,
        }
    }
}

/// An auto-vivifying mapping of fixed nesting depth.
///
/// Reading an absent key materializes the next level instead of signalling "missing key":
/// branches down to `depth - 1`, then a `V::default()` terminal at `depth`.
/// The depth is fixed at construction and uniform across branches.
///
/// ### Example
/// ```
/// use exarg::DepthMap;
///
/// let mut tallies: DepthMap<String, i64> = DepthMap::new(2).unwrap();
/// *tallies.tally(&["chr1".to_string(), "start".to_string()]) += 1;
/// assert_eq!(tallies.get(&["chr1".to_string(), "start".to_string()]), Some(&1));
/// ```
#[derive(Debug, Clone)]
pub struct DepthMap<K, V> {
    depth: usize,
    root: HashMap<K, Nested<K, V>>,
}

impl<K: Eq + Hash + Clone, V: Default> DepthMap<K, V> {
    /// Create a map of the given nesting depth (`depth >= 1`).
    pub fn new(depth: usize) -> Result<Self, ConfigError> {
        if depth == 0 {
            return Err(ConfigError("depth map requires depth >= 1.".to_string()));
        }

        Ok(Self {
            depth,
            root: HashMap::default(),
        })
    }

    /// The construction-time nesting depth.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The number of keys materialized at the outermost level.
    pub fn len(&self) -> usize {
        self.root.len()
    }

    /// Whether no key has been materialized at the outermost level.
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Get-or-insert the node at `path`, materializing every absent level along the way.
    /// A path shorter than the depth yields a branch; a full-depth path yields a leaf.
    ///
    /// Panics when `path` is empty or longer than the depth (caller misconfiguration).
    pub fn entry(&mut self, path: &[K]) -> &mut Nested<K, V> {
        assert!(
            !path.is_empty() && path.len() <= self.depth,
            "internal error - path of {len} keys invalid for depth {depth}",
            len = path.len(),
            depth = self.depth,
        );
        let mut below = self.depth - 1;
        let mut node = Self::vivify(&mut self.root, &path[0], below);

        for key in &path[1..] {
            below -= 1;
            node = match node {
                Nested::Branch(children) => Self::vivify(children, key, below),
                Nested::Leaf(_) => {
                    unreachable!("internal error - leaf reached before the path was consumed")
                }
            };
        }

        node
    }

    /// Get-or-insert the terminal value at a full-depth `path`.
    ///
    /// Panics when `path` does not have exactly `depth` keys (caller misconfiguration).
    pub fn tally(&mut self, path: &[K]) -> &mut V {
        assert!(
            path.len() == self.depth,
            "internal error - path of {len} keys invalid for depth {depth}",
            len = path.len(),
            depth = self.depth,
        );

        match self.entry(path) {
            Nested::Leaf(value) => value,
            Nested::Branch(_) => {
                unreachable!("internal error - full-depth path must land on a leaf")
            }
        }
    }

    /// Non-vivifying read of the terminal value at a full-depth `path`.
    pub fn get(&self, path: &[K]) -> Option<&V> {
        if path.len() != self.depth {
            return None;
        }

        let mut node = self.root.get(&path[0])?;

        for key in &path[1..] {
            node = match node {
                Nested::Branch(children) => children.get(key)?,
                Nested::Leaf(_) => return None,
            };
        }

        node.as_leaf()
    }

    fn vivify<'m>(
        children: &'m mut HashMap<K, Nested<K, V>>,
        key: &K,
        below: usize,
    ) -> &'m mut Nested<K, V> {
        children.entry(key.clone()).or_insert_with(|| {
            if below == 0 {
                Nested::Leaf(V::default())
            } else {
                Nested::Branch(HashMap::default())
            }
        })
    }
}

/// An auto-vivifying mapping with no depth limit.
///
/// Every absent-key read at any depth materializes another `AutoMap`, so chains of reads
/// never bottom out in a plain value.
/// Useful for grouping structures whose depth is not known in advance.
#[derive(Debug, Clone)]
pub struct AutoMap<K> {
    children: HashMap<K, AutoMap<K>>,
}

impl<K> Default for AutoMap<K> {
    fn default() -> Self {
        Self {
            children: HashMap::default(),
        }
    }
}

impl<K: Eq + Hash> AutoMap<K> {
    /// Get-or-insert the node under `key`.
    pub fn node(&mut self, key: K) -> &mut AutoMap<K> {
        self.children.entry(key).or_default()
    }

    /// Get-or-insert along the whole `path`, materializing a node per key.
    pub fn dive(&mut self, path: impl IntoIterator<Item = K>) -> &mut AutoMap<K> {
        let mut node = self;

        for key in path {
            node = node.children.entry(key).or_default();
        }

        node
    }

    /// Non-vivifying read of the node under `key`.
    pub fn get(&self, key: &K) -> Option<&AutoMap<K>> {
        self.children.get(key)
    }

    /// The number of keys materialized at this node.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Whether no key has been materialized at this node.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

/// Single-depth map with integer terminals.
/// Handy on its own for tallying, or as the innermost level fed by an outer map.
pub fn count_map<K: Eq + Hash + Clone>() -> DepthMap<K, i64> {
    DepthMap::new(1).expect("internal error - depth 1 must be valid")
}

/// Single-depth map with mapping terminals.
/// Handy as the "next level" of an outer grouping structure.
pub fn group_map<K: Eq + Hash + Clone, IK, IV>() -> DepthMap<K, HashMap<IK, IV>> {
    DepthMap::new(1).expect("internal error - depth 1 must be valid")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec() {
        let mut gathered: Vec<u32> = Vec::default();
        gathered.gather(1);
        gathered.gather(0);
        assert_eq!(gathered, vec![1, 0]);
    }

    #[test]
    fn hash_set() {
        let mut gathered: HashSet<u32> = HashSet::default();
        gathered.gather(1);
        gathered.gather(0);
        gathered.gather(1);
        assert_eq!(gathered, HashSet::from([1, 0]));
    }

    #[test]
    fn depth_map_zero() {
        let result: Result<DepthMap<String, i64>, _> = DepthMap::new(0);
        assert_matches!(result, Err(ConfigError(_)));
    }

    #[test]
    fn depth_map_tally() {
        let mut map: DepthMap<&str, i64> = DepthMap::new(2).unwrap();

        // A fresh read materializes both levels and lands on the default.
        assert_eq!(*map.tally(&["x", "y"]), 0);

        *map.tally(&["x", "y"]) += 5;
        *map.tally(&["x", "z"]) += 1;
        assert_eq!(map.get(&["x", "y"]), Some(&5));
        assert_eq!(map.get(&["x", "z"]), Some(&1));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn depth_map_partial_entry() {
        let mut map: DepthMap<&str, i64> = DepthMap::new(2).unwrap();

        // A partial path yields an (empty) inner mapping, not a terminal.
        let node = map.entry(&["x"]);
        assert_matches!(node, Nested::Branch(_));
        assert!(node.as_branch().unwrap().is_empty());
        assert_eq!(node.as_leaf(), None);

        assert_eq!(*map.tally(&["x", "y"]), 0);
        assert_eq!(map.entry(&["x"]).as_branch().unwrap().len(), 1);
    }

    #[test]
    fn depth_map_get_absent() {
        let map: DepthMap<&str, i64> = DepthMap::new(2).unwrap();
        assert_eq!(map.get(&["x", "y"]), None);

        let mut map = map;
        map.tally(&["x", "y"]);
        assert_eq!(map.get(&["x", "w"]), None);
        assert_eq!(map.get(&["x"]), None);
    }

    #[test]
    #[should_panic]
    fn depth_map_tally_short_path() {
        let mut map: DepthMap<&str, i64> = DepthMap::new(2).unwrap();
        map.tally(&["x"]);
    }

    #[test]
    #[should_panic]
    fn depth_map_entry_long_path() {
        let mut map: DepthMap<&str, i64> = DepthMap::new(2).unwrap();
        map.entry(&["x", "y", "z"]);
    }

    #[test]
    fn auto_map() {
        let mut map: AutoMap<&str> = AutoMap::default();

        // Four levels materialize without any depth declaration.
        let deep = map.dive(["a", "b", "c", "d"]);
        assert!(deep.is_empty());

        assert_eq!(map.len(), 1);
        assert_eq!(
            map.get(&"a").unwrap().get(&"b").unwrap().len(),
            1
        );
        assert!(map.get(&"z").is_none());

        map.node("a").node("b").node("e");
        assert_eq!(map.get(&"a").unwrap().get(&"b").unwrap().len(), 2);
    }

    #[test]
    fn count_map_tallies() {
        let mut counts = count_map::<&str>();
        *counts.tally(&["hit"]) += 1;
        *counts.tally(&["hit"]) += 1;
        assert_eq!(counts.get(&["hit"]), Some(&2));
        assert_eq!(counts.get(&["miss"]), None);
    }

    #[test]
    fn group_map_defaults() {
        let mut groups = group_map::<&str, &str, u32>();
        groups.tally(&["outer"]).insert("inner", 3);
        assert_eq!(groups.get(&["outer"]).unwrap().get("inner"), Some(&3));
    }
}
