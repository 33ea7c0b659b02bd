use std::collections::BTreeMap;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use crate::error::PtolemyError;
use crate::error::Result;

/// Union-find over keys where every link carries a sign: identifying
/// `a` with `sign · b`. Identifying a key with its own negation is an
/// error.
#[derive(Clone, Debug)]
pub struct SignedEquivalence<K> {
    indices: HashMap<K, usize>,
    keys: Vec<K>,
    parents: Vec<usize>,
    /// `keys[i] = signs[i] · keys[parents[i]]`
    signs: Vec<i32>,
}

impl<K> Default for SignedEquivalence<K> {
    fn default() -> Self {
        Self {
            indices: HashMap::new(),
            keys: vec![],
            parents: vec![],
            signs: vec![],
        }
    }
}

impl<K: Clone + Debug + Hash + Ord> SignedEquivalence<K> {
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.indices.contains_key(key)
    }

    pub fn insert(&mut self, key: K) -> usize {
        if let Some(index) = self.indices.get(&key) {
            return *index;
        }
        let index = self.keys.len();
        self.indices.insert(key.clone(), index);
        self.keys.push(key);
        self.parents.push(index);
        self.signs.push(1);
        index
    }

    /// The root of the tree containing `index` and the sign of the
    /// element relative to it. Compresses the path.
    fn find(&mut self, index: usize) -> (usize, i32) {
        let parent = self.parents[index];
        if parent == index {
            return (index, 1);
        }
        let (root, parent_sign) = self.find(parent);
        let sign = self.signs[index] * parent_sign;
        self.parents[index] = root;
        self.signs[index] = sign;
        (root, sign)
    }

    fn find_without_compression(&self, mut index: usize) -> (usize, i32) {
        let mut sign = 1;
        while self.parents[index] != index {
            sign *= self.signs[index];
            index = self.parents[index];
        }
        (index, sign)
    }

    /// Records `a = sign · b`.
    pub fn identify(&mut self, a: K, b: K, sign: i32) -> Result<()> {
        debug_assert!(sign == 1 || sign == -1);
        let index_a = self.insert(a);
        let index_b = self.insert(b);
        let (root_a, sign_a) = self.find(index_a);
        let (root_b, sign_b) = self.find(index_b);
        if root_a == root_b {
            if sign_a != sign * sign_b {
                return Err(PtolemyError::structural(format!(
                    "{:?} is identified with its own negation",
                    self.keys[index_a]
                )));
            }
            return Ok(());
        }
        self.parents[root_a] = root_b;
        self.signs[root_a] = sign_a * sign * sign_b;
        Ok(())
    }

    /// The smallest key equivalent to `key` up to sign, and the sign
    /// relating them.
    pub fn representative(&self, key: &K) -> Option<(i32, K)> {
        let index = *self.indices.get(key)?;
        let (root, sign) = self.find_without_compression(index);
        let (min_sign, min_key) = (0..self.keys.len())
            .filter_map(|i| {
                let (r, s) = self.find_without_compression(i);
                (r == root).then(|| (s, &self.keys[i]))
            })
            .min_by_key(|(_, k)| *k)?;
        Some((sign * min_sign, min_key.clone()))
    }

    /// Every key mapped to its signed representative.
    pub fn canonical_representatives(&self) -> BTreeMap<K, (i32, K)> {
        let roots: Vec<(usize, i32)> = (0..self.keys.len())
            .map(|i| self.find_without_compression(i))
            .collect();
        let mut smallest: HashMap<usize, (i32, &K)> = HashMap::new();
        for (i, (root, sign)) in roots.iter().enumerate() {
            let key = &self.keys[i];
            smallest
                .entry(*root)
                .and_modify(|entry| {
                    if key < entry.1 {
                        *entry = (*sign, key);
                    }
                })
                .or_insert((*sign, key));
        }
        roots
            .iter()
            .enumerate()
            .map(|(i, (root, sign))| {
                let (min_sign, min_key) = smallest[root];
                (self.keys[i].clone(), (sign * min_sign, min_key.clone()))
            })
            .collect()
    }
}
