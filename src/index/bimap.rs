use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

/// Why a pair was refused by [`BidirectionalMap::insert`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertConflict {
    LeftTaken,
    RightTaken,
}

impl fmt::Display for InsertConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsertConflict::LeftTaken => write!(f, "left key already mapped"),
            InsertConflict::RightTaken => write!(f, "right key already mapped"),
        }
    }
}

/// One-to-one map that remembers insertion order
#[derive(Debug, Clone)]
pub struct BidirectionalMap<L, R> {
    forward: HashMap<L, R>,
    backward: HashMap<R, L>,
    order: Vec<L>,
}

impl<L, R> Default for BidirectionalMap<L, R> {
    fn default() -> Self {
        Self {
            forward: HashMap::new(),
            backward: HashMap::new(),
            order: Vec::new(),
        }
    }
}

impl<L, R> BidirectionalMap<L, R>
where
    L: Eq + Hash + Clone,
    R: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pair. The map is left untouched when either side is already used.
    pub fn insert(&mut self, left: L, right: R) -> Result<(), InsertConflict> {
        if self.forward.contains_key(&left) {
            return Err(InsertConflict::LeftTaken);
        }
        if self.backward.contains_key(&right) {
            return Err(InsertConflict::RightTaken);
        }
        self.forward.insert(left.clone(), right.clone());
        self.backward.insert(right, left.clone());
        self.order.push(left);
        Ok(())
    }

    pub fn get_by_left(&self, left: &L) -> Option<&R> {
        self.forward.get(left)
    }

    pub fn get_by_right(&self, right: &R) -> Option<&L> {
        self.backward.get(right)
    }

    pub fn contains_left(&self, left: &L) -> bool {
        self.forward.contains_key(left)
    }

    pub fn contains_right(&self, right: &R) -> bool {
        self.backward.contains_key(right)
    }

    pub fn lefts(&self) -> impl Iterator<Item = &L> {
        self.order.iter()
    }

    /// Pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&L, &R)> {
        self.order
            .iter()
            .filter_map(move |left| self.forward.get(left).map(|right| (left, right)))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn clear(&mut self) {
        self.forward.clear();
        self.backward.clear();
        self.order.clear();
    }
}
