use std::cmp::Ordering;
use std::collections::VecDeque;
use std::fmt;
use std::iter::FusedIterator;
use std::mem;

use crate::{IndexError, Key};

/// Left-leaning red-black tree map from [`Key`] to `V`.
///
/// Every node owns its children and caches the size of its subtree, so rank
/// and select run in `O(log n)` alongside search, insertion and removal.
pub struct OrderedMap<V> {
    root: Link<V>,
}

type Link<V> = Option<Box<Node<V>>>;

#[derive(Clone)]
struct Node<V> {
    key: Key,
    value: V,
    red: bool,
    size: usize,
    left: Link<V>,
    right: Link<V>,
}

impl<V> Node<V> {
    fn leaf(key: Key, value: V) -> Self {
        Self {
            key,
            value,
            red: true,
            size: 1,
            left: None,
            right: None,
        }
    }

    fn size(link: &Link<V>) -> usize {
        link.as_ref().map_or(0, |n| n.size)
    }

    fn is_red(link: &Link<V>) -> bool {
        link.as_ref().is_some_and(|n| n.red)
    }

    /// Whether the left child of `link` is red.
    fn left_is_red(link: &Link<V>) -> bool {
        link.as_ref().is_some_and(|n| Self::is_red(&n.left))
    }

    fn refresh_size(&mut self) {
        self.size = 1 + Self::size(&self.left) + Self::size(&self.right);
    }

    fn rotate_left(mut h: Box<Self>) -> Box<Self> {
        let Some(mut x) = h.right.take() else {
            return h;
        };
        h.right = x.left.take();
        x.red = h.red;
        h.red = true;
        x.size = h.size;
        h.refresh_size();
        x.left = Some(h);
        x
    }

    fn rotate_right(mut h: Box<Self>) -> Box<Self> {
        let Some(mut x) = h.left.take() else {
            return h;
        };
        h.left = x.right.take();
        x.red = h.red;
        h.red = true;
        x.size = h.size;
        h.refresh_size();
        x.right = Some(h);
        x
    }

    fn flip_colors(&mut self) {
        self.red = !self.red;
        if let Some(left) = self.left.as_deref_mut() {
            left.red = !left.red;
        }
        if let Some(right) = self.right.as_deref_mut() {
            right.red = !right.red;
        }
    }

    fn balance(mut h: Box<Self>) -> Box<Self> {
        h.refresh_size();
        if Self::is_red(&h.right) && !Self::is_red(&h.left) {
            h = Self::rotate_left(h);
        }
        if Self::is_red(&h.left) && Self::left_is_red(&h.left) {
            h = Self::rotate_right(h);
        }
        if Self::is_red(&h.left) && Self::is_red(&h.right) {
            h.flip_colors();
        }
        h
    }

    fn fix_up(mut h: Box<Self>) -> Box<Self> {
        h.refresh_size();
        if Self::is_red(&h.right) {
            h = Self::rotate_left(h);
        }
        if Self::is_red(&h.left) && Self::left_is_red(&h.left) {
            h = Self::rotate_right(h);
        }
        if Self::is_red(&h.left) && Self::is_red(&h.right) {
            h.flip_colors();
        }
        h
    }

    fn move_red_left(mut h: Box<Self>) -> Box<Self> {
        h.flip_colors();
        if Self::left_is_red(&h.right) {
            if let Some(right) = h.right.take() {
                h.right = Some(Self::rotate_right(right));
            }
            h = Self::rotate_left(h);
            h.flip_colors();
        }
        h
    }

    fn move_red_right(mut h: Box<Self>) -> Box<Self> {
        h.flip_colors();
        if Self::left_is_red(&h.left) {
            h = Self::rotate_right(h);
            h.flip_colors();
        }
        h
    }

    fn insert(link: Link<V>, key: Key, value: V) -> (Box<Self>, Option<V>) {
        let Some(mut h) = link else {
            return (Box::new(Self::leaf(key, value)), None);
        };

        let old = match key.cmp(&h.key) {
            Ordering::Less => {
                let (left, old) = Self::insert(h.left.take(), key, value);
                h.left = Some(left);
                old
            }
            Ordering::Greater => {
                let (right, old) = Self::insert(h.right.take(), key, value);
                h.right = Some(right);
                old
            }
            Ordering::Equal => {
                let old = mem::replace(&mut h.value, value);
                return (h, Some(old));
            }
        };

        (Self::balance(h), old)
    }

    fn remove_min(mut h: Box<Self>) -> (Link<V>, Box<Self>) {
        if h.left.is_none() {
            return (h.right.take(), h);
        }
        if !Self::is_red(&h.left) && !Self::left_is_red(&h.left) {
            h = Self::move_red_left(h);
        }
        match h.left.take() {
            Some(left) => {
                let (new_left, min) = Self::remove_min(left);
                h.left = new_left;
                (Some(Self::fix_up(h)), min)
            }
            None => (h.right.take(), h),
        }
    }

    /// Removes `key` from the subtree rooted at `h`. The caller guarantees the
    /// key is present and that `h` or one of its children is red.
    fn remove(mut h: Box<Self>, key: Key) -> (Link<V>, Option<V>) {
        let removed = if key < h.key {
            if h.left.is_none() {
                return (Some(h), None);
            }
            if !Self::is_red(&h.left) && !Self::left_is_red(&h.left) {
                h = Self::move_red_left(h);
            }
            let (new_left, removed) = match h.left.take() {
                Some(left) => Self::remove(left, key),
                None => (None, None),
            };
            h.left = new_left;
            removed
        } else {
            if Self::is_red(&h.left) {
                h = Self::rotate_right(h);
            }
            if key == h.key && h.right.is_none() {
                let left = h.left.take();
                return (left, Some(h.value));
            }
            if h.right.is_some() && !Self::is_red(&h.right) && !Self::left_is_red(&h.right) {
                h = Self::move_red_right(h);
            }

            if key == h.key {
                match h.right.take() {
                    Some(right) => {
                        let (new_right, min) = Self::remove_min(right);
                        h.right = new_right;
                        let min = *min;
                        h.key = min.key;
                        Some(mem::replace(&mut h.value, min.value))
                    }
                    None => {
                        let left = h.left.take();
                        return (left, Some(h.value));
                    }
                }
            } else {
                let (new_right, removed) = match h.right.take() {
                    Some(right) => Self::remove(right, key),
                    None => (None, None),
                };
                h.right = new_right;
                removed
            }
        };

        (Some(Self::fix_up(h)), removed)
    }

    fn serialize_into(&self, delimiter: &str, nil: &str, out: &mut String) {
        out.push_str(&self.key.to_string());
        out.push_str(delimiter);
        if self.left.is_none() && self.right.is_none() {
            out.push_str(nil);
            return;
        }
        for child in [&self.left, &self.right] {
            match child.as_deref() {
                Some(node) => node.serialize_into(delimiter, nil, out),
                None => out.push_str(nil),
            }
        }
    }

    /// Returns the black height of the subtree, counting the empty link.
    fn check(
        link: &Link<V>,
        lower: Option<Key>,
        upper: Option<Key>,
        parent_red: bool,
    ) -> Result<usize, IndexError> {
        let Some(node) = link.as_deref() else {
            return Ok(1);
        };
        if lower.is_some_and(|lo| node.key <= lo) || upper.is_some_and(|hi| node.key >= hi) {
            return Err(IndexError::InvariantViolation(format!(
                "key {} breaks the search order",
                node.key
            )));
        }
        if node.red && parent_red {
            return Err(IndexError::InvariantViolation(format!(
                "two consecutive red links at key {}",
                node.key
            )));
        }
        if Self::is_red(&node.right) {
            return Err(IndexError::InvariantViolation(format!(
                "right-leaning red link below key {}",
                node.key
            )));
        }
        let expected = 1 + Self::size(&node.left) + Self::size(&node.right);
        if node.size != expected {
            return Err(IndexError::InvariantViolation(format!(
                "subtree size at key {} is {} but should be {}",
                node.key, node.size, expected
            )));
        }
        let left = Self::check(&node.left, lower, Some(node.key), node.red)?;
        let right = Self::check(&node.right, Some(node.key), upper, node.red)?;
        if left != right {
            return Err(IndexError::InvariantViolation(format!(
                "black height differs below key {} ({} vs {})",
                node.key, left, right
            )));
        }
        Ok(left + usize::from(!node.red))
    }
}

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        Self { root: None }
    }

    pub fn len(&self) -> usize {
        Node::size(&self.root)
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    fn find(&self, key: Key) -> Option<&Node<V>> {
        let mut cur = self.root.as_deref();
        while let Some(node) = cur {
            match key.cmp(&node.key) {
                Ordering::Less => cur = node.left.as_deref(),
                Ordering::Greater => cur = node.right.as_deref(),
                Ordering::Equal => return Some(node),
            }
        }
        None
    }

    pub fn get(&self, key: Key) -> Option<&V> {
        self.find(key).map(|node| &node.value)
    }

    pub fn get_mut(&mut self, key: Key) -> Option<&mut V> {
        let mut cur = self.root.as_deref_mut();
        while let Some(node) = cur {
            match key.cmp(&node.key) {
                Ordering::Less => cur = node.left.as_deref_mut(),
                Ordering::Greater => cur = node.right.as_deref_mut(),
                Ordering::Equal => return Some(&mut node.value),
            }
        }
        None
    }

    pub fn contains_key(&self, key: Key) -> bool {
        self.find(key).is_some()
    }

    /// Inserts `key`, overwriting and returning the previous value if the key
    /// was already present.
    pub fn insert(&mut self, key: Key, value: V) -> Option<V> {
        let (mut root, old) = Node::insert(self.root.take(), key, value);
        root.red = false;
        self.root = Some(root);
        old
    }

    pub fn remove(&mut self, key: Key) -> Option<V> {
        if !self.contains_key(key) {
            return None;
        }
        let mut root = self.root.take()?;
        if !Node::is_red(&root.left) && !Node::is_red(&root.right) {
            root.red = true;
        }
        let (root, removed) = Node::remove(root, key);
        self.root = root;
        if let Some(root) = self.root.as_deref_mut() {
            root.red = false;
        }
        removed
    }

    pub fn first_key(&self) -> Option<Key> {
        let mut node = self.root.as_deref()?;
        while let Some(left) = node.left.as_deref() {
            node = left;
        }
        Some(node.key)
    }

    pub fn last_key(&self) -> Option<Key> {
        let mut node = self.root.as_deref()?;
        while let Some(right) = node.right.as_deref() {
            node = right;
        }
        Some(node.key)
    }

    /// Number of keys strictly less than `key`.
    pub fn rank(&self, key: Key) -> usize {
        let mut rank = 0;
        let mut cur = self.root.as_deref();
        while let Some(node) = cur {
            match key.cmp(&node.key) {
                Ordering::Less => cur = node.left.as_deref(),
                Ordering::Greater => {
                    rank += 1 + Node::size(&node.left);
                    cur = node.right.as_deref();
                }
                Ordering::Equal => return rank + Node::size(&node.left),
            }
        }
        rank
    }

    /// Largest key `<= key`.
    pub fn floor(&self, key: Key) -> Option<Key> {
        let mut cur = self.root.as_deref();
        let mut candidate = None;
        while let Some(node) = cur {
            match key.cmp(&node.key) {
                Ordering::Less => cur = node.left.as_deref(),
                Ordering::Greater => {
                    candidate = Some(node.key);
                    cur = node.right.as_deref();
                }
                Ordering::Equal => return Some(node.key),
            }
        }
        candidate
    }

    /// Smallest key `>= key`.
    pub fn ceiling(&self, key: Key) -> Option<Key> {
        let mut cur = self.root.as_deref();
        let mut candidate = None;
        while let Some(node) = cur {
            match key.cmp(&node.key) {
                Ordering::Less => {
                    candidate = Some(node.key);
                    cur = node.left.as_deref();
                }
                Ordering::Greater => cur = node.right.as_deref(),
                Ordering::Equal => return Some(node.key),
            }
        }
        candidate
    }

    /// Entry whose key has exactly `rank` smaller keys.
    pub fn select(&self, rank: usize) -> Option<(Key, &V)> {
        let mut rank = rank;
        let mut cur = self.root.as_deref();
        while let Some(node) = cur {
            let left = Node::size(&node.left);
            match rank.cmp(&left) {
                Ordering::Less => cur = node.left.as_deref(),
                Ordering::Equal => return Some((node.key, &node.value)),
                Ordering::Greater => {
                    rank -= left + 1;
                    cur = node.right.as_deref();
                }
            }
        }
        None
    }

    pub fn iter(&self) -> Iter<'_, V> {
        Iter::new(&self.root)
    }

    pub fn keys(&self) -> Keys<'_, V> {
        Keys { inner: self.iter() }
    }

    pub fn values(&self) -> Values<'_, V> {
        Values { inner: self.iter() }
    }

    /// Node count on the longest root-to-leaf path, measured level by level.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut level: VecDeque<&Node<V>> = self.root.as_deref().into_iter().collect();
        while !level.is_empty() {
            depth += 1;
            for _ in 0..level.len() {
                if let Some(node) = level.pop_front() {
                    level.extend(node.left.as_deref());
                    level.extend(node.right.as_deref());
                }
            }
        }
        depth
    }

    /// Pre-order rendering of the keys. A leaf is closed by a single `nil`;
    /// an inner node with one empty child emits `nil` in that child's place.
    pub fn serialize(&self, delimiter: &str, nil: &str) -> String {
        let mut out = String::new();
        if let Some(root) = self.root.as_deref() {
            root.serialize_into(delimiter, nil, &mut out);
        }
        out
    }

    pub fn check_invariants(&self) -> Result<(), IndexError> {
        if Node::is_red(&self.root) {
            return Err(IndexError::InvariantViolation("root is red".to_string()));
        }
        Node::check(&self.root, None, None, false).map(|_| ())
    }
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone> Clone for OrderedMap<V> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
        }
    }
}

impl<V: PartialEq> PartialEq for OrderedMap<V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<V: Eq> Eq for OrderedMap<V> {}

impl<V: fmt::Debug> fmt::Debug for OrderedMap<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<V> FromIterator<(Key, V)> for OrderedMap<V> {
    fn from_iter<I: IntoIterator<Item = (Key, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<V> Extend<(Key, V)> for OrderedMap<V> {
    fn extend<I: IntoIterator<Item = (Key, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<'a, V> IntoIterator for &'a OrderedMap<V> {
    type Item = (Key, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// In-order iterator over the entries of an [`OrderedMap`].
pub struct Iter<'a, V> {
    stack: Vec<&'a Node<V>>,
    remaining: usize,
}

impl<'a, V> Iter<'a, V> {
    fn new(root: &'a Link<V>) -> Self {
        let mut iter = Self {
            stack: Vec::new(),
            remaining: Node::size(root),
        };
        iter.descend_left(root.as_deref());
        iter
    }

    fn descend_left(&mut self, mut cur: Option<&'a Node<V>>) {
        while let Some(node) = cur {
            self.stack.push(node);
            cur = node.left.as_deref();
        }
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (Key, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.descend_left(node.right.as_deref());
        self.remaining -= 1;
        Some((node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

impl<V> FusedIterator for Iter<'_, V> {}

pub struct Keys<'a, V> {
    inner: Iter<'a, V>,
}

impl<V> Iterator for Keys<'_, V> {
    type Item = Key;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for Keys<'_, V> {}

impl<V> FusedIterator for Keys<'_, V> {}

pub struct Values<'a, V> {
    inner: Iter<'a, V>,
}

impl<'a, V> Iterator for Values<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for Values<'_, V> {}

impl<V> FusedIterator for Values<'_, V> {}
