//! Prefix dictionary used to resolve abbreviated names.
//!
//! A token resolves to an entry when it is the entry's exact name or a
//! prefix shared by no other entry.

use std::collections::BTreeMap;
use std::ops::Bound;

/// Result of looking a token up in a [`PrefixDict`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<V> {
    Found(V),
    /// Every name the token is a prefix of, sorted.
    Ambiguous(Vec<String>),
    NotFound,
}

#[derive(Debug, Clone)]
pub struct PrefixDict<V> {
    entries: BTreeMap<String, V>,
}

impl<V> Default for PrefixDict<V> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<V: Clone> PrefixDict<V> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `value` under `name`, returning the value it replaced.
    pub fn insert(&mut self, name: impl Into<String>, value: V) -> Option<V> {
        self.entries.insert(name.into(), value)
    }

    /// Exact lookup, no prefix matching.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&V> {
        self.entries.get(name)
    }

    #[must_use]
    pub fn lookup(&self, token: &str) -> Lookup<V> {
        if let Some(value) = self.entries.get(token) {
            return Lookup::Found(value.clone());
        }

        let mut candidates = self
            .entries
            .range::<str, _>((Bound::Included(token), Bound::Unbounded))
            .take_while(|(name, _)| name.starts_with(token));

        match (candidates.next(), candidates.next()) {
            (None, _) => Lookup::NotFound,
            (Some((_, value)), None) => Lookup::Found(value.clone()),
            (Some((first, _)), Some((second, _))) => {
                let mut names = vec![first.clone(), second.clone()];
                names.extend(candidates.map(|(name, _)| name.clone()));
                Lookup::Ambiguous(names)
            }
        }
    }

    /// All names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Clone> FromIterator<(K, V)> for PrefixDict<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut dict = Self::new();
        for (name, value) in iter {
            dict.insert(name, value);
        }
        dict
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commands() -> PrefixDict<usize> {
        [("build", 0), ("bundle", 1), ("clean", 2)]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_exact_match() {
        assert_eq!(commands().lookup("clean"), Lookup::Found(2));
    }

    #[test]
    fn test_unique_prefix() {
        assert_eq!(commands().lookup("bui"), Lookup::Found(0));
        assert_eq!(commands().lookup("c"), Lookup::Found(2));
    }

    #[test]
    fn test_ambiguous_prefix_is_sorted() {
        assert_eq!(
            commands().lookup("bu"),
            Lookup::Ambiguous(vec!["build".to_string(), "bundle".to_string()])
        );
    }

    #[test]
    fn test_not_found() {
        assert_eq!(commands().lookup("deploy"), Lookup::NotFound);
        assert_eq!(commands().lookup("builds"), Lookup::NotFound);
    }

    #[test]
    fn test_exact_match_wins_over_longer_names() {
        let dict: PrefixDict<u8> = [("run", 0), ("runner", 1)].into_iter().collect();
        assert_eq!(dict.lookup("run"), Lookup::Found(0));
        assert_eq!(dict.lookup("runn"), Lookup::Found(1));
    }

    #[test]
    fn test_insert_replaces() {
        let mut dict = PrefixDict::new();
        assert_eq!(dict.insert("a", 1), None);
        assert_eq!(dict.insert("a", 2), Some(1));
        assert_eq!(dict.len(), 1);
        assert_eq!(dict.get("a"), Some(&2));
    }

    #[test]
    fn test_empty_token_on_single_entry() {
        let dict: PrefixDict<u8> = [("only", 7)].into_iter().collect();
        assert_eq!(dict.lookup(""), Lookup::Found(7));
        assert!(PrefixDict::<u8>::new().is_empty());
        assert_eq!(PrefixDict::<u8>::new().lookup(""), Lookup::NotFound);
    }

    #[test]
    fn test_names_sorted() {
        let dict = commands();
        let names: Vec<&str> = dict.names().collect::<Vec<_>>();
        assert_eq!(names, vec!["build", "bundle", "clean"]);
    }
}
