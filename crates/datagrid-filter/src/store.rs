//! Predicate store
//!
//! Ordered list of the active predicates. A column's predicates form a
//! *group* (matched by column uid or field name); groups are replaced in
//! place so the position of a column in the filter order is stable across
//! edits.


use crate::predicate::FilterPredicate;

/// Ordered collection of active filter predicates
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredicateStore {
    predicates: Vec<FilterPredicate>,
}

impl PredicateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_predicates(predicates: Vec<FilterPredicate>) -> Self {
        Self { predicates }
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FilterPredicate> {
        self.predicates.iter()
    }

    pub fn to_vec(&self) -> Vec<FilterPredicate> {
        self.predicates.clone()
    }

    /// Append a predicate without reconciling
    pub fn push(&mut self, predicate: FilterPredicate) {
        self.predicates.push(predicate);
    }

    /// Whether any predicate filters `field`
    pub fn contains_field(&self, field: &str) -> bool {
        self.predicates.iter().any(|p| p.field == field)
    }

    /// The predicates of one column, in store order
    pub fn group(&self, uid: &str, field: &str) -> Vec<FilterPredicate> {
        self.predicates
            .iter()
            .filter(|p| p.belongs_to(uid, field))
            .cloned()
            .collect()
    }

    /// Distinct filtered field names, in order of first appearance
    pub fn fields(&self) -> Vec<String> {
        let mut fields: Vec<String> = Vec::new();
        for predicate in &self.predicates {
            if !fields.iter().any(|f| f == &predicate.field) {
                fields.push(predicate.field.clone());
            }
        }
        fields
    }

    /// Whether the stored group of a column is exactly `group`
    pub fn group_matches(&self, uid: &str, field: &str, group: &[FilterPredicate]) -> bool {
        let mut stored = self.predicates.iter().filter(|p| p.belongs_to(uid, field));
        let mut expected = group.iter();
        loop {
            match (stored.next(), expected.next()) {
                (None, None) => return true,
                (Some(a), Some(b)) if a == b => continue,
                _ => return false,
            }
        }
    }

    /// Replace a column's group with `group`
    ///
    /// The new group takes the position of the first predicate of the old
    /// one, or is appended when the column was not filtered.
    pub fn replace_group(&mut self, uid: &str, field: &str, group: Vec<FilterPredicate>) {
        let position = self.predicates.iter().position(|p| p.belongs_to(uid, field));
        self.predicates.retain(|p| !p.belongs_to(uid, field));
        match position {
            Some(index) => {
                self.predicates.splice(index..index, group);
            }
            None => self.predicates.extend(group),
        }
    }

    /// Remove a column's group, returning the removed predicates
    pub fn remove_group(&mut self, uid: &str, field: &str) -> Vec<FilterPredicate> {
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.predicates)
            .into_iter()
            .partition(|p| p.belongs_to(uid, field));
        self.predicates = kept;
        removed
    }

    /// Keep only the predicates `keep` approves, which may also rewrite them.
    /// Returns how many were dropped.
    pub fn retain_mut(&mut self, keep: impl FnMut(&mut FilterPredicate) -> bool) -> usize {
        let before = self.predicates.len();
        self.predicates.retain_mut(keep);
        before - self.predicates.len()
    }
}

impl<'a> IntoIterator for &'a PredicateStore {
    type Item = &'a FilterPredicate;
    type IntoIter = std::slice::Iter<'a, FilterPredicate>;

    fn into_iter(self) -> Self::IntoIter {
        self.predicates.iter()
    }
}
