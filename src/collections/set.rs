use std::collections::HashSet;

/// A set of strings that enumerates members in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderedSet {
    order: Vec<String>,
    members: HashSet<String>,
}

impl OrderedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a member, returning `false` if it was already present.
    pub fn insert(&mut self, member: &str) -> bool {
        if self.members.contains(member) {
            return false;
        }

        self.members.insert(member.to_string());
        self.order.push(member.to_string());
        true
    }

    pub fn remove(&mut self, member: &str) -> bool {
        if !self.members.remove(member) {
            return false;
        }

        self.order.retain(|existing| existing != member);
        true
    }

    pub fn contains(&self, member: &str) -> bool {
        self.members.contains(member)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.order.iter()
    }
}
