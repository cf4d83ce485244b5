use std::collections::HashMap;

/// Field/value map that enumerates fields in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HashValue {
    order: Vec<String>,
    fields: HashMap<String, String>,
}

impl HashValue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field, returning `true` if the field did not exist before.
    pub fn insert(&mut self, field: &str, value: &str) -> bool {
        match self.fields.insert(field.to_string(), value.to_string()) {
            Some(_) => false,
            None => {
                self.order.push(field.to_string());
                true
            }
        }
    }

    pub fn get(&self, field: &str) -> Option<&String> {
        self.fields.get(field)
    }

    pub fn remove(&mut self, field: &str) -> bool {
        if self.fields.remove(field).is_none() {
            return false;
        }

        self.order.retain(|existing| existing != field);
        true
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.order
            .iter()
            .filter_map(|field| self.fields.get(field).map(|value| (field, value)))
    }
}
