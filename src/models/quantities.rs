use std::ops::Index;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Selected amount per food, kept in catalog order.
///
/// Whole amounts serialize as JSON integers, fractional ones as floats.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Quantities {
    entries: Vec<(String, f64)>,
}

impl Quantities {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the amount for `name`, keeping its first position.
    pub fn insert(&mut self, name: impl Into<String>, qty: f64) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = qty,
            None => self.entries.push((name, qty)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&f64> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, q)| q)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &f64)> {
        self.entries.iter().map(|(n, q)| (n.as_str(), q))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &f64> {
        self.entries.iter().map(|(_, q)| q)
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for Quantities {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut quantities = Quantities::new();
        for (name, qty) in iter {
            quantities.insert(name, qty);
        }
        quantities
    }
}

impl Index<&str> for Quantities {
    type Output = f64;

    fn index(&self, name: &str) -> &f64 {
        match self.get(name) {
            Some(qty) => qty,
            None => panic!("no quantity for '{}'", name),
        }
    }
}

impl Serialize for Quantities {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, qty) in &self.entries {
            if qty.fract() == 0.0 && *qty >= 0.0 && *qty <= u64::MAX as f64 {
                map.serialize_entry(name, &(*qty as u64))?;
            } else {
                map.serialize_entry(name, qty)?;
            }
        }
        map.end()
    }
}
