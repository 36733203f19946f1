//! Feature record and vector shapes consumed by the scaler and classifier

use std::collections::HashMap;

/// Single-row mapping from feature name to value.
///
/// Key order is not meaningful until the record is aligned against the
/// bundle's feature names with [`FeatureRecord::to_vector`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureRecord {
    values: HashMap<String, f64>,
}

impl FeatureRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Insert 0 for every expected feature the record lacks.
    ///
    /// Returns the names that were defaulted. Running it twice is a no-op the
    /// second time.
    pub fn reconcile(&mut self, feature_names: &[String]) -> Vec<String> {
        let mut defaulted = Vec::new();
        for name in feature_names {
            if !self.values.contains_key(name) {
                self.values.insert(name.clone(), 0.0);
                defaulted.push(name.clone());
            }
        }
        defaulted
    }

    /// Read the record in exactly the given column order.
    ///
    /// Names the record lacks read as 0; call [`reconcile`](Self::reconcile)
    /// first to make that explicit.
    pub fn to_vector(&self, feature_names: &[String]) -> FeatureVector {
        let values = feature_names
            .iter()
            .map(|name| self.values.get(name).copied().unwrap_or(0.0))
            .collect();

        FeatureVector {
            columns: feature_names.to_vec(),
            values,
        }
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for FeatureRecord {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Ordered, purely numeric row together with the column names it was read in.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    pub columns: Vec<String>,
    pub values: Vec<f64>,
}

impl FeatureVector {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value of a named column
    pub fn value(&self, name: &str) -> Option<f64> {
        self.columns
            .iter()
            .position(|c| c == name)
            .map(|i| self.values[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_reconcile_defaults_missing_to_zero() {
        let mut record: FeatureRecord = [("age", 45.0), ("bmi", 28.5)].into_iter().collect();
        let expected = names(&["age", "ever_married_Yes", "bmi"]);

        let defaulted = record.reconcile(&expected);

        assert_eq!(defaulted, names(&["ever_married_Yes"]));
        assert_eq!(record.get("ever_married_Yes"), Some(0.0));
        assert_eq!(record.get("age"), Some(45.0));
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let mut record: FeatureRecord = [("age", 45.0)].into_iter().collect();
        let expected = names(&["age", "bmi", "gender"]);

        record.reconcile(&expected);
        let once = record.clone();
        let defaulted = record.reconcile(&expected);

        assert!(defaulted.is_empty());
        assert_eq!(record, once);
    }

    #[test]
    fn test_to_vector_follows_given_order() {
        let record: FeatureRecord = [("b", 2.0), ("a", 1.0), ("c", 3.0)].into_iter().collect();
        let order = names(&["c", "a", "b"]);

        let vector = record.to_vector(&order);

        assert_eq!(vector.columns, order);
        assert_eq!(vector.values, vec![3.0, 1.0, 2.0]);
        assert_eq!(vector.value("a"), Some(1.0));
    }

    #[test]
    fn test_extra_record_keys_are_dropped() {
        let record: FeatureRecord = [("a", 1.0), ("unused", 9.0)].into_iter().collect();
        let vector = record.to_vector(&names(&["a"]));

        assert_eq!(vector.len(), 1);
        assert_eq!(vector.value("unused"), None);
    }
}
