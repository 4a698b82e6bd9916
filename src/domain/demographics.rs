use std::collections::BTreeMap;

/// Value held by a single demographic (custom field) of a record.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(untagged)]
pub enum DemographicValue {
    Single(String),
    Multiple(Vec<String>),
}

impl DemographicValue {
    pub fn values(&self) -> &[String] {
        match self {
            DemographicValue::Single(value) => std::slice::from_ref(value),
            DemographicValue::Multiple(values) => values,
        }
    }

    /// Appends a value, turning a single value into a list.
    pub fn push(&mut self, value: String) {
        match self {
            DemographicValue::Single(first) => {
                let first = std::mem::take(first);
                *self = DemographicValue::Multiple(vec![first, value]);
            }
            DemographicValue::Multiple(values) => values.push(value),
        }
    }
}

impl From<&str> for DemographicValue {
    fn from(value: &str) -> Self {
        DemographicValue::Single(value.to_string())
    }
}

impl From<String> for DemographicValue {
    fn from(value: String) -> Self {
        DemographicValue::Single(value)
    }
}

impl From<Vec<&str>> for DemographicValue {
    fn from(values: Vec<&str>) -> Self {
        DemographicValue::Multiple(values.into_iter().map(String::from).collect())
    }
}

impl From<Vec<String>> for DemographicValue {
    fn from(values: Vec<String>) -> Self {
        DemographicValue::Multiple(values)
    }
}

/// Demographic values of a record keyed by demographic id.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct Demographics(BTreeMap<u32, DemographicValue>);

impl Demographics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, id: u32, value: impl Into<DemographicValue>) -> Self {
        self.0.insert(id, value.into());
        self
    }

    /// Adds one occurrence of a demographic: the first occurrence of an id is a
    /// single value, any further occurrence collapses the id into a list.
    pub fn append(&mut self, id: u32, value: String) {
        match self.0.get_mut(&id) {
            Some(existing) => existing.push(value),
            None => {
                self.0.insert(id, DemographicValue::Single(value));
            }
        }
    }

    pub fn get(&self, id: u32) -> Option<&DemographicValue> {
        self.0.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &DemographicValue)> {
        self.0.iter().map(|(id, value)| (*id, value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
