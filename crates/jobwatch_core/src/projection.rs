use serde_json::{Map, Value};

/// Append-only log shown to the user for the current run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunLog {
    lines: Vec<String>,
}

impl RunLog {
    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

/// Structured status reported by the remote job.
///
/// Updates are shallow: a partial snapshot replaces the keys it names and
/// leaves every other key alone. Nested values are never merged.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusSnapshot {
    fields: Map<String, Value>,
}

impl StatusSnapshot {
    pub fn merge(&mut self, partial: Map<String, Value>) {
        for (key, value) in partial {
            self.fields.insert(key, value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn clear(&mut self) {
        self.fields.clear();
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.fields.clone())
    }
}
