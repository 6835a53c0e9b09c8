//! Ordered, case-insensitive header collection.
//!
//! Names are lowercased on entry, so `Content-Type` and `content-type` refer
//! to the same header. Insertion order is kept for formatting: overwriting a
//! header keeps its original position.

/// Header name → value pairs owned by a `RequestContext`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn has(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.position(name).map(|i| self.entries[i].1.as_str())
    }

    /// Set a header, replacing any existing value for the same name.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.position(name) {
            Some(i) => self.entries[i].1 = value,
            None => self.entries.push((name.to_ascii_lowercase(), value)),
        }
    }

    /// Merge headers in: existing names are overwritten, new names appended.
    pub fn merge<I, K, V>(&mut self, headers: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        for (name, value) in headers {
            self.set(name.as_ref(), value);
        }
    }

    /// Remove a header, returning its value if it was present.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.position(name).map(|i| self.entries.remove(i).1)
    }

    /// Iterate `(name, value)` pairs in insertion order. Names are lowercase.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Format one header as `"name: value"`.
    pub fn line(&self, name: &str) -> Option<String> {
        self.position(name).map(|i| format_line(&self.entries[i]))
    }

    /// Format every header as `"name: value"`, in insertion order.
    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(format_line).collect()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k.eq_ignore_ascii_case(name))
    }
}

fn format_line((name, value): &(String, String)) -> String {
    format!("{name}: {value}")
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        headers.merge(iter);
        headers
    }
}

impl From<Headers> for Vec<(String, String)> {
    fn from(headers: Headers) -> Self {
        headers.entries
    }
}
