//! Header name/value mapping shared by requests and responses.

/// An ordered name → value mapping with case-insensitive names.
///
/// Setting a header that is already present replaces its value, so middleware
/// that write the same header overwrite one another instead of accumulating
/// duplicates.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Case-insensitive header lookup.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Sets a header, replacing any existing value under the same name
    /// (compared case-insensitively). A replaced entry keeps its original
    /// spelling.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(&name)) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize { self.entries.len() }
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        let mut headers = Headers::new();
        headers.set("Content-Type", "application/json");

        assert_eq!(headers.get("content-type"), Some("application/json"));
        assert_eq!(headers.get("CONTENT-TYPE"), Some("application/json"));
        assert_eq!(headers.get("accept"), None);
    }

    #[test]
    fn set_overwrites_instead_of_appending() {
        let mut headers = Headers::new();
        headers.set("Accept", "text/html");
        headers.set("accept", "application/json");

        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("Accept"), Some("application/json"));
    }

    #[test]
    fn replaced_entries_keep_their_original_spelling() {
        let mut headers = Headers::new();
        headers.set("X-Request-Id", "1");
        headers.set("x-request-id", "2");

        let entries: Vec<_> = headers.iter().collect();
        assert_eq!(entries, vec![("X-Request-Id", "2")]);
    }

    #[test]
    fn iteration_preserves_insertion_order() {
        let mut headers = Headers::new();
        headers.set("a", "1");
        headers.set("b", "2");
        headers.set("c", "3");

        let names: Vec<_> = headers.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }
}
