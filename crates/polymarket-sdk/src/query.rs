//! Ordered query-string parameters
//!
//! Filters implement [`ToQueryParams`]. List-valued filters repeat the key
//! once per value (`id=1&id=2`), which is how the REST APIs expect them.

/// Ordered `(key, value)` pairs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: &str, value: impl ToString) {
        self.0.push((key.to_string(), value.to_string()));
    }

    /// Push when the value is set
    pub fn push_opt<T: ToString>(&mut self, key: &str, value: Option<&T>) {
        if let Some(value) = value {
            self.push(key, value.to_string());
        }
    }

    /// Push the key once per value
    pub fn push_all<T: ToString>(&mut self, key: &str, values: &[T]) {
        for value in values {
            self.push(key, value.to_string());
        }
    }

    /// First value for a key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Every value for a key, in insertion order
    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.0
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    pub fn as_slice(&self) -> &[(String, String)] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Append every pair of `other`
    pub fn extend(&mut self, other: QueryParams) {
        self.0.extend(other.0);
    }
}

/// Capability of producing query parameters
pub trait ToQueryParams {
    fn to_query_params(&self) -> QueryParams;
}

impl ToQueryParams for QueryParams {
    fn to_query_params(&self) -> QueryParams {
        self.clone()
    }
}

impl<T: ToQueryParams> ToQueryParams for Option<T> {
    fn to_query_params(&self) -> QueryParams {
        self.as_ref()
            .map(ToQueryParams::to_query_params)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_all_repeats_key() {
        let mut params = QueryParams::new();
        params.push("limit", 10);
        params.push_all("id", &[1, 2, 3]);
        params.push_opt::<String>("slug", None);

        assert_eq!(params.len(), 4);
        assert_eq!(params.get("limit"), Some("10"));
        assert_eq!(params.get_all("id"), vec!["1", "2", "3"]);
        assert_eq!(params.get("slug"), None);
    }

    #[test]
    fn test_option_filters() {
        let none: Option<QueryParams> = None;
        assert!(none.to_query_params().is_empty());

        let mut inner = QueryParams::new();
        inner.push("a", "b");
        assert_eq!(Some(inner.clone()).to_query_params(), inner);
    }
}
