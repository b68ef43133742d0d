use std::fmt;

/// Identifies one cached query: operation name plus parameter tuple
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    operation: String,
    params: Vec<String>,
}

/// Selects the keys an invalidation applies to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyPattern {
    /// Every key in the cache
    All,
    /// Every parameter tuple of one operation
    Operation(String),
    /// Same operation, parameters starting with the given ones
    Prefix(QueryKey),
    Exact(QueryKey),
}

impl QueryKey {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            params: Vec::new(),
        }
    }

    pub fn param(mut self, value: impl ToString) -> Self {
        self.params.push(value.to_string());
        self
    }

    /// Distinguishes "no filter" from any concrete value
    pub fn optional_param(mut self, value: Option<&str>) -> Self {
        self.params.push(format!("{:?}", value));
        self
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.params.is_empty() {
            write!(f, "{}", self.operation)
        } else {
            write!(f, "{}[{}]", self.operation, self.params.join(", "))
        }
    }
}

impl KeyPattern {
    pub fn operation(name: impl Into<String>) -> Self {
        KeyPattern::Operation(name.into())
    }

    pub fn matches(&self, key: &QueryKey) -> bool {
        match self {
            KeyPattern::All => true,
            KeyPattern::Operation(name) => key.operation == *name,
            KeyPattern::Prefix(prefix) => {
                key.operation == prefix.operation && key.params.starts_with(&prefix.params)
            }
            KeyPattern::Exact(exact) => key == exact,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(QueryKey::new("featuredProducts").to_string(), "featuredProducts");
        assert_eq!(
            QueryKey::new("listProductsPage").param(2).to_string(),
            "listProductsPage[2]"
        );
    }

    #[test]
    fn test_optional_param_distinguishes_none() {
        let all = QueryKey::new("products").optional_param(None);
        let named = QueryKey::new("products").optional_param(Some("None"));
        assert_ne!(all, named);
    }

    #[test]
    fn test_patterns() {
        let key = QueryKey::new("product").param("p1").param("full");

        assert!(KeyPattern::All.matches(&key));
        assert!(KeyPattern::operation("product").matches(&key));
        assert!(!KeyPattern::operation("products").matches(&key));
        assert!(KeyPattern::Prefix(QueryKey::new("product").param("p1")).matches(&key));
        assert!(!KeyPattern::Prefix(QueryKey::new("product").param("p2")).matches(&key));
        assert!(KeyPattern::Exact(key.clone()).matches(&key));
        assert!(!KeyPattern::Exact(QueryKey::new("product").param("p1")).matches(&key));
    }
}
