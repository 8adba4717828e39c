//! A single logical request against the Shortcut API.

use serde_json::Value;

use crate::error::ApiError;
use crate::http::HttpMethod;

/// Query parameter value. Lists are sent as the key repeated per element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    Scalar(String),
    List(Vec<String>),
}

macro_rules! scalar_from {
    ($($t:ty),*) => {
        $(impl From<$t> for QueryValue {
            fn from(value: $t) -> Self {
                QueryValue::Scalar(value.to_string())
            }
        })*
    };
}

scalar_from!(&str, String, &String, bool, i32, i64, u32, u64, usize);

impl<T: ToString> From<Vec<T>> for QueryValue {
    fn from(items: Vec<T>) -> Self {
        QueryValue::List(items.iter().map(ToString::to_string).collect())
    }
}

/// Method, relative path, ordered query parameters and optional JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    method: HttpMethod,
    path: String,
    query: Vec<(String, QueryValue)>,
    body: Option<Value>,
}

impl Operation {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    /// Build from a raw method name, failing fast on anything unsupported.
    pub fn parse(method: &str, path: impl Into<String>) -> Result<Self, ApiError> {
        Ok(Self::new(method.parse()?, path))
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Append the parameter only when a value is present.
    pub fn with_optional_query<V: Into<QueryValue>>(
        self,
        key: impl Into<String>,
        value: Option<V>,
    ) -> Self {
        match value {
            Some(v) => self.with_query(key, v),
            None => self,
        }
    }

    pub fn with_query_pairs<I, K>(self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, QueryValue)>,
        K: Into<String>,
    {
        pairs
            .into_iter()
            .fold(self, |op, (key, value)| op.with_query(key, value))
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &[(String, QueryValue)] {
        &self.query
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }
}
