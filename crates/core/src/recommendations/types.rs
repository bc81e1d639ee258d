//! Types describing recommendation requests and results.

use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ============================================================================
// Request description
// ============================================================================

/// Recommendation algorithm exposed by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    /// Globally popular titles.
    Popular,
    /// Item-based collaborative filtering for a user.
    CollaborativeFilter,
    /// Content-based neighbours of submitted titles.
    ByTitles,
}

impl Algorithm {
    /// Path segment under `/recommend/`.
    pub fn path_segment(&self) -> &'static str {
        match self {
            Algorithm::Popular => "popular",
            Algorithm::CollaborativeFilter => "itemcf",
            Algorithm::ByTitles => "by-titles",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single request parameter value.
///
/// `Null` marks an absent value: it is left out of query strings and encoded
/// as JSON `null` in request bodies.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<ParamValue>),
}

impl ParamValue {
    pub fn is_null(&self) -> bool {
        matches!(self, ParamValue::Null)
    }

    /// String form used in query strings. `None` for absent values.
    pub fn coerce(&self) -> Option<String> {
        match self {
            ParamValue::Null => None,
            other => Some(other.to_string()),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Null => Ok(()),
            ParamValue::Bool(b) => write!(f, "{}", b),
            ParamValue::Int(i) => write!(f, "{}", i),
            ParamValue::Float(x) => f.write_str(&js_number(*x)),
            ParamValue::Text(s) => f.write_str(s),
            ParamValue::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
        }
    }
}

impl ParamValue {
    /// JSON form used in request bodies. Non-finite floats become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value;
        match self {
            ParamValue::Null => Value::Null,
            ParamValue::Bool(b) => Value::Bool(*b),
            ParamValue::Int(i) => Value::from(*i),
            ParamValue::Float(x) => serde_json::Number::from_f64(*x)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            ParamValue::Text(s) => Value::String(s.clone()),
            ParamValue::List(items) => Value::Array(items.iter().map(Self::to_json).collect()),
        }
    }
}

/// Number formatting of ECMAScript `Number::toString`: plain digits between
/// 1e-7 and 1e21, exponent form outside, and `-0` prints as `0`.
fn js_number(x: f64) -> String {
    if x.is_nan() {
        return "NaN".to_string();
    }
    if x == 0.0 {
        return "0".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let sign = if x < 0.0 { "-" } else { "" };
    // Shortest round-trip digits, e.g. "1.5e-7".
    let scientific = format!("{:e}", x.abs());
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some(parts) => parts,
        None => return format!("{}{}", sign, scientific),
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();

    let k = digits.len() as i32;
    let n = exponent + 1;
    let body = if k <= n && n <= 21 {
        format!("{}{}", digits, "0".repeat((n - k) as usize))
    } else if 0 < n && n <= 21 {
        let (int, frac) = digits.split_at(n as usize);
        format!("{}.{}", int, frac)
    } else if -6 < n && n <= 0 {
        format!("0.{}{}", "0".repeat((-n) as usize), digits)
    } else {
        let e = n - 1;
        let e_sign = if e >= 0 { '+' } else { '-' };
        let (lead, rest) = digits.split_at(1);
        if rest.is_empty() {
            format!("{}e{}{}", lead, e_sign, e.abs())
        } else {
            format!("{}.{}e{}{}", lead, rest, e_sign, e.abs())
        }
    };

    format!("{}{}", sign, body)
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Int(value.into())
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        ParamValue::Int(value.into())
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl<T: Into<ParamValue>> From<Vec<T>> for ParamValue {
    fn from(values: Vec<T>) -> Self {
        ParamValue::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ParamValue::Null, Into::into)
    }
}

/// Ordered parameter bag.
///
/// Keys keep their first insertion position; inserting an existing key
/// replaces the value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    entries: Vec<(String, ParamValue)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// URL-encoded query string of the non-null parameters, in order.
    pub fn to_query_string(&self) -> String {
        self.iter()
            .filter_map(|(key, value)| {
                value.coerce().map(|v| {
                    format!("{}={}", urlencoding::encode(key), urlencoding::encode(&v))
                })
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    /// JSON object of every parameter, null ones included, in order.
    pub fn to_json_body(&self) -> String {
        let fields = self
            .iter()
            .map(|(key, value)| {
                format!(
                    "{}:{}",
                    serde_json::Value::String(key.to_string()),
                    value.to_json()
                )
            })
            .collect::<Vec<_>>()
            .join(",");
        format!("{{{}}}", fields)
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}

impl Serialize for Params {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Declarative description of a recommendation query.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescription {
    pub algorithm: Algorithm,
    pub params: Params,
    pub method: HttpMethod,
    /// When false, no attempt is started.
    pub enabled: bool,
}

impl RequestDescription {
    /// An enabled GET request with no parameters.
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            params: Params::new(),
            method: HttpMethod::Get,
            enabled: true,
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.insert(key, value);
        self
    }

    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    pub fn with_method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Top-`k` popular titles.
    pub fn popular(k: u32) -> Self {
        Self::new(Algorithm::Popular).with_param("k", k)
    }

    /// Personalised picks; disabled until a user id is known.
    pub fn item_cf(user_id: Option<u32>, k: u32) -> Self {
        let user_id = user_id.filter(|id| *id > 0);
        Self::new(Algorithm::CollaborativeFilter)
            .with_param("user_id", user_id)
            .with_param("k", k)
            .with_enabled(user_id.is_some())
    }

    /// Titles similar to the given seeds; disabled while the list is empty.
    pub fn by_titles(titles: Vec<String>) -> Self {
        let enabled = !titles.is_empty();
        Self::new(Algorithm::ByTitles)
            .with_method(HttpMethod::Post)
            .with_param("titles", titles)
            .with_enabled(enabled)
    }
}

/// Split a comma separated list of titles, dropping blanks.
pub fn parse_title_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

// ============================================================================
// Results
// ============================================================================

/// A single recommended movie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationItem {
    /// MovieLens movie id.
    #[serde(rename = "movie_id", alias = "id")]
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub genres: Vec<String>,
    /// Relevance score from the producing algorithm.
    pub score: f64,
    /// Provenance tag, e.g. "popularity".
    pub source: String,
    /// Human readable explanation. May be empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub reason: String,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
