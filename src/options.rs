//! Request option model and normalization.
//!
//! Options are built fresh per call. Normalization flattens all-string
//! collections into comma-joined values and injects the client's access
//! token; the wire split separates multipart uploads from text fields.

use serde_json::Value;
use std::collections::BTreeMap;

/// A file destined for the multipart upload section of a POST/PUT.
///
/// Uploads are tagged explicitly in the option model; the dispatcher never
/// probes values for read capabilities.
#[derive(Debug, Clone, PartialEq)]
pub struct Upload {
    pub file_name: String,
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: None,
            bytes,
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }
}

/// A single request parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    List(Vec<ParamValue>),
    Upload(Upload),
}

impl ParamValue {
    /// Joins a collection into one comma-separated string when every
    /// element is a string; every other value is left untouched.
    fn flattened(self) -> ParamValue {
        match self {
            ParamValue::List(items) if items.iter().all(|i| matches!(i, ParamValue::Str(_))) => {
                let joined = items
                    .iter()
                    .map(|i| match i {
                        ParamValue::Str(s) => s.as_str(),
                        _ => unreachable!(),
                    })
                    .collect::<Vec<_>>()
                    .join(",");
                ParamValue::Str(joined)
            }
            other => other,
        }
    }

    fn to_json(&self) -> Value {
        match self {
            ParamValue::Str(s) => Value::String(s.clone()),
            ParamValue::Int(i) => Value::from(*i),
            ParamValue::Float(f) => Value::from(*f),
            ParamValue::Bool(b) => Value::Bool(*b),
            ParamValue::List(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            // An upload has no query/body text form.
            ParamValue::Upload(_) => Value::Null,
        }
    }

    /// The value as it is written onto the wire. Strings go out verbatim;
    /// anything else is rendered as its JSON text.
    pub(crate) fn wire_value(&self) -> String {
        match self {
            ParamValue::Str(s) => s.clone(),
            other => other.to_json().to_string(),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Str(v.to_owned())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Str(v)
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Int(v)
    }
}

impl From<i32> for ParamValue {
    fn from(v: i32) -> Self {
        ParamValue::Int(v.into())
    }
}

impl From<u32> for ParamValue {
    fn from(v: u32) -> Self {
        ParamValue::Int(v.into())
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Float(v)
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

impl From<Upload> for ParamValue {
    fn from(v: Upload) -> Self {
        ParamValue::Upload(v)
    }
}

impl From<Vec<ParamValue>> for ParamValue {
    fn from(v: Vec<ParamValue>) -> Self {
        ParamValue::List(v)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(v: Vec<String>) -> Self {
        ParamValue::List(v.into_iter().map(ParamValue::Str).collect())
    }
}

impl From<Vec<&str>> for ParamValue {
    fn from(v: Vec<&str>) -> Self {
        ParamValue::List(v.into_iter().map(ParamValue::from).collect())
    }
}

/// Request parameters for one call, such as `limit`, `offset` or `since`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Options {
    params: BTreeMap<String, ParamValue>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chainable setter.
    pub fn set(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        self.params.insert(name.into(), value.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<ParamValue> {
        self.params.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.params.get(name)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Produces the wire-ready mapping: all-string collections are joined
    /// into comma-separated values and the access token, when present, is
    /// injected as `access_token`, overwriting any caller-supplied value.
    pub(crate) fn normalized(mut self, access_token: Option<&str>) -> Options {
        self.params = self
            .params
            .into_iter()
            .map(|(name, value)| (name, value.flattened()))
            .collect();

        if let Some(token) = access_token {
            self.params
                .insert("access_token".to_owned(), ParamValue::Str(token.to_owned()));
        }

        self
    }

    /// Splits the mapping into text fields and multipart uploads. Upload
    /// entries are removed from the field set entirely.
    pub(crate) fn into_wire(self) -> (Vec<(String, String)>, Vec<(String, Upload)>) {
        let mut fields = Vec::new();
        let mut uploads = Vec::new();

        for (name, value) in self.params {
            match value {
                ParamValue::Upload(upload) => uploads.push((name, upload)),
                other => fields.push((name, other.wire_value())),
            }
        }

        (fields, uploads)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_string_lists_are_comma_joined() {
        let options = Options::new()
            .set("fields", vec!["id", "first_name", "last_name"])
            .normalized(None);

        assert_eq!(
            options.get("fields"),
            Some(&ParamValue::Str("id,first_name,last_name".to_owned()))
        );
    }

    #[test]
    fn mixed_lists_pass_through_unmodified() {
        let mixed = ParamValue::List(vec![ParamValue::Str("a".to_owned()), ParamValue::Int(1)]);
        let options = Options::new().set("ids", mixed.clone()).normalized(None);

        assert_eq!(options.get("ids"), Some(&mixed));
    }

    #[test]
    fn scalars_normalize_to_themselves() {
        let options = Options::new()
            .set("limit", 25)
            .set("summary", true)
            .set("q", "shaft quotes")
            .normalized(None);

        assert_eq!(options.get("limit"), Some(&ParamValue::Int(25)));
        assert_eq!(options.get("summary"), Some(&ParamValue::Bool(true)));
        assert_eq!(
            options.get("q"),
            Some(&ParamValue::Str("shaft quotes".to_owned()))
        );
    }

    #[test]
    fn access_token_overwrites_caller_value() {
        let options = Options::new()
            .set("access_token", "theirs")
            .normalized(Some("ours"));

        assert_eq!(
            options.get("access_token"),
            Some(&ParamValue::Str("ours".to_owned()))
        );
    }

    #[test]
    fn no_token_means_no_injection() {
        let options = Options::new().set("limit", 1).normalized(None);
        assert_eq!(options.get("access_token"), None);
    }

    #[test]
    fn wire_split_partitions_uploads() {
        let options = Options::new()
            .set("message", "hello")
            .set("source", Upload::new("photo.jpg", vec![0xff, 0xd8]))
            .normalized(None);

        let (fields, uploads) = options.into_wire();

        assert_eq!(fields, vec![("message".to_owned(), "hello".to_owned())]);
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0].0, "source");
        assert_eq!(uploads[0].1.file_name, "photo.jpg");
    }

    #[test]
    fn mixed_list_wire_value_is_json_text() {
        let mixed = ParamValue::List(vec![ParamValue::Str("a".to_owned()), ParamValue::Int(1)]);
        assert_eq!(mixed.wire_value(), r#"["a",1]"#);
    }
}
