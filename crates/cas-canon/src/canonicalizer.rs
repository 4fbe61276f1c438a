use std::fmt;

use serde_json::Number;

use crate::config::CanonConfig;
use crate::document::Document;
use crate::error::{CanonResult, ValidationError};

/// Largest magnitude at which every integer is exactly representable as f64.
const MAX_SAFE_FLOAT_INT: f64 = 9_007_199_254_740_992.0;

/// Canonical bytes of a document.
///
/// Always valid UTF-8 JSON, so it can be re-parsed and re-canonicalized.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CanonicalForm(String);

impl CanonicalForm {
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0.into_bytes()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for CanonicalForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CanonicalForm({} bytes)", self.0.len())
    }
}

impl fmt::Display for CanonicalForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A parsed document together with its canonical form.
#[derive(Clone, Debug)]
pub struct Canonicalized {
    pub document: Document,
    pub form: CanonicalForm,
}

/// JSON path used in validation errors, e.g. `root.body.[2].name`.
#[derive(Debug, Clone)]
struct Path {
    segments: Vec<String>,
}

impl Path {
    fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    fn push_field(&self, field: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(field.to_string());
        Self { segments }
    }

    fn push_index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(format!("[{index}]"));
        Self { segments }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            write!(f, "root")
        } else {
            write!(f, "root.{}", self.segments.join("."))
        }
    }
}

/// Produces canonical bytes for documents under a [`CanonConfig`].
#[derive(Clone, Debug, Default)]
pub struct Canonicalizer {
    config: CanonConfig,
}

impl Canonicalizer {
    pub fn new(config: CanonConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CanonConfig {
        &self.config
    }

    /// Parse raw JSON text into a [`Document`].
    ///
    /// The size limit is checked before the parser sees a single byte.
    /// Text nested past `serde_json`'s 128-level recursion limit is a
    /// [`ValidationError::Parse`] even when `max_depth` is higher.
    pub fn parse(&self, raw: &[u8]) -> CanonResult<Document> {
        if raw.len() > self.config.max_document_bytes {
            return Err(ValidationError::TooLarge {
                size: raw.len(),
                limit: self.config.max_document_bytes,
            });
        }
        serde_json::from_slice::<Document>(raw).map_err(|e| ValidationError::Parse(e.to_string()))
    }

    /// Parse raw JSON text and canonicalize it.
    pub fn canonicalize_json(&self, raw: &[u8]) -> CanonResult<Canonicalized> {
        let document = self.parse(raw)?;
        let form = self.canonicalize(&document)?;
        Ok(Canonicalized { document, form })
    }

    /// Validate `doc` and produce its canonical form.
    pub fn canonicalize(&self, doc: &Document) -> CanonResult<CanonicalForm> {
        self.validate(doc)?;
        let mut out = String::new();
        write_document(&mut out, doc)?;
        Ok(CanonicalForm(out))
    }

    /// Run every structural check without producing bytes.
    ///
    /// The root and schema-context checks run first since they are O(1);
    /// the depth and key checks walk the tree with an explicit stack and
    /// stop at the first container past the depth limit, so adversarially
    /// deep input is rejected without recursion.
    pub fn validate(&self, doc: &Document) -> CanonResult<()> {
        self.check_context(doc)?;
        self.check_structure(doc)
    }

    fn check_context(&self, doc: &Document) -> CanonResult<()> {
        let Document::Object(root) = doc else {
            return Err(ValidationError::RootNotObject { found: doc.kind() });
        };
        let field = &self.config.context_field;
        match root.get(field) {
            None => Err(ValidationError::MissingContext {
                field: field.clone(),
            }),
            Some(Document::String(_) | Document::Object(_) | Document::Array(_)) => Ok(()),
            Some(other) => Err(ValidationError::InvalidContext {
                field: field.clone(),
                found: other.kind(),
            }),
        }
    }

    fn check_structure(&self, doc: &Document) -> CanonResult<()> {
        let limit = self.config.max_depth;
        let mut stack: Vec<(&Document, usize, Path)> = vec![(doc, 1, Path::root())];

        while let Some((node, depth, path)) = stack.pop() {
            if depth > limit {
                return Err(ValidationError::DepthExceeded {
                    limit,
                    path: path.to_string(),
                });
            }
            match node {
                Document::Object(map) => {
                    for (key, child) in map {
                        check_key(key, &path)?;
                        if is_container(child) {
                            stack.push((child, depth + 1, path.push_field(key)));
                        }
                    }
                }
                Document::Array(items) => {
                    for (idx, item) in items.iter().enumerate() {
                        if is_container(item) {
                            stack.push((item, depth + 1, path.push_index(idx)));
                        }
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }
}

/// Canonicalize with the default configuration.
pub fn canonicalize(doc: &Document) -> CanonResult<CanonicalForm> {
    Canonicalizer::default().canonicalize(doc)
}

fn is_container(doc: &Document) -> bool {
    matches!(doc, Document::Object(_) | Document::Array(_))
}

fn check_key(key: &str, path: &Path) -> CanonResult<()> {
    if let Some(c) = key
        .chars()
        .find(|c| (*c as u32) < 0x20 && !matches!(c, '\t' | '\n' | '\r'))
    {
        return Err(ValidationError::InvalidKey {
            path: path.to_string(),
            key: key.to_string(),
            code: c as u32,
        });
    }
    Ok(())
}

// Depth is bounded by `check_structure` before this runs.
fn write_document(out: &mut String, doc: &Document) -> CanonResult<()> {
    match doc {
        Document::Null => out.push_str("null"),
        Document::Bool(true) => out.push_str("true"),
        Document::Bool(false) => out.push_str("false"),
        Document::Number(n) => write_number(out, n)?,
        Document::String(s) => write_string(out, s)?,
        Document::Array(items) => {
            out.push('[');
            for (idx, item) in items.iter().enumerate() {
                if idx > 0 {
                    out.push(',');
                }
                write_document(out, item)?;
            }
            out.push(']');
        }
        Document::Object(map) => {
            // BTreeMap<String, _> iterates in UTF-8 byte order.
            out.push('{');
            for (idx, (key, value)) in map.iter().enumerate() {
                if idx > 0 {
                    out.push(',');
                }
                write_string(out, key)?;
                out.push(':');
                write_document(out, value)?;
            }
            out.push('}');
        }
    }
    Ok(())
}

fn write_string(out: &mut String, s: &str) -> CanonResult<()> {
    let escaped =
        serde_json::to_string(s).map_err(|e| ValidationError::Serialization(e.to_string()))?;
    out.push_str(&escaped);
    Ok(())
}

fn write_number(out: &mut String, n: &Number) -> CanonResult<()> {
    if let Some(i) = n.as_i64() {
        out.push_str(&i.to_string());
    } else if let Some(u) = n.as_u64() {
        out.push_str(&u.to_string());
    } else if let Some(f) = n.as_f64() {
        if f.fract() == 0.0 && f.abs() < MAX_SAFE_FLOAT_INT {
            out.push_str(&(f as i64).to_string());
        } else {
            let text = serde_json::to_string(&f)
                .map_err(|e| ValidationError::Serialization(e.to_string()))?;
            out.push_str(&text);
        }
    } else {
        return Err(ValidationError::Serialization(format!(
            "unrepresentable number {n}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::{json, Value};

    fn canon(text: &str) -> String {
        Canonicalizer::default()
            .canonicalize_json(text.as_bytes())
            .unwrap()
            .form
            .as_str()
            .to_string()
    }

    fn nested(depth: usize) -> Document {
        // `depth` containers in total, the root included.
        let mut doc = Document::object([("leaf", Document::Null)]);
        for _ in 1..depth.saturating_sub(1) {
            doc = Document::object([("n", doc)]);
        }
        Document::object([("@context", Document::from("x")), ("n", doc)])
    }

    #[test]
    fn keys_sorted_at_every_level() {
        let out = canon(r#"{"z":{"y":1,"b":[{"d":1,"c":2}]},"@context":"x","a":true}"#);
        assert_eq!(out, r#"{"@context":"x","a":true,"z":{"b":[{"c":2,"d":1}],"y":1}}"#);
    }

    #[test]
    fn arrays_keep_source_order() {
        let out = canon(r#"{"@context":"x","list":[3,1,2,"b","a"]}"#);
        assert_eq!(out, r#"{"@context":"x","list":[3,1,2,"b","a"]}"#);
    }

    #[test]
    fn whitespace_is_irrelevant() {
        let compact = canon(r#"{"@context":"x","a":[1,2],"b":{"c":null}}"#);
        let spaced = canon("{\n  \"b\" : { \"c\" : null } ,\r\n\t\"a\" : [ 1 , 2 ],\n \"@context\": \"x\"\n}\n");
        assert_eq!(compact, spaced);
    }

    #[test]
    fn swapped_keys_produce_identical_bytes() {
        let a = canon(r#"{"@context":"https://www.w3.org/ns/activitystreams","type":"Note","a":1,"b":2}"#);
        let b = canon(r#"{"@context":"https://www.w3.org/ns/activitystreams","type":"Note","b":2,"a":1}"#);
        assert_eq!(a, b);
        assert_eq!(
            a,
            r#"{"@context":"https://www.w3.org/ns/activitystreams","a":1,"b":2,"type":"Note"}"#
        );
    }

    #[test]
    fn keys_sort_by_byte_order() {
        let out = canon(r#"{"@context":"x","b":1,"B":2,"é":3,"a":4,"_":5}"#);
        assert_eq!(out, r#"{"@context":"x","B":2,"_":5,"a":4,"b":1,"é":3}"#);
    }

    #[test]
    fn number_formatting() {
        let out = canon(r#"{"@context":"x","i":-7,"u":18446744073709551615,"f":1.0,"z":-0.0,"h":0.5,"e":1e300,"s":1.5e-7}"#);
        assert_eq!(
            out,
            r#"{"@context":"x","e":1e300,"f":1,"h":0.5,"i":-7,"s":1.5e-7,"u":18446744073709551615,"z":0}"#
        );
    }

    #[test]
    fn integral_float_equals_integer() {
        assert_eq!(canon(r#"{"@context":"x","n":2.0}"#), canon(r#"{"@context":"x","n":2}"#));
    }

    #[test]
    fn string_escaping() {
        let doc = Document::object([
            ("@context", Document::from("x")),
            ("s", Document::from("quote \" slash \\ nl \n tab \t bell \u{7} café")),
        ]);
        let out = canonicalize(&doc).unwrap();
        assert_eq!(
            out.as_str(),
            "{\"@context\":\"x\",\"s\":\"quote \\\" slash \\\\ nl \\n tab \\t bell \\u0007 café\"}"
        );
    }

    #[test]
    fn canonicalization_is_idempotent() {
        let first = canon(r#"{"b":[1.0,{"y":"é","x":null}],"@context":{"v":"1"},"a":-0.25}"#);
        let second = canon(&first);
        assert_eq!(first, second);
    }

    #[test]
    fn missing_context_rejected() {
        let err = Canonicalizer::default()
            .canonicalize_json(br#"{"type":"X","a":1}"#)
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingContext {
                field: "@context".into()
            }
        );
    }

    #[test]
    fn context_shapes() {
        let c = Canonicalizer::default();
        assert!(c.canonicalize_json(br#"{"@context":"https://schema.org"}"#).is_ok());
        assert!(c.canonicalize_json(br#"{"@context":{"@vocab":"x"}}"#).is_ok());
        assert!(c.canonicalize_json(br#"{"@context":["a",{"b":"c"}]}"#).is_ok());
        for bad in [r#"{"@context":1}"#, r#"{"@context":null}"#, r#"{"@context":true}"#] {
            let err = c.canonicalize_json(bad.as_bytes()).unwrap_err();
            assert!(matches!(err, ValidationError::InvalidContext { .. }), "{bad}");
        }
    }

    #[test]
    fn custom_context_field() {
        let c = Canonicalizer::new(CanonConfig {
            context_field: "$schema".into(),
            ..CanonConfig::default()
        });
        assert!(c.canonicalize_json(br#"{"$schema":"s"}"#).is_ok());
        assert!(c.canonicalize_json(br#"{"@context":"s"}"#).is_err());
    }

    #[test]
    fn root_must_be_object() {
        let err = Canonicalizer::default().canonicalize_json(b"[1,2]").unwrap_err();
        assert_eq!(err, ValidationError::RootNotObject { found: "array" });
    }

    #[test]
    fn malformed_json_rejected() {
        let err = Canonicalizer::default().canonicalize_json(b"{\"@context\":").unwrap_err();
        assert!(matches!(err, ValidationError::Parse(_)));
    }

    #[test]
    fn depth_at_limit_accepted() {
        assert!(canonicalize(&nested(50)).is_ok());
    }

    #[test]
    fn depth_past_limit_rejected() {
        let err = canonicalize(&nested(51)).unwrap_err();
        assert!(matches!(err, ValidationError::DepthExceeded { limit: 50, .. }));
    }

    #[test]
    fn very_deep_document_rejected_without_recursion() {
        let mut doc = Document::Null;
        for _ in 0..100_000 {
            doc = Document::Array(vec![doc]);
        }
        let doc = Document::object([("@context", Document::from("x")), ("deep", doc)]);
        let err = canonicalize(&doc).unwrap_err();
        assert!(matches!(err, ValidationError::DepthExceeded { .. }));
        // Unwind iteratively so the test itself does not overflow on drop.
        let Document::Object(mut root) = doc else { unreachable!() };
        let mut cur = root.remove("deep");
        while let Some(Document::Array(mut items)) = cur {
            cur = items.pop();
        }
    }

    #[test]
    fn parser_nesting_limit_caps_raw_text() {
        let c = Canonicalizer::new(CanonConfig {
            max_depth: 200,
            ..CanonConfig::default()
        });
        let text = |depth: usize| {
            // Root object plus `depth - 1` nested arrays.
            format!(
                r#"{{"@context":"x","d":{}{}}}"#,
                "[".repeat(depth - 1),
                "]".repeat(depth - 1)
            )
        };
        assert!(c.canonicalize_json(text(100).as_bytes()).is_ok());
        let err = c.canonicalize_json(text(150).as_bytes()).unwrap_err();
        assert!(matches!(err, ValidationError::Parse(_)));

        // The same depth built in memory is governed by `max_depth` alone.
        assert!(c.canonicalize(&nested(150)).is_ok());
        assert!(c.canonicalize(&nested(201)).is_err());
    }

    #[test]
    fn depth_error_reports_path() {
        let c = Canonicalizer::new(CanonConfig {
            max_depth: 2,
            ..CanonConfig::default()
        });
        let err = c
            .canonicalize_json(br#"{"@context":"x","a":[{"b":1}]}"#)
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::DepthExceeded {
                limit: 2,
                path: "root.a.[0]".into()
            }
        );
    }

    #[test]
    fn control_character_keys_rejected() {
        let doc = Document::object([
            ("@context", Document::from("x")),
            ("nested", Document::object([("bad\u{1}key", Document::Null)])),
        ]);
        let err = canonicalize(&doc).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidKey {
                path: "root.nested".into(),
                key: "bad\u{1}key".into(),
                code: 1,
            }
        );
    }

    #[test]
    fn tab_newline_return_keys_allowed() {
        let doc = Document::object([
            ("@context", Document::from("x")),
            ("a\tb", Document::Null),
            ("c\nd", Document::Null),
            ("e\rf", Document::Null),
        ]);
        let out = canonicalize(&doc).unwrap();
        assert_eq!(out.as_str(), r#"{"@context":"x","a\tb":null,"c\nd":null,"e\rf":null}"#);
    }

    #[test]
    fn oversized_input_rejected_before_parse() {
        let c = Canonicalizer::new(CanonConfig {
            max_document_bytes: 16,
            ..CanonConfig::default()
        });
        // Not even valid JSON: the size check must win.
        let err = c.parse(&[b'{'; 17]).unwrap_err();
        assert_eq!(err, ValidationError::TooLarge { size: 17, limit: 16 });
    }

    // -----------------------------------------------------------------------
    // Properties
    // -----------------------------------------------------------------------

    fn arb_json() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::from),
            (-1.0e12f64..1.0e12).prop_map(Value::from),
            "[a-z0-9 é\"\\\\]{0,8}".prop_map(Value::String),
        ];
        leaf.prop_recursive(4, 48, 5, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..5).prop_map(Value::Array),
                prop::collection::btree_map("[a-zA-Z_@]{1,6}", inner, 0..5)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        })
    }

    /// Render JSON text with every object's members in reverse order and
    /// extra whitespace.
    fn render_reversed(v: &Value) -> String {
        match v {
            Value::Object(map) => {
                let members: Vec<String> = map
                    .iter()
                    .rev()
                    .map(|(k, v)| format!("{} :\n {}", Value::String(k.clone()), render_reversed(v)))
                    .collect();
                format!("{{ {} }}", members.join(" ,\t"))
            }
            Value::Array(items) => {
                let items: Vec<String> = items.iter().map(render_reversed).collect();
                format!("[ {} ]", items.join(" , "))
            }
            other => other.to_string(),
        }
    }

    fn with_context(body: Value) -> Value {
        json!({"@context": "https://example.org/ctx", "body": body, "type": "Test"})
    }

    proptest! {
        #[test]
        fn key_order_and_whitespace_never_change_bytes(body in arb_json()) {
            let value = with_context(body);
            let forward = serde_json::to_string(&value).unwrap();
            let reversed = render_reversed(&value);
            let c = Canonicalizer::default();
            let a = c.canonicalize_json(forward.as_bytes()).unwrap();
            let b = c.canonicalize_json(reversed.as_bytes()).unwrap();
            prop_assert_eq!(a.form, b.form);
        }

        #[test]
        fn recanonicalizing_is_a_fixed_point(body in arb_json()) {
            let value = with_context(body);
            let c = Canonicalizer::default();
            let first = c.canonicalize_json(value.to_string().as_bytes()).unwrap();
            let second = c.canonicalize_json(first.form.as_bytes()).unwrap();
            prop_assert_eq!(first.form, second.form);
        }
    }
}
