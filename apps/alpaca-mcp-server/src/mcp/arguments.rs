//! Tool Arguments
//!
//! Each tool declares its parameters as a list of [`ParamSpec`]. The same
//! list drives the advertised JSON Schema and the validation of incoming
//! calls, so the two cannot drift apart.
//!
//! Clients (LLMs in particular) are loose with JSON types, so validation
//! coerces where the intent is unambiguous: numeric strings to decimals,
//! integer strings to integers, `"true"`/`"false"` to booleans and
//! comma-separated strings to lists. Enumerations are matched ignoring case
//! and normalized to lower case.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde_json::{Map, Value, json};

use crate::error::ToolError;

// ============================================================================
// Parameter Declarations
// ============================================================================

/// Accepted shape of one parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamKind {
    /// Non-empty string.
    String,
    /// Decimal number, as JSON number or numeric string.
    Number,
    /// Integer within optional bounds.
    Integer {
        /// Inclusive lower bound.
        min: Option<i64>,
        /// Inclusive upper bound.
        max: Option<i64>,
    },
    /// Boolean, as JSON bool or `"true"`/`"false"`.
    Boolean,
    /// Non-empty list of strings, as JSON array or comma-separated string.
    StringList,
    /// One of a fixed set of lower-case literals.
    Enum(&'static [&'static str]),
    /// Calendar date `YYYY-MM-DD`.
    Date,
    /// RFC 3339 timestamp, naive date-time (UTC) or date (midnight UTC).
    Timestamp,
    /// Array of objects, each validated against `fields`.
    Objects {
        /// Fields of each element.
        fields: Vec<ParamSpec>,
        /// Minimum element count.
        min: usize,
        /// Maximum element count.
        max: usize,
    },
}

/// One declared parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    /// Canonical name.
    pub name: &'static str,
    /// Accepted shape.
    pub kind: ParamKind,
    /// Whether the call fails without it.
    pub required: bool,
    /// Shown to the client.
    pub description: &'static str,
    /// Alternative names accepted on input.
    pub aliases: &'static [&'static str],
}

impl ParamSpec {
    /// Required parameter.
    #[must_use]
    pub fn required(name: &'static str, kind: ParamKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            required: true,
            description,
            aliases: &[],
        }
    }

    /// Optional parameter.
    #[must_use]
    pub fn optional(name: &'static str, kind: ParamKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            required: false,
            description,
            aliases: &[],
        }
    }

    /// Also accept these names.
    #[must_use]
    pub fn alias(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }

    fn matches(&self, key: &str) -> bool {
        self.name == key || self.aliases.contains(&key)
    }

    /// JSON Schema of this parameter.
    #[must_use]
    pub fn schema(&self) -> Value {
        let mut schema = match &self.kind {
            ParamKind::String => json!({"type": "string"}),
            ParamKind::Number => json!({"type": ["number", "string"]}),
            ParamKind::Integer { min, max } => {
                let mut s = json!({"type": ["integer", "string"]});
                if let Some(min) = min {
                    s["minimum"] = json!(min);
                }
                if let Some(max) = max {
                    s["maximum"] = json!(max);
                }
                s
            }
            ParamKind::Boolean => json!({"type": ["boolean", "string"]}),
            ParamKind::StringList => json!({
                "anyOf": [
                    {"type": "array", "items": {"type": "string"}},
                    {"type": "string"}
                ]
            }),
            ParamKind::Enum(literals) => json!({"type": "string", "enum": literals}),
            ParamKind::Date => json!({"type": "string", "format": "date"}),
            ParamKind::Timestamp => json!({"type": "string"}),
            ParamKind::Objects { fields, min, max } => json!({
                "type": "array",
                "items": object_schema(fields),
                "minItems": min,
                "maxItems": max,
            }),
        };
        schema["description"] = json!(self.description);
        schema
    }
}

/// JSON Schema of an object with the given fields.
#[must_use]
pub fn object_schema(params: &[ParamSpec]) -> Value {
    let mut properties = Map::new();
    for param in params {
        properties.insert(param.name.to_string(), param.schema());
        for alias in param.aliases {
            let mut schema = param.schema();
            schema["description"] = json!(format!("Alias of `{}`.", param.name));
            properties.insert((*alias).to_string(), schema);
        }
    }
    let required: Vec<&str> = params
        .iter()
        .filter(|p| p.required)
        .map(|p| p.name)
        .collect();

    json!({
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false,
    })
}

// ============================================================================
// Validated Values
// ============================================================================

/// A coerced argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    /// String or enum literal.
    Text(String),
    /// Decimal.
    Number(Decimal),
    /// Integer.
    Integer(i64),
    /// Boolean.
    Boolean(bool),
    /// String list.
    List(Vec<String>),
    /// Calendar date.
    Date(NaiveDate),
    /// Instant.
    Timestamp(DateTime<Utc>),
    /// Nested objects.
    Objects(Vec<Arguments>),
}

/// Arguments of one call after validation, keyed by canonical name.
#[derive(Debug, Clone, PartialEq)]
pub struct Arguments {
    tool: String,
    path: String,
    values: BTreeMap<&'static str, ArgValue>,
}

impl Arguments {
    /// Validate raw call arguments against `params`.
    ///
    /// `None` and `null` mean no arguments.
    pub fn parse(tool: &str, params: &[ParamSpec], raw: Option<Value>) -> Result<Self, ToolError> {
        let object = match raw {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(map)) => map,
            Some(_) => {
                return Err(ToolError::validation(
                    tool,
                    "arguments",
                    "must be a JSON object",
                ));
            }
        };
        Self::from_object(tool, String::new(), params, object)
    }

    fn from_object(
        tool: &str,
        path: String,
        params: &[ParamSpec],
        object: Map<String, Value>,
    ) -> Result<Self, ToolError> {
        let mut args = Self {
            tool: tool.to_string(),
            path,
            values: BTreeMap::new(),
        };
        let mut seen: BTreeMap<&'static str, String> = BTreeMap::new();

        for (key, value) in object {
            let Some(param) = params.iter().find(|p| p.matches(&key)) else {
                return Err(args.invalid(&key, "unknown argument"));
            };
            if value.is_null() {
                continue;
            }
            if let Some(previous) = seen.get(param.name) {
                return Err(args.invalid(
                    param.name,
                    format!("given both as `{previous}` and `{key}`"),
                ));
            }
            let coerced = args.coerce(param, value)?;
            seen.insert(param.name, key);
            args.values.insert(param.name, coerced);
        }

        if let Some(missing) = params
            .iter()
            .find(|p| p.required && !args.values.contains_key(p.name))
        {
            return Err(args.invalid(missing.name, "is required"));
        }

        Ok(args)
    }

    fn coerce(&self, param: &ParamSpec, value: Value) -> Result<ArgValue, ToolError> {
        let name = param.name;
        match &param.kind {
            ParamKind::String => coerce_string(value)
                .map(ArgValue::Text)
                .ok_or_else(|| self.invalid(name, "must be a non-empty string")),
            ParamKind::Number => coerce_decimal(&value)
                .map(ArgValue::Number)
                .ok_or_else(|| self.invalid(name, "must be a number")),
            ParamKind::Integer { min, max } => {
                let n = coerce_integer(&value)
                    .ok_or_else(|| self.invalid(name, "must be an integer"))?;
                if let Some(min) = min.filter(|min| n < *min) {
                    return Err(self.invalid(name, format!("must be at least {min}")));
                }
                if let Some(max) = max.filter(|max| n > *max) {
                    return Err(self.invalid(name, format!("must be at most {max}")));
                }
                Ok(ArgValue::Integer(n))
            }
            ParamKind::Boolean => coerce_bool(&value)
                .map(ArgValue::Boolean)
                .ok_or_else(|| self.invalid(name, "must be true or false")),
            ParamKind::StringList => coerce_list(value)
                .map(ArgValue::List)
                .ok_or_else(|| self.invalid(name, "must be a non-empty list of strings")),
            ParamKind::Enum(literals) => {
                let text = value
                    .as_str()
                    .map(|s| s.trim().to_ascii_lowercase())
                    .filter(|s| literals.contains(&s.as_str()));
                text.map(ArgValue::Text).ok_or_else(|| {
                    self.invalid(name, format!("must be one of: {}", literals.join(", ")))
                })
            }
            ParamKind::Date => value
                .as_str()
                .and_then(parse_date)
                .map(ArgValue::Date)
                .ok_or_else(|| self.invalid(name, "must be a date (YYYY-MM-DD)")),
            ParamKind::Timestamp => value
                .as_str()
                .and_then(parse_timestamp)
                .map(ArgValue::Timestamp)
                .ok_or_else(|| {
                    self.invalid(
                        name,
                        "must be an ISO-8601 date or date-time (e.g. 2024-01-15T09:30:00Z)",
                    )
                }),
            ParamKind::Objects { fields, min, max } => {
                let items = match value {
                    Value::Array(items) => items,
                    // Some clients send nested arrays as a JSON string.
                    Value::String(s) => match serde_json::from_str::<Value>(&s) {
                        Ok(Value::Array(items)) => items,
                        _ => return Err(self.invalid(name, "must be an array of objects")),
                    },
                    _ => return Err(self.invalid(name, "must be an array of objects")),
                };
                if items.len() < *min || items.len() > *max {
                    return Err(self.invalid(
                        name,
                        format!("must contain between {min} and {max} entries"),
                    ));
                }
                let mut nested = Vec::with_capacity(items.len());
                for (i, item) in items.into_iter().enumerate() {
                    let path = format!("{}[{i}]", self.field_path(name));
                    let Value::Object(object) = item else {
                        return Err(ToolError::validation(&self.tool, path, "must be an object"));
                    };
                    nested.push(Self::from_object(&self.tool, path, fields, object)?);
                }
                Ok(ArgValue::Objects(nested))
            }
        }
    }

    fn field_path(&self, field: &str) -> String {
        if self.path.is_empty() {
            field.to_string()
        } else {
            format!("{}.{field}", self.path)
        }
    }

    /// Validation error for `field` of this call (or nested element).
    pub fn invalid(&self, field: &str, message: impl Into<String>) -> ToolError {
        ToolError::validation(&self.tool, self.field_path(field), message)
    }

    /// Name of the tool being called.
    #[must_use]
    pub fn tool(&self) -> &str {
        &self.tool
    }

    /// True if the argument was supplied.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// String or enum value.
    #[must_use]
    pub fn str(&self, name: &str) -> Option<&str> {
        match self.values.get(name)? {
            ArgValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Decimal value.
    #[must_use]
    pub fn decimal(&self, name: &str) -> Option<Decimal> {
        match self.values.get(name)? {
            ArgValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Integer value.
    #[must_use]
    pub fn integer(&self, name: &str) -> Option<i64> {
        match self.values.get(name)? {
            ArgValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Boolean value.
    #[must_use]
    pub fn boolean(&self, name: &str) -> Option<bool> {
        match self.values.get(name)? {
            ArgValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// List value.
    #[must_use]
    pub fn list(&self, name: &str) -> Option<&[String]> {
        match self.values.get(name)? {
            ArgValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Date value.
    #[must_use]
    pub fn date(&self, name: &str) -> Option<NaiveDate> {
        match self.values.get(name)? {
            ArgValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Timestamp value.
    #[must_use]
    pub fn timestamp(&self, name: &str) -> Option<DateTime<Utc>> {
        match self.values.get(name)? {
            ArgValue::Timestamp(t) => Some(*t),
            _ => None,
        }
    }

    /// Nested objects; empty when absent.
    #[must_use]
    pub fn objects(&self, name: &str) -> &[Self] {
        match self.values.get(name) {
            Some(ArgValue::Objects(items)) => items,
            _ => &[],
        }
    }

    /// Required string.
    pub fn require_str(&self, name: &str) -> Result<&str, ToolError> {
        self.str(name).ok_or_else(|| self.invalid(name, "is required"))
    }

    /// Required symbol or id that ends up as one segment of a URL path.
    ///
    /// Dot segments and characters that URL parsing treats as delimiters would
    /// retarget the request at the parent collection, so they are refused.
    pub fn require_path_id(&self, name: &str) -> Result<&str, ToolError> {
        let value = self.require_str(name)?;
        if matches!(value, "." | "..") {
            return Err(self.invalid(name, "must not be '.' or '..'"));
        }
        if value
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '?' | '#' | '%'))
        {
            return Err(self.invalid(name, "must not contain whitespace, '?', '#' or '%'"));
        }
        Ok(value)
    }

    /// Required decimal.
    pub fn require_decimal(&self, name: &str) -> Result<Decimal, ToolError> {
        self.decimal(name)
            .ok_or_else(|| self.invalid(name, "is required"))
    }

    /// Required list.
    pub fn require_list(&self, name: &str) -> Result<&[String], ToolError> {
        self.list(name).ok_or_else(|| self.invalid(name, "is required"))
    }

    /// Required date.
    pub fn require_date(&self, name: &str) -> Result<NaiveDate, ToolError> {
        self.date(name).ok_or_else(|| self.invalid(name, "is required"))
    }

    /// Optional decimal that must be strictly positive when given.
    pub fn positive_decimal(&self, name: &str) -> Result<Option<Decimal>, ToolError> {
        match self.decimal(name) {
            Some(n) if n <= Decimal::ZERO => Err(self.invalid(name, "must be greater than zero")),
            other => Ok(other),
        }
    }
}

// ============================================================================
// Coercion
// ============================================================================

fn coerce_string(value: Value) -> Option<String> {
    let s = match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parse_decimal_str(s: &str) -> Option<Decimal> {
    let s = s.trim();
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

fn coerce_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => parse_decimal_str(&n.to_string()),
        Value::String(s) => parse_decimal_str(s),
        _ => None,
    }
}

fn coerce_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < 9.0e15)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn coerce_list(value: Value) -> Option<Vec<String>> {
    let items: Vec<String> = match value {
        Value::Array(items) => items
            .into_iter()
            .map(coerce_string)
            .collect::<Option<Vec<_>>>()?,
        Value::String(s) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => return None,
    };
    (!items.is_empty()).then_some(items)
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// Parse an RFC 3339 timestamp, a naive date-time (taken as UTC) or a date
/// (midnight UTC).
#[must_use]
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(t) = NaiveDateTime::parse_from_str(s, format) {
            return Some(t.and_utc());
        }
    }
    parse_date(s).and_then(|d| d.and_hms_opt(0, 0, 0)).map(|t| t.and_utc())
}
