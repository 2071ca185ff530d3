//! Built-in declarative constraint validator
//!
//! A schema maps field names to constraint objects:
//!
//! ```json
//! {
//!     "email": { "presence": true, "email": true },
//!     "password": { "length": { "minimum": 8 } },
//!     "confirmPassword": { "equality": "password" }
//! }
//! ```
//!
//! Messages are reported as full messages prefixed with the prettified field
//! name ("confirmPassword" becomes "Confirm password"). A custom `message`
//! option replaces the defaults; a message starting with `^` is used verbatim.

use regex::{Regex, RegexBuilder};
use serde_json::{Map, Value};
use std::cell::RefCell;

use super::traits::Validate;
use crate::config::Schema;
use crate::error::FormError;
use crate::state::{FieldErrors, FieldValue, FieldValues};

const KNOWN_CONSTRAINTS: &[&str] = &[
    "presence",
    "email",
    "length",
    "format",
    "equality",
    "inclusion",
    "exclusion",
    "numericality",
];

/// Validator for the built-in constraint vocabulary.
///
/// Constraints are compiled once per schema and reused until a different
/// schema is passed in.
#[derive(Debug, Clone, Default)]
pub struct ConstraintValidator {
    compiled: RefCell<CompiledSchema>,
}

impl ConstraintValidator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Validate for ConstraintValidator {
    fn validate(&self, values: &FieldValues, schema: &Schema) -> Option<FieldErrors> {
        let mut compiled = self.compiled.borrow_mut();
        if compiled.schema != *schema {
            *compiled = CompiledSchema::lenient(schema);
        }

        let null = FieldValue::Null;
        let mut errors = FieldErrors::new();

        for (field, constraints) in &compiled.fields {
            let value = values.get(field).unwrap_or(&null);
            let messages: Vec<String> = constraints
                .iter()
                .flat_map(|constraint| constraint.check(value, values))
                .map(|message| full_message(field, &message))
                .collect();

            if !messages.is_empty() {
                errors.insert(field.clone(), messages);
            }
        }

        if errors.is_empty() {
            None
        } else {
            Some(errors)
        }
    }

    fn check_schema(&self, schema: &Schema) -> Result<(), FormError> {
        let compiled = CompiledSchema::strict(schema)?;
        *self.compiled.borrow_mut() = compiled;
        Ok(())
    }
}

/// A schema together with its parsed constraints, in declaration order
#[derive(Debug, Clone, Default)]
struct CompiledSchema {
    schema: Schema,
    fields: Vec<(String, Vec<Constraint>)>,
}

impl CompiledSchema {
    /// Fail on the first field whose constraints cannot be read
    fn strict(schema: &Schema) -> Result<Self, FormError> {
        let fields = schema
            .fields()
            .map(|(field, rules)| Ok((field.to_string(), parse_field(field, rules)?)))
            .collect::<Result<_, FormError>>()?;
        Ok(Self {
            schema: schema.clone(),
            fields,
        })
    }

    /// Skip fields whose constraints cannot be read
    fn lenient(schema: &Schema) -> Self {
        let fields = schema
            .fields()
            .filter_map(|(field, rules)| match parse_field(field, rules) {
                Ok(constraints) => Some((field.to_string(), constraints)),
                Err(err) => {
                    tracing::warn!(%err, "skipping field with unreadable constraints");
                    None
                }
            })
            .collect();
        Self {
            schema: schema.clone(),
            fields,
        }
    }
}

#[derive(Debug, Clone)]
enum Constraint {
    Presence {
        allow_empty: bool,
        message: Option<String>,
    },
    Email {
        message: Option<String>,
    },
    Length {
        is: Option<usize>,
        minimum: Option<usize>,
        maximum: Option<usize>,
        message: Option<String>,
    },
    Format {
        pattern: Regex,
        message: Option<String>,
    },
    Equality {
        attribute: String,
        message: Option<String>,
    },
    Inclusion {
        within: Vec<FieldValue>,
        message: Option<String>,
    },
    Exclusion {
        within: Vec<FieldValue>,
        message: Option<String>,
    },
    Numericality(NumericRules),
}

#[derive(Debug, Clone, Default)]
struct NumericRules {
    only_integer: bool,
    greater_than: Option<f64>,
    greater_than_or_equal_to: Option<f64>,
    equal_to: Option<f64>,
    less_than: Option<f64>,
    less_than_or_equal_to: Option<f64>,
    odd: bool,
    even: bool,
    message: Option<String>,
}

fn parse_field(field: &str, rules: &Value) -> Result<Vec<Constraint>, FormError> {
    let rules = match rules {
        Value::Object(rules) => rules,
        Value::Null => return Ok(Vec::new()),
        _ => {
            return Err(FormError::invalid_constraint(
                field,
                "*",
                "expected an object of constraints",
            ))
        }
    };

    let mut constraints = Vec::with_capacity(rules.len());
    for (name, options) in rules {
        if let Some(constraint) = Constraint::parse(field, name, options)? {
            constraints.push(constraint);
        }
    }
    Ok(constraints)
}

/// Typed access to a constraint's options object
struct Options<'a> {
    field: &'a str,
    name: &'a str,
    map: Option<&'a Map<String, Value>>,
}

impl<'a> Options<'a> {
    /// Accept `true` (no options) or an options object
    fn read(field: &'a str, name: &'a str, options: &'a Value) -> Result<Self, FormError> {
        let map = match options {
            Value::Bool(true) => None,
            Value::Object(map) => Some(map),
            _ => {
                return Err(FormError::invalid_constraint(
                    field,
                    name,
                    "expected true or an object",
                ))
            }
        };
        Ok(Self { field, name, map })
    }

    fn object(field: &'a str, name: &'a str, options: &'a Value) -> Result<Self, FormError> {
        match options {
            Value::Object(map) => Ok(Self {
                field,
                name,
                map: Some(map),
            }),
            _ => Err(FormError::invalid_constraint(field, name, "expected an object")),
        }
    }

    fn invalid(&self, reason: impl Into<String>) -> FormError {
        FormError::invalid_constraint(self.field, self.name, reason)
    }

    fn get(&self, key: &str) -> Option<&'a Value> {
        self.map
            .and_then(|map| map.get(key))
            .filter(|value| !value.is_null())
    }

    fn string(&self, key: &str) -> Result<Option<String>, FormError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(_) => Err(self.invalid(format!("'{key}' must be a string"))),
        }
    }

    fn flag(&self, key: &str) -> Result<bool, FormError> {
        match self.get(key) {
            None => Ok(false),
            Some(Value::Bool(b)) => Ok(*b),
            Some(_) => Err(self.invalid(format!("'{key}' must be a boolean"))),
        }
    }

    fn number(&self, key: &str) -> Result<Option<f64>, FormError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Number(n)) => n
                .as_f64()
                .map(Some)
                .ok_or_else(|| self.invalid(format!("'{key}' is out of range"))),
            Some(_) => Err(self.invalid(format!("'{key}' must be a number"))),
        }
    }

    fn count(&self, key: &str) -> Result<Option<usize>, FormError> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => value
                .as_u64()
                .and_then(|n| usize::try_from(n).ok())
                .map(Some)
                .ok_or_else(|| self.invalid(format!("'{key}' must be a non-negative integer"))),
        }
    }

    fn message(&self) -> Result<Option<String>, FormError> {
        self.string("message")
    }

    fn values(&self, list: &Value) -> Result<Vec<FieldValue>, FormError> {
        let Value::Array(items) = list else {
            return Err(self.invalid("expected a list of values"));
        };
        items
            .iter()
            .map(|item| {
                FieldValue::from_json(self.field, item)
                    .map_err(|_| self.invalid("list entries must be primitives"))
            })
            .collect()
    }
}

impl Constraint {
    /// Parse one constraint; `false` or `null` options disable it
    fn parse(field: &str, name: &str, options: &Value) -> Result<Option<Self>, FormError> {
        if !KNOWN_CONSTRAINTS.contains(&name) {
            return Err(FormError::unknown_constraint(field, name));
        }
        if matches!(options, Value::Null | Value::Bool(false)) {
            return Ok(None);
        }

        let constraint = match name {
            "presence" => {
                let opts = Options::read(field, name, options)?;
                Constraint::Presence {
                    allow_empty: opts.flag("allowEmpty")?,
                    message: opts.message()?,
                }
            }
            "email" => {
                let opts = Options::read(field, name, options)?;
                Constraint::Email {
                    message: opts.message()?,
                }
            }
            "length" => {
                let opts = Options::object(field, name, options)?;
                Constraint::Length {
                    is: opts.count("is")?,
                    minimum: opts.count("minimum")?,
                    maximum: opts.count("maximum")?,
                    message: opts.message()?,
                }
            }
            "format" => parse_format(field, name, options)?,
            "equality" => match options {
                Value::String(attribute) => Constraint::Equality {
                    attribute: attribute.clone(),
                    message: None,
                },
                _ => {
                    let opts = Options::object(field, name, options)?;
                    Constraint::Equality {
                        attribute: opts
                            .string("attribute")?
                            .ok_or_else(|| opts.invalid("'attribute' is required"))?,
                        message: opts.message()?,
                    }
                }
            },
            "inclusion" | "exclusion" => {
                let (within, message) = match options {
                    Value::Array(_) => {
                        let opts = Options {
                            field,
                            name,
                            map: None,
                        };
                        (opts.values(options)?, None)
                    }
                    _ => {
                        let opts = Options::object(field, name, options)?;
                        let list = opts
                            .get("within")
                            .ok_or_else(|| opts.invalid("'within' is required"))?;
                        (opts.values(list)?, opts.message()?)
                    }
                };
                if name == "inclusion" {
                    Constraint::Inclusion { within, message }
                } else {
                    Constraint::Exclusion { within, message }
                }
            }
            "numericality" => {
                let opts = Options::read(field, name, options)?;
                Constraint::Numericality(NumericRules {
                    only_integer: opts.flag("onlyInteger")?,
                    greater_than: opts.number("greaterThan")?,
                    greater_than_or_equal_to: opts.number("greaterThanOrEqualTo")?,
                    equal_to: opts.number("equalTo")?,
                    less_than: opts.number("lessThan")?,
                    less_than_or_equal_to: opts.number("lessThanOrEqualTo")?,
                    odd: opts.flag("odd")?,
                    even: opts.flag("even")?,
                    message: opts.message()?,
                })
            }
            _ => return Err(FormError::unknown_constraint(field, name)),
        };

        Ok(Some(constraint))
    }

    /// Messages for every rule the value breaks, without the field prefix
    fn check(&self, value: &FieldValue, values: &FieldValues) -> Vec<String> {
        if let Constraint::Presence {
            allow_empty,
            message,
        } = self
        {
            let blank = match value {
                FieldValue::Null => true,
                FieldValue::Text(s) => !allow_empty && s.trim().is_empty(),
                _ => false,
            };
            return if blank {
                vec![message_or(message, "can't be blank")]
            } else {
                Vec::new()
            };
        }

        // only presence looks at missing values
        if value.is_null() {
            return Vec::new();
        }

        match self {
            Constraint::Presence { .. } => Vec::new(),
            Constraint::Email { message } => match value {
                FieldValue::Text(s) if s.is_empty() || email_address::EmailAddress::is_valid(s) => {
                    Vec::new()
                }
                _ => vec![message_or(message, "is not a valid email")],
            },
            Constraint::Length {
                is,
                minimum,
                maximum,
                message,
            } => {
                let FieldValue::Text(s) = value else {
                    return vec![message_or(message, "has an incorrect length")];
                };
                let length = s.chars().count();
                let mut errors = Vec::new();
                if let Some(is) = is.filter(|is| length != *is) {
                    errors.push(format!("is the wrong length (should be {is} characters)"));
                }
                if let Some(minimum) = minimum.filter(|minimum| length < *minimum) {
                    errors.push(format!("is too short (minimum is {minimum} characters)"));
                }
                if let Some(maximum) = maximum.filter(|maximum| length > *maximum) {
                    errors.push(format!("is too long (maximum is {maximum} characters)"));
                }
                replace_with(errors, message)
            }
            Constraint::Format { pattern, message } => match value {
                FieldValue::Text(s) if pattern.is_match(s) => Vec::new(),
                _ => vec![message_or(message, "is invalid")],
            },
            Constraint::Equality { attribute, message } => {
                let null = FieldValue::Null;
                let other = values.get(attribute).unwrap_or(&null);
                if value == other {
                    Vec::new()
                } else {
                    vec![message
                        .clone()
                        .unwrap_or_else(|| format!("is not equal to {}", prettify(attribute)))]
                }
            }
            Constraint::Inclusion { within, message } => {
                if within.contains(value) {
                    Vec::new()
                } else {
                    vec![message.clone().unwrap_or_else(|| {
                        format!("^{} is not included in the list", value.display_value())
                    })]
                }
            }
            Constraint::Exclusion { within, message } => {
                if within.contains(value) {
                    vec![message
                        .clone()
                        .unwrap_or_else(|| format!("^{} is restricted", value.display_value()))]
                } else {
                    Vec::new()
                }
            }
            Constraint::Numericality(rules) => rules.check(value),
        }
    }
}

fn parse_format(field: &str, name: &str, options: &Value) -> Result<Constraint, FormError> {
    let (pattern, flags, message) = match options {
        Value::String(pattern) => (pattern.clone(), String::new(), None),
        _ => {
            let opts = Options::object(field, name, options)?;
            let pattern = opts
                .string("pattern")?
                .ok_or_else(|| opts.invalid("'pattern' is required"))?;
            (
                pattern,
                opts.string("flags")?.unwrap_or_default(),
                opts.message()?,
            )
        }
    };

    let mut builder = RegexBuilder::new(&format!("^(?:{pattern})$"));
    for flag in flags.chars() {
        match flag {
            'i' => {
                builder.case_insensitive(true);
            }
            'm' => {
                builder.multi_line(true);
            }
            's' => {
                builder.dot_matches_new_line(true);
            }
            // global and unicode have no meaning for a whole-value match
            'g' | 'u' => {}
            other => {
                return Err(FormError::invalid_constraint(
                    field,
                    name,
                    format!("unsupported flag '{other}'"),
                ))
            }
        }
    }

    let pattern = builder
        .build()
        .map_err(|err| FormError::invalid_constraint(field, name, err.to_string()))?;
    Ok(Constraint::Format { pattern, message })
}

impl NumericRules {
    fn check(&self, value: &FieldValue) -> Vec<String> {
        let number = match value {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(s) if s.trim().is_empty() => return Vec::new(),
            FieldValue::Text(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        let Some(number) = number.filter(|n| n.is_finite()) else {
            return vec![message_or(&self.message, "is not a number")];
        };

        if self.only_integer && number.fract() != 0.0 {
            return vec![message_or(&self.message, "must be an integer")];
        }

        let bounds: [(Option<f64>, &str, fn(f64, f64) -> bool); 5] = [
            (self.greater_than, "greater than", |n, bound| n > bound),
            (self.greater_than_or_equal_to, "greater than or equal to", |n, bound| n >= bound),
            (self.equal_to, "equal to", |n, bound| n == bound),
            (self.less_than, "less than", |n, bound| n < bound),
            (self.less_than_or_equal_to, "less than or equal to", |n, bound| n <= bound),
        ];
        let mut errors: Vec<String> = bounds
            .into_iter()
            .filter_map(|(bound, label, holds)| {
                let bound = bound?;
                (!holds(number, bound)).then(|| format!("must be {label} {bound}"))
            })
            .collect();
        if self.odd && number.rem_euclid(2.0) != 1.0 {
            errors.push("must be odd".to_string());
        }
        if self.even && number.rem_euclid(2.0) != 0.0 {
            errors.push("must be even".to_string());
        }

        replace_with(errors, &self.message)
    }
}

fn message_or(message: &Option<String>, default: &str) -> String {
    message.clone().unwrap_or_else(|| default.to_string())
}

/// A custom message replaces every default message of a constraint
fn replace_with(errors: Vec<String>, message: &Option<String>) -> Vec<String> {
    match message {
        Some(message) if !errors.is_empty() => vec![message.clone()],
        _ => errors,
    }
}

/// Prefix a message with the field's display name unless it starts with `^`
fn full_message(field: &str, message: &str) -> String {
    match message.strip_prefix('^') {
        Some(verbatim) => verbatim.to_string(),
        None => format!("{} {message}", capitalize(&prettify(field))),
    }
}

/// "firstName", "first_name" and "first-name" all become "first name"
fn prettify(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev: Option<char> = None;
    for c in name.chars() {
        match c {
            '_' | '-' | '.' => out.push(' '),
            '\\' => {}
            c if c.is_uppercase() && prev.is_some_and(char::is_lowercase) => {
                out.push(' ');
                out.extend(c.to_lowercase());
            }
            c => out.extend(c.to_lowercase()),
        }
        prev = Some(c);
    }
    out
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
