use serde_json::{Map, Value};
use url::Url;
use validator::ValidateEmail;

use crate::error::ValidationError;

type Validated<T> = Result<T, ValidationError>;

pub trait Choice: Sized + Copy + 'static {
    const ALL: &'static [Self];

    fn as_str(&self) -> &'static str;

    fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|choice| choice.as_str().eq_ignore_ascii_case(raw.trim()))
    }
}

pub struct Payload<'a> {
    body: &'a Map<String, Value>,
}

impl<'a> Payload<'a> {
    pub fn from_value(value: &'a Value) -> Validated<Self> {
        match value {
            Value::Object(body) => Ok(Self { body }),
            _ => Err(ValidationError::new("request body must be a JSON object")),
        }
    }

    fn string(&self, key: &str, label: &str) -> Validated<Option<String>> {
        match self.body.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(raw)) => {
                let trimmed = raw.trim();
                Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
            }
            Some(_) => Err(ValidationError::new(format!("{label} must be a string"))),
        }
    }

    pub fn required(&self, key: &str, label: &str) -> Validated<String> {
        self.string(key, label)?
            .ok_or_else(|| ValidationError::new(format!("{label} is required")))
    }

    pub fn optional(&self, key: &str, label: &str) -> Validated<Option<String>> {
        self.string(key, label)
    }

    pub fn required_email(&self, key: &str, label: &str) -> Validated<String> {
        let value = self.required(key, label)?;
        check_email(&value, label)?;
        Ok(value)
    }

    pub fn required_url(&self, key: &str, label: &str) -> Validated<String> {
        let value = self.required(key, label)?;
        check_url(&value, label)?;
        Ok(value)
    }

    pub fn required_choice<T: Choice>(&self, key: &str, label: &str) -> Validated<T> {
        let value = self.required(key, label)?;
        parse_choice(&value, label)
    }

    pub fn passthrough(&self, key: &str) -> Option<Value> {
        self.body.get(key).filter(|value| !value.is_null()).cloned()
    }

    /// A list of URLs given either as a JSON array or as a single string.
    pub fn url_list(&self, key: &str, label: &str) -> Validated<Vec<String>> {
        let items = match self.body.get(key) {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::String(_)) => self.optional(key, label)?.into_iter().collect(),
            Some(Value::Array(values)) => {
                let mut items = Vec::with_capacity(values.len());
                for value in values {
                    match value {
                        Value::String(raw) if !raw.trim().is_empty() => {
                            items.push(raw.trim().to_string())
                        }
                        Value::String(_) => {}
                        _ => {
                            return Err(ValidationError::new(format!(
                                "{label} must be a list of URLs"
                            )))
                        }
                    }
                }
                items
            }
            Some(_) => {
                return Err(ValidationError::new(format!(
                    "{label} must be a list of URLs"
                )))
            }
        };
        for item in &items {
            check_url(item, label)?;
        }
        Ok(items)
    }
}

fn parse_choice<T: Choice>(value: &str, label: &str) -> Validated<T> {
    T::parse(value).ok_or_else(|| {
        let allowed: Vec<&str> = T::ALL.iter().map(Choice::as_str).collect();
        ValidationError::new(format!("{label} must be one of: {}", allowed.join(", ")))
    })
}

pub fn is_valid_url(value: &str) -> bool {
    match Url::parse(value) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
        Err(_) => false,
    }
}

fn check_email(value: &str, label: &str) -> Validated<()> {
    if value.validate_email() {
        Ok(())
    } else {
        Err(ValidationError::new(format!(
            "{label} must be a valid email address"
        )))
    }
}

fn check_url(value: &str, label: &str) -> Validated<()> {
    if is_valid_url(value) {
        Ok(())
    } else {
        Err(ValidationError::new(format!("{label} must be a valid URL")))
    }
}
