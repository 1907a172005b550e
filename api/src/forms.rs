//! Multipart form collection and typed field access.
//!
//! Text accessors distinguish a field that was not sent (`None`) from one
//! sent blank (`Some("")`). Typed accessors treat blank as not sent.

use std::str::FromStr;

use axum::{
    body::Bytes,
    extract::{FromRequest, Multipart, Request},
};
use rust_decimal::Decimal;

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub field: String,
    pub file_name: String,
    pub bytes: Bytes,
}

#[derive(Debug, Default)]
pub struct FormData {
    fields: Vec<(String, String)>,
    files: Vec<UploadedFile>,
}

impl FormData {
    pub async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = FormData::default();
        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            let file_name = field.file_name().map(str::to_string);

            match file_name {
                Some(file_name) => {
                    let bytes = field.bytes().await?;
                    // Browsers send an empty part for an untouched file input.
                    if file_name.is_empty() && bytes.is_empty() {
                        continue;
                    }
                    form.files.push(UploadedFile {
                        field: name,
                        file_name,
                        bytes,
                    });
                }
                None => {
                    let value = field.text().await?;
                    form.fields.push((name, value));
                }
            }
        }
        Ok(form)
    }

    /// Last value sent under `name`, trimmed.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .rev()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.trim())
    }

    pub fn text_owned(&self, name: &str) -> Option<String> {
        self.text(name).map(str::to_string)
    }

    pub fn files<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a UploadedFile> + 'a {
        self.files.iter().filter(move |f| f.field == name)
    }

    pub fn file(&self, name: &str) -> Option<&UploadedFile> {
        self.files.iter().find(|f| f.field == name)
    }

    /// Names from `required` that are absent or blank, in the order given.
    /// A file part satisfies a requirement as well as a text part does.
    pub fn missing(&self, required: &[&'static str]) -> Vec<&'static str> {
        required
            .iter()
            .copied()
            .filter(|name| {
                let has_text = self.text(name).is_some_and(|v| !v.is_empty());
                !has_text && self.file(name).is_none()
            })
            .collect()
    }

    pub fn require(&self, required: &[&'static str]) -> Result<(), AppError> {
        let missing = self.missing(required);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(AppError::MissingFields(missing))
        }
    }

    /// Like `text_owned`, but a field sent blank is an error rather than a value.
    pub fn non_blank_text(&self, name: &'static str) -> Result<Option<String>, AppError> {
        match self.text(name) {
            Some("") => Err(AppError::invalid_field(name, "must not be blank")),
            other => Ok(other.map(str::to_string)),
        }
    }

    fn non_blank(&self, name: &str) -> Option<&str> {
        self.text(name).filter(|v| !v.is_empty())
    }

    fn parsed<T: FromStr>(&self, name: &'static str, expected: &str) -> Result<Option<T>, AppError> {
        self.non_blank(name)
            .map(|raw| {
                raw.parse::<T>()
                    .map_err(|_| AppError::invalid_field(name, format!("expected {expected}")))
            })
            .transpose()
    }

    pub fn integer(&self, name: &'static str) -> Result<Option<i64>, AppError> {
        self.parsed(name, "an integer")
    }

    pub fn non_negative_integer(&self, name: &'static str) -> Result<Option<i64>, AppError> {
        match self.integer(name)? {
            Some(n) if n < 0 => Err(AppError::invalid_field(name, "must not be negative")),
            other => Ok(other),
        }
    }

    pub fn float(&self, name: &'static str) -> Result<Option<f64>, AppError> {
        match self.parsed::<f64>(name, "a number")? {
            Some(n) if !n.is_finite() => Err(AppError::invalid_field(name, "expected a number")),
            other => Ok(other),
        }
    }

    /// Non-negative decimal, returned in its canonical text form.
    pub fn decimal(&self, name: &'static str) -> Result<Option<String>, AppError> {
        match self.parsed::<Decimal>(name, "a decimal amount")? {
            Some(d) if d.is_sign_negative() && !d.is_zero() => {
                Err(AppError::invalid_field(name, "must not be negative"))
            }
            Some(d) => Ok(Some(d.to_string())),
            None => Ok(None),
        }
    }

    pub fn boolean(&self, name: &'static str) -> Result<Option<bool>, AppError> {
        self.non_blank(name)
            .map(|raw| match raw.to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => Ok(true),
                "false" | "0" | "no" | "off" => Ok(false),
                _ => Err(AppError::invalid_field(name, "expected true or false")),
            })
            .transpose()
    }

    pub fn json_object(&self, name: &'static str) -> Result<Option<serde_json::Value>, AppError> {
        self.non_blank(name)
            .map(|raw| match serde_json::from_str::<serde_json::Value>(raw) {
                Ok(value @ serde_json::Value::Object(_)) => Ok(value),
                _ => Err(AppError::invalid_field(name, "expected a JSON object")),
            })
            .transpose()
    }

    /// Optional foreign key: absent is `None`, blank is `Some(None)`.
    pub fn nullable_id(&self, name: &'static str) -> Result<Option<Option<i64>>, AppError> {
        match self.text(name) {
            None => Ok(None),
            Some("") => Ok(Some(None)),
            Some(raw) => raw
                .parse::<i64>()
                .map(|id| Some(Some(id)))
                .map_err(|_| AppError::invalid_field(name, "expected an id")),
        }
    }
}

/// Extracting `FormData` directly keeps a non-multipart body inside the
/// error envelope instead of axum's plain-text rejection.
impl<S> FromRequest<S> for FormData
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let multipart = Multipart::from_request(req, state)
            .await
            .map_err(|_| AppError::BadRequest("Expected multipart/form-data.".to_string()))?;
        Self::read(multipart).await
    }
}

/// Unwrap a typed value whose presence `FormData::require` already checked.
pub fn required<T>(value: Option<T>, field: &'static str) -> Result<T, AppError> {
    value.ok_or_else(|| AppError::MissingFields(vec![field]))
}

#[cfg(test)]
impl FormData {
    pub fn with_text(mut self, name: &str, value: &str) -> Self {
        self.fields.push((name.to_string(), value.to_string()));
        self
    }

    pub fn with_file(mut self, name: &str, file_name: &str, bytes: &'static [u8]) -> Self {
        self.files.push(UploadedFile {
            field: name.to_string(),
            file_name: file_name.to_string(),
            bytes: Bytes::from_static(bytes),
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> FormData {
        FormData::default()
    }

    #[test]
    fn missing_preserves_required_order() {
        let f = form().with_text("description", "  ");
        assert_eq!(
            f.missing(&["name", "description", "image"]),
            vec!["name", "description", "image"]
        );

        let f = form().with_text("name", "Shoes").with_file("image", "a.png", b"x");
        assert_eq!(f.missing(&["name", "description", "image"]), vec!["description"]);
    }

    #[test]
    fn file_outlives_the_lookup_name() {
        let f = form()
            .with_file("gallery", "g.png", b"g")
            .with_file("image", "first.png", b"1")
            .with_file("image", "second.png", b"2");
        let found = {
            let name = String::from("image");
            f.file(&name)
        };
        assert_eq!(found.map(|u| u.file_name.as_str()), Some("first.png"));
        assert_eq!(f.files("image").count(), 2);
        assert!(f.file("banner").is_none());
    }

    #[test]
    fn text_distinguishes_blank_from_absent() {
        let f = form().with_text("brand", "   ");
        assert_eq!(f.text("brand"), Some(""));
        assert_eq!(f.text("title"), None);
    }

    #[test]
    fn last_value_wins() {
        let f = form().with_text("name", "first").with_text("name", " second ");
        assert_eq!(f.text("name"), Some("second"));
    }

    #[test]
    fn typed_parsers() {
        let f = form()
            .with_text("price", "19.90")
            .with_text("stock", "12")
            .with_text("rating", "4.5")
            .with_text("is_featured", "TRUE")
            .with_text("attributes", r#"{"color":"red"}"#)
            .with_text("discount_price", "");

        assert_eq!(f.decimal("price").unwrap().as_deref(), Some("19.90"));
        assert_eq!(f.non_negative_integer("stock").unwrap(), Some(12));
        assert_eq!(f.float("rating").unwrap(), Some(4.5));
        assert_eq!(f.boolean("is_featured").unwrap(), Some(true));
        assert_eq!(
            f.json_object("attributes").unwrap(),
            Some(serde_json::json!({"color": "red"}))
        );
        assert_eq!(f.decimal("discount_price").unwrap(), None);
        assert_eq!(f.integer("absent").unwrap(), None);
    }

    #[test]
    fn bad_values_name_the_field() {
        let f = form()
            .with_text("price", "cheap")
            .with_text("stock", "-1")
            .with_text("rating", "NaN")
            .with_text("is_featured", "maybe")
            .with_text("attributes", "[1,2]")
            .with_text("discount_price", "-0.01");

        for (field, result) in [
            ("price", f.decimal("price").map(|_| ())),
            ("stock", f.non_negative_integer("stock").map(|_| ())),
            ("rating", f.float("rating").map(|_| ())),
            ("is_featured", f.boolean("is_featured").map(|_| ())),
            ("attributes", f.json_object("attributes").map(|_| ())),
            ("discount_price", f.decimal("discount_price").map(|_| ())),
        ] {
            match result {
                Err(AppError::InvalidField { field: got, .. }) => assert_eq!(got, field),
                other => panic!("{field}: expected InvalidField, got {other:?}"),
            }
        }
    }

    #[test]
    fn nullable_id_three_states() {
        let f = form().with_text("cleared", "").with_text("set", "7").with_text("bad", "x");
        assert_eq!(f.nullable_id("absent").unwrap(), None);
        assert_eq!(f.nullable_id("cleared").unwrap(), Some(None));
        assert_eq!(f.nullable_id("set").unwrap(), Some(Some(7)));
        assert!(f.nullable_id("bad").is_err());
    }
}
