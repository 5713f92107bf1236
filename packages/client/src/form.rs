// ABOUTME: Ordered multipart payloads for record create and update requests
// ABOUTME: Applies the omission rule for absent and empty optional fields

use reqwest::multipart::{Form, Part};
use serde_json::{Map, Value};
use storyloom_core::DocumentUpload;

use crate::error::{ClientError, ClientResult};

#[derive(Debug, Clone, PartialEq)]
pub enum FormValue {
    Text(String),
    Number(i64),
    File(DocumentUpload),
}

/// Multipart form fields in insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormPayload {
    fields: Vec<(String, FormValue)>,
}

impl FormPayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text field unconditionally
    pub fn text(mut self, name: &str, value: impl Into<String>) -> Self {
        self.fields.push((name.to_string(), FormValue::Text(value.into())));
        self
    }

    pub fn number(mut self, name: &str, value: impl Into<i64>) -> Self {
        self.fields.push((name.to_string(), FormValue::Number(value.into())));
        self
    }

    pub fn file(mut self, name: &str, upload: DocumentUpload) -> Self {
        self.fields.push((name.to_string(), FormValue::File(upload)));
        self
    }

    /// Append a text field only when it is present and non-empty.
    /// An empty string cannot be used to clear a field.
    pub fn push_present(&mut self, name: &str, value: Option<&str>) {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            self.fields
                .push((name.to_string(), FormValue::Text(value.to_string())));
        }
    }

    pub fn push_number(&mut self, name: &str, value: Option<impl Into<i64>>) {
        if let Some(value) = value {
            self.fields
                .push((name.to_string(), FormValue::Number(value.into())));
        }
    }

    pub fn push_file(&mut self, name: &str, upload: Option<DocumentUpload>) {
        if let Some(upload) = upload {
            self.fields.push((name.to_string(), FormValue::File(upload)));
        }
    }

    pub fn fields(&self) -> &[(String, FormValue)] {
        &self.fields
    }

    pub fn names(&self) -> Vec<&str> {
        self.fields.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&FormValue> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Encode as a multipart form
    pub fn into_multipart(self) -> ClientResult<Form> {
        let mut form = Form::new();
        for (name, value) in self.fields {
            form = match value {
                FormValue::Text(text) => form.text(name, text),
                FormValue::Number(number) => form.text(name, number.to_string()),
                FormValue::File(upload) => {
                    let part = Part::bytes(upload.bytes.to_vec())
                        .file_name(upload.file_name)
                        .mime_str(&upload.content_type)
                        .map_err(|e| {
                            ClientError::Serialization(format!("Invalid content type: {}", e))
                        })?;
                    form.part(name, part)
                }
            };
        }
        Ok(form)
    }

    /// JSON view of the fields as the backend would store them.
    /// Files are represented by their file name.
    pub fn to_json(&self) -> Map<String, Value> {
        self.fields
            .iter()
            .map(|(name, value)| {
                let value = match value {
                    FormValue::Text(text) => Value::String(text.clone()),
                    FormValue::Number(number) => Value::from(*number),
                    FormValue::File(upload) => Value::String(upload.file_name.clone()),
                };
                (name.clone(), value)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_push_present_skips_absent_and_empty() {
        let mut form = FormPayload::new();
        form.push_present("title", Some("Checkout"));
        form.push_present("description", Some(""));
        form.push_present("priority", None);
        form.push_number("story_points", Some(0u32));
        form.push_number("other", None::<u32>);

        assert_eq!(form.names(), vec!["title", "story_points"]);
        assert_eq!(
            Value::Object(form.to_json()),
            json!({"title": "Checkout", "story_points": 0})
        );
    }

    #[test]
    fn test_file_field_json_uses_file_name() {
        let upload = DocumentUpload::new("brd.pdf", b"%PDF".to_vec()).unwrap();
        let form = FormPayload::new().text("user", "u1").file("brd_document", upload);

        assert!(form.contains("brd_document"));
        assert_eq!(form.to_json()["brd_document"], json!("brd.pdf"));
        assert!(form.into_multipart().is_ok());
    }
}
