//! Form field value objects

/// How a field treats raw input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Stored verbatim
    Text,
    /// Non-digits are stripped, then the value is capped at `max_len`
    Digits { max_len: usize },
}

/// Represents a single form field with its configuration and value
#[derive(Debug, Clone)]
pub struct FormField {
    pub label: String,
    pub placeholder: Option<String>,
    pub kind: FieldKind,
    /// Rendered with every character replaced by a bullet
    pub is_masked: bool,
    value: String,
}

impl FormField {
    /// Create a new free-text field
    pub fn text(label: &str) -> Self {
        Self {
            label: label.to_string(),
            placeholder: None,
            kind: FieldKind::Text,
            is_masked: false,
            value: String::new(),
        }
    }

    /// Create a new digits-only field capped at `max_len` characters
    pub fn digits(label: &str, max_len: usize) -> Self {
        Self {
            kind: FieldKind::Digits { max_len },
            ..Self::text(label)
        }
    }

    pub fn with_placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = Some(placeholder.to_string());
        self
    }

    pub fn masked(mut self) -> Self {
        self.is_masked = true;
        self
    }

    /// Get the stored value
    pub fn as_text(&self) -> &str {
        &self.value
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Length in characters
    pub fn len(&self) -> usize {
        self.value.chars().count()
    }

    /// Replace the value, applying this field's input rules
    pub fn set_text(&mut self, raw: &str) {
        self.value = match self.kind {
            FieldKind::Text => raw.to_string(),
            FieldKind::Digits { max_len } => raw
                .chars()
                .filter(|c| c.is_ascii_digit())
                .take(max_len)
                .collect(),
        };
    }

    /// Get the display value for rendering
    pub fn display_value(&self) -> String {
        if self.is_masked {
            "•".repeat(self.len())
        } else {
            self.value.clone()
        }
    }
}
