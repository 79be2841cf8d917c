//! Displayable cell content.
//!
//! A cell is either a scalar lifted out of the record, a plain string, or a
//! small tree of pre-rendered composite content (badges, avatar + name,
//! status pills). The grid never interprets it beyond flattening it to text
//! for the plain-text renderer.

use serde::Serialize;
use serde_json::Value as JsonValue;

/// Content produced by a column accessor or a row actions renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Renderable {
    /// Nothing to show (missing field, null value).
    Empty,

    /// Plain text.
    Text { value: String },

    /// Raw JSON scalar or structure taken from the record.
    Json { value: JsonValue },

    /// A tagged composite node, e.g. `span.badge` wrapping text.
    Element {
        tag: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        class_name: Option<String>,
        children: Vec<Renderable>,
    },

    /// Siblings without a wrapper.
    Fragment { children: Vec<Renderable> },
}

impl Renderable {
    pub fn text(value: impl Into<String>) -> Self {
        Renderable::Text {
            value: value.into(),
        }
    }

    /// Creates an element with no children.
    pub fn element(tag: impl Into<String>) -> Self {
        Renderable::Element {
            tag: tag.into(),
            class_name: None,
            children: Vec::new(),
        }
    }

    pub fn fragment(children: Vec<Renderable>) -> Self {
        Renderable::Fragment { children }
    }

    /// Sets the class name on an element. No-op for other variants.
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        if let Renderable::Element { class_name, .. } = &mut self {
            *class_name = Some(class.into());
        }
        self
    }

    /// Appends a child to an element or fragment. No-op for scalars.
    pub fn with_child(mut self, child: Renderable) -> Self {
        match &mut self {
            Renderable::Element { children, .. } | Renderable::Fragment { children } => {
                children.push(child)
            }
            _ => {}
        }
        self
    }

    /// Lifts a JSON field value. Strings become text and null becomes empty.
    pub fn from_json(value: &JsonValue) -> Self {
        match value {
            JsonValue::Null => Renderable::Empty,
            JsonValue::String(s) => Renderable::text(s.clone()),
            other => Renderable::Json {
                value: other.clone(),
            },
        }
    }

    /// Flattens the content to the text a reader would see.
    pub fn plain_text(&self) -> String {
        match self {
            Renderable::Empty => String::new(),
            Renderable::Text { value } => value.clone(),
            Renderable::Json { value } => match value {
                JsonValue::String(s) => s.clone(),
                other => other.to_string(),
            },
            Renderable::Element { children, .. } | Renderable::Fragment { children } => children
                .iter()
                .map(Renderable::plain_text)
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

impl From<&str> for Renderable {
    fn from(value: &str) -> Self {
        Renderable::text(value)
    }
}

impl From<String> for Renderable {
    fn from(value: String) -> Self {
        Renderable::text(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_json_maps_null_to_empty_and_strings_to_text() {
        assert_eq!(Renderable::from_json(&json!(null)), Renderable::Empty);
        assert_eq!(Renderable::from_json(&json!("Ada")), Renderable::text("Ada"));
        assert_eq!(
            Renderable::from_json(&json!(42)),
            Renderable::Json { value: json!(42) }
        );
    }

    #[test]
    fn composite_content_flattens_to_plain_text() {
        let cell = Renderable::element("div")
            .with_class("flex")
            .with_child(Renderable::element("img"))
            .with_child(
                Renderable::element("span")
                    .with_class("badge")
                    .with_child("Open".into()),
            )
            .with_child(Renderable::Json { value: json!(3) });

        assert_eq!(cell.plain_text(), "Open 3");
    }

    #[test]
    fn with_class_ignores_non_elements() {
        let text = Renderable::text("plain").with_class("ignored");
        assert_eq!(text, Renderable::text("plain"));
    }

    #[test]
    fn serializes_with_kind_tag() {
        let json = serde_json::to_value(Renderable::element("span").with_class("pill")).unwrap();
        assert_eq!(json["kind"], "element");
        assert_eq!(json["class_name"], "pill");
    }
}
