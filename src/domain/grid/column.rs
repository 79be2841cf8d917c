//! Column descriptors.
//!
//! An accessor is an explicit tagged variant: either a top-level field key
//! looked up on the record's serialized form, or a function that derives
//! the cell from the typed record.

use std::fmt;
use std::sync::Arc;

use serde_json::Value as JsonValue;

use super::Renderable;

/// Function accessor signature.
pub type CellFn<T> = Arc<dyn Fn(&T) -> Renderable + Send + Sync>;

/// How a column obtains its cell from a record.
pub enum Accessor<T> {
    /// Lookup of a top-level field on the serialized record.
    Field(String),

    /// Arbitrary transform of the record.
    Function(CellFn<T>),
}

impl<T> Clone for Accessor<T> {
    fn clone(&self) -> Self {
        match self {
            Accessor::Field(key) => Accessor::Field(key.clone()),
            Accessor::Function(f) => Accessor::Function(Arc::clone(f)),
        }
    }
}

impl<T> fmt::Debug for Accessor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Accessor::Field(key) => f.debug_tuple("Field").field(key).finish(),
            Accessor::Function(_) => f.write_str("Function(..)"),
        }
    }
}

impl<T> Accessor<T> {
    /// Resolves the cell value.
    ///
    /// `serialized` is the record's JSON form; it is only consulted by
    /// field accessors and is `None` when serialization failed.
    pub fn resolve(&self, record: &T, serialized: Option<&JsonValue>) -> Renderable {
        match self {
            Accessor::Field(key) => serialized
                .and_then(|value| value.get(key.as_str()))
                .map(Renderable::from_json)
                .unwrap_or(Renderable::Empty),
            Accessor::Function(f) => f(record),
        }
    }

    pub fn is_field(&self) -> bool {
        matches!(self, Accessor::Field(_))
    }
}

/// One table column: header label, accessor and optional class name.
///
/// Columns render in declaration order. Header labels are expected to be
/// unique within a grid, which is not checked.
pub struct ColumnDescriptor<T> {
    pub header: String,
    pub accessor: Accessor<T>,
    pub class_name: Option<String>,
}

impl<T> ColumnDescriptor<T> {
    /// Column backed by a field key.
    pub fn field(header: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            accessor: Accessor::Field(key.into()),
            class_name: None,
        }
    }

    /// Column backed by a transform.
    pub fn computed<F>(header: impl Into<String>, f: F) -> Self
    where
        F: Fn(&T) -> Renderable + Send + Sync + 'static,
    {
        Self {
            header: header.into(),
            accessor: Accessor::Function(Arc::new(f)),
            class_name: None,
        }
    }

    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }
}

impl<T> Clone for ColumnDescriptor<T> {
    fn clone(&self) -> Self {
        Self {
            header: self.header.clone(),
            accessor: self.accessor.clone(),
            class_name: self.class_name.clone(),
        }
    }
}

impl<T> fmt::Debug for ColumnDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDescriptor")
            .field("header", &self.header)
            .field("accessor", &self.accessor)
            .field("class_name", &self.class_name)
            .finish()
    }
}
