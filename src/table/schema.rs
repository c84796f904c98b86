// In: src/table/schema.rs

//! An ordered `name -> declared dtype` mapping.

use arrow_schema::{Field, Schema as ArrowSchema};
use serde::{Deserialize, Serialize};

use crate::error::TambakError;
use crate::types::TambakDataType;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SchemaField {
    pub name: String,
    pub dtype: TambakDataType,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<SchemaField>,
}

impl Schema {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = (S, TambakDataType)>,
        S: Into<String>,
    {
        Self {
            fields: fields
                .into_iter()
                .map(|(name, dtype)| SchemaField {
                    name: name.into(),
                    dtype,
                })
                .collect(),
        }
    }

    pub fn columns(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn types(&self) -> Vec<TambakDataType> {
        self.fields.iter().map(|f| f.dtype).collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name == name)
    }

    pub fn dtype_of(&self, name: &str) -> Option<TambakDataType> {
        self.fields.iter().find(|f| f.name == name).map(|f| f.dtype)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SchemaField> {
        self.fields.iter()
    }

    /// Declares a schema from Arrow field types.
    pub fn from_arrow(schema: &ArrowSchema) -> Result<Self, TambakError> {
        let fields = schema
            .fields()
            .iter()
            .map(|f| {
                Ok(SchemaField {
                    name: f.name().clone(),
                    dtype: TambakDataType::from_arrow_type(f.data_type())?,
                })
            })
            .collect::<Result<Vec<_>, TambakError>>()?;
        Ok(Self { fields })
    }

    /// The Arrow schema a table with this layout exports to. Every field is nullable.
    pub fn to_arrow(&self) -> ArrowSchema {
        ArrowSchema::new(
            self.fields
                .iter()
                .map(|f| Field::new(f.name.as_str(), f.dtype.to_arrow_type(), true))
                .collect::<Vec<_>>(),
        )
    }
}
