use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde_json::{Map, Value as JsonValue, json};

use catalog_core::{DomainError, DomainResult, Entity, ProductId};

use crate::category::Category;
use crate::price::Price;

/// Product entity of the catalog.
///
/// The `id` is assigned by the storage engine on creation and never changes
/// afterwards; every other field is freely mutable and persisted by `update`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    id: Option<ProductId>,
    pub name: String,
    pub description: Option<String>,
    pub price: Price,
    pub available: bool,
    pub category: Category,
}

impl Product {
    pub const NAME_MAX_LEN: usize = 100;
    pub const DESCRIPTION_MAX_LEN: usize = 250;

    /// Create an in-memory product that has not been persisted yet.
    pub fn new(
        name: impl Into<String>,
        description: Option<String>,
        price: Price,
        available: bool,
        category: Category,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            description,
            price,
            available,
            category,
        }
    }

    /// Rebuild a product from a stored row.
    pub fn from_row(
        id: ProductId,
        name: String,
        description: Option<String>,
        price: Price,
        available: bool,
        category: Category,
    ) -> Self {
        Self {
            id: Some(id),
            name,
            description,
            price,
            available,
            category,
        }
    }

    /// Record the key handed out by the storage engine.
    ///
    /// Only stores call this, right after inserting the row.
    pub fn assign_id(&mut self, id: ProductId) {
        self.id = Some(id);
    }

    /// Check field-level rules before the product is written.
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::data_validation("Invalid product: name cannot be empty"));
        }
        if self.name.chars().count() > Self::NAME_MAX_LEN {
            return Err(DomainError::data_validation(format!(
                "Invalid product: name is longer than {} characters",
                Self::NAME_MAX_LEN
            )));
        }
        if let Some(description) = &self.description {
            if description.chars().count() > Self::DESCRIPTION_MAX_LEN {
                return Err(DomainError::data_validation(format!(
                    "Invalid product: description is longer than {} characters",
                    Self::DESCRIPTION_MAX_LEN
                )));
            }
        }
        Ok(())
    }

    /// Serialize into the JSON shape exchanged with request handlers.
    pub fn serialize(&self) -> JsonValue {
        json!({
            "id": self.id.map(|id| id.get()),
            "name": self.name,
            "description": self.description,
            "price": self.price.to_string(),
            "available": self.available,
            "category": self.category.as_str(),
        })
    }

    /// Build an unpersisted product from a request body.
    ///
    /// Any `id` in the body is ignored: keys are only handed out by the store.
    pub fn deserialize(data: &JsonValue) -> DomainResult<Self> {
        let Some(obj) = data.as_object() else {
            return Err(DomainError::data_validation(
                "Invalid product: body of request contained bad or no data",
            ));
        };

        let name = match field(obj, "name")? {
            JsonValue::String(s) => s.clone(),
            other => return Err(bad_type("name", "string", other)),
        };

        let description = match field(obj, "description")? {
            JsonValue::Null => None,
            JsonValue::String(s) => Some(s.clone()),
            other => return Err(bad_type("description", "string", other)),
        };

        let price = match field(obj, "price")? {
            JsonValue::String(s) => Price::from_str(s)?,
            JsonValue::Number(n) => {
                let amount = Decimal::from_str(&n.to_string()).map_err(|e| {
                    DomainError::data_validation(format!("Invalid price: {n}: {e}"))
                })?;
                Price::new(amount)?
            }
            other => return Err(bad_type("price", "decimal", other)),
        };

        let available = match field(obj, "available")? {
            JsonValue::Bool(b) => *b,
            other => return Err(bad_type("available", "boolean", other)),
        };

        let category = match field(obj, "category")? {
            JsonValue::String(s) => Category::from_str(s)?,
            other => return Err(bad_type("category", "string", other)),
        };

        Ok(Self::new(name, description, price, available, category))
    }
}

fn field<'a>(obj: &'a Map<String, JsonValue>, key: &str) -> DomainResult<&'a JsonValue> {
    obj.get(key)
        .ok_or_else(|| DomainError::data_validation(format!("Invalid product: missing {key}")))
}

fn bad_type(key: &str, expected: &str, found: &JsonValue) -> DomainError {
    let found = match found {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    };
    DomainError::data_validation(format!("Invalid type for {expected} [{key}]: {found}"))
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> Option<ProductId> {
        self.id
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Some(id) => write!(f, "<Product {} id=[{}]>", self.name, id),
            None => write!(f, "<Product {} id=[None]>", self.name),
        }
    }
}
