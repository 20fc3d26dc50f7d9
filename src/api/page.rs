//! One page of an OData list response

use serde_json::Value;

use crate::error::{Error, Result};

/// The items of a single list response plus the continuation reference
/// to the next page, if the server issued one.
#[derive(Debug, Clone)]
pub struct Page {
    pub items: Vec<Value>,
    pub next_link: Option<String>,
    pub count: Option<u64>,
}

impl Page {
    /// Parse an OData list payload (`value`, `@odata.nextLink`,
    /// `@odata.count`) into a page. A missing `value` array is a payload
    /// error; a missing next link is the normal end of the collection.
    pub fn from_json(json: Value) -> Result<Self> {
        let items = json
            .get("value")
            .and_then(|v| v.as_array())
            .ok_or_else(|| {
                Error::Payload("missing or invalid 'value' array in list response".to_string())
            })?
            .clone();

        let count = json.get("@odata.count").and_then(|c| c.as_u64());

        let next_link = json
            .get("@odata.nextLink")
            .and_then(|n| n.as_str())
            .map(|s| s.to_string());

        Ok(Self {
            items,
            next_link,
            count,
        })
    }

    /// End-of-sequence sentinel.
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            next_link: None,
            count: None,
        }
    }

    pub fn has_more(&self) -> bool {
        self.next_link.is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
