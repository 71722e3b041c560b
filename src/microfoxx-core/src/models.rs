use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Login credentials sent to the session endpoint
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Session handed out by the login endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub sid: String,
    #[serde(default)]
    pub uid: String,
}

/// QuerySpec describes a cursor query: query text, bind variables, and
/// how the result set should be paged
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuerySpec {
    pub query: String,
    pub bind_vars: HashMap<String, serde_json::Value>,
    /// Records per batch; `None` (or 0) returns everything in one response
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<u32>,
    /// Ask the server for the total result count
    pub count: bool,
}

impl QuerySpec {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            bind_vars: HashMap::new(),
            batch_size: None,
            count: false,
        }
    }

    /// Bind a named variable. Binding the same name twice keeps the last value.
    pub fn bind(mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.bind_vars.insert(name.into(), value.into());
        self
    }

    pub fn batch_size(mut self, batch_size: u32) -> Self {
        self.batch_size = Some(batch_size);
        self
    }

    pub fn with_count(mut self) -> Self {
        self.count = true;
        self
    }
}

/// ModifyingQuery runs an insert, update or remove query against one write
/// collection while reading from others
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifyingQuery {
    pub write_collection: String,
    pub read_collections: Vec<String>,
    pub query: String,
    pub bind_vars: HashMap<String, serde_json::Value>,
}

impl ModifyingQuery {
    pub fn new(write_collection: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            write_collection: write_collection.into(),
            read_collections: Vec::new(),
            query: query.into(),
            bind_vars: HashMap::new(),
        }
    }

    pub fn read_from(mut self, collection: impl Into<String>) -> Self {
        self.read_collections.push(collection.into());
        self
    }

    pub fn bind(mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.bind_vars.insert(name.into(), value.into());
        self
    }
}

/// Filters, sorting and limits for document listings
#[derive(Debug, Clone, Default)]
pub struct DocumentFilter {
    /// Exact-match field filters
    pub fields: BTreeMap<String, String>,
    pub sort_fields: Vec<String>,
    /// Appended to the sort clause as `::<order>` (e.g. "ASC", "DESC")
    pub sort_order: Option<String>,
    pub limit_offset: u64,
    /// Limit only applies when greater than zero
    pub limit_count: u64,
}

impl DocumentFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn sort_by(mut self, field: impl Into<String>) -> Self {
        self.sort_fields.push(field.into());
        self
    }

    pub fn order(mut self, order: impl Into<String>) -> Self {
        self.sort_order = Some(order.into());
        self
    }

    pub fn limit(mut self, offset: u64, count: u64) -> Self {
        self.limit_offset = offset;
        self.limit_count = count;
        self
    }

    /// Field filters only, as used for counts
    pub fn field_pairs(&self) -> Vec<(String, String)> {
        self.fields
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Full query string pairs: field filters, `sort`, then `limit`
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = self.field_pairs();

        if !self.sort_fields.is_empty() {
            let mut sort = self.sort_fields.join(",");
            if let Some(order) = self.sort_order.as_deref().filter(|o| !o.is_empty()) {
                sort.push_str("::");
                sort.push_str(order);
            }
            pairs.push(("sort".to_string(), sort));
        }

        if self.limit_count > 0 {
            pairs.push((
                "limit".to_string(),
                format!("{},{}", self.limit_offset, self.limit_count),
            ));
        }

        pairs
    }
}

/// Graph definition: named edge relations plus orphan vertex collections
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Graph {
    pub name: String,
    #[serde(default)]
    pub relations: Vec<Relation>,
    /// Collections in the graph without any relation
    #[serde(default)]
    pub orphans: Vec<String>,
}

/// Relation is an edge definition from n vertex collections to m vertex collections.
///
/// A `has_bought` relation could go from `[company, customer]` to
/// `[groceries, electronics]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Relation {
    pub name: String,
    pub from: Vec<String>,
    pub to: Vec<String>,
}

/// Parameters for a new index
#[derive(Debug, Clone, Serialize)]
pub struct IndexParams {
    pub collection: String,
    #[serde(rename = "type")]
    pub index_type: String,
    pub fields: Vec<String>,
    pub sparse: bool,
    pub unique: bool,
}

/// Index as listed by the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Index {
    pub id: String,
    #[serde(rename = "type")]
    pub index_type: String,
    #[serde(default)]
    pub fields: Vec<String>,
    #[serde(default)]
    pub selectivity_estimate: f64,
    #[serde(default)]
    pub unique: bool,
    #[serde(default)]
    pub sparse: bool,
}
