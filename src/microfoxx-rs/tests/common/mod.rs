//! In-memory stand-in for a microfoxx service, plugged in as the transport.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use microfoxx_rs::{BoxError, ConnectionParams, HttpRequest, HttpResponse, HttpTransport};
use serde_json::{json, Value};

pub const DATABASE: &str = "test";
pub const FIRST_SID: u64 = 12345;

pub fn params() -> ConnectionParams {
    ConnectionParams::new(DATABASE).with_credentials("root", "secret")
}

fn reply(status: u16, body: Value) -> HttpResponse {
    HttpResponse::new(status, body.to_string())
}

fn exception(status: u16, message: &str) -> HttpResponse {
    reply(status, json!({ "exception": message }))
}

struct StubCursor {
    documents: Vec<Value>,
    batch_size: usize,
    position: usize,
}

#[derive(Default)]
struct State {
    next_sid: u64,
    valid_sids: Vec<String>,
    users: Vec<Value>,
    cursors: HashMap<String, StubCursor>,
    collections: BTreeMap<String, Vec<Value>>,
    next_key: u64,
    graphs: BTreeMap<String, Value>,
    indexes: BTreeMap<String, Vec<Value>>,
    requests: Vec<HttpRequest>,
}

/// Stub service with a users data set, cursors, collections, graphs and indexes
pub struct StubService {
    state: Mutex<State>,
}

impl StubService {
    /// 50 users named `testname1..=50`; even ones are enabled
    pub fn new() -> Arc<Self> {
        let users = (1..=50)
            .map(|i| {
                json!({
                    "name": format!("testname{}", i),
                    "status": if i % 2 == 0 { "enabled" } else { "disabled" },
                })
            })
            .collect();

        Arc::new(Self {
            state: Mutex::new(State {
                next_sid: FIRST_SID,
                users,
                ..State::default()
            }),
        })
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn open_cursors(&self) -> usize {
        self.state.lock().unwrap().cursors.len()
    }

    /// Simulate the server timing out every session
    pub fn expire_sessions(&self) {
        self.state.lock().unwrap().valid_sids.clear();
    }

    pub fn seed_collection(&self, name: &str, docs: Vec<Value>) {
        let mut state = self.state.lock().unwrap();
        let mut stored = Vec::new();
        for mut doc in docs {
            state.next_key += 1;
            doc["_key"] = json!(state.next_key.to_string());
            stored.push(doc);
        }
        state.collections.insert(name.to_string(), stored);
    }

    fn handle(&self, request: &HttpRequest) -> HttpResponse {
        let mut state = self.state.lock().unwrap();
        state.requests.push(request.clone());

        let prefix = format!("/_db/{}/microfoxx", DATABASE);
        let path = request.url.path().strip_prefix(&prefix).unwrap_or("");
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let body: Value = request
            .body
            .as_deref()
            .and_then(|b| serde_json::from_slice(b).ok())
            .unwrap_or(Value::Null);

        if segments == ["login"] {
            return state.login(&body);
        }

        let sid = request.header("X-Session-Id").unwrap_or("");
        if !state.valid_sids.iter().any(|s| s == sid) {
            return exception(401, "Session has expired or is invalid");
        }

        let query: BTreeMap<String, String> = request.url.query_pairs().into_owned().collect();

        match (request.method.as_str(), segments.as_slice()) {
            ("POST", ["cursor"]) => state.start_cursor(&body),
            ("PUT", ["cursor", id]) => state.next_batch(id),
            ("POST", ["collection"]) => state.create_collection(&body),
            ("POST", ["graph"]) => state.create_graph(&body),
            ("POST", ["graph", graph, "relation"]) => state.create_relation(graph, &body),
            ("GET", ["index", coll]) => state.list_indexes(coll),
            ("POST", ["index"]) => state.create_index(&body),
            ("DELETE", ["index", coll, key]) => state.remove_index(coll, key),
            ("POST", ["insert"]) => state.insert_query(&body),
            ("POST", ["update"]) | ("POST", ["remove"]) => {
                exception(400, "Error 1579: modifying queries need a write collection")
            }
            ("GET", [coll, "count"]) => state.count(coll, &query),
            ("GET", [coll]) => state.list_docs(coll, &query),
            ("POST", [coll]) => state.create_doc(coll, body),
            ("GET", [coll, key]) => state.get_doc(coll, key),
            ("PUT", [coll, key]) => state.update_doc(coll, key, &body),
            ("DELETE", [coll, key]) => state.remove_doc(coll, key),
            _ => exception(404, "Unknown route"),
        }
    }
}

impl State {
    fn login(&mut self, body: &Value) -> HttpResponse {
        if body["password"] != "secret" {
            return reply(401, json!({ "errorMessage": "Wrong username or password" }));
        }
        let sid = self.next_sid.to_string();
        self.next_sid += 1;
        self.valid_sids.push(sid.clone());
        reply(200, json!({ "sid": sid, "uid": "6789" }))
    }

    fn start_cursor(&mut self, body: &Value) -> HttpResponse {
        let bind_vars = &body["bindVars"];
        let field = ["name", "status"]
            .into_iter()
            .find(|f| bind_vars.get(*f).is_some());

        let field = match (bind_vars.get("@coll"), field) {
            (Some(_), Some(field)) => field,
            _ => {
                return exception(400, "Error 2016: Bind parameters in query need to be provided")
            }
        };

        let query = body["query"].as_str().unwrap_or("");
        let expected = format!("FOR item in @@coll FILTER item.{} == @{}", field, field);
        if !query.starts_with(&expected) {
            return exception(400, "Error 2016: Invalid AQL query");
        }

        let wanted = &bind_vars[field];
        let results: Vec<Value> = self
            .users
            .iter()
            .filter(|u| &u[field] == wanted)
            .cloned()
            .collect();
        let total = results.len();
        let batch_size = body["batchSize"].as_u64().unwrap_or(0) as usize;

        let mut response = if batch_size > 0 && batch_size < total {
            let id = uuid::Uuid::new_v4().simple().to_string();
            let first: Vec<Value> = results[..batch_size].to_vec();
            self.cursors.insert(
                id.clone(),
                StubCursor {
                    documents: results,
                    batch_size,
                    position: batch_size,
                },
            );
            json!({ "results": first, "hasMore": true, "cursor": id })
        } else {
            json!({ "results": results, "hasMore": false })
        };

        if body["count"] == true {
            response["count"] = json!(total);
        }
        let status = if response.get("cursor").is_some() { 201 } else { 200 };
        reply(status, response)
    }

    fn next_batch(&mut self, id: &str) -> HttpResponse {
        let Some(cursor) = self.cursors.get_mut(id) else {
            return reply(404, json!({ "errorMessage": "Error 1600: cursor not found" }));
        };

        let end = (cursor.position + cursor.batch_size).min(cursor.documents.len());
        let batch = cursor.documents[cursor.position..end].to_vec();
        cursor.position = end;
        let has_more = cursor.position < cursor.documents.len();

        if !has_more {
            self.cursors.remove(id);
        }
        reply(200, json!({ "hasMore": has_more, "results": batch }))
    }

    fn create_collection(&mut self, body: &Value) -> HttpResponse {
        let name = body["name"].as_str().unwrap_or_default().to_string();
        if self.collections.contains_key(&name) {
            return exception(400, "Error 2016: Collection already exists");
        }
        let id = self.collections.len().to_string();
        self.collections.insert(name.clone(), Vec::new());
        reply(
            201,
            json!({
                "message": format!("Successfully created the {} collection", name),
                "_id": id,
            }),
        )
    }

    fn create_graph(&mut self, body: &Value) -> HttpResponse {
        let name = body["name"].as_str().unwrap_or_default().to_string();
        if name.is_empty() {
            return exception(400, "Error 1921: graph name is required");
        }
        if self.graphs.contains_key(&name) {
            return exception(400, "Error 1925: graph already exists");
        }
        self.graphs.insert(name.clone(), body.clone());
        reply(201, json!({ "message": format!("Successfully created the {} graph", name) }))
    }

    fn create_relation(&mut self, graph: &str, body: &Value) -> HttpResponse {
        let Some(def) = self.graphs.get_mut(graph) else {
            return exception(404, "Error 1924: graph not found");
        };
        match def["relations"].as_array_mut() {
            Some(relations) => relations.push(body.clone()),
            None => def["relations"] = json!([body]),
        }
        reply(201, json!({ "message": "Successfully added the relation" }))
    }

    fn list_indexes(&self, coll: &str) -> HttpResponse {
        if !self.collections.contains_key(coll) {
            return exception(404, "Error 1203: collection not found");
        }
        let mut indexes = vec![json!({
            "id": format!("{}/0", coll),
            "type": "primary",
            "fields": ["_key"],
            "selectivityEstimate": 1,
            "unique": true,
            "sparse": false,
        })];
        indexes.extend(self.indexes.get(coll).cloned().unwrap_or_default());
        reply(200, Value::Array(indexes))
    }

    fn create_index(&mut self, body: &Value) -> HttpResponse {
        let coll = body["collection"].as_str().unwrap_or_default().to_string();
        if !self.collections.contains_key(&coll) {
            return exception(400, "Error 1203: collection not found");
        }
        let entry = self.indexes.entry(coll.clone()).or_default();
        let id = format!("{}/{}", coll, entry.len() + 1);
        entry.push(json!({
            "id": id,
            "type": body["type"],
            "fields": body["fields"],
            "selectivityEstimate": 1,
            "unique": body["unique"],
            "sparse": body["sparse"],
        }));
        reply(201, json!({ "id": id }))
    }

    fn remove_index(&mut self, coll: &str, key: &str) -> HttpResponse {
        let id = format!("{}/{}", coll, key);
        let Some(entry) = self.indexes.get_mut(coll) else {
            return exception(404, "Error 1212: index not found");
        };
        let before = entry.len();
        entry.retain(|i| i["id"] != id.as_str());
        if entry.len() == before {
            return exception(404, "Error 1212: index not found");
        }
        reply(200, json!({ "message": format!("Removed index {}", id) }))
    }

    fn insert_query(&mut self, body: &Value) -> HttpResponse {
        let coll = body["writeCollection"].as_str().unwrap_or_default().to_string();
        if !self.collections.contains_key(&coll) {
            return exception(400, "Error 1203: collection not found");
        }
        let docs = body["bindVars"]["docs"].as_array().cloned().unwrap_or_default();
        let mut inserted = Vec::new();
        let mut events = Vec::new();
        for mut doc in docs {
            self.next_key += 1;
            let key = self.next_key.to_string();
            doc["_key"] = json!(key);
            events.push(json!({ "type": "insert", "collection": coll, "key": key }));
            inserted.push(doc);
        }
        if let Some(stored) = self.collections.get_mut(&coll) {
            stored.extend(inserted.iter().cloned());
        }
        reply(201, json!({ "docs": inserted, "events": events }))
    }

    fn matching<'a>(docs: &'a [Value], query: &BTreeMap<String, String>) -> Vec<&'a Value> {
        docs.iter()
            .filter(|d| {
                query
                    .iter()
                    .filter(|(k, _)| k.as_str() != "sort" && k.as_str() != "limit")
                    .all(|(k, v)| d[k.as_str()].as_str() == Some(v.as_str()))
            })
            .collect()
    }

    fn count(&self, coll: &str, query: &BTreeMap<String, String>) -> HttpResponse {
        match self.collections.get(coll) {
            Some(docs) => reply(200, json!({ "count": Self::matching(docs, query).len() })),
            None => exception(400, "Error 2016: That collection doesn't exist"),
        }
    }

    fn list_docs(&self, coll: &str, query: &BTreeMap<String, String>) -> HttpResponse {
        let Some(docs) = self.collections.get(coll) else {
            return exception(400, "Error 2016: that collection doesn't exist");
        };
        let mut found: Vec<Value> = Self::matching(docs, query).into_iter().cloned().collect();

        if let Some(sort) = query.get("sort") {
            let (fields, order) = sort.split_once("::").unwrap_or((sort.as_str(), "ASC"));
            let field = fields.split(',').next().unwrap_or_default().to_string();
            found.sort_by(|a, b| {
                let a = a[field.as_str()].as_str().unwrap_or_default();
                let b = b[field.as_str()].as_str().unwrap_or_default();
                a.cmp(b)
            });
            if order == "DESC" {
                found.reverse();
            }
        }

        if let Some((offset, count)) = query.get("limit").and_then(|l| l.split_once(',')) {
            let offset: usize = offset.parse().unwrap_or(0);
            let count: usize = count.parse().unwrap_or(0);
            found = found.into_iter().skip(offset).take(count).collect();
        }

        if found.is_empty() {
            return exception(404, "Error 2016: No documents found");
        }
        reply(200, Value::Array(found))
    }

    fn create_doc(&mut self, coll: &str, mut doc: Value) -> HttpResponse {
        if !self.collections.contains_key(coll) {
            return exception(400, "Error 2016: that collection doesn't exist");
        }
        self.next_key += 1;
        let key = self.next_key.to_string();
        doc["_key"] = json!(key);
        if let Some(docs) = self.collections.get_mut(coll) {
            docs.push(doc.clone());
        }
        reply(
            201,
            json!({ "doc": doc, "event": { "type": "insert", "collection": coll, "key": key } }),
        )
    }

    fn find(&mut self, coll: &str, key: &str) -> Result<(usize, &mut Vec<Value>), HttpResponse> {
        let docs = self
            .collections
            .get_mut(coll)
            .ok_or_else(|| exception(400, "Error 2016: that collection doesn't exist"))?;
        let position = docs
            .iter()
            .position(|d| d["_key"] == key)
            .ok_or_else(|| exception(404, "Error 2016: We couldn't find the document you specified"))?;
        Ok((position, docs))
    }

    fn get_doc(&mut self, coll: &str, key: &str) -> HttpResponse {
        match self.find(coll, key) {
            Ok((position, docs)) => reply(200, docs[position].clone()),
            Err(response) => response,
        }
    }

    fn update_doc(&mut self, coll: &str, key: &str, patch: &Value) -> HttpResponse {
        let (position, docs) = match self.find(coll, key) {
            Ok(found) => found,
            Err(response) => return response,
        };
        if let (Some(doc), Some(fields)) = (docs[position].as_object_mut(), patch.as_object()) {
            for (k, v) in fields {
                doc.insert(k.clone(), v.clone());
            }
        }
        let doc = docs[position].clone();
        reply(
            200,
            json!({ "doc": doc, "event": { "type": "update", "collection": coll, "key": key } }),
        )
    }

    fn remove_doc(&mut self, coll: &str, key: &str) -> HttpResponse {
        let (position, docs) = match self.find(coll, key) {
            Ok(found) => found,
            Err(response) => return response,
        };
        let doc = docs.remove(position);
        reply(
            200,
            json!({ "doc": doc, "event": { "type": "remove", "collection": coll, "key": key } }),
        )
    }
}

#[async_trait::async_trait]
impl HttpTransport for StubService {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, BoxError> {
        Ok(self.handle(&request))
    }
}

/// Transport that replays canned outcomes in order and records every request
pub struct ScriptedTransport {
    outcomes: Mutex<VecDeque<Result<HttpResponse, String>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new(outcomes: Vec<Result<HttpResponse, String>>) -> Arc<Self> {
        Arc::new(Self {
            outcomes: Mutex::new(outcomes.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, BoxError> {
        self.requests.lock().unwrap().push(request);
        match self.outcomes.lock().unwrap().pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(message.into()),
            None => Err("no scripted response left".into()),
        }
    }
}
