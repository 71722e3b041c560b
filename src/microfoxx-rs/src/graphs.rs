use microfoxx_core::{CreationResult, Graph, Relation};

use crate::client::Client;
use crate::collections::{decode_creation, with_creation_message};
use crate::transport::Method;

const GRAPH_PATH: &str = "/graph";

impl Client {
    /// Create a graph together with every relation it defines
    pub async fn create_graph(&self, graph: &Graph) -> CreationResult {
        let result = self
            .dispatcher()
            .round_trip_json(Method::POST, GRAPH_PATH, graph, &[200, 201], decode_creation)
            .await;
        with_creation_message(result)
    }

    /// Add a relation to an existing graph
    pub async fn create_relation(&self, graph: &str, relation: &Relation) -> CreationResult {
        let path = format!("{}/{}/relation", GRAPH_PATH, graph);
        let result = self
            .dispatcher()
            .round_trip_json(Method::POST, &path, relation, &[200, 201], decode_creation)
            .await;
        with_creation_message(result)
    }
}
