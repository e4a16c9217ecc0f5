// Node endpoints

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{NodeDetailResponse, NodeResponse};

impl ApiClient {
    /// List every node with its latest reading projected alongside.
    ///
    /// `GET /nodes`
    pub async fn list_nodes(&self) -> Result<Vec<NodeResponse>, Error> {
        let url = self.endpoint(&["nodes"])?;
        debug!("listing nodes");
        self.get(url).await
    }

    /// Fetch one node with its recent readings (newest first).
    ///
    /// `GET /nodes/{node_id}`
    pub async fn get_node(&self, node_id: &str) -> Result<NodeDetailResponse, Error> {
        let url = self.endpoint(&["nodes", node_id])?;
        debug!(node_id, "fetching node detail");
        self.get(url).await
    }
}
