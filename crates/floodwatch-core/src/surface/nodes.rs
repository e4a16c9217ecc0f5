// Nodes surface: the node table plus the expanded node's detail.

use floodwatch_api::ApiClient;

use crate::convert::convert_all;
use crate::error::CoreError;
use crate::model::{Node, NodeDetail, NodeId};
use crate::sync::{PollOptions, PollingController, SelectionController};
use crate::view::{NodeCounts, NodeFilter, Page, Predicate, firmware_versions, paginate};

pub(crate) async fn fetch_nodes(client: &ApiClient) -> Result<Vec<Node>, CoreError> {
    convert_all(client.list_nodes().await?)
}

pub(crate) async fn fetch_node_detail(
    client: &ApiClient,
    node_id: &NodeId,
) -> Result<NodeDetail, CoreError> {
    NodeDetail::try_from(client.get_node(node_id.as_str()).await?)
}

/// Live node table with a single expandable node.
pub struct NodesSurface {
    poller: PollingController<Vec<Node>>,
    selection: SelectionController<NodeId, NodeDetail>,
}

impl NodesSurface {
    pub fn start(client: ApiClient, options: PollOptions) -> Self {
        let list_client = client.clone();
        let poller = PollingController::start("nodes", options, move || {
            let client = list_client.clone();
            async move { fetch_nodes(&client).await }
        });
        let selection = SelectionController::new(move |node_id: NodeId| {
            let client = client.clone();
            async move { fetch_node_detail(&client, &node_id).await }
        });
        Self { poller, selection }
    }

    pub fn poller(&self) -> &PollingController<Vec<Node>> {
        &self.poller
    }

    pub fn selection(&self) -> &SelectionController<NodeId, NodeDetail> {
        &self.selection
    }

    /// Expand `node_id`, or collapse it if already expanded.
    pub fn select(&self, node_id: NodeId) -> bool {
        self.selection.select(node_id)
    }

    pub fn clear_selection(&self) {
        self.selection.clear();
    }

    /// Current nodes matching `filter`, in server order.
    pub fn filtered(&self, filter: &NodeFilter) -> Vec<Node> {
        self.poller
            .state()
            .data
            .map(|nodes| filter.apply(&nodes))
            .unwrap_or_default()
    }

    /// One page of the filtered table.
    pub fn page(&self, filter: &NodeFilter, page: usize, per_page: usize) -> Page<Node> {
        paginate(&self.filtered(filter), page, per_page)
    }

    /// Firmware versions to offer in the filter dropdown.
    pub fn firmware_options(&self) -> Vec<String> {
        self.poller
            .state()
            .data
            .map(|nodes| firmware_versions(&nodes))
            .unwrap_or_default()
    }

    pub fn counts(&self) -> NodeCounts {
        self.poller
            .state()
            .data
            .map(|nodes| NodeCounts::from_nodes(&nodes))
            .unwrap_or_default()
    }

    pub fn refresh_now(&self) {
        self.poller.refresh_now();
    }

    pub fn stop(&self) {
        self.poller.stop();
        self.selection.clear();
    }
}
