//! Per-network port assignments.
//!
//! Several networks can run side by side on one host, so every network gets
//! its own block of ports, offset by its position in [`NetworkName::ALL`].

use super::NetworkName;

const NODE_METRICS_BASE: u16 = 7731;
const RPC_OFFSET: u16 = 100;
const P2P_OFFSET: u16 = 100;
const DAL_OFFSET: u16 = 4000;

/// Ports for one network's node and DAL node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortPlan {
    pub node_metrics: u16,
    pub node_rpc: u16,
    pub node_p2p: u16,
    pub dal_metrics: u16,
    pub dal_rpc: u16,
    pub dal_p2p: u16,
}

impl PortPlan {
    /// Ports for the given network.
    pub fn for_network(network: NetworkName) -> Self {
        let node_metrics = NODE_METRICS_BASE + network.ordinal();
        let node_rpc = node_metrics + RPC_OFFSET;
        let node_p2p = node_rpc + P2P_OFFSET;
        let dal_metrics = node_metrics + DAL_OFFSET;
        let dal_rpc = dal_metrics + RPC_OFFSET;
        let dal_p2p = dal_rpc + P2P_OFFSET;
        Self {
            node_metrics,
            node_rpc,
            node_p2p,
            dal_metrics,
            dal_rpc,
            dal_p2p,
        }
    }

    /// Local RPC endpoint of the node.
    pub fn node_endpoint(&self) -> String {
        format!("http://127.0.0.1:{}", self.node_rpc)
    }

    /// Settings merged into the node's `config.json`.
    pub fn node_config(&self) -> serde_json::Value {
        serde_json::json!({
            "metrics_addr": [format!("0.0.0.0:{}", self.node_metrics)],
            "p2p": { "listen-addr": format!("0.0.0.0:{}", self.node_p2p) },
            "rpc": { "listen-addr": format!("127.0.0.1:{}", self.node_rpc) },
        })
    }

    /// Command-line arguments for `octez-dal-node run`.
    pub fn dal_args(&self) -> Vec<String> {
        vec![
            "--endpoint".to_string(),
            self.node_endpoint(),
            "--public-addr".to_string(),
            format!("0.0.0.0:{}", self.dal_p2p),
            "--net-addr".to_string(),
            format!("0.0.0.0:{}", self.dal_p2p),
            "--rpc-addr".to_string(),
            format!("127.0.0.1:{}", self.dal_rpc),
            "--metrics-addr".to_string(),
            format!("0.0.0.0:{}", self.dal_metrics),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_network_ports() {
        let plan = PortPlan::for_network(NetworkName::Dailynet);
        assert_eq!(plan.node_metrics, 7732);
        assert_eq!(plan.node_rpc, 7832);
        assert_eq!(plan.node_p2p, 7932);
        assert_eq!(plan.dal_metrics, 11732);
        assert_eq!(plan.dal_rpc, 11832);
        assert_eq!(plan.dal_p2p, 11932);
    }

    #[test]
    fn networks_never_share_ports() {
        let plans: Vec<_> = NetworkName::ALL
            .iter()
            .map(|n| PortPlan::for_network(*n))
            .collect();
        for (i, a) in plans.iter().enumerate() {
            for b in &plans[i + 1..] {
                assert_ne!(a.node_rpc, b.node_rpc);
                assert_ne!(a.dal_p2p, b.dal_p2p);
            }
        }
    }

    #[test]
    fn node_config_uses_local_rpc() {
        let plan = PortPlan::for_network(NetworkName::Ghostnet);
        let config = plan.node_config();
        assert_eq!(config["rpc"]["listen-addr"], "127.0.0.1:7833");
    }
}
