use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// A workflow in the shape the n8n create endpoint accepts.
///
/// Definitions are built once and submitted verbatim; nothing mutates them
/// after construction.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WorkflowDefinition {
    pub name: String,
    pub active: bool,
    pub nodes: Vec<Node>,
    /// Source node name -> outgoing connections
    pub connections: BTreeMap<String, NodeConnections>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub parameters: Value,
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub type_version: u32,
    pub position: [i32; 2],
}

/// Outgoing connections of one node. `main[i]` lists the targets of output port `i`.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct NodeConnections {
    pub main: Vec<Vec<ConnectionTarget>>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ConnectionTarget {
    pub node: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub index: u32,
}

impl Node {
    /// A node from the `n8n-nodes-base` package, e.g. `Node::base("Wait", "wait", [650, 300])`
    pub fn base(name: &str, kind: &str, position: [i32; 2]) -> Self {
        Self {
            parameters: Value::Object(Default::default()),
            name: name.to_string(),
            node_type: format!("n8n-nodes-base.{kind}"),
            type_version: 1,
            position,
        }
    }

    pub fn with_parameters(mut self, parameters: Value) -> Self {
        self.parameters = parameters;
        self
    }
}

impl WorkflowDefinition {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            active: true,
            nodes: Vec::new(),
            connections: BTreeMap::new(),
        }
    }

    pub fn node(mut self, node: Node) -> Self {
        self.nodes.push(node);
        self
    }

    /// Wire output port `output` of `from` into the first input of `to`
    pub fn connect(mut self, from: &str, output: usize, to: &str) -> Self {
        let ports = &mut self.connections.entry(from.to_string()).or_default().main;
        if ports.len() <= output {
            ports.resize_with(output + 1, Vec::new);
        }
        ports[output].push(ConnectionTarget {
            node: to.to_string(),
            kind: "main".to_string(),
            index: 0,
        });
        self
    }

    pub fn find_node(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.name == name)
    }

    /// Connections whose source or target is not a node of this workflow
    pub fn dangling_connections(&self) -> Vec<(String, String)> {
        self.connections
            .iter()
            .flat_map(|(from, outgoing)| {
                outgoing
                    .main
                    .iter()
                    .flatten()
                    .map(move |target| (from.clone(), target.node.clone()))
            })
            .filter(|(from, to)| self.find_node(from).is_none() || self.find_node(to).is_none())
            .collect()
    }
}
