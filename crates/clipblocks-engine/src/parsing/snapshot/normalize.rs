use serde::Serialize;

use crate::ast::AstNode;

#[derive(Debug, Serialize)]
pub struct Snap {
    pub nodes: Vec<NodeSnap>,
}

/// One node in document order; `depth` replaces the tree shape.
#[derive(Debug, Serialize)]
pub struct NodeSnap {
    pub depth: usize,
    pub kind: String,
    pub text: String,
}

pub fn normalize(nodes: &[AstNode]) -> Snap {
    let mut out = Vec::new();
    flatten(nodes, 0, &mut out);
    Snap { nodes: out }
}

fn flatten(nodes: &[AstNode], depth: usize, out: &mut Vec<NodeSnap>) {
    for node in nodes {
        out.push(NodeSnap {
            depth,
            kind: node.type_name().to_string(),
            text: node.content.replace('\n', " / "),
        });
        flatten(&node.children, depth + 1, out);
    }
}
