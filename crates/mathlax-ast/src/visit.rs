use crate::Node;

/// Read-only traversal hook for renderers and analysis passes.
///
/// The default `visit_node` recurses into every child in reading order.
/// Override it, handle the variants of interest, and call [`walk_node`]
/// to keep descending.
pub trait Visitor {
    fn visit_node(&mut self, node: &Node, depth: usize) {
        walk_node(self, node, depth);
    }
}

/// Visit each child of `node` at `depth + 1`.
pub fn walk_node<V: Visitor + ?Sized>(visitor: &mut V, node: &Node, depth: usize) {
    for child in node.children() {
        visitor.visit_node(child, depth + 1);
    }
}
