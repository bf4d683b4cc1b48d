// Copyright @yucwang 2021

use std::sync::atomic::{AtomicU64, Ordering};

static NODE_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Fallback id for scene objects the description leaves unnamed,
/// e.g. `rectangle_3`.
pub fn generate_node_id(type_name: &str) -> String {
    let seq = NODE_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{}_{}", type_name, seq)
}

/// Anything the scene loader can instantiate and refer to by id.
pub trait ComputationNode {
    fn id(&self) -> &str;

    // Human readable summary, used in debug logs.
    fn to_string(&self) -> String {
        format!("{}[id = {}]", std::any::type_name::<Self>(), self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named(String);

    impl ComputationNode for Named {
        fn id(&self) -> &str {
            &self.0
        }
    }

    #[test]
    fn test_node_ids_are_unique() {
        let a = generate_node_id("rectangle");
        let b = generate_node_id("rectangle");
        assert!(a.starts_with("rectangle_"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_default_summary_mentions_id() {
        let node = Named(generate_node_id("disk"));
        assert!(ComputationNode::to_string(&node).contains(node.id()));
    }
}
