// Copyright @yucwang 2026

use crate::core::computation_node::ComputationNode;
use crate::core::shape::Shape;
use crate::math::constants::Vector3f;
use std::sync::Arc;

/// A value handed over by the scene description when one plugin
/// references another (e.g. a sensor's `ray_target`).
#[derive(Clone)]
pub enum SceneNode {
    Point(Vector3f),
    Shape(Arc<dyn Shape>),
    /// Any other object, kept by its XML tag, plugin type and id if it has one.
    Object { tag: String, plugin_type: String, id: Option<String> },
}

impl SceneNode {
    pub fn describe(&self) -> String {
        match self {
            SceneNode::Point(p) => format!("point ({}, {}, {})", p.x, p.y, p.z),
            SceneNode::Shape(shape) => format!("shape '{}'", shape.id()),
            SceneNode::Object { tag, plugin_type, id: None } => format!("{} of type '{}'", tag, plugin_type),
            SceneNode::Object { tag, plugin_type, id: Some(id) } => {
                format!("{} '{}' of type '{}'", tag, id, plugin_type)
            }
        }
    }
}
