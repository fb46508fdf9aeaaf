// Domain layer: entities, graph types and ports (interfaces). No sampling here.

pub mod graph;
pub mod matrix;
pub mod model;
pub mod node;
pub mod ports;
