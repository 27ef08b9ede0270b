//! Force-directed layout producing a renderable scene for the presentation
//! layer. The layout is a spring embedder where attraction along an edge
//! scales with its weight, so higher-scoring documents settle closer to the
//! query node. Positions depend only on the graph and the seed.

use crate::graph::{KnowledgeGraph, NodeKind};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DEFAULT_SEED: u64 = 42;

const QUERY_COLOR: &str = "#F90734";
const DOCUMENT_COLOR: &str = "#FF8800";
const EDGE_COLOR: &str = "#1609A0";

const ITERATIONS: usize = 100;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SceneNode {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SceneEdge {
    pub source: String,
    pub target: String,
    pub label: String,
    pub weight: f64,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scene {
    pub nodes: Vec<SceneNode>,
    pub edges: Vec<SceneEdge>,
}

/// Computes the scene for `graph`, or `None` when the graph has no nodes;
/// the caller should present that as "not enough data", not as an error.
pub fn render(graph: &KnowledgeGraph, seed: u64) -> Option<Scene> {
    if graph.node_count() == 0 {
        return None;
    }

    let ids: Vec<String> = graph.nodes().map(|n| n.id.clone()).collect();
    let index_of: HashMap<&str, usize> =
        ids.iter().enumerate().map(|(i, id)| (id.as_str(), i)).collect();

    let springs: Vec<(usize, usize, f64)> = graph
        .edges()
        .map(|(src, dst, data)| (index_of[src], index_of[dst], data.weight))
        .collect();

    let positions = spring_layout(ids.len(), &springs, seed);

    let nodes = graph
        .nodes()
        .zip(&positions)
        .map(|(node, &(x, y))| SceneNode {
            id: node.id.clone(),
            x,
            y,
            color: match node.kind {
                NodeKind::Query => QUERY_COLOR.to_string(),
                NodeKind::Document => DOCUMENT_COLOR.to_string(),
            },
        })
        .collect();

    let edges = graph
        .edges()
        .map(|(src, dst, data)| SceneEdge {
            source: src.to_string(),
            target: dst.to_string(),
            label: data.label(),
            weight: data.weight,
            color: EDGE_COLOR.to_string(),
        })
        .collect();

    Some(Scene { nodes, edges })
}

/// Fruchterman-Reingold style embedding on the unit square. Repulsion is
/// uniform between all node pairs; attraction acts along springs and is
/// multiplied by the spring's weight.
fn spring_layout(n: usize, springs: &[(usize, usize, f64)], seed: u64) -> Vec<(f64, f64)> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut pos: Vec<(f64, f64)> = (0..n)
        .map(|_| (rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)))
        .collect();

    if n == 1 {
        return pos;
    }

    let k = (1.0 / n as f64).sqrt();
    let mut temperature = 0.1;
    let cooling = temperature / ITERATIONS as f64;

    for _ in 0..ITERATIONS {
        let mut disp = vec![(0.0f64, 0.0f64); n];

        for i in 0..n {
            for j in (i + 1)..n {
                let dx = pos[i].0 - pos[j].0;
                let dy = pos[i].1 - pos[j].1;
                let dist = (dx * dx + dy * dy).sqrt().max(1e-6);
                let repulse = k * k / dist;
                let (ux, uy) = (dx / dist, dy / dist);
                disp[i].0 += ux * repulse;
                disp[i].1 += uy * repulse;
                disp[j].0 -= ux * repulse;
                disp[j].1 -= uy * repulse;
            }
        }

        for &(a, b, weight) in springs {
            let dx = pos[a].0 - pos[b].0;
            let dy = pos[a].1 - pos[b].1;
            let dist = (dx * dx + dy * dy).sqrt().max(1e-6);
            let attract = dist * dist / k * weight.max(1e-3);
            let (ux, uy) = (dx / dist, dy / dist);
            disp[a].0 -= ux * attract;
            disp[a].1 -= uy * attract;
            disp[b].0 += ux * attract;
            disp[b].1 += uy * attract;
        }

        for i in 0..n {
            let (dx, dy) = disp[i];
            let len = (dx * dx + dy * dy).sqrt().max(1e-6);
            let step = len.min(temperature);
            pos[i].0 += dx / len * step;
            pos[i].1 += dy / len * step;
            pos[i].0 = pos[i].0.clamp(-1.0, 1.0);
            pos[i].1 = pos[i].1.clamp(-1.0, 1.0);
        }

        temperature -= cooling;
    }

    pos
}
