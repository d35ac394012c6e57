//! Graph Projection - Tree to Positioned Node/Edge Conversion
//!
//! This module converts a [`TreeModel`] (or a single subtree) into the flat
//! `nodes` + `edges` arrays the renderer draws, assigning deterministic 2D
//! coordinates level by level, and recomputes X coordinates incrementally
//! when the visible node set changes.
//!
//! # Coordinate scheme
//!
//! - `y` is a pure function of depth: `level * VERTICAL_SPACING`
//! - a root sits at `canvas_width / 2`
//! - siblings fan out symmetrically around their parent's X: with an odd
//!   count the middle child sits exactly under the parent; with an even
//!   count every child is shifted half a slot so none does
//!
//! # Id assignment
//!
//! Graph ids are dense, 0-based, and assigned in pre-order, so a node's id
//! always equals its index in the node array. Edges are appended in the same
//! pre-order, each one before its target node's subtree is descended.
//!
//! # Duplicate guard
//!
//! Inserting a node whose `(name, y)` already exists in the output is
//! treated as an accidental re-insertion of the same subtree: the node, its
//! incoming edge, and its entire subtree are suppressed (with a warning).
//! The guard runs before anything is appended, so the output never holds an
//! edge to a node that was not materialized.

use crate::models::{TreeModel, TreeNode, MAX_TREE_DEPTH};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Vertical distance between tree levels, in canvas units.
pub const VERTICAL_SPACING: f64 = 100.0;

/// Horizontal distance between sibling slots, in canvas units.
pub const HORIZONTAL_SPACING: f64 = 200.0;

/// Canvas width assumed when none is configured.
pub const DEFAULT_CANVAS_WIDTH: f64 = 1920.0;

/// Positioned render node.
///
/// `id` is the build-order id (== index in [`GraphData::nodes`]), not the
/// persisted row id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub id: usize,
    pub name: String,
    pub x: f64,
    pub y: f64,
}

/// Parent→child edge between two graph node ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
    pub source: usize,
    pub target: usize,
}

/// Flat node/edge arrays consumed by the renderer.
///
/// Rebuilt wholesale whenever the tree changes; published by reference swap
/// and never mutated in place while a previous version might be read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphData {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl GraphData {
    /// Graph ids of the root-level nodes (`y == 0`), in build order.
    pub fn root_ids(&self) -> Vec<usize> {
        self.nodes
            .iter()
            .filter(|node| node.y == 0.0)
            .map(|node| node.id)
            .collect()
    }

    /// Parent graph id of `id`, following the edge whose target is `id`.
    pub fn parent_of(&self, id: usize) -> Option<usize> {
        self.edges
            .iter()
            .find(|edge| edge.target == id)
            .map(|edge| edge.source)
    }
}

/// Converts trees into [`GraphData`] and recomputes X coordinates.
///
/// Holds only the canvas width; each projection builds fresh output arrays.
#[derive(Debug, Clone, Copy)]
pub struct GraphProjection {
    canvas_width: f64,
}

impl Default for GraphProjection {
    fn default() -> Self {
        Self::new(DEFAULT_CANVAS_WIDTH)
    }
}

impl GraphProjection {
    /// Create a projection for the given canvas width.
    pub fn new(canvas_width: f64) -> Self {
        Self { canvas_width }
    }

    pub fn canvas_width(&self) -> f64 {
        self.canvas_width
    }

    /// Project every root subtree of `model` into one graph.
    ///
    /// Each root is centered at `canvas_width / 2`; the paging view renders
    /// one root subtree at a time, so roots sharing an X is intended.
    pub fn project(&self, model: &TreeModel) -> GraphData {
        let mut data = GraphData::default();
        for root in model.roots() {
            self.insert_subtree(&mut data, root, None, 0, self.canvas_width / 2.0);
        }
        data
    }

    /// Project a single subtree, centered at `canvas_width / 2`.
    pub fn project_subtree(&self, root: &TreeNode) -> GraphData {
        let mut data = GraphData::default();
        self.insert_subtree(&mut data, root, None, 0, self.canvas_width / 2.0);
        data
    }

    fn insert_subtree(
        &self,
        data: &mut GraphData,
        node: &TreeNode,
        parent_graph_id: Option<usize>,
        level: usize,
        x: f64,
    ) {
        if level > MAX_TREE_DEPTH {
            tracing::warn!(name = %node.name, level, "subtree beyond depth bound skipped");
            return;
        }

        let y = level as f64 * VERTICAL_SPACING;

        // Duplicate guard: same (name, y) means the subtree was already
        // materialized once. Suppress node, edge, and subtree together.
        if data.nodes.iter().any(|n| n.name == node.name && n.y == y) {
            tracing::warn!(name = %node.name, y, "duplicate (name, level) subtree skipped");
            return;
        }

        let id = data.nodes.len();
        if let Some(parent_id) = parent_graph_id {
            data.edges.push(GraphEdge {
                source: parent_id,
                target: id,
            });
        }
        data.nodes.push(GraphNode {
            id,
            name: node.name.clone(),
            x,
            y,
        });

        let count = node.children.len();
        for (index, child) in node.children.iter().enumerate() {
            let child_x = fan_out_x(x, index, count);
            self.insert_subtree(data, child, Some(id), level + 1, child_x);
        }
    }

    /// Reassign X coordinates for the nodes in `visible`.
    ///
    /// For each node: find its parent through the edge list, collect the
    /// visible nodes sharing its `y` level, locate the node among them, and
    /// reapply the fan-out formula around the parent's X. Nodes are visited
    /// in ascending graph id (pre-order), so a parent's X is already
    /// updated when its children are recomputed.
    ///
    /// A node is left untouched when its parent is outside `visible` or
    /// when the node itself is not in the visible level.
    pub fn recalculate_positions(&self, data: &mut GraphData, visible: &HashSet<usize>) {
        for index in 0..data.nodes.len() {
            let node_id = data.nodes[index].id;
            let center_x = match data.parent_of(node_id) {
                Some(parent_id) => {
                    if !visible.contains(&parent_id) {
                        continue;
                    }
                    data.nodes[parent_id].x
                }
                None => self.canvas_width / 2.0,
            };

            let y = data.nodes[index].y;
            let level_ids: Vec<usize> = data
                .nodes
                .iter()
                .filter(|n| n.y == y && visible.contains(&n.id))
                .map(|n| n.id)
                .collect();
            let Some(slot) = level_ids.iter().position(|&id| id == node_id) else {
                continue;
            };

            data.nodes[index].x = fan_out_x(center_x, slot, level_ids.len());
        }
    }
}

/// Symmetric fan-out placement for sibling slot `index` of `count`.
///
/// With an odd `count` the middle slot lands exactly on `center_x`; with an
/// even `count` every slot is shifted by half a spacing so none does.
pub fn fan_out_x(center_x: f64, index: usize, count: usize) -> f64 {
    let mid = count / 2;
    if count % 2 == 1 && index == mid {
        return center_x;
    }
    let offset = (index as f64 - mid as f64) * HORIZONTAL_SPACING;
    let even_shift = if count % 2 == 0 {
        HORIZONTAL_SPACING / 2.0
    } else {
        0.0
    };
    center_x + offset + even_shift
}
