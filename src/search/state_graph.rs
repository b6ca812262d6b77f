//! The goal-rooted state graph produced by a regression search.

use crate::search::{Atom, RegressionState, SearchStatistics, Term};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

/// One belief update in the action's forward direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BeliefOp {
    Add(Atom),
    Remove(Atom),
}

/// An edge of the state graph: applying the named action schema with the
/// given argument tuple leads from the predecessor state to the successor.
/// Preconditions carry their sign; the delta lists add operations before
/// remove operations, matching the action's forward semantics.
#[derive(Debug, Clone)]
pub struct TransitionEdge {
    pub schema_index: usize,
    pub arguments: Vec<Term>,
    pub preconditions: Vec<Atom>,
    pub delta: Vec<BeliefOp>,
}

/// A directed multigraph of regression states rooted at the goal. Nodes are
/// created on discovery and never mutated; edges point from predecessor to
/// successor and are appended monotonically. Node and edge insertion order is
/// the deterministic iteration order consumed by the emitter.
#[derive(Debug)]
pub struct StateGraph {
    graph: DiGraph<RegressionState, TransitionEdge>,
    root: NodeIndex,
    truncated: bool,
    goal_unreachable: bool,
    statistics: SearchStatistics,
}

impl StateGraph {
    pub(crate) fn new(root_state: RegressionState) -> Self {
        let mut graph = DiGraph::new();
        let root = graph.add_node(root_state);
        Self {
            graph,
            root,
            truncated: false,
            goal_unreachable: false,
            statistics: SearchStatistics::default(),
        }
    }

    pub(crate) fn add_state(&mut self, state: RegressionState) -> NodeIndex {
        self.graph.add_node(state)
    }

    pub(crate) fn add_transition(
        &mut self,
        predecessor: NodeIndex,
        successor: NodeIndex,
        edge: TransitionEdge,
    ) {
        self.graph.add_edge(predecessor, successor, edge);
    }

    pub(crate) fn set_truncated(&mut self) {
        self.truncated = true;
    }

    pub(crate) fn set_goal_unreachable(&mut self) {
        self.goal_unreachable = true;
    }

    pub(crate) fn statistics_mut(&mut self) -> &mut SearchStatistics {
        &mut self.statistics
    }

    #[inline(always)]
    pub fn root(&self) -> NodeIndex {
        self.root
    }

    pub fn root_state(&self) -> &RegressionState {
        &self.graph[self.root]
    }

    pub fn state(&self, index: NodeIndex) -> &RegressionState {
        &self.graph[index]
    }

    pub fn num_states(&self) -> usize {
        self.graph.node_count()
    }

    pub fn num_transitions(&self) -> usize {
        self.graph.edge_count()
    }

    /// Whether the search hit its `max_states` budget.
    pub fn truncated(&self) -> bool {
        self.truncated
    }

    /// Whether the goal itself violated a synthesized invariant, leaving a
    /// single-node graph.
    pub fn goal_unreachable(&self) -> bool {
        self.goal_unreachable
    }

    pub fn statistics(&self) -> &SearchStatistics {
        &self.statistics
    }

    /// States in discovery order.
    pub fn states(&self) -> impl Iterator<Item = (NodeIndex, &RegressionState)> {
        self.graph
            .node_indices()
            .map(move |index| (index, &self.graph[index]))
    }

    /// Every `(predecessor, edge, successor)` triple, ordered by predecessor
    /// discovery order and then by edge insertion order. This is the rule
    /// emission order.
    pub fn transitions_in_emission_order(
        &self,
    ) -> Vec<(NodeIndex, &TransitionEdge, NodeIndex)> {
        let mut triples: Vec<_> = self
            .graph
            .edge_references()
            .map(|edge| (edge.source(), edge.id(), edge.target()))
            .collect();
        triples.sort_by_key(|(source, id, _)| (source.index(), id.index()));
        triples
            .into_iter()
            .map(|(source, id, target)| (source, &self.graph[id], target))
            .collect()
    }
}
