//! Two-tier memoization of regression searches.
//!
//! The single-atom tier is the most reusable and is consulted first; it is
//! populated opportunistically whenever a multi-atom goal is explored. The
//! full-goal tier keys complete schemas. Entries are inserted only after a
//! search completes, so an interrupted run leaves no partial entries.

use crate::search::StateGraph;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStatistics {
    pub single_hits: u32,
    pub single_misses: u32,
    pub full_hits: u32,
    pub full_misses: u32,
}

impl CacheStatistics {
    pub fn total_hits(&self) -> u32 {
        self.single_hits + self.full_hits
    }

    pub fn total_misses(&self) -> u32 {
        self.single_misses + self.full_misses
    }

    fn rate(hits: u32, misses: u32) -> f64 {
        let total = hits + misses;
        if total == 0 {
            0.0
        } else {
            f64::from(hits) / f64::from(total)
        }
    }

    pub fn single_hit_rate(&self) -> f64 {
        Self::rate(self.single_hits, self.single_misses)
    }

    pub fn full_hit_rate(&self) -> f64 {
        Self::rate(self.full_hits, self.full_misses)
    }
}

/// The per-invocation cache. It is tied to one grounding map (the object
/// count participates in the single-atom key), so it is built fresh per DFA.
#[derive(Debug, Default)]
pub struct PlanCache {
    single_atom: HashMap<(String, usize), Rc<StateGraph>>,
    full_goal: HashMap<String, Rc<StateGraph>>,
    pub stats: CacheStatistics,
}

impl PlanCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_single(&self, schema: &str, num_objects: usize) -> Option<Rc<StateGraph>> {
        self.single_atom
            .get(&(schema.to_string(), num_objects))
            .cloned()
    }

    pub fn insert_single(&mut self, schema: String, num_objects: usize, graph: Rc<StateGraph>) {
        self.single_atom.insert((schema, num_objects), graph);
    }

    pub fn contains_single(&self, schema: &str, num_objects: usize) -> bool {
        self.single_atom
            .contains_key(&(schema.to_string(), num_objects))
    }

    pub fn get_full(&self, key: &str) -> Option<Rc<StateGraph>> {
        self.full_goal.get(key).cloned()
    }

    pub fn insert_full(&mut self, key: String, graph: Rc<StateGraph>) {
        self.full_goal.insert(key, graph);
    }

    pub fn num_single_entries(&self) -> usize {
        self.single_atom.len()
    }

    pub fn num_full_entries(&self) -> usize {
        self.full_goal.len()
    }
}
