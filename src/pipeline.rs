//! The per-DFA driver: refine labels, extract and normalize goals, run (or
//! reuse) regression searches, and emit the plan library.

use crate::automata::{Dfa, LabelRefiner, RefineMethod, RefinementStats};
use crate::emit::{CacheStatistics, PlanCache, PlanLibraryEmitter};
use crate::error::Result;
use crate::goals::{extract_goals, normalize_goal, NormalizedGoal};
use crate::grounding::GroundingMap;
use crate::search::{Atom, DomainInvariants, PlanningDomain, RegressionSearch, StateGraph};
use std::collections::BTreeSet;
use std::fmt::Write;
use std::rc::Rc;
use tracing::{debug, info};

/// Budgets and method selection for a generation run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Cap on the visited set of each regression search.
    pub max_states: usize,
    /// Symbolic object cap for the feasibility prune; defaults to the
    /// grounding map's object count.
    pub max_objects: Option<usize>,
    /// Per-label partition budget for the refiner.
    pub minterm_budget: usize,
    pub refine_method: RefineMethod,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_states: 200_000,
            max_objects: None,
            minterm_budget: 1000,
            refine_method: RefineMethod::Auto,
        }
    }
}

/// The finished library plus run metadata.
#[derive(Debug)]
pub struct GeneratedLibrary {
    pub code: String,
    /// Whether any regression search hit its state budget.
    pub truncated: bool,
    pub cache_stats: CacheStatistics,
    pub refinement: RefinementStats,
}

/// Drives the whole third stage for one DFA.
#[derive(Debug)]
pub struct PlanGenerator<'a> {
    domain: &'a PlanningDomain,
    grounding: &'a GroundingMap,
    config: PipelineConfig,
}

impl<'a> PlanGenerator<'a> {
    pub fn new(
        domain: &'a PlanningDomain,
        grounding: &'a GroundingMap,
        config: PipelineConfig,
    ) -> Self {
        Self {
            domain,
            grounding,
            config,
        }
    }

    pub fn generate(&self, dfa: &Dfa) -> Result<GeneratedLibrary> {
        let refiner = LabelRefiner::new(self.config.refine_method, self.config.minterm_budget);
        let refined = refiner.refine(dfa)?;

        let invariants = DomainInvariants::synthesize(self.domain);
        let max_objects = self
            .config
            .max_objects
            .unwrap_or_else(|| self.grounding.num_objects().max(1));
        let search = RegressionSearch::new(
            self.domain,
            &invariants,
            self.config.max_states,
            max_objects,
        );
        let num_objects = self.grounding.num_objects();

        // The cache lives for this invocation only; its entries are tied to
        // this grounding map.
        let mut cache = PlanCache::new();
        let emitter = PlanLibraryEmitter::new(self.domain, self.grounding);

        let mut truncated = false;
        let mut emitted_patterns: BTreeSet<String> = BTreeSet::new();
        let mut goal_sections: Vec<String> = Vec::new();
        let mut total_rules = 0usize;
        let mut total_states = 0usize;
        let mut total_transitions = 0usize;

        for (index, transition) in refined.dfa.transitions().iter().enumerate() {
            debug!(
                transition = index,
                source = %transition.source,
                target = %transition.target,
                label = %transition.label,
                "processing transition"
            );

            for goal in extract_goals(&transition.label, self.grounding)? {
                let normalized = normalize_goal(&goal);
                let graph =
                    self.explore_cached(&goal, &normalized, &search, &mut cache, num_objects);
                truncated |= graph.truncated();

                let key = normalized.cache_key();
                if emitted_patterns.contains(&key) {
                    continue;
                }
                emitted_patterns.insert(key);

                let (section, rules) = emitter.goal_section(&normalized, &graph);
                total_rules += rules;
                total_states += graph.num_states();
                total_transitions += graph.num_transitions();
                goal_sections.push(section);
            }
        }

        let beliefs = emitter.initial_beliefs();
        let action_rules = emitter.action_rules();
        let header = self.header(
            dfa,
            &refined.stats,
            &cache.stats,
            total_states,
            total_transitions,
            total_rules,
            truncated,
        );

        let mut code = header;
        code.push('\n');
        code.push_str(&beliefs);
        code.push('\n');
        code.push_str(&action_rules);
        for section in &goal_sections {
            code.push('\n');
            code.push_str(section);
        }

        info!(
            goals = emitted_patterns.len(),
            rules = total_rules,
            truncated,
            "generated plan library"
        );

        Ok(GeneratedLibrary {
            code,
            truncated,
            cache_stats: cache.stats,
            refinement: refined.stats,
        })
    }

    /// Two-tier lookup: the single-atom cache first, then the full-goal
    /// cache; a double miss triggers a fresh search. Completing a multi-atom
    /// search additionally explores and caches each constituent atom,
    /// renormalized standalone from its grounded form so that its key
    /// matches a later single-atom goal.
    fn explore_cached(
        &self,
        grounded: &[Atom],
        normalized: &NormalizedGoal,
        search: &RegressionSearch,
        cache: &mut PlanCache,
        num_objects: usize,
    ) -> Rc<StateGraph> {
        if normalized.atoms.len() == 1 {
            let schema = normalized.atoms[0].to_string();
            if let Some(graph) = cache.get_single(&schema, num_objects) {
                cache.stats.single_hits += 1;
                debug!(%schema, "single-atom cache hit");
                return graph;
            }
            if let Some(graph) = cache.get_full(&normalized.cache_key()) {
                cache.stats.full_hits += 1;
                return graph;
            }
            cache.stats.single_misses += 1;
            let graph = Rc::new(search.run(&normalized.atoms));
            cache.insert_single(schema, num_objects, graph.clone());
            return graph;
        }

        let key = normalized.cache_key();
        if let Some(graph) = cache.get_full(&key) {
            cache.stats.full_hits += 1;
            debug!(%key, "full-goal cache hit");
            return graph;
        }
        cache.stats.full_misses += 1;
        let graph = Rc::new(search.run(&normalized.atoms));
        cache.insert_full(key, graph.clone());

        // Opportunistic population of the single-atom tier. These do not
        // count as misses.
        for atom in grounded {
            let standalone = normalize_goal(std::slice::from_ref(atom));
            let schema = standalone.atoms[0].to_string();
            if cache.contains_single(&schema, num_objects) {
                continue;
            }
            let single = Rc::new(search.run(&standalone.atoms));
            cache.insert_single(schema, num_objects, single);
        }

        graph
    }

    #[allow(clippy::too_many_arguments)]
    fn header(
        &self,
        dfa: &Dfa,
        refinement: &RefinementStats,
        cache: &CacheStatistics,
        states: usize,
        transitions: usize,
        rules: usize,
        truncated: bool,
    ) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "/* Plan Library");
        let _ = writeln!(out, " * Generated by {} (regression-based)", env!("CARGO_PKG_NAME"));
        let _ = writeln!(out, " *");
        let _ = writeln!(out, " * Domain: {}", self.domain.name());
        let _ = writeln!(
            out,
            " * Objects: {}",
            self.grounding.objects.join(", ")
        );
        let _ = writeln!(
            out,
            " * DFA: {} states, {} transitions, {} accepting",
            dfa.states().len(),
            dfa.transitions().len(),
            dfa.accepting_states().len()
        );
        let _ = writeln!(
            out,
            " * Refinement: method={}, atoms={}, partitions={}, retained={}",
            refinement.method,
            refinement.num_atoms,
            refinement.num_partitions,
            refinement.retained_labels
        );
        let _ = writeln!(
            out,
            " * Exploration: {states} states, {transitions} transitions, {rules} rules{}",
            if truncated { " (truncated)" } else { "" }
        );
        let _ = writeln!(
            out,
            " * Cache: single-atom {}/{} hits (rate {:.2}), full-goal {}/{} hits (rate {:.2})",
            cache.single_hits,
            cache.single_hits + cache.single_misses,
            cache.single_hit_rate(),
            cache.full_hits,
            cache.full_hits + cache.full_misses,
            cache.full_hit_rate()
        );
        let _ = writeln!(out, " */");
        out
    }
}
