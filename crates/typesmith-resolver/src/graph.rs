//! # Schema Dependency Graph
//!
//! This module turns a flat collection of decoded schema nodes into a
//! validated dependency graph over the types that must be synthesized.
//!
//! ## Purpose
//!
//! The graph drives the three phases of a resolution run:
//! - **Partition**: classify every supplied node as known or unknown
//!   through the availability oracle
//! - **Resolution**: build `needs` edges between unknown nodes and reject
//!   references that resolve nowhere
//! - **Validation**: reject cycles, conflicting field redefinitions, and
//!   unsatisfied interfaces, then emit a dependency-ordered build plan
//!
//! ## Key Components
//!
//! | Type | Description |
//! |------|-------------|
//! | [`SchemaGraph`] | Partitioned node set with `needs` edges |
//! | [`Origin`] | Known/unknown classification of a supplied node |
//!
//! ## Architecture
//!
//! ```text
//! Vec<SchemaNode> ──► SchemaGraph::build ──► validate ──► into_plan
//!                          │ lookups                        │
//!                          ▼                                ▼
//!                     TypeProvider                      BuildPlan
//! ```
//!
//! A run is synchronous and owns all its working data; nothing is shared
//! or retained once a plan (or error) is returned.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use indexmap::{IndexMap, IndexSet};
use tracing::{debug, trace};
use typesmith_schema::SchemaNode;

use crate::error::ResolveError;
use crate::plan::{BuildPlan, BuildStep};
use crate::provider::{KnownType, LookupResult, TypeProvider};

/// How the availability oracle classified a supplied node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Natively available; the materializer can use the existing definition.
    Known,
    /// Absent locally; must go through the build plan.
    Unknown,
}

/// Memoized view of the availability oracle. Each name is looked up at
/// most once per run, which also pins the oracle's answer for that run.
#[derive(Default)]
struct OracleCache {
    known: IndexMap<String, KnownType>,
    unknown: IndexSet<String>,
}

impl OracleCache {
    fn is_known<P: TypeProvider>(
        &mut self,
        provider: &P,
        name: &str,
    ) -> Result<bool, ResolveError> {
        if self.known.contains_key(name) {
            return Ok(true);
        }
        if self.unknown.contains(name) {
            return Ok(false);
        }
        match provider.lookup(name) {
            Ok(LookupResult::Known(shape)) => {
                self.known.insert(name.to_string(), shape);
                Ok(true)
            }
            Ok(LookupResult::Unknown) => {
                self.unknown.insert(name.to_string());
                Ok(false)
            }
            Err(source) => Err(ResolveError::Oracle {
                type_name: name.to_string(),
                source,
            }),
        }
    }
}

/// Pre-computed validation artifacts handed from `check` to `into_plan`.
struct Validated {
    layouts: IndexMap<String, IndexMap<String, String>>,
    order: Vec<String>,
}

/// Dependency graph over one resolution run's node set.
///
/// Built by [`SchemaGraph::build`], which performs the availability
/// partition and reference resolution. [`SchemaGraph::validate`] checks the
/// graph without consuming it; [`SchemaGraph::into_plan`] validates and
/// emits the ordered build plan.
#[derive(Debug)]
pub struct SchemaGraph {
    /// Every supplied node in discovery order, with its classification.
    nodes: IndexMap<String, (SchemaNode, Origin)>,
    /// Oracle-reported shapes, closed over their superclass chains.
    known: IndexMap<String, KnownType>,
    /// Unknown-to-unknown dependency edges, keyed by dependent.
    needs: IndexMap<String, IndexSet<String>>,
}

impl SchemaGraph {
    /// Partition the supplied nodes and resolve every reference.
    ///
    /// Fails on duplicate names, references that resolve to neither a
    /// known type nor a supplied node, declaration-shape violations, and
    /// oracle lookup failures. Cycles and field conflicts are left to
    /// [`validate`](Self::validate).
    pub fn build<P: TypeProvider>(
        supplied: Vec<SchemaNode>,
        provider: &P,
    ) -> Result<SchemaGraph, ResolveError> {
        // Ingest in discovery order; names are unique per run.
        let mut nodes: IndexMap<String, (SchemaNode, Origin)> =
            IndexMap::with_capacity(supplied.len());
        for node in supplied {
            let name = node.name().to_string();
            if nodes.contains_key(&name) {
                return Err(ResolveError::DuplicateType(name));
            }
            nodes.insert(name, (node, Origin::Unknown));
        }

        let mut oracle = OracleCache::default();

        // Classify every supplied name.
        for (name, entry) in nodes.iter_mut() {
            entry.1 = if oracle.is_known(provider, name)? {
                Origin::Known
            } else {
                Origin::Unknown
            };
        }

        let unknown_names: Vec<String> = nodes
            .iter()
            .filter(|(_, (_, origin))| *origin == Origin::Unknown)
            .map(|(name, _)| name.clone())
            .collect();

        debug!(
            known = nodes.len() - unknown_names.len(),
            unknown = unknown_names.len(),
            "partitioned supplied nodes"
        );

        // Resolve references of every unknown node. Known referents
        // contribute no edge; unresolvable referents are terminal.
        let mut needs: IndexMap<String, IndexSet<String>> =
            IndexMap::with_capacity(unknown_names.len());
        for name in &unknown_names {
            let (node, _) = &nodes[name];
            let mut deps: IndexSet<String> = IndexSet::new();

            if let Some(parent) = node.superclass() {
                if oracle.is_known(provider, parent)? {
                    let parent_is_interface = oracle
                        .known
                        .get(parent)
                        .map(|shape| shape.is_interface)
                        .unwrap_or(false);
                    check_superclass_shape(node, parent, parent_is_interface)?;
                } else if let Some((parent_node, _)) = nodes.get(parent) {
                    check_superclass_shape(node, parent, parent_node.is_interface())?;
                    deps.insert(parent.to_string());
                } else {
                    return Err(ResolveError::MissingDependency(parent.to_string()));
                }
            }

            for interface in node.interfaces() {
                if oracle.is_known(provider, interface)? {
                    let is_interface = oracle
                        .known
                        .get(interface)
                        .map(|shape| shape.is_interface)
                        .unwrap_or(false);
                    if !is_interface {
                        return Err(ResolveError::InvalidDeclaration {
                            type_name: name.clone(),
                            reason: format!("declared interface {} is not an interface", interface),
                        });
                    }
                } else if let Some((target, _)) = nodes.get(interface) {
                    if !target.is_interface() {
                        return Err(ResolveError::InvalidDeclaration {
                            type_name: name.clone(),
                            reason: format!("declared interface {} is not an interface", interface),
                        });
                    }
                    deps.insert(interface.clone());
                } else {
                    return Err(ResolveError::MissingDependency(interface.clone()));
                }
            }

            for type_ref in node.fields().values() {
                let target = match type_ref.named() {
                    Some(target) => target,
                    // Primitive fields never contribute edges
                    None => continue,
                };
                if oracle.is_known(provider, target)? {
                    // A known field type is recorded by descriptor only;
                    // its internal structure is irrelevant to this run.
                    continue;
                }
                if nodes.contains_key(target) {
                    deps.insert(target.to_string());
                } else {
                    return Err(ResolveError::MissingDependency(target.to_string()));
                }
            }

            trace!(node = %name, deps = deps.len(), "resolved references");
            needs.insert(name.clone(), deps);
        }

        // Close known shapes over their superclass chains so field merging
        // never consults the oracle again. A known type's superclass must
        // itself be known.
        let mut index = 0;
        while index < oracle.known.len() {
            let parent = oracle
                .known
                .get_index(index)
                .and_then(|(_, shape)| shape.superclass.clone());
            index += 1;
            if let Some(parent) = parent {
                if !oracle.is_known(provider, &parent)? {
                    return Err(ResolveError::MissingDependency(parent));
                }
            }
        }

        Ok(SchemaGraph {
            nodes,
            known: oracle.known,
            needs,
        })
    }

    /// Availability classification of a supplied node.
    pub fn origin(&self, name: &str) -> Option<Origin> {
        self.nodes.get(name).map(|(_, origin)| *origin)
    }

    /// Unknown dependencies of an unknown supplied node.
    pub fn needs_of(&self, name: &str) -> Option<&IndexSet<String>> {
        self.needs.get(name)
    }

    /// Supplied nodes with their classification, in discovery order.
    pub fn nodes(&self) -> impl Iterator<Item = (&SchemaNode, Origin)> + '_ {
        self.nodes.values().map(|(node, origin)| (node, *origin))
    }

    /// Number of supplied nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if no nodes were supplied.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of unknown supplied nodes (the plan's length on success).
    pub fn unknown_count(&self) -> usize {
        self.needs.len()
    }

    /// Check the graph for cycles, field conflicts, and unsatisfied
    /// interfaces without consuming it.
    pub fn validate(&self) -> Result<(), ResolveError> {
        self.check().map(|_| ())
    }

    /// Validate and emit the dependency-ordered build plan.
    ///
    /// Dependencies strictly precede dependents; ties among independent
    /// nodes break by discovery order, so equal inputs yield equal plans.
    /// Known nodes never appear in the plan.
    pub fn into_plan(self) -> Result<BuildPlan, ResolveError> {
        let Validated { mut layouts, order } = self.check()?;

        let mut nodes = self.nodes;
        let mut steps = Vec::with_capacity(order.len());
        for name in &order {
            let node = match nodes.swap_remove(name) {
                Some((node, _)) => node,
                None => continue,
            };
            let layout = layouts.swap_remove(name).unwrap_or_default();
            steps.push(BuildStep { node, layout });
        }

        debug!(steps = steps.len(), "emitted build plan");
        Ok(BuildPlan::from_steps(steps))
    }

    /// Full validation pass: cycle detection first (field merging walks
    /// superclass chains and must not loop), then merged layouts, then
    /// interface contracts and satisfaction.
    fn check(&self) -> Result<Validated, ResolveError> {
        if let Some(cycle) = self.find_cycle() {
            return Err(ResolveError::CyclicDependency { cycle });
        }

        let mut layouts: IndexMap<String, IndexMap<String, String>> =
            IndexMap::with_capacity(self.needs.len());
        for name in self.needs.keys() {
            let layout = self.merged_layout(name)?;
            layouts.insert(name.clone(), layout);
        }

        let order = self.topo_order();

        // Interface contracts in dependency order, so an extended
        // interface's contract is already folded when its extenders are
        // reached, whether the extension uses the superclass slot or the
        // interface list. Known ancestors impose no obligation and have no
        // contract entry.
        let mut contracts: IndexMap<String, IndexMap<String, String>> = IndexMap::new();
        for name in &order {
            let node = match self.nodes.get(name) {
                Some((node, _)) => node,
                None => continue,
            };
            if !node.is_interface() {
                continue;
            }
            let mut contract = match layouts.get(name) {
                Some(layout) => layout.clone(),
                None => IndexMap::new(),
            };
            if let Some(parent) = node.superclass() {
                if let Some(inherited) = contracts.get(parent) {
                    fold_contract(name, &mut contract, inherited)?;
                }
            }
            for extended in node.interfaces() {
                if let Some(inherited) = contracts.get(extended) {
                    fold_contract(name, &mut contract, inherited)?;
                }
            }
            contracts.insert(name.clone(), contract);
        }

        // Every class must structurally provide the accessors its unknown
        // interfaces require.
        for name in self.needs.keys() {
            let node = match self.nodes.get(name) {
                Some((node, _)) => node,
                None => continue,
            };
            if node.is_interface() {
                continue;
            }

            let mut required: IndexMap<String, (String, String)> = IndexMap::new();
            for interface in node.interfaces() {
                if let Some(contract) = contracts.get(interface) {
                    for (field, descriptor) in contract {
                        if let Some((existing, _)) = required.get(field) {
                            if existing != descriptor {
                                return Err(ResolveError::FieldConflict {
                                    type_name: name.clone(),
                                    field: field.clone(),
                                    first: existing.clone(),
                                    second: descriptor.clone(),
                                });
                            }
                        } else {
                            required
                                .insert(field.clone(), (descriptor.clone(), interface.clone()));
                        }
                    }
                }
            }

            if required.is_empty() {
                continue;
            }
            let layout = match layouts.get(name) {
                Some(layout) => layout,
                None => continue,
            };
            for (field, (descriptor, source)) in &required {
                match layout.get(field) {
                    Some(actual) if actual == descriptor => {}
                    _ => {
                        return Err(ResolveError::InterfaceViolation {
                            type_name: name.clone(),
                            interface: source.clone(),
                            field: field.clone(),
                        });
                    }
                }
            }
        }

        Ok(Validated { layouts, order })
    }

    /// Depth-first back-edge search, iterative so adversarial chains cannot
    /// overflow the call stack. Returns the cycle path with the entry node
    /// repeated at the end.
    fn find_cycle(&self) -> Option<Vec<String>> {
        #[derive(Clone, Copy, PartialEq)]
        enum Color {
            White,
            Gray,
            Black,
        }

        let mut colors: IndexMap<&str, Color> = self
            .needs
            .keys()
            .map(|name| (name.as_str(), Color::White))
            .collect();

        for root in self.needs.keys() {
            if colors.get(root.as_str()) != Some(&Color::White) {
                continue;
            }
            let mut stack: Vec<(&str, usize)> = vec![(root.as_str(), 0)];
            colors.insert(root.as_str(), Color::Gray);

            while let Some(&(current, next_index)) = stack.last() {
                let deps = match self.needs.get(current) {
                    Some(deps) => deps,
                    None => {
                        stack.pop();
                        continue;
                    }
                };
                match deps.get_index(next_index) {
                    None => {
                        colors.insert(current, Color::Black);
                        stack.pop();
                    }
                    Some(dep) => {
                        if let Some(frame) = stack.last_mut() {
                            frame.1 += 1;
                        }
                        match colors.get(dep.as_str()).copied() {
                            Some(Color::White) => {
                                colors.insert(dep.as_str(), Color::Gray);
                                stack.push((dep.as_str(), 0));
                            }
                            Some(Color::Gray) => {
                                let start = stack
                                    .iter()
                                    .position(|(name, _)| *name == dep.as_str())
                                    .unwrap_or(0);
                                let mut cycle: Vec<String> = stack[start..]
                                    .iter()
                                    .map(|(name, _)| (*name).to_string())
                                    .collect();
                                cycle.push(dep.as_str().to_string());
                                return Some(cycle);
                            }
                            _ => {}
                        }
                    }
                }
            }
        }
        None
    }

    /// Field table including every ancestor, root-most first. On a name
    /// collision the value comes from the more derived level but the field
    /// keeps the least derived position; differing descriptors for the
    /// same name are a conflict.
    fn merged_layout(&self, name: &str) -> Result<IndexMap<String, String>, ResolveError> {
        // Collect the chain leaf-to-root. The visited guard catches
        // superclass cycles that run through native types, which the DFS
        // over unknown nodes cannot see.
        let mut chain: Vec<&IndexMap<String, String>> = Vec::new();
        let mut visited: IndexSet<&str> = IndexSet::new();
        let mut current: Option<&str> = Some(name);

        while let Some(level) = current {
            if !visited.insert(level) {
                let start = visited.get_index_of(level).unwrap_or(0);
                let mut cycle: Vec<String> =
                    visited.iter().skip(start).map(|n| (*n).to_string()).collect();
                cycle.push(level.to_string());
                return Err(ResolveError::CyclicDependency { cycle });
            }
            if let Some(shape) = self.known.get(level) {
                chain.push(&shape.fields);
                current = shape.superclass.as_deref();
            } else if let Some((node, _)) = self.nodes.get(level) {
                chain.push(node.descriptors());
                current = node.superclass();
            } else {
                return Err(ResolveError::MissingDependency(level.to_string()));
            }
        }

        let mut layout: IndexMap<String, String> = IndexMap::new();
        for fields in chain.iter().rev() {
            for (field, descriptor) in *fields {
                if let Some(existing) = layout.get(field) {
                    if existing != descriptor {
                        return Err(ResolveError::FieldConflict {
                            type_name: name.to_string(),
                            field: field.clone(),
                            first: existing.clone(),
                            second: descriptor.clone(),
                        });
                    }
                }
                layout.insert(field.clone(), descriptor.clone());
            }
        }
        Ok(layout)
    }

    /// Kahn's algorithm with ties broken by discovery index. The graph is
    /// cycle-checked before this runs, so every node gets emitted.
    fn topo_order(&self) -> Vec<String> {
        let mut indegree: IndexMap<&str, usize> = IndexMap::with_capacity(self.needs.len());
        let mut dependents: IndexMap<&str, Vec<&str>> = IndexMap::new();
        for (name, deps) in &self.needs {
            indegree.insert(name.as_str(), deps.len());
            for dep in deps {
                dependents.entry(dep.as_str()).or_default().push(name.as_str());
            }
        }

        let mut ready: BinaryHeap<Reverse<usize>> = BinaryHeap::new();
        for (index, (_, degree)) in indegree.iter().enumerate() {
            if *degree == 0 {
                ready.push(Reverse(index));
            }
        }

        let mut order: Vec<String> = Vec::with_capacity(self.needs.len());
        while let Some(Reverse(index)) = ready.pop() {
            let name = match self.needs.get_index(index) {
                Some((name, _)) => name.as_str(),
                None => continue,
            };
            order.push(name.to_string());
            if let Some(users) = dependents.get(name) {
                for user in users {
                    if let Some(degree) = indegree.get_mut(*user) {
                        *degree -= 1;
                        if *degree == 0 {
                            if let Some(user_index) = self.needs.get_index_of(*user) {
                                ready.push(Reverse(user_index));
                            }
                        }
                    }
                }
            }
        }

        debug_assert_eq!(order.len(), self.needs.len());
        order
    }
}

/// Fold an inherited contract into an interface's own contract table. The
/// same field with a different descriptor is a conflict; identical entries
/// keep their earliest position.
fn fold_contract(
    type_name: &str,
    contract: &mut IndexMap<String, String>,
    inherited: &IndexMap<String, String>,
) -> Result<(), ResolveError> {
    for (field, descriptor) in inherited {
        if let Some(existing) = contract.get(field) {
            if existing != descriptor {
                return Err(ResolveError::FieldConflict {
                    type_name: type_name.to_string(),
                    field: field.clone(),
                    first: existing.clone(),
                    second: descriptor.clone(),
                });
            }
        }
        contract.insert(field.clone(), descriptor.clone());
    }
    Ok(())
}

/// Superclass shape rules: an interface may only extend another interface,
/// and a class may not extend one.
fn check_superclass_shape(
    node: &SchemaNode,
    parent: &str,
    parent_is_interface: bool,
) -> Result<(), ResolveError> {
    if node.is_interface() && !parent_is_interface {
        return Err(ResolveError::InvalidDeclaration {
            type_name: node.name().to_string(),
            reason: format!("superclass {} is not an interface", parent),
        });
    }
    if !node.is_interface() && parent_is_interface {
        return Err(ResolveError::InvalidDeclaration {
            type_name: node.name().to_string(),
            reason: format!("superclass {} is an interface", parent),
        });
    }
    Ok(())
}
