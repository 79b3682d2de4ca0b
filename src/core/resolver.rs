//! Dependency resolution
//!
//! Computes build order, breaking dependency cycles where they close.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::error::ResolverError;

/// Dependency graph for recipes
#[derive(Debug, Default)]
pub struct DependencyGraph {
    /// Adjacency list: recipe -> recipes it depends on
    edges: BTreeMap<String, Vec<String>>,
    /// All known recipes
    nodes: BTreeSet<String>,
}

impl DependencyGraph {
    /// Create a new empty dependency graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a recipe to the graph
    pub fn add_recipe(&mut self, name: &str, dependencies: Vec<String>) {
        self.nodes.insert(name.to_string());
        for dep in &dependencies {
            self.nodes.insert(dep.clone());
        }
        self.edges.insert(name.to_string(), dependencies);
    }

    /// Order exactly `names`, dependencies first
    ///
    /// Precedence through recipes outside `names` is honoured, but only the
    /// requested recipes appear in the result. Ties keep the order of `names`.
    /// A dependency cycle is broken at the edge that closes it, with a
    /// warning; every member is still ordered.
    pub fn order(&self, names: &[String]) -> Result<Vec<String>, ResolverError> {
        for name in names {
            if !self.nodes.contains(name) {
                return Err(ResolverError::UnknownRecipe { name: name.clone() });
            }
        }

        let mut visited = HashSet::new();
        let mut path = Vec::new();
        let mut result = Vec::new();

        for node in names {
            self.visit(node, &mut visited, &mut path, &mut result);
        }

        let wanted: HashSet<&str> = names.iter().map(String::as_str).collect();
        result.retain(|name| wanted.contains(name.as_str()));
        Ok(result)
    }

    fn visit(
        &self,
        node: &str,
        visited: &mut HashSet<String>,
        path: &mut Vec<String>,
        result: &mut Vec<String>,
    ) {
        if visited.contains(node) {
            return;
        }

        if let Some(start) = path.iter().position(|n| n == node) {
            let mut cycle = path[start..].to_vec();
            cycle.push(node.to_string());
            tracing::warn!("Circular dependency: {}", cycle.join(" -> "));
            return;
        }

        path.push(node.to_string());
        if let Some(deps) = self.edges.get(node) {
            for dep in deps {
                self.visit(dep, visited, path, result);
            }
        }
        path.pop();

        visited.insert(node.to_string());
        result.push(node.to_string());
    }
}
