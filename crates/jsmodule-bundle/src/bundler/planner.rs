use crate::bundler::registry::UnitRegistry;
use crate::bundler::unit::SourceUnit;
use tracing::debug;

/// The concatenated output of one compilation pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledArtifact {
    pub contents: String,
    /// Number of units folded into `contents`
    pub unit_count: usize,
}

impl CompiledArtifact {
    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }
}

/// Surviving units in emission order
#[derive(Debug)]
pub struct BuildPlan {
    units: Vec<SourceUnit>,
    pruned: Vec<String>,
}

impl BuildPlan {
    /// Prune unreferenced units and order the rest by reference count.
    ///
    /// Units with a count of zero are dropped unless they are test units.
    /// The sort is stable, so equal counts keep registration order.
    pub fn from_registry(registry: UnitRegistry) -> Self {
        let (mut units, dropped): (Vec<SourceUnit>, Vec<SourceUnit>) = registry
            .into_units()
            .into_iter()
            .partition(SourceUnit::survives_pruning);

        let pruned: Vec<String> = dropped.iter().map(|u| u.path().to_string()).collect();
        for path in &pruned {
            debug!("Pruned unreferenced unit {}", path);
        }

        units.sort_by(|a, b| b.reference_count().cmp(&a.reference_count()));

        Self { units, pruned }
    }

    pub fn units(&self) -> &[SourceUnit] {
        &self.units
    }

    /// Paths of the units that were dropped
    pub fn pruned(&self) -> &[String] {
        &self.pruned
    }

    /// Join the bodies, one newline between each
    pub fn emit(&self) -> CompiledArtifact {
        let contents = self
            .units
            .iter()
            .map(SourceUnit::body)
            .collect::<Vec<_>>()
            .join("\n");

        CompiledArtifact {
            contents,
            unit_count: self.units.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::unit::UnitKind;

    fn unit(path: &str, count: u64, body: &str) -> SourceUnit {
        let mut unit = SourceUnit::new(path, "/app", "/app", UnitKind::Script);
        unit.reference_count = count;
        unit.body = body.to_string();
        unit
    }

    #[test]
    fn test_prune_and_sort() {
        let mut registry = UnitRegistry::new();
        registry.register(unit("/app/low.js", 1, "low"));
        registry.register(unit("/app/common/dead.js", 0, "dead"));
        registry.register(unit("/app/high.js", 5, "high"));
        registry.register(unit("/app/test/spec.js", 0, "spec"));

        let plan = BuildPlan::from_registry(registry);
        let paths: Vec<&str> = plan.units().iter().map(|u| u.path()).collect();
        assert_eq!(paths, vec!["/app/high.js", "/app/low.js", "/app/test/spec.js"]);
        assert_eq!(plan.pruned(), ["/app/common/dead.js".to_string()]);

        let artifact = plan.emit();
        assert_eq!(artifact.contents, "high\nlow\nspec");
        assert_eq!(artifact.unit_count, 3);
    }

    #[test]
    fn test_ties_keep_registration_order() {
        let mut registry = UnitRegistry::new();
        registry.register(unit("/app/b.js", 2, "b"));
        registry.register(unit("/app/a.js", 2, "a"));
        registry.register(unit("/app/c.js", 2, "c"));

        let artifact = BuildPlan::from_registry(registry).emit();
        assert_eq!(artifact.contents, "b\na\nc");
    }

    #[test]
    fn test_empty_registry() {
        let artifact = BuildPlan::from_registry(UnitRegistry::new()).emit();
        assert!(artifact.is_empty());
        assert_eq!(artifact.unit_count, 0);
    }
}
