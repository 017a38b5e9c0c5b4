use crate::bundler::registry::{UnitId, UnitRegistry};
use jsmodule_core::{JsmError, JsmResult};
use tracing::debug;

/// Default limit on the length of a require chain
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// One unit on the walk stack and how far through its requires we are
struct Frame {
    unit: UnitId,
    requires: Vec<UnitId>,
    next: usize,
}

/// Computes reference counts over a fully populated registry.
///
/// Every non-common unit is seeded with one reference, then its weight is
/// pushed down every require path. Paths are not deduplicated: a unit
/// reachable along several paths collects the weight once per path, so
/// diamonds multiply rather than saturate.
pub struct DependencyResolver {
    max_depth: usize,
}

impl DependencyResolver {
    pub fn new(max_depth: usize) -> Self {
        Self {
            max_depth: max_depth.max(1),
        }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Seed and propagate reference counts.
    ///
    /// Units are seeded from last registered to first; each seed is
    /// followed immediately by its walk, which carries the seed's count at
    /// that moment to every unit below it.
    pub fn resolve(&self, registry: &mut UnitRegistry) -> JsmResult<()> {
        let mut edges: Vec<Option<Vec<UnitId>>> = vec![None; registry.len()];

        for seed in (0..registry.len()).rev() {
            let amount = match registry.get_mut(seed) {
                Some(unit) if !unit.is_common() => {
                    unit.reference_count += 1;
                    unit.reference_count
                }
                _ => continue,
            };
            self.propagate(registry, &mut edges, seed, amount)?;
        }

        Ok(())
    }

    fn propagate(
        &self,
        registry: &mut UnitRegistry,
        edges: &mut [Option<Vec<UnitId>>],
        seed: UnitId,
        amount: u64,
    ) -> JsmResult<()> {
        let mut on_path = vec![false; registry.len()];
        let mut stack = vec![Frame {
            unit: seed,
            requires: required_units(registry, edges, seed)?,
            next: 0,
        }];
        on_path[seed] = true;

        while let Some(frame) = stack.last_mut() {
            if frame.next == frame.requires.len() {
                on_path[frame.unit] = false;
                stack.pop();
                continue;
            }
            let child = frame.requires[frame.next];
            frame.next += 1;

            if on_path[child] || stack.len() >= self.max_depth {
                let path = registry
                    .get(seed)
                    .map(|unit| unit.path().to_string())
                    .unwrap_or_default();
                debug!(
                    "Walk from {} stopped at depth {} (revisit: {})",
                    path,
                    stack.len(),
                    on_path[child]
                );
                return Err(JsmError::RecursiveResolution { path });
            }

            if let Some(unit) = registry.get_mut(child) {
                unit.reference_count = unit.reference_count.saturating_add(amount);
            }

            let requires = required_units(registry, edges, child)?;
            on_path[child] = true;
            stack.push(Frame {
                unit: child,
                requires,
                next: 0,
            });
        }

        Ok(())
    }
}

impl Default for DependencyResolver {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

/// Owners of a unit's requires, last declared first.
///
/// Every name is looked up before anything is counted, so a missing module
/// fails the unit as a whole.
fn required_units(
    registry: &UnitRegistry,
    edges: &mut [Option<Vec<UnitId>>],
    id: UnitId,
) -> JsmResult<Vec<UnitId>> {
    if let Some(known) = &edges[id] {
        return Ok(known.clone());
    }

    let unit = match registry.get(id) {
        Some(unit) => unit,
        None => return Ok(Vec::new()),
    };
    let mut owners = Vec::with_capacity(unit.requires().len());
    for name in unit.requires().iter().rev() {
        let owner = registry
            .owner_of(name)
            .ok_or_else(|| JsmError::MissingModule { name: name.clone() })?;
        owners.push(owner);
    }

    edges[id] = Some(owners.clone());
    Ok(owners)
}
