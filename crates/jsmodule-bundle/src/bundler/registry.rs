use crate::bundler::unit::SourceUnit;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Index of a unit in registration order
pub type UnitId = usize;

/// Owns the units of one compilation pass and the name -> owner index.
///
/// `register` and `replace_content` are the only ways the index or a
/// unit's declared names change.
#[derive(Debug, Default)]
pub struct UnitRegistry {
    units: Vec<SourceUnit>,
    paths: HashSet<String>,
    owners: HashMap<String, UnitId>,
}

impl UnitRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a unit unless its path is already registered.
    ///
    /// Every provided name is pointed at the new unit, replacing any
    /// previous owner. Returns `false` for a duplicate path.
    pub fn register(&mut self, unit: SourceUnit) -> bool {
        if !self.paths.insert(unit.path().to_string()) {
            debug!("Skipping already registered unit {}", unit.path());
            return false;
        }

        let id = self.units.len();
        for name in unit.provides() {
            if let Some(previous) = self.owners.insert(name.clone(), id) {
                debug!(
                    "Module {} moves from {} to {}",
                    name,
                    self.units[previous].path(),
                    unit.path()
                );
            }
        }
        debug!("Registered {} ({} provides)", unit.path(), unit.provides().len());
        self.units.push(unit);
        true
    }

    pub fn contains_path(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    /// Owner of a provided module name
    pub fn owner_of(&self, name: &str) -> Option<UnitId> {
        self.owners.get(name).copied()
    }

    pub fn lookup(&self, name: &str) -> Option<&SourceUnit> {
        self.owner_of(name).map(|id| &self.units[id])
    }

    pub fn get(&self, id: UnitId) -> Option<&SourceUnit> {
        self.units.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: UnitId) -> Option<&mut SourceUnit> {
        self.units.get_mut(id)
    }

    /// Overwrite an owner's content with a replacement's.
    ///
    /// Identity, flags, reference count and the name index stay as they are.
    pub(crate) fn replace_content(
        &mut self,
        id: UnitId,
        header: &str,
        body: &str,
        provides: &[String],
        requires: &[String],
    ) {
        if let Some(unit) = self.units.get_mut(id) {
            unit.header = header.to_string();
            unit.body = body.to_string();
            unit.provides = provides.to_vec();
            unit.requires = requires.to_vec();
        }
    }

    /// Units in registration order
    pub fn units(&self) -> &[SourceUnit] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn into_units(self) -> Vec<SourceUnit> {
        self.units
    }
}
