//! Display units and the picker that scales a magnitude into the best one.
//!
//! Duration units are expressed in seconds, rate units in events per second.
//! The two catalogs never mix.

/// A display unit: `multiplier` base units make one `label`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Unit {
    pub multiplier: f64,
    pub label: &'static str,
}

impl Unit {
    pub const fn new(multiplier: f64, label: &'static str) -> Self {
        Self { multiplier, label }
    }

    /// Expresses `magnitude` (in base units) in this unit.
    pub fn scale(&self, magnitude: f64) -> f64 {
        magnitude / self.multiplier
    }
}

pub const DURATION_UNITS: [Unit; 5] = [
    Unit::new(1.0e-9, "ns"),
    Unit::new(1.0e-6, "mcs"),
    Unit::new(1.0e-3, "ms"),
    Unit::new(1.0, "s"),
    Unit::new(60.0, "min"),
];

pub const RATE_UNITS: [Unit; 4] = [
    Unit::new(1.0, ""),
    Unit::new(1.0e3, "K"),
    Unit::new(1.0e6, "M"),
    Unit::new(1.0e9, "G"),
];

/// Picks the largest unit strictly smaller than a magnitude.
#[derive(Debug, Clone)]
pub struct UnitPicker {
    // Sorted by multiplier, descending.
    units: Vec<Unit>,
}

impl UnitPicker {
    pub fn new(units: &[Unit]) -> Self {
        let mut units = units.to_vec();
        units.sort_by(|a, b| b.multiplier.total_cmp(&a.multiplier));
        Self { units }
    }

    /// Returns the unit with the largest multiplier strictly less than
    /// `magnitude`, or the smallest unit when none qualifies.
    ///
    /// `None` only for a picker built from an empty catalog.
    pub fn select(&self, magnitude: f64) -> Option<&Unit> {
        self.units
            .iter()
            .find(|unit| unit.multiplier < magnitude)
            .or_else(|| self.units.last())
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }
}

/// The two unit catalogs, built once and handed to every formatter.
#[derive(Debug, Clone)]
pub struct UnitCatalogs {
    pub duration: UnitPicker,
    pub rate: UnitPicker,
}

impl Default for UnitCatalogs {
    fn default() -> Self {
        Self {
            duration: UnitPicker::new(&DURATION_UNITS),
            rate: UnitPicker::new(&RATE_UNITS),
        }
    }
}
