//! Multi-label diagnosis taxonomy for heart-failure etiology.
//!
//! Labels in this project are combinable: a patient classified as NICM may
//! additionally carry the underlying etiology (e.g. `NICM | VIRAL`). The
//! taxonomy is therefore a flag set over a fixed registry of diagnosis
//! classes, with an explicit class-to-axis table for projecting a set onto
//! an indicator vector. Bit positions come from [`CLASS_REGISTRY`] order,
//! never from enum discriminants.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// A single diagnosis class.
///
/// `Excluded` is the fallback for patients outside the study population and
/// has no indicator axis; the remaining classes each map to one axis of the
/// indicator vector (see [`DiagnosisClass::axis_index`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosisClass {
    Excluded,
    /// Ischemic cardiomyopathy
    Icm,
    /// Non-ischemic cardiomyopathy; may be joined with an underlying etiology
    Nicm,
    Diphtheric,
    Viral,
    Alcoholic,
    Drug,
    Peripartum,
    Amyloid,
    Metabolic,
    Sarcoidosis,
    Hypertensive,
    Tuberculous,
    Takotsubo,
    Chagas,
    Arrhythmia,
    Syphilis,
    Hemochromatosis,
    /// Valvular heart disease
    Valvular,
}

/// Ordered registry of every defined diagnosis class.
///
/// This is the single source of truth for bit positions and axis indices.
/// Appending a class is safe; reordering is a breaking change for any
/// serialized indicator vectors.
pub const CLASS_REGISTRY: [DiagnosisClass; 19] = [
    DiagnosisClass::Excluded,
    DiagnosisClass::Icm,
    DiagnosisClass::Nicm,
    DiagnosisClass::Diphtheric,
    DiagnosisClass::Viral,
    DiagnosisClass::Alcoholic,
    DiagnosisClass::Drug,
    DiagnosisClass::Peripartum,
    DiagnosisClass::Amyloid,
    DiagnosisClass::Metabolic,
    DiagnosisClass::Sarcoidosis,
    DiagnosisClass::Hypertensive,
    DiagnosisClass::Tuberculous,
    DiagnosisClass::Takotsubo,
    DiagnosisClass::Chagas,
    DiagnosisClass::Arrhythmia,
    DiagnosisClass::Syphilis,
    DiagnosisClass::Hemochromatosis,
    DiagnosisClass::Valvular,
];

/// Number of indicator axes (every class except `Excluded`).
pub const INDICATOR_AXES: usize = CLASS_REGISTRY.len() - 1;

impl DiagnosisClass {
    /// Upper-case clinical label used in display output.
    pub fn label(self) -> &'static str {
        match self {
            DiagnosisClass::Excluded => "EXCLUDED",
            DiagnosisClass::Icm => "ICM",
            DiagnosisClass::Nicm => "NICM",
            DiagnosisClass::Diphtheric => "DIPHTHERIC",
            DiagnosisClass::Viral => "VIRAL",
            DiagnosisClass::Alcoholic => "ALCOHOLIC",
            DiagnosisClass::Drug => "DRUG",
            DiagnosisClass::Peripartum => "PERIPARTUM",
            DiagnosisClass::Amyloid => "AMYLOID",
            DiagnosisClass::Metabolic => "METABOLIC",
            DiagnosisClass::Sarcoidosis => "SARCOIDOSIS",
            DiagnosisClass::Hypertensive => "HYPERTENSIVE",
            DiagnosisClass::Tuberculous => "TUBERCULOUS",
            DiagnosisClass::Takotsubo => "TAKOTSUBO",
            DiagnosisClass::Chagas => "CHAGAS",
            DiagnosisClass::Arrhythmia => "ARRHYTHMIA",
            DiagnosisClass::Syphilis => "SYPHILIS",
            DiagnosisClass::Hemochromatosis => "HEMOCHROMATOSIS",
            DiagnosisClass::Valvular => "VALVULAR",
        }
    }

    /// Position of this class in [`CLASS_REGISTRY`].
    pub fn registry_index(self) -> usize {
        CLASS_REGISTRY
            .iter()
            .position(|&c| c == self)
            .expect("every class appears in CLASS_REGISTRY")
    }

    /// Indicator-vector axis for this class, or `None` for `Excluded`.
    ///
    /// Axis 0 is `Icm`, axis `INDICATOR_AXES - 1` is `Valvular`.
    pub fn axis_index(self) -> Option<usize> {
        match self {
            DiagnosisClass::Excluded => None,
            other => Some(other.registry_index() - 1),
        }
    }

    fn bit(self) -> u32 {
        1 << self.registry_index()
    }
}

impl fmt::Display for DiagnosisClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A combinable set of diagnosis classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct DiagnosisSet {
    bits: u32,
}

impl DiagnosisSet {
    pub const EMPTY: DiagnosisSet = DiagnosisSet { bits: 0 };

    pub fn is_empty(self) -> bool {
        self.bits == 0
    }

    pub fn contains(self, class: DiagnosisClass) -> bool {
        self.bits & class.bit() != 0
    }

    /// Returns a copy of this set with `class` added.
    pub fn with(self, class: DiagnosisClass) -> DiagnosisSet {
        DiagnosisSet {
            bits: self.bits | class.bit(),
        }
    }

    pub fn insert(&mut self, class: DiagnosisClass) {
        self.bits |= class.bit();
    }

    /// Member classes in registry order.
    pub fn classes(self) -> Vec<DiagnosisClass> {
        CLASS_REGISTRY
            .iter()
            .copied()
            .filter(|&c| self.contains(c))
            .collect()
    }

    /// Projects this set onto the fixed indicator space: one entry per
    /// diagnostic class, 1.0 where the class is present. `Excluded` has no
    /// axis and does not appear in the projection.
    pub fn indicator_vector(self) -> Vec<f64> {
        let mut v = vec![0.0; INDICATOR_AXES];
        for class in self.classes() {
            if let Some(axis) = class.axis_index() {
                v[axis] = 1.0;
            }
        }
        v
    }
}

impl From<DiagnosisClass> for DiagnosisSet {
    fn from(class: DiagnosisClass) -> Self {
        DiagnosisSet::EMPTY.with(class)
    }
}

impl BitOr for DiagnosisSet {
    type Output = DiagnosisSet;

    fn bitor(self, rhs: DiagnosisSet) -> DiagnosisSet {
        DiagnosisSet {
            bits: self.bits | rhs.bits,
        }
    }
}

impl BitOr<DiagnosisClass> for DiagnosisSet {
    type Output = DiagnosisSet;

    fn bitor(self, rhs: DiagnosisClass) -> DiagnosisSet {
        self.with(rhs)
    }
}

impl BitOr for DiagnosisClass {
    type Output = DiagnosisSet;

    fn bitor(self, rhs: DiagnosisClass) -> DiagnosisSet {
        DiagnosisSet::from(self).with(rhs)
    }
}

impl BitOrAssign<DiagnosisClass> for DiagnosisSet {
    fn bitor_assign(&mut self, rhs: DiagnosisClass) {
        self.insert(rhs);
    }
}

impl fmt::Display for DiagnosisSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.classes().iter().map(|c| c.label()).collect();
        write!(f, "{}", names.join(" | "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_has_no_duplicates() {
        for (i, a) in CLASS_REGISTRY.iter().enumerate() {
            for b in &CLASS_REGISTRY[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_registry_index_round_trip() {
        for (i, class) in CLASS_REGISTRY.iter().enumerate() {
            assert_eq!(class.registry_index(), i);
        }
    }

    #[test]
    fn test_union_and_containment() {
        let set = DiagnosisClass::Nicm | DiagnosisClass::Viral;
        assert!(set.contains(DiagnosisClass::Nicm));
        assert!(set.contains(DiagnosisClass::Viral));
        assert!(!set.contains(DiagnosisClass::Icm));
        assert_eq!(set.classes().len(), 2);
    }
}
