// ─────────────────────────────────────────────────────────────────────
// Undulate Kernel — Immersed Body Layout
// ─────────────────────────────────────────────────────────────────────
//! Discretisation of the foil into streamwise sections and surface
//! markers.
//!
//! Every marker gets a stable global index when the layout is built.
//! Velocity and shape updates both walk the same marker arena, so index i
//! always denotes the same physical point in both arrays.
//!
//! Within a section the upper-surface layers come first (j = 0..half),
//! followed by the lower-surface layers (j = 0..half).

use std::ops::Range;

use serde::{Deserialize, Serialize};

use undulate_types::{KinematicsError, KinematicsResult};

/// Upper bound on streamwise sections per body.
pub const MAX_SECTIONS: usize = 1 << 20;

/// Upper bound on markers per surface of one section.
pub const MAX_MARKERS_PER_SIDE: usize = 1 << 16;

/// Upper bound on the marker arena.
pub const MAX_MARKERS: usize = 1 << 26;

/// ceil(ratio) as a count, or `None` if non-finite, negative or above `cap`.
fn bounded_count(ratio: f64, cap: usize) -> Option<usize> {
    let n = ratio.ceil();
    if n.is_finite() && n >= 0.0 && n <= cap as f64 {
        Some(n as usize)
    } else {
        None
    }
}

/// Finest-level background mesh spacing (streamwise Δx, transverse Δy).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeshSpacing {
    pub dx: f64,
    pub dy: f64,
}

impl MeshSpacing {
    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    /// Uniform spacing in both directions.
    pub fn uniform(h: f64) -> Self {
        Self { dx: h, dy: h }
    }

    fn validate(&self) -> KinematicsResult<()> {
        for (name, v) in [("dx", self.dx), ("dy", self.dy)] {
            if !v.is_finite() || v <= 0.0 {
                return Err(KinematicsError::Layout(format!(
                    "mesh spacing {name} must be finite and > 0, got {v}"
                )));
            }
        }
        Ok(())
    }
}

/// How the host advances Lagrangian positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PositionUpdateMethod {
    /// Positions follow the constraint velocity; shape updates are skipped.
    ConstraintVelocity,
    #[default]
    ConstraintPosition,
    ConstraintExptPosition,
}

impl PositionUpdateMethod {
    /// Whether `set_shape` has any effect under this method.
    pub fn updates_shape(&self) -> bool {
        !matches!(self, PositionUpdateMethod::ConstraintVelocity)
    }
}

/// Host-side metadata about the immersed structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureParameters {
    pub coarsest_level: usize,
    pub finest_level: usize,
    /// Half-open Lagrangian index range owned by this body, if the host
    /// already knows it.
    pub lag_idx_range: Option<(usize, usize)>,
    pub position_update: PositionUpdateMethod,
}

impl StructureParameters {
    /// Single-level structure with no pre-declared index range.
    pub fn single_level(level: usize) -> Self {
        Self {
            coarsest_level: level,
            finest_level: level,
            lag_idx_range: None,
            position_update: PositionUpdateMethod::default(),
        }
    }

    pub fn with_lag_idx_range(mut self, first: usize, last: usize) -> Self {
        self.lag_idx_range = Some((first, last));
        self
    }

    pub fn with_position_update(mut self, method: PositionUpdateMethod) -> Self {
        self.position_update = method;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SectionId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Surface {
    Upper,
    Lower,
}

/// One streamwise cross-section of the body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: SectionId,
    /// Physical streamwise position s.
    pub position: f64,
    /// Nondimensional coordinate X = s / c.
    pub x: f64,
    pub markers_per_side: usize,
    /// Handles owned by this section, upper surface first.
    pub handles: Range<usize>,
}

impl Section {
    pub fn marker_count(&self) -> usize {
        self.handles.len()
    }
}

/// Arena slot describing where a marker sits on the body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkerSlot {
    pub section: SectionId,
    pub surface: Surface,
    /// Layer index j within its surface.
    pub layer: usize,
}

impl MarkerSlot {
    /// Transverse offset of the marker from the centerline.
    ///
    /// Upper layers sit at +j·Δy, lower layers at −(j+1)·Δy.
    #[inline]
    pub fn offset(&self, dy: f64) -> f64 {
        match self.surface {
            Surface::Upper => self.layer as f64 * dy,
            Surface::Lower => -((self.layer + 1) as f64) * dy,
        }
    }
}

/// Read-only section/marker map built once per generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImmersedBodyLayout {
    chord_length: f64,
    spacing: MeshSpacing,
    sections: Vec<Section>,
    markers: Vec<MarkerSlot>,
}

impl ImmersedBodyLayout {
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, id: SectionId) -> Option<&Section> {
        self.sections.get(id.0)
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    pub fn markers(&self) -> &[MarkerSlot] {
        &self.markers
    }

    /// Slot behind a global marker index.
    pub fn marker(&self, index: usize) -> Option<&MarkerSlot> {
        self.markers.get(index)
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    pub fn spacing(&self) -> MeshSpacing {
        self.spacing
    }

    pub fn chord_length(&self) -> f64 {
        self.chord_length
    }

    /// (s, marker count) pairs in streamwise order.
    pub fn section_counts(&self) -> impl Iterator<Item = (f64, usize)> + '_ {
        self.sections.iter().map(|s| (s.position, s.marker_count()))
    }

    /// Check the structural invariants: strictly increasing keys, even
    /// counts ≥ 2 per section, contiguous handle ranges covering the arena.
    pub fn verify(&self) -> KinematicsResult<()> {
        let mut next = 0usize;
        let mut prev_position = f64::NEG_INFINITY;
        for section in &self.sections {
            if section.position <= prev_position {
                return Err(KinematicsError::Layout(format!(
                    "section keys not strictly increasing at s={}",
                    section.position
                )));
            }
            prev_position = section.position;
            let count = section.marker_count();
            if count < 2 || count % 2 != 0 || count != 2 * section.markers_per_side {
                return Err(KinematicsError::Layout(format!(
                    "section {} has invalid marker count {count}",
                    section.id.0
                )));
            }
            if section.handles.start != next {
                return Err(KinematicsError::Layout(format!(
                    "section {} handles start at {}, expected {next}",
                    section.id.0, section.handles.start
                )));
            }
            next = section.handles.end;
        }
        if next != self.markers.len() {
            return Err(KinematicsError::Layout(format!(
                "sections cover {next} markers, arena holds {}",
                self.markers.len()
            )));
        }
        Ok(())
    }
}

/// Builds an `ImmersedBodyLayout` from chord, mesh spacing and thickness.
#[derive(Debug, Clone, Copy)]
pub struct BodyDiscretizer {
    pub chord_length: f64,
    pub spacing: MeshSpacing,
    pub thickness_ratio: f64,
}

impl BodyDiscretizer {
    pub fn new(chord_length: f64, spacing: MeshSpacing, thickness_ratio: f64) -> Self {
        Self {
            chord_length,
            spacing,
            thickness_ratio,
        }
    }

    /// Number of streamwise sections: ceil(c / Δx).
    ///
    /// `None` when the count is not finite or exceeds `MAX_SECTIONS`.
    pub fn section_count(&self) -> Option<usize> {
        bounded_count(self.chord_length / self.spacing.dx, MAX_SECTIONS)
    }

    /// Markers on each surface of a section: max(2, ceil(t·c / Δy)).
    ///
    /// `None` when the count is not finite or exceeds `MAX_MARKERS_PER_SIDE`.
    pub fn markers_per_side(&self) -> Option<usize> {
        bounded_count(
            self.thickness_ratio * self.chord_length / self.spacing.dy,
            MAX_MARKERS_PER_SIDE,
        )
        .map(|n| n.max(2))
    }

    /// Build the layout for a single-level structure.
    ///
    /// Fails when the structure spans several levels, the mesh spacing is
    /// degenerate or too fine for the marker caps, or the host's Lagrangian
    /// index range disagrees with the marker total.
    pub fn discretize(
        &self,
        structure: &StructureParameters,
    ) -> KinematicsResult<ImmersedBodyLayout> {
        if structure.coarsest_level != structure.finest_level {
            return Err(KinematicsError::Layout(format!(
                "coarsest level {} != finest level {}; only single-level bodies are supported",
                structure.coarsest_level, structure.finest_level
            )));
        }
        self.spacing.validate()?;
        if !self.chord_length.is_finite() || self.chord_length <= 0.0 {
            return Err(KinematicsError::Layout(format!(
                "chord length must be finite and > 0, got {}",
                self.chord_length
            )));
        }

        let n_sections = self.section_count().ok_or_else(|| {
            KinematicsError::Layout(format!(
                "dx={} gives more than {MAX_SECTIONS} sections",
                self.spacing.dx
            ))
        })?;
        let per_side = self.markers_per_side().ok_or_else(|| {
            KinematicsError::Layout(format!(
                "dy={} gives more than {MAX_MARKERS_PER_SIDE} markers per side",
                self.spacing.dy
            ))
        })?;
        let total = n_sections
            .checked_mul(2 * per_side)
            .filter(|&n| n <= MAX_MARKERS)
            .ok_or_else(|| {
                KinematicsError::Layout(format!(
                    "{n_sections} sections x {} markers exceeds {MAX_MARKERS} markers",
                    2 * per_side
                ))
            })?;
        let mut sections = Vec::with_capacity(n_sections);
        let mut markers = Vec::with_capacity(total);

        for i in 0..n_sections {
            let id = SectionId(i);
            let position = i as f64 * self.spacing.dx;
            let start = markers.len();
            for surface in [Surface::Upper, Surface::Lower] {
                for layer in 0..per_side {
                    markers.push(MarkerSlot {
                        section: id,
                        surface,
                        layer,
                    });
                }
            }
            sections.push(Section {
                id,
                position,
                x: position / self.chord_length,
                markers_per_side: per_side,
                handles: start..markers.len(),
            });
        }

        let layout = ImmersedBodyLayout {
            chord_length: self.chord_length,
            spacing: self.spacing,
            sections,
            markers,
        };
        layout.verify()?;

        if let Some((first, last)) = structure.lag_idx_range {
            let declared = last.saturating_sub(first);
            if declared != layout.marker_count() {
                return Err(KinematicsError::Layout(format!(
                    "structure declares {declared} Lagrangian points, layout has {}",
                    layout.marker_count()
                )));
            }
        }

        log::debug!(
            "body layout: {} sections x {} markers = {} markers (dx={}, dy={})",
            layout.section_count(),
            2 * per_side,
            layout.marker_count(),
            self.spacing.dx,
            self.spacing.dy
        );
        Ok(layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(dx: f64, dy: f64, ratio: f64) -> ImmersedBodyLayout {
        BodyDiscretizer::new(1.0, MeshSpacing::new(dx, dy), ratio)
            .discretize(&StructureParameters::single_level(0))
            .unwrap()
    }

    #[test]
    fn test_reference_discretisation() {
        let layout = build(0.1, 0.05, 0.12);
        assert_eq!(layout.section_count(), 10);
        for s in layout.sections() {
            assert_eq!(s.markers_per_side, 3);
            assert_eq!(s.marker_count(), 6);
        }
        assert_eq!(layout.marker_count(), 60);
    }

    #[test]
    fn test_minimum_two_per_side() {
        let layout = build(0.25, 0.5, 0.06);
        assert_eq!(layout.section_count(), 4);
        assert!(layout.sections().iter().all(|s| s.markers_per_side == 2));
    }

    #[test]
    fn test_keys_strictly_increasing() {
        let layout = build(1.0 / 64.0, 1.0 / 64.0, 0.24);
        let keys: Vec<f64> = layout.section_counts().map(|(s, _)| s).collect();
        assert!(keys.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(keys[0], 0.0);
    }

    #[test]
    fn test_sum_equals_arena() {
        let layout = build(0.03, 0.02, 0.18);
        let total: usize = layout.section_counts().map(|(_, n)| n).sum();
        assert_eq!(total, layout.marker_count());
    }

    #[test]
    fn test_arena_order_upper_then_lower() {
        let layout = build(0.5, 0.05, 0.12);
        let first = &layout.sections()[1];
        let slots = &layout.markers()[first.handles.clone()];
        assert!(slots.iter().all(|m| m.section == first.id));
        assert_eq!(slots[0].surface, Surface::Upper);
        assert_eq!(slots[0].layer, 0);
        assert_eq!(slots[3].surface, Surface::Lower);
        assert_eq!(slots[3].layer, 0);
        assert_eq!(slots[5].layer, 2);
    }

    #[test]
    fn test_marker_offsets() {
        let dy = 0.05;
        let upper = MarkerSlot {
            section: SectionId(0),
            surface: Surface::Upper,
            layer: 2,
        };
        let lower = MarkerSlot {
            section: SectionId(0),
            surface: Surface::Lower,
            layer: 0,
        };
        assert!((upper.offset(dy) - 0.1).abs() < 1e-15);
        assert!((lower.offset(dy) + 0.05).abs() < 1e-15);
    }

    #[test]
    fn test_level_mismatch_rejected() {
        let structure = StructureParameters {
            coarsest_level: 0,
            finest_level: 2,
            lag_idx_range: None,
            position_update: PositionUpdateMethod::ConstraintPosition,
        };
        let err = BodyDiscretizer::new(1.0, MeshSpacing::uniform(0.1), 0.12)
            .discretize(&structure)
            .unwrap_err();
        assert!(matches!(err, KinematicsError::Layout(_)));
    }

    #[test]
    fn test_degenerate_spacing_rejected() {
        let d = BodyDiscretizer::new(1.0, MeshSpacing::new(0.0, 0.1), 0.12);
        assert!(d.discretize(&StructureParameters::single_level(0)).is_err());
    }

    #[test]
    fn test_lag_range_must_match() {
        let d = BodyDiscretizer::new(1.0, MeshSpacing::new(0.1, 0.05), 0.12);
        let ok = StructureParameters::single_level(0).with_lag_idx_range(100, 160);
        assert!(d.discretize(&ok).is_ok());
        let bad = StructureParameters::single_level(0).with_lag_idx_range(0, 59);
        assert!(d.discretize(&bad).is_err());
    }

    #[test]
    fn test_marker_lookup_by_index() {
        let layout = build(0.5, 0.05, 0.12);
        let slot = layout.marker(7).unwrap();
        assert_eq!(slot.section, SectionId(1));
        assert_eq!(slot.surface, Surface::Upper);
        assert_eq!(slot.layer, 1);
        assert!(layout.marker(layout.marker_count()).is_none());
    }

    #[test]
    fn test_extreme_spacing_rejected() {
        let structure = StructureParameters::single_level(0);
        for spacing in [
            MeshSpacing::new(0.1, 1e-300),
            MeshSpacing::new(1e-300, 0.05),
            MeshSpacing::new(f64::MIN_POSITIVE, f64::MIN_POSITIVE),
        ] {
            let err = BodyDiscretizer::new(1.0, spacing, 0.12)
                .discretize(&structure)
                .unwrap_err();
            assert!(matches!(err, KinematicsError::Layout(_)), "{spacing:?}: {err}");
        }
    }

    #[test]
    fn test_marker_total_capped() {
        // Both counts are individually under their caps, the product is not.
        let d = BodyDiscretizer::new(1.0, MeshSpacing::new(1e-6, 1e-4), 1.0);
        assert_eq!(d.section_count(), Some(1_000_000));
        assert_eq!(d.markers_per_side(), Some(10_000));
        assert!(matches!(
            d.discretize(&StructureParameters::single_level(0)),
            Err(KinematicsError::Layout(_))
        ));
    }

    #[test]
    fn test_counts_for_reference_mesh() {
        let d = BodyDiscretizer::new(1.0, MeshSpacing::new(0.1, 0.05), 0.12);
        assert_eq!(d.section_count(), Some(10));
        assert_eq!(d.markers_per_side(), Some(3));
    }

    #[test]
    fn test_velocity_only_policy() {
        assert!(!PositionUpdateMethod::ConstraintVelocity.updates_shape());
        assert!(PositionUpdateMethod::ConstraintPosition.updates_shape());
    }
}
