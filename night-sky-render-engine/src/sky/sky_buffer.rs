use crate::sky::catalog::StarCatalog;
use crate::sky::projector::{Projector, SkyProjection, limiting_magnitude};
use std::sync::Arc;

/// Everything besides the catalog that determines a sky buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildParameters {
    pub projection: SkyProjection,
    pub moon_illumination: f64,
    pub base_limiting_magnitude: f64,
    pub dome_radius: f64,
}

impl BuildParameters {
    pub fn limiting_magnitude(&self) -> f64 {
        limiting_magnitude(self.base_limiting_magnitude, self.moon_illumination)
    }
}

/// Identity of a buffer: equal keys always build bit-identical buffers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkyBufferKey {
    pub catalog_revision: u64,
    pub parameters: BuildParameters,
}

impl SkyBufferKey {
    pub fn new(catalog: &StarCatalog, parameters: BuildParameters) -> Self {
        Self {
            catalog_revision: catalog.revision(),
            parameters,
        }
    }
}

/// Flat renderable view of the visible sky.
///
/// `positions.len() == 3 * alphas.len() == 3 * ids.len()`; slot `i` of every
/// array describes the same star. Built in one pass and never mutated after.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkyBuffer {
    positions: Vec<f32>,
    alphas: Vec<f32>,
    ids: Vec<Arc<str>>,
}

impl SkyBuffer {
    pub fn len(&self) -> usize {
        self.alphas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alphas.is_empty()
    }

    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn alphas(&self) -> &[f32] {
        &self.alphas
    }

    pub fn ids(&self) -> &[Arc<str>] {
        &self.ids
    }

    pub fn position(&self, slot: usize) -> Option<[f32; 3]> {
        let p = self.positions.get(slot * 3..slot * 3 + 3)?;
        Some([p[0], p[1], p[2]])
    }

    pub fn alpha(&self, slot: usize) -> Option<f32> {
        self.alphas.get(slot).copied()
    }

    pub fn id(&self, slot: usize) -> Option<&str> {
        self.ids.get(slot).map(|id| id.as_ref())
    }

    pub fn slot_of(&self, id: &str) -> Option<usize> {
        self.ids.iter().position(|candidate| candidate.as_ref() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.slot_of(id).is_some()
    }

    /// Snapshot of the visible ids in slot order.
    pub fn visible_star_ids(&self) -> Vec<String> {
        self.ids.iter().map(|id| id.to_string()).collect()
    }
}

/// Project the whole catalog in catalog order. Linear in catalog size.
pub fn build_sky_buffer(catalog: &StarCatalog, parameters: &BuildParameters) -> SkyBuffer {
    let Some(projector) = Projector::new(
        &parameters.projection,
        parameters.dome_radius,
        parameters.limiting_magnitude(),
    ) else {
        return SkyBuffer::default();
    };

    let mut buffer = SkyBuffer::default();
    for projected in catalog.stars().iter().filter_map(|star| projector.project(star)) {
        let [x, y, z] = projected.direction;
        buffer.positions.extend([x as f32, y as f32, z as f32]);
        buffer.alphas.push(projected.alpha as f32);
        buffer.ids.push(projected.id);
    }

    buffer.positions.shrink_to_fit();
    buffer.alphas.shrink_to_fit();
    buffer.ids.shrink_to_fit();
    buffer
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sky::catalog::CatalogRecord;

    fn parameters(projection: SkyProjection, moon: f64) -> BuildParameters {
        BuildParameters {
            projection,
            moon_illumination: moon,
            base_limiting_magnitude: 5.5,
            dome_radius: 100.0,
        }
    }

    #[test]
    fn unset_projection_builds_empty_buffer() {
        let catalog = StarCatalog::from_records(vec![CatalogRecord::new("1", 1.0, 80.0, 0.0)]);
        let buffer = build_sky_buffer(&catalog, &parameters(SkyProjection::Unset, 0.0));
        assert!(buffer.is_empty());
        assert!(buffer.positions().is_empty());
    }

    #[test]
    fn slots_keep_catalog_order() {
        let catalog = StarCatalog::from_records(vec![
            CatalogRecord::new("a", 1.0, 30.0, 1.0),
            CatalogRecord::new("below", 1.0, -30.0, 1.0),
            CatalogRecord::new("b", 2.0, 60.0, 2.0),
            CatalogRecord::new("faint", 2.0, 60.0, 5.6),
        ]);
        let buffer = build_sky_buffer(&catalog, &parameters(SkyProjection::FixedEpoch, 0.0));

        assert_eq!(buffer.visible_star_ids(), vec!["a", "b"]);
        assert_eq!(buffer.positions().len(), 3 * buffer.alphas().len());
        assert_eq!(buffer.slot_of("b"), Some(1));
        assert!(!buffer.contains("below"));
        assert!(buffer.position(2).is_none());
    }

    #[test]
    fn key_tracks_catalog_revision() {
        let params = parameters(SkyProjection::FixedEpoch, 0.3);
        let first = StarCatalog::empty();
        let second = StarCatalog::empty();
        assert_eq!(SkyBufferKey::new(&first, params), SkyBufferKey::new(&first, params));
        assert_ne!(SkyBufferKey::new(&first, params), SkyBufferKey::new(&second, params));
    }
}
