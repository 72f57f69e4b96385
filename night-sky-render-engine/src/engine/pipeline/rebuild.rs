use crate::engine::core::sky_settings::SkySettings;
use crate::engine::pipeline::sky_context::{SkyCatalog, SkyContext};
use crate::sky::sky_buffer::{SkyBuffer, SkyBufferKey, build_sky_buffer};
use bevy::prelude::*;
use bevy::tasks::{AsyncComputeTaskPool, Task, block_on, futures_lite::future};
use std::sync::Arc;

/// Orders rebuild requests. Generations only grow; only the newest one may publish.
#[derive(Resource, Debug, Default)]
pub struct RebuildSequencer {
    latest_generation: u64,
    published_generation: u64,
    last_key: Option<SkyBufferKey>,
}

impl RebuildSequencer {
    /// New generation for a changed key, `None` when the key is unchanged.
    pub fn request(&mut self, key: SkyBufferKey) -> Option<u64> {
        if self.last_key == Some(key) {
            return None;
        }
        self.last_key = Some(key);
        self.latest_generation += 1;
        Some(self.latest_generation)
    }

    /// Records a publish if `generation` is still the newest request.
    pub fn try_publish(&mut self, generation: u64) -> bool {
        if generation != self.latest_generation || generation <= self.published_generation {
            return false;
        }
        self.published_generation = generation;
        true
    }

    pub fn published_generation(&self) -> u64 {
        self.published_generation
    }
}

/// The single in-flight build. Replacing it drops, and so cancels, the older task.
#[derive(Resource, Default)]
pub struct SkyBufferRebuilder {
    in_flight: Option<(u64, Task<SkyBuffer>)>,
}

/// The buffer the renderer and picking read. Swapped whole, never edited.
#[derive(Resource, Debug, Clone, Default)]
pub struct PublishedSkyBuffer {
    buffer: Arc<SkyBuffer>,
    generation: u64,
}

impl PublishedSkyBuffer {
    pub fn buffer(&self) -> &SkyBuffer {
        &self.buffer
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn publish(&mut self, buffer: SkyBuffer, generation: u64) {
        self.buffer = Arc::new(buffer);
        self.generation = generation;
    }
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkyBufferPublished {
    pub generation: u64,
    pub visible_count: usize,
}

pub fn request_sky_rebuild(
    sky_context: Res<SkyContext>,
    sky_catalog: Res<SkyCatalog>,
    settings: Res<SkySettings>,
    mut sequencer: ResMut<RebuildSequencer>,
    mut rebuilder: ResMut<SkyBufferRebuilder>,
) {
    let catalog = sky_catalog.get();
    let parameters = sky_context.build_parameters(&settings);
    let Some(generation) = sequencer.request(SkyBufferKey::new(catalog, parameters)) else {
        return;
    };

    if let Some((stale, _)) = &rebuilder.in_flight {
        debug!("Sky rebuild {} superseded by {}", stale, generation);
    }

    let catalog = catalog.clone();
    let task = AsyncComputeTaskPool::get()
        .spawn(async move { build_sky_buffer(&catalog, &parameters) });
    rebuilder.in_flight = Some((generation, task));
}

pub fn poll_sky_rebuild(
    mut rebuilder: ResMut<SkyBufferRebuilder>,
    mut sequencer: ResMut<RebuildSequencer>,
    mut published: ResMut<PublishedSkyBuffer>,
    mut published_events: EventWriter<SkyBufferPublished>,
) {
    let Some((generation, task)) = rebuilder.in_flight.as_mut() else {
        return;
    };
    let generation = *generation;

    let Some(buffer) = block_on(future::poll_once(task)) else {
        return;
    };
    rebuilder.in_flight = None;

    if !sequencer.try_publish(generation) {
        debug!("Discarding stale sky buffer from rebuild {}", generation);
        return;
    }

    let visible_count = buffer.len();
    published.publish(buffer, generation);
    published_events.write(SkyBufferPublished {
        generation,
        visible_count,
    });
    debug!(
        "Sky buffer {} published with {} visible stars",
        generation, visible_count
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sky::catalog::StarCatalog;
    use crate::sky::projector::SkyProjection;
    use crate::sky::sky_buffer::BuildParameters;

    fn key(catalog: &StarCatalog, moon: f64) -> SkyBufferKey {
        SkyBufferKey::new(
            catalog,
            BuildParameters {
                projection: SkyProjection::FixedEpoch,
                moon_illumination: moon,
                base_limiting_magnitude: 5.5,
                dome_radius: 100.0,
            },
        )
    }

    #[test]
    fn unchanged_inputs_do_not_rebuild() {
        let catalog = StarCatalog::empty();
        let mut sequencer = RebuildSequencer::default();
        assert_eq!(sequencer.request(key(&catalog, 0.0)), Some(1));
        assert_eq!(sequencer.request(key(&catalog, 0.0)), None);
        assert_eq!(sequencer.request(key(&catalog, 0.5)), Some(2));
    }

    #[test]
    fn stale_generation_is_never_published() {
        let catalog = StarCatalog::empty();
        let mut sequencer = RebuildSequencer::default();
        let first = sequencer.request(key(&catalog, 0.0)).unwrap();
        let second = sequencer.request(key(&catalog, 1.0)).unwrap();

        assert!(!sequencer.try_publish(first));
        assert!(sequencer.try_publish(second));
        assert!(!sequencer.try_publish(second));
        assert_eq!(sequencer.published_generation(), second);
    }
}
