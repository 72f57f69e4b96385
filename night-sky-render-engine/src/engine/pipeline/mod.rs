//! Event-driven sky buffer rebuilds.
//!
//! Host inputs live in [`sky_context::SkyContext`]. Whenever the derived
//! [`SkyBufferKey`](crate::sky::sky_buffer::SkyBufferKey) changes a new build
//! runs on the async compute pool; completed builds publish atomically into
//! [`rebuild::PublishedSkyBuffer`] in request order.

use crate::engine::core::sky_settings::SkySettings;
use bevy::prelude::*;

pub mod rebuild;
pub mod sky_context;

use rebuild::{
    PublishedSkyBuffer, RebuildSequencer, SkyBufferPublished, SkyBufferRebuilder,
    poll_sky_rebuild, request_sky_rebuild,
};
use sky_context::{ObservationTimeline, SkyCatalog, SkyContext, sync_timeline_to_context};

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct SkyPipelineSet;

pub struct SkyPipelinePlugin;

impl Plugin for SkyPipelinePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SkySettings>()
            .init_resource::<SkyContext>()
            .init_resource::<SkyCatalog>()
            .init_resource::<ObservationTimeline>()
            .init_resource::<RebuildSequencer>()
            .init_resource::<SkyBufferRebuilder>()
            .init_resource::<PublishedSkyBuffer>()
            .add_event::<SkyBufferPublished>()
            .add_systems(
                Update,
                (sync_timeline_to_context, request_sky_rebuild, poll_sky_rebuild)
                    .chain()
                    .in_set(SkyPipelineSet),
            );
    }
}
