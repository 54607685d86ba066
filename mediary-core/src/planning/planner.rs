// ============================================================================
// mediary-core/src/planning/planner.rs
// ============================================================================
//
// TRANSCODE PLANNER: Per-stream decision engine
//
// This module decides, for every input stream, whether it is copied,
// re-encoded or dropped, and whether an extra audio stream has to be remixed
// from an existing one to satisfy a channel-count requirement.
//
// KEY COMPONENTS:
// - plan: Inventory + RequirementSet -> TranscodePlan
// - Subtitle class guard (bitmap vs. text)
// - Container guard (static compatibility table)
// - Channel-count synthesis post-pass
//
// Planning is deterministic and performs no I/O; warnings are logged and
// recorded on the plan.

// ---- Internal crate imports ----
use crate::media::{CodecType, Inventory, StreamDescriptor};
use crate::planning::compatibility;
use crate::planning::plan::{
    PlanWarning, PlannedStream, StreamAction, StreamOption, SynthesizedStream, TranscodePlan,
    WarningKind,
};
use crate::planning::resources::{self, Resource, ResourceSet};
use crate::requirements::RequirementSet;

/// Reason recorded on streams dropped by the container guard.
pub const UNSUPPORTED_IN_CONTAINER: &str = "codec unsupported in container";

/// Builds a transcode plan for an inventory.
///
/// # Arguments
///
/// * `inventory` - The probed input streams
/// * `requirements` - The resolved output requirements
///
/// # Returns
///
/// * `TranscodePlan` - Exactly one action per input stream, plus at most one
///   synthesized stream
pub fn plan(inventory: &Inventory, requirements: &RequirementSet) -> TranscodePlan {
    let container = requirements.container_format.as_deref();
    let mut warnings = Vec::new();
    let mut streams = Vec::with_capacity(inventory.streams.len());
    let mut next_output_index = 0u32;

    for stream in &inventory.streams {
        let (action, warning) = decide(stream, requirements, container);
        if let Some(warning) = warning {
            warnings.push(warning);
        }

        let output_index = match action {
            StreamAction::Drop { .. } => None,
            _ => {
                let index = next_output_index;
                next_output_index += 1;
                Some(index)
            }
        };

        let stream_resources = match &action {
            StreamAction::Transcode { .. } => ResourceSet::for_transcode(stream.codec_type),
            _ => ResourceSet::new(),
        };

        log::debug!(
            "Stream {} ({} {}): {}",
            stream.index,
            stream.codec_type,
            stream.codec_name,
            action
        );

        streams.push(PlannedStream {
            input_index: stream.index,
            codec_type: stream.codec_type,
            source_codec: stream.codec_name.clone(),
            source_pixel_format: stream.pixel_format.clone(),
            output_index,
            action,
            resources: stream_resources,
        });
    }

    let synthesized = synthesize_channels(
        inventory,
        requirements,
        &streams,
        next_output_index,
        &mut warnings,
    );

    for warning in &warnings {
        log::warn!("{warning}");
    }

    let remux_required = match (container, inventory.format_name.as_deref()) {
        (None, _) => false,
        (Some(container), Some(format_name)) => {
            !compatibility::format_matches_container(format_name, container)
        }
        (Some(_), None) => true,
    };

    let mut plan = TranscodePlan {
        streams,
        synthesized,
        resources: ResourceSet::new(),
        warnings,
        container_format: requirements.container_format.clone(),
        remux_required,
        output_options: requirements.output_option_tokens(),
    };
    plan.resources = resources::classify(&plan);
    plan
}

fn decide(
    stream: &StreamDescriptor,
    requirements: &RequirementSet,
    container: Option<&str>,
) -> (StreamAction, Option<PlanWarning>) {
    let desired = requirements
        .codec_for(stream.codec_type)
        .unwrap_or(&stream.codec_name);

    if stream.codec_type == CodecType::Subtitle
        && compatibility::crosses_subtitle_class(&stream.codec_name, desired)
    {
        let warning = PlanWarning {
            stream_index: Some(stream.index),
            kind: WarningKind::SubtitleClassMismatch {
                current: stream.codec_name.clone(),
                desired: desired.to_string(),
            },
        };
        return (StreamAction::Copy, Some(warning));
    }

    if let Some(container) = container {
        if !compatibility::container_supports(container, stream.codec_type, desired) {
            let warning = PlanWarning {
                stream_index: Some(stream.index),
                kind: WarningKind::UnsupportedInContainer {
                    codec: desired.to_string(),
                    container: container.to_string(),
                },
            };
            let action = StreamAction::Drop {
                reason: UNSUPPORTED_IN_CONTAINER.to_string(),
            };
            return (action, Some(warning));
        }
    }

    if stream.codec_name != desired {
        let mut options = Vec::new();
        if stream.codec_type == CodecType::Video {
            if let Some(pixel_format) = requirements.pixel_format.as_deref() {
                if stream.pixel_format.as_deref() != Some(pixel_format) {
                    options.push(StreamOption::new("pix_fmt", pixel_format));
                }
            }
        }
        let action = StreamAction::Transcode {
            codec: desired.to_string(),
            options,
        };
        return (action, None);
    }

    (StreamAction::Copy, None)
}

/// Appends a remixed audio stream when no kept audio stream has the required
/// channel count.
fn synthesize_channels(
    inventory: &Inventory,
    requirements: &RequirementSet,
    planned: &[PlannedStream],
    output_index: u32,
    warnings: &mut Vec<PlanWarning>,
) -> Option<SynthesizedStream> {
    let channel_count = requirements.channel_count?;

    // `planned` holds one entry per inventory stream, in the same order.
    let satisfied = inventory
        .streams
        .iter()
        .zip(planned)
        .any(|(stream, planned)| {
            stream.codec_type == CodecType::Audio
                && !planned.is_dropped()
                && stream.channel_count == Some(channel_count)
        });
    if satisfied {
        return None;
    }

    // Highest channel count wins; the first stream wins ties.
    let mut source: Option<&StreamDescriptor> = None;
    for stream in inventory.streams_of(CodecType::Audio) {
        let count = stream.channel_count.unwrap_or(0);
        if source.is_none_or(|best| count > best.channel_count.unwrap_or(0)) {
            source = Some(stream);
        }
    }

    let Some(source) = source else {
        warnings.push(PlanWarning {
            stream_index: None,
            kind: WarningKind::NoSynthesisSource { channel_count },
        });
        return None;
    };

    Some(SynthesizedStream {
        source_index: source.index,
        output_index,
        codec: requirements.codec_for(CodecType::Audio).map(str::to_string),
        channel_count,
        resources: ResourceSet::from_iter([Resource::Disk]),
    })
}
