//! Transcode planning.
//!
//! This module contains the decision engine that maps an input inventory and a
//! requirement set onto a [`TranscodePlan`], along with the static
//! compatibility tables it consults and the resource classification of the
//! resulting work.

pub mod compatibility;
pub mod plan;
pub mod planner;
pub mod resources;

pub use plan::{
    PlanWarning, PlannedStream, StreamAction, StreamOption, SynthesizedStream, TranscodePlan,
    WarningKind,
};
pub use planner::plan;
pub use resources::{Resource, ResourceSet, classify};
