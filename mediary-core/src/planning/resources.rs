//! Resource classification of planned stream work.
//!
//! Tags are informational: they describe which resources a plan will lean on
//! (writing a new stream to disk, running an encoder on the processor) and are
//! surfaced in logs and reports. They never gate execution.

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

use crate::media::CodecType;
use crate::planning::plan::TranscodePlan;

/// A resource a stream decision consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Disk,
    Processor,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Disk => f.write_str("disk"),
            Resource::Processor => f.write_str("processor"),
        }
    }
}

/// An ordered set of resources.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResourceSet(BTreeSet<Resource>);

impl ResourceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tags for a stream that is re-encoded.
    ///
    /// Every encode writes a new stream; video encodes are also the
    /// processor-heavy part of a conversion.
    #[must_use]
    pub fn for_transcode(codec_type: CodecType) -> Self {
        let mut set = Self::from_iter([Resource::Disk]);
        if codec_type == CodecType::Video {
            set.insert(Resource::Processor);
        }
        set
    }

    pub fn insert(&mut self, resource: Resource) {
        self.0.insert(resource);
    }

    pub fn contains(&self, resource: Resource) -> bool {
        self.0.contains(&resource)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn extend(&mut self, other: &ResourceSet) {
        self.0.extend(other.0.iter().copied());
    }

    pub fn iter(&self) -> impl Iterator<Item = Resource> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Resource> for ResourceSet {
    fn from_iter<I: IntoIterator<Item = Resource>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for ResourceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("none");
        }
        let names: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&names.join("+"))
    }
}

/// Computes the union of every stream's tags and the synthesized stream's tags.
pub fn classify(plan: &TranscodePlan) -> ResourceSet {
    let mut summary = ResourceSet::new();
    for stream in &plan.streams {
        summary.extend(&stream.resources);
    }
    if let Some(synthesized) = &plan.synthesized {
        summary.extend(&synthesized.resources);
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcode_tags() {
        assert_eq!(ResourceSet::for_transcode(CodecType::Video).to_string(), "disk+processor");
        assert_eq!(ResourceSet::for_transcode(CodecType::Audio).to_string(), "disk");
    }

    #[test]
    fn test_empty_set_displays_none() {
        assert_eq!(ResourceSet::new().to_string(), "none");
    }

    #[test]
    fn test_extend_is_a_union() {
        let mut set = ResourceSet::from_iter([Resource::Disk]);
        set.extend(&ResourceSet::for_transcode(CodecType::Video));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![Resource::Disk, Resource::Processor]);
    }
}
