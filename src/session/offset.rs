//! Byte offset reprojection across content transformations.
//!
//! A transformation that deletes spans and inserts separators records the
//! spans it kept verbatim. Offsets computed against its input can then be
//! moved onto its output. Chained transformations compose their mappers
//! without either one being modified.

/// A span of source bytes copied verbatim into the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub src_start: usize,
    /// Exclusive.
    pub src_end: usize,
    pub dst_start: usize,
}

impl Region {
    pub fn len(&self) -> usize {
        self.src_end - self.src_start
    }

    pub fn is_empty(&self) -> bool {
        self.src_end == self.src_start
    }
}

/// Anything that moves a source offset to a destination offset.
pub trait MapOffset {
    fn map(&self, src_offset: usize) -> usize;

    /// Apply `self`, then `next`.
    fn then<M: MapOffset>(self, next: M) -> Composed<Self, M>
    where
        Self: Sized,
    {
        Composed { first: self, second: next }
    }
}

/// Preserved regions of one transformation pass.
///
/// Regions are sorted by `src_start` and never overlap; source bytes not
/// covered by any region were deleted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OffsetMapper {
    regions: Vec<Region>,
    dst_len: usize,
}

impl OffsetMapper {
    /// Mapper for a pass that changed nothing.
    pub fn identity(len: usize) -> Self {
        let mut builder = MapperBuilder::default();
        builder.preserve(0, len, 0);
        builder.finish(len)
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Length of the transformed content.
    pub fn dst_len(&self) -> usize {
        self.dst_len
    }
}

impl MapOffset for OffsetMapper {
    /// Offsets inside a preserved region translate exactly. Offsets in a
    /// deleted span land on the start of the next preserved region, and
    /// offsets past the last region land on the end of the output.
    fn map(&self, src_offset: usize) -> usize {
        if self.regions.is_empty() {
            return 0;
        }
        let idx = self.regions.partition_point(|r| r.src_end <= src_offset);
        match self.regions.get(idx) {
            Some(r) if src_offset >= r.src_start => r.dst_start + (src_offset - r.src_start),
            Some(r) => r.dst_start,
            None => self.dst_len,
        }
    }
}

impl<F: Fn(usize) -> usize> MapOffset for F {
    fn map(&self, src_offset: usize) -> usize {
        self(src_offset)
    }
}

/// Two mappers applied in sequence.
#[derive(Debug, Clone)]
pub struct Composed<A, B> {
    first: A,
    second: B,
}

impl<A: MapOffset, B: MapOffset> MapOffset for Composed<A, B> {
    fn map(&self, src_offset: usize) -> usize {
        self.second.map(self.first.map(src_offset))
    }
}

/// Collects regions while a pass writes its output.
#[derive(Debug, Default)]
pub(crate) struct MapperBuilder {
    regions: Vec<Region>,
}

impl MapperBuilder {
    /// Record `src_start..src_end` as copied to `dst_start`. Empty spans are
    /// skipped and a span continuing the previous one is merged into it.
    pub(crate) fn preserve(&mut self, src_start: usize, src_end: usize, dst_start: usize) {
        if src_end <= src_start {
            return;
        }
        if let Some(last) = self.regions.last_mut() {
            debug_assert!(last.src_end <= src_start, "regions must ascend");
            if last.src_end == src_start && last.dst_start + last.len() == dst_start {
                last.src_end = src_end;
                return;
            }
        }
        self.regions.push(Region {
            src_start,
            src_end,
            dst_start,
        });
    }

    pub(crate) fn finish(self, dst_len: usize) -> OffsetMapper {
        OffsetMapper {
            regions: self.regions,
            dst_len,
        }
    }
}
