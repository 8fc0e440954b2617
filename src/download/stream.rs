//! Stream descriptors and the selection / size policy applied to them.

/// Container Telegram plays inline
pub const PLAYABLE_CONTAINER: &str = "mp4";

/// One downloadable rendition of a video
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamDescriptor {
    /// Provider format id (yt-dlp `format_id`), used to request the transfer
    pub format_id: String,
    /// Container extension, e.g. `mp4`, `webm`
    pub container: String,
    /// Audio and video muxed into one file
    pub progressive: bool,
    /// Vertical resolution in pixels; only used for ranking
    pub height: Option<u32>,
    /// Exact or approximate byte size, when the provider knows it
    pub size_bytes: Option<u64>,
}

impl StreamDescriptor {
    pub fn is_playable_progressive(&self) -> bool {
        self.progressive && self.container.eq_ignore_ascii_case(PLAYABLE_CONTAINER)
    }

    /// Eligible for transfer only when the size is known and within `limit`
    pub fn fits_within(&self, limit: u64) -> bool {
        self.size_bytes.is_some_and(|size| size <= limit)
    }
}

/// Picks the highest-resolution progressive MP4 stream.
///
/// Ties keep the earliest stream in provider order.
pub fn select_best_stream(streams: &[StreamDescriptor]) -> Option<&StreamDescriptor> {
    streams
        .iter()
        .filter(|stream| stream.is_playable_progressive())
        .fold(None, |best: Option<&StreamDescriptor>, candidate| match best {
            Some(current) if current.height.unwrap_or(0) >= candidate.height.unwrap_or(0) => Some(current),
            _ => Some(candidate),
        })
}
