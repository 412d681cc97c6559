//! HLS playlist model: enough to tell master from media playlists, pick a
//! variant, and follow a live window. Parsing is delegated to `m3u8-rs`.

use std::time::Duration;

use thiserror::Error;

const HEADER: &str = "#EXTM3U";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlaylistError {
    #[error("missing #EXTM3U header")]
    MissingHeader,
    #[error("malformed playlist: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Playlist {
    Master(MasterPlaylist),
    Media(MediaPlaylist),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MasterPlaylist {
    pub variants: Vec<Variant>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Variant {
    pub uri: String,
    pub bandwidth: Option<u64>,
    pub resolution: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MediaPlaylist {
    pub target_duration: Option<u64>,
    pub media_sequence: u64,
    pub segments: Vec<Segment>,
    /// `#EXT-X-ENDLIST` seen: the playlist will not grow any more.
    pub ended: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub uri: String,
    pub duration: f64,
}

impl MediaPlaylist {
    pub fn is_live(&self) -> bool {
        !self.ended
    }

    /// How long to wait before reloading a live playlist.
    pub fn refresh_interval(&self, floor: Duration) -> Duration {
        let secs = self.target_duration.unwrap_or_else(|| {
            self.segments
                .iter()
                .map(|segment| segment.duration.ceil() as u64)
                .max()
                .unwrap_or(0)
        });
        Duration::from_secs(secs).max(floor)
    }
}

pub fn parse_playlist(text: &str) -> Result<Playlist, PlaylistError> {
    let text = text.trim_start_matches('\u{feff}').trim_start();
    if !text.starts_with(HEADER) {
        return Err(PlaylistError::MissingHeader);
    }

    match m3u8_rs::parse_playlist_res(text.as_bytes()) {
        Ok(m3u8_rs::Playlist::MasterPlaylist(master)) => Ok(Playlist::Master(from_master(master))),
        Ok(m3u8_rs::Playlist::MediaPlaylist(media)) => Ok(Playlist::Media(from_media(media))),
        Err(err) => Err(PlaylistError::Malformed(err.to_string())),
    }
}

fn from_master(master: m3u8_rs::MasterPlaylist) -> MasterPlaylist {
    let variants = master
        .variants
        .into_iter()
        .filter(|variant| !variant.is_i_frame)
        .map(|variant| Variant {
            uri: variant.uri,
            bandwidth: Some(variant.bandwidth),
            resolution: variant
                .resolution
                .map(|resolution| format!("{}x{}", resolution.width, resolution.height)),
        })
        .collect();
    MasterPlaylist { variants }
}

fn from_media(media: m3u8_rs::MediaPlaylist) -> MediaPlaylist {
    let target = media.target_duration as u64;
    MediaPlaylist {
        target_duration: (target > 0).then_some(target),
        media_sequence: media.media_sequence,
        segments: media
            .segments
            .into_iter()
            .map(|segment| Segment {
                uri: segment.uri,
                duration: f64::from(segment.duration),
            })
            .collect(),
        ended: media.end_list,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_interval_falls_back_to_longest_segment() {
        let playlist = MediaPlaylist {
            segments: vec![
                Segment {
                    uri: "a.ts".to_string(),
                    duration: 3.2,
                },
                Segment {
                    uri: "b.ts".to_string(),
                    duration: 5.9,
                },
            ],
            ..MediaPlaylist::default()
        };
        assert_eq!(
            playlist.refresh_interval(Duration::from_secs(1)),
            Duration::from_secs(6)
        );
        assert_eq!(
            MediaPlaylist::default().refresh_interval(Duration::from_secs(1)),
            Duration::from_secs(1)
        );
    }

    #[test]
    fn target_duration_wins_over_segments() {
        let playlist = MediaPlaylist {
            target_duration: Some(4),
            segments: vec![Segment {
                uri: "a.ts".to_string(),
                duration: 9.0,
            }],
            ..MediaPlaylist::default()
        };
        assert_eq!(
            playlist.refresh_interval(Duration::from_secs(1)),
            Duration::from_secs(4)
        );
    }
}
