//! MP3 streams of silent Layer III frames behind an ID3v2.3 tag.
//!
//! The tag carries the title (`TIT2`) and the full text as unsynchronised
//! lyrics (`USLT`). Playback length follows the text length at a reading
//! pace of about fifteen characters per second.

use crate::types::Mp3Generator;

const CHARS_PER_SECOND: usize = 15;
const MIN_DURATION_MS: u64 = 1_000;
const MAX_DURATION_MS: u64 = 600_000;

struct FrameProfile {
    header: [u8; 4],
    length: usize,
    samples: u64,
    sample_rate: u64,
}

impl FrameProfile {
    fn for_generator(generator: Mp3Generator) -> Self {
        match generator {
            // MPEG-1, 128 kbit/s, 44.1 kHz, mono
            Mp3Generator::Cbr128k => Self {
                header: [0xFF, 0xFB, 0x90, 0xC4],
                length: 417,
                samples: 1152,
                sample_rate: 44_100,
            },
            // MPEG-2, 32 kbit/s, 22.05 kHz, mono
            Mp3Generator::Cbr32k => Self {
                header: [0xFF, 0xF3, 0x40, 0xC4],
                length: 104,
                samples: 576,
                sample_rate: 22_050,
            },
        }
    }

    fn frames_for(&self, duration_ms: u64) -> u64 {
        (duration_ms * self.sample_rate).div_ceil(self.samples * 1000)
    }

    fn frame(&self) -> Vec<u8> {
        let mut frame = vec![0u8; self.length];
        frame[..4].copy_from_slice(&self.header);
        frame
    }
}

/// Playback length for `text`, in milliseconds.
pub fn duration_ms(text: &str) -> u64 {
    let seconds_ms = (text.chars().count() * 1000 / CHARS_PER_SECOND) as u64;
    seconds_ms.clamp(MIN_DURATION_MS, MAX_DURATION_MS)
}

fn syncsafe(value: usize) -> [u8; 4] {
    [
        ((value >> 21) & 0x7F) as u8,
        ((value >> 14) & 0x7F) as u8,
        ((value >> 7) & 0x7F) as u8,
        (value & 0x7F) as u8,
    ]
}

/// UTF-16 with byte order mark, as ID3v2.3 encoding `0x01` expects.
fn utf16(text: &str, terminate: bool) -> Vec<u8> {
    let mut out = vec![0xFF, 0xFE];
    for unit in text.encode_utf16() {
        out.extend_from_slice(&unit.to_le_bytes());
    }
    if terminate {
        out.extend_from_slice(&[0, 0]);
    }
    out
}

fn id3_frame(id: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(10 + payload.len());
    out.extend_from_slice(id);
    out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    out.extend_from_slice(&[0, 0]);
    out.extend_from_slice(payload);
    out
}

fn id3_tag(title: &str, lyrics: &str) -> Vec<u8> {
    let mut title_payload = vec![0x01];
    title_payload.extend(utf16(title, false));

    let mut lyrics_payload = vec![0x01];
    lyrics_payload.extend_from_slice(b"eng");
    lyrics_payload.extend(utf16("", true));
    lyrics_payload.extend(utf16(lyrics, false));

    let mut frames = id3_frame(b"TIT2", &title_payload);
    frames.extend(id3_frame(b"USLT", &lyrics_payload));

    let mut tag = b"ID3\x03\x00\x00".to_vec();
    tag.extend_from_slice(&syncsafe(frames.len()));
    tag.extend(frames);
    tag
}

/// Complete MP3 file for `lyrics`.
pub fn mp3(generator: Mp3Generator, title: &str, lyrics: &str) -> Vec<u8> {
    let profile = FrameProfile::for_generator(generator);
    let frames = profile.frames_for(duration_ms(lyrics));
    let frame = profile.frame();

    let mut out = id3_tag(title, lyrics);
    out.reserve(frame.len() * frames as usize);
    for _ in 0..frames {
        out.extend_from_slice(&frame);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag_len(bytes: &[u8]) -> usize {
        let size = &bytes[6..10];
        10 + ((size[0] as usize) << 21 | (size[1] as usize) << 14 | (size[2] as usize) << 7 | size[3] as usize)
    }

    #[test]
    fn test_stream_starts_with_tag_then_frame_sync() {
        for generator in [Mp3Generator::Cbr128k, Mp3Generator::Cbr32k] {
            let bytes = mp3(generator, "Title", "some lyrics");
            assert_eq!(&bytes[..3], b"ID3");
            let audio = &bytes[tag_len(&bytes)..];
            assert_eq!(audio[0], 0xFF);
            assert_eq!(audio[1] & 0xE0, 0xE0);
        }
    }

    #[test]
    fn test_frames_are_evenly_sized() {
        let bytes = mp3(Mp3Generator::Cbr128k, "t", &"a".repeat(150));
        let audio = &bytes[tag_len(&bytes)..];
        assert_eq!(audio.len() % 417, 0);
        // ten seconds of audio
        assert_eq!(audio.len() / 417, 383);
        assert!(audio.chunks(417).all(|f| f[..4] == [0xFF, 0xFB, 0x90, 0xC4]));
    }

    #[test]
    fn test_duration_is_clamped() {
        assert_eq!(duration_ms(""), MIN_DURATION_MS);
        assert_eq!(duration_ms(&"a".repeat(30)), 2_000);
        assert_eq!(duration_ms(&"a".repeat(1_000_000)), MAX_DURATION_MS);
    }

    #[test]
    fn test_lyrics_are_in_tag() {
        let bytes = mp3(Mp3Generator::Cbr32k, "t", "hi");
        let needle = utf16("hi", false);
        let tag = &bytes[..tag_len(&bytes)];
        assert!(tag.windows(needle.len()).any(|w| w == needle.as_slice()));
        assert!(tag.windows(4).any(|w| w == b"USLT"));
    }
}
