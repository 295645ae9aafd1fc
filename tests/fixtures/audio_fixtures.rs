//! Audio Test Fixtures
//!
//! Generated payloads standing in for real recordings:
//! - WAV voice samples (16 kHz, 16-bit mono sine tone)
//! - MP3-looking synthesized speech (ID3 tag plus frame sync bytes)
//! - A PNG image for type-rejection checks
//! - Oversized uploads for size-limit checks

use std::f32::consts::PI;

use bytes::Bytes;
use odiadev_client::AudioUpload;

/// Sample rate of generated WAV fixtures
pub const SAMPLE_RATE: u32 = 16000;

/// One second of samples at 16 kHz
pub const SECOND: usize = 16000;

pub const MIB: usize = 1024 * 1024;

/// Generate a sine wave tone
pub fn generate_sine_wave(duration_samples: usize, frequency: f32, amplitude: f32) -> Vec<i16> {
    let max_amplitude = amplitude * i16::MAX as f32;
    let angular_freq = 2.0 * PI * frequency / SAMPLE_RATE as f32;

    (0..duration_samples)
        .map(|i| ((angular_freq * i as f32).sin() * max_amplitude) as i16)
        .collect()
}

/// Create a complete mono 16-bit PCM WAV file
pub fn create_wav_file(samples: &[i16]) -> Vec<u8> {
    let data_size = (samples.len() * 2) as u32;
    let byte_rate = SAMPLE_RATE * 2;

    let mut wav = Vec::with_capacity(44 + samples.len() * 2);
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(data_size + 36).to_le_bytes());
    wav.extend_from_slice(b"WAVE");

    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
    wav.extend_from_slice(&1u16.to_le_bytes()); // mono
    wav.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
    wav.extend_from_slice(&byte_rate.to_le_bytes());
    wav.extend_from_slice(&2u16.to_le_bytes());
    wav.extend_from_slice(&16u16.to_le_bytes());

    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_size.to_le_bytes());
    for sample in samples {
        wav.extend_from_slice(&sample.to_le_bytes());
    }
    wav
}

/// One second of A440 as a WAV voice sample
pub fn voice_sample_wav() -> Vec<u8> {
    create_wav_file(&generate_sine_wave(SECOND, 440.0, 0.5))
}

/// Bytes shaped like an MP3 file, as returned by generate-speech
pub fn synthesized_mp3() -> Bytes {
    let mut mp3 = b"ID3\x04\x00\x00\x00\x00\x00\x00".to_vec();
    for _ in 0..32 {
        mp3.extend_from_slice(&[0xFF, 0xFB, 0x90, 0x64]);
        mp3.extend_from_slice(&[0u8; 60]);
    }
    Bytes::from(mp3)
}

/// Minimal PNG signature plus IHDR chunk
pub fn png_image() -> Vec<u8> {
    let mut png = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    png.extend_from_slice(&13u32.to_be_bytes());
    png.extend_from_slice(b"IHDR");
    png.extend_from_slice(&[0u8; 17]);
    png
}

pub fn wav_upload() -> AudioUpload {
    AudioUpload::new("sample.wav", "audio/wav", voice_sample_wav())
}

pub fn png_upload() -> AudioUpload {
    AudioUpload::new("photo.png", "image/png", png_image())
}

/// An audio upload of `size` bytes
pub fn sized_upload(size: usize) -> AudioUpload {
    AudioUpload::new("long.mp3", "audio/mpeg", vec![0u8; size])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wav_file_creation() {
        let wav = voice_sample_wav();
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");
        assert_eq!(wav.len(), 44 + SECOND * 2);
    }

    #[test]
    fn test_mp3_fixture_has_id3_tag() {
        assert!(synthesized_mp3().starts_with(b"ID3"));
    }
}
