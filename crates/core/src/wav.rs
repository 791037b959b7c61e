//! Wraps raw PCM from the speech endpoint into a playable WAV container.

use std::io::Cursor;

use base64::{Engine, engine::general_purpose::STANDARD as BASE64_STANDARD};

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PcmSpec {
    pub sample_rate: u32,
    pub channels: u16,
}

impl Default for PcmSpec {
    /// Gemini TTS output: 24 kHz, mono, signed 16-bit little-endian.
    fn default() -> Self {
        Self {
            sample_rate: 24_000,
            channels: 1,
        }
    }
}

pub fn decode_base64_audio(data: &str) -> Result<Vec<u8>> {
    Ok(BASE64_STANDARD.decode(data.trim())?)
}

/// Encodes little-endian 16-bit PCM as a RIFF/WAVE file. A dangling odd byte is dropped.
pub fn pcm16_to_wav(pcm: &[u8], spec: PcmSpec) -> Result<Vec<u8>> {
    let wav_spec = hound::WavSpec {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::with_capacity(pcm.len() + 44));
    {
        let mut writer = hound::WavWriter::new(&mut cursor, wav_spec)?;
        for chunk in pcm.chunks_exact(2) {
            writer.write_sample(i16::from_le_bytes([chunk[0], chunk[1]]))?;
        }
        writer.finalize()?;
    }
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_describes_pcm() {
        let pcm: Vec<u8> = [0i16, 1000, -1000, i16::MAX]
            .iter()
            .flat_map(|s| s.to_le_bytes())
            .collect();
        let wav = pcm16_to_wav(&pcm, PcmSpec::default()).unwrap();

        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");
        assert_eq!(wav.len(), 44 + pcm.len());

        let mut reader = hound::WavReader::new(Cursor::new(wav)).unwrap();
        assert_eq!(reader.spec().sample_rate, 24_000);
        assert_eq!(reader.spec().channels, 1);
        let samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(samples, vec![0, 1000, -1000, i16::MAX]);
    }

    #[test]
    fn odd_trailing_byte_is_dropped() {
        let wav = pcm16_to_wav(&[1, 0, 7], PcmSpec::default()).unwrap();
        assert_eq!(wav.len(), 44 + 2);
    }

    #[test]
    fn decodes_base64_payload() {
        assert_eq!(decode_base64_audio("AQID\n").unwrap(), vec![1, 2, 3]);
        assert!(decode_base64_audio("***").is_err());
    }
}
