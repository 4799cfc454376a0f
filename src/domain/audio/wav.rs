//! WAV encoding helpers for provider PCM output.

use hound::{SampleFormat, WavSpec, WavWriter};
use std::io::Cursor;

/// Mono 16-bit integer PCM at the given rate
pub fn mono_pcm16_spec(sample_rate: u32) -> WavSpec {
    WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    }
}

/// Encode mono 16-bit samples as an in-memory WAV file
pub fn encode_pcm16(samples: &[i16], sample_rate: u32) -> Result<Vec<u8>, hound::Error> {
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut cursor, mono_pcm16_spec(sample_rate))?;
        for &sample in samples {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;
    }
    Ok(cursor.into_inner())
}

/// Decode raw little-endian 16-bit PCM. A trailing odd byte is dropped.
pub fn pcm16_from_le_bytes(bytes: &[u8]) -> Vec<i16> {
    bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect()
}

/// Wrap raw little-endian 16-bit mono PCM in a WAV container
pub fn wrap_pcm16_le(bytes: &[u8], sample_rate: u32) -> Result<Vec<u8>, hound::Error> {
    encode_pcm16(&pcm16_from_le_bytes(bytes), sample_rate)
}

/// "16000Hz/1ch/16bit int"
pub fn describe_spec(spec: &WavSpec) -> String {
    let format = match spec.sample_format {
        SampleFormat::Int => "int",
        SampleFormat::Float => "float",
    };
    format!(
        "{}Hz/{}ch/{}bit {}",
        spec.sample_rate, spec.channels, spec.bits_per_sample, format
    )
}
