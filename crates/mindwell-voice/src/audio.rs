//! Uploaded audio clips.

use std::io::Cursor;

use mindwell_core::error::MindError;

/// Container formats accepted by the upload control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Wav,
    Mp3,
}

impl AudioFormat {
    /// Infer the format from the uploaded file name, then the declared
    /// content type. Returns `None` for anything other than WAV or MP3.
    pub fn from_upload(file_name: Option<&str>, content_type: Option<&str>) -> Option<Self> {
        let by_extension = file_name
            .and_then(|name| name.rsplit_once('.'))
            .and_then(|(_, ext)| match ext.to_ascii_lowercase().as_str() {
                "wav" | "wave" => Some(AudioFormat::Wav),
                "mp3" => Some(AudioFormat::Mp3),
                _ => None,
            });
        by_extension.or_else(|| {
            content_type.and_then(|ct| {
                match ct.split(';').next().unwrap_or("").trim().to_ascii_lowercase().as_str() {
                    "audio/wav" | "audio/x-wav" | "audio/wave" | "audio/vnd.wave" => {
                        Some(AudioFormat::Wav)
                    }
                    "audio/mpeg" | "audio/mp3" => Some(AudioFormat::Mp3),
                    _ => None,
                }
            })
        })
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            AudioFormat::Wav => "audio/wav",
            AudioFormat::Mp3 => "audio/mpeg",
        }
    }
}

/// PCM layout read from a WAV header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavLayout {
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
    pub is_float: bool,
}

/// One uploaded recording.
#[derive(Debug, Clone)]
pub struct AudioClip {
    bytes: Vec<u8>,
    format: AudioFormat,
}

impl AudioClip {
    pub fn new(bytes: Vec<u8>, format: AudioFormat) -> Self {
        Self { bytes, format }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn format(&self) -> AudioFormat {
        self.format
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Parse the WAV header. Errors for MP3 clips and malformed WAV data.
    pub fn wav_layout(&self) -> Result<WavLayout, MindError> {
        if self.format != AudioFormat::Wav {
            return Err(MindError::InvalidInput("clip is not WAV".to_string()));
        }
        let reader =
            hound::WavReader::new(Cursor::new(self.bytes.as_slice())).map_err(invalid_wav)?;
        let spec = reader.spec();
        Ok(WavLayout {
            sample_rate: spec.sample_rate,
            channels: spec.channels,
            bits_per_sample: spec.bits_per_sample,
            is_float: spec.sample_format == hound::SampleFormat::Float,
        })
    }

    /// Re-encode a WAV clip as 16-bit integer PCM, keeping rate and channels.
    ///
    /// Clips that are already 16-bit integer PCM are returned unchanged.
    pub fn to_linear16(&self) -> Result<AudioClip, MindError> {
        let layout = self.wav_layout()?;
        if layout.bits_per_sample == 16 && !layout.is_float {
            return Ok(self.clone());
        }

        let mut reader = hound::WavReader::new(Cursor::new(self.bytes.as_slice()))
            .map_err(invalid_wav)?;
        let bits = layout.bits_per_sample;
        let samples: Vec<i16> = if layout.is_float {
            reader
                .samples::<f32>()
                .map(|s| s.map(|v| (v.clamp(-1.0, 1.0) * i16::MAX as f32) as i16))
                .collect::<Result<Vec<i16>, hound::Error>>()
        } else {
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| rescale_to_i16(v, bits)))
                .collect::<Result<Vec<i16>, hound::Error>>()
        }
        .map_err(invalid_wav)?;

        let spec = hound::WavSpec {
            channels: layout.channels,
            sample_rate: layout.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut cursor = Cursor::new(Vec::with_capacity(44 + samples.len() * 2));
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).map_err(invalid_wav)?;
            for sample in samples {
                writer.write_sample(sample).map_err(invalid_wav)?;
            }
            writer.finalize().map_err(invalid_wav)?;
        }
        Ok(AudioClip::new(cursor.into_inner(), AudioFormat::Wav))
    }
}

fn rescale_to_i16(sample: i32, bits: u16) -> i16 {
    if bits > 16 {
        (sample >> (bits - 16)) as i16
    } else {
        (sample << (16 - bits)) as i16
    }
}

fn invalid_wav(e: hound::Error) -> MindError {
    MindError::InvalidInput(format!("invalid WAV data: {}", e))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Build an in-memory 16-bit mono WAV with `samples` zero samples.
    pub(crate) fn wav_bytes(sample_rate: u32, samples: usize) -> Vec<u8> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
            for _ in 0..samples {
                writer.write_sample(0i16).unwrap();
            }
            writer.finalize().unwrap();
        }
        cursor.into_inner()
    }

    /// Build an in-memory mono WAV of any integer width from raw samples.
    pub(crate) fn wav_int_bytes(bits_per_sample: u16, samples: &[i32]) -> Vec<u8> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 16000,
            bits_per_sample,
            sample_format: hound::SampleFormat::Int,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
            for &s in samples {
                writer.write_sample(s).unwrap();
            }
            writer.finalize().unwrap();
        }
        cursor.into_inner()
    }

    /// Decode a WAV produced by `to_linear16` back into its samples.
    pub(crate) fn read_i16(bytes: &[u8]) -> (hound::WavSpec, Vec<i16>) {
        let mut reader = hound::WavReader::new(Cursor::new(bytes)).unwrap();
        let spec = reader.spec();
        let samples = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        (spec, samples)
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(AudioFormat::from_upload(Some("note.wav"), None), Some(AudioFormat::Wav));
        assert_eq!(AudioFormat::from_upload(Some("NOTE.MP3"), None), Some(AudioFormat::Mp3));
        assert_eq!(AudioFormat::from_upload(Some("note.ogg"), None), None);
    }

    #[test]
    fn test_format_from_content_type() {
        assert_eq!(
            AudioFormat::from_upload(None, Some("audio/x-wav")),
            Some(AudioFormat::Wav)
        );
        assert_eq!(
            AudioFormat::from_upload(Some("blob"), Some("audio/mpeg; charset=binary")),
            Some(AudioFormat::Mp3)
        );
        assert_eq!(AudioFormat::from_upload(None, Some("video/mp4")), None);
        assert_eq!(AudioFormat::from_upload(None, None), None);
    }

    #[test]
    fn test_extension_wins_over_content_type() {
        assert_eq!(
            AudioFormat::from_upload(Some("a.mp3"), Some("audio/wav")),
            Some(AudioFormat::Mp3)
        );
    }

    #[test]
    fn test_wav_layout() {
        let clip = AudioClip::new(wav_bytes(16000, 160), AudioFormat::Wav);
        let layout = clip.wav_layout().unwrap();
        assert_eq!(layout.sample_rate, 16000);
        assert_eq!(layout.channels, 1);
        assert_eq!(layout.bits_per_sample, 16);
    }

    #[test]
    fn test_linear16_keeps_16_bit_clip() {
        let bytes = wav_bytes(16000, 32);
        let clip = AudioClip::new(bytes.clone(), AudioFormat::Wav);
        assert_eq!(clip.to_linear16().unwrap().bytes(), bytes.as_slice());
    }

    #[test]
    fn test_linear16_from_wider_and_narrower_ints() {
        let clip = AudioClip::new(wav_int_bytes(24, &[0x12_3456, -0x40_0000]), AudioFormat::Wav);
        let (spec, samples) = read_i16(clip.to_linear16().unwrap().bytes());
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(spec.sample_rate, 16000);
        assert_eq!(samples, vec![0x1234, -0x4000]);

        let clip = AudioClip::new(wav_int_bytes(32, &[0x7fff_0000, i32::MIN]), AudioFormat::Wav);
        let (_, samples) = read_i16(clip.to_linear16().unwrap().bytes());
        assert_eq!(samples, vec![0x7fff, -0x8000]);

        let clip = AudioClip::new(wav_int_bytes(8, &[64, -128]), AudioFormat::Wav);
        let (_, samples) = read_i16(clip.to_linear16().unwrap().bytes());
        assert_eq!(samples, vec![64 << 8, -0x8000]);
    }

    #[test]
    fn test_linear16_from_float() {
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 22050,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
            for s in [1.0f32, -1.0, 0.0, 2.0] {
                writer.write_sample(s).unwrap();
            }
            writer.finalize().unwrap();
        }
        let clip = AudioClip::new(cursor.into_inner(), AudioFormat::Wav);
        let (spec, samples) = read_i16(clip.to_linear16().unwrap().bytes());
        assert_eq!(spec.channels, 2);
        assert_eq!(spec.sample_rate, 22050);
        assert_eq!(samples, vec![i16::MAX, -i16::MAX, 0, i16::MAX]);
    }

    #[test]
    fn test_wav_layout_rejects_garbage() {
        let clip = AudioClip::new(b"not a wav file".to_vec(), AudioFormat::Wav);
        assert!(clip.wav_layout().is_err());
    }

    #[test]
    fn test_wav_layout_rejects_mp3() {
        let clip = AudioClip::new(vec![0xFF, 0xFB, 0x90], AudioFormat::Mp3);
        assert!(clip.wav_layout().is_err());
        assert_eq!(clip.format().mime_type(), "audio/mpeg");
    }
}
