//! Integration tests for the separation engine

use std::f32::consts::PI;
use std::io::Cursor;
use stratum_hpss::io::SampleStream;
use stratum_hpss::{
    remove_vocals_audio, separate_audio, HpssConfig, HpssEngine, MaskType, NoProgress,
    ProgressControl, ProgressInfo, SeparationError, SeparationFlag, SeparationParams,
    VocalRemovalParams,
};

const SAMPLE_RATE: u32 = 44100;

fn sine(freq: f32, amplitude: f32, len: usize) -> Vec<f32> {
    (0..len)
        .map(|i| amplitude * (2.0 * PI * freq * i as f32 / SAMPLE_RATE as f32).sin())
        .collect()
}

/// Unit clicks every `spacing` samples, starting at `first`
fn click_track(first: usize, spacing: usize, len: usize) -> Vec<f32> {
    let mut samples = vec![0.0f32; len];
    for i in (first..len).step_by(spacing) {
        samples[i] = 1.0;
    }
    samples
}

fn energy(samples: &[f32]) -> f64 {
    samples.iter().map(|&x| (x as f64) * (x as f64)).sum()
}

fn unit_gain(mask: MaskType) -> SeparationParams {
    SeparationParams {
        frame_size: 512,
        mask,
        gain: 1.0,
    }
}

/// Encode mono f32 samples as an in-memory WAV and decode them again
fn wav_round_trip(samples: &[f32]) -> Result<Vec<f32>, Box<dyn std::error::Error>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)?;
        for &s in samples {
            writer.write_sample(s)?;
        }
        writer.finalize()?;
    }
    cursor.set_position(0);
    let mut reader = hound::WavReader::new(cursor)?;
    let decoded = reader.samples::<f32>().collect::<Result<Vec<_>, _>>()?;
    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_length_preserved() {
        let params = SeparationParams {
            frame_size: 256,
            ..Default::default()
        };
        for &len in &[1usize, 127, 128, 129, 5000] {
            let samples = sine(220.0, 0.3, len);
            let result = separate_audio(&samples, &HpssConfig::default(), &params)
                .expect("Separation should succeed");
            assert_eq!(result.harmonic.len(), len);
            assert_eq!(result.percussive.len(), len);
        }
    }

    #[test]
    fn test_empty_input() {
        let result = separate_audio(&[], &HpssConfig::default(), &SeparationParams::default())
            .expect("Empty input is valid");
        assert!(result.harmonic.is_empty());
        assert!(result.percussive.is_empty());
        assert_eq!(result.metadata.steps, 0);
    }

    #[test]
    fn test_silence_stays_silent() {
        let samples = vec![0.0f32; 8000];
        for mask in [MaskType::Binary, MaskType::Wiener] {
            let result = separate_audio(&samples, &HpssConfig::default(), &unit_gain(mask))
                .expect("Separation should succeed");
            assert!(result.harmonic.iter().all(|&x| x == 0.0));
            assert!(result.percussive.iter().all(|&x| x == 0.0));
        }
    }

    #[test]
    fn test_steady_tone_is_harmonic() {
        let samples = sine(440.0, 0.5, SAMPLE_RATE as usize / 2);
        let result = separate_audio(&samples, &HpssConfig::default(), &unit_gain(MaskType::Wiener))
            .expect("Separation should succeed");

        let share = result.harmonic_energy_share();
        assert!(share > 0.9, "harmonic share {}", share);
        assert!(energy(&result.harmonic) > 0.8 * energy(&samples));
    }

    #[test]
    fn test_clicks_are_percussive() {
        let samples = click_track(2000, 5000, SAMPLE_RATE as usize / 2);
        for mask in [MaskType::Binary, MaskType::Wiener] {
            let result = separate_audio(&samples, &HpssConfig::default(), &unit_gain(mask))
                .expect("Separation should succeed");
            let share = result.harmonic_energy_share();
            assert!(share < 0.1, "{} mask: harmonic share {}", mask, share);
        }
    }

    #[test]
    fn test_components_sum_to_input() {
        // Both masks split each bin's amplitude completely
        let samples: Vec<f32> = (0..4096)
            .map(|i| 0.5 * (2.0 * PI * 6.0 * i as f32 / 64.0).sin())
            .collect();
        let config = HpssConfig {
            block_size: 8,
            ..Default::default()
        };
        for mask in [MaskType::Binary, MaskType::Wiener] {
            let params = SeparationParams {
                frame_size: 64,
                mask,
                gain: 1.0,
            };
            let result = separate_audio(&samples, &config, &params).expect("Separation should succeed");
            for i in 128..3968 {
                let sum = result.harmonic[i] + result.percussive[i];
                assert!((sum - samples[i]).abs() < 1e-2, "{} mask, sample {}", mask, i);
            }
        }
    }

    #[test]
    fn test_wav_input_separates() {
        let original = sine(330.0, 0.4, 6000);
        let decoded = wav_round_trip(&original).expect("WAV round trip should succeed");
        assert_eq!(decoded, original);

        let result = separate_audio(&decoded, &HpssConfig::default(), &SeparationParams::default())
            .expect("Separation should succeed");
        assert_eq!(result.harmonic.len(), original.len());
    }

    #[test]
    fn test_nan_input_is_flagged() {
        let mut samples = sine(440.0, 0.5, 3000);
        samples[1000] = f32::NAN;
        let result = separate_audio(&samples, &HpssConfig::default(), &SeparationParams::default())
            .expect("NaN input does not abort the run");

        assert_eq!(result.harmonic.len(), 3000);
        assert_eq!(result.metadata.nan_inputs, 1);
        assert!(result.metadata.flags.contains(&SeparationFlag::NanInput));
    }

    #[test]
    fn test_vocal_rest_is_sum_of_outer_components() {
        let samples: Vec<f32> = sine(440.0, 0.3, 6000)
            .iter()
            .zip(click_track(500, 1500, 6000))
            .map(|(a, b)| a + b)
            .collect();
        let config = HpssConfig {
            block_size: 12,
            ..Default::default()
        };
        let params = VocalRemovalParams {
            short_frame_size: 128,
            long_frame_size: 1024,
            ..Default::default()
        };

        let result = remove_vocals_audio(&samples, &config, &params).expect("Vocal removal should succeed");

        // Replay the cascade by hand
        let short = separate_audio(&samples, &config, &params.short_pass()).expect("short pass");
        let long = separate_audio(&short.harmonic, &config, &params.long_pass()).expect("long pass");

        assert_eq!(result.vocal, long.percussive);
        for i in 0..samples.len() {
            let expected = long.harmonic[i] + short.percussive[i];
            assert!((result.rest[i] - expected).abs() < 1e-6, "sample {}", i);
        }
    }

    #[test]
    fn test_progress_is_monotone_and_completes() {
        let engine = HpssEngine::new(HpssConfig::default()).expect("valid config");
        let mut input = SampleStream::from(sine(440.0, 0.5, 20000));
        let mut harmonic = SampleStream::new();
        let mut percussive = SampleStream::new();
        let mut reports = Vec::new();
        let mut sink = |track: usize, p: f32| {
            assert_eq!(track, 2);
            reports.push(p);
            ProgressControl::Continue
        };

        engine
            .separate(
                &SeparationParams::default(),
                &mut input,
                &mut harmonic,
                &mut percussive,
                ProgressInfo::new(2, 0.5, 1.0),
                &mut sink,
            )
            .expect("Separation should succeed");

        assert!(!reports.is_empty());
        assert!(reports.iter().all(|&p| (0.5..=1.0).contains(&p)));
        assert!(reports.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(reports.last().copied(), Some(1.0));
    }

    #[test]
    fn test_cancellation_stops_run() {
        let engine = HpssEngine::new(HpssConfig::default()).expect("valid config");
        let mut input = SampleStream::from(sine(440.0, 0.5, 50000));
        let mut harmonic = SampleStream::new();
        let mut percussive = SampleStream::new();
        let mut sink = |_track: usize, p: f32| {
            if p > 0.25 {
                ProgressControl::Cancel
            } else {
                ProgressControl::Continue
            }
        };

        let result = engine.separate(
            &SeparationParams::default(),
            &mut input,
            &mut harmonic,
            &mut percussive,
            ProgressInfo::full(0),
            &mut sink,
        );

        assert_eq!(result, Err(SeparationError::Cancelled));
        assert!(harmonic.len() < 50000);
        assert_eq!(harmonic.len(), percussive.len());
    }

    #[test]
    fn test_engine_is_reusable() {
        let engine = HpssEngine::new(HpssConfig::default()).expect("valid config");
        let samples = sine(440.0, 0.5, 4000);
        let mut outputs = Vec::new();
        for _ in 0..2 {
            let mut input = SampleStream::from(samples.as_slice());
            let mut harmonic = SampleStream::new();
            let mut percussive = SampleStream::new();
            engine
                .separate(
                    &SeparationParams::default(),
                    &mut input,
                    &mut harmonic,
                    &mut percussive,
                    ProgressInfo::full(0),
                    &mut NoProgress,
                )
                .expect("Separation should succeed");
            outputs.push(harmonic.drain_to_vec());
        }
        assert_eq!(outputs[0], outputs[1]);
    }
}
