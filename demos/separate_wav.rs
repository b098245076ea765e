//! Example: Separate a WAV file, one channel per worker
//!
//! Usage:
//!   cargo run --release --example separate_wav -- [--vocals] [--mask binary|wiener] [--frame-ms N] [--json] <input.wav> <output_prefix>
//!
//! Writes `<output_prefix>_harmonic.wav` and `<output_prefix>_percussive.wav`,
//! or `<output_prefix>_vocal.wav` and `<output_prefix>_rest.wav` with `--vocals`.
//! Channels are processed in parallel; set `RUST_LOG=debug` for engine logs.

use rayon::prelude::*;
use std::env;
use std::time::Instant;
use stratum_hpss::config::frame_size_from_ms;
use stratum_hpss::{
    remove_vocals_audio, separate_audio, HpssConfig, MaskType, SeparationMetadata, SeparationParams,
    VocalRemovalParams,
};

/// Read a WAV file as one `Vec<f32>` per channel
fn read_channels(path: &str) -> Result<(Vec<Vec<f32>>, hound::WavSpec), Box<dyn std::error::Error>> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();

    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader.samples::<f32>().collect::<Result<Vec<_>, _>>()?,
        hound::SampleFormat::Int => {
            let max_value = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|s| s as f32 / max_value))
                .collect::<Result<Vec<_>, _>>()?
        }
    };

    let channels = spec.channels.max(1) as usize;
    let mut out = vec![Vec::with_capacity(interleaved.len() / channels); channels];
    for (i, &s) in interleaved.iter().enumerate() {
        out[i % channels].push(s);
    }
    Ok((out, spec))
}

/// Write per-channel signals as a 32-bit float WAV
fn write_channels(path: &str, channels: &[Vec<f32>], sample_rate: u32) -> Result<(), Box<dyn std::error::Error>> {
    let spec = hound::WavSpec {
        channels: channels.len() as u16,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(path, spec)?;
    let frames = channels.iter().map(Vec::len).max().unwrap_or(0);
    for i in 0..frames {
        for channel in channels {
            writer.write_sample(channel.get(i).copied().unwrap_or(0.0))?;
        }
    }
    writer.finalize()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args: Vec<String> = env::args().skip(1).collect();

    let mut vocals = false;
    let mut json = false;
    let mut mask = MaskType::Wiener;
    let mut frame_ms: Option<u32> = None;
    let mut paths: Vec<String> = Vec::new();

    while let Some(a) = args.first().cloned() {
        args.remove(0);
        match a.as_str() {
            "--vocals" => vocals = true,
            "--json" => json = true,
            "--mask" => {
                mask = args.first().ok_or("--mask requires a value")?.parse::<MaskType>()?;
                args.remove(0);
            }
            "--frame-ms" => {
                frame_ms = Some(args.first().ok_or("--frame-ms requires a value")?.parse::<u32>()?);
                args.remove(0);
            }
            "--help" | "-h" => {
                eprintln!(
                    "Usage: separate_wav [--vocals] [--mask binary|wiener] [--frame-ms N] [--json] <input.wav> <output_prefix>\n\
                     \n\
                     --vocals       Vocal removal instead of harmonic/percussive separation\n\
                     --mask M       Mask policy (default: wiener)\n\
                     --frame-ms N   Frame length in ms (default: 512 samples; short frame with --vocals)\n\
                     --json         Print per-channel metadata as JSON lines\n"
                );
                return Ok(());
            }
            _ => paths.push(a),
        }
    }

    if paths.len() != 2 {
        eprintln!("ERROR: Provide an input WAV and an output prefix. Use --help for usage.");
        std::process::exit(2);
    }

    let (channels, spec) = read_channels(&paths[0])?;
    eprintln!(
        "Input: {} channels, {} Hz, {} frames",
        channels.len(),
        spec.sample_rate,
        channels.first().map(Vec::len).unwrap_or(0)
    );

    let config = HpssConfig::default();
    let frame_size = match frame_ms {
        Some(ms) => Some(frame_size_from_ms(ms, spec.sample_rate as f64)?),
        None => None,
    };

    let t0 = Instant::now();

    // (first output, second output, metadata) per channel
    let results: Vec<Result<(Vec<f32>, Vec<f32>, SeparationMetadata), String>> = channels
        .par_iter()
        .map(|samples| {
            if vocals {
                let mut params = VocalRemovalParams {
                    mask,
                    ..Default::default()
                };
                if let Some(size) = frame_size {
                    params.short_frame_size = size;
                }
                remove_vocals_audio(samples, &config, &params)
                    .map(|r| (r.vocal, r.rest, r.metadata))
                    .map_err(|e| e.to_string())
            } else {
                let mut params = SeparationParams {
                    mask,
                    ..Default::default()
                };
                if let Some(size) = frame_size {
                    params.frame_size = size;
                }
                separate_audio(samples, &config, &params)
                    .map(|r| (r.harmonic, r.percussive, r.metadata))
                    .map_err(|e| e.to_string())
            }
        })
        .collect();

    let mut first = Vec::with_capacity(results.len());
    let mut second = Vec::with_capacity(results.len());
    for (channel, result) in results.into_iter().enumerate() {
        let (a, b, metadata) = result.map_err(|e| format!("channel {channel}: {e}"))?;
        if json {
            println!("{}", serde_json::to_string(&metadata)?);
        } else {
            eprintln!(
                "Channel {}: {} steps, {:.1} ms, flags {:?}",
                channel, metadata.steps, metadata.processing_time_ms, metadata.flags
            );
        }
        first.push(a);
        second.push(b);
    }

    let (first_name, second_name) = if vocals {
        ("vocal", "rest")
    } else {
        ("harmonic", "percussive")
    };
    let prefix = &paths[1];
    write_channels(&format!("{prefix}_{first_name}.wav"), &first, spec.sample_rate)?;
    write_channels(&format!("{prefix}_{second_name}.wav"), &second, spec.sample_rate)?;

    eprintln!("Done in {:.2}s", t0.elapsed().as_secs_f32());
    Ok(())
}
