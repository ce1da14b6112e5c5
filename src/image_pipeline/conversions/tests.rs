use std::io::Cursor;

use crate::image_pipeline::common::error::ConversionError;
use crate::image_pipeline::conversions::RawToExrPipeline;
use crate::image_pipeline::exr::{ConversionConfig, StandardExrWriter};
use crate::image_pipeline::pixel::ColorMode;
use crate::image_pipeline::raw::{ProcessingRegion, RawFrame, SensorGeometry};
use crate::image_pipeline::testing::{CORRUPT_MARKER, MockDecoder, MockWriter};

fn sink() -> Cursor<Vec<u8>> {
    Cursor::new(Vec::new())
}

#[test]
fn test_successful_conversion() {
    let writer = MockWriter::new();
    let written = writer.written.clone();
    let pipeline = RawToExrPipeline::with_custom(
        MockDecoder::default(),
        writer,
        ConversionConfig::default(),
    );

    let mut output = Cursor::new(Vec::new());
    let result = pipeline.convert(b"fake 3fr data", &mut output);

    assert!(result.is_ok());
    assert_eq!(written.lock().unwrap().len(), 1);
    assert_eq!(output.into_inner(), b"mock exr");
}

#[test]
fn test_full_sensor_region_is_used() {
    let decoder = MockDecoder::new(SensorGeometry::from_crops(40, 30, [4, 6, 2, 8]));
    let regions = decoder.regions.clone();
    let writer = MockWriter::new();
    let written = writer.written.clone();
    let pipeline = RawToExrPipeline::with_custom(decoder, writer, ConversionConfig::default());

    pipeline.convert(b"fake 3fr data", &mut sink()).unwrap();

    assert_eq!(
        regions.lock().unwrap().as_slice(),
        &[ProcessingRegion {
            left: 0,
            top: 0,
            width: 40,
            height: 30
        }]
    );
    let rasters = written.lock().unwrap();
    assert_eq!((rasters[0].width, rasters[0].height), (40, 30));
}

#[test]
fn test_decoder_open_failure() {
    let writer = MockWriter::new();
    let written = writer.written.clone();
    let pipeline = RawToExrPipeline::with_custom(
        MockDecoder::default(),
        writer,
        ConversionConfig::default(),
    );

    let mut data = CORRUPT_MARKER.to_vec();
    data.extend_from_slice(b" bytes");
    let result = pipeline.convert(&data, &mut sink());

    assert!(matches!(result.unwrap_err(), ConversionError::DecodeOpen(_)));
    assert!(written.lock().unwrap().is_empty());
}

#[test]
fn test_decoder_process_failure() {
    let mut decoder = MockDecoder::default();
    decoder.fail_process = true;
    let pipeline =
        RawToExrPipeline::with_custom(decoder, MockWriter::new(), ConversionConfig::default());

    let result = pipeline.convert(b"fake 3fr data", &mut sink());
    assert!(matches!(result.unwrap_err(), ConversionError::DecodeProcess(_)));
}

#[test]
fn test_zero_sensor_size_is_decode_failure() {
    let decoder = MockDecoder::new(SensorGeometry::from_crops(0, 0, [0; 4]));
    let regions = decoder.regions.clone();
    let pipeline =
        RawToExrPipeline::with_custom(decoder, MockWriter::new(), ConversionConfig::default());

    let result = pipeline.convert(b"fake 3fr data", &mut sink());
    assert!(matches!(result.unwrap_err(), ConversionError::DecodeUnpack(_)));
    assert!(regions.lock().unwrap().is_empty());
}

#[test]
fn test_writer_failure() {
    let mut writer = MockWriter::new();
    writer.should_fail = true;
    let pipeline =
        RawToExrPipeline::with_custom(MockDecoder::default(), writer, ConversionConfig::default());

    let result = pipeline.convert(b"fake 3fr data", &mut sink());
    assert!(matches!(result.unwrap_err(), ConversionError::Write(_)));
}

#[test]
fn test_unsupported_frame_format() {
    let mut decoder = MockDecoder::default();
    decoder.frame = Some(RawFrame::from_u16(2, 2, 4, &[0; 16]));
    let pipeline =
        RawToExrPipeline::with_custom(decoder, MockWriter::new(), ConversionConfig::default());

    let result = pipeline.convert(b"fake 3fr data", &mut sink());
    assert!(matches!(
        result.unwrap_err(),
        ConversionError::UnsupportedFormat { channels: 4, .. }
    ));
}

#[test]
fn test_empty_frame_validation() {
    let mut decoder = MockDecoder::default();
    decoder.frame = Some(RawFrame::from_u16(0, 0, 3, &[]));
    let pipeline =
        RawToExrPipeline::with_custom(decoder, MockWriter::new(), ConversionConfig::default());

    let result = pipeline.convert(b"fake 3fr data", &mut sink());
    assert!(matches!(result.unwrap_err(), ConversionError::ImageCreation(_)));
}

#[test]
fn test_options_reach_pixel_stage() {
    let frame = RawFrame::from_u8(1, 1, 1, vec![255]);
    let convert_with = |config: ConversionConfig| {
        let mut decoder = MockDecoder::default();
        decoder.frame = Some(frame.clone());
        let writer = MockWriter::new();
        let written = writer.written.clone();
        let pipeline = RawToExrPipeline::with_custom(decoder, writer, config);
        pipeline.convert(b"fake 3fr data", &mut sink()).unwrap();
        let pixel = written.lock().unwrap()[0].pixels[0];
        pixel
    };

    let linearized = convert_with(ConversionConfig::default());
    let tone_mapped = convert_with(
        ConversionConfig::builder()
            .color_mode(ColorMode::Passthrough)
            .exposure(3.0)
            .build()
            .unwrap(),
    );

    assert!((linearized[0] - 1.0).abs() < 1e-6);
    assert_eq!(tone_mapped[0], 0.75);
}

#[test]
fn test_timings_cover_each_stage() {
    let pipeline = RawToExrPipeline::with_custom(
        MockDecoder::default(),
        MockWriter::new(),
        ConversionConfig::default(),
    );

    let timings = pipeline
        .convert_with_timings(b"fake 3fr data", &mut sink())
        .unwrap();
    for step in ["decode_raw", "develop", "convert_pixels", "encode_exr"] {
        assert!(timings.get_step(step).is_some(), "missing {}", step);
    }
}

#[test]
fn test_convert_file_writes_exr() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("frame.3fr");
    let output = dir.path().join("frame.exr");
    std::fs::write(&input, b"fake 3fr data").unwrap();

    let pipeline = RawToExrPipeline::with_custom(
        MockDecoder::default(),
        StandardExrWriter,
        ConversionConfig::default(),
    );
    let timings = pipeline.convert_file_with_timings(&input, &output).unwrap();

    let bytes = std::fs::read(&output).unwrap();
    // OpenEXR magic number
    assert_eq!(&bytes[..4], &[0x76, 0x2f, 0x31, 0x01]);
    assert!(timings.get_step("write_output_file").is_some());
}

#[test]
fn test_convert_file_failure_leaves_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("broken.3fr");
    let output = dir.path().join("broken.exr");
    std::fs::write(&input, CORRUPT_MARKER).unwrap();

    let pipeline = RawToExrPipeline::with_custom(
        MockDecoder::default(),
        MockWriter::new(),
        ConversionConfig::default(),
    );

    assert!(pipeline.convert_file(&input, &output).is_err());
    assert!(!output.exists());
}

#[test]
fn test_missing_input_file() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = RawToExrPipeline::with_custom(
        MockDecoder::default(),
        MockWriter::new(),
        ConversionConfig::default(),
    );

    let result = pipeline.convert_file(dir.path().join("nope.3fr"), dir.path().join("nope.exr"));
    assert!(matches!(result.unwrap_err(), ConversionError::DecodeOpen(_)));
}

#[test]
fn test_real_decoder_rejects_garbage() {
    let pipeline = RawToExrPipeline::new(ConversionConfig::default());
    let result = pipeline.convert(b"definitely not a raw file", &mut sink());
    assert!(matches!(result.unwrap_err(), ConversionError::DecodeOpen(_)));
}

fn dir_entries(dir: &std::path::Path) -> Vec<String> {
    let mut names: Vec<_> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_encode_failure_leaves_no_staged_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("frame.3fr");
    std::fs::write(&input, b"fake 3fr data").unwrap();
    let out_dir = dir.path().join("EXR");
    std::fs::create_dir(&out_dir).unwrap();

    let mut writer = MockWriter::new();
    writer.should_fail = true;
    let pipeline =
        RawToExrPipeline::with_custom(MockDecoder::default(), writer, ConversionConfig::default());

    let result = pipeline.convert_file(&input, out_dir.join("frame.exr"));
    assert!(matches!(result.unwrap_err(), ConversionError::Write(_)));
    assert!(dir_entries(&out_dir).is_empty());
}

#[test]
fn test_existing_output_replaced_only_on_success() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("good.3fr");
    let bad = dir.path().join("bad.3fr");
    let output = dir.path().join("frame.exr");
    std::fs::write(&good, b"fake 3fr data").unwrap();
    std::fs::write(&bad, CORRUPT_MARKER).unwrap();
    std::fs::write(&output, b"previous").unwrap();

    let pipeline = RawToExrPipeline::with_custom(
        MockDecoder::default(),
        MockWriter::new(),
        ConversionConfig::default(),
    );

    assert!(pipeline.convert_file(&bad, &output).is_err());
    assert_eq!(std::fs::read(&output).unwrap(), b"previous");

    pipeline.convert_file(&good, &output).unwrap();
    assert_eq!(std::fs::read(&output).unwrap(), b"mock exr");
    assert_eq!(dir_entries(dir.path()), vec!["bad.3fr", "frame.exr", "good.3fr"]);
}

#[cfg(unix)]
#[test]
fn test_output_has_regular_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("frame.3fr");
    let output = dir.path().join("frame.exr");
    std::fs::write(&input, b"fake 3fr data").unwrap();

    let pipeline = RawToExrPipeline::with_custom(
        MockDecoder::default(),
        MockWriter::new(),
        ConversionConfig::default(),
    );
    pipeline.convert_file(&input, &output).unwrap();

    let mode = std::fs::metadata(&output).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o644);
}
