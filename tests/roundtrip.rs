use image::{DynamicImage, ImageBuffer, Rgb};
use rawyuv::{DecodeOptions, EncodeOptions, Interlace, color, decode_file, encode_file};
use tempfile::tempdir;

fn gradient_image(width: u32, height: u32) -> DynamicImage {
    let image: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_fn(width, height, |x, y| {
        Rgb([
            (x * 40) as u8,
            (y * 40) as u8,
            ((x + y) * 20) as u8,
        ])
    });
    DynamicImage::ImageRgb8(image)
}

/// The quantum a value comes back as after one trip through an 8-bit wire
/// sample.
fn wire_quantum(q: u16) -> u16 {
    (q / 257) * 257
}

fn assert_wire_exact(decoded: &rawyuv::YccFrame, reference: &rawyuv::YccFrame) {
    for (&got, &want) in decoded.y().iter().zip(reference.y()) {
        assert_eq!(got, wire_quantum(want));
    }
    for (&got, &want) in decoded.cb().iter().zip(reference.cb()) {
        assert_eq!(got, wire_quantum(want));
    }
    for (&got, &want) in decoded.cr().iter().zip(reference.cr()) {
        assert_eq!(got, wire_quantum(want));
    }
}

#[test]
fn full_resolution_plane_round_trip_is_exact() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("clip.yuv");
    let image = gradient_image(6, 4);

    let options = EncodeOptions {
        interlace: Some(Interlace::Plane),
        sampling_factor: Some("1x1".into()),
        ..EncodeOptions::default()
    };
    encode_file(&path, &[image.clone()], &options).unwrap();

    let mut decode_options = DecodeOptions::new(6, 4);
    decode_options.interlace = Some(Interlace::Plane);
    decode_options.sampling_factor = Some("1x1".into());
    let frames = decode_file(&path, &decode_options).unwrap();
    assert_eq!(frames.len(), 1);

    let reference = color::frame_from_rgb(&image).unwrap();
    assert_wire_exact(&frames[0], &reference);
}

#[test]
fn partition_round_trip_is_exact() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("clip.yuv");
    let image = gradient_image(4, 4);

    let options = EncodeOptions {
        interlace: Some(Interlace::Partition),
        sampling_factor: Some("1x1".into()),
        ..EncodeOptions::default()
    };
    encode_file(&path, &[image.clone()], &options).unwrap();

    let mut decode_options = DecodeOptions::new(4, 4);
    decode_options.interlace = Some(Interlace::Partition);
    decode_options.sampling_factor = Some("1x1".into());
    let frames = decode_file(&path, &decode_options).unwrap();
    assert_eq!(frames.len(), 1);

    let reference = color::frame_from_rgb(&image).unwrap();
    assert_wire_exact(&frames[0], &reference);
}

#[test]
fn wide_sample_plane_round_trip_is_exact() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("clip.yuv");
    let image = gradient_image(4, 4);

    let options = EncodeOptions {
        depth: 16,
        interlace: Some(Interlace::Plane),
        sampling_factor: Some("1x1".into()),
        ..EncodeOptions::default()
    };
    encode_file(&path, &[image.clone()], &options).unwrap();

    let mut decode_options = DecodeOptions::new(4, 4);
    decode_options.depth = 16;
    decode_options.interlace = Some(Interlace::Plane);
    decode_options.sampling_factor = Some("1x1".into());
    let frames = decode_file(&path, &decode_options).unwrap();
    assert_eq!(frames.len(), 1);

    // 16-bit wire samples carry the full quantum.
    let reference = color::frame_from_rgb(&image).unwrap();
    assert_eq!(frames[0].y(), reference.y());
    assert_eq!(frames[0].cb(), reference.cb());
    assert_eq!(frames[0].cr(), reference.cr());
}

#[test]
fn packed_round_trip_preserves_luma() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("clip.yuv");
    let image = gradient_image(4, 4);

    let options = EncodeOptions {
        sampling_factor: Some("2x1".into()),
        ..EncodeOptions::default()
    };
    encode_file(&path, &[image.clone()], &options).unwrap();

    let mut decode_options = DecodeOptions::new(4, 4);
    decode_options.sampling_factor = Some("2x1".into());
    let frames = decode_file(&path, &decode_options).unwrap();
    assert_eq!(frames.len(), 1);

    // Luma travels at full resolution in packed mode; only chroma is
    // subsampled.
    let reference = color::frame_from_rgb(&image).unwrap();
    for (&got, &want) in frames[0].y().iter().zip(reference.y()) {
        assert_eq!(got, wire_quantum(want));
    }
}

#[test]
fn multi_frame_stream_round_trips_every_frame() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("clip.yuv");
    let images = [gradient_image(4, 4), gradient_image(4, 4)];

    let options = EncodeOptions {
        interlace: Some(Interlace::Plane),
        sampling_factor: Some("1x1".into()),
        ..EncodeOptions::default()
    };
    encode_file(&path, &images, &options).unwrap();

    let mut decode_options = DecodeOptions::new(4, 4);
    decode_options.interlace = Some(Interlace::Plane);
    decode_options.sampling_factor = Some("1x1".into());
    let frames = decode_file(&path, &decode_options).unwrap();
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0].y(), frames[1].y());
}
