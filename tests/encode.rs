use image::{DynamicImage, ImageBuffer, Rgb};
use rawyuv::progress::Progress;
use rawyuv::{EncodeOptions, Interlace, encode_file, encode_file_with_progress};
use tempfile::tempdir;

fn solid_image(width: u32, height: u32, rgb: [u8; 3]) -> DynamicImage {
    let image: ImageBuffer<Rgb<u8>, Vec<u8>> =
        ImageBuffer::from_pixel(width, height, Rgb(rgb));
    DynamicImage::ImageRgb8(image)
}

#[test]
fn default_sampling_writes_a_plane_stream() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("out.yuv");
    let images = [solid_image(4, 4, [128, 128, 128])];

    encode_file(&path, &images, &EncodeOptions::default()).unwrap();

    // 16 luma bytes plus two 2x2 chroma planes.
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(bytes.len(), 24);
}

#[test]
fn packed_stream_interleaves_chroma_per_scanline() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("out.yuv");
    let images = [solid_image(4, 2, [0, 0, 0])];

    let options = EncodeOptions {
        sampling_factor: Some("2x1".into()),
        ..EncodeOptions::default()
    };
    encode_file(&path, &images, &options).unwrap();

    // 2 rows of 2 * 4 bytes each.
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(bytes.len(), 16);
}

#[test]
fn partition_mode_writes_three_files() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("out.yuv");
    let images = [solid_image(4, 4, [255, 0, 0])];

    let options = EncodeOptions {
        interlace: Some(Interlace::Partition),
        sampling_factor: Some("2x2".into()),
        ..EncodeOptions::default()
    };
    encode_file(&path, &images, &options).unwrap();

    assert!(!path.exists());
    assert_eq!(std::fs::read(temp.path().join("out.Y")).unwrap().len(), 16);
    assert_eq!(std::fs::read(temp.path().join("out.U")).unwrap().len(), 4);
    assert_eq!(std::fs::read(temp.path().join("out.V")).unwrap().len(), 4);
}

#[test]
fn wide_samples_double_the_stream_size() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("out.yuv");
    let images = [solid_image(4, 4, [10, 20, 30])];

    let options = EncodeOptions {
        depth: 16,
        ..EncodeOptions::default()
    };
    encode_file(&path, &images, &options).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(bytes.len(), 48);
}

#[test]
fn odd_dimensions_are_padded_up() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("out.yuv");
    let images = [solid_image(3, 3, [77, 77, 77])];

    encode_file(&path, &images, &EncodeOptions::default()).unwrap();

    // The 3x3 source pads to 4x4 before sampling.
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(bytes.len(), 24);
}

struct CancelAfter {
    reports: u64,
    limit: u64,
}

impl Progress for CancelAfter {
    fn report(&mut self, _completed: u64, _total: u64) -> bool {
        self.reports += 1;
        self.reports <= self.limit
    }
}

#[test]
fn cancellation_keeps_scanlines_already_written() {
    let temp = tempdir().unwrap();
    let full = temp.path().join("full.yuv");
    let cancelled = temp.path().join("cancelled.yuv");
    let first = solid_image(4, 4, [10, 20, 30]);
    let second = solid_image(4, 4, [200, 100, 50]);

    encode_file(&full, &[first.clone()], &EncodeOptions::default()).unwrap();

    // A 4x4 frame at 2x2 sampling reports 8 scanlines; cancel inside the
    // second frame. Cancellation is not an error and the first frame's
    // bytes stay intact.
    let mut progress = CancelAfter {
        reports: 0,
        limit: 10,
    };
    encode_file_with_progress(
        &cancelled,
        &[first, second],
        &EncodeOptions::default(),
        &mut progress,
    )
    .unwrap();

    let full_bytes = std::fs::read(&full).unwrap();
    let bytes = std::fs::read(&cancelled).unwrap();
    assert!(bytes.len() >= full_bytes.len());
    assert!(bytes.len() < 2 * full_bytes.len());
    assert_eq!(&bytes[..full_bytes.len()], &full_bytes[..]);
}

#[test]
fn frames_are_written_back_to_back() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("out.yuv");
    let images = [
        solid_image(4, 4, [0, 0, 0]),
        solid_image(4, 4, [255, 255, 255]),
    ];

    encode_file(&path, &images, &EncodeOptions::default()).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(bytes.len(), 48);
}
