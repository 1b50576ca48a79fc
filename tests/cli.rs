use assert_cmd::Command;
use image::{ImageBuffer, Rgb};
use tempfile::tempdir;

fn write_sample_image(path: &std::path::Path) {
    let image: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_fn(8, 8, |x, y| {
        Rgb([(x * 32) as u8, (y * 32) as u8, ((x + y) * 16) as u8])
    });
    image.save(path).expect("failed to write sample image");
}

#[test]
fn encode_then_decode_produces_an_image() {
    let temp = tempdir().unwrap();
    let input = temp.path().join("input.png");
    let stream = temp.path().join("clip.yuv");
    let output = temp.path().join("decoded.png");
    write_sample_image(&input);

    Command::cargo_bin("rawyuv")
        .expect("binary present")
        .args([
            "encode",
            input.to_str().expect("input path"),
            "--output",
            stream.to_str().expect("stream path"),
            "--interlace",
            "plane",
            "--sampling-factor",
            "1x1",
        ])
        .assert()
        .success();

    assert!(stream.is_file());

    Command::cargo_bin("rawyuv")
        .expect("binary present")
        .args([
            "decode",
            stream.to_str().expect("stream path"),
            output.to_str().expect("output path"),
            "--size",
            "8x8",
            "--interlace",
            "plane",
            "--sampling-factor",
            "1x1",
        ])
        .assert()
        .success();

    let decoded = image::open(&output).expect("decoded image opens");
    assert_eq!(decoded.width(), 8);
    assert_eq!(decoded.height(), 8);
}

#[test]
fn decode_rejects_a_missing_stream() {
    let temp = tempdir().unwrap();
    let missing = temp.path().join("absent.yuv");
    let output = temp.path().join("out.png");

    Command::cargo_bin("rawyuv")
        .expect("binary present")
        .args([
            "decode",
            missing.to_str().expect("stream path"),
            output.to_str().expect("output path"),
            "--size",
            "4x4",
        ])
        .assert()
        .failure();
}
