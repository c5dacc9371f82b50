use super::*;

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "placescape_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn frame(w: u32, h: u32, px: [u8; 4]) -> FrameRGBA {
    FrameRGBA {
        width: w,
        height: h,
        data: px.repeat((w * h) as usize),
        premultiplied: true,
    }
}

fn cfg(w: u32, h: u32) -> SinkConfig {
    SinkConfig {
        width: w,
        height: h,
        fps: Fps::new(30, 1).unwrap(),
    }
}

#[test]
fn in_memory_sink_resets_on_begin() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg(2, 2)).unwrap();
    sink.push_frame(FrameIndex(0), &frame(2, 2, [1, 2, 3, 255])).unwrap();
    sink.end().unwrap();
    assert_eq!(sink.frames().len(), 1);

    sink.begin(cfg(2, 2)).unwrap();
    assert!(sink.frames().is_empty());
}

#[test]
fn png_sequence_writes_numbered_straight_alpha_files() {
    let dir = temp_dir("png_sequence");
    let mut sink = PngSequenceSink::new(&dir).with_prefix("scroll");
    sink.begin(cfg(3, 2)).unwrap();
    sink.push_frame(FrameIndex(0), &frame(3, 2, [10, 20, 30, 255])).unwrap();
    sink.push_frame(FrameIndex(1), &frame(3, 2, [64, 0, 0, 128])).unwrap();
    sink.end().unwrap();

    assert_eq!(
        sink.written(),
        &[dir.join("scroll_000000.png"), dir.join("scroll_000001.png")]
    );
    let img = image::open(dir.join("scroll_000001.png")).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (3, 2));
    // 64 premultiplied by 128/255 unpremultiplies to 128.
    assert_eq!(img.get_pixel(0, 0).0, [128, 0, 0, 128]);
}

#[test]
fn png_sequence_checks_state_and_size() {
    let dir = temp_dir("png_sequence_checks");
    let mut sink = PngSequenceSink::new(&dir);
    assert!(sink.push_frame(FrameIndex(0), &frame(1, 1, [0; 4])).is_err());
    sink.begin(cfg(2, 2)).unwrap();
    assert!(sink.push_frame(FrameIndex(0), &frame(1, 1, [0; 4])).is_err());
}

#[test]
fn parent_dirs_are_created_for_output_files() {
    let dir = temp_dir("parent_dirs");
    let file = dir.join("nested").join("frame.png");
    ensure_parent_dir(&file).unwrap();
    assert!(dir.join("nested").is_dir());
    assert!(!file.exists());
    ensure_parent_dir(Path::new("frame.png")).unwrap();
}
