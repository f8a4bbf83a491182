use std::io::Read;

use super::*;

#[test]
fn round_trips_entries_byte_identically() {
    let mut builder = ArchiveBuilder::new();
    builder.add_entry("a.png", vec![1, 2, 3]);
    builder.add_entry("b.png", vec![9, 8]);
    assert_eq!(builder.len(), 2);

    let bytes = builder.build().unwrap();
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    assert_eq!(archive.len(), 2);

    let mut a = Vec::new();
    archive.by_name("a.png").unwrap().read_to_end(&mut a).unwrap();
    assert_eq!(a, vec![1, 2, 3]);

    let mut b = Vec::new();
    archive.by_name("b.png").unwrap().read_to_end(&mut b).unwrap();
    assert_eq!(b, vec![9, 8]);
}

#[test]
fn duplicate_names_keep_the_last_write() {
    let mut builder = ArchiveBuilder::new();
    builder.add_entry("a.png", vec![1]);
    builder.add_entry("a.png", vec![2, 2]);
    assert_eq!(builder.len(), 1);

    let bytes = builder.build().unwrap();
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    assert_eq!(archive.len(), 1);

    let mut data = Vec::new();
    archive
        .by_name("a.png")
        .unwrap()
        .read_to_end(&mut data)
        .unwrap();
    assert_eq!(data, vec![2, 2]);
}

#[test]
fn empty_builder_fails_instead_of_emitting_an_empty_archive() {
    let builder = ArchiveBuilder::new();
    assert!(builder.is_empty());
    let err = builder.build().unwrap_err();
    assert!(matches!(err, FlagdeckError::EmptyArchive));
}

#[test]
fn archive_names_follow_prefix_region_pattern() {
    assert_eq!(archive_file_name("flags", RegionId::Europe), "flags_europe.zip");
    assert_eq!(
        archive_file_name("designs", RegionId::NorthAmerica),
        "designs_north_america.zip"
    );
}

#[test]
fn file_sink_writes_into_target_dir() {
    let dir = std::env::temp_dir().join(format!("flagdeck-sink-{}", std::process::id()));
    let mut sink = FileSink::new(&dir);
    sink.deliver("flags_europe.zip", &[0x50, 0x4b]).unwrap();

    let written = std::fs::read(dir.join("flags_europe.zip")).unwrap();
    assert_eq!(written, vec![0x50, 0x4b]);
    std::fs::remove_dir_all(&dir).ok();
}
