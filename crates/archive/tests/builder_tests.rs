//! Round-trip tests for the archive builder.

use baler_archive::{ArchiveBuilder, StagedFile, Staging};
use baler_core::ArchiveFormat;
use bytes::Bytes;
use std::fs::File;
use std::io::Read;
use tempfile::{TempDir, tempdir};

/// Stage a set of named payloads and return the records for building.
async fn stage_files(staging: &Staging, payloads: &[(&str, &[u8])]) -> Vec<StagedFile> {
    let mut staged = Vec::new();
    for (name, content) in payloads {
        let mut writer = staging.create(name).await.unwrap();
        writer
            .write_chunk(Bytes::copy_from_slice(content))
            .await
            .unwrap();
        staged.push(writer.finish().await.unwrap());
    }
    staged
}

async fn fixture() -> (TempDir, Staging, ArchiveBuilder) {
    let temp = tempdir().unwrap();
    let staging = Staging::new(temp.path().join("uploads")).await.unwrap();
    let builder = ArchiveBuilder::new(temp.path().join("downloads"))
        .await
        .unwrap();
    (temp, staging, builder)
}

#[tokio::test]
async fn zip_round_trip_preserves_content() {
    let (_temp, staging, builder) = fixture().await;
    let payloads: &[(&str, &[u8])] = &[
        ("first.txt", b"hello from file 1"),
        ("second.bin", &[0u8, 1, 2, 3, 255, 254]),
    ];
    let staged = stage_files(&staging, payloads).await;

    let path = builder
        .build(&staged, ArchiveFormat::Zip, "archive.zip")
        .await
        .unwrap();

    let mut archive = zip::ZipArchive::new(File::open(&path).unwrap()).unwrap();
    assert_eq!(archive.len(), 2);
    for (name, content) in payloads {
        let mut entry = archive.by_name(name).unwrap();
        let mut extracted = Vec::new();
        entry.read_to_end(&mut extracted).unwrap();
        assert_eq!(&extracted, content, "content mismatch for {name}");
    }
}

#[tokio::test]
async fn tar_round_trip_preserves_content() {
    let (_temp, staging, builder) = fixture().await;
    let payloads: &[(&str, &[u8])] = &[
        ("first.txt", b"hello from file 1"),
        ("second.bin", &[7u8; 1024]),
    ];
    let staged = stage_files(&staging, payloads).await;

    let path = builder
        .build(&staged, ArchiveFormat::Tar, "archive.tar")
        .await
        .unwrap();

    let mut archive = tar::Archive::new(File::open(&path).unwrap());
    let mut seen = Vec::new();
    for entry in archive.entries().unwrap() {
        let mut entry = entry.unwrap();
        let name = entry.path().unwrap().to_string_lossy().to_string();
        let mut extracted = Vec::new();
        entry.read_to_end(&mut extracted).unwrap();
        let expected = payloads
            .iter()
            .find(|(n, _)| *n == name)
            .unwrap_or_else(|| panic!("unexpected entry {name}"));
        assert_eq!(extracted, expected.1);
        seen.push(name);
    }
    assert_eq!(seen.len(), 2);
}

#[tokio::test]
async fn zip_entries_carry_only_base_names() {
    let (_temp, staging, builder) = fixture().await;
    let staged = stage_files(&staging, &[("report.txt", b"data")]).await;

    let path = builder
        .build(&staged, ArchiveFormat::Zip, "archive.zip")
        .await
        .unwrap();

    let mut archive = zip::ZipArchive::new(File::open(&path).unwrap()).unwrap();
    for i in 0..archive.len() {
        let entry = archive.by_index(i).unwrap();
        let name = entry.name();
        assert!(!name.contains('/'), "entry {name} carries a directory");
        assert!(!name.contains('\\'), "entry {name} carries a directory");
        assert!(!name.contains(".."), "entry {name} carries a traversal");
    }
}

#[tokio::test]
async fn empty_batch_builds_a_valid_empty_archive() {
    let (_temp, _staging, builder) = fixture().await;

    let path = builder
        .build(&[], ArchiveFormat::Zip, "archive.zip")
        .await
        .unwrap();

    let archive = zip::ZipArchive::new(File::open(&path).unwrap()).unwrap();
    assert_eq!(archive.len(), 0);
}

#[tokio::test]
async fn rebuild_overwrites_prior_output() {
    let (_temp, staging, builder) = fixture().await;

    let first = stage_files(&staging, &[("a.txt", b"one")]).await;
    builder
        .build(&first, ArchiveFormat::Zip, "archive.zip")
        .await
        .unwrap();

    let second = stage_files(&staging, &[("b.txt", b"two"), ("c.txt", b"three")]).await;
    let path = builder
        .build(&second, ArchiveFormat::Zip, "archive.zip")
        .await
        .unwrap();

    let mut archive = zip::ZipArchive::new(File::open(&path).unwrap()).unwrap();
    assert_eq!(archive.len(), 2);
    assert!(archive.by_name("a.txt").is_err());
}

#[tokio::test]
async fn no_temporary_files_survive_a_build() {
    let (_temp, staging, builder) = fixture().await;
    let staged = stage_files(&staging, &[("x.txt", b"payload")]).await;

    builder
        .build(&staged, ArchiveFormat::Tar, "archive.tar")
        .await
        .unwrap();

    let leftovers: Vec<_> = std::fs::read_dir(builder.output_dir())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().starts_with(".tmp."))
        .collect();
    assert!(leftovers.is_empty(), "temporary files left behind: {leftovers:?}");
}
