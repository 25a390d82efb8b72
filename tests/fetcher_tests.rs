//! Firmware download tests
//!
//! Exercises the fetcher against a simulated GitHub CLI: up-to-date detection,
//! forced re-download, artifact flattening and descriptor persistence.


use mock_hardware::*;
use sofle_flash::errors::FlashError;
use sofle_flash::models::VersionDescriptor;
use sofle_flash::services::{DownloadOutcome, FirmwareFetcher};
use std::fs;
use std::path::PathBuf;
use test_fixtures::*;

fn fetcher_downloads(fetcher: &FirmwareFetcher<MockCiClient>) -> Vec<(u64, PathBuf)> {
    fetcher.client().download_calls()
}

/// Fresh download flattens artifacts and records the build
#[tokio::test]
async fn test_download_flattens_artifacts() {
    let env = TestEnvironment::new();
    let client = MockCiClient::with_run(COMMIT, 17_482_113_905);
    let fetcher = FirmwareFetcher::new(client, &env.config);

    let outcome = fetcher.download(false).await.expect("Download should succeed");

    let DownloadOutcome::Downloaded { descriptor, files } = outcome else {
        panic!("Expected a fresh download");
    };
    assert_eq!(descriptor.commit, COMMIT);
    assert_eq!(descriptor.commit_short, &COMMIT[..7]);
    assert_eq!(descriptor.tag.as_deref(), Some("v2.3.0"));
    assert!(descriptor.download_date.is_some());

    let dir = env.download_dir();
    assert_eq!(
        files,
        vec![
            dir.join(RESET_UF2),
            dir.join("sofle_left-nice_nano_v2-zmk.uf2"),
            dir.join("sofle_right-nice_nano_v2-zmk.uf2"),
        ]
    );
    assert_eq!(fs::read(dir.join(LEFT_UF2)).expect("Left image"), b"left");
    assert!(!dir.join("firmware").exists(), "Empty artifact dirs are removed");
    assert!(!dir.join("settings_reset").exists());

    let saved = VersionDescriptor::load(&env.config.version_file())
        .expect("Descriptor readable")
        .expect("Descriptor written");
    assert_eq!(saved.run_id, 17_482_113_905);
    assert_eq!(saved.commit, COMMIT);
}

/// Non-firmware artifact files keep their subdirectory
#[tokio::test]
async fn test_download_keeps_non_firmware_files_in_place() {
    let env = TestEnvironment::new();
    let mut client = MockCiClient::with_run(COMMIT, 1);
    client
        .artifacts
        .push(("firmware/build-info.txt".to_string(), b"zmk".to_vec()));
    let fetcher = FirmwareFetcher::new(client, &env.config);

    fetcher.download(false).await.expect("Download should succeed");

    let dir = env.download_dir();
    assert!(dir.join("firmware").join("build-info.txt").is_file());
    assert!(dir.join(LEFT_UF2).is_file());
}

/// Matching commit means no download and an untouched descriptor
#[tokio::test]
async fn test_up_to_date_skips_download() {
    let env = TestEnvironment::new();
    env.write_firmware(LEFT_UF2);
    descriptor_for(COMMIT, 42)
        .save(&env.config.version_file())
        .expect("Save descriptor");
    let before = fs::read(env.config.version_file()).expect("Read descriptor");
    let modified = fs::metadata(env.config.version_file())
        .and_then(|m| m.modified())
        .expect("Descriptor mtime");

    let fetcher = FirmwareFetcher::new(MockCiClient::with_run(COMMIT, 43), &env.config);
    let outcome = fetcher.download(false).await.expect("Check should succeed");

    match outcome {
        DownloadOutcome::UpToDate { remote, local } => {
            assert_eq!(remote.run_id, 43);
            assert_eq!(local.run_id, 42);
        }
        other => panic!("Expected up to date, got {:?}", other),
    }
    assert!(fetcher_downloads(&fetcher).is_empty());
    assert_eq!(fs::read(env.config.version_file()).expect("Read descriptor"), before);
    assert_eq!(
        fs::metadata(env.config.version_file())
            .and_then(|m| m.modified())
            .expect("Descriptor mtime"),
        modified
    );
    assert_eq!(
        fs::read(env.download_dir().join(LEFT_UF2)).expect("Old image"),
        uf2_block(LEFT_UF2)
    );
}

/// `--force` re-downloads even when the commit matches
#[tokio::test]
async fn test_force_downloads_matching_commit() {
    let env = TestEnvironment::new();
    env.write_firmware("stale-file.uf2");
    descriptor_for(COMMIT, 42)
        .save(&env.config.version_file())
        .expect("Save descriptor");

    let fetcher = FirmwareFetcher::new(MockCiClient::with_run(COMMIT, 43), &env.config);
    let outcome = fetcher.download(true).await.expect("Download should succeed");

    assert!(matches!(outcome, DownloadOutcome::Downloaded { .. }));
    assert_eq!(fetcher_downloads(&fetcher).len(), 1);
    assert!(
        !env.download_dir().join("stale-file.uf2").exists(),
        "Download dir is replaced"
    );
    let saved = fetcher.show_version().expect("Readable").expect("Present");
    assert_eq!(saved.run_id, 43);
}

/// A different commit triggers a download without `--force`
#[tokio::test]
async fn test_new_commit_downloads() {
    let env = TestEnvironment::new();
    descriptor_for(OTHER_COMMIT, 40)
        .save(&env.config.version_file())
        .expect("Save descriptor");

    let fetcher = FirmwareFetcher::new(MockCiClient::with_run(COMMIT, 43), &env.config);
    let outcome = fetcher.download(false).await.expect("Download should succeed");

    match outcome {
        DownloadOutcome::Downloaded { descriptor, .. } => assert_eq!(descriptor.commit, COMMIT),
        other => panic!("Expected a download, got {:?}", other),
    }
}

/// A corrupt descriptor is treated as absent by the download check
#[tokio::test]
async fn test_corrupt_descriptor_triggers_download() {
    let env = TestEnvironment::new();
    fs::create_dir_all(env.download_dir()).expect("Create download dir");
    fs::write(env.config.version_file(), "{ not json").expect("Write corrupt descriptor");

    let fetcher = FirmwareFetcher::new(MockCiClient::with_run(COMMIT, 43), &env.config);
    let outcome = fetcher.download(false).await.expect("Download should succeed");

    assert!(matches!(outcome, DownloadOutcome::Downloaded { .. }));
}

#[tokio::test]
async fn test_no_successful_run() {
    let env = TestEnvironment::new();
    let fetcher = FirmwareFetcher::new(MockCiClient::without_runs(), &env.config);

    let err = fetcher.download(false).await.expect_err("Nothing to download");

    match err {
        FlashError::NoSuccessfulRun { repo, workflow } => {
            assert_eq!(repo, "mshegolev/zmk-config-s");
            assert_eq!(workflow, "build.yml");
        }
        other => panic!("Expected no successful run, got {:?}", other),
    }
    assert!(!env.download_dir().exists());
}

#[tokio::test]
async fn test_missing_gh_is_reported() {
    let env = TestEnvironment::new();
    let mut client = MockCiClient::with_run(COMMIT, 1);
    client.readiness = GhReadiness::Missing;
    let fetcher = FirmwareFetcher::new(client, &env.config);

    let err = fetcher.download(false).await.expect_err("gh is missing");

    assert!(matches!(err, FlashError::ToolMissing { .. }));
    assert_eq!(err.remedy().as_deref(), Some("Install it: brew install gh"));
}

#[tokio::test]
async fn test_logged_out_gh_is_reported() {
    let env = TestEnvironment::new();
    let mut client = MockCiClient::with_run(COMMIT, 1);
    client.readiness = GhReadiness::LoggedOut;
    let fetcher = FirmwareFetcher::new(client, &env.config);

    let err = fetcher
        .fetch_remote_descriptor()
        .await
        .expect_err("gh is logged out");

    assert!(matches!(err, FlashError::NotAuthenticated { .. }));
}

/// Tag lookup is best-effort
#[tokio::test]
async fn test_tag_lookup_failure_is_not_fatal() {
    let env = TestEnvironment::new();
    let mut client = MockCiClient::with_run(COMMIT, 7);
    client.tag_lookup_fails = true;
    let fetcher = FirmwareFetcher::new(client, &env.config);

    let remote = fetcher
        .fetch_remote_descriptor()
        .await
        .expect("Tag failure should be tolerated");

    assert_eq!(remote.tag, None);
    assert_eq!(remote.tag_display(), "-");
}

/// Untagged builds persist without a tag and display as "-"
#[tokio::test]
async fn test_untagged_build_round_trip() {
    let env = TestEnvironment::new();
    let mut client = MockCiClient::with_run(COMMIT, 7);
    client.tag = None;
    let fetcher = FirmwareFetcher::new(client, &env.config);

    let outcome = fetcher.download(false).await.expect("Download should succeed");
    let DownloadOutcome::Downloaded { descriptor, .. } = outcome else {
        panic!("Expected a fresh download");
    };

    let raw = fs::read_to_string(env.config.version_file()).expect("Descriptor written");
    assert!(!raw.contains("\"tag\""));
    let saved = fetcher.show_version().expect("Readable").expect("Present");
    assert_eq!(saved, descriptor);
    assert_eq!(saved.tag, None);
}

/// What the download writes is exactly what `version` reads back
#[tokio::test]
async fn test_tagged_build_round_trip() {
    let env = TestEnvironment::new();
    let client = MockCiClient::with_run(COMMIT, 17_482_113_905);
    let fetcher = FirmwareFetcher::new(client, &env.config);

    let outcome = fetcher.download(false).await.expect("Download should succeed");
    let DownloadOutcome::Downloaded { descriptor, .. } = outcome else {
        panic!("Expected a fresh download");
    };

    let saved = fetcher.show_version().expect("Readable").expect("Present");
    assert_eq!(saved, descriptor);
    assert_eq!(saved.download_date, descriptor.download_date);
    assert_eq!(saved.tag.as_deref(), Some("v2.3.0"));
}

#[test]
fn test_show_version_without_download() {
    let env = TestEnvironment::new();
    let fetcher = FirmwareFetcher::new(MockCiClient::with_run(COMMIT, 1), &env.config);

    assert!(fetcher.show_version().expect("Absent is not an error").is_none());
}
