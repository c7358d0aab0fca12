//! Verified download tests against a local HTTP server.

mod common;

use std::sync::Arc;

use common::{files_in, fixtures, CameraServer, Dirs, TruncatingServer};
use lumixdump_core::testing::MockVerifier;
use lumixdump_core::{DownloadError, ImageVerifier, TargetLocations, Verifier};
use sha2::{Digest, Sha256};

#[tokio::test]
async fn test_verified_file_is_committed() {
    let server = CameraServer::start().await;
    let jpeg = fixtures::jpeg_bytes(64, 48);
    server.put_file("DO1050344.JPG", jpeg.clone()).await;

    let dirs = Dirs::new();
    std::fs::create_dir_all(dirs.output()).unwrap();
    let mut targets = TargetLocations::new(dirs.output());
    let verifier = ImageVerifier::new();

    let file = dirs
        .downloader()
        .download_and_verify(&server.url("DO1050344.JPG"), &mut targets, Some(&verifier))
        .await
        .unwrap();

    assert_eq!(file.file_name, "DO1050344.JPG");
    assert_eq!(file.path, dirs.output().join("DO1050344.JPG"));
    assert_eq!(file.size_bytes, jpeg.len() as u64);
    assert_eq!(
        file.sha256.as_deref(),
        Some(format!("{:x}", Sha256::digest(&jpeg)).as_str())
    );
    assert_eq!(std::fs::read(&file.path).unwrap(), jpeg);
    assert!(targets.is_completed("DO1050344.JPG"));
    assert!(files_in(&dirs.staging()).is_empty());
}

#[tokio::test]
async fn test_missing_file_is_http_status() {
    let server = CameraServer::start().await;
    let dirs = Dirs::new();
    let mut targets = TargetLocations::new(dirs.output());

    let err = dirs
        .downloader()
        .download_and_verify(&server.url("DO1050344.RW2"), &mut targets, None)
        .await
        .unwrap_err();

    assert!(err.is_http_status());
    assert!(matches!(err, DownloadError::HttpStatus { status: 404, .. }));
    assert_eq!(targets.pending_files(), vec!["DO1050344.RW2"]);
    assert!(files_in(&dirs.output()).is_empty());
    assert!(files_in(&dirs.staging()).is_empty());
}

#[tokio::test]
async fn test_rejected_file_never_reaches_output() {
    let server = CameraServer::start().await;
    server.put_file("DO1050344.JPG", b"not a jpeg at all".to_vec()).await;

    let dirs = Dirs::new();
    std::fs::create_dir_all(dirs.output()).unwrap();
    let mut targets = TargetLocations::new(dirs.output());
    let verifier = ImageVerifier::new();

    let err = dirs
        .downloader()
        .download_and_verify(&server.url("DO1050344.JPG"), &mut targets, Some(&verifier))
        .await
        .unwrap_err();

    match err {
        DownloadError::Verification(e) => {
            assert_eq!(e.verifier, "image");
            assert_eq!(e.file_name, "DO1050344.JPG");
        }
        other => panic!("expected verification error, got {:?}", other),
    }
    assert!(!targets.is_completed("DO1050344.JPG"));
    assert!(files_in(&dirs.output()).is_empty());
    assert!(files_in(&dirs.staging()).is_empty());
}

#[tokio::test]
async fn test_verifier_sees_complete_staged_file() {
    let server = CameraServer::start().await;
    let body = vec![7u8; 100_000];
    server.put_file("DO1050345.MP4", body.clone()).await;

    let dirs = Dirs::new();
    std::fs::create_dir_all(dirs.output()).unwrap();
    let mut targets = TargetLocations::new(dirs.output());
    let verifier = Arc::new(MockVerifier::accepting());

    dirs.downloader()
        .download_and_verify(
            &server.url("DO1050345.MP4"),
            &mut targets,
            Some(verifier.as_ref() as &dyn Verifier),
        )
        .await
        .unwrap();

    let verified = verifier.verified_files().await;
    assert_eq!(verified.len(), 1);
    assert!(verified[0].starts_with(dirs.staging()));
    let staged_name = verified[0].file_name().unwrap().to_string_lossy().into_owned();
    assert!(staged_name.starts_with("lumix_temp_"));
    assert!(staged_name.ends_with("_DO1050345.MP4"));
    assert_eq!(std::fs::read(dirs.output().join("DO1050345.MP4")).unwrap(), body);
}

#[tokio::test]
async fn test_truncated_transfer_is_interrupted() {
    let body = fixtures::jpeg_bytes(128, 128);
    let server = TruncatingServer::start(body.clone(), body.len() / 2).await;

    let dirs = Dirs::new();
    std::fs::create_dir_all(dirs.output()).unwrap();
    let mut targets = TargetLocations::new(dirs.output());

    let err = dirs
        .downloader()
        .download_and_verify(&server.url("DO1050346.JPG"), &mut targets, None)
        .await
        .unwrap_err();

    assert!(
        matches!(err, DownloadError::StreamInterrupted { .. }),
        "got {:?}",
        err
    );
    assert_eq!(targets.pending_files(), vec!["DO1050346.JPG"]);
    assert!(files_in(&dirs.output()).is_empty());
    assert!(files_in(&dirs.staging()).is_empty());
}

#[tokio::test]
async fn test_query_string_is_not_part_of_file_name() {
    let server = CameraServer::start().await;
    server.put_file("DO1050347.JPG", fixtures::jpeg_bytes(8, 8)).await;

    let dirs = Dirs::new();
    std::fs::create_dir_all(dirs.output()).unwrap();
    let mut targets = TargetLocations::new(dirs.output());

    let url = format!("{}?size=original", server.url("DO1050347.JPG"));
    let file = dirs
        .downloader()
        .download_and_verify(&url, &mut targets, None)
        .await
        .unwrap();

    assert_eq!(file.file_name, "DO1050347.JPG");
    assert_eq!(files_in(&dirs.output()), vec!["DO1050347.JPG"]);
}
