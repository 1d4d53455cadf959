//! Unit tests for pipeline orchestration.
//!
//! These tests drive `run_pipeline` with a stub checksum executor and an
//! in-memory release so the order of subprocess and API calls can be
//! asserted end to end.

use super::{PipelineContext, PublishReport, run_pipeline};
use crate::artifact::ArtifactPair;
use crate::config::PublishConfig;
use crate::error::{PublishError, Result};
use crate::release::{MockReleaseApi, Release, ReleaseApi, ReleaseAsset, Repository};
use crate::test_utils::{ExpectedCall, StubExecutor, output_with, success_output};
use camino::{Utf8Path, Utf8PathBuf};
use rstest::{fixture, rstest};
use std::cell::RefCell;
use tempfile::TempDir;

const TOOL: &str = "bin/md5-tool";

/// In-memory release that records every API call in order.
struct FakeRelease {
    tag: &'static str,
    assets: RefCell<Vec<ReleaseAsset>>,
    next_id: RefCell<u64>,
    calls: RefCell<Vec<String>>,
}

impl FakeRelease {
    fn new(tag: &'static str, existing: &[(u64, &str)]) -> Self {
        Self {
            tag,
            assets: RefCell::new(
                existing
                    .iter()
                    .map(|(id, name)| ReleaseAsset {
                        id: *id,
                        name: (*name).to_owned(),
                    })
                    .collect(),
            ),
            next_id: RefCell::new(1000),
            calls: RefCell::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn asset_names(&self) -> Vec<String> {
        self.assets.borrow().iter().map(|a| a.name.clone()).collect()
    }
}

impl ReleaseApi for FakeRelease {
    fn get_release_by_tag(&self, _repository: &Repository, tag: &str) -> Result<Release> {
        self.calls.borrow_mut().push(format!("get {tag}"));
        if tag != self.tag {
            return Err(PublishError::NotFound {
                resource: format!("release {tag}"),
            });
        }
        Ok(Release {
            id: 7,
            tag_name: tag.to_owned(),
        })
    }

    fn list_release_assets(
        &self,
        _repository: &Repository,
        release_id: u64,
    ) -> Result<Vec<ReleaseAsset>> {
        self.calls.borrow_mut().push(format!("list {release_id}"));
        Ok(self.assets.borrow().clone())
    }

    fn delete_release_asset(&self, _repository: &Repository, asset_id: u64) -> Result<()> {
        self.calls.borrow_mut().push(format!("delete {asset_id}"));
        self.assets.borrow_mut().retain(|asset| asset.id != asset_id);
        Ok(())
    }

    fn upload_release_asset(
        &self,
        _repository: &Repository,
        _release_id: u64,
        name: &str,
        _data: &[u8],
    ) -> Result<ReleaseAsset> {
        self.calls.borrow_mut().push(format!("upload {name}"));
        let mut next_id = self.next_id.borrow_mut();
        *next_id += 1;
        let asset = ReleaseAsset {
            id: *next_id,
            name: name.to_owned(),
        };
        self.assets.borrow_mut().push(asset.clone());
        Ok(asset)
    }
}

/// Two libraries with their checksum outputs inside a temporary directory.
struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
    pairs: Vec<ArtifactPair>,
    config: PublishConfig,
}

impl Workspace {
    fn context(&self, dry_run: bool) -> PipelineContext<'_> {
        PipelineContext {
            config: &self.config,
            pairs: &self.pairs,
            checksum_tool: Utf8Path::new(TOOL),
            dry_run,
            quiet: false,
        }
    }

    fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }

    fn checksum_calls(&self) -> Vec<ExpectedCall> {
        ["liba", "libb"]
            .into_iter()
            .map(|lib| {
                ExpectedCall::checksum(
                    TOOL,
                    self.path(&format!("{lib}.so")),
                    self.path(&format!("{lib}.md5")),
                    Ok(success_output()),
                )
            })
            .collect()
    }
}

#[fixture]
fn workspace() -> Workspace {
    let dir = tempfile::tempdir().expect("temp dir");
    let root = Utf8PathBuf::try_from(dir.path().to_path_buf()).expect("UTF-8 path");
    for name in ["liba.so", "liba.md5", "libb.so", "libb.md5"] {
        std::fs::write(root.join(name), name.as_bytes()).expect("write artifact");
    }
    let pairs = vec![
        ArtifactPair::new(root.join("liba.so"), root.join("liba.md5")),
        ArtifactPair::new(root.join("libb.so"), root.join("libb.md5")),
    ];
    let config = PublishConfig::from_lookup(|key| match key {
        "ACCESS_TOKEN" => Some("t".to_owned()),
        "OWNER" => Some("o".to_owned()),
        "REPO" => Some("r".to_owned()),
        "RELEASE_TAG" => Some("v1".to_owned()),
        _ => None,
    })
    .expect("complete config");
    Workspace {
        _dir: dir,
        root,
        pairs,
        config,
    }
}

#[rstest]
fn full_run_checksums_then_uploads_in_order(workspace: Workspace) {
    let executor = StubExecutor::new(workspace.checksum_calls());
    let release = FakeRelease::new("v1", &[(42, "liba.so")]);
    let mut stderr: Vec<u8> = Vec::new();

    let report = run_pipeline(&workspace.context(false), &executor, &release, &mut stderr)
        .expect("pipeline should succeed");

    executor.assert_finished();
    assert_eq!(
        release.calls(),
        [
            "get v1", "list 7", "delete 42", "upload liba.so",
            "get v1", "list 7", "upload liba.md5",
            "get v1", "list 7", "upload libb.so",
            "get v1", "list 7", "upload libb.md5",
        ]
    );
    assert_eq!(report.published.len(), 4);
    assert_eq!(report.replaced_count(), 1);

    let output = String::from_utf8(stderr).expect("stderr was not UTF-8");
    assert!(output.contains("uploaded liba.so (replaced asset 42)"));
}

#[rstest]
fn checksum_stderr_aborts_before_any_upload(workspace: Workspace) {
    let executor = StubExecutor::new(vec![ExpectedCall::checksum(
        TOOL,
        workspace.path("liba.so"),
        workspace.path("liba.md5"),
        Ok(output_with(0, "error: cannot open input")),
    )]);
    let mut api = MockReleaseApi::new();
    api.expect_get_release_by_tag().never();
    api.expect_upload_release_asset().never();

    let err = run_pipeline(&workspace.context(false), &executor, &api, &mut Vec::<u8>::new())
        .expect_err("stderr output should abort the run");

    assert!(matches!(err, PublishError::Generation { .. }));
    assert_eq!(executor.calls().len(), 1, "second checksum must not run");
}

#[rstest]
fn second_checksum_failure_still_prevents_uploads(workspace: Workspace) {
    let mut calls = workspace.checksum_calls();
    if let Some(second) = calls.get_mut(1) {
        second.result = Ok(output_with(1, "disk full"));
    }
    let executor = StubExecutor::new(calls);
    let release = FakeRelease::new("v1", &[]);

    let err = run_pipeline(&workspace.context(false), &executor, &release, &mut Vec::<u8>::new())
        .expect_err("second checksum failure should abort");

    assert!(matches!(err, PublishError::Generation { ref message, .. } if message == "disk full"));
    assert!(release.calls().is_empty());
}

#[rstest]
fn unknown_tag_stops_after_first_lookup(workspace: Workspace) {
    let executor = StubExecutor::new(workspace.checksum_calls());
    let release = FakeRelease::new("v2", &[]);

    let err = run_pipeline(&workspace.context(false), &executor, &release, &mut Vec::<u8>::new())
        .expect_err("unknown tag should fail");

    assert!(matches!(err, PublishError::NotFound { .. }));
    assert_eq!(release.calls(), ["get v1"]);
}

#[rstest]
fn republishing_leaves_one_asset_per_name(workspace: Workspace) {
    let release = FakeRelease::new("v1", &[]);

    for _ in 0..2 {
        let executor = StubExecutor::new(workspace.checksum_calls());
        run_pipeline(&workspace.context(false), &executor, &release, &mut Vec::<u8>::new())
            .expect("pipeline should succeed");
    }

    let mut names = release.asset_names();
    names.sort();
    assert_eq!(names, ["liba.md5", "liba.so", "libb.md5", "libb.so"]);
}

#[rstest]
fn dry_run_touches_nothing(workspace: Workspace) {
    let executor = StubExecutor::new(Vec::new());
    let release = FakeRelease::new("v1", &[]);
    let mut stderr: Vec<u8> = Vec::new();

    let report = run_pipeline(&workspace.context(true), &executor, &release, &mut stderr)
        .expect("dry run should succeed");

    assert_eq!(report, PublishReport::default());
    assert!(executor.calls().is_empty());
    assert!(release.calls().is_empty());
    let output = String::from_utf8(stderr).expect("stderr was not UTF-8");
    assert!(output.contains("Dry run"));
    assert!(output.contains(&format!("{TOOL} --in {}", workspace.path("liba.so"))));
    assert!(output.contains("o/r release v1"));
}

#[rstest]
fn quiet_run_writes_no_progress(workspace: Workspace) {
    let executor = StubExecutor::new(workspace.checksum_calls());
    let release = FakeRelease::new("v1", &[]);
    let mut stderr: Vec<u8> = Vec::new();
    let context = PipelineContext {
        quiet: true,
        ..workspace.context(false)
    };

    run_pipeline(&context, &executor, &release, &mut stderr).expect("pipeline should succeed");
    assert!(stderr.is_empty());
}
