//! End-to-end pipeline tests: build → push → update_registry

use crate::helpers::*;
use anyhow::Result;

#[test]
fn test_build_places_artifact_under_dist() -> Result<()> {
  let repo = TestRepo::new()?;

  let output = run_crane(&repo, &["build", "kloader"])?;
  assert!(output.status.success(), "stderr: {}", stderr(&output));

  let artifact = repo.path.join("dist/kloader/linux-amd64/kloader");
  assert!(artifact.exists());
  let content = std::fs::read_to_string(&artifact)?;
  assert!(content.contains("linux amd64"));
  Ok(())
}

#[test]
fn test_push_uploads_artifact_and_manifests_to_versioned_path() -> Result<()> {
  let repo = TestRepo::new()?;
  run_crane(&repo, &["build", "kloader"])?;

  let output = run_crane(&repo, &["push", "kloader", "--bucket", "dev"])?;
  assert!(output.status.success(), "stderr: {}", stderr(&output));

  let base = "gs://fake-dev/kloader/0.5.0/linux-amd64";
  assert!(repo.object(&format!("{}/kloader", base)).exists());
  assert!(repo.object(&format!("{}/kloader.md5", base)).exists());
  assert!(repo.object(&format!("{}/kloader.sha1", base)).exists());

  // Sidecar describes the uploaded binary by name.
  let sha1 = std::fs::read_to_string(repo.object(&format!("{}/kloader.sha1", base)))?;
  assert!(sha1.trim().ends_with("kloader"));
  Ok(())
}

#[test]
fn test_push_twice_leaves_identical_object_set() -> Result<()> {
  let repo = TestRepo::new()?;
  run_crane(&repo, &["build", "kloader"])?;

  assert!(run_crane(&repo, &["push", "kloader"])?.status.success());
  let first = list_objects(&repo)?;

  assert!(run_crane(&repo, &["push", "kloader"])?.status.success());
  let second = list_objects(&repo)?;

  assert_eq!(first, second);
  Ok(())
}

#[test]
fn test_push_all_covers_every_release_directory() -> Result<()> {
  let repo = TestRepo::new()?;
  run_crane(&repo, &["build"])?;

  let output = run_crane(&repo, &["push"])?;
  assert!(output.status.success(), "stderr: {}", stderr(&output));
  assert!(repo.object("gs://fake-dev/kloader/0.5.0/linux-amd64/kloader").exists());
  Ok(())
}

#[test]
fn test_push_all_continues_past_a_failing_directory() -> Result<()> {
  let repo = TestRepo::with_config(
    r#"
[[bins]]
name = "alpha"
release = true
targets = ["linux/amd64"]

[[bins]]
name = "kloader"
release = true
targets = ["linux/amd64"]

[buckets]
dev = "gs://fake-dev"
"#,
  )?;
  run_crane(&repo, &["build"])?;

  // Every upload for alpha fails; kloader (sorted after it) must still land.
  let output = run_crane_with_env(&repo, &["push"], &[("CRANE_TEST_FAIL_UPLOAD", "/alpha/")])?;

  assert!(!output.status.success());
  assert_eq!(output.status.code(), Some(2));
  assert!(stderr(&output).contains("upload(s) failed"));
  assert!(repo.object("gs://fake-dev/kloader/0.5.0/linux-amd64/kloader").exists());
  assert!(!repo.object("gs://fake-dev/alpha/0.5.0/linux-amd64/alpha").exists());
  Ok(())
}

#[test]
fn test_push_json_reports_uploaded_uris() -> Result<()> {
  let repo = TestRepo::new()?;
  run_crane(&repo, &["build", "kloader"])?;

  let output = run_crane(&repo, &["push", "kloader", "--json"])?;
  assert!(output.status.success(), "stderr: {}", stderr(&output));

  let out = stdout(&output);
  let json_start = out.find('[').expect("no JSON in output");
  let reports: serde_json::Value = serde_json::from_str(&out[json_start..])?;
  let uploaded = reports[0]["uploaded"].as_array().unwrap();
  assert_eq!(uploaded.len(), 3);
  assert!(uploaded.iter().any(|u| u == "gs://fake-dev/kloader/0.5.0/linux-amd64/kloader"));
  Ok(())
}

#[test]
fn test_update_registry_writes_the_channel_pointer() -> Result<()> {
  let repo = TestRepo::new()?;

  let output = run_crane(&repo, &["update_registry", "--bucket", "dev"])?;
  assert!(output.status.success(), "stderr: {}", stderr(&output));

  let pointer = repo.object("gs://fake-dev/kloader/latest.txt");
  assert_eq!(std::fs::read_to_string(pointer)?, "0.5.0");
  Ok(())
}

#[test]
fn test_update_registry_refuses_when_nothing_is_release_eligible() -> Result<()> {
  let repo = TestRepo::with_config(
    r#"
[[bins]]
name = "devtool"
release = false

[buckets]
dev = "gs://fake-dev"
"#,
  )?;

  let output = run_crane(&repo, &["update_registry"])?;

  assert!(!output.status.success());
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("no registry pointer was moved"));
  assert!(!repo.object("gs://fake-dev/devtool/latest.txt").exists());
  Ok(())
}

#[test]
fn test_build_aborts_remaining_jobs_on_first_failure() -> Result<()> {
  let repo = TestRepo::with_config(
    r#"
[[bins]]
name = "kloader"
release = true
targets = ["linux/amd64", "linux/arm64", "darwin/amd64"]

[buckets]
dev = "gs://fake-dev"
"#,
  )?;

  let output = run_crane_with_env(&repo, &["build", "kloader"], &[("CRANE_TEST_FAIL_GOARCH", "arm64")])?;

  // The compiler's own exit status propagates.
  assert_eq!(output.status.code(), Some(7));
  assert!(stderr(&output).contains("linux/arm64"));

  // First job completed, third was never attempted.
  assert!(repo.path.join("dist/kloader/linux-amd64/kloader").exists());
  assert!(!repo.path.join("dist/kloader/darwin-amd64").exists());
  Ok(())
}

#[test]
fn test_push_refuses_non_release_target() -> Result<()> {
  let repo = TestRepo::with_config(
    r#"
[[bins]]
name = "devtool"
release = false

[buckets]
dev = "gs://fake-dev"
"#,
  )?;
  run_crane(&repo, &["build", "devtool"])?;

  let output = run_crane(&repo, &["push", "devtool"])?;
  assert!(!output.status.success());
  assert!(stderr(&output).contains("not a release target"));
  Ok(())
}

fn list_objects(repo: &TestRepo) -> Result<Vec<String>> {
  let mut objects = Vec::new();
  for entry in walk(&repo.bucket_root)? {
    objects.push(entry);
  }
  objects.sort();
  Ok(objects)
}

fn walk(dir: &std::path::Path) -> Result<Vec<String>> {
  let mut files = Vec::new();
  if !dir.exists() {
    return Ok(files);
  }
  for entry in std::fs::read_dir(dir)? {
    let entry = entry?;
    if entry.file_type()?.is_dir() {
      files.extend(walk(&entry.path())?);
    } else {
      files.push(entry.path().to_string_lossy().into_owned());
    }
  }
  Ok(files)
}
