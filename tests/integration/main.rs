//! Integration tests for the mcinit CLI

mod cli_tests {
    use assert_cmd::Command;
    use predicates::prelude::*;
    use tempfile::TempDir;

    fn mcinit() -> Command {
        Command::cargo_bin("mcinit").unwrap()
    }

    #[test]
    fn help_displays() {
        mcinit()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Minecraft developer server"));
    }

    #[test]
    fn version_displays() {
        mcinit()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("mcinit"));
    }

    #[test]
    fn status_reports_stopped_in_fresh_dir() {
        let temp = TempDir::new().unwrap();
        mcinit()
            .arg("status")
            .current_dir(temp.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("STOPPED"));
    }

    #[test]
    fn stop_fails_when_not_running() {
        let temp = TempDir::new().unwrap();
        mcinit()
            .arg("stop")
            .current_dir(temp.path())
            .assert()
            .failure()
            .stderr(predicate::str::contains("not running"));
    }

    #[test]
    fn start_fails_without_config() {
        let temp = TempDir::new().unwrap();
        mcinit()
            .arg("start")
            .current_dir(temp.path())
            .assert()
            .failure()
            .stderr(predicate::str::contains("Configuration file not found"))
            .stderr(predicate::str::contains("mcinit init"));
    }

    #[test]
    fn logs_fail_without_log_file() {
        let temp = TempDir::new().unwrap();
        mcinit()
            .arg("logs")
            .current_dir(temp.path())
            .assert()
            .failure()
            .stderr(predicate::str::contains("Log file not found"));
    }

    #[test]
    fn init_dry_run_prints_plan_and_writes_nothing() {
        let temp = TempDir::new().unwrap();
        mcinit()
            .args([
                "--dry-run",
                "init",
                "--type",
                "paper",
                "--mc",
                "1.21.4",
                "--path",
                "srv",
                "--ram",
                "4G",
            ])
            .current_dir(temp.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("[DRY RUN]"))
            .stdout(predicate::str::contains("Xms=4G Xmx=4G"));

        assert!(!temp.path().join("srv").exists());
    }

    #[test]
    fn init_rejects_unknown_server_type() {
        let temp = TempDir::new().unwrap();
        mcinit()
            .args(["init", "--type", "forge", "--mc", "1.21.4"])
            .current_dir(temp.path())
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unknown server type"));
    }

    #[test]
    fn versions_for_bungee_reports_manual_download() {
        // no network: the bungee provider fails before any request
        mcinit()
            .args(["versions", "--type", "bungee"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("manual download required"));
    }

    #[test]
    fn invalid_subcommand_fails() {
        mcinit().arg("deploy").assert().failure();
    }
}
