//! Integration tests for the dfgen CLI.
//!
//! These tests run the compiled binary against the configs in `demos/`
//! and against configs written into temp directories.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use assert_fs::prelude::*;
use predicates::prelude::*;
use std::path::PathBuf;

fn demo(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos").join(path)
}

/// dfgen command isolated from the caller's environment.
///
/// Runs inside `temp` so `./conf` and `.` on the search path are empty,
/// and points the user config directory there too.
fn dfgen(temp: &assert_fs::TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("dfgen");
    cmd.current_dir(temp.path());
    cmd.env_remove("RUST_LOG");
    cmd.env_remove("DOCKER_IMAGER_PATH");
    cmd.env_remove("DOCKER_IMAGER_SAVE_DIR");
    cmd.env("XDG_CONFIG_HOME", temp.path().join("xdg"));
    cmd
}

/// Write a template and a config referencing it.
fn write_config(temp: &assert_fs::TempDir, name: &str, template: &str, config: &str) {
    temp.child("t.mustache").write_str(template).unwrap();
    temp.child(name).write_str(config).unwrap();
}

// ============================================================================
// Basic CLI tests
// ============================================================================

#[test]
fn cli_no_args_shows_usage() {
    let temp = assert_fs::TempDir::new().unwrap();
    dfgen(&temp)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn cli_help_lists_subcommands() {
    let temp = assert_fs::TempDir::new().unwrap();
    dfgen(&temp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("gen"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("dump"))
        .stdout(predicate::str::contains("run"));
}

// ============================================================================
// gen
// ============================================================================

#[test]
fn gen_demo_config_to_stdout() {
    let temp = assert_fs::TempDir::new().unwrap();
    dfgen(&temp)
        .arg("gen")
        .arg(demo("conf/ubu18.conf.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("FROM ubuntu:18.04"))
        .stdout(predicate::str::contains(
            "apt-get install -y curl wget ca-certificates build-essential \\\ngit unzip",
        ))
        .stdout(predicate::str::contains("RUN mkdir -p /opt/app /var/log/app\n"))
        .stdout(predicate::str::contains(
            "ADD https://downloads.example.com/app/app-2.4.tgz /tmp/app-2.4.tgz\n\
             RUN tar -zxf /tmp/app-2.4.tgz -C /opt/app\n",
        ))
        .stdout(predicate::str::contains(
            "RUN cd /usr/local/lib && ln -s libfoo.so.1.2 libfoo.so\n",
        ))
        .stdout(predicate::str::contains(
            "RUN ln -s /opt/app/bin/app /usr/local/bin/app && ln -s /opt/app/etc /etc/app",
        ))
        .stdout(predicate::str::contains("ENV LANG=C.UTF-8 APP_HOME=/opt/app\n"))
        .stdout(predicate::str::contains("agent.tgz").not())
        .stdout(predicate::str::contains("yum").not())
        .stderr(predicate::str::contains("# To save append: ... > Dockerfile.ubu18"))
        .stderr(predicate::str::contains("# ... or use --save"))
        .stderr(predicate::str::contains("Skipping disabled external package"));
}

#[test]
fn gen_legacy_keys_config() {
    let temp = assert_fs::TempDir::new().unwrap();
    dfgen(&temp)
        .arg("gen")
        .arg(demo("conf/centos7.conf.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("RUN yum install -y wget unzip tar \\\n"))
        .stdout(predicate::str::contains(
            "RUN wget ftp://mirror.example.com/rpms/monitor-agent-3.1.rpm -O /tmp/monitor-agent-3.1.rpm\n\
             RUN rpm -ivh --force /tmp/monitor-agent-3.1.rpm\n",
        ))
        .stdout(predicate::str::contains(
            "COPY vendor/tools.zip /tmp/tools.zip\nRUN unzip -o /tmp/tools.zip -d /opt/tools\n",
        ))
        .stdout(predicate::str::contains(
            "RUN tar -zxf /tmp/build-kit.tar.gz\nRUN cd /tmp/build-kit && ./install.sh\n",
        ))
        .stdout(predicate::str::contains("apt-get").not());
}

#[test]
fn gen_by_name_on_search_path() {
    let temp = assert_fs::TempDir::new().unwrap();
    dfgen(&temp)
        .env("DOCKER_IMAGER_PATH", demo("conf"))
        .args(["gen", "ubu18"])
        .assert()
        .success()
        .stdout(predicate::str::contains("FROM ubuntu:18.04"));
}

#[test]
fn gen_save_writes_file_and_warns_on_overwrite() {
    let temp = assert_fs::TempDir::new().unwrap();
    let out = temp.child("out");
    out.create_dir_all().unwrap();

    dfgen(&temp)
        .env("DOCKER_IMAGER_SAVE_DIR", out.path())
        .arg("gen")
        .arg(demo("conf/ubu18.conf.json"))
        .arg("--save")
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Overwriting").not());

    out.child("Dockerfile.ubu18")
        .assert(predicate::str::contains("FROM ubuntu:18.04"));

    dfgen(&temp)
        .env("DOCKER_IMAGER_SAVE_DIR", out.path())
        .arg("gen")
        .arg(demo("conf/ubu18.conf.json"))
        .arg("--save")
        .assert()
        .success()
        .stderr(predicate::str::contains("Overwriting"));
}

#[test]
fn gen_default_file_name_without_image() {
    let temp = assert_fs::TempDir::new().unwrap();
    write_config(&temp, "x.conf.json", "FROM scratch\n", r#"{"templateFile": "t.mustache"}"#);

    dfgen(&temp)
        .args(["gen", "./x.conf.json", "--save"])
        .assert()
        .success();
    temp.child("Dockerfile").assert("FROM scratch\n");
}

#[test]
fn gen_unknown_config_fails() {
    let temp = assert_fs::TempDir::new().unwrap();
    dfgen(&temp)
        .args(["gen", "nope"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Config 'nope' not found"));
}

#[test]
fn gen_without_template_fails() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("x.conf.json").write_str(r#"{"image": "x"}"#).unwrap();

    dfgen(&temp)
        .args(["gen", "x"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Template not available"));
}

#[test]
fn gen_shared_object_without_destination_fails() {
    let temp = assert_fs::TempDir::new().unwrap();
    write_config(
        &temp,
        "so.conf.json",
        "{{#externalPackages}}{{{ cont }}}{{/externalPackages}}",
        r#"{"templateFile": "t.mustache", "externalPackages": [{"url": "http://h/libfoo.so.1"}]}"#,
    );

    dfgen(&temp)
        .args(["gen", "so"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("libfoo.so.1"))
        .stderr(predicate::str::contains("destinationPath"));
}

#[test]
fn gen_invalid_packages_per_line_fails() {
    let temp = assert_fs::TempDir::new().unwrap();
    write_config(
        &temp,
        "ppl.conf.json",
        "{{{ packageListBlock }}}",
        r#"{"templateFile": "t.mustache", "packageListInline": ["a"], "packagesPerLine": 0}"#,
    );

    dfgen(&temp)
        .args(["gen", "ppl"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("packagesPerLine"));
}

#[test]
fn gen_malformed_symlinks_fails() {
    let temp = assert_fs::TempDir::new().unwrap();
    write_config(
        &temp,
        "links.conf.json",
        "{{{ symlinkBlock }}}",
        r#"{"templateFile": "t.mustache", "symlinks": {"a": "b"}}"#,
    );

    dfgen(&temp)
        .args(["gen", "links"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid symlinks section"));
}

// ============================================================================
// list / dump / run
// ============================================================================

#[test]
fn list_shows_configs_on_search_path() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("conf/local.conf.json").write_str("{}").unwrap();

    dfgen(&temp)
        .env("DOCKER_IMAGER_PATH", demo("conf"))
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("centos7.conf.json"))
        .stdout(predicate::str::contains("ubu18.conf.json"))
        .stdout(predicate::str::contains("- ./conf/local.conf.json"))
        .stdout(predicate::str::contains("Pass one of these to: dfgen gen ..."));
}

#[test]
fn dump_embeds_package_list() {
    let temp = assert_fs::TempDir::new().unwrap();
    let output = dfgen(&temp)
        .arg("dump")
        .arg(demo("conf/ubu18.conf.json"))
        .output()
        .unwrap();
    assert!(output.status.success());

    let dumped: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        dumped["packageListInline"],
        serde_json::json!(["curl", "wget", "ca-certificates", "build-essential", "git", "unzip"])
    );
    assert!(dumped.get("packageListFile").is_none());
    assert_eq!(dumped["dockerFileName"], "Dockerfile.ubu18");
    assert_eq!(dumped["baseImage"], "ubuntu:18.04");
}

#[test]
fn run_prints_docker_command() {
    let temp = assert_fs::TempDir::new().unwrap();
    dfgen(&temp)
        .arg("run")
        .arg(demo("conf/ubu18.conf.json"))
        .assert()
        .success()
        .stdout("docker run -i -t ubu18:1.0\n");
}

#[test]
fn run_without_image_fails() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("x.conf.json").write_str("{}").unwrap();

    dfgen(&temp)
        .args(["run", "x"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("image"));
}
