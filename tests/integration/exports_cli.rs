use std::process::{Command, Output};

use crate::common::{fixture, BINARY_PATH};

fn run_exports(aws_json: &str, profile: &str) -> Output {
    Command::new(BINARY_PATH)
        .arg("exports")
        .arg("--aws-json")
        .arg(aws_json)
        .arg("--profile")
        .arg(profile)
        .output()
        .expect("exports should run")
}

#[test]
fn exports_prints_sorted_export_lines() {
    let output = run_exports(&fixture("aws_valid.json"), "jhu_ue1");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8(output.stdout).expect("stdout is UTF-8");
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec![
            "export VAGRANT_APPLICATION=k2bench",
            "export VAGRANT_AWS_AMI=ami-0abcdef",
            "export VAGRANT_AWS_EC2_BID_PRICE=0.10",
            "export VAGRANT_AWS_EC2_INSTANCE_TYPE=c5.4xlarge",
            "export VAGRANT_AWS_EC2_KEYPAIR=devbox-east",
            "export VAGRANT_AWS_PROFILE=jhu",
            "export VAGRANT_AWS_REGION=us-east-1",
            "export VAGRANT_AWS_SECURITY_GROUP=sg-0f00ba4",
            "export VAGRANT_AWS_SUBNET_ID=subnet-aaa111",
        ]
    );
}

#[test]
fn exports_output_is_identical_across_invocations() {
    let first = run_exports(&fixture("aws_valid.json"), "jhu_ue1");
    let second = run_exports(&fixture("aws_valid.json"), "jhu_ue1");
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn unknown_profile_fails_with_a_configuration_error() {
    let output = run_exports(&fixture("aws_valid.json"), "nope");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("No profile named `nope`"),
        "stderr: {stderr}"
    );
}

#[test]
fn missing_profile_document_fails_before_anything_else() {
    let output = run_exports(&fixture("does_not_exist.json"), "jhu_ue1");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Failed to read configuration file"),
        "stderr: {stderr}"
    );
}
