use std::process::Command;

use broadside::ReplayStore;

#[test]
fn sim_binary_smoke() {
    let output = Command::new(env!("CARGO_BIN_EXE_sim"))
        .args(["1", "2"])
        .output()
        .expect("failed to run sim binary");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("non utf8 output");
    let v: serde_json::Value = serde_json::from_str(stdout.trim()).expect("invalid json");
    assert!(v["winner"].is_string());
    assert!(v["moves"].as_u64().unwrap() >= 30);
    assert!(v["replay"].is_null());
}

#[test]
fn sim_binary_saves_its_replay() {
    let dir = std::env::temp_dir().join(format!("broadside-sim-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    let output = Command::new(env!("CARGO_BIN_EXE_sim"))
        .args(["7", "8", "--save"])
        .arg(&dir)
        .output()
        .expect("failed to run sim binary");
    assert!(output.status.success());
    let v: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("invalid json");
    let path = v["replay"].as_str().expect("replay path");
    let replay = ReplayStore::load_plain(path).unwrap();
    assert_eq!(replay.winner(), v["winner"].as_str());
    assert_eq!(replay.moves().len() as u64, v["moves"].as_u64().unwrap());
    std::fs::remove_dir_all(&dir).unwrap();
}
