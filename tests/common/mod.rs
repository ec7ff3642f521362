#![allow(dead_code)]

pub mod mock_api;

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::TempDir;

use mock_api::{CLIENT_ID, CLIENT_SECRET, MockTravelApi};

pub fn routewise_binary() -> &'static str {
    env!("CARGO_BIN_EXE_routewise")
}

/// Helper struct to run routewise commands against an isolated root directory
pub struct RouteWiseTest {
    pub temp_dir: TempDir,
    env: Vec<(String, String)>,
}

impl RouteWiseTest {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        RouteWiseTest {
            temp_dir,
            env: Vec::new(),
        }
    }

    /// Point the binary at a fake travel API with valid credentials.
    pub fn with_api(api: &MockTravelApi) -> Self {
        Self::new()
            .env("ROUTEWISE_API_URL", &api.url())
            .env("AMADEUS_API_KEY", CLIENT_ID)
            .env("AMADEUS_API_SECRET", CLIENT_SECRET)
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.env.push((key.to_string(), value.to_string()));
        self
    }

    pub fn root(&self) -> PathBuf {
        self.temp_dir.path().join("root")
    }

    pub fn run(&self, args: &[&str]) -> Output {
        let mut cmd = Command::new(routewise_binary());
        cmd.args(args)
            .current_dir(self.temp_dir.path())
            .env("ROUTEWISE_ROOT", self.root())
            .env("NO_COLOR", "1")
            .env_remove("AMADEUS_API_KEY")
            .env_remove("AMADEUS_API_SECRET")
            .env_remove("ROUTEWISE_API_URL")
            .env_remove("ROUTEWISE_LOG");
        for (key, value) in &self.env {
            cmd.env(key, value);
        }
        cmd.output().expect("Failed to execute routewise command")
    }

    pub fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args);
        if !output.status.success() {
            panic!(
                "Command {:?} failed with status {:?}\nstdout: {}\nstderr: {}",
                args,
                output.status,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    pub fn run_failure(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            !output.status.success(),
            "Expected command {:?} to fail, but it succeeded",
            args
        );
        String::from_utf8_lossy(&output.stderr).to_string()
    }

    /// Run a command with `--json` appended and parse its output.
    pub fn run_json(&self, args: &[&str]) -> Value {
        let mut args = args.to_vec();
        args.push("--json");
        let stdout = self.run_success(&args);
        serde_json::from_str(&stdout)
            .unwrap_or_else(|e| panic!("Invalid JSON from {:?}: {}\n{}", args, e, stdout))
    }

    pub fn write_config(&self, content: &str) {
        let root = self.root();
        fs::create_dir_all(&root).expect("Failed to create root directory");
        fs::write(root.join("config.yaml"), content).expect("Failed to write config file");
    }

    pub fn read_config(&self) -> String {
        fs::read_to_string(self.root().join("config.yaml")).expect("Failed to read config file")
    }

    pub fn itinerary_path(&self) -> PathBuf {
        self.root().join("storage").join("routewise-itinerary.json")
    }

    pub fn write_itinerary(&self, content: &str) {
        let path = self.itinerary_path();
        fs::create_dir_all(path.parent().unwrap()).expect("Failed to create storage directory");
        fs::write(path, content).expect("Failed to write itinerary");
    }

    pub fn read_itinerary(&self) -> Option<Value> {
        let text = fs::read_to_string(self.itinerary_path()).ok()?;
        Some(serde_json::from_str(&text).expect("Stored itinerary is not JSON"))
    }

    /// Ids of the persisted destinations, in order.
    pub fn saved_ids(&self) -> Vec<String> {
        self.read_itinerary()
            .and_then(|v| v["destinations"].as_array().cloned())
            .unwrap_or_default()
            .iter()
            .filter_map(|d| d["id"].as_str().map(String::from))
            .collect()
    }
}
