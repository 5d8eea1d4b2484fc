//! Shared fixtures for drscan-client integration tests

#![allow(dead_code)]

use drscan_client::CandidateFile;
use serde_json::{json, Value};

/// Small ASCII payload so multipart bodies stay UTF-8 for body matchers
pub fn fundus_image() -> CandidateFile {
    CandidateFile::new("fundus.png", "image/png", b"fake-png-bytes".to_vec())
}

/// Successful `/predict` body with "No DR" on top
pub fn no_dr_body() -> Value {
    json!({
        "detailed_classification": {
            "No DR": 80, "Mild": 10, "Moderate": 5, "Severe": 3, "Proliferative DR": 2
        },
        "highest_probability_class": "No DR"
    })
}

/// Successful `/predict` body naming a label absent from the mapping
pub fn unknown_highest_body() -> Value {
    json!({
        "detailed_classification": {
            "No DR": 20, "Mild": 20, "Moderate": 20, "Severe": 20, "Proliferative DR": 20
        },
        "highest_probability_class": "Unknown"
    })
}

/// Base URL of a local port with nothing listening
pub fn unreachable_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}
