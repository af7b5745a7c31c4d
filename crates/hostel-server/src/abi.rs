//! Contract interface descriptor served to clients.

use std::path::Path;

use hostel_shared::InterfaceDescriptor;

/// Read a Truffle build artifact (`{ "abi": [...] , ... }`) or a bare ABI
/// array from disk.
pub fn load_descriptor(path: &Path) -> anyhow::Result<InterfaceDescriptor> {
    let raw = std::fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&raw)?;
    Ok(InterfaceDescriptor::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_load_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("HostelComplaintSystem.json");
        let artifact = json!({
            "contractName": "HostelComplaintSystem",
            "abi": [{
                "type": "function",
                "name": "getAllComplaints",
                "inputs": [],
                "outputs": [],
                "stateMutability": "view"
            }],
            "bytecode": "0x"
        });
        std::fs::write(&path, artifact.to_string()).unwrap();

        let descriptor = load_descriptor(&path).unwrap();
        assert!(descriptor.capabilities().list_complaints);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_descriptor(&dir.path().join("nope.json")).is_err());
    }
}
