//! Contract interface descriptor (ABI).
//!
//! The client fetches the descriptor at runtime instead of bundling it. Only
//! the parts needed to check a call before it is issued are modelled:
//! function names, input/output parameters and state mutability. The array
//! itself is kept verbatim so it can be handed on to other ABI consumers.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::{FN_GET_ALL_COMPLAINTS, FN_RAISE_COMPLAINT, FN_SUBMIT_REVIEW};
use crate::error::AbiError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbiParam {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbiEntry {
    #[serde(rename = "type", default = "default_entry_kind")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub inputs: Vec<AbiParam>,
    #[serde(default)]
    pub outputs: Vec<AbiParam>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_mutability: Option<String>,
}

// ABI entries without a type are functions.
fn default_entry_kind() -> String {
    "function".to_string()
}

impl AbiEntry {
    pub fn is_function(&self) -> bool {
        self.kind == "function"
    }

    pub fn is_read_only(&self) -> bool {
        matches!(self.state_mutability.as_deref(), Some("view") | Some("pure"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceDescriptor {
    raw: Value,
    entries: Vec<AbiEntry>,
}

impl InterfaceDescriptor {
    /// Accepts a bare ABI array, the backend's `{ "abi": [...] }` response,
    /// or a compiled contract artifact (which also carries an `abi` field).
    pub fn from_value(value: Value) -> Result<Self, AbiError> {
        let array = match value {
            Value::Array(_) => value,
            Value::Object(mut map) => map.remove("abi").ok_or(AbiError::MissingAbi)?,
            _ => return Err(AbiError::MissingAbi),
        };
        if !array.is_array() {
            return Err(AbiError::MissingAbi);
        }

        let entries: Vec<AbiEntry> = serde_json::from_value(array.clone())
            .map_err(|e| AbiError::Malformed(e.to_string()))?;
        Ok(Self {
            raw: array,
            entries,
        })
    }

    pub fn entries(&self) -> &[AbiEntry] {
        &self.entries
    }

    pub fn functions(&self) -> impl Iterator<Item = &AbiEntry> {
        self.entries.iter().filter(|e| e.is_function())
    }

    pub fn function(&self, name: &str) -> Option<&AbiEntry> {
        self.functions().find(|e| e.name.as_deref() == Some(name))
    }

    /// The ABI array exactly as it was read, including tuple `components`,
    /// `internalType` and event metadata that [`AbiEntry`] does not model.
    pub fn to_value(&self) -> Value {
        self.raw.clone()
    }

    pub fn capabilities(&self) -> ContractCapabilities {
        ContractCapabilities {
            raise_complaint: self.function(FN_RAISE_COMPLAINT).is_some(),
            submit_review: self.function(FN_SUBMIT_REVIEW).is_some(),
            list_complaints: self.function(FN_GET_ALL_COMPLAINTS).is_some(),
        }
    }
}

/// Which complaint operations the bound contract exposes.
///
/// Whether an unsatisfied review reopens a complaint, and into which state,
/// is decided by the contract. The client only knows whether reviewing is
/// possible at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ContractCapabilities {
    pub raise_complaint: bool,
    pub submit_review: bool,
    pub list_complaints: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    pub fn sample_abi() -> Value {
        json!([
            {
                "type": "function",
                "name": "raiseComplaint",
                "inputs": [
                    {"name": "image", "type": "string"},
                    {"name": "text", "type": "string"},
                    {"name": "blockName", "type": "string"},
                    {"name": "floorNo", "type": "uint256"},
                    {"name": "roomNo", "type": "string"},
                    {"name": "category", "type": "string"}
                ],
                "outputs": [],
                "stateMutability": "nonpayable"
            },
            {
                "type": "function",
                "name": "getAllComplaints",
                "inputs": [],
                "outputs": [{"name": "", "type": "tuple[]"}],
                "stateMutability": "view"
            },
            {
                "type": "event",
                "name": "ComplaintRaised",
                "inputs": [{"name": "id", "type": "uint256"}]
            }
        ])
    }

    #[test]
    fn test_parse_bare_array() {
        let abi = InterfaceDescriptor::from_value(sample_abi()).unwrap();
        assert_eq!(abi.entries().len(), 3);
        assert_eq!(abi.functions().count(), 2);
        assert_eq!(abi.function("raiseComplaint").unwrap().inputs.len(), 6);
        assert!(abi.function("getAllComplaints").unwrap().is_read_only());
        assert!(abi.function("ComplaintRaised").is_none());
    }

    #[test]
    fn test_parse_wrapped_and_artifact() {
        let wrapped = json!({ "abi": sample_abi() });
        assert!(InterfaceDescriptor::from_value(wrapped).is_ok());

        let artifact = json!({ "contractName": "HostelComplaintSystem", "abi": sample_abi(), "networks": {} });
        assert!(InterfaceDescriptor::from_value(artifact).is_ok());
    }

    #[test]
    fn test_missing_abi() {
        assert_eq!(
            InterfaceDescriptor::from_value(json!({"bytecode": "0x"})),
            Err(AbiError::MissingAbi)
        );
        assert_eq!(
            InterfaceDescriptor::from_value(json!("abi")),
            Err(AbiError::MissingAbi)
        );
    }

    #[test]
    fn test_malformed_entry() {
        let bad = json!([{ "type": "function", "inputs": "nope" }]);
        assert!(matches!(
            InterfaceDescriptor::from_value(bad),
            Err(AbiError::Malformed(_))
        ));
    }

    #[test]
    fn test_to_value_is_verbatim() {
        let abi = json!([
            {
                "type": "function",
                "name": "getAllComplaints",
                "inputs": [],
                "outputs": [{
                    "name": "",
                    "type": "tuple[]",
                    "internalType": "struct HostelComplaintSystem.Complaint[]",
                    "components": [
                        {"name": "id", "type": "uint256", "internalType": "uint256"},
                        {"name": "submitter", "type": "address", "internalType": "address"}
                    ]
                }],
                "stateMutability": "view"
            },
            {
                "type": "event",
                "name": "ComplaintRaised",
                "anonymous": false,
                "inputs": [{"name": "id", "type": "uint256", "indexed": true}]
            }
        ]);

        let descriptor = InterfaceDescriptor::from_value(abi.clone()).unwrap();
        assert_eq!(descriptor.to_value(), abi);

        let from_artifact =
            InterfaceDescriptor::from_value(json!({ "contractName": "X", "abi": abi.clone() })).unwrap();
        assert_eq!(from_artifact.to_value(), abi);
        assert_eq!(from_artifact.function("getAllComplaints").unwrap().outputs[0].kind, "tuple[]");
    }

    #[test]
    fn test_capabilities() {
        let caps = InterfaceDescriptor::from_value(sample_abi())
            .unwrap()
            .capabilities();
        assert!(caps.raise_complaint);
        assert!(caps.list_complaints);
        assert!(!caps.submit_review);
    }
}
