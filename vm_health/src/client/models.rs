use serde::{Deserialize, Serialize};

/// Provisioning state reported for a fully provisioned disk or interface.
pub const PROVISIONING_SUCCEEDED: &str = "Succeeded";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDescription {
    #[serde(default)]
    pub data_disks: Vec<DataDisk>,
    #[serde(default)]
    pub network_interface_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataDisk {
    pub name: String,
    /// Absent for unmanaged (blob-backed) disks.
    #[serde(default)]
    pub managed_disk_id: Option<String>,
}

impl DataDisk {
    pub fn managed(name: impl Into<String>, disk_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            managed_disk_id: Some(disk_id.into()),
        }
    }

    pub fn unmanaged(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            managed_disk_id: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisioningRecord {
    pub name: String,
    pub provisioning_state: String,
}

impl ProvisioningRecord {
    pub fn new(name: impl Into<String>, provisioning_state: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            provisioning_state: provisioning_state.into(),
        }
    }

    pub fn is_succeeded(&self) -> bool {
        self.provisioning_state == PROVISIONING_SUCCEEDED
    }
}
