//! In-memory resource client backed by a point-in-time snapshot of
//! provider state. Snapshots can be loaded from JSON, TOML or YAML files.

use super::models::{DataDisk, ProvisioningRecord, ResourceDescription};
use super::{ClientError, ClientResult, ResourceClient};
use crate::error::{HealthError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub vms: Vec<VmRecord>,
    #[serde(default)]
    pub disks: Vec<DiskRecord>,
    #[serde(default)]
    pub nics: Vec<NicRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VmRecord {
    pub resource_group: String,
    pub name: String,
    #[serde(default)]
    pub statuses: Vec<String>,
    #[serde(default)]
    pub data_disks: Vec<DataDisk>,
    #[serde(default)]
    pub network_interface_ids: Vec<String>,
}

impl VmRecord {
    pub fn new(resource_group: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            resource_group: resource_group.into(),
            name: name.into(),
            statuses: Vec::new(),
            data_disks: Vec::new(),
            network_interface_ids: Vec::new(),
        }
    }

    pub fn with_status(mut self, code: impl Into<String>) -> Self {
        self.statuses.push(code.into());
        self
    }

    pub fn with_data_disk(mut self, disk: DataDisk) -> Self {
        self.data_disks.push(disk);
        self
    }

    pub fn with_nic(mut self, nic_id: impl Into<String>) -> Self {
        self.network_interface_ids.push(nic_id.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskRecord {
    pub id: String,
    pub name: String,
    pub provisioning_state: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NicRecord {
    pub resource_group: String,
    pub name: String,
    pub provisioning_state: String,
}

impl Snapshot {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let contents = std::fs::read_to_string(path)?;

        let snapshot: Snapshot = match extension.as_str() {
            "json" => serde_json::from_str(&contents)?,
            "toml" => toml::from_str(&contents)?,
            "yaml" | "yml" => serde_yaml::from_str(&contents)?,
            _ => {
                return Err(HealthError::UnsupportedSnapshotFormat(
                    path.display().to_string(),
                ))
            }
        };

        Ok(snapshot)
    }

    pub fn with_vm(mut self, vm: VmRecord) -> Self {
        self.vms.push(vm);
        self
    }

    pub fn with_disk(
        mut self,
        id: impl Into<String>,
        name: impl Into<String>,
        provisioning_state: impl Into<String>,
    ) -> Self {
        self.disks.push(DiskRecord {
            id: id.into(),
            name: name.into(),
            provisioning_state: provisioning_state.into(),
        });
        self
    }

    pub fn with_nic(
        mut self,
        resource_group: impl Into<String>,
        name: impl Into<String>,
        provisioning_state: impl Into<String>,
    ) -> Self {
        self.nics.push(NicRecord {
            resource_group: resource_group.into(),
            name: name.into(),
            provisioning_state: provisioning_state.into(),
        });
        self
    }
}

fn scoped_key(resource_group: &str, name: &str) -> String {
    format!("{}/{}", resource_group.to_ascii_lowercase(), name.to_ascii_lowercase())
}

/// Serves [`ResourceClient`] queries from a [`Snapshot`]. Lookups of
/// anything the snapshot does not contain fail with `NotFound`.
#[derive(Debug, Clone, Default)]
pub struct SnapshotClient {
    vms: HashMap<String, VmRecord>,
    disks: HashMap<String, DiskRecord>,
    nics: HashMap<String, NicRecord>,
}

impl SnapshotClient {
    pub fn new(snapshot: Snapshot) -> Self {
        let vms = snapshot
            .vms
            .into_iter()
            .map(|vm| (scoped_key(&vm.resource_group, &vm.name), vm))
            .collect();
        let disks = snapshot
            .disks
            .into_iter()
            .map(|disk| (disk.id.to_ascii_lowercase(), disk))
            .collect();
        let nics = snapshot
            .nics
            .into_iter()
            .map(|nic| (scoped_key(&nic.resource_group, &nic.name), nic))
            .collect();

        Self { vms, disks, nics }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let snapshot = Snapshot::from_path(path.as_ref())?;
        debug!(
            path = %path.as_ref().display(),
            vms = snapshot.vms.len(),
            disks = snapshot.disks.len(),
            nics = snapshot.nics.len(),
            "Loaded resource snapshot"
        );
        Ok(Self::new(snapshot))
    }

    fn vm(&self, resource_group: &str, name: &str) -> ClientResult<&VmRecord> {
        self.vms
            .get(&scoped_key(resource_group, name))
            .ok_or_else(|| {
                ClientError::NotFound(format!("virtual machine '{}/{}'", resource_group, name))
            })
    }
}

#[async_trait]
impl ResourceClient for SnapshotClient {
    async fn instance_statuses(&self, resource_group: &str, name: &str) -> ClientResult<Vec<String>> {
        Ok(self.vm(resource_group, name)?.statuses.clone())
    }

    async fn resource_description(&self, resource_group: &str, name: &str) -> ClientResult<ResourceDescription> {
        let vm = self.vm(resource_group, name)?;
        Ok(ResourceDescription {
            data_disks: vm.data_disks.clone(),
            network_interface_ids: vm.network_interface_ids.clone(),
        })
    }

    async fn disk_provisioning_state(&self, disk_id: &str) -> ClientResult<ProvisioningRecord> {
        self.disks
            .get(&disk_id.to_ascii_lowercase())
            .map(|disk| ProvisioningRecord::new(disk.name.clone(), disk.provisioning_state.clone()))
            .ok_or_else(|| ClientError::NotFound(format!("disk '{}'", disk_id)))
    }

    async fn nic_provisioning_state(&self, resource_group: &str, nic_name: &str) -> ClientResult<ProvisioningRecord> {
        self.nics
            .get(&scoped_key(resource_group, nic_name))
            .map(|nic| ProvisioningRecord::new(nic.name.clone(), nic.provisioning_state.clone()))
            .ok_or_else(|| {
                ClientError::NotFound(format!("network interface '{}/{}'", resource_group, nic_name))
            })
    }
}
