#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use vm_health::client::{ClientError, ClientResult};
use vm_health::{
    DataDisk, ProvisioningRecord, ResourceClient, ResourceDescription, ResourceIdentity,
    VmHealthCheck,
};

pub const RESOURCE_GROUP: &str = "prod-rg";
pub const VM_NAME: &str = "web-01";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    InstanceStatuses,
    ResourceDescription,
    Disk(String),
    Nic(String),
}

struct Script {
    statuses: ClientResult<Vec<String>>,
    description: ClientResult<ResourceDescription>,
    disks: HashMap<String, ClientResult<ProvisioningRecord>>,
    nics: HashMap<String, ClientResult<ProvisioningRecord>>,
}

/// Resource client whose answers are set by the test and which records
/// every call it receives.
pub struct ScriptedClient {
    script: Mutex<Script>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedClient {
    /// A running VM with two managed disks and two NICs, all provisioned.
    pub fn healthy() -> Self {
        let client = Self {
            script: Mutex::new(Script {
                statuses: Ok(vec![
                    "ProvisioningState/succeeded".to_string(),
                    "PowerState/running".to_string(),
                ]),
                description: Ok(ResourceDescription {
                    data_disks: vec![
                        DataDisk::managed("data-0", "/disks/data-0"),
                        DataDisk::managed("data-1", "/disks/data-1"),
                    ],
                    network_interface_ids: vec![nic_id("nic-0"), nic_id("nic-1")],
                }),
                disks: HashMap::new(),
                nics: HashMap::new(),
            }),
            calls: Mutex::new(Vec::new()),
        };

        client.set_disk("/disks/data-0", Ok(ProvisioningRecord::new("data-0", "Succeeded")));
        client.set_disk("/disks/data-1", Ok(ProvisioningRecord::new("data-1", "Succeeded")));
        client.set_nic("nic-0", Ok(ProvisioningRecord::new("nic-0", "Succeeded")));
        client.set_nic("nic-1", Ok(ProvisioningRecord::new("nic-1", "Succeeded")));
        client
    }

    pub fn set_statuses(&self, statuses: ClientResult<Vec<String>>) {
        self.script.lock().statuses = statuses;
    }

    pub fn set_description(&self, description: ClientResult<ResourceDescription>) {
        self.script.lock().description = description;
    }

    pub fn set_disk(&self, disk_id: &str, record: ClientResult<ProvisioningRecord>) {
        self.script.lock().disks.insert(disk_id.to_string(), record);
    }

    pub fn set_nic(&self, nic_name: &str, record: ClientResult<ProvisioningRecord>) {
        self.script.lock().nics.insert(nic_name.to_string(), record);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    fn record(&self, call: Call) {
        self.calls.lock().push(call);
    }
}

#[async_trait]
impl ResourceClient for ScriptedClient {
    async fn instance_statuses(&self, resource_group: &str, name: &str) -> ClientResult<Vec<String>> {
        assert_eq!((resource_group, name), (RESOURCE_GROUP, VM_NAME));
        self.record(Call::InstanceStatuses);
        self.script.lock().statuses.clone()
    }

    async fn resource_description(&self, resource_group: &str, name: &str) -> ClientResult<ResourceDescription> {
        assert_eq!((resource_group, name), (RESOURCE_GROUP, VM_NAME));
        self.record(Call::ResourceDescription);
        self.script.lock().description.clone()
    }

    async fn disk_provisioning_state(&self, disk_id: &str) -> ClientResult<ProvisioningRecord> {
        self.record(Call::Disk(disk_id.to_string()));
        self.script
            .lock()
            .disks
            .get(disk_id)
            .cloned()
            .unwrap_or_else(|| Err(ClientError::NotFound(format!("disk '{}'", disk_id))))
    }

    async fn nic_provisioning_state(&self, resource_group: &str, nic_name: &str) -> ClientResult<ProvisioningRecord> {
        assert_eq!(resource_group, RESOURCE_GROUP);
        self.record(Call::Nic(nic_name.to_string()));
        self.script
            .lock()
            .nics
            .get(nic_name)
            .cloned()
            .unwrap_or_else(|| Err(ClientError::NotFound(format!("network interface '{}'", nic_name))))
    }
}

pub fn nic_id(name: &str) -> String {
    format!(
        "/subscriptions/sub-123/resourceGroups/{}/providers/Microsoft.Network/networkInterfaces/{}",
        RESOURCE_GROUP, name
    )
}

pub fn identity() -> ResourceIdentity {
    ResourceIdentity::new(VM_NAME, RESOURCE_GROUP, "sub-123", "westeurope").unwrap()
}

pub fn health_check(client: Arc<ScriptedClient>) -> VmHealthCheck {
    VmHealthCheck::new(identity(), client)
}
