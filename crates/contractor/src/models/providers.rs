//! Provider specific foundation and complex subtypes.
//!
//! Each subtype lives in its provider's namespace and shares the id of the
//! base object, so `/api/v1/IPMI/IPMIFoundation:n1:` and
//! `/api/v1/Building/Foundation:n1:` address the same foundation. The base
//! fields are flattened into every subtype.

use serde::{Deserialize, Serialize};

use super::building::{Complex, Foundation};
use crate::actions::{Buildable, Configurable};
use crate::resource::{resource, Resource};

/// Provider subtype of [`Foundation`].
pub trait FoundationSubtype: Buildable + Configurable {
    fn foundation(&self) -> &Foundation;
    fn foundation_mut(&mut self) -> &mut Foundation;
}

/// Provider subtype of [`Complex`].
pub trait ComplexSubtype: Resource {
    fn complex(&self) -> &Complex;
    fn complex_mut(&mut self) -> &mut Complex;
}

macro_rules! subtype {
    ($tr:ident, $field:ident, $get:ident, $get_mut:ident, $base:ty: $($ty:ty),+ $(,)?) => {
        $(
            impl $tr for $ty {
                fn $get(&self) -> &$base {
                    &self.$field
                }

                fn $get_mut(&mut self) -> &mut $base {
                    &mut self.$field
                }
            }
        )+
    };
}

subtype!(
    FoundationSubtype, foundation, foundation, foundation_mut, Foundation:
    AmtFoundation, IpmiFoundation, ManualFoundation, LibVirtFoundation, ProxmoxFoundation,
    VCenterFoundation, VirtualBoxFoundation, AzureFoundation, DockerFoundation,
    PacketFoundation, TestFoundation,
);

subtype!(
    ComplexSubtype, complex, complex, complex_mut, Complex:
    ManualComplex, LibVirtComplex, ProxmoxComplex, VCenterComplex, VirtualBoxComplex,
    AzureComplex, DockerComplex, PacketComplex,
);

// ============================================================================
// Foundations
// ============================================================================

/// Intel AMT managed foundation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmtFoundation {
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub foundation: Foundation,
    pub amt_username: Option<String>,
    pub amt_password: Option<String>,
    pub amt_ip_address: Option<String>,
}

resource!(
    AmtFoundation, "/api/v1/AMT/", "AMTFoundation",
    create: ["locator", "site", "blueprint", "amt_username", "amt_password", "amt_ip_address"],
    update: ["site", "blueprint", "amt_username", "amt_password", "amt_ip_address"],
);

/// IPMI managed foundation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IpmiFoundation {
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub foundation: Foundation,
    pub ipmi_username: Option<String>,
    pub ipmi_password: Option<String>,
    pub ipmi_ip_address: Option<String>,
    /// Serial-over-LAN console port.
    pub ipmi_sol_port: Option<String>,
    /// URI of the plot the hardware sits in.
    pub plot: Option<String>,
}

resource!(
    IpmiFoundation, "/api/v1/IPMI/", "IPMIFoundation",
    create: [
        "locator", "site", "blueprint", "ipmi_username", "ipmi_password",
        "ipmi_ip_address", "ipmi_sol_port", "plot",
    ],
    update: [
        "site", "blueprint", "ipmi_username", "ipmi_password", "ipmi_ip_address",
        "ipmi_sol_port", "plot",
    ],
);

/// Foundation provisioned by hand.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManualFoundation {
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub foundation: Foundation,
}

resource!(
    ManualFoundation, "/api/v1/Manual/", "ManualFoundation",
    create: ["locator", "site", "blueprint"],
    update: ["site", "blueprint"],
);

/// LibVirt virtual machine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibVirtFoundation {
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub foundation: Foundation,
    /// URI of the hosting complex.
    pub libvirt_complex: Option<String>,
    pub libvirt_uuid: Option<String>,
}

resource!(
    LibVirtFoundation, "/api/v1/LibVirt/", "LibVirtFoundation",
    create: ["locator", "site", "blueprint", "libvirt_complex"],
    update: ["site", "blueprint"],
);

/// Proxmox virtual machine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxmoxFoundation {
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub foundation: Foundation,
    pub proxmox_complex: Option<String>,
    pub proxmox_vmid: Option<i64>,
}

resource!(
    ProxmoxFoundation, "/api/v1/Proxmox/", "ProxmoxFoundation",
    create: ["locator", "site", "blueprint", "proxmox_complex", "proxmox_vmid"],
    update: ["site", "blueprint"],
);

/// VMware vCenter virtual machine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VCenterFoundation {
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub foundation: Foundation,
    pub vcenter_complex: Option<String>,
    pub vcenter_uuid: Option<String>,
}

resource!(
    VCenterFoundation, "/api/v1/VCenter/", "VCenterFoundation",
    create: ["locator", "site", "blueprint", "vcenter_complex"],
    update: ["site", "blueprint"],
);

/// VirtualBox virtual machine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VirtualBoxFoundation {
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub foundation: Foundation,
    pub virtualbox_complex: Option<String>,
    pub virtualbox_uuid: Option<String>,
}

resource!(
    VirtualBoxFoundation, "/api/v1/VirtualBox/", "VirtualBoxFoundation",
    create: ["locator", "site", "blueprint", "virtualbox_complex"],
    update: ["site", "blueprint"],
);

/// Azure virtual machine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AzureFoundation {
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub foundation: Foundation,
    pub azure_complex: Option<String>,
    pub azure_resource_name: Option<String>,
}

resource!(
    AzureFoundation, "/api/v1/Azure/", "AzureFoundation",
    create: ["locator", "site", "blueprint", "azure_complex"],
    update: ["site", "blueprint"],
);

/// Docker container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DockerFoundation {
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub foundation: Foundation,
    pub docker_complex: Option<String>,
    pub docker_id: Option<String>,
}

resource!(
    DockerFoundation, "/api/v1/Docker/", "DockerFoundation",
    create: ["locator", "site", "blueprint", "docker_complex"],
    update: ["site", "blueprint"],
);

/// Packet (Equinix Metal) device.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacketFoundation {
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub foundation: Foundation,
    pub packet_complex: Option<String>,
    pub packet_uuid: Option<String>,
}

resource!(
    PacketFoundation, "/api/v1/Packet/", "PacketFoundation",
    create: ["locator", "site", "blueprint", "packet_complex"],
    update: ["site", "blueprint"],
);

/// Foundation used for exercising blueprints without real hardware.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestFoundation {
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub foundation: Foundation,
}

resource!(
    TestFoundation, "/api/v1/Test/", "TestFoundation",
    create: ["locator", "site", "blueprint"],
    update: ["site", "blueprint"],
);

// ============================================================================
// Complexes
// ============================================================================

/// Complex of hand-managed hosts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManualComplex {
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub complex: Complex,
}

resource!(
    ManualComplex, "/api/v1/Manual/", "ManualComplex",
    create: ["name", "site", "description", "built_percentage", "members"],
    update: ["description", "built_percentage", "members"],
);

/// LibVirt hypervisor hosts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibVirtComplex {
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub complex: Complex,
}

resource!(
    LibVirtComplex, "/api/v1/LibVirt/", "LibVirtComplex",
    create: ["name", "site", "description", "built_percentage", "members"],
    update: ["description", "built_percentage", "members"],
);

/// Proxmox cluster.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxmoxComplex {
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub complex: Complex,
    pub proxmox_username: Option<String>,
    pub proxmox_password: Option<String>,
}

resource!(
    ProxmoxComplex, "/api/v1/Proxmox/", "ProxmoxComplex",
    create: [
        "name", "site", "description", "built_percentage", "members",
        "proxmox_username", "proxmox_password",
    ],
    update: [
        "description", "built_percentage", "members", "proxmox_username", "proxmox_password",
    ],
);

/// VMware vCenter datacenter and cluster.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VCenterComplex {
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub complex: Complex,
    /// URI of the structure running vCenter.
    pub vcenter_host: Option<String>,
    pub vcenter_username: Option<String>,
    pub vcenter_password: Option<String>,
    pub vcenter_datacenter: Option<String>,
    pub vcenter_cluster: Option<String>,
}

resource!(
    VCenterComplex, "/api/v1/VCenter/", "VCenterComplex",
    create: [
        "name", "site", "description", "built_percentage", "members", "vcenter_host",
        "vcenter_username", "vcenter_password", "vcenter_datacenter", "vcenter_cluster",
    ],
    update: [
        "description", "built_percentage", "members", "vcenter_host", "vcenter_username",
        "vcenter_password", "vcenter_datacenter", "vcenter_cluster",
    ],
);

/// VirtualBox hosts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VirtualBoxComplex {
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub complex: Complex,
}

resource!(
    VirtualBoxComplex, "/api/v1/VirtualBox/", "VirtualBoxComplex",
    create: ["name", "site", "description", "built_percentage", "members"],
    update: ["description", "built_percentage", "members"],
);

/// Azure subscription and resource group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AzureComplex {
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub complex: Complex,
    pub azure_subscription_id: Option<String>,
    pub azure_location: Option<String>,
    pub azure_resource_group: Option<String>,
    pub azure_client_id: Option<String>,
    pub azure_password: Option<String>,
    pub azure_tenant_id: Option<String>,
}

resource!(
    AzureComplex, "/api/v1/Azure/", "AzureComplex",
    create: [
        "name", "site", "description", "built_percentage", "members",
        "azure_subscription_id", "azure_location", "azure_resource_group",
        "azure_client_id", "azure_password", "azure_tenant_id",
    ],
    update: [
        "description", "built_percentage", "members", "azure_client_id", "azure_password",
        "azure_tenant_id",
    ],
);

/// Docker hosts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DockerComplex {
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub complex: Complex,
}

resource!(
    DockerComplex, "/api/v1/Docker/", "DockerComplex",
    create: ["name", "site", "description", "built_percentage", "members"],
    update: ["description", "built_percentage", "members"],
);

/// Packet (Equinix Metal) project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacketComplex {
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub complex: Complex,
    pub packet_auth_token: Option<String>,
    pub packet_project: Option<String>,
}

resource!(
    PacketComplex, "/api/v1/Packet/", "PacketComplex",
    create: [
        "name", "site", "description", "built_percentage", "members",
        "packet_auth_token", "packet_project",
    ],
    update: ["description", "built_percentage", "members", "packet_auth_token"],
);

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::resource as res;

    #[test]
    fn test_flattened_base_fields_are_selectable() {
        let foundation = IpmiFoundation {
            foundation: Foundation {
                locator: Some("rack1-n4".into()),
                site: Some("/api/v1/Site/Site:main:".into()),
                foundation_type: Some("IPMI".into()),
                ..Foundation::default()
            },
            ipmi_username: Some("admin".into()),
            ..IpmiFoundation::default()
        };

        let values = res::create_values(&foundation).unwrap();
        assert_eq!(values.get("locator"), Some(&json!("rack1-n4")));
        assert_eq!(values.get("ipmi_username"), Some(&json!("admin")));
        assert!(!values.contains_key("type"));
    }

    #[test]
    fn test_subtype_deserializes_base_and_provider_fields() {
        let values = match json!({
            "locator": "vm1",
            "type": "Proxmox",
            "state": "planned",
            "proxmox_complex": "/api/v1/Proxmox/ProxmoxComplex:pve:",
            "proxmox_vmid": 105
        }) {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        };
        let foundation: ProxmoxFoundation = res::from_values(values, "vm1".into()).unwrap();
        assert_eq!(foundation.id(), Some("vm1"));
        assert_eq!(foundation.foundation.foundation_type.as_deref(), Some("Proxmox"));
        assert_eq!(foundation.proxmox_vmid, Some(105));
    }

    #[test]
    fn test_provider_type_is_write_once() {
        assert!(!VCenterComplex::KIND.is_updatable("name"));
        assert!(!VCenterComplex::KIND.is_updatable("site"));
        assert!(VCenterComplex::KIND.is_updatable("vcenter_cluster"));
        assert!(!Complex::KIND.is_creatable());
    }
}
