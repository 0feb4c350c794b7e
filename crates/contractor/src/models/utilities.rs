//! Utilities namespace: networks, address blocks and the addresses carved
//! out of them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::resource::resource;

/// Layer two network within a site.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Network {
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: Option<String>,
    pub site: Option<String>,
    pub mtu: Option<i64>,
    pub created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
}

resource!(
    Network, "/api/v1/Utilities/", "Network",
    create: ["name", "site", "mtu"],
    update: ["name", "mtu"],
);

/// A subnet from which addresses are allocated by offset.
///
/// `gateway`, `netmask`, `size` and the derived addresses are computed by
/// the server and read only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressBlock {
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: Option<String>,
    pub site: Option<String>,
    pub subnet: Option<String>,
    pub prefix: Option<i64>,
    pub gateway_offset: Option<i64>,
    pub gateway: Option<String>,
    pub netmask: Option<String>,
    /// Number of usable offsets in the block.
    pub size: Option<i64>,
    #[serde(rename = "isIpV4")]
    pub is_ipv4: Option<bool>,
    pub created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
}

resource!(
    AddressBlock, "/api/v1/Utilities/", "AddressBlock",
    create: ["name", "site", "subnet", "prefix", "gateway_offset"],
    update: ["name", "subnet", "prefix", "gateway_offset"],
);

/// Address bound to an interface of a networked object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub address_block: Option<String>,
    pub offset: Option<i64>,
    pub ip_address: Option<String>,
    /// URI of the structure (or other networked object) using the address.
    pub networked: Option<String>,
    pub interface_name: Option<String>,
    pub sub_interface: Option<i64>,
    pub vlan: Option<i64>,
    pub is_primary: Option<bool>,
    pub created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
}

resource!(
    Address, "/api/v1/Utilities/", "Address",
    create: [
        "address_block", "offset", "networked", "interface_name", "sub_interface",
        "vlan", "is_primary",
    ],
    update: ["interface_name", "sub_interface", "vlan", "is_primary"],
);

/// Offset held back from allocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReservedAddress {
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub address_block: Option<String>,
    pub offset: Option<i64>,
    pub ip_address: Option<String>,
    pub reason: Option<String>,
    pub created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
}

resource!(
    ReservedAddress, "/api/v1/Utilities/", "ReservedAddress",
    create: ["address_block", "offset", "reason"],
    update: ["reason"],
);

/// Offset handed out by the server's DHCP pool.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DynamicAddress {
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub address_block: Option<String>,
    pub offset: Option<i64>,
    pub ip_address: Option<String>,
    /// URI of the PXE entry served to clients of this address.
    pub pxe: Option<String>,
    pub created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
}

resource!(
    DynamicAddress, "/api/v1/Utilities/", "DynamicAddress",
    create: ["address_block", "offset", "pxe"],
    update: ["pxe"],
);
