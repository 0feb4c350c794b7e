//! Address block bookkeeping done on the client: merging the three kinds of
//! address records into one allocation view, and reserving or releasing
//! single offsets.

use std::fmt;

use cinp::{uri, Object};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::client::Resources;
use crate::error::{Error, Result};
use crate::models::{Address, AddressBlock, DynamicAddress, ReservedAddress};
use crate::resource::Resource;

/// Name of the server filter selecting addresses by block.
const BLOCK_FILTER: &str = "address_block";

/// What an allocated offset is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AllocationKind {
    /// Bound to an interface.
    Address,
    /// Held back from allocation.
    Reserved,
    /// Part of the DHCP pool.
    Dynamic,
}

impl fmt::Display for AllocationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Address => write!(f, "Address"),
            Self::Reserved => write!(f, "Reserved"),
            Self::Dynamic => write!(f, "Dynamic"),
        }
    }
}

/// One used offset within a block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Allocation {
    pub offset: i64,
    pub ip_address: Option<String>,
    pub kind: AllocationKind,
    /// Interface, reservation reason or PXE entry depending on the kind.
    pub detail: String,
    pub uri: String,
}

/// Utilisation summary of a block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Usage {
    pub size: i64,
    pub addresses: usize,
    pub reserved: usize,
    pub dynamic: usize,
    pub free: i64,
    pub percent_used: f64,
}

impl Usage {
    /// Summarise `allocations` against a block of `size` offsets.
    #[must_use]
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_wrap)]
    pub fn compute(size: i64, allocations: &[Allocation]) -> Self {
        let count = |kind| allocations.iter().filter(|a| a.kind == kind).count();
        let used = allocations.len() as i64;
        let percent_used = if size > 0 {
            used as f64 / size as f64 * 100.0
        } else {
            0.0
        };

        Self {
            size,
            addresses: count(AllocationKind::Address),
            reserved: count(AllocationKind::Reserved),
            dynamic: count(AllocationKind::Dynamic),
            free: (size - used).max(0),
            percent_used,
        }
    }
}

fn block_values(block_uri: &str) -> Object {
    let mut values = Object::new();
    values.insert(BLOCK_FILTER.into(), Value::String(block_uri.to_string()));
    values
}

impl Resources<AddressBlock> {
    /// Every used offset of the block, sorted by offset.
    ///
    /// # Errors
    /// [`Error::NotFound`] if the block does not exist, or the first error
    /// hit while listing.
    pub async fn allocation(&self, block_id: &str) -> Result<Vec<Allocation>> {
        let block_uri = self.resolve(block_id).await?;
        let values = block_values(&block_uri);

        let addresses = self
            .sibling::<Address>()
            .list(Some(BLOCK_FILTER), values.clone())
            .collect()
            .await?;
        let reserved = self
            .sibling::<ReservedAddress>()
            .list(Some(BLOCK_FILTER), values.clone())
            .collect()
            .await?;
        let dynamic = self
            .sibling::<DynamicAddress>()
            .list(Some(BLOCK_FILTER), values)
            .collect()
            .await?;

        let mut allocations: Vec<Allocation> = addresses
            .into_iter()
            .map(|a| {
                let detail = match (&a.networked, &a.interface_name) {
                    (Some(networked), Some(iface)) => {
                        format!("{} {iface}", uri::short_id(networked))
                    }
                    (Some(networked), None) => uri::short_id(networked),
                    (None, iface) => iface.clone().unwrap_or_default(),
                };
                Allocation {
                    offset: a.offset.unwrap_or_default(),
                    uri: a.uri().unwrap_or_default(),
                    ip_address: a.ip_address,
                    kind: AllocationKind::Address,
                    detail,
                }
            })
            .chain(reserved.into_iter().map(|r| Allocation {
                offset: r.offset.unwrap_or_default(),
                uri: r.uri().unwrap_or_default(),
                ip_address: r.ip_address,
                kind: AllocationKind::Reserved,
                detail: r.reason.unwrap_or_default(),
            }))
            .chain(dynamic.into_iter().map(|d| Allocation {
                offset: d.offset.unwrap_or_default(),
                uri: d.uri().unwrap_or_default(),
                ip_address: d.ip_address,
                kind: AllocationKind::Dynamic,
                detail: d.pxe.as_deref().map(uri::short_id).unwrap_or_default(),
            }))
            .collect();

        allocations.sort_by_key(|a| a.offset);
        Ok(allocations)
    }

    /// Counts of used and free offsets in the block.
    ///
    /// # Errors
    /// As for [`Resources::allocation`].
    pub async fn usage(&self, block_id: &str) -> Result<Usage> {
        let block = self.get(block_id).await?;
        let allocations = self.allocation(block_id).await?;
        Ok(Usage::compute(block.size.unwrap_or_default(), &allocations))
    }

    /// Hold `offset` back from allocation.
    ///
    /// # Errors
    /// [`Error::NotFound`] for an unknown block, [`Error::Validation`] if the
    /// server refuses the offset.
    pub async fn reserve(
        &self,
        block_id: &str,
        offset: i64,
        reason: &str,
    ) -> Result<ReservedAddress> {
        let block_uri = self.resolve(block_id).await?;
        let resources = self.sibling::<ReservedAddress>();
        let mut reserved = ReservedAddress {
            address_block: Some(block_uri),
            offset: Some(offset),
            reason: Some(reason.to_string()),
            ..ReservedAddress::default()
        };
        resources.create(&mut reserved).await?;
        Ok(reserved)
    }

    /// Release a reservation.
    ///
    /// # Errors
    /// `NotFound("Offset not found")` if nothing is reserved at `offset`.
    pub async fn dereserve(&self, block_id: &str, offset: i64) -> Result<()> {
        let resources = self.sibling::<ReservedAddress>();
        let reserved = self
            .find_at::<ReservedAddress>(block_id, offset, |r| r.offset)
            .await?;
        resources.delete(&reserved).await?;
        info!(block = block_id, offset, "Released reservation");
        Ok(())
    }

    /// Add `offset` to the block's DHCP pool.
    ///
    /// # Errors
    /// As for [`Resources::reserve`].
    pub async fn dynamic(
        &self,
        block_id: &str,
        offset: i64,
        pxe: Option<&str>,
    ) -> Result<DynamicAddress> {
        let block_uri = self.resolve(block_id).await?;
        let resources = self.sibling::<DynamicAddress>();
        let mut dynamic = DynamicAddress {
            address_block: Some(block_uri),
            offset: Some(offset),
            pxe: pxe.map(ToString::to_string),
            ..DynamicAddress::default()
        };
        resources.create(&mut dynamic).await?;
        Ok(dynamic)
    }

    /// Remove `offset` from the block's DHCP pool.
    ///
    /// # Errors
    /// `NotFound("Offset not found")` if the offset is not dynamic.
    pub async fn dedynamic(&self, block_id: &str, offset: i64) -> Result<()> {
        let resources = self.sibling::<DynamicAddress>();
        let dynamic = self
            .find_at::<DynamicAddress>(block_id, offset, |d| d.offset)
            .await?;
        resources.delete(&dynamic).await?;
        info!(block = block_id, offset, "Released dynamic address");
        Ok(())
    }

    /// Bind `offset` to an interface of a networked object.
    ///
    /// # Errors
    /// As for [`Resources::reserve`].
    pub async fn assign(
        &self,
        block_id: &str,
        offset: i64,
        networked: &str,
        interface_name: &str,
        is_primary: bool,
    ) -> Result<Address> {
        let block_uri = self.resolve(block_id).await?;
        let resources = self.sibling::<Address>();
        let mut address = Address {
            address_block: Some(block_uri),
            offset: Some(offset),
            networked: Some(networked.to_string()),
            interface_name: Some(interface_name.to_string()),
            is_primary: Some(is_primary),
            ..Address::default()
        };
        resources.create(&mut address).await?;
        Ok(address)
    }

    async fn find_at<R: Resource>(
        &self,
        block_id: &str,
        offset: i64,
        offset_of: impl Fn(&R) -> Option<i64>,
    ) -> Result<R> {
        let block_uri = self.resolve(block_id).await?;
        let mut listing = self
            .sibling::<R>()
            .list(Some(BLOCK_FILTER), block_values(&block_uri));
        while let Some(item) = listing.next().await {
            let item = item?;
            if offset_of(&item) == Some(offset) {
                return Ok(item);
            }
        }
        Err(Error::NotFound("Offset not found".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alloc(offset: i64, kind: AllocationKind) -> Allocation {
        Allocation {
            offset,
            ip_address: None,
            kind,
            detail: String::new(),
            uri: String::new(),
        }
    }

    #[test]
    fn test_usage_counts_by_kind() {
        let allocations = vec![
            alloc(1, AllocationKind::Address),
            alloc(2, AllocationKind::Address),
            alloc(10, AllocationKind::Reserved),
            alloc(20, AllocationKind::Dynamic),
        ];
        let usage = Usage::compute(8, &allocations);
        assert_eq!(usage.addresses, 2);
        assert_eq!(usage.reserved, 1);
        assert_eq!(usage.dynamic, 1);
        assert_eq!(usage.free, 4);
        assert!((usage.percent_used - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_usage_of_empty_block() {
        let usage = Usage::compute(0, &[]);
        assert_eq!(usage.free, 0);
        assert!(usage.percent_used.abs() < f64::EPSILON);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(AllocationKind::Reserved.to_string(), "Reserved");
    }
}
