//! Typed models for every server resource kind.

pub mod blueprint;
pub mod building;
pub mod foreman;
pub mod providers;
pub mod site;
pub mod survey;
pub mod utilities;

pub use blueprint::{FoundationBluePrint, StructureBluePrint};
pub use building::{Complex, Foundation, Structure};
pub use foreman::{BaseJob, DependencyJob, FoundationJob, StructureJob};
pub use providers::{
    AmtFoundation, AzureComplex, AzureFoundation, ComplexSubtype, DockerComplex,
    DockerFoundation, FoundationSubtype, IpmiFoundation, LibVirtComplex, LibVirtFoundation,
    ManualComplex, ManualFoundation, PacketComplex, PacketFoundation, ProxmoxComplex,
    ProxmoxFoundation, TestFoundation, VCenterComplex, VCenterFoundation, VirtualBoxComplex,
    VirtualBoxFoundation,
};
pub use site::Site;
pub use survey::{Cartographer, Plot};
pub use utilities::{Address, AddressBlock, DynamicAddress, Network, ReservedAddress};
