//! Domain layer: the persisted computer record and its description document.

pub mod computer;
pub mod description;

pub use computer::Computer;
pub use description::{
    Case, ComputerDescription, MAX_NAME_LEN, Motherboard, PowerSupply, Ram, RamModule, Storage,
    StorageDevice, Ventilation, VideoCard,
};
