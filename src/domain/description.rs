//! Typed description of a computer build.
//!
//! [`ComputerDescription`] is the document stored in the `description`
//! JSONB column. Rust field names are English; the serde names are the
//! canonical wire keys (`fonte`, `placa_video`, `memoria_ram`, ...) that the
//! read queries project with `->` / `->>`.
//!
//! Every component and every field below the top-level `name` / `price`
//! is optional. Absent fields are skipped on encode, so a document
//! round-trips without gaining `null` keys.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use utoipa::ToSchema;

use crate::error::CatalogError;

/// Maximum length of a computer name, in characters.
pub const MAX_NAME_LEN: usize = 40;

/// Full description of a computer build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ComputerDescription {
    /// Identifying name, copied into the `name` column.
    pub name: String,

    /// Build price, copied into the `price` column.
    pub price: Decimal,

    /// Power supply unit.
    #[serde(rename = "fonte", default, skip_serializing_if = "Option::is_none")]
    pub power_supply: Option<PowerSupply>,

    /// Motherboard.
    #[serde(rename = "placa_mae", default, skip_serializing_if = "Option::is_none")]
    pub motherboard: Option<Motherboard>,

    /// Graphics card.
    #[serde(rename = "placa_video", default, skip_serializing_if = "Option::is_none")]
    pub video_card: Option<VideoCard>,

    /// Installed memory.
    #[serde(rename = "memoria_ram", default, skip_serializing_if = "Option::is_none")]
    pub ram: Option<Ram>,

    /// Installed drives.
    #[serde(rename = "armazenamento", default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<Storage>,

    /// Chassis.
    #[serde(rename = "gabinete", default, skip_serializing_if = "Option::is_none")]
    pub case: Option<Case>,

    /// Free-text notes.
    #[serde(rename = "observacoes", default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Power supply unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PowerSupply {
    /// Model name.
    #[serde(rename = "modelo", default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Rated output in watts.
    #[serde(rename = "potencia_watts", default, skip_serializing_if = "Option::is_none")]
    pub wattage: Option<u32>,

    /// Efficiency tier, e.g. `80 Plus Gold`.
    #[serde(rename = "certificacao", default, skip_serializing_if = "Option::is_none")]
    pub certification: Option<String>,

    /// Whether the cables are detachable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modular: Option<bool>,

    /// Manufacturer.
    #[serde(rename = "fabricante", default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
}

/// Motherboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Motherboard {
    /// Model name.
    #[serde(rename = "modelo", default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Manufacturer.
    #[serde(rename = "fabricante", default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,

    /// CPU socket, e.g. `AM5`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub socket: Option<String>,

    /// Chipset, e.g. `B650`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chipset: Option<String>,

    /// Form factor, e.g. `ATX`.
    #[serde(rename = "formato", default, skip_serializing_if = "Option::is_none")]
    pub form_factor: Option<String>,

    /// Number of DIMM slots.
    #[serde(rename = "slots_ram", default, skip_serializing_if = "Option::is_none")]
    pub ram_slots: Option<u32>,

    /// Maximum supported memory in GB.
    #[serde(rename = "ram_max_gb", default, skip_serializing_if = "Option::is_none")]
    pub max_ram_gb: Option<u32>,

    /// Number of PCIe slots.
    #[serde(rename = "slots_pcie", default, skip_serializing_if = "Option::is_none")]
    pub pcie_slots: Option<u32>,
}

/// Graphics card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct VideoCard {
    /// Model name. Searched by `GET /computer/search/gpu/{q}`.
    #[serde(rename = "modelo", default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Manufacturer.
    #[serde(rename = "fabricante", default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,

    /// GPU chip, e.g. `AD102`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chipset: Option<String>,

    /// On-board memory in GB.
    #[serde(rename = "memoria_gb", default, skip_serializing_if = "Option::is_none")]
    pub memory_gb: Option<u32>,

    /// Memory technology, e.g. `GDDR6X`.
    #[serde(rename = "tipo_memoria", default, skip_serializing_if = "Option::is_none")]
    pub memory_type: Option<String>,

    /// Core clock in MHz.
    #[serde(rename = "clock_mhz", default, skip_serializing_if = "Option::is_none")]
    pub clock_mhz: Option<u32>,

    /// Thermal design power in watts.
    #[serde(rename = "tdp_watts", default, skip_serializing_if = "Option::is_none")]
    pub tdp_watts: Option<u32>,

    /// Bus interface, e.g. `PCIe 4.0 x16`.
    #[serde(rename = "interface", default, skip_serializing_if = "Option::is_none")]
    pub bus_interface: Option<String>,
}

/// Installed memory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Ram {
    /// Total capacity in GB. Searched by `GET /computer/search/ram/{gb}`.
    #[serde(rename = "capacidade_total_gb", default, skip_serializing_if = "Option::is_none")]
    pub total_capacity_gb: Option<u32>,

    /// Individual modules, in slot order.
    #[serde(rename = "modulos", default, skip_serializing_if = "Option::is_none")]
    pub modules: Option<Vec<RamModule>>,
}

/// A single memory module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RamModule {
    /// Model name.
    #[serde(rename = "modelo", default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Manufacturer.
    #[serde(rename = "fabricante", default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,

    /// Capacity in GB.
    #[serde(rename = "capacidade_gb", default, skip_serializing_if = "Option::is_none")]
    pub capacity_gb: Option<u32>,

    /// DDR generation, e.g. `DDR5`.
    #[serde(rename = "tipo", default, skip_serializing_if = "Option::is_none")]
    pub ddr_generation: Option<String>,

    /// Frequency in MHz.
    #[serde(rename = "frequencia_mhz", default, skip_serializing_if = "Option::is_none")]
    pub frequency_mhz: Option<u32>,

    /// CAS latency label, e.g. `CL30`.
    #[serde(rename = "latencia", default, skip_serializing_if = "Option::is_none")]
    pub latency: Option<String>,
}

/// Installed drives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Storage {
    /// Total capacity in GB.
    #[serde(rename = "capacidade_total_gb", default, skip_serializing_if = "Option::is_none")]
    pub total_capacity_gb: Option<u32>,

    /// Individual devices.
    #[serde(rename = "dispositivos", default, skip_serializing_if = "Option::is_none")]
    pub devices: Option<Vec<StorageDevice>>,
}

/// A single drive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StorageDevice {
    /// Model name.
    #[serde(rename = "modelo", default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Manufacturer.
    #[serde(rename = "fabricante", default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,

    /// Drive kind: `SSD`, `HDD`, `NVMe`.
    #[serde(rename = "tipo", default, skip_serializing_if = "Option::is_none")]
    pub device_type: Option<String>,

    /// Capacity in GB.
    #[serde(rename = "capacidade_gb", default, skip_serializing_if = "Option::is_none")]
    pub capacity_gb: Option<u32>,

    /// Host interface, e.g. `NVMe PCIe 4.0`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface: Option<String>,

    /// Sequential read in MB/s.
    #[serde(rename = "velocidade_leitura_mbps", default, skip_serializing_if = "Option::is_none")]
    pub read_mbps: Option<u32>,

    /// Sequential write in MB/s.
    #[serde(rename = "velocidade_escrita_mbps", default, skip_serializing_if = "Option::is_none")]
    pub write_mbps: Option<u32>,
}

/// Chassis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Case {
    /// Model name.
    #[serde(rename = "modelo", default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Manufacturer.
    #[serde(rename = "fabricante", default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,

    /// Tower size, e.g. `Mid Tower`.
    #[serde(rename = "tipo", default, skip_serializing_if = "Option::is_none")]
    pub case_type: Option<String>,

    /// Color.
    #[serde(rename = "cor", default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    /// Panel material.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,

    /// Largest supported board, e.g. `E-ATX`.
    #[serde(
        rename = "tamanho_placa_mae_suportado",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub supported_motherboard: Option<String>,

    /// Rear expansion slots.
    #[serde(rename = "slots_expansao", default, skip_serializing_if = "Option::is_none")]
    pub expansion_slots: Option<u32>,

    /// 3.5" drive bays.
    #[serde(rename = "baias_35_polegadas", default, skip_serializing_if = "Option::is_none")]
    pub bays_3_5: Option<u32>,

    /// 2.5" drive bays.
    #[serde(rename = "baias_25_polegadas", default, skip_serializing_if = "Option::is_none")]
    pub bays_2_5: Option<u32>,

    /// Airflow provisions.
    #[serde(rename = "ventilacao", default, skip_serializing_if = "Option::is_none")]
    pub ventilation: Option<Ventilation>,
}

/// Airflow provisions of a chassis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Ventilation {
    /// Fans shipped with the case.
    #[serde(rename = "coolers_inclusos", default, skip_serializing_if = "Option::is_none")]
    pub included_fans: Option<u32>,

    /// Largest radiator, e.g. `360mm`.
    #[serde(rename = "suporte_radiador", default, skip_serializing_if = "Option::is_none")]
    pub radiator_support: Option<String>,

    /// Front fan mounts.
    #[serde(
        rename = "slots_ventilacao_frontal",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub front_fan_slots: Option<u32>,

    /// Top fan mounts.
    #[serde(
        rename = "slots_ventilacao_superior",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub top_fan_slots: Option<u32>,

    /// Rear fan mounts.
    #[serde(
        rename = "slots_ventilacao_traseira",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub rear_fan_slots: Option<u32>,
}

impl ComputerDescription {
    /// Creates a description carrying only the required fields.
    #[must_use]
    pub fn new(name: impl Into<String>, price: Decimal) -> Self {
        Self {
            name: name.into(),
            price,
            power_supply: None,
            motherboard: None,
            video_card: None,
            ram: None,
            storage: None,
            case: None,
            notes: None,
        }
    }

    /// Parses a request body.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Validation`] on malformed JSON, missing
    /// `name` / `price`, or a negative value in an unsigned field.
    pub fn decode(json: &str) -> Result<Self, CatalogError> {
        serde_json::from_str(json)
            .map_err(|e| CatalogError::Validation(format!("malformed computer description: {e}")))
    }

    /// Encodes the description into the document stored in `description`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Serialization`] if encoding fails.
    pub fn encode(&self) -> Result<String, CatalogError> {
        serde_json::to_string(self).map_err(|e| CatalogError::Serialization(e.to_string()))
    }

    /// Checks the constraints of the `name` and `price` columns.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Validation`] if `name` is blank or longer
    /// than [`MAX_NAME_LEN`] characters, or `price` is negative.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.name.trim().is_empty() {
            return Err(CatalogError::Validation("name must not be empty".to_string()));
        }
        let len = self.name.chars().count();
        if len > MAX_NAME_LEN {
            return Err(CatalogError::Validation(format!(
                "name must not exceed {MAX_NAME_LEN} characters (got {len})"
            )));
        }
        if self.price.is_sign_negative() && !self.price.is_zero() {
            return Err(CatalogError::Validation(
                "price must not be negative".to_string(),
            ));
        }
        Ok(())
    }

    /// GPU model, if described.
    #[must_use]
    pub fn gpu_model(&self) -> Option<&str> {
        self.video_card.as_ref()?.model.as_deref()
    }

    /// Total memory in GB, if described.
    #[must_use]
    pub fn ram_capacity_gb(&self) -> Option<u32> {
        self.ram.as_ref()?.total_capacity_gb
    }

    /// Short hash identifying a payload in logs without revealing it.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(format!("{self:?}").as_bytes());
        hex::encode(digest).chars().take(16).collect()
    }
}
