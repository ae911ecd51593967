// ── Variable catalog ──
//
// Symbolic heat pump variables and their numeric ids per data service.
// The id tables are plain data: adding a variable means adding a row,
// adapters and parsers never change.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString, IntoStaticStr};

use upway_api::DataService;

/// A named heat pump sensor or setting.
///
/// The symbolic name (`AVG_OUTDOOR_TEMP`) is stable; the numeric id a
/// service uses for it lives in [`VariableCatalog`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum Variable {
    AvgOutdoorTemp,
    HotWaterCharging,
    HotWaterTop,
    IndoorUnitOutdoorTemp,
    CurrentBe1,
    CurrentBe2,
    CurrentBe3,
    DegreeMinutes,
    ExternalAdjustment,
    FloorDryingFunction,
    CalculatedFlowTemp,
    ExternalFlowTemp,
    ExternalReturnTemp,
    HeatMediumFlow,
    HeatReturnTemp,
    RoomTemperature,
    AdditionBlocked,
    AdditionMaxStep,
    AdditionStatus,
    AdditionFuseSize,
    AdditionTimeFactor,
    AdditionElectricalAdditionPower,
    AdditionSetMaxElectricalAdd,
    AdditionTemperature,
    EnergyCoolingCompressorOnly,
    EnergyHeatingCompressorOnly,
    EnergyHeatingIntAddIncl,
    EnergyHotwaterCompressorOnly,
    EnergyHwInclIntAdd,
    EnergyPoolCompressorOnly,
    EnergyFlow,
    Aux1,
    Aux2,
    Aux3,
    Aux4,
    Aux5,
    Aux6,
    X7,
    Country,
    Defrosting,
    ChargePumpSpeed,
    OutdoorUnitOutdoorTemp,
    CompressorBlocked,
    CompressorStarts,
    CompressorProtectionMode,
    CondenserOut,
    Evaporator,
    HotGas,
    LiquidLine,
    ReturnTemp,
    SuctionGas,
    HighPressureSensor,
    LowPressureSensor,
    CompressorOperatingTime,
    CompressorOperatingTimeHotWater,
    CompressorRunTimeCooling,
    CurrentCompressorFrequency,
    RequestedCompressorFrequency,
    Version,
    SmartPriceStatus,
    SmartPriceValue,
    SmartPriceFactor,
}

impl Variable {
    /// Symbolic name, e.g. `"AVG_OUTDOOR_TEMP"`.
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Every variable in declaration order.
    pub fn iter() -> impl Iterator<Item = Self> {
        <Self as strum::IntoEnumIterator>::iter()
    }
}

impl std::fmt::Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ── Id tables ───────────────────────────────────────────────────────

/// One row of the id table: a variable and its id on each service.
/// `None` means the service does not expose the variable.
#[derive(Debug, Clone, Copy)]
pub struct CatalogRow {
    pub variable: Variable,
    pub myupway: Option<u32>,
    pub myuplink: Option<u32>,
}

impl CatalogRow {
    /// Same id on both services.
    const fn shared(variable: Variable, id: u32) -> Self {
        Self {
            variable,
            myupway: Some(id),
            myuplink: Some(id),
        }
    }

    fn id_for(&self, service: DataService) -> Option<u32> {
        match service {
            DataService::MyUpway => self.myupway,
            DataService::MyUplink => self.myuplink,
        }
    }
}

/// Built-in id table. Comments name the models a row was verified on.
pub const BUILTIN_ROWS: &[CatalogRow] = &[
    CatalogRow::shared(Variable::AvgOutdoorTemp, 40067),
    CatalogRow::shared(Variable::HotWaterCharging, 40014), // TehoWatti AIR
    CatalogRow::shared(Variable::HotWaterTop, 40013),      // TehoWatti AIR
    CatalogRow::shared(Variable::IndoorUnitOutdoorTemp, 40004),
    CatalogRow::shared(Variable::CurrentBe1, 40083),
    CatalogRow::shared(Variable::CurrentBe2, 40081),
    CatalogRow::shared(Variable::CurrentBe3, 40079),
    CatalogRow::shared(Variable::DegreeMinutes, 43005),
    CatalogRow::shared(Variable::ExternalAdjustment, 43161),
    CatalogRow::shared(Variable::FloorDryingFunction, 47276),
    CatalogRow::shared(Variable::CalculatedFlowTemp, 43009),
    CatalogRow::shared(Variable::ExternalFlowTemp, 40071),
    CatalogRow::shared(Variable::ExternalReturnTemp, 40152),
    CatalogRow::shared(Variable::HeatMediumFlow, 40008), // TehoWatti AIR
    CatalogRow::shared(Variable::HeatReturnTemp, 40012), // TehoWatti AIR
    CatalogRow::shared(Variable::RoomTemperature, 40033),
    CatalogRow::shared(Variable::AdditionBlocked, 10033),
    CatalogRow::shared(Variable::AdditionMaxStep, 47613),
    CatalogRow::shared(Variable::AdditionStatus, 43091),
    CatalogRow::shared(Variable::AdditionFuseSize, 47214),
    CatalogRow::shared(Variable::AdditionTimeFactor, 43081), // TehoWatti AIR
    CatalogRow::shared(Variable::AdditionElectricalAdditionPower, 43084), // TehoWatti AIR
    CatalogRow::shared(Variable::AdditionSetMaxElectricalAdd, 47212), // TehoWatti AIR
    CatalogRow::shared(Variable::AdditionTemperature, 40121), // TehoWatti AIR
    CatalogRow::shared(Variable::EnergyCoolingCompressorOnly, 44302), // TehoWatti AIR
    CatalogRow::shared(Variable::EnergyHeatingCompressorOnly, 44308), // TehoWatti AIR
    CatalogRow::shared(Variable::EnergyHeatingIntAddIncl, 44300), // TehoWatti AIR
    CatalogRow::shared(Variable::EnergyHotwaterCompressorOnly, 44306), // TehoWatti AIR
    CatalogRow::shared(Variable::EnergyHwInclIntAdd, 44298), // TehoWatti AIR
    CatalogRow::shared(Variable::EnergyPoolCompressorOnly, 44304), // TehoWatti AIR
    CatalogRow::shared(Variable::EnergyFlow, 40072),  // TehoWatti AIR
    CatalogRow::shared(Variable::Aux1, 47411),
    CatalogRow::shared(Variable::Aux2, 47410),
    CatalogRow::shared(Variable::Aux3, 47409),
    CatalogRow::shared(Variable::Aux4, 47408),
    CatalogRow::shared(Variable::Aux5, 47407),
    CatalogRow::shared(Variable::Aux6, 48366),
    CatalogRow::shared(Variable::X7, 47412),
    CatalogRow::shared(Variable::Country, 48745),
    CatalogRow::shared(Variable::Defrosting, 44703),
    CatalogRow::shared(Variable::ChargePumpSpeed, 44396),
    CatalogRow::shared(Variable::OutdoorUnitOutdoorTemp, 44362),
    CatalogRow::shared(Variable::CompressorBlocked, 10014),
    CatalogRow::shared(Variable::CompressorStarts, 44069),
    CatalogRow::shared(Variable::CompressorProtectionMode, 44702),
    CatalogRow::shared(Variable::CondenserOut, 44058),
    CatalogRow::shared(Variable::Evaporator, 44363),
    CatalogRow::shared(Variable::HotGas, 44059),
    CatalogRow::shared(Variable::LiquidLine, 44060),
    CatalogRow::shared(Variable::ReturnTemp, 44055),
    CatalogRow::shared(Variable::SuctionGas, 44061),
    CatalogRow::shared(Variable::HighPressureSensor, 44699),
    CatalogRow::shared(Variable::LowPressureSensor, 44700),
    CatalogRow::shared(Variable::CompressorOperatingTime, 44071),
    CatalogRow::shared(Variable::CompressorOperatingTimeHotWater, 44073),
    CatalogRow::shared(Variable::CompressorRunTimeCooling, 40737),
    CatalogRow::shared(Variable::CurrentCompressorFrequency, 44701),
    CatalogRow::shared(Variable::RequestedCompressorFrequency, 40782),
    CatalogRow::shared(Variable::Version, 44014),
    CatalogRow::shared(Variable::SmartPriceStatus, 44908), // Metro-air 330
    CatalogRow::shared(Variable::SmartPriceValue, 10069),  // Metro-air 330
    CatalogRow::shared(Variable::SmartPriceFactor, 44896), // Metro-air 330
];

static MYUPWAY: LazyLock<Arc<VariableCatalog>> =
    LazyLock::new(|| Arc::new(VariableCatalog::from_rows(DataService::MyUpway, BUILTIN_ROWS)));

static MYUPLINK: LazyLock<Arc<VariableCatalog>> =
    LazyLock::new(|| Arc::new(VariableCatalog::from_rows(DataService::MyUplink, BUILTIN_ROWS)));

// ── Catalog ─────────────────────────────────────────────────────────

/// A variable together with its id on one service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub variable: Variable,
    pub id: u32,
}

/// Immutable bidirectional mapping between variables and one service's
/// numeric ids.
///
/// Iteration order is table order; that order is also the default
/// variable set when a caller asks for "all values".
#[derive(Debug, Clone)]
pub struct VariableCatalog {
    service: DataService,
    by_id: IndexMap<u32, Variable>,
    by_variable: HashMap<Variable, u32>,
}

impl VariableCatalog {
    /// The built-in catalog for a service.
    pub fn for_service(service: DataService) -> Arc<Self> {
        match service {
            DataService::MyUpway => Arc::clone(&MYUPWAY),
            DataService::MyUplink => Arc::clone(&MYUPLINK),
        }
    }

    /// Build a catalog from id table rows. Rows without an id for
    /// `service` are left out; on duplicate ids the first row wins.
    pub fn from_rows(service: DataService, rows: &[CatalogRow]) -> Self {
        Self::new(
            service,
            rows.iter().filter_map(|row| {
                row.id_for(service).map(|id| CatalogEntry {
                    variable: row.variable,
                    id,
                })
            }),
        )
    }

    /// Build a catalog from explicit entries.
    pub fn new(service: DataService, entries: impl IntoIterator<Item = CatalogEntry>) -> Self {
        let mut by_id = IndexMap::new();
        let mut by_variable = HashMap::new();
        for entry in entries {
            if by_id.contains_key(&entry.id) || by_variable.contains_key(&entry.variable) {
                continue;
            }
            by_id.insert(entry.id, entry.variable);
            by_variable.insert(entry.variable, entry.id);
        }
        Self {
            service,
            by_id,
            by_variable,
        }
    }

    pub fn service(&self) -> DataService {
        self.service
    }

    /// Variable behind a numeric id.
    pub fn lookup(&self, id: u32) -> Option<Variable> {
        self.by_id.get(&id).copied()
    }

    /// Numeric id of a variable on this service.
    pub fn id_of(&self, variable: Variable) -> Option<u32> {
        self.by_variable.get(&variable).copied()
    }

    pub fn contains(&self, variable: Variable) -> bool {
        self.by_variable.contains_key(&variable)
    }

    /// All entries in table order.
    pub fn all(&self) -> impl Iterator<Item = CatalogEntry> + '_ {
        self.by_id
            .iter()
            .map(|(&id, &variable)| CatalogEntry { variable, id })
    }

    /// All ids in table order.
    pub fn ids(&self) -> Vec<u32> {
        self.by_id.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
