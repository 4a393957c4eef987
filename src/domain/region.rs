use std::str::FromStr;

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};

/// 客席エリア
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Display)]
pub enum DiningRegion {
    #[display(fmt = "main-hall")]
    MainHall,
    #[display(fmt = "bar")]
    Bar,
    #[display(fmt = "riverside")]
    Riverside,
    #[display(fmt = "riverside-smoking")]
    RiversideSmoking,
}

impl DiningRegion {
    pub const ALL: [DiningRegion; 4] = [
        DiningRegion::MainHall,
        DiningRegion::Bar,
        DiningRegion::Riverside,
        DiningRegion::RiversideSmoking,
    ];
}

impl FromStr for DiningRegion {
    type Err = ParseRegionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|region| region.to_string() == s)
            .ok_or_else(|| ParseRegionError(s.to_owned()))
    }
}

#[derive(Error, Display, Debug, Clone, PartialEq, Eq)]
#[display(fmt = "Unknown dining region: {}", _0)]
pub struct ParseRegionError(#[error(not(source))] pub String);

/// 客席エリアの設定
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionConfig {
    #[serde_as(as = "DisplayFromStr")]
    pub id: DiningRegion,
    pub name: String,
    /// 1組あたりの最大人数
    pub max_party_size: u32,
    /// 同一日時の最大席数
    pub max_capacity: u32,
    pub allows_children: bool,
    pub allows_smoking: bool,
}

impl RegionConfig {
    pub fn new(
        id: DiningRegion,
        name: impl Into<String>,
        max_party_size: u32,
        max_capacity: u32,
        allows_children: bool,
        allows_smoking: bool,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            max_party_size,
            max_capacity,
            allows_children,
            allows_smoking,
        }
    }

    fn validate(&self) -> Result<(), CatalogError> {
        if self.max_party_size == 0 || self.max_capacity == 0 {
            return Err(CatalogError::ZeroLimit(self.id));
        }
        if self.max_party_size > self.max_capacity {
            return Err(CatalogError::PartyExceedsCapacity(self.id));
        }
        Ok(())
    }
}

/// 客席エリアのカタログ (起動後は読み取り専用)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegionCatalog {
    regions: Vec<RegionConfig>,
}

impl RegionCatalog {
    pub fn new(regions: Vec<RegionConfig>) -> Result<Self, CatalogError> {
        for (i, region) in regions.iter().enumerate() {
            region.validate()?;
            if regions[..i].iter().any(|r| r.id == region.id) {
                return Err(CatalogError::DuplicateRegion(region.id));
            }
        }
        Ok(Self { regions })
    }

    /// 全エリアを定義順で返す
    pub fn list_regions(&self) -> &[RegionConfig] {
        &self.regions
    }

    /// 識別子文字列からエリア設定を引く
    pub fn resolve(&self, id: &str) -> Option<&RegionConfig> {
        id.parse::<DiningRegion>()
            .ok()
            .and_then(|region| self.get(region))
    }

    pub fn get(&self, region: DiningRegion) -> Option<&RegionConfig> {
        self.regions.iter().find(|r| r.id == region)
    }
}

impl Default for RegionCatalog {
    fn default() -> Self {
        Self {
            regions: vec![
                RegionConfig::new(DiningRegion::MainHall, "Main Hall", 12, 48, true, false),
                RegionConfig::new(DiningRegion::Bar, "Bar", 4, 12, false, false),
                RegionConfig::new(DiningRegion::Riverside, "Riverside", 8, 24, true, false),
                RegionConfig::new(
                    DiningRegion::RiversideSmoking,
                    "Riverside (Smoking)",
                    6,
                    12,
                    false,
                    true,
                ),
            ],
        }
    }
}

/// カタログ構築エラー
#[derive(Error, Display, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[display(fmt = "Region {} must have non-zero limits", _0)]
    ZeroLimit(#[error(not(source))] DiningRegion),
    #[display(fmt = "Region {} allows parties larger than its capacity", _0)]
    PartyExceedsCapacity(#[error(not(source))] DiningRegion),
    #[display(fmt = "Region {} is defined more than once", _0)]
    DuplicateRegion(#[error(not(source))] DiningRegion),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_every_region() {
        let catalog = RegionCatalog::default();
        for region in catalog.list_regions() {
            assert_eq!(catalog.resolve(&region.id.to_string()), Some(region));
            assert_eq!(catalog.get(region.id), Some(region));
        }
    }

    #[test]
    fn test_resolve_unknown_region() {
        let catalog = RegionCatalog::default();
        assert_eq!(catalog.resolve("terrace"), None);
        assert_eq!(catalog.resolve(""), None);
        assert_eq!(catalog.resolve("Main Hall"), None);
    }

    #[test]
    fn test_default_capacities() {
        let catalog = RegionCatalog::default();
        let capacities = catalog
            .list_regions()
            .iter()
            .map(|r| (r.id.to_string(), r.max_party_size, r.max_capacity))
            .collect::<Vec<_>>();
        assert_eq!(
            capacities,
            vec![
                ("main-hall".to_owned(), 12, 48),
                ("bar".to_owned(), 4, 12),
                ("riverside".to_owned(), 8, 24),
                ("riverside-smoking".to_owned(), 6, 12),
            ]
        );
    }

    #[test]
    fn test_catalog_rejects_party_larger_than_capacity() {
        let result = RegionCatalog::new(vec![RegionConfig::new(
            DiningRegion::Bar,
            "Bar",
            10,
            8,
            false,
            false,
        )]);
        assert_eq!(
            result,
            Err(CatalogError::PartyExceedsCapacity(DiningRegion::Bar))
        );
    }

    #[test]
    fn test_catalog_rejects_duplicates() {
        let bar = RegionConfig::new(DiningRegion::Bar, "Bar", 4, 12, false, false);
        let result = RegionCatalog::new(vec![bar.clone(), bar]);
        assert_eq!(result, Err(CatalogError::DuplicateRegion(DiningRegion::Bar)));
    }

    #[test]
    fn test_custom_catalog_missing_region() {
        let catalog = RegionCatalog::new(vec![RegionConfig::new(
            DiningRegion::Bar,
            "Bar",
            4,
            12,
            false,
            false,
        )])
        .unwrap();
        assert!(catalog.get(DiningRegion::MainHall).is_none());
        assert!(catalog.resolve("main-hall").is_none());
    }
}
