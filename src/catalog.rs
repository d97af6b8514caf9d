// 📚 Car Maker Catalog - makers and models offered for selection
//
// Order of the makers is the order they were added (or read from the file),
// which is also the numbering shown to the user. Duplicate maker names are
// accepted as-is.

use crate::codec;
use crate::entities::CarMaker;
use crate::error::{Result, WarehouseError};
use crate::store::LoadStatus;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct CarMakerCatalog {
    makers: Vec<CarMaker>,
}

impl CarMakerCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a maker with its models; names are not checked for duplicates
    pub fn add_maker(&mut self, name: impl Into<String>, models: Vec<String>) {
        let maker = CarMaker::new(name, models);
        tracing::debug!("Added car maker {} with {} model(s)", maker.name(), maker.model_count());
        self.makers.push(maker);
    }

    /// Maker by 1-based selection number
    pub fn get_by_ordinal(&self, ordinal: usize) -> Result<&CarMaker> {
        ordinal
            .checked_sub(1)
            .and_then(|index| self.makers.get(index))
            .ok_or(WarehouseError::OutOfRange {
                ordinal,
                min: 1,
                max: self.makers.len(),
            })
    }

    /// First maker with this name, ignoring case
    pub fn find_by_name(&self, name: &str) -> Option<&CarMaker> {
        let name = name.to_lowercase();
        self.makers.iter().find(|m| m.name().to_lowercase() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CarMaker> {
        self.makers.iter()
    }

    pub fn len(&self) -> usize {
        self.makers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.makers.is_empty()
    }

    /// Parse `name,model1,...,modelN`
    pub fn deserialize_line(line: &str) -> Result<CarMaker> {
        codec::maker_from_line(line).map_err(|reason| WarehouseError::Parse {
            origin: "input".to_string(),
            line: 1,
            reason,
        })
    }

    /// Append every maker of the maker file; a missing file is not an error
    pub fn load_from_file(&mut self, path: &Path) -> Result<LoadStatus> {
        let Some(records) = codec::read_records(path)? else {
            tracing::warn!("{} not found, no car makers available", path.display());
            return Ok(LoadStatus::Missing);
        };

        let makers = records
            .iter()
            .map(|(line, record)| {
                codec::maker_from_record(record).map_err(|reason| WarehouseError::Parse {
                    origin: path.display().to_string(),
                    line: *line,
                    reason,
                })
            })
            .collect::<Result<Vec<CarMaker>>>()?;

        let count = makers.len();
        self.makers.extend(makers);
        tracing::info!("Loaded {} car maker(s) from {}", count, path.display());
        Ok(LoadStatus::Loaded(count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::ModelChoice;

    fn create_test_catalog() -> CarMakerCatalog {
        let mut catalog = CarMakerCatalog::new();
        catalog.add_maker("Toyota", vec!["Corolla".to_string(), "Yaris".to_string()]);
        catalog.add_maker("Honda", vec!["Civic".to_string()]);
        catalog
    }

    #[test]
    fn test_get_by_ordinal() {
        let catalog = create_test_catalog();
        assert_eq!(catalog.get_by_ordinal(1).unwrap().name(), "Toyota");
        assert_eq!(catalog.get_by_ordinal(2).unwrap().name(), "Honda");

        assert!(matches!(
            catalog.get_by_ordinal(0),
            Err(WarehouseError::OutOfRange { ordinal: 0, min: 1, max: 2 })
        ));
        assert!(catalog.get_by_ordinal(3).is_err());
        assert!(CarMakerCatalog::new().get_by_ordinal(1).is_err());
    }

    #[test]
    fn test_duplicate_names_are_kept() {
        let mut catalog = create_test_catalog();
        catalog.add_maker("Toyota", vec!["Camry".to_string()]);
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.get_by_ordinal(3).unwrap().models(), &["Camry".to_string()]);
        // Lookup by name finds the first one
        assert_eq!(catalog.find_by_name("TOYOTA").unwrap().model_count(), 2);
    }

    #[test]
    fn test_deserialize_line() {
        let maker = CarMakerCatalog::deserialize_line("Mazda,2,3,CX-5").unwrap();
        assert_eq!(maker.name(), "Mazda");
        assert_eq!(maker.model_count(), 3);
        assert!(CarMakerCatalog::deserialize_line("").is_err());
    }

    #[test]
    fn test_load_maker_file_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("carmakers.txt");
        std::fs::write(&path, "Toyota,Corolla,Yaris\n").unwrap();

        let mut catalog = CarMakerCatalog::new();
        assert_eq!(catalog.load_from_file(&path).unwrap(), LoadStatus::Loaded(1));

        let toyota = catalog.get_by_ordinal(1).unwrap();
        assert_eq!(toyota.get_model(2).unwrap(), ModelChoice::Specific("Yaris".to_string()));
        assert_eq!(toyota.get_model(0).unwrap(), ModelChoice::Any);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut catalog = CarMakerCatalog::new();
        let status = catalog.load_from_file(&dir.path().join("absent.txt")).unwrap();
        assert_eq!(status, LoadStatus::Missing);
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_load_rejects_blank_maker_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("carmakers.txt");
        std::fs::write(&path, "Toyota,Corolla\n,Civic\n").unwrap();

        let mut catalog = CarMakerCatalog::new();
        let err = catalog.load_from_file(&path).unwrap_err();
        assert!(matches!(err, WarehouseError::Parse { line: 2, .. }));
        assert!(catalog.is_empty());
    }
}
