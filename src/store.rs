// 🗄️ Car Record Store - the warehouse inventory
//
// Ordered mapping from insertion sequence to Car. Callers hold CarId handles,
// never references, so a deleted record turns into NotFound instead of
// dangling. Filters return new stores that reuse the same handles: a handle
// taken from a search result can be used to edit the record here.
//
// Uniqueness of registration numbers is the caller's job: check_duplicate
// first, then add (or insert_unique for both in one call).

use crate::codec;
use crate::entities::{Car, Colours, ModelChoice};
use crate::error::{Result, WarehouseError};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

// ============================================================================
// HANDLES & LOAD OUTCOME
// ============================================================================

/// Insertion sequence number of a car in its store
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct CarId(u64);

impl fmt::Display for CarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a load found on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// File read, this many records appended
    Loaded(usize),

    /// File does not exist; nothing was loaded
    Missing,
}

// ============================================================================
// CAR RECORD STORE
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct CarRecordStore {
    cars: BTreeMap<CarId, Car>,
    next_id: u64,
}

impl CarRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a car without any uniqueness check
    pub fn add(&mut self, car: Car) -> CarId {
        let id = CarId(self.next_id);
        self.next_id += 1;
        tracing::debug!("Added car {} as {}", car.registration_number(), id);
        self.cars.insert(id, car);
        id
    }

    /// Fails with DuplicateKey when the registration number is already taken
    pub fn check_duplicate(&self, registration_number: &str) -> Result<()> {
        if self.cars.values().any(|car| car.has_registration(registration_number)) {
            return Err(WarehouseError::DuplicateKey(registration_number.to_string()));
        }
        Ok(())
    }

    /// check_duplicate followed by add
    pub fn insert_unique(&mut self, car: Car) -> Result<CarId> {
        self.check_duplicate(car.registration_number())?;
        Ok(self.add(car))
    }

    /// First car whose registration matches, ignoring case
    pub fn find_by_registration_number(&self, registration_number: &str) -> Result<CarId> {
        self.cars
            .iter()
            .find(|(_, car)| car.has_registration(registration_number))
            .map(|(id, _)| *id)
            .ok_or_else(|| {
                WarehouseError::NotFound("No such car with this Registration Number".to_string())
            })
    }

    pub fn get(&self, id: CarId) -> Option<&Car> {
        self.cars.get(&id)
    }

    /// Like `get`, but a stale handle is an error
    pub fn car(&self, id: CarId) -> Result<&Car> {
        self.cars.get(&id).ok_or_else(|| stale_handle(id))
    }

    fn car_mut(&mut self, id: CarId) -> Result<&mut Car> {
        self.cars.get_mut(&id).ok_or_else(|| stale_handle(id))
    }

    /// Cars with their handles, in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (CarId, &Car)> {
        self.cars.iter().map(|(id, car)| (*id, car))
    }

    pub fn cars(&self) -> impl Iterator<Item = &Car> {
        self.cars.values()
    }

    pub fn len(&self) -> usize {
        self.cars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cars.is_empty()
    }

    // ========================================================================
    // MUTATIONS
    // ========================================================================

    /// Remove the record behind `id` and hand it back
    pub fn delete(&mut self, id: CarId) -> Result<Car> {
        let car = self.cars.remove(&id).ok_or_else(|| stale_handle(id))?;
        tracing::debug!("Deleted car {} ({})", car.registration_number(), id);
        Ok(car)
    }

    /// Replace the colours; empty or more than three entries leaves the car as it was
    pub fn edit_colours<S: AsRef<str>>(&mut self, id: CarId, new_colours: &[S]) -> Result<()> {
        let colours = Colours::new(new_colours)?;
        let car = self.car_mut(id)?;
        car.set_colours(colours);
        tracing::debug!("Edited colours of {}", car.registration_number());
        Ok(())
    }

    pub fn edit_price(&mut self, id: CarId, new_price: u32) -> Result<()> {
        let car = self.car_mut(id)?;
        car.set_price(new_price);
        tracing::debug!("Edited price of {} to {}", car.registration_number(), new_price);
        Ok(())
    }

    // ========================================================================
    // QUERIES
    //
    // An empty result is NotFound, not an empty store: callers report
    // "no matches" on the error path.
    // ========================================================================

    /// Cars at most `max_age` years old in `current_year`
    pub fn filter_by_age(&self, max_age: u32, current_year: u32) -> Result<CarRecordStore> {
        self.filtered(
            |car| car.age(current_year) <= max_age,
            "There is no car younger than or equal to this age in the warehouse currently",
        )
    }

    /// Cars of `maker` (any case), narrowed to one model unless `model` is Any
    pub fn filter_by_maker_and_model(
        &self,
        maker: &str,
        model: &ModelChoice,
    ) -> Result<CarRecordStore> {
        let maker = maker.to_lowercase();
        self.filtered(
            |car| car.car_maker().to_lowercase() == maker && model.matches(car.car_model()),
            "There is no car with this car maker and model in the warehouse currently",
        )
    }

    /// Cars priced within `[min_price, max_price]`
    pub fn filter_by_price_range(&self, min_price: u32, max_price: u32) -> Result<CarRecordStore> {
        self.filtered(
            |car| car.price() >= min_price && car.price() <= max_price,
            "There is no car within this price range",
        )
    }

    fn filtered<F>(&self, predicate: F, empty_message: &str) -> Result<CarRecordStore>
    where
        F: Fn(&Car) -> bool,
    {
        let cars: BTreeMap<CarId, Car> = self
            .cars
            .iter()
            .filter(|(_, car)| predicate(*car))
            .map(|(id, car)| (*id, car.clone()))
            .collect();

        if cars.is_empty() {
            return Err(WarehouseError::NotFound(empty_message.to_string()));
        }

        Ok(CarRecordStore {
            cars,
            next_id: self.next_id,
        })
    }

    // ========================================================================
    // PERSISTENCE
    // ========================================================================

    /// One record line: reg,year,colour1,colour2,colour3,maker,model,price
    pub fn serialize_line(car: &Car) -> String {
        codec::car_to_line(car)
    }

    /// Parse one record line of exactly eight fields
    pub fn deserialize_line(line: &str) -> Result<Car> {
        codec::car_from_line(line).map_err(|reason| WarehouseError::Parse {
            origin: "input".to_string(),
            line: 1,
            reason,
        })
    }

    /// Append every record of the car file
    ///
    /// A missing file is reported as `LoadStatus::Missing`. The first
    /// malformed line aborts the load and nothing from the file is kept.
    pub fn load_from_file(&mut self, path: &Path) -> Result<LoadStatus> {
        let Some(records) = codec::read_records(path)? else {
            tracing::warn!("{} not found, starting with an empty inventory", path.display());
            return Ok(LoadStatus::Missing);
        };

        let cars = records
            .iter()
            .map(|(line, record)| {
                codec::car_from_record(record).map_err(|reason| WarehouseError::Parse {
                    origin: path.display().to_string(),
                    line: *line,
                    reason,
                })
            })
            .collect::<Result<Vec<Car>>>()?;

        let count = cars.len();
        for car in cars {
            self.add(car);
        }
        tracing::info!("Loaded {} car(s) from {}", count, path.display());
        Ok(LoadStatus::Loaded(count))
    }

    /// Overwrite the car file with the whole inventory
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        codec::write_records(path, self.cars.values().map(codec::car_fields))?;
        tracing::info!("Saved {} car(s) to {}", self.len(), path.display());
        Ok(())
    }
}

fn stale_handle(id: CarId) -> WarehouseError {
    WarehouseError::NotFound(format!("Car {} is not in this store", id))
}
