// 🏢 Warehouse Session - runs one command against the two stores
//
// Raw command arguments go through crate::validation before they reach the
// stores. A search that finds nothing is reported as "0 car(s) found", every
// other failure goes back to the caller. The car file is written only by
// `save`, and only when a command changed the inventory.

use crate::catalog::CarMakerCatalog;
use crate::config::{AddArgs, Command, EditField, SearchBy, WarehouseConfig};
use crate::entities::{Car, CarMaker, ModelChoice};
use crate::error::{Result, WarehouseError};
use crate::store::{CarRecordStore, LoadStatus};
use crate::validation;
use std::io::Write;

pub struct Warehouse {
    cars: CarRecordStore,
    makers: CarMakerCatalog,
    config: WarehouseConfig,
    current_year: u32,
    modified: bool,
}

impl Warehouse {
    /// Load both data files
    ///
    /// A missing or unreadable file is logged and that store starts empty.
    /// A malformed line is still an error.
    pub fn open(config: WarehouseConfig) -> Result<Self> {
        let mut cars = CarRecordStore::new();
        recover_file_access(cars.load_from_file(&config.cars_file))?;

        let mut makers = CarMakerCatalog::new();
        recover_file_access(makers.load_from_file(&config.makers_file))?;

        Ok(Self::with_stores(cars, makers, config, validation::current_year()))
    }

    pub fn with_stores(
        cars: CarRecordStore,
        makers: CarMakerCatalog,
        config: WarehouseConfig,
        current_year: u32,
    ) -> Self {
        Warehouse {
            cars,
            makers,
            config,
            current_year,
            modified: false,
        }
    }

    pub fn cars(&self) -> &CarRecordStore {
        &self.cars
    }

    pub fn makers(&self) -> &CarMakerCatalog {
        &self.makers
    }

    pub fn current_year(&self) -> u32 {
        self.current_year
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Write the car file back if anything changed
    pub fn save(&mut self) -> Result<()> {
        if self.modified {
            self.cars.save_to_file(&self.config.cars_file)?;
            self.modified = false;
        }
        Ok(())
    }

    pub fn run<W: Write>(&mut self, command: &Command, out: &mut W) -> Result<()> {
        match command {
            Command::List { json } => self.list(*json, out),
            Command::Makers => self.list_makers(out),
            Command::Search { by } => self.search(by, out),
            Command::Add(args) => self.add(args, out),
            Command::Delete { registration } => self.delete(registration, out),
            Command::Edit {
                registration,
                field,
            } => self.edit(registration, field, out),
            Command::Ui => Err(WarehouseError::Config(
                "the terminal browser is started by the binary".to_string(),
            )),
        }
    }

    // ========================================================================
    // LISTING
    // ========================================================================

    fn list<W: Write>(&self, json: bool, out: &mut W) -> Result<()> {
        if json {
            let cars: Vec<&Car> = self.cars.cars().collect();
            serde_json::to_writer_pretty(&mut *out, &cars).map_err(std::io::Error::from)?;
            writeln!(out)?;
            return Ok(());
        }
        writeln!(out, "{} car(s) in the warehouse", self.cars.len())?;
        display_cars(&self.cars, out)
    }

    fn list_makers<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "Available Car Makers:")?;
        for (index, maker) in self.makers.iter().enumerate() {
            writeln!(out, "({}) {}", index + 1, maker.name())?;
            for (model_index, model) in maker.models().iter().enumerate() {
                writeln!(out, "    ({}) {}", model_index + 1, model)?;
            }
        }
        Ok(())
    }

    // ========================================================================
    // SEARCH
    // ========================================================================

    fn search<W: Write>(&self, by: &SearchBy, out: &mut W) -> Result<()> {
        let found = match by {
            SearchBy::Reg { registration } => {
                let registration = validation::validate_registration_number(registration)?;
                self.cars
                    .find_by_registration_number(&registration)
                    .and_then(|id| self.cars.car(id))
                    .map(|car| {
                        let mut single = CarRecordStore::new();
                        single.add(car.clone());
                        single
                    })
            }
            SearchBy::Maker { maker, model } => {
                let maker = self.select_maker(maker)?;
                let model = maker.get_model(validation::validate_number(model)? as usize)?;
                writeln!(out, "{} from {} is selected", model, maker.name())?;
                self.cars.filter_by_maker_and_model(maker.name(), &model)
            }
            SearchBy::Age { max_age } => {
                let max_age = validation::validate_age(max_age, self.current_year)?;
                self.cars.filter_by_age(max_age, self.current_year)
            }
            SearchBy::Price { min, max } => {
                let min = validation::validate_price(min)?;
                let max = validation::validate_maximum_price(min, max)?;
                self.cars.filter_by_price_range(min, max)
            }
        };

        match found {
            Ok(found) => {
                writeln!(out, "{} car(s) found!", found.len())?;
                display_cars(&found, out)
            }
            Err(e) if e.is_not_found() => {
                writeln!(out, "{}", e)?;
                writeln!(out, "0 car(s) found")?;
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    fn select_maker(&self, input: &str) -> Result<&CarMaker> {
        let ordinal = validation::validate_number(input)? as usize;
        self.makers.get_by_ordinal(ordinal)
    }

    // ========================================================================
    // MUTATIONS
    // ========================================================================

    fn add<W: Write>(&mut self, args: &AddArgs, out: &mut W) -> Result<()> {
        let registration = validation::validate_registration_number(&args.registration)?;
        self.cars.check_duplicate(&registration)?;

        let year_made = validation::validate_year_made(&args.year, self.current_year)?;
        let colours = validation::validate_colours(&args.colours)?;

        let maker = self.select_maker(&args.maker)?;
        // ANY only makes sense for searching
        let model = match maker.get_model(validation::validate_number(&args.model)? as usize)? {
            ModelChoice::Specific(model) => model,
            ModelChoice::Any => {
                return Err(WarehouseError::OutOfRange {
                    ordinal: 0,
                    min: 1,
                    max: maker.model_count(),
                })
            }
        };
        let maker_name = maker.name().to_string();

        let price = validation::validate_price(&args.price)?;

        let car = Car::new(&registration, year_made, colours, &maker_name, &model, price)?;
        let id = self.cars.add(car);
        self.modified = true;

        writeln!(out, "This car is added successfully")?;
        writeln!(out, "{}", self.cars.car(id)?)?;
        Ok(())
    }

    fn delete<W: Write>(&mut self, registration: &str, out: &mut W) -> Result<()> {
        let registration = validation::validate_registration_number(registration)?;
        let id = self.cars.find_by_registration_number(&registration)?;
        let car = self.cars.delete(id)?;
        self.modified = true;

        writeln!(out, "{}", car)?;
        writeln!(out, "This car is deleted successfully")?;
        Ok(())
    }

    fn edit<W: Write>(&mut self, registration: &str, field: &EditField, out: &mut W) -> Result<()> {
        let registration = validation::validate_registration_number(registration)?;
        let id = self.cars.find_by_registration_number(&registration)?;

        match field {
            EditField::Colours { colours } => {
                let colours = validation::validate_colours(colours)?;
                self.cars.edit_colours(id, colours.slots())?;
                writeln!(out, "This car colour is edited successfully")?;
            }
            EditField::Price { price } => {
                let price = validation::validate_price(price)?;
                self.cars.edit_price(id, price)?;
                writeln!(out, "This car price is edited successfully")?;
            }
        }
        self.modified = true;

        writeln!(out, "{}", self.cars.car(id)?)?;
        Ok(())
    }
}

fn recover_file_access(loaded: Result<LoadStatus>) -> Result<LoadStatus> {
    match loaded {
        Err(WarehouseError::FileAccess { path, source }) => {
            tracing::error!("Cannot read {}: {}, starting empty", path.display(), source);
            Ok(LoadStatus::Missing)
        }
        other => other,
    }
}

fn display_cars<W: Write>(store: &CarRecordStore, out: &mut W) -> Result<()> {
    for (index, car) in store.cars().enumerate() {
        writeln!(out)?;
        writeln!(out, "{}", car)?;
        writeln!(out, "(Car {} Information)", index + 1)?;
    }
    Ok(())
}
