// 📄 Record Codec - line format of the car file and the car maker file
//
// Car file:   registrationNumber,yearMade,colour1,colour2,colour3,carMaker,carModel,price
// Maker file: name,model1,model2,...,modelN
//
// Both formats split strictly on commas: quoting is disabled, so a quote
// character is just part of a field. No header line.

use crate::entities::{Car, CarMaker, Colours, COLOUR_SLOTS};
use crate::error::{Result, WarehouseError};
use csv::{QuoteStyle, ReaderBuilder, StringRecord, WriterBuilder};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

/// Fixed column count of a car record
pub const CAR_FIELD_COUNT: usize = 8;

// ============================================================================
// CAR LINES
// ============================================================================

/// Fields of a car record in file order
pub fn car_fields(car: &Car) -> [String; CAR_FIELD_COUNT] {
    let [colour1, colour2, colour3] = car.colours().slots().clone();
    [
        car.registration_number().to_string(),
        car.year_made().to_string(),
        colour1,
        colour2,
        colour3,
        car.car_maker().to_string(),
        car.car_model().to_string(),
        car.price().to_string(),
    ]
}

pub fn car_to_line(car: &Car) -> String {
    car_fields(car).join(",")
}

/// Parse one car line; the error string says what is wrong with it
pub fn car_from_line(line: &str) -> std::result::Result<Car, String> {
    car_from_record(&split_line(line)?)
}

pub fn car_from_record(record: &StringRecord) -> std::result::Result<Car, String> {
    if record.len() != CAR_FIELD_COUNT {
        return Err(format!(
            "expected {} fields, found {}",
            CAR_FIELD_COUNT,
            record.len()
        ));
    }

    let year_made = parse_number("year made", &record[1])?;
    let colours: [String; COLOUR_SLOTS] = [
        record[2].to_string(),
        record[3].to_string(),
        record[4].to_string(),
    ];
    let price = parse_number("price", &record[7])?;

    Car::new(
        &record[0],
        year_made,
        Colours::from(colours),
        &record[5],
        &record[6],
        price,
    )
    .map_err(|e| e.to_string())
}

fn parse_number(field: &str, value: &str) -> std::result::Result<u32, String> {
    value
        .parse::<u32>()
        .map_err(|_| format!("{} '{}' is not a non-negative integer", field, value))
}

// ============================================================================
// CAR MAKER LINES
// ============================================================================

pub fn maker_to_line(maker: &CarMaker) -> String {
    std::iter::once(maker.name())
        .chain(maker.models().iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(",")
}

/// Parse one maker line: first field is the name, the rest are models
pub fn maker_from_line(line: &str) -> std::result::Result<CarMaker, String> {
    maker_from_record(&split_line(line)?)
}

/// Fields are trimmed the same way `Car::new` trims maker and model names
pub fn maker_from_record(record: &StringRecord) -> std::result::Result<CarMaker, String> {
    let mut fields = record.iter().map(str::trim);
    let name = fields.next().unwrap_or("");
    if name.is_empty() {
        return Err("car maker name must not be blank".to_string());
    }
    let models = fields.map(str::to_string).collect();
    Ok(CarMaker::new(name, models))
}

// ============================================================================
// FILE ACCESS
// ============================================================================

fn reader_builder() -> ReaderBuilder {
    let mut builder = ReaderBuilder::new();
    builder.has_headers(false).flexible(true).quoting(false);
    builder
}

fn split_line(line: &str) -> std::result::Result<StringRecord, String> {
    let mut reader = reader_builder().from_reader(line.as_bytes());
    let mut record = StringRecord::new();
    match reader.read_record(&mut record) {
        Ok(true) => Ok(record),
        Ok(false) => Err("line is empty".to_string()),
        Err(e) => Err(e.to_string()),
    }
}

/// Read every non-blank record of a data file with its 1-based line number
///
/// `Ok(None)` means the file does not exist.
pub fn read_records(path: &Path) -> Result<Option<Vec<(usize, StringRecord)>>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(WarehouseError::FileAccess {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    read_records_from(path, file).map(Some)
}

/// Lines are counted here rather than taken from the csv reader, which
/// does not count the blank lines it skips.
fn read_records_from<R: Read>(path: &Path, input: R) -> Result<Vec<(usize, StringRecord)>> {
    let mut records = Vec::new();

    for (index, line) in BufReader::new(input).lines().enumerate() {
        let line = line.map_err(|source| WarehouseError::FileAccess {
            path: path.to_path_buf(),
            source,
        })?;
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }

        let record = split_line(line).map_err(|reason| WarehouseError::Parse {
            origin: path.display().to_string(),
            line: index + 1,
            reason,
        })?;
        records.push((index + 1, record));
    }

    Ok(records)
}

/// Overwrite `path` with one record per line
pub fn write_records<I>(path: &Path, records: I) -> Result<()>
where
    I: IntoIterator,
    I::Item: IntoIterator,
    <I::Item as IntoIterator>::Item: AsRef<[u8]>,
{
    let access = |source: io::Error| WarehouseError::FileAccess {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(access)?;
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quote_style(QuoteStyle::Never)
        .from_writer(file);

    for record in records {
        writer.write_record(record).map_err(|e| match e.into_kind() {
            csv::ErrorKind::Io(source) => access(source),
            kind => access(io::Error::new(io::ErrorKind::Other, format!("{:?}", kind))),
        })?;
    }
    writer.flush().map_err(access)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_car(registration: &str, colours: &[&str]) -> Car {
        Car::new(
            registration,
            2015,
            Colours::new(colours).unwrap(),
            "Toyota",
            "Corolla",
            8000,
        )
        .unwrap()
    }

    #[test]
    fn test_car_line_keeps_three_colour_columns() {
        let car = create_test_car("AB12CD", &["Red"]);
        assert_eq!(car_to_line(&car), "AB12CD,2015,Red,,,Toyota,Corolla,8000");
    }

    #[test]
    fn test_car_line_round_trip() {
        let car = create_test_car("XY9", &["Red", "", "Blue"]);
        let parsed = car_from_line(&car_to_line(&car)).unwrap();
        assert_eq!(parsed, car);
    }

    #[test]
    fn test_car_line_parses_fields() {
        let car = car_from_line("AB12CD,2015,Red,,,Toyota,Corolla,8000").unwrap();
        assert_eq!(car.registration_number(), "AB12CD");
        assert_eq!(car.year_made(), 2015);
        assert_eq!(car.colours().to_string(), "Red");
        assert_eq!(car.car_maker(), "Toyota");
        assert_eq!(car.car_model(), "Corolla");
        assert_eq!(car.price(), 8000);
    }

    #[test]
    fn test_car_line_wrong_field_count() {
        let err = car_from_line("AB12CD,2015,Red,,Toyota,Corolla,8000").unwrap_err();
        assert!(err.contains("expected 8 fields, found 7"));
        assert!(car_from_line("AB12CD,2015,Red,,,Toyota,Corolla,8000,extra").is_err());
    }

    #[test]
    fn test_car_line_non_numeric() {
        assert!(car_from_line("AB12CD,twenty,Red,,,Toyota,Corolla,8000")
            .unwrap_err()
            .contains("year made"));
        assert!(car_from_line("AB12CD,2015,Red,,,Toyota,Corolla,-1")
            .unwrap_err()
            .contains("price"));
    }

    #[test]
    fn test_quotes_are_literal() {
        let car = car_from_line("AB12CD,2015,\"Red,,,Toyota,Corolla,8000").unwrap();
        assert_eq!(car.colours().slots()[0], "\"Red");
    }

    #[test]
    fn test_maker_line_variable_arity() {
        let maker = maker_from_line("Toyota,Corolla,Yaris").unwrap();
        assert_eq!(maker.name(), "Toyota");
        assert_eq!(maker.models(), &["Corolla".to_string(), "Yaris".to_string()]);

        let bare = maker_from_line("Lada").unwrap();
        assert_eq!(bare.model_count(), 0);

        assert!(maker_from_line(",Corolla").is_err());
        assert!(maker_from_line("  ,Corolla").is_err());
        assert_eq!(maker_to_line(&maker), "Toyota,Corolla,Yaris");
    }

    #[test]
    fn test_maker_line_trims_fields() {
        let maker = maker_from_line(" Toyota , Corolla,Yaris ").unwrap();
        assert_eq!(maker.name(), "Toyota");
        assert_eq!(maker.models(), &["Corolla".to_string(), "Yaris".to_string()]);
    }

    #[test]
    fn test_read_records_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_records(&dir.path().join("nope.txt")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_write_then_read_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cars.txt");
        let car = create_test_car("AB12CD", &["Red", "White"]);

        write_records(&path, vec![car_fields(&car)]).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "AB12CD,2015,Red,White,,Toyota,Corolla,8000\n");

        let records = read_records(&path).unwrap().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].0, 1);
        assert_eq!(car_from_record(&records[0].1).unwrap(), car);
    }

    #[test]
    fn test_read_records_skips_blank_lines_and_counts_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("makers.txt");
        std::fs::write(&path, "Toyota,Corolla\n\nHonda,Civic,Jazz\n").unwrap();

        let records = read_records(&path).unwrap().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].0, 3);
        assert_eq!(records[1].1.len(), 3);
    }

    #[test]
    fn test_read_records_counts_several_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cars.txt");
        std::fs::write(
            &path,
            "AB12CD,2015,Red,,,Toyota,Corolla,8000\r\n\r\n   \nXY34ZW,new,Blue,,,Toyota,Yaris,12000\n",
        )
        .unwrap();

        let records = read_records(&path).unwrap().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].0, 1);
        assert_eq!(&records[0].1[7], "8000");
        assert_eq!(records[1].0, 4);
    }
}
