//! CSV files and the ZIP bundle built from a [`FormattedReport`].

use std::io::{Cursor, Write};
use thiserror::Error;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::{FormattedReport, Section, MONTHLY_HEADER, STATS_HEADER};
use crate::analysis::SimulationReport;

pub const ZIP_FILE_NAME: &str = "solar_simulation_export.zip";
pub const CSV_FILE_NAME: &str = "solar_simulation_data.csv";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV encoding failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("ZIP archive failed: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("export I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("export produced invalid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

fn csv_writer() -> csv::Writer<Vec<u8>> {
    csv::WriterBuilder::new()
        .flexible(true)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new())
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>, ExportError> {
    writer.into_inner().map_err(|e| ExportError::Io(e.into_error()))
}

fn key_value_csv(section: &Section) -> Result<Vec<u8>, ExportError> {
    let mut w = csv_writer();
    for (label, value) in section {
        w.write_record([label, value])?;
    }
    finish(w)
}

fn table_csv<R, I>(header: &[&str], rows: R) -> Result<Vec<u8>, ExportError>
where
    R: IntoIterator<Item = I>,
    I: IntoIterator,
    I::Item: AsRef<[u8]>,
{
    let mut w = csv_writer();
    w.write_record(header)?;
    for row in rows {
        w.write_record(row)?;
    }
    finish(w)
}

fn readme(formatted: &FormattedReport, lifetime_years: u32) -> String {
    format!(
        "Solar Energy Simulation Export
Generated on: {}

This export contains the following files:
1. Location.csv - Location coordinates and area
2. Panel_Configuration.csv - Solar panel setup details
3. Summary_Metrics.csv - Key performance metrics
4. Financial_Analysis.csv - Financial calculations and projections
5. Monthly_Data_*.csv - Detailed monthly performance data

Note: All financial calculations are based on current energy rates and assume a {}-year system lifetime.
",
        formatted.generated_at, lifetime_years
    )
}

/// Every file of the export bundle, in archive order.
pub fn bundle_files(report: &SimulationReport) -> Result<Vec<(String, Vec<u8>)>, ExportError> {
    let formatted = FormattedReport::from_report(report);

    let mut files = vec![
        ("Location.csv".to_string(), key_value_csv(&formatted.location)?),
        ("Panel_Configuration.csv".to_string(), key_value_csv(&formatted.panel)?),
        ("Summary_Metrics.csv".to_string(), key_value_csv(&formatted.summary)?),
        ("Financial_Analysis.csv".to_string(), key_value_csv(&formatted.financial)?),
    ];
    for table in &formatted.statistics {
        files.push((format!("Monthly_Data_{}.csv", table.month), table_csv(&STATS_HEADER, &table.rows)?));
    }
    files.push(("README.txt".to_string(), readme(&formatted, report.lifetime_years).into_bytes()));
    Ok(files)
}

pub fn export_zip(report: &SimulationReport) -> Result<Vec<u8>, ExportError> {
    let files = bundle_files(report)?;
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, contents) in &files {
        zip.start_file(name.as_str(), options)?;
        zip.write_all(contents)?;
    }
    let cursor = zip.finish()?;
    tracing::debug!(files = files.len(), "export bundle written");
    Ok(cursor.into_inner())
}

/// All sections in one CSV, separated by blank lines.
pub fn export_combined_csv(report: &SimulationReport) -> Result<String, ExportError> {
    let formatted = FormattedReport::from_report(report);

    let mut configuration = csv_writer();
    configuration.write_record(["Configuration Data"])?;
    configuration.write_record(["Category", "Parameter", "Value"])?;
    for (label, value) in &formatted.location {
        configuration.write_record(["Location", label.as_str(), value.as_str()])?;
    }
    for (label, value) in &formatted.panel {
        configuration.write_record(["Panel Configuration", label.as_str(), value.as_str()])?;
    }

    let mut monthly = csv_writer();
    monthly.write_record(["Monthly Performance Data"])?;
    monthly.write_record(MONTHLY_HEADER)?;
    for m in &formatted.monthly {
        monthly.write_record([&m.month, &m.energy_kwh, &m.peak_sun_hours, &m.efficiency])?;
    }

    let sections = [
        finish(configuration)?,
        titled_section("Summary Metrics", &formatted.summary)?,
        titled_section("Financial Analysis", &formatted.financial)?,
        finish(monthly)?,
    ];
    // each section already ends in a newline, so one more leaves a blank line
    Ok(String::from_utf8(sections.join(&b'\n'))?)
}

fn titled_section(title: &str, section: &Section) -> Result<Vec<u8>, ExportError> {
    let mut w = csv_writer();
    w.write_record([title])?;
    w.write_record(["Parameter", "Value"])?;
    for (label, value) in section {
        w.write_record([label, value])?;
    }
    finish(w)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::pipeline::{evaluate, Evaluation};
    use crate::analysis::FinancialAssumptions;
    use crate::domain::{plan_capacity, AreaUnit, Coordinate, PanelConfiguration, Region};
    use crate::pvgis::RawMonthlySample;
    use std::io::Read;

    fn report() -> SimulationReport {
        let samples: Vec<RawMonthlySample> = (1..=12)
            .map(|month| RawMonthlySample {
                month,
                selected_angle: Some(150.0),
                horizontal: Some(100.0),
                temperature: Some(25.0),
                ..Default::default()
            })
            .collect();
        let panel = PanelConfiguration::new(1.0).with_count(4);
        let capacity = plan_capacity(100.0, &panel).unwrap();
        evaluate(
            Evaluation {
                location: Coordinate::new(51.5, -0.1).unwrap(),
                site_area: 100.0,
                area_unit: AreaUnit::M2,
                region: Region::UK,
                carbon_intensity: 225.0,
                energy_price: 0.25,
                panel: &panel,
                capacity,
                samples: &samples,
                net_metering: false,
                target_households: None,
                cost_per_watt: None,
            },
            &FinancialAssumptions::default(),
        )
    }

    #[test]
    fn zip_contains_every_section() {
        let bytes = export_zip(&report()).unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let names: Vec<String> = archive.file_names().map(str::to_string).collect();

        for expected in [
            "Location.csv",
            "Panel_Configuration.csv",
            "Summary_Metrics.csv",
            "Financial_Analysis.csv",
            "Monthly_Data_January.csv",
            "Monthly_Data_December.csv",
            "README.txt",
        ] {
            assert!(names.iter().any(|n| n == expected), "missing {expected}");
        }
        assert_eq!(names.len(), 4 + 12 + 1);

        let mut location = String::new();
        archive.by_name("Location.csv").unwrap().read_to_string(&mut location).unwrap();
        assert_eq!(location, "Latitude,51.5\nLongitude,-0.1\nArea,100 m2\nRegion,UK\n");
    }

    #[test]
    fn values_come_from_formatted_report() {
        let files = bundle_files(&report()).unwrap();
        let summary = &files.iter().find(|(n, _)| n == "Summary_Metrics.csv").unwrap().1;
        let summary = String::from_utf8(summary.clone()).unwrap();
        // 4 m² * 150 * 0.172 * 12 = 1238.4 kWh
        assert!(summary.starts_with("Annual Energy Production,\"1,238.4 kWh\"\n"), "{summary}");
        assert!(summary.contains("Peak Power,0.69 kW"));

        let january = &files.iter().find(|(n, _)| n == "Monthly_Data_January.csv").unwrap().1;
        let january = String::from_utf8(january.clone()).unwrap();
        assert!(january.starts_with("Metric,Minimum,Maximum,Average,Median\n"));
        assert!(january.contains("Selected Angle Irradiation (kWh/m²),150.00,150.00,150.00,150.00"));
    }

    #[test]
    fn months_without_statistics_are_left_out() {
        let mut r = report();
        r.statistics = crate::analysis::aggregate(&[RawMonthlySample {
            month: 6,
            horizontal: Some(1.0),
            ..Default::default()
        }]);
        let files = bundle_files(&r).unwrap();
        let monthly: Vec<_> = files.iter().filter(|(n, _)| n.starts_with("Monthly_Data_")).collect();
        assert_eq!(monthly.len(), 1);
        assert_eq!(monthly[0].0, "Monthly_Data_June.csv");
    }

    #[test]
    fn combined_csv_has_all_sections() {
        let csv = export_combined_csv(&report()).unwrap();
        assert!(csv.starts_with("Configuration Data\nCategory,Parameter,Value\nLocation,Latitude,51.5\n"));
        assert!(csv.contains("\n\nSummary Metrics\nParameter,Value\n"));
        assert!(csv.contains("\n\nFinancial Analysis\nParameter,Value\n"));
        assert!(csv.contains("\n\nMonthly Performance Data\n"));
        assert!(!csv.contains("\n\n\n"));
        assert!(!csv.contains("\"\""));
        assert!(csv.contains("Net Metering,Disabled\n"));
        assert!(csv.contains("Month,Energy (kWh),Peak Sun Hours,Efficiency (%)\nJanuary,103.20,4.8,17.2%\n"));
    }
}
