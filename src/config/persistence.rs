//! File discovery and export naming configuration

/// Configuration for the input folders
pub struct InputPersistenceConfig {
    /// Extension of raw eye-tracker exports
    pub recording_extension: &'static str,
    /// Extensions of per-session trial timing tables
    pub timing_extensions: &'static [&'static str],
    /// Timing tables with this extension are two-sheet workbooks
    pub workbook_extension: &'static str,
}

/// Configuration for the results folder
pub struct OutputPersistenceConfig {
    pub json_extension: &'static str,
    pub csv_extension: &'static str,
    /// Appended to the date stem of the diagnostics file
    pub errors_suffix: &'static str,
    /// chrono format of the date stem
    pub date_format: &'static str,
}

/// The Master Persistence Configuration
pub struct PersistenceConfig {
    pub input: InputPersistenceConfig,
    pub output: OutputPersistenceConfig,
}

pub const PERSISTENCE: PersistenceConfig = PersistenceConfig {
    input: InputPersistenceConfig {
        recording_extension: "csv",
        timing_extensions: &["csv", "xlsx"],
        workbook_extension: "xlsx",
    },
    output: OutputPersistenceConfig {
        json_extension: "json",
        csv_extension: "csv",
        errors_suffix: "_errors.txt",
        date_format: "%Y-%m-%d",
    },
};

/// Default output file names for a run on `date_stem` (e.g. "2024-05-01").
/// Returns (json, csv, errors).
pub fn output_filenames(date_stem: &str) -> (String, String, String) {
    let out = &PERSISTENCE.output;
    (
        format!("{}.{}", date_stem, out.json_extension),
        format!("{}.{}", date_stem, out.csv_extension),
        format!("{}{}", date_stem, out.errors_suffix),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_filenames() {
        let (json, csv, errs) = output_filenames("2024-05-01");
        assert_eq!(json, "2024-05-01.json");
        assert_eq!(csv, "2024-05-01.csv");
        assert_eq!(errs, "2024-05-01_errors.txt");
    }
}
