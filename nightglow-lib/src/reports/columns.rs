use crate::metrics::MetricRow;

/// The value of one cell, before formatting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell<'a> {
    Text(&'a str),

    /// A raw measurement
    Number(f64),

    /// A derived ratio, absent when its denominator was not positive
    Ratio(Option<f64>),
}

/// Marker printed for an absent ratio.
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug)]
pub struct ColumnDef {
    pub header: &'static str,

    /// Console column width, excluding the separating space
    pub width: usize,

    /// Digits after the decimal point when printed to the console (and for ratios, in CSV)
    pub decimals: usize,

    pub extractor: for<'a> fn(&'a MetricRow) -> Cell<'a>,
}

impl ColumnDef {
    /// Render a cell for the console, without padding.
    #[must_use]
    pub fn console_text(&self, row: &MetricRow) -> String {
        match (self.extractor)(row) {
            Cell::Text(s) => s.to_string(),
            Cell::Number(v) | Cell::Ratio(Some(v)) => format!("{v:.prec$}", prec = self.decimals),
            Cell::Ratio(None) => NOT_AVAILABLE.to_string(),
        }
    }

    /// Render a cell for CSV: measurements at full precision, ratios rounded.
    #[must_use]
    pub fn csv_text(&self, row: &MetricRow) -> String {
        match (self.extractor)(row) {
            Cell::Text(s) => s.to_string(),
            Cell::Number(v) => v.to_string(),
            Cell::Ratio(Some(v)) => format!("{v:.prec$}", prec = self.decimals),
            Cell::Ratio(None) => NOT_AVAILABLE.to_string(),
        }
    }
}

macro_rules! column_def {
    ($header:expr, $width:expr, $decimals:expr, $extractor:expr) => {
        ColumnDef {
            header: $header,
            width: $width,
            decimals: $decimals,
            extractor: $extractor,
        }
    };
}

pub const CONSOLE_COLUMNS: &[ColumnDef] = &[
    column_def!("COUNTRY", 15, 0, |r| Cell::Text(&r.country)),
    column_def!("CITY", 20, 0, |r| Cell::Text(&r.city_name)),
    column_def!("POP(Strict)", 12, 0, |r| Cell::Number(r.city.pop_strict)),
    column_def!("POP(Metro)", 12, 0, |r| Cell::Number(r.city.pop_metro)),
    column_def!("CITY SOL", 12, 0, |r| Cell::Number(r.city.sol)),
    column_def!("AREA km2", 10, 1, |r| Cell::Number(r.city.built_up_km2)),
    column_def!("CAP SOL", 12, 0, |r| Cell::Number(r.capital.sol)),
    column_def!("CAP POP(S)", 12, 0, |r| Cell::Number(r.capital.pop_strict)),
    column_def!("CAP POP(M)", 12, 0, |r| Cell::Number(r.capital.pop_metro)),
    column_def!("NAT SOL", 12, 0, |r| Cell::Number(r.national_sol)),
    column_def!("DIST km", 10, 0, |r| Cell::Number(r.distance_km)),
    column_def!("% of CAP", 10, 1, |r| Cell::Ratio(r.pct_of_capital)),
    column_def!("% of NAT", 10, 1, |r| Cell::Ratio(r.pct_of_national)),
    column_def!("LIGHT/CAP", 10, 3, |r| Cell::Ratio(r.light_per_capita)),
];

pub const CSV_COLUMNS: &[ColumnDef] = &[
    column_def!("Country", 0, 0, |r| Cell::Text(&r.country)),
    column_def!("City_Name", 0, 0, |r| Cell::Text(&r.city_name)),
    column_def!("Capital_Name", 0, 0, |r| Cell::Text(r.capital_name.as_deref().unwrap_or_default())),
    column_def!("City_SOL", 0, 0, |r| Cell::Number(r.city.sol)),
    column_def!("City_Pop_Strict", 0, 0, |r| Cell::Number(r.city.pop_strict)),
    column_def!("City_Pop_Metro", 0, 0, |r| Cell::Number(r.city.pop_metro)),
    column_def!("City_Area", 0, 1, |r| Cell::Number(r.city.built_up_km2)),
    column_def!("Capital_SOL", 0, 0, |r| Cell::Number(r.capital.sol)),
    column_def!("Capital_Pop_Strict", 0, 0, |r| Cell::Number(r.capital.pop_strict)),
    column_def!("Capital_Pop_Metro", 0, 0, |r| Cell::Number(r.capital.pop_metro)),
    column_def!("Capital_Area", 0, 1, |r| Cell::Number(r.capital.built_up_km2)),
    column_def!("National_SOL", 0, 0, |r| Cell::Number(r.national_sol)),
    column_def!("Distance_km", 0, 0, |r| Cell::Number(r.distance_km)),
    column_def!("Score (%)", 0, 1, |r| Cell::Ratio(r.pct_of_capital)),
    column_def!("National (%)", 0, 1, |r| Cell::Ratio(r.pct_of_national)),
    column_def!("Light/Cap", 0, 3, |r| Cell::Ratio(r.light_per_capita)),
];
