use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Physical distance between adjacent pixels in millimeters (PixelSpacing)
///
/// `row` is the spacing between rows (vertical step), `col` the spacing
/// between columns (horizontal step).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct PixelSpacing {
    pub row: f64,
    pub col: f64,
}

impl PixelSpacing {
    /// Creates a new PixelSpacing
    pub fn new(row: f64, col: f64) -> Self {
        Self { row, col }
    }

    /// Parses pixel spacing from a loosely formatted string
    ///
    /// Used when the element cannot be read as a DS pair, for instance
    /// "0.5\\0.5", "0.5 0.5", "[0.5, 0.5]" or "5e-1\\5e-1".
    ///
    /// # Errors
    ///
    /// Returns an error unless two numbers can be found
    pub fn parse(s: &str) -> Result<Self, String> {
        static REGEX: OnceLock<Regex> = OnceLock::new();
        let re = REGEX.get_or_init(|| {
            Regex::new(r"[-+]?\d*\.?\d+(?:[eE][-+]?\d+)?").expect("Failed to compile regex")
        });

        let mut numbers = re.find_iter(s).map(|m| m.as_str());
        let mut next_number = |which: &str| -> Result<f64, String> {
            numbers
                .next()
                .ok_or_else(|| format!("Failed to parse PixelSpacing from '{}'", s))?
                .parse()
                .map_err(|e| format!("Failed to parse {} spacing: {}", which, e))
        };

        let row = next_number("row")?;
        let col = next_number("column")?;
        Ok(PixelSpacing { row, col })
    }
}

impl fmt::Display for PixelSpacing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {} mm", self.row, self.col)
    }
}
