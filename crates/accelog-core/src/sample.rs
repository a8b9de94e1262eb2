use std::borrow::Cow;

/// One accelerometer record as received on the wire.
///
/// Fields keep the exact tokens the firmware sent so that a recorded row is
/// byte-for-byte what arrived, without float reformatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    pub time: String,
    pub x: String,
    pub y: String,
    pub z: String,
}

/// Column names of a session file, in row order.
pub const COLUMNS: [&str; 4] = ["time", "x", "y", "z"];

/// A line that did not split into exactly four tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MalformedLine {
    pub tokens: usize,
}

impl Sample {
    /// Splits `line` on whitespace; exactly four tokens make a sample.
    pub fn parse(line: &str) -> Result<Self, MalformedLine> {
        let mut tokens = line.split_whitespace();
        match (tokens.next(), tokens.next(), tokens.next(), tokens.next(), tokens.next()) {
            (Some(time), Some(x), Some(y), Some(z), None) => Ok(Self {
                time: time.to_string(),
                x: x.to_string(),
                y: y.to_string(),
                z: z.to_string(),
            }),
            _ => Err(MalformedLine {
                tokens: line.split_whitespace().count(),
            }),
        }
    }

    /// Renders the record as a CSV row. A token holding a comma or quote is
    /// quoted with inner quotes doubled, so the row always has four fields.
    pub fn csv_row(&self) -> String {
        format!(
            "{},{},{},{}\n",
            quote_field(&self.time),
            quote_field(&self.x),
            quote_field(&self.y),
            quote_field(&self.z)
        )
    }

    /// Rebuilds a record from the fields of a CSV row, taking the columns at
    /// `index` in `time, x, y, z` order.
    pub fn from_fields(fields: &[String], index: [usize; 4]) -> Option<Self> {
        let [time, x, y, z] = index.map(|i| fields.get(i).map(|f| f.trim().to_string()));
        Some(Self {
            time: time?,
            x: x?,
            y: y?,
            z: z?,
        })
    }

    /// Numeric view of the record, if every token is a number.
    pub fn values(&self) -> Option<[f64; 4]> {
        Some([
            self.time.parse().ok()?,
            self.x.parse().ok()?,
            self.y.parse().ok()?,
            self.z.parse().ok()?,
        ])
    }
}

fn quote_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\r', '\n']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// Splits one CSV row into fields, honouring quoted fields.
pub fn split_csv_row(row: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut quoted = false;
    let mut chars = row.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if quoted && chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            '"' => quoted = !quoted,
            ',' if !quoted => fields.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }
    fields.push(field);
    fields
}

pub fn csv_header() -> String {
    let mut header = COLUMNS.join(",");
    header.push('\n');
    header
}
