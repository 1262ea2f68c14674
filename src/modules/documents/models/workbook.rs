use rust_decimal::Decimal;
use serde::Serialize;

/// One spreadsheet cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Cell {
    Empty,
    Text(String),
    Number(Decimal),
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        Cell::Text(text.to_string())
    }
}

impl From<String> for Cell {
    fn from(text: String) -> Self {
        Cell::Text(text)
    }
}

impl From<Decimal> for Cell {
    fn from(number: Decimal) -> Self {
        Cell::Number(number)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowStyle {
    #[default]
    Normal,
    Header,
    Section,
    Total,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Row {
    pub style: RowStyle,
    pub cells: Vec<Cell>,
}

impl Row {
    pub fn new(style: RowStyle, cells: Vec<Cell>) -> Self {
        Self { style, cells }
    }

    pub fn blank() -> Self {
        Self::default()
    }

    /// True when any text cell equals `label`
    pub fn has_label(&self, label: &str) -> bool {
        self.cells
            .iter()
            .any(|cell| matches!(cell, Cell::Text(text) if text == label))
    }

    fn last_number(&self) -> Option<Decimal> {
        self.cells.iter().rev().find_map(|cell| match cell {
            Cell::Number(number) => Some(*number),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Row>,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, style: RowStyle, cells: Vec<Cell>) {
        self.rows.push(Row::new(style, cells));
    }

    /// Numeric value on the first row labeled `label`
    pub fn value_for(&self, label: &str) -> Option<Decimal> {
        self.rows
            .iter()
            .find(|row| row.has_label(label))
            .and_then(Row::last_number)
    }
}

/// Ordered sheets handed to a spreadsheet writer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|sheet| sheet.name == name)
    }
}
