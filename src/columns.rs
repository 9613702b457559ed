use crate::model::Token;
use crate::profile::ColumnBreakpoints;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    TestName,
    Result,
    Units,
    Interval,
}

impl ColumnBreakpoints {
    /// Picks the column for a token starting at `x_start`. Comparisons are
    /// strict, so a token exactly on a breakpoint lands in the column to its
    /// right.
    #[must_use]
    pub fn column_for(&self, x_start: f64) -> Column {
        if x_start < self.test_col_end {
            Column::TestName
        } else if x_start < self.results_col_end {
            Column::Result
        } else if x_start < self.units_col_end {
            Column::Units
        } else {
            Column::Interval
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowCells {
    pub test_name: String,
    pub result: String,
    pub units: String,
    pub interval: String,
}

impl RowCells {
    fn cell_mut(&mut self, column: Column) -> &mut String {
        match column {
            Column::TestName => &mut self.test_name,
            Column::Result => &mut self.result,
            Column::Units => &mut self.units,
            Column::Interval => &mut self.interval,
        }
    }

    fn trim_all(&mut self) {
        for column in [
            Column::TestName,
            Column::Result,
            Column::Units,
            Column::Interval,
        ] {
            let cell = self.cell_mut(column);
            *cell = cell.trim().to_string();
        }
    }
}

pub fn assign_columns<'a, I>(tokens: I, breakpoints: &ColumnBreakpoints) -> RowCells
where
    I: IntoIterator<Item = &'a Token>,
{
    let mut cells = RowCells::default();
    for token in tokens {
        let cell = cells.cell_mut(breakpoints.column_for(token.x_start));
        cell.push(' ');
        cell.push_str(&token.text);
    }
    cells.trim_all();
    cells
}
