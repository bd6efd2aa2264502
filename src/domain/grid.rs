// Category grid (pivoted table) used by heatmaps
use super::error::DashboardError;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct GridCell {
    pub row: String,
    pub column: String,
    pub value: f64,
}

impl GridCell {
    pub fn new(row: impl Into<String>, column: impl Into<String>, value: f64) -> Self {
        Self {
            row: row.into(),
            column: column.into(),
            value,
        }
    }
}

/// Two-key table. Rows and columns keep the order in which they first
/// appeared in the source cells.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryGrid {
    rows: Vec<String>,
    columns: Vec<String>,
    cells: HashMap<(String, String), f64>,
}

impl CategoryGrid {
    /// Pivot flat cells into a grid.
    ///
    /// A pair that shows up twice with different values is a
    /// [`DashboardError::DataIntegrity`]. Repeats with equal values are
    /// accepted and the first occurrence is kept.
    pub fn pivot<'a>(cells: impl IntoIterator<Item = &'a GridCell>) -> Result<Self, DashboardError> {
        let mut grid = Self {
            rows: Vec::new(),
            columns: Vec::new(),
            cells: HashMap::new(),
        };

        for cell in cells {
            let key = (cell.row.clone(), cell.column.clone());
            if let Some(&existing) = grid.cells.get(&key) {
                if existing != cell.value {
                    return Err(DashboardError::DataIntegrity {
                        row: cell.row.clone(),
                        column: cell.column.clone(),
                        existing,
                        conflicting: cell.value,
                    });
                }
                continue;
            }

            if !grid.rows.contains(&cell.row) {
                grid.rows.push(cell.row.clone());
            }
            if !grid.columns.contains(&cell.column) {
                grid.columns.push(cell.column.clone());
            }
            grid.cells.insert(key, cell.value);
        }

        Ok(grid)
    }

    pub fn get(&self, row: &str, column: &str) -> Option<f64> {
        self.cells
            .get(&(row.to_string(), column.to_string()))
            .copied()
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Row-major matrix with `None` for holes.
    pub fn matrix(&self) -> Vec<Vec<Option<f64>>> {
        self.rows
            .iter()
            .map(|row| self.columns.iter().map(|col| self.get(row, col)).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pivot_small_table() {
        let cells = vec![
            GridCell::new("1w", "Mon", 1.0),
            GridCell::new("1w", "Tue", 3.0),
            GridCell::new("2w", "Mon", 2.0),
        ];
        let grid = CategoryGrid::pivot(&cells).unwrap();

        assert_eq!(grid.get("1w", "Mon"), Some(1.0));
        assert_eq!(grid.get("1w", "Tue"), Some(3.0));
        assert_eq!(grid.get("2w", "Mon"), Some(2.0));
        assert_eq!(grid.get("2w", "Tue"), None);
        assert_eq!(grid.rows(), ["1w", "2w"]);
        assert_eq!(grid.columns(), ["Mon", "Tue"]);
        assert_eq!(
            grid.matrix(),
            vec![vec![Some(1.0), Some(3.0)], vec![Some(2.0), None]]
        );
    }

    #[test]
    fn test_pivot_round_trip() {
        let mut cells = Vec::new();
        for w in 1..=6 {
            for d in 0..7 {
                cells.push(GridCell::new(format!("{w}w"), format!("d{d}"), (w * 10 + d) as f64));
            }
        }
        let grid = CategoryGrid::pivot(&cells).unwrap();
        for cell in &cells {
            assert_eq!(grid.get(&cell.row, &cell.column), Some(cell.value));
        }
        assert_eq!(grid.rows().len(), 6);
        assert_eq!(grid.columns().len(), 7);
    }

    #[test]
    fn test_pivot_conflict_is_integrity_error() {
        let cells = vec![
            GridCell::new("1w", "Mon", 1.0),
            GridCell::new("1w", "Mon", 4.0),
        ];
        let err = CategoryGrid::pivot(&cells).unwrap_err();
        assert_eq!(
            err,
            DashboardError::DataIntegrity {
                row: "1w".to_string(),
                column: "Mon".to_string(),
                existing: 1.0,
                conflicting: 4.0,
            }
        );
    }

    #[test]
    fn test_pivot_agreeing_duplicates_are_accepted() {
        let cells = vec![
            GridCell::new("1w", "Mon", 5.0),
            GridCell::new("1w", "Mon", 5.0),
        ];
        let grid = CategoryGrid::pivot(&cells).unwrap();
        assert_eq!(grid.get("1w", "Mon"), Some(5.0));
        assert_eq!(grid.rows().len(), 1);
    }
}
